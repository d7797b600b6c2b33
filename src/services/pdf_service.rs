use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::error::Result;
use crate::models::resume::ResumeContent;
use crate::models::template::{Rgb, Section, TemplateStyle};

// ── Page geometry (US Letter, PDF points) ──
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 54.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const HEADER_HEIGHT: f32 = 96.0;

// ── Type scale ──
const NAME_SIZE: f32 = 24.0;
const TITLE_SIZE: f32 = 13.0;
const CONTACT_SIZE: f32 = 9.5;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const BODY_LEADING: f32 = 14.0;
const BULLET_INDENT: f32 = 12.0;

// ── Fixed text colors ──
const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };
const HEADER_SUBTEXT: Rgb = Rgb { r: 226, g: 232, b: 240 }; // Slate 200
const BODY_TEXT: Rgb = Rgb { r: 51, g: 65, b: 85 }; // Slate 700
const CONTACT_TEXT: Rgb = Rgb { r: 71, g: 85, b: 105 }; // Slate 600

pub struct PdfService;

impl PdfService {
    /// Render the resume into a complete PDF. Missing optional fields omit
    /// their section entirely; well-formed content never fails to render.
    pub fn render(content: &ResumeContent, style: &TemplateStyle) -> Result<Vec<u8>> {
        let mut page = PageWriter::new(PAGE_HEIGHT - HEADER_HEIGHT - 28.0);

        draw_header(&mut page, content, style);
        draw_contact_lines(&mut page, content);

        for section in style.sections {
            match section {
                Section::Summary => {
                    if let Some(summary) = &content.summary {
                        draw_heading(&mut page, style, Section::Summary);
                        draw_paragraph(&mut page, summary);
                    }
                }
                Section::Experience => {
                    if !content.experience.is_empty() {
                        draw_heading(&mut page, style, Section::Experience);
                        draw_items(&mut page, &content.experience);
                    }
                }
                Section::Education => {
                    if !content.education.is_empty() {
                        draw_heading(&mut page, style, Section::Education);
                        draw_items(&mut page, &content.education);
                    }
                }
                Section::Skills => {
                    if !content.skills.is_empty() {
                        draw_heading(&mut page, style, Section::Skills);
                        draw_paragraph(&mut page, &content.skills.join(" \u{2022} "));
                    }
                }
                Section::Languages => {
                    if !content.languages.is_empty() {
                        draw_heading(&mut page, style, Section::Languages);
                        draw_paragraph(&mut page, &content.languages.join(" \u{2022} "));
                    }
                }
                Section::Certifications => {
                    if !content.certificates.is_empty() {
                        draw_heading(&mut page, style, Section::Certifications);
                        draw_items(&mut page, &content.certificates);
                    }
                }
            }
        }

        assemble_document(page.finish(), style)
    }
}

fn draw_header(page: &mut PageWriter, content: &ResumeContent, style: &TemplateStyle) {
    page.fill_rect(
        0.0,
        PAGE_HEIGHT - HEADER_HEIGHT,
        PAGE_WIDTH,
        HEADER_HEIGHT,
        style.primary,
    );
    page.text("F2", NAME_SIZE, MARGIN, PAGE_HEIGHT - 46.0, WHITE, &content.name);
    if !content.title.is_empty() {
        page.text(
            "F3",
            TITLE_SIZE,
            MARGIN,
            PAGE_HEIGHT - 68.0,
            HEADER_SUBTEXT,
            &content.title,
        );
    }
}

fn draw_contact_lines(page: &mut PageWriter, content: &ResumeContent) {
    let contact: Vec<&str> = [
        Some(content.email.as_str()).filter(|e| !e.is_empty()),
        content.phone.as_deref(),
        content.location.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !contact.is_empty() {
        let line = contact.join(" | ");
        page.text("F1", CONTACT_SIZE, MARGIN, page.y, CONTACT_TEXT, &line);
        page.y -= BODY_LEADING;
    }

    let presence: Vec<&str> = [
        content.website.as_deref(),
        content.linkedin.as_deref(),
        content.github.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !presence.is_empty() {
        let line = presence.join(" | ");
        page.text("F1", CONTACT_SIZE, MARGIN, page.y, CONTACT_TEXT, &line);
        page.y -= BODY_LEADING;
    }
}

fn draw_heading(page: &mut PageWriter, style: &TemplateStyle, section: Section) {
    // Keep the heading and at least one body line together.
    page.ensure_room(44.0);
    page.y -= 10.0;
    let heading = section.heading().to_uppercase();
    page.text("F2", HEADING_SIZE, MARGIN, page.y, style.accent, &heading);
    page.y -= 5.0;
    page.stroke_line(
        MARGIN,
        page.y,
        MARGIN + CONTENT_WIDTH,
        page.y,
        style.accent,
        0.8,
    );
    page.y -= BODY_LEADING;
}

fn draw_paragraph(page: &mut PageWriter, text: &str) {
    for line in wrap_text(text, BODY_SIZE, CONTENT_WIDTH) {
        page.ensure_room(BODY_LEADING);
        page.text("F1", BODY_SIZE, MARGIN, page.y, BODY_TEXT, &line);
        page.y -= BODY_LEADING;
    }
}

fn draw_items(page: &mut PageWriter, items: &[String]) {
    for item in items {
        let lines = wrap_text(item, BODY_SIZE, CONTENT_WIDTH - BULLET_INDENT);
        for (i, line) in lines.iter().enumerate() {
            page.ensure_room(BODY_LEADING);
            if i == 0 {
                let bulleted = format!("\u{2022} {}", line);
                page.text("F1", BODY_SIZE, MARGIN, page.y, BODY_TEXT, &bulleted);
            } else {
                page.text("F1", BODY_SIZE, MARGIN + BULLET_INDENT, page.y, BODY_TEXT, line);
            }
            page.y -= BODY_LEADING;
        }
    }
}

/// Accumulates content-stream operations, breaking to a fresh page whenever
/// the cursor would drop below the bottom margin.
struct PageWriter {
    finished: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: f32,
}

impl PageWriter {
    fn new(start_y: f32) -> Self {
        Self {
            finished: Vec::new(),
            current: Vec::new(),
            y: start_y,
        }
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < MARGIN {
            let done = std::mem::take(&mut self.current);
            self.finished.push(done);
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.finished.push(self.current);
        self.finished
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        let (r, g, b) = color.to_unit();
        self.current
            .push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        self.current.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        self.current.push(Operation::new("f", vec![]));
    }

    fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb, width: f32) {
        let (r, g, b) = color.to_unit();
        self.current
            .push(Operation::new("RG", vec![r.into(), g.into(), b.into()]));
        self.current.push(Operation::new("w", vec![width.into()]));
        self.current
            .push(Operation::new("m", vec![x1.into(), y1.into()]));
        self.current
            .push(Operation::new("l", vec![x2.into(), y2.into()]));
        self.current.push(Operation::new("S", vec![]));
    }

    fn text(&mut self, font: &str, size: f32, x: f32, y: f32, color: Rgb, text: &str) {
        let (r, g, b) = color.to_unit();
        self.current
            .push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        self.current.push(Operation::new("BT", vec![]));
        self.current
            .push(Operation::new("Tf", vec![font.into(), size.into()]));
        self.current
            .push(Operation::new("Td", vec![x.into(), y.into()]));
        self.current.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(text))],
        ));
        self.current.push(Operation::new("ET", vec![]));
    }
}

fn assemble_document(pages: Vec<Vec<Operation>>, style: &TemplateStyle) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => style.font.regular(),
        "Encoding" => "WinAnsiEncoding",
    });
    let font_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => style.font.bold(),
        "Encoding" => "WinAnsiEncoding",
    });
    let font_oblique = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => style.font.oblique(),
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_regular,
            "F2" => font_bold,
            "F3" => font_oblique,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Map text onto WinAnsi bytes. ASCII and Latin-1 pass through; common
/// punctuation gets its WinAnsi slot; everything else degrades to '?'.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u8,
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en dash
            '\u{2014}' => 0x97, // em dash
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            _ => b'?',
        })
        .collect()
}

/// Approximate per-character advance. Close enough for greedy line breaking;
/// exact glyph metrics are not worth carrying for four base-14 faces.
fn char_width(c: char, size: f32) -> f32 {
    let em = match c {
        'i' | 'j' | 'l' | '\'' | '|' | '.' | ',' | ':' | ';' | '!' => 0.28,
        'f' | 't' | 'r' | ' ' | '(' | ')' | '[' | ']' | '-' | '/' => 0.36,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.86,
        c if c.is_ascii_uppercase() => 0.67,
        c if c.is_ascii_digit() => 0.56,
        _ => 0.52,
    };
    em * size
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(|c| char_width(c, size)).sum()
}

/// Greedy word wrap. A word longer than the line stands alone on its own line
/// rather than being split mid-word.
fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate_width = text_width(&current, size) + char_width(' ', size) + text_width(word, size);
        if candidate_width > max_width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::template::StyleCatalog;
    use std::io::Cursor;

    fn ada() -> ResumeContent {
        ResumeContent {
            name: "Ada Lovelace".to_string(),
            email: "ada@x.com".to_string(),
            title: "Engineer".to_string(),
            phone: Some("+1-555-0100".to_string()),
            location: Some("London".to_string()),
            skills: vec!["Python".into(), "C++".into(), "SQL".into()],
            education: vec!["BSc CS, X University, 2010".into()],
            experience: vec![
                "Designed the analytical engine instruction set".into(),
                "Published the first machine algorithm".into(),
            ],
            ..Default::default()
        }
    }

    fn extract_all_text(bytes: &[u8]) -> String {
        let doc = Document::load_from(Cursor::new(bytes)).expect("generated PDF should load");
        let mut text = String::new();
        for page_num in doc.get_pages().keys() {
            text.push_str(&doc.extract_text(&[*page_num]).expect("extract page text"));
            text.push(' ');
        }
        text
    }

    #[test]
    fn renders_a_loadable_pdf_with_header_and_contact() {
        let catalog = StyleCatalog::built_in();
        let bytes = PdfService::render(&ada(), catalog.resolve("modern")).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        let text = extract_all_text(&bytes);
        assert!(text.contains("Ada Lovelace"));
        assert!(text.contains("Engineer"));
        assert!(text.contains("ada@x.com"));
        assert!(text.contains("EXPERIENCE"));
    }

    #[test]
    fn empty_sections_omit_their_headings() {
        let catalog = StyleCatalog::built_in();
        let bytes = PdfService::render(&ada(), catalog.resolve("modern")).unwrap();
        let text = extract_all_text(&bytes);

        // No summary, languages or certificates in the fixture.
        assert!(!text.contains("SUMMARY"));
        assert!(!text.contains("LANGUAGES"));
        assert!(!text.contains("CERTIFICATIONS"));
        assert!(text.contains("EDUCATION"));
    }

    #[test]
    fn every_built_in_style_renders() {
        let catalog = StyleCatalog::built_in();
        for name in catalog.names() {
            let bytes = PdfService::render(&ada(), catalog.resolve(name)).unwrap();
            assert!(bytes.starts_with(b"%PDF"), "style {} failed", name);
        }
    }

    #[test]
    fn long_content_flows_onto_further_pages() {
        let catalog = StyleCatalog::built_in();
        let mut content = ada();
        content.experience = (1..=120)
            .map(|i| format!("Experience entry number {} with some detail attached", i))
            .collect();

        let bytes = PdfService::render(&content, catalog.resolve("modern")).unwrap();
        let doc = Document::load_from(Cursor::new(&bytes[..])).unwrap();
        assert!(doc.get_pages().len() >= 2);

        let last_page = *doc.get_pages().keys().max().unwrap();
        let tail = doc.extract_text(&[last_page]).unwrap();
        assert!(tail.contains("entry number 120"));
    }

    #[test]
    fn wrapping_respects_the_line_width() {
        let text = "one two three four five six seven eight nine ten eleven twelve";
        let lines = wrap_text(text, BODY_SIZE, 120.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, BODY_SIZE) <= 120.0, "line too wide: {}", line);
        }
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn oversized_words_stand_alone() {
        let lines = wrap_text("short Pneumonoultramicroscopicsilicovolcanoconiosis end", BODY_SIZE, 80.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Pneumonoultramicroscopicsilicovolcanoconiosis");
    }

    #[test]
    fn win_ansi_keeps_ascii_and_maps_bullets() {
        assert_eq!(encode_win_ansi("Ada"), b"Ada".to_vec());
        assert_eq!(encode_win_ansi("\u{2022}"), vec![0x95]);
        assert_eq!(encode_win_ansi("\u{4E16}"), vec![b'?']);
    }
}
