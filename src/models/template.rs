use serde::{Deserialize, Serialize};

/// 8-bit RGB color parsed from a `#RRGGBB` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub fn parse_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Rgb { r, g, b })
    }

    /// Channels scaled to the 0.0..=1.0 range used by PDF color operators.
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Helvetica,
    Times,
}

impl FontFamily {
    pub fn regular(self) -> &'static str {
        match self {
            FontFamily::Helvetica => "Helvetica",
            FontFamily::Times => "Times-Roman",
        }
    }

    pub fn bold(self) -> &'static str {
        match self {
            FontFamily::Helvetica => "Helvetica-Bold",
            FontFamily::Times => "Times-Bold",
        }
    }

    pub fn oblique(self) -> &'static str {
        match self {
            FontFamily::Helvetica => "Helvetica-Oblique",
            FontFamily::Times => "Times-Italic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Experience,
    Education,
    Skills,
    Languages,
    Certifications,
}

impl Section {
    pub fn heading(self) -> &'static str {
        match self {
            Section::Summary => "Summary",
            Section::Experience => "Experience",
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Languages => "Languages",
            Section::Certifications => "Certifications",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TemplateStyle {
    pub name: &'static str,
    pub primary: Rgb,
    pub accent: Rgb,
    pub font: FontFamily,
    pub sections: &'static [Section],
}

/// Fixed set of resume styles. Unknown names resolve to the default entry
/// instead of failing, so a stale client can never break generation.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    styles: Vec<TemplateStyle>,
}

const MODERN_SECTIONS: &[Section] = &[
    Section::Summary,
    Section::Experience,
    Section::Education,
    Section::Skills,
    Section::Languages,
    Section::Certifications,
];

const CLASSIC_SECTIONS: &[Section] = &[
    Section::Summary,
    Section::Experience,
    Section::Education,
    Section::Certifications,
    Section::Skills,
    Section::Languages,
];

const MINIMAL_SECTIONS: &[Section] = &[
    Section::Summary,
    Section::Skills,
    Section::Experience,
    Section::Education,
    Section::Languages,
    Section::Certifications,
];

const ELEGANT_SECTIONS: &[Section] = &[
    Section::Summary,
    Section::Education,
    Section::Experience,
    Section::Skills,
    Section::Certifications,
    Section::Languages,
];

impl StyleCatalog {
    pub fn built_in() -> Self {
        let styles = vec![
            // The first entry doubles as the fallback for unknown names.
            entry("modern", "#1E293B", "#6366F1", FontFamily::Helvetica, MODERN_SECTIONS), // Slate 800 / Indigo 500
            entry("classic", "#0F172A", "#B45309", FontFamily::Times, CLASSIC_SECTIONS), // Slate 900 / Amber 700
            entry("minimal", "#111827", "#6B7280", FontFamily::Helvetica, MINIMAL_SECTIONS), // Gray 900 / Gray 500
            entry("elegant", "#312E81", "#A21CAF", FontFamily::Times, ELEGANT_SECTIONS), // Indigo 900 / Fuchsia 700
        ];
        Self { styles }
    }

    pub fn default_style(&self) -> &TemplateStyle {
        &self.styles[0]
    }

    pub fn resolve(&self, name: &str) -> &TemplateStyle {
        let wanted = name.trim();
        self.styles
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(wanted))
            .unwrap_or_else(|| self.default_style())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.styles.iter().map(|s| s.name).collect()
    }
}

fn entry(
    name: &'static str,
    primary_hex: &str,
    accent_hex: &str,
    font: FontFamily,
    sections: &'static [Section],
) -> TemplateStyle {
    TemplateStyle {
        name,
        primary: Rgb::parse_hex(primary_hex).unwrap_or(Rgb::BLACK),
        accent: Rgb::parse_hex(accent_hex).unwrap_or(Rgb::BLACK),
        font,
        sections,
    }
}
