use serde::Serialize;

use crate::models::resume::ResumeContent;

const IDENTITY_FIELD_POINTS: i32 = 5;
const ONLINE_PRESENCE_BONUS: i32 = 5;
const SUMMARY_FULL_POINTS: i32 = 10;
const SUMMARY_SHORT_POINTS: i32 = 5;
const SUMMARY_FULL_WORDS: usize = 30;
const EXPERIENCE_LINE_POINTS: i32 = 5;
const EXPERIENCE_CAP: i32 = 25;
const EDUCATION_LINE_POINTS: i32 = 5;
const EDUCATION_CAP: i32 = 15;
const SKILL_POINTS: i32 = 1;
const SKILLS_CAP: i32 = 10;
const LANGUAGE_POINTS: i32 = 2;
const LANGUAGES_CAP: i32 = 6;
const CERTIFICATE_POINTS: i32 = 2;
const CERTIFICATES_CAP: i32 = 4;

const EXPERIENCE_TARGET_LINES: usize = 3;
const SKILLS_TARGET: usize = 5;
const MAX_SUGGESTIONS: usize = 8;

const TITLE_SKILL_SUGGESTIONS: &[(&str, &[&str])] = &[
    ("engineer", &["Git", "Docker", "CI/CD", "Linux"]),
    ("developer", &["Git", "REST APIs", "SQL", "Testing"]),
    ("data", &["Python", "SQL", "Pandas", "Machine Learning"]),
    ("designer", &["Figma", "Typography", "Prototyping"]),
    ("manager", &["Agile", "Stakeholder Management", "Roadmapping"]),
    ("analyst", &["Excel", "SQL", "Data Visualization"]),
    ("devops", &["Kubernetes", "Terraform", "AWS", "Monitoring"]),
];

const ACTION_VERB_SUGGESTIONS: &[(&str, &[&str])] = &[
    ("helped", &["Led", "Drove", "Delivered"]),
    ("worked on", &["Built", "Designed", "Implemented"]),
    ("responsible for", &["Owned", "Managed", "Directed"]),
    ("was part of", &["Contributed to", "Co-built", "Shipped"]),
    ("made", &["Created", "Developed", "Produced"]),
];

/// Immutable lookup tables behind the suggestion output, fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionTables {
    pub title_skills: &'static [(&'static str, &'static [&'static str])],
    pub action_verbs: &'static [(&'static str, &'static [&'static str])],
}

impl SuggestionTables {
    pub const fn built_in() -> Self {
        Self {
            title_skills: TITLE_SKILL_SUGGESTIONS,
            action_verbs: ACTION_VERB_SUGGESTIONS,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreReport {
    pub score: i32,
    pub feedback: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Completeness scoring over canonical resume content. Pure and
/// deterministic: same content always yields the same report.
#[derive(Debug, Clone)]
pub struct ScoringService {
    tables: SuggestionTables,
}

impl ScoringService {
    pub fn new() -> Self {
        Self {
            tables: SuggestionTables::built_in(),
        }
    }

    pub fn score(&self, content: &ResumeContent) -> ScoreReport {
        let mut score = 0;
        let mut feedback = Vec::new();

        // Identity fields, 5 points each.
        for present in [
            !content.name.is_empty(),
            !content.email.is_empty(),
            content.phone.is_some(),
            content.location.is_some(),
            !content.title.is_empty(),
        ] {
            if present {
                score += IDENTITY_FIELD_POINTS;
            }
        }
        if content.phone.is_none() {
            feedback.push("Add a phone number so recruiters can reach you directly".to_string());
        }
        if content.location.is_none() {
            feedback.push("Add your location to help with regional matching".to_string());
        }

        if content.has_online_presence() {
            score += ONLINE_PRESENCE_BONUS;
        } else {
            feedback.push("Link a website, LinkedIn or GitHub profile".to_string());
        }

        match &content.summary {
            Some(summary) if summary.split_whitespace().count() >= SUMMARY_FULL_WORDS => {
                score += SUMMARY_FULL_POINTS;
            }
            Some(_) => {
                score += SUMMARY_SHORT_POINTS;
                feedback.push(format!(
                    "Expand your summary to at least {} words",
                    SUMMARY_FULL_WORDS
                ));
            }
            None => {
                feedback.push(format!(
                    "Write a short professional summary (aim for {}+ words)",
                    SUMMARY_FULL_WORDS
                ));
            }
        }

        score += item_points(content.experience.len(), EXPERIENCE_LINE_POINTS, EXPERIENCE_CAP);
        if content.experience.len() < EXPERIENCE_TARGET_LINES {
            feedback.push(format!(
                "List at least {} experience entries",
                EXPERIENCE_TARGET_LINES
            ));
        }

        score += item_points(content.education.len(), EDUCATION_LINE_POINTS, EDUCATION_CAP);

        score += item_points(content.skills.len(), SKILL_POINTS, SKILLS_CAP);
        if content.skills.len() < SKILLS_TARGET {
            feedback.push(format!(
                "List {} or more skills to strengthen keyword matching",
                SKILLS_TARGET
            ));
        }

        score += item_points(content.languages.len(), LANGUAGE_POINTS, LANGUAGES_CAP);
        if content.languages.is_empty() {
            feedback.push("Mention the languages you speak".to_string());
        }

        score += item_points(
            content.certificates.len(),
            CERTIFICATE_POINTS,
            CERTIFICATES_CAP,
        );
        if content.certificates.is_empty() {
            feedback.push("Add certifications if you have any".to_string());
        }

        ScoreReport {
            score: score.clamp(0, 100),
            feedback,
            suggestions: self.suggest(content),
        }
    }

    fn suggest(&self, content: &ResumeContent) -> Vec<String> {
        let title = content.title.to_lowercase();
        let experience_text = content.experience.join("\n").to_lowercase();
        let known_skills: Vec<String> = content
            .skills
            .iter()
            .map(|s| s.to_lowercase())
            .collect();

        let mut suggestions = Vec::new();

        for (keyword, skills) in self.tables.title_skills {
            if !title.contains(keyword) {
                continue;
            }
            for skill in *skills {
                if known_skills.iter().any(|known| known == &skill.to_lowercase()) {
                    continue;
                }
                push_unique(
                    &mut suggestions,
                    format!("Consider adding {} to your skills", skill),
                );
            }
        }

        for (weak_phrase, verbs) in self.tables.action_verbs {
            if experience_text.contains(weak_phrase) {
                push_unique(
                    &mut suggestions,
                    format!(
                        "Replace \"{}\" with a stronger verb such as {}",
                        weak_phrase,
                        verbs.join(", ")
                    ),
                );
            }
        }

        suggestions.truncate(MAX_SUGGESTIONS);
        suggestions
    }
}

impl Default for ScoringService {
    fn default() -> Self {
        Self::new()
    }
}

fn item_points(count: usize, per_item: i32, cap: i32) -> i32 {
    (count as i32).saturating_mul(per_item).min(cap)
}

fn push_unique(items: &mut Vec<String>, candidate: String) {
    if !items.contains(&candidate) {
        items.push(candidate);
    }
}
