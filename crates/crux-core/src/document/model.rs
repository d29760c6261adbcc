use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::insight::Insights;
use crate::persona::PersonaId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub timestamp: DateTime<Utc>,
    pub persona: PersonaId,
    pub user_name: String,
    pub company_name: String,
    /// Whitespace-separated words in [`Document::content`]
    pub word_count: usize,
}

/// Closing strategy document. Produced once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub sections: Vec<DocumentSection>,
    /// Insight category counts appended after the sections
    pub summary: String,
    /// Rendered markdown body: title, sections and summary block
    pub content: String,
    /// The insights the sections were generated from
    pub insights: Insights,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn section(&self, name: &str) -> Option<&DocumentSection> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// Body plus a metadata footer.
    pub fn to_markdown(&self) -> String {
        format!(
            "{}\n\n---\n_Prepared for {} at {} on {} ({} words)_\n",
            self.content.trim_end(),
            self.metadata.user_name,
            self.metadata.company_name,
            self.metadata.timestamp.format("%Y-%m-%d %H:%M UTC"),
            self.metadata.word_count,
        )
    }
}
