use chrono::Utc;

use super::model::{Document, DocumentMetadata, DocumentSection};
use super::sections::{render_section, summary_block};
use super::template::DocumentTemplates;
use crate::error::Result;
use crate::insight::InsightExtractor;
use crate::persona::PersonaDefinition;
use crate::session::{ConversationTurn, OrgContext, UserContext};

/// Heading of the fixed block appended after the template sections.
pub const SUMMARY_HEADING: &str = "SUMMARY";

/// Maps a persona's template and the transcript's insights to a document.
#[derive(Debug, Clone, Default)]
pub struct DocumentSynthesizer {
    templates: DocumentTemplates,
    extractor: InsightExtractor,
}

impl DocumentSynthesizer {
    pub fn new(templates: DocumentTemplates) -> Self {
        Self {
            templates,
            extractor: InsightExtractor::new(),
        }
    }

    pub fn templates(&self) -> &DocumentTemplates {
        &self.templates
    }

    /// Builds the document for `history`.
    ///
    /// Only the metadata timestamp depends on the call time; title, sections
    /// and content are a function of the inputs.
    ///
    /// # Errors
    ///
    /// Returns `CruxError::UnknownDocumentTemplate` if the persona has no
    /// registered template.
    pub fn synthesize(
        &self,
        history: &[ConversationTurn],
        persona: &PersonaDefinition,
        user: &UserContext,
        org: &OrgContext,
    ) -> Result<Document> {
        let template = self.templates.get(persona.id)?;
        let insights = self.extractor.extract(history);

        let title = format!("{}: {}", template.title, org.display_name());
        let sections: Vec<DocumentSection> = template
            .sections
            .iter()
            .map(|name| DocumentSection {
                name: name.clone(),
                content: render_section(name, &insights),
            })
            .collect();
        let summary = summary_block(&insights);

        let mut content = format!("# {}\n\n", title);
        for section in &sections {
            content.push_str(&format!("## {}\n\n{}\n\n", section.name, section.content));
        }
        content.push_str(&format!("## {}\n\n{}\n", SUMMARY_HEADING, summary));

        let word_count = content.split_whitespace().count();

        tracing::info!(
            persona = %persona.id,
            turns = history.len(),
            sections = sections.len(),
            word_count,
            "Synthesized document"
        );

        Ok(Document {
            title,
            sections,
            summary,
            content,
            insights,
            metadata: DocumentMetadata {
                timestamp: Utc::now(),
                persona: persona.id,
                user_name: user.name.clone(),
                company_name: org.display_name().to_string(),
                word_count,
            },
        })
    }
}
