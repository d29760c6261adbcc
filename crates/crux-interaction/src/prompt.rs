//! System prompt rendering for the completion service.

use minijinja::Environment;
use serde::Serialize;

use crux_core::persona::PersonaDefinition;
use crux_core::{CruxError, Phase, Result};

const SYSTEM_PROMPT_TEMPLATE: &str = "\
# Persona Profile
**Name**: {{ name }}
**Role**: {{ role }}

## Background
{{ background }}

## Communication Style
{{ communication_style }}

## Current Phase: {{ phase_title }}
{{ phase_guidance }}
{% if common_phrases %}
## Signature Phrases
{% for phrase in common_phrases %}- {{ phrase }}
{% endfor %}{% endif %}
## Intensity
Current intensity is {{ intensity }} on a scale from 0.3 to 1.0 ({{ intensity_label }}).
Reply with a single challenge of at most two sentences. Stay in character. Never agree without pushing back.
";

#[derive(Serialize)]
struct PromptContext<'a> {
    name: &'a str,
    role: &'a str,
    background: &'a str,
    communication_style: &'a str,
    phase_title: &'a str,
    phase_guidance: &'a str,
    common_phrases: &'a [String],
    intensity: f64,
    intensity_label: &'static str,
}

fn intensity_label(intensity: f64) -> &'static str {
    if intensity > 0.8 {
        "relentless"
    } else if intensity >= 0.6 {
        "firm"
    } else {
        "measured"
    }
}

/// Renders the persona's system prompt for `phase` at `intensity`.
pub fn render_system_prompt(
    persona: &PersonaDefinition,
    phase: Phase,
    intensity: f64,
) -> Result<String> {
    let context = PromptContext {
        name: &persona.display_name,
        role: &persona.role,
        background: &persona.background,
        communication_style: &persona.communication_style,
        phase_title: phase.title(),
        phase_guidance: phase.guidance(),
        common_phrases: &persona.common_phrases,
        intensity,
        intensity_label: intensity_label(intensity),
    };

    Environment::new()
        .render_str(SYSTEM_PROMPT_TEMPLATE, context)
        .map_err(|e| CruxError::Serialization {
            format: "template".to_string(),
            message: e.to_string(),
        })
}
