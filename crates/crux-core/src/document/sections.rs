//! Section generators.
//!
//! Each generator turns one slice of [`Insights`] into markdown and falls back
//! to a fixed phrase when there is nothing to say.

use super::template::{
    ASSUMPTIONS_CHALLENGED, KEY_DECISIONS, METRICS_THAT_MATTER, NEXT_STEPS, RISKS_WE_ACCEPT,
    THE_BIG_BET, TIMELINE,
};
use crate::insight::Insights;

/// Renders the body of section `name`. Unknown names get a placeholder.
pub fn render_section(name: &str, insights: &Insights) -> String {
    match name {
        THE_BIG_BET => big_bet(insights),
        KEY_DECISIONS => key_decisions(insights),
        METRICS_THAT_MATTER => metrics(insights),
        RISKS_WE_ACCEPT => risks(insights),
        NEXT_STEPS => next_steps(insights),
        ASSUMPTIONS_CHALLENGED => assumptions(insights),
        TIMELINE => timeline(insights),
        _ => format!("Nothing was captured for {} in this conversation.", name.to_lowercase()),
    }
}

/// Fixed block counting what each category produced.
pub fn summary_block(insights: &Insights) -> String {
    format!(
        "Goals: {}\nAssumptions challenged: {}\nKey decisions: {}\nNext steps: {}\nRisks: {}\nMetrics: {}\nTimeline markers: {}",
        insights.goals.len(),
        insights.challenged_assumptions.len(),
        insights.key_decisions.len(),
        insights.next_steps.len(),
        insights.risk_factors.len(),
        insights.metrics.len(),
        insights.timeline.len(),
    )
}

fn bullets<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items
        .into_iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn big_bet(insights: &Insights) -> String {
    let Some(lead) = insights
        .lead_goal
        .as_ref()
        .or_else(|| insights.goals.iter().next())
    else {
        return "No single bet emerged. Name the one outcome worth betting on before anything else."
            .to_string();
    };

    let mut text = format!("We will {}.", lead);
    let rest: Vec<&String> = insights.goals.iter().filter(|goal| *goal != lead).collect();
    if !rest.is_empty() {
        text.push_str("\n\nAlso on the table:\n");
        text.push_str(&bullets(rest));
    }
    text
}

fn key_decisions(insights: &Insights) -> String {
    if insights.key_decisions.is_empty() {
        return "No decisions were made. Until something is decided, nothing changes.".to_string();
    }
    bullets(&insights.key_decisions)
}

fn metrics(insights: &Insights) -> String {
    if insights.metrics.is_empty() {
        return "No metrics were named. Pick one number that proves progress.".to_string();
    }
    bullets(&insights.metrics)
}

fn risks(insights: &Insights) -> String {
    if insights.risk_factors.is_empty() {
        return "No risks were surfaced, which is itself a risk.".to_string();
    }
    bullets(&insights.risk_factors)
}

fn next_steps(insights: &Insights) -> String {
    if insights.next_steps.is_empty() {
        return "Define the first action and who owns it.".to_string();
    }
    bullets(&insights.next_steps)
}

fn assumptions(insights: &Insights) -> String {
    if insights.challenged_assumptions.is_empty() {
        return "No assumptions were challenged.".to_string();
    }
    bullets(&insights.challenged_assumptions)
}

fn timeline(insights: &Insights) -> String {
    if insights.timeline.is_empty() {
        return "No dates were committed. Set one.".to_string();
    }
    bullets(&insights.timeline)
}
