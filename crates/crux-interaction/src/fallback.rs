use crux_core::Phase;

/// Reply used verbatim when the completion service fails or times out.
pub fn canned_reply(phase: Phase) -> &'static str {
    match phase {
        Phase::Provocation => {
            "Let's not get comfortable. What is the part of this you'd rather not talk about?"
        }
        Phase::DeepDive => "Stay with the hard part. What evidence do you actually have?",
        Phase::Synthesis => "Enough analysis. What will you do, and by when?",
        Phase::Output => "We have enough. Ask for your strategy document.",
    }
}
