// Shared prompt fragments for completion calls.
// Interview-specific templates live in interview/prompts.rs.

/// System prompt for ideal-answer generation. Empty: the template carries the instruction.
pub const ANSWER_SYSTEM: &str = "";

/// System prompt for scoring calls. Asks for a bare number so score extraction
/// has a single token to find.
pub const SCORE_ONLY_SYSTEM: &str = "You are a strict technical interviewer. \
    Respond with a single number between 0 and 10 and nothing else. \
    Do NOT include words, units, explanations or markdown.";
