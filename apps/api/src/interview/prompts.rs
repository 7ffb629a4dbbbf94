// Completion templates for the answer evaluator. The wording is fixed: recruiters
// compare scores across candidates, so changing it changes the scale.

/// Prompt for the retrieval-grounded ideal answer.
pub fn ideal_answer_prompt(context: &str, question: &str) -> String {
    format!(
        "Answer the question based on the context below:\n\nContext: {context}\n\nQuestion: {question}\nAnswer: "
    )
}

/// Prompt for scoring a candidate answer against the ideal answer.
pub fn score_prompt(ideal_answer: &str, candidate_answer: &str) -> String {
    format!(
        "Compare the following answers and assign a score between 0 and 10:\n\nIdeal Answer: {ideal_answer}\n\nCandidate Answer: {candidate_answer}\n\nScore: "
    )
}
