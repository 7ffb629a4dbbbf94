// Candidate interview: question bank, per-session flow, RAG evaluation, persistence.
// All model calls go through llm_client / embeddings — no direct HTTP here.

pub mod evaluator;
pub mod flow;
pub mod handlers;
pub mod prompts;
pub mod repository;
pub mod retrieval;
pub mod roles;
pub mod sessions;

#[cfg(test)]
pub mod testing;
