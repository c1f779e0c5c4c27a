//! Retriever utilities for building prompt context from CV chunks

use super::vectordb::SearchResult;

/// Retriever utility methods
pub struct Retriever;

impl Retriever {
    pub fn new_shared() -> Self {
        Self
    }

    /// Build a prompt-ready context string from ranked chunks, ordered by
    /// similarity and truncated to `max_length` characters.
    pub fn build_context(results: &[SearchResult], max_length: usize) -> String {
        let mut context = String::new();
        let mut current_length = 0;

        for (idx, result) in results.iter().enumerate() {
            let entry = format!("{}. {}\n", idx + 1, result.text);
            if current_length + entry.len() > max_length {
                break;
            }
            context.push_str(&entry);
            current_length += entry.len();
        }

        context
    }
}
