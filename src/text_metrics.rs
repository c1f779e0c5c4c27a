//! Small text-signal helpers shared by the heuristic evaluation fallback
//! (§4.4) and the voice analyzer (§4.6): both count filler words against
//! the same fixed list.

pub const FILLER_WORDS: [&str; 9] = [
    "um", "uh", "like", "you know", "so", "actually", "basically", "literally", "right",
];

/// Count filler-word occurrences in `text`, case-insensitive, overlaps allowed
/// (e.g. "you know" and "so" are counted independently).
pub fn count_filler_words(text: &str) -> usize {
    let lower = text.to_lowercase();
    FILLER_WORDS.iter().map(|f| lower.matches(f).count()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_fillers_across_the_fixed_list() {
        let text = "So, um, I basically did the thing, you know, actually.";
        assert_eq!(count_filler_words(text), 4);
    }

    #[test]
    fn clean_text_has_no_fillers() {
        assert_eq!(count_filler_words("I built a distributed cache in Rust."), 0);
    }
}
