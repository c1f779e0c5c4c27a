//! Paragraph-aware text chunking for CV ingest

const TARGET_CHUNK_CHARS: usize = 500;
const OVERLAP_CHARS: usize = 50;

/// Split raw CV text into overlapping chunks, breaking on paragraph
/// boundaries where possible rather than mid-sentence.
pub fn chunk_text(text: &str) -> Vec<String> {
    let paragraphs: Vec<&str> = text
        .split("\n\n")
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();

    if paragraphs.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in paragraphs {
        if current.is_empty() {
            current.push_str(paragraph);
            continue;
        }

        if current.chars().count() + paragraph.chars().count() + 1 <= TARGET_CHUNK_CHARS {
            current.push('\n');
            current.push_str(paragraph);
            continue;
        }

        chunks.push(std::mem::take(&mut current));
        current = carry_overlap(chunks.last().unwrap());
        if current.is_empty() {
            current.push_str(paragraph);
        } else {
            current.push('\n');
            current.push_str(paragraph);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    // A single paragraph longer than the target still needs splitting,
    // otherwise a dense CV section would produce one giant chunk.
    chunks
        .into_iter()
        .flat_map(|chunk| split_long_chunk(&chunk))
        .collect()
}

fn carry_overlap(prev: &str) -> String {
    let chars: Vec<char> = prev.chars().collect();
    if chars.len() <= OVERLAP_CHARS {
        return String::new();
    }
    chars[chars.len() - OVERLAP_CHARS..].iter().collect()
}

fn split_long_chunk(chunk: &str) -> Vec<String> {
    let chars: Vec<char> = chunk.chars().collect();
    if chars.len() <= TARGET_CHUNK_CHARS + OVERLAP_CHARS {
        return vec![chunk.to_string()];
    }

    let mut parts = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + TARGET_CHUNK_CHARS).min(chars.len());
        parts.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start = end.saturating_sub(OVERLAP_CHARS);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("").is_empty());
        assert!(chunk_text("   \n\n  ").is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = chunk_text("Experienced backend engineer.\n\nWorked with Rust and Go.");
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn long_text_splits_into_multiple_chunks() {
        let paragraph = "x".repeat(300);
        let text = vec![paragraph.clone(); 5].join("\n\n");
        let chunks = chunk_text(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= TARGET_CHUNK_CHARS + OVERLAP_CHARS);
        }
    }

    #[test]
    fn single_oversized_paragraph_still_splits() {
        let text = "y".repeat(2000);
        let chunks = chunk_text(&text);
        assert!(chunks.len() >= 3);
    }
}
