//! Structured-output extraction with fallback parsing for LLM responses

use anyhow::Result;
use serde::de::DeserializeOwned;

/// Parse a JSON object out of an LLM response, tolerating surrounding prose
/// or markdown fences around the `{...}` body.
pub fn extract_json_object<T: DeserializeOwned>(text: &str) -> Result<T> {
    if let Ok(value) = serde_json::from_str::<T>(text) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            let candidate = &text[start..=end];
            if let Ok(value) = serde_json::from_str::<T>(candidate) {
                return Ok(value);
            }
        }
    }

    anyhow::bail!("failed to extract a structured JSON object from model response")
}

/// Parse a JSON string array out of an LLM response, falling back to a
/// line-oriented split when the model didn't return valid JSON.
pub fn extract_json_array(text: &str) -> Result<Vec<String>> {
    if let Ok(items) = serde_json::from_str::<Vec<String>>(text) {
        return Ok(items);
    }

    if let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) {
        if start < end {
            let candidate = &text[start..=end];
            if let Ok(items) = serde_json::from_str::<Vec<String>>(candidate) {
                return Ok(items);
            }
        }
    }

    let items: Vec<String> = text
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('[') && !line.starts_with(']'))
        .filter(|line| line.len() > 5)
        .map(|line| {
            line.trim_start_matches(|c: char| c.is_numeric() || c == '.' || c == '-' || c == ' ')
                .trim()
                .trim_matches('"')
                .to_string()
        })
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        anyhow::bail!("failed to extract any items from model response");
    }

    Ok(items)
}
