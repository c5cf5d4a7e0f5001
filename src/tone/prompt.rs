//! Prompt construction and response parsing for tone analysis

use crate::tone::ToneSummary;
use serde_json::Value;

const REQUIRED_KEYS: [&str; 3] = ["readability", "tone", "risks"];

/// Returns at most `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

/// Builds the fixed analysis prompt around already-truncated text
pub fn build_prompt(text: &str) -> String {
    format!(
        r#"You are a concise content analyzer. Analyze the following text for tone and readability.

Provide your response as a JSON object with these exact keys:
- "readability": Brief assessment (max 2 sentences)
- "tone": Brief description (max 2 sentences)
- "risks": Potential issues (max 2 sentences)

Text to analyze:
{}

Response (JSON only):"#,
        text
    )
}

/// Interprets raw model output as a [`ToneSummary`]
///
/// Never fails: output that is not JSON, or JSON without the three string
/// fields, becomes [`ToneSummary::unable_to_analyze`].
pub fn parse_tone_response(raw: &str) -> ToneSummary {
    let body = strip_code_fence(raw.trim());

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to parse model response as JSON: {}", e);
            tracing::debug!("Raw response: {}", truncate_chars(raw, 500));
            return ToneSummary::unable_to_analyze("JSON parse error");
        }
    };

    let field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
    match (field("readability"), field("tone"), field("risks")) {
        (Some(readability), Some(tone), Some(risks)) => ToneSummary {
            readability,
            tone,
            risks,
        },
        _ => {
            tracing::warn!(
                "Model response missing one of {:?}: {}",
                REQUIRED_KEYS,
                truncate_chars(body, 200)
            );
            ToneSummary::unable_to_analyze("invalid response format")
        }
    }
}

/// Removes a surrounding markdown code fence such as ```` ```json ... ``` ````
fn strip_code_fence(response: &str) -> &str {
    let Some(rest) = response.strip_prefix("```") else {
        return response;
    };
    // Drop the info string ("json") on the opening line
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
