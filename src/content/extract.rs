//! Pull the JSON object out of a prose response.

use crate::document::PageBody;
use crate::error::ApiError;
use serde_json::Value;

/// Text from the first `{` to the last `}` inclusive, or `""` when there is none.
pub fn json_object_text(response: &str) -> &str {
    match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if start < end => &response[start..=end],
        _ => "",
    }
}

/// Parse the page body embedded in a content response.
///
/// Fails only when there is no object or it is not valid JSON; fields of an
/// unexpected shape are read leniently by [`PageBody::from_value`].
pub fn parse_body(response: &str) -> Result<PageBody, ApiError> {
    let object = json_object_text(response);
    if object.is_empty() {
        return Err(ApiError::ExtractionFailed(format!(
            "no JSON object in response: {}",
            preview(response)
        )));
    }
    let value: Value = serde_json::from_str(object)
        .map_err(|e| ApiError::ExtractionFailed(format!("invalid JSON: {}", e)))?;
    Ok(PageBody::from_value(&value))
}

fn preview(response: &str) -> String {
    const LIMIT: usize = 80;
    match response.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &response[..idx]),
        None => response.to_string(),
    }
}
