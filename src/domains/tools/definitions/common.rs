//! Common utilities shared across the STAC tools.

use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, de};

/// Default number of results returned by search tools.
pub const DEFAULT_LIMIT: u32 = 10;

/// Collections listed when a tool has to walk the whole catalog.
pub const CATALOG_COLLECTION_LIMIT: u32 = 100;

/// Items fetched per collection when computing statistics.
pub const STATISTICS_ITEM_LIMIT: u32 = 1000;

/// Resolve a requested limit: absent, zero or negative means the default.
pub fn effective_limit(limit: Option<i64>) -> u32 {
    match limit {
        Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => DEFAULT_LIMIT,
    }
}

/// Deserialize an optional integer limit, also accepting integral floats
/// such as `5.0` that some hosts send for JSON numbers.
pub fn deserialize_limit<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(n) = number.as_i64() {
        return Ok(Some(n));
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            Ok(Some(f as i64))
        }
        _ => Err(de::Error::custom(format!(
            "invalid limit `{}`, expected an integer",
            number
        ))),
    }
}

/// Create a success result with a single text block.
pub fn success_result(content: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(content)])
}

/// Create an error result with a single text block.
pub fn error_result(message: String) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message)])
}

/// Build the Tool model for a parameter type.
pub fn tool_definition<P: JsonSchema + 'static>(
    name: &'static str,
    description: &'static str,
) -> Tool {
    Tool {
        name: name.into(),
        description: Some(description.into()),
        input_schema: cached_schema_for_type::<P>(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Format numbers as `[a, b, c, d]`.
pub fn format_numbers(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// Extract the text of the first content block.
#[cfg(test)]
pub fn result_text(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        rmcp::model::RawContent::Text(text) => &text.text,
        _ => panic!("Expected text content"),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_limit() {
        assert_eq!(effective_limit(None), 10);
        assert_eq!(effective_limit(Some(0)), 10);
        assert_eq!(effective_limit(Some(-5)), 10);
        assert_eq!(effective_limit(Some(25)), 25);
    }

    #[derive(Debug, Deserialize)]
    struct LimitParams {
        #[serde(default, deserialize_with = "deserialize_limit")]
        limit: Option<i64>,
    }

    fn parse_limit(value: serde_json::Value) -> Result<Option<i64>, serde_json::Error> {
        serde_json::from_value::<LimitParams>(value).map(|p| p.limit)
    }

    #[test]
    fn test_deserialize_limit() {
        use serde_json::json;

        assert_eq!(parse_limit(json!({})).unwrap(), None);
        assert_eq!(parse_limit(json!({ "limit": null })).unwrap(), None);
        assert_eq!(parse_limit(json!({ "limit": 5 })).unwrap(), Some(5));
        assert_eq!(parse_limit(json!({ "limit": 5.0 })).unwrap(), Some(5));
        assert_eq!(parse_limit(json!({ "limit": -3 })).unwrap(), Some(-3));
        assert!(parse_limit(json!({ "limit": 2.5 })).is_err());
        assert!(parse_limit(json!({ "limit": "5" })).is_err());
    }

    #[test]
    fn test_format_numbers() {
        assert_eq!(format_numbers(&[10.0, 20.5, -30.0, 40.0]), "[10, 20.5, -30, 40]");
    }

    #[test]
    fn test_error_result_is_flagged() {
        let result = error_result("boom".to_string());
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result_text(&result), "boom");
    }
}
