use reqwest::StatusCode;
use serde_json::Value;

use crate::domain::ClassificationResult;

#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    Structured(Value),
    RawText(String),
}

pub fn decode_body(body: String) -> DecodedBody {
    match serde_json::from_str::<Value>(&body) {
        Ok(value) => DecodedBody::Structured(value),
        Err(_) => DecodedBody::RawText(body),
    }
}

/// Anything that is not a usable result object degrades to a result whose
/// `message` is the body exactly as received.
pub fn parse_success(body: String) -> ClassificationResult {
    match decode_body(body.clone()) {
        DecodedBody::Structured(value @ Value::Object(_)) => {
            match serde_json::from_value::<ClassificationResult>(value) {
                Ok(result) => result,
                Err(err) => {
                    tracing::warn!(
                        target: "api",
                        error = %err,
                        "response object did not match the result schema"
                    );
                    ClassificationResult::from_raw_text(body)
                }
            }
        }
        DecodedBody::Structured(Value::String(text)) => ClassificationResult::from_raw_text(text),
        DecodedBody::Structured(_) | DecodedBody::RawText(_) => {
            ClassificationResult::from_raw_text(body)
        }
    }
}

pub fn error_message(status: StatusCode, body: String) -> String {
    let fallback = || format!("HTTP error {}", status.as_u16());
    match decode_body(body) {
        DecodedBody::Structured(value) => structured_message(&value).unwrap_or_else(fallback),
        DecodedBody::RawText(text) => {
            let text = text.trim();
            if text.is_empty() {
                fallback()
            } else {
                text.to_string()
            }
        }
    }
}

fn structured_message(value: &Value) -> Option<String> {
    let message = match value {
        Value::String(text) => Some(text.as_str()),
        _ => ["error", "message"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str)),
    }?;
    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_tags_json_and_raw_text() {
        assert_eq!(
            decode_body(r#"{"a":1}"#.to_string()),
            DecodedBody::Structured(serde_json::json!({"a": 1}))
        );
        assert_eq!(
            decode_body("ok".to_string()),
            DecodedBody::RawText("ok".to_string())
        );
        assert_eq!(decode_body(String::new()), DecodedBody::RawText(String::new()));
    }

    #[test]
    fn success_body_maps_onto_result() {
        let result = parse_success(r#"{"categoria":"Produtivo","prioridade":"Alta"}"#.to_string());
        assert_eq!(result.category.as_deref(), Some("Produtivo"));
        assert_eq!(result.priority.as_deref(), Some("Alta"));
        assert!(result.message.is_none());
    }

    #[test]
    fn non_json_success_body_degrades_to_message() {
        let result = parse_success("ok".to_string());
        assert_eq!(result, ClassificationResult::from_raw_text("ok"));

        let result = parse_success("[1,2]".to_string());
        assert_eq!(result.message.as_deref(), Some("[1,2]"));
        assert!(result.is_inconclusive());
    }

    #[test]
    fn mistyped_extra_field_keeps_the_classification() {
        let result = parse_success(
            r#"{"categoria": "Produtivo", "prioridade": "Alta", "label": 1}"#.to_string(),
        );
        assert_eq!(result.category.as_deref(), Some("Produtivo"));
        assert_eq!(result.priority.as_deref(), Some("Alta"));
        assert!(result.label.is_none());
        assert!(result.message.is_none());

        let result = parse_success(r#"{"categoria":42}"#.to_string());
        assert!(result.is_inconclusive());
    }

    #[test]
    fn unusable_object_degrades_to_the_body_verbatim() {
        let body = r#"{ "categoria": "Produtivo",  "category": "Productive" }"#;
        let result = parse_success(body.to_string());
        assert!(result.category.is_none());
        assert_eq!(result.message.as_deref(), Some(body));
    }

    #[test]
    fn error_message_prefers_structured_fields() {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        assert_eq!(
            error_message(status, r#"{"error":"model unavailable"}"#.to_string()),
            "model unavailable"
        );
        assert_eq!(
            error_message(status, r#"{"message":"try later"}"#.to_string()),
            "try later"
        );
        assert_eq!(error_message(status, r#"{"detail":"x"}"#.to_string()), "HTTP error 500");
    }

    #[test]
    fn error_message_falls_back_to_raw_body_then_status() {
        let status = StatusCode::BAD_GATEWAY;
        assert_eq!(error_message(status, "upstream down".to_string()), "upstream down");
        assert_eq!(error_message(status, "  ".to_string()), "HTTP error 502");
        assert_eq!(error_message(status, String::new()), "HTTP error 502");
    }
}
