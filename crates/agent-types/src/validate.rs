use thiserror::Error;

/// Schema-validation failures for a parsed action object.
///
/// Mirrors the `extra = "forbid"` strictness of the reference schema: unknown
/// top-level keys and missing required fields for the named variant are both
/// rejected, surfaced distinctly so callers can retry with a corrective hint.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("value is not a JSON object")]
    NotAnObject,
    #[error("missing required field 'action'")]
    MissingActionTag,
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("action '{action}' is missing required field '{field}'")]
    MissingField { action: String, field: String },
}

#[cfg(feature = "serde-full")]
mod json {
    use super::ValidationError;
    use crate::{Action, ActionKind};
    use serde_json::Value;

    const KNOWN_KEYS: &[&str] = &[
        "thought", "action", "url", "selector", "text", "key", "dy", "ms",
    ];

    /// Parse and validate a single action object (as produced by
    /// `structured-output`'s extraction) into an `Action`.
    pub fn parse_action(value: &Value) -> Result<Action, ValidationError> {
        let obj = value.as_object().ok_or(ValidationError::NotAnObject)?;

        for key in obj.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                return Err(ValidationError::UnknownField(key.clone()));
            }
        }

        let action_tag = obj
            .get("action")
            .and_then(Value::as_str)
            .ok_or(ValidationError::MissingActionTag)?;

        let thought = obj.get("thought").and_then(Value::as_str).map(str::to_owned);

        let require_str = |field: &str| -> Result<String, ValidationError> {
            obj.get(field)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| ValidationError::MissingField {
                    action: action_tag.to_string(),
                    field: field.to_string(),
                })
        };

        let kind = match action_tag {
            "navigate" => ActionKind::Navigate { url: require_str("url")? },
            "click" => ActionKind::Click { selector: require_str("selector")? },
            "type" => ActionKind::Type {
                selector: require_str("selector")?,
                text: require_str("text")?,
                key: obj.get("key").and_then(Value::as_str).map(str::to_owned),
            },
            "press" => ActionKind::Press { key: require_str("key")? },
            // `dy`/`ms` are optional: the dispatcher promotes an absent/zero
            // value to the documented default (700 / 500ms), matching the
            // original's `act.dy if act.dy is not None else 700` and
            // `act.ms or 500`.
            "scroll" => {
                let dy = obj.get("dy").and_then(Value::as_i64).unwrap_or(0);
                ActionKind::Scroll { dy: dy as i32 }
            }
            "wait" => {
                let ms = obj.get("ms").and_then(Value::as_u64).unwrap_or(0);
                ActionKind::Wait { ms }
            }
            "extract" => ActionKind::Extract,
            "back" => ActionKind::Back,
            "done" => ActionKind::Done { text: require_str("text")? },
            other => return Err(ValidationError::UnknownAction(other.to_string())),
        };

        Ok(Action { kind, thought })
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde_json::json;

        #[test]
        fn accepts_well_formed_click() {
            let v = json!({"action": "click", "selector": "#go", "thought": "clicking"});
            let action = parse_action(&v).unwrap();
            assert_eq!(action.kind, ActionKind::Click { selector: "#go".into() });
            assert_eq!(action.thought.as_deref(), Some("clicking"));
        }

        #[test]
        fn rejects_unknown_field() {
            let v = json!({"action": "click", "selector": "#go", "bogus": 1});
            assert_eq!(parse_action(&v), Err(ValidationError::UnknownField("bogus".into())));
        }

        #[test]
        fn rejects_missing_required_field() {
            let v = json!({"action": "navigate"});
            assert_eq!(
                parse_action(&v),
                Err(ValidationError::MissingField { action: "navigate".into(), field: "url".into() })
            );
        }

        #[test]
        fn rejects_unknown_action() {
            let v = json!({"action": "teleport"});
            assert_eq!(parse_action(&v), Err(ValidationError::UnknownAction("teleport".into())));
        }

        #[test]
        fn extract_and_back_need_no_fields() {
            assert!(parse_action(&json!({"action": "extract"})).is_ok());
            assert!(parse_action(&json!({"action": "back"})).is_ok());
        }

        #[test]
        fn scroll_and_wait_default_their_field_when_absent() {
            let scroll = parse_action(&json!({"action": "scroll"})).unwrap();
            assert_eq!(scroll.kind, ActionKind::Scroll { dy: 0 });

            let wait = parse_action(&json!({"action": "wait"})).unwrap();
            assert_eq!(wait.kind, ActionKind::Wait { ms: 0 });
        }
    }
}

#[cfg(feature = "serde-full")]
pub use json::parse_action;
