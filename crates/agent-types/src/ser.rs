use crate::{Action, ActionKind};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Serializes back into the flat tagged-object wire shape
/// (`{"action": "click", "selector": "...", "thought": "..."}`) that
/// `structured-output`/`agent-types::parse_action` parses.
impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(thought) = &self.thought {
            map.serialize_entry("thought", thought)?;
        }
        map.serialize_entry("action", self.kind.tag())?;
        match &self.kind {
            ActionKind::Navigate { url } => map.serialize_entry("url", url)?,
            ActionKind::Click { selector } => map.serialize_entry("selector", selector)?,
            ActionKind::Type { selector, text, key } => {
                map.serialize_entry("selector", selector)?;
                map.serialize_entry("text", text)?;
                if let Some(key) = key {
                    map.serialize_entry("key", key)?;
                }
            }
            ActionKind::Press { key } => map.serialize_entry("key", key)?,
            ActionKind::Scroll { dy } => map.serialize_entry("dy", dy)?,
            ActionKind::Wait { ms } => map.serialize_entry("ms", ms)?,
            ActionKind::Extract | ActionKind::Back => {}
            ActionKind::Done { text } => map.serialize_entry("text", text)?,
        }
        map.end()
    }
}

impl Serialize for crate::Observation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("url", &self.url)?;
        map.serialize_entry("title", &self.title)?;
        map.serialize_entry("text", &self.text)?;
        map.serialize_entry("step", &self.step)?;
        map.end()
    }
}

impl Serialize for crate::Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("action", &self.action)?;
        map.serialize_entry("observation", &self.observation)?;
        map.end()
    }
}

impl Serialize for crate::RunResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("goal", &self.goal)?;
        map.serialize_entry("steps", &self.steps)?;
        map.serialize_entry("answer", &self.answer)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ActionKind;

    #[test]
    fn navigate_round_trips_shape() {
        let action = Action::with_thought(ActionKind::Navigate { url: "https://example.com".into() }, "go");
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["action"], "navigate");
        assert_eq!(value["url"], "https://example.com");
        assert_eq!(value["thought"], "go");
    }
}
