use atlas_layout::LayoutOptions;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OverrideError {
    #[error("expected `<path>=<json>`, got `{0}`")]
    Malformed(String),
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("`{0}` is a single option, not a group")]
    NotAGroup(String),
    #[error("`{0}` is an option group and needs a JSON object")]
    ExpectedGroup(String),
    #[error("configuration must be a JSON object")]
    NotAnObject,
}

/// JSON view of [`LayoutOptions`] that accepts partial overrides before being deserialized.
///
/// The document starts from the serialized defaults, so every valid option path already exists
/// in it. Overrides may replace values but never introduce new keys; a typo such as
/// `solver.iteratons` is reported instead of being dropped by serde.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsDoc(Value);

impl Default for OptionsDoc {
    fn default() -> Self {
        Self(
            serde_json::to_value(LayoutOptions::default())
                .unwrap_or_else(|_| Value::Object(Map::new())),
        )
    }
}

impl OptionsDoc {
    /// Replaces the option at `dotted_path` (camelCase segments, e.g. `solver.iterations`).
    pub fn set_value(&mut self, dotted_path: &str, value: Value) -> Result<(), OverrideError> {
        let segments: Vec<&str> = dotted_path.split('.').collect();
        let mut cur = &mut self.0;
        for (depth, seg) in segments.iter().enumerate() {
            let Value::Object(group) = cur else {
                return Err(OverrideError::NotAGroup(segments[..depth].join(".")));
            };
            let Some(slot) = group.get_mut(*seg) else {
                return Err(OverrideError::UnknownOption(segments[..=depth].join(".")));
            };
            cur = slot;
        }
        *cur = value;
        Ok(())
    }

    /// Applies a `dotted.path=<json>` override. Values that are not valid JSON are taken as
    /// strings.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<(), OverrideError> {
        let malformed = || OverrideError::Malformed(assignment.to_string());
        let (path, raw) = assignment.split_once('=').ok_or_else(malformed)?;
        let path = path.trim();
        if path.is_empty() {
            return Err(malformed());
        }
        let raw = raw.trim();
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        self.set_value(path, value)
    }

    /// Merges a (partial) options object, e.g. the contents of a `--config` file.
    pub fn merge(&mut self, overrides: &Value) -> Result<(), OverrideError> {
        match (&mut self.0, overrides) {
            (Value::Object(base), Value::Object(incoming)) => merge_group(base, incoming, ""),
            _ => Err(OverrideError::NotAnObject),
        }
    }

    pub fn to_options(&self) -> serde_json::Result<LayoutOptions> {
        serde_json::from_value(self.0.clone())
    }
}

fn merge_group(
    base: &mut Map<String, Value>,
    incoming: &Map<String, Value>,
    prefix: &str,
) -> Result<(), OverrideError> {
    for (key, value) in incoming {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        let Some(slot) = base.get_mut(key) else {
            return Err(OverrideError::UnknownOption(path));
        };
        match (slot, value) {
            (Value::Object(group), Value::Object(nested)) => merge_group(group, nested, &path)?,
            (Value::Object(_), _) => return Err(OverrideError::ExpectedGroup(path)),
            (slot, value) => *slot = value.clone(),
        }
    }
    Ok(())
}
