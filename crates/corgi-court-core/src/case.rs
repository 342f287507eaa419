use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One dispute submission: a shared description plus each party's statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseData {
    pub event_description: String,
    pub female_name: String,
    pub female_argument: String,
    pub male_name: String,
    pub male_argument: String,
}

/// Prompt-ready rendering of a case body as received by the relay.
///
/// Nothing is rejected here: a missing field renders as `undefined`, `null`
/// as `null`, and non-string values as their compact JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFields {
    pub event_description: String,
    pub female_name: String,
    pub female_argument: String,
    pub male_name: String,
    pub male_argument: String,
}

impl CaseFields {
    /// Read a raw request body. Bodies that are not JSON behave like an empty object.
    pub fn from_body(body: &[u8]) -> Self {
        let value = serde_json::from_slice::<Value>(body).unwrap_or(Value::Null);
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Self {
        Self {
            event_description: render_field(value, "eventDescription"),
            female_name: render_field(value, "femaleName"),
            female_argument: render_field(value, "femaleArgument"),
            male_name: render_field(value, "maleName"),
            male_argument: render_field(value, "maleArgument"),
        }
    }
}

impl From<&CaseData> for CaseFields {
    fn from(case: &CaseData) -> Self {
        Self {
            event_description: case.event_description.clone(),
            female_name: case.female_name.clone(),
            female_argument: case.female_argument.clone(),
            male_name: case.male_name.clone(),
            male_argument: case.male_argument.clone(),
        }
    }
}

fn render_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        None => "undefined".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
