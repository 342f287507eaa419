use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Party declared to have the better of the argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Female,
    Male,
    Tie,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Winner::Female => "female",
            Winner::Male => "male",
            Winner::Tie => "tie",
        };
        f.write_str(label)
    }
}

/// Structured judgment returned for a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictResult {
    #[serde(default)]
    pub analysis: String,
    /// Fault share in percent. Not clamped and not required to sum to 100 with `male_responsibility`.
    pub female_responsibility: f64,
    pub male_responsibility: f64,
    /// Text fields the model leaves out decode as empty rather than discarding the verdict.
    #[serde(default)]
    pub verdict_summary: String,
    pub winner: Winner,
    #[serde(default)]
    pub advice: String,
}

const FALLBACK_ANALYSIS: &str =
    "汪！本法官刚才打了个盹（服务器连接失败）。请确认后台是否配置了 API_KEY 环境变量。";
const FALLBACK_SUMMARY: &str = "暂时无法审判";
const FALLBACK_ADVICE: &str = "请联系管理员在服务器环境变量中配置 API_KEY。";

impl VerdictResult {
    /// Fixed verdict handed out whenever judging fails for any reason.
    pub fn fallback() -> Self {
        Self {
            analysis: FALLBACK_ANALYSIS.to_string(),
            female_responsibility: 50.0,
            male_responsibility: 50.0,
            verdict_summary: FALLBACK_SUMMARY.to_string(),
            winner: Winner::Tie,
            advice: FALLBACK_ADVICE.to_string(),
        }
    }

    /// Reset a 0/0 split to 50/50. Any other split is left untouched.
    pub fn normalize(&mut self) {
        if self.female_responsibility + self.male_responsibility == 0.0 {
            self.female_responsibility = 50.0;
            self.male_responsibility = 50.0;
        }
    }
}

/// Reasons a relay response body could not be turned into a verdict.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid response structure from backend")]
    InvalidStructure,
    #[error("malformed verdict JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode a relay response body into a verdict.
///
/// A body carrying a non-empty `analysis` string and a numeric
/// `femaleResponsibility` is decoded directly. Otherwise a non-empty `raw`
/// string is parsed as JSON and decoded. Anything else is an invalid structure.
pub fn decode_verdict(body: &Value) -> Result<VerdictResult, DecodeError> {
    if has_verdict_shape(body) {
        return Ok(VerdictResult::deserialize(body)?);
    }
    match body.get("raw").and_then(Value::as_str) {
        Some(raw) if !raw.is_empty() => Ok(serde_json::from_str(raw)?),
        _ => Err(DecodeError::InvalidStructure),
    }
}

fn has_verdict_shape(body: &Value) -> bool {
    let has_analysis = body
        .get("analysis")
        .and_then(Value::as_str)
        .is_some_and(|analysis| !analysis.is_empty());
    let has_share = body
        .get("femaleResponsibility")
        .is_some_and(Value::is_number);
    has_analysis && has_share
}
