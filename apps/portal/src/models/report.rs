//! Wire model of the compliance report produced by the analysis backend.
//!
//! Every root section is optional: a missing section means the matching
//! dashboard panel is omitted. Leaf fields default to empty values so that a
//! sparse backend payload still decodes. A value of the wrong shape (e.g. a
//! checklist entry that is not an object) fails to decode.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    #[serde(default)]
    pub compliance_status: Option<ComplianceStatus>,
    #[serde(default)]
    pub requirements_checklist: Option<Vec<ChecklistItem>>,
    #[serde(default)]
    pub recommendations: Option<Vec<Recommendation>>,
    #[serde(default)]
    pub plan_of_action: Option<Vec<ActionStep>>,
}

impl ComplianceReport {
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

/// Treats an explicit JSON `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceStatus {
    #[serde(default)]
    pub compliance_percentage: Option<CompliancePercentage>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub major_gaps: Vec<String>,
}

/// The backend is inconsistent about this field: sometimes a bare number,
/// sometimes pre-formatted text such as `"45%"`. Anything else is kept as
/// `Other` and has no numeric reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompliancePercentage {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl CompliancePercentage {
    /// Best-effort numeric reading. Accepts a trailing `%` on text values.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            CompliancePercentage::Number(n) => *n,
            CompliancePercentage::Text(s) => {
                let s = s.trim();
                let s = s.strip_suffix('%').unwrap_or(s).trim_end();
                s.parse::<f64>().ok()?
            }
            CompliancePercentage::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub requirement: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "null_as_default")]
    pub related_gap: String,
}

/// Recommendation priority. Only the exact labels High/Medium/Low are ranked;
/// any other value is kept verbatim as `Unranked` and sorts after them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    Medium,
    Low,
    Unranked(String),
}

impl Priority {
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
            Priority::Unranked(_) => 99,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Unranked(raw) => raw,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Unranked(String::new())
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "High" => Priority::High,
            "Medium" => Priority::Medium,
            "Low" => Priority::Low,
            _ => Priority::Unranked(raw),
        }
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Unranked(raw) => raw,
            known => known.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionStep {
    #[serde(default, deserialize_with = "null_as_default")]
    pub step: StepLabel,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timeline: String,
}

/// Display label for an action-plan step. Never used for ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepLabel {
    Number(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for StepLabel {
    fn default() -> Self {
        StepLabel::Text(String::new())
    }
}

impl fmt::Display for StepLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepLabel::Number(n) => write!(f, "{n}"),
            StepLabel::Float(n) => write!(f, "{n}"),
            StepLabel::Text(s) => f.write_str(s),
            StepLabel::Other(value) => write!(f, "{value}"),
        }
    }
}
