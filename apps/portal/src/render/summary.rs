use serde::Serialize;

use crate::models::report::ComplianceStatus;

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_GAPS_PLACEHOLDER: &str = "No major gaps identified";
pub const NO_SUMMARY_PLACEHOLDER: &str = "No summary provided.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    Good,
    Fair,
    Caution,
    Poor,
}

impl StatusTier {
    /// Inclusive lower bounds: 90 good, 70 fair, 50 caution.
    pub fn from_percentage(percentage: Option<f64>) -> Self {
        match percentage {
            Some(p) if p >= 90.0 => StatusTier::Good,
            Some(p) if p >= 70.0 => StatusTier::Fair,
            Some(p) if p >= 50.0 => StatusTier::Caution,
            _ => StatusTier::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusTier::Good => "good",
            StatusTier::Fair => "fair",
            StatusTier::Caution => "caution",
            StatusTier::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryPanel {
    pub percentage: Option<f64>,
    pub percentage_label: String,
    pub tier: StatusTier,
    pub summary: String,
    /// Always at least one line: the gaps, or the placeholder.
    pub gap_lines: Vec<String>,
    pub has_gaps: bool,
}

impl SummaryPanel {
    pub fn from_status(status: &ComplianceStatus) -> Self {
        let percentage = status
            .compliance_percentage
            .as_ref()
            .and_then(|p| p.as_number());
        let percentage_label = match percentage {
            Some(p) => format!("{}%", format_number(p)),
            None => NOT_AVAILABLE.to_string(),
        };

        let summary = status
            .summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_SUMMARY_PLACEHOLDER)
            .to_string();

        let has_gaps = !status.major_gaps.is_empty();
        let gap_lines = if has_gaps {
            status.major_gaps.clone()
        } else {
            vec![NO_GAPS_PLACEHOLDER.to_string()]
        };

        Self {
            percentage,
            percentage_label,
            tier: StatusTier::from_percentage(percentage),
            summary,
            gap_lines,
            has_gaps,
        }
    }
}

/// Drops a trailing `.0` so whole percentages read as `45%`.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
