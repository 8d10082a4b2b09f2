use serde::Serialize;

use crate::models::report::ChecklistItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Met,
    NotMet,
}

impl RequirementStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RequirementStatus::Met => "Met",
            RequirementStatus::NotMet => "Not Met",
        }
    }
}

impl From<bool> for RequirementStatus {
    fn from(met: bool) -> Self {
        if met {
            RequirementStatus::Met
        } else {
            RequirementStatus::NotMet
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistRow {
    pub requirement: String,
    pub status: RequirementStatus,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistPanel {
    pub rows: Vec<ChecklistRow>,
    pub completed_count: usize,
    pub total: usize,
    pub completion_percentage: u32,
}

impl ChecklistPanel {
    /// Rows keep source-document order.
    pub fn from_items(items: &[ChecklistItem]) -> Self {
        let rows: Vec<ChecklistRow> = items
            .iter()
            .map(|item| ChecklistRow {
                requirement: item.requirement.clone(),
                status: item.status.into(),
                explanation: item.explanation.clone(),
            })
            .collect();
        let completed_count = rows
            .iter()
            .filter(|r| r.status == RequirementStatus::Met)
            .count();
        let total = rows.len();

        Self {
            completion_percentage: completion_percentage(completed_count, total),
            rows,
            completed_count,
            total,
        }
    }

    /// `completed/total`, e.g. `3/4`.
    pub fn badge(&self) -> String {
        format!("{}/{}", self.completed_count, self.total)
    }

    pub fn percentage_label(&self) -> String {
        format!("{}%", self.completion_percentage)
    }
}

/// Rounded completion percentage; 0 when there is nothing to complete.
pub fn completion_percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u32
}
