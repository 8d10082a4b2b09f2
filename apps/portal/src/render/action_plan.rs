use serde::Serialize;

use crate::models::report::ActionStep;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionPlanRow {
    pub step: String,
    pub description: String,
    pub timeline: String,
}

/// Steps in the order supplied. The step label is display-only: it is never
/// sorted on or checked for uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionPlanPanel {
    pub rows: Vec<ActionPlanRow>,
}

impl ActionPlanPanel {
    pub fn from_steps(steps: &[ActionStep]) -> Self {
        Self {
            rows: steps
                .iter()
                .map(|s| ActionPlanRow {
                    step: s.step.to_string(),
                    description: s.description.clone(),
                    timeline: s.timeline.clone(),
                })
                .collect(),
        }
    }
}
