//! Report Renderer: pure transforms from a `ComplianceReport` to display
//! panels. No I/O, no shared state.
//!
//! A panel whose backing data is absent or empty is `None` on the dashboard
//! rather than an empty shell.

pub mod action_plan;
pub mod checklist;
pub mod recommendations;
pub mod summary;
mod text;

use serde::Serialize;

use crate::models::report::ComplianceReport;

pub use action_plan::ActionPlanPanel;
pub use checklist::{ChecklistPanel, RequirementStatus};
pub use recommendations::RecommendationsPanel;
pub use summary::{StatusTier, SummaryPanel};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub summary: Option<SummaryPanel>,
    pub checklist: Option<ChecklistPanel>,
    pub recommendations: Option<RecommendationsPanel>,
    pub action_plan: Option<ActionPlanPanel>,
}

impl Dashboard {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.checklist.is_none()
            && self.recommendations.is_none()
            && self.action_plan.is_none()
    }
}

pub fn render_report(report: &ComplianceReport) -> Dashboard {
    Dashboard {
        summary: report.compliance_status.as_ref().map(SummaryPanel::from_status),
        checklist: report
            .requirements_checklist
            .as_deref()
            .filter(|items| !items.is_empty())
            .map(ChecklistPanel::from_items),
        recommendations: report
            .recommendations
            .as_deref()
            .filter(|items| !items.is_empty())
            .map(RecommendationsPanel::from_items),
        action_plan: report
            .plan_of_action
            .as_deref()
            .filter(|steps| !steps.is_empty())
            .map(ActionPlanPanel::from_steps),
    }
}
