//! Plain-text rendering of the dashboard for terminal output.

use std::fmt::{self, Display, Formatter};

use crate::render::{ActionPlanPanel, ChecklistPanel, Dashboard, RecommendationsPanel, SummaryPanel};

impl Display for Dashboard {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "RFP Analysis")?;
        writeln!(f, "============")?;
        if self.is_empty() {
            return writeln!(f, "No data available.");
        }
        if let Some(summary) = &self.summary {
            write!(f, "\n{summary}")?;
        }
        if let Some(checklist) = &self.checklist {
            write!(f, "\n{checklist}")?;
        }
        if let Some(recommendations) = &self.recommendations {
            write!(f, "\n{recommendations}")?;
        }
        if let Some(plan) = &self.action_plan {
            write!(f, "\n{plan}")?;
        }
        Ok(())
    }
}

impl Display for SummaryPanel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Compliance Summary")?;
        writeln!(
            f,
            "  Overall Compliance: {} ({})",
            self.percentage_label,
            self.tier.label()
        )?;
        writeln!(f, "  Summary: {}", self.summary)?;
        writeln!(f, "  Major Gaps:")?;
        for line in &self.gap_lines {
            if self.has_gaps {
                writeln!(f, "    - {line}")?;
            } else {
                writeln!(f, "    {line}")?;
            }
        }
        Ok(())
    }
}

impl Display for ChecklistPanel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Requirements Checklist [{} met, {}]",
            self.badge(),
            self.percentage_label()
        )?;
        for row in &self.rows {
            writeln!(f, "  [{}] {}", row.status.label(), row.requirement)?;
            if !row.explanation.is_empty() {
                writeln!(f, "      {}", row.explanation)?;
            }
        }
        Ok(())
    }
}

impl Display for RecommendationsPanel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recommendations")?;
        for row in &self.rows {
            let priority = if row.priority.is_empty() { "-" } else { &row.priority };
            writeln!(f, "  ({priority}) {}", row.recommendation)?;
            if !row.related_gap.is_empty() {
                writeln!(f, "      Related gap: {}", row.related_gap)?;
            }
        }
        Ok(())
    }
}

impl Display for ActionPlanPanel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Plan of Action")?;
        for row in &self.rows {
            write!(f, "  {}. {}", row.step, row.description)?;
            if row.timeline.is_empty() {
                writeln!(f)?;
            } else {
                writeln!(f, " [{}]", row.timeline)?;
            }
        }
        Ok(())
    }
}
