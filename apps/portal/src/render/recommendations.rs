use serde::Serialize;

use crate::models::report::Recommendation;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationRow {
    pub priority: String,
    pub rank: u8,
    pub recommendation: String,
    pub related_gap: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationsPanel {
    pub rows: Vec<RecommendationRow>,
}

impl RecommendationsPanel {
    /// Orders High, Medium, Low, then anything unrecognized. `sort_by_key`
    /// is stable, so ties keep their input order.
    pub fn from_items(items: &[Recommendation]) -> Self {
        let mut rows: Vec<RecommendationRow> = items
            .iter()
            .map(|item| RecommendationRow {
                priority: item.priority.label().to_string(),
                rank: item.priority.rank(),
                recommendation: item.recommendation.clone(),
                related_gap: item.related_gap.clone(),
            })
            .collect();
        rows.sort_by_key(|row| row.rank);
        Self { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::Priority;

    fn rec(text: &str, priority: &str) -> Recommendation {
        Recommendation {
            recommendation: text.to_string(),
            priority: Priority::from(priority.to_string()),
            related_gap: String::new(),
        }
    }

    fn order(panel: &RecommendationsPanel) -> Vec<&str> {
        panel.rows.iter().map(|r| r.recommendation.as_str()).collect()
    }

    #[test]
    fn test_sorted_by_priority_rank() {
        let panel = RecommendationsPanel::from_items(&[
            rec("low", "Low"),
            rec("high", "High"),
            rec("medium", "Medium"),
        ]);
        assert_eq!(order(&panel), vec!["high", "medium", "low"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_priority() {
        let panel = RecommendationsPanel::from_items(&[
            rec("m1", "Medium"),
            rec("h1", "High"),
            rec("m2", "Medium"),
            rec("h2", "High"),
            rec("m3", "Medium"),
        ]);
        assert_eq!(order(&panel), vec!["h1", "h2", "m1", "m2", "m3"]);
    }

    #[test]
    fn test_unknown_priority_sorts_last_in_input_order() {
        let panel = RecommendationsPanel::from_items(&[
            rec("urgent", "Urgent"),
            rec("low", "Low"),
            rec("blank", ""),
            rec("high", "High"),
        ]);
        assert_eq!(order(&panel), vec!["high", "low", "urgent", "blank"]);
        assert_eq!(panel.rows[2].priority, "Urgent");
        assert_eq!(panel.rows[2].rank, 99);
    }
}
