use crate::core::document::{LoadedChart, XTick};
use std::collections::HashMap;

/// Plotting coordinates of one package.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageRow {
    pub label: String,
    /// Vertical slot, `N` for the first package down to `1` for the last.
    pub slot: u32,
    pub start_ordinal: i64,
    pub end_ordinal: i64,
    pub duration_days: i64,
    pub color: String,
    pub legend: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MilestonePoint {
    pub label: String,
    pub ordinal: i64,
    pub slot: u32,
}

/// Output of the process phase.
#[derive(Debug, Clone)]
pub struct ProcessedChart {
    pub title: String,
    pub xlabel: String,
    pub xticks: Vec<XTick>,
    /// Rows in document order.
    pub rows: Vec<PackageRow>,
    pub milestones: Vec<MilestonePoint>,
    slots: HashMap<String, u32>,
}

impl LoadedChart {
    pub fn process(self) -> ProcessedChart {
        let count = self.labels.len();
        let mut slots = HashMap::with_capacity(count);
        for (label, &idx) in &self.index {
            slots.insert(label.clone(), (count - idx) as u32);
        }

        let rows = self
            .packages
            .iter()
            .map(|pkg| PackageRow {
                label: pkg.label.clone(),
                slot: slots[&pkg.label],
                start_ordinal: pkg.start.ordinal(),
                end_ordinal: pkg.end.ordinal(),
                duration_days: pkg.duration_days(),
                color: pkg.color.clone(),
                legend: pkg.legend.clone(),
            })
            .collect::<Vec<_>>();

        let milestones = self
            .milestones
            .iter()
            .flat_map(|(label, dates)| {
                let slot = slots[label];
                dates.iter().map(move |date| MilestonePoint {
                    label: label.clone(),
                    ordinal: date.ordinal(),
                    slot,
                })
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "Processed {} rows and {} milestones",
            rows.len(),
            milestones.len()
        );

        ProcessedChart {
            title: self.title,
            xlabel: self.xlabel,
            xticks: self.xticks,
            rows,
            milestones,
            slots,
        }
    }
}

impl ProcessedChart {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn slot_of(&self, label: &str) -> Option<u32> {
        self.slots.get(label).copied()
    }

    /// Earliest start and latest end across all rows.
    pub fn x_range(&self) -> (i64, i64) {
        let lo = self.rows.iter().map(|r| r.start_ordinal).min().unwrap_or(0);
        let hi = self.rows.iter().map(|r| r.end_ordinal).max().unwrap_or(0);
        (lo, hi)
    }

    /// Half a slot of padding above and below the bar stack.
    pub fn y_range(&self) -> (f64, f64) {
        (0.5, self.rows.len() as f64 + 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chart(value: serde_json::Value) -> ProcessedChart {
        LoadedChart::from_value(value).unwrap().process()
    }

    #[test]
    fn test_single_package_scenario() {
        let processed = chart(json!({
            "title": "T",
            "packages": [{"label": "A", "start": "01-2021", "end": "03-2021"}]
        }));

        assert_eq!(processed.len(), 1);
        let row = &processed.rows[0];
        assert_eq!(row.slot, 1);
        assert_eq!(row.duration_days, 59);
        assert_eq!(row.start_ordinal, 737791);
        assert_eq!(row.end_ordinal, 737850);
        assert_eq!(row.legend, None);
        assert!(processed.milestones.is_empty());
    }

    #[test]
    fn test_slots_count_down_in_document_order() {
        let processed = chart(json!({
            "title": "T",
            "packages": [
                {"label": "first", "start": "01-2021", "end": "03-2021"},
                {"label": "second", "start": "02-2021", "end": "03-2021"},
                {"label": "third", "start": "03-2021", "end": "05-2021"},
                {"label": "fourth", "start": "01-2021", "end": "01-2022"}
            ]
        }));

        let slots: Vec<u32> = processed.rows.iter().map(|r| r.slot).collect();
        assert_eq!(slots, vec![4, 3, 2, 1]);
        assert_eq!(processed.slot_of("first"), Some(4));
        assert_eq!(processed.slot_of("fourth"), Some(1));
        assert_eq!(processed.slot_of("missing"), None);
        assert!(processed.rows.iter().all(|r| r.duration_days >= 0));
    }

    #[test]
    fn test_ranges() {
        let processed = chart(json!({
            "title": "T",
            "packages": [
                {"label": "A", "start": "02-2021", "end": "03-2021"},
                {"label": "B", "start": "01-2021", "end": "01-2022"}
            ]
        }));

        assert_eq!(processed.x_range(), (737791, 738156));
        assert_eq!(processed.y_range(), (0.5, 2.5));
    }

    #[test]
    fn test_milestone_points_use_package_slot() {
        let processed = chart(json!({
            "title": "T",
            "packages": [
                {"label": "A", "start": "01-2021", "end": "03-2021"},
                {"label": "B", "start": "01-2021", "end": "06-2021", "milestones": ["02-2021"]}
            ]
        }));

        assert_eq!(
            processed.milestones,
            vec![MilestonePoint {
                label: "B".to_string(),
                ordinal: 737822,
                slot: 1,
            }]
        );
    }

    #[test]
    fn test_milestone_points_follow_document_order() {
        let processed = chart(json!({
            "title": "T",
            "packages": [
                {"label": "Zeta", "start": "01-2021", "end": "06-2021", "milestones": ["03-2021"]},
                {"label": "Alpha", "start": "01-2021", "end": "06-2021", "milestones": ["02-2021"]}
            ]
        }));

        let points: Vec<(&str, u32)> = processed
            .milestones
            .iter()
            .map(|p| (p.label.as_str(), p.slot))
            .collect();
        assert_eq!(points, vec![("Zeta", 2), ("Alpha", 1)]);
    }
}
