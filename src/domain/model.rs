use crate::domain::date::MonthYear;
use crate::utils::error::{GanttError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_COLOR: &str = "#32AEE0";

/// One entry of the `packages` array, as written in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageRecord {
    pub label: String,
    pub start: String,
    pub end: String,
    /// Missing and `null` both mean no milestones.
    pub milestones: Option<Vec<String>>,
    pub color: Option<String>,
    pub legend: Option<String>,
}

/// The chart document, as written in the input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub title: String,
    pub packages: Vec<PackageRecord>,
    pub xlabel: Option<String>,
    pub xticks: Option<Vec<String>>,
}

/// A validated work package.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkPackage {
    pub label: String,
    pub start: MonthYear,
    pub end: MonthYear,
    pub milestones: Vec<MonthYear>,
    pub color: String,
    pub legend: Option<String>,
}

impl WorkPackage {
    pub fn from_record(record: PackageRecord) -> Result<Self> {
        let start = MonthYear::parse(&record.start)?;
        let end = MonthYear::parse(&record.end)?;

        if start > end {
            return Err(GanttError::validation(format!(
                "Cannot end before started: package '{}' runs from {} to {}",
                record.label, record.start, record.end
            )));
        }

        let milestones = record
            .milestones
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|m| MonthYear::parse(m))
            .collect::<Result<Vec<_>>>()?;

        for milestone in &milestones {
            if *milestone < start || *milestone > end {
                tracing::warn!(
                    "⚠️ Milestone {} of package '{}' lies outside {}..{}",
                    milestone,
                    record.label,
                    start,
                    end
                );
            }
        }

        Ok(Self {
            label: record.label,
            start,
            end,
            milestones,
            color: record.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            legend: record.legend,
        })
    }

    /// Builds a package from an arbitrary JSON mapping.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let record: PackageRecord = serde_json::from_value(value)
            .map_err(|e| GanttError::data(format!("invalid package record: {}", e)))?;
        Self::from_record(record)
    }

    pub fn duration_days(&self) -> i64 {
        self.start.days_until(&self.end)
    }

    pub fn has_milestones(&self) -> bool {
        !self.milestones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_for_optional_fields() {
        let pkg = WorkPackage::from_value(json!({
            "label": "WP1",
            "start": "01-2021",
            "end": "03-2021"
        }))
        .unwrap();

        assert_eq!(pkg.label, "WP1");
        assert!(pkg.milestones.is_empty());
        assert_eq!(pkg.color, DEFAULT_COLOR);
        assert_eq!(pkg.legend, None);
        assert_eq!(pkg.duration_days(), 59);
    }

    #[test]
    fn test_explicit_optional_fields() {
        let pkg = WorkPackage::from_value(json!({
            "label": "WP2",
            "start": "01-2021",
            "end": "12-2021",
            "milestones": ["02-2021", "06-2021"],
            "color": "#FF0000",
            "legend": "Design"
        }))
        .unwrap();

        assert_eq!(pkg.milestones.len(), 2);
        assert_eq!(pkg.milestones[1].to_string(), "06-2021");
        assert_eq!(pkg.color, "#FF0000");
        assert_eq!(pkg.legend.as_deref(), Some("Design"));
    }

    #[test]
    fn test_null_milestones_mean_none() {
        let pkg = WorkPackage::from_value(json!({
            "label": "WP",
            "start": "01-2021",
            "end": "03-2021",
            "milestones": null,
            "color": null,
            "legend": null
        }))
        .unwrap();

        assert!(pkg.milestones.is_empty());
        assert!(!pkg.has_milestones());
        assert_eq!(pkg.color, DEFAULT_COLOR);
        assert_eq!(pkg.legend, None);
    }

    #[test]
    fn test_end_before_start_fails_validation() {
        let err = WorkPackage::from_value(json!({
            "label": "WP",
            "start": "05-2021",
            "end": "04-2021"
        }))
        .unwrap_err();
        assert!(matches!(err, GanttError::ValidationError { .. }));
    }

    #[test]
    fn test_same_month_is_zero_duration() {
        let pkg = WorkPackage::from_value(json!({
            "label": "WP",
            "start": "05-2021",
            "end": "05-2021"
        }))
        .unwrap();
        assert_eq!(pkg.duration_days(), 0);
    }

    #[test]
    fn test_malformed_dates_fail_with_format_error() {
        let err = WorkPackage::from_value(json!({
            "label": "WP",
            "start": "2020-01",
            "end": "03-2021"
        }))
        .unwrap_err();
        assert!(matches!(&err, GanttError::FormatError { value } if value == "2020-01"));

        let err = WorkPackage::from_value(json!({
            "label": "WP",
            "start": "01-2020",
            "end": "03-2021",
            "milestones": ["Feb 2020"]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Feb 2020"));
    }

    #[test]
    fn test_missing_required_key_is_data_error() {
        let err = WorkPackage::from_value(json!({
            "start": "01-2020",
            "end": "03-2021"
        }))
        .unwrap_err();
        assert!(matches!(err, GanttError::DataError { .. }));
    }

    #[test]
    fn test_milestone_outside_range_is_accepted() {
        let pkg = WorkPackage::from_value(json!({
            "label": "WP",
            "start": "01-2020",
            "end": "03-2020",
            "milestones": ["06-2020"]
        }))
        .unwrap();
        assert_eq!(pkg.milestones.len(), 1);
    }
}
