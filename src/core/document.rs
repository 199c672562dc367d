use crate::domain::date::MonthYear;
use crate::domain::model::{DocumentRecord, WorkPackage};
use crate::domain::ports::Storage;
use crate::utils::error::{GanttError, Result};
use std::collections::HashMap;

/// A custom x axis tick: where it goes and how it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct XTick {
    pub date: MonthYear,
    pub label: String,
}

/// Output of the load phase.
#[derive(Debug, Clone)]
pub struct LoadedChart {
    pub title: String,
    pub xlabel: String,
    pub xticks: Vec<XTick>,
    pub packages: Vec<WorkPackage>,
    /// Labels in document order.
    pub labels: Vec<String>,
    pub(crate) index: HashMap<String, usize>,
    /// Label and dates of every package with at least one milestone, in document order.
    pub milestones: Vec<(String, Vec<MonthYear>)>,
}

impl LoadedChart {
    pub fn from_file<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        let bytes = storage
            .read_file(path)
            .map_err(|e| GanttError::data(format!("cannot read '{}': {}", path, e)))?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| GanttError::data(format!("'{}' is not valid JSON: {}", path, e)))?;
        Self::from_value(value)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| GanttError::data(format!("invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| GanttError::data("chart document must be a JSON object"))?;
        for key in ["title", "packages"] {
            if !object.contains_key(key) {
                return Err(GanttError::data(format!("missing required key '{}'", key)));
            }
        }

        let record: DocumentRecord = serde_json::from_value(value)
            .map_err(|e| GanttError::data(format!("malformed chart document: {}", e)))?;
        Self::from_record(record)
    }

    pub fn from_record(record: DocumentRecord) -> Result<Self> {
        if record.packages.is_empty() {
            return Err(GanttError::data("'packages' must contain at least one package"));
        }

        let packages = record
            .packages
            .into_iter()
            .map(WorkPackage::from_record)
            .collect::<Result<Vec<_>>>()?;

        let mut index = HashMap::with_capacity(packages.len());
        let mut labels = Vec::with_capacity(packages.len());
        for (i, pkg) in packages.iter().enumerate() {
            if index.insert(pkg.label.clone(), i).is_some() {
                return Err(GanttError::data(format!(
                    "duplicate package label '{}'",
                    pkg.label
                )));
            }
            labels.push(pkg.label.clone());
        }

        let milestones = packages
            .iter()
            .filter(|pkg| pkg.has_milestones())
            .map(|pkg| (pkg.label.clone(), pkg.milestones.clone()))
            .collect();

        let xticks = record
            .xticks
            .unwrap_or_default()
            .into_iter()
            .map(|label| {
                MonthYear::parse(&label).map(|date| XTick { date, label })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "Loaded '{}' with {} packages, {} xticks",
            record.title,
            packages.len(),
            xticks.len()
        );

        Ok(Self {
            title: record.title,
            xlabel: record.xlabel.unwrap_or_default(),
            xticks,
            packages,
            labels,
            index,
            milestones,
        })
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn package(&self, label: &str) -> Option<&WorkPackage> {
        self.index.get(label).map(|&i| &self.packages[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_package_document() {
        let chart = LoadedChart::from_json_str(
            r#"{"title":"T","packages":[{"label":"A","start":"01-2021","end":"03-2021"}]}"#,
        )
        .unwrap();

        assert_eq!(chart.title, "T");
        assert_eq!(chart.len(), 1);
        assert_eq!(chart.labels, vec!["A".to_string()]);
        assert!(chart.milestones.is_empty());
        assert_eq!(chart.xlabel, "");
        assert!(chart.xticks.is_empty());
        assert_eq!(chart.package("A").unwrap().legend, None);
    }

    #[test]
    fn test_missing_title_or_packages() {
        let err = LoadedChart::from_value(json!({"packages": []})).unwrap_err();
        assert!(matches!(&err, GanttError::DataError { message } if message.contains("title")));

        let err = LoadedChart::from_value(json!({"title": "T"})).unwrap_err();
        assert!(matches!(&err, GanttError::DataError { message } if message.contains("packages")));
    }

    #[test]
    fn test_invalid_json_is_data_error() {
        let err = LoadedChart::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, GanttError::DataError { .. }));

        let err = LoadedChart::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, GanttError::DataError { .. }));
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let err = LoadedChart::from_value(json!({
            "title": "T",
            "packages": [
                {"label": "A", "start": "01-2021", "end": "03-2021"},
                {"label": "A", "start": "02-2021", "end": "04-2021"}
            ]
        }))
        .unwrap_err();
        assert!(matches!(&err, GanttError::DataError { message } if message.contains("'A'")));
    }

    #[test]
    fn test_empty_packages_rejected() {
        let err = LoadedChart::from_value(json!({"title": "T", "packages": []})).unwrap_err();
        assert!(matches!(err, GanttError::DataError { .. }));
    }

    #[test]
    fn test_package_errors_propagate() {
        let err = LoadedChart::from_value(json!({
            "title": "T",
            "packages": [{"label": "A", "start": "2021-01", "end": "03-2021"}]
        }))
        .unwrap_err();
        assert!(matches!(err, GanttError::FormatError { .. }));

        let err = LoadedChart::from_value(json!({
            "title": "T",
            "packages": [{"label": "A", "start": "04-2021", "end": "03-2021"}]
        }))
        .unwrap_err();
        assert!(matches!(err, GanttError::ValidationError { .. }));
    }

    #[test]
    fn test_milestones_map_only_keeps_packages_with_milestones() {
        let chart = LoadedChart::from_value(json!({
            "title": "T",
            "packages": [
                {"label": "A", "start": "01-2021", "end": "03-2021"},
                {"label": "B", "start": "01-2021", "end": "06-2021", "milestones": ["02-2021"]}
            ]
        }))
        .unwrap();

        assert_eq!(chart.milestones.len(), 1);
        assert_eq!(chart.milestones[0].0, "B");
        assert_eq!(chart.milestones[0].1[0].to_string(), "02-2021");
    }

    #[test]
    fn test_milestones_keep_document_order() {
        let chart = LoadedChart::from_value(json!({
            "title": "T",
            "packages": [
                {"label": "Zeta", "start": "01-2021", "end": "06-2021", "milestones": ["02-2021"]},
                {"label": "Alpha", "start": "01-2021", "end": "06-2021", "milestones": ["03-2021"]},
                {"label": "Mid", "start": "01-2021", "end": "06-2021", "milestones": ["04-2021"]}
            ]
        }))
        .unwrap();

        let labels: Vec<&str> = chart.milestones.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_null_xlabel_and_xticks_are_absent() {
        let chart = LoadedChart::from_value(json!({
            "title": "T",
            "xlabel": null,
            "xticks": null,
            "packages": [{"label": "A", "start": "01-2021", "end": "06-2021", "milestones": null}]
        }))
        .unwrap();

        assert_eq!(chart.xlabel, "");
        assert!(chart.xticks.is_empty());
        assert!(chart.milestones.is_empty());
    }

    #[test]
    fn test_xticks_parsed_and_bad_xtick_rejected() {
        let chart = LoadedChart::from_value(json!({
            "title": "T",
            "xlabel": "time",
            "xticks": ["01-2021", "06-2021"],
            "packages": [{"label": "A", "start": "01-2021", "end": "06-2021"}]
        }))
        .unwrap();
        assert_eq!(chart.xlabel, "time");
        assert_eq!(chart.xticks[1].label, "06-2021");

        let err = LoadedChart::from_value(json!({
            "title": "T",
            "xticks": ["June"],
            "packages": [{"label": "A", "start": "01-2021", "end": "06-2021"}]
        }))
        .unwrap_err();
        assert!(matches!(&err, GanttError::FormatError { value } if value == "June"));
    }
}
