use anyhow::Result;
use gantt_chart::core::document::LoadedChart;
use gantt_chart::domain::ports::Viewer;
use gantt_chart::{
    ChartBuilder, GanttError, LocalStorage, Output, PlotRenderer, RenderOptions, StyleConfig,
};
use std::fs;
use tempfile::TempDir;

struct NoViewer;

impl Viewer for NoViewer {
    fn show(&self, _image: &[u8], _extension: &str) -> gantt_chart::Result<()> {
        panic!("viewer must not be used when saving");
    }
}

fn builder(dir: &TempDir) -> ChartBuilder<LocalStorage, PlotRenderer> {
    ChartBuilder::new(
        LocalStorage::new(dir.path()),
        PlotRenderer::new(),
        RenderOptions::default(),
    )
}

const PLAN: &str = r##"{
    "title": "Research project",
    "xlabel": "Month",
    "xticks": ["01-2021", "04-2021", "07-2021"],
    "packages": [
        {"label": "WP1", "start": "01-2021", "end": "04-2021", "legend": "Management"},
        {"label": "WP2", "start": "02-2021", "end": "08-2021", "milestones": ["02-2021"], "color": "#E06C32"}
    ]
}"##;

#[test]
fn test_single_package_document_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(
        temp_dir.path().join("chart.json"),
        r#"{"title":"T","packages":[{"label":"A","start":"01-2021","end":"03-2021"}]}"#,
    )?;

    let builder = builder(&temp_dir);
    let processed = builder.process(builder.load("chart.json")?);

    assert_eq!(processed.len(), 1);
    assert_eq!(processed.rows[0].slot, 1);
    assert_eq!(processed.rows[0].duration_days, 59);
    assert_eq!(processed.rows[0].legend, None);
    assert!(processed.milestones.is_empty());

    let figure = builder.render(&processed);
    assert!(figure.legend.is_none());
    assert!(figure.markers.is_empty());
    assert_eq!(figure.bars[0].color, "#32AEE0");
    Ok(())
}

#[test]
fn test_milestone_document_saved_as_svg() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("plan.json"), PLAN)?;

    let builder = builder(&temp_dir);
    let saved = builder.run(
        "plan.json",
        &Output::Save(Some("out/plan.svg".into())),
        &NoViewer,
    )?;
    assert_eq!(saved.as_deref(), Some("out/plan.svg"));

    let svg = fs::read_to_string(temp_dir.path().join("out/plan.svg"))?;
    assert_eq!(svg.matches("<polygon").count(), 1);
    assert!(svg.contains("Research project"));
    assert!(svg.contains("Management"));
    assert!(svg.contains("07-2021"));
    assert!(svg.contains("WP2"));
    assert!(svg.contains("fill=\"#E06C32\""));
    assert!(svg.contains("fill=\"#32AEE0\""));
    Ok(())
}

#[test]
fn test_default_save_writes_png() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("plan.json"), PLAN)?;

    let builder = builder(&temp_dir);
    let saved = builder.run("plan.json", &Output::Save(None), &NoViewer)?;
    assert_eq!(saved.as_deref(), Some("img/GANTT.png"));

    let png = fs::read(temp_dir.path().join("img/GANTT.png"))?;
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    Ok(())
}

#[test]
fn test_missing_keys_fail_with_data_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("no_title.json"), r#"{"packages": []}"#)?;
    fs::write(temp_dir.path().join("no_packages.json"), r#"{"title": "T"}"#)?;

    let builder = builder(&temp_dir);
    for file in ["no_title.json", "no_packages.json", "does_not_exist.json"] {
        let err = builder.build(file).unwrap_err();
        assert!(matches!(err, GanttError::DataError { .. }), "{}: {}", file, err);
    }
    Ok(())
}

#[test]
fn test_errors_name_offending_value() {
    let err = LoadedChart::from_json_str(
        r#"{"title":"T","packages":[{"label":"A","start":"2020-01","end":"03-2021"}]}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("2020-01"));

    let err = LoadedChart::from_json_str(
        r#"{"title":"T","packages":[{"label":"A","start":"04-2021","end":"03-2021"}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, GanttError::ValidationError { .. }));
}

#[test]
fn test_style_file_drives_rendering() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let style_path = temp_dir.path().join("style.toml");
    fs::write(
        &style_path,
        r#"
[figure]
width = 900
height = 300

[milestones]
fill = "orange"

[text]
mode = "plain"
"#,
    )?;
    fs::write(
        temp_dir.path().join("plan.json"),
        r#"{"title":"T","packages":[{"label":"A","start":"01-2021","end":"03-2021","milestones":["02-2021"]}]}"#,
    )?;

    let style = StyleConfig::from_file(&style_path)?;
    let options = style.render_options(gantt_chart::domain::figure::TextMode::Plain);
    let builder = ChartBuilder::new(LocalStorage::new(temp_dir.path()), PlotRenderer::new(), options);

    let figure = builder.build("plan.json")?;
    assert_eq!(figure.width, 900);
    assert_eq!(figure.markers[0].fill, "orange");

    builder.save(&figure, Some("chart.svg"))?;
    let svg = fs::read_to_string(temp_dir.path().join("chart.svg"))?;
    assert!(svg.contains("fill=\"#FFA500\""));
    Ok(())
}
