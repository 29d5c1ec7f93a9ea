//! Subcommand implementations
//!
//! Each command returns the text to print so the entry point owns stdout.

use anyhow::{bail, Context, Result};
use canvas_model::PageConfig;
use canvas_store::{deserialize, serialize, DesignerSettings, SerializeOptions, SettingsManager};
use report_layout::{build_page_plan, Dataset, LabelCatalog, PlanOptions, Row};
use std::path::{Path, PathBuf};

use crate::cli::Commands;

pub fn load_settings(dir: Option<&Path>) -> Result<DesignerSettings> {
    match dir {
        Some(dir) => {
            let mut manager = SettingsManager::new(dir);
            let settings = manager
                .load_sync()
                .with_context(|| format!("Failed to load settings from {}", dir.display()))?;
            Ok(settings.clone())
        }
        None => Ok(DesignerSettings::default()),
    }
}

pub fn run(command: Commands, settings: &DesignerSettings) -> Result<String> {
    match command {
        Commands::Inspect { file } => inspect(&file),
        Commands::Normalize { file, out, compact } => {
            normalize(&file, out.as_deref(), !compact, settings)
        }
        Commands::Plan {
            layout,
            data,
            language,
            rows_per_page,
            headings,
            footer,
            labels,
            context,
        } => plan(PlanRequest {
            layout,
            data,
            language: language.unwrap_or_else(|| settings.layout.language.clone()),
            rows_per_page: rows_per_page.unwrap_or(settings.layout.rows_per_page),
            default_page_key: settings.layout.default_page_key.clone(),
            headings,
            footer,
            labels,
            context,
        }),
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn inspect(file: &Path) -> Result<String> {
    let loaded = deserialize(&read(file)?)
        .with_context(|| format!("Failed to load layout {}", file.display()))?;

    let mut out = String::new();
    out.push_str(&format!(
        "Version: {}\n",
        loaded.version.as_deref().unwrap_or("(none)")
    ));
    if loaded.page_config.is_none() {
        out.push_str("No page configuration; using free size\n");
    }
    out.push_str(&loaded.summary().to_string());
    if loaded.skipped_elements > 0 {
        out.push_str(&format!("Skipped elements: {}\n", loaded.skipped_elements));
    }
    Ok(out)
}

/// Rewrite a layout in the canonical shape. `pretty` only indents when the
/// export settings allow it; a file without a page block gets the default page.
pub fn normalize(
    file: &Path,
    out: Option<&Path>,
    pretty: bool,
    settings: &DesignerSettings,
) -> Result<String> {
    let loaded = deserialize(&read(file)?)
        .with_context(|| format!("Failed to load layout {}", file.display()))?;
    if loaded.skipped_elements > 0 {
        tracing::warn!(skipped = loaded.skipped_elements, "dropping unreadable elements");
    }

    let carried = loaded.carried_metadata();
    let document =
        loaded.into_document_or(PageConfig::from_preset(&settings.layout.default_page_key));
    let options = SerializeOptions::for_document(&document)
        .with_pretty(pretty && settings.export.pretty)
        .with_format_version(settings.export.format_version.clone())
        .with_metadata_map(carried);
    let json = serialize(&document, &options)?;

    match out {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(format!("Wrote {} elements to {}\n", document.len(), path.display()))
        }
        None => Ok(json + "\n"),
    }
}

pub struct PlanRequest {
    pub layout: PathBuf,
    pub data: PathBuf,
    pub language: String,
    pub rows_per_page: usize,
    /// Page preset for layouts without a page block
    pub default_page_key: String,
    pub headings: Vec<String>,
    pub footer: Option<String>,
    pub labels: Option<PathBuf>,
    pub context: Option<PathBuf>,
}

pub fn plan(request: PlanRequest) -> Result<String> {
    if request.rows_per_page == 0 {
        bail!("--rows-per-page must be at least 1");
    }

    let document = deserialize(&read(&request.layout)?)
        .with_context(|| format!("Failed to load layout {}", request.layout.display()))?
        .into_document_or(PageConfig::from_preset(&request.default_page_key));
    let dataset = Dataset::from_json(&read(&request.data)?)
        .with_context(|| format!("Failed to load dataset {}", request.data.display()))?;

    let catalog = match &request.labels {
        Some(path) => Some(
            LabelCatalog::from_json(&read(path)?)
                .with_context(|| format!("Failed to load labels {}", path.display()))?,
        ),
        None => None,
    };
    let context = match &request.context {
        Some(path) => {
            let value: serde_json::Value = serde_json::from_str(&read(path)?)
                .with_context(|| format!("Failed to parse context {}", path.display()))?;
            match value {
                serde_json::Value::Object(map) => map,
                _ => bail!("Context file {} must hold a JSON object", path.display()),
            }
        }
        None => Row::new(),
    };

    let mut options = PlanOptions::new()
        .with_rows_per_page(request.rows_per_page)
        .with_language(request.language)
        .with_context(context);
    if let Some(catalog) = &catalog {
        options = options.with_resolver(catalog);
    }

    let pages = build_page_plan(
        &document,
        &dataset,
        request.headings.as_slice(),
        request.footer.as_deref(),
        &options,
    );
    tracing::info!(pages = pages.len(), rows = dataset.len(), "planned report");
    Ok(serde_json::to_string_pretty(&pages)? + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LEGACY: &str = r#"{"widgets": [
        {"kind": "text", "left": 12, "top": 18, "content": "Hello {name}"},
        {"kind": "sparkline"},
        {"kind": "table"}
    ], "page_config": {"key": "letterp"}}"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_inspect_reports_counts() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "legacy.json", LEGACY);
        let text = inspect(&file).unwrap();
        assert!(text.contains("Letter Portrait"));
        assert!(text.contains("Elements: 2"));
        assert!(text.contains("Skipped elements: 1"));
    }

    #[test]
    fn test_normalize_writes_canonical_file() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "legacy.json", LEGACY);
        let out = dir.path().join("canonical.json");

        normalize(&file, Some(&out), false, &DesignerSettings::default()).unwrap();
        let written = std::fs::read_to_string(&out).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["version"], "1.0");
        assert_eq!(value["pageConfig"]["key"], "letterp");
        assert_eq!(value["elements"][0]["type"], "textbox");
        assert_eq!(value["elements"][0]["x"], 10);
        assert_eq!(value["elements"][0]["text"], "Hello {name}");
        assert!(!written.contains('\n'));
    }

    #[test]
    fn test_normalize_applies_settings_and_keeps_metadata() {
        let dir = TempDir::new().unwrap();
        let file = write(
            &dir,
            "bare.json",
            r#"{"items": [{"type": "line"}], "metadata": {"reportId": "R-12", "elementCount": 7}}"#,
        );
        let mut settings = DesignerSettings::default();
        settings.layout.default_page_key = "a4l".to_string();
        settings.export.format_version = "1.1".to_string();
        settings.export.pretty = false;

        let text = normalize(&file, None, true, &settings).unwrap();
        assert_eq!(text.trim_end().lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], "1.1");
        assert_eq!(value["pageConfig"]["key"], "a4l");
        assert_eq!(value["metadata"]["reportId"], "R-12");
        assert_eq!(value["metadata"]["elementCount"], 1);
    }

    #[test]
    fn test_plan_prints_pages() {
        let dir = TempDir::new().unwrap();
        let layout = write(&dir, "layout.json", LEGACY);
        let rows: Vec<serde_json::Value> = (0..45).map(|i| serde_json::json!({"n": i})).collect();
        let data = write(&dir, "data.json", &serde_json::to_string(&rows).unwrap());
        let context = write(&dir, "context.json", r#"{"name": "Ann"}"#);

        let output = plan(PlanRequest {
            layout,
            data,
            language: "en".to_string(),
            rows_per_page: 40,
            default_page_key: "free".to_string(),
            headings: vec!["For {name}".to_string()],
            footer: None,
            labels: None,
            context: Some(context),
        })
        .unwrap();
        let pages: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(pages.as_array().unwrap().len(), 2);
        assert_eq!(pages[0]["headings"][0], "For Ann");
        assert_eq!(pages[0]["elements"][0]["text"], "Hello Ann");
        assert_eq!(pages[1]["rows"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_settings_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = load_settings(Some(dir.path())).unwrap();
        assert_eq!(settings, DesignerSettings::default());
        assert_eq!(load_settings(None).unwrap().layout.rows_per_page, 40);
    }
}
