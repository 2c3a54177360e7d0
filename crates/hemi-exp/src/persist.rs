//! Sweep artefacts on disk.
//!
//! `sweep_results.json` holds the ranked results as plain key/value records,
//! `sweep_report.json` the plan hash, provenance, counts and top-N names, and
//! `magnet_sweep_comparison.csv` the top-N table. Per-configuration slice
//! tables are written by [`GridCsvWriter`] when grid output is requested.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use hemi_core::errors::{ErrorInfo, HemiError};
use hemi_core::RunProvenance;
use hemi_eval::{FieldGrid, FieldViews, MetricsRecord};
use hemi_layout::MagnetKind;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::serde::{from_json_slice, to_canonical_json_pretty};
use crate::sweep::{SweepObserver, SweepReport, SweepResult, SweepSummary};

/// File name of the ranked result list.
pub const RESULTS_FILE: &str = "sweep_results.json";
/// File name of the run report.
pub const REPORT_FILE: &str = "sweep_report.json";
/// File name of the top-N comparison table.
pub const COMPARISON_FILE: &str = "magnet_sweep_comparison.csv";
/// Directory holding per-configuration slice tables.
pub const GRID_DIR: &str = "grids";

fn io_error(code: &str, path: &Path, err: impl ToString) -> HemiError {
    HemiError::Serde(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

/// One entry of `sweep_results.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedResult {
    /// Configuration name.
    pub config_name: String,
    /// Magnet variant name.
    pub magnet_class: String,
    /// Design parameters, multi-component values as arrays.
    pub params: BTreeMap<String, Value>,
    /// Metrics of the configuration.
    pub metrics: MetricsRecord,
    /// Composite score.
    pub score: f64,
}

impl From<&SweepResult> for PersistedResult {
    fn from(result: &SweepResult) -> Self {
        let config = &result.config;
        let mut params = BTreeMap::new();
        params.insert("n_turns".to_string(), json!(config.turns));
        match result.magnet_kind {
            MagnetKind::FlatCoil => {
                params.insert("current_a_base".to_string(), json!(config.current));
                params.insert("diameter_m".to_string(), json!(config.coil_diameter));
            }
            MagnetKind::CoilWithCore => {
                params.insert("current_a".to_string(), json!(config.effective_current()));
                params.insert("coil_diameter".to_string(), json!(config.coil_diameter));
                params.insert("coil_height".to_string(), json!(config.coil_height));
                params.insert(
                    "magnetization".to_string(),
                    json!(config.core_magnetization),
                );
            }
        }
        Self {
            config_name: result.config_name.clone(),
            magnet_class: result.magnet_kind.as_str().to_string(),
            params,
            metrics: result.metrics,
            score: result.score,
        }
    }
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    plan_hash: &'a str,
    provenance: &'a RunProvenance,
    summary: &'a SweepSummary,
    top: &'a [String],
}

/// Paths written by [`persist_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedArtifacts {
    /// Ranked result list.
    pub results: PathBuf,
    /// Run report.
    pub report: PathBuf,
    /// Top-N comparison table.
    pub comparison: PathBuf,
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), HemiError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| io_error("io-create-dir", parent, err))?;
    }
    fs::write(path, bytes).map_err(|err| io_error("io-write", path, err))
}

/// Writes the ranked results as `sweep_results.json` under `dir`.
pub fn write_results(dir: &Path, report: &SweepReport) -> Result<PathBuf, HemiError> {
    let records: Vec<PersistedResult> = report.results.iter().map(PersistedResult::from).collect();
    let path = dir.join(RESULTS_FILE);
    write_bytes(&path, &to_canonical_json_pretty(&records)?)?;
    Ok(path)
}

/// Reads a `sweep_results.json` file.
pub fn load_results(path: &Path) -> Result<Vec<PersistedResult>, HemiError> {
    let bytes = fs::read(path).map_err(|err| io_error("io-read", path, err))?;
    from_json_slice(&bytes)
}

/// Writes plan hash, provenance, counts and top-N names as `sweep_report.json`.
pub fn write_report(dir: &Path, report: &SweepReport) -> Result<PathBuf, HemiError> {
    let document = ReportDocument {
        plan_hash: &report.plan_hash,
        provenance: &report.provenance,
        summary: &report.summary,
        top: &report.top,
    };
    let path = dir.join(REPORT_FILE);
    write_bytes(&path, &to_canonical_json_pretty(&document)?)?;
    Ok(path)
}

/// Writes the top-N comparison table.
pub fn write_comparison(dir: &Path, report: &SweepReport) -> Result<PathBuf, HemiError> {
    let path = dir.join(COMPARISON_FILE);
    fs::create_dir_all(dir).map_err(|err| io_error("io-create-dir", dir, err))?;
    let mut writer = csv::Writer::from_path(&path).map_err(|err| io_error("csv-open", &path, err))?;
    writer
        .write_record(["config_name", "score", "force_strength", "energy_contrast", "energy_peak"])
        .map_err(|err| io_error("csv-write", &path, err))?;
    for result in report.top_results() {
        writer
            .write_record([
                result.config_name.clone(),
                result.score.to_string(),
                result.metrics.force_strength.to_string(),
                result.metrics.energy_contrast.to_string(),
                result.metrics.energy_peak.to_string(),
            ])
            .map_err(|err| io_error("csv-write", &path, err))?;
    }
    writer.flush().map_err(|err| io_error("csv-write", &path, err))?;
    Ok(path)
}

/// Writes results, report and comparison table under `dir`.
pub fn persist_report(dir: &Path, report: &SweepReport) -> Result<PersistedArtifacts, HemiError> {
    Ok(PersistedArtifacts {
        results: write_results(dir, report)?,
        report: write_report(dir, report)?,
        comparison: write_comparison(dir, report)?,
    })
}

/// Path of the slice table of `config_name` for `grid`'s plane.
pub fn grid_path(dir: &Path, config_name: &str, grid: &FieldGrid) -> PathBuf {
    dir.join(GRID_DIR).join(format!(
        "magnet_sweep_{config_name}_{}.csv",
        grid.plane().label()
    ))
}

/// Writes one slice as `axis1, axis2, energy, grad_axis1, grad_axis2` rows.
pub fn write_grid_csv(path: &Path, grid: &FieldGrid) -> Result<(), HemiError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| io_error("io-create-dir", parent, err))?;
    }
    let mut writer = csv::Writer::from_path(path).map_err(|err| io_error("csv-open", path, err))?;
    writer
        .write_record(["axis1", "axis2", "energy", "grad_axis1", "grad_axis2"])
        .map_err(|err| io_error("csv-write", path, err))?;
    for (axis1, axis2, energy, grad1, grad2) in grid.cells() {
        writer
            .serialize((axis1, axis2, energy, grad1, grad2))
            .map_err(|err| io_error("csv-write", path, err))?;
    }
    writer.flush().map_err(|err| io_error("csv-write", path, err))
}

/// Sweep observer writing both slices of every evaluated configuration.
#[derive(Debug, Clone)]
pub struct GridCsvWriter {
    dir: PathBuf,
}

impl GridCsvWriter {
    /// Writes under `dir/grids`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SweepObserver for GridCsvWriter {
    fn on_evaluated(&self, result: &SweepResult, views: &FieldViews) -> Result<(), HemiError> {
        for grid in [&views.top, &views.side] {
            write_grid_csv(&grid_path(&self.dir, &result.config_name, grid), grid)?;
        }
        Ok(())
    }
}
