use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use overlap_core::errors::{ErrorInfo, OverlapError};
use overlap_core::{from_json_slice, to_canonical_json_bytes};

use crate::sweep::{DensityPoint, SweepReport};

fn path_error(code: &str, path: &Path, err: impl ToString) -> OverlapError {
    OverlapError::Serde(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display()),
    )
}

fn ensure_parent(path: &Path) -> Result<(), OverlapError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| path_error("export_dir", parent, err))?;
        }
    }
    Ok(())
}

/// Writes the point series as CSV with a header row.
///
/// Columns: `entities,density,probability,singly_occupied_total`.
pub fn write_points_csv(path: &Path, points: &[DensityPoint]) -> Result<(), OverlapError> {
    ensure_parent(path)?;
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| path_error("points_csv_open", path, err))?;
    for point in points {
        writer
            .serialize(point)
            .map_err(|err| path_error("points_csv_write", path, err))?;
    }
    writer
        .flush()
        .map_err(|err| path_error("points_csv_flush", path, err))
}

/// Reads a point series written by [`write_points_csv`].
///
/// Rejects files whose rows are not in strictly increasing entity order.
pub fn read_points_csv(path: &Path) -> Result<Vec<DensityPoint>, OverlapError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| path_error("points_csv_open", path, err))?;
    let mut points: Vec<DensityPoint> = Vec::new();
    for record in reader.deserialize() {
        let point: DensityPoint = record.map_err(|err| path_error("points_csv_row", path, err))?;
        if let Some(previous) = points.last() {
            if point.entities <= previous.entities {
                return Err(OverlapError::Serde(
                    ErrorInfo::new("points_order", "points must increase in entity count")
                        .with_context("path", path.display())
                        .with_context("entities", point.entities),
                ));
            }
        }
        points.push(point);
    }
    Ok(points)
}

/// Writes the report as canonical JSON.
pub fn write_report_json(path: &Path, report: &SweepReport) -> Result<(), OverlapError> {
    ensure_parent(path)?;
    let bytes = to_canonical_json_bytes(report)?;
    fs::write(path, bytes).map_err(|err| path_error("report_write", path, err))
}

/// Reads a report written by [`write_report_json`].
pub fn read_report_json(path: &Path) -> Result<SweepReport, OverlapError> {
    let bytes = fs::read(path).map_err(|err| path_error("report_read", path, err))?;
    from_json_slice(&bytes)
}
