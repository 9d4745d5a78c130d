//! Bulk product import from uploaded CSV or spreadsheet files
//!
//! CSV uploads go to the database untouched; spreadsheets are converted to
//! CSV first. Either way rows land through a single bulk copy, so an import is
//! all-or-nothing.

use crate::{
    db::ProductStore,
    metrics,
    models::{page::round_ms, PRODUCT_COLUMNS},
    Error, Result,
};
use calamine::{open_workbook_auto_from_rs, Reader};
use serde::Serialize;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Csv,
    Spreadsheet,
}

impl UploadKind {
    /// Classify an upload by file extension.
    pub fn from_filename(filename: &str) -> Result<Self> {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".csv") {
            Ok(Self::Csv)
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Ok(Self::Spreadsheet)
        } else {
            Err(Error::Validation(
                "Uploaded file can be of .csv or .xlsx type only".to_string(),
            ))
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub status: &'static str,
    pub imported_count: u64,
    #[serde(rename = "timeTaken_ms")]
    pub time_taken_ms: f64,
    /// Time spent decoding the upload before the copy started.
    #[serde(rename = "processingTimeTaken_ms")]
    pub processing_time_ms: f64,
}

pub struct ImportService {
    store: Arc<dyn ProductStore>,
}

impl ImportService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn import(&self, filename: &str, contents: Vec<u8>) -> Result<ImportSummary> {
        let started = Instant::now();
        let kind = UploadKind::from_filename(filename)?;

        let csv = match kind {
            UploadKind::Csv => contents,
            UploadKind::Spreadsheet => tokio::task::spawn_blocking(move || spreadsheet_to_csv(&contents))
                .await
                .map_err(|e| Error::Internal(format!("Spreadsheet conversion panicked: {e}")))??,
        };
        check_header(&csv)?;
        let processing = started.elapsed();

        let imported_count = self.store.bulk_copy_csv(csv).await?;
        metrics::record_import(imported_count);

        let summary = ImportSummary {
            status: "success",
            imported_count,
            time_taken_ms: round_ms(started.elapsed()),
            processing_time_ms: round_ms(processing),
        };
        tracing::info!(
            filename,
            kind = ?kind,
            imported = imported_count,
            duration_ms = summary.time_taken_ms,
            "Bulk import committed"
        );
        Ok(summary)
    }
}

/// Reject files whose header does not have one column per product field.
fn check_header(csv: &[u8]) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(csv);
    let header = match reader.records().next() {
        Some(record) => record?,
        None => return Err(Error::InvalidFile("file is empty".to_string())),
    };
    if header.len() != PRODUCT_COLUMNS.len() {
        return Err(Error::InvalidFile(format!(
            "expected {} columns ({}), found {}",
            PRODUCT_COLUMNS.len(),
            PRODUCT_COLUMNS.join(", "),
            header.len()
        )));
    }
    Ok(())
}

/// Re-encode the first worksheet as CSV, header row included.
pub fn spreadsheet_to_csv(contents: &[u8]) -> Result<Vec<u8>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(contents))
        .map_err(|e| Error::InvalidFile(format!("unreadable spreadsheet: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::InvalidFile("spreadsheet has no worksheets".to_string()))?
        .map_err(|e| Error::InvalidFile(format!("unreadable worksheet: {e}")))?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in range.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| Error::Internal(format!("failed to flush CSV buffer: {e}")))
}
