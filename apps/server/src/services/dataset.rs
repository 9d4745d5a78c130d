//! Synthetic product datasets
//!
//! Generated files use the `product` column order, so a downloaded dataset
//! can be posted straight back to the bulk import endpoint.

use crate::{
    models::{Product, PRODUCT_COLUMNS},
    Error, Result,
};
use rand::{seq::SliceRandom, Rng};
use rust_xlsxwriter::{Workbook, XlsxError};
use uuid::Uuid;

const CATEGORIES: [&str; 3] = ["Shirt", "Jeans", "Footwear"];
const PEOPLE: [&str; 4] = ["Men", "Women", "Boy", "Girl"];
const COLOURS: [&str; 4] = ["Pink", "Blue", "Red", "Green"];
const MANUFACTURERS: [&str; 4] = ["Nike", "Adidas", "Puma", "Reebok"];

const DESCRIPTION_WORDS: [&str; 24] = [
    "soft", "cotton", "classic", "slim", "relaxed", "durable", "lightweight", "breathable",
    "stretch", "denim", "weave", "fit", "casual", "sporty", "everyday", "premium", "washed",
    "tailored", "comfort", "street", "vintage", "modern", "tapered", "cushioned",
];

const MIN_PRICE: f64 = 10.99;
const MAX_PRICE: f64 = 499.99;
const MAX_STOCK: i32 = 500;

/// Rows per worksheet, header excluded.
pub const XLSX_MAX_ROWS: u64 = 1_048_575;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Excel,
}

impl DatasetFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "xlsx",
        }
    }
}

impl std::str::FromStr for DatasetFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "excel" | "xlsx" => Ok(Self::Excel),
            other => Err(Error::Validation(format!(
                "Unsupported format '{other}'. Use 'csv' or 'excel'."
            ))),
        }
    }
}

/// A generated file ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct GeneratedDataset {
    pub filename: String,
    pub content_type: &'static str,
    pub rows: u64,
    pub bytes: Vec<u8>,
}

/// Check a requested row count against `[1, max_rows]` and the worksheet limit.
pub fn validate_rows(rows: u64, format: DatasetFormat, max_rows: u64) -> Result<()> {
    if rows < 1 || rows > max_rows {
        return Err(Error::Validation(format!(
            "'rows' must be between 1 and {max_rows}"
        )));
    }
    if format == DatasetFormat::Excel && rows > XLSX_MAX_ROWS {
        return Err(Error::Validation(format!(
            "Excel output is limited to {XLSX_MAX_ROWS} rows; use format=csv"
        )));
    }
    Ok(())
}

/// Generate `rows` random products and encode them in `format`.
///
/// Encoding runs on the blocking pool.
pub async fn generate(rows: u64, format: DatasetFormat, max_rows: u64) -> Result<GeneratedDataset> {
    validate_rows(rows, format, max_rows)?;

    let bytes = tokio::task::spawn_blocking(move || {
        let mut rng = rand::thread_rng();
        match format {
            DatasetFormat::Csv => write_csv(&mut rng, rows),
            DatasetFormat::Excel => write_xlsx(&mut rng, rows),
        }
    })
    .await
    .map_err(|e| Error::Internal(format!("Dataset generation panicked: {e}")))??;

    tracing::info!(rows, format = ?format, bytes = bytes.len(), "Generated product dataset");

    Ok(GeneratedDataset {
        filename: format!("dummy_products_{rows}.{}", format.extension()),
        content_type: format.content_type(),
        rows,
        bytes,
    })
}

pub fn random_product<R: Rng + ?Sized>(rng: &mut R) -> Product {
    let category = pick(rng, &CATEGORIES);
    let colour = pick(rng, &COLOURS);
    let price = (rng.gen_range(MIN_PRICE..=MAX_PRICE) * 100.0).round() / 100.0;

    Product {
        product_id: Uuid::new_v4(),
        name: format!("{colour} {category}"),
        people: pick(rng, &PEOPLE).to_string(),
        category: category.to_string(),
        price,
        stock_quantity: rng.gen_range(0..=MAX_STOCK),
        manufacturer: pick(rng, &MANUFACTURERS).to_string(),
        description: sentence(rng, 3),
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, choices: &[&'a str]) -> &'a str {
    choices.choose(rng).copied().unwrap_or_default()
}

fn sentence<R: Rng + ?Sized>(rng: &mut R, words: usize) -> String {
    let mut words: Vec<String> = (0..words)
        .map(|_| pick(rng, &DESCRIPTION_WORDS).to_string())
        .collect();
    if let Some(first) = words.first_mut() {
        first[..1].make_ascii_uppercase();
    }
    let mut text = words.join(" ");
    text.push('.');
    text
}

fn write_csv<R: Rng + ?Sized>(rng: &mut R, rows: u64) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(PRODUCT_COLUMNS)?;
    for _ in 0..rows {
        let p = random_product(rng);
        writer.write_record(&[
            p.product_id.to_string(),
            p.name,
            p.people,
            p.category,
            format!("{:.2}", p.price),
            p.stock_quantity.to_string(),
            p.manufacturer,
            p.description,
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| Error::Internal(format!("failed to flush CSV buffer: {e}")))
}

fn write_xlsx<R: Rng + ?Sized>(rng: &mut R, rows: u64) -> Result<Vec<u8>> {
    build_workbook(rng, rows).map_err(|e| Error::Internal(format!("failed to build workbook: {e}")))
}

fn build_workbook<R: Rng + ?Sized>(rng: &mut R, rows: u64) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Products")?;

    for (col, name) in PRODUCT_COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for row in 1..=rows as u32 {
        let p = random_product(rng);
        sheet.write_string(row, 0, p.product_id.to_string())?;
        sheet.write_string(row, 1, &p.name)?;
        sheet.write_string(row, 2, &p.people)?;
        sheet.write_string(row, 3, &p.category)?;
        sheet.write_number(row, 4, p.price)?;
        sheet.write_number(row, 5, p.stock_quantity)?;
        sheet.write_string(row, 6, &p.manufacturer)?;
        sheet.write_string(row, 7, &p.description)?;
    }

    workbook.save_to_buffer()
}
