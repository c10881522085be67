use async_trait::async_trait;
use calamine::{Data, Range, RangeDeserializerBuilder, Reader};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::raw::{ForeignRow, RawRecord};
use super::traits::HoldingsSource;

/// Container of the overseas holdings sheet, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Spreadsheet workbook (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`);
    /// only the first worksheet is read.
    Workbook,
    /// Comma-separated export; any other extension.
    Csv,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => SheetFormat::Workbook,
            _ => SheetFormat::Csv,
        }
    }
}

/// Overseas holdings sheet as downloaded from the foreign broker, either the
/// workbook itself or a CSV export of it.
///
/// The first row must carry the export's headers (`Ticker`,
/// `Total Shares Held`, `Average Cost (USD)`, ...). Extra columns are
/// ignored and missing ones read as empty. Numeric cells are parsed
/// leniently; a row that cannot be decoded at all is logged and skipped.
///
/// The source is optional: if the file is absent the refresh continues
/// without foreign holdings.
pub struct ForeignHoldingsFile {
    path: PathBuf,
}

impl ForeignHoldingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SheetFormat {
        SheetFormat::from_path(&self.path)
    }

    /// Read and decode the file.
    pub fn load(&self) -> Result<Vec<ForeignRow>, CoreError> {
        if !self.path.exists() {
            return Err(CoreError::FileIO(format!(
                "Foreign holdings file not found: {}",
                self.path.display()
            )));
        }
        let rows = match self.format() {
            SheetFormat::Workbook => Self::parse_workbook(&self.path)?,
            SheetFormat::Csv => Self::parse(std::fs::File::open(&self.path)?)?,
        };
        log::debug!("Read {} row(s) from {}", rows.len(), self.path.display());
        Ok(rows)
    }

    /// Decode CSV rows from any reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ForeignRow>, CoreError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        // Fail on an unreadable header row instead of yielding nothing
        csv_reader.headers()?;

        let mut rows = Vec::new();
        for (index, result) in csv_reader.deserialize::<ForeignRow>().enumerate() {
            match result {
                Ok(row) => rows.push(row),
                Err(e) => log::warn!("Skipping foreign holdings row {}: {e}", index + 2),
            }
        }
        Ok(rows)
    }

    /// Decode the first worksheet of a workbook.
    pub fn parse_workbook(path: &Path) -> Result<Vec<ForeignRow>, CoreError> {
        let mut workbook = calamine::open_workbook_auto(path).map_err(|e| {
            CoreError::FileIO(format!("Cannot open workbook {}: {e}", path.display()))
        })?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| {
                CoreError::Deserialization(format!("Workbook {} has no worksheets", path.display()))
            })?
            .map_err(|e| CoreError::Deserialization(format!("Cannot read first worksheet: {e}")))?;
        Self::parse_range(&range)
    }

    /// Decode worksheet cells whose first row holds the headers. Fully blank
    /// rows are dropped.
    pub fn parse_range(range: &Range<Data>) -> Result<Vec<ForeignRow>, CoreError> {
        let rows_iter = RangeDeserializerBuilder::new()
            .from_range::<_, ForeignRow>(range)
            .map_err(|e| CoreError::Deserialization(format!("Invalid worksheet header row: {e}")))?;

        let mut rows = Vec::new();
        for (index, result) in rows_iter.enumerate() {
            match result {
                Ok(row) if row.is_blank() => {}
                Ok(row) => rows.push(row),
                Err(e) => log::warn!("Skipping foreign holdings row {}: {e}", index + 2),
            }
        }
        Ok(rows)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl HoldingsSource for ForeignHoldingsFile {
    fn name(&self) -> &str {
        "Foreign holdings sheet"
    }

    fn required(&self) -> bool {
        false
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>, CoreError> {
        Ok(self.load()?.into_iter().map(RawRecord::ForeignRow).collect())
    }
}
