use chrono::{DateTime, TimeZone, Utc};
use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::analysis::{AnalysisDocument, AnalysisEntry, AnalysisSubject};

const FILE_PREFIX: &str = "analysis-";
const FILE_EXT: &str = ".md";

/// Flat-file store of generated analyses: one markdown file per analysis.
///
/// File names are `analysis-{SYMBOL}-{millis}.md` for holding deep-dives and
/// `analysis-{millis}.md` for portfolio analyses. The id of an entry is its
/// file name without the extension. No locking: concurrent writers are not
/// supported.
#[derive(Debug, Clone)]
pub struct AnalysisHistory {
    dir: PathBuf,
}

impl AnalysisHistory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `content` under a fresh timestamp.
    pub fn save(
        &self,
        content: &str,
        subject: &AnalysisSubject,
    ) -> Result<AnalysisEntry, CoreError> {
        self.save_at(content, subject, Utc::now())
    }

    /// Save `content` as generated at `at`. The stored file starts with a
    /// title and a `**Generated:**` line, followed by the content.
    pub fn save_at(
        &self,
        content: &str,
        subject: &AnalysisSubject,
        at: DateTime<Utc>,
    ) -> Result<AnalysisEntry, CoreError> {
        if content.trim().is_empty() {
            return Err(CoreError::EmptyAnalysis);
        }
        let timestamp = at.timestamp_millis();
        // Entries are rebuilt from file names, which carry milliseconds only
        let created_at = Utc.timestamp_millis_opt(timestamp).single().unwrap_or(at);
        let symbol = match subject {
            AnalysisSubject::Portfolio => None,
            AnalysisSubject::Holding(symbol) => {
                let symbol = file_safe_symbol(symbol);
                validate_id(&symbol)?;
                Some(symbol)
            }
        };
        let id = match &symbol {
            Some(symbol) => format!("{FILE_PREFIX}{symbol}-{timestamp}"),
            None => format!("{FILE_PREFIX}{timestamp}"),
        };
        let filename = format!("{id}{FILE_EXT}");

        let document = format!(
            "# {}\n**Generated:** {}\n\n---\n\n{}",
            subject.title(),
            at.format("%d/%m/%Y, %-I:%M:%S %P UTC"),
            content
        );

        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(&filename), document)?;
        log::info!("Saved analysis {filename}");

        Ok(AnalysisEntry {
            id,
            filename,
            symbol,
            timestamp,
            created_at,
        })
    }

    /// Every saved analysis, newest first. Files not following the naming
    /// scheme are ignored; a missing directory is an empty history.
    pub fn list(&self) -> Result<Vec<AnalysisEntry>, CoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for item in std::fs::read_dir(&self.dir)? {
            let item = item?;
            if !item.file_type()?.is_file() {
                continue;
            }
            let filename = item.file_name().to_string_lossy().into_owned();
            if let Some(entry) = parse_filename(&filename) {
                entries.push(entry);
            }
        }
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(entries)
    }

    pub fn read(&self, id: &str) -> Result<AnalysisDocument, CoreError> {
        let filename = self.filename_for(id)?;
        let path = self.dir.join(&filename);
        if !path.is_file() {
            return Err(CoreError::AnalysisNotFound(id.to_string()));
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(AnalysisDocument { filename, content })
    }

    pub fn delete(&self, id: &str) -> Result<(), CoreError> {
        let filename = self.filename_for(id)?;
        let path = self.dir.join(&filename);
        if !path.is_file() {
            return Err(CoreError::AnalysisNotFound(id.to_string()));
        }
        std::fs::remove_file(&path)?;
        log::info!("Deleted analysis {filename}");
        Ok(())
    }

    fn filename_for(&self, id: &str) -> Result<String, CoreError> {
        let id = id.trim();
        validate_id(id)?;
        let stem = id.strip_suffix(FILE_EXT).unwrap_or(id);
        Ok(format!("{stem}{FILE_EXT}"))
    }
}

/// Ids and symbols end up in a path; anything that could leave the
/// history directory is refused.
fn validate_id(id: &str) -> Result<(), CoreError> {
    if id.is_empty() || id.contains("..") || id.contains('/') || id.contains('\\') {
        return Err(CoreError::InvalidAnalysisId(id.to_string()));
    }
    Ok(())
}

/// Fund symbols are display names and may carry path separators
/// ("... Growth/IDCW"); those and `..` become `_` in the file name.
fn file_safe_symbol(symbol: &str) -> String {
    symbol
        .trim()
        .to_uppercase()
        .replace("..", "_")
        .replace(['/', '\\'], "_")
}

/// `analysis-[SYMBOL-]DIGITS.md` → entry. The symbol is everything between
/// the prefix and the last dash, so symbols may contain dashes themselves.
pub fn parse_filename(filename: &str) -> Option<AnalysisEntry> {
    let stem = filename.strip_suffix(FILE_EXT)?;
    let rest = stem.strip_prefix(FILE_PREFIX)?;

    let (symbol, digits) = match rest.rsplit_once('-') {
        Some((symbol, digits)) => (Some(symbol), digits),
        None => (None, rest),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let timestamp: i64 = digits.parse().ok()?;
    let created_at = Utc.timestamp_millis_opt(timestamp).single()?;

    Some(AnalysisEntry {
        id: stem.to_string(),
        filename: filename.to_string(),
        symbol: symbol.filter(|s| !s.is_empty()).map(str::to_string),
        timestamp,
        created_at,
    })
}
