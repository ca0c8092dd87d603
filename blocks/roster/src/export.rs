use std::path::PathBuf;

use async_trait::async_trait;
use crewdesk_atoms::TeamMember;
use rust_xlsxwriter::{Workbook, XlsxError};

pub const SHEET_NAME: &str = "Team";
pub const EXPORT_FILENAME: &str = "team_tracking.xlsx";
pub const HEADERS: [&str; 5] = ["Nom", "Description", "Tell", "Salary", "Target Videos"];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to build workbook: {0}")]
    Workbook(#[from] XlsxError),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    /// 1-based position in the roster.
    pub index: usize,
    pub description: String,
    pub phone: String,
    pub salary: String,
    pub target_videos: u32,
}

/// The roster as it appears in the exported sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSheet {
    pub rows: Vec<ExportRow>,
}

pub fn format_salary(salary: f64) -> String {
    format!("${:.2}", salary)
}

impl ExportSheet {
    pub fn from_members(members: &[TeamMember]) -> Self {
        let rows = members
            .iter()
            .enumerate()
            .map(|(i, m)| ExportRow {
                index: i + 1,
                description: m.description.clone(),
                phone: m.phone.clone(),
                salary: format_salary(m.salary),
                target_videos: m.target_videos,
            })
            .collect();
        Self { rows }
    }

    /// Single-sheet workbook: header row, then one row per member.
    pub fn to_xlsx(&self) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, header) in HEADERS.iter().enumerate() {
            sheet.write_string(0, col as u16, *header)?;
        }
        for (i, row) in self.rows.iter().enumerate() {
            let r = (i + 1) as u32;
            sheet.write_number(r, 0, row.index as f64)?;
            sheet.write_string(r, 1, &row.description)?;
            sheet.write_string(r, 2, &row.phone)?;
            sheet.write_string(r, 3, &row.salary)?;
            sheet.write_number(r, 4, f64::from(row.target_videos))?;
        }

        Ok(workbook.save_to_buffer()?)
    }

    pub fn to_file(&self) -> Result<ExportFile, ExportError> {
        Ok(ExportFile {
            filename: EXPORT_FILENAME.to_string(),
            bytes: self.to_xlsx()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Where a finished export goes.
#[async_trait]
pub trait FileSink: Send + Sync {
    /// Stores the file and returns where it landed.
    async fn deliver(&self, file: &ExportFile) -> Result<PathBuf, ExportError>;
}

/// Writes exports into a local directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl FileSink for DirectorySink {
    async fn deliver(&self, file: &ExportFile) -> Result<PathBuf, ExportError> {
        let path = self.dir.join(&file.filename);
        tokio::fs::write(&path, &file.bytes).await?;
        tracing::info!(path = %path.display(), bytes = file.bytes.len(), "export written");
        Ok(path)
    }
}
