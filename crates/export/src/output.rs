use crate::ExportError;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

/// One encoded file produced by an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// What an export hands back: a single container, or loose files in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutput {
    Blob(ExportedFile),
    Files(Vec<ExportedFile>),
}

impl ExportOutput {
    pub fn files(&self) -> Vec<&ExportedFile> {
        match self {
            ExportOutput::Blob(file) => vec![file],
            ExportOutput::Files(files) => files.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ExportOutput::Blob(_) => 1,
            ExportOutput::Files(files) => files.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes every file into `dir`, waiting `pacing` between consecutive writes.
    pub fn write_to_dir(&self, dir: &Path, pacing: Duration) -> Result<Vec<PathBuf>, ExportError> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for (i, file) in self.files().into_iter().enumerate() {
            if i > 0 && !pacing.is_zero() {
                std::thread::sleep(pacing);
            }
            let path = dir.join(&file.name);
            std::fs::write(&path, &file.bytes)?;
            log::debug!("Wrote {} ({} bytes)", path.display(), file.bytes.len());
            written.push(path);
        }
        Ok(written)
    }
}

/// Packs files into an uncompressed ZIP archive; page images are already compressed.
pub fn zip_files(files: &[ExportedFile]) -> Result<Vec<u8>, ExportError> {
    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);
    for file in files {
        archive.start_file(file.name.as_str(), options)?;
        archive.write_all(&file.bytes)?;
    }
    Ok(archive.finish()?.into_inner())
}

/// `page-3.png` for the first sheet of page index 2, `page-3-2.png` for its second.
pub fn sheet_file_name(page_index: usize, sheet: usize, extension: &str) -> String {
    if sheet == 0 {
        format!("page-{}.{}", page_index + 1, extension)
    } else {
        format!("page-{}-{}.{}", page_index + 1, sheet + 1, extension)
    }
}
