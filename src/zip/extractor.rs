use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Result, ZipError};

use super::archive::ZipArchive;
use super::entry::ZipEntry;

/// ZIP file extractor
pub struct ZipExtractor {
    archive: ZipArchive,
}

impl ZipExtractor {
    pub fn new(archive: ZipArchive) -> Self {
        Self { archive }
    }

    pub fn archive(&self) -> &ZipArchive {
        &self.archive
    }

    /// List all files in the archive
    pub fn list_files(&self) -> &[Arc<ZipEntry>] {
        self.archive.entries()
    }

    /// Extract file data to memory
    pub fn extract_to_memory(&self, entry: &ZipEntry) -> Result<Vec<u8>> {
        entry.data(&self.archive)
    }

    /// Extract file to disk
    pub async fn extract_to_file(&self, entry: &ZipEntry, output_path: &Path) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let buffer = entry.buffer(&self.archive)?;
        let written = fs::write(output_path, &*buffer).await;
        self.archive.release_buffer(buffer);

        Ok(written?)
    }

    /// Extract file to stdout
    pub async fn extract_to_stdout(&self, entry: &ZipEntry) -> Result<()> {
        let buffer = entry.buffer(&self.archive)?;

        let mut stdout = tokio::io::stdout();
        let written = stdout.write_all(&buffer).await;
        self.archive.release_buffer(buffer);
        written?;

        stdout.flush().await.map_err(ZipError::from)
    }

    /// Close the underlying archive
    pub fn close(self) -> Result<()> {
        self.archive.close()
    }
}
