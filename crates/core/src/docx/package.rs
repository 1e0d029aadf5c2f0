//! Zip-level access to a `.docx` package.

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Part holding the main document body.
pub const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("failed to read document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a valid docx archive {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("document {path} has no part '{part}'")]
    MissingPart { path: PathBuf, part: String },

    #[error("malformed XML in {part}: {message}")]
    Xml { part: String, message: String },
}

/// An opened `.docx` archive, held in memory.
pub struct DocxPackage {
    path: PathBuf,
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl std::fmt::Debug for DocxPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocxPackage")
            .field("path", &self.path)
            .field("parts", &self.archive.len())
            .finish()
    }
}

impl DocxPackage {
    /// Open the archive at `path` and check it carries a document body.
    pub fn open(path: &Path) -> Result<Self, DocxError> {
        let bytes = fs::read(path)
            .map_err(|e| DocxError::Io { path: path.to_path_buf(), source: e })?;
        Self::from_bytes(path, bytes)
    }

    /// Wrap bytes already in memory. `path` is only used for error messages.
    pub fn from_bytes(path: &Path, bytes: Vec<u8>) -> Result<Self, DocxError> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| DocxError::Zip { path: path.to_path_buf(), source: e })?;

        if !archive.file_names().any(|n| n == DOCUMENT_PART) {
            return Err(DocxError::MissingPart {
                path: path.to_path_buf(),
                part: DOCUMENT_PART.to_string(),
            });
        }

        debug!("Opened {} ({} parts)", path.display(), archive.len());
        Ok(Self { path: path.to_path_buf(), archive })
    }

    /// Names of every entry, in archive order.
    pub fn part_names(&mut self) -> Result<Vec<String>, DocxError> {
        let path = &self.path;
        let mut names = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            let entry = self.archive.by_index_raw(index).map_err(zip_error(path))?;
            names.push(entry.name().to_string());
        }
        Ok(names)
    }

    /// Decompressed bytes of the part called `name`.
    pub fn part(&mut self, name: &str) -> Result<Vec<u8>, DocxError> {
        let path = &self.path;
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(DocxError::MissingPart {
                    path: path.clone(),
                    part: name.to_string(),
                });
            }
            Err(e) => return Err(zip_error(path)(e)),
        };

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).map_err(io_error(path))?;
        Ok(bytes)
    }

    /// Build a new archive in memory.
    ///
    /// Parts for which `select` returns true are passed through `transform`
    /// and stored with its output; every other entry is copied unchanged,
    /// compressed bytes included.
    pub fn rewrite<E, S, F>(&mut self, select: S, mut transform: F) -> Result<Vec<u8>, E>
    where
        E: From<DocxError>,
        S: Fn(&str) -> bool,
        F: FnMut(&str, &[u8]) -> Result<Vec<u8>, E>,
    {
        let path = &self.path;
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for index in 0..self.archive.len() {
            let name = self
                .archive
                .by_index_raw(index)
                .map_err(zip_error(path))?
                .name()
                .to_string();

            if select(&name) {
                let mut original = Vec::new();
                self.archive
                    .by_index(index)
                    .map_err(zip_error(path))?
                    .read_to_end(&mut original)
                    .map_err(io_error(path))?;

                let rendered = transform(&name, &original)?;
                debug!("Rewrote part {name} ({} -> {} bytes)", original.len(), rendered.len());

                writer.start_file(name.as_str(), options).map_err(zip_error(path))?;
                writer.write_all(&rendered).map_err(io_error(path))?;
            } else {
                let entry = self.archive.by_index_raw(index).map_err(zip_error(path))?;
                writer.raw_copy_file(entry).map_err(zip_error(path))?;
            }
        }

        let cursor = writer.finish().map_err(zip_error(path))?;
        Ok(cursor.into_inner())
    }
}

fn zip_error(path: &Path) -> impl Fn(ZipError) -> DocxError + '_ {
    move |source| DocxError::Zip { path: path.to_path_buf(), source }
}

fn io_error(path: &Path) -> impl Fn(std::io::Error) -> DocxError + '_ {
    move |source| DocxError::Io { path: path.to_path_buf(), source }
}
