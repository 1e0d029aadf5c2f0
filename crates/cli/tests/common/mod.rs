#![allow(dead_code)]

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

pub fn write(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Config whose profile `default` lives under `root`.
pub fn write_config(root: &Path, extra: &str) -> PathBuf {
    let cfg = root.join("config.toml");
    let toml = format!(
        r#"
version = 1
profile = "default"

[profiles.default]
root = "{root}"
templates_dir = "{{{{root}}}}/templates"
output_dir    = "{{{{root}}}}/out"
{extra}
"#,
        root = root.display(),
    );
    write(&cfg, &toml);
    cfg
}

pub fn paragraph(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
}

pub fn row(cells: &[&str]) -> String {
    let cells: String = cells.iter().map(|c| format!("<w:tc>{}</w:tc>", paragraph(c))).collect();
    format!("<w:tbl><w:tr>{cells}</w:tr></w:tbl>")
}

/// Minimal `.docx` with `body` as the document body.
pub fn write_docx(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut zip = ZipWriter::new(fs::File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
        .unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(document.as_bytes()).unwrap();
    zip.finish().unwrap();
}

pub fn read_document(path: &Path) -> String {
    let mut archive = ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut out = String::new();
    archive.by_name("word/document.xml").unwrap().read_to_string(&mut out).unwrap();
    out
}

/// The single file written to `dir`.
pub fn only_file(dir: &Path) -> PathBuf {
    let mut entries: Vec<PathBuf> =
        fs::read_dir(dir).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(entries.len(), 1, "expected one file in {}", dir.display());
    entries.remove(0)
}
