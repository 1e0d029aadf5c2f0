mod common;

use common::{paragraph, split_paragraph, table, write_docx};
use docfill_core::vars::SourceKind;
use docfill_core::{EngineError, analyze_document};
use std::fs;
use tempfile::tempdir;

#[test]
fn contract_template_yields_ordered_registry() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("contract.docx");
    let body = format!(
        "{}{}",
        paragraph("Contract for {{ v1 }} dated {{ v2 }}"),
        table(&[&["Item", "Desc: {{ v3 }}", "$100"]]),
    );
    write_docx(&path, &body, &[]);

    let vars = analyze_document(&path).expect("analyze ok");

    insta::assert_json_snapshot!(vars, @r#"
    [
      {
        "id": "v1",
        "original_tag": "v1",
        "context": "Contract for {{ v1 }} dated {{ v2 }}",
        "type": "paragraph"
      },
      {
        "id": "v2",
        "original_tag": "v2",
        "context": "Contract for {{ v1 }} dated {{ v2 }}",
        "type": "paragraph"
      },
      {
        "id": "v3",
        "original_tag": "v3",
        "context": "Item | Desc: {{ v3 }} | $100",
        "type": "table_row"
      }
    ]
    "#);
}

#[test]
fn table_occurrence_beats_earlier_paragraph() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("form.docx");
    let body = format!(
        "{}{}",
        paragraph("Applicant: {{ V4 }}"),
        table(&[&["Applicant name", "{{ v4 }}"]]),
    );
    write_docx(&path, &body, &[]);

    let vars = analyze_document(&path).unwrap();
    assert_eq!(vars.len(), 1);
    assert_eq!(vars[0].source_kind, SourceKind::TableRow);
    assert_eq!(vars[0].original_tag, "v4");
    assert_eq!(vars[0].context, "Applicant name | {{ v4 }}");
}

#[test]
fn first_table_row_wins() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("form.docx");
    let body = format!(
        "{}{}",
        table(&[&["Start date", "{{ v5 }}"], &["Again", "{{ v5 }}"]]),
        table(&[&["Elsewhere", "{{ V5 }}"]]),
    );
    write_docx(&path, &body, &[]);

    let vars = analyze_document(&path).unwrap();
    assert_eq!(vars.len(), 1);
    assert_eq!(vars[0].context, "Start date | {{ v5 }}");
}

#[test]
fn tags_split_across_runs_are_found() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("split.docx");
    write_docx(&path, &split_paragraph(&["Fee: {", "{ v", "12 }", "}"]), &[]);

    let vars = analyze_document(&path).unwrap();
    assert_eq!(vars.len(), 1);
    assert_eq!(vars[0].id, "v12");
    assert_eq!(vars[0].context, "Fee: {{ v12 }}");
}

#[test]
fn non_breaking_spaces_are_normalized() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("nbsp.docx");
    write_docx(&path, &paragraph("\u{a0}Total:\u{a0}{{ v2 }}\u{a0}"), &[]);

    let vars = analyze_document(&path).unwrap();
    assert_eq!(vars[0].context, "Total: {{ v2 }}");
}

#[test]
fn ids_are_canonical_and_strictly_ascending() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("many.docx");
    let body = format!(
        "{}{}{}",
        paragraph("{{ V20 }} {{ v3 }} {{ name }}"),
        table(&[&["{{ v11 }}", "{{v1}}"], &["{{ v3 }}", "{{ V100 }}"]]),
        paragraph("{{v2}}"),
    );
    write_docx(&path, &body, &[]);

    let vars = analyze_document(&path).unwrap();
    let re = regex::Regex::new(r"^v[0-9]+$").unwrap();
    assert!(vars.iter().all(|v| re.is_match(&v.id)));

    let numbers: Vec<u64> = vars.iter().map(|v| v.number().unwrap()).collect();
    assert_eq!(numbers, vec![1, 2, 3, 11, 20, 100]);
    assert!(numbers.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn scanning_twice_gives_identical_results() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("again.docx");
    let body = format!(
        "{}{}",
        table(&[&["A", "{{ v2 }}"], &["B", "{{ v1 }}"]]),
        paragraph("{{ v3 }}"),
    );
    write_docx(&path, &body, &[]);

    assert_eq!(analyze_document(&path).unwrap(), analyze_document(&path).unwrap());
}

#[test]
fn document_without_tags_is_empty() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("plain.docx");
    write_docx(&path, &paragraph("Nothing to fill {{ here }}"), &[]);

    assert!(analyze_document(&path).unwrap().is_empty());
}

#[test]
fn missing_file_is_template_not_found() {
    let tmp = tempdir().unwrap();
    let err = analyze_document(&tmp.path().join("absent.docx")).unwrap_err();
    assert!(matches!(err, EngineError::TemplateNotFound(_)), "got {err:?}");
}

#[test]
fn non_zip_file_is_a_parse_error() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("fake.docx");
    fs::write(&path, "dummy docx content").unwrap();

    let err = analyze_document(&path).unwrap_err();
    assert!(matches!(err, EngineError::DocumentParse { .. }), "got {err:?}");
}
