use spendcat_ingest::{process_files, read_image_payload, FileKind, IngestError};
use std::fs;

#[test]
fn test_mixed_batch_keeps_order_and_skips_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("icici_sept.csv");
    let png = dir.path().join("card.png");
    let pdf = dir.path().join("statement.pdf");
    fs::write(&csv, "Date,Description,Amount\n03/09/2026,BigBasket,1210.40\n").unwrap();
    fs::write(&png, b"\x89PNG\r\n\x1a\n").unwrap();
    fs::write(&pdf, b"%PDF-1.7").unwrap();

    let files = process_files(&[csv.clone(), pdf, png.clone()], 0).unwrap();
    assert_eq!(files.len(), 2);

    assert_eq!(files[0].id, "file-0");
    assert_eq!(files[0].kind, FileKind::Spreadsheet);
    assert_eq!(files[0].name, "icici_sept.csv");
    let text = files[0].parsed_text.as_deref().unwrap();
    assert!(text.starts_with("File: icici_sept.csv\nSheet: icici_sept\n"));
    assert!(text.contains("\"BigBasket\",1210.4"));

    assert_eq!(files[1].id, "file-1");
    assert!(files[1].is_image());
    assert_eq!(files[1].parsed_text, None);

    let payload = read_image_payload(&files[1]).unwrap();
    assert_eq!(payload.mime_type, "image/png");
    assert_eq!(payload.data, "iVBORw0KGgo=");
}

#[test]
fn test_ids_continue_from_offset() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("a.csv");
    fs::write(&csv, "x,1\n").unwrap();

    let files = process_files(&[csv], 4).unwrap();
    assert_eq!(files[0].id, "file-4");
}

#[test]
fn test_unreadable_workbook_is_kept_with_marker_text() {
    let dir = tempfile::tempdir().unwrap();
    let xlsx = dir.path().join("corrupt.xlsx");
    fs::write(&xlsx, b"not a workbook").unwrap();

    let files = process_files(&[xlsx], 0).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(
        files[0].parsed_text.as_deref(),
        Some("Error parsing content of corrupt.xlsx")
    );
}

#[test]
fn test_missing_file_fails_batch() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.csv");

    let err = process_files(&[missing], 0).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<IngestError>(),
        Some(IngestError::NotFound(_))
    ));
}

#[test]
fn test_spreadsheet_is_not_an_image_payload() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("a.csv");
    fs::write(&csv, "x,1\n").unwrap();

    let files = process_files(&[csv], 0).unwrap();
    assert!(read_image_payload(&files[0]).is_err());
}
