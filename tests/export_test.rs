//! Integration tests for export actions and artifacts.

use sheetflow::export::{
    export_vector, run_export, sanitize_identifier, Artifact, ArtifactSink, DirectorySink,
    ExportAction, ExportNotice, ExportOptions,
};
use sheetflow::{Error, Result};
use tempfile::TempDir;

const DRAFT: &str = "# Charge Sheet\nFIR No: 12/2024\n- Knife recovered\nThe accused fled.";

fn has_open_action(bytes: &[u8]) -> bool {
    let pdf = lopdf::Document::load_mem(bytes).unwrap();
    pdf.catalog().unwrap().has(b"OpenAction")
}

// ============================================================================
// Naming
// ============================================================================

#[test]
fn test_filename_from_identifier() {
    let options = ExportOptions::default().with_identifier("FIR 12/2024!");
    assert_eq!(options.filename(), "ChargeSheet_FIR_12_2024_.pdf");
}

#[test]
fn test_filename_without_identifier() {
    assert_eq!(ExportOptions::default().filename(), "ChargeSheet_Draft.pdf");
    assert_eq!(sanitize_identifier(Some("")), "Draft");
}

#[test]
fn test_custom_prefix() {
    let options = ExportOptions::default()
        .with_prefix("Report")
        .with_identifier("A-1");
    assert_eq!(options.filename(), "Report_A-1.pdf");
}

// ============================================================================
// Actions
// ============================================================================

#[test]
fn test_download_writes_file() {
    let dir = TempDir::new().unwrap();
    let sink = DirectorySink::new(dir.path());
    let options = ExportOptions::default().with_identifier("FIR 7");

    let artifact = run_export(ExportAction::Download, &sink, || export_vector(DRAFT, &options))
        .unwrap();

    let path = dir.path().join("ChargeSheet_FIR_7.pdf");
    assert_eq!(sink.path_for(&artifact), path);
    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, artifact.bytes);
    assert!(!has_open_action(&written));
}

#[test]
fn test_print_adds_open_action() {
    let dir = TempDir::new().unwrap();
    let sink = DirectorySink::new(dir.path());
    let options = ExportOptions::default();

    let artifact =
        run_export(ExportAction::Print, &sink, || export_vector(DRAFT, &options)).unwrap();
    assert!(has_open_action(&artifact.bytes));
    assert_eq!(artifact.page_count, 1);

    let pdf = lopdf::Document::load_mem(&artifact.bytes).unwrap();
    assert_eq!(pdf.get_pages().len(), 1);
}

#[test]
fn test_print_and_download_share_page_count() {
    let dir = TempDir::new().unwrap();
    let sink = DirectorySink::new(dir.path());
    let text = "Line of text\n".repeat(120);
    let options = ExportOptions::default();

    let printed = run_export(ExportAction::Print, &sink, || export_vector(&text, &options)).unwrap();
    let downloaded =
        run_export(ExportAction::Download, &sink, || export_vector(&text, &options)).unwrap();
    assert_eq!(printed.page_count, downloaded.page_count);
    assert!(printed.page_count > 1);
}

/// Sink that always refuses.
struct RefusingSink;

impl ArtifactSink for RefusingSink {
    fn download(&self, _artifact: &Artifact) -> Result<()> {
        Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }

    fn print(&self, artifact: &Artifact) -> Result<()> {
        self.download(artifact)
    }
}

#[test]
fn test_sink_failure_becomes_notice() {
    let options = ExportOptions::default();
    let outcome = run_export(ExportAction::Download, &RefusingSink, || {
        export_vector(DRAFT, &options)
    });
    let notice = outcome.unwrap_err();
    assert_eq!(notice.message(), ExportNotice::FAILED_MESSAGE);
}

#[test]
fn test_unsupported_notice() {
    let outcome = run_export(ExportAction::Print, &RefusingSink, || {
        Err(Error::UnsupportedCapability("no canvas".into()))
    });
    assert_eq!(
        outcome.unwrap_err(),
        ExportNotice::Unsupported {
            message: "PDF export is not supported in this environment.".to_string()
        }
    );
}

#[test]
fn test_notice_serializes_with_kind() {
    let notice = ExportNotice::from_error(&Error::EmptyCapture);
    let json = serde_json::to_value(&notice).unwrap();
    assert_eq!(json["kind"], "failed");
    assert_eq!(json["message"], ExportNotice::FAILED_MESSAGE);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_options_from_partial_json() {
    let options = ExportOptions::from_json(
        r#"{ "identifier": "FIR 9", "page_numbers": true, "signature": { "signatory": "SHO" } }"#,
    )
    .unwrap();
    assert_eq!(options.filename(), "ChargeSheet_FIR_9.pdf");
    assert!(options.page_numbers);
    assert_eq!(options.signature.signatory, "SHO");
    assert_eq!(options.prefix, "ChargeSheet");
}

#[test]
fn test_options_from_bad_json() {
    let err = ExportOptions::from_json("{ not json").unwrap_err();
    assert!(matches!(err, Error::InvalidOptions(_)));
}
