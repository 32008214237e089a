//! Export actions.
//!
//! Both user actions share one generation step; they differ only in what
//! happens to the finished artifact. Print artifacts carry an open action
//! that raises the viewer's print dialog. Every failure stops here: it is
//! logged and turned into an [`ExportNotice`] for the user.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::pdf::with_auto_print;

/// Identifier used when none is supplied.
pub const DRAFT_IDENTIFIER: &str = "Draft";

/// Make an identifier safe for a filename.
///
/// Every character outside `[A-Za-z0-9_-]` becomes `_`. A missing or
/// empty identifier becomes `Draft`.
pub fn sanitize_identifier(identifier: Option<&str>) -> String {
    match identifier {
        Some(id) if !id.is_empty() => id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect(),
        _ => DRAFT_IDENTIFIER.to_string(),
    }
}

/// Build `<prefix>_<identifier>.pdf`.
pub fn artifact_filename(prefix: &str, sanitized_identifier: &str) -> String {
    format!("{}_{}.pdf", prefix, sanitized_identifier)
}

/// A generated PDF ready to hand to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Filename the artifact is saved under
    pub filename: String,
    /// PDF bytes
    pub bytes: Vec<u8>,
    /// Number of pages
    pub page_count: usize,
}

impl Artifact {
    /// Create a new artifact.
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>, page_count: usize) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            page_count,
        }
    }
}

/// What to do with a generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportAction {
    /// Open with an automatic print dialog
    Print,
    /// Save under the computed filename
    Download,
}

impl fmt::Display for ExportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportAction::Print => write!(f, "print"),
            ExportAction::Download => write!(f, "download"),
        }
    }
}

/// Receives finished artifacts.
pub trait ArtifactSink {
    /// Persist the artifact under its filename.
    fn download(&self, artifact: &Artifact) -> Result<()>;

    /// Open the artifact for printing.
    fn print(&self, artifact: &Artifact) -> Result<()>;
}

/// Sink that writes artifacts into a directory.
///
/// Print artifacts are written next to downloads; opening the file shows
/// the print dialog.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Write into `dir`, which must exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path an artifact is written to.
    pub fn path_for(&self, artifact: &Artifact) -> PathBuf {
        self.dir.join(&artifact.filename)
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn download(&self, artifact: &Artifact) -> Result<()> {
        std::fs::write(self.path_for(artifact), &artifact.bytes)?;
        Ok(())
    }

    fn print(&self, artifact: &Artifact) -> Result<()> {
        std::fs::write(self.path_for(artifact), &artifact.bytes)?;
        Ok(())
    }
}

/// User-facing outcome of a failed export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportNotice {
    /// The environment cannot produce this export
    Unsupported {
        /// Message shown to the user
        message: String,
    },
    /// Generation or delivery failed
    Failed {
        /// Message shown to the user
        message: String,
    },
}

impl ExportNotice {
    /// Message shown when bitmap capture is unavailable.
    pub const UNSUPPORTED_MESSAGE: &'static str =
        "PDF export is not supported in this environment.";

    /// Message shown for any other failure.
    pub const FAILED_MESSAGE: &'static str = "Failed to generate PDF. Please try again.";

    /// Map an error to the notice the user sees.
    pub fn from_error(error: &Error) -> Self {
        match error {
            Error::UnsupportedCapability(_) => ExportNotice::Unsupported {
                message: Self::UNSUPPORTED_MESSAGE.to_string(),
            },
            _ => ExportNotice::Failed {
                message: Self::FAILED_MESSAGE.to_string(),
            },
        }
    }

    /// Message shown to the user.
    pub fn message(&self) -> &str {
        match self {
            ExportNotice::Unsupported { message } | ExportNotice::Failed { message } => message,
        }
    }
}

impl fmt::Display for ExportNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ExportNotice {}

/// Run a synchronous export and deliver the artifact.
pub fn run_export<S>(
    action: ExportAction,
    sink: &S,
    generate: impl FnOnce() -> Result<Artifact>,
) -> std::result::Result<Artifact, ExportNotice>
where
    S: ArtifactSink + ?Sized,
{
    let result = generate().and_then(|artifact| deliver(action, sink, artifact));
    into_notice(action, result)
}

/// Run an export whose generation step is asynchronous.
pub async fn run_export_async<S, F>(
    action: ExportAction,
    sink: &S,
    generate: F,
) -> std::result::Result<Artifact, ExportNotice>
where
    S: ArtifactSink + ?Sized,
    F: Future<Output = Result<Artifact>>,
{
    let result = match generate.await {
        Ok(artifact) => deliver(action, sink, artifact),
        Err(e) => Err(e),
    };
    into_notice(action, result)
}

fn deliver<S>(action: ExportAction, sink: &S, artifact: Artifact) -> Result<Artifact>
where
    S: ArtifactSink + ?Sized,
{
    let artifact = match action {
        ExportAction::Print => Artifact {
            bytes: with_auto_print(&artifact.bytes)?,
            ..artifact
        },
        ExportAction::Download => artifact,
    };

    match action {
        ExportAction::Print => sink.print(&artifact)?,
        ExportAction::Download => sink.download(&artifact)?,
    }

    log::info!(
        "{} {} ({} page(s), {} bytes)",
        action,
        artifact.filename,
        artifact.page_count,
        artifact.bytes.len()
    );
    Ok(artifact)
}

fn into_notice(
    action: ExportAction,
    result: Result<Artifact>,
) -> std::result::Result<Artifact, ExportNotice> {
    result.map_err(|e| {
        log::error!("PDF {} failed: {}", action, e);
        ExportNotice::from_error(&e)
    })
}
