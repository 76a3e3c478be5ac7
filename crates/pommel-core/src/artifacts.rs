//! Failure artifacts: screenshots and video recordings.
//!
//! Artifact capture is best-effort. A test that failed already carries its
//! real error; a screenshot that cannot be taken is logged and dropped, never
//! allowed to mask the failure itself.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::driver::PageDriver;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Screenshot,
    Video,
}

/// One file captured for a finished test.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Output directory layout of a run, rooted at the output directory.
#[derive(Clone, Debug)]
pub struct RunPaths {
    root: PathBuf,
}

impl RunPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn logs(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn screenshots(&self) -> PathBuf {
        self.root.join("screenshots")
    }

    pub fn videos(&self) -> PathBuf {
        self.root.join("videos")
    }

    pub fn results(&self) -> PathBuf {
        self.root.join("results")
    }
}

/// Turn a test id into a safe file name stem.
pub fn sanitize_test_id(test_id: &str) -> String {
    test_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Screenshot the page of a failed test into the screenshots directory.
/// Returns `None` when capture is not possible, after logging why.
pub async fn capture_failure_screenshot(
    driver: &dyn PageDriver,
    paths: &RunPaths,
    test_id: &str,
) -> Option<Artifact> {
    let dir = paths.screenshots();
    if let Err(err) = std::fs::create_dir_all(&dir) {
        warn!("cannot create screenshot directory {}: {err}", dir.display());
        return None;
    }

    let path = dir.join(format!(
        "{}-{}.png",
        sanitize_test_id(test_id),
        Utc::now().format("%Y%m%d-%H%M%S")
    ));
    match driver.screenshot(&path).await {
        Ok(size_bytes) => {
            debug!("captured failure screenshot {}", path.display());
            Some(Artifact {
                kind: ArtifactKind::Screenshot,
                path,
                size_bytes,
            })
        }
        Err(err) => {
            warn!("failed to capture screenshot for '{test_id}': {err}");
            None
        }
    }
}

/// Move the page's video recording, if any, into the videos directory.
pub async fn collect_video(
    driver: &dyn PageDriver,
    paths: &RunPaths,
    test_id: &str,
) -> Option<Artifact> {
    let recorded = driver.video_path().await?;

    let dir = paths.videos();
    if let Err(err) = std::fs::create_dir_all(&dir) {
        warn!("cannot create video directory {}: {err}", dir.display());
        return None;
    }

    let extension = recorded
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("webm");
    let path = dir.join(format!(
        "{}-{}.{extension}",
        sanitize_test_id(test_id),
        Utc::now().format("%Y%m%d-%H%M%S")
    ));
    if let Err(err) = move_file(&recorded, &path) {
        warn!(
            "failed to collect video {} for '{test_id}': {err}",
            recorded.display()
        );
        return None;
    }

    let size_bytes = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    debug!("collected video {}", path.display());
    Some(Artifact {
        kind: ArtifactKind::Video,
        path,
        size_bytes,
    })
}

/// Rename, falling back to copy+remove across filesystems.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to)?;
    std::fs::remove_file(from)
}
