//! Upstream source acquisition.
//!
//! Shallow-clones the pinned upstream tree into the working directory. There
//! is no partial-state recovery: a failed clone leaves whatever `git` wrote,
//! and the caller clears the directory before re-running.

use crate::Upstream;
use crate::error::AcquisitionError;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Fails if `dest` exists and holds any entry.
///
/// A missing directory or an empty one is accepted.
pub fn ensure_destination_clear(dest: &Path) -> Result<(), AcquisitionError> {
    match std::fs::read_dir(dest) {
        Ok(mut entries) => {
            if entries.next().is_some() {
                Err(AcquisitionError::DestinationNotEmpty {
                    path: dest.to_path_buf(),
                })
            } else {
                Ok(())
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotADirectory => {
            Err(AcquisitionError::DestinationNotEmpty {
                path: dest.to_path_buf(),
            })
        }
        Err(source) => Err(AcquisitionError::DestinationUnreadable {
            path: dest.to_path_buf(),
            source,
        }),
    }
}

/// Clone `upstream` into `dest` with `git clone --depth 1 --branch <ref>`
pub async fn clone_upstream(upstream: &Upstream, dest: &Path) -> Result<(), AcquisitionError> {
    let git = which::which("git").map_err(|_| AcquisitionError::ToolMissing {
        tool: "git".to_string(),
    })?;

    log::debug!(
        "Cloning {} ({}) into {} using {}",
        upstream.url,
        upstream.reference,
        dest.display(),
        git.display()
    );

    let output = Command::new(git)
        .args(["clone", "--depth", "1", "--branch", upstream.reference.as_str()])
        .arg(&upstream.url)
        .arg(dest)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| AcquisitionError::FetchFailed {
            url: upstream.url.clone(),
            reference: upstream.reference.clone(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AcquisitionError::FetchFailed {
            url: upstream.url.clone(),
            reference: upstream.reference.clone(),
            reason: stderr.trim().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_destination_is_clear() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(ensure_destination_clear(&tmp.path().join("work")).is_ok());
    }

    #[test]
    fn test_empty_destination_is_clear() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(ensure_destination_clear(tmp.path()).is_ok());
    }

    #[test]
    fn test_non_empty_destination_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("leftover"), "x").unwrap();
        let err = ensure_destination_clear(tmp.path()).unwrap_err();
        assert!(matches!(err, AcquisitionError::DestinationNotEmpty { .. }));
    }

    #[test]
    fn test_uninspectable_destination_is_not_a_fetch_failure() {
        let err = ensure_destination_clear(Path::new("work\0dir")).unwrap_err();
        assert!(matches!(err, AcquisitionError::DestinationUnreadable { .. }));
        assert!(err.to_string().contains("work"));
    }
}
