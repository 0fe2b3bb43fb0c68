//! Build definition patching.
//!
//! The upstream Dockerfile downloads every documentation set with a single
//! `thor docs:download --all` line. To embed only the selection, that line is
//! kept as a comment and followed by the same line with `--all` replaced by
//! the selected identifiers.
//!
//! # Ordering
//!
//! 1. Read the Dockerfile and locate the anchor line
//! 2. Fail unless the anchor appears exactly once (nothing is written)
//! 3. Write `Dockerfile.backup` and flush it to disk
//! 4. Only then overwrite `Dockerfile`

use crate::Selection;
use crate::error::{PatchError, Result};
use crate::utils::fs::{write_backup, write_synced};
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Build definition file name inside the upstream tree
pub const BUILD_DEFINITION: &str = "Dockerfile";

/// Text identifying the line that downloads all documentation sets
pub const DOWNLOAD_ALL_ANCHOR: &str = "thor docs:download --all";

// `--all` must end at whitespace or end of line so `--all-versions` is not an anchor
static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"thor\s+docs:download\s+--all(\s|$)").expect("anchor regex is valid")
});

/// Proof that the build definition was backed up before it was rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRecord {
    /// Rewritten file
    pub original_file: PathBuf,
    /// Unmodified copy written before the rewrite
    pub backup_file: PathBuf,
    /// Identifiers the new download line is restricted to
    pub applied_selection: Vec<String>,
}

/// Rewrite the download line of `contents` to fetch only `docs`.
///
/// `path` is only used in error messages.
pub fn rewrite_download_line(contents: &str, docs: &[String], path: &Path) -> Result<String> {
    let count = contents
        .lines()
        .filter(|line| ANCHOR_RE.is_match(line))
        .count();
    match count {
        0 => {
            return Err(PatchError::AnchorMissing {
                path: path.to_path_buf(),
                anchor: DOWNLOAD_ALL_ANCHOR.to_string(),
            }
            .into());
        }
        1 => {}
        count => {
            return Err(PatchError::AnchorAmbiguous {
                path: path.to_path_buf(),
                anchor: DOWNLOAD_ALL_ANCHOR.to_string(),
                count,
            }
            .into());
        }
    }

    let replacement = format!("thor docs:download {}", docs.join(" "));
    let mut patched = String::with_capacity(contents.len() + replacement.len() + 8);

    for segment in contents.split_inclusive('\n') {
        let (line, ending) = split_line_ending(segment);
        if !ANCHOR_RE.is_match(line) {
            patched.push_str(segment);
            continue;
        }

        let body = line.trim_start();
        let indent = &line[..line.len() - body.len()];
        // A terminator is needed between the two lines even if the anchor was last
        let separator = if ending.is_empty() { "\n" } else { ending };

        patched.push_str(indent);
        patched.push_str("# ");
        patched.push_str(body);
        patched.push_str(separator);
        patched.push_str(&ANCHOR_RE.replace(line, |caps: &Captures<'_>| {
            format!("{}{}", replacement, &caps[1])
        }));
        patched.push_str(ending);
    }

    Ok(patched)
}

fn split_line_ending(segment: &str) -> (&str, &str) {
    if let Some(line) = segment.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = segment.strip_suffix('\n') {
        (line, "\n")
    } else {
        (segment, "")
    }
}

/// Restrict the build definition in `work_dir` to `selection`.
///
/// Returns `None` without touching anything for [`Selection::All`].
pub async fn patch_build_definition(
    work_dir: &Path,
    selection: &Selection,
) -> Result<Option<PatchRecord>> {
    if selection.is_all() {
        log::info!("Selection is 'all'; leaving {} unchanged", BUILD_DEFINITION);
        return Ok(None);
    }

    let original_file = work_dir.join(BUILD_DEFINITION);
    let original = tokio::fs::read(&original_file).await?;
    let text = std::str::from_utf8(&original).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{} is not valid UTF-8: {}", original_file.display(), e),
        )
    })?;

    let patched = rewrite_download_line(text, selection.identifiers(), &original_file)?;

    let backup_file = write_backup(&original_file, &original).await?;
    write_synced(&original_file, patched.as_bytes()).await?;

    Ok(Some(PatchRecord {
        original_file,
        backup_file,
        applied_selection: selection.identifiers().to_vec(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCKERFILE: &str = "FROM ruby:3.4.1\n\
        WORKDIR /devdocs\n\
        RUN bundle install --system && \\\n    \
        thor docs:download --all && \\\n    \
        thor assets:compile && \\\n    \
        rm -rf /tmp\n\
        CMD rackup -o 0.0.0.0\n";

    fn docs(ids: &[&str]) -> Selection {
        Selection::Docs(ids.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_rewrite_comments_out_original_line() {
        let patched = rewrite_download_line(
            DOCKERFILE,
            &["svelte".to_string(), "tailwindcss".to_string()],
            Path::new("Dockerfile"),
        )
        .unwrap();

        assert!(patched.contains("    # thor docs:download --all && \\\n"));
        assert!(patched.contains("    thor docs:download svelte tailwindcss && \\\n"));
        assert!(patched.contains("thor assets:compile"));
        assert_eq!(patched.lines().count(), DOCKERFILE.lines().count() + 1);
    }

    #[test]
    fn test_rewrite_preserves_crlf() {
        let contents = "RUN thor docs:download --all\r\nCMD x\r\n";
        let patched =
            rewrite_download_line(contents, &["go".to_string()], Path::new("Dockerfile")).unwrap();
        assert_eq!(
            patched,
            "# RUN thor docs:download --all\r\nRUN thor docs:download go\r\nCMD x\r\n"
        );
    }

    #[test]
    fn test_missing_anchor_is_an_error() {
        let err = rewrite_download_line("FROM ruby\n", &["go".to_string()], Path::new("Dockerfile"))
            .unwrap_err();
        assert!(matches!(
            err,
            crate::PipelineError::Patch(PatchError::AnchorMissing { .. })
        ));
    }

    #[test]
    fn test_longer_option_is_not_the_anchor() {
        let contents = "RUN thor docs:download --all-versions x\n";
        let err =
            rewrite_download_line(contents, &["a".to_string()], Path::new("Dockerfile")).unwrap_err();
        assert!(matches!(
            err,
            crate::PipelineError::Patch(PatchError::AnchorMissing { .. })
        ));
    }

    #[test]
    fn test_anchor_at_end_of_file_without_newline() {
        let patched = rewrite_download_line(
            "RUN thor docs:download --all",
            &["go".to_string()],
            Path::new("Dockerfile"),
        )
        .unwrap();
        assert_eq!(patched, "# RUN thor docs:download --all\nRUN thor docs:download go");
    }

    #[test]
    fn test_duplicate_anchor_is_an_error() {
        let contents = "RUN thor docs:download --all\nRUN thor docs:download --all\n";
        let err =
            rewrite_download_line(contents, &["go".to_string()], Path::new("Dockerfile")).unwrap_err();
        assert!(matches!(
            err,
            crate::PipelineError::Patch(PatchError::AnchorAmbiguous { count: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_patch_writes_identical_backup() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(BUILD_DEFINITION), DOCKERFILE).unwrap();

        let record = patch_build_definition(tmp.path(), &docs(&["svelte"]))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.backup_file, tmp.path().join("Dockerfile.backup"));
        assert_eq!(std::fs::read_to_string(&record.backup_file).unwrap(), DOCKERFILE);
        assert_eq!(record.applied_selection, ["svelte"]);
        let patched = std::fs::read_to_string(&record.original_file).unwrap();
        assert!(patched.contains("thor docs:download svelte && \\"));
    }

    #[tokio::test]
    async fn test_failed_patch_leaves_no_backup() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(BUILD_DEFINITION), "FROM ruby\n").unwrap();

        assert!(patch_build_definition(tmp.path(), &docs(&["svelte"])).await.is_err());
        assert!(!tmp.path().join("Dockerfile.backup").exists());
        assert_eq!(
            std::fs::read_to_string(tmp.path().join(BUILD_DEFINITION)).unwrap(),
            "FROM ruby\n"
        );
    }

    #[tokio::test]
    async fn test_all_selection_skips_patch() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(BUILD_DEFINITION), DOCKERFILE).unwrap();

        assert!(
            patch_build_definition(tmp.path(), &Selection::All)
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(
            std::fs::read_to_string(tmp.path().join(BUILD_DEFINITION)).unwrap(),
            DOCKERFILE
        );
        assert!(!tmp.path().join("Dockerfile.backup").exists());
    }
}
