//! Working directory cleanup.
//!
//! Offered once the run reaches a terminal state, after success or failure.
//! It never undoes patches; backups stay wherever they were written.

use crate::cli::{Confirm, RuntimeConfig};
use crate::error::Result;
use crate::utils::fs::remove_dir_all;
use std::path::Path;

/// Ask to remove `work_dir` and remove it on a yes.
///
/// Returns whether the directory was removed. A missing directory is not offered.
pub async fn offer_cleanup<C: Confirm>(
    work_dir: &Path,
    confirm: &C,
    runtime_config: &RuntimeConfig,
) -> Result<bool> {
    if !tokio::fs::try_exists(work_dir).await? {
        return Ok(false);
    }

    let prompt = format!("Remove working directory {}?", work_dir.display());
    if !confirm.confirm(&prompt)? {
        runtime_config.info(&format!("Keeping {}", work_dir.display()));
        return Ok(false);
    }

    remove_dir_all(work_dir).await?;
    runtime_config.success(&format!("Removed {}", work_dir.display()));
    Ok(true)
}
