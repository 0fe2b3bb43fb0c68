//! Structured update of one service's image in a compose file.
//!
//! The document is parsed with `serde_yaml`, `services.<name>.image` is set on
//! the in-memory model and the whole document is serialized back. Sibling
//! services and other top-level keys keep their values and order. Comments and
//! original formatting are not preserved; the `.backup` copy keeps them.
//!
//! Scalar style is re-derived on output for the whole document, sibling
//! services included: redundant quotes are dropped (`"22:22"` becomes `22:22`,
//! `"yes"` becomes `yes`) and merge keys such as `<<: *common` are expanded
//! inline. YAML 1.2 readers see the same values; YAML 1.1 readers may not, so
//! diff against the backup when the file relies on quoted sexagesimal or
//! boolean-looking strings.

use crate::error::{ReconcileError, Result};
use crate::utils::fs::{write_backup, write_synced};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Compose service that runs the documentation server
pub const DEFAULT_SERVICE: &str = "devdocs";

/// Proof that the compose file was backed up before it was rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfigPatch {
    /// Rewritten file
    pub config_file: PathBuf,
    /// Verbatim copy written before the rewrite
    pub backup_file: PathBuf,
    /// Service whose image was changed
    pub service: String,
    /// Image reference before the change, if the service had one
    pub previous_image: Option<String>,
    /// Image reference after the change
    pub new_image: String,
}

/// Set `services.<service>.image` in `contents` and return the new document
/// together with the previous image reference.
pub fn set_service_image(
    contents: &str,
    service: &str,
    image: &str,
    path: &Path,
) -> Result<(String, Option<String>)> {
    let mut doc: Value = serde_yaml::from_str(contents).map_err(|e| ReconcileError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let not_found = || ReconcileError::ServiceNotFound {
        path: path.to_path_buf(),
        service: service.to_string(),
    };

    let entry = doc
        .get_mut("services")
        .and_then(|services| services.get_mut(service))
        .and_then(Value::as_mapping_mut)
        .ok_or_else(not_found)?;

    let previous = entry
        .insert(Value::from("image"), Value::from(image))
        .and_then(|old| old.as_str().map(str::to_string));

    let updated = serde_yaml::to_string(&doc).map_err(|e| ReconcileError::Serialize {
        reason: e.to_string(),
    })?;

    Ok((updated, previous))
}

/// Back up `config_file`, then point `service` at `image`.
///
/// The document is validated before anything is written, so a parse failure
/// or a missing service leaves the directory untouched.
pub async fn reconcile(config_file: &Path, service: &str, image: &str) -> Result<ServiceConfigPatch> {
    let original = tokio::fs::read(config_file).await?;
    let text = std::str::from_utf8(&original).map_err(|e| ReconcileError::Parse {
        path: config_file.to_path_buf(),
        reason: format!("not valid UTF-8: {}", e),
    })?;

    let (updated, previous_image) = set_service_image(text, service, image, config_file)?;

    let backup_file = write_backup(config_file, &original).await?;
    write_synced(config_file, updated.as_bytes()).await?;

    log::info!(
        "Updated service '{}' in {}: {} -> {}",
        service,
        config_file.display(),
        previous_image.as_deref().unwrap_or("<none>"),
        image
    );

    Ok(ServiceConfigPatch {
        config_file: config_file.to_path_buf(),
        backup_file,
        service: service.to_string(),
        previous_image,
        new_image: image.to_string(),
    })
}
