//! Sequential build-and-deploy driver.
//!
//! Stages run strictly in order and each one's success gates the next:
//! acquire, patch, build, reconcile. Nothing is retried. Cleanup is offered
//! after every terminal state once the working directory is in play.

mod cleanup;
mod toolchain;

pub use cleanup::offer_cleanup;
pub use toolchain::{SystemToolchain, Toolchain};

use crate::cli::{Confirm, RuntimeConfig};
use crate::compose::{self, LocatorContext, ServiceConfigLocation, ServiceConfigPatch};
use crate::docker::BuildPath;
use crate::error::Result;
use crate::patch::{self, PatchRecord};
use crate::{BuildRequest, Upstream, source};
use std::path::PathBuf;

/// What happened to the service configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The service now points at the new image
    Updated(ServiceConfigPatch),
    /// The user declined the update
    Declined,
    /// No candidate file exists
    NotFound {
        /// Candidates probed, in order
        searched: Vec<PathBuf>,
    },
}

/// Record of a completed build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Dockerfile rewrite, absent for the "all" selection
    pub patch: Option<PatchRecord>,
    /// Build path that produced the image
    pub build_path: BuildPath,
    /// Service configuration result
    pub service_config: ReconcileOutcome,
    /// Whether the working directory was removed afterwards
    pub cleaned_up: bool,
}

/// Terminal state of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The user declined to start the build; nothing was touched
    Cancelled,
    /// The image was built
    Built(BuildReport),
}

/// One configured pipeline run
pub struct Pipeline<'a, T, C> {
    request: BuildRequest,
    upstream: Upstream,
    service: String,
    locator: LocatorContext,
    toolchain: T,
    confirm: C,
    runtime_config: &'a RuntimeConfig,
}

impl<'a, T: Toolchain, C: Confirm> Pipeline<'a, T, C> {
    /// Create a pipeline for `request`
    pub fn new(
        request: BuildRequest,
        upstream: Upstream,
        service: impl Into<String>,
        locator: LocatorContext,
        toolchain: T,
        confirm: C,
        runtime_config: &'a RuntimeConfig,
    ) -> Self {
        Self {
            request,
            upstream,
            service: service.into(),
            locator,
            toolchain,
            confirm,
            runtime_config,
        }
    }

    /// The request this pipeline runs
    pub fn request(&self) -> &BuildRequest {
        &self.request
    }

    /// The toolchain this pipeline drives
    pub fn toolchain(&self) -> &T {
        &self.toolchain
    }

    /// Run every stage to a terminal state
    pub async fn run(&self) -> Result<PipelineOutcome> {
        self.print_plan();

        if !self.confirm.confirm("Proceed with build?")? {
            self.runtime_config.info("Build cancelled");
            return Ok(PipelineOutcome::Cancelled);
        }

        // A stale directory belongs to an earlier run; it is reported, not cleaned
        source::ensure_destination_clear(&self.request.work_dir)?;

        let result = self.run_stages().await;
        let cleaned_up = offer_cleanup(&self.request.work_dir, &self.confirm, self.runtime_config).await;

        match (result, cleaned_up) {
            (Ok(mut report), cleaned_up) => {
                report.cleaned_up = cleaned_up?;
                Ok(PipelineOutcome::Built(report))
            }
            (Err(e), Err(cleanup_err)) => {
                log::warn!("Cleanup after failure also failed: {}", cleanup_err);
                Err(e)
            }
            (Err(e), Ok(_)) => Err(e),
        }
    }

    fn print_plan(&self) {
        let config = self.runtime_config;
        config.section("Custom DevDocs image");
        config.indent(&format!("Documentation: {}", self.request.selection));
        config.indent(&format!("Platform:      {}", self.request.platform));
        config.indent(&format!("Image:         {}", self.request.image_name));
        config.indent(&format!("Working dir:   {}", self.request.work_dir.display()));
        config.indent(&format!(
            "Upstream:      {} ({})",
            self.upstream.url, self.upstream.reference
        ));
    }

    async fn run_stages(&self) -> Result<BuildReport> {
        let config = self.runtime_config;
        let work_dir = &self.request.work_dir;

        config.progress(&format!("Cloning {} into {}", self.upstream.url, work_dir.display()));
        self.toolchain.fetch(&self.upstream, work_dir).await?;
        log::info!("Acquired upstream source in {}", work_dir.display());

        let patch = patch::patch_build_definition(work_dir, &self.request.selection).await?;
        match &patch {
            Some(record) => config.success(&format!(
                "Restricted {} to: {} (backup: {})",
                patch::BUILD_DEFINITION,
                record.applied_selection.join(" "),
                record.backup_file.display()
            )),
            None => config.info("Building every documentation set; Dockerfile left unchanged"),
        }

        config.progress(&format!("Building image {}", self.request.image_name));
        let build_path = self.toolchain.build(&self.request, config).await?;

        let service_config = self.reconcile_service_config().await?;

        Ok(BuildReport {
            patch,
            build_path,
            service_config,
            cleaned_up: false,
        })
    }

    async fn reconcile_service_config(&self) -> Result<ReconcileOutcome> {
        let config = self.runtime_config;

        let path = match compose::locate(&self.locator) {
            ServiceConfigLocation::Found(path) => path,
            ServiceConfigLocation::NotFound { searched } => {
                config.warn(&format!(
                    "No {} found; update your service configuration manually",
                    compose::COMPOSE_FILE
                ));
                for candidate in &searched {
                    config.indent(&candidate.display().to_string());
                }
                return Ok(ReconcileOutcome::NotFound { searched });
            }
        };

        let prompt = format!(
            "Update service '{}' in {} to use {}?",
            self.service,
            path.display(),
            self.request.image_name
        );
        if !self.confirm.confirm(&prompt)? {
            config.info("Service configuration left unchanged");
            return Ok(ReconcileOutcome::Declined);
        }

        let patch = compose::reconcile(&path, &self.service, &self.request.image_name).await?;
        config.success(&format!(
            "Updated {} (backup: {})",
            patch.config_file.display(),
            patch.backup_file.display()
        ));
        Ok(ReconcileOutcome::Updated(patch))
    }
}
