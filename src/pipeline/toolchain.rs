//! External tools the pipeline drives.
//!
//! The driver only talks to `git` and `docker` through [`Toolchain`], so the
//! stage ordering and backup guarantees can be exercised without either.

use crate::cli::RuntimeConfig;
use crate::docker::{self, BuildPath};
use crate::error::Result;
use crate::{BuildRequest, Upstream, source};
use std::future::Future;
use std::path::Path;

/// Trait defining the external process invocations of one pipeline run
pub trait Toolchain {
    /// Fetch `upstream` into `dest`. `dest` is missing or empty when called.
    fn fetch(&self, upstream: &Upstream, dest: &Path) -> impl Future<Output = Result<()>>;

    /// Build the image described by `request` from its working directory
    fn build(
        &self,
        request: &BuildRequest,
        runtime_config: &RuntimeConfig,
    ) -> impl Future<Output = Result<BuildPath>>;
}

/// `git` and `docker` on the host
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemToolchain;

impl Toolchain for SystemToolchain {
    async fn fetch(&self, upstream: &Upstream, dest: &Path) -> Result<()> {
        Ok(source::clone_upstream(upstream, dest).await?)
    }

    async fn build(&self, request: &BuildRequest, runtime_config: &RuntimeConfig) -> Result<BuildPath> {
        Ok(docker::build_image(request, runtime_config).await?)
    }
}
