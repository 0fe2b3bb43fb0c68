//! # DevDocs Custom
//!
//! Builds a reduced-size DevDocs server image that embeds only the selected
//! documentation sets, then points the local compose service at it.
//!
//! ## Pipeline
//!
//! 1. Resolve the selection and target platform from the command line
//! 2. Clone the pinned upstream DevDocs tree into a working directory
//! 3. Restrict the Dockerfile's documentation download to the selection
//! 4. Build the image with `docker buildx` (or plain `docker build`)
//! 5. Optionally rewrite the `image:` of the compose service, keeping a backup
//! 6. Optionally remove the working directory
//!
//! ## Usage
//!
//! ```bash
//! devdocs-custom svelte tailwindcss
//! devdocs-custom --frontend --image devdocs-frontend:latest
//! devdocs-custom --all --platform linux/arm64
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod compose;
pub mod docker;
pub mod error;
pub mod patch;
pub mod pipeline;
pub mod selection;
pub mod source;
pub mod utils;

pub use cli::Args;
pub use docker::Platform;
pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, PipelineOutcome};
pub use selection::{Selection, Shorthand};

use std::path::PathBuf;

/// Default tag for the built image
pub const DEFAULT_IMAGE_NAME: &str = "devdocs-custom:latest";

/// Fully resolved inputs for one pipeline run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Documentation sets to embed
    pub selection: Selection,
    /// Target container platform
    pub platform: Platform,
    /// Tag given to the built image
    pub image_name: String,
    /// Ephemeral directory the upstream tree is cloned into
    pub work_dir: PathBuf,
}

/// Pinned upstream repository reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    /// Clone URL
    pub url: String,
    /// Branch or tag to check out
    pub reference: String,
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            url: "https://github.com/freeCodeCamp/devdocs.git".to_string(),
            reference: "main".to_string(),
        }
    }
}
