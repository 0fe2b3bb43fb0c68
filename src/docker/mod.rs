//! Docker integration for the custom image build.
//!
//! # Module Structure
//!
//! - `platform` - Target platform resolution from flags or host architecture
//! - `image` - Daemon checks and the image build itself

mod image;
mod platform;

pub use image::{BuildPath, build_command_args, build_image, buildx_available, check_docker_available};
pub use platform::{Platform, host_arch};
