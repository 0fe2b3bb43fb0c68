//! Target container platform resolution.
//!
//! An explicit `--platform` value wins. Otherwise the host architecture is
//! mapped: 64-bit ARM becomes `linux/arm64`, everything else `linux/amd64`.

use std::fmt;

/// Container platform passed to the build tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    /// `linux/amd64`
    LinuxAmd64,
    /// `linux/arm64`
    LinuxArm64,
    /// Any other platform string given explicitly by the user
    Explicit(String),
}

impl Platform {
    /// Parse an explicit platform string, normalizing the two well-known values
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "linux/amd64" => Platform::LinuxAmd64,
            "linux/arm64" => Platform::LinuxArm64,
            other => Platform::Explicit(other.to_string()),
        }
    }

    /// Map a host architecture name to a container platform.
    ///
    /// Total over all inputs: unknown architectures fall back to amd64.
    pub fn from_host_arch(arch: &str) -> Self {
        match arch.trim().to_ascii_lowercase().as_str() {
            "arm64" | "aarch64" => Platform::LinuxArm64,
            _ => Platform::LinuxAmd64,
        }
    }

    /// Explicit value if present and non-blank, otherwise derived from `host_arch`
    pub fn resolve(explicit: Option<&str>, host_arch: &str) -> Self {
        match explicit.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => Platform::parse(value),
            None => {
                let platform = Platform::from_host_arch(host_arch);
                log::debug!("Host architecture '{}' resolved to {}", host_arch, platform);
                platform
            }
        }
    }

    /// Platform string as understood by `docker buildx --platform`
    pub fn as_str(&self) -> &str {
        match self {
            Platform::LinuxAmd64 => "linux/amd64",
            Platform::LinuxArm64 => "linux/arm64",
            Platform::Explicit(value) => value,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Architecture of the host this process runs on
pub fn host_arch() -> &'static str {
    std::env::consts::ARCH
}
