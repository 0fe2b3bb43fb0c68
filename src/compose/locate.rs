//! Candidate locations for the compose file.
//!
//! Order matters; the first existing candidate wins:
//!
//! 1. `<project root>/docker-compose.yml`, where the project root is the parent
//!    of the directory holding the running executable
//! 2. `<cwd>/docker-compose.yml`
//! 3. `~/.devdocs-mcp/docker-compose.yml`
//! 4. Fixed installation prefixes
//! 5. Package manager cellar globs, sorted, first match

use std::path::{Path, PathBuf};

/// Compose file name probed in every candidate directory
pub const COMPOSE_FILE: &str = "docker-compose.yml";

const WELL_KNOWN: &[&str] = &[
    "/usr/local/share/devdocs-mcp/docker-compose.yml",
    "/opt/homebrew/share/devdocs-mcp/docker-compose.yml",
];

const CELLAR_GLOBS: &[&str] = &[
    "/opt/homebrew/Cellar/devdocs-mcp/*/libexec/docker-compose.yml",
    "/usr/local/Cellar/devdocs-mcp/*/libexec/docker-compose.yml",
];

/// Inputs for computing candidate locations
#[derive(Debug, Clone, Default)]
pub struct LocatorContext {
    /// Derived project root, if it could be determined
    pub project_root: Option<PathBuf>,
    /// Directory the tool was started from
    pub cwd: PathBuf,
    /// User home directory
    pub home: Option<PathBuf>,
    /// Fixed absolute candidate files
    pub well_known: Vec<PathBuf>,
    /// Glob patterns for versioned install trees
    pub cellar_globs: Vec<String>,
}

impl LocatorContext {
    /// Context for the running process
    pub fn detect() -> std::io::Result<Self> {
        let project_root = std::env::current_exe()
            .and_then(|exe| exe.canonicalize())
            .ok()
            .and_then(|exe| project_root_for(&exe));

        Ok(Self {
            project_root,
            cwd: std::env::current_dir()?,
            home: dirs::home_dir(),
            well_known: WELL_KNOWN.iter().map(PathBuf::from).collect(),
            cellar_globs: CELLAR_GLOBS.iter().map(|g| g.to_string()).collect(),
        })
    }
}

/// Parent of the directory containing `exe`
fn project_root_for(exe: &Path) -> Option<PathBuf> {
    exe.parent()?.parent().map(Path::to_path_buf)
}

/// Ordered candidate paths for `ctx`. Glob patterns are expanded here.
pub fn candidates(ctx: &LocatorContext) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(root) = &ctx.project_root {
        paths.push(root.join(COMPOSE_FILE));
    }
    paths.push(ctx.cwd.join(COMPOSE_FILE));
    if let Some(home) = &ctx.home {
        paths.push(home.join(".devdocs-mcp").join(COMPOSE_FILE));
    }
    paths.extend(ctx.well_known.iter().cloned());

    for pattern in &ctx.cellar_globs {
        match glob::glob(pattern) {
            Ok(entries) => {
                let mut matches: Vec<PathBuf> = entries.filter_map(|entry| entry.ok()).collect();
                matches.sort();
                paths.extend(matches);
            }
            Err(e) => log::warn!("Ignoring invalid candidate pattern '{}': {}", pattern, e),
        }
    }

    paths
}

/// Result of probing the candidate list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceConfigLocation {
    /// First existing candidate
    Found(PathBuf),
    /// No candidate exists
    NotFound {
        /// Everything that was probed, in order
        searched: Vec<PathBuf>,
    },
}

/// Probe the candidates of `ctx` and return the first existing file
pub fn locate(ctx: &LocatorContext) -> ServiceConfigLocation {
    let searched = candidates(ctx);
    for path in &searched {
        log::debug!("Probing for service config: {}", path.display());
        if path.is_file() {
            return ServiceConfigLocation::Found(path.clone());
        }
    }
    ServiceConfigLocation::NotFound { searched }
}
