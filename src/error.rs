//! Error types for the custom image pipeline.
//!
//! Every stage has its own error enum with actionable messages. The top-level
//! [`PipelineError`] wraps them and supplies recovery suggestions for the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for all pipeline operations
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Command line usage errors
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    /// Upstream source acquisition errors
    #[error("Acquisition error: {0}")]
    Acquisition(#[from] AcquisitionError),

    /// Build definition patching errors
    #[error("Patch error: {0}")]
    Patch(#[from] PatchError),

    /// Container image build errors
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Service configuration update errors
    #[error("Service config error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid or incomplete command line input
#[derive(Error, Debug)]
pub enum UsageError {
    /// Neither a shorthand flag nor an identifier was given
    #[error("No documentation sets selected. Pass identifiers or a shorthand such as --minimal.")]
    EmptySelection,

    /// A flag that the tool does not understand
    #[error("Unknown option '{flag}'")]
    UnknownFlag {
        /// Flag as typed by the user
        flag: String,
    },

    /// Any other argument problem reported by the parser
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

/// Failures fetching the upstream source tree
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// Destination exists and already holds files
    #[error("Working directory {path} already exists and is not empty")]
    DestinationNotEmpty {
        /// Destination path
        path: PathBuf,
    },

    /// Destination could not be inspected
    #[error("Cannot inspect working directory {path}: {source}")]
    DestinationUnreadable {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Required executable not found on PATH
    #[error("Required tool '{tool}' was not found on PATH")]
    ToolMissing {
        /// Executable name
        tool: String,
    },

    /// The clone itself failed
    #[error("Failed to fetch {url} at '{reference}': {reason}")]
    FetchFailed {
        /// Upstream repository URL
        url: String,
        /// Branch or tag requested
        reference: String,
        /// Reason for the error
        reason: String,
    },
}

/// Failures rewriting the upstream build definition
#[derive(Error, Debug)]
pub enum PatchError {
    /// Anchor line not present
    #[error("Expected line containing '{anchor}' not found in {path}")]
    AnchorMissing {
        /// Build definition path
        path: PathBuf,
        /// Text the line must contain
        anchor: String,
    },

    /// Anchor line present more than once
    #[error("Line containing '{anchor}' appears {count} times in {path}, expected exactly once")]
    AnchorAmbiguous {
        /// Build definition path
        path: PathBuf,
        /// Text the line must contain
        anchor: String,
        /// Number of matching lines
        count: usize,
    },
}

/// Failures building the container image
#[derive(Error, Debug)]
pub enum BuildError {
    /// Docker is missing or the daemon is not responding
    #[error("Docker is not available: {reason}")]
    DockerUnavailable {
        /// Reason for the error
        reason: String,
    },

    /// The build tool could not be started
    #[error("Failed to start '{command}': {reason}")]
    SpawnFailed {
        /// Command line that was attempted
        command: String,
        /// Reason for the error
        reason: String,
    },

    /// The build tool exited unsuccessfully
    #[error("'{command}' failed with exit code {exit_code}")]
    BuildFailed {
        /// Command line that was run
        command: String,
        /// Exit code, -1 when terminated by a signal
        exit_code: i32,
    },
}

/// Failures updating the service configuration file
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// File is not a valid YAML document
    #[error("Failed to parse {path}: {reason}")]
    Parse {
        /// Config path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// File has no entry for the named service
    #[error("Service '{service}' not found under 'services' in {path}")]
    ServiceNotFound {
        /// Config path
        path: PathBuf,
        /// Service name
        service: String,
    },

    /// Updated document could not be written back as YAML
    #[error("Failed to serialize updated config: {reason}")]
    Serialize {
        /// Reason for the error
        reason: String,
    },
}

impl PipelineError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PipelineError::Usage(UsageError::EmptySelection) => vec![
                "Name documentation sets directly: devdocs-custom svelte tailwindcss".to_string(),
                "Use a shorthand group: --minimal, --popular, --frontend, --backend".to_string(),
                "Show the groups with --list-groups".to_string(),
            ],
            PipelineError::Usage(_) => vec!["Run with --help to see the accepted options".to_string()],
            PipelineError::Acquisition(AcquisitionError::DestinationNotEmpty { path }) => vec![
                format!("Remove the stale working directory: rm -rf {}", path.display()),
                "Or choose another location with --dir".to_string(),
            ],
            PipelineError::Acquisition(AcquisitionError::DestinationUnreadable { path, .. }) => vec![
                format!("Check the permissions of {}", path.display()),
                "Or choose another location with --dir".to_string(),
            ],
            PipelineError::Acquisition(AcquisitionError::ToolMissing { tool }) => {
                vec![format!("Install '{}' and make sure it is on PATH", tool)]
            }
            PipelineError::Acquisition(AcquisitionError::FetchFailed { .. }) => vec![
                "Check your network connection".to_string(),
                "Verify the upstream URL and ref (--upstream, --ref)".to_string(),
                "Clear the working directory before re-running".to_string(),
            ],
            PipelineError::Patch(_) => vec![
                "The upstream Dockerfile layout changed; pin an older ref with --ref".to_string(),
                "Or build every documentation set with --all".to_string(),
            ],
            PipelineError::Build(BuildError::DockerUnavailable { .. }) => vec![
                "Start the Docker daemon and check with: docker info".to_string(),
                "Install Docker from https://docs.docker.com/get-docker/".to_string(),
            ],
            PipelineError::Build(_) => vec![
                "Scroll up for the build tool's own output".to_string(),
                "The patched Dockerfile and its .backup remain in the working directory".to_string(),
            ],
            PipelineError::Reconcile(ReconcileError::ServiceNotFound { service, .. }) => vec![
                format!("Add a '{}' entry under 'services' or pass --service", service),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_exits_with_one() {
        let errors = [
            PipelineError::from(UsageError::EmptySelection),
            PipelineError::from(BuildError::BuildFailed {
                command: "docker build".to_string(),
                exit_code: 2,
            }),
        ];
        for e in errors {
            assert_eq!(e.exit_code(), 1);
        }
    }

    #[test]
    fn test_stale_dir_suggestion_names_path() {
        let e = PipelineError::from(AcquisitionError::DestinationNotEmpty {
            path: PathBuf::from("/tmp/devdocs-x"),
        });
        assert!(e.recovery_suggestions()[0].contains("/tmp/devdocs-x"));
    }
}
