//! Docker image build for the patched upstream tree.
//!
//! Prefers `docker buildx build --platform <p> --load`, which can target a
//! platform other than the host's and loads the result into the local image
//! store. Falls back to `docker build`, which implicitly targets the host.
//! Success is the build tool's own exit status.

use crate::BuildRequest;
use crate::cli::RuntimeConfig;
use crate::error::BuildError;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::timeout;

/// Timeout for the quick daemon and buildx probes. The build itself is unbounded.
pub const DOCKER_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[cfg(target_os = "macos")]
const DOCKER_START_HELP: &str = "Start Docker Desktop from Applications or Spotlight";

#[cfg(not(target_os = "macos"))]
const DOCKER_START_HELP: &str = "Start Docker daemon: sudo systemctl start docker";

/// Which build path was used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPath {
    /// `docker buildx build` with an explicit platform
    Buildx,
    /// Plain `docker build` for the host platform
    Classic,
}

/// Checks if Docker is installed and the daemon is running.
pub async fn check_docker_available() -> Result<(), BuildError> {
    let status_result = timeout(
        DOCKER_PROBE_TIMEOUT,
        Command::new("docker")
            .arg("info")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status(),
    )
    .await;

    match status_result {
        Err(_) => Err(BuildError::DockerUnavailable {
            reason: format!(
                "daemon check timed out after {} seconds. {}",
                DOCKER_PROBE_TIMEOUT.as_secs(),
                DOCKER_START_HELP
            ),
        }),
        Ok(Ok(status)) if status.success() => Ok(()),
        Ok(Ok(status)) => Err(BuildError::DockerUnavailable {
            reason: format!(
                "daemon is not responding (exit code: {}). {}",
                status.code().unwrap_or(-1),
                DOCKER_START_HELP
            ),
        }),
        Ok(Err(e)) => Err(BuildError::DockerUnavailable {
            reason: format!("docker command not found: {}", e),
        }),
    }
}

/// Whether `docker buildx` is installed and usable
pub async fn buildx_available() -> bool {
    let probe = timeout(
        DOCKER_PROBE_TIMEOUT,
        Command::new("docker")
            .args(["buildx", "version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status(),
    )
    .await;

    let available = matches!(probe, Ok(Ok(status)) if status.success());
    log::debug!("docker buildx available: {}", available);
    available
}

/// Arguments after `docker` for the given build path
pub fn build_command_args(path: BuildPath, request: &BuildRequest) -> Vec<String> {
    let mut args = Vec::new();
    match path {
        BuildPath::Buildx => {
            args.extend(["buildx", "build", "--platform"].map(String::from));
            args.push(request.platform.to_string());
            args.push("--load".to_string());
        }
        BuildPath::Classic => args.push("build".to_string()),
    }
    args.push("-t".to_string());
    args.push(request.image_name.clone());
    args.push(".".to_string());
    args
}

/// Builds the image from the working directory of `request`.
///
/// Stdout is streamed line by line through the output manager; stderr is
/// inherited so the tool's own diagnostics reach the terminal unchanged.
pub async fn build_image(
    request: &BuildRequest,
    runtime_config: &RuntimeConfig,
) -> Result<BuildPath, BuildError> {
    check_docker_available().await?;

    let path = if buildx_available().await {
        BuildPath::Buildx
    } else {
        runtime_config.warn(&format!(
            "docker buildx not available, falling back to docker build (host platform, {} ignored)",
            request.platform
        ));
        BuildPath::Classic
    };

    let args = build_command_args(path, request);
    let command_line = format!("docker {}", args.join(" "));
    runtime_config.progress(&format!("Running: {}", command_line));
    log::info!("Building image in {}", request.work_dir.display());

    let mut child = Command::new("docker")
        .args(&args)
        .current_dir(&request.work_dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| BuildError::SpawnFailed {
            command: command_line.clone(),
            reason: e.to_string(),
        })?;

    if let Some(stdout) = child.stdout.take() {
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            runtime_config.indent(&line);
        }
    }

    let status = child.wait().await.map_err(|e| BuildError::SpawnFailed {
        command: command_line.clone(),
        reason: e.to_string(),
    })?;

    if !status.success() {
        return Err(BuildError::BuildFailed {
            command: command_line,
            exit_code: status.code().unwrap_or(-1),
        });
    }

    runtime_config.success(&format!("Built image {}", request.image_name));
    Ok(path)
}
