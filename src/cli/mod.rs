//! Command line interface for devdocs-custom.
//!
//! Parses arguments, resolves the build request, and hands it to the
//! [`Pipeline`](crate::pipeline::Pipeline) with the host toolchain and
//! terminal prompts.

mod args;
mod output;
mod prompt;

pub use args::{Args, Invocation, RuntimeConfig};
pub use output::OutputManager;
pub use prompt::{Confirm, TerminalPrompt, is_affirmative};

use crate::compose::LocatorContext;
use crate::docker::host_arch;
use crate::error::{Result, UsageError};
use crate::pipeline::{Pipeline, PipelineOutcome, ReconcileOutcome, SystemToolchain};
use crate::selection::Shorthand;
use clap::error::{ContextKind, ContextValue, ErrorKind};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let invocation = match Invocation::try_parse() {
        Ok(invocation) => invocation,
        Err(e) => return handle_parse_error(e),
    };
    execute(invocation).await
}

/// Convert a clap error into an exit code or a usage error
fn handle_parse_error(e: clap::Error) -> Result<i32> {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            e.print()?;
            Ok(0)
        }
        ErrorKind::UnknownArgument => {
            let flag = match e.get(ContextKind::InvalidArg) {
                Some(ContextValue::String(flag)) => flag.clone(),
                _ => "<unknown>".to_string(),
            };
            Err(UsageError::UnknownFlag { flag }.into())
        }
        _ => {
            let rendered = e.to_string();
            let reason = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ")
                .to_string();
            Err(UsageError::InvalidArguments { reason }.into())
        }
    }
}

/// Execute a parsed invocation
pub async fn execute(invocation: Invocation) -> Result<i32> {
    let config = RuntimeConfig::from(&invocation.args);

    if invocation.args.list_groups {
        print_groups(&config);
        return Ok(0);
    }

    let request = invocation.build_request(host_arch())?;
    config.info(&format!("Target platform: {}", request.platform));

    let pipeline = Pipeline::new(
        request,
        invocation.args.upstream(),
        invocation.args.service.trim(),
        LocatorContext::detect()?,
        SystemToolchain,
        TerminalPrompt::new(config.assume_yes()),
        &config,
    );

    match pipeline.run().await? {
        PipelineOutcome::Cancelled => Ok(0),
        PipelineOutcome::Built(report) => {
            config.section("Done");
            config.success(&format!(
                "Image {} built for {}",
                pipeline.request().image_name,
                pipeline.request().platform
            ));
            if let ReconcileOutcome::Updated(patch) = &report.service_config {
                config.indent(&format!("Restart the service: docker compose up -d {}", patch.service));
            }
            Ok(0)
        }
    }
}

fn print_groups(config: &RuntimeConfig) {
    config.section("Shorthand groups");
    for group in Shorthand::SELECTABLE {
        config.println(&format!("  --{:<10} {}", group.flag(), group.docs().join(" ")));
    }
    config.println(&format!("  --{:<10} every documentation set", Shorthand::All.flag()));
}
