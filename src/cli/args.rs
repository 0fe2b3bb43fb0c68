//! Command line argument parsing and validation.
//!
//! Shorthand flags and positional identifiers may be interleaved and
//! repeated; once clap has accepted the arguments their relative order is
//! recovered from the raw argument list so the selection keeps command line
//! order.

use crate::compose::DEFAULT_SERVICE;
use crate::docker::Platform;
use crate::error::UsageError;
use crate::selection::{self, SelectionToken, Shorthand};
use crate::{BuildRequest, DEFAULT_IMAGE_NAME, Upstream};
use clap::{ArgAction, Command, CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Build a DevDocs image that embeds only the documentation you need
#[derive(Parser, Debug, Clone)]
#[command(
    name = "devdocs-custom",
    version,
    about = "Build a reduced-size DevDocs image and point docker-compose at it",
    long_about = "Clone upstream DevDocs, restrict its Dockerfile to the selected documentation sets,
build the image, and optionally update the devdocs service in docker-compose.yml.

Usage:
  devdocs-custom svelte tailwindcss
  devdocs-custom --minimal react
  devdocs-custom --frontend --image devdocs-frontend:latest
  devdocs-custom --all --platform linux/arm64"
)]
pub struct Args {
    /// Documentation set identifiers (DevDocs slugs)
    #[arg(value_name = "DOC")]
    pub docs: Vec<String>,

    /// Add the popular group
    #[arg(long, action = ArgAction::Count)]
    pub popular: u8,

    /// Add the minimal group
    #[arg(long, action = ArgAction::Count)]
    pub minimal: u8,

    /// Add the frontend group
    #[arg(long, action = ArgAction::Count)]
    pub frontend: u8,

    /// Add the backend group
    #[arg(long, action = ArgAction::Count)]
    pub backend: u8,

    /// Build every documentation set (ignores all other selections)
    #[arg(long, action = ArgAction::Count)]
    pub all: u8,

    /// Target platform, e.g. linux/amd64 (default: detected from host)
    #[arg(long, env = "DEVDOCS_PLATFORM", value_name = "PLATFORM")]
    pub platform: Option<String>,

    /// Tag for the built image
    #[arg(long, env = "DEVDOCS_IMAGE", value_name = "NAME", default_value = DEFAULT_IMAGE_NAME)]
    pub image: String,

    /// Working directory for the upstream clone (default: timestamped temp dir)
    #[arg(long, env = "DEVDOCS_BUILD_DIR", value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Upstream DevDocs repository URL
    #[arg(
        long,
        env = "DEVDOCS_UPSTREAM_URL",
        value_name = "URL",
        default_value = "https://github.com/freeCodeCamp/devdocs.git"
    )]
    pub upstream: String,

    /// Upstream branch or tag to build
    #[arg(
        long = "ref",
        env = "DEVDOCS_UPSTREAM_REF",
        value_name = "REF",
        default_value = "main"
    )]
    pub reference: String,

    /// Compose service whose image is updated
    #[arg(long, value_name = "NAME", default_value = DEFAULT_SERVICE)]
    pub service: String,

    /// Answer yes to every confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// List the shorthand groups and exit
    #[arg(long)]
    pub list_groups: bool,
}

impl Args {
    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), UsageError> {
        if self.image.trim().is_empty() {
            return Err(UsageError::InvalidArguments {
                reason: "--image must not be empty".to_string(),
            });
        }
        if self.service.trim().is_empty() {
            return Err(UsageError::InvalidArguments {
                reason: "--service must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Pinned upstream reference from the arguments
    pub fn upstream(&self) -> Upstream {
        Upstream {
            url: self.upstream.clone(),
            reference: self.reference.clone(),
        }
    }

    /// Working directory: `--dir` or a timestamped directory under the temp dir
    pub fn work_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
            std::env::temp_dir().join(format!("devdocs-custom-{}", stamp))
        })
    }
}

/// Parsed arguments plus the selection tokens in command line order
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Parsed arguments
    pub args: Args,
    /// Shorthand flags and identifiers, ordered as typed
    pub selection_tokens: Vec<SelectionToken>,
}

impl Invocation {
    /// Parse the process arguments
    pub fn try_parse() -> Result<Self, clap::Error> {
        Self::try_parse_from(std::env::args_os())
    }

    /// Parse from an explicit argument list (first item is the program name)
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let argv: Vec<OsString> = itr.into_iter().map(Into::into).collect();
        let cmd = Args::command();
        let matches = cmd.clone().try_get_matches_from(argv.iter().cloned())?;
        let args = Args::from_arg_matches(&matches)?;
        let selection_tokens = ordered_selection_tokens(&cmd, &argv);
        Ok(Self {
            args,
            selection_tokens,
        })
    }

    /// Resolve the immutable build request. `host_arch` is used when no
    /// platform was given.
    pub fn build_request(&self, host_arch: &str) -> Result<BuildRequest, UsageError> {
        self.args.validate()?;
        let selection = selection::resolve(self.selection_tokens.iter().cloned())?;
        let platform = Platform::resolve(self.args.platform.as_deref(), host_arch);

        Ok(BuildRequest {
            selection,
            platform,
            image_name: self.args.image.trim().to_string(),
            work_dir: self.args.work_dir(),
        })
    }
}

fn shorthand_for(long: &str) -> Option<Shorthand> {
    Shorthand::SELECTABLE
        .into_iter()
        .chain([Shorthand::All])
        .find(|group| group.flag() == long)
}

fn long_takes_value(cmd: &Command, long: &str) -> bool {
    cmd.get_arguments()
        .find(|arg| arg.get_long() == Some(long))
        .is_some_and(|arg| arg.get_action().takes_values())
}

fn short_takes_value(cmd: &Command, short: char) -> bool {
    cmd.get_arguments()
        .find(|arg| arg.get_short() == Some(short))
        .is_some_and(|arg| arg.get_action().takes_values())
}

/// Walk an argument list clap has already accepted and collect shorthand
/// flags and positional identifiers in the order they were typed. Option
/// values are skipped using the command's own argument definitions.
fn ordered_selection_tokens(cmd: &Command, argv: &[OsString]) -> Vec<SelectionToken> {
    let mut tokens = Vec::new();
    let mut rest = argv.iter().skip(1);
    let mut positional_only = false;

    while let Some(raw) = rest.next() {
        // Identifiers are `String`, so a non-UTF-8 token can only be an option value
        let Some(token) = raw.to_str() else {
            continue;
        };

        if positional_only {
            tokens.push(SelectionToken::Doc(token.to_string()));
            continue;
        }

        if token == "--" {
            positional_only = true;
        } else if let Some(long) = token.strip_prefix("--") {
            let (name, inline_value) = match long.split_once('=') {
                Some((name, _)) => (name, true),
                None => (long, false),
            };
            if let Some(group) = shorthand_for(name) {
                tokens.push(SelectionToken::Shorthand(group));
            } else if !inline_value && long_takes_value(cmd, name) {
                rest.next();
            }
        } else if let Some(shorts) = token.strip_prefix('-').filter(|s| !s.is_empty()) {
            for (pos, short) in shorts.char_indices() {
                if short_takes_value(cmd, short) {
                    if pos + short.len_utf8() == shorts.len() {
                        rest.next();
                    }
                    break;
                }
            }
        } else {
            tokens.push(SelectionToken::Doc(token.to_string()));
        }
    }

    tokens
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
    assume_yes: bool,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(assume_yes: bool) -> Self {
        Self {
            output: super::OutputManager::new(false),
            assume_yes,
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Whether prompts are answered yes automatically
    pub fn assume_yes(&self) -> bool {
        self.assume_yes
    }

    /// Print message
    pub fn println(&self, message: &str) {
        self.output.println(message);
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        self.output.info(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warn(&self, message: &str) {
        self.output.warn(message);
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        self.output.success(message);
    }

    /// Print progress message
    pub fn progress(&self, message: &str) {
        self.output.progress(message);
    }

    /// Print section header
    pub fn section(&self, title: &str) {
        self.output.section(title);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        self.output.indent(message);
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(false)
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.yes)
    }
}
