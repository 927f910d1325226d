//! CLI definition and execution
//!
//! kot has no subcommands. By default every reference is streamed to
//! stdout; `--test` prints completion candidates and `--ls` prints listings.

use std::path::PathBuf;

use clap::{Args, Parser};
use clap_complete::engine::ArgValueCompleter;
use kot_core::{default_config_path, Profile, Result};
use kot_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod cat;
pub mod completions;
mod ls;
mod predict;

/// Environment variable selecting the profile
pub const PROFILE_ENV: &str = "KOT_PROFILE";

/// Environment variable pointing at the configuration file
pub const CONFIG_ENV: &str = "KOT_CONFIG";

/// kot - cat for S3
///
/// Streams objects from S3-compatible storage to stdout.
/// Enable tab completion of references with `source <(COMPLETE=bash kot)`.
#[derive(Parser, Debug)]
#[command(name = "kot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Storage references (s3://bucket/key)
    #[arg(
        value_name = "REFERENCE",
        required = true,
        add = ArgValueCompleter::new(completions::complete_reference)
    )]
    pub references: Vec<String>,

    /// Print completion candidates for the first reference instead of reading it
    #[arg(long)]
    pub test: bool,

    /// With --test, fail on errors instead of printing no candidates
    #[arg(long, requires = "test")]
    pub strict: bool,

    /// List everything directly under each reference
    #[arg(long, conflicts_with = "test")]
    pub ls: bool,

    #[command(flatten)]
    pub session: SessionArgs,

    /// Output format: human-readable or JSON
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub debug: bool,
}

/// Where the backend session gets its settings from
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Profile from the configuration file (matches a section name prefix)
    #[arg(long, env = PROFILE_ENV)]
    pub profile: Option<String>,

    /// Configuration file [default: ~/.config/kot/config]
    #[arg(long, env = CONFIG_ENV, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl SessionArgs {
    /// Session settings taken from the environment only
    pub fn from_env() -> Self {
        Self {
            profile: std::env::var(PROFILE_ENV).ok(),
            config: std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        }
    }

    /// Load the selected profile, if one was asked for
    pub fn load_profile(&self) -> Result<Option<Profile>> {
        let Some(name) = &self.profile else {
            return Ok(None);
        };

        let path = match &self.config {
            Some(path) => path.clone(),
            None => default_config_path()?,
        };

        Profile::load(name, &path).map(Some)
    }

    /// Build the backend client for this invocation
    pub async fn connect(&self) -> Result<S3Client> {
        let profile = self.load_profile()?;
        S3Client::new(profile.as_ref()).await
    }
}

/// Execute the CLI and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let formatter = Formatter::new(OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    });

    if cli.test {
        predict::execute(&cli.references[0], cli.strict, &cli.session, &formatter).await
    } else if cli.ls {
        ls::execute(&cli.references, &cli.session, &formatter).await
    } else {
        cat::execute(&cli.references, &cli.session, &formatter).await
    }
}
