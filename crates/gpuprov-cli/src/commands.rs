//! Main commands enum and primary subcommands.
//!
//! This module defines the available commands for the CLI tool.

use clap::{Args, Subcommand};

use gpuprov_core::{UserChoice, VersionTarget};

/// Available commands for the CUDA provisioning tool.
#[derive(Subcommand)]
pub enum Commands {
    /// Probe the GPU, driver, OS and installed toolkit
    Detect {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the compute capability for a GPU name
    Classify {
        /// GPU name as reported by nvidia-smi (e.g. "NVIDIA GeForce RTX 4090")
        name: String,
    },

    /// Show the provisioning plan without installing anything
    Plan {
        #[command(flatten)]
        choice: ChoiceArgs,
        /// Plan for another OS instead of probing (e.g. "ubuntu:22.04", "rhel:9")
        #[arg(long, value_name = "ID:VER")]
        os: Option<String>,
        /// Driver CUDA ceiling to assume (e.g. "12.4")
        #[arg(long, value_name = "X.Y")]
        driver_cuda: Option<String>,
        /// Installed toolkit version to assume
        #[arg(long, value_name = "X.Y")]
        installed: Option<String>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Install the CUDA toolkit
    Install {
        #[command(flatten)]
        choice: ChoiceArgs,
        /// Do not prompt; pick Latest unless already up to date
        #[arg(short = 'y', long)]
        auto: bool,
        /// Print the environment exports instead of writing the shell profile
        #[arg(long)]
        no_profile: bool,
    },

    /// Show the last recorded install outcome
    Outcome {
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved paths for all gpuprov files
    Paths,
}

/// Toolkit choice flags shared by `plan` and `install`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
#[group(multiple = false)]
pub struct ChoiceArgs {
    /// Leave the installed toolkit alone
    #[arg(long)]
    pub keep: bool,
    /// Newest toolkit the repositories advertise
    #[arg(long)]
    pub latest: bool,
    /// A specific toolkit version (e.g. "12.6")
    #[arg(long, value_name = "X.Y")]
    pub cuda: Option<String>,
}

impl ChoiceArgs {
    /// The choice selected by flags, if any.
    ///
    /// Returns `Err` when `--cuda` is not a `major.minor` version.
    pub fn to_choice(&self) -> Result<Option<UserChoice>, gpuprov_core::ProvisionError> {
        if self.keep {
            return Ok(Some(UserChoice::Keep));
        }
        if self.latest {
            return Ok(Some(UserChoice::Latest));
        }
        self.cuda
            .as_deref()
            .map(|raw| VersionTarget::parse(raw).map(UserChoice::Custom))
            .transpose()
    }
}
