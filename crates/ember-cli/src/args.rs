use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ember")]
#[command(about = "Ember CLI for model deployments", long_about = None)]
pub struct Args {
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the models the registry knows and their accelerators
    Models,
    /// Show the accelerator a model needs
    Resolve {
        /// Model identifier, e.g. deepseek-r1:14b
        model: String,
    },
    /// Render the environment descriptor for a model
    Describe {
        model: String,
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Write the descriptor as a deploy manifest
    Deploy {
        model: String,
        /// Directory the manifest is written to
        #[arg(long)]
        out_dir: PathBuf,
        #[command(flatten)]
        profile: ProfileArgs,
    },
}

/// Overrides for the default deployment profile.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ProfileArgs {
    /// Where the model volume is mounted inside the instance
    #[arg(long)]
    pub mount_path: Option<PathBuf>,

    /// Deployment name; app and volume names derive from it
    #[arg(long)]
    pub deployment: Option<String>,
}
