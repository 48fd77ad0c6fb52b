mod args;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ember_common::{
    build_descriptor_with, provision, DeploymentProfile, ManifestPlatform, ModelRegistry,
};

use crate::args::{Args, Command, ProfileArgs};
use crate::output::{print_deployed, print_descriptor, print_models, print_resolved};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let registry = ModelRegistry::builtin();

    match args.command {
        Command::Models => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(registry.models())?);
            } else {
                print_models(registry.models());
            }
        }
        Command::Resolve { model } => {
            let accelerator = registry.resolve_accelerator(&model)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&accelerator)?);
            } else {
                print_resolved(&model, &accelerator);
            }
        }
        Command::Describe { model, profile } => {
            let spec = registry.resolve(&model)?;
            let descriptor = build_descriptor_with(&spec, &deployment_profile(&profile));
            if args.json {
                println!("{}", serde_json::to_string_pretty(&descriptor)?);
            } else {
                print_descriptor(&descriptor);
            }
        }
        Command::Deploy {
            model,
            out_dir,
            profile,
        } => {
            let platform = ManifestPlatform::new(out_dir);
            let (descriptor, handle) =
                provision(registry, &model, &deployment_profile(&profile), &platform).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&handle)?);
            } else {
                print_descriptor(&descriptor);
                print_deployed(&handle);
            }
        }
    }

    Ok(())
}

fn deployment_profile(args: &ProfileArgs) -> DeploymentProfile {
    let mut profile = DeploymentProfile::default();
    if let Some(path) = &args.mount_path {
        profile.mount_path = path.clone();
    }
    if let Some(name) = &args.deployment {
        profile.deployment_name = name.clone();
    }
    profile
}
