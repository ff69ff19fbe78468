//! # Policy Subcommand
//!
//! Operational tooling for admission policy files: `check` validates a file
//! through the same loading path every scan uses, `init` writes a starter
//! policy so venues do not hand-build YAML.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use usher_engine::ValidationPolicy;

use crate::EXIT_OK;

/// Arguments for the `usher policy` subcommand.
#[derive(Args, Debug)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub command: PolicyCommand,
}

/// Policy subcommands.
#[derive(Subcommand, Debug)]
pub enum PolicyCommand {
    /// Validate a policy file and print the effective limits.
    Check {
        /// Policy file to check.
        file: PathBuf,
    },

    /// Write a starter policy file.
    Init {
        /// Destination path.
        #[arg(long, default_value = "policy.yaml")]
        out: PathBuf,
        /// Maximum admissions per ticket.
        #[arg(long, default_value_t = 2)]
        max_scan_count: u32,
        /// Reentry window in days after the first admission.
        #[arg(long, default_value_t = 14)]
        scan_window_days: u32,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Execute the policy subcommand.
pub fn run_policy(args: &PolicyArgs) -> Result<u8> {
    match &args.command {
        PolicyCommand::Check { file } => {
            let policy = ValidationPolicy::from_path(file)
                .with_context(|| format!("invalid admission policy {}", file.display()))?;
            println!("OK: {policy}");
            Ok(EXIT_OK)
        }

        PolicyCommand::Init {
            out,
            max_scan_count,
            scan_window_days,
            force,
        } => {
            if out.exists() && !force {
                bail!("refusing to overwrite {} (use --force)", out.display());
            }
            let policy = ValidationPolicy::new(*max_scan_count, *scan_window_days)?;
            let yaml = serde_yaml::to_string(&policy)?;
            std::fs::write(out, yaml)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("OK: wrote {} ({policy})", out.display());
            Ok(EXIT_OK)
        }
    }
}
