//! # usher CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Subcommand handlers return the process exit code; operational failures
//! bubble up as errors and exit 1.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use usher_cli::payload::{run_payload, PayloadArgs};
use usher_cli::policy::{run_policy, PolicyArgs};
use usher_cli::scan::{run_scan, ScanArgs};

/// Usher — ticket admission validation at the gate.
///
/// Validates single-use and limited-reentry tickets against a roster and an
/// admission policy, encodes and decodes the portable ticket payload, and
/// manages policy files.
#[derive(Parser, Debug)]
#[command(name = "usher", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a ticket at the gate and optionally record the admission.
    Scan(ScanArgs),

    /// Encode and decode the portable ticket payload.
    Payload(PayloadArgs),

    /// Check and scaffold admission policy files.
    Policy(PolicyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("usher CLI starting");

    let result = match cli.command {
        Commands::Scan(args) => run_scan(&args),
        Commands::Payload(args) => run_payload(&args),
        Commands::Policy(args) => run_policy(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(usher_cli::EXIT_OPERATIONAL)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_scan_with_code() {
        let cli = Cli::try_parse_from([
            "usher",
            "scan",
            "JGPNR-2024-001",
            "--tickets",
            "roster.yaml",
            "--policy",
            "policy.yaml",
            "--operator",
            "gate-a",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Scan(_)));
        if let Commands::Scan(args) = cli.command {
            assert_eq!(args.code.as_deref(), Some("JGPNR-2024-001"));
            assert_eq!(args.tickets, PathBuf::from("roster.yaml"));
            assert_eq!(args.operator.as_str(), "gate-a");
            assert!(args.at.is_none());
            assert!(!args.record);
            assert!(!args.json);
        }
    }

    #[test]
    fn cli_parse_scan_with_payload() {
        let cli = Cli::try_parse_from([
            "usher",
            "scan",
            "--payload",
            "{}",
            "--tickets",
            "roster.yaml",
            "--policy",
            "policy.yaml",
            "--operator",
            "gate-a",
        ])
        .unwrap();
        if let Commands::Scan(args) = cli.command {
            assert!(args.code.is_none());
            assert_eq!(args.payload.as_deref(), Some("{}"));
        }
    }

    #[test]
    fn cli_parse_scan_code_and_payload_conflict() {
        let result = Cli::try_parse_from([
            "usher",
            "scan",
            "JGPNR-2024-001",
            "--payload",
            "{}",
            "--tickets",
            "roster.yaml",
            "--policy",
            "policy.yaml",
            "--operator",
            "gate-a",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_scan_requires_code_or_payload() {
        let result = Cli::try_parse_from([
            "usher",
            "scan",
            "--tickets",
            "roster.yaml",
            "--policy",
            "policy.yaml",
            "--operator",
            "gate-a",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_scan_with_all_options() {
        let cli = Cli::try_parse_from([
            "usher",
            "scan",
            "JGPNR-2024-001",
            "--tickets",
            "roster.yaml",
            "--policy",
            "policy.yaml",
            "--operator",
            "gate-a",
            "--at",
            "2024-05-18T21:30:00+02:00",
            "--record",
            "--json",
        ])
        .unwrap();
        if let Commands::Scan(args) = cli.command {
            // Lenient instants normalize to UTC on the way in.
            let at = args.at.unwrap();
            assert_eq!(at.to_iso8601(), "2024-05-18T19:30:00Z");
            assert!(args.record);
            assert!(args.json);
        }
    }

    #[test]
    fn cli_parse_scan_rejects_garbage_instant() {
        let result = Cli::try_parse_from([
            "usher",
            "scan",
            "JGPNR-2024-001",
            "--tickets",
            "roster.yaml",
            "--policy",
            "policy.yaml",
            "--operator",
            "gate-a",
            "--at",
            "teatime",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_payload_encode() {
        let cli = Cli::try_parse_from([
            "usher",
            "payload",
            "encode",
            "--code",
            "JGPNR-2024-001",
            "--order-reference",
            "ORD-58213",
            "--holder-name",
            "Amara Okafor",
            "--session-label",
            "Preview Night",
            "--valid-until",
            "2024-06-30T23:59:59Z",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Payload(_)));
    }

    #[test]
    fn cli_parse_payload_encode_rejects_malformed_code() {
        let result = Cli::try_parse_from([
            "usher",
            "payload",
            "encode",
            "--code",
            "jgpnr-2024-001",
            "--order-reference",
            "ORD-1",
            "--holder-name",
            "A",
            "--session-label",
            "S",
            "--valid-until",
            "2024-06-30T23:59:59Z",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_payload_decode() {
        let cli = Cli::try_parse_from(["usher", "payload", "decode", "{\"x\":1}"]).unwrap();
        assert!(matches!(cli.command, Commands::Payload(_)));
    }

    #[test]
    fn cli_parse_policy_check() {
        let cli = Cli::try_parse_from(["usher", "policy", "check", "policy.yaml"]).unwrap();
        assert!(matches!(cli.command, Commands::Policy(_)));
    }

    #[test]
    fn cli_parse_policy_init_defaults() {
        let cli = Cli::try_parse_from(["usher", "policy", "init"]).unwrap();
        if let Commands::Policy(args) = cli.command {
            if let usher_cli::policy::PolicyCommand::Init {
                out,
                max_scan_count,
                scan_window_days,
                force,
            } = args.command
            {
                assert_eq!(out, PathBuf::from("policy.yaml"));
                assert_eq!(max_scan_count, 2);
                assert_eq!(scan_window_days, 14);
                assert!(!force);
            } else {
                panic!("expected policy init");
            }
        }
    }

    #[test]
    fn cli_parse_verbose_levels() {
        let cli0 = Cli::try_parse_from(["usher", "policy", "init"]).unwrap();
        assert_eq!(cli0.verbose, 0);

        let cli1 = Cli::try_parse_from(["usher", "-v", "policy", "init"]).unwrap();
        assert_eq!(cli1.verbose, 1);

        let cli2 = Cli::try_parse_from(["usher", "-vv", "policy", "init"]).unwrap();
        assert_eq!(cli2.verbose, 2);

        let cli3 = Cli::try_parse_from(["usher", "-vvv", "policy", "init"]).unwrap();
        assert_eq!(cli3.verbose, 3);
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["usher"]).is_err());
    }

    #[test]
    fn cli_parse_invalid_subcommand_errors() {
        assert!(Cli::try_parse_from(["usher", "nonexistent"]).is_err());
    }
}
