//! # Payload Subcommand
//!
//! Box-office tooling for the portable ticket payload: `encode` renders the
//! compact JSON document embedded in a printed or QR artifact, `decode`
//! parses one back for inspection. Decoding here is diagnostic; the gate
//! path lives in `usher scan --payload`.

use anyhow::Result;
use clap::{Args, Subcommand};

use usher_core::{TicketCode, Timestamp};
use usher_payload::TicketSummary;

use crate::{EXIT_MALFORMED, EXIT_OK};

/// Arguments for the `usher payload` subcommand.
#[derive(Args, Debug)]
pub struct PayloadArgs {
    #[command(subcommand)]
    pub command: PayloadCommand,
}

/// Payload subcommands.
#[derive(Subcommand, Debug)]
pub enum PayloadCommand {
    /// Render a ticket summary as a compact payload document.
    Encode {
        /// Ticket code (PREFIX-YYYY-NNN).
        #[arg(long)]
        code: TicketCode,
        /// Purchase order reference.
        #[arg(long)]
        order_reference: String,
        /// Holder name to print on the artifact.
        #[arg(long)]
        holder_name: String,
        /// Session or event label.
        #[arg(long)]
        session_label: String,
        /// Validity deadline (RFC 3339, any offset).
        #[arg(long, value_parser = parse_instant)]
        valid_until: Timestamp,
        /// Generation instant. Defaults to the current time.
        #[arg(long, value_parser = parse_instant)]
        generated_at: Option<Timestamp>,
    },

    /// Parse a payload document and show its fields.
    Decode {
        /// The payload string as read from the artifact.
        payload: String,
    },
}

fn parse_instant(raw: &str) -> Result<Timestamp, String> {
    Timestamp::parse_lenient(raw).map_err(|e| e.to_string())
}

/// Execute the payload subcommand.
pub fn run_payload(args: &PayloadArgs) -> Result<u8> {
    match &args.command {
        PayloadCommand::Encode {
            code,
            order_reference,
            holder_name,
            session_label,
            valid_until,
            generated_at,
        } => {
            let summary = TicketSummary {
                code: code.clone(),
                order_reference: order_reference.clone(),
                holder_name: holder_name.clone(),
                session_label: session_label.clone(),
                valid_until: *valid_until,
                generated_at: generated_at.unwrap_or_else(Timestamp::now),
            };
            println!("{}", usher_payload::encode(&summary)?);
            Ok(EXIT_OK)
        }

        PayloadCommand::Decode { payload } => match usher_payload::decode(payload) {
            Ok(summary) => {
                println!("Code: {}", summary.code);
                println!("  Order: {}", summary.order_reference);
                println!("  Holder: {}", summary.holder_name);
                println!("  Session: {}", summary.session_label);
                println!("  Valid until: {}", summary.valid_until);
                println!("  Generated: {}", summary.generated_at);
                Ok(EXIT_OK)
            }
            Err(err) => {
                eprintln!("REJECT: {err}");
                Ok(EXIT_MALFORMED)
            }
        },
    }
}
