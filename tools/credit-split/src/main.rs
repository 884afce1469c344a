//! Artist Credit Split Tool
//!
//! Parses artist credit strings into join-phrase segments, and replays a
//! slot fill against an in-memory host to show what an editor would write.

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tsumugi_core::{
    CreditEditor, CreditSegment, CreditTokenizer, Growth, MemorySlots, ReconcilerConfig,
    Reconciliation, SlotValues, TokenizerConfig, TrailingToken,
};

/// CLI arguments
#[derive(Parser)]
#[command(name = "credit-split")]
#[command(about = "Split artist credit strings into join-phrase segments")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Keep the empty artist left behind by a trailing delimiter
    #[arg(short, long, global = true, env = "TSUMUGI_KEEP_TRAILING")]
    keep_trailing: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse credit strings (arguments, or stdin lines when none are given)
    Parse {
        /// Credit strings to parse
        inputs: Vec<String>,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Parse a credit string and fill it into an in-memory slot collection
    Fill {
        /// Credit string to fill
        input: String,

        /// Slots that exist before the fill
        #[arg(short, long, default_value_t = 1)]
        slots: usize,

        /// Settles before a requested slot becomes visible
        #[arg(short, long, default_value_t = 1)]
        delay: u32,

        /// Never materialize requested slots
        #[arg(long)]
        frozen: bool,

        /// Settle cycles to wait for requested slots
        #[arg(short = 'r', long, env = "TSUMUGI_MAX_RESUMPTIONS", default_value_t = 32)]
        max_resumptions: u32,
    },
}

/// One parsed input line.
#[derive(Debug, Serialize)]
pub struct ParseOutput {
    pub input: String,
    pub segments: Vec<CreditSegment>,
}

/// Result of replaying a fill.
#[derive(Debug, Serialize)]
pub struct FillOutput {
    pub input: String,
    pub report: Reconciliation,
    pub slots: Vec<SlotValues>,
}

/// Host behaviour for a replayed fill.
#[derive(Debug, Clone)]
pub struct FillOptions {
    pub slots: usize,
    pub growth: Growth,
    pub max_resumptions: u32,
}

fn tokenizer(keep_trailing: bool) -> CreditTokenizer {
    let trailing = if keep_trailing {
        TrailingToken::Keep
    } else {
        TrailingToken::Drop
    };
    CreditTokenizer::with_config(TokenizerConfig::new().with_trailing(trailing))
}

fn parse_line(tokenizer: &CreditTokenizer, input: &str) -> ParseOutput {
    ParseOutput {
        input: input.to_string(),
        segments: tokenizer.parse(input),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

async fn run_fill(
    tokenizer: &CreditTokenizer,
    input: &str,
    options: &FillOptions,
) -> Result<FillOutput> {
    let host = MemorySlots::with_empty_slots(options.slots).with_growth(options.growth);
    let config = ReconcilerConfig::new().with_max_resumptions(options.max_resumptions);
    let editor = CreditEditor::with_config(&host, config);

    let target = tokenizer.parse(input);
    info!(segments = target.len(), slots = options.slots, "filling artist credit");

    let report = editor
        .fill(&target)
        .await
        .with_context(|| format!("Failed to fill {} segments from {input:?}", target.len()))?;

    Ok(FillOutput {
        input: input.to_string(),
        report,
        slots: host.values(),
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let tokenizer = tokenizer(cli.keep_trailing);

    match cli.command {
        Commands::Parse { inputs, pretty } => {
            if inputs.is_empty() {
                let stdin = io::stdin();
                for line in stdin.lock().lines() {
                    let line = line.context("Failed to read stdin")?;
                    if line.trim().is_empty() {
                        continue;
                    }
                    print_json(&parse_line(&tokenizer, &line), pretty)?;
                }
            } else {
                for input in &inputs {
                    print_json(&parse_line(&tokenizer, input), pretty)?;
                }
            }
        }
        Commands::Fill {
            input,
            slots,
            delay,
            frozen,
            max_resumptions,
        } => {
            if input.is_empty() {
                warn!("nothing to fill");
            }
            let growth = if frozen {
                Growth::Never
            } else {
                Growth::Delayed(delay)
            };
            let options = FillOptions {
                slots,
                growth,
                max_resumptions,
            };
            let output = run_fill(&tokenizer, &input, &options).await?;
            print_json(&output, true)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_line_output() {
        let output = parse_line(&tokenizer(false), "A vs. B feat. C");
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["input"], "A vs. B feat. C");
        assert_eq!(json["segments"][0]["artist"], "A");
        assert_eq!(json["segments"][0]["credited_as"], "A");
        assert_eq!(json["segments"][1]["join_phrase"], " feat. ");
        assert!(json["segments"][2].get("join_phrase").is_none());
    }

    #[test]
    fn test_keep_trailing_flag() {
        assert_eq!(tokenizer(false).parse("A(CV.B)").len(), 2);
        assert_eq!(tokenizer(true).parse("A(CV.B)").len(), 3);
    }

    #[tokio::test]
    async fn test_run_fill() {
        let options = FillOptions {
            slots: 1,
            growth: Growth::Delayed(2),
            max_resumptions: 8,
        };
        let output = run_fill(&tokenizer(false), "A & B", &options).await.unwrap();

        assert_eq!(output.report.requested, 1);
        assert_eq!(output.slots.len(), 2);
        assert_eq!(output.slots[0].join_phrase, " & ");
        assert_eq!(output.slots[1].artist, "B");
    }

    #[tokio::test]
    async fn test_run_fill_frozen_host() {
        let options = FillOptions {
            slots: 0,
            growth: Growth::Never,
            max_resumptions: 2,
        };
        let err = run_fill(&tokenizer(false), "A & B", &options)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to fill 2 segments"));
        assert!(err.root_cause().to_string().contains("did not appear"));
    }
}
