//! payform CLI entry point: classify identifiers, normalize amounts, and
//! validate proposal batches from CSV.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use payform_core::{
    format_amount, to_smallest_unit, truncate_address, validate_amount, AddressClassifier,
    AgentError, OutputMode, ProposalDraft, ProposalReport, RowIssue, StrKeyCheck,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Auto,
    Json,
    Human,
}

#[derive(Debug, Parser)]
#[command(name = "payform-cli", version)]
#[command(about = "Validate Stellar payment proposal fields: accounts, tokens, amounts")]
struct Cli {
    /// Output format: auto (tty=human, pipe=agent), json (agent), human (operator).
    #[arg(long, value_enum, default_value = "auto", global = true)]
    output: OutputFormat,

    /// Log classification decisions to stderr (overrides RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check an account identifier (G... or M...).
    Account { address: String },
    /// Check a token identifier (NATIVE, C..., or an account).
    Token { address: String },
    /// Normalize an amount, range-check it, and convert it to stroops.
    Amount { raw: String },
    /// Validate a CSV batch with header `recipient,token,amount`.
    Validate {
        #[arg(long)]
        input: PathBuf,
    },
}

/// Result document for a single identifier check.
#[derive(Debug, Serialize)]
struct IdentifierVerdict<'a> {
    input: &'a str,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
}

/// Result document for a single amount check.
#[derive(Debug, Serialize)]
struct AmountVerdict<'a> {
    input: &'a str,
    formatted: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stroops: Option<String>,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

impl OutputFormat {
    fn resolve(self) -> OutputMode {
        match self {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Agent,
            OutputFormat::Auto if std::io::stdout().is_terminal() => OutputMode::Human,
            OutputFormat::Auto => OutputMode::Agent,
        }
    }
}

/// Spinner shown while a batch file is read; agents get nothing.
fn reading_indicator(mode: OutputMode, input: &Path) -> Option<ProgressBar> {
    (mode == OutputMode::Human).then(|| {
        let pb = ProgressBar::new_spinner()
            .with_message(format!("Reading {}", input.display()));
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    })
}

fn print_section(title: &str) {
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

fn print_verdict(valid: bool, ok_message: &str, err_message: &str) {
    if valid {
        println!("{} {}", "✓".green(), ok_message.green());
    } else {
        println!("{} {}", "✗".red(), err_message.red());
    }
}

fn table_with_header(columns: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            columns
                .iter()
                .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

fn render_reports_table(reports: &[ProposalReport]) -> Table {
    let mut table = table_with_header(&["Row", "Recipient", "Token", "Amount", "Stroops"]);
    for (row, report) in (2..).zip(reports) {
        table.add_row(vec![
            Cell::new(row),
            Cell::new(truncate_address(&report.recipient)),
            Cell::new(truncate_address(&report.token)),
            Cell::new(&report.amount),
            Cell::new(report.amount_stroops.as_deref().unwrap_or("-")),
        ]);
    }
    table
}

fn render_issues_table(issues: &[RowIssue]) -> Table {
    let mut table = table_with_header(&["Row", "Field", "Message"]);
    for issue in issues {
        table.add_row(vec![
            Cell::new(issue.row),
            Cell::new(&issue.field),
            Cell::new(&issue.message),
        ]);
    }
    table
}

fn emit_agent_error(err: AgentError) -> Result<()> {
    let json = serde_json::to_string(&err).context("failed to serialize agent error")?;
    eprintln!("{json}");
    Ok(())
}

fn emit_agent_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value).context("failed to serialize result")?;
    println!("{json}");
    Ok(())
}

fn exit_if_invalid(valid: bool) {
    if !valid {
        std::process::exit(1);
    }
}

fn run_account(mode: OutputMode, classifier: &AddressClassifier, address: &str) -> Result<()> {
    let kind = classifier.classify_account(address);
    match mode {
        OutputMode::Human => print_verdict(
            kind.is_some(),
            &format!("Valid {} account", kind.map(|k| k.as_str()).unwrap_or_default()),
            "Invalid account address",
        ),
        OutputMode::Agent => emit_agent_json(&IdentifierVerdict {
            input: address,
            valid: kind.is_some(),
            kind: kind.map(|k| k.as_str()),
        })?,
    }
    exit_if_invalid(kind.is_some());
    Ok(())
}

fn run_token(mode: OutputMode, classifier: &AddressClassifier, address: &str) -> Result<()> {
    let kind = classifier.classify_token(address);
    match mode {
        OutputMode::Human => print_verdict(
            kind.is_some(),
            &format!("Valid {} token", kind.map(|k| k.as_str()).unwrap_or_default()),
            "Invalid token address",
        ),
        OutputMode::Agent => emit_agent_json(&IdentifierVerdict {
            input: address,
            valid: kind.is_some(),
            kind: kind.map(|k| k.as_str()),
        })?,
    }
    exit_if_invalid(kind.is_some());
    Ok(())
}

fn run_amount(mode: OutputMode, raw: &str) -> Result<()> {
    let formatted = format_amount(raw);
    let check = validate_amount(&formatted);
    let verdict = AmountVerdict {
        input: raw,
        valid: check.is_ok(),
        error: check.err().map(|err| err.to_string()),
        stroops: check.ok().map(|_| to_smallest_unit(&formatted)),
        formatted,
    };

    match mode {
        OutputMode::Human => {
            println!("{} {}", "Formatted:".bright_white().bold(), verdict.formatted);
            if let Some(stroops) = &verdict.stroops {
                println!("{} {}", "Stroops:".bright_white().bold(), stroops);
            }
            print_verdict(
                verdict.valid,
                "Valid amount",
                verdict.error.as_deref().unwrap_or_default(),
            );
        }
        OutputMode::Agent => emit_agent_json(&verdict)?,
    }
    exit_if_invalid(verdict.valid);
    Ok(())
}

fn run_validate(mode: OutputMode, classifier: &AddressClassifier, input: &Path) -> Result<()> {
    let pb = reading_indicator(mode, input);

    let file =
        File::open(input).with_context(|| format!("failed to open input file: {:?}", input))?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut issues: Vec<RowIssue> = Vec::new();
    let mut reports: Vec<ProposalReport> = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let row = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(row, error = %e, "unreadable csv row");
                issues.push(RowIssue {
                    row,
                    field: "csv".to_string(),
                    message: format!("csv parse error: {e}"),
                });
                continue;
            }
        };

        let draft = ProposalDraft {
            recipient: record.get(0).unwrap_or("").to_string(),
            token: record.get(1).unwrap_or("").to_string(),
            amount: record.get(2).unwrap_or("").trim().to_string(),
        };

        // Cells are finished values: reject what the form would have rewritten.
        let report = ProposalReport::from_committed(&draft, classifier);
        tracing::debug!(row, valid = report.valid, "validated proposal row");
        issues.extend(
            report
                .issues
                .iter()
                .map(|issue| RowIssue::from_field_issue(row, issue)),
        );
        reports.push(report);
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if !issues.is_empty() {
        match mode {
            OutputMode::Human => {
                print_section("Batch rejected");
                println!(
                    "{} {}",
                    "✗".red(),
                    "Validation failed. Fix every row before submitting.".red()
                );
                println!();
                println!("{}", render_issues_table(&issues));
            }
            OutputMode::Agent => emit_agent_error(AgentError::validation_failed(issues))?,
        }
        std::process::exit(1);
    }

    let total_stroops = reports
        .iter()
        .filter_map(|r| r.amount_stroops.as_deref())
        .map(|s| s.parse::<i128>().context("stroop amount is not an integer"))
        .sum::<Result<i128>>()?;

    match mode {
        OutputMode::Human => {
            print_section(&format!("Batch review: {}", input.display()));
            println!("{}", render_reports_table(&reports));
            println!();
            println!(
                "{} {}",
                "Proposals:".bright_white().bold(),
                reports.len().to_string().bright_white().bold()
            );
            println!(
                "{} {}",
                "Total stroops:".bright_white().bold(),
                total_stroops.to_string().bright_white().bold()
            );
        }
        OutputMode::Agent => emit_agent_json(&json!({
            "proposal_count": reports.len(),
            "total_stroops": total_stroops.to_string(),
            "proposals": reports,
        }))?,
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mode = cli.output.resolve();
    let classifier = AddressClassifier::new(StrKeyCheck);

    match &cli.command {
        Command::Account { address } => run_account(mode, &classifier, address),
        Command::Token { address } => run_token(mode, &classifier, address),
        Command::Amount { raw } => run_amount(mode, raw),
        Command::Validate { input } => run_validate(mode, &classifier, input),
    }
}
