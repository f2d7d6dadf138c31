use std::io::{self, BufRead};

use clap::ArgAction;
use scanline::{ParsedBarcode, Symbology, classify, decode};
use tracing::instrument;

mod terminal;

use terminal::{Colorize, is_narrow};

/// ASCII group separator. Variable-width GS1 fields terminate on it, and
/// no keyboard produces it directly, hence the `--gs` substitution flag.
const GROUP_SEPARATOR: char = '\u{1d}';

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Replace every occurrence of TOKEN with the ASCII group separator
    /// before decoding
    #[arg(long, value_name = "TOKEN")]
    gs: Option<String>,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Barcode payloads to decode; read line by line from stdin when omitted
    codes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.execute()
    }

    fn execute(&self) -> anyhow::Result<()> {
        let codes = if self.codes.is_empty() {
            read_stdin()?
        } else {
            self.codes.clone()
        };

        let mut failures = 0usize;
        for code in &codes {
            let code = self.gs.as_deref().map_or_else(
                || code.clone(),
                |token| code.replace(token, &GROUP_SEPARATOR.to_string()),
            );

            if let Err(error) = self.report(&code) {
                failures += 1;
                eprintln!("{}", format!("✖ {code}: {error}").warning());
            }
        }

        if failures > 0 {
            anyhow::bail!("{failures} of {} payloads failed to decode", codes.len());
        }

        if codes.len() > 1 && matches!(self.output, OutputFormat::Table) {
            println!(
                "{}",
                format!("✅ Decoded {} payloads", codes.len()).success()
            );
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn report(&self, code: &str) -> anyhow::Result<()> {
        let symbology = classify(code)?;
        let record = decode(code)?;

        match self.output {
            OutputFormat::Json => {
                let line = serde_json::json!({
                    "input": code,
                    "symbology": symbology.to_string(),
                    "record": record,
                });
                println!("{}", serde_json::to_string_pretty(&line)?);
            }
            OutputFormat::Table => print_table(code, symbology, &record),
        }
        Ok(())
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn print_table(code: &str, symbology: Symbology, record: &ParsedBarcode) {
    println!("{code} {}", format!("({symbology})").dim());

    if record.is_empty() {
        println!("  {}", "no fields decoded".dim());
        return;
    }

    let narrow = is_narrow();
    let mut row = |label: &str, value: Option<String>| {
        if let Some(value) = value {
            if narrow {
                println!("  {label}: {value}");
            } else {
                println!("  {:<16} {value}", label.dim());
            }
        }
    };

    row("lic", record.lic.clone());
    row("product number", record.product_number.clone());
    row("expiry date", record.expiry_date.map(|d| d.to_string()));
    row("batch number", record.batch_number.clone());
    row("manufactured", record.manufactured.map(|d| d.to_string()));
    row("serial number", record.serial_number.clone());
    row("variant", record.variant.clone());
    row("content", record.content.clone());
}

/// Collects non-empty stdin lines as payloads.
fn read_stdin() -> io::Result<Vec<String>> {
    let mut codes = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            codes.push(trimmed.to_string());
        }
    }
    Ok(codes)
}
