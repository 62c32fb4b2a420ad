use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tally_core::{Bank, Category, Money, StatementTotals, Transaction, TransactionKind};
use tally_import::{ContentType, EngineConfig, ParseOutcome, ParseStatus, StatementParser};
use tracing_subscriber::EnvFilter;

/// tally: pull transactions out of bank statements and categorize them.
#[derive(Debug, Parser)]
#[command(name = "tally", version)]
struct Args {
    /// TOML file with profile overrides and a replacement rule table.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract transactions from a statement file: CSV export, PDF, or PDF text.
    Parse {
        file: PathBuf,
        /// monzo, lloyds or barclays
        #[arg(long)]
        bank: Bank,
        /// Skip format detection.
        #[arg(long, value_enum)]
        content_type: Option<ContentArg>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print the category each description would get.
    Classify {
        #[arg(required = true)]
        descriptions: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ContentArg {
    Tabular,
    Text,
}

impl From<ContentArg> for ContentType {
    fn from(arg: ContentArg) -> Self {
        match arg {
            ContentArg::Tabular => ContentType::Tabular,
            ContentArg::Text => ContentType::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Summary,
}

fn main() -> ExitCode {
    init_logger();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let parser = StatementParser::new(config);

    match args.command {
        Command::Parse {
            file,
            bank,
            content_type,
            format,
        } => {
            let input =
                std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let outcome = parser.parse(&input, bank, content_type.map(ContentType::from));
            if outcome.status == ParseStatus::NoTransactionsFound {
                eprintln!("No transactions found in {}", file.display());
            }
            match format {
                OutputFormat::Json => print_json(&outcome)?,
                OutputFormat::Csv => print_csv(&outcome)?,
                OutputFormat::Summary => print_summary(&outcome),
            }
        }
        Command::Classify { descriptions } => {
            for d in descriptions {
                println!("{}\t{}", parser.classify(&d), d);
            }
        }
    }
    Ok(())
}

fn print_json(outcome: &ParseOutcome) -> Result<()> {
    let json = serde_json::to_string_pretty(outcome).context("serializing outcome")?;
    println!("{json}");
    Ok(())
}

/// One line of `--format csv` output.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    date: NaiveDate,
    description: &'a str,
    amount: Money,
    balance: Option<Money>,
    kind: TransactionKind,
    category: Category,
    is_internal_transfer: bool,
    source_bank: Bank,
}

impl<'a> From<&'a Transaction> for CsvRow<'a> {
    fn from(t: &'a Transaction) -> Self {
        CsvRow {
            date: t.date,
            description: &t.description,
            amount: t.amount,
            balance: t.balance,
            kind: t.kind(),
            category: t.category,
            is_internal_transfer: t.is_internal_transfer,
            source_bank: t.source_bank,
        }
    }
}

fn write_csv<W: std::io::Write>(outcome: &ParseOutcome, out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for t in &outcome.transactions {
        wtr.serialize(CsvRow::from(t)).context("writing CSV row")?;
    }
    wtr.flush().context("flushing CSV output")?;
    Ok(())
}

fn print_csv(outcome: &ParseOutcome) -> Result<()> {
    write_csv(outcome, std::io::stdout())
}

fn print_summary(outcome: &ParseOutcome) {
    let totals = StatementTotals::from_transactions(&outcome.transactions);

    println!("Transactions:  {}", totals.transaction_count);
    if let Some(range) = totals.date_range {
        println!("Period:        {range}");
    }
    println!("Income:        {}", totals.income);
    println!("Expenses:      {}", totals.expenses);
    println!("Net savings:   {}", totals.net_savings);
    if totals.pot_transfer_count > 0 {
        println!(
            "Pot transfers: {} (in {}, out {})",
            totals.pot_transfer_count, totals.pot_in, totals.pot_out
        );
    }

    let top = totals.top_expense_categories();
    if !top.is_empty() {
        println!();
        println!("Spending by category:");
        for (category, amount) in top {
            println!("  {:<24} {}", category.to_string(), amount);
        }
    }

    if !outcome.balance_summary.is_empty() {
        println!();
        println!("Statement summary:");
        for (field, value) in outcome.balance_summary.iter() {
            println!("  {:<40} {}", field.to_string(), value);
        }
    }

    if let Some(strategy) = outcome.report.strategy {
        println!();
        println!(
            "Extracted by {} strategy, {} candidates rejected",
            strategy,
            outcome.report.rejections.len()
        );
        if outcome.report.low_confidence() {
            println!("Warning: few transactions recognised, the layout may be unsupported");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_arguments() {
        let args = Args::try_parse_from([
            "tally", "parse", "statement.csv", "--bank", "lloyds", "--content-type", "tabular",
            "--format", "summary",
        ])
        .unwrap();
        match args.command {
            Command::Parse { bank, content_type, format, .. } => {
                assert_eq!(bank, Bank::Lloyds);
                assert!(matches!(content_type, Some(ContentArg::Tabular)));
                assert_eq!(format, OutputFormat::Summary);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn csv_output_has_kind_column() {
        let outcome = tally_import::parse_statement(
            b"01/01/2024Tesco Store-12.501000.00\n02/01/2024Salary3000.004000.00\n",
            Bank::Monzo,
        );
        let mut buf = Vec::new();
        write_csv(&outcome, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "date,description,amount,balance,kind,category,is_internal_transfer,source_bank"
        );
        assert_eq!(lines[1], "2024-01-01,Tesco Store,-12.50,1000.00,expense,groceries,false,monzo");
        assert_eq!(lines[2], "2024-01-02,Salary,3000.00,4000.00,income,income,false,monzo");
    }

    #[test]
    fn unknown_bank_is_rejected() {
        assert!(Args::try_parse_from(["tally", "parse", "s.txt", "--bank", "hsbc"]).is_err());
    }

    #[test]
    fn classify_requires_a_description() {
        assert!(Args::try_parse_from(["tally", "classify"]).is_err());
        let args = Args::try_parse_from(["tally", "classify", "TESCO", "UBER"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Classify { ref descriptions } if descriptions.len() == 2
        ));
    }
}
