use std::process::ExitCode;

use chrono::{DateTime, FixedOffset, Utc};
use clap::Parser;
use loose_date::{CalendarDate, ParseError, parse_date, set_canonical_zone};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

const DEMO_INPUTS: [&str; 9] = [
    "today",
    "tomorrow",
    "yesterday",
    "90.01.04",
    "2020-01-04",
    "2020/1/4",
    "2020/March/4",
    "2020 Feb 4",
    "20 Mar 4th",
];

#[derive(Parser)]
#[command(name = "loose-date")]
#[command(version)]
#[command(about = "Parse loosely formatted date expressions into calendar dates")]
struct Cli {
    /// Date expressions to parse (a demo set when none are given)
    #[arg(value_name = "INPUT")]
    inputs: Vec<String>,

    /// Reference instant for relative keywords, RFC 3339 (default: now)
    #[arg(long, value_name = "INSTANT")]
    now: Option<DateTime<Utc>>,

    /// UTC offset that decides which day "today" is, e.g. +02:00
    #[arg(long, value_name = "OFFSET", allow_hyphen_values = true)]
    utc_offset: Option<FixedOffset>,

    /// Print one JSON object per input instead of a table
    #[arg(long, short = 'j')]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Row<'a> {
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<CalendarDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<usize>,
}

impl<'a> Row<'a> {
    fn new(input: &'a str, result: &Result<CalendarDate, ParseError>) -> Self {
        match result {
            Ok(date) => Self {
                input,
                date: Some(*date),
                error: None,
                position: None,
            },
            Err(err) => Self {
                input,
                date: None,
                error: Some(err.message().to_owned()),
                position: Some(err.position()),
            },
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    if level != LevelFilter::OFF {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(zone) = cli.utc_offset {
        if let Err(err) = set_canonical_zone(zone) {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    }

    let now = cli.now.unwrap_or_else(Utc::now);
    tracing::debug!(%now, "reference instant");

    let inputs: Vec<&str> = if cli.inputs.is_empty() {
        DEMO_INPUTS.to_vec()
    } else {
        cli.inputs.iter().map(String::as_str).collect()
    };

    let results: Vec<_> = inputs
        .iter()
        .map(|input| (*input, parse_date(input, now)))
        .collect();

    if cli.json {
        for (input, result) in &results {
            match serde_json::to_string(&Row::new(input, result)) {
                Ok(line) => println!("{line}"),
                Err(err) => {
                    eprintln!("error: {err}");
                    return ExitCode::FAILURE;
                }
            }
        }
    } else {
        let width = inputs.iter().map(|i| i.chars().count()).max().unwrap_or(0);
        for (input, result) in &results {
            match result {
                Ok(date) => println!("{input:<width$}  {date}"),
                Err(err) => println!("{input:<width$}  error: {err}"),
            }
        }
    }

    if results.iter().all(|(_, result)| result.is_ok()) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
