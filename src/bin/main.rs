// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use clap::{Parser, Subcommand};
use csv::Writer;
use receipt_processor_rs::{
    PointsBreakdown, Receipt, ReceiptError, ReceiptProcessor, rules, server, validate,
};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// Receipt Processor - Award loyalty points for purchase receipts
///
/// Runs the receipt points HTTP service, or scores receipt JSON files
/// offline and prints a CSV report to stdout.
#[derive(Parser, Debug)]
#[command(name = "receipt-processor-rs")]
#[command(about = "Validates receipts and awards loyalty points", long_about = None)]
struct Args {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, env = "RECEIPTS_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the receipt API over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, env = "RECEIPTS_ADDR", default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
    /// Score receipt JSON files and write a CSV report to stdout
    ///
    /// Example: cargo run -- score receipts/*.json > points.csv
    Score {
        /// Receipt JSON files, one receipt per file
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,
    },
}

fn main() {
    let args = Args::parse();
    init_logging(&args.log_level);

    match args.command {
        Command::Serve { addr } => run_server(addr),
        Command::Score { inputs } => run_score(&inputs),
    }
}

fn init_logging(default_level: &str) {
    // Logs go to stderr so the CSV report on stdout stays clean.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_server(addr: SocketAddr) {
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "failed to start runtime");
            process::exit(1);
        }
    };

    let result = runtime.block_on(async {
        let listener = TcpListener::bind(addr).await?;
        server::serve(listener, Arc::new(ReceiptProcessor::new())).await
    });

    if let Err(e) = result {
        error!(%addr, error = %e, "server failed");
        process::exit(1);
    }
}

fn run_score(inputs: &[PathBuf]) {
    let mut rows = Vec::with_capacity(inputs.len());
    let mut failed = 0usize;

    for path in inputs {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "cannot open receipt");
                failed += 1;
                continue;
            }
        };

        match score_receipt(BufReader::new(file)) {
            Ok((receipt, points)) => rows.push(ReportRow::new(path, &receipt, points)),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping receipt");
                failed += 1;
            }
        }
    }

    if let Err(e) = write_report(&rows, std::io::stdout()) {
        error!(error = %e, "failed to write report");
        process::exit(1);
    }

    if failed > 0 {
        process::exit(2);
    }
}

/// Decodes, validates and scores a single JSON receipt.
///
/// # Errors
///
/// - [`ReceiptError::MalformedInput`] if the reader does not hold a receipt.
/// - [`ReceiptError::Validation`] if the receipt fails a check.
fn score_receipt<R: Read>(reader: R) -> Result<(Receipt, PointsBreakdown), ReceiptError> {
    let receipt: Receipt = serde_json::from_reader(reader)
        .map_err(|e| ReceiptError::MalformedInput(e.to_string()))?;
    validate(&receipt)?;
    let points = rules::breakdown(&receipt)?;
    Ok((receipt, points))
}

/// One line of the CSV report.
#[derive(Debug, Serialize)]
struct ReportRow {
    file: String,
    retailer: String,
    points: u128,
    retailer_points: u128,
    round_dollar: u128,
    quarter_multiple: u128,
    item_pairs: u128,
    descriptions: u128,
    odd_day: u128,
    afternoon: u128,
}

impl ReportRow {
    fn new(path: &std::path::Path, receipt: &Receipt, points: PointsBreakdown) -> Self {
        Self {
            file: path.display().to_string(),
            retailer: receipt.retailer.clone(),
            points: points.total(),
            retailer_points: points.retailer(),
            round_dollar: points.round_dollar(),
            quarter_multiple: points.quarter_multiple(),
            item_pairs: points.item_pairs(),
            descriptions: points.descriptions(),
            odd_day: points.odd_day(),
            afternoon: points.afternoon(),
        }
    }
}

/// Writes the scored receipts as CSV, one row per receipt.
///
/// # CSV Format
///
/// Columns: `file, retailer, points` followed by one column per rule.
///
/// # Errors
///
/// Returns a CSV error if writing fails.
fn write_report<W: Write>(rows: &[ReportRow], writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}
