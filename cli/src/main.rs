// Copyright 2026 Viktor Reusch
//
// This file is part of places_gpx_convert.
//
// places_gpx_convert is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// places_gpx_convert is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License
// for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with places_gpx_convert. If not, see <https://www.gnu.org/licenses/>.

//! This is a simple command-line interface for the saved-places converter.

use std::{
    fs::{self, File},
    io::{self, stdout, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    str::FromStr,
};

use anyhow::{Context, Result};
use clap::Parser;
use places_gpx_convert::{convert_places, render, ClientConfig, OutputFormat, Place, PlacesClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Log filter used with `--verbose`.
const VERBOSE_FILTER: &str = "info,places_gpx_convert=debug";
/// Log filter used if `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";

/// Convert saved places from a Google Takeout CSV export to GPX waypoints.
#[derive(Debug, Parser)]
#[command(name = "places-gpx", version, long_about = None)]
struct Cli {
    /// Path to the CSV file.
    csv: PathBuf,

    /// Google Maps Places API key.
    // https://developers.google.com/maps/documentation/places/web-service/get-api-key
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    key: String,

    /// Output format.
    #[arg(long, default_value = "gpx", value_parser = OutputFormat::from_str)]
    format: OutputFormat,

    /// Write to this file instead of STDOUT. `-` means STDOUT.
    #[arg(long, short, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Log every row, the matched URL parts, and the lookup results.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Conversion failed with: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log to STDERR because STDOUT might carry the document.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let source =
        File::open(&cli.csv).with_context(|| format!("cannot open {}", cli.csv.display()))?;
    let client = PlacesClient::new(ClientConfig::new(cli.key.as_str()))
        .context("cannot set up the places client")?;

    let places = convert_places(source, &client)?;
    write_output(cli.format, &places, cli.out.as_deref())?;

    info!(count = places.len(), format = %cli.format, "wrote waypoints");
    Ok(())
}

/// Render `places` to `out`, or to STDOUT if `out` is `None` or `-`.
///
/// The document is rendered completely before `out` is touched.
fn write_output(format: OutputFormat, places: &[Place], out: Option<&Path>) -> Result<()> {
    let mut document: Vec<u8> = vec![];
    render(format, places, &mut document)?;

    match out.filter(|path| *path != Path::new("-")) {
        Some(path) => {
            fs::write(path, &document)
                .with_context(|| format!("cannot write {}", path.display()))?;
        }
        None => {
            let mut stdout = stdout().lock();
            stdout.write_all(&document)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
