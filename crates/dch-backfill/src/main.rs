// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of DCH Uplink.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use dch_uplink::logging::init_tracing;
use dch_uplink::{DchClient, PayloadBuilder, SqlitePriceSource, UplinkConfig, batch};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "dch-backfill")]
#[command(about = "Upload the full price signal history to the Data Clearing House", long_about = None)]
struct Cli {
    /// Market region to backfill (defaults to PRICE_REGION_ID)
    #[arg(short, long)]
    region: Option<String>,

    /// Observations per upload (defaults to BACKFILL_CHUNK_SIZE)
    #[arg(short, long)]
    chunk_size: Option<NonZeroUsize>,

    /// Price database to read (defaults to PRICE_DB_PATH)
    #[arg(short, long)]
    database: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = UplinkConfig::from_env()?;
    if let Some(region) = cli.region {
        config.region_id = region;
    }
    if let Some(chunk_size) = cli.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(database) = cli.database {
        config.database.path = database;
    }

    info!("Opening price database: {}", config.database.path.display());
    let source = SqlitePriceSource::from_settings(&config.database);
    let uploader = DchClient::from_config(&config)?;
    let builder = PayloadBuilder::from_config(&config);

    let status = batch::run(
        &source,
        &uploader,
        &builder,
        &config.region_id,
        config.chunk_size,
    );

    Ok(ExitCode::from(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_config() {
        let cli = Cli::try_parse_from(["dch-backfill"]).unwrap();
        assert!(cli.region.is_none());
        assert!(cli.chunk_size.is_none());
        assert!(cli.database.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "dch-backfill",
            "--region",
            "VIC1",
            "--chunk-size",
            "25",
            "-d",
            "prices.db",
        ])
        .unwrap();
        assert_eq!(cli.region.as_deref(), Some("VIC1"));
        assert_eq!(cli.chunk_size.map(NonZeroUsize::get), Some(25));
        assert_eq!(cli.database, Some(PathBuf::from("prices.db")));
    }

    #[test]
    fn test_cli_rejects_zero_chunk_size() {
        assert!(Cli::try_parse_from(["dch-backfill", "--chunk-size", "0"]).is_err());
    }
}
