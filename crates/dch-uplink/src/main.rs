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

//! DCH Uplink - hourly upload entry point
//!
//! Meant to be fired once an hour by an external scheduler. Prints the
//! status/body response as JSON and exits non-zero when the run failed.

use std::process::ExitCode;

use chrono::Utc;
use dch_uplink::logging::init_tracing;
use dch_uplink::{DchClient, PayloadBuilder, SqlitePriceSource, UplinkConfig, run_periodic};
use tracing::info;

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let config = UplinkConfig::from_env()?;
    info!(
        "Loaded config: region={}, upload_url={}",
        config.region_id, config.upload_url
    );

    let source = SqlitePriceSource::from_settings(&config.database);
    let uploader = DchClient::from_config(&config)?;
    let builder = PayloadBuilder::from_config(&config);

    let outcome = run_periodic(&source, &uploader, &builder, &config.region_id, Utc::now());
    let success = outcome.is_success();

    println!("{}", serde_json::to_string(&outcome.into_response())?);

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
