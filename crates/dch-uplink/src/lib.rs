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

//! DCH Uplink - wholesale price signals to the Data Clearing House
//!
//! Reads regional reference prices from the price store, maps each price onto
//! a three-level signal and uploads the series as DCH observations. The
//! `dch-uplink` binary handles the hourly run; `dch-backfill` re-uploads the
//! whole history in chunks.

pub mod batch;
pub mod classifier;
pub mod config;
pub mod error;
pub mod logging;
pub mod payload;
pub mod periodic;
pub mod store;
pub mod types;
pub mod uploader;

pub use batch::{BatchSummary, partition, run_backfill};
pub use classifier::{SignalLevel, classify};
pub use config::UplinkConfig;
pub use error::{UplinkError, UploadError};
pub use payload::{PayloadBuilder, UploadEnvelope};
pub use periodic::{JobResponse, PeriodicOutcome, run_periodic};
pub use store::{PriceSource, SqlitePriceSource};
pub use types::{PriceRecord, SettlementTime};
pub use uploader::{DchClient, UploadResult, Uploader};
