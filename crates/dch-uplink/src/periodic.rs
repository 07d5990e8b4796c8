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

//! Hourly upload of the most recent price signals

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::payload::PayloadBuilder;
use crate::store::PriceSource;
use crate::uploader::{UploadResult, Uploader};

const NO_RECORDS_MESSAGE: &str = "No price signals found for the last hour";
const UPLOADED_MESSAGE: &str = "Successfully processed and uploaded price signals to DCH";
const FAILED_MESSAGE: &str = "Failed to process and upload price signals";

/// How far back a periodic run looks
#[must_use]
pub fn lookback() -> TimeDelta {
    TimeDelta::hours(1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodicOutcome {
    /// Nothing settled in the window; not an error
    NoRecords,
    Uploaded {
        processed: usize,
        upload: UploadResult,
    },
    Failed {
        error: String,
    },
}

/// Status/body pair handed back to whatever triggered the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub status_code: u16,
    pub body: String,
}

impl PeriodicOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    #[must_use]
    pub fn into_response(self) -> JobResponse {
        match self {
            Self::NoRecords => JobResponse {
                status_code: 200,
                body: json!({ "message": NO_RECORDS_MESSAGE }).to_string(),
            },
            Self::Uploaded { processed, upload } => JobResponse {
                status_code: 200,
                body: json!({
                    "message": UPLOADED_MESSAGE,
                    "price_signals_processed": processed,
                    "dch_response": upload,
                })
                .to_string(),
            },
            Self::Failed { error } => JobResponse {
                status_code: 500,
                body: json!({ "error": error, "message": FAILED_MESSAGE }).to_string(),
            },
        }
    }
}

/// Upload everything settled in the hour before `now` as one payload.
///
/// Never returns an error: failures are logged and reported as `Failed`.
pub fn run_periodic(
    source: &dyn PriceSource,
    uploader: &dyn Uploader,
    builder: &PayloadBuilder,
    region_id: &str,
    now: DateTime<Utc>,
) -> PeriodicOutcome {
    match try_run(source, uploader, builder, region_id, now) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Error processing price signals: {e}");
            PeriodicOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

fn try_run(
    source: &dyn PriceSource,
    uploader: &dyn Uploader,
    builder: &PayloadBuilder,
    region_id: &str,
    now: DateTime<Utc>,
) -> Result<PeriodicOutcome> {
    info!("Querying price signals for region {region_id} from the last hour...");
    let records = source.fetch_since(region_id, now - lookback())?;

    if records.is_empty() {
        warn!("{NO_RECORDS_MESSAGE}");
        return Ok(PeriodicOutcome::NoRecords);
    }

    info!("Found {} price signals to process", records.len());

    let envelope = builder.build(&records)?;
    let upload = uploader.upload(&envelope)?;

    Ok(PeriodicOutcome::Uploaded {
        processed: records.len(),
        upload,
    })
}
