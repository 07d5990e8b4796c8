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

//! Chunked backfill of the full price history
//!
//! Each chunk is built and uploaded on its own. A failed chunk is logged
//! and counted and the run moves on to the next chunk. Chunks that already
//! went through are not rolled back when a later one fails.

use std::num::NonZeroUsize;

use tracing::{error, info, warn};

use crate::error::Result;
use crate::payload::PayloadBuilder;
use crate::store::PriceSource;
use crate::uploader::Uploader;

/// Aggregate result of a backfill run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total_records: usize,
    pub successful_chunks: usize,
    pub failed_chunks: usize,
}

impl BatchSummary {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed_chunks == 0
    }

    /// Process exit status: 0 when every chunk was uploaded, 1 otherwise
    #[must_use]
    pub fn exit_status(&self) -> u8 {
        u8::from(!self.is_success())
    }
}

/// Split `items` into consecutive chunks of at most `chunk_size`, keeping order.
pub fn partition<T>(items: &[T], chunk_size: NonZeroUsize) -> Vec<&[T]> {
    items.chunks(chunk_size.get()).collect()
}

/// Upload the whole history for `region_id` chunk by chunk.
///
/// Build and upload failures are isolated to their chunk. A store failure
/// aborts the run.
pub fn run_backfill(
    source: &dyn PriceSource,
    uploader: &dyn Uploader,
    builder: &PayloadBuilder,
    region_id: &str,
    chunk_size: NonZeroUsize,
) -> Result<BatchSummary> {
    info!("Starting backfill process for {region_id} price signals...");

    let records = source.fetch_all(region_id)?;
    let mut summary = BatchSummary {
        total_records: records.len(),
        ..BatchSummary::default()
    };

    if records.is_empty() {
        warn!("No price signals found in the database for region {region_id}");
        return Ok(summary);
    }

    let chunks = partition(&records, chunk_size);
    let total_chunks = chunks.len();
    info!(
        "Found {} price signals, splitting into {total_chunks} batches of up to {chunk_size} observations",
        records.len()
    );

    for (index, chunk) in chunks.into_iter().enumerate() {
        let batch_num = index + 1;
        info!(
            "Processing batch {batch_num}/{total_chunks} ({} observations)...",
            chunk.len()
        );

        let envelope = match builder.build(chunk) {
            Ok(envelope) => envelope,
            Err(e) => {
                error!("Failed to build batch {batch_num}/{total_chunks}: {e}");
                summary.failed_chunks += 1;
                continue;
            }
        };

        match uploader.upload(&envelope) {
            Ok(result) => {
                info!(
                    "Batch {batch_num}/{total_chunks} uploaded successfully. Status: {}",
                    result.status_code
                );
                summary.successful_chunks += 1;
            }
            Err(e) => {
                error!("Failed to upload batch {batch_num}/{total_chunks}: {e}");
                summary.failed_chunks += 1;
            }
        }
    }

    info!(
        "Backfill completed! Total: {} observations, Successful batches: {}, Failed batches: {}",
        summary.total_records, summary.successful_chunks, summary.failed_chunks
    );

    Ok(summary)
}

/// Run a backfill and reduce it to a process exit status.
///
/// Anything that aborts the run is logged here and reported as failure.
pub fn run(
    source: &dyn PriceSource,
    uploader: &dyn Uploader,
    builder: &PayloadBuilder,
    region_id: &str,
    chunk_size: NonZeroUsize,
) -> u8 {
    match run_backfill(source, uploader, builder, region_id, chunk_size) {
        Ok(summary) => summary.exit_status(),
        Err(e) => {
            error!("Error during backfill process: {e}");
            1
        }
    }
}
