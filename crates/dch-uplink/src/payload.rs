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

//! DCH observation payload construction

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{Level, debug, enabled, info, warn};

use crate::classifier::{SignalLevel, classify};
use crate::config::UplinkConfig;
use crate::error::Result;
use crate::types::PriceRecord;

/// Key of the single point every observation refers to
pub const POINT_KEY: &str = "0";

/// Upload body for the DCH observations endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadEnvelope {
    pub metadata: Metadata,
    pub data: Vec<Observation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Point key -> composite point id
    pub points: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    /// UTC timestamp, `YYYY-MM-DDTHH:MM:SSZ`
    pub t: String,
    /// Key into `metadata.points`
    pub p: String,
    /// Signal level
    pub n: SignalLevel,
}

impl UploadEnvelope {
    /// Payload with no points and no observations
    #[must_use]
    pub fn empty() -> Self {
        Self {
            metadata: Metadata::default(),
            data: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }
}

/// Builds envelopes for one DCH data pool / point pair.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    composite_point_id: String,
}

impl PayloadBuilder {
    pub fn new(data_pool_id: &str, point_id: &str) -> Self {
        Self {
            composite_point_id: format!("evse:{data_pool_id}:{point_id}"),
        }
    }

    pub fn from_config(config: &UplinkConfig) -> Self {
        Self::new(&config.data_pool_id, &config.point_id)
    }

    pub fn composite_point_id(&self) -> &str {
        &self.composite_point_id
    }

    /// Build one envelope from records already ordered by settlement time.
    ///
    /// A record whose timestamp cannot be parsed fails the whole envelope.
    pub fn build(&self, records: &[PriceRecord]) -> Result<UploadEnvelope> {
        if records.is_empty() {
            warn!("No price signals provided to build a DCH payload");
            return Ok(UploadEnvelope::empty());
        }

        info!("Composite point ID is: {}", self.composite_point_id);

        let mut points = BTreeMap::new();
        points.insert(POINT_KEY.to_owned(), self.composite_point_id.clone());

        let mut data = Vec::with_capacity(records.len());
        for record in records {
            let t = record.settlement_date.to_dch_string()?;
            let n = classify(record.rrp);
            debug!(
                "Added observation: timestamp={t}, RRP={}, value={}",
                record.rrp,
                n.value()
            );
            data.push(Observation {
                t,
                p: POINT_KEY.to_owned(),
                n,
            });
        }

        let envelope = UploadEnvelope {
            metadata: Metadata { points },
            data,
        };

        info!("DCH payload constructed with {} observations", envelope.len());
        if enabled!(Level::DEBUG) {
            let pretty = serde_json::to_string_pretty(&envelope)?;
            debug!("DCH payload:\n{pretty}");
        }

        Ok(envelope)
    }
}
