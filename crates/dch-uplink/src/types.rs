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

//! Price record types read from the store

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{Result, UplinkError};

/// Timestamp layout expected by the DCH observations API
pub const DCH_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A single regional price record (typically 5-minute settlement intervals)
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub settlement_date: SettlementTime,
    /// Regional reference price ($/MWh)
    pub rrp: f64,
}

impl PriceRecord {
    pub fn new(settlement_date: impl Into<SettlementTime>, rrp: f64) -> Self {
        Self {
            settlement_date: settlement_date.into(),
            rrp,
        }
    }
}

/// Settlement timestamp as delivered by the store.
///
/// Stores hand back either a structured timestamp or text that still has to
/// be parsed. Naive values are taken to already be UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementTime {
    Utc(DateTime<Utc>),
    Naive(NaiveDateTime),
    Raw(String),
}

impl SettlementTime {
    pub fn to_utc(&self) -> Result<DateTime<Utc>> {
        match self {
            Self::Utc(ts) => Ok(*ts),
            Self::Naive(ts) => Ok(ts.and_utc()),
            Self::Raw(raw) => parse_settlement(raw),
        }
    }

    /// Format as `YYYY-MM-DDTHH:MM:SSZ`, dropping sub-second precision
    pub fn to_dch_string(&self) -> Result<String> {
        Ok(self.to_utc()?.format(DCH_TIMESTAMP_FORMAT).to_string())
    }
}

impl From<DateTime<Utc>> for SettlementTime {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Utc(ts)
    }
}

impl From<NaiveDateTime> for SettlementTime {
    fn from(ts: NaiveDateTime) -> Self {
        Self::Naive(ts)
    }
}

impl From<String> for SettlementTime {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<&str> for SettlementTime {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_owned())
    }
}

fn parse_settlement(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(trimmed, fmt) {
            return Ok(ts.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(ts.and_utc());
        }
    }

    // Bare dates settle at midnight
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
        .ok_or_else(|| UplinkError::Parse {
            value: raw.to_owned(),
            reason: "expected an ISO-8601 date or date-time".to_owned(),
        })
}
