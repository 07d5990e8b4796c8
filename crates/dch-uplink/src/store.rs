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

//! Read-only access to stored price signals

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row, params};
use tracing::info;

use crate::config::DatabaseSettings;
use crate::error::Result;
use crate::types::{PriceRecord, SettlementTime};

// Integer settlement dates are Unix seconds, text ones ISO-8601
const SETTLED_AT: &str = "CASE typeof(settlementdate) \
     WHEN 'integer' THEN datetime(settlementdate, 'unixepoch') \
     ELSE datetime(settlementdate) END";

/// Source of price records for one market region.
///
/// Results are ordered by settlement time, oldest first.
pub trait PriceSource {
    /// Every stored record for the region
    fn fetch_all(&self, region_id: &str) -> Result<Vec<PriceRecord>>;

    /// Records for the region settled at or after `since`
    fn fetch_since(&self, region_id: &str, since: DateTime<Utc>) -> Result<Vec<PriceRecord>>;
}

/// SQLite-backed price source.
///
/// A connection is opened for each query and closed when the query returns,
/// so nothing is held open across an upload.
#[derive(Debug, Clone)]
pub struct SqlitePriceSource {
    db_path: PathBuf,
    busy_timeout: Duration,
}

impl SqlitePriceSource {
    pub fn new<P: AsRef<Path>>(db_path: P, busy_timeout: Duration) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            busy_timeout,
        }
    }

    pub fn from_settings(settings: &DatabaseSettings) -> Self {
        Self::new(&settings.path, settings.timeout())
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }
}

impl PriceSource for SqlitePriceSource {
    fn fetch_all(&self, region_id: &str) -> Result<Vec<PriceRecord>> {
        let conn = self.connect()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT settlementdate, rrp FROM price_signal
             WHERE regionid = ?1
             ORDER BY {SETTLED_AT} ASC"
        ))?;

        let records = stmt
            .query_map(params![region_id], price_record_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        info!(
            "Found {} total price signals for region {region_id}",
            records.len()
        );
        Ok(records)
    }

    fn fetch_since(&self, region_id: &str, since: DateTime<Utc>) -> Result<Vec<PriceRecord>> {
        let conn = self.connect()?;
        let since_str = since.format("%Y-%m-%d %H:%M:%S").to_string();

        let mut stmt = conn.prepare(&format!(
            "SELECT settlementdate, rrp FROM price_signal
             WHERE regionid = ?1
               AND ({SETTLED_AT} IS NULL OR {SETTLED_AT} >= datetime(?2))
             ORDER BY {SETTLED_AT} ASC"
        ))?;

        let records = stmt
            .query_map(params![region_id, since_str], price_record_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        info!(
            "Found {} price signals for region {region_id} since {since_str}",
            records.len()
        );
        Ok(records)
    }
}

fn price_record_from_row(row: &Row<'_>) -> rusqlite::Result<PriceRecord> {
    let settlement_date = match row.get_ref(0)? {
        ValueRef::Text(bytes) => SettlementTime::Raw(String::from_utf8_lossy(bytes).into_owned()),
        // Unix seconds
        ValueRef::Integer(ts) => match Utc.timestamp_opt(ts, 0).single() {
            Some(dt) => SettlementTime::Utc(dt),
            None => SettlementTime::Raw(ts.to_string()),
        },
        other => {
            return Err(rusqlite::Error::InvalidColumnType(
                0,
                "settlementdate".to_owned(),
                other.data_type(),
            ));
        }
    };

    Ok(PriceRecord {
        settlement_date,
        rrp: row.get(1)?,
    })
}
