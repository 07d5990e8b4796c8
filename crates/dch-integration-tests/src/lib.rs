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

//! Fixtures for the end-to-end tests: a throwaway price database laid out
//! like the production `price_signal` table.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use dch_uplink::SqlitePriceSource;
use rusqlite::{Connection, params};
use tempfile::NamedTempFile;

#[derive(Debug)]
pub struct PriceDb {
    file: NamedTempFile,
}

impl PriceDb {
    pub fn new() -> Result<Self> {
        let file = NamedTempFile::new().context("Failed to create temp database")?;
        let conn = Connection::open(file.path())?;
        conn.execute_batch(
            "CREATE TABLE price_signal (
                regionid       TEXT NOT NULL,
                settlementdate TEXT NOT NULL,
                rrp            REAL NOT NULL
            );
            CREATE INDEX idx_price_signal_region_time
                ON price_signal(regionid, settlementdate);",
        )?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn insert(&self, region_id: &str, settlement_date: &str, rrp: f64) -> Result<()> {
        let conn = Connection::open(self.path())?;
        conn.execute(
            "INSERT INTO price_signal (regionid, settlementdate, rrp) VALUES (?1, ?2, ?3)",
            params![region_id, settlement_date, rrp],
        )?;
        Ok(())
    }

    /// Insert `count` five-minute records starting at `start`, cycling prices through all bands
    pub fn insert_series(&self, region_id: &str, start: DateTime<Utc>, count: u32) -> Result<()> {
        let mut conn = Connection::open(self.path())?;
        let tx = conn.transaction()?;
        for i in 0..count {
            let ts = start + TimeDelta::minutes(5 * i64::from(i));
            let rrp = f64::from(i % 3) * 500.0 + 100.0;
            tx.execute(
                "INSERT INTO price_signal (regionid, settlementdate, rrp) VALUES (?1, ?2, ?3)",
                params![region_id, ts.format("%Y-%m-%d %H:%M:%S").to_string(), rrp],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn source(&self) -> SqlitePriceSource {
        SqlitePriceSource::new(self.path(), Duration::from_secs(1))
    }
}
