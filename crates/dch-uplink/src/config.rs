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

//! Configuration module for the uplink
//!
//! Values come from the process environment, seeded from a `.env` file when
//! one is present. Missing required values are fatal before any job starts.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, UplinkError};

pub const DEFAULT_UPLOAD_URL: &str =
    "https://dataclearinghouse.org/api/chronos/v1/observations/upload";
pub const DEFAULT_DATA_POOL_ID: &str = "evse_kerbside_wholesale_price_drf";
pub const DEFAULT_POINT_ID: &str = "wholesale_price_drf";
pub const DEFAULT_REGION_ID: &str = "NSW1";

const DEFAULT_DB_TIMEOUT_SECS: u64 = 10;
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CHUNK_SIZE: NonZeroUsize = NonZeroUsize::new(50).unwrap();

#[derive(Clone)]
pub struct UplinkConfig {
    /// DCH API key, sent as `X-Api-Key`
    pub api_key: String,

    /// DCH observations upload endpoint
    pub upload_url: String,

    pub data_pool_id: String,

    pub point_id: String,

    /// Market region whose prices are uploaded
    pub region_id: String,

    pub database: DatabaseSettings,

    /// Timeout for a single upload request (seconds)
    pub upload_timeout_secs: u64,

    /// Maximum observations per backfill upload
    pub chunk_size: NonZeroUsize,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: PathBuf,
    /// How long a query waits on a locked database (seconds)
    pub timeout_secs: u64,
}

impl UplinkConfig {
    /// Load from the environment, reading `.env` first if it exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| {
                UplinkError::Config(format!("Missing environment variable: {key}"))
            })
        };

        let config = Self {
            api_key: require("DCH_API_KEY")?,
            upload_url: get("DCH_UPLOAD_URL").unwrap_or_else(|| DEFAULT_UPLOAD_URL.to_owned()),
            data_pool_id: get("DCH_DATA_POOL_ID")
                .unwrap_or_else(|| DEFAULT_DATA_POOL_ID.to_owned()),
            point_id: get("DCH_POINT_ID").unwrap_or_else(|| DEFAULT_POINT_ID.to_owned()),
            region_id: get("PRICE_REGION_ID").unwrap_or_else(|| DEFAULT_REGION_ID.to_owned()),
            database: DatabaseSettings {
                path: PathBuf::from(require("PRICE_DB_PATH")?),
                timeout_secs: parse_or(
                    "PRICE_DB_TIMEOUT_SECS",
                    get("PRICE_DB_TIMEOUT_SECS"),
                    DEFAULT_DB_TIMEOUT_SECS,
                )?,
            },
            upload_timeout_secs: parse_or(
                "DCH_UPLOAD_TIMEOUT_SECS",
                get("DCH_UPLOAD_TIMEOUT_SECS"),
                DEFAULT_UPLOAD_TIMEOUT_SECS,
            )?,
            chunk_size: parse_or(
                "BACKFILL_CHUNK_SIZE",
                get("BACKFILL_CHUNK_SIZE"),
                DEFAULT_CHUNK_SIZE,
            )?,
        };

        Ok(config)
    }

    #[must_use]
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }
}

impl DatabaseSettings {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Keeps the API key out of logs
impl fmt::Debug for UplinkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UplinkConfig")
            .field("api_key", &"<redacted>")
            .field("upload_url", &self.upload_url)
            .field("data_pool_id", &self.data_pool_id)
            .field("point_id", &self.point_id)
            .field("region_id", &self.region_id)
            .field("database", &self.database)
            .field("upload_timeout_secs", &self.upload_timeout_secs)
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e| {
            UplinkError::Config(format!("Invalid value for {key} ('{value}'): {e}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DCH_API_KEY", "secret"),
        ("PRICE_DB_PATH", "/tmp/prices.db"),
    ];

    #[test]
    fn test_defaults() {
        let config = UplinkConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.upload_url, DEFAULT_UPLOAD_URL);
        assert_eq!(config.data_pool_id, DEFAULT_DATA_POOL_ID);
        assert_eq!(config.point_id, DEFAULT_POINT_ID);
        assert_eq!(config.region_id, "NSW1");
        assert_eq!(config.database.path, PathBuf::from("/tmp/prices.db"));
        assert_eq!(config.database.timeout(), Duration::from_secs(10));
        assert_eq!(config.upload_timeout(), Duration::from_secs(30));
        assert_eq!(config.chunk_size.get(), 50);
    }

    #[test]
    fn test_overrides() {
        let config = UplinkConfig::from_lookup(lookup_from(&[
            ("DCH_API_KEY", "secret"),
            ("PRICE_DB_PATH", "prices.db"),
            ("DCH_UPLOAD_URL", "http://127.0.0.1:9000/upload"),
            ("PRICE_REGION_ID", "VIC1"),
            ("DCH_UPLOAD_TIMEOUT_SECS", "5"),
            ("BACKFILL_CHUNK_SIZE", " 20 "),
        ]))
        .unwrap();
        assert_eq!(config.upload_url, "http://127.0.0.1:9000/upload");
        assert_eq!(config.region_id, "VIC1");
        assert_eq!(config.upload_timeout_secs, 5);
        assert_eq!(config.chunk_size.get(), 20);
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err =
            UplinkConfig::from_lookup(lookup_from(&[("PRICE_DB_PATH", "prices.db")])).unwrap_err();
        assert!(matches!(err, UplinkError::Config(ref msg) if msg.contains("DCH_API_KEY")));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let err = UplinkConfig::from_lookup(lookup_from(&[
            ("DCH_API_KEY", "secret"),
            ("PRICE_DB_PATH", "   "),
        ]))
        .unwrap_err();
        assert!(matches!(err, UplinkError::Config(ref msg) if msg.contains("PRICE_DB_PATH")));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = UplinkConfig::from_lookup(lookup_from(&[
            ("DCH_API_KEY", "secret"),
            ("PRICE_DB_PATH", "prices.db"),
            ("BACKFILL_CHUNK_SIZE", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, UplinkError::Config(ref msg) if msg.contains("BACKFILL_CHUNK_SIZE")));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = UplinkConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("secret"));
        assert!(printed.contains("<redacted>"));
    }
}
