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

//! DCH observations upload client

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{error, info};

use crate::config::UplinkConfig;
use crate::error::{Result, UplinkError, UploadError};
use crate::payload::UploadEnvelope;

const API_KEY_HEADER: &str = "X-Api-Key";
const USER_AGENT: &str = concat!("dch-uplink/", env!("CARGO_PKG_VERSION"));

/// Raw outcome of an accepted upload. The body is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub status_code: u16,
    pub body: String,
}

/// Sends one envelope to the observation sink.
///
/// Implementations make exactly one attempt per call. Retrying is up to the caller.
pub trait Uploader {
    fn upload(&self, envelope: &UploadEnvelope) -> std::result::Result<UploadResult, UploadError>;
}

pub struct DchClient {
    client: Client,
    upload_url: String,
    api_key: String,
}

impl DchClient {
    pub fn new(
        upload_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| UplinkError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            upload_url: upload_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &UplinkConfig) -> Result<Self> {
        Self::new(
            config.upload_url.clone(),
            config.api_key.clone(),
            config.upload_timeout(),
        )
    }
}

impl Uploader for DchClient {
    fn upload(&self, envelope: &UploadEnvelope) -> std::result::Result<UploadResult, UploadError> {
        info!("Uploading payload to DCH at {}", self.upload_url);

        let response = self
            .client
            .post(&self.upload_url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(envelope)
            .send()
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("request timed out: {e}")
                } else {
                    e.to_string()
                };
                error!("Failed to upload to DCH: {reason}");
                UploadError::Transport(reason)
            })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| UploadError::Transport(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            error!("DCH upload rejected with status {status}: {body}");
            return Err(UploadError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!("Successfully uploaded to DCH. Status: {}", status.as_u16());
        Ok(UploadResult {
            status_code: status.as_u16(),
            body,
        })
    }
}

impl fmt::Debug for DchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DchClient")
            .field("upload_url", &self.upload_url)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}
