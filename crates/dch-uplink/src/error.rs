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

//! Error types for the uplink crate

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UplinkError {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid settlement timestamp '{value}': {reason}")]
    Parse { value: String, reason: String },

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("price store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("payload serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a single upload attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("DCH rejected upload with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("DCH request failed: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, UplinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_error_maps_to_json() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = UplinkError::from(source);
        assert!(matches!(err, UplinkError::Json(_)));
        assert!(err.to_string().starts_with("payload serialization error"));
    }

    #[test]
    fn test_upload_error_is_transparent() {
        let err = UplinkError::from(UploadError::Status {
            status: 401,
            body: "unauthorised".to_owned(),
        });
        assert_eq!(
            err.to_string(),
            "DCH rejected upload with status 401: unauthorised"
        );
    }
}
