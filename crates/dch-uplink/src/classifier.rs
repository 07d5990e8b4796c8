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

//! RRP threshold classification into DCH signal levels

use serde::{Serialize, Serializer};

/// Prices below this are a normal signal ($/MWh).
pub const ELEVATED_THRESHOLD: f64 = 500.0;

/// Prices at or above this are an extreme signal ($/MWh).
pub const EXTREME_THRESHOLD: f64 = 1000.0;

/// Discrete price band reported to DCH as the observation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignalLevel {
    Normal,
    Elevated,
    Extreme,
}

impl SignalLevel {
    /// Numeric value sent on the wire
    #[must_use]
    pub fn value(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Elevated => 1,
            Self::Extreme => 2,
        }
    }
}

impl Serialize for SignalLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

/// Map a regional reference price onto a signal level.
///
/// Bands are closed below and open above. Zero and negative prices are
/// `Normal`. NaN fails both comparisons and ends up `Extreme`.
#[must_use]
pub fn classify(rrp: f64) -> SignalLevel {
    if rrp < ELEVATED_THRESHOLD {
        SignalLevel::Normal
    } else if rrp < EXTREME_THRESHOLD {
        SignalLevel::Elevated
    } else {
        SignalLevel::Extreme
    }
}
