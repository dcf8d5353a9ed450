//! Sistema de alertas – classificação por thresholds fixos.

use crate::config::{RAIN_THRESHOLD_PCT, WATER_THRESHOLD_PCT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Estado de alerta derivado de uma leitura.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertState {
    Normal,
    Alert,
}

impl AlertState {
    pub fn from_flag(alert: bool) -> Self {
        if alert { AlertState::Alert } else { AlertState::Normal }
    }

    pub fn is_alert(self) -> bool {
        self == AlertState::Alert
    }
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertState::Normal => f.write_str("normal"),
            AlertState::Alert => f.write_str("ALERTA"),
        }
    }
}

/// Há alerta se a água atingiu 70% ou a chuva atingiu 80%.
pub fn classify(water_level_pct: f32, rain_volume_pct: f32) -> bool {
    water_level_pct >= WATER_THRESHOLD_PCT || rain_volume_pct >= RAIN_THRESHOLD_PCT
}
