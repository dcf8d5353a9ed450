//! Leitura dos sensores simulados.
//!
//! Uma [`Reading`] é produzida a cada ciclo de amostragem e copiada para a
//! fila de cada consumidor. Os campos são privados: o alerta só existe como
//! função das duas porcentagens.

use crate::alerts::{self, AlertState};
use crate::config::MAX_RAW;
use serde::{Deserialize, Serialize};

/// Converte uma amostra bruta do ADC em porcentagem (0–100%).
///
/// Valores acima de [`MAX_RAW`] são saturados antes da conversão.
pub fn raw_to_percent(raw: u16) -> f32 {
    let raw = raw.min(MAX_RAW);
    (raw as f32 / MAX_RAW as f32) * 100.0
}

/// Resultado de um ciclo de amostragem.
///
/// Ao desserializar, `alert` é sempre recalculado a partir das porcentagens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Percentages")]
pub struct Reading {
    /// Nível de água (0–100%)
    water_level_pct: f32,
    /// Volume de chuva (0–100%)
    rain_volume_pct: f32,
    /// true se algum valor atingiu o threshold
    alert: bool,
}

impl Reading {
    /// Monta a leitura a partir das porcentagens, classificando o alerta.
    pub fn from_percentages(water_level_pct: f32, rain_volume_pct: f32) -> Self {
        let water_level_pct = water_level_pct.clamp(0.0, 100.0);
        let rain_volume_pct = rain_volume_pct.clamp(0.0, 100.0);
        Self {
            water_level_pct,
            rain_volume_pct,
            alert: alerts::classify(water_level_pct, rain_volume_pct),
        }
    }

    /// Monta a leitura a partir das amostras brutas dos dois canais.
    pub fn from_raw(water_raw: u16, rain_raw: u16) -> Self {
        Self::from_percentages(raw_to_percent(water_raw), raw_to_percent(rain_raw))
    }

    pub fn water_level_pct(&self) -> f32 {
        self.water_level_pct
    }

    pub fn rain_volume_pct(&self) -> f32 {
        self.rain_volume_pct
    }

    pub fn alert(&self) -> bool {
        self.alert
    }

    pub fn state(&self) -> AlertState {
        AlertState::from_flag(self.alert)
    }
}

/// Forma serializada aceita na entrada: só as duas porcentagens.
#[derive(Deserialize)]
struct Percentages {
    water_level_pct: f32,
    rain_volume_pct: f32,
}

impl From<Percentages> for Reading {
    fn from(p: Percentages) -> Self {
        Reading::from_percentages(p.water_level_pct, p.rain_volume_pct)
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
