//! Display OLED – mensagens de estado e leituras numéricas.
//!
//! Layout fixo em 128x64:
//!
//! ```text
//! ┌──────────────────────┐  (3,3) 122x60
//! │ mensagem linha 1     │  y=6
//! │ mensagem linha 2     │  y=16
//! ├──────────────────────┤  y=25
//! │ mensagem linha 3     │  y=28
//! ├──────────────────────┤  y=37
//! │ Nivel     │ Chuva    │  y=41
//! │ 70.0%     │ 24.4%    │  y=52
//! └──────────────────────┘
//! ```

use crate::consumer::Consumer;
use flood_core::config::DISPLAY_PERIOD;
use flood_core::hal::{DisplaySurface, DriverError, Pacer};
use flood_core::types::Reading;
use std::time::Duration;

/// Texto posicionado no display.
type Line = (&'static str, u8, u8);

const ALERT_MESSAGE: [Line; 3] = [
    ("Enchente Lida", 12, 6),
    ("Evacuar agora", 12, 16),
    ("  EMERGENCIA", 10, 28),
];

const NORMAL_MESSAGE: [Line; 3] = [
    ("CEPEDI   TIC37", 8, 6),
    ("EMBARCATECH", 20, 16),
    ("   FreeRTOS", 10, 28),
];

const WATER_LABEL: Line = ("Nivel", 10, 41);
const RAIN_LABEL: Line = ("Chuva", 78, 41);
const WATER_VALUE_POS: (u8, u8) = (10, 52);
const RAIN_VALUE_POS: (u8, u8) = (80, 52);

/// Porcentagem com uma casa decimal, ex.: `70.0%`.
pub fn format_percent(value: f32) -> String {
    format!("{value:.1}%")
}

pub struct DisplayConsumer<D> {
    display: D,
}

impl<D: DisplaySurface> DisplayConsumer<D> {
    pub fn new(display: D) -> Self {
        Self { display }
    }

    #[cfg(test)]
    pub fn surface(&self) -> &D {
        &self.display
    }

    fn draw_layout(&mut self) {
        self.display.draw_rect(3, 3, 122, 60);
        self.display.draw_line(3, 25, 123, 25);
        self.display.draw_line(3, 37, 123, 37);
        // Separa "Nivel" de "Chuva"
        self.display.draw_line(63, 41, 63, 60);
    }
}

impl<D: DisplaySurface> Consumer for DisplayConsumer<D> {
    fn name(&self) -> &'static str {
        "display"
    }

    fn render(&mut self, reading: &Reading, _pacer: &dyn Pacer) -> Result<(), DriverError> {
        self.display.clear();
        self.draw_layout();

        let message = if reading.alert() {
            &ALERT_MESSAGE
        } else {
            &NORMAL_MESSAGE
        };
        for (text, x, y) in message.iter().chain([&WATER_LABEL, &RAIN_LABEL]) {
            self.display.draw_text(text, *x, *y);
        }

        let (x, y) = WATER_VALUE_POS;
        self.display
            .draw_text(&format_percent(reading.water_level_pct()), x, y);
        let (x, y) = RAIN_VALUE_POS;
        self.display
            .draw_text(&format_percent(reading.rain_volume_pct()), x, y);

        self.display.flush()
    }

    fn dwell(&self) -> Duration {
        DISPLAY_PERIOD
    }
}
