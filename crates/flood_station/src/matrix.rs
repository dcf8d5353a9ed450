//! Matriz de LEDs 5x5 – pintura uniforme a cada leitura.

use crate::consumer::Consumer;
use flood_core::colors;
use flood_core::config::{MATRIX_CELLS, MATRIX_PERIOD};
use flood_core::hal::{DriverError, Pacer, PixelEncoder};
use flood_core::types::Reading;
use std::time::Duration;

pub struct MatrixConsumer<E> {
    encoder: E,
}

impl<E: PixelEncoder> MatrixConsumer<E> {
    pub fn new(encoder: E) -> Self {
        Self { encoder }
    }

    #[cfg(test)]
    pub fn encoder(&self) -> &E {
        &self.encoder
    }
}

impl<E: PixelEncoder> Consumer for MatrixConsumer<E> {
    fn name(&self) -> &'static str {
        "matrix"
    }

    fn render(&mut self, reading: &Reading, _pacer: &dyn Pacer) -> Result<(), DriverError> {
        let word = colors::color_for(reading.state()).to_grb_word();
        for _ in 0..MATRIX_CELLS {
            self.encoder.emit_pixel(word)?;
        }
        Ok(())
    }

    fn dwell(&self) -> Duration {
        MATRIX_PERIOD
    }
}
