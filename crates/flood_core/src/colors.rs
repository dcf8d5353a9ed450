//! Cores dos atuadores luminosos.
//!
//! O LED RGB recebe um nível de PWM por canal; a matriz WS2812 recebe uma
//! palavra de 32 bits com os componentes em ordem GRB nos 24 bits superiores.

use crate::alerts::AlertState;

/// Cor em 8 bits por canal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const OFF: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Níveis de PWM (r, g, b) para um contador com o `wrap` dado.
    pub fn pwm_levels(self, wrap: u16) -> (u16, u16, u16) {
        let scale = |c: u8| (c as u32 * wrap as u32 / 255) as u16;
        (scale(self.r), scale(self.g), scale(self.b))
    }

    /// Palavra enviada ao programa PIO da matriz: `GGRRBB00`.
    pub const fn to_grb_word(self) -> u32 {
        ((self.g as u32) << 24) | ((self.r as u32) << 16) | ((self.b as u32) << 8)
    }
}

/// Cor que representa cada estado: vermelho em alerta, verde no normal.
pub fn color_for(state: AlertState) -> Rgb {
    match state {
        AlertState::Alert => Rgb::RED,
        AlertState::Normal => Rgb::GREEN,
    }
}
