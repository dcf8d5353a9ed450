//! Interfaces dos drivers externos.
//!
//! Conversor AD, display, PWM e codificador de pixels são colaboradores
//! externos: a estação só depende destas traits. No host são implementadas
//! por drivers simulados; na placa, pelos drivers reais.

use std::time::{Duration, Instant};

/// Falhas de periférico. Nunca são fatais: o consumidor registra e tenta de
/// novo no próximo ciclo.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    #[error("Falha de transporte em {device}: {reason}")]
    Transport { device: &'static str, reason: String },

    #[error("Dispositivo indisponível: {0}")]
    Unavailable(&'static str),

    #[error("Argumento inválido para {device}: {reason}")]
    InvalidArgument { device: &'static str, reason: String },
}

/// Conversor analógico-digital de 12 bits.
pub trait Adc: Send {
    /// Lê a entrada `input`. Não reporta falha; o valor pode sair da faixa.
    fn read_channel(&mut self, input: u8) -> u16;
}

/// Display monocromático com frame buffer local.
///
/// As primitivas de desenho só alteram o buffer; apenas [`flush`] toca o
/// barramento e pode falhar.
///
/// [`flush`]: DisplaySurface::flush
pub trait DisplaySurface: Send {
    fn clear(&mut self);
    fn draw_rect(&mut self, x: u8, y: u8, width: u8, height: u8);
    fn draw_line(&mut self, x0: u8, y0: u8, x1: u8, y1: u8);
    fn draw_text(&mut self, text: &str, x: u8, y: u8);
    /// Envia o frame buffer ao display físico.
    fn flush(&mut self) -> Result<(), DriverError>;
}

/// Canais de PWM usados pela estação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PwmChannel {
    Red,
    Green,
    Blue,
    Buzzer,
}

/// Periférico de modulação por largura de pulso.
pub trait Pwm: Send {
    /// Maior nível aceito pelo canal (nível = duty de 100%).
    fn wrap(&self, channel: PwmChannel) -> u16;
    fn set_duty(&mut self, channel: PwmChannel, level: u16) -> Result<(), DriverError>;
}

/// Codificador do protocolo de pixels (WS2812 via PIO).
pub trait PixelEncoder: Send {
    /// Escrita bloqueante de uma palavra GRB; uma chamada por LED.
    fn emit_pixel(&mut self, grb: u32) -> Result<(), DriverError>;
}

/// Fonte de tempo das tarefas. Permite testar cadências sem dormir.
pub trait Pacer: Send + Sync {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Relógio real: `Instant::now` e `thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}
