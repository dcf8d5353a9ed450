//! # Flood Core
//!
//! Crate compartilhada da Estação de Monitoramento de Cheias: leituras dos
//! sensores, classificação de alerta, configuração, cores dos atuadores,
//! canal de distribuição (fan-out) e as interfaces dos drivers de hardware.
//!
//! ## Módulos
//! - [`types`] – [`Reading`] e conversão de amostras brutas do ADC
//! - [`alerts`] – Thresholds e estado de alerta
//! - [`config`] – Constantes de compilação e configuração TOML da placa
//! - [`colors`] – Cores RGB e empacotamento GRB da matriz de LEDs
//! - [`fanout`] – Uma fila limitada por consumidor, envio não bloqueante
//! - [`hal`] – Traits dos drivers externos (ADC, display, PWM, pixels)

pub mod types;
pub mod alerts;
pub mod config;
pub mod colors;
pub mod fanout;
pub mod hal;

// Re-exports convenientes
pub use types::{Reading, raw_to_percent};
pub use alerts::{AlertState, classify};
pub use config::StationConfig;
pub use fanout::{Distributor, Subscription};
pub use hal::{DriverError, Pacer};
