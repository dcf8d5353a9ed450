//! Laço genérico dos consumidores.
//!
//! Cada consumidor bloqueia na sua fila, renderiza a leitura no atuador e
//! espera o próprio período antes de aceitar a próxima. Falha de driver é
//! registrada e absorvida: o consumidor tenta de novo no próximo ciclo.

use flood_core::alerts::AlertState;
use flood_core::fanout::Subscription;
use flood_core::hal::{DriverError, Pacer};
use flood_core::types::Reading;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Um atuador que reflete o estado de alerta.
pub trait Consumer: Send {
    fn name(&self) -> &'static str;

    /// Aplica a leitura ao atuador.
    fn render(&mut self, reading: &Reading, pacer: &dyn Pacer) -> Result<(), DriverError>;

    /// Espera depois de renderizar, antes da próxima leitura.
    fn dwell(&self) -> Duration;
}

/// Consumidor com o seu estado privado.
pub struct ConsumerTask<C> {
    consumer: C,
    /// Último estado visto (`None` até a primeira leitura)
    last_state: Option<AlertState>,
    /// Instante da última renderização bem-sucedida
    last_render: Option<Instant>,
    renders: u64,
    faults: u64,
}

impl<C: Consumer> ConsumerTask<C> {
    pub fn new(consumer: C) -> Self {
        Self {
            consumer,
            last_state: None,
            last_render: None,
            renders: 0,
            faults: 0,
        }
    }

    /// Processa uma leitura: renderiza e cumpre o período de espera.
    pub fn step(&mut self, reading: &Reading, pacer: &dyn Pacer) {
        let name = self.consumer.name();
        let state = reading.state();

        if self.last_state != Some(state) {
            match self.last_state {
                Some(prev) => info!("[{name}] {prev} → {state}"),
                None => info!("[{name}] estado inicial: {state}"),
            }
            self.last_state = Some(state);
        }

        match self.consumer.render(reading, pacer) {
            Ok(()) => {
                let now = pacer.now();
                let gap_ms = self
                    .last_render
                    .map(|t| now.duration_since(t).as_millis())
                    .unwrap_or(0);
                self.renders += 1;
                self.last_render = Some(now);
                debug!(
                    "[{name}] nível {:.1}% | chuva {:.1}% | {state} | +{gap_ms} ms",
                    reading.water_level_pct(),
                    reading.rain_volume_pct()
                );
            }
            Err(e) => {
                self.faults += 1;
                warn!("[{name}] falha ao renderizar: {e}");
            }
        }

        pacer.sleep(self.consumer.dwell());
    }

    /// Consome a fila até o distribuidor deixar de existir.
    pub fn run(mut self, sub: &Subscription, pacer: &dyn Pacer) -> Self {
        info!("[{}] aguardando leituras", self.consumer.name());
        while let Ok(reading) = sub.recv() {
            self.step(&reading, pacer);
        }
        warn!("[{}] fila encerrada", self.consumer.name());
        self
    }

    pub fn last_state(&self) -> Option<AlertState> {
        self.last_state
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }

    pub fn faults(&self) -> u64 {
        self.faults
    }
}

#[cfg(test)]
impl<C: Consumer> ConsumerTask<C> {
    pub fn last_render(&self) -> Option<Instant> {
        self.last_render
    }

    pub fn consumer(&self) -> &C {
        &self.consumer
    }
}
