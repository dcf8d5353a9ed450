//! Canal de distribuição (fan-out).
//!
//! Cada consumidor tem sua própria fila limitada. Uma publicação tenta inserir
//! a leitura em todas as filas sem bloquear; fila cheia descarta a leitura
//! mais antiga daquele consumidor, sem afetar os demais.
//!
//! ```text
//!                    ┌─► [fila display  ] ─► display
//! sampler ─publish───┼─► [fila indicator] ─► LED RGB
//!                    ├─► [fila alarm    ] ─► buzzer
//!                    └─► [fila matrix   ] ─► matriz
//! ```

use crate::types::Reading;
use crossbeam_channel::{Receiver, RecvError, Sender, TrySendError, bounded};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Lado produtor de uma fila de consumidor.
struct Outlet {
    name: &'static str,
    tx: Sender<Reading>,
    /// Handle extra do receptor, usado só para descartar a leitura mais antiga
    tail: Receiver<Reading>,
    dropped: AtomicU64,
}

/// Distribui cada [`Reading`] para todos os consumidores inscritos.
pub struct Distributor {
    capacity: usize,
    outlets: Vec<Outlet>,
    published: AtomicU64,
}

/// Resultado de uma publicação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishReport {
    /// Filas que receberam a leitura
    pub delivered: usize,
    /// Leituras antigas descartadas para abrir espaço
    pub dropped: usize,
}

/// Estatísticas de uma fila.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutletStats {
    pub name: &'static str,
    pub pending: usize,
    pub dropped: u64,
}

impl Distributor {
    /// Cria um distribuidor sem consumidores; cada fila terá `capacity` posições.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            outlets: Vec::new(),
            published: AtomicU64::new(0),
        }
    }

    /// Registra um consumidor e retorna o lado de leitura da sua fila.
    pub fn subscribe(&mut self, name: &'static str) -> Subscription {
        let (tx, rx) = bounded::<Reading>(self.capacity);
        self.outlets.push(Outlet {
            name,
            tx,
            tail: rx.clone(),
            dropped: AtomicU64::new(0),
        });
        Subscription { name, rx }
    }

    /// Publica sem bloquear em todas as filas.
    pub fn publish(&self, reading: Reading) -> PublishReport {
        let mut report = PublishReport::default();

        for outlet in &self.outlets {
            let mut pending = reading;
            loop {
                match outlet.tx.try_send(pending) {
                    Ok(()) => {
                        report.delivered += 1;
                        break;
                    }
                    Err(TrySendError::Full(r)) => {
                        // Consumidor atrasado: descarta a mais antiga e tenta de novo
                        if outlet.tail.try_recv().is_ok() {
                            outlet.dropped.fetch_add(1, Ordering::Relaxed);
                            report.dropped += 1;
                            debug!("Fila {} cheia, leitura mais antiga descartada", outlet.name);
                        }
                        pending = r;
                    }
                    // Não ocorre enquanto `tail` existir
                    Err(TrySendError::Disconnected(_)) => break,
                }
            }
        }

        self.published.fetch_add(1, Ordering::Relaxed);
        report
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn subscriber_count(&self) -> usize {
        self.outlets.len()
    }

    /// Total de leituras publicadas.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Leituras descartadas na fila do consumidor `name`.
    pub fn dropped(&self, name: &str) -> Option<u64> {
        self.outlets
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.dropped.load(Ordering::Relaxed))
    }

    pub fn stats(&self) -> Vec<OutletStats> {
        self.outlets
            .iter()
            .map(|o| OutletStats {
                name: o.name,
                pending: o.tx.len(),
                dropped: o.dropped.load(Ordering::Relaxed),
            })
            .collect()
    }
}

/// Lado consumidor de uma fila.
pub struct Subscription {
    name: &'static str,
    rx: Receiver<Reading>,
}

impl Subscription {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Bloqueia até a próxima leitura. Só falha se o distribuidor deixou de existir.
    pub fn recv(&self) -> Result<Reading, RecvError> {
        self.rx.recv()
    }

    /// Próxima leitura, se houver.
    pub fn try_recv(&self) -> Option<Reading> {
        self.rx.try_recv().ok()
    }

    /// Leituras pendentes.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
