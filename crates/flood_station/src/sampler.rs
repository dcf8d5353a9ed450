//! Amostrador – lê os dois canais do ADC a cada 100 ms e publica a leitura.
//!
//! A publicação nunca bloqueia: consumidor atrasado perde a leitura mais
//! antiga da sua fila. Os descartes são só contados e resumidos no log.

use flood_core::config::{HardwareConfig, MAX_RAW, SAMPLE_PERIOD};
use flood_core::fanout::Distributor;
use flood_core::hal::{Adc, Pacer};
use flood_core::types::Reading;
use tracing::{debug, info, warn};

/// Ciclos entre resumos de descartes (~10 s).
const STATS_EVERY: u64 = 100;

pub struct Sampler<A> {
    adc: A,
    water_input: u8,
    rain_input: u8,
    cycles: u64,
    anomalies: u64,
}

impl<A: Adc> Sampler<A> {
    pub fn new(adc: A, hw: &HardwareConfig) -> Self {
        Self {
            adc,
            water_input: hw.water_adc_input,
            rain_input: hw.rain_adc_input,
            cycles: 0,
            anomalies: 0,
        }
    }

    /// Lê os dois canais e monta a leitura.
    pub fn sample(&mut self) -> Reading {
        let water_raw = self.read(self.water_input);
        let rain_raw = self.read(self.rain_input);
        Reading::from_raw(water_raw, rain_raw)
    }

    /// Amostra fora da faixa é saturada em [`MAX_RAW`].
    fn read(&mut self, input: u8) -> u16 {
        let raw = self.adc.read_channel(input);
        if raw > MAX_RAW {
            self.anomalies += 1;
            warn!("ADC{input}: amostra fora da faixa ({raw}), saturando em {MAX_RAW}");
            return MAX_RAW;
        }
        raw
    }

    /// Um ciclo completo: amostra, publica e dorme o restante do período.
    pub fn cycle(&mut self, dist: &Distributor, pacer: &dyn Pacer) -> Reading {
        let cycle_start = pacer.now();

        let reading = self.sample();
        let report = dist.publish(reading);
        self.cycles += 1;

        debug!(
            "Nível {:.1}% | Chuva {:.1}% | alerta={} | {} filas, {} descartes",
            reading.water_level_pct(),
            reading.rain_volume_pct(),
            reading.alert(),
            report.delivered,
            report.dropped
        );

        if self.cycles % STATS_EVERY == 0 {
            self.log_stats(dist);
        }

        // Dormir pelo tempo restante do período
        let elapsed = pacer.now().duration_since(cycle_start);
        if elapsed < SAMPLE_PERIOD {
            pacer.sleep(SAMPLE_PERIOD - elapsed);
        }

        reading
    }

    fn log_stats(&self, dist: &Distributor) {
        let summary = dist
            .stats()
            .iter()
            .map(|s| format!("{}: {} pend./{} desc.", s.name, s.pending, s.dropped))
            .collect::<Vec<_>>()
            .join(" | ");
        info!(
            "{} leituras publicadas, {} anomalias de ADC | {summary}",
            dist.published(),
            self.anomalies
        );
    }

    /// Laço infinito do amostrador.
    pub fn run(mut self, dist: Distributor, pacer: &dyn Pacer) -> ! {
        info!(
            "Amostrador iniciado (ADC{} nível, ADC{} chuva, {} ms)",
            self.water_input,
            self.rain_input,
            SAMPLE_PERIOD.as_millis()
        );
        loop {
            self.cycle(&dist, pacer);
        }
    }
}

#[cfg(test)]
impl<A: Adc> Sampler<A> {
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn anomalies(&self) -> u64 {
        self.anomalies
    }
}
