//! # Estação de Monitoramento de Cheias
//!
//! Lê nível de água e volume de chuva (simulados por um joystick no ADC),
//! classifica o alerta e aciona quatro atuadores independentes: display OLED,
//! LED RGB, buzzer e matriz de LEDs.
//!
//! ## Tarefas
//! ```text
//! sampler (100 ms) ──► Distributor ──┬─► display   (500 ms)
//!                                    ├─► indicator (200 ms)
//!                                    ├─► alarm     (200 on + 300 off / 500 ms)
//!                                    └─► matrix    (500 ms)
//! ```
//!
//! Cada tarefa roda na sua thread. A única memória compartilhada são as filas
//! do [`Distributor`]; uma tarefa travada ou em pânico não afeta as outras.
//!
//! ## Uso
//! ```bash
//! flood_station                       # lê config.toml ao lado do executável, se existir
//! RUST_LOG=debug flood_station        # mostra cada leitura e cada quadro
//! ```

mod alarm;
mod consumer;
mod display;
mod indicator;
mod matrix;
mod sampler;
mod sim;
#[cfg(test)]
mod testing;

use alarm::AlarmConsumer;
use consumer::{Consumer, ConsumerTask};
use display::DisplayConsumer;
use flood_core::config::{
    CONSUMER_COUNT, FIFO_CAPACITY, RAIN_THRESHOLD_PCT, SAMPLE_PERIOD, StationConfig,
    WATER_THRESHOLD_PCT,
};
use flood_core::fanout::{Distributor, Subscription};
use flood_core::hal::ThreadPacer;
use indicator::IndicatorConsumer;
use matrix::MatrixConsumer;
use sampler::Sampler;
use sim::{SimDisplay, SimPixelEncoder, SimPwm, SimulatedAdc};
use std::thread::JoinHandle;
use tracing::{error, info, warn};

fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Carregar config (somente leitura) ──
    let config = StationConfig::load(&StationConfig::default_path());

    for problem in config.validate() {
        warn!("Config: {problem}");
    }

    let hw = &config.hardware;

    // ── Canal de distribuição: uma fila por consumidor ──
    let mut dist = Distributor::new(FIFO_CAPACITY);
    let display_sub = dist.subscribe("display");
    let indicator_sub = dist.subscribe("indicator");
    let alarm_sub = dist.subscribe("alarm");
    let matrix_sub = dist.subscribe("matrix");
    debug_assert_eq!(dist.subscriber_count(), CONSUMER_COUNT);

    // ── Periféricos (cada um pertence a uma única tarefa) ──
    let adc = SimulatedAdc::new(&config.simulation, hw);
    let oled = SimDisplay::new(hw);
    let led_pwm = SimPwm::rgb_led(hw);
    let buzzer_pwm = SimPwm::buzzer(hw);
    let pixels = SimPixelEncoder::new(hw.matrix_pin);

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   🌊 ESTAÇÃO DE MONITORAMENTO DE CHEIAS");
    println!("══════════════════════════════════════════════");
    println!("  Alerta:    nível ≥ {WATER_THRESHOLD_PCT:.0}% ou chuva ≥ {RAIN_THRESHOLD_PCT:.0}%");
    println!("  Amostra:   {} ms", SAMPLE_PERIOD.as_millis());
    println!("  Filas:     {CONSUMER_COUNT} × {FIFO_CAPACITY} leituras");
    println!("  Entrada:   {:?}", config.simulation.mode);
    println!("══════════════════════════════════════════════");
    println!();

    // ── Tarefas ──
    let _handles: Vec<JoinHandle<()>> = vec![
        spawn_consumer(DisplayConsumer::new(oled), display_sub),
        spawn_consumer(IndicatorConsumer::new(led_pwm), indicator_sub),
        spawn_consumer(AlarmConsumer::new(buzzer_pwm), alarm_sub),
        spawn_consumer(MatrixConsumer::new(pixels), matrix_sub),
        spawn_unit("sampler", move || {
            Sampler::new(adc, &config.hardware).run(dist, &ThreadPacer)
        }),
    ];

    info!("Estação ativa: 1 amostrador, {CONSUMER_COUNT} consumidores");

    // As tarefas rodam para sempre; a thread principal não faz mais nada
    loop {
        std::thread::park();
    }
}

/// Inicia um consumidor na sua própria thread.
fn spawn_consumer<C: Consumer + 'static>(consumer: C, sub: Subscription) -> JoinHandle<()> {
    spawn_unit(sub.name(), move || {
        let task = ConsumerTask::new(consumer).run(&sub, &ThreadPacer);
        error!(
            "[{}] consumidor encerrado: {} renderizações, {} falhas, último estado {:?}",
            sub.name(),
            task.renders(),
            task.faults(),
            task.last_state()
        );
    })
}

fn spawn_unit<F>(name: &'static str, body: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    std::thread::Builder::new()
        .name(name.into())
        .spawn(body)
        .expect("Falha ao criar thread")
}
