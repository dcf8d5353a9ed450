//! Dublês de teste: drivers e relógio que gravam tudo em um log comum.

use flood_core::hal::{DisplaySurface, DriverError, Pacer, PixelEncoder, Pwm, PwmChannel};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Evento observado por um dublê.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Duty(PwmChannel, u16),
    Sleep(Duration),
    Clear,
    Rect(u8, u8, u8, u8),
    Line(u8, u8, u8, u8),
    Text(String, u8, u8),
    Flush,
    Pixel(u32),
}

#[derive(Debug, Clone, Default)]
pub struct Log(Arc<Mutex<Vec<Event>>>);

impl Log {
    pub fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

type SleepHook = Box<dyn FnMut(Duration) + Send>;

/// Relógio virtual: registra cada espera e avança o tempo sem dormir.
pub struct RecordingPacer {
    log: Log,
    origin: Instant,
    elapsed: Mutex<Duration>,
    hook: Mutex<Option<SleepHook>>,
}

impl RecordingPacer {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            origin: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
            hook: Mutex::new(None),
        }
    }

    /// Executa `hook` a cada espera (ex.: publicar leituras no meio de um ciclo).
    pub fn on_sleep(self, hook: impl FnMut(Duration) + Send + 'static) -> Self {
        *self.hook.lock().unwrap() = Some(Box::new(hook));
        self
    }

    /// Avança o relógio sem registrar espera (simula trabalho).
    pub fn advance(&self, d: Duration) {
        *self.elapsed.lock().unwrap() += d;
    }
}

impl Pacer for RecordingPacer {
    fn now(&self) -> Instant {
        self.origin + *self.elapsed.lock().unwrap()
    }

    fn sleep(&self, duration: Duration) {
        self.log.push(Event::Sleep(duration));
        self.advance(duration);
        if let Some(hook) = self.hook.lock().unwrap().as_mut() {
            hook(duration);
        }
    }
}

/// PWM que grava cada escrita aplicada e guarda o nível atual de cada canal.
pub struct RecordingPwm {
    log: Log,
    wrap_led: u16,
    wrap_buzzer: u16,
    levels: HashMap<PwmChannel, u16>,
    failures: Vec<(PwmChannel, u16)>,
}

impl RecordingPwm {
    pub fn new(log: Log, wrap_led: u16, wrap_buzzer: u16) -> Self {
        Self {
            log,
            wrap_led,
            wrap_buzzer,
            levels: HashMap::new(),
            failures: Vec::new(),
        }
    }

    /// A próxima escrita de `level` em `channel` falha e não é aplicada.
    pub fn fail_write(mut self, channel: PwmChannel, level: u16) -> Self {
        self.failures.push((channel, level));
        self
    }

    pub fn level(&self, channel: PwmChannel) -> u16 {
        self.levels.get(&channel).copied().unwrap_or(0)
    }
}

impl Pwm for RecordingPwm {
    fn wrap(&self, channel: PwmChannel) -> u16 {
        match channel {
            PwmChannel::Buzzer => self.wrap_buzzer,
            _ => self.wrap_led,
        }
    }

    fn set_duty(&mut self, channel: PwmChannel, level: u16) -> Result<(), DriverError> {
        if let Some(i) = self.failures.iter().position(|f| *f == (channel, level)) {
            self.failures.remove(i);
            return Err(DriverError::Unavailable("pwm"));
        }
        self.log.push(Event::Duty(channel, level));
        self.levels.insert(channel, level);
        Ok(())
    }
}

/// Display que grava as primitivas; `flush` falha nas primeiras `failures` chamadas.
pub struct RecordingDisplay {
    log: Log,
    failures: usize,
}

impl RecordingDisplay {
    pub fn new(log: Log) -> Self {
        Self { log, failures: 0 }
    }

    pub fn failing(log: Log, failures: usize) -> Self {
        Self { log, failures }
    }
}

impl DisplaySurface for RecordingDisplay {
    fn clear(&mut self) {
        self.log.push(Event::Clear);
    }

    fn draw_rect(&mut self, x: u8, y: u8, width: u8, height: u8) {
        self.log.push(Event::Rect(x, y, width, height));
    }

    fn draw_line(&mut self, x0: u8, y0: u8, x1: u8, y1: u8) {
        self.log.push(Event::Line(x0, y0, x1, y1));
    }

    fn draw_text(&mut self, text: &str, x: u8, y: u8) {
        self.log.push(Event::Text(text.to_string(), x, y));
    }

    fn flush(&mut self) -> Result<(), DriverError> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(DriverError::Transport {
                device: "ssd1306",
                reason: "NACK".into(),
            });
        }
        self.log.push(Event::Flush);
        Ok(())
    }
}

pub struct RecordingPixels {
    log: Log,
}

impl RecordingPixels {
    pub fn new(log: Log) -> Self {
        Self { log }
    }
}

impl PixelEncoder for RecordingPixels {
    fn emit_pixel(&mut self, grb: u32) -> Result<(), DriverError> {
        self.log.push(Event::Pixel(grb));
        Ok(())
    }
}

/// Só os textos desenhados, na ordem.
pub fn texts(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Text(t, _, _) => Some(t.clone()),
            _ => None,
        })
        .collect()
}
