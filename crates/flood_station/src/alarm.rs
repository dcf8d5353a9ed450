//! Buzzer – bipe intermitente em alerta.
//!
//! Dois estados:
//! - `Silent`: duty 0, espera 500 ms.
//! - `Alarming`: tom a 50% por 200 ms, silêncio por 300 ms.
//!
//! Um ciclo iniciado sempre termina; leituras que chegam durante o ciclo só
//! são lidas na próxima iteração.

use crate::consumer::Consumer;
use flood_core::config::{ALARM_OFF, ALARM_ON, ALARM_PERIOD};
use flood_core::hal::{DriverError, Pacer, Pwm, PwmChannel};
use flood_core::types::Reading;
use std::time::Duration;
use tracing::warn;

/// Tentativas de zerar o buzzer antes de desistir do ciclo.
const SILENCE_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmMode {
    Silent,
    Alarming,
}

pub struct AlarmConsumer<P> {
    pwm: P,
    mode: AlarmMode,
}

impl<P: Pwm> AlarmConsumer<P> {
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            mode: AlarmMode::Silent,
        }
    }

    #[cfg(test)]
    pub fn mode(&self) -> AlarmMode {
        self.mode
    }

    #[cfg(test)]
    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    /// Nível de 50% do contador do buzzer.
    fn half_duty(&self) -> u16 {
        self.pwm.wrap(PwmChannel::Buzzer) / 2
    }

    /// Zera o buzzer, repetindo a escrita se o driver falhar.
    fn silence(&mut self) -> Result<(), DriverError> {
        let mut last = Ok(());
        for attempt in 1..=SILENCE_ATTEMPTS {
            last = self.pwm.set_duty(PwmChannel::Buzzer, 0);
            match &last {
                Ok(()) => break,
                Err(e) => warn!("[alarm] falha ao silenciar ({attempt}/{SILENCE_ATTEMPTS}): {e}"),
            }
        }
        last
    }
}

impl<P: Pwm> Consumer for AlarmConsumer<P> {
    fn name(&self) -> &'static str {
        "alarm"
    }

    fn render(&mut self, reading: &Reading, pacer: &dyn Pacer) -> Result<(), DriverError> {
        if !reading.alert() {
            self.mode = AlarmMode::Silent;
            return self.silence();
        }

        let level = self.half_duty();
        if let Err(e) = self.pwm.set_duty(PwmChannel::Buzzer, level) {
            // Sem tom o ciclo não começou: espera o período inteiro em silêncio
            self.mode = AlarmMode::Silent;
            let _ = self.silence();
            return Err(e);
        }
        self.mode = AlarmMode::Alarming;
        pacer.sleep(ALARM_ON);
        self.silence()
    }

    /// O silêncio de 300 ms fecha o ciclo de alarme.
    fn dwell(&self) -> Duration {
        match self.mode {
            AlarmMode::Alarming => ALARM_OFF,
            AlarmMode::Silent => ALARM_PERIOD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::ConsumerTask;
    use crate::testing::{Event, Log, RecordingPacer, RecordingPwm};
    use flood_core::fanout::Distributor;
    use std::sync::{Arc, Mutex};

    fn beep_cycle() -> Vec<Event> {
        vec![
            Event::Duty(PwmChannel::Buzzer, 6250),
            Event::Sleep(Duration::from_millis(200)),
            Event::Duty(PwmChannel::Buzzer, 0),
            Event::Sleep(Duration::from_millis(300)),
        ]
    }

    fn silent_cycle() -> Vec<Event> {
        vec![
            Event::Duty(PwmChannel::Buzzer, 0),
            Event::Sleep(Duration::from_millis(500)),
        ]
    }

    #[test]
    fn alert_readings_repeat_full_cycles() {
        let log = Log::default();
        let pacer = RecordingPacer::new(log.clone());
        let mut task = ConsumerTask::new(AlarmConsumer::new(RecordingPwm::new(log.clone(), 255, 12_500)));

        task.step(&Reading::from_raw(2867, 1000), &pacer);
        task.step(&Reading::from_raw(4095, 4095), &pacer);
        task.step(&Reading::from_raw(1000, 1000), &pacer);

        let expected: Vec<_> = [beep_cycle(), beep_cycle(), silent_cycle()].concat();
        assert_eq!(log.events(), expected);
        assert_eq!(task.consumer().mode(), AlarmMode::Silent);
    }

    #[test]
    fn cycle_is_never_interrupted() {
        let log = Log::default();
        let mut dist = Distributor::new(5);
        let sub = dist.subscribe("alarm");
        let dist = Arc::new(Mutex::new(dist));

        // Durante o tom chegam leituras normais
        let pacer = {
            let dist = dist.clone();
            RecordingPacer::new(log.clone()).on_sleep(move |d| {
                if d == ALARM_ON {
                    dist.lock().unwrap().publish(Reading::from_raw(0, 0));
                }
            })
        };
        let mut task = ConsumerTask::new(AlarmConsumer::new(RecordingPwm::new(log.clone(), 255, 12_500)));

        task.step(&Reading::from_raw(4095, 0), &pacer);
        assert_eq!(log.events(), beep_cycle());
        assert_eq!(sub.len(), 1);

        log.clear();
        let next = sub.try_recv().unwrap();
        task.step(&next, &pacer);
        assert_eq!(log.events(), silent_cycle());
    }

    #[test]
    fn silent_to_alarming_and_back() {
        let log = Log::default();
        let pacer = RecordingPacer::new(log.clone());
        let mut alarm = AlarmConsumer::new(RecordingPwm::new(log.clone(), 255, 12_500));
        assert_eq!(alarm.mode(), AlarmMode::Silent);

        alarm.render(&Reading::from_percentages(0.0, 80.0), &pacer).unwrap();
        assert_eq!(alarm.mode(), AlarmMode::Alarming);
        assert_eq!(alarm.dwell(), ALARM_OFF);

        alarm.render(&Reading::from_percentages(0.0, 79.9), &pacer).unwrap();
        assert_eq!(alarm.mode(), AlarmMode::Silent);
        assert_eq!(alarm.dwell(), ALARM_PERIOD);
    }

    #[test]
    fn full_cycle_lasts_alarm_period() {
        assert_eq!(ALARM_ON + ALARM_OFF, ALARM_PERIOD);
    }

    #[test]
    fn tone_is_cut_even_if_first_silence_write_fails() {
        let log = Log::default();
        let pacer = RecordingPacer::new(log.clone());
        let pwm = RecordingPwm::new(log.clone(), 255, 12_500).fail_write(PwmChannel::Buzzer, 0);
        let mut task = ConsumerTask::new(AlarmConsumer::new(pwm));

        task.step(&Reading::from_raw(4095, 0), &pacer);

        assert_eq!(log.events(), beep_cycle());
        assert_eq!(task.consumer().pwm().level(PwmChannel::Buzzer), 0);
        assert_eq!(task.faults(), 0);
    }

    #[test]
    fn failed_tone_waits_a_full_silent_period() {
        let log = Log::default();
        let pacer = RecordingPacer::new(log.clone());
        let pwm = RecordingPwm::new(log.clone(), 255, 12_500).fail_write(PwmChannel::Buzzer, 6250);
        let mut task = ConsumerTask::new(AlarmConsumer::new(pwm));

        task.step(&Reading::from_raw(4095, 0), &pacer);
        assert_eq!(log.events(), silent_cycle());
        assert_eq!(task.consumer().mode(), AlarmMode::Silent);
        assert_eq!(task.faults(), 1);

        log.clear();
        task.step(&Reading::from_raw(4095, 0), &pacer);
        assert_eq!(log.events(), beep_cycle());
    }

    #[test]
    fn persistent_silence_failure_is_reported() {
        let log = Log::default();
        let pacer = RecordingPacer::new(log.clone());
        let mut pwm = RecordingPwm::new(log.clone(), 255, 12_500);
        for _ in 0..SILENCE_ATTEMPTS {
            pwm = pwm.fail_write(PwmChannel::Buzzer, 0);
        }
        let mut alarm = AlarmConsumer::new(pwm);

        let result = alarm.render(&Reading::from_raw(0, 0), &pacer);
        assert_eq!(result, Err(DriverError::Unavailable("pwm")));
        assert!(log.events().is_empty());
    }
}
