//! LED RGB – vermelho em alerta, verde no modo normal.

use crate::consumer::Consumer;
use flood_core::colors;
use flood_core::config::INDICATOR_PERIOD;
use flood_core::hal::{DriverError, Pacer, Pwm, PwmChannel};
use flood_core::types::Reading;
use std::time::Duration;
use tracing::warn;

pub struct IndicatorConsumer<P> {
    pwm: P,
}

impl<P: Pwm> IndicatorConsumer<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm }
    }

    #[cfg(test)]
    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    /// Tenta os três canais mesmo após uma falha; devolve o primeiro erro.
    fn write_levels(&mut self, (r, g, b): (u16, u16, u16)) -> Result<(), DriverError> {
        let results = [
            self.pwm.set_duty(PwmChannel::Red, r),
            self.pwm.set_duty(PwmChannel::Green, g),
            self.pwm.set_duty(PwmChannel::Blue, b),
        ];
        results.into_iter().collect()
    }
}

impl<P: Pwm> Consumer for IndicatorConsumer<P> {
    fn name(&self) -> &'static str {
        "indicator"
    }

    /// Sem histerese: cada leitura define a cor do zero.
    fn render(&mut self, reading: &Reading, _pacer: &dyn Pacer) -> Result<(), DriverError> {
        let wrap = self.pwm.wrap(PwmChannel::Red);
        let levels = colors::color_for(reading.state()).pwm_levels(wrap);
        if let Err(e) = self.write_levels(levels) {
            // Cor incompleta: apaga o LED em vez de deixar uma mistura acesa
            if let Err(off) = self.write_levels((0, 0, 0)) {
                warn!("[indicator] falha ao apagar o LED: {off}");
            }
            return Err(e);
        }
        Ok(())
    }

    fn dwell(&self) -> Duration {
        INDICATOR_PERIOD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Event, Log, RecordingPacer, RecordingPwm};

    fn render(readings: &[Reading]) -> Vec<Event> {
        let log = Log::default();
        let pacer = RecordingPacer::new(log.clone());
        let mut consumer = IndicatorConsumer::new(RecordingPwm::new(log.clone(), 255, 12_500));
        for r in readings {
            consumer.render(r, &pacer).unwrap();
        }
        log.events()
    }

    #[test]
    fn alert_is_red() {
        assert_eq!(
            render(&[Reading::from_raw(2867, 1000)]),
            vec![
                Event::Duty(PwmChannel::Red, 255),
                Event::Duty(PwmChannel::Green, 0),
                Event::Duty(PwmChannel::Blue, 0),
            ]
        );
    }

    #[test]
    fn normal_is_green() {
        assert_eq!(
            render(&[Reading::from_raw(1000, 1000)]),
            vec![
                Event::Duty(PwmChannel::Red, 0),
                Event::Duty(PwmChannel::Green, 255),
                Event::Duty(PwmChannel::Blue, 0),
            ]
        );
    }

    #[test]
    fn every_reading_reevaluates() {
        let events = render(&[
            Reading::from_percentages(70.0, 0.0),
            Reading::from_percentages(69.9, 0.0),
            Reading::from_percentages(70.0, 0.0),
        ]);
        let reds: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::Duty(PwmChannel::Red, level) => Some(*level),
                _ => None,
            })
            .collect();
        assert_eq!(reds, vec![255, 0, 255]);
    }

    fn levels(pwm: &RecordingPwm) -> (u16, u16, u16) {
        (
            pwm.level(PwmChannel::Red),
            pwm.level(PwmChannel::Green),
            pwm.level(PwmChannel::Blue),
        )
    }

    #[test]
    fn failed_write_never_leaves_mixed_color() {
        let log = Log::default();
        let pacer = RecordingPacer::new(log.clone());
        let pwm = RecordingPwm::new(log.clone(), 255, 12_500).fail_write(PwmChannel::Green, 0);
        let mut consumer = IndicatorConsumer::new(pwm);

        consumer.render(&Reading::from_raw(1000, 1000), &pacer).unwrap();
        assert_eq!(levels(consumer.pwm()), (0, 255, 0));

        let result = consumer.render(&Reading::from_raw(2867, 1000), &pacer);
        assert_eq!(result, Err(DriverError::Unavailable("pwm")));
        assert_eq!(levels(consumer.pwm()), (0, 0, 0));

        consumer.render(&Reading::from_raw(2867, 1000), &pacer).unwrap();
        assert_eq!(levels(consumer.pwm()), (255, 0, 0));
    }

    #[test]
    fn remaining_channels_are_written_after_a_failure() {
        let log = Log::default();
        let pacer = RecordingPacer::new(log.clone());
        let pwm = RecordingPwm::new(log.clone(), 255, 12_500).fail_write(PwmChannel::Red, 0);
        let mut consumer = IndicatorConsumer::new(pwm);

        assert!(consumer.render(&Reading::from_raw(1000, 1000), &pacer).is_err());
        assert_eq!(
            log.events(),
            vec![
                Event::Duty(PwmChannel::Green, 255),
                Event::Duty(PwmChannel::Blue, 0),
                Event::Duty(PwmChannel::Red, 0),
                Event::Duty(PwmChannel::Green, 0),
                Event::Duty(PwmChannel::Blue, 0),
            ]
        );
        assert_eq!(levels(consumer.pwm()), (0, 0, 0));
    }
}
