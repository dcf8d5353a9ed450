//! Periféricos simulados para rodar a estação no host.
//!
//! Substituem ADC, SSD1306, PWM e o programa PIO da matriz. Mantêm o estado
//! que o hardware manteria e reportam pelo `tracing`.

use flood_core::config::{HardwareConfig, MATRIX_CELLS, MAX_RAW, SimulationConfig, SimulationMode};
use flood_core::hal::{Adc, DisplaySurface, DriverError, PixelEncoder, Pwm, PwmChannel};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

// ──────────────────────────────────────────────
// ADC
// ──────────────────────────────────────────────

/// Joystick simulado: cada eixo é um canal do ADC.
pub struct SimulatedAdc {
    config: SimulationConfig,
    water_input: u8,
    rain_input: u8,
    started: Instant,
}

impl SimulatedAdc {
    pub fn new(config: &SimulationConfig, hw: &HardwareConfig) -> Self {
        info!(
            "ADC simulado: modo {:?}, entradas {} (nível) e {} (chuva)",
            config.mode, hw.water_adc_input, hw.rain_adc_input
        );
        Self {
            config: config.clone(),
            water_input: hw.water_adc_input,
            rain_input: hw.rain_adc_input,
            started: Instant::now(),
        }
    }

    fn sweep(&self, period_secs: f64) -> u16 {
        triangle(self.started.elapsed().as_secs_f64(), period_secs)
    }
}

/// Onda triangular 0 → MAX_RAW → 0 com o período dado.
pub fn triangle(t_secs: f64, period_secs: f64) -> u16 {
    if period_secs <= 0.0 {
        return 0;
    }
    let phase = (t_secs % period_secs) / period_secs;
    let level = 1.0 - (2.0 * phase - 1.0).abs();
    (level * MAX_RAW as f64).round() as u16
}

impl Adc for SimulatedAdc {
    fn read_channel(&mut self, input: u8) -> u16 {
        let water = input == self.water_input;
        if !water && input != self.rain_input {
            return 0;
        }
        match self.config.mode {
            SimulationMode::Fixed if water => self.config.water_raw,
            SimulationMode::Fixed => self.config.rain_raw,
            SimulationMode::Sweep if water => self.sweep(self.config.water_sweep_secs),
            SimulationMode::Sweep => self.sweep(self.config.rain_sweep_secs),
        }
    }
}

// ──────────────────────────────────────────────
// Display SSD1306
// ──────────────────────────────────────────────

/// Frame buffer monocromático. Textos são guardados como estão (sem fonte).
pub struct SimDisplay {
    width: u8,
    height: u8,
    pixels: Vec<bool>,
    texts: Vec<(String, u8, u8)>,
    frames: u64,
}

impl SimDisplay {
    pub fn new(hw: &HardwareConfig) -> Self {
        let (width, height) = (hw.display_width, hw.display_height);
        info!(
            "SSD1306 simulado em 0x{:02X} ({width}x{height}), I2C SDA {} SCL {} a {} kHz",
            hw.display_address,
            hw.i2c_sda_pin,
            hw.i2c_scl_pin,
            hw.i2c_baud_hz / 1000
        );
        Self {
            width,
            height,
            pixels: vec![false; width as usize * height as usize],
            texts: Vec::new(),
            frames: 0,
        }
    }

    fn set(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32 {
            let idx = y as usize * self.width as usize + x as usize;
            self.pixels[idx] = true;
        }
    }
}

#[cfg(test)]
impl SimDisplay {
    pub fn pixel(&self, x: u8, y: u8) -> bool {
        x < self.width && y < self.height && self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| **p).count()
    }

    pub fn texts(&self) -> &[(String, u8, u8)] {
        &self.texts
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl DisplaySurface for SimDisplay {
    fn clear(&mut self) {
        self.pixels.fill(false);
        self.texts.clear();
    }

    fn draw_rect(&mut self, x: u8, y: u8, width: u8, height: u8) {
        if width == 0 || height == 0 {
            return;
        }
        let (x0, y0) = (x as i32, y as i32);
        let (x1, y1) = (x0 + width as i32 - 1, y0 + height as i32 - 1);
        for cx in x0..=x1 {
            self.set(cx, y0);
            self.set(cx, y1);
        }
        for cy in y0..=y1 {
            self.set(x0, cy);
            self.set(x1, cy);
        }
    }

    /// Bresenham.
    fn draw_line(&mut self, x0: u8, y0: u8, x1: u8, y1: u8) {
        let (mut x, mut y) = (x0 as i32, y0 as i32);
        let (x1, y1) = (x1 as i32, y1 as i32);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set(x, y);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: u8, y: u8) {
        self.texts.push((text.to_string(), x, y));
    }

    fn flush(&mut self) -> Result<(), DriverError> {
        self.frames += 1;
        let lines: Vec<&str> = self.texts.iter().map(|(t, _, _)| t.trim()).collect();
        debug!("SSD1306 frame #{}: {}", self.frames, lines.join(" / "));
        Ok(())
    }
}

// ──────────────────────────────────────────────
// PWM
// ──────────────────────────────────────────────

/// Slices de PWM configurados (canal → pino, wrap, nível atual).
pub struct SimPwm {
    channels: HashMap<PwmChannel, PwmSlice>,
}

#[derive(Debug, Clone, Copy)]
struct PwmSlice {
    pin: u8,
    wrap: u16,
    level: u16,
}

impl SimPwm {
    /// PWM dos três canais do LED RGB.
    pub fn rgb_led(hw: &HardwareConfig) -> Self {
        let channels = [
            (PwmChannel::Red, hw.led_red_pin),
            (PwmChannel::Green, hw.led_green_pin),
            (PwmChannel::Blue, hw.led_blue_pin),
        ]
        .into_iter()
        .map(|(ch, pin)| (ch, PwmSlice { pin, wrap: hw.led_pwm_wrap, level: 0 }))
        .collect();
        info!(
            "PWM LED RGB: GPIO {}/{}/{} wrap {}",
            hw.led_red_pin, hw.led_green_pin, hw.led_blue_pin, hw.led_pwm_wrap
        );
        Self { channels }
    }

    /// PWM do buzzer.
    pub fn buzzer(hw: &HardwareConfig) -> Self {
        let slice = PwmSlice {
            pin: hw.buzzer_pin,
            wrap: hw.buzzer_pwm_wrap,
            level: 0,
        };
        info!(
            "PWM buzzer: GPIO {} wrap {} clkdiv {:.1}",
            hw.buzzer_pin, hw.buzzer_pwm_wrap, hw.buzzer_clkdiv
        );
        Self {
            channels: HashMap::from([(PwmChannel::Buzzer, slice)]),
        }
    }

    #[cfg(test)]
    pub fn level(&self, channel: PwmChannel) -> Option<u16> {
        self.channels.get(&channel).map(|s| s.level)
    }
}

impl Pwm for SimPwm {
    fn wrap(&self, channel: PwmChannel) -> u16 {
        self.channels.get(&channel).map(|s| s.wrap).unwrap_or(0)
    }

    fn set_duty(&mut self, channel: PwmChannel, level: u16) -> Result<(), DriverError> {
        let slice = self
            .channels
            .get_mut(&channel)
            .ok_or(DriverError::Unavailable("pwm"))?;
        if level > slice.wrap {
            return Err(DriverError::InvalidArgument {
                device: "pwm",
                reason: format!("nível {level} acima do wrap {}", slice.wrap),
            });
        }
        if slice.level != level {
            debug!("PWM GPIO{} ({channel:?}): {} → {level}", slice.pin, slice.level);
        }
        slice.level = level;
        Ok(())
    }
}

// ──────────────────────────────────────────────
// Matriz WS2812 (PIO)
// ──────────────────────────────────────────────

/// Recebe palavras GRB em sequência; a cada 25 fecha um quadro.
pub struct SimPixelEncoder {
    cells: [u32; MATRIX_CELLS],
    cursor: usize,
    frames: u64,
}

impl SimPixelEncoder {
    pub fn new(pin: u8) -> Self {
        info!("PIO matriz WS2812 simulada no GPIO {pin} ({MATRIX_CELLS} LEDs)");
        Self {
            cells: [0; MATRIX_CELLS],
            cursor: 0,
            frames: 0,
        }
    }

    #[cfg(test)]
    pub fn cells(&self) -> &[u32; MATRIX_CELLS] {
        &self.cells
    }
}

impl PixelEncoder for SimPixelEncoder {
    fn emit_pixel(&mut self, grb: u32) -> Result<(), DriverError> {
        self.cells[self.cursor] = grb;
        self.cursor += 1;
        if self.cursor == MATRIX_CELLS {
            self.cursor = 0;
            self.frames += 1;
            debug!("Matriz quadro #{}: 0x{:08X}", self.frames, self.cells[0]);
        }
        Ok(())
    }
}
