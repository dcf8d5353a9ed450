//! Configuração da estação.
//!
//! Duas camadas:
//! - Constantes de compilação (thresholds, períodos, capacidades). Não são
//!   configuráveis em tempo de execução.
//! - [`StationConfig`], lida de um `config.toml` opcional, com a ligação física
//!   da placa (pinos, endereço I2C, wraps de PWM) e a fonte simulada de entrada.
//!   O arquivo nunca é escrito pela estação.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

// ──────────────────────────────────────────────
// Constantes de compilação
// ──────────────────────────────────────────────

/// Nível de água (%) a partir do qual há alerta.
pub const WATER_THRESHOLD_PCT: f32 = 70.0;

/// Volume de chuva (%) a partir do qual há alerta.
pub const RAIN_THRESHOLD_PCT: f32 = 80.0;

/// Maior valor do conversor de 12 bits.
pub const MAX_RAW: u16 = 4095;

/// Período de amostragem do ADC.
pub const SAMPLE_PERIOD: Duration = Duration::from_millis(100);

/// Intervalo mínimo entre renderizações do display.
pub const DISPLAY_PERIOD: Duration = Duration::from_millis(500);

/// Intervalo mínimo entre atualizações do LED RGB.
pub const INDICATOR_PERIOD: Duration = Duration::from_millis(200);

/// Ciclo completo do buzzer (ligado + desligado) ou espera em silêncio.
pub const ALARM_PERIOD: Duration = Duration::from_millis(500);

/// Tempo do tom dentro de um ciclo de alarme.
pub const ALARM_ON: Duration = Duration::from_millis(200);

/// Silêncio que fecha o ciclo de alarme.
pub const ALARM_OFF: Duration = Duration::from_millis(300);

/// Intervalo mínimo entre repinturas da matriz.
pub const MATRIX_PERIOD: Duration = Duration::from_millis(500);

/// Leituras pendentes por consumidor.
pub const FIFO_CAPACITY: usize = 5;

/// Número de LEDs da matriz 5x5.
pub const MATRIX_CELLS: usize = 25;

/// Display, LED RGB, buzzer e matriz.
pub const CONSUMER_COUNT: usize = 4;

/// Nome do arquivo de configuração ao lado do executável.
pub const CONFIG_FILE_NAME: &str = "config.toml";

// ──────────────────────────────────────────────
// Hardware
// ──────────────────────────────────────────────

/// Ligação física da placa (BitDogLab / RP2040).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HardwareConfig {
    /// SDA do barramento I2C do display
    pub i2c_sda_pin: u8,
    /// SCL do barramento I2C do display
    pub i2c_scl_pin: u8,
    /// Frequência do I2C (Hz)
    pub i2c_baud_hz: u32,
    /// Endereço I2C do SSD1306
    pub display_address: u8,
    pub display_width: u8,
    pub display_height: u8,
    /// Entrada ADC do nível de água (eixo Y do joystick, GPIO 26)
    pub water_adc_input: u8,
    /// Entrada ADC do volume de chuva (eixo X do joystick, GPIO 27)
    pub rain_adc_input: u8,
    pub led_red_pin: u8,
    pub led_green_pin: u8,
    pub led_blue_pin: u8,
    /// Wrap do PWM do LED RGB (nível máximo)
    pub led_pwm_wrap: u16,
    pub buzzer_pin: u8,
    /// Wrap do PWM do buzzer
    pub buzzer_pwm_wrap: u16,
    /// Divisor de clock do PWM do buzzer
    pub buzzer_clkdiv: f32,
    /// Pino de dados da matriz WS2812
    pub matrix_pin: u8,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            i2c_sda_pin: 14,
            i2c_scl_pin: 15,
            i2c_baud_hz: 400_000,
            display_address: 0x3C,
            display_width: 128,
            display_height: 64,
            water_adc_input: 0,
            rain_adc_input: 1,
            led_red_pin: 13,
            led_green_pin: 11,
            led_blue_pin: 12,
            led_pwm_wrap: 255,
            buzzer_pin: 21,
            buzzer_pwm_wrap: 12_500,
            buzzer_clkdiv: 125.0,
            matrix_pin: 7,
        }
    }
}

// ──────────────────────────────────────────────
// Simulação
// ──────────────────────────────────────────────

/// Como o ADC simulado produz amostras no host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMode {
    /// Onda triangular em cada canal; alterna entre normal e alerta
    Sweep,
    /// Valores brutos fixos
    Fixed,
}

/// Fonte de entrada simulada.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub mode: SimulationMode,
    /// Valor bruto do nível de água no modo fixo
    pub water_raw: u16,
    /// Valor bruto da chuva no modo fixo
    pub rain_raw: u16,
    /// Período da onda do nível de água (segundos)
    pub water_sweep_secs: f64,
    /// Período da onda da chuva (segundos)
    pub rain_sweep_secs: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mode: SimulationMode::Sweep,
            water_raw: 1000,
            rain_raw: 1000,
            water_sweep_secs: 20.0,
            rain_sweep_secs: 33.0,
        }
    }
}

// ──────────────────────────────────────────────
// Raiz
// ──────────────────────────────────────────────

/// Configuração raiz da estação.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StationConfig {
    pub hardware: HardwareConfig,
    pub simulation: SimulationConfig,
}

impl StationConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<StationConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        StationConfig::default()
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join(CONFIG_FILE_NAME)
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let hw = &self.hardware;
        let sim = &self.simulation;

        if hw.display_address > 0x7F {
            errors.push(format!(
                "Endereço I2C do display inválido: 0x{:02X} (máximo 0x7F)",
                hw.display_address
            ));
        }
        if hw.display_width == 0 || hw.display_height == 0 {
            errors.push("Dimensões do display não podem ser 0".into());
        }
        if hw.water_adc_input == hw.rain_adc_input {
            errors.push(format!(
                "Nível e chuva usam a mesma entrada ADC ({})",
                hw.water_adc_input
            ));
        }
        if hw.led_pwm_wrap == 0 || hw.buzzer_pwm_wrap == 0 {
            errors.push("Wrap de PWM não pode ser 0".into());
        }
        if hw.buzzer_clkdiv < 1.0 || hw.buzzer_clkdiv >= 256.0 {
            errors.push(format!(
                "Divisor de clock do buzzer inválido: {} (1.0–255.9)",
                hw.buzzer_clkdiv
            ));
        }
        if sim.water_raw > MAX_RAW || sim.rain_raw > MAX_RAW {
            errors.push(format!(
                "Valores brutos simulados acima de {MAX_RAW} serão saturados"
            ));
        }
        if sim.water_sweep_secs <= 0.0 || sim.rain_sweep_secs <= 0.0 {
            errors.push("Períodos de varredura devem ser positivos".into());
        }

        errors
    }
}
