//! TOML-based dashboard configuration and preset definitions.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Top-level dashboard configuration parsed from TOML.
///
/// All fields have defaults matching the `default` preset. Load from TOML
/// with [`DashboardConfig::from_toml_file`] or pick a built-in preset with
/// [`DashboardConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Timer periods for the clock, simulation and connection loops.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Global simulation parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Solar array parameters.
    #[serde(default)]
    pub solar: SolarConfig,
    /// Wind turbine parameters.
    #[serde(default)]
    pub wind: WindConfig,
    /// Biogas generator parameters.
    #[serde(default)]
    pub biogas: BiogasConfig,
    /// Diurnal demand profile.
    #[serde(default)]
    pub demand: DemandConfig,
    /// Battery storage policy.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Weather starting point and random-walk steps.
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Random alert feed.
    #[serde(default)]
    pub alerts: AlertConfig,
    /// Generation vs demand chart.
    #[serde(default)]
    pub chart: ChartConfig,
    /// Cosmetic connection flapping.
    #[serde(default)]
    pub connection: ConnectionConfig,
}

/// Timer periods in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Clock label refresh period.
    pub clock_interval_ms: u64,
    /// Simulation + render period.
    pub simulation_interval_ms: u64,
    /// Connection check period.
    pub connection_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            clock_interval_ms: 1_000,
            simulation_interval_ms: 3_000,
            connection_interval_ms: 30_000,
        }
    }
}

impl TimingConfig {
    pub fn clock_interval(&self) -> Duration {
        Duration::from_millis(self.clock_interval_ms)
    }

    pub fn simulation_interval(&self) -> Duration {
        Duration::from_millis(self.simulation_interval_ms)
    }

    pub fn connection_interval(&self) -> Duration {
        Duration::from_millis(self.connection_interval_ms)
    }
}

/// Global simulation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master random seed.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

/// Solar array parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Clear-sky irradiance floor (W/m²).
    pub irradiance_base: f64,
    /// Upper bound of the uniform irradiance jitter added to the base (W/m²).
    pub irradiance_jitter: f64,
    /// DC output at 1000 W/m² (kW).
    pub peak_kw: f64,
    /// Inverter DC→AC efficiency (0.0–1.0).
    pub inverter_efficiency: f64,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            irradiance_base: 850.0,
            irradiance_jitter: 100.0,
            peak_kw: 52.0,
            inverter_efficiency: 0.94,
        }
    }
}

/// Wind turbine parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindConfig {
    /// Mean wind speed (m/s).
    pub base_speed_ms: f64,
    /// Half-width of the uniform speed jitter (m/s).
    pub speed_jitter_ms: f64,
    /// Speed at which the turbine reaches rated output (m/s).
    pub rated_speed_ms: f64,
    /// Rated output (kW).
    pub rated_kw: f64,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            base_speed_ms: 8.2,
            speed_jitter_ms: 2.0,
            rated_speed_ms: 12.0,
            rated_kw: 25.0,
        }
    }
}

/// Biogas generator parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BiogasConfig {
    /// Base output (kW).
    pub base_kw: f64,
    /// Half-width of the uniform output jitter (kW).
    pub jitter_kw: f64,
    /// Output at or below which the unit reports `reduced` (kW).
    pub reduced_below_kw: f64,
}

impl Default for BiogasConfig {
    fn default() -> Self {
        Self {
            base_kw: 18.5,
            jitter_kw: 1.0,
            reduced_below_kw: 15.0,
        }
    }
}

/// Diurnal demand profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    /// Mean load (kW).
    pub base_kw: f64,
    /// Relative amplitude of the daily sinusoid.
    pub diurnal_amplitude: f64,
    /// Share of total load that is critical (0.0–1.0).
    pub critical_share: f64,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            base_kw: 65.5,
            diurnal_amplitude: 0.2,
            critical_share: 0.43,
        }
    }
}

/// Battery storage policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Reported total capacity (kWh).
    pub capacity_kwh: f64,
    /// SOC floor for discharging (%).
    pub soc_min: f64,
    /// SOC ceiling for charging (%).
    pub soc_max: f64,
    /// SOC gained per charging tick (%).
    pub charge_step: f64,
    /// SOC lost per discharging tick (%).
    pub discharge_step: f64,
    /// Fraction of surplus routed into the battery.
    pub charge_ratio: f64,
    /// Charge power limit (kW).
    pub max_charge_kw: f64,
    /// Discharge power limit (kW).
    pub max_discharge_kw: f64,
    /// Half-width of per-pack SOC jitter around the aggregate (%).
    pub pack_soc_jitter: f64,
    /// Nominal pack temperature (°C).
    pub pack_temp_c: f64,
    /// Half-width of per-pack temperature jitter (°C).
    pub pack_temp_jitter: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 150.0,
            soc_min: 20.0,
            soc_max: 95.0,
            charge_step: 0.1,
            discharge_step: 0.2,
            charge_ratio: 0.8,
            max_charge_kw: 15.0,
            max_discharge_kw: 20.0,
            pack_soc_jitter: 4.0,
            pack_temp_c: 24.0,
            pack_temp_jitter: 2.0,
        }
    }
}

/// Weather starting point and random-walk steps.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherConfig {
    /// Ambient temperature at startup (°C).
    pub initial_temperature: f64,
    /// Relative humidity at startup (%).
    pub initial_humidity: f64,
    /// Cloud cover at startup (%).
    pub initial_cloud_cover: f64,
    /// Max temperature change per tick (°C).
    pub temperature_step: f64,
    /// Lower temperature bound (°C).
    pub temperature_min: f64,
    /// Upper temperature bound (°C).
    pub temperature_max: f64,
    /// Max cloud cover change per tick (%).
    pub cloud_step: f64,
    /// Max humidity change per tick (%).
    pub humidity_step: f64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 28.5,
            initial_humidity: 65.0,
            initial_cloud_cover: 30.0,
            temperature_step: 0.5,
            temperature_min: 15.0,
            temperature_max: 40.0,
            cloud_step: 5.0,
            humidity_step: 2.0,
        }
    }
}

/// Random alert feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlertConfig {
    /// Probability of a new alert per simulation tick.
    pub probability: f64,
    /// Maximum alerts kept (newest first).
    pub max_len: usize,
    /// Threshold alerts raised from the simulated readings.
    #[serde(default)]
    pub rules: AlertRuleConfig,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            probability: 0.10,
            max_len: 5,
            rules: AlertRuleConfig::default(),
        }
    }
}

/// Threshold alerts. Each fires when its condition starts to hold.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlertRuleConfig {
    pub enabled: bool,
    /// Pack SOC (%) below which a warning is raised.
    pub pack_soc_warning: f64,
    /// Pack SOC (%) below which an info alert is raised.
    pub pack_soc_info: f64,
    /// Cloud cover (%) above which an info alert is raised.
    pub cloud_cover_info: f64,
    /// Nominal grid voltage (V).
    pub voltage_nominal: f64,
    /// Allowed deviation from nominal before a warning (V).
    pub voltage_tolerance: f64,
}

impl Default for AlertRuleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            pack_soc_warning: 30.0,
            pack_soc_info: 50.0,
            cloud_cover_info: 70.0,
            voltage_nominal: 230.0,
            voltage_tolerance: 10.0,
        }
    }
}

/// Generation vs demand chart.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    /// Points kept in the sliding window.
    pub window: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self { window: 10 }
    }
}

/// Cosmetic connection flapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Probability of dropping the link per check.
    pub drop_probability: f64,
    /// Shortest reconnect delay (s).
    pub reconnect_min_s: f64,
    /// Longest reconnect delay (s).
    pub reconnect_max_s: f64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            drop_probability: 0.05,
            reconnect_min_s: 3.0,
            reconnect_max_s: 10.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.soc_min"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl DashboardConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "overcast", "calm"];

    /// Heavy cloud cover with a dimmer clear-sky floor. Threshold alerts on.
    pub fn overcast() -> Self {
        Self {
            alerts: AlertConfig {
                rules: AlertRuleConfig {
                    enabled: true,
                    ..AlertRuleConfig::default()
                },
                ..AlertConfig::default()
            },
            solar: SolarConfig {
                irradiance_base: 600.0,
                ..SolarConfig::default()
            },
            weather: WeatherConfig {
                initial_cloud_cover: 75.0,
                initial_humidity: 82.0,
                initial_temperature: 22.0,
                ..WeatherConfig::default()
            },
            ..Self::default()
        }
    }

    /// Low wind: the turbine mostly idles and storage carries the deficit.
    pub fn calm() -> Self {
        Self {
            wind: WindConfig {
                base_speed_ms: 3.5,
                speed_jitter_ms: 1.0,
                ..WindConfig::default()
            },
            ..Self::default()
        }
    }

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default()),
            "overcast" => Ok(Self::overcast()),
            "calm" => Ok(Self::calm()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let t = &self.timing;
        for (field, ms) in [
            ("timing.clock_interval_ms", t.clock_interval_ms),
            ("timing.simulation_interval_ms", t.simulation_interval_ms),
            ("timing.connection_interval_ms", t.connection_interval_ms),
        ] {
            if ms == 0 {
                errors.push(ConfigError::new(field, "must be > 0"));
            }
        }

        let sol = &self.solar;
        if sol.peak_kw <= 0.0 {
            errors.push(ConfigError::new("solar.peak_kw", "must be > 0"));
        }
        if !(0.0..=1.0).contains(&sol.inverter_efficiency) {
            errors.push(ConfigError::new(
                "solar.inverter_efficiency",
                "must be in [0.0, 1.0]",
            ));
        }

        let w = &self.wind;
        if w.rated_speed_ms <= 0.0 {
            errors.push(ConfigError::new("wind.rated_speed_ms", "must be > 0"));
        }
        if w.speed_jitter_ms < 0.0 {
            errors.push(ConfigError::new("wind.speed_jitter_ms", "must be >= 0"));
        }

        if !(0.0..=1.0).contains(&self.demand.critical_share) {
            errors.push(ConfigError::new(
                "demand.critical_share",
                "must be in [0.0, 1.0]",
            ));
        }

        let bat = &self.battery;
        if !(0.0..=100.0).contains(&bat.soc_min) || !(0.0..=100.0).contains(&bat.soc_max) {
            errors.push(ConfigError::new(
                "battery.soc_min",
                "SOC bounds must be in [0, 100]",
            ));
        }
        if bat.soc_min >= bat.soc_max {
            errors.push(ConfigError::new("battery.soc_min", "must be < battery.soc_max"));
        }
        if bat.max_charge_kw < 0.0 || bat.max_discharge_kw < 0.0 {
            errors.push(ConfigError::new(
                "battery.max_charge_kw",
                "power limits must be >= 0",
            ));
        }

        let wx = &self.weather;
        if wx.temperature_min > wx.temperature_max {
            errors.push(ConfigError::new(
                "weather.temperature_min",
                "must be <= weather.temperature_max",
            ));
        }
        if !(0.0..=100.0).contains(&wx.initial_cloud_cover) {
            errors.push(ConfigError::new(
                "weather.initial_cloud_cover",
                "must be in [0, 100]",
            ));
        }
        if !(0.0..=100.0).contains(&wx.initial_humidity) {
            errors.push(ConfigError::new(
                "weather.initial_humidity",
                "must be in [0, 100]",
            ));
        }

        if !(0.0..=1.0).contains(&self.alerts.probability) {
            errors.push(ConfigError::new("alerts.probability", "must be in [0.0, 1.0]"));
        }
        if self.alerts.max_len == 0 {
            errors.push(ConfigError::new("alerts.max_len", "must be > 0"));
        }
        let rules = &self.alerts.rules;
        if rules.pack_soc_warning > rules.pack_soc_info {
            errors.push(ConfigError::new(
                "alerts.rules.pack_soc_warning",
                "must be <= alerts.rules.pack_soc_info",
            ));
        }
        if rules.voltage_tolerance < 0.0 {
            errors.push(ConfigError::new(
                "alerts.rules.voltage_tolerance",
                "must be >= 0",
            ));
        }
        if self.chart.window == 0 {
            errors.push(ConfigError::new("chart.window", "must be > 0"));
        }

        let c = &self.connection;
        if !(0.0..=1.0).contains(&c.drop_probability) {
            errors.push(ConfigError::new(
                "connection.drop_probability",
                "must be in [0.0, 1.0]",
            ));
        }
        if c.reconnect_min_s < 0.0 || c.reconnect_min_s > c.reconnect_max_s {
            errors.push(ConfigError::new(
                "connection.reconnect_min_s",
                "must be >= 0 and <= connection.reconnect_max_s",
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        let errors = DashboardConfig::default().validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in DashboardConfig::PRESETS {
            let cfg = DashboardConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = DashboardConfig::from_preset("stormy");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
        assert_eq!(e.field, "preset");
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[timing]
clock_interval_ms = 500
simulation_interval_ms = 2000
connection_interval_ms = 10000

[simulation]
seed = 7

[solar]
peak_kw = 60.0

[battery]
soc_min = 10.0
soc_max = 90.0

[chart]
window = 20
"#;
        let cfg = DashboardConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(7));
        assert_eq!(cfg.as_ref().map(|c| c.chart.window), Some(20));
        assert_eq!(
            cfg.as_ref().map(|c| c.timing.simulation_interval()),
            Some(Duration::from_secs(2))
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[battery]
soc_min = 20.0
flux_capacitor = true
"#;
        assert!(DashboardConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[wind]
rated_kw = 30.0
"#;
        let cfg = DashboardConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.wind.rated_kw), Some(30.0));
        assert_eq!(cfg.as_ref().map(|c| c.wind.rated_speed_ms), Some(12.0));
        assert_eq!(cfg.as_ref().map(|c| c.alerts.max_len), Some(5));
    }

    #[test]
    fn alert_rules_parse_from_nested_table() {
        let toml = r#"
[alerts]
probability = 0.0

[alerts.rules]
enabled = true
cloud_cover_info = 60.0
"#;
        let cfg = DashboardConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.alerts.rules.enabled), Some(true));
        assert_eq!(cfg.as_ref().map(|c| c.alerts.rules.cloud_cover_info), Some(60.0));
        assert_eq!(cfg.as_ref().map(|c| c.alerts.rules.pack_soc_warning), Some(30.0));
    }

    #[test]
    fn validation_catches_inverted_pack_thresholds() {
        let mut cfg = DashboardConfig::default();
        cfg.alerts.rules.pack_soc_warning = 60.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "alerts.rules.pack_soc_warning"));
    }

    #[test]
    fn validation_catches_inverted_soc_bounds() {
        let mut cfg = DashboardConfig::default();
        cfg.battery.soc_min = 95.0;
        cfg.battery.soc_max = 20.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.soc_min"));
    }

    #[test]
    fn validation_catches_zero_window() {
        let mut cfg = DashboardConfig::default();
        cfg.chart.window = 0;
        cfg.timing.simulation_interval_ms = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "chart.window"));
        assert!(
            errors
                .iter()
                .any(|e| e.field == "timing.simulation_interval_ms")
        );
    }

    #[test]
    fn overcast_is_cloudier_than_default() {
        let base = DashboardConfig::default();
        let overcast = DashboardConfig::overcast();
        assert!(overcast.weather.initial_cloud_cover > base.weather.initial_cloud_cover);
        assert!(overcast.solar.irradiance_base < base.solar.irradiance_base);
    }
}
