//! System snapshot: the single in-memory record of the latest simulated readings.
//!
//! Field names serialize in camelCase so a JSON payload uses the same layout
//! as the external feed (`dcPower`, `overallSOC`, `batteryPacks`, ...).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::WeatherConfig;

/// Top-level keys accepted by [`SystemSnapshot::merge_partial`].
pub const SECTION_KEYS: &[&str] = &[
    "generation",
    "storage",
    "demand",
    "systemMetrics",
    "weather",
    "alerts",
];

/// Complete state of the simulated microgrid at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSnapshot {
    pub generation: Generation,
    pub storage: Storage,
    pub demand: Demand,
    pub system_metrics: SystemMetrics,
    pub weather: Weather,
    /// Most recent first.
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    pub solar: Solar,
    pub wind: Wind,
    #[serde(alias = "cbg")]
    pub biogas: Biogas,
    pub total_generation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solar {
    pub dc_power: f64,
    pub ac_power: f64,
    /// AC/DC ratio in percent.
    pub efficiency: f64,
    pub irradiance: f64,
    pub module_temp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wind {
    pub power: f64,
    pub wind_speed: f64,
    pub efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Biogas {
    pub power: f64,
    pub status: BiogasStatus,
    pub efficiency: f64,
}

/// Operating state reported by the biogas unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiogasStatus {
    Operational,
    Reduced,
}

impl fmt::Display for BiogasStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operational => f.write_str("operational"),
            Self::Reduced => f.write_str("reduced"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Storage {
    /// Aggregate state of charge (%).
    #[serde(rename = "overallSOC")]
    pub overall_soc: f64,
    pub total_capacity: f64,
    pub charge_power: f64,
    pub discharge_power: f64,
    pub battery_packs: Vec<BatteryPack>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryPack {
    pub id: u32,
    pub soc: f64,
    pub soh: f64,
    pub temp: f64,
    pub voltage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demand {
    pub total_load: f64,
    pub critical_loads: f64,
    pub flexible_loads: f64,
    pub peak_reduction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetrics {
    pub overall_efficiency: f64,
    pub uptime: f64,
    pub power_quality: PowerQuality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerQuality {
    pub voltage: f64,
    pub frequency: f64,
    pub thd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub irradiance: f64,
    pub cloud_cover: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    /// Wall-clock `HH:MM` at which the alert was raised.
    pub time: String,
}

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Info,
    Warning,
    Error,
}

impl AlertKind {
    pub const ALL: [AlertKind; 3] = [Self::Info, Self::Warning, Self::Error];
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("info"),
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Errors raised while merging an external partial snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot payload must be a JSON object")]
    NotAnObject,
    #[error("invalid `{key}` section: {source}")]
    InvalidSection {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot read snapshot \"{}\": {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Keys touched by a successful merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Known sections that were replaced, in key order.
    pub applied: Vec<String>,
    /// Keys that are not snapshot sections and were skipped.
    pub ignored: Vec<String>,
}

impl SystemSnapshot {
    /// Startup values: four packs at 72/68/65/63 % SOC and readings
    /// consistent with a clear midday.
    pub fn initial(weather: &WeatherConfig) -> Self {
        let packs = [(72.0, 96.0), (68.0, 95.0), (65.0, 97.0), (63.0, 94.0)]
            .into_iter()
            .zip(1..)
            .map(|((soc, soh), id)| BatteryPack {
                id,
                soc,
                soh,
                temp: 24.0,
                voltage: 47.5 + soc / 100.0 * 1.5,
            })
            .collect();

        Self {
            generation: Generation {
                solar: Solar {
                    dc_power: 32.8,
                    ac_power: 30.8,
                    efficiency: 94.0,
                    irradiance: 630.0,
                    module_temp: 41.1,
                },
                wind: Wind {
                    power: 8.0,
                    wind_speed: 8.2,
                    efficiency: 89.5,
                },
                biogas: Biogas {
                    power: 18.5,
                    status: BiogasStatus::Operational,
                    efficiency: 91.5,
                },
                total_generation: 57.3,
            },
            storage: Storage {
                overall_soc: 67.0,
                total_capacity: 150.0,
                charge_power: 0.0,
                discharge_power: 0.0,
                battery_packs: packs,
            },
            demand: Demand {
                total_load: 78.6,
                critical_loads: 33.8,
                flexible_loads: 44.8,
                peak_reduction: 25.0,
            },
            system_metrics: SystemMetrics {
                overall_efficiency: 92.8,
                uptime: 99.7,
                power_quality: PowerQuality {
                    voltage: 230.0,
                    frequency: 50.0,
                    thd: 1.8,
                },
            },
            weather: Weather {
                temperature: weather.initial_temperature,
                humidity: weather.initial_humidity,
                wind_speed: 8.2,
                irradiance: 630.0,
                cloud_cover: weather.initial_cloud_cover,
            },
            alerts: Vec::new(),
        }
    }

    /// Overwrites the top-level sections present in `partial` and leaves the
    /// others untouched.
    ///
    /// The merge is all-or-nothing: if any provided section fails to
    /// deserialize, `self` is not modified. Keys outside [`SECTION_KEYS`]
    /// (e.g. `timestamp`) are reported in [`MergeOutcome::ignored`].
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::NotAnObject`] for non-object payloads and
    /// [`SnapshotError::InvalidSection`] for sections with the wrong shape.
    pub fn merge_partial(&mut self, partial: &Value) -> Result<MergeOutcome, SnapshotError> {
        let Value::Object(incoming) = partial else {
            return Err(SnapshotError::NotAnObject);
        };

        let mut merged = self.clone();
        let mut outcome = MergeOutcome::default();
        for (key, value) in incoming {
            let applied = match key.as_str() {
                "generation" => section(key, value).map(|v| merged.generation = v),
                "storage" => section(key, value).map(|v| merged.storage = v),
                "demand" => section(key, value).map(|v| merged.demand = v),
                "systemMetrics" => section(key, value).map(|v| merged.system_metrics = v),
                "weather" => section(key, value).map(|v| merged.weather = v),
                "alerts" => section(key, value).map(|v| merged.alerts = v),
                _ => {
                    outcome.ignored.push(key.clone());
                    continue;
                }
            };
            applied?;
            outcome.applied.push(key.clone());
        }

        *self = merged;
        Ok(outcome)
    }

    /// Serializes the snapshot as a JSON object.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_json(&self) -> Result<Map<String, Value>, SnapshotError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(SnapshotError::NotAnObject),
        }
    }
}

fn section<T: DeserializeOwned>(key: &str, value: &Value) -> Result<T, SnapshotError> {
    T::deserialize(value).map_err(|source| SnapshotError::InvalidSection {
        key: key.to_string(),
        source,
    })
}

/// Reads a partial snapshot payload from a JSON file.
///
/// # Errors
///
/// Returns [`SnapshotError::Read`] on I/O failure and [`SnapshotError::Json`]
/// for malformed JSON.
pub fn read_partial(path: &Path) -> Result<Value, SnapshotError> {
    let raw = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

impl Default for SystemSnapshot {
    fn default() -> Self {
        Self::initial(&WeatherConfig::default())
    }
}

impl fmt::Display for SystemSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = &self.generation;
        let s = &self.storage;
        write!(
            f,
            "gen={:>5.1} kW (solar={:.1} wind={:.1} biogas={:.1}) | load={:>5.1} kW | \
             SOC={:>4.1}% (+{:.1}/-{:.1} kW) | {:.1}°C cloud={:.0}% | alerts={}",
            g.total_generation,
            g.solar.ac_power,
            g.wind.power,
            g.biogas.power,
            self.demand.total_load,
            s.overall_soc,
            s.charge_power,
            s.discharge_power,
            self.weather.temperature,
            self.weather.cloud_cover,
            self.alerts.len(),
        )
    }
}
