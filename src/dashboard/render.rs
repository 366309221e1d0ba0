//! Projection of dashboard state into a renderer-agnostic scene.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt;

use serde::Serialize;

use crate::config::DashboardConfig;
use crate::snapshot::{Alert, BatteryPack, SystemSnapshot};

use super::chart::ChartPoint;
use super::emergency::StopState;
use super::view::{NavItem, Panel};

/// The four radial gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GaugeKind {
    Solar,
    Wind,
    Biogas,
    Battery,
}

impl GaugeKind {
    pub const ALL: [GaugeKind; 4] = [Self::Solar, Self::Wind, Self::Biogas, Self::Battery];

    pub fn title(self) -> &'static str {
        match self {
            Self::Solar => "Solar",
            Self::Wind => "Wind",
            Self::Biogas => "Biogas",
            Self::Battery => "Battery SOC",
        }
    }
}

/// Value shown on one gauge against its full-scale maximum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaugeReading {
    pub kind: GaugeKind,
    pub value: f64,
    pub max: f64,
    pub unit: &'static str,
}

impl GaugeReading {
    /// Fill ratio in `[0, 1]`; zero when the scale is degenerate.
    pub fn ratio(&self) -> f64 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.value / self.max).clamp(0.0, 1.0)
    }

    /// Builds the four gauges from a snapshot. Full scale comes from the
    /// plant ratings in `cfg`.
    pub fn from_snapshot(snapshot: &SystemSnapshot, cfg: &DashboardConfig) -> [GaugeReading; 4] {
        let g = &snapshot.generation;
        [
            GaugeReading {
                kind: GaugeKind::Solar,
                value: g.solar.ac_power,
                max: cfg.solar.peak_kw,
                unit: "kW",
            },
            GaugeReading {
                kind: GaugeKind::Wind,
                value: g.wind.power,
                max: cfg.wind.rated_kw,
                unit: "kW",
            },
            GaugeReading {
                kind: GaugeKind::Biogas,
                value: g.biogas.power,
                max: cfg.biogas.base_kw + cfg.biogas.jitter_kw,
                unit: "kW",
            },
            GaugeReading {
                kind: GaugeKind::Battery,
                value: snapshot.storage.overall_soc,
                max: 100.0,
                unit: "%",
            },
        ]
    }
}

/// Text fields of the KPI panels. A closed set: every field always has a
/// target, so writers cannot miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiField {
    TotalGeneration,
    TotalLoad,
    NetBalance,
    OverallSoc,
    ChargePower,
    DischargePower,
    SolarEfficiency,
    ModuleTemp,
    WindSpeed,
    BiogasStatus,
    CriticalLoads,
    FlexibleLoads,
    PeakReduction,
    Efficiency,
    Uptime,
    GridVoltage,
    GridFrequency,
    Thd,
    Temperature,
    Humidity,
    CloudCover,
    Irradiance,
}

impl KpiField {
    /// Fields shown on a panel, in display order.
    pub fn for_panel(panel: Panel) -> &'static [KpiField] {
        use KpiField::*;
        match panel {
            Panel::Overview => &[
                TotalGeneration,
                TotalLoad,
                NetBalance,
                OverallSoc,
                Efficiency,
                Uptime,
                Temperature,
                CloudCover,
            ],
            Panel::Generation => &[
                TotalGeneration,
                SolarEfficiency,
                ModuleTemp,
                Irradiance,
                WindSpeed,
                BiogasStatus,
            ],
            Panel::Storage => &[OverallSoc, ChargePower, DischargePower],
            Panel::Demand => &[TotalLoad, CriticalLoads, FlexibleLoads, PeakReduction],
            Panel::Alerts => &[GridVoltage, GridFrequency, Thd, Humidity],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TotalGeneration => "Total generation",
            Self::TotalLoad => "Total load",
            Self::NetBalance => "Net balance",
            Self::OverallSoc => "Battery SOC",
            Self::ChargePower => "Charge power",
            Self::DischargePower => "Discharge power",
            Self::SolarEfficiency => "Inverter efficiency",
            Self::ModuleTemp => "Module temp",
            Self::WindSpeed => "Wind speed",
            Self::BiogasStatus => "Biogas status",
            Self::CriticalLoads => "Critical loads",
            Self::FlexibleLoads => "Flexible loads",
            Self::PeakReduction => "Peak reduction",
            Self::Efficiency => "System efficiency",
            Self::Uptime => "Uptime",
            Self::GridVoltage => "Voltage",
            Self::GridFrequency => "Frequency",
            Self::Thd => "THD",
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::CloudCover => "Cloud cover",
            Self::Irradiance => "Irradiance",
        }
    }

    /// Formats the field's current value with its unit.
    pub fn format(self, s: &SystemSnapshot) -> String {
        let g = &s.generation;
        match self {
            Self::TotalGeneration => format!("{:.1} kW", g.total_generation),
            Self::TotalLoad => format!("{:.1} kW", s.demand.total_load),
            Self::NetBalance => format!("{:+.1} kW", g.total_generation - s.demand.total_load),
            Self::OverallSoc => format!("{:.1}%", s.storage.overall_soc),
            Self::ChargePower => format!("{:.1} kW", s.storage.charge_power),
            Self::DischargePower => format!("{:.1} kW", s.storage.discharge_power),
            Self::SolarEfficiency => format!("{:.1}%", g.solar.efficiency),
            Self::ModuleTemp => format!("{:.1} °C", g.solar.module_temp),
            Self::WindSpeed => format!("{:.1} m/s", g.wind.wind_speed),
            Self::BiogasStatus => g.biogas.status.to_string(),
            Self::CriticalLoads => format!("{:.1} kW", s.demand.critical_loads),
            Self::FlexibleLoads => format!("{:.1} kW", s.demand.flexible_loads),
            Self::PeakReduction => format!("{:.1}%", s.demand.peak_reduction),
            Self::Efficiency => format!("{:.1}%", s.system_metrics.overall_efficiency),
            Self::Uptime => format!("{:.2}%", s.system_metrics.uptime),
            Self::GridVoltage => format!("{:.1} V", s.system_metrics.power_quality.voltage),
            Self::GridFrequency => format!("{:.2} Hz", s.system_metrics.power_quality.frequency),
            Self::Thd => format!("{:.2}%", s.system_metrics.power_quality.thd),
            Self::Temperature => format!("{:.1} °C", s.weather.temperature),
            Self::Humidity => format!("{:.0}%", s.weather.humidity),
            Self::CloudCover => format!("{:.0}%", s.weather.cloud_cover),
            Self::Irradiance => format!("{:.0} W/m²", s.weather.irradiance),
        }
    }
}

impl fmt::Display for KpiField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene<'a> {
    /// Number of simulation ticks so far.
    pub tick: u64,
    pub clock: &'a str,
    pub connection: &'a str,
    pub panel: Panel,
    pub nav: [NavItem; 5],
    pub gauges: [GaugeReading; 4],
    pub chart: &'a VecDeque<ChartPoint>,
    pub emergency: StopState,
    pub snapshot: &'a SystemSnapshot,
    #[serde(skip)]
    pub emergency_prompt: Option<&'static str>,
}

impl Scene<'_> {
    pub fn gauge(&self, kind: GaugeKind) -> Option<&GaugeReading> {
        self.gauges.iter().find(|g| g.kind == kind)
    }

    /// KPI rows for the active panel.
    pub fn kpis(&self) -> impl Iterator<Item = (KpiField, String)> + '_ {
        KpiField::for_panel(self.panel)
            .iter()
            .map(|f| (*f, f.format(self.snapshot)))
    }

    pub fn packs(&self) -> &[BatteryPack] {
        &self.snapshot.storage.battery_packs
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.snapshot.alerts
    }
}

/// Draws scenes onto some presentation surface.
pub trait Renderer {
    type Error: std::error::Error + Send + Sync + 'static;

    fn render(&mut self, scene: &Scene<'_>) -> Result<(), Self::Error>;
}

/// Renderer that only records what it was asked to draw.
#[derive(Debug, Default, Clone)]
pub struct CountingRenderer {
    /// Number of render calls.
    pub renders: usize,
    /// Panel of the last scene.
    pub last_panel: Option<Panel>,
    /// Tick of the last scene.
    pub last_tick: Option<u64>,
}

impl Renderer for CountingRenderer {
    type Error = Infallible;

    fn render(&mut self, scene: &Scene<'_>) -> Result<(), Infallible> {
        self.renders += 1;
        self.last_panel = Some(scene.panel);
        self.last_tick = Some(scene.tick);
        Ok(())
    }
}
