//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

use crate::dashboard::render::GaugeKind;
use crate::snapshot::AlertKind;

/// Generation line color.
pub const GENERATION_COLOR: Color = Color::Green;
/// Demand line color.
pub const DEMAND_COLOR: Color = Color::LightRed;
/// SOC gauge color when high (>= 50%).
pub const SOC_HIGH: Color = Color::Green;
/// SOC gauge color when medium (>= 30%).
pub const SOC_MID: Color = Color::Yellow;
/// SOC gauge color when low (< 30%).
pub const SOC_LOW: Color = Color::Red;
pub const HEADER_FG: Color = Color::White;
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Active navigation tab.
pub const NAV_ACTIVE: Color = Color::Cyan;
pub const LINK_UP: Color = Color::Green;
pub const LINK_DOWN: Color = Color::Yellow;
/// Emergency-stop dialog border.
pub const EMERGENCY: Color = Color::Red;

/// Returns a color based on the battery state of charge in percent.
pub fn soc_color(soc: f64) -> Color {
    if soc >= 50.0 {
        SOC_HIGH
    } else if soc >= 30.0 {
        SOC_MID
    } else {
        SOC_LOW
    }
}

/// Gauge fill color per source.
pub fn gauge_color(kind: GaugeKind, value: f64) -> Color {
    match kind {
        GaugeKind::Solar => Color::Yellow,
        GaugeKind::Wind => Color::Cyan,
        GaugeKind::Biogas => Color::Magenta,
        GaugeKind::Battery => soc_color(value),
    }
}

pub fn alert_color(kind: AlertKind) -> Color {
    match kind {
        AlertKind::Info => Color::Blue,
        AlertKind::Warning => Color::Yellow,
        AlertKind::Error => Color::Red,
    }
}

/// Computes Y-axis bounds from chart data points with 10% padding.
pub fn auto_bounds_y(generation: &[(f64, f64)], demand: &[(f64, f64)]) -> [f64; 2] {
    let all = generation.iter().chain(demand.iter()).map(|&(_, y)| y);
    let min = all.clone().fold(f64::INFINITY, f64::min);
    let max = all.fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let range = (max - min).max(0.1);
    let pad = range * 0.1;
    [(min - pad).max(0.0), max + pad]
}
