//! Diurnal load curve and its critical/flexible split.

use std::f64::consts::PI;

use crate::config::DemandConfig;
use crate::snapshot::Demand;

use super::random::RandomSource;

/// Total load for the given hour: a sinusoid centred on the configured base,
/// rising from 06:00 and peaking at noon.
///
/// # Examples
///
/// ```
/// use microgrid_dash::config::DemandConfig;
/// use microgrid_dash::sim::demand::diurnal_load_kw;
///
/// let cfg = DemandConfig::default();
/// assert!((diurnal_load_kw(&cfg, 6) - 65.5).abs() < 1e-9);
/// assert!((diurnal_load_kw(&cfg, 12) - 78.6).abs() < 1e-9);
/// ```
pub fn diurnal_load_kw(cfg: &DemandConfig, hour: u32) -> f64 {
    let angle = (f64::from(hour) - 6.0) * PI / 12.0;
    cfg.base_kw * (1.0 + cfg.diurnal_amplitude * angle.sin())
}

/// Demand breakdown for the given hour.
pub fn demand(cfg: &DemandConfig, hour: u32, rng: &mut impl RandomSource) -> Demand {
    let total_load = diurnal_load_kw(cfg, hour);
    let critical_loads = total_load * cfg.critical_share;
    Demand {
        total_load,
        critical_loads,
        flexible_loads: total_load - critical_loads,
        peak_reduction: rng.uniform(20.0, 30.0),
    }
}
