//! Solar, wind and biogas output models.

use crate::config::{BiogasConfig, SolarConfig, WindConfig};
use crate::snapshot::{Biogas, BiogasStatus, Solar, Wind};

use super::random::RandomSource;

/// Module temperature rise at 1000 W/m² above ambient (°C).
const MODULE_TEMP_RISE_C: f64 = 20.0;

/// Solar array output for the given sky conditions.
///
/// Irradiance is the clear-sky floor plus a uniform jitter, attenuated
/// linearly by cloud cover. DC output scales with irradiance against the
/// 1000 W/m² rating; AC output applies the inverter efficiency.
pub fn solar(
    cfg: &SolarConfig,
    cloud_cover: f64,
    ambient_c: f64,
    rng: &mut impl RandomSource,
) -> Solar {
    let clear_sky = cfg.irradiance_base + rng.uniform(0.0, cfg.irradiance_jitter);
    let irradiance = (clear_sky * (1.0 - cloud_cover.clamp(0.0, 100.0) / 100.0)).max(0.0);
    let dc_power = irradiance / 1000.0 * cfg.peak_kw;
    let ac_power = dc_power * cfg.inverter_efficiency;
    let efficiency = if dc_power > 0.0 {
        ac_power / dc_power * 100.0
    } else {
        0.0
    };

    Solar {
        dc_power,
        ac_power,
        efficiency,
        irradiance,
        module_temp: ambient_c + irradiance / 1000.0 * MODULE_TEMP_RISE_C,
    }
}

/// Cubic power-curve approximation, held at rated output above rated speed.
///
/// # Examples
///
/// ```
/// use microgrid_dash::sim::generation::wind_power_kw;
///
/// assert_eq!(wind_power_kw(12.0, 12.0, 25.0), 25.0);
/// assert_eq!(wind_power_kw(6.0, 12.0, 25.0), 3.125);
/// ```
pub fn wind_power_kw(speed_ms: f64, rated_speed_ms: f64, rated_kw: f64) -> f64 {
    let ratio = (speed_ms.max(0.0) / rated_speed_ms).min(1.0);
    ratio.powi(3) * rated_kw
}

/// Wind turbine output for a fresh speed draw around the configured mean.
pub fn wind(cfg: &WindConfig, rng: &mut impl RandomSource) -> Wind {
    let wind_speed =
        (cfg.base_speed_ms + rng.uniform(-cfg.speed_jitter_ms, cfg.speed_jitter_ms)).max(0.0);
    Wind {
        power: wind_power_kw(wind_speed, cfg.rated_speed_ms, cfg.rated_kw),
        wind_speed,
        efficiency: rng.uniform(87.0, 92.0),
    }
}

/// Near-constant biogas base load.
pub fn biogas(cfg: &BiogasConfig, rng: &mut impl RandomSource) -> Biogas {
    let power = (cfg.base_kw + rng.uniform(-cfg.jitter_kw, cfg.jitter_kw)).max(0.0);
    let status = if power > cfg.reduced_below_kw {
        BiogasStatus::Operational
    } else {
        BiogasStatus::Reduced
    };
    Biogas {
        power,
        status,
        efficiency: rng.uniform(89.0, 94.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::ScriptedSource;

    #[test]
    fn solar_follows_irradiance_chain() {
        // jitter draw 0.5 → 850 + 50 = 900 W/m², 50% cloud → 450 W/m²
        let mut rng = ScriptedSource::constant(0.5);
        let s = solar(&SolarConfig::default(), 50.0, 25.0, &mut rng);
        assert!((s.irradiance - 450.0).abs() < 1e-9);
        assert!((s.dc_power - 0.45 * 52.0).abs() < 1e-9);
        assert!((s.ac_power - s.dc_power * 0.94).abs() < 1e-9);
        assert!((s.efficiency - 94.0).abs() < 1e-9);
        assert!((s.module_temp - 34.0).abs() < 1e-9);
    }

    #[test]
    fn full_cloud_cover_zeroes_solar() {
        let mut rng = ScriptedSource::constant(0.9);
        let s = solar(&SolarConfig::default(), 100.0, 25.0, &mut rng);
        assert_eq!(s.dc_power, 0.0);
        assert_eq!(s.ac_power, 0.0);
        assert_eq!(s.efficiency, 0.0);
    }

    #[test]
    fn wind_power_is_monotone_over_operating_range() {
        let mut prev = wind_power_kw(0.0, 12.0, 25.0);
        for i in 1..=1200 {
            let speed = f64::from(i) / 100.0;
            let p = wind_power_kw(speed, 12.0, 25.0);
            assert!(p >= prev, "power dropped at {speed} m/s");
            prev = p;
        }
        assert_eq!(prev, 25.0);
    }

    #[test]
    fn wind_speed_never_negative() {
        let cfg = WindConfig {
            base_speed_ms: 1.0,
            speed_jitter_ms: 2.0,
            ..WindConfig::default()
        };
        let mut rng = ScriptedSource::constant(0.0);
        let w = wind(&cfg, &mut rng);
        assert_eq!(w.wind_speed, 0.0);
        assert_eq!(w.power, 0.0);
    }

    #[test]
    fn biogas_reports_reduced_below_threshold() {
        let cfg = BiogasConfig {
            base_kw: 14.0,
            ..BiogasConfig::default()
        };
        let mut rng = ScriptedSource::constant(0.5);
        assert_eq!(biogas(&cfg, &mut rng).status, BiogasStatus::Reduced);

        let mut rng = ScriptedSource::constant(0.5);
        let b = biogas(&BiogasConfig::default(), &mut rng);
        assert_eq!(b.status, BiogasStatus::Operational);
        assert!((b.power - 18.5).abs() < 1e-9);
    }
}
