//! Battery charge/discharge policy and per-pack readings.

use crate::config::BatteryConfig;
use crate::snapshot::Storage;

use super::random::RandomSource;

/// Branch taken by [`balance`] for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryMode {
    Charging,
    Discharging,
    Idle,
}

/// Routes the generation/demand imbalance through the battery.
///
/// A surplus charges at `min(charge_ratio × surplus, max_charge_kw)` while SOC
/// is below the ceiling, nudging SOC up by `charge_step`. A deficit discharges
/// at `min(|deficit|, max_discharge_kw)` while SOC is above the floor, nudging
/// SOC down by `discharge_step`. Otherwise both powers are zero and SOC holds.
/// An SOC already outside `[soc_min, soc_max]` is pulled back into the band
/// first, so SOC is within the band after every call.
pub fn balance(
    storage: &mut Storage,
    generation_kw: f64,
    demand_kw: f64,
    cfg: &BatteryConfig,
) -> BatteryMode {
    clamp_soc(storage, cfg);
    let net_kw = generation_kw - demand_kw;

    if net_kw > 0.0 && storage.overall_soc < cfg.soc_max {
        storage.charge_power = (net_kw * cfg.charge_ratio).min(cfg.max_charge_kw);
        storage.discharge_power = 0.0;
        storage.overall_soc = (storage.overall_soc + cfg.charge_step).min(cfg.soc_max);
        BatteryMode::Charging
    } else if net_kw < 0.0 && storage.overall_soc > cfg.soc_min {
        storage.charge_power = 0.0;
        storage.discharge_power = net_kw.abs().min(cfg.max_discharge_kw);
        storage.overall_soc = (storage.overall_soc - cfg.discharge_step).max(cfg.soc_min);
        BatteryMode::Discharging
    } else {
        storage.charge_power = 0.0;
        storage.discharge_power = 0.0;
        BatteryMode::Idle
    }
}

/// Clamps the aggregate SOC into `[soc_min, soc_max]`.
pub fn clamp_soc(storage: &mut Storage, cfg: &BatteryConfig) {
    storage.overall_soc = storage.overall_soc.clamp(cfg.soc_min, cfg.soc_max);
}

/// Re-derives every pack around the aggregate SOC.
pub fn jitter_packs(storage: &mut Storage, cfg: &BatteryConfig, rng: &mut impl RandomSource) {
    let aggregate = storage.overall_soc;
    for pack in &mut storage.battery_packs {
        pack.soc = (aggregate + rng.uniform(-cfg.pack_soc_jitter, cfg.pack_soc_jitter))
            .clamp(0.0, 100.0);
        pack.temp = cfg.pack_temp_c + rng.uniform(-cfg.pack_temp_jitter, cfg.pack_temp_jitter);
        pack.voltage = pack_voltage(pack.soc);
    }
}

/// Nominal 48 V pack: 47.5 V empty, 49.0 V full.
pub fn pack_voltage(soc: f64) -> f64 {
    47.5 + soc / 100.0 * 1.5
}
