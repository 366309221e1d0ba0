//! Weather random walk and system metric readings.

use crate::config::WeatherConfig;
use crate::snapshot::{SystemMetrics, Weather};

use super::random::RandomSource;

/// Advances temperature, cloud cover and humidity by independent bounded
/// random walks. Cloud cover and humidity stay within `[0, 100]`.
pub fn walk(weather: &mut Weather, cfg: &WeatherConfig, rng: &mut impl RandomSource) {
    weather.temperature = (weather.temperature
        + rng.uniform(-cfg.temperature_step, cfg.temperature_step))
    .clamp(cfg.temperature_min, cfg.temperature_max);
    weather.cloud_cover =
        (weather.cloud_cover + rng.uniform(-cfg.cloud_step, cfg.cloud_step)).clamp(0.0, 100.0);
    weather.humidity =
        (weather.humidity + rng.uniform(-cfg.humidity_step, cfg.humidity_step)).clamp(0.0, 100.0);
}

/// Refreshes efficiency, uptime and grid power-quality readings.
pub fn refresh_metrics(metrics: &mut SystemMetrics, rng: &mut impl RandomSource) {
    metrics.overall_efficiency = (90.0 + rng.uniform(-2.0, 3.0)).min(95.0);
    metrics.uptime = (metrics.uptime + rng.uniform(-0.01, 0.02)).min(100.0);
    let pq = &mut metrics.power_quality;
    pq.voltage = 230.0 + rng.uniform(-5.0, 5.0);
    pq.frequency = 50.0 + rng.uniform(-0.1, 0.1);
    pq.thd = rng.uniform(1.0, 2.5);
}
