//! Alert feed, newest first and bounded.
//!
//! Two sources share the feed: a random alert drawn with a fixed probability
//! each tick, and threshold rules over the simulated readings. Rules fire on
//! the tick a condition starts to hold, not on every tick it stays true.

use tracing::warn;

use crate::config::{AlertConfig, AlertRuleConfig};
use crate::snapshot::{Alert, AlertKind, SystemSnapshot};

use super::random::RandomSource;

/// Messages drawn for simulated alerts.
pub const MESSAGE_POOL: &[&str] = &[
    "Battery pack temperature above nominal",
    "Solar inverter efficiency dropped",
    "Wind turbine yaw misalignment detected",
    "Biogas digester pressure fluctuating",
    "Grid frequency deviation observed",
    "Scheduled maintenance reminder",
    "High cloud cover reducing solar output",
    "Flexible load curtailment engaged",
];

/// Pushes `alert` to the front and drops the oldest entries beyond `max_len`.
pub fn push_front(alerts: &mut Vec<Alert>, alert: Alert, max_len: usize) {
    alerts.insert(0, alert);
    alerts.truncate(max_len);
}

/// Next alert id: one past the largest id in the feed.
///
/// `None` once the largest id is `u64::MAX`.
pub fn next_id(alerts: &[Alert]) -> Option<u64> {
    alerts.iter().map(|a| a.id).max().unwrap_or(0).checked_add(1)
}

/// Orders `alerts` newest first (highest id first) and bounds the length.
pub fn normalize(alerts: &mut Vec<Alert>, max_len: usize) {
    alerts.sort_by(|a, b| b.id.cmp(&a.id));
    alerts.truncate(max_len);
}

/// Stamps and pushes a new alert. Returns `None` if the id space is spent.
fn raise(
    alerts: &mut Vec<Alert>,
    kind: AlertKind,
    message: String,
    time: &str,
    max_len: usize,
) -> Option<Alert> {
    let Some(id) = next_id(alerts) else {
        warn!(%message, "alert ids exhausted; alert dropped");
        return None;
    };
    let alert = Alert {
        id,
        kind,
        message,
        time: time.to_string(),
    };
    push_front(alerts, alert.clone(), max_len);
    Some(alert)
}

/// With the configured probability, raises a random alert stamped `time`.
///
/// Returns a copy of the new alert when one was raised.
pub fn maybe_raise(
    alerts: &mut Vec<Alert>,
    cfg: &AlertConfig,
    time: &str,
    rng: &mut impl RandomSource,
) -> Option<Alert> {
    if !rng.chance(cfg.probability) {
        return None;
    }
    let kind = AlertKind::ALL[rng.index(AlertKind::ALL.len())];
    let message = MESSAGE_POOL[rng.index(MESSAGE_POOL.len())].to_string();
    raise(alerts, kind, message, time, cfg.max_len)
}

/// A threshold condition that currently holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    PackCritical { pack: u32, soc: f64 },
    PackLow { pack: u32, soc: f64 },
    HighCloudCover,
    VoltageDeviation { voltage: f64 },
}

impl Condition {
    /// True when both describe the same condition, whatever the readings.
    fn same_kind(&self, other: &Condition) -> bool {
        match (self, other) {
            (Self::PackCritical { pack: a, .. }, Self::PackCritical { pack: b, .. })
            | (Self::PackLow { pack: a, .. }, Self::PackLow { pack: b, .. }) => a == b,
            (Self::HighCloudCover, Self::HighCloudCover)
            | (Self::VoltageDeviation { .. }, Self::VoltageDeviation { .. }) => true,
            _ => false,
        }
    }

    fn kind(&self) -> AlertKind {
        match self {
            Self::PackCritical { .. } | Self::VoltageDeviation { .. } => AlertKind::Warning,
            Self::PackLow { .. } | Self::HighCloudCover => AlertKind::Info,
        }
    }

    fn message(&self, rules: &AlertRuleConfig) -> String {
        match self {
            Self::PackCritical { pack, soc } => {
                format!("Battery Pack {pack} SOC critically low ({soc:.1}%)")
            }
            Self::PackLow { pack, soc } => format!(
                "Battery Pack {pack} SOC below {:.0}% ({soc:.1}%)",
                rules.pack_soc_info
            ),
            Self::HighCloudCover => {
                "High cloud cover detected - solar generation reduced".to_string()
            }
            Self::VoltageDeviation { voltage } => format!("Voltage deviation: {voltage:.1}V"),
        }
    }
}

/// Threshold conditions holding in `snapshot`.
///
/// A pack below the warning threshold reports only the critical condition.
pub fn conditions(snapshot: &SystemSnapshot, rules: &AlertRuleConfig) -> Vec<Condition> {
    let mut out = Vec::new();
    for pack in &snapshot.storage.battery_packs {
        if pack.soc < rules.pack_soc_warning {
            out.push(Condition::PackCritical {
                pack: pack.id,
                soc: pack.soc,
            });
        } else if pack.soc < rules.pack_soc_info {
            out.push(Condition::PackLow {
                pack: pack.id,
                soc: pack.soc,
            });
        }
    }
    if snapshot.weather.cloud_cover > rules.cloud_cover_info {
        out.push(Condition::HighCloudCover);
    }
    let voltage = snapshot.system_metrics.power_quality.voltage;
    if (voltage - rules.voltage_nominal).abs() > rules.voltage_tolerance {
        out.push(Condition::VoltageDeviation { voltage });
    }
    out
}

/// Raises one alert per condition in `snapshot` that did not hold in
/// `before`. Returns the alerts raised, oldest first.
pub fn raise_rules(
    snapshot: &mut SystemSnapshot,
    before: &[Condition],
    cfg: &AlertConfig,
    time: &str,
) -> Vec<Alert> {
    let rules = &cfg.rules;
    if !rules.enabled {
        return Vec::new();
    }
    let mut raised = Vec::new();
    for cond in conditions(snapshot, rules) {
        if before.iter().any(|b| b.same_kind(&cond)) {
            continue;
        }
        let alert = raise(
            &mut snapshot.alerts,
            cond.kind(),
            cond.message(rules),
            time,
            cfg.max_len,
        );
        raised.extend(alert);
    }
    raised
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::ScriptedSource;

    fn alert(id: u64) -> Alert {
        Alert {
            id,
            kind: AlertKind::Info,
            message: format!("alert {id}"),
            time: "12:00".to_string(),
        }
    }

    #[test]
    fn push_front_keeps_newest_first_and_bounds_length() {
        let mut alerts = Vec::new();
        for id in 1..=8 {
            push_front(&mut alerts, alert(id), 5);
        }
        let ids: Vec<u64> = alerts.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![8, 7, 6, 5, 4]);
    }

    #[test]
    fn raises_when_draw_is_below_probability() {
        let mut alerts = vec![alert(3)];
        // chance draw, kind draw (→ error), message draw (→ first)
        let mut rng = ScriptedSource::new([0.05, 0.99, 0.0]);
        let raised = maybe_raise(&mut alerts, &AlertConfig::default(), "08:15", &mut rng);

        let raised = raised.unwrap();
        assert_eq!(raised.id, 4);
        assert_eq!(raised.kind, AlertKind::Error);
        assert_eq!(raised.message, MESSAGE_POOL[0]);
        assert_eq!(alerts[0], raised);
        assert_eq!(alerts.len(), 2);
    }

    #[test]
    fn skips_when_draw_is_above_probability() {
        let mut alerts = Vec::new();
        let mut rng = ScriptedSource::constant(0.10);
        assert!(maybe_raise(&mut alerts, &AlertConfig::default(), "08:15", &mut rng).is_none());
        assert!(alerts.is_empty());
    }

    #[test]
    fn next_id_starts_at_one() {
        assert_eq!(next_id(&[]), Some(1));
        assert_eq!(next_id(&[alert(2), alert(9), alert(4)]), Some(10));
    }

    #[test]
    fn exhausted_ids_drop_the_alert() {
        let mut alerts = vec![alert(u64::MAX)];
        assert_eq!(next_id(&alerts), None);
        let mut rng = ScriptedSource::constant(0.0);
        assert!(maybe_raise(&mut alerts, &AlertConfig::default(), "08:15", &mut rng).is_none());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, u64::MAX);
    }

    #[test]
    fn normalize_puts_highest_id_first() {
        let mut alerts: Vec<Alert> = (1..=10).map(alert).collect();
        normalize(&mut alerts, 5);
        let ids: Vec<u64> = alerts.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![10, 9, 8, 7, 6]);
    }

    fn rules_on() -> AlertConfig {
        let mut cfg = AlertConfig::default();
        cfg.rules.enabled = true;
        cfg
    }

    /// Snapshot with no condition holding.
    fn calm_snapshot() -> SystemSnapshot {
        let mut snap = SystemSnapshot::default();
        snap.weather.cloud_cover = 20.0;
        snap.system_metrics.power_quality.voltage = 230.0;
        for pack in &mut snap.storage.battery_packs {
            pack.soc = 70.0;
        }
        snap
    }

    #[test]
    fn calm_snapshot_has_no_conditions() {
        assert!(conditions(&calm_snapshot(), &rules_on().rules).is_empty());
    }

    #[test]
    fn pack_below_warning_threshold_raises_warning() {
        let mut snap = calm_snapshot();
        snap.storage.battery_packs[1].soc = 25.0;
        let raised = raise_rules(&mut snap, &[], &rules_on(), "06:00");

        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].kind, AlertKind::Warning);
        assert_eq!(raised[0].message, "Battery Pack 2 SOC critically low (25.0%)");
        assert_eq!(snap.alerts[0], raised[0]);
    }

    #[test]
    fn pack_below_info_threshold_raises_info() {
        let mut snap = calm_snapshot();
        snap.storage.battery_packs[0].soc = 45.0;
        let raised = raise_rules(&mut snap, &[], &rules_on(), "06:00");

        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].kind, AlertKind::Info);
        assert_eq!(raised[0].message, "Battery Pack 1 SOC below 50% (45.0%)");
    }

    #[test]
    fn high_cloud_cover_raises_info() {
        let mut snap = calm_snapshot();
        snap.weather.cloud_cover = 70.0;
        assert!(raise_rules(&mut snap, &[], &rules_on(), "06:00").is_empty());

        snap.weather.cloud_cover = 71.0;
        let raised = raise_rules(&mut snap, &[], &rules_on(), "06:00");
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].kind, AlertKind::Info);
        assert!(raised[0].message.starts_with("High cloud cover"));
    }

    #[test]
    fn voltage_deviation_raises_warning() {
        let mut snap = calm_snapshot();
        snap.system_metrics.power_quality.voltage = 241.5;
        let raised = raise_rules(&mut snap, &[], &rules_on(), "06:00");
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].kind, AlertKind::Warning);
        assert_eq!(raised[0].message, "Voltage deviation: 241.5V");

        let mut snap = calm_snapshot();
        snap.system_metrics.power_quality.voltage = 219.0;
        assert_eq!(raise_rules(&mut snap, &[], &rules_on(), "06:00").len(), 1);
    }

    #[test]
    fn held_condition_does_not_refire() {
        let mut snap = calm_snapshot();
        snap.weather.cloud_cover = 90.0;
        let before = conditions(&snap, &rules_on().rules);

        snap.weather.cloud_cover = 85.0;
        assert!(raise_rules(&mut snap, &before, &rules_on(), "06:03").is_empty());
        assert!(snap.alerts.is_empty());
    }

    #[test]
    fn disabled_rules_raise_nothing() {
        let mut snap = calm_snapshot();
        snap.weather.cloud_cover = 95.0;
        assert!(raise_rules(&mut snap, &[], &AlertConfig::default(), "06:00").is_empty());
    }

    #[test]
    fn rule_alerts_take_increasing_ids() {
        let mut snap = calm_snapshot();
        snap.alerts = vec![alert(4)];
        snap.weather.cloud_cover = 95.0;
        snap.system_metrics.power_quality.voltage = 250.0;
        let raised = raise_rules(&mut snap, &[], &rules_on(), "06:00");

        let ids: Vec<u64> = raised.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![5, 6]);
        assert_eq!(snap.alerts[0].id, 6);
    }
}
