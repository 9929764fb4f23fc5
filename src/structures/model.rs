use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Point-in-time status record written by the external monitor.
///
/// Every field decodes leniently: the monitor is trusted, so a missing field
/// falls back to its zero value instead of rejecting the whole snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    pub meta: Meta,
    pub summary: Summary,
    pub down_services: Vec<DownService>,
    pub by_service: Vec<ServiceCount>,
    pub top_affected: Vec<AffectedCustomer>,
    /// Oldest first.
    pub health_history: Vec<HealthSample>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Meta {
    pub last_checked: String,
    pub next_check: String,
    pub uptime_pct: f64,
    pub avg_ping_ms: f64,
    pub alert_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Summary {
    pub up_count: u64,
    pub down_count: u64,
    pub trend: Trend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    #[serde(other)]
    Flat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DownService {
    pub customer: String,
    pub service: String,
    pub down_for_sec: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceCount {
    pub service: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffectedCustomer {
    pub customer: String,
    pub affected: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthSample {
    /// Epoch timestamp; the monitor decides the unit, only the ordering matters.
    pub ts: f64,
    pub up_count: u64,
    pub total_count: u64,
    pub avg_ping_ms: f64,
}

impl HealthSample {
    pub fn uptime_pct(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        self.up_count as f64 / self.total_count as f64 * 100.0
    }
}

impl Snapshot {
    /// Placeholder served when the monitor's output can't be read.
    pub fn fallback() -> Self {
        Self {
            meta: Meta {
                last_checked: "N/A".to_string(),
                next_check: "N/A".to_string(),
                ..Meta::default()
            },
            ..Self::default()
        }
    }

    /// Canned snapshot used when no status file is configured.
    pub fn example(now: OffsetDateTime) -> Self {
        let clock = time::macros::format_description!("[hour]:[minute]:[second]");
        let next = now + time::Duration::seconds(100);
        let now_ms = (now.unix_timestamp_nanos() / 1_000_000) as f64;

        let down = |customer: &str, service: &str, down_for_sec| DownService {
            customer: customer.to_string(),
            service: service.to_string(),
            down_for_sec,
        };
        let count = |service: &str| ServiceCount {
            service: service.to_string(),
            count: 1,
        };
        let affected = |customer: &str, service: &str| AffectedCustomer {
            customer: customer.to_string(),
            affected: vec![service.to_string()],
        };

        let health_history = [
            (5, 180, 55.2),
            (4, 183, 50.1),
            (3, 186, 44.3),
            (2, 186, 42.7),
            (1, 186, 42.7),
        ]
        .into_iter()
        .map(|(mins_ago, up_count, avg_ping_ms)| HealthSample {
            ts: now_ms - (mins_ago * 60 * 1000) as f64,
            up_count,
            total_count: 189,
            avg_ping_ms,
        })
        .collect();

        Self {
            meta: Meta {
                last_checked: now.format(&clock).unwrap_or_else(|_| "N/A".to_string()),
                next_check: next.format(&clock).unwrap_or_else(|_| "N/A".to_string()),
                uptime_pct: 97.4,
                avg_ping_ms: 42.7,
                alert_active: true,
            },
            summary: Summary {
                up_count: 186,
                down_count: 3,
                trend: Trend::Down,
            },
            // sorted by (customer, service)
            down_services: vec![
                down("CAP", "dc1", 125),
                down("TMC", "vpn", 512),
                down("RES", "nas1", 1900),
            ],
            by_service: vec![count("vpn"), count("dc1"), count("nas1")],
            top_affected: vec![
                affected("RES", "nas1"),
                affected("TMC", "vpn"),
                affected("CAP", "dc1"),
            ],
            health_history,
        }
    }

    pub fn alert_mode(&self) -> bool {
        self.summary.down_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_camel_case_fields() {
        let json = r#"{
            "meta": {"lastChecked": "11:24:05", "nextCheck": "11:25:45", "uptimePct": 97.4, "avgPingMs": 42.7, "alertActive": true},
            "summary": {"upCount": 186, "downCount": 3, "trend": "down"},
            "downServices": [{"customer": "CAP", "service": "dc1", "downForSec": 125}],
            "byService": [{"service": "dc1", "count": 1}],
            "topAffected": [{"customer": "CAP", "affected": ["dc1"]}],
            "healthHistory": [{"ts": 1700000000.5, "upCount": 180, "totalCount": 189, "avgPingMs": 55.2}]
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.meta.last_checked, "11:24:05");
        assert!(snapshot.meta.alert_active);
        assert_eq!(snapshot.summary.trend, Trend::Down);
        assert_eq!(snapshot.down_services[0].down_for_sec, 125);
        assert_eq!(snapshot.top_affected[0].affected, vec!["dc1"]);
        assert_eq!(snapshot.health_history[0].total_count, 189);
    }

    #[test]
    fn test_missing_fields_default() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"summary": {"downCount": 2}}"#).unwrap();
        assert_eq!(snapshot.summary.down_count, 2);
        assert_eq!(snapshot.summary.up_count, 0);
        assert_eq!(snapshot.summary.trend, Trend::Flat);
        assert!(snapshot.health_history.is_empty());
    }

    #[test]
    fn test_unknown_trend_is_flat() {
        let summary: Summary = serde_json::from_str(r#"{"trend": "sideways"}"#).unwrap();
        assert_eq!(summary.trend, Trend::Flat);
    }

    #[test]
    fn test_fallback_is_zeroed() {
        let value = serde_json::to_value(Snapshot::fallback()).unwrap();
        assert_eq!(value["meta"]["lastChecked"], "N/A");
        assert_eq!(value["meta"]["nextCheck"], "N/A");
        assert_eq!(value["meta"]["uptimePct"], 0.0);
        assert_eq!(value["meta"]["alertActive"], false);
        assert_eq!(value["summary"]["upCount"], 0);
        assert_eq!(value["summary"]["downCount"], 0);
        assert_eq!(value["summary"]["trend"], "flat");
        assert_eq!(value["downServices"], serde_json::json!([]));
        assert_eq!(value["healthHistory"], serde_json::json!([]));
    }

    #[test]
    fn test_uptime_pct_zero_total() {
        let sample = HealthSample::default();
        assert_eq!(sample.uptime_pct(), 0.0);

        let sample = HealthSample {
            up_count: 180,
            total_count: 200,
            ..HealthSample::default()
        };
        assert_eq!(sample.uptime_pct(), 90.0);
    }

    #[test]
    fn test_example_history_is_ascending() {
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let snapshot = Snapshot::example(now);
        assert!(snapshot.alert_mode());
        assert_eq!(snapshot.health_history.len(), 5);
        assert!(snapshot
            .health_history
            .windows(2)
            .all(|pair| pair[0].ts < pair[1].ts));
        assert_eq!(snapshot.meta.last_checked, "22:13:20");
        assert_eq!(snapshot.meta.next_check, "22:15:00");
    }
}
