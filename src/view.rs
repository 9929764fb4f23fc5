//! View models for the dashboard widgets.
//!
//! Each widget is derived from a slice of a [`Snapshot`] and carries the
//! dashboard-wide [`Palette`], so no two widgets can disagree on alert mode.

use crate::chart::Chart;
use crate::structures::model::{
    AffectedCustomer, DownService, HealthSample, Meta, ServiceCount, Snapshot, Summary, Trend,
};

/// Colour scheme shared by every widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Normal,
    Alert,
}

impl Palette {
    pub fn from_alert_mode(alert_mode: bool) -> Self {
        if alert_mode {
            Self::Alert
        } else {
            Self::Normal
        }
    }

    /// CSS theme class
    pub fn class(&self) -> &'static str {
        match self {
            Self::Normal => "theme-normal",
            Self::Alert => "theme-alert",
        }
    }

    /// CSS accent class
    pub fn accent(&self) -> &'static str {
        match self {
            Self::Normal => "accent-cyan",
            Self::Alert => "accent-red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UptimeLevel {
    Good,
    Warning,
    Critical,
}

impl UptimeLevel {
    pub fn from_pct(pct: f64) -> Self {
        if pct >= 95.0 {
            Self::Good
        } else if pct < 80.0 {
            Self::Critical
        } else {
            Self::Warning
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

pub fn trend_arrow(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "↗",
        Trend::Down => "↘",
        Trend::Flat => "→",
    }
}

pub fn trend_class(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "accent-cyan",
        Trend::Down => "critical",
        Trend::Flat => "warning",
    }
}

/// `mm:ss`, minutes don't roll over into hours.
pub fn format_down_duration(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn one_decimal(value: f64) -> String {
    format!("{:.1}", value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub palette: Palette,
    pub title: &'static str,
    pub last_checked: String,
    pub next_check: String,
    pub down_count: u64,
    pub down_class: &'static str,
    pub uptime: String,
    pub uptime_class: &'static str,
    pub avg_ping: String,
}

impl HeaderView {
    pub fn new(meta: &Meta, summary: &Summary, palette: Palette) -> Self {
        Self {
            palette,
            title: if meta.alert_active {
                "• ALERT •"
            } else {
                "SERVER MONITOR"
            },
            last_checked: meta.last_checked.clone(),
            next_check: meta.next_check.clone(),
            down_count: summary.down_count,
            down_class: if summary.down_count == 0 {
                UptimeLevel::Good.class()
            } else {
                UptimeLevel::Critical.class()
            },
            uptime: one_decimal(meta.uptime_pct),
            uptime_class: UptimeLevel::from_pct(meta.uptime_pct).class(),
            avg_ping: one_decimal(meta.avg_ping_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewView {
    pub palette: Palette,
    pub status_title: &'static str,
    pub up_count: u64,
    pub down_count: u64,
    pub trend_arrow: &'static str,
    pub trend_class: &'static str,
}

impl OverviewView {
    pub fn new(summary: &Summary, palette: Palette) -> Self {
        Self {
            palette,
            status_title: if summary.down_count == 0 {
                "ALL SERVICES ONLINE"
            } else {
                "ALERT: SERVICES DOWN"
            },
            up_count: summary.up_count,
            down_count: summary.down_count,
            trend_arrow: trend_arrow(summary.trend),
            trend_class: trend_class(summary.trend),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthView {
    pub palette: Palette,
    pub services_up: String,
    pub uptime: String,
    pub uptime_class: &'static str,
    pub avg_ping: String,
    /// Averages over the whole history, absent when there is none.
    pub historical_uptime: Option<String>,
    pub historical_ping: Option<String>,
    pub chart: Option<Chart>,
}

impl HealthView {
    pub fn new(meta: &Meta, history: &[HealthSample], palette: Palette) -> Self {
        let latest = history.iter().max_by(|a, b| a.ts.total_cmp(&b.ts));
        let (services_up, avg_ping) = match latest {
            Some(latest) => (
                format!("{}/{}", latest.up_count, latest.total_count),
                latest.avg_ping_ms,
            ),
            None => ("0/0".to_string(), meta.avg_ping_ms),
        };

        let n = history.len() as f64;
        let (historical_uptime, historical_ping) = if history.is_empty() {
            (None, None)
        } else {
            let uptime: f64 = history.iter().map(HealthSample::uptime_pct).sum();
            let ping: f64 = history.iter().map(|s| s.avg_ping_ms).sum();
            (Some(one_decimal(uptime / n)), Some(one_decimal(ping / n)))
        };

        Self {
            palette,
            services_up,
            uptime: one_decimal(meta.uptime_pct),
            uptime_class: UptimeLevel::from_pct(meta.uptime_pct).class(),
            avg_ping: one_decimal(avg_ping),
            historical_uptime,
            historical_ping,
            chart: Chart::build(history, palette),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ByServiceView {
    pub palette: Palette,
    pub rows: Vec<ServiceCount>,
}

impl ByServiceView {
    pub fn new(by_service: &[ServiceCount], palette: Palette) -> Self {
        Self {
            palette,
            rows: by_service.iter().filter(|s| s.count > 0).cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AffectedRow {
    pub customer: String,
    pub services: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopAffectedView {
    pub palette: Palette,
    pub rows: Vec<AffectedRow>,
}

impl TopAffectedView {
    pub fn new(top_affected: &[AffectedCustomer], palette: Palette) -> Self {
        Self {
            palette,
            rows: top_affected
                .iter()
                .map(|c| AffectedRow {
                    customer: c.customer.clone(),
                    services: c.affected.join(", "),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownRow {
    pub customer: String,
    pub service: String,
    pub down_for: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownEventsView {
    pub palette: Palette,
    pub rows: Vec<DownRow>,
}

impl DownEventsView {
    pub fn new(down_services: &[DownService], palette: Palette) -> Self {
        Self {
            palette,
            rows: down_services
                .iter()
                .map(|d| DownRow {
                    customer: d.customer.clone(),
                    service: d.service.clone(),
                    down_for: format_down_duration(d.down_for_sec),
                })
                .collect(),
        }
    }
}

/// All widgets for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub palette: Palette,
    pub header: HeaderView,
    pub overview: OverviewView,
    pub health: HealthView,
    pub by_service: ByServiceView,
    pub top_affected: TopAffectedView,
    pub down_events: DownEventsView,
}

impl DashboardView {
    pub fn new(snapshot: &Snapshot) -> Self {
        let palette = Palette::from_alert_mode(snapshot.alert_mode());
        Self {
            palette,
            header: HeaderView::new(&snapshot.meta, &snapshot.summary, palette),
            overview: OverviewView::new(&snapshot.summary, palette),
            health: HealthView::new(&snapshot.meta, &snapshot.health_history, palette),
            by_service: ByServiceView::new(&snapshot.by_service, palette),
            top_affected: TopAffectedView::new(&snapshot.top_affected, palette),
            down_events: DownEventsView::new(&snapshot.down_services, palette),
        }
    }
}
