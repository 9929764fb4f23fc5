//! Health-over-time chart.
//!
//! Builds the SVG geometry for a series of uptime samples. Everything here is
//! pure: the same samples always produce byte-identical path strings.

use crate::structures::model::HealthSample;
use crate::view::Palette;

/// Logical canvas width (SVG `viewBox` units).
pub const WIDTH: f64 = 100.0;
/// Logical canvas height.
pub const HEIGHT: f64 = 40.0;
/// Keeps 0% and 100% off the frame edges.
pub const PADDING: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Colours for one palette, as SVG paint values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartColors {
    pub stroke: &'static str,
    pub fill: &'static str,
    pub marker: &'static str,
    pub grid: &'static str,
}

impl ChartColors {
    pub fn for_palette(palette: Palette) -> Self {
        match palette {
            Palette::Normal => Self {
                stroke: "#22d3ee",
                fill: "rgba(34,211,238,0.15)",
                marker: "#67e8f9",
                grid: "rgba(34,211,238,0.12)",
            },
            Palette::Alert => Self {
                stroke: "#f87171",
                fill: "rgba(248,113,113,0.18)",
                marker: "#fca5a5",
                grid: "rgba(248,113,113,0.15)",
            },
        }
    }
}

/// Geometry ready for the template.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub points: Vec<Point>,
    pub line: String,
    pub fill: Option<String>,
    pub grid: Vec<f64>,
    pub colors: ChartColors,
}

impl Chart {
    /// Returns `None` when there is nothing to plot.
    pub fn build(history: &[HealthSample], palette: Palette) -> Option<Self> {
        if history.is_empty() {
            return None;
        }
        let points = plot(history);
        Some(Self {
            line: line_path(&points),
            fill: fill_path(&points),
            points,
            grid: grid_lines(),
            colors: ChartColors::for_palette(palette),
        })
    }

    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", WIDTH, HEIGHT)
    }
}

/// Maps samples to canvas coordinates, evenly spaced by index.
pub fn plot(history: &[HealthSample]) -> Vec<Point> {
    let mut samples: Vec<&HealthSample> = history.iter().collect();
    samples.sort_by(|a, b| a.ts.total_cmp(&b.ts));

    let step = if samples.len() > 1 {
        WIDTH / (samples.len() - 1) as f64
    } else {
        0.0
    };

    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let pct = sample.uptime_pct().clamp(0.0, 100.0);
            Point {
                x: i as f64 * step,
                y: PADDING + (1.0 - pct / 100.0) * (HEIGHT - 2.0 * PADDING),
            }
        })
        .collect()
}

/// Line through the points: a bare move for one point, a straight segment for
/// two, and quadratic segments for three or more. Each curve's control point
/// sits at the pair's horizontal midpoint, level with the first point.
pub fn line_path(points: &[Point]) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };
    let mut path = format!("M {:.2} {:.2}", first.x, first.y);

    if points.len() == 2 {
        path.push_str(&format!(" L {:.2} {:.2}", points[1].x, points[1].y));
        return path;
    }

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let cx = (a.x + b.x) / 2.0;
        path.push_str(&format!(" Q {:.2} {:.2} {:.2} {:.2}", cx, a.y, b.x, b.y));
    }
    path
}

/// Closed area under the line, only drawn from three points up.
pub fn fill_path(points: &[Point]) -> Option<String> {
    if points.len() < 3 {
        return None;
    }
    let (first, last) = (points.first()?, points.last()?);
    Some(format!(
        "{} L {:.2} {:.2} L {:.2} {:.2} Z",
        line_path(points),
        last.x,
        HEIGHT,
        first.x,
        HEIGHT
    ))
}

/// Horizontal grid at 0/25/50/75/100% of the height.
pub fn grid_lines() -> Vec<f64> {
    (0..=4).map(|i| HEIGHT * i as f64 / 4.0).collect()
}
