//! Inline SVG charts for the dashboard page.
//!
//! Both charts share one canvas size and margin box; the plot area is the
//! canvas minus the margins, with y growing downward as SVG expects.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::config::Aggregation;
use crate::models::{DistrictBar, TrendPoint};
use crate::page::escape;

const WIDTH: f64 = 1100.0;
const HEIGHT: f64 = 400.0;
const LEFT: f64 = 80.0;
const RIGHT: f64 = 20.0;
const TOP: f64 = 40.0;
const BOTTOM: f64 = 100.0;
const Y_TICKS: usize = 5;
/// Share of the plot width kept free at each end of the time axis.
const X_INSET: f64 = 0.05;

const LINE_COLOR: &str = "#1f77b4";
const COUNT_BAR_COLOR: &str = "#3498db";
const GRID_COLOR: &str = "rgba(0,0,0,0.4)";

struct Frame {
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn plot_width() -> f64 {
        WIDTH - LEFT - RIGHT
    }

    fn plot_height() -> f64 {
        HEIGHT - TOP - BOTTOM
    }

    fn y(&self, value: f64) -> f64 {
        let span = self.y_max - self.y_min;
        TOP + Self::plot_height() * (1.0 - (value - self.y_min) / span)
    }

    fn padded(min: f64, max: f64) -> Self {
        if (max - min).abs() < f64::EPSILON {
            return Self {
                y_min: min - 1.0,
                y_max: max + 1.0,
            };
        }
        let pad = (max - min) * 0.05;
        Self {
            y_min: min - pad,
            y_max: max + pad,
        }
    }
}

fn open(out: &mut String, title: &str) {
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" width="100%" role="img" aria-label="{title}">"#,
        title = escape(title)
    );
    let _ = writeln!(
        out,
        r#"<text x="{:.1}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
        LEFT + Frame::plot_width() / 2.0,
        escape(title)
    );
}

fn y_axis(out: &mut String, frame: &Frame, label: &str, tick_label: impl Fn(f64) -> String) {
    for step in 0..=Y_TICKS {
        let value = frame.y_min + (frame.y_max - frame.y_min) * step as f64 / Y_TICKS as f64;
        let y = frame.y(value);
        let _ = writeln!(
            out,
            r#"<line x1="{LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{GRID_COLOR}" stroke-dasharray="4 4" stroke-width="0.6"/>"#,
            WIDTH - RIGHT
        );
        let _ = writeln!(
            out,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{}</text>"#,
            LEFT - 6.0,
            y + 4.0,
            tick_label(value)
        );
    }
    let _ = writeln!(
        out,
        r#"<text x="18" y="{:.1}" text-anchor="middle" font-size="13" transform="rotate(-90 18 {:.1})">{}</text>"#,
        TOP + Frame::plot_height() / 2.0,
        TOP + Frame::plot_height() / 2.0,
        escape(label)
    );
    let _ = writeln!(
        out,
        r#"<rect x="{LEFT}" y="{TOP}" width="{:.1}" height="{:.1}" fill="none" stroke="black" stroke-width="0.8"/>"#,
        Frame::plot_width(),
        Frame::plot_height()
    );
}

fn x_label(out: &mut String, x: f64, text: &str, angle: i32) {
    let y = HEIGHT - BOTTOM + 14.0;
    let _ = writeln!(
        out,
        r#"<text x="{x:.1}" y="{y:.1}" text-anchor="end" font-size="11" transform="rotate({angle} {x:.1} {y:.1})">{}</text>"#,
        escape(text)
    );
}

/// Horizontal position of `date` on a linear time axis spanning the series.
/// A series covering a single day sits in the middle of the plot.
fn date_x(points: &[TrendPoint], date: NaiveDate) -> f64 {
    let first = points.iter().map(|point| point.date).min();
    let last = points.iter().map(|point| point.date).max();

    match (first, last) {
        (Some(first), Some(last)) if last > first => {
            let inset = Frame::plot_width() * X_INSET;
            let span = (last - first).num_days() as f64;
            let offset = (date - first).num_days() as f64;
            LEFT + inset + (Frame::plot_width() - 2.0 * inset) * offset / span
        }
        _ => LEFT + Frame::plot_width() / 2.0,
    }
}

/// Line chart of monthly totals with a marker on every month.
pub fn trend_chart(points: &[TrendPoint]) -> String {
    let mut out = String::new();
    open(&mut out, "Biometric Updates Over Time");

    let values: Vec<f64> = points.iter().map(|p| p.total_bio_updates as f64).collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let frame = if values.is_empty() {
        Frame::padded(0.0, 0.0)
    } else {
        Frame::padded(min, max)
    };
    y_axis(&mut out, &frame, "Updates", |value| format!("{value:.0}"));

    let coords: Vec<(f64, f64)> = points
        .iter()
        .zip(&values)
        .map(|(point, value)| (date_x(points, point.date), frame.y(*value)))
        .collect();

    if !coords.is_empty() {
        let path = coords
            .iter()
            .map(|(x, y)| format!("{x:.1},{y:.1}"))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            out,
            r#"<polyline points="{path}" fill="none" stroke="{LINE_COLOR}" stroke-width="2"/>"#
        );
    }
    for ((x, y), point) in coords.iter().zip(points) {
        let _ = writeln!(
            out,
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="4" fill="{LINE_COLOR}"><title>{}: {}</title></circle>"#,
            point.date, point.total_bio_updates
        );
        x_label(&mut out, *x, &point.date.to_string(), -90);
    }

    let _ = writeln!(
        out,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13">Date</text>"#,
        LEFT + Frame::plot_width() / 2.0,
        HEIGHT - 6.0
    );
    out.push_str("</svg>\n");
    out
}

/// Ranked district bars, each annotated with its value.
pub fn district_chart(bars: &[DistrictBar], aggregation: Aggregation) -> String {
    let mut out = String::new();
    open(&mut out, "Risk Level by District");

    let max = bars.iter().map(|bar| bar.value).fold(0.0, f64::max);
    let min = bars.iter().map(|bar| bar.value).fold(0.0, f64::min);
    let frame = Frame {
        y_min: min * 1.1,
        y_max: if max > 0.0 || min < 0.0 { max * 1.1 } else { 1.0 },
    };
    let (axis_label, decimals) = match aggregation {
        Aggregation::MeanSeverity => ("Severity Score", 2usize),
        Aggregation::WarningCount => ("Warning Count", 0),
    };
    y_axis(&mut out, &frame, axis_label, |value| format!("{value:.1}"));

    let slot = Frame::plot_width() / bars.len().max(1) as f64;
    let width = slot * 0.7;
    let baseline = frame.y(0.0);

    for (index, bar) in bars.iter().enumerate() {
        let center = LEFT + slot * (index as f64 + 0.5);
        let end = frame.y(bar.value);
        let top = end.min(baseline);
        let height = (end - baseline).abs();
        // Labels sit beyond the bar's far end, above or below the baseline.
        let label_y = if bar.value < 0.0 { end + 12.0 } else { end - 4.0 };
        let fill = bar.risk.map_or(COUNT_BAR_COLOR, |risk| risk.color());
        let _ = writeln!(
            out,
            r#"<rect x="{:.1}" y="{top:.1}" width="{width:.1}" height="{height:.1}" fill="{fill}" stroke="black" stroke-width="1"><title>{}: latest warning {}</title></rect>"#,
            center - width / 2.0,
            escape(&bar.district),
            bar.latest_warning
        );
        let _ = writeln!(
            out,
            r#"<text x="{center:.1}" y="{label_y:.1}" text-anchor="middle" font-size="9">{:.*}</text>"#,
            decimals,
            bar.value
        );
        x_label(&mut out, center, &bar.district, -45);
    }

    out.push_str("</svg>\n");
    out
}
