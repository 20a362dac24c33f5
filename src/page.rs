use std::fmt::Write;

use crate::config::{Aggregation, DashboardConfig};
use crate::error::MISSING_DATA_MESSAGE;
use crate::models::RiskLevel;
use crate::summary::thousands;
use crate::svg;
use crate::view::ViewModel;

pub const HEADING: &str = "Aadhaar Societal Trends & Early-Warning Intelligence System (AST-EWIS)";
pub const SUBTITLE: &str = "A data-driven dashboard to identify societal trends and early-warning signals using Aadhaar biometric update data.";
pub const NO_TREND_DATA: &str = "No monthly data for this state.";
pub const NO_WARNING_DISTRICTS: &str = "No warning districts for this state.";
pub const FOOTER: &str = "AST-EWIS | UIDAI Data Hackathon 2026";

const INTERPRETATION: [&str; 4] = [
    "Spikes indicate abnormal Aadhaar activity patterns",
    "Higher severity means stronger deviation from normal behavior",
    "Red districts should be prioritized for attention",
    "Policymakers can use this for proactive intervention",
];

const THEME: &str = r#"
body { background-color: #f9fbfd; font-family: sans-serif; margin: 0; display: flex; }
main { flex: 1; padding: 24px; }
.sidebar { background-color: #f3f7ff; padding: 24px; min-width: 220px; }
.card { background-color: white; padding: 18px; border-radius: 14px; border: 1px solid #e6eef9; box-shadow: 0 2px 6px rgba(0,0,0,0.03); margin-bottom: 10px; }
.kpis { display: flex; gap: 10px; }
.kpis .card { flex: 1; }
.metric { text-align: center; font-size: 22px; }
.small { color: #6c757d; font-size: 14px; }
.info { background-color: #e8f4fd; padding: 12px; border-radius: 8px; }
.error { background-color: #fdecea; color: #a12622; padding: 12px; border-radius: 8px; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #e6eef9; padding: 4px 8px; text-align: left; }
"#;

/// Minimal HTML escaping for text and attribute values.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn head(output: &mut String, config: &DashboardConfig) {
    let _ = writeln!(output, "<!DOCTYPE html>");
    let _ = writeln!(output, "<html lang=\"en\">");
    let _ = writeln!(output, "<head>");
    let _ = writeln!(output, "<meta charset=\"utf-8\">");
    let _ = writeln!(output, "<title>{}</title>", escape(&config.page_title));
    let _ = writeln!(
        output,
        "<style>{THEME}main {{ max-width: {}; }}</style>",
        config.layout.max_width()
    );
    let _ = writeln!(output, "</head>");
}

/// The full dashboard page for one view.
pub fn build_page(view: &ViewModel, config: &DashboardConfig) -> String {
    let mut output = String::new();
    head(&mut output, config);
    let _ = writeln!(output, "<body>");

    let _ = writeln!(output, "<aside class=\"sidebar\">");
    let _ = writeln!(output, "<h2>Filters</h2>");
    let _ = writeln!(output, "<form method=\"get\" action=\"/\">");
    let _ = writeln!(output, "<label for=\"state\">Select State</label>");
    let _ = writeln!(
        output,
        "<select id=\"state\" name=\"state\" onchange=\"this.form.submit()\">"
    );
    for option in &view.filter.options {
        let selected = if view.filter.selected() == Some(option.as_str()) {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            output,
            "<option value=\"{0}\"{selected}>{0}</option>",
            escape(option)
        );
    }
    let _ = writeln!(output, "</select>");
    let _ = writeln!(output, "<noscript><button type=\"submit\">Apply</button></noscript>");
    let _ = writeln!(output, "</form>");
    let _ = writeln!(output, "</aside>");

    let _ = writeln!(output, "<main>");
    let _ = writeln!(output, "<h1>{}</h1>", escape(HEADING));
    let _ = writeln!(output, "<p>{}</p>", escape(SUBTITLE));

    let latest = view.kpis.latest_month.as_deref().unwrap_or("n/a");
    let _ = writeln!(output, "<div class=\"kpis\">");
    kpi_card(&mut output, &thousands(view.kpis.total_updates), "Total Updates");
    kpi_card(&mut output, &view.kpis.total_warnings.to_string(), "Warnings Detected");
    kpi_card(&mut output, latest, "Latest Month");
    let _ = writeln!(output, "</div>");

    let state_label = escape(view.filter.selected().unwrap_or("-"));

    let _ = writeln!(output, "<section class=\"card\">");
    let _ = writeln!(output, "<h3>Monthly Trend – {state_label}</h3>");
    if view.trend.is_empty() {
        let _ = writeln!(output, "<div class=\"info\">{NO_TREND_DATA}</div>");
    } else {
        output.push_str(&svg::trend_chart(&view.trend));
    }
    let _ = writeln!(output, "</section>");

    let _ = writeln!(output, "<section class=\"card\">");
    let _ = writeln!(output, "<h3>Top Early-Warning Signals</h3>");
    let _ = writeln!(output, "<table>");
    let _ = writeln!(output, "<thead><tr>");
    for header in &view.warnings.headers {
        let _ = writeln!(output, "<th>{}</th>", escape(header));
    }
    let _ = writeln!(output, "</tr></thead>");
    let _ = writeln!(output, "<tbody>");
    for row in &view.warnings.rows {
        let cells: String = row
            .iter()
            .map(|cell| format!("<td>{}</td>", escape(cell)))
            .collect();
        let _ = writeln!(output, "<tr>{cells}</tr>");
    }
    let _ = writeln!(output, "</tbody>");
    let _ = writeln!(output, "</table>");
    let _ = writeln!(output, "</section>");

    let _ = writeln!(output, "<section class=\"card\">");
    let _ = writeln!(output, "<h3>District Risk Levels – {state_label}</h3>");
    if view.districts.is_empty() {
        let _ = writeln!(output, "<div class=\"info\">{NO_WARNING_DISTRICTS}</div>");
    } else {
        output.push_str(&svg::district_chart(&view.districts, view.aggregation));
        if view.aggregation == Aggregation::MeanSeverity {
            risk_legend(&mut output);
        }
    }
    let _ = writeln!(output, "</section>");

    let _ = writeln!(output, "<section class=\"card\">");
    let _ = writeln!(output, "<h3>How to Interpret This Dashboard</h3>");
    let _ = writeln!(output, "<ul>");
    for line in INTERPRETATION {
        let _ = writeln!(output, "<li>{line}</li>");
    }
    let _ = writeln!(output, "</ul>");
    let _ = writeln!(output, "</section>");

    let _ = writeln!(output, "<footer class=\"small\">— {}</footer>", escape(FOOTER));
    let _ = writeln!(output, "</main>");
    let _ = writeln!(output, "</body>");
    let _ = writeln!(output, "</html>");
    output
}

fn kpi_card(output: &mut String, value: &str, label: &str) {
    let _ = writeln!(
        output,
        "<div class=\"card metric\">{}<div class=\"small\">{}</div></div>",
        escape(value),
        label
    );
}

fn risk_legend(output: &mut String) {
    let _ = writeln!(output, "<p><strong>Risk Levels</strong></p>");
    let _ = writeln!(output, "<ul class=\"legend\">");
    for level in RiskLevel::ALL {
        let _ = writeln!(
            output,
            "<li><span style=\"color: {}\">&#9632;</span> {}</li>",
            level.color(),
            escape(level.label())
        );
    }
    let _ = writeln!(output, "</ul>");
}

/// Stand-in page when the inputs cannot be rendered. Never contains dashboard content.
pub fn build_error_page(config: &DashboardConfig, message: &str) -> String {
    let mut output = String::new();
    head(&mut output, config);
    let _ = writeln!(output, "<body>");
    let _ = writeln!(output, "<main>");
    let _ = writeln!(output, "<div class=\"error\">{}</div>", escape(message));
    let _ = writeln!(output, "</main>");
    let _ = writeln!(output, "</body>");
    let _ = writeln!(output, "</html>");
    output
}

pub fn build_missing_data_page(config: &DashboardConfig) -> String {
    build_error_page(config, MISSING_DATA_MESSAGE)
}
