//! Chart and metric widgets derived from one analytics payload.
//!
//! Each widget writes only to its own anchor and does nothing when the page
//! does not declare that anchor.

use crate::document::Document;
use crate::fragment::{Element, Fragment};
use crate::models::{AnalyticsPayload, ModelMetrics, QuickStats, RiskDistribution};

const BAR_FLOOR_PX: u64 = 30;
const BAR_PX_PER_PATIENT: u64 = 8;

/// Illustrative factors shown until the analytics endpoint reports real ones.
const RISK_FACTORS: [(&str, u32, FactorLevel); 5] = [
    ("Multiple Chronic Conditions", 42, FactorLevel::High),
    ("Previous Admissions", 38, FactorLevel::High),
    ("Advanced Age", 25, FactorLevel::Medium),
    ("Long Hospital Stay", 22, FactorLevel::Medium),
    ("Limited Social Support", 18, FactorLevel::Low),
];

#[derive(Debug, Clone, Copy)]
enum FactorLevel {
    High,
    Medium,
    Low,
}

impl FactorLevel {
    fn class(self) -> &'static str {
        match self {
            FactorLevel::High => "risk-factor-item high",
            FactorLevel::Medium => "risk-factor-item medium",
            FactorLevel::Low => "risk-factor-item",
        }
    }
}

pub fn compose(document: &mut Document, payload: &AnalyticsPayload) {
    render_risk_distribution(document, &payload.risk_distribution);
    render_trend(document, payload.readmission_rate);
    render_risk_factors(document);
    render_performance_metrics(document, &payload.model_metrics);
    render_quick_stats(document, &payload.quick_stats);
}

/// Fixed visual scale: zero-count bars still get the floor height.
pub fn bar_height(count: u64) -> u64 {
    count.saturating_mul(BAR_PX_PER_PATIENT).max(BAR_FLOOR_PX)
}

/// Formats a 0-1 fraction as a percentage with one decimal. Exact ties
/// round away from zero (`86.25` -> `86.3`) rather than to even.
pub fn percent(fraction: f64) -> String {
    let scaled = fraction * 100.0;
    let tenths = scaled * 10.0;
    if (tenths - tenths.trunc()).abs() == 0.5 {
        return format!("{:.1}%", tenths.round() / 10.0);
    }
    format!("{scaled:.1}%")
}

/// Shortest round-trip rendering, so `12.0` prints as `12`.
pub fn number(value: f64) -> String {
    format!("{value}")
}

pub fn render_risk_distribution(document: &mut Document, distribution: &RiskDistribution) {
    if document.has_anchor("risk-chart") {
        document.replace("risk-chart", risk_distribution_chart(distribution));
    }
}

pub fn render_trend(document: &mut Document, readmission_rate: f64) {
    if document.has_anchor("trends-chart") {
        document.replace("trends-chart", trend_chart(readmission_rate));
    }
}

pub fn render_risk_factors(document: &mut Document) {
    if document.has_anchor("risk-factors") {
        document.replace("risk-factors", risk_factor_list());
    }
}

pub fn render_performance_metrics(document: &mut Document, metrics: &ModelMetrics) {
    document.set_text("model-accuracy-metric", percent(metrics.accuracy));
    document.set_text("model-precision", percent(metrics.precision));
    document.set_text("model-recall", percent(metrics.recall));
    document.set_text("model-f1", percent(metrics.f1_score));
}

pub fn render_quick_stats(document: &mut Document, stats: &QuickStats) {
    document.set_text(
        "avg-prediction-time",
        format!("{}s", number(stats.avg_prediction_time)),
    );
    document.set_text("success-rate", format!("{}%", number(stats.success_rate)));
}

fn risk_bar(count: u64, color: &str, label: &str) -> Element {
    Element::new("div")
        .class("text-center")
        .child(
            Element::new("div")
                .class(format!("{color} rounded-top"))
                .style(format!("height: {}px; width: 50px;", bar_height(count))),
        )
        .child(
            Element::new("div")
                .class("mt-2 small")
                .child(Element::new("div").class("fw-bold").text(count.to_string()))
                .child(Element::new("div").class("text-muted").text(label)),
        )
}

pub fn risk_distribution_chart(distribution: &RiskDistribution) -> Fragment {
    Element::new("div")
        .class("p-3 w-100")
        .child(
            Element::new("h6")
                .class("text-center mb-3")
                .text("Risk Distribution"),
        )
        .child(
            Element::new("div")
                .class("d-flex justify-content-around align-items-end")
                .style("height: 200px;")
                .child(risk_bar(distribution.high, "bg-danger", "High Risk"))
                .child(risk_bar(distribution.medium, "bg-warning", "Medium Risk"))
                .child(risk_bar(distribution.low, "bg-success", "Low Risk")),
        )
        .into()
}

/// The month-over-month badge is a static placeholder and is marked as such;
/// the payload carries no history to derive it from.
pub fn trend_chart(readmission_rate: f64) -> Fragment {
    Element::new("div")
        .class("p-3 w-100")
        .child(
            Element::new("h6")
                .class("text-center mb-3")
                .text("Readmission Trends"),
        )
        .child(
            Element::new("div")
                .class("text-center")
                .child(
                    Element::new("div")
                        .class("display-4 text-primary fw-bold")
                        .text(format!("{}%", number(readmission_rate))),
                )
                .child(
                    Element::new("p")
                        .class("text-muted")
                        .text("Current Readmission Rate"),
                )
                .child(
                    Element::new("div").class("mt-3").child(
                        Element::new("span")
                            .class("badge bg-success")
                            .attr("data-placeholder", "true")
                            .text("↓ 2.1% from last month"),
                    ),
                ),
        )
        .into()
}

pub fn risk_factor_list() -> Fragment {
    let mut list = Element::new("div").attr("data-placeholder", "true").child(
        Element::new("p")
            .class("text-muted small")
            .text("Illustrative factors"),
    );
    for (name, impact, level) in RISK_FACTORS {
        list = list.child(
            Element::new("div")
                .class(level.class())
                .child(Element::new("span").class("factor-name").text(name))
                .child(
                    Element::new("span")
                        .class("factor-impact")
                        .text(format!("+{impact}% risk")),
                ),
        );
    }
    list.into()
}
