use crate::charts::{self, number, percent};
use crate::document::Document;
use crate::fragment::{Action, Element, Fragment};
use crate::models::{
    AnalyticsPayload, ModelInventorySummary, PredictionsPayload, SectionKind, SectionPayload,
};

/// Renders a successful payload and returns what now fills the section's
/// content anchor, if the section replaces it at all.
pub fn render(document: &mut Document, payload: &SectionPayload) -> Option<Fragment> {
    match payload {
        SectionPayload::Predictions(payload) => Some(render_predictions(document, payload)),
        SectionPayload::Analytics(payload) => {
            render_analytics(document, payload);
            None
        }
        SectionPayload::Models(payload) => Some(render_models(document, payload)),
    }
}

pub fn render_predictions(document: &mut Document, payload: &PredictionsPayload) -> Fragment {
    let content = Fragment::trusted(payload.html.as_str());
    document.replace(SectionKind::Predictions.content_anchor(), content.clone());

    let model = &payload.active_model;
    document.set_text("model-name", model.name.as_str());
    document.set_text("model-type", model.model_type.as_str());
    document.set_text("model-accuracy", percent(model.accuracy));
    document.set_text("model-version", model.version.as_str());

    let stats = &payload.stats;
    document.set_text("total-predictions", stats.total_predictions.to_string());
    document.set_text("high-risk-count", stats.high_risk_count.to_string());
    document.set_text("medium-risk-count", stats.medium_risk_count.to_string());
    document.set_text("low-risk-count", stats.low_risk_count.to_string());

    content
}

pub fn render_models(document: &mut Document, payload: &ModelInventorySummary) -> Fragment {
    let content = Fragment::trusted(payload.rendered_list.as_str());
    document.replace(SectionKind::Models.content_anchor(), content.clone());

    document.set_text("total-models", payload.total_models.to_string());
    document.set_text("active-models", payload.active_models.to_string());

    content
}

pub fn render_analytics(document: &mut Document, payload: &AnalyticsPayload) {
    document.set_text(
        "readmission-rate",
        format!("{}%", number(payload.readmission_rate)),
    );
    document.set_text("avg-risk-score", format!("{}%", number(payload.avg_risk_score)));
    document.set_text("avg-stay", format!("{} days", number(payload.avg_stay)));
    document.set_text("total-assessed", payload.total_assessed.to_string());

    charts::compose(document, payload);
}

fn data_noun(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Predictions => "prediction",
        SectionKind::Analytics => "analytics",
        SectionKind::Models => "model",
    }
}

pub fn loading_placeholder(kind: SectionKind) -> Fragment {
    Element::new("div")
        .class("text-center py-5")
        .child(
            Element::new("div")
                .class("spinner-border text-primary")
                .attr("role", "status")
                .child(
                    Element::new("span")
                        .class("visually-hidden")
                        .text(format!("Loading {}...", kind.label())),
                ),
        )
        .child(
            Element::new("p")
                .class("mt-2")
                .text(format!("Loading {} data...", data_noun(kind))),
        )
        .into()
}

pub fn error_block(kind: SectionKind, message: &str) -> Fragment {
    Element::new("div")
        .class("alert alert-danger")
        .child(Element::new("h5").text(format!("Error Loading {}", kind.title())))
        .child(Element::new("p").text(message))
        .child(
            Element::new("button")
                .class("btn btn-primary mt-2")
                .on_click(Action::Reload(kind))
                .text("Try Again"),
        )
        .into()
}
