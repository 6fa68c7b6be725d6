//! The page the dashboard renders into.
//!
//! Anchors are declared once when the page is composed. Writes to an anchor
//! that the page does not declare are silent no-ops so optional widgets can be
//! left out of a layout without breaking the renderers.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::rc::Rc;

use crate::fragment::{Action, Fragment};

pub type SharedDocument = Rc<RefCell<Document>>;

const DASHBOARD_ANCHORS: &[&str] = &[
    "predictions-content",
    "model-name",
    "model-type",
    "model-accuracy",
    "model-version",
    "total-predictions",
    "high-risk-count",
    "medium-risk-count",
    "low-risk-count",
    "analytics-content",
    "readmission-rate",
    "avg-risk-score",
    "avg-stay",
    "total-assessed",
    "risk-chart",
    "trends-chart",
    "risk-factors",
    "model-accuracy-metric",
    "model-precision",
    "model-recall",
    "model-f1",
    "avg-prediction-time",
    "success-rate",
    "models-content",
    "total-models",
    "active-models",
];

#[derive(Debug, Default)]
pub struct Document {
    anchors: BTreeMap<String, Option<Fragment>>,
}

impl Document {
    pub fn with_anchors<I, S>(anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            anchors: anchors.into_iter().map(|id| (id.into(), None)).collect(),
        }
    }

    /// The full clinical dashboard layout with every optional widget present.
    pub fn dashboard() -> Self {
        Self::with_anchors(DASHBOARD_ANCHORS.iter().copied())
    }

    pub fn shared(self) -> SharedDocument {
        Rc::new(RefCell::new(self))
    }

    pub fn has_anchor(&self, id: &str) -> bool {
        self.anchors.contains_key(id)
    }

    pub fn replace(&mut self, id: &str, fragment: Fragment) -> bool {
        match self.anchors.get_mut(id) {
            Some(slot) => {
                *slot = Some(fragment);
                true
            }
            None => false,
        }
    }

    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> bool {
        self.replace(id, Fragment::Text(text.into()))
    }

    pub fn fragment(&self, id: &str) -> Option<&Fragment> {
        self.anchors.get(id).and_then(Option::as_ref)
    }

    pub fn html(&self, id: &str) -> Option<String> {
        self.fragment(id).map(Fragment::to_html)
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.fragment(id).map(Fragment::text_content)
    }

    pub fn actions(&self, id: &str) -> Vec<Action> {
        self.fragment(id).map(Fragment::actions).unwrap_or_default()
    }

    /// Serializes every anchor into a standalone page for offline inspection.
    pub fn snapshot_html(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "<!DOCTYPE html>");
        let _ = writeln!(output, "<html><body>");
        for (id, fragment) in &self.anchors {
            let inner = fragment.as_ref().map(Fragment::to_html).unwrap_or_default();
            let _ = writeln!(output, "<div id=\"{id}\">{inner}</div>");
        }
        let _ = writeln!(output, "</body></html>");
        output
    }
}
