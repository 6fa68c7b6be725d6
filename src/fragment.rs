//! Typed markup for section fragments.
//!
//! Renderers build `Fragment` trees instead of concatenating strings, so text
//! coming from payloads is always escaped and retry controls carry a typed
//! `Action` rather than inline script.

use std::fmt::Write;

use crate::models::SectionKind;

/// Behaviour bound to a rendered control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Reload(SectionKind),
}

impl Action {
    fn attr_value(self) -> String {
        match self {
            Action::Reload(kind) => format!("reload:{}", kind.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Element(Element),
    Text(String),
    /// Markup prerendered by the server, emitted verbatim.
    Trusted(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    classes: Vec<String>,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Fragment>,
    action: Option<Action>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
            action: None,
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn style(self, value: impl Into<String>) -> Self {
        self.attr("style", value)
    }

    pub fn child(mut self, child: impl Into<Fragment>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Fragment::Text(text.into()))
    }

    pub fn on_click(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    fn render_into(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape_html(&self.classes.join(" ")));
        }
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape_html(value));
        }
        if let Some(action) = self.action {
            let _ = write!(out, " data-action=\"{}\"", action.attr_value());
        }
        out.push('>');
        for child in &self.children {
            child.render_into(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

impl From<Element> for Fragment {
    fn from(element: Element) -> Self {
        Fragment::Element(element)
    }
}

impl Fragment {
    pub fn text(text: impl Into<String>) -> Self {
        Fragment::Text(text.into())
    }

    pub fn trusted(markup: impl Into<String>) -> Self {
        Fragment::Trusted(markup.into())
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    /// Concatenated text content, roughly what `textContent` yields in a browser.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    /// Every action bound to a control inside this fragment, in document order.
    pub fn actions(&self) -> Vec<Action> {
        let mut found = Vec::new();
        self.collect_actions(&mut found);
        found
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Fragment::Element(element) => element.render_into(out),
            Fragment::Text(text) => out.push_str(&escape_html(text)),
            Fragment::Trusted(markup) => out.push_str(markup),
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Fragment::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
            Fragment::Text(text) | Fragment::Trusted(text) => out.push_str(text),
        }
    }

    fn collect_actions(&self, found: &mut Vec<Action>) {
        if let Fragment::Element(element) = self {
            if let Some(action) = element.action {
                found.push(action);
            }
            for child in &element.children {
                child.collect_actions(found);
            }
        }
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
