//! Field signals: the text groups describing one input element, and the
//! label discovery chain that extracts them.

use crate::text::normalize;
use serde::{Deserialize, Serialize};

/// Text groups describing a single form field.
///
/// `primary` holds human-facing text (labels, placeholders), `secondary` the
/// machine attributes (name, id, autocomplete) and `structural` the context
/// around the field (section headings, legends). Groups are concatenated
/// without weighting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSignals {
    #[serde(default)]
    pub primary: Vec<String>,
    #[serde(default)]
    pub secondary: Vec<String>,
    #[serde(default)]
    pub structural: Vec<String>,
}

impl FieldSignals {
    pub fn new(primary: Vec<String>, secondary: Vec<String>, structural: Vec<String>) -> Self {
        Self {
            primary,
            secondary,
            structural,
        }
    }

    /// Signals with only primary text
    pub fn from_primary<S: Into<String>>(text: S) -> Self {
        Self {
            primary: vec![text.into()],
            ..Self::default()
        }
    }

    /// Extract signals from an input element description
    pub fn from_element(element: &InputElement) -> Self {
        let mut primary = Vec::new();
        if let Some(label) = discover_label(element) {
            primary.push(label.text);
        }
        push_present(&mut primary, &element.placeholder);

        let mut secondary = Vec::new();
        push_present(&mut secondary, &element.name);
        push_present(&mut secondary, &element.id);
        push_present(&mut secondary, &element.autocomplete);

        let mut structural = Vec::new();
        push_present(&mut structural, &element.section_heading);

        Self {
            primary,
            secondary,
            structural,
        }
    }

    /// All groups joined by a space, in primary, secondary, structural order
    pub fn raw_text(&self) -> String {
        self.primary
            .iter()
            .chain(&self.secondary)
            .chain(&self.structural)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Normalized signal text used for vectorization and as learning key
    pub fn signal_text(&self) -> String {
        normalize(&self.raw_text())
    }

    pub fn is_empty(&self) -> bool {
        self.signal_text().is_empty()
    }
}

fn push_present(group: &mut Vec<String>, value: &Option<String>) {
    if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        group.push(v.to_string());
    }
}

/// Boundary description of a UI input element, as reported by the page.
///
/// Every field is optional; the page side fills in whatever it could resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputElement {
    /// Text of a `<label for=...>` pointing at the element
    pub label_for: Option<String>,
    /// Resolved text of the elements named by `aria-labelledby`
    pub aria_labelledby: Option<String>,
    pub aria_label: Option<String>,
    /// Text of an enclosing `<label>`
    pub wrapping_label: Option<String>,
    pub title: Option<String>,
    /// Nearest text node preceding the element
    pub preceding_text: Option<String>,
    pub placeholder: Option<String>,
    pub name: Option<String>,
    pub id: Option<String>,
    pub autocomplete: Option<String>,
    /// Closest fieldset legend or section heading
    pub section_heading: Option<String>,
}

/// A label found by one of the discovery strategies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLabel {
    pub text: String,
    pub strategy: &'static str,
}

/// A label discovery strategy: a pure lookup over the element.
pub type LabelStrategy = fn(&InputElement) -> Option<String>;

/// Strategies in precedence order. New strategies are appended.
pub const LABEL_STRATEGIES: &[(&str, LabelStrategy)] = &[
    ("label-for", label_for),
    ("aria-labelledby", aria_labelledby),
    ("aria-label", aria_label),
    ("wrapping-label", wrapping_label),
    ("title", title),
    ("preceding-text", preceding_text),
];

fn label_for(element: &InputElement) -> Option<String> {
    element.label_for.clone()
}

fn aria_labelledby(element: &InputElement) -> Option<String> {
    element.aria_labelledby.clone()
}

fn aria_label(element: &InputElement) -> Option<String> {
    element.aria_label.clone()
}

fn wrapping_label(element: &InputElement) -> Option<String> {
    element.wrapping_label.clone()
}

fn title(element: &InputElement) -> Option<String> {
    element.title.clone()
}

fn preceding_text(element: &InputElement) -> Option<String> {
    element.preceding_text.clone()
}

/// Run the strategies in order; the first non-blank label wins.
pub fn discover_label(element: &InputElement) -> Option<DiscoveredLabel> {
    LABEL_STRATEGIES.iter().find_map(|(name, strategy)| {
        strategy(element)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .map(|text| DiscoveredLabel {
                text,
                strategy: *name,
            })
    })
}
