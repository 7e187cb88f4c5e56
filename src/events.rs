// Event records handed from triggers to sinks
//
// A `Payload` is built once per dispatch from the nearest scope context plus
// the fields the caller supplied, and is never mutated afterwards. Field names
// serialize in camelCase so the record can be pushed straight into a
// downstream data layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Custom parameters attached to a dispatch
pub type CustomParameters = BTreeMap<String, Value>;

/// Closed set of event kinds a trigger can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Click,
    View,
    Load,
    PageView,
    PageReactivated,
    Submit,
    BrowserBack,
    SectionExpanded,
}

impl EventKind {
    /// Every kind, in declaration order
    pub const ALL: [EventKind; 8] = [
        EventKind::Click,
        EventKind::View,
        EventKind::Load,
        EventKind::PageView,
        EventKind::PageReactivated,
        EventKind::Submit,
        EventKind::BrowserBack,
        EventKind::SectionExpanded,
    ];

    /// Wire name of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::View => "view",
            EventKind::Load => "load",
            EventKind::PageView => "page-view",
            EventKind::PageReactivated => "page-reactivated",
            EventKind::Submit => "submit",
            EventKind::BrowserBack => "browser-back",
            EventKind::SectionExpanded => "section-expanded",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully enriched event record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub app: Option<String>,
    pub view: Option<String>,
    /// Element path captured at dispatch time, outermost first
    #[serde(default)]
    pub element_tree: Vec<String>,
    pub event: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_parameters: Option<CustomParameters>,
}

/// Caller-supplied fields for a single dispatch
///
/// All fields are optional; absent ones stay `None` in the emitted payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchFields {
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub custom_parameters: Option<CustomParameters>,
}

impl DispatchFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add a single custom parameter, creating the map on first use
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_parameters
            .get_or_insert_with(CustomParameters::new)
            .insert(key.into(), value.into());
        self
    }

    /// Replace the custom parameters wholesale
    pub fn parameters(mut self, parameters: CustomParameters) -> Self {
        self.custom_parameters = Some(parameters);
        self
    }
}
