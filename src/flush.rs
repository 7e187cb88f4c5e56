//! Payload flushing for shallow-merging data layers
//!
//! Tag-management data layers merge every push into their running state, so a
//! custom parameter set by one event stays visible to every later event. A
//! flushed payload names every parameter seen in earlier payloads explicitly:
//! parameters the new payload does not set are reset to `undefined`
//! (`None` here, `null` on the wire), and `_clear` tells the data layer not to
//! recursively merge nested objects or arrays.

use crate::events::{EventKind, Payload};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Custom parameters after flushing; `None` marks a reset key
pub type FlushedParameters = BTreeMap<String, Option<Value>>;

/// A payload ready for a shallow-merging data layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlushedPayload {
    pub app: Option<String>,
    pub view: Option<String>,
    #[serde(default)]
    pub element_tree: Vec<String>,
    pub event: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_parameters: Option<FlushedParameters>,
    /// Apply values as-is, without deep-merging into prior state
    #[serde(rename = "_clear", default)]
    pub clear: bool,
}

impl FlushedPayload {
    fn from_parts(
        payload: &Payload,
        custom_parameters: Option<FlushedParameters>,
        clear: bool,
    ) -> Self {
        Self {
            app: payload.app.clone(),
            view: payload.view.clone(),
            element_tree: payload.element_tree.clone(),
            event: payload.event,
            component: payload.component.clone(),
            label: payload.label.clone(),
            timestamp: payload.timestamp,
            custom_parameters,
            clear,
        }
    }
}

/// Pass-through conversion: own parameters only, `_clear` unset
impl From<&Payload> for FlushedPayload {
    fn from(payload: &Payload) -> Self {
        let parameters = payload.custom_parameters.as_ref().map(|params| {
            params
                .iter()
                .map(|(key, value)| (key.clone(), Some(value.clone())))
                .collect()
        });
        Self::from_parts(payload, parameters, false)
    }
}

/// Flush `payload` against the payloads dispatched before it
///
/// Every key found in any earlier payload's custom parameters is reset to
/// `None`; the new payload's own parameters are then laid over the top, so a
/// re-supplied key always keeps its new value. With no earlier keys the
/// payload's parameters pass through untouched (including their absence).
pub fn flushed_payload<'a, I>(previous: I, payload: &Payload) -> FlushedPayload
where
    I: IntoIterator<Item = &'a Payload>,
{
    let previous_keys = previous
        .into_iter()
        .filter_map(|p| p.custom_parameters.as_ref())
        .flat_map(|params| params.keys());
    flushed_payload_with_keys(previous_keys, payload)
}

/// Flush `payload` against an already collected set of earlier keys
///
/// Same result as [`flushed_payload`] over payloads whose parameter keys are
/// exactly `previous_keys`.
pub fn flushed_payload_with_keys<'a, K>(previous_keys: K, payload: &Payload) -> FlushedPayload
where
    K: IntoIterator<Item = &'a String>,
{
    let mut parameters: FlushedParameters = previous_keys
        .into_iter()
        .map(|key| (key.clone(), None))
        .collect();

    if let Some(own) = &payload.custom_parameters {
        parameters.extend(own.iter().map(|(key, value)| (key.clone(), Some(value.clone()))));
    }

    let custom_parameters = if parameters.is_empty() && payload.custom_parameters.is_none() {
        None
    } else {
        Some(parameters)
    };

    FlushedPayload::from_parts(payload, custom_parameters, true)
}
