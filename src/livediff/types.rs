//! Data types for the live diff preview
//!
//! `ChangeOrder` and `ChangeStep` mirror the JSON emitted by
//! `kusion preview --output json`; `LiveDiffPreview` is the folded result the
//! virtual documents are rendered from.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// The operation a change step performs on its resource
///
/// Unknown actions are carried through untouched; only `from`/`to` are used
/// to build the preview. Non-string values keep their JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum ActionType {
    /// Nothing to do
    UnChange,
    /// Creating a new resource
    Create,
    /// Updating an existing resource
    Update,
    /// Deleting an existing resource
    Delete,
    /// Any action this crate does not know about
    Other(String),
}

impl ActionType {
    pub fn as_str(&self) -> &str {
        match self {
            ActionType::UnChange => "UnChange",
            ActionType::Create => "Create",
            ActionType::Update => "Update",
            ActionType::Delete => "Delete",
            ActionType::Other(action) => action,
        }
    }
}

impl From<String> for ActionType {
    fn from(action: String) -> Self {
        match action.as_str() {
            "UnChange" | "Unchange" | "Unchanged" => ActionType::UnChange,
            "Create" => ActionType::Create,
            "Update" => ActionType::Update,
            "Delete" => ActionType::Delete,
            _ => ActionType::Other(action),
        }
    }
}

impl From<Value> for ActionType {
    fn from(action: Value) -> Self {
        match action {
            Value::String(action) => ActionType::from(action),
            other => ActionType::Other(other.to_string()),
        }
    }
}

impl Default for ActionType {
    fn default() -> Self {
        ActionType::Other(String::new())
    }
}

impl From<ActionType> for String {
    fn from(action: ActionType) -> Self {
        match action {
            ActionType::Other(action) => action,
            known => known.as_str().to_string(),
        }
    }
}

/// One resource's transition within a change order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeStep {
    /// The resource id, unique within one change order
    pub id: String,

    /// The operation performed by this step
    #[serde(default)]
    pub action: ActionType,

    /// State before the change (null for creations)
    #[serde(default)]
    pub from: Value,

    /// State after the change (null for deletions)
    #[serde(default)]
    pub to: Value,
}

impl ChangeStep {
    /// Decode one raw change entry
    pub fn decode(raw: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(raw)
    }
}

/// Wire shape of a change order before its steps are decoded
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChangeOrder {
    // The tool prints `null` for an empty list or map
    #[serde(default)]
    step_keys: Option<Vec<String>>,
    #[serde(default)]
    change_steps: Option<BTreeMap<String, Value>>,
}

/// The full result of one preview invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeOrder {
    /// Declared iteration order of the steps
    pub step_keys: Vec<String>,

    /// Steps keyed by identifier
    pub change_steps: BTreeMap<String, ChangeStep>,
}

impl ChangeOrder {
    /// Parse the JSON printed by the preview tool
    pub fn parse(json: &str) -> Result<Self> {
        let raw: RawChangeOrder =
            serde_json::from_str(json).context("Preview output is not a change order")?;

        let mut change_steps = BTreeMap::new();
        for (key, value) in raw.change_steps.unwrap_or_default() {
            let step = ChangeStep::decode(value)
                .with_context(|| format!("Change step '{}' is malformed", key))?;
            change_steps.insert(key, step);
        }

        Ok(Self {
            step_keys: raw.step_keys.unwrap_or_default(),
            change_steps,
        })
    }

    /// Steps in declared order, followed by any entry `step_keys` does not list
    ///
    /// Keys without an entry are skipped.
    pub fn ordered_steps(&self) -> Vec<&ChangeStep> {
        let mut seen = BTreeSet::new();
        let mut steps = Vec::with_capacity(self.change_steps.len());

        for key in &self.step_keys {
            if !seen.insert(key.as_str()) {
                continue;
            }
            if let Some(step) = self.change_steps.get(key) {
                steps.push(step);
            }
        }

        for (key, step) in &self.change_steps {
            if !seen.contains(key.as_str()) {
                steps.push(step);
            }
        }

        steps
    }
}

/// Which side of the live diff a document shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSide {
    /// What is currently deployed (`from` values)
    Runtime,
    /// What the stack declares (`to` values)
    Spec,
}

impl DiffSide {
    /// URI fragment that selects this side
    pub fn fragment(&self) -> &'static str {
        match self {
            DiffSide::Runtime => "runtime",
            DiffSide::Spec => "spec",
        }
    }

    /// Path segment appended to the stack root for display
    pub fn path_segment(&self) -> &'static str {
        match self {
            DiffSide::Runtime => "status",
            DiffSide::Spec => "spec",
        }
    }

    pub fn from_fragment(fragment: &str) -> Option<Self> {
        match fragment {
            "runtime" => Some(DiffSide::Runtime),
            "spec" => Some(DiffSide::Spec),
            _ => None,
        }
    }
}

/// Runtime and spec snapshots keyed by resource id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LiveDiffPreview {
    /// Resource id to its `from` value
    pub status: BTreeMap<String, Value>,

    /// Resource id to its `to` value
    pub spec: BTreeMap<String, Value>,
}

impl LiveDiffPreview {
    pub fn snapshot(&self, side: DiffSide) -> &BTreeMap<String, Value> {
        match side {
            DiffSide::Runtime => &self.status,
            DiffSide::Spec => &self.spec,
        }
    }

    /// Render one side as YAML
    pub fn to_yaml(&self, side: DiffSide) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self.snapshot(side))
    }

    /// Number of resources in the preview
    pub fn len(&self) -> usize {
        self.status.len()
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty() && self.spec.is_empty()
    }
}
