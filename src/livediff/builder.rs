//! Folds change steps into the runtime/spec snapshots

use serde_json::Value;
use std::collections::BTreeMap;

use super::types::{ChangeOrder, ChangeStep, LiveDiffPreview};

/// Accumulates change steps into a `LiveDiffPreview`
///
/// A step whose id was already seen replaces the earlier one.
#[derive(Debug, Default)]
pub struct PreviewBuilder {
    status: BTreeMap<String, Value>,
    spec: BTreeMap<String, Value>,
}

impl PreviewBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one step's before and after state under its resource id
    pub fn add_step(&mut self, step: &ChangeStep) {
        self.status.insert(step.id.clone(), step.from.clone());
        self.spec.insert(step.id.clone(), step.to.clone());
    }

    pub fn build(self) -> LiveDiffPreview {
        LiveDiffPreview {
            status: self.status,
            spec: self.spec,
        }
    }

    /// Build a preview from steps in iteration order
    pub fn from_steps<'a, I>(steps: I) -> LiveDiffPreview
    where
        I: IntoIterator<Item = &'a ChangeStep>,
    {
        let mut builder = Self::new();
        for step in steps {
            builder.add_step(step);
        }
        builder.build()
    }

    /// Build a preview from a decoded change order
    pub fn from_order(order: &ChangeOrder) -> LiveDiffPreview {
        Self::from_steps(order.ordered_steps())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::livediff::types::ActionType;
    use serde_json::json;

    fn step(id: &str, action: ActionType, from: Value, to: Value) -> ChangeStep {
        ChangeStep {
            id: id.to_string(),
            action,
            from,
            to,
        }
    }

    #[test]
    fn test_every_step_lands_on_both_sides() {
        let order = ChangeOrder::parse(
            r#"{
                "stepKeys": ["apps/v1:Deployment:demo", "v1:Service:demo", "v1:ConfigMap:old"],
                "changeSteps": {
                    "apps/v1:Deployment:demo": {"id": "apps/v1:Deployment:demo", "action": "Update", "from": {"replicas": 1}, "to": {"replicas": 3}},
                    "v1:Service:demo": {"id": "v1:Service:demo", "action": "Create", "to": {"port": 80}},
                    "v1:ConfigMap:old": {"id": "v1:ConfigMap:old", "action": "Delete", "from": {"data": {"k": "v"}}}
                }
            }"#,
        )
        .unwrap();

        let preview = PreviewBuilder::from_order(&order);

        assert_eq!(preview.status.len(), 3);
        assert_eq!(preview.spec.len(), 3);
        for (key, step) in &order.change_steps {
            assert_eq!(preview.status[key], step.from);
            assert_eq!(preview.spec[key], step.to);
        }
        assert_eq!(preview.status["v1:Service:demo"], Value::Null);
        assert_eq!(preview.spec["v1:ConfigMap:old"], Value::Null);
    }

    #[test]
    fn test_single_update_example() {
        let order = ChangeOrder::parse(
            r#"{"stepKeys":["r1"],"changeSteps":{"r1":{"id":"r1","action":"Update","from":{"a":1},"to":{"a":2}}}}"#,
        )
        .unwrap();

        let preview = PreviewBuilder::from_order(&order);

        assert_eq!(preview.status, BTreeMap::from([("r1".to_string(), json!({"a": 1}))]));
        assert_eq!(preview.spec, BTreeMap::from([("r1".to_string(), json!({"a": 2}))]));
    }

    #[test]
    fn test_dangling_step_key_is_skipped() {
        let order = ChangeOrder::parse(
            r#"{"stepKeys":["r1","missing"],"changeSteps":{"r1":{"id":"r1","action":"UnChange","from":1,"to":1}}}"#,
        )
        .unwrap();

        let preview = PreviewBuilder::from_order(&order);

        assert_eq!(preview.len(), 1);
        assert!(!preview.status.contains_key("missing"));
        assert!(!preview.spec.contains_key("missing"));
    }

    #[test]
    fn test_duplicate_id_last_write_wins() {
        let steps = vec![
            step("r1", ActionType::Update, json!(1), json!(2)),
            step("r1", ActionType::Update, json!(10), json!(20)),
        ];

        let preview = PreviewBuilder::from_steps(&steps);

        assert_eq!(preview.status["r1"], json!(10));
        assert_eq!(preview.spec["r1"], json!(20));
    }

    #[test]
    fn test_empty_order_builds_empty_preview() {
        let preview = PreviewBuilder::from_order(&ChangeOrder::default());
        assert!(preview.is_empty());
    }
}
