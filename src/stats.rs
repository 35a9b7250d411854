use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;

const TYPE_FIELD: &str = "question_type";
const TOPIC_FIELD: &str = "topic";

/// Item tallies for one recovered object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyStats {
    pub key: String,
    pub items: usize,
    pub by_type: BTreeMap<String, usize>,
    pub topics: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub per_key: Vec<KeyStats>,
    pub total_items: usize,
}

impl StatsSummary {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for stats in &self.per_key {
            lines.push(format!(
                "{}: {} items, {} topics",
                stats.key, stats.items, stats.topics
            ));
            for (question_type, count) in &stats.by_type {
                lines.push(format!("  {question_type}: {count}"));
            }
        }
        lines.push(format!(
            "total: {} items across {} objects",
            self.total_items,
            self.per_key.len()
        ));
        lines
    }
}

/// Tallies the recovered objects: item count, per-type breakdown, and the
/// number of distinct non-empty topics per object, plus grand totals.
/// Purely informational; has no influence on extraction.
pub fn summarize(objects: &[Value], anchor_field: &str, items_field: &str) -> StatsSummary {
    let empty = Vec::new();
    let mut per_key = Vec::with_capacity(objects.len());
    let mut total_items = 0usize;

    for object in objects {
        let key = object
            .get(anchor_field)
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let items = object
            .get(items_field)
            .and_then(Value::as_array)
            .unwrap_or(&empty);

        let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
        let mut topics: BTreeSet<&str> = BTreeSet::new();
        for item in items {
            let question_type = item
                .get(TYPE_FIELD)
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            *by_type.entry(question_type.to_string()).or_insert(0) += 1;
            if let Some(topic) = item.get(TOPIC_FIELD).and_then(Value::as_str) {
                if !topic.is_empty() {
                    topics.insert(topic);
                }
            }
        }

        total_items += items.len();
        per_key.push(KeyStats {
            key,
            items: items.len(),
            by_type,
            topics: topics.len(),
        });
    }

    StatsSummary {
        per_key,
        total_items,
    }
}
