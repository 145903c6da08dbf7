use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single homework submission as returned by the review API.
///
/// The record is kept loosely typed: equality is structural over every field,
/// which is what change detection keys on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Homework(Map<String, Value>);

impl Homework {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw field access.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// `homework_name`, if present and a string.
    pub fn name(&self) -> Option<&str> {
        self.get("homework_name").and_then(Value::as_str)
    }

    /// `status`, if present and a string.
    pub fn status(&self) -> Option<&str> {
        self.get("status").and_then(Value::as_str)
    }

    pub fn reviewer_comment(&self) -> Option<&str> {
        self.get("reviewer_comment").and_then(Value::as_str)
    }

    pub fn lesson_name(&self) -> Option<&str> {
        self.get("lesson_name").and_then(Value::as_str)
    }
}

/// Validated review API payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusResponse {
    /// Newest submission first.
    pub homeworks: Vec<Homework>,
    /// Server time (unix seconds) to use as the next `from_date`.
    pub current_date: Option<i64>,
}
