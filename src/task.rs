use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::host::RecordId;

/// Read view over a host task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskView {
    pub id: RecordId,
    pub name: String,
    /// 1-based depth in the outline.
    pub outline_level: u32,
    /// Dotted position in the outline, e.g. `2.1` for the first subtask of the
    /// second top-level task.
    pub outline_number: String,
    pub start: Option<NaiveDate>,
    pub finish: Option<NaiveDate>,
    pub warehouse: Option<String>,
    pub manager: Option<String>,
    /// Names of assigned resources, in assignment order.
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    pub start: NaiveDate,
    pub finish: NaiveDate,
    pub warehouse: String,
    pub manager: String,
    /// Task to nest under; `None` appends at the top level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<RecordId>,
}

impl NewTask {
    pub fn new(
        name: impl Into<String>,
        start: NaiveDate,
        finish: NaiveDate,
        warehouse: impl Into<String>,
        manager: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            start,
            finish,
            warehouse: warehouse.into(),
            manager: manager.into(),
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: RecordId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Produces outline numbers for a sequence of outline levels.
#[derive(Debug, Default)]
pub(crate) struct OutlineNumbering {
    counters: Vec<u32>,
}

impl OutlineNumbering {
    pub(crate) fn next(&mut self, level: u32) -> String {
        let depth = level.max(1) as usize;
        self.counters.truncate(depth);
        self.counters.resize(depth, 0);
        self.counters[depth - 1] += 1;
        self.counters
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_numbers_follow_levels() {
        let mut numbering = OutlineNumbering::default();
        let numbers: Vec<String> = [1, 2, 2, 3, 1, 2]
            .into_iter()
            .map(|level| numbering.next(level))
            .collect();
        assert_eq!(numbers, vec!["1", "1.1", "1.2", "1.2.1", "2", "2.1"]);
    }
}
