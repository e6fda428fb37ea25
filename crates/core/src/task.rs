use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::dates::resolve_relative_date;

/// A single agenda entry.
///
/// Fields are kept exactly as the model produced them. `date` and `time` are
/// only interpreted when ordering the agenda, see [`Task::instant`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Task {
    pub date: String,
    pub time: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Task {
    /// The point in time this task is scheduled for, if `date` and `time`
    /// form a valid local date-time.
    pub fn instant(&self) -> Option<NaiveDateTime> {
        let combined = format!("{}T{}", self.date.trim(), self.time.trim());
        ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(&combined, fmt).ok())
    }
}

/// Filter describing which tasks a delete action removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFilter {
    pub title: String,
    pub date: Option<String>,
    pub time: Option<String>,
}

impl DeleteFilter {
    /// Case-insensitive substring match on the title, narrowed by exact date
    /// and time when present. An empty title needle matches every task.
    pub fn matches(&self, task: &Task) -> bool {
        let needle = self.title.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            && self.date.as_ref().is_none_or(|d| *d == task.date)
            && self.time.as_ref().is_none_or(|t| *t == task.time)
    }
}

/// A structured instruction decoded from a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create(Task),
    Delete(DeleteFilter),
}

impl Action {
    /// Rewrites keyword dates such as "mañana" into concrete `YYYY-MM-DD`
    /// dates relative to `today`.
    pub fn resolve_relative_dates(&mut self, today: NaiveDate) {
        let date = match self {
            Action::Create(task) => Some(&mut task.date),
            Action::Delete(filter) => filter.date.as_mut(),
        };
        if let Some(date) = date {
            if let Some(resolved) = resolve_relative_date(date, today) {
                *date = resolved.format("%Y-%m-%d").to_string();
            }
        }
    }
}
