//! Agenda Store
//!
//! The in-memory, chronologically ordered task list. The store itself is a
//! plain owned value; callers that share it across tasks wrap it in a mutex
//! and hold the lock only around [`AgendaStore::apply`].

use std::cmp::Ordering;
use tracing::{info, warn};

use crate::task::{Action, Task};

#[derive(Debug, Default, Clone)]
pub struct AgendaStore {
    tasks: Vec<Task>,
}

impl AgendaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies at most one action and returns the resulting snapshot.
    ///
    /// Never fails. A delete with an empty title filter is rejected and
    /// leaves the agenda unchanged.
    pub fn apply(&mut self, action: Option<&Action>) -> Vec<Task> {
        match action {
            None => {}
            Some(Action::Create(task)) => {
                self.tasks.push(task.clone());
                // Stable, so equal instants keep insertion order.
                self.tasks.sort_by(chronological);
                info!(title = %task.title, date = %task.date, time = %task.time, "Task created");
            }
            Some(Action::Delete(filter)) => {
                if filter.title.trim().is_empty() {
                    warn!("Rejecting delete action with an empty title filter");
                } else {
                    let before = self.tasks.len();
                    self.tasks.retain(|task| !filter.matches(task));
                    info!(
                        filter = %filter.title,
                        removed = before - self.tasks.len(),
                        "Delete action applied"
                    );
                }
            }
        }

        debug_assert!(
            self.tasks.is_sorted_by(|a, b| chronological(a, b) != Ordering::Greater),
            "agenda left out of chronological order"
        );
        self.snapshot()
    }

    /// An owned copy of the current ordered agenda.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Orders by `(date, time)`; tasks without a valid instant go last.
fn chronological(a: &Task, b: &Task) -> Ordering {
    match (a.instant(), b.instant()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
