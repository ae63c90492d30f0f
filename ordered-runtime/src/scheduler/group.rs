use std::collections::{HashMap, HashSet};

use super::{Activation, InstanceId};
use crate::action::CompiledAction;

struct GroupEntry {
    instance: InstanceId,
    activation: Activation,
    priority: i32,
    action: CompiledAction,
}

/// Per-group sequences of enabled actions, ascending by priority.
///
/// Equal priorities keep the order they were added in.
#[derive(Default)]
pub(crate) struct GroupScheduler {
    groups: HashMap<String, Vec<GroupEntry>>,
}

impl GroupScheduler {
    /// Append one entry per group assignment of every action, then re-sort the touched groups.
    pub(crate) fn insert(
        &mut self,
        instance: InstanceId,
        activation: Activation,
        actions: &[CompiledAction],
    ) -> usize {
        let mut touched = HashSet::new();
        let mut added = 0;

        for action in actions {
            for assignment in action.groups() {
                self.groups
                    .entry(assignment.group.clone())
                    .or_default()
                    .push(GroupEntry {
                        instance,
                        activation,
                        priority: assignment.priority,
                        action: action.clone(),
                    });
                touched.insert(assignment.group.as_str());
                added += 1;
            }
        }

        for group in touched {
            if let Some(entries) = self.groups.get_mut(group) {
                entries.sort_by_key(|entry| entry.priority);
            }
        }
        added
    }

    /// Remove every entry of `instance`; the rest keep their relative order.
    pub(crate) fn remove_instance(&mut self, instance: InstanceId) -> usize {
        let mut removed = 0;
        for entries in self.groups.values_mut() {
            let before = entries.len();
            entries.retain(|entry| entry.instance != instance);
            removed += before - entries.len();
        }
        self.groups.retain(|_, entries| !entries.is_empty());
        removed
    }

    /// Entries of `group` in execution order, detached from the store.
    pub(crate) fn snapshot(&self, group: &str) -> Vec<(InstanceId, Activation, CompiledAction)> {
        self.groups
            .get(group)
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| (entry.instance, entry.activation, entry.action.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn len(&self, group: &str) -> usize {
        self.groups.get(group).map_or(0, Vec::len)
    }
}
