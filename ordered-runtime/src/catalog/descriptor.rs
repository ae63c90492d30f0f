use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use crate::behavior::Invoker;

/// Membership of a method in a named group, ordered by ascending `priority`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAssignment {
    pub group: String,
    pub priority: i32,
}

/// Periodic execution of a method, in resolved seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerAssignment {
    pub interval_secs: f64,
    pub start_delay_secs: f64,
}

/// A callback-bearing method of one owning type.
///
/// Always carries at least one group or timer assignment.
#[derive(Clone)]
pub struct MethodDescriptor {
    owner: TypeId,
    owner_name: &'static str,
    method_name: &'static str,
    pub(crate) invoke: Invoker,
    groups: Arc<[GroupAssignment]>,
    timers: Arc<[TimerAssignment]>,
}

impl MethodDescriptor {
    pub(crate) fn new(
        owner: TypeId,
        owner_name: &'static str,
        method_name: &'static str,
        invoke: Invoker,
        groups: Vec<GroupAssignment>,
        timers: Vec<TimerAssignment>,
    ) -> Option<Self> {
        if groups.is_empty() && timers.is_empty() {
            return None;
        }
        Some(Self {
            owner,
            owner_name,
            method_name,
            invoke,
            groups: groups.into(),
            timers: timers.into(),
        })
    }

    pub fn owner(&self) -> TypeId {
        self.owner
    }

    pub fn owner_name(&self) -> &'static str {
        self.owner_name
    }

    pub fn method_name(&self) -> &'static str {
        self.method_name
    }

    pub fn groups(&self) -> &[GroupAssignment] {
        &self.groups
    }

    pub fn timers(&self) -> &[TimerAssignment] {
        &self.timers
    }

    pub(crate) fn shared_groups(&self) -> Arc<[GroupAssignment]> {
        self.groups.clone()
    }

    pub(crate) fn shared_timers(&self) -> Arc<[TimerAssignment]> {
        self.timers.clone()
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("owner", &self.owner_name)
            .field("method", &self.method_name)
            .field("groups", &self.groups)
            .field("timers", &self.timers)
            .finish()
    }
}
