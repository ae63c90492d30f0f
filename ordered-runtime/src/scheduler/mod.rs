mod group;
mod timed;

pub(crate) use group::GroupScheduler;
pub(crate) use timed::{Claim, TimedScheduler};

/// Caller-supplied identity of a live instance. Must be stable and unique while registered.
pub type InstanceId = i64;

/// Marks one enabled period of an instance; every enable hands out a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Activation(pub(crate) u64);
