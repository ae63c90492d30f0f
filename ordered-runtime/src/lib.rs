//! Ordered Runtime - registry and dispatch core for ordered and timed callbacks
//!
//! Types opt in by implementing [`OrderedBehavior`] and tagging methods inside an
//! `#[ordered]` impl block. The tags are collected once into a [`Catalog`]; a [`Registry`]
//! binds them to live instances as the host enables and disables them, runs group callbacks
//! in priority order on [`Registry::fire`] and timed callbacks on [`Registry::tick`].

mod action;
mod behavior;
mod catalog;
mod clock;
mod conductor;
mod config;
mod controller;
mod error;
pub mod groups;
mod host;
mod registry;
mod scheduler;
mod time_unit;

#[cfg(test)]
mod test_support;

// Re-export public API
pub use action::{compile, CompiledAction};
pub use behavior::{BehaviorRef, BehaviorRegistration, GroupSpec, MethodSpec, OrderedBehavior, TimerSpec};
pub use catalog::{Catalog, CatalogBuilder, GroupAssignment, MethodDescriptor, TimerAssignment};
pub use clock::{Clock, ManualClock, SystemClock};
pub use conductor::Conductor;
pub use self::config::{load_toml_config, load_yaml_config, resolve_config_value, RegistryConfig};
pub use controller::Registry;
pub use error::{CatalogError, ConfigError};
pub use host::BehaviorHost;
pub use linkme;
pub use registry::ORDERED_BEHAVIORS;
pub use scheduler::InstanceId;
pub use time_unit::TimeUnit;
