//! # Ordered - deterministic callback ordering and timed dispatch
//!
//! Independently written behaviors tag their methods to run either as part of a named
//! group, in a fixed cross-object order, or on a recurring interval with an optional start
//! delay. The host drives everything: it enables and disables instances, fires groups at
//! well-defined moments and ticks timers from its loop.
//!
//! ## Features
//!
//! - **Ordered groups**: ascending priority across all enabled instances, stable on ties
//! - **Timed callbacks**: interval plus start delay, restarted on every enable
//! - **Fan-out**: any number of group and timer tags per method
//! - **Config support**: timer values like `${app.heartbeat}` are read from config files
//! - **Safe against out-of-order lifecycle signals**: unknown ids are ignored
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use std::sync::Arc;
//! use ordered::{ordered, groups, Catalog, OrderedBehavior, Registry};
//!
//! struct Spawner;
//!
//! impl OrderedBehavior for Spawner {}
//!
//! #[ordered]
//! impl Spawner {
//!     #[ordered_group(groups::FIRST_START, 0)]
//!     fn initialize(&self) {
//!         println!("spawner ready");
//!     }
//!
//!     #[timed_callback(interval = "2s", start_delay = "500ms")]
//!     fn spawn_wave(&self) {
//!         println!("wave!");
//!     }
//! }
//!
//! let catalog = Catalog::init_global(Catalog::builder().discover());
//! let registry = Registry::new(catalog);
//!
//! registry.enable(Rc::new(Spawner), 1);
//! registry.fire(groups::FIRST_START);
//! registry.tick_now();
//! ```
//!
//! ## Configuration
//!
//! Create `config/application.toml`:
//!
//! ```toml
//! [app]
//! heartbeat = "5s"
//!
//! [ordered]
//! excluded_keywords = ["ordered_runtime", "vendored"]
//! tick_interval = 0.05
//! start_phases = ["first_start", "second_start", "third_start"]
//! ```
//!
//! You can also use environment variables with `APP_` prefix:
//!
//! ```bash
//! export APP_APP__HEARTBEAT=10s
//! export APP_ORDERED__TICK_INTERVAL=0.1
//! ```

// Re-export macros
pub use ordered_macro::{ordered, ordered_group, timed_callback};

// Re-export core types
pub use ordered_runtime::{
    compile, groups, load_toml_config, load_yaml_config, BehaviorHost, BehaviorRef,
    BehaviorRegistration, Catalog, CatalogBuilder, CatalogError, Clock, CompiledAction,
    Conductor, ConfigError, GroupAssignment, InstanceId, ManualClock, MethodDescriptor,
    OrderedBehavior, Registry, RegistryConfig, SystemClock, TimeUnit, TimerAssignment,
    resolve_config_value,
};

// Make ordered_runtime available for macro expansion
pub use ordered_runtime;
