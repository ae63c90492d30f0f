use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use super::OrderedBehavior;

/// Group tag on a method: run as part of `group`, ascending by `priority`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpec {
    pub group: &'static str,
    pub priority: i32,
}

impl GroupSpec {
    pub const fn new(group: &'static str, priority: i32) -> Self {
        Self { group, priority }
    }
}

/// Timer tag on a method, as declared.
///
/// Values are kept as written (`"2.5"`, `"500ms"`, `"${app.heartbeat}"`) and resolved
/// when the catalog is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSpec {
    pub interval: &'static str,
    pub start_delay: &'static str,
    pub time_unit: &'static str,
}

impl TimerSpec {
    pub const fn new(interval: &'static str, start_delay: &'static str) -> Self {
        Self {
            interval,
            start_delay,
            time_unit: "seconds",
        }
    }

    pub const fn with_time_unit(mut self, time_unit: &'static str) -> Self {
        self.time_unit = time_unit;
        self
    }
}

/// One tagged method of `T`, as emitted by `#[ordered]`.
pub struct MethodSpec<T: 'static> {
    pub name: &'static str,
    pub invoke: fn(&T),
    pub groups: &'static [GroupSpec],
    pub timers: &'static [TimerSpec],
}

pub(crate) type Invoker = Arc<dyn Fn(&dyn Any) + Send + Sync>;

pub(crate) struct ErasedMethod {
    pub(crate) name: &'static str,
    pub(crate) invoke: Invoker,
    pub(crate) groups: &'static [GroupSpec],
    pub(crate) timers: &'static [TimerSpec],
}

/// Everything one `#[ordered]` impl block declares about its type.
///
/// Collected through [`ORDERED_BEHAVIORS`](crate::ORDERED_BEHAVIORS) or handed to
/// [`CatalogBuilder::register`](crate::CatalogBuilder::register) directly.
pub struct BehaviorRegistration {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) module_path: &'static str,
    pub(crate) methods: Vec<ErasedMethod>,
}

impl BehaviorRegistration {
    pub fn of<T: OrderedBehavior>(
        module_path: &'static str,
        methods: &'static [MethodSpec<T>],
    ) -> Self {
        let methods = methods
            .iter()
            .map(|spec| {
                let call = spec.invoke;
                let invoke: Invoker = Arc::new(move |target: &dyn Any| {
                    if let Some(instance) = target.downcast_ref::<T>() {
                        call(instance);
                    }
                });
                ErasedMethod {
                    name: spec.name,
                    invoke,
                    groups: spec.groups,
                    timers: spec.timers,
                }
            })
            .collect();

        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            module_path,
            methods,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn module_path(&self) -> &'static str {
        self.module_path
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}

impl fmt::Debug for BehaviorRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorRegistration")
            .field("type_name", &self.type_name)
            .field("module_path", &self.module_path)
            .field("methods", &self.methods.iter().map(|m| m.name).collect::<Vec<_>>())
            .finish()
    }
}

/// `game::enemy::Spawner` -> `Spawner`
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
