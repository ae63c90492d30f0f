use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

/// Capability of a type whose methods may be tagged for group ordering or timed dispatch.
///
/// Implement this on your type and put `#[ordered]` on an inherent impl block holding the
/// tagged methods. The hooks are called by [`BehaviorHost`](crate::BehaviorHost) after the
/// registry has processed the matching lifecycle event.
///
/// # Example
///
/// ```rust
/// use ordered_runtime::OrderedBehavior;
///
/// struct Spawner;
///
/// impl OrderedBehavior for Spawner {
///     fn on_enable(&self) {
///         println!("spawner enabled");
///     }
/// }
/// ```
pub trait OrderedBehavior: Any {
    fn on_enable(&self) {}

    fn on_disable(&self) {}

    fn on_destroy(&self) {}
}

/// Type-erased, cloneable handle on a live behavior instance.
///
/// Keeps the concrete type identity that catalog lookups need alongside the shared
/// instance that compiled actions bind to.
#[derive(Clone)]
pub struct BehaviorRef {
    behavior: Rc<dyn OrderedBehavior>,
    target: Rc<dyn Any>,
    type_id: TypeId,
    type_name: &'static str,
}

impl BehaviorRef {
    pub fn new<T: OrderedBehavior>(instance: Rc<T>) -> Self {
        let behavior: Rc<dyn OrderedBehavior> = instance.clone();
        Self {
            behavior,
            target: instance,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// `TypeId` of the concrete instance type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn behavior(&self) -> &dyn OrderedBehavior {
        self.behavior.as_ref()
    }

    pub(crate) fn target(&self) -> &Rc<dyn Any> {
        &self.target
    }
}

impl<T: OrderedBehavior> From<Rc<T>> for BehaviorRef {
    fn from(instance: Rc<T>) -> Self {
        Self::new(instance)
    }
}

impl fmt::Debug for BehaviorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorRef")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
