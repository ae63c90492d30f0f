mod r#trait;
mod metadata;

pub use r#trait::{BehaviorRef, OrderedBehavior};
pub use metadata::{BehaviorRegistration, GroupSpec, MethodSpec, TimerSpec};
pub(crate) use metadata::{short_type_name, ErasedMethod, Invoker};
