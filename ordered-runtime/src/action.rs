use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::behavior::BehaviorRef;
use crate::catalog::{Catalog, GroupAssignment, MethodDescriptor, TimerAssignment};

pub(crate) type Callback = Rc<dyn Fn()>;

/// A catalog method bound to one live instance, ready to call.
#[derive(Clone)]
pub struct CompiledAction {
    owner_name: &'static str,
    method_name: &'static str,
    callback: Callback,
    groups: Arc<[GroupAssignment]>,
    timers: Arc<[TimerAssignment]>,
}

impl CompiledAction {
    /// `Type::method`
    pub fn name(&self) -> String {
        format!("{}::{}", self.owner_name, self.method_name)
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

    /// Call the bound method once.
    pub fn invoke(&self) {
        (self.callback)();
    }

    pub(crate) fn callback(&self) -> Callback {
        self.callback.clone()
    }
}

impl fmt::Debug for CompiledAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledAction")
            .field("name", &self.name())
            .field("groups", &self.groups)
            .field("timers", &self.timers)
            .finish()
    }
}

/// Bind every catalog method of the instance's concrete type to the instance.
///
/// Empty when the type declares nothing. Touches no scheduler state.
pub fn compile(instance: &BehaviorRef, catalog: &Catalog) -> Vec<CompiledAction> {
    catalog
        .descriptors_for(instance.type_id())
        .iter()
        .map(|descriptor| bind(descriptor, instance))
        .collect()
}

fn bind(descriptor: &MethodDescriptor, instance: &BehaviorRef) -> CompiledAction {
    let target = instance.target().clone();
    let invoke = descriptor.invoke.clone();

    CompiledAction {
        owner_name: descriptor.owner_name(),
        method_name: descriptor.method_name(),
        callback: Rc::new(move || invoke(&*target)),
        groups: descriptor.shared_groups(),
        timers: descriptor.shared_timers(),
    }
}
