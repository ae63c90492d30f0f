use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::behavior::BehaviorRef;
use crate::controller::Registry;
use crate::scheduler::InstanceId;

struct Hosted {
    behavior: BehaviorRef,
    active: bool,
}

/// Owns live behaviors, hands out their ids and drives their lifecycle through the registry.
///
/// Every transition updates the registry first and then calls the instance's hook, with no
/// internal borrow held so hooks may call back into the host.
pub struct BehaviorHost {
    registry: Rc<Registry>,
    instances: RefCell<HashMap<InstanceId, Hosted>>,
    next_id: Cell<InstanceId>,
}

impl BehaviorHost {
    pub fn new(registry: Rc<Registry>) -> Self {
        Self {
            registry,
            instances: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        }
    }

    pub fn registry(&self) -> &Rc<Registry> {
        &self.registry
    }

    /// Take ownership of `instance`, enable it and return its id.
    pub fn spawn(&self, instance: impl Into<BehaviorRef>) -> InstanceId {
        let behavior = instance.into();
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        self.instances.borrow_mut().insert(
            id,
            Hosted {
                behavior: behavior.clone(),
                active: true,
            },
        );
        self.registry.enable(behavior.clone(), id);
        behavior.behavior().on_enable();
        id
    }

    /// Enable or disable `id`. Returns false when `id` is unknown or already in that state.
    pub fn set_active(&self, id: InstanceId, active: bool) -> bool {
        let behavior = {
            let mut instances = self.instances.borrow_mut();
            let Some(hosted) = instances.get_mut(&id) else {
                return false;
            };
            if hosted.active == active {
                return false;
            }
            hosted.active = active;
            hosted.behavior.clone()
        };

        if active {
            self.registry.enable(behavior.clone(), id);
            behavior.behavior().on_enable();
        } else {
            self.registry.disable(id);
            behavior.behavior().on_disable();
        }
        true
    }

    /// Disable `id` if needed, then forget it. Returns false when `id` is unknown.
    pub fn destroy(&self, id: InstanceId) -> bool {
        let Some(hosted) = self.instances.borrow_mut().remove(&id) else {
            return false;
        };

        if hosted.active {
            self.registry.disable(id);
            hosted.behavior.behavior().on_disable();
        }
        self.registry.destroy(id);
        hosted.behavior.behavior().on_destroy();
        true
    }

    pub fn get(&self, id: InstanceId) -> Option<BehaviorRef> {
        self.instances
            .borrow()
            .get(&id)
            .map(|hosted| hosted.behavior.clone())
    }

    pub fn is_active(&self, id: InstanceId) -> Option<bool> {
        self.instances.borrow().get(&id).map(|hosted| hosted.active)
    }

    pub fn len(&self) -> usize {
        self.instances.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.borrow().is_empty()
    }
}
