use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::action::{compile, CompiledAction};
use crate::behavior::BehaviorRef;
use crate::catalog::Catalog;
use crate::clock::{Clock, SystemClock};
use crate::scheduler::{Activation, Claim, GroupScheduler, InstanceId, TimedScheduler};

struct InstanceRegistration {
    type_name: &'static str,
    actions: Vec<CompiledAction>,
    activation: Option<Activation>,
}

#[derive(Default)]
struct State {
    registrations: HashMap<InstanceId, InstanceRegistration>,
    timed: TimedScheduler,
    groups: GroupScheduler,
    next_activation: u64,
}

impl State {
    fn is_live(&self, instance: InstanceId, activation: Activation) -> bool {
        self.registrations
            .get(&instance)
            .is_some_and(|registration| registration.activation == Some(activation))
    }

    fn unschedule(&mut self, instance: InstanceId) -> (usize, usize) {
        (
            self.timed.remove_instance(instance),
            self.groups.remove_instance(instance),
        )
    }
}

/// Registry of per-instance callbacks and the two stores that dispatch them.
///
/// # Threading
///
/// All calls must come from the one thread driving the host's lifecycle and ticks. The
/// registry is neither `Send` nor `Sync`, so this holds by construction.
///
/// # Re-entrancy
///
/// [`fire`](Self::fire) and [`tick`](Self::tick) hold no borrow while a callback runs, so a
/// callback may enable, disable, destroy or fire freely. Entries switched off by an earlier
/// callback of the same pass are skipped; entries added during a pass first run on the next
/// one.
pub struct Registry {
    catalog: Arc<Catalog>,
    clock: Rc<dyn Clock>,
    state: RefCell<State>,
}

impl Registry {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_clock(catalog, Rc::new(SystemClock::new()))
    }

    pub fn with_clock(catalog: Arc<Catalog>, clock: Rc<dyn Clock>) -> Self {
        Self {
            catalog,
            clock,
            state: RefCell::new(State::default()),
        }
    }

    /// Schedule the callbacks of `instance` under `id`.
    ///
    /// The first enable compiles the instance's actions; later ones after a disable reuse
    /// them with timer start points taken from the current time. Enabling an enabled id
    /// does nothing.
    pub fn enable(&self, instance: impl Into<BehaviorRef>, id: InstanceId) {
        let instance = instance.into();
        let now = self.clock.now();

        let mut state = self.state.borrow_mut();
        let state = &mut *state;

        let registration = match state.registrations.entry(id) {
            Entry::Occupied(occupied) => {
                if occupied.get().activation.is_some() {
                    debug!(id, type_name = occupied.get().type_name, "Instance already enabled");
                    return;
                }
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(InstanceRegistration {
                type_name: instance.type_name(),
                actions: compile(&instance, &self.catalog),
                activation: None,
            }),
        };

        let activation = Activation(state.next_activation);
        state.next_activation += 1;
        registration.activation = Some(activation);

        let timed = registration
            .actions
            .iter()
            .filter(|action| state.timed.insert(id, action, now))
            .count();
        let grouped = state.groups.insert(id, activation, &registration.actions);

        debug!(
            id,
            type_name = registration.type_name,
            actions = registration.actions.len(),
            timed,
            grouped,
            now,
            "Enabled instance callbacks"
        );
    }

    /// Take the callbacks of `id` out of both stores, keeping them for a later enable.
    pub fn disable(&self, id: InstanceId) {
        let mut state = self.state.borrow_mut();
        let Some(registration) = state.registrations.get_mut(&id) else {
            return;
        };
        if registration.activation.take().is_none() {
            return;
        }

        let (timed, grouped) = state.unschedule(id);
        debug!(id, timed, grouped, "Disabled instance callbacks");
    }

    /// Forget `id` entirely; a later enable compiles from scratch.
    pub fn destroy(&self, id: InstanceId) {
        // Dropped after the borrow ends, the instance's Drop may call back in.
        let registration = {
            let mut state = self.state.borrow_mut();
            let Some(registration) = state.registrations.remove(&id) else {
                return;
            };
            if registration.activation.is_some() {
                state.unschedule(id);
            }
            registration
        };

        debug!(id, type_name = registration.type_name, "Destroyed instance registration");
        drop(registration);
    }

    /// Run every timer whose start delay or interval has elapsed at `now`.
    ///
    /// Returns the number of invocations.
    pub fn tick(&self, now: f64) -> usize {
        let keys = self.state.borrow().timed.keys();
        let mut invoked = 0;

        for key in keys {
            for timer in 0.. {
                let claim = self.state.borrow_mut().timed.claim(key, timer, now);
                match claim {
                    Claim::Fire(action) => {
                        trace!(action = %action.name(), now, "Invoking timed callback");
                        action.invoke();
                        invoked += 1;
                    }
                    Claim::Idle => {}
                    Claim::Exhausted => break,
                }
            }
        }
        invoked
    }

    /// [`tick`](Self::tick) at the registry clock's current time.
    pub fn tick_now(&self) -> usize {
        self.tick(self.clock.now())
    }

    /// Invoke every action of `group` in ascending priority, front to back.
    ///
    /// Returns the number of invocations; an unknown group runs nothing.
    pub fn fire(&self, group: &str) -> usize {
        let snapshot = self.state.borrow().groups.snapshot(group);
        let mut invoked = 0;

        for (instance, activation, action) in snapshot {
            let live = self.state.borrow().is_live(instance, activation);
            if !live {
                continue;
            }
            trace!(group, action = %action.name(), "Invoking group callback");
            action.invoke();
            invoked += 1;
        }
        invoked
    }

    /// Fresh actions for `instance`, without registering anything.
    pub fn compiled_actions(&self, instance: &BehaviorRef) -> Vec<CompiledAction> {
        compile(instance, &self.catalog)
    }

    /// `None` for an unknown id, otherwise whether it is currently enabled.
    pub fn is_enabled(&self, id: InstanceId) -> Option<bool> {
        self.state
            .borrow()
            .registrations
            .get(&id)
            .map(|registration| registration.activation.is_some())
    }

    pub fn registration_count(&self) -> usize {
        self.state.borrow().registrations.len()
    }

    pub fn group_len(&self, group: &str) -> usize {
        self.state.borrow().groups.len(group)
    }

    pub fn timed_len(&self) -> usize {
        self.state.borrow().timed.len()
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Registry")
            .field("catalog", &self.catalog)
            .field("registrations", &state.registrations.len())
            .field("timed", &state.timed.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{BehaviorRegistration, GroupSpec, MethodSpec, OrderedBehavior, TimerSpec};
    use crate::clock::ManualClock;
    use crate::test_support::*;
    use std::rc::Weak;

    fn registry() -> (Rc<Registry>, Rc<ManualClock>) {
        registry_with(probe_catalog())
    }

    fn registry_with(catalog: Arc<Catalog>) -> (Rc<Registry>, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new(0.0));
        let registry = Rc::new(Registry::with_clock(catalog, clock.clone()));
        (registry, clock)
    }

    /// Disables `target` from inside its own callback.
    struct Saboteur {
        registry: Weak<Registry>,
        target: InstanceId,
        log: CallLog,
    }

    impl Saboteur {
        fn strike(&self) {
            self.log.borrow_mut().push("saboteur".to_string());
            if let Some(registry) = self.registry.upgrade() {
                registry.disable(self.target);
            }
        }
    }

    impl OrderedBehavior for Saboteur {}

    static SABOTEUR_METHODS: [MethodSpec<Saboteur>; 1] = [MethodSpec {
        name: "strike",
        invoke: Saboteur::strike,
        groups: &[GroupSpec::new("G", 0)],
        timers: &[TimerSpec::new("0", "0")],
    }];

    /// Enables a fresh `Early` from inside a group callback.
    struct Recruiter {
        registry: Weak<Registry>,
        recruit: Rc<Early>,
    }

    impl Recruiter {
        fn recruit(&self) {
            if let Some(registry) = self.registry.upgrade() {
                registry.enable(self.recruit.clone(), 99);
            }
        }
    }

    impl OrderedBehavior for Recruiter {}

    static RECRUITER_METHODS: [MethodSpec<Recruiter>; 1] = [MethodSpec {
        name: "recruit",
        invoke: Recruiter::recruit,
        groups: &[GroupSpec::new("G", -5)],
        timers: &[],
    }];

    /// Calls back into the registry once its last handle is dropped.
    struct Reaper {
        registry: Weak<Registry>,
        log: CallLog,
    }

    impl Reaper {
        fn reap(&self) {
            self.log.borrow_mut().push("reaper".to_string());
        }
    }

    impl Drop for Reaper {
        fn drop(&mut self) {
            if let Some(registry) = self.registry.upgrade() {
                registry.disable(77);
                let remaining = registry.registration_count();
                self.log.borrow_mut().push(format!("dropped, {} left", remaining));
            }
        }
    }

    impl OrderedBehavior for Reaper {}

    static REAPER_METHODS: [MethodSpec<Reaper>; 1] = [MethodSpec {
        name: "reap",
        invoke: Reaper::reap,
        groups: &[GroupSpec::new("G", 0)],
        timers: &[TimerSpec::new("1", "0")],
    }];

    fn reentrant_catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::builder()
                .register(early_registration())
                .register(late_registration())
                .register(sweeper_registration())
                .register(BehaviorRegistration::of::<Saboteur>("game::saboteur", &SABOTEUR_METHODS))
                .register(BehaviorRegistration::of::<Recruiter>("game::recruiter", &RECRUITER_METHODS))
                .register(BehaviorRegistration::of::<Reaper>("game::reaper", &REAPER_METHODS))
                .build(),
        )
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let (registry, _) = registry();
        registry.disable(42);
        registry.destroy(42);
        registry.disable(42);

        assert_eq!(registry.registration_count(), 0);
        assert_eq!(registry.is_enabled(42), None);
        assert_eq!(registry.fire("G"), 0);
        assert_eq!(registry.tick(10.0), 0);
    }

    #[test]
    fn fire_follows_priority_then_disable_removes_only_that_instance() {
        let (registry, _) = registry();
        let log = call_log();
        registry.enable(Late::new("B", &log), 2);
        registry.enable(Early::new("A", &log), 1);

        assert_eq!(registry.fire("G"), 2);
        assert_eq!(entries(&log), vec!["A", "B"]);

        registry.disable(1);
        log.borrow_mut().clear();
        assert_eq!(registry.fire("G"), 1);
        assert_eq!(entries(&log), vec!["B"]);
        assert_eq!(registry.is_enabled(1), Some(false));
    }

    #[test]
    fn equal_priorities_run_in_enable_order() {
        let (registry, _) = registry();
        let log = call_log();
        for (id, label) in [(1, "first"), (2, "second"), (3, "third")] {
            registry.enable(Early::new(label, &log), id);
        }
        registry.enable(Late::new("late", &log), 4);

        registry.fire("G");
        assert_eq!(entries(&log), vec!["first", "second", "third", "late"]);
    }

    #[test]
    fn unknown_group_fires_nothing() {
        let (registry, _) = registry();
        registry.enable(Early::new("A", &call_log()), 1);
        assert_eq!(registry.fire("nope"), 0);
    }

    #[test]
    fn repeated_enable_does_not_double_register() {
        let (registry, _) = registry();
        let log = call_log();
        let early = Early::new("A", &log);
        registry.enable(early.clone(), 1);
        registry.enable(early, 1);

        assert_eq!(registry.group_len("G"), 1);
        registry.fire("G");
        assert_eq!(entries(&log), vec!["A"]);
    }

    #[test]
    fn timer_scenario_from_enable_at_zero() {
        let (registry, _) = registry();
        let log = call_log();
        registry.enable(Ticker::new("C", &log), 3);

        assert_eq!(registry.tick(0.5), 0);
        assert_eq!(registry.tick(1.2), 1);
        assert_eq!(registry.tick(2.9), 0);
        assert_eq!(registry.tick(3.3), 1);
    }

    #[test]
    fn re_enable_restarts_the_start_delay() {
        let (registry, clock) = registry();
        let log = call_log();
        registry.enable(Ticker::new("C", &log), 3);
        assert_eq!(registry.tick(1.0), 1);

        registry.disable(3);
        assert_eq!(registry.timed_len(), 0);
        assert_eq!(registry.tick(5.0), 0);

        clock.advance(10.0);
        registry.enable(Ticker::new("ignored", &log), 3);
        assert_eq!(registry.tick(10.5), 0);
        assert_eq!(registry.tick(11.0), 1);
        assert_eq!(entries(&log), vec!["C", "C"]);
    }

    #[test]
    fn destroy_then_enable_recompiles() {
        let (registry, _) = registry();
        let log = call_log();
        registry.enable(Early::new("old", &log), 1);
        registry.disable(1);
        registry.destroy(1);
        assert_eq!(registry.is_enabled(1), None);

        registry.enable(Early::new("new", &log), 1);
        registry.fire("G");
        assert_eq!(entries(&log), vec!["new"]);
    }

    #[test]
    fn destroying_an_enabled_instance_unschedules_it() {
        let (registry, _) = registry();
        let log = call_log();
        registry.enable(Multi::new("m", &log), 1);
        assert_eq!(registry.timed_len(), 1);

        registry.destroy(1);
        assert_eq!(registry.timed_len(), 0);
        assert_eq!(registry.group_len("G"), 0);
        assert_eq!(registry.tick(100.0), 0);
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn type_without_descriptors_still_registers() {
        let (registry, _) = registry();
        registry.enable(Plain::new("p", &call_log()), 5);
        assert_eq!(registry.is_enabled(5), Some(true));
        registry.disable(5);
        assert_eq!(registry.is_enabled(5), Some(false));
    }

    #[test]
    fn compiled_actions_does_not_register() {
        let (registry, _) = registry();
        let actions = registry.compiled_actions(&BehaviorRef::new(Multi::new("m", &call_log())));
        assert_eq!(actions.len(), 1);
        assert_eq!(registry.registration_count(), 0);
        assert_eq!(registry.catalog().method_count(), 5);
    }

    #[test]
    fn type_registered_twice_fires_once_per_pass() {
        let catalog = Catalog::builder()
            .register(early_registration())
            .register(early_registration())
            .build();
        let (registry, _) = registry_with(Arc::new(catalog));
        let log = call_log();
        registry.enable(Early::new("A", &log), 1);

        assert_eq!(registry.fire("G"), 1);
        assert_eq!(entries(&log), vec!["A"]);
    }

    #[test]
    fn destroy_releases_the_instance_outside_any_borrow() {
        let (registry, _) = registry_with(reentrant_catalog());
        let log = call_log();
        registry.enable(
            Rc::new(Reaper {
                registry: Rc::downgrade(&registry),
                log: log.clone(),
            }),
            1,
        );
        assert_eq!(registry.fire("G"), 1);

        registry.destroy(1);
        assert_eq!(entries(&log), vec!["reaper", "dropped, 0 left"]);
        assert_eq!(registry.group_len("G"), 0);
        assert_eq!(registry.timed_len(), 0);
    }

    #[test]
    fn callback_disabling_a_later_entry_skips_it() {
        let (registry, _) = registry_with(reentrant_catalog());
        let log = call_log();
        registry.enable(
            Rc::new(Saboteur {
                registry: Rc::downgrade(&registry),
                target: 2,
                log: log.clone(),
            }),
            1,
        );
        registry.enable(Late::new("late", &log), 2);

        assert_eq!(registry.fire("G"), 1);
        assert_eq!(entries(&log), vec!["saboteur"]);
        assert_eq!(registry.is_enabled(2), Some(false));
    }

    #[test]
    fn callback_disabling_during_tick_skips_remaining_timers() {
        let (registry, _) = registry_with(reentrant_catalog());
        let log = call_log();
        registry.enable(
            Rc::new(Saboteur {
                registry: Rc::downgrade(&registry),
                target: 2,
                log: log.clone(),
            }),
            1,
        );
        registry.enable(Sweeper::new("sweeper", &log), 2);

        assert_eq!(registry.tick(0.0), 1);
        assert_eq!(entries(&log), vec!["saboteur"]);
    }

    #[test]
    fn entries_enabled_mid_fire_wait_for_the_next_pass() {
        let (registry, _) = registry_with(reentrant_catalog());
        let log = call_log();
        registry.enable(
            Rc::new(Recruiter {
                registry: Rc::downgrade(&registry),
                recruit: Early::new("recruit", &log),
            }),
            1,
        );

        assert_eq!(registry.fire("G"), 1);
        assert!(entries(&log).is_empty());
        assert_eq!(registry.is_enabled(99), Some(true));

        assert_eq!(registry.fire("G"), 2);
        assert_eq!(entries(&log), vec!["recruit"]);
    }
}
