//! Hand-registered behavior types shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::behavior::{BehaviorRegistration, GroupSpec, MethodSpec, OrderedBehavior, TimerSpec};
use crate::catalog::Catalog;

pub(crate) type CallLog = Rc<RefCell<Vec<String>>>;

pub(crate) fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) fn entries(log: &CallLog) -> Vec<String> {
    log.borrow().clone()
}

macro_rules! probe {
    ($($name:ident),* $(,)?) => {$(
        pub(crate) struct $name {
            label: &'static str,
            log: CallLog,
        }

        impl $name {
            pub(crate) fn new(label: &'static str, log: &CallLog) -> Rc<Self> {
                Rc::new(Self { label, log: log.clone() })
            }

            pub(crate) fn run(&self) {
                self.log.borrow_mut().push(self.label.to_string());
            }
        }

        impl OrderedBehavior for $name {}
    )*};
}

probe!(Early, Late, Ticker, Sweeper, Pacer, Multi, Plain);

pub(crate) static EARLY_METHODS: [MethodSpec<Early>; 1] = [MethodSpec {
    name: "run",
    invoke: Early::run,
    groups: &[GroupSpec::new("G", 0)],
    timers: &[],
}];

pub(crate) static LATE_METHODS: [MethodSpec<Late>; 1] = [MethodSpec {
    name: "run",
    invoke: Late::run,
    groups: &[GroupSpec::new("G", 1)],
    timers: &[],
}];

pub(crate) static TICKER_METHODS: [MethodSpec<Ticker>; 1] = [MethodSpec {
    name: "run",
    invoke: Ticker::run,
    groups: &[],
    timers: &[TimerSpec::new("2.0", "1.0")],
}];

pub(crate) static SWEEPER_METHODS: [MethodSpec<Sweeper>; 1] = [MethodSpec {
    name: "run",
    invoke: Sweeper::run,
    groups: &[],
    timers: &[TimerSpec::new("1", "0"), TimerSpec::new("3", "0")],
}];

/// Two timers told apart by their start delays.
pub(crate) static PACER_METHODS: [MethodSpec<Pacer>; 1] = [MethodSpec {
    name: "run",
    invoke: Pacer::run,
    groups: &[],
    timers: &[TimerSpec::new("2", "1"), TimerSpec::new("5", "0")],
}];

pub(crate) static MULTI_METHODS: [MethodSpec<Multi>; 1] = [MethodSpec {
    name: "run",
    invoke: Multi::run,
    groups: &[GroupSpec::new("G", 5), GroupSpec::new("H", -1)],
    timers: &[
        TimerSpec::new("1", "0"),
        TimerSpec::new("500", "0").with_time_unit("milliseconds"),
    ],
}];

pub(crate) fn early_registration() -> BehaviorRegistration {
    BehaviorRegistration::of::<Early>("game::early", &EARLY_METHODS)
}

pub(crate) fn late_registration() -> BehaviorRegistration {
    BehaviorRegistration::of::<Late>("game::late", &LATE_METHODS)
}

pub(crate) fn ticker_registration() -> BehaviorRegistration {
    BehaviorRegistration::of::<Ticker>("game::ticker", &TICKER_METHODS)
}

pub(crate) fn sweeper_registration() -> BehaviorRegistration {
    BehaviorRegistration::of::<Sweeper>("game::sweeper", &SWEEPER_METHODS)
}

pub(crate) fn pacer_registration() -> BehaviorRegistration {
    BehaviorRegistration::of::<Pacer>("game::pacer", &PACER_METHODS)
}

pub(crate) fn multi_registration() -> BehaviorRegistration {
    BehaviorRegistration::of::<Multi>("game::multi", &MULTI_METHODS)
}

/// Catalog holding every fixture type except `Pacer` and `Plain`.
pub(crate) fn probe_catalog() -> Arc<Catalog> {
    Arc::new(
        Catalog::builder()
            .register(early_registration())
            .register(late_registration())
            .register(ticker_registration())
            .register(sweeper_registration())
            .register(multi_registration())
            .build(),
    )
}
