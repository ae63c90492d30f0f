use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::controller::Registry;

/// Drives a registry from the host loop: start phases once, then throttled ticks.
pub struct Conductor {
    registry: Rc<Registry>,
    tick_interval: f64,
    start_phases: Vec<String>,
    last_tick: Option<f64>,
    started: bool,
}

impl Conductor {
    pub fn new(registry: Rc<Registry>, registry_config: &RegistryConfig) -> Self {
        Self {
            registry,
            tick_interval: registry_config.tick_interval,
            start_phases: registry_config.start_phases.clone(),
            last_tick: None,
            started: false,
        }
    }

    pub fn registry(&self) -> &Rc<Registry> {
        &self.registry
    }

    /// Fire every start phase in order. Only the first call does anything.
    pub fn start(&mut self) -> usize {
        if self.started {
            warn!("Conductor already started, start phases run once");
            return 0;
        }
        self.started = true;

        let mut invoked = 0;
        for phase in &self.start_phases {
            let fired = self.registry.fire(phase);
            debug!(phase = phase.as_str(), invoked = fired, "Fired start phase");
            invoked += fired;
        }

        info!(phases = self.start_phases.len(), invoked, "Start phases complete");
        invoked
    }

    /// Tick the registry at `now` unless the previous throttled tick is too recent.
    ///
    /// Returns whether a tick ran.
    pub fn update(&mut self, now: f64) -> bool {
        if let Some(last_tick) = self.last_tick {
            if now - last_tick < self.tick_interval {
                return false;
            }
        }
        self.last_tick = Some(now);
        self.registry.tick(now);
        true
    }

    /// Start, then update on a tokio interval until `shutdown` resolves.
    ///
    /// The registry is not `Send`: run this on a current-thread runtime or a `LocalSet`.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        self.start();

        let period = Duration::try_from_secs_f64(self.tick_interval)
            .ok()
            .filter(|period| !period.is_zero())
            .unwrap_or(Duration::from_millis(1));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => {
                    let now = self.registry.now();
                    self.update(now);
                }
            }
        }
        info!("Conductor stopped");
    }
}
