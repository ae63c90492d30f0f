/// Example: timed callbacks driven by the conductor loop
/// A heartbeat every 500ms, a status report every 2s after a 1s warm-up,
/// and a monitor that is switched off half way through.
use chrono::Local;
use ordered::{ordered, BehaviorHost, Catalog, Conductor, OrderedBehavior, Registry, RegistryConfig};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

struct Heartbeat {
    beats: Cell<u32>,
}

impl OrderedBehavior for Heartbeat {}

#[ordered]
impl Heartbeat {
    #[timed_callback(interval = 500, time_unit = TimeUnit::Milliseconds)]
    fn beat(&self) {
        self.beats.set(self.beats.get() + 1);
        let now = Local::now().format("%H:%M:%S%.3f");
        println!("[{}] [Heartbeat] beat #{}", now, self.beats.get());
    }

    #[timed_callback("2s", "1s")]
    fn report(&self) {
        let now = Local::now().format("%H:%M:%S%.3f");
        println!("[{}] [Heartbeat] status: {} beats so far", now, self.beats.get());
    }
}

struct Monitor;

impl OrderedBehavior for Monitor {
    fn on_disable(&self) {
        println!("[{}] [Monitor] switched off", Local::now().format("%H:%M:%S%.3f"));
    }
}

#[ordered]
impl Monitor {
    #[timed_callback(1.0)]
    fn sample(&self) {
        println!("[{}] [Monitor] sampling", Local::now().format("%H:%M:%S%.3f"));
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Timed Heartbeat Example ===\n");

    let registry_config = RegistryConfig::default();
    let catalog = Catalog::init_global(Catalog::builder().config(&registry_config).discover());
    let registry = Rc::new(Registry::new(catalog));
    let host = Rc::new(BehaviorHost::new(registry.clone()));
    let mut conductor = Conductor::new(registry, &registry_config);

    host.spawn(Rc::new(Heartbeat { beats: Cell::new(0) }));
    let monitor = host.spawn(Rc::new(Monitor));

    // Switch the monitor off after 3 seconds, stop everything after 6
    let switch = {
        let host = host.clone();
        async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            host.set_active(monitor, false);
            tokio::time::sleep(Duration::from_secs(3)).await;
        }
    };

    conductor.run(switch).await;

    println!("\n✅ Stopped after 6 seconds");
    Ok(())
}
