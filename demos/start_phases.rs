/// Example: start phases and ordered groups across independent behaviors
/// Three behaviors initialise in a fixed order no matter which one was spawned first,
/// then a custom "physics" group runs every frame in priority order.
use chrono::Local;
use ordered::{groups, ordered, BehaviorHost, Catalog, Conductor, OrderedBehavior, Registry, RegistryConfig};
use std::cell::Cell;
use std::rc::Rc;

fn stamp() -> String {
    Local::now().format("%H:%M:%S%.3f").to_string()
}

struct World;

impl OrderedBehavior for World {}

#[ordered]
impl World {
    #[ordered_group(groups::FIRST_START, -10)]
    fn load_map(&self) {
        println!("[{}] [World] map loaded", stamp());
    }

    #[ordered_group("physics", 0)]
    fn integrate(&self) {
        println!("[{}] [World] integrate bodies", stamp());
    }
}

struct Player {
    name: String,
    steps: Cell<u32>,
}

impl OrderedBehavior for Player {
    fn on_enable(&self) {
        println!("[{}] [{}] enabled", stamp(), self.name);
    }

    fn on_disable(&self) {
        println!("[{}] [{}] disabled after {} steps", stamp(), self.name, self.steps.get());
    }
}

#[ordered]
impl Player {
    fn new(name: &str) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            steps: Cell::new(0),
        })
    }

    /// Needs the map, so runs after World in the same phase
    #[ordered_group(groups::FIRST_START, 0)]
    fn spawn(&self) {
        println!("[{}] [{}] spawned on map", stamp(), self.name);
    }

    #[ordered_group(group = "physics", priority = 10)]
    fn step(&self) {
        self.steps.set(self.steps.get() + 1);
        println!("[{}] [{}] step #{}", stamp(), self.name, self.steps.get());
    }
}

struct Hud;

impl OrderedBehavior for Hud {}

#[ordered]
impl Hud {
    #[ordered_group(groups::THIRD_START)]
    fn show(&self) {
        println!("[{}] [Hud] everything is ready, showing HUD", stamp());
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Start Phases Example ===\n");

    let catalog = Catalog::init_global(Catalog::builder().discover());
    let registry = Rc::new(Registry::new(catalog));
    let host = BehaviorHost::new(registry.clone());
    let mut conductor = Conductor::new(registry.clone(), &RegistryConfig::default());

    // Spawn order deliberately differs from execution order
    host.spawn(Rc::new(Hud));
    let player = host.spawn(Player::new("Player-1"));
    host.spawn(Rc::new(World));

    conductor.start();

    println!();
    for frame in 1..=3 {
        println!("--- frame {} ---", frame);
        registry.fire("physics");
    }

    println!();
    host.set_active(player, false);
    println!("--- frame 4 (player disabled) ---");
    registry.fire("physics");

    host.destroy(player);
    println!("\n✅ Done, {} behaviors left in the host", host.len());
}
