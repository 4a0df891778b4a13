//! Arbor Runtime
//!
//! Demo binary: loads settings, builds a small scene and runs it on the
//! loop thread.
//!
//! Usage: `arbor [settings.json]`

use anyhow::{Context, Result};
use arbor_core::time::FrameTime;
use arbor_core::{construct_default, Component, Construct, Constructor, Handle, Scene, Tick};
use arbor_runtime::Engine;
use arbor_services::RuntimeSettings;

/// Tick limit used when the settings leave `max_ticks` unset.
const DEMO_TICKS: u64 = 300;

#[derive(Clone, Default)]
struct Nozzle {
    heat: f32,
}

impl Component for Nozzle {
    fn begin(&mut self) {
        self.heat = 20.0;
        tracing::debug!("nozzle primed");
    }

    fn end(&mut self) {
        tracing::debug!(heat = self.heat, "nozzle vented");
    }
}

#[derive(Clone)]
struct Thruster {
    nozzle: Handle<Nozzle>,
    fuel: f32,
    burn_rate: f32,
}

impl Tick for Thruster {
    fn tick(&mut self, time: &FrameTime) {
        self.fuel = (self.fuel - self.burn_rate * time.delta_seconds()).max(0.0);
    }
}

impl Component for Thruster {
    const TICKS: bool = true;

    fn end(&mut self) {
        tracing::info!(fuel = self.fuel, "thruster shut down");
    }

    fn as_tick(&mut self) -> Option<&mut dyn Tick> {
        Some(self)
    }
}

impl Construct for Thruster {
    fn construct(ctx: &mut Constructor<'_>) -> Self {
        Self {
            nozzle: ctx.component::<Nozzle>(),
            fuel: 100.0,
            burn_rate: 4.0,
        }
    }
}

#[derive(Clone, Default)]
struct Hull {
    integrity: f32,
}

impl Component for Hull {
    fn begin(&mut self) {
        self.integrity = 1.0;
    }
}

construct_default!(Nozzle, Hull);

#[derive(Clone)]
struct Ship {
    thruster: Handle<Thruster>,
    hull: Handle<Hull>,
    distance: f32,
}

impl Tick for Ship {
    fn tick(&mut self, time: &FrameTime) {
        self.distance += 12.0 * time.delta_seconds();
    }
}

impl Component for Ship {
    const TICKS: bool = true;

    fn begin(&mut self) {
        tracing::info!("ship launched");
    }

    fn end(&mut self) {
        tracing::info!(distance = self.distance, "ship docked");
    }

    fn as_tick(&mut self) -> Option<&mut dyn Tick> {
        Some(self)
    }
}

impl Construct for Ship {
    fn construct(ctx: &mut Constructor<'_>) -> Self {
        Self {
            thruster: ctx.component::<Thruster>(),
            hull: ctx.component::<Hull>(),
            distance: 0.0,
        }
    }
}

/// Scene manager: reports progress once per simulated second.
#[derive(Clone, Default)]
struct Flight {
    seconds: u64,
}

impl Tick for Flight {
    fn tick(&mut self, time: &FrameTime) {
        let seconds = time.elapsed().as_secs();
        if seconds > self.seconds {
            self.seconds = seconds;
            tracing::info!(tick = time.tick(), seconds, "flight clock");
        }
    }
}

impl Component for Flight {
    const TICKS: bool = true;

    fn begin(&mut self) {
        tracing::info!("flight started");
    }

    fn end(&mut self) {
        tracing::info!(seconds = self.seconds, "flight over");
    }

    fn as_tick(&mut self) -> Option<&mut dyn Tick> {
        Some(self)
    }
}

fn load_settings() -> Result<RuntimeSettings> {
    match std::env::args().nth(1) {
        Some(path) => RuntimeSettings::load(&path)
            .with_context(|| format!("loading settings from {path}")),
        None => Ok(RuntimeSettings::default()),
    }
}

fn main() -> Result<()> {
    let mut settings = load_settings()?;
    settings.max_ticks.get_or_insert(DEMO_TICKS);

    tracing_subscriber::fmt()
        .with_max_level(settings.level()?)
        .init();

    tracing::info!("Arbor Runtime v{}", arbor_core::VERSION);

    let mut scene = Scene::new();
    scene.install_manager(Flight::default());
    let ships = [
        scene.construct_entity::<Ship>()?,
        scene.construct_entity::<Ship>()?,
    ];

    for tree in scene.forest().trees() {
        tracing::debug!(
            group = %tree.group(),
            nodes = tree.len(),
            plain = tree.plain_len(),
            tickable = tree.tick_len(),
            "entity tree"
        );
        for id in tree.depth_first() {
            let (Some(node), Some(name)) = (tree.node(id), tree.type_name(id)) else {
                continue;
            };
            let indent = "  ".repeat(node.depth() as usize);
            tracing::debug!(group = %tree.group(), "{}{}", indent, name);
        }
    }

    let engine = Engine::new(settings)?;
    let (scene, summary) = engine.spawn(scene)?.join()?;

    for ship in ships {
        let Some(ship) = scene.get(ship) else { continue };
        let fuel = scene.get(ship.thruster).map(|t| t.fuel);
        let integrity = scene.get(ship.hull).map(|h| h.integrity);
        let nozzle_heat = scene
            .get(ship.thruster)
            .and_then(|t| scene.get(t.nozzle))
            .map(|n| n.heat);
        tracing::info!(?fuel, ?integrity, ?nozzle_heat, distance = ship.distance, "ship state");
    }

    tracing::info!(
        ticks = summary.ticks,
        missing_tick = summary.missing_tick,
        average_tick_ms = summary.average_tick_ms,
        "run complete"
    );

    Ok(())
}
