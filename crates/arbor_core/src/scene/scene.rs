// scene.rs - Forest plus the scene manager
//
// The manager is a single tickable outside every tree. It begins before
// all entities, and ticks and ends after them.

use crate::object::{Component, Construct, Tickable};
use crate::scene::{ConstructionError, Forest, Handle, LifecycleReport, TickReport};
use crate::time::FrameTime;
use std::any;

/// Where a scene is in its Begin → Tick* → End lifecycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ScenePhase {
    #[default]
    Idle,
    Running,
    Ended,
}

/// Everything that lives in one simulation.
#[derive(Debug, Default)]
pub struct Scene {
    forest: Forest,
    manager: Option<Tickable>,
    phase: ScenePhase,
    report: LifecycleReport,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct entity `T` into its own tree. See [`Forest::construct_entity`].
    pub fn construct_entity<T: Construct>(&mut self) -> Result<Handle<T>, ConstructionError> {
        if self.phase != ScenePhase::Idle {
            tracing::warn!(
                entity = any::type_name::<T>(),
                phase = ?self.phase,
                "entity constructed after Begin; its Begin hook will not run"
            );
        }
        self.forest.construct_entity::<T>()
    }

    /// Install the scene manager, returning the one it replaces.
    ///
    /// The manager is always stored as a tickable: a manager type without a
    /// Tick hook is reported on every tick.
    pub fn install_manager<T: Component>(&mut self, manager: T) -> Option<Tickable> {
        let previous = self.manager.replace(Tickable::new(manager));
        if let Some(previous) = &previous {
            tracing::warn!(
                previous = previous.type_name(),
                manager = any::type_name::<T>(),
                "replacing scene manager"
            );
        }
        previous
    }

    pub fn has_manager(&self) -> bool {
        self.manager.is_some()
    }

    /// Checked access to the manager as `T`.
    pub fn manager<T: Component>(&self) -> Option<&T> {
        self.manager.as_ref()?.downcast_ref()
    }

    pub fn manager_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.manager.as_mut()?.downcast_mut()
    }

    pub fn get<T: Component>(&self, handle: Handle<T>) -> Option<&T> {
        self.forest.get(handle)
    }

    pub fn get_mut<T: Component>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.forest.get_mut(handle)
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn phase(&self) -> ScenePhase {
        self.phase
    }

    pub fn report(&self) -> LifecycleReport {
        self.report
    }

    /// Run every Begin hook once: manager first, then each tree in order.
    pub fn begin(&mut self) {
        if self.phase != ScenePhase::Idle {
            tracing::warn!(phase = ?self.phase, "scene already begun; ignoring Begin");
            return;
        }

        if let Some(manager) = &mut self.manager {
            manager.begin();
        }
        self.forest.begin();
        self.phase = ScenePhase::Running;
        tracing::debug!(trees = self.forest.len(), "scene begun");
    }

    /// Tick every tree in tick-group order, then the manager.
    ///
    /// Ignored unless the scene is running.
    pub fn tick(&mut self, time: &FrameTime) -> TickReport {
        if self.phase != ScenePhase::Running {
            tracing::warn!(phase = ?self.phase, tick = time.tick(), "scene not running; ignoring Tick");
            return TickReport::default();
        }

        let mut report = self.forest.tick(time);
        if let Some(manager) = &mut self.manager {
            match manager.tick(time) {
                Ok(()) => report.ticked += 1,
                Err(_) => report.missing_tick += 1,
            }
        }
        self.report.record(report);
        report
    }

    /// Run every End hook: trees first, then the manager.
    ///
    /// End hooks run exactly once; calling this again is a no-op.
    pub fn end(&mut self) {
        if self.phase == ScenePhase::Ended {
            tracing::debug!("scene already ended");
            return;
        }

        self.forest.end();
        if let Some(manager) = &mut self.manager {
            manager.end();
        }
        self.phase = ScenePhase::Ended;
        tracing::debug!(frames = self.report.frames, "scene ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Tick;
    use crate::scene::Constructor;
    use std::cell::RefCell;

    thread_local! {
        static LOG: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
    }

    fn record(entry: &'static str) {
        LOG.with(|log| log.borrow_mut().push(entry));
    }

    fn take_log() -> Vec<&'static str> {
        LOG.with(|log| log.take())
    }

    #[derive(Clone, Default)]
    struct Sensor;

    impl Component for Sensor {
        fn begin(&mut self) {
            record("sensor-begin");
        }

        fn end(&mut self) {
            record("sensor-end");
        }
    }
    crate::construct_default!(Sensor);

    #[derive(Clone)]
    struct Drone {
        sensor: Handle<Sensor>,
        distance: u32,
    }

    impl Tick for Drone {
        fn tick(&mut self, _time: &FrameTime) {
            self.distance += 1;
            record("drone-tick");
        }
    }

    impl Component for Drone {
        const TICKS: bool = true;

        fn begin(&mut self) {
            record("drone-begin");
        }

        fn end(&mut self) {
            record("drone-end");
        }

        fn as_tick(&mut self) -> Option<&mut dyn Tick> {
            Some(self)
        }
    }

    impl Construct for Drone {
        fn construct(ctx: &mut Constructor<'_>) -> Self {
            Self {
                sensor: ctx.component(),
                distance: 0,
            }
        }
    }

    #[derive(Clone, Default)]
    struct Referee {
        frames_seen: u32,
    }

    impl Tick for Referee {
        fn tick(&mut self, _time: &FrameTime) {
            self.frames_seen += 1;
            record("referee-tick");
        }
    }

    impl Component for Referee {
        const TICKS: bool = true;

        fn begin(&mut self) {
            record("referee-begin");
        }

        fn end(&mut self) {
            record("referee-end");
        }

        fn as_tick(&mut self) -> Option<&mut dyn Tick> {
            Some(self)
        }
    }

    #[derive(Clone, Default)]
    struct Scoreboard;
    crate::define_component!(Scoreboard);

    #[test]
    fn manager_brackets_entities() {
        let mut scene = Scene::new();
        scene.construct_entity::<Drone>().unwrap();
        scene.install_manager(Referee::default());

        take_log();
        scene.begin();
        scene.tick(&FrameTime::default());
        scene.end();

        assert_eq!(
            take_log(),
            [
                "referee-begin",
                "sensor-begin",
                "drone-begin",
                "drone-tick",
                "referee-tick",
                "sensor-end",
                "drone-end",
                "referee-end",
            ]
        );
    }

    #[test]
    fn end_is_idempotent() {
        let mut scene = Scene::new();
        scene.construct_entity::<Drone>().unwrap();
        scene.install_manager(Referee::default());
        scene.begin();

        take_log();
        scene.end();
        scene.end();
        scene.end();

        assert_eq!(take_log(), ["sensor-end", "drone-end", "referee-end"]);
        assert_eq!(scene.phase(), ScenePhase::Ended);
    }

    #[test]
    fn tick_requires_running_scene() {
        let mut scene = Scene::new();
        let drone = scene.construct_entity::<Drone>().unwrap();

        assert_eq!(scene.tick(&FrameTime::default()), TickReport::default());
        scene.begin();
        scene.begin();
        scene.tick(&FrameTime::default());
        scene.end();
        assert_eq!(scene.tick(&FrameTime::default()), TickReport::default());

        assert_eq!(scene.get(drone).unwrap().distance, 1);
        assert_eq!(scene.report().frames, 1);
    }

    #[test]
    fn manager_without_tick_is_reported_each_frame() {
        let mut scene = Scene::new();
        scene.construct_entity::<Drone>().unwrap();
        scene.install_manager(Scoreboard);
        scene.begin();

        for _ in 0..3 {
            let report = scene.tick(&FrameTime::default());
            assert_eq!(report, TickReport { ticked: 1, missing_tick: 1 });
        }
        scene.end();

        assert_eq!(scene.report().missing_tick, 3);
        assert_eq!(scene.report().frames, 3);
    }

    #[test]
    fn manager_is_reacquired_by_type() {
        let mut scene = Scene::new();
        assert!(!scene.has_manager());
        assert!(scene.install_manager(Referee::default()).is_none());

        scene.begin();
        scene.tick(&FrameTime::default());

        assert_eq!(scene.manager::<Referee>().unwrap().frames_seen, 1);
        assert!(scene.manager::<Scoreboard>().is_none());

        scene.manager_mut::<Referee>().unwrap().frames_seen = 10;
        let previous = scene.install_manager(Scoreboard).unwrap();
        assert_eq!(previous.downcast_ref::<Referee>().unwrap().frames_seen, 10);
    }

    #[test]
    fn component_handles_stay_valid() {
        let mut scene = Scene::new();
        let drone = scene.construct_entity::<Drone>().unwrap();
        let sensor = scene.get(drone).unwrap().sensor;

        for _ in 0..64 {
            scene.construct_entity::<Drone>().unwrap();
        }

        assert!(scene.get(sensor).is_some());
        scene.get_mut(drone).unwrap().distance = 7;
        assert_eq!(scene.get(drone).unwrap().distance, 7);
        assert_eq!(scene.forest().len(), 65);
    }

    #[test]
    fn missing_tick_is_logged_once_per_tick() {
        use std::io;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Capture {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut scene = Scene::new();
            scene.construct_entity::<Drone>().unwrap();
            scene.install_manager(Scoreboard);
            scene.begin();
            for _ in 0..3 {
                scene.tick(&FrameTime::default());
            }
            scene.end();
        });

        let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        let diagnostics: Vec<_> = output
            .lines()
            .filter(|line| line.contains("does not implement `Tick`"))
            .collect();

        assert_eq!(diagnostics.len(), 3);
        for line in diagnostics {
            assert!(line.contains("ERROR"));
            assert!(line.contains("Scoreboard"));
            assert!(line.contains("required: `fn tick(&mut self, time: &FrameTime)`"));
        }
    }
}
