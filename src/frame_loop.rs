//! Frame scheduler
//!
//! One frame = read clock, tick, build the scene, present, then decide whether
//! another frame should be scheduled. The clock and the presentation surface
//! are injected so tests can drive fixed timestamps headlessly.

use std::cell::Cell;

use crate::render::Scene;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Source of monotonic frame timestamps (milliseconds)
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Clock that only moves when told to.
///
/// Used by tests and the headless runner, and fed the `requestAnimationFrame`
/// timestamp in the browser.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, dt_ms: f64) {
        self.now.set(self.now.get() + dt_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Where finished scenes go
pub trait Surface {
    fn present(&mut self, scene: &Scene);
}

/// Discards every frame
#[derive(Debug, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn present(&mut self, _scene: &Scene) {}
}

/// Whether the host should request another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Stopped,
}

/// Outcome of one frame
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub status: FrameStatus,
    /// Events raised during the tick (score readout updates, game over)
    pub events: Vec<GameEvent>,
}

impl FrameReport {
    fn stopped() -> Self {
        Self {
            status: FrameStatus::Stopped,
            events: Vec::new(),
        }
    }
}

/// Drives ticks and rendering for one playing view
pub struct FrameLoop<C: Clock> {
    clock: C,
    scene: Scene,
    active: bool,
    frames: u64,
}

impl<C: Clock> FrameLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            scene: Scene::new(),
            active: false,
            frames: 0,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Frames run since the last `start`
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Arm the loop for a new playing view
    pub fn start(&mut self) {
        self.active = true;
        self.frames = 0;
    }

    /// Tear down the playing view; no further frames run until `start`
    pub fn cancel(&mut self) {
        if self.active {
            log::debug!("Frame loop cancelled after {} frames", self.frames);
        }
        self.active = false;
    }

    /// Run one frame
    pub fn frame<S: Surface + ?Sized>(
        &mut self,
        state: &mut GameState,
        input: &TickInput,
        surface: &mut S,
    ) -> FrameReport {
        if !self.active || state.phase != GamePhase::Playing {
            self.active = false;
            return FrameReport::stopped();
        }

        let now = self.clock.now_ms();
        tick(state, input, now);
        self.scene.build(state);
        surface.present(&self.scene);
        self.frames += 1;

        let events = state.drain_events();
        let status = if state.phase == GamePhase::Playing {
            FrameStatus::Continue
        } else {
            self.active = false;
            FrameStatus::Stopped
        };

        FrameReport { status, events }
    }
}

impl FrameLoop<ManualClock> {
    /// Run fixed-step frames until the session stops or `max_frames` is hit.
    /// `input` is asked for the tick input before every frame.
    pub fn run_fixed<S: Surface + ?Sized>(
        &mut self,
        state: &mut GameState,
        step_ms: f64,
        max_frames: u64,
        surface: &mut S,
        mut input: impl FnMut(&GameState) -> TickInput,
        mut on_events: impl FnMut(&[GameEvent]),
    ) -> u64 {
        let before = self.frames;
        while self.frames - before < max_frames {
            let tick_input = input(state);
            let report = self.frame(state, &tick_input, surface);
            if !report.events.is_empty() {
                on_events(&report.events);
            }
            if report.status == FrameStatus::Stopped {
                break;
            }
            self.clock.advance(step_ms);
        }
        self.frames - before
    }
}
