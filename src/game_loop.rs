//! Frame-driven game loop
//!
//! One simulation tick and one render pass per animation frame. The displayed
//! balance runs on its own interval timer, armed only while it is animating.
//! Both are scheduler tasks so teardown can cancel them.

use crate::renderer::{Canvas, render};
use crate::settings::Settings;
use crate::sim::{GameState, Settlement, tick};
use crate::wager::{DropSize, WagerError};

/// Handle to a scheduled frame or interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u32);

/// Host timing services
pub trait Scheduler {
    /// Ask for one animation frame callback
    fn request_frame(&mut self) -> TaskId;
    /// Start a repeating timer
    fn set_interval(&mut self, period_ms: f64) -> TaskId;
    /// Cancel a pending frame or a running interval
    fn cancel(&mut self, task: TaskId);
}

/// Whole-millisecond timer period, never longer than `period_ms`
///
/// Browser timers take integer delays; rounding up would stretch a fixed
/// number of steps past their total duration.
pub fn whole_ms(period_ms: f64) -> i32 {
    period_ms.floor().max(1.0) as i32
}

/// Scheduler that only records requests; the caller decides when they fire
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u32,
    frames: Vec<TaskId>,
    intervals: Vec<(TaskId, f64)>,
    cancelled: Vec<TaskId>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> TaskId {
        self.next_id += 1;
        TaskId(self.next_id)
    }

    /// Frame requests not yet fired or cancelled
    pub fn pending_frames(&self) -> &[TaskId] {
        &self.frames
    }

    /// Running intervals and their periods
    pub fn intervals(&self) -> &[(TaskId, f64)] {
        &self.intervals
    }

    pub fn cancelled(&self) -> &[TaskId] {
        &self.cancelled
    }

    /// Fire the oldest pending frame, if any
    pub fn take_frame(&mut self) -> Option<TaskId> {
        if self.frames.is_empty() {
            None
        } else {
            Some(self.frames.remove(0))
        }
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> TaskId {
        let id = self.allocate();
        self.frames.push(id);
        id
    }

    fn set_interval(&mut self, period_ms: f64) -> TaskId {
        let id = self.allocate();
        self.intervals.push((id, period_ms));
        id
    }

    fn cancel(&mut self, task: TaskId) {
        self.frames.retain(|&id| id != task);
        self.intervals.retain(|&(id, _)| id != task);
        self.cancelled.push(task);
    }
}

/// The game plus its frame chain and balance timer
pub struct GameLoop<S: Scheduler> {
    pub state: GameState,
    pub settings: Settings,
    scheduler: S,
    frame: Option<TaskId>,
    balance_timer: Option<TaskId>,
    running: bool,
}

impl<S: Scheduler> GameLoop<S> {
    pub fn new(state: GameState, settings: Settings, scheduler: S) -> Self {
        Self {
            state,
            settings,
            scheduler,
            frame: None,
            balance_timer: None,
            running: false,
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the balance interval is armed
    pub fn balance_timer_armed(&self) -> bool {
        self.balance_timer.is_some()
    }

    /// Request the first frame
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.frame = Some(self.scheduler.request_frame());
        log::info!("Game loop started");
    }

    /// Frame callback: tick, render, then ask for the next frame
    pub fn on_frame(&mut self, now_ms: f64, canvas: &mut dyn Canvas) -> Vec<Settlement> {
        self.frame = None;
        if !self.running {
            return Vec::new();
        }

        let settled = tick(&mut self.state, now_ms);
        render(&self.state, &self.settings, canvas);
        self.sync_balance_timer();

        self.frame = Some(self.scheduler.request_frame());
        settled
    }

    /// Interval callback: move the displayed balance one step
    pub fn on_balance_timer(&mut self) {
        if !self.state.bank.step_display() {
            self.cancel_balance_timer();
        }
    }

    /// Tear down: cancel the pending frame and the balance timer
    pub fn stop(&mut self) {
        if let Some(frame) = self.frame.take() {
            self.scheduler.cancel(frame);
        }
        self.cancel_balance_timer();
        if self.running {
            log::info!("Game loop stopped");
        }
        self.running = false;
    }

    pub fn drop_balls(&mut self, size: DropSize) -> Result<Vec<u32>, WagerError> {
        let dropped = self.state.drop_balls(size);
        self.sync_balance_timer();
        dropped
    }

    pub fn place_bet(&mut self, amount: f64, count: usize) -> Result<Vec<u32>, WagerError> {
        let dropped = self.state.place_bet(amount, count);
        self.sync_balance_timer();
        dropped
    }

    pub fn set_bet(&mut self, amount: f64) {
        self.state.set_bet(amount);
    }

    pub fn set_all_in(&mut self) {
        self.state.set_all_in();
    }

    /// Clear the board, restore the stake and drop any running balance timer
    pub fn reset(&mut self) {
        self.state.reset();
        self.cancel_balance_timer();
    }

    /// Arm the balance timer while the readout is animating, clear it after
    fn sync_balance_timer(&mut self) {
        let animating = self.state.bank.is_animating();
        if animating && self.running && self.balance_timer.is_none() {
            let period = self.state.tuning.balance_step_ms();
            self.balance_timer = Some(self.scheduler.set_interval(period));
        } else if !animating {
            self.cancel_balance_timer();
        }
    }

    fn cancel_balance_timer(&mut self) {
        if let Some(timer) = self.balance_timer.take() {
            self.scheduler.cancel(timer);
        }
    }
}
