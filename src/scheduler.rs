// Frame scheduler state machine. The browser loop asks it to run every
// animation frame; once cancelled it refuses all further work, including a
// frame the browser had already been asked for.

use crate::error::EngineError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Cancelled,
}

impl SchedulerState {
    pub fn name(self) -> &'static str {
        match self {
            SchedulerState::Idle => "idle",
            SchedulerState::Running => "running",
            SchedulerState::Cancelled => "cancelled",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    // Step and render ran; the loop should ask for another frame
    Rendered,
    // Scheduler was not running; nothing happened
    Skipped,
}

#[derive(Debug)]
pub struct FrameScheduler {
    state: SchedulerState,
    frames: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        FrameScheduler {
            state: SchedulerState::Idle,
            frames: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    // Idle -> Running. Returns whether the transition happened.
    pub fn start(&mut self) -> bool {
        if self.state == SchedulerState::Idle {
            self.state = SchedulerState::Running;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.state = SchedulerState::Cancelled;
    }

    pub fn run_frame<F>(&mut self, frame: F) -> Result<FrameOutcome, EngineError>
    where
        F: FnOnce() -> Result<(), EngineError>,
    {
        if !self.is_running() {
            return Ok(FrameOutcome::Skipped);
        }
        frame()?;
        self.frames += 1;
        Ok(FrameOutcome::Rendered)
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        FrameScheduler::new()
    }
}
