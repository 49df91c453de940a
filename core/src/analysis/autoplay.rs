use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use hashbrown::HashSet;

use crate::*;

/// Progress reported by a running [`AutoPlay`].
#[derive(Clone, Debug)]
pub enum AutoPlayEvent {
    /// A mine became known, the caller may flag it.
    MineFound(Pos),
    /// A field was checked by the worker.
    Revealed { pos: Pos, status: Arc<Status> },
}

/// Background autosolve that reveals one safe position per step.
///
/// The worker only holds the game lock while checking a field, never while waiting. Cancelling
/// blocks until the worker has let go of the game, so the caller can reset it right after.
#[derive(Debug)]
pub struct AutoPlay {
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<bool>>,
}

impl AutoPlay {
    /// Starts playing, optionally checking `start` first, pausing `delay` before each reveal.
    pub fn start<F>(solver: Arc<Solver>, start: Option<Pos>, delay: Duration, on_event: F) -> Self
    where
        F: FnMut(AutoPlayEvent) + Send + 'static,
    {
        let (stop, stopped) = mpsc::channel();
        let worker = thread::spawn(move || {
            let mut player = Player {
                solver,
                stopped,
                delay,
                on_event,
                flagged: HashSet::new(),
            };
            player.run(start)
        });

        Self {
            stop: Some(stop),
            worker: Some(worker),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stops the worker and waits until it is gone. Returns whether the game was won.
    pub fn cancel(mut self) -> bool {
        self.signal_stop();
        self.join()
    }

    /// Waits for the worker to run out of safe moves. Returns whether the game was won.
    pub fn wait(mut self) -> bool {
        self.join()
    }

    fn signal_stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            // the worker may already be gone
            let _ = stop.send(());
        }
    }

    fn join(&mut self) -> bool {
        let Some(worker) = self.worker.take() else {
            return false;
        };
        match worker.join() {
            Ok(won) => won,
            Err(_) => {
                log::error!("Autoplay worker panicked");
                false
            }
        }
    }
}

impl Drop for AutoPlay {
    fn drop(&mut self) {
        self.signal_stop();
        self.join();
    }
}

struct Player<F> {
    solver: Arc<Solver>,
    stopped: Receiver<()>,
    delay: Duration,
    on_event: F,
    flagged: HashSet<Pos>,
}

impl<F: FnMut(AutoPlayEvent)> Player<F> {
    fn run(&mut self, start: Option<Pos>) -> bool {
        if let Some(start) = start {
            if !self.reveal(start) {
                return self.is_won();
            }
        }

        loop {
            self.solver.update();
            self.report_mines();

            let steps = self.solver.next_steps();
            if steps.is_empty() || self.solver.lock_game().is_finished() {
                break;
            }

            for pos in steps {
                if self.should_stop() {
                    log::debug!("autoplay cancelled before {pos}");
                    return self.is_won();
                }
                if !self.reveal(pos) {
                    return self.is_won();
                }
            }
        }

        self.is_won()
    }

    /// Checks `pos`, returning whether playing can go on.
    fn reveal(&mut self, pos: Pos) -> bool {
        let checked = self.solver.lock_game().check_field(pos);
        match checked {
            Ok((status, outcome)) => {
                log::debug!("autoplay checked {pos}: {outcome:?}");
                let finished = status.is_finished();
                if outcome.has_update() {
                    (self.on_event)(AutoPlayEvent::Revealed { pos, status });
                }
                !finished
            }
            Err(err) => {
                log::error!("Autoplay could not check {pos}: {err}");
                false
            }
        }
    }

    fn report_mines(&mut self) {
        for pos in self.solver.known_mines() {
            if self.flagged.insert(pos) {
                (self.on_event)(AutoPlayEvent::MineFound(pos));
            }
        }
    }

    /// Waits out the delay, waking up early when told to stop.
    fn should_stop(&self) -> bool {
        match self.stopped.recv_timeout(self.delay) {
            Err(RecvTimeoutError::Timeout) => false,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
        }
    }

    fn is_won(&self) -> bool {
        self.solver.lock_game().is_won()
    }
}
