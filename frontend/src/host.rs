//! Seams between the enhancement logic and whatever is hosting it.
//!
//! The browser implementations live in [`crate::dom`]. Unit tests use the
//! manual ones below, which queue work until the test runs it, one turn at a
//! time.

use crate::error::Result;

pub type Turn = Box<dyn FnOnce()>;

/// Runs a callback right before the next paint.
pub trait FrameHost {
    fn request_frame(&self, turn: Turn) -> Result<()>;
}

/// Fire-and-forget delayed callbacks.
pub trait Timers {
    fn after(&self, delay_ms: u32, turn: Turn);
}

/// Key/value storage scoped to the browser session.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Test doubles that queue work until the test runs it.
#[cfg(test)]
mod manual {
    use std::cell::{Cell, RefCell};
    use std::collections::{HashMap, VecDeque};

    use super::{FrameHost, SessionStore, Timers, Turn};
    use crate::error::Result;

    #[derive(Default)]
    pub struct ManualFrames {
        queue: RefCell<VecDeque<Turn>>,
    }

    impl ManualFrames {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn pending(&self) -> usize {
            self.queue.borrow().len()
        }

        /// Runs the callbacks queued before this call. Callbacks requested while
        /// flushing land in the following frame.
        pub fn flush(&self) -> usize {
            let turns: Vec<Turn> = self.queue.borrow_mut().drain(..).collect();
            let ran = turns.len();
            for turn in turns {
                turn();
            }
            ran
        }
    }

    impl FrameHost for ManualFrames {
        fn request_frame(&self, turn: Turn) -> Result<()> {
            self.queue.borrow_mut().push_back(turn);
            Ok(())
        }
    }

    /// Virtual clock. Nothing fires until [`ManualTimers::advance`].
    #[derive(Default)]
    pub struct ManualTimers {
        now: Cell<u64>,
        seq: Cell<u64>,
        scheduled: RefCell<Vec<(u64, u64, Turn)>>,
    }

    impl ManualTimers {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn now(&self) -> u64 {
            self.now.get()
        }

        pub fn pending(&self) -> usize {
            self.scheduled.borrow().len()
        }

        /// Moves the clock forward, firing due callbacks in deadline order.
        /// Callbacks scheduled by a firing callback are honoured if they fall
        /// inside the window.
        pub fn advance(&self, ms: u64) {
            let target = self.now.get() + ms;
            loop {
                let next = {
                    let mut scheduled = self.scheduled.borrow_mut();
                    let due = scheduled
                        .iter()
                        .enumerate()
                        .filter(|(_, (at, _, _))| *at <= target)
                        .min_by_key(|(_, (at, seq, _))| (*at, *seq))
                        .map(|(idx, _)| idx);
                    due.map(|idx| scheduled.remove(idx))
                };
                match next {
                    Some((at, _, turn)) => {
                        self.now.set(at);
                        turn();
                    }
                    None => break,
                }
            }
            self.now.set(target);
        }
    }

    impl Timers for ManualTimers {
        fn after(&self, delay_ms: u32, turn: Turn) {
            let seq = self.seq.get();
            self.seq.set(seq + 1);
            let at = self.now.get() + u64::from(delay_ms);
            self.scheduled.borrow_mut().push((at, seq, turn));
        }
    }

    #[derive(Debug, Default)]
    pub struct MemorySession {
        entries: RefCell<HashMap<String, String>>,
    }

    impl MemorySession {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl SessionStore for MemorySession {
        fn get(&self, key: &str) -> Option<String> {
            self.entries.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
pub use manual::{ManualFrames, ManualTimers, MemorySession};

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn frames_requested_during_flush_wait_for_next_flush() {
        let frames = Rc::new(ManualFrames::new());
        let hits = Rc::new(Cell::new(0));

        let inner_frames = frames.clone();
        let inner_hits = hits.clone();
        frames
            .request_frame(Box::new(move || {
                inner_hits.set(inner_hits.get() + 1);
                let again = inner_hits.clone();
                let _ = inner_frames.request_frame(Box::new(move || again.set(again.get() + 10)));
            }))
            .unwrap();

        assert_eq!(frames.flush(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(frames.pending(), 1);
        assert_eq!(frames.flush(), 1);
        assert_eq!(hits.get(), 11);
    }

    #[test]
    fn timers_fire_in_deadline_order_including_chained_ones() {
        let timers = Rc::new(ManualTimers::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let chained_timers = timers.clone();
        let chained_log = log.clone();
        timers.after(
            800,
            Box::new(move || {
                chained_log.borrow_mut().push("fade");
                let inner = chained_log.clone();
                chained_timers.after(500, Box::new(move || inner.borrow_mut().push("remove")));
            }),
        );
        let early = log.clone();
        timers.after(100, Box::new(move || early.borrow_mut().push("early")));

        timers.advance(799);
        assert_eq!(*log.borrow(), vec!["early"]);
        timers.advance(501);
        assert_eq!(*log.borrow(), vec!["early", "fade", "remove"]);
        assert_eq!(timers.now(), 1300);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn memory_session_round_trips_values() {
        let session = MemorySession::new();
        assert_eq!(session.get("k"), None);
        session.set("k", "true").unwrap();
        assert_eq!(session.get("k").as_deref(), Some("true"));
    }
}
