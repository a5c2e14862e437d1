//! Full-screen loading overlay shown once per browser session.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, info, warn};

use crate::config::PreloaderConfig;
use crate::error::Result;
use crate::host::{SessionStore, Timers};

/// Stored under the session key once the overlay has been shown.
pub const SHOWN_VALUE: &str = "true";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloaderState {
    NotShown,
    Showing,
    Dismissed,
}

pub trait Overlay {
    fn mount(&self) -> Result<()>;
    fn fade_out(&self);
    /// Must tolerate the overlay already being gone.
    fn remove(&self);
}

pub struct Preloader {
    state: Cell<PreloaderState>,
    overlay: Option<Rc<dyn Overlay>>,
    dismissing: Cell<bool>,
    timers: Rc<dyn Timers>,
    dismiss_delay_ms: u32,
    fade_ms: u32,
}

impl Preloader {
    /// Checks the session flag and mounts the overlay on the first visit.
    /// `build_overlay` is only called when the overlay is actually needed.
    pub fn start<F>(
        session: &dyn SessionStore,
        config: &PreloaderConfig,
        timers: Rc<dyn Timers>,
        build_overlay: F,
    ) -> Result<Rc<Self>>
    where
        F: FnOnce() -> Result<Rc<dyn Overlay>>,
    {
        let mut preloader = Self {
            state: Cell::new(PreloaderState::NotShown),
            overlay: None,
            dismissing: Cell::new(false),
            timers,
            dismiss_delay_ms: config.dismiss_delay_ms,
            fade_ms: config.fade_ms,
        };

        if session.get(&config.session_key).is_some() {
            info!("preloader already shown this session, skipping");
            return Ok(Rc::new(preloader));
        }

        // Flag first, so a reload while the overlay is up skips it.
        if let Err(err) = session.set(&config.session_key, SHOWN_VALUE) {
            warn!("could not persist preloader flag: {}", err);
        }

        let overlay = build_overlay()?;
        overlay.mount()?;
        preloader.overlay = Some(overlay);
        preloader.state.set(PreloaderState::Showing);
        debug!("preloader mounted");
        Ok(Rc::new(preloader))
    }

    pub fn state(&self) -> PreloaderState {
        self.state.get()
    }

    /// Load-completion signal: fade after the dismiss delay, then remove once
    /// the fade has run. Only the first call while showing has any effect.
    pub fn on_load(self: &Rc<Self>) {
        if self.state.get() != PreloaderState::Showing || self.dismissing.replace(true) {
            return;
        }
        let Some(overlay) = self.overlay.clone() else {
            return;
        };

        let preloader = Rc::clone(self);
        self.timers.after(
            self.dismiss_delay_ms,
            Box::new(move || {
                overlay.fade_out();
                let timers = preloader.timers.clone();
                timers.after(
                    preloader.fade_ms,
                    Box::new(move || {
                        overlay.remove();
                        preloader.state.set(PreloaderState::Dismissed);
                        debug!("preloader removed");
                    }),
                );
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnhanceError;
    use crate::host::{ManualTimers, MemorySession};
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeOverlay {
        events: RefCell<Vec<&'static str>>,
        attached: Cell<bool>,
    }

    impl Overlay for FakeOverlay {
        fn mount(&self) -> Result<()> {
            self.attached.set(true);
            self.events.borrow_mut().push("mount");
            Ok(())
        }

        fn fade_out(&self) {
            self.events.borrow_mut().push("fade");
        }

        fn remove(&self) {
            if self.attached.replace(false) {
                self.events.borrow_mut().push("remove");
            }
        }
    }

    fn start(
        session: &MemorySession,
        timers: &Rc<ManualTimers>,
        overlay: &Rc<FakeOverlay>,
    ) -> Rc<Preloader> {
        let overlay: Rc<dyn Overlay> = overlay.clone();
        let timers: Rc<dyn Timers> = timers.clone();
        Preloader::start(session, &PreloaderConfig::default(), timers, move || Ok(overlay)).unwrap()
    }

    #[test]
    fn first_visit_shows_overlay_and_sets_flag() {
        let session = MemorySession::new();
        let timers = Rc::new(ManualTimers::new());
        let overlay = Rc::new(FakeOverlay::default());

        let preloader = start(&session, &timers, &overlay);

        assert_eq!(preloader.state(), PreloaderState::Showing);
        assert_eq!(session.get("preloader-shown").as_deref(), Some(SHOWN_VALUE));
        assert_eq!(*overlay.events.borrow(), vec!["mount"]);
    }

    #[test]
    fn second_visit_in_session_creates_nothing() {
        let session = MemorySession::new();
        let timers = Rc::new(ManualTimers::new());
        start(&session, &timers, &Rc::new(FakeOverlay::default()));

        let built = Cell::new(false);
        let timers_dyn: Rc<dyn Timers> = timers.clone();
        let preloader = Preloader::start(&session, &PreloaderConfig::default(), timers_dyn, || {
            built.set(true);
            Err(EnhanceError::MissingGlobal("document"))
        })
        .unwrap();

        assert!(!built.get());
        assert_eq!(preloader.state(), PreloaderState::NotShown);
        preloader.on_load();
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn load_fades_after_delay_then_removes() {
        let session = MemorySession::new();
        let timers = Rc::new(ManualTimers::new());
        let overlay = Rc::new(FakeOverlay::default());
        let preloader = start(&session, &timers, &overlay);

        preloader.on_load();
        timers.advance(799);
        assert_eq!(*overlay.events.borrow(), vec!["mount"]);

        timers.advance(1);
        assert_eq!(*overlay.events.borrow(), vec!["mount", "fade"]);
        assert_eq!(preloader.state(), PreloaderState::Showing);

        timers.advance(500);
        assert_eq!(*overlay.events.borrow(), vec!["mount", "fade", "remove"]);
        assert_eq!(preloader.state(), PreloaderState::Dismissed);
    }

    #[test]
    fn repeated_load_signal_schedules_one_dismissal() {
        let session = MemorySession::new();
        let timers = Rc::new(ManualTimers::new());
        let overlay = Rc::new(FakeOverlay::default());
        let preloader = start(&session, &timers, &overlay);

        preloader.on_load();
        preloader.on_load();
        assert_eq!(timers.pending(), 1);
        timers.advance(2000);
        assert_eq!(*overlay.events.borrow(), vec!["mount", "fade", "remove"]);
    }

    #[test]
    fn overlay_removed_elsewhere_is_tolerated() {
        let session = MemorySession::new();
        let timers = Rc::new(ManualTimers::new());
        let overlay = Rc::new(FakeOverlay::default());
        let preloader = start(&session, &timers, &overlay);

        overlay.remove();
        preloader.on_load();
        timers.advance(1300);

        assert_eq!(preloader.state(), PreloaderState::Dismissed);
        assert_eq!(*overlay.events.borrow(), vec!["mount", "remove", "fade"]);
    }
}
