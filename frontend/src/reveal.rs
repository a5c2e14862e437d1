//! Scroll-triggered reveal of page sections and cards.
//!
//! [`RevealScheduler`] owns the per-element state. The host feeds it
//! intersection entries (from an `IntersectionObserver` in the browser, from
//! [`RevealScheduler::evaluate`] in tests) and it decides which elements to
//! style and which to stop watching.

use log::debug;

use crate::config::{RevealConfig, RevealStrategy};
use crate::geometry::{is_already_visible, proximity_hit, Viewport};

pub use crate::geometry::Rect;

/// Index of a candidate in the order it was handed to the scheduler.
pub type TargetId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Pending,
    Revealed,
}

/// Inline style for elements waiting to be revealed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingStyle {
    pub offset: f64,
    pub transition: String,
}

impl PendingStyle {
    pub fn transform(&self) -> String {
        format!("translateY({}px)", self.offset)
    }
}

pub trait RevealTarget {
    fn bounding_rect(&self) -> Option<Rect>;

    /// `false` lets the element hide and reveal again every time it leaves
    /// and re-enters the view.
    fn reveal_once(&self) -> bool {
        true
    }

    fn show_pending(&self, style: &PendingStyle);

    fn show_revealed(&self);
}

/// Something that reports when watched targets cross the proximity margin.
pub trait VisibilityWatcher {
    fn watch(&self, id: TargetId);
    fn unwatch(&self, id: TargetId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub id: TargetId,
    pub is_intersecting: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevealSummary {
    pub revealed: usize,
    pub pending: usize,
}

struct Observed<T> {
    target: T,
    state: RevealState,
    once: bool,
    watched: bool,
}

pub struct RevealScheduler<T> {
    observed: Vec<Observed<T>>,
    strategy: RevealStrategy,
    margin: f64,
    pending_style: PendingStyle,
    initialized: bool,
}

impl<T: RevealTarget> RevealScheduler<T> {
    pub fn new(targets: Vec<T>, config: &RevealConfig) -> Self {
        let observed = targets
            .into_iter()
            .map(|target| Observed {
                once: target.reveal_once(),
                target,
                state: RevealState::Pending,
                watched: false,
            })
            .collect();
        Self {
            observed,
            strategy: config.strategy,
            margin: config.margin,
            pending_style: PendingStyle {
                offset: config.hidden_offset,
                transition: config.transition.clone(),
            },
            initialized: false,
        }
    }

    /// Partitions the candidates once. Without a watcher (no intersection
    /// support) every candidate is revealed so nothing stays hidden.
    /// Calling it again does nothing.
    pub fn initialize(
        &mut self,
        viewport: Viewport,
        watcher: Option<&dyn VisibilityWatcher>,
    ) -> RevealSummary {
        if self.initialized {
            return self.summary();
        }
        self.initialized = true;

        let Some(watcher) = watcher else {
            debug!("no intersection support, revealing {} elements", self.observed.len());
            for entry in &mut self.observed {
                entry.target.show_revealed();
                entry.state = RevealState::Revealed;
            }
            return self.summary();
        };

        for (id, entry) in self.observed.iter_mut().enumerate() {
            let near_fold = self.strategy == RevealStrategy::SkipNearFold
                && is_already_visible(entry.target.bounding_rect(), viewport);
            if near_fold {
                entry.target.show_revealed();
                entry.state = RevealState::Revealed;
            } else {
                entry.target.show_pending(&self.pending_style);
                entry.state = RevealState::Pending;
                entry.watched = true;
                watcher.watch(id);
            }
        }

        let summary = self.summary();
        debug!(
            "reveal scheduler: {} shown at load, {} waiting",
            summary.revealed, summary.pending
        );
        summary
    }

    pub fn handle_entries(&mut self, entries: &[IntersectionEntry], watcher: &dyn VisibilityWatcher) {
        for entry in entries {
            let Some(observed) = self.observed.get_mut(entry.id) else {
                continue;
            };
            if !observed.watched {
                continue;
            }
            match (entry.is_intersecting, observed.state) {
                (true, RevealState::Pending) => {
                    observed.target.show_revealed();
                    observed.state = RevealState::Revealed;
                    if observed.once {
                        observed.watched = false;
                        watcher.unwatch(entry.id);
                    }
                }
                (false, RevealState::Revealed) if !observed.once => {
                    observed.target.show_pending(&self.pending_style);
                    observed.state = RevealState::Pending;
                }
                _ => {}
            }
        }
    }

    /// Entries for every watched target at the current scroll position, using
    /// the same margin an observer would.
    pub fn evaluate(&self, viewport: Viewport) -> Vec<IntersectionEntry> {
        self.observed
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.watched)
            .map(|(id, entry)| IntersectionEntry {
                id,
                is_intersecting: entry
                    .target
                    .bounding_rect()
                    .map(|rect| proximity_hit(rect, viewport, self.margin))
                    .unwrap_or(false),
            })
            .collect()
    }

    pub fn state(&self, id: TargetId) -> Option<RevealState> {
        self.observed.get(id).map(|entry| entry.state)
    }

    pub fn is_watched(&self, id: TargetId) -> bool {
        self.observed.get(id).map(|entry| entry.watched).unwrap_or(false)
    }

    pub fn target(&self, id: TargetId) -> Option<&T> {
        self.observed.get(id).map(|entry| &entry.target)
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    fn summary(&self) -> RevealSummary {
        let revealed = self
            .observed
            .iter()
            .filter(|entry| entry.state == RevealState::Revealed)
            .count();
        RevealSummary {
            revealed,
            pending: self.observed.len() - revealed,
        }
    }
}
