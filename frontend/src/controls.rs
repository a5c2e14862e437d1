//! Decisions behind the small page controls and decorations. The DOM side of
//! each lives in [`crate::dom::controls`] and [`crate::dom::effects`].

use std::cell::Cell;

pub const VISIBLE_CLASS: &str = "visible";
pub const HIDDEN_CLASS: &str = "hidden";

pub trait ClassToggle {
    fn set_class(&self, class: &str, on: bool);
}

/// Shows the back-to-top control once the page is scrolled past a threshold.
pub struct BackToTop<C> {
    control: C,
    threshold: f64,
    visible: Cell<Option<bool>>,
}

impl<C: ClassToggle> BackToTop<C> {
    pub fn new(control: C, threshold: f64) -> Self {
        Self {
            control,
            threshold,
            visible: Cell::new(None),
        }
    }

    /// Only touches the class list when visibility actually flips.
    pub fn on_scroll(&self, offset: f64) {
        let visible = offset > self.threshold;
        if self.visible.replace(Some(visible)) != Some(visible) {
            self.control.set_class(VISIBLE_CLASS, visible);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get().unwrap_or(false)
    }
}

/// Images in the hero section load straight away, the rest lazily.
pub fn image_loading(in_hero: bool) -> &'static str {
    if in_hero {
        "eager"
    } else {
        "lazy"
    }
}

/// Randomised parameters of one background particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub size_px: f64,
    pub left_pct: f64,
    pub duration_s: f64,
    pub delay_s: f64,
}

impl Particle {
    /// `random` yields values in `[0, 1)`.
    pub fn generate(random: &mut impl FnMut() -> f64) -> Self {
        Self {
            size_px: random() * 3.0 + 1.0,
            left_pct: random() * 100.0,
            duration_s: random() * 20.0 + 15.0,
            delay_s: random() * 5.0,
        }
    }

    pub fn css(&self) -> String {
        format!(
            "position: absolute; width: {size}px; height: {size}px; \
             background: rgba(255, 215, 0, 0.3); border-radius: 50%; left: {left}%; \
             animation: float {duration}s infinite ease-in-out; animation-delay: {delay}s;",
            size = self.size_px,
            left = self.left_pct,
            duration = self.duration_s,
            delay = self.delay_s,
        )
    }
}

pub const HOVER_TRANSITION: &str = "all 0.3s cubic-bezier(0.4, 0, 0.2, 1)";

pub fn hover_transform(hovered: bool) -> &'static str {
    if hovered {
        "translateY(-10px) scale(1.02)"
    } else {
        "translateY(0) scale(1)"
    }
}
