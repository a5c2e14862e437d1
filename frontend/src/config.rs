use log::Level;
use serde::Deserialize;

use crate::error::Result;

/// Id of the optional `<script type="application/json">` block holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "site-enhancements-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Chatty while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Which of the two reveal behaviours the page uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealStrategy {
    /// Every candidate starts hidden and fades in when scrolled to.
    FadeAll,
    /// Candidates already at or above the fold are shown straight away.
    SkipNearFold,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RevealConfig {
    pub selectors: Vec<String>,
    pub strategy: RevealStrategy,
    /// Pixels below the viewport at which a pending element may already fire.
    pub margin: f64,
    pub threshold: f64,
    pub hidden_offset: f64,
    pub transition: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selectors: vec![
                ".podcast-section".to_string(),
                ".contact-section".to_string(),
                ".works-grid .work-card".to_string(),
                ".video-item".to_string(),
            ],
            strategy: RevealStrategy::SkipNearFold,
            margin: 50.0,
            threshold: 0.1,
            hidden_offset: 30.0,
            transition: "opacity 0.6s ease, transform 0.6s ease".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScrollConfig {
    pub parallax_selector: String,
    /// Fraction of the scroll offset applied to parallax layers. Kept below 1.
    pub parallax_speed: f64,
    pub back_to_top_threshold: f64,
    /// Viewports at or below this width skip the desktop-only effects.
    pub desktop_breakpoint: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            parallax_selector: ".hero-background".to_string(),
            parallax_speed: 0.5,
            back_to_top_threshold: 300.0,
            desktop_breakpoint: 768.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PreloaderConfig {
    pub enabled: bool,
    pub session_key: String,
    pub label: String,
    pub dismiss_delay_ms: u32,
    pub fade_ms: u32,
}

impl Default for PreloaderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            session_key: "preloader-shown".to_string(),
            label: "JUNIOR CHAUK".to_string(),
            dismiss_delay_ms: 800,
            fade_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EffectsConfig {
    pub particles: bool,
    pub particle_count: usize,
    pub hover_selector: String,
    pub custom_cursor: bool,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            particles: true,
            particle_count: 20,
            hover_selector: ".work-card, .video-item, .podcast-image-wrapper".to_string(),
            custom_cursor: true,
        }
    }
}

/// Everything the enhancements read at startup. Any field missing from the
/// page's JSON block keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    pub reveal: RevealConfig,
    pub scroll: ScrollConfig,
    pub preloader: PreloaderConfig,
    pub effects: EffectsConfig,
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: SiteConfig = serde_json::from_str(raw)?;
        Ok(config.sanitized())
    }

    pub fn is_desktop(&self, viewport_width: f64) -> bool {
        viewport_width > self.scroll.desktop_breakpoint
    }

    fn sanitized(mut self) -> Self {
        if !(0.0..1.0).contains(&self.scroll.parallax_speed) {
            log::warn!(
                "parallax speed {} out of range, using default",
                self.scroll.parallax_speed
            );
            self.scroll.parallax_speed = ScrollConfig::default().parallax_speed;
        }
        self.reveal.threshold = self.reveal.threshold.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = SiteConfig::from_json("{}").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.scroll.back_to_top_threshold, 300.0);
        assert_eq!(config.reveal.strategy, RevealStrategy::SkipNearFold);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let raw = r#"{
            "reveal": { "strategy": "fade-all", "margin": -50 },
            "preloader": { "label": "ACME" }
        }"#;
        let config = SiteConfig::from_json(raw).unwrap();
        assert_eq!(config.reveal.strategy, RevealStrategy::FadeAll);
        assert_eq!(config.reveal.margin, -50.0);
        assert_eq!(config.reveal.selectors.len(), 4);
        assert_eq!(config.preloader.label, "ACME");
        assert_eq!(config.preloader.session_key, "preloader-shown");
    }

    #[test]
    fn parallax_speed_must_slow_the_layer_down() {
        let config = SiteConfig::from_json(r#"{"scroll": {"parallax-speed": 1.5}}"#).unwrap();
        assert_eq!(config.scroll.parallax_speed, 0.5);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = SiteConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, crate::error::EnhanceError::Config(_)));
    }

    #[test]
    fn desktop_gate_is_exclusive_at_breakpoint() {
        let config = SiteConfig::default();
        assert!(!config.is_desktop(768.0));
        assert!(config.is_desktop(769.0));
    }
}
