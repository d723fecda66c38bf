/// Light/dark display mode
use crate::config::BackgroundConfig;
use crate::scene::Color;

/// CSS class the page stylesheet keys dark styling on
pub const DARK_MODE_CLASS: &str = "dark-mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Light,
    Dark,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Light => DisplayMode::Dark,
            DisplayMode::Dark => DisplayMode::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == DisplayMode::Dark
    }

    /// The scene background for this mode
    pub fn background(self, backgrounds: &BackgroundConfig) -> Color {
        match self {
            DisplayMode::Light => backgrounds.light,
            DisplayMode::Dark => backgrounds.dark,
        }
    }
}
