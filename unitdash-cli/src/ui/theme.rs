//! UI theme: palette tokens and style helpers for the dashboard.
//!
//! Run and enablement states arrive as free-form strings from the service
//! manager; the mappings here cover the common vocabulary and fall back to
//! the warn style for anything unrecognized.

use ratatui::style::{Color, Modifier, Style};

use unitdash_core::unit::Scope;

/// Color palette tokens for the theme
#[derive(Clone, Debug)]
pub struct Palette {
    /// Primary text color
    pub text: Color,
    /// Dimmed text (secondary info)
    pub text_dim: Color,
    /// Muted text (tertiary info, disabled)
    pub text_muted: Color,
    /// Accent color (highlights, focus)
    pub accent: Color,
    /// Success state (active, enabled)
    pub success: Color,
    /// Warning state (activating, static, unrecognized)
    pub warn: Color,
    /// Error state (failed, not-found)
    pub error: Color,
    /// Panel border color
    pub panel_border: Color,
    /// Selection background
    pub selection_bg: Color,
    /// Selection foreground
    pub selection_fg: Color,
    /// Key hint text
    pub key_hint: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

impl Palette {
    /// VS Code-esque dark theme
    pub fn dark() -> Self {
        Self {
            text: Color::Rgb(212, 212, 212),
            text_dim: Color::Rgb(150, 150, 150),
            text_muted: Color::Rgb(100, 100, 100),
            accent: Color::Rgb(79, 193, 255),
            success: Color::Rgb(78, 201, 176),
            warn: Color::Rgb(220, 180, 100),
            error: Color::Rgb(244, 135, 113),
            panel_border: Color::Rgb(60, 60, 60),
            selection_bg: Color::Rgb(38, 79, 120),
            selection_fg: Color::White,
            key_hint: Color::Rgb(206, 145, 120),
        }
    }
}

/// Theme configuration
#[derive(Clone, Debug, Default)]
pub struct Theme {
    pub palette: Palette,
}

impl Theme {
    /// Style for a unit's run state, keyed on the manager's vocabulary.
    pub fn active_style(&self, state: &str) -> Style {
        let color = match state {
            "active" => self.palette.success,
            "inactive" => self.palette.text_muted,
            "failed" | "not-found" => self.palette.error,
            "activating" | "deactivating" => self.palette.warn,
            _ => self.palette.warn,
        };
        Style::default().fg(color)
    }

    /// Style for a unit's enablement state.
    pub fn enabled_style(&self, state: &str) -> Style {
        let color = match state {
            "enabled" => self.palette.success,
            "disabled" => self.palette.text_muted,
            "static" | "indirect" | "generated" => self.palette.warn,
            "not-found" => self.palette.error,
            _ => self.palette.warn,
        };
        Style::default().fg(color)
    }

    pub fn scope_style(&self, scope: Scope) -> Style {
        let color = match scope {
            Scope::System => self.palette.accent,
            Scope::User => self.palette.success,
            Scope::None => self.palette.error,
        };
        Style::default().fg(color)
    }

    pub fn key_hint_style(&self) -> Style {
        Style::default().fg(self.palette.key_hint)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.palette.panel_border)
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.palette.selection_bg)
            .fg(self.palette.selection_fg)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.palette.text)
    }

    pub fn text_dim_style(&self) -> Style {
        Style::default().fg(self.palette.text_dim)
    }

    pub fn text_muted_style(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD)
    }
}

/// Global theme instance - can be made configurable later
static DEFAULT_THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

/// Get the default theme
pub fn theme() -> &'static Theme {
    DEFAULT_THEME.get_or_init(Theme::default)
}

/// Convenience re-exports for common use cases
pub mod styles {
    use super::*;

    pub fn active(state: &str) -> Style {
        theme().active_style(state)
    }

    pub fn enabled(state: &str) -> Style {
        theme().enabled_style(state)
    }

    pub fn scope(scope: Scope) -> Style {
        theme().scope_style(scope)
    }

    pub fn key_hint() -> Style {
        theme().key_hint_style()
    }

    pub fn border() -> Style {
        theme().border_style()
    }

    pub fn selection() -> Style {
        theme().selection_style()
    }

    pub fn text() -> Style {
        theme().text_style()
    }

    pub fn text_dim() -> Style {
        theme().text_dim_style()
    }

    pub fn text_muted() -> Style {
        theme().text_muted_style()
    }

    pub fn title() -> Style {
        theme().title_style()
    }
}
