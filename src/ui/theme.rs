//! Theme management and ANSI escape sequence generation.
//!
//! Themes are TOML palettes. Three are compiled in; others can be loaded from
//! a file named in the plugin configuration.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: dark, the default
//! - `catppuccin-latte`: light
//! - `gruvbox-dark`: dark with a header background
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#cba6f7"
//! focus_fg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#89b4fa"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! card_back_fg = "#a6e3a1"
//! modal_border = "#f5c2e7"
//! status_fg = "#fab387"
//! ```

use crate::domain::error::{FlashdeckError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Color scheme used by every component.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Hex color strings (`"#rrggbb"`) for each UI role.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Selected deck row.
    pub selection_fg: String,
    pub selection_bg: String,
    /// Focus ring marker for the focused element.
    pub focus_fg: String,

    pub text_normal: String,
    /// Footer hints, card counts, unfocused modal controls.
    pub text_dim: String,

    pub border: String,
    pub search_bar_border: String,
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,
    /// Text of cards showing their back side.
    pub card_back_fg: String,
    pub modal_border: String,
    pub status_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// ```rust
    /// use flashdeck::ui::Theme;
    ///
    /// let theme = Theme::from_name("gruvbox-dark").unwrap();
    /// assert!(theme.colors.header_bg.is_some());
    /// assert!(Theme::from_name("solarized").is_none());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "gruvbox-dark" => include_str!("../../themes/gruvbox-dark.toml"),
            _ => return None,
        };

        match toml::from_str(toml_str) {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::error!(theme = name, error = %e, "built-in theme failed to parse");
                None
            }
        }
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::Theme`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| FlashdeckError::Theme(format!("failed to read {}: {e}", path.display())))?;

        toml::from_str(&contents)
            .map_err(|e| FlashdeckError::Theme(format!("failed to parse {}: {e}", path.display())))
    }

    /// Returns `(255, 255, 255)` for anything that is not `#rrggbb`.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(255);
        (channel(0..2), channel(2..4), channel(4..6))
    }

    /// ANSI 24-bit foreground escape sequence.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background escape sequence.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn reverse() -> &'static str {
        "\u{001b}[7m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }

    /// Palette used if the embedded default ever fails to parse.
    fn fallback() -> Self {
        let c = |s: &str| s.to_string();
        Self {
            name: c("fallback"),
            colors: ThemeColors {
                header_fg: c("#ffffff"),
                header_bg: None,
                selection_fg: c("#000000"),
                selection_bg: c("#ffffff"),
                focus_fg: c("#ffff00"),
                text_normal: c("#ffffff"),
                text_dim: c("#808080"),
                border: c("#808080"),
                search_bar_border: c("#ffffff"),
                match_highlight_fg: c("#000000"),
                match_highlight_bg: c("#ffff00"),
                empty_state_fg: c("#00ffff"),
                card_back_fg: c("#00ff00"),
                modal_border: c("#ffffff"),
                status_fg: c("#ff8000"),
            },
        }
    }
}

impl Default for Theme {
    /// Catppuccin Mocha.
    fn default() -> Self {
        Self::from_name("catppuccin-mocha").unwrap_or_else(Self::fallback)
    }
}
