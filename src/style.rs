//! Optional stylesheet for the time display.
//!
//! The file holds style words separated by whitespace or `;`, e.g.
//! `bold green on_black`. It is read once at start-up; a missing or empty
//! file leaves the display unstyled.

use anyhow::{Context, Result};
use colored::{Color, ColoredString, Colorize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelStyle {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub bold: bool,
    pub dimmed: bool,
    pub italic: bool,
    pub underline: bool,
}

impl LabelStyle {
    pub fn parse(sheet: &str) -> Self {
        let mut style = Self::default();

        for word in sheet
            .split(|c: char| c.is_whitespace() || c == ';')
            .filter(|w| !w.is_empty())
        {
            let word = word.to_ascii_lowercase();
            match word.as_str() {
                "bold" => style.bold = true,
                "dimmed" | "dim" => style.dimmed = true,
                "italic" => style.italic = true,
                "underline" => style.underline = true,
                other => {
                    if let Some(bg) = other.strip_prefix("on_") {
                        match bg.parse::<Color>() {
                            Ok(color) => style.background = Some(color),
                            Err(_) => tracing::warn!(word = other, "Unknown background colour"),
                        }
                    } else {
                        match other.parse::<Color>() {
                            Ok(color) => style.foreground = Some(color),
                            Err(_) => tracing::warn!(word = other, "Unknown style word"),
                        }
                    }
                }
            }
        }

        style
    }

    /// Reads the stylesheet at `path`. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let sheet = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stylesheet {}", path.display()))?;
        if sheet.trim().is_empty() {
            return Ok(None);
        }
        tracing::debug!(path = %path.display(), "Loaded stylesheet");
        Ok(Some(Self::parse(&sheet)))
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, text: &str) -> ColoredString {
        let mut styled = text.normal();
        if let Some(color) = self.foreground {
            styled = styled.color(color);
        }
        if let Some(color) = self.background {
            styled = styled.on_color(color);
        }
        if self.bold {
            styled = styled.bold();
        }
        if self.dimmed {
            styled = styled.dimmed();
        }
        if self.italic {
            styled = styled.italic();
        }
        if self.underline {
            styled = styled.underline();
        }
        styled
    }
}
