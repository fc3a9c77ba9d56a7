use ratatui::style::Color;

/// Colors used by the preview widgets
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey0: Color,
    pub grey2: Color,

    // Semantic colors
    pub focus: Color,
    pub hover: Color,
    pub snap: Color,
    pub warning: Color,
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Material dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            fg1: Color::Rgb(0xdd, 0xc7, 0xa1),
            grey0: Color::Rgb(0x7c, 0x6f, 0x64),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            focus: Color::Rgb(0x89, 0xb4, 0x82),
            hover: Color::Rgb(0xd8, 0xa6, 0x57),
            snap: Color::Rgb(0x7d, 0xae, 0xa3),
            warning: Color::Rgb(0xe7, 0x8a, 0x4e),
            accent: Color::Rgb(0xd3, 0x86, 0x9b),
        }
    }
}

impl Theme {
    /// Blend `fg` toward the panel background by `opacity` (0 = invisible)
    pub fn fade(&self, fg: Color, opacity: f64) -> Color {
        match (fg, self.bg0) {
            (Color::Rgb(r, g, b), Color::Rgb(br, bg, bb)) => {
                let t = opacity.clamp(0.0, 1.0);
                let mix = |c: u8, base: u8| (base as f64 + (c as f64 - base as f64) * t).round() as u8;
                Color::Rgb(mix(r, br), mix(g, bg), mix(b, bb))
            }
            _ => fg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_endpoints() {
        let theme = Theme::default();
        assert_eq!(theme.fade(theme.fg0, 1.0), theme.fg0);
        assert_eq!(theme.fade(theme.fg0, 0.0), theme.bg0);
        assert_eq!(theme.fade(Color::Red, 0.5), Color::Red);
    }
}
