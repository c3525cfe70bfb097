use crate::model::Color;

/// Font used to render cell text
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    /// Size in points
    pub size: f32,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike_through: bool,
}

impl Default for Font {
    fn default() -> Self {
        Font {
            family: "Helvetica".to_string(),
            size: 10.0,
            color: Color::BLACK,
            bold: false,
            italic: false,
            underline: false,
            strike_through: false,
        }
    }
}

/// Partial font description; unset fields are taken from the base font
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontDef {
    pub family: Option<String>,
    pub size: Option<f32>,
    pub color: Option<Color>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strike_through: Option<bool>,
}

impl FontDef {
    pub fn color(color: Color) -> Self {
        FontDef {
            color: Some(color),
            ..Default::default()
        }
    }

    pub fn bold() -> Self {
        FontDef {
            bold: Some(true),
            ..Default::default()
        }
    }
}

impl Font {
    /// Derive a new font, replacing the fields set in `def`.
    pub fn derive(&self, def: &FontDef) -> Font {
        Font {
            family: def.family.clone().unwrap_or_else(|| self.family.clone()),
            size: def.size.unwrap_or(self.size),
            color: def.color.unwrap_or(self.color),
            bold: def.bold.unwrap_or(self.bold),
            italic: def.italic.unwrap_or(self.italic),
            underline: def.underline.unwrap_or(self.underline),
            strike_through: def.strike_through.unwrap_or(self.strike_through),
        }
    }

    pub fn css_style(&self) -> String {
        let mut css = format!(
            "color: {}; font-size: {}pt; font-family: {};",
            self.color.to_css(),
            self.size,
            self.family
        );
        if self.bold {
            css.push_str(" font-weight: bold;");
        }
        if self.italic {
            css.push_str(" font-style: italic;");
        }
        match (self.underline, self.strike_through) {
            (true, true) => css.push_str(" text-decoration: underline line-through;"),
            (true, false) => css.push_str(" text-decoration: underline;"),
            (false, true) => css.push_str(" text-decoration: line-through;"),
            (false, false) => {}
        }
        css
    }

    /// Approximate rendered width of `text` in points.
    ///
    /// Uses an average glyph width of 0.6 em (0.65 em for bold text); no
    /// font files are consulted.
    pub fn text_width(&self, text: &str) -> f32 {
        let em = if self.bold { 0.65 } else { 0.6 };
        text.lines()
            .map(|line| line.chars().count() as f32 * self.size * em)
            .fold(0.0, f32::max)
    }

    /// Approximate line height in points.
    pub fn line_height(&self) -> f32 {
        self.size * 1.2
    }

    /// Height of `text` with one line per `\n`.
    pub fn text_height(&self, text: &str) -> f32 {
        text.lines().count().max(1) as f32 * self.line_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let font = Font::default();
        assert_eq!(font.family, "Helvetica");
        assert_eq!(font.size, 10.0);
        assert_eq!(font.color, Color::BLACK);
        assert!(!font.bold && !font.italic && !font.underline && !font.strike_through);
    }

    #[test]
    fn test_derive_keeps_unset_fields() {
        let base = Font {
            size: 12.0,
            ..Default::default()
        };
        let derived = base.derive(&FontDef {
            bold: Some(true),
            color: Some(Color::RED),
            ..Default::default()
        });
        assert!(derived.bold);
        assert_eq!(derived.color, Color::RED);
        assert_eq!(derived.size, 12.0);
        assert_eq!(derived.family, "Helvetica");
    }

    #[test]
    fn test_css_style() {
        let font = Font::default().derive(&FontDef {
            bold: Some(true),
            underline: Some(true),
            ..Default::default()
        });
        assert_eq!(
            font.css_style(),
            "color: #000000; font-size: 10pt; font-family: Helvetica; font-weight: bold; text-decoration: underline;"
        );
    }

    #[test]
    fn test_text_metrics() {
        let font = Font::default();
        let close = |a: f32, b: f32| (a - b).abs() < 1e-3;
        assert_eq!(font.text_width(""), 0.0);
        assert!(close(font.text_width("abcde"), 30.0));
        assert!(close(font.text_width("ab\nabcd"), 24.0));
        assert!(close(font.text_height("a\nb"), 24.0));
    }
}
