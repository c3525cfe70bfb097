//! Cell styles and the per-workbook style registry

use crate::error::{MejaError, MejaResult};
use crate::format::{DatePattern, FormatStyle, Locale, NumberPattern, DEFAULT_NUMBER_PATTERN};
use crate::model::{CellType, Color, Font};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

//==============================================================================
// Alignment, fill and borders
//==============================================================================

/// Horizontal alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HAlign {
    Left,
    Center,
    Right,
    /// Justified; text is wrapped regardless of the style's wrap flag
    Justify,
    /// Left for text, right for everything else
    #[default]
    Automatic,
}

impl HAlign {
    pub fn is_wrap(&self) -> bool {
        matches!(self, HAlign::Justify)
    }

    pub fn css_style(&self) -> &'static str {
        match self {
            HAlign::Left => "text-align: left;",
            HAlign::Center => "text-align: center;",
            HAlign::Right => "text-align: right;",
            HAlign::Justify => "text-align: left; white-space: pre-wrap !important;",
            HAlign::Automatic => "text-align: left;",
        }
    }
}

/// Vertical alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
    Justify,
    Distributed,
}

impl VAlign {
    pub fn css_style(&self) -> &'static str {
        match self {
            VAlign::Top => "vertical-align: top;",
            VAlign::Middle => "vertical-align: middle;",
            VAlign::Bottom => "vertical-align: bottom;",
            VAlign::Justify => "vertical-align: bottom;",
            VAlign::Distributed => "vertical-align: bottom; white-space: pre-wrap !important;",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillPattern {
    #[default]
    None,
    Solid,
}

/// Cell edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn inverse(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub fn css_name(&self) -> &'static str {
        match self {
            Direction::North => "top",
            Direction::East => "right",
            Direction::South => "bottom",
            Direction::West => "left",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderStyle {
    /// Line width in points; 0 means no border
    pub width: f32,
    pub color: Color,
}

impl BorderStyle {
    pub const NONE: BorderStyle = BorderStyle {
        width: 0.0,
        color: Color::BLACK,
    };

    pub fn new(width: f32, color: Color) -> Self {
        BorderStyle { width, color }
    }

    pub fn is_none(&self) -> bool {
        self.width <= 0.0
    }
}

impl Default for BorderStyle {
    fn default() -> Self {
        BorderStyle::NONE
    }
}

//==============================================================================
// CellStyle
//==============================================================================

/// Visual attributes and data format shared by cells
#[derive(Debug, Clone, PartialEq)]
pub struct CellStyle {
    font: Font,
    fill_bg_color: Color,
    fill_fg_color: Color,
    fill_pattern: FillPattern,
    halign: HAlign,
    valign: VAlign,
    borders: [BorderStyle; 4],
    wrap: bool,
    data_format: String,
    rotation: i16,
}

impl Default for CellStyle {
    fn default() -> Self {
        CellStyle {
            font: Font::default(),
            fill_bg_color: Color::WHITE,
            fill_fg_color: Color::WHITE,
            fill_pattern: FillPattern::None,
            halign: HAlign::Automatic,
            valign: VAlign::Middle,
            borders: [BorderStyle::NONE; 4],
            wrap: false,
            data_format: String::new(),
            rotation: 0,
        }
    }
}

impl CellStyle {
    /// Copy all attributes from `other`.
    pub fn copy_style(&mut self, other: &CellStyle) {
        self.clone_from(other);
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    pub fn fill_bg_color(&self) -> Color {
        self.fill_bg_color
    }

    pub fn set_fill_bg_color(&mut self, color: Color) {
        self.fill_bg_color = color;
    }

    pub fn fill_fg_color(&self) -> Color {
        self.fill_fg_color
    }

    pub fn set_fill_fg_color(&mut self, color: Color) {
        self.fill_fg_color = color;
    }

    pub fn fill_pattern(&self) -> FillPattern {
        self.fill_pattern
    }

    pub fn set_fill_pattern(&mut self, pattern: FillPattern) {
        self.fill_pattern = pattern;
    }

    pub fn halign(&self) -> HAlign {
        self.halign
    }

    pub fn set_halign(&mut self, halign: HAlign) {
        self.halign = halign;
    }

    /// Resolve `Automatic` for a cell of the given type.
    pub fn effective_halign(&self, cell_type: CellType) -> HAlign {
        match (self.halign, cell_type) {
            (HAlign::Automatic, CellType::Text) => HAlign::Left,
            (HAlign::Automatic, _) => HAlign::Right,
            (h, _) => h,
        }
    }

    pub fn valign(&self) -> VAlign {
        self.valign
    }

    pub fn set_valign(&mut self, valign: VAlign) {
        self.valign = valign;
    }

    pub fn border_style(&self, direction: Direction) -> BorderStyle {
        self.borders[direction.index()]
    }

    pub fn set_border_style(&mut self, direction: Direction, border: BorderStyle) {
        self.borders[direction.index()] = border;
    }

    pub fn is_wrap(&self) -> bool {
        self.wrap
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    pub fn data_format(&self) -> &str {
        &self.data_format
    }

    pub fn set_data_format(&mut self, format: impl Into<String>) {
        self.data_format = format.into();
    }

    pub fn rotation(&self) -> i16 {
        self.rotation
    }

    pub fn set_rotation(&mut self, angle: i16) -> MejaResult<()> {
        if !(-90..=90).contains(&angle) {
            return Err(MejaError::Argument(format!(
                "angle must be in range [-90, 90]: {}",
                angle
            )));
        }
        self.rotation = angle;
        Ok(())
    }

    //--------------------------------------------------------------------------
    // Formatting
    //--------------------------------------------------------------------------

    pub fn format_number(&self, value: f64, locale: Locale) -> String {
        let pattern = if self.data_format.is_empty() {
            DEFAULT_NUMBER_PATTERN
        } else {
            self.data_format.as_str()
        };

        match NumberPattern::compile(pattern) {
            Ok(p) => p.format(value, locale),
            Err(_) => {
                warn!("not a number pattern: '{}'", self.data_format);
                NumberPattern::compile(DEFAULT_NUMBER_PATTERN)
                    .map(|p| p.format(value, locale))
                    .unwrap_or_else(|_| value.to_string())
            }
        }
    }

    pub fn format_date(&self, date: NaiveDate, locale: Locale) -> String {
        self.date_pattern(locale, false)
            .map(|p| p.format_date(date, locale))
            .unwrap_or_else(|| date.to_string())
    }

    pub fn format_date_time(&self, dt: NaiveDateTime, locale: Locale) -> String {
        self.date_pattern(locale, true)
            .map(|p| p.format_date_time(dt, locale, true))
            .unwrap_or_else(|| dt.to_string())
    }

    fn date_pattern(&self, locale: Locale, with_time: bool) -> Option<DatePattern> {
        let localized = || {
            if with_time {
                DatePattern::compile(&locale.date_time_pattern(FormatStyle::Medium)).ok()
            } else {
                DatePattern::compile(locale.date_pattern(FormatStyle::Medium)).ok()
            }
        };

        if self.data_format.is_empty() {
            return localized();
        }

        match DatePattern::compile(&self.data_format) {
            Ok(p) => Some(p),
            Err(_) => {
                warn!("not a date pattern: '{}'", self.data_format);
                localized()
            }
        }
    }
}

//==============================================================================
// Registry
//==============================================================================

/// Handle of a style inside a [`CellStyles`] registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StyleId(usize);

impl StyleId {
    /// The default style, named "".
    pub const DEFAULT: StyleId = StyleId(0);

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Named cell styles of a workbook. The default style "" always exists.
#[derive(Debug, Clone)]
pub struct CellStyles {
    styles: Vec<(String, CellStyle)>,
}

impl Default for CellStyles {
    fn default() -> Self {
        Self::new()
    }
}

impl CellStyles {
    pub fn new() -> Self {
        CellStyles {
            styles: vec![(String::new(), CellStyle::default())],
        }
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn id(&self, name: &str) -> Option<StyleId> {
        self.styles.iter().position(|(n, _)| n == name).map(StyleId)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.id(name).is_some()
    }

    /// Look up a style by name, registering a new default-valued style if absent.
    pub fn get_or_create(&mut self, name: &str) -> StyleId {
        if let Some(id) = self.id(name) {
            return id;
        }
        self.styles.push((name.to_string(), CellStyle::default()));
        StyleId(self.styles.len() - 1)
    }

    /// Create or overwrite the style `name` with the attributes of `style`.
    pub fn copy_cell_style(&mut self, name: &str, style: &CellStyle) -> StyleId {
        let id = self.get_or_create(name);
        self.get_mut(id).copy_style(style);
        id
    }

    /// Style for `id`; ids from another registry fall back to the default style.
    pub fn get(&self, id: StyleId) -> &CellStyle {
        match self.styles.get(id.0) {
            Some((_, style)) => style,
            None => &self.styles[0].1,
        }
    }

    pub fn get_mut(&mut self, id: StyleId) -> &mut CellStyle {
        let idx = if id.0 < self.styles.len() { id.0 } else { 0 };
        &mut self.styles[idx].1
    }

    pub fn by_name(&self, name: &str) -> Option<&CellStyle> {
        self.id(name).map(|id| self.get(id))
    }

    pub fn name(&self, id: StyleId) -> &str {
        self.styles
            .get(id.0)
            .map(|(n, _)| n.as_str())
            .unwrap_or_default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.styles.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleId, &str, &CellStyle)> + '_ {
        self.styles
            .iter()
            .enumerate()
            .map(|(idx, (n, s))| (StyleId(idx), n.as_str(), s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_defaults() {
        let style = CellStyle::default();
        assert_eq!(style.fill_pattern(), FillPattern::None);
        assert_eq!(style.fill_bg_color(), Color::WHITE);
        assert_eq!(style.halign(), HAlign::Automatic);
        assert_eq!(style.valign(), VAlign::Middle);
        assert!(style.border_style(Direction::West).is_none());
        assert_eq!(style.data_format(), "");
        assert_eq!(style.rotation(), 0);
    }

    #[test]
    fn test_rotation_range() {
        let mut style = CellStyle::default();
        assert!(style.set_rotation(90).is_ok());
        assert!(style.set_rotation(-90).is_ok());
        let err = style.set_rotation(91).unwrap_err();
        assert!(err.to_string().contains("angle must be in range [-90, 90]"));
        assert_eq!(style.rotation(), -90);
    }

    #[test]
    fn test_effective_halign() {
        let style = CellStyle::default();
        assert_eq!(style.effective_halign(CellType::Text), HAlign::Left);
        assert_eq!(style.effective_halign(CellType::Numeric), HAlign::Right);

        let mut centered = CellStyle::default();
        centered.set_halign(HAlign::Center);
        assert_eq!(centered.effective_halign(CellType::Text), HAlign::Center);
    }

    #[test]
    fn test_alignment_css() {
        assert!(HAlign::Justify.is_wrap());
        assert!(!HAlign::Left.is_wrap());
        assert_eq!(VAlign::Justify.css_style(), "vertical-align: bottom;");
        assert_eq!(Direction::East.inverse(), Direction::West);
        assert_eq!(Direction::North.css_name(), "top");
    }

    #[test]
    fn test_format_with_data_format() {
        let mut style = CellStyle::default();
        assert_eq!(style.format_number(1.5, Locale::Root), "1.5");

        style.set_data_format("#,##0.00");
        assert_eq!(style.format_number(1234.5, Locale::EnUs), "1,234.50");

        style.set_data_format("yyyy/MM/dd");
        let date = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        assert_eq!(style.format_date(date, Locale::Root), "2020/02/29");
        // a date pattern is no number pattern: falls back to the default
        assert_eq!(style.format_number(2.0, Locale::Root), "2");
    }

    #[test]
    fn test_format_date_defaults() {
        let style = CellStyle::default();
        let dt = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert_eq!(style.format_date(dt.date(), Locale::EnUs), "Jan 1, 2023");
        assert_eq!(style.format_date_time(dt, Locale::De), "01.01.2023, 09:05:00");
    }

    #[test]
    fn test_registry() {
        let mut styles = CellStyles::new();
        assert_eq!(styles.len(), 1);
        assert_eq!(styles.id(""), Some(StyleId::DEFAULT));

        let bold = styles.get_or_create("bold");
        assert_eq!(styles.get_or_create("bold"), bold);
        assert_eq!(styles.name(bold), "bold");

        let mut header = CellStyle::default();
        header.set_wrap(true);
        let id = styles.copy_cell_style("header", &header);
        assert!(styles.get(id).is_wrap());
        assert_eq!(styles.names().collect::<Vec<_>>(), vec!["", "bold", "header"]);
    }
}
