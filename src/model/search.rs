use crate::format::Locale;
use crate::model::{Cell, CellStyles, CellValue};

/// Options for [`Sheet::find`](crate::model::Sheet::find) and
/// [`Row::find`](crate::model::Row::find).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchSettings {
    /// Start after the sheet's current cell instead of at A1
    pub search_from_current: bool,
    pub ignore_case: bool,
    /// The whole cell text must match, not just a part of it
    pub match_complete: bool,
    /// Make the found cell the current cell
    pub update_current: bool,
    /// Compare formula cells by their formula text
    pub search_formula: bool,
}

impl SearchSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_from_current(mut self) -> Self {
        self.search_from_current = true;
        self
    }

    pub fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    pub fn match_complete(mut self) -> Self {
        self.match_complete = true;
        self
    }

    pub fn update_current(mut self) -> Self {
        self.update_current = true;
        self
    }

    pub fn search_formula(mut self) -> Self {
        self.search_formula = true;
        self
    }
}

/// Compiled search: the needle prepared once, matched against many cells.
pub(crate) struct Matcher<'a> {
    needle: String,
    settings: SearchSettings,
    styles: &'a CellStyles,
    locale: Locale,
}

impl<'a> Matcher<'a> {
    pub(crate) fn new(text: &str, settings: SearchSettings, styles: &'a CellStyles, locale: Locale) -> Self {
        let needle = if settings.ignore_case {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        Matcher {
            needle,
            settings,
            styles,
            locale,
        }
    }

    /// Missing cells are treated as blank.
    pub(crate) fn matches(&self, cell: Option<&Cell>) -> bool {
        let text = match cell {
            None => String::new(),
            Some(c) => match c.value() {
                CellValue::Formula(f) if self.settings.search_formula => f.clone(),
                _ => c.format(self.styles, self.locale),
            },
        };
        let text = if self.settings.ignore_case {
            text.to_lowercase()
        } else {
            text
        };

        if self.settings.match_complete {
            text == self.needle
        } else {
            text.contains(&self.needle)
        }
    }
}
