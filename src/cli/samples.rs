//! Sample workbooks: a yearly calendar and a colour palette "kitchen sink"

use crate::error::MejaResult;
use crate::format::Locale;
use crate::model::{Color, FillPattern, FontDef, Workbook, PALETTE};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::info;

/// Columns per month block: week number plus seven days
const MONTH_COLS: usize = 8;
/// Rows per month block: name, weekday header and up to six weeks
const MONTH_ROWS: usize = 8;

pub const HOLIDAY_STYLE: &str = "holiday";
pub const CHRISTMAS_LINK: &str = "https://en.wikipedia.org/wiki/Christmas";

/// Week of the year as counted in `locale`.
///
/// Monday-first locales use ISO weeks. Sunday-first locales count the week
/// containing January 1st as week 1.
pub fn week_of_year(date: NaiveDate, locale: Locale) -> u32 {
    match locale.first_day_of_week() {
        Weekday::Mon => date.iso_week().week(),
        _ => {
            let next_jan1 = NaiveDate::from_ymd_opt(date.year() + 1, 1, 1);
            let days_left = next_jan1.map(|d| (d - date).num_days()).unwrap_or(i64::MAX);
            let to_saturday = 6 - date.weekday().num_days_from_sunday() as i64;
            if days_left <= to_saturday {
                return 1;
            }
            let jan1_offset = NaiveDate::from_ymd_opt(date.year(), 1, 1)
                .map(|d| d.weekday().num_days_from_sunday())
                .unwrap_or(0);
            (date.ordinal0() + jan1_offset) / 7 + 1
        }
    }
}

/// Calendar for `year`: twelve month blocks in two columns.
pub fn create_calendar(year: i32, locale: Locale) -> MejaResult<Workbook> {
    info!("creating calendar for {} ({})", year, locale);

    let mut workbook = Workbook::with_locale(locale);
    let holiday = workbook.cell_style(HOLIDAY_STYLE);
    {
        let style = workbook.style_mut(holiday);
        style.set_fill_fg_color(Color::INDIANRED.brighter());
        style.set_fill_pattern(FillPattern::Solid);
    }

    let first_day = locale.first_day_of_week();
    let sheet = workbook.create_sheet(&format!("{} calendar", year));

    for month in 1..=12u32 {
        let block = (month - 1) as usize;
        let mut i = (block / 2) * (MONTH_ROWS + 2);
        let j = (block % 2) * (MONTH_COLS + 1);

        sheet.cell_mut(i, j).set(locale.month_name(month, false));
        sheet.merge_cells(i, j, MONTH_COLS, 1)?;
        i += 1;

        let mut day = first_day;
        for d in 0..7 {
            let name: String = locale.weekday_name(day, false).chars().take(2).collect();
            sheet.cell_mut(i, j + d + 1).set(name);
            day = day.succ();
        }
        i += 1;

        let Some(first_of_month) = NaiveDate::from_ymd_opt(year, month, 1) else {
            continue;
        };
        let offset = (first_of_month.weekday().num_days_from_monday() as i64
            - first_day.num_days_from_monday() as i64)
            .rem_euclid(7) as usize;

        let mut date = first_of_month;
        while date.month() == month {
            let idx = offset + date.day0() as usize;
            let (ii, jj) = (idx / 7, idx % 7);

            let mut cell = sheet.cell_mut(i + ii, j + jj + 1);
            cell.set(date.day());
            if date.month() == 12 && date.day() == 25 {
                cell.set_style(holiday).set_hyperlink(CHRISTMAS_LINK);
            }

            if date.day() == 1 || date.weekday() == first_day {
                sheet.cell_mut(i + ii, j).set(week_of_year(date, locale));
            }
            date += Duration::days(1);
        }
    }

    Ok(workbook)
}

/// Palette workbook with fill colours and text colours.
pub fn create_kitchen_sink() -> MejaResult<Workbook> {
    let mut workbook = Workbook::new();
    add_color_sheet(&mut workbook);
    add_text_color_sheet(&mut workbook);
    Ok(workbook)
}

const HEADER: [&str; 4] = ["Color", "Code", "darker", "brighter"];

fn add_color_sheet(workbook: &mut Workbook) {
    info!("adding color sheet");

    let mut rows = Vec::with_capacity(PALETTE.len());
    for (name, color) in PALETTE {
        let mut fill = |style_name: String, c: Color| {
            let id = workbook.cell_style(&style_name);
            let style = workbook.style_mut(id);
            style.set_fill_fg_color(c);
            style.set_fill_pattern(FillPattern::Solid);
            id
        };
        let cs = fill(name.to_string(), *color);
        let dark = fill(format!("{}Dark", name), color.darker());
        let bright = fill(format!("{}Bright", name), color.brighter());
        rows.push((*name, *color, cs, dark, bright));
    }

    let sheet = workbook.create_sheet("colors");
    sheet.create_row(HEADER);
    sheet.split_at(1, 0);
    for (name, color, cs, dark, bright) in rows {
        let i = sheet.row_count();
        sheet.cell_mut(i, 0).set(name).set_style(cs);
        sheet.cell_mut(i, 1).set(color.to_string()).set_style(cs);
        sheet.cell_mut(i, 2).set("darker").set_style(dark);
        sheet.cell_mut(i, 3).set("brighter").set_style(bright);
    }

    auto_size_first_column(workbook);
}

fn add_text_color_sheet(workbook: &mut Workbook) {
    info!("adding text color sheet");

    let default_font = workbook.default_cell_style().font().clone();
    let mut rows = Vec::with_capacity(PALETTE.len());
    for (name, color) in PALETTE {
        let mut font = |style_name: String, c: Color| {
            let id = workbook.cell_style(&style_name);
            workbook
                .style_mut(id)
                .set_font(default_font.derive(&FontDef::color(c)));
            id
        };
        let cs = font(format!("font{}", name), *color);
        let dark = font(format!("font{}Dark", name), color.darker());
        let bright = font(format!("font{}Bright", name), color.brighter());
        rows.push((*name, *color, cs, dark, bright));
    }

    let sheet = workbook.create_sheet("text colors");
    sheet.create_row(HEADER);
    sheet.split_at(1, 0);
    for (name, color, cs, dark, bright) in rows {
        let i = sheet.row_count();
        sheet.cell_mut(i, 0).set(name).set_style(cs);
        sheet.cell_mut(i, 1).set(color.to_string()).set_style(cs);
        sheet.cell_mut(i, 2).set("darker").set_style(dark);
        sheet.cell_mut(i, 3).set("brighter").set_style(bright);
    }

    auto_size_first_column(workbook);
}

/// Auto-size column A of the most recently added sheet.
fn auto_size_first_column(workbook: &mut Workbook) {
    let locale = workbook.locale();
    let last = workbook.sheet_count().saturating_sub(1);
    if let Some((sheet, styles)) = workbook.sheet_with_styles_mut(last) {
        sheet.auto_size_column(0, styles, locale);
    }
}
