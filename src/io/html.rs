//! HTML export
//!
//! A workbook becomes a single document with a tab bar and one table per
//! sheet. Each cell style is rendered as a CSS class, so the generated ids
//! are prefixed with a per-document workbook id to allow embedding several
//! exported workbooks in one page.

use crate::error::MejaResult;
use crate::format::Locale;
use crate::model::{Cell, CellStyle, Direction, FillPattern, Sheet, StyleId, Workbook};
use std::collections::BTreeMap;
use std::io::Write;
use url::Url;
use uuid::Uuid;

const COMMON_CSS: &str = r#".meja-tabbar {
  overflow: hidden;
  border: 1px solid #ccc;
  background-color: #f1f1f1;
}
.meja-tabbar button {
  background-color: inherit;
  float: left;
  border: none;
  outline: none;
  cursor: pointer;
  padding: 14px 16px;
  transition: 0.3s;
}
.meja-tabbar button:hover {
  background-color: #ddd;
}
.meja-tabbar button.active {
  background-color: #ccc;
}
.meja-tab {
  display: none;
  padding: 6px 12px;
  border: 1px solid #ccc;
  border-top: none;
}
table.meja-sheet {
  border-collapse: collapse;
  table-layout: fixed;
  padding: 3px;
  white-space: pre;
  overflow: visible;
 "#;

const COMMON_CSS_END: &str = r#"
}
table.meja-sheet td,th {
  border: 1px solid #d4d4d4;
  max-width: 0;
  max-height: 0;
}
table.meja-sheet a {
  color: inherit;
}
table.meja-sheet td:empty::after{
  content: "\00a0";
}
"#;

const SHOW_TAB_SCRIPT: &str = r#"</head>
<body>
  <script>
  function mejaShowTab(evt, tabName) {
    let i, tabs, tablinks;
    tabs = document.getElementsByClassName("meja-tab");
    for (i = 0; i < tabs.length; i++) {
      tabs[i].style.display = "none";
    }
    tablinks = document.getElementsByClassName("meja-tablink");
    for (i = 0; i < tablinks.length; i++) {
      tablinks[i].className = tablinks[i].className.replace(" active", "");
    }
    document.getElementById(tabName).style.display = "block";
    evt.currentTarget.className += " active";
  }
  </script>
"#;

/// Writes workbooks and sheets as HTML.
#[derive(Debug, Clone)]
pub struct HtmlWriter {
    workbook_id: String,
    locale: Locale,
}

impl HtmlWriter {
    /// Writer with a fresh random workbook id.
    pub fn new(locale: Locale) -> Self {
        HtmlWriter::with_id(format!("W{}", Uuid::new_v4().simple()), locale)
    }

    /// Writer with a fixed workbook id, for reproducible output.
    pub fn with_id(workbook_id: impl Into<String>, locale: Locale) -> Self {
        HtmlWriter {
            workbook_id: workbook_id.into(),
            locale,
        }
    }

    pub fn workbook_id(&self) -> &str {
        &self.workbook_id
    }

    /// CSS class of a cell style.
    pub fn style_class(&self, style_name: &str) -> String {
        format!("{}_CS{}", self.workbook_id, hex(style_name))
    }

    /// Element id of a sheet's `<div>`.
    pub fn sheet_id(&self, sheet: &Sheet) -> String {
        format!("{}_S{}", self.workbook_id, hex(sheet.name()))
    }

    /// Write the complete workbook as an HTML document.
    pub fn write<W: Write>(&self, workbook: &Workbook, mut out: W) -> MejaResult<()> {
        write_header_start(&mut out)?;
        writeln!(out, "  <style>")?;
        write_common_css(&mut out, workbook.default_cell_style())?;
        for (_, name, style) in workbook.styles().iter() {
            self.write_cell_style(&mut out, name, style)?;
        }
        writeln!(out, "  </style>")?;
        write!(out, "{}", SHOW_TAB_SCRIPT)?;

        writeln!(out, "<div class=\"meja-tabbar\">")?;
        let current = workbook.current_sheet_index();
        for (idx, sheet) in workbook.sheets().enumerate() {
            let cls = if idx == current {
                "meja-tablink active"
            } else {
                "meja-tablink"
            };
            writeln!(
                out,
                "  <button class=\"{}\" onclick=\"mejaShowTab(event, '{}')\">{}</button>",
                cls,
                self.sheet_id(sheet),
                escape(sheet.name())
            )?;
        }
        writeln!(out, "</div>")?;

        let single = workbook.sheet_count() < 2;
        for (idx, sheet) in workbook.sheets().enumerate() {
            self.write_sheet_table(&mut out, workbook, sheet, single || idx == current)?;
        }

        write_footer(&mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Write one sheet; with `with_header` as a complete document including
    /// the CSS of the styles used in the sheet.
    pub fn write_sheet<W: Write>(
        &self,
        workbook: &Workbook,
        sheet: &Sheet,
        mut out: W,
        with_header: bool,
    ) -> MejaResult<()> {
        if with_header {
            write_header_start(&mut out)?;
            self.write_css_for_sheet(&mut out, workbook, sheet, true)?;
            write!(out, "{}", SHOW_TAB_SCRIPT)?;
        }
        self.write_sheet_table(&mut out, workbook, sheet, true)?;
        if with_header {
            write_footer(&mut out)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Write the sheets accepted by `filter` as one document without a tab bar.
    pub fn write_sheets<W: Write>(
        &self,
        workbook: &Workbook,
        mut out: W,
        filter: impl Fn(&Sheet) -> bool,
    ) -> MejaResult<()> {
        let sheets: Vec<&Sheet> = workbook.sheets().filter(|s| filter(s)).collect();

        write_header_start(&mut out)?;
        for (idx, sheet) in sheets.iter().enumerate() {
            self.write_css_for_sheet(&mut out, workbook, sheet, idx == 0)?;
        }
        write!(out, "{}", SHOW_TAB_SCRIPT)?;
        for sheet in &sheets {
            self.write_sheet_table(&mut out, workbook, sheet, true)?;
        }
        write_footer(&mut out)?;
        out.flush()?;
        Ok(())
    }

    fn write_cell_style(&self, out: &mut impl Write, name: &str, style: &CellStyle) -> MejaResult<()> {
        write!(out, "    .{} {{", self.style_class(name))?;
        write_style_attributes(out, style)?;
        writeln!(out, " }}")?;
        Ok(())
    }

    /// Styles used in `sheet`, sorted by name for reproducible output.
    fn write_css_for_sheet(
        &self,
        out: &mut impl Write,
        workbook: &Workbook,
        sheet: &Sheet,
        with_common: bool,
    ) -> MejaResult<()> {
        writeln!(out, "  <style>")?;
        if with_common {
            write_common_css(out, workbook.default_cell_style())?;
        }
        let styles = workbook.styles();
        let used: BTreeMap<&str, &CellStyle> = sheet
            .rows()
            .flat_map(|row| row.cells())
            .map(|cell| (styles.name(cell.style_id()), styles.get(cell.style_id())))
            .collect();
        for (name, style) in used {
            self.write_cell_style(out, name, style)?;
        }
        writeln!(out, "  </style>")?;
        Ok(())
    }

    fn write_sheet_table(
        &self,
        out: &mut impl Write,
        workbook: &Workbook,
        sheet: &Sheet,
        visible: bool,
    ) -> MejaResult<()> {
        let base = workbook.uri().and_then(|uri| uri.join("").ok());
        let (cls, display) = if visible {
            ("meja-tab active", "block")
        } else {
            ("meja-tab", "none")
        };

        writeln!(
            out,
            "<div id=\"{}\" class=\"{}\" style=\"display: {}\">",
            self.sheet_id(sheet),
            cls,
            display
        )?;
        writeln!(out, "  <table class=\"meja-sheet\">")?;

        writeln!(out, "    <colgroup>")?;
        for j in 0..sheet.column_count() {
            writeln!(out, "<col style=\"width: {:.2}pt;\">", sheet.column_width(j))?;
        }
        writeln!(out, "    </colgroup>")?;

        writeln!(out, "    <tbody>")?;
        for row in sheet.rows() {
            writeln!(
                out,
                "      <tr style=\"height: {:.2}pt;\">",
                sheet.row_height(row.row_number())
            )?;
            let mut j = 0;
            for cell in row.cells() {
                if cell.horizontal_span() == 0 || cell.vertical_span() == 0 {
                    continue;
                }
                while j < cell.column_number() {
                    if !row.cell(j).is_some_and(Cell::is_merged) {
                        writeln!(out, "        <td></td>")?;
                    }
                    j += 1;
                }
                self.write_cell(out, workbook, cell, base.as_ref())?;
                j += cell.horizontal_span();
            }
            writeln!(out, "    </tr>")?;
        }
        writeln!(out, "    </tbody>")?;
        writeln!(out, "  </table>")?;
        writeln!(out, "</div>")?;
        Ok(())
    }

    fn write_cell(
        &self,
        out: &mut impl Write,
        workbook: &Workbook,
        cell: &Cell,
        base: Option<&Url>,
    ) -> MejaResult<()> {
        write!(out, "        <td")?;
        if cell.horizontal_span() > 1 {
            write!(out, " colspan=\"{}\"", cell.horizontal_span())?;
        }
        if cell.vertical_span() > 1 {
            write!(out, " rowspan=\"{}\"", cell.vertical_span())?;
        }
        if cell.style_id() != StyleId::DEFAULT {
            let name = workbook.styles().name(cell.style_id());
            write!(out, " class=\"{}\"", self.style_class(name))?;
        }
        write!(out, ">")?;

        let href = cell.hyperlink().map(|link| relative_link(link, base));
        if let Some(href) = &href {
            write!(out, "<a href=\"{}\">", escape(href))?;
        }
        write!(out, "{}", escape(&cell.format(workbook.styles(), self.locale)))?;
        if href.is_some() {
            write!(out, "</a>")?;
        }
        writeln!(out, "</td>")?;
        Ok(())
    }
}

fn write_header_start(out: &mut impl Write) -> MejaResult<()> {
    writeln!(out, "<html>\n<head>\n  <meta charset=\"utf-8\">")?;
    Ok(())
}

fn write_footer(out: &mut impl Write) -> MejaResult<()> {
    writeln!(out, "</body>\n</html>")?;
    Ok(())
}

fn write_common_css(out: &mut impl Write, default_style: &CellStyle) -> MejaResult<()> {
    write!(out, "{}", COMMON_CSS)?;
    write_style_attributes(out, default_style)?;
    write!(out, "{}", COMMON_CSS_END)?;
    Ok(())
}

fn write_style_attributes(out: &mut impl Write, style: &CellStyle) -> MejaResult<()> {
    write!(out, " {} ", style.font().css_style())?;
    write!(out, "{} ", style.halign().css_style())?;
    write!(out, "{}", style.valign().css_style())?;

    let alpha = style.rotation();
    if alpha != 0 {
        let origin = if alpha > 0 { "bottom left" } else { "top left" };
        write!(
            out,
            " transform-origin: {}; transform: rotate({}deg);",
            origin, -alpha
        )?;
    }

    for d in Direction::ALL {
        let border = style.border_style(d);
        if !border.color.is_transparent() && border.width > 0.0 {
            write!(
                out,
                " border-{}: {:.2}pt solid {} !important;",
                d.css_name(),
                border.width,
                border.color.to_css()
            )?;
        }
    }

    if style.fill_pattern() != FillPattern::None {
        write!(out, " background-color: {};", style.fill_fg_color().to_css())?;
    }
    if style.is_wrap() {
        write!(out, " white-space: pre-wrap; overflow-wrap: break-word;")?;
    }
    Ok(())
}

/// Link target relative to the workbook location where possible.
fn relative_link(link: &str, base: Option<&Url>) -> String {
    base.and_then(|base| {
        let target = base.join(link).ok()?;
        base.make_relative(&target)
    })
    .unwrap_or_else(|| link.to_string())
}

fn hex(text: &str) -> String {
    text.bytes().map(|b| format!("{:02x}", b)).collect()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BorderStyle, Color};

    fn render(workbook: &Workbook) -> String {
        let mut out = Vec::new();
        HtmlWriter::with_id("Wtest", Locale::EnUs)
            .write(workbook, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_ids() {
        let writer = HtmlWriter::with_id("W1", Locale::Root);
        assert_eq!(writer.style_class("bold"), "W1_CS626f6c64");
        assert_eq!(writer.style_class(""), "W1_CS");

        let random = HtmlWriter::new(Locale::Root);
        assert!(random.workbook_id().starts_with('W'));
        assert_eq!(random.workbook_id().len(), 33);
    }

    #[test]
    fn test_document_structure() {
        let mut wb = Workbook::new();
        wb.create_sheet("one").create_row(["a <b>", "c"]);
        wb.create_sheet("two").create_row([1.5]);
        wb.set_current_sheet(1).unwrap();

        let html = render(&wb);
        assert!(html.starts_with("<html>\n<head>\n  <meta charset=\"utf-8\">\n"));
        assert!(html.ends_with("</body>\n</html>\n"));
        assert!(html.contains("<div class=\"meja-tabbar\">"));
        assert!(html.contains(
            "  <button class=\"meja-tablink\" onclick=\"mejaShowTab(event, 'Wtest_S6f6e65')\">one</button>\n"
        ));
        assert!(html.contains("<button class=\"meja-tablink active\" onclick=\"mejaShowTab(event, 'Wtest_S74776f')\">two</button>"));
        assert!(html.contains("<div id=\"Wtest_S6f6e65\" class=\"meja-tab\" style=\"display: none\">"));
        assert!(html.contains("<div id=\"Wtest_S74776f\" class=\"meja-tab active\" style=\"display: block\">"));
        assert!(html.contains("<col style=\"width: 80.00pt;\">"));
        assert!(html.contains("      <tr style=\"height: 12.00pt;\">\n"));
        assert!(html.contains("<td>a &lt;b&gt;</td>"));
        assert!(html.contains("<td>1.5</td>"));
        assert!(html.contains("function mejaShowTab(evt, tabName)"));
    }

    #[test]
    fn test_styles_and_merges() {
        let mut wb = Workbook::new();
        let header = wb.cell_style("header");
        {
            let style = wb.style_mut(header);
            style.set_fill_pattern(FillPattern::Solid);
            style.set_fill_fg_color(Color::INDIANRED);
            style.set_border_style(Direction::South, BorderStyle::new(1.5, Color::BLACK));
            style.set_wrap(true);
        }
        let sheet = wb.create_sheet("s");
        sheet.cell_mut(0, 0).set("title").set_style(header);
        sheet.merge_cells(0, 0, 2, 2).unwrap();
        sheet.cell_mut(1, 2).set("x");

        let html = render(&wb);
        assert!(html.contains(".Wtest_CS686561646572 {"));
        assert!(html.contains(" border-bottom: 1.50pt solid #000000 !important;"));
        assert!(html.contains(" background-color: #cd5c5c;"));
        assert!(html.contains(" white-space: pre-wrap; overflow-wrap: break-word;"));
        assert!(html.contains(
            "<td colspan=\"2\" rowspan=\"2\" class=\"Wtest_CS686561646572\">title</td>"
        ));
        // the second row holds only the merged members and "x"
        let second_row = html.split("<tr").nth(2).unwrap();
        assert_eq!(second_row.matches("<td").count(), 1);
        assert!(second_row.contains("<td>x</td>"));
    }

    #[test]
    fn test_relative_hyperlinks() {
        let mut wb = Workbook::new();
        wb.set_uri(Some(Url::parse("file:///home/user/book.xlsx").unwrap()));
        let sheet = wb.create_sheet("links");
        sheet
            .cell_mut(0, 0)
            .set("local")
            .set_hyperlink("file:///home/user/data/other.html");
        sheet
            .cell_mut(0, 1)
            .set("remote")
            .set_hyperlink("https://example.com/?a=1&b=2");

        let html = render(&wb);
        assert!(html.contains("<a href=\"data/other.html\">local</a>"));
        assert!(html.contains("<a href=\"https://example.com/?a=1&amp;b=2\">remote</a>"));
    }

    #[test]
    fn test_single_sheet_export() {
        let mut wb = Workbook::new();
        let bold = wb.cell_style("bold");
        wb.cell_style("unused");
        let sheet = wb.create_sheet("only");
        sheet.cell_mut(0, 0).set("x").set_style(bold);

        let writer = HtmlWriter::with_id("W", Locale::Root);
        let mut with_header = Vec::new();
        writer
            .write_sheet(&wb, wb.sheet(0).unwrap(), &mut with_header, true)
            .unwrap();
        let html = String::from_utf8(with_header).unwrap();
        assert!(html.starts_with("<html>"));
        assert!(html.contains(".W_CS626f6c64 {"));
        assert!(!html.contains(&writer.style_class("unused")));
        assert!(!html.contains("meja-tabbar\">"));

        let mut bare = Vec::new();
        writer
            .write_sheet(&wb, wb.sheet(0).unwrap(), &mut bare, false)
            .unwrap();
        let html = String::from_utf8(bare).unwrap();
        assert!(html.starts_with("<div id=\"W_S6f6e6c79\""));
    }
}
