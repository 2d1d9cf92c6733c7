//! Report rendering: glyph tables, context windows, and connector diagrams.
//!
//! Layout parameters are fixed once per report at renderer construction (the
//! gutter must be wide enough for the largest displayed line number across
//! every file group), after which rendering is a single pass over the
//! report's groups. Rendering a validly built report never fails; only the
//! output writer can error.
//!
//! ```text
//!     header     ╶─┤ error[E1337]: Displaying a brief summary of what happened
//!     file_group ╶─┤    ╭╴demos/example.c╶─
//!     spacer     ╶─┤    ·
//!     line_group ╶┬┤  1 │ #include <stdio.h>
//!     w. labels   ╰┤    ·           ╰─────┴─▶ Relevant include to enable printf
//!     context    ╶─┤  3 │ int main() {
//!     line_group ╶┬┤  4 │     printf("Hello World!\n");
//!     w. labels   ││    ·     │    │ ╰──────────────┴─▶ The string that is
//!                 ││    ·     │    │                    getting printed
//!                 ╰┤    ·     ╰────┴─▶ The function doing the magic
//!     context    ╶─┤  5 │     return 0;
//!     spacer     ╶─┤    ·
//!     note       ╶─┤    │ Note: Diagnostic reports wrap long text.
//!     bottom     ╶─┤ ───╯
//! ```

use std::fmt::{self, Write};

use yansi::{Condition, Paint, Painted, Style};

use crate::metrics::visual_width;
use crate::report::{FileGroup, Label, LineGroup, Report, Severity};
use crate::source::Source;
use crate::wrap::wrap;

/// Context lines shown above and below an annotated line.
const LINE_PADDING: usize = 1;
/// Lower bound for label text width, so deep columns still make progress.
const MIN_TEXT_WRAP: usize = 10;
/// Assumed terminal width when the caller does not configure one.
const DEFAULT_TERMINAL_WIDTH: usize = 80;

const STYLE_ERROR: Style = Style::new().red().bold();
const STYLE_WARNING: Style = Style::new().yellow().bold();
const STYLE_INFO: Style = Style::new().cyan().bold();
const STYLE_UNKNOWN: Style = Style::new().white().bold();
const STYLE_GUTTER: Style = Style::new().bright_black();
const STYLE_PATH: Style = Style::new().green();
const STYLE_NOTE: Style = Style::new().cyan();

/// Glyphs used by the renderer, addressed by logical role only.
///
/// The layout algorithm never hard-codes a glyph; swapping this table is all
/// it takes to retarget the output (see [`GlyphSet::ascii`]).
#[derive(Debug, Clone)]
pub struct GlyphSet {
    /// Corner opening the first file header (`╭`).
    pub corner_top_left: &'static str,
    /// Corner closing the report (`╯`).
    pub corner_bottom_right: &'static str,
    /// Tee opening subsequent file headers (`├`).
    pub tee_right: &'static str,
    /// Cap between corner and path (`╴`).
    pub cap_left: &'static str,
    /// Cap after the path (`╶─`).
    pub cap_right: &'static str,
    /// Vertical bar: gutter separator and label guide lines (`│`).
    pub line_vertical: &'static str,
    /// Horizontal rule under a span (`─`).
    pub line_horizontal: &'static str,
    /// Elbow at a span's start column (`╰`).
    pub label_start: &'static str,
    /// Tee at a multi-column span's end column (`┴`).
    pub label_end: &'static str,
    /// Filler dot marking connector rows and elided context (`·`).
    pub filler: &'static str,
    /// Arrow pointing at the label text (`▶`).
    pub arrow_right: &'static str,
}

impl GlyphSet {
    /// Unicode box-drawing glyphs (the default).
    pub const fn unicode() -> Self {
        Self {
            corner_top_left: "╭",
            corner_bottom_right: "╯",
            tee_right: "├",
            cap_left: "╴",
            cap_right: "╶─",
            line_vertical: "│",
            line_horizontal: "─",
            label_start: "╰",
            label_end: "┴",
            filler: "·",
            arrow_right: "▶",
        }
    }

    /// Plain ASCII fallback for terminals without box-drawing support.
    pub const fn ascii() -> Self {
        Self {
            corner_top_left: "+",
            corner_bottom_right: "+",
            tee_right: "+",
            cap_left: "-",
            cap_right: "--",
            line_vertical: "|",
            line_horizontal: "~",
            label_start: "^",
            label_end: "^",
            filler: ".",
            arrow_right: ">",
        }
    }
}

impl Default for GlyphSet {
    fn default() -> Self {
        Self::unicode()
    }
}

/// Renderer configuration.
///
/// All output-affecting state lives here; there are no process-wide toggles.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Glyph table to draw with.
    pub glyphs: GlyphSet,
    /// Whether to emit ANSI colors.
    pub color: bool,
    /// Assumed terminal width in cells; wrapping never exceeds it.
    pub terminal_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            glyphs: GlyphSet::unicode(),
            color: false,
            terminal_width: DEFAULT_TERMINAL_WIDTH,
        }
    }
}

/// Plain-text renderer for diagnostic [`Report`]s.
///
/// Produces the aligned, compiler-style layout shown in the module docs.
pub struct TextRenderer {
    config: RenderConfig,
    /// Gutter width: widest displayed line number plus outer padding.
    padding: usize,
    /// Field width for right-aligned line numbers (`padding - 1`).
    snippet_width: usize,
    /// Cached run of `padding` spaces.
    margin: String,
}

impl TextRenderer {
    /// Initialize with layout parameters derived from `report` and the
    /// default configuration.
    pub fn new(report: &Report) -> Self {
        Self::with_config(report, RenderConfig::default())
    }

    /// Initialize with layout parameters derived from `report`.
    pub fn with_config(report: &Report, config: RenderConfig) -> Self {
        let padding = Self::widest_line_number(report.file_groups()) + 2;

        Self {
            config,
            padding,
            snippet_width: padding.saturating_sub(1),
            margin: " ".repeat(padding),
        }
    }

    /// Width of the widest 1-based line number any context window can show.
    fn widest_line_number(groups: &[FileGroup]) -> usize {
        let mut max_line = 0;
        for group in groups {
            // Line groups are ordered; the last key is the largest line.
            if let Some((&line, _)) = group.line_groups().last_key_value() {
                max_line = max_line.max(line);
            }
        }

        let display_line = max_line + 1 + LINE_PADDING;
        visual_width(&display_line.to_string())
    }

    /// Render `report` into a string.
    pub fn render_to_string(&self, report: &Report) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.render(report, &mut out);
        out
    }

    /// Render `report` into `out`.
    pub fn render<W: Write>(&self, report: &Report, out: &mut W) -> fmt::Result {
        self.render_header(report, out)?;

        for (position, group) in report.file_groups().iter().enumerate() {
            self.render_file_header(group, position == 0, out)?;
            self.render_file_group(group, out)?;
        }

        if let Some(note) = report.note() {
            self.render_footnote("Note", note, out)?;
        }
        if let Some(help) = report.help() {
            self.render_footnote("Help", help, out)?;
        }

        let rule = self.config.glyphs.line_horizontal.repeat(self.padding);
        writeln!(
            out,
            "{}{}",
            self.paint(&rule, STYLE_GUTTER),
            self.paint(self.config.glyphs.corner_bottom_right, STYLE_GUTTER)
        )
    }

    /// `severity[code]: message`, wrapped to the remaining terminal width.
    fn render_header<W: Write>(&self, report: &Report, out: &mut W) -> fmt::Result {
        let style = severity_style(report.severity());
        let keyword = report.severity().keyword();
        write!(out, "{}", self.paint(keyword, style))?;
        let mut header_width = visual_width(keyword);

        if let Some(code) = report.code() {
            let bracketed = format!("[{code}]");
            write!(out, "{}", self.paint(&bracketed, style))?;
            header_width += visual_width(&bracketed);
        }

        write!(out, ": ")?;
        header_width += 2;

        let available = self
            .config
            .terminal_width
            .saturating_sub(header_width)
            .max(MIN_TEXT_WRAP);
        self.write_wrapped(report.message(), &" ".repeat(header_width), available, out)
    }

    /// `╭╴path╶─` for the first group, `├╴path╶─` for the rest.
    fn render_file_header<W: Write>(
        &self,
        group: &FileGroup,
        first: bool,
        out: &mut W,
    ) -> fmt::Result {
        let glyphs = &self.config.glyphs;
        let corner = if first {
            glyphs.corner_top_left
        } else {
            glyphs.tee_right
        };
        let lead = format!("{}{}", corner, glyphs.cap_left);
        let path = group.source().path();

        writeln!(
            out,
            "{}{}{}{}",
            self.margin,
            self.paint(&lead, STYLE_GUTTER),
            self.paint(&path, STYLE_PATH),
            self.paint(glyphs.cap_right, STYLE_GUTTER)
        )?;

        if first {
            writeln!(
                out,
                "{}{}",
                self.margin,
                self.paint(glyphs.filler, STYLE_GUTTER)
            )?;
        }

        Ok(())
    }

    /// Context windows around each annotated line, with gap markers between
    /// non-touching windows.
    fn render_file_group<W: Write>(&self, group: &FileGroup, out: &mut W) -> fmt::Result {
        let source = group.source();
        let line_count = source.line_count();
        let lines: Vec<usize> = group.line_groups().keys().copied().collect();

        let mut highest_printed: Option<usize> = None;

        for (position, (&line, line_group)) in group.line_groups().iter().enumerate() {
            let next_line = lines.get(position + 1).copied().unwrap_or(line_count);

            // Clamp the window to the text, and to the midpoints towards the
            // neighbouring groups so adjacent windows share no line.
            let window_start = match position.checked_sub(1).map(|p| lines[p]) {
                Some(previous) => (previous + 1).max(line.saturating_sub(LINE_PADDING)),
                None => line.saturating_sub(LINE_PADDING),
            };
            let window_end = (line + LINE_PADDING)
                .min(next_line.saturating_sub(1))
                .min(line_count.saturating_sub(1));

            if let Some(highest) = highest_printed {
                if window_start > highest + 1 {
                    writeln!(
                        out,
                        "{}{} ",
                        self.margin,
                        self.paint(self.config.glyphs.filler, STYLE_GUTTER)
                    )?;
                }
            }

            for current in window_start..=window_end {
                let needed = highest_printed.is_none_or(|highest| current > highest);
                if needed {
                    let text = source.line(current).unwrap_or_default();
                    let number = format!("{:>width$}", current + 1, width = self.snippet_width);
                    writeln!(
                        out,
                        "{} {} {}",
                        self.paint(&number, STYLE_GUTTER),
                        self.paint(self.config.glyphs.line_vertical, STYLE_GUTTER),
                        text
                    )?;
                    highest_printed = Some(current);
                }

                if current == line {
                    self.render_line_group(line_group, out)?;
                }
            }
        }

        writeln!(
            out,
            "{}{} ",
            self.margin,
            self.paint(self.config.glyphs.filler, STYLE_GUTTER)
        )
    }

    /// The nested connector diagram below one annotated line.
    ///
    /// Labels are drawn from the largest end column inwards; labels not yet
    /// drawn thread vertical guide bars through the rows above their own.
    fn render_line_group<W: Write>(&self, line_group: &LineGroup, out: &mut W) -> fmt::Result {
        let labels = line_group.labels();

        for (position, active) in labels.iter().enumerate().rev() {
            // Reserved cells left of the text: the margin-and-filler prefix
            // plus everything up to and including the arrow glyphs.
            let end_column = active.span().end().column();
            let reserved = (end_column + 4) + (self.padding + 1);
            let available = self
                .config
                .terminal_width
                .saturating_sub(reserved)
                .max(MIN_TEXT_WRAP);
            let text_lines = wrap(active.text(), available);

            for (text_index, text_line) in text_lines.iter().enumerate() {
                write!(
                    out,
                    "{}{} ",
                    self.margin,
                    self.paint(self.config.glyphs.filler, STYLE_GUTTER)
                )?;

                let mut row = String::new();
                let mut column = 0;
                for passive in &labels[..position] {
                    column = self.draw_guides(&mut row, passive, column);
                }
                self.draw_connector(&mut row, active, text_index == 0, column, text_line);

                writeln!(out, "{row}")?;
            }
        }

        Ok(())
    }

    /// Guide bars for a label that is drawn on a later row.
    ///
    /// Returns the column the cursor ends on.
    fn draw_guides(&self, row: &mut String, label: &Label, column_start: usize) -> usize {
        let glyphs = &self.config.glyphs;
        let start = label.span().start().column();
        let arrow = arrow_column(label);

        for column in column_start..arrow {
            if column == start {
                row.push_str(glyphs.line_vertical);
            } else {
                row.push(' ');
            }
        }
        row.push_str(glyphs.line_vertical);

        arrow + 1
    }

    /// The active label's own glyph run and (wrapped) text.
    fn draw_connector(
        &self,
        row: &mut String,
        label: &Label,
        first_line: bool,
        column_start: usize,
        text: &str,
    ) {
        let glyphs = &self.config.glyphs;
        let start = label.span().start().column();
        let end = label.span().end().column();
        let arrow = arrow_column(label);

        for column in column_start..arrow {
            if !first_line {
                row.push(' ');
            } else if column == start {
                row.push_str(glyphs.label_start);
            } else if column > start {
                row.push_str(glyphs.line_horizontal);
            } else {
                row.push(' ');
            }
        }

        if first_line {
            if end > start + 1 {
                row.push_str(glyphs.label_end);
                row.push_str(glyphs.line_horizontal);
            } else if end == start + 1 {
                row.push_str(glyphs.label_start);
                row.push_str(glyphs.line_horizontal);
            } else {
                // Zero-width caret: elbow only, no horizontal rule.
                row.push_str(glyphs.label_start);
            }
            row.push_str(glyphs.arrow_right);
            row.push(' ');
        } else {
            // Blank padding as wide as the elbow/rule/arrow prefix.
            let pad = if end > start { 4 } else { 3 };
            for _ in 0..pad {
                row.push(' ');
            }
        }

        row.push_str(text);
    }

    /// `│ Note: text`, continuations aligned under the text start.
    fn render_footnote<W: Write>(&self, keyword: &str, text: &str, out: &mut W) -> fmt::Result {
        let glyphs = &self.config.glyphs;
        let head = format!("{keyword}: ");
        let indent = " ".repeat(1 + visual_width(&head));

        let continuation = format!("{}{}{}", self.margin, glyphs.line_vertical, indent);
        let available = self
            .config
            .terminal_width
            .saturating_sub(visual_width(&continuation))
            .max(MIN_TEXT_WRAP);

        let lines = wrap(text, available);

        write!(
            out,
            "{}{} {}",
            self.margin,
            self.paint(glyphs.line_vertical, STYLE_GUTTER),
            self.paint(&head, STYLE_NOTE)
        )?;
        match lines.first() {
            Some(first) => writeln!(out, "{first}")?,
            None => writeln!(out)?,
        }

        for line in lines.iter().skip(1) {
            writeln!(
                out,
                "{}{}{}{}",
                self.margin,
                self.paint(glyphs.line_vertical, STYLE_GUTTER),
                indent,
                line
            )?;
        }

        Ok(())
    }

    /// First line then continuation lines behind `continuation_prefix`.
    fn write_wrapped<W: Write>(
        &self,
        text: &str,
        continuation_prefix: &str,
        max_width: usize,
        out: &mut W,
    ) -> fmt::Result {
        let lines = wrap(text, max_width);

        match lines.first() {
            Some(first) => writeln!(out, "{first}")?,
            None => writeln!(out)?,
        }

        for line in lines.iter().skip(1) {
            writeln!(out, "{continuation_prefix}{line}")?;
        }

        Ok(())
    }

    /// Apply `style` when colors are enabled, pass through verbatim
    /// otherwise.
    fn paint<'a>(&self, text: &'a str, style: Style) -> Painted<&'a str> {
        let condition = if self.config.color {
            Condition::ALWAYS
        } else {
            Condition::NEVER
        };
        text.paint(style).whenever(condition)
    }
}

/// Column of the arrow/tee glyph: the last covered column, or the span start
/// for zero-width carets.
fn arrow_column(label: &Label) -> usize {
    let span = label.span();
    span.end()
        .column()
        .saturating_sub(1)
        .max(span.start().column())
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Error => STYLE_ERROR,
        Severity::Warning => STYLE_WARNING,
        Severity::Info => STYLE_INFO,
        Severity::Unknown => STYLE_UNKNOWN,
    }
}
