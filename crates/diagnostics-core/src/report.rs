//! The diagnostic model: labels grouped per source and per line.
//!
//! A [`Report`] is assembled through [`ReportBuilder`], which indexes every
//! label under its source's [`FileGroup`](crate::FileGroup) and its line's
//! [`LineGroup`](crate::LineGroup) as it is added. Structural problems
//! (empty label text, overlapping spans) surface at the offending builder
//! call, never at render time: a built report renders unconditionally.
//!
//! File groups keep first-insertion order, so multi-file reports render
//! deterministically in the order the caller introduced each source.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::DiagnosticError;
use crate::source::{SharedSource, Source};
use crate::span::Span;

/// Importance of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Serious problem that usually prevents progress.
    Error,
    /// Suspicious or suboptimal situation.
    Warning,
    /// Informational message.
    Info,
    /// Unspecified or not set.
    #[default]
    Unknown,
}

impl Severity {
    /// Lowercase keyword used in rendered headers.
    pub fn keyword(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A short textual annotation attached to a [`Span`].
#[derive(Debug, Clone)]
pub struct Label {
    text: String,
    span: Span,
}

impl Label {
    fn new(text: String, span: Span) -> Self {
        Self { text, span }
    }

    /// The message displayed next to the span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The span this label highlights.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// 0-based line the label is anchored to.
    pub fn line(&self) -> usize {
        self.span.line()
    }
}

/// All labels anchored to one source line, ordered by span start.
#[derive(Debug)]
pub struct LineGroup {
    line_number: usize,
    labels: Vec<Label>,
}

impl LineGroup {
    fn new(line_number: usize) -> Self {
        Self {
            line_number,
            labels: Vec::new(),
        }
    }

    /// 0-based line number of this group.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Labels in ascending span-start order.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Insert a label, rejecting spans that intersect an existing label.
    fn insert(&mut self, label: Label) -> Result<(), DiagnosticError> {
        if self.labels.iter().any(|l| l.span().intersects(label.span())) {
            return Err(DiagnosticError::OverlappingLabels {
                line: self.line_number,
            });
        }

        let key = span_order(&label);
        let position = self.labels.partition_point(|l| span_order(l) <= key);
        self.labels.insert(position, label);
        Ok(())
    }
}

fn span_order(label: &Label) -> (usize, usize) {
    (label.span().start().index(), label.span().end().index())
}

/// All [`LineGroup`]s belonging to one source.
#[derive(Debug)]
pub struct FileGroup {
    source: SharedSource,
    line_groups: BTreeMap<usize, LineGroup>,
}

impl FileGroup {
    fn new(source: SharedSource) -> Self {
        Self {
            source,
            line_groups: BTreeMap::new(),
        }
    }

    /// The source this group refers to.
    pub fn source(&self) -> &SharedSource {
        &self.source
    }

    /// Line groups keyed by 0-based line number, in ascending order.
    pub fn line_groups(&self) -> &BTreeMap<usize, LineGroup> {
        &self.line_groups
    }
}

/// A fully constructed diagnostic, ready to render.
#[derive(Debug)]
pub struct Report {
    message: String,
    code: Option<String>,
    severity: Severity,
    file_groups: Vec<FileGroup>,
    note: Option<String>,
    help: Option<String>,
}

impl Report {
    /// Start building a report.
    pub fn builder() -> ReportBuilder {
        ReportBuilder::new()
    }

    /// Primary diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Optional error code or identifier.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Severity of this report.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// File groups in first-insertion order.
    pub fn file_groups(&self) -> &[FileGroup] {
        &self.file_groups
    }

    /// Optional note with additional context.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Optional help text with suggestions.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

/// Fluent builder for [`Report`]s.
///
/// Labels are validated and indexed as they are added; the fallible calls
/// return `Result<Self, _>` so construction chains with `?`:
///
/// ```
/// use std::sync::Arc;
/// use diagnostics_core::{MemorySource, Report, Severity, Span};
///
/// let source: Arc<dyn diagnostics_core::Source> =
///     Arc::new(MemorySource::new("let x = 1;\n", "demo.rs"));
/// let report = Report::builder()
///     .severity(Severity::Warning)
///     .message("unused variable")
///     .label("declared here", Span::from_indices(Arc::clone(&source), 4, 5)?)?
///     .build()?;
/// assert_eq!(report.file_groups().len(), 1);
/// # Ok::<(), diagnostics_core::DiagnosticError>(())
/// ```
#[derive(Debug, Default)]
pub struct ReportBuilder {
    message: Option<String>,
    code: Option<String>,
    severity: Severity,
    file_groups: Vec<FileGroup>,
    note: Option<String>,
    help: Option<String>,
}

impl ReportBuilder {
    /// Create an empty builder (severity defaults to
    /// [`Severity::Unknown`]).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the severity.
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the main diagnostic message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set an error code or identifier (e.g. `"E1337"`).
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set a note shown below the snippets.
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Set a help text shown below the snippets.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Add a label for `span` with the given text.
    ///
    /// Fails with [`DiagnosticError::EmptyLabelText`] for an empty message
    /// and [`DiagnosticError::OverlappingLabels`] if the span intersects a
    /// label already present on the same line of the same source.
    pub fn label(mut self, text: impl Into<String>, span: Span) -> Result<Self, DiagnosticError> {
        let text = text.into();
        if text.is_empty() {
            return Err(DiagnosticError::EmptyLabelText);
        }

        let line = span.line();
        let id = span.source().id();
        let index = match self.file_groups.iter().position(|g| g.source().id() == id) {
            Some(index) => index,
            None => {
                self.file_groups.push(FileGroup::new(Arc::clone(span.source())));
                self.file_groups.len() - 1
            }
        };

        self.file_groups[index]
            .line_groups
            .entry(line)
            .or_insert_with(|| LineGroup::new(line))
            .insert(Label::new(text, span))?;

        Ok(self)
    }

    /// Finish the report.
    ///
    /// Fails with [`DiagnosticError::IncompleteReport`] if no message was
    /// set.
    pub fn build(self) -> Result<Report, DiagnosticError> {
        let message = self.message.ok_or(DiagnosticError::IncompleteReport)?;

        Ok(Report {
            message,
            code: self.code,
            severity: self.severity,
            file_groups: self.file_groups,
            note: self.note,
            help: self.help,
        })
    }
}
