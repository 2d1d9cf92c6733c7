#![warn(missing_docs)]
//! Diagnostics Core - Compiler-Style Terminal Diagnostics Renderer
//!
//! # Overview
//!
//! `diagnostics-core` renders compiler/linter-style diagnostics: given a
//! message, a severity, and a set of labels anchored to byte ranges in one or
//! more sources, it produces an aligned, human-readable terminal report with
//! gutter line numbers, connector glyphs, and word-wrapped annotation text.
//!
//! # Core Features
//!
//! - **Byte-Accurate Positions**: `Location` triples (row, column, byte
//!   index) constructed only through a `Source`, so coordinates always agree
//! - **Fast Line Index**: Rope-based source access, O(log n) offset/line
//!   conversion
//! - **Per-Line Label Layout**: nested connector diagrams with guide lines
//!   when several labels annotate one source line
//! - **UTF-8-Aware Wrapping**: visual-width measurement that never desyncs,
//!   even on malformed byte input
//! - **Explicit Configuration**: glyph table (Unicode or ASCII), color
//!   on/off, and terminal width are plain values on `RenderConfig`
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  TextRenderer (windows, connectors, color)  │  ← Rendered Output
//! ├─────────────────────────────────────────────┤
//! │  Report / FileGroup / LineGroup + Builder   │  ← Diagnostic Model
//! ├─────────────────────────────────────────────┤
//! │  Span & Label (half-open byte ranges)       │  ← Position Model
//! ├─────────────────────────────────────────────┤
//! │  Source (MemorySource / FileSource)         │  ← Text Access
//! ├─────────────────────────────────────────────┤
//! │  Text Metrics & Word Wrap                   │  ← Measurement
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use diagnostics_core::{MemorySource, Report, Severity, Source, Span, TextRenderer};
//!
//! let source: Arc<dyn Source> =
//!     Arc::new(MemorySource::new("let answer = compute();\n", "demo.rs"));
//!
//! let report = Report::builder()
//!     .severity(Severity::Error)
//!     .message("cannot find function `compute`")
//!     .code("E0425")
//!     .label("not found in this scope", Span::from_indices(Arc::clone(&source), 13, 20)?)?
//!     .help("consider importing it")
//!     .build()?;
//!
//! let renderer = TextRenderer::new(&report);
//! print!("{}", renderer.render_to_string(&report));
//! # Ok::<(), diagnostics_core::DiagnosticError>(())
//! ```
//!
//! # Module Description
//!
//! - [`metrics`] - visual width and byte/column conversion
//! - [`wrap`](wrap()) - paragraph-preserving word wrap
//! - [`source`] - `Source` trait plus in-memory and file-backed variants
//! - [`span`] - half-open byte ranges with location endpoints
//! - [`report`] - labels, grouping, and the report builder
//! - [`render`] - glyph tables and the text renderer
//!
//! # Error Model
//!
//! Construction is strict so rendering can be total: invalid coordinates,
//! inverted spans, empty label text, and overlapping labels on one line all
//! fail at the call that introduces them ([`DiagnosticError`]), and a report
//! that builds successfully always renders.
//!
//! # Unicode Support
//!
//! - UTF-8 internal encoding, byte-offset addressed
//! - Width approximation by encoding class: ASCII and 2-byte sequences are
//!   narrow, 3- and 4-byte sequences (CJK, emoji) are wide
//! - Malformed bytes measure as one narrow cell and never desync the scan

pub mod error;
pub mod metrics;
pub mod render;
pub mod report;
pub mod source;
pub mod span;
mod wrap;

pub use error::DiagnosticError;
pub use metrics::{VisualChar, from_visual_column, to_visual_column, visual_char, visual_width, visual_width_bytes};
pub use render::{GlyphSet, RenderConfig, TextRenderer};
pub use report::{FileGroup, Label, LineGroup, Report, ReportBuilder, Severity};
pub use source::{FileSource, Location, MemorySource, SharedSource, Source, SourceId};
pub use span::Span;
pub use wrap::wrap;
