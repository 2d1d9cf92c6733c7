use std::sync::Arc;

use diagnostics_core::{
    DiagnosticError, GlyphSet, MemorySource, RenderConfig, Report, Severity, SharedSource, Span,
    TextRenderer,
};

const HELLO_WORLD: &str = "#include <stdio.h>\n\nint main() {\n    printf(\"Hello World!\\n\");\n    return 0;\n}";

fn hello_source() -> SharedSource {
    Arc::new(MemorySource::new(HELLO_WORLD, "demos/example.c"))
}

fn render(report: &Report) -> String {
    TextRenderer::new(report).render_to_string(report)
}

#[test]
fn test_nested_labels_share_one_source_line() {
    let source = hello_source();

    let report = Report::builder()
        .severity(Severity::Error)
        .message("Displaying a brief summary of what happened")
        .code("E1337")
        .label(
            "And this is the function that actually makes the magic happen",
            Span::from_indices(Arc::clone(&source), 37, 43).unwrap(),
        )
        .unwrap()
        .label(
            "This is the string that is getting printed to the console",
            Span::from_indices(Arc::clone(&source), 44, 60).unwrap(),
        )
        .unwrap()
        .label(
            "Relevant include to enable the usage of printf",
            Span::from_indices(Arc::clone(&source), 10, 17).unwrap(),
        )
        .unwrap()
        .note(
            "This example showcases every little detail of the library, also with \
             the capability of line wrapping.",
        )
        .help("Compile with -E to inspect the expanded include set.")
        .build()
        .unwrap();

    let expected = concat!(
        "error[E1337]: Displaying a brief summary of what happened\n",
        "   ╭╴demos/example.c╶─\n",
        "   ·\n",
        " 1 │ #include <stdio.h>\n",
        "   ·           ╰─────┴─▶ Relevant include to enable the usage of printf\n",
        " 2 │ \n",
        " 3 │ int main() {\n",
        " 4 │     printf(\"Hello World!\\n\");\n",
        "   ·     │    │ ╰──────────────┴─▶ This is the string that is getting printed to\n",
        "   ·     │    │                    the console\n",
        "   ·     ╰────┴─▶ And this is the function that actually makes the magic happen\n",
        " 5 │     return 0;\n",
        "   · \n",
        "   │ Note: This example showcases every little detail of the library, also with\n",
        "   │       the capability of line wrapping.\n",
        "   │ Help: Compile with -E to inspect the expanded include set.\n",
        "───╯\n",
    );

    assert_eq!(render(&report), expected);
}

#[test]
fn test_zero_width_span_renders_a_caret() {
    let source: SharedSource = Arc::new(MemorySource::new("let x = 10;\n", "demo.rs"));

    let report = Report::builder()
        .severity(Severity::Error)
        .message("unexpected token")
        .label(
            "value assigned here",
            Span::from_indices(Arc::clone(&source), 8, 8).unwrap(),
        )
        .unwrap()
        .build()
        .unwrap();

    let expected = concat!(
        "error: unexpected token\n",
        "   ╭╴demo.rs╶─\n",
        "   ·\n",
        " 1 │ let x = 10;\n",
        "   ·         ╰▶ value assigned here\n",
        "   · \n",
        "───╯\n",
    );

    assert_eq!(render(&report), expected);
}

#[test]
fn test_deep_column_labels_wrap_with_guide_bars() {
    // A long message at a deep column must wrap into several lines, each
    // continuation carrying the guide bars of the outer rows plus blank
    // padding where the arrow was.
    let source = hello_source();

    let report = Report::builder()
        .severity(Severity::Warning)
        .message("string formatting")
        .label(
            "printed verbatim",
            Span::from_indices(Arc::clone(&source), 37, 43).unwrap(),
        )
        .unwrap()
        .label(
            "this format string is considerably longer than the space remaining \
             on its terminal row and therefore wraps",
            Span::from_indices(Arc::clone(&source), 44, 60).unwrap(),
        )
        .unwrap()
        .build()
        .unwrap();

    let rendered = render(&report);
    let connector_rows: Vec<&str> = rendered
        .lines()
        .filter(|line| line.starts_with("   ·     │    │"))
        .collect();

    // First row carries the arrow, continuations only bars and padding.
    assert!(connector_rows.len() >= 3);
    assert!(connector_rows[0].contains("┴─▶ "));
    for continuation in &connector_rows[1..] {
        assert!(!continuation.contains('▶'));
        assert!(continuation.starts_with("   ·     │    │      "));
    }

    // No rendered row exceeds the configured terminal width (box-drawing
    // glyphs occupy one cell each).
    for line in rendered.lines() {
        assert!(line.chars().count() <= 80, "overlong: {line:?}");
    }
}

fn numbered_source(lines: usize) -> SharedSource {
    let text: String = (1..=lines).map(|i| format!("v{i:02}\n")).collect();
    Arc::new(MemorySource::new(text, "fill.txt"))
}

#[test]
fn test_distant_windows_get_one_gap_marker() {
    // Labels five lines apart: exactly one elision row between the windows.
    let source = numbered_source(12);

    let report = Report::builder()
        .severity(Severity::Error)
        .message("windows")
        .label(
            "first marker",
            Span::from_coords(Arc::clone(&source), 2, 0, 2, 3).unwrap(),
        )
        .unwrap()
        .label(
            "second marker",
            Span::from_coords(Arc::clone(&source), 7, 0, 7, 3).unwrap(),
        )
        .unwrap()
        .build()
        .unwrap();

    let expected = concat!(
        "error: windows\n",
        "   ╭╴fill.txt╶─\n",
        "   ·\n",
        " 2 │ v02\n",
        " 3 │ v03\n",
        "   · ╰─┴─▶ first marker\n",
        " 4 │ v04\n",
        "   · \n",
        " 7 │ v07\n",
        " 8 │ v08\n",
        "   · ╰─┴─▶ second marker\n",
        " 9 │ v09\n",
        "   · \n",
        "───╯\n",
    );

    assert_eq!(render(&report), expected);
}

#[test]
fn test_touching_windows_get_no_gap_marker() {
    // Labels one line apart: the context windows touch, nothing is elided
    // and no line is printed twice.
    let source = numbered_source(12);

    let report = Report::builder()
        .severity(Severity::Error)
        .message("adjacent")
        .label(
            "first marker",
            Span::from_coords(Arc::clone(&source), 3, 0, 3, 3).unwrap(),
        )
        .unwrap()
        .label(
            "second marker",
            Span::from_coords(Arc::clone(&source), 4, 0, 4, 3).unwrap(),
        )
        .unwrap()
        .build()
        .unwrap();

    let expected = concat!(
        "error: adjacent\n",
        "   ╭╴fill.txt╶─\n",
        "   ·\n",
        " 3 │ v03\n",
        " 4 │ v04\n",
        "   · ╰─┴─▶ first marker\n",
        " 5 │ v05\n",
        "   · ╰─┴─▶ second marker\n",
        " 6 │ v06\n",
        "   · \n",
        "───╯\n",
    );

    assert_eq!(render(&report), expected);
}

#[test]
fn test_file_groups_render_in_insertion_order() {
    let first: SharedSource = Arc::new(MemorySource::new("int shared = 1;\n", "first.c"));
    let second: SharedSource = Arc::new(MemorySource::new("int shared = 2;\n", "second.c"));

    let report = Report::builder()
        .severity(Severity::Warning)
        .message("duplicated symbol")
        .label(
            "first definition",
            Span::from_indices(Arc::clone(&first), 4, 10).unwrap(),
        )
        .unwrap()
        .label(
            "second definition",
            Span::from_indices(Arc::clone(&second), 4, 10).unwrap(),
        )
        .unwrap()
        .build()
        .unwrap();

    let expected = concat!(
        "warning: duplicated symbol\n",
        "   ╭╴first.c╶─\n",
        "   ·\n",
        " 1 │ int shared = 1;\n",
        "   ·     ╰─────┴─▶ first definition\n",
        "   · \n",
        "   ├╴second.c╶─\n",
        " 1 │ int shared = 2;\n",
        "   ·     ╰─────┴─▶ second definition\n",
        "   · \n",
        "───╯\n",
    );

    assert_eq!(render(&report), expected);
}

#[test]
fn test_ascii_glyphs_replace_box_drawing() {
    let source: SharedSource = Arc::new(MemorySource::new("let x = 10;\n", "demo.rs"));

    let report = Report::builder()
        .severity(Severity::Error)
        .message("unexpected token")
        .label(
            "value assigned here",
            Span::from_indices(Arc::clone(&source), 8, 8).unwrap(),
        )
        .unwrap()
        .build()
        .unwrap();

    let config = RenderConfig {
        glyphs: GlyphSet::ascii(),
        ..RenderConfig::default()
    };
    let rendered = TextRenderer::with_config(&report, config).render_to_string(&report);

    let expected = concat!(
        "error: unexpected token\n",
        "   +-demo.rs--\n",
        "   .\n",
        " 1 | let x = 10;\n",
        "   .         ^> value assigned here\n",
        "   . \n",
        "~~~+\n",
    );

    assert_eq!(rendered, expected);
}

#[test]
fn test_overlapping_labels_fail_before_any_rendering() {
    let source = hello_source();

    let result = Report::builder()
        .severity(Severity::Error)
        .message("conflict")
        .label(
            "whole call",
            Span::from_indices(Arc::clone(&source), 37, 60).unwrap(),
        )
        .unwrap()
        .label(
            "inner string",
            Span::from_indices(Arc::clone(&source), 44, 60).unwrap(),
        );

    assert!(matches!(
        result,
        Err(DiagnosticError::OverlappingLabels { line: 3 })
    ));
}

#[test]
fn test_wrap_splits_oversized_words() {
    assert_eq!(
        diagnostics_core::wrap("AAAAAAAAAA BBBBBBBBBB", 5),
        vec!["AAAAA", "AAAAA", "BBBBB", "BBBBB"]
    );
}
