use std::sync::Arc;

use diagnostics_core::{
    DiagnosticError, MemorySource, Report, Severity, SharedSource, Span, TextRenderer,
};

fn main() -> Result<(), DiagnosticError> {
    let source: SharedSource = Arc::new(MemorySource::new(
        "#include <stdio.h>\n\nint main() {\n    printf(\"Hello World!\\n\");\n    return 0;\n}\n",
        "demos/example.c",
    ));

    let report = Report::builder()
        .severity(Severity::Error)
        .message("Displaying a brief summary of what happened")
        .code("E1337")
        .label(
            "Relevant include to enable the usage of printf",
            Span::from_indices(Arc::clone(&source), 10, 17)?,
        )?
        .label(
            "And this is the function that actually makes the magic happen",
            Span::from_indices(Arc::clone(&source), 37, 43)?,
        )?
        .label(
            "This is the string that is getting printed to the console",
            Span::from_indices(Arc::clone(&source), 44, 60)?,
        )?
        .note("Two labels on one line nest: the outer connector row is drawn first.")
        .help("Pass a RenderConfig to switch glyphs, width, or color.")
        .build()?;

    let rendered = TextRenderer::new(&report).render_to_string(&report);
    print!("{rendered}");

    // The printf line appears once, with two stacked connector rows below it.
    assert_eq!(rendered.matches("printf(").count(), 1);
    assert!(rendered.contains("╰──────────────┴─▶"));
    assert!(rendered.contains("╰────┴─▶"));

    Ok(())
}
