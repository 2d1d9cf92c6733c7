use std::sync::Arc;

use diagnostics_core::{
    DiagnosticError, GlyphSet, MemorySource, RenderConfig, Report, Severity, SharedSource, Span,
    TextRenderer,
};

fn main() -> Result<(), DiagnosticError> {
    let header: SharedSource = Arc::new(MemorySource::new(
        "#pragma once\n\nint shared_counter = 0;\n",
        "include/counter.h",
    ));
    let unit: SharedSource = Arc::new(MemorySource::new(
        "#include \"counter.h\"\n\nint shared_counter = 1;\n",
        "src/counter.c",
    ));

    let report = Report::builder()
        .severity(Severity::Warning)
        .message("symbol `shared_counter` is defined twice")
        .label(
            "first definition is here",
            Span::from_coords(Arc::clone(&header), 2, 4, 2, 18)?,
        )?
        .label(
            "second definition shadows it",
            Span::from_coords(Arc::clone(&unit), 2, 4, 2, 18)?,
        )?
        .note("File groups render in the order their sources were first labeled.")
        .build()?;

    // Default Unicode output.
    let unicode = TextRenderer::new(&report).render_to_string(&report);
    print!("{unicode}");

    // Same report through the ASCII glyph table.
    let config = RenderConfig {
        glyphs: GlyphSet::ascii(),
        ..RenderConfig::default()
    };
    let ascii = TextRenderer::with_config(&report, config).render_to_string(&report);
    print!("{ascii}");

    // The header file was labeled first, so its group comes first.
    let header_at = unicode.find("include/counter.h").unwrap();
    let unit_at = unicode.find("src/counter.c").unwrap();
    assert!(header_at < unit_at);
    assert!(ascii.contains("+-include/counter.h--"));

    Ok(())
}
