use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use diagnostics_core::{
    DiagnosticError, FileSource, Report, Severity, SharedSource, Source, Span, TextRenderer,
};

const HELLO_WORLD: &str = "#include <stdio.h>\n\nint main() {\n    printf(\"Hello World!\\n\");\n    return 0;\n}\n";

/// Create a scratch directory unique to one test.
fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("diagnostics-core-{}-{}", std::process::id(), test));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_file_source_reads_eagerly_and_relativizes() {
    let dir = scratch_dir("read");
    let path = dir.join("example.c");
    fs::write(&path, HELLO_WORLD).unwrap();

    let mut source = FileSource::open(&path).unwrap();
    assert_eq!(source.path(), path.display().to_string());

    source.set_working_path(&dir);
    assert_eq!(source.path(), "example.c");

    assert_eq!(source.line_count(), 6);
    assert_eq!(source.size(), 79);
    assert_eq!(source.contents(), HELLO_WORLD);
    assert_eq!(source.line(3).as_deref(), Some("    printf(\"Hello World!\\n\");"));

    // Deleting the file after construction does not affect lookups.
    fs::remove_file(&path).unwrap();
    assert_eq!(source.line(0).as_deref(), Some("#include <stdio.h>"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = scratch_dir("missing");
    let result = FileSource::open(dir.join("no-such-file.c"));
    assert!(matches!(result, Err(DiagnosticError::NotFound { .. })));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_coordinates_agree_between_memory_and_file_sources() {
    let dir = scratch_dir("coords");
    let path = dir.join("example.c");
    fs::write(&path, HELLO_WORLD).unwrap();

    let source = FileSource::open(&path).unwrap();
    for index in 0..=source.size() {
        let location = source.from_index(index).unwrap();
        let back = source.from_coords(location.row(), location.column()).unwrap();
        assert_eq!(back, location);
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_report_renders_against_a_file_source() {
    let dir = scratch_dir("render");
    let path = dir.join("example.c");
    fs::write(&path, HELLO_WORLD).unwrap();

    let mut file = FileSource::open(&path).unwrap();
    file.set_working_path(&dir);
    let source: SharedSource = Arc::new(file);

    let report = Report::builder()
        .severity(Severity::Error)
        .message("header check")
        .label(
            "relevant include",
            Span::from_indices(Arc::clone(&source), 10, 17).unwrap(),
        )
        .unwrap()
        .build()
        .unwrap();

    let rendered = TextRenderer::new(&report).render_to_string(&report);
    assert!(rendered.starts_with("error: header check\n"));
    assert!(rendered.contains("╭╴example.c╶─"));
    assert!(rendered.contains(" 1 │ #include <stdio.h>"));
    assert!(rendered.contains("╰─────┴─▶ relevant include"));

    let _ = fs::remove_dir_all(&dir);
}
