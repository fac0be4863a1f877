// Chunk: docs/chunks/syntax_highlighting - Incremental recolor agrees with a full pass

//! Property tests: after any edit that leaves the tree free of errors, the
//! incrementally maintained grid equals a grid colored from scratch.

use std::sync::Arc;

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use quill_buffer::{LineBuffer, Position};
use quill_syntax::{HighlightEngine, Language, SyntaxTheme, TextChange};

const RUST_SOURCES: &[&str] = &[
    "fn main() {\n    let count = 42;\n    // tally\n    println!(\"{}\", count);\n}",
    "struct Point { x: f64, y: f64 }\n\nimpl Point {\n    fn norm(&self) -> f64 { self.x * self.x }\n}",
    "const LIMIT: usize = 10;\n/* block */\nstatic NAME: &str = \"quill\";",
];

/// Runs of identical characters, where an edit position is ambiguous from
/// the text alone.
const REPEATED_SOURCE: &str = "let v = [[[0]]];\nlet w = ((1));\nlet s = \"aaa\";";

const PYTHON_SOURCES: &[&str] = &[
    "def greet(name):\n    # say hi\n    return \"hi \" + name\n\nx = 3.5\n",
    "class A:\n    pass\n\nprint(A())",
];

#[derive(Debug, Clone)]
enum Edit {
    Insert { at: usize, ch: char },
    Delete { at: usize },
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    let chars = prop::sample::select(vec!['a', 'Z', '_', '1', ' ', '"', '/', '#', '*', '\n', '(', ')', '{']);
    prop_oneof![
        (0usize..400, chars).prop_map(|(at, ch)| Edit::Insert { at, ch }),
        (0usize..400).prop_map(|at| Edit::Delete { at }),
    ]
}

/// Maps a flat index onto a valid (row, col), counting one slot per line end.
fn locate(buffer: &LineBuffer, at: usize) -> (usize, usize) {
    let total = buffer.char_count() + 1;
    let mut rest = at % total;
    for row in 0..buffer.line_count() {
        let len = buffer.line_len(row);
        if rest <= len {
            return (row, rest);
        }
        rest -= len + 1;
    }
    let last = buffer.line_count() - 1;
    (last, buffer.line_len(last))
}

/// Applies one edit to the buffer and the grid the same way the editor
/// does, returning the region it changed.
fn apply(buffer: &mut LineBuffer, engine: &mut HighlightEngine, edit: &Edit) -> Option<TextChange> {
    match *edit {
        Edit::Insert { at, ch } => {
            let (row, col) = locate(buffer, at);
            let start = Position::new(row, col);
            if ch == '\n' {
                buffer.split_line(row, col);
                engine.grid_mut().split_row(row, col);
                Some(TextChange::insertion(start, Position::new(row + 1, 0)))
            } else {
                buffer.insert_char(row, col, ch);
                engine.grid_mut().insert_cell(row, col);
                Some(TextChange::insertion(start, Position::new(row, col + 1)))
            }
        }
        Edit::Delete { at } => {
            let (row, col) = locate(buffer, at);
            let start = Position::new(row, col);
            if col < buffer.line_len(row) {
                buffer.remove_char(row, col);
                engine.grid_mut().remove_cell(row, col);
                Some(TextChange::removal(start, Position::new(row, col + 1)))
            } else if row + 1 < buffer.line_count() {
                buffer.join_line(row + 1);
                engine.grid_mut().join_row(row + 1);
                Some(TextChange::removal(start, Position::new(row + 1, 0)))
            } else {
                None
            }
        }
    }
}

fn check(language: Language, source: &str, edits: &[Edit]) -> Result<(), TestCaseError> {
    let theme = Arc::new(SyntaxTheme::catppuccin_mocha());
    let mut buffer = LineBuffer::from_text(source);
    let mut engine = HighlightEngine::new(language, source, Arc::clone(&theme));
    engine.colorize_all(source);

    for edit in edits {
        let Some(change) = apply(&mut buffer, &mut engine, edit) else {
            continue;
        };
        let text = buffer.text();
        engine.update(&text, &change);

        let shape: Vec<usize> = (0..buffer.line_count()).map(|r| buffer.line_len(r)).collect();
        prop_assert!(engine.grid().matches_shape(shape));

        // Stale colors are allowed inside error spans; stop comparing once
        // the text stops parsing cleanly.
        if engine.highlighter().is_some_and(|hl| hl.has_errors()) {
            return Ok(());
        }

        let mut full = HighlightEngine::new(language, &text, Arc::clone(&theme));
        full.colorize_all(&text);
        prop_assert_eq!(engine.grid(), full.grid(), "after {:?} on {:?}", edit, text);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]

    #[test]
    fn rust_incremental_matches_full(
        idx in 0..RUST_SOURCES.len(),
        edits in proptest::collection::vec(edit_strategy(), 1..6)
    ) {
        check(Language::Rust, RUST_SOURCES[idx], &edits)?;
    }

    #[test]
    fn repeated_chars_incremental_matches_full(
        edits in proptest::collection::vec(edit_strategy(), 1..6)
    ) {
        check(Language::Rust, REPEATED_SOURCE, &edits)?;
    }

    #[test]
    fn python_incremental_matches_full(
        idx in 0..PYTHON_SOURCES.len(),
        edits in proptest::collection::vec(edit_strategy(), 1..6)
    ) {
        check(Language::Python, PYTHON_SOURCES[idx], &edits)?;
    }
}

#[test]
fn opening_a_block_comment_recolors_following_lines() {
    let source = "fn a() {}\nfn b() {}\n";
    let theme = Arc::new(SyntaxTheme::catppuccin_mocha());
    let mut buffer = LineBuffer::from_text(source);
    let mut engine = HighlightEngine::new(Language::Rust, source, Arc::clone(&theme));
    engine.colorize_all(source);

    // "/*" at the start and "*/" at the very end comment out everything.
    for (row, col, ch) in [(2, 0, '*'), (2, 1, '/'), (0, 0, '/'), (0, 1, '*')] {
        buffer.insert_char(row, col, ch);
        engine.grid_mut().insert_cell(row, col);
        let change = TextChange::insertion(Position::new(row, col), Position::new(row, col + 1));
        engine.update(&buffer.text(), &change);
    }

    let comment = theme.color_for_capture("comment");
    assert_eq!(buffer.line_string(1), "fn b() {}");
    assert!(engine.grid().row(1).iter().all(|c| *c == comment));
}
