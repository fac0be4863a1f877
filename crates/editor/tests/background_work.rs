// Chunk: docs/chunks/background_completions - Integration tests for background saves and coloring
//!
//! These tests open real files in a temp directory and let the editor's
//! background threads run, polling the event channel the way a main loop
//! would until the expected completion arrives.

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use quill::{Command, Diagnostic, Document, Editor, EditorConfig, Severity};
use quill_buffer::Position;
use quill_syntax::UNRESOLVED;

const DEADLINE: Duration = Duration::from_secs(20);

/// Pumps events until `done` holds or the deadline passes.
fn pump_until(editor: &mut Editor, mut done: impl FnMut(&Editor) -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < DEADLINE {
        if done(editor) {
            return true;
        }
        editor.wait_events(Duration::from_millis(50));
    }
    done(editor)
}

fn large_rust_source(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("fn f{i}() {{}}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn small_file_config() -> EditorConfig {
    EditorConfig {
        large_file_lines: 10,
        initial_color_lines: 3,
        ..EditorConfig::default()
    }
}

#[test]
fn test_open_then_save_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    let content = "first\r\nsecond\r\n\ttabbed\n";
    fs::write(&path, content).unwrap();

    let mut editor = Editor::new(EditorConfig::default());
    editor.open(&path).unwrap();
    editor.save_active().unwrap();

    assert_eq!(fs::read(&path).unwrap(), content.as_bytes());
}

#[test]
fn test_save_and_reopen_reproduces_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("main.rs");
    fs::write(&path, "fn main() {}\n").unwrap();

    let mut doc = Document::open(&path, &EditorConfig::default()).unwrap();
    doc.click(0, 11);
    doc.enter();
    doc.add_char('x');
    doc.save().unwrap();
    assert!(!doc.is_dirty());

    let reopened = Document::open(&path, &EditorConfig::default()).unwrap();
    assert_eq!(reopened.buffer(), doc.buffer());
    assert_eq!(reopened.language_id(), "rust");
}

#[test]
fn test_edit_triggers_background_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "hello").unwrap();

    let mut editor = Editor::new(EditorConfig::default());
    editor.open(&path).unwrap();
    editor.execute(Command::Insert('X'));
    assert!(editor.active_document().unwrap().is_dirty());

    assert!(pump_until(&mut editor, |e| !e.active_document().unwrap().is_dirty()));
    assert_eq!(fs::read_to_string(&path).unwrap(), "Xhello");
    assert!(editor.dirty_paths().is_empty());
}

#[test]
fn test_burst_of_edits_leaves_latest_text_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "").unwrap();

    let mut editor = Editor::new(EditorConfig::default());
    let id = editor.open(&path).unwrap();
    for ch in 'a'..='z' {
        editor.execute(Command::Insert(ch));
    }
    assert!(editor.is_saving(id));

    assert!(pump_until(&mut editor, |e| !e.is_saving(id)));
    let doc = editor.document(id).unwrap();
    assert!(!doc.is_dirty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "abcdefghijklmnopqrstuvwxyz");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_explicit_save_during_background_save_wins() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "").unwrap();

    let mut editor = Editor::new(EditorConfig::default());
    let id = editor.open(&path).unwrap();
    editor.execute(Command::Insert('a'));
    editor.execute(Command::Insert('b'));
    editor.save_active().unwrap();

    assert!(pump_until(&mut editor, |e| !e.is_saving(id)));
    assert!(!editor.document(id).unwrap().is_dirty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "ab");
}

#[test]
fn test_large_buffer_is_not_autosaved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "hello").unwrap();

    let config = EditorConfig {
        autosave_max_bytes: 3,
        ..EditorConfig::default()
    };
    let mut editor = Editor::new(config);
    editor.open(&path).unwrap();
    editor.execute(Command::Insert('X'));

    assert_eq!(editor.wait_events(Duration::from_millis(200)), 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    assert_eq!(editor.dirty_paths(), vec![path]);
}

#[test]
fn test_large_file_colored_in_background() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("big.rs");
    fs::write(&path, large_rust_source(50)).unwrap();

    let mut editor = Editor::new(small_file_config());
    editor.open(&path).unwrap();

    let doc = editor.active_document().unwrap();
    assert_ne!(doc.color_at(1, 0), UNRESOLVED);
    assert_eq!(doc.color_at(40, 0), UNRESOLVED);

    assert!(pump_until(&mut editor, |e| {
        e.active_document().unwrap().color_at(40, 0) != UNRESOLVED
    }));
    assert!(editor.take_redraw());
}

#[test]
fn test_stale_background_colors_are_recomputed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("big.rs");
    fs::write(&path, large_rust_source(50)).unwrap();

    let mut editor = Editor::new(small_file_config());
    editor.open(&path).unwrap();
    // Edit before the first result can be installed; that result is stale.
    editor.execute(Command::Click { row: 0, col: 4 });
    editor.execute(Command::Insert('x'));

    assert!(pump_until(&mut editor, |e| {
        e.active_document().unwrap().color_at(40, 0) != UNRESOLVED
    }));
    let doc = editor.active_document().unwrap();
    assert_eq!(doc.buffer().line_string(0), "fn fx0() {}");
    assert!(doc.grid().matches_shape(doc.buffer().lines().iter().map(Vec::len)));
}

#[test]
fn test_diagnostics_attach_to_matching_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lib.py");
    fs::write(&path, "x = 1\n").unwrap();

    let mut editor = Editor::new(EditorConfig::default());
    editor.open(&path).unwrap();

    let diagnostic = Diagnostic {
        start: Position::new(0, 0),
        end: Position::new(0, 1),
        severity: Severity::Warning,
        message: "unused variable".into(),
    };
    editor
        .event_sender()
        .send_diagnostics(path.clone(), vec![diagnostic.clone()])
        .unwrap();
    assert_eq!(editor.drain_events(), 1);

    let doc = editor.active_document().unwrap();
    assert_eq!(doc.diagnostics(), &[diagnostic]);
    assert_eq!(doc.language_id(), "python");
}

#[test]
fn test_change_hook_fires_once_per_committed_batch() {
    let mut editor = Editor::new(EditorConfig::default());
    let seen: Rc<RefCell<Vec<(u64, String)>>> = Rc::default();
    let log = Rc::clone(&seen);
    editor.on_change(move |_, doc| log.borrow_mut().push((doc.version(), doc.text())));

    editor.new_document("ab", quill_syntax::Language::PlainText);
    editor.execute(Command::Click { row: 0, col: 2 });
    editor.execute(Command::Insert('c'));
    editor.execute(Command::Move { motion: quill_buffer::Motion::Left, extend: false });
    editor.execute(Command::Undo);

    assert_eq!(
        *seen.borrow(),
        vec![(1, "abc".to_string()), (2, "ab".to_string())]
    );
}

#[test]
fn test_undo_history_is_per_file() {
    let mut editor = Editor::new(EditorConfig::default());
    let a = editor.new_document("a", quill_syntax::Language::PlainText);
    editor.execute(Command::Insert('1'));
    let b = editor.new_document("b", quill_syntax::Language::PlainText);
    editor.execute(Command::Insert('2'));

    editor.execute(Command::Undo);
    assert_eq!(editor.document(b).unwrap().text(), "b");
    assert_eq!(editor.document(a).unwrap().text(), "1a");

    assert!(editor.switch_to(a));
    editor.execute(Command::Undo);
    assert_eq!(editor.document(a).unwrap().text(), "a");
    assert!(!editor.execute(Command::Undo));
}

#[test]
fn test_reopening_switches_instead_of_duplicating() {
    let dir = TempDir::new().unwrap();
    let one = dir.path().join("one.txt");
    let two = dir.path().join("two.txt");
    fs::write(&one, "1").unwrap();
    fs::write(&two, "2").unwrap();

    let mut editor = Editor::new(EditorConfig::default());
    let first = editor.open(&one).unwrap();
    editor.open(&two).unwrap();
    assert_eq!(editor.open(&one).unwrap(), first);
    assert_eq!(editor.document_count(), 2);
    assert_eq!(editor.active_id(), Some(first));

    assert!(editor.close(first).is_some());
    assert_eq!(editor.document_count(), 1);
    assert_eq!(editor.active_document().unwrap().text(), "2");
}

#[test]
fn test_open_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let mut editor = Editor::new(EditorConfig::default());
    let err = editor.open(&dir.path().join("missing.rs")).unwrap_err();
    assert!(err.to_string().contains("missing.rs"));
}
