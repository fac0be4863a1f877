// Chunk: docs/chunks/text_selection_model - Two-point selection with normalized queries

//! Property tests: selection queries must not depend on drag direction.

use proptest::prelude::*;
use quill_buffer::{LineBuffer, Position, Selection};

fn buffer_strategy() -> impl Strategy<Value = LineBuffer> {
    proptest::collection::vec("[a-z ]{0,8}", 1..6).prop_map(LineBuffer::from_lines)
}

fn point_in(buf: &LineBuffer) -> impl Strategy<Value = (usize, usize)> {
    let lens: Vec<usize> = (0..buf.line_count()).map(|r| buf.line_len(r)).collect();
    (0..lens.len()).prop_flat_map(move |y| (0..=lens[y], Just(y)))
}

fn buffer_and_points() -> impl Strategy<Value = (LineBuffer, (usize, usize), (usize, usize))> {
    buffer_strategy().prop_flat_map(|buf| {
        let a = point_in(&buf);
        let b = point_in(&buf);
        (Just(buf), a, b)
    })
}

fn drag(from: (usize, usize), to: (usize, usize)) -> Selection {
    let mut s = Selection::new();
    s.begin_at(from.0, from.1);
    s.extend_to(to.0, to.1);
    s
}

proptest! {
    #[test]
    fn forward_and_backward_drags_agree((buf, a, b) in buffer_and_points()) {
        let forward = drag(a, b);
        let backward = drag(b, a);
        for y in 0..buf.line_count() {
            for x in 0..=buf.line_len(y) {
                prop_assert_eq!(forward.is_under_selection(x, y), backward.is_under_selection(x, y));
            }
        }
        prop_assert_eq!(forward.selection_text(&buf), backward.selection_text(&buf));
        prop_assert_eq!(forward.selected_lines(&buf), backward.selected_lines(&buf));
    }

    #[test]
    fn selection_text_matches_text_range((buf, a, b) in buffer_and_points()) {
        let s = drag(a, b);
        let expected = buf.text_range(Position::new(a.1, a.0), Position::new(b.1, b.0));
        prop_assert_eq!(s.selection_text(&buf), expected);
    }

    #[test]
    fn selected_indices_count_matches_text_length((buf, a, b) in buffer_and_points()) {
        let s = drag(a, b);
        prop_assert_eq!(s.selected_indices(&buf).len(), s.selection_text(&buf).chars().count());
    }
}
