//! Editor key dispatch scenarios: typing, undo grouping, selection edits,
//! indentation, clipboard, and mouse selection.

mod common;

use common::Harness;
use core_events::{KeyCode, MouseButton, MouseEventKind};
use core_state::Selection;

#[test]
fn typing_a_burst_undoes_as_one_step() {
    let mut h = Harness::with_lines(&[""]);
    h.type_str("hello");
    assert_eq!(h.text(), "hello");
    assert_eq!(h.state.doc().journal.undo_depth(), 1);

    h.ctrl('z');
    assert_eq!(h.text(), "");
    h.ctrl('y');
    assert_eq!(h.text(), "hello");
    assert_eq!(h.cursor(), (0, 5));
}

#[test]
fn cursor_motion_breaks_coalescing() {
    let mut h = Harness::with_lines(&["ab"]);
    h.key(KeyCode::End);
    h.ch('x');
    h.key(KeyCode::Left);
    h.key(KeyCode::Right);
    h.ch('y');
    assert_eq!(h.text(), "abxy");
    assert_eq!(
        h.state.doc().journal.undo_depth(),
        2,
        "arrow keys split the undo group"
    );
}

#[test]
fn backspace_at_line_start_joins_lines() {
    let mut h = Harness::with_lines(&["ab", "cd"]);
    h.state.doc_mut().row = 1;
    h.state.doc_mut().col = 0;
    h.key(KeyCode::Backspace);
    assert_eq!(h.text(), "abcd");
    assert_eq!(h.cursor(), (0, 2));

    h.ctrl('z');
    assert_eq!(h.text(), "ab\ncd");
}

#[test]
fn backspace_burst_undoes_as_one_step() {
    let mut h = Harness::with_lines(&["abc"]);
    h.key(KeyCode::End);
    h.key(KeyCode::Backspace);
    h.key(KeyCode::Backspace);
    h.key(KeyCode::Backspace);
    assert_eq!(h.text(), "");
    assert_eq!(h.state.doc().journal.undo_depth(), 1);
    h.ctrl('z');
    assert_eq!(h.text(), "abc");
}

#[test]
fn enter_carries_indent_depth_as_tabs() {
    let mut h = Harness::with_lines(&["\tfoo"]);
    h.key(KeyCode::End);
    h.settle();
    h.key(KeyCode::Enter);
    assert_eq!(h.text(), "\tfoo\n\t");
    assert_eq!(h.cursor(), (1, 1));
}

#[test]
fn enter_between_braces_opens_block() {
    let mut h = Harness::with_lines(&["fn x() {}"]);
    h.state.doc_mut().col = 8; // between { and }
    h.key(KeyCode::Enter);
    assert_eq!(h.text(), "fn x() {\n\t\n}");
    assert_eq!(h.cursor(), (1, 1));

    h.ctrl('z');
    assert_eq!(h.text(), "fn x() {}");
}

#[test]
fn enter_at_line_start_inserts_plain_newline() {
    let mut h = Harness::with_lines(&["abc"]);
    h.key(KeyCode::Enter);
    assert_eq!(h.text(), "\nabc");
    assert_eq!(h.cursor(), (1, 0));
}

#[test]
fn typing_over_selection_records_replace() {
    let mut h = Harness::with_lines(&["hello world"]);
    h.state.doc_mut().set_selection(Selection {
        start_row: 0,
        start_col: 0,
        end_row: 0,
        end_col: 5,
    });
    h.ch('H');
    assert_eq!(h.text(), "H world");
    h.ctrl('z');
    assert_eq!(h.text(), "hello world");
}

#[test]
fn left_right_collapse_selection_to_its_ends() {
    let mut h = Harness::with_lines(&["abcdef"]);
    // Dragged backwards: start after end.
    h.state.doc_mut().set_selection(Selection {
        start_row: 0,
        start_col: 4,
        end_row: 0,
        end_col: 1,
    });
    h.key(KeyCode::Left);
    assert_eq!(h.cursor(), (0, 1), "Left collapses to the normalized start");
    assert!(h.state.doc().selected().is_none());

    h.state.doc_mut().set_selection(Selection {
        start_row: 0,
        start_col: 4,
        end_row: 0,
        end_col: 1,
    });
    h.key(KeyCode::Right);
    assert_eq!(h.cursor(), (0, 4), "Right collapses to the normalized end");
}

#[test]
fn arrows_cross_line_boundaries() {
    let mut h = Harness::with_lines(&["ab", "cd"]);
    h.key(KeyCode::End);
    h.key(KeyCode::Right);
    assert_eq!(h.cursor(), (1, 0));
    h.key(KeyCode::Left);
    assert_eq!(h.cursor(), (0, 2));
}

#[test]
fn vertical_moves_keep_ideal_screen_column() {
    let mut h = Harness::with_lines(&["a long first line", "ab", "a long third line"]);
    h.state.doc_mut().col = 10;
    h.key(KeyCode::Down);
    assert_eq!(h.cursor(), (1, 2), "clamped to the short line");
    h.key(KeyCode::Down);
    assert_eq!(h.cursor(), (2, 10), "ideal column restored");
}

#[test]
fn tab_indents_selection_rows() {
    let mut h = Harness::with_lines(&["one", "two", "three"]);
    h.state.doc_mut().set_selection(Selection {
        start_row: 0,
        start_col: 0,
        end_row: 1,
        end_col: 2,
    });
    h.key(KeyCode::Tab);
    assert_eq!(h.text(), "\tone\n\ttwo\nthree");
    h.key(KeyCode::BackTab);
    assert_eq!(h.text(), "one\ntwo\nthree");
}

#[test]
fn cut_line_and_paste_restores_via_clipboard() {
    let mut h = Harness::with_lines(&["alpha", "beta"]);
    h.ctrl('x');
    assert_eq!(h.text(), "\nbeta");
    assert_eq!(h.state.clipboard, "alpha");
    h.ctrl('v');
    assert_eq!(h.text(), "alpha\nbeta");
}

#[test]
fn copy_selection_then_paste_over_selection_replaces() {
    let mut h = Harness::with_lines(&["hello", "world"]);
    h.state.doc_mut().set_selection(Selection {
        start_row: 0,
        start_col: 0,
        end_row: 0,
        end_col: 5,
    });
    h.ctrl('c');
    assert_eq!(h.state.clipboard, "hello");
    h.state.doc_mut().set_selection(Selection {
        start_row: 1,
        start_col: 0,
        end_row: 1,
        end_col: 5,
    });
    h.ctrl('v');
    assert_eq!(h.text(), "hello\nhello");
    h.ctrl('z');
    assert_eq!(h.text(), "hello\nworld");
}

#[test]
fn ctrl_u_deletes_to_line_start() {
    let mut h = Harness::with_lines(&["abcdef"]);
    h.state.doc_mut().col = 4;
    h.ctrl('u');
    assert_eq!(h.text(), "ef");
    assert_eq!(h.cursor(), (0, 0));
    h.ctrl('z');
    assert_eq!(h.text(), "abcdef");
}

#[test]
fn ctrl_s_submits_save_command() {
    let mut h = Harness::with_lines(&["x"]);
    h.state.doc_mut().file_name = Some("notes.txt".into());
    h.ctrl('s');
    assert_eq!(h.queue.try_recv().unwrap(), ">save notes.txt");
}

#[test]
fn ctrl_s_without_filename_prompts_via_command() {
    let mut h = Harness::with_lines(&["x"]);
    h.ctrl('s');
    assert_eq!(h.queue.try_recv().unwrap(), ">save ");
}

#[test]
fn ctrl_w_on_last_tab_quits() {
    let mut h = Harness::with_lines(&["x"]);
    let res = h.ctrl('w');
    assert!(res.quit);
}

#[test]
fn ctrl_t_opens_new_tab() {
    let mut h = Harness::with_lines(&["x"]);
    h.ctrl('t');
    assert_eq!(h.state.session.len(), 2);
    assert_eq!(h.state.session.active_index(), 1);
    assert_eq!(h.text(), "");
}

#[test]
fn ctrl_f_seeds_search_with_single_line_selection() {
    let mut h = Harness::with_lines(&["find me here"]);
    h.state.doc_mut().set_selection(Selection {
        start_row: 0,
        start_col: 5,
        end_row: 0,
        end_col: 7,
    });
    h.ctrl('f');
    assert_eq!(h.console.as_ref().unwrap().text(), "#me");
}

#[test]
fn click_places_cursor_and_drag_selects() {
    let mut h = Harness::with_lines(&["hello world", "second line"]);
    h.state.line_number = false;
    // Editor rows start at screen row 1.
    h.click(2, 1);
    assert_eq!(h.cursor(), (0, 2));
    h.mouse(MouseEventKind::Drag(MouseButton::Left), 4, 2);
    let sel = h.state.doc().selected().unwrap();
    assert_eq!(
        (sel.start_row, sel.start_col, sel.end_row, sel.end_col),
        (0, 2, 1, 4)
    );
    h.mouse(MouseEventKind::Up(MouseButton::Left), 4, 2);
    assert!(!h.state.doc().selecting);
    assert!(h.state.doc().selected().is_some());
}

#[test]
fn click_release_without_drag_clears_degenerate_selection() {
    let mut h = Harness::with_lines(&["abc"]);
    h.state.line_number = false;
    h.click(1, 1);
    h.mouse(MouseEventKind::Up(MouseButton::Left), 1, 1);
    assert!(h.state.doc().selected().is_none());
    assert!(h.state.doc().selection_raw().is_none());
}

#[test]
fn wheel_scroll_clamps_to_document() {
    let lines: Vec<String> = (0..40).map(|i| i.to_string()).collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let mut h = Harness::with_lines(&refs);
    h.mouse(MouseEventKind::ScrollUp, 0, 5);
    assert_eq!(h.state.doc().top, 0, "cannot scroll above the top");
    for _ in 0..50 {
        h.mouse(MouseEventKind::ScrollDown, 0, 5);
    }
    assert_eq!(h.state.doc().top, 30, "clamped to len - height");
}

#[test]
fn escape_clears_selection_and_hint() {
    let mut h = Harness::with_lines(&["abc"]);
    h.state.doc_mut().set_selection(Selection {
        start_row: 0,
        start_col: 0,
        end_row: 0,
        end_col: 2,
    });
    h.key(KeyCode::Esc);
    assert!(h.state.doc().selected().is_none());
}

#[test]
fn home_goes_to_first_non_whitespace() {
    let mut h = Harness::with_lines(&["\t  indented"]);
    h.key(KeyCode::End);
    h.key(KeyCode::Home);
    assert_eq!(h.cursor(), (0, 3));
}

#[test]
fn page_down_moves_by_page_and_stays_in_bounds() {
    let lines: Vec<String> = (0..30).map(|i| i.to_string()).collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let mut h = Harness::with_lines(&refs);
    h.key(KeyCode::PageDown);
    assert_eq!(h.cursor().0, 8, "height 10 pages by 8 rows");
    for _ in 0..10 {
        h.key(KeyCode::PageDown);
    }
    assert_eq!(h.cursor().0, 29);
    let doc = h.state.doc();
    assert!(doc.top <= doc.row && doc.row < doc.top + h.state.dims.height);
}
