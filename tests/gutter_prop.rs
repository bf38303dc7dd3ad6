//! Gutter property tests
//!
//! Random key sequences through the controller must leave the gutter in step
//! with the document once deferred work has run.

use proptest::test_runner::Config as ProptestConfig;
use proptest::{prelude::*, prop_oneof};
use quill::clipboard::MemoryClipboard;
use quill::input::{Key, KeyCode};
use quill::{Controller, EditorConfig};

#[derive(Debug, Clone)]
enum Input {
    Key(Key),
    Paste(String),
}

fn input_strategy() -> impl Strategy<Value = Input> {
    let typed = prop::char::range('a', 'e').prop_map(|c| Input::Key(Key::plain(KeyCode::Char(c))));
    let paste = "[a-c\n]{1,8}".prop_map(Input::Paste);

    prop_oneof![
        4 => typed,
        2 => Just(Input::Key(Key::plain(KeyCode::Enter))),
        2 => Just(Input::Key(Key::plain(KeyCode::Backspace))),
        1 => Just(Input::Key(Key::plain(KeyCode::Delete))),
        1 => Just(Input::Key(Key::plain(KeyCode::Left))),
        1 => Just(Input::Key(Key::plain(KeyCode::Up))),
        1 => Just(Input::Key(Key::ctrl('a'))),
        1 => Just(Input::Key(Key::ctrl('x'))),
        1 => Just(Input::Key(Key::ctrl('v'))),
        2 => Just(Input::Key(Key::ctrl('z'))),
        1 => Just(Input::Key(Key::ctrl('y'))),
        1 => paste,
    ]
}

fn controller(undo_limit: Option<usize>) -> Controller {
    let config = EditorConfig {
        undo_limit,
        ..EditorConfig::default()
    };
    Controller::with_clipboard(config, Box::new(MemoryClipboard::new()))
}

fn expected_lines(text: &str) -> usize {
    1 + text.chars().filter(|&c| c == '\n').count()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]

    #[test]
    fn gutter_matches_line_count_after_each_frame(
        limit in prop::option::of(1usize..4),
        inputs in proptest::collection::vec(input_strategy(), 0..48)
    ) {
        let mut app = controller(limit);
        for input in &inputs {
            match input {
                Input::Key(key) => app.handle_key(key.clone()),
                Input::Paste(text) => app.handle_paste(text),
            }
            prop_assert!(app.modal().is_none());
            app.run_deferred();

            let expected = expected_lines(app.editor().text());
            prop_assert_eq!(app.gutter().line_count(), expected);
            prop_assert_eq!(app.gutter().numbers().lines().count(), expected);
        }
    }
}
