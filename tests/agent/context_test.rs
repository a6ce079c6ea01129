//! Tests for provider context assembly.

use wren::agent::context::{assemble_messages, recent_turns, CONTEXT_TURNS};
use wren::memory::Turn;
use wren::providers::Role;

fn alternating(count: usize) -> Vec<Turn> {
    (0..count)
        .map(|i| {
            if i % 2 == 0 {
                Turn::user(format!("u{i}"))
            } else {
                Turn::assistant(format!("a{i}"))
            }
        })
        .collect()
}

#[test]
fn empty_history_yields_system_and_user() {
    let messages = assemble_messages("persona".to_owned(), &[], "hello");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[0].content, "persona");
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].content, "hello");
}

#[test]
fn history_sits_between_system_and_new_message() {
    let history = alternating(4);
    let messages = assemble_messages("persona".to_owned(), &history, "next");
    assert_eq!(messages.len(), 6);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].content, "u0");
    assert_eq!(messages[2].role, Role::Assistant);
    assert_eq!(messages[2].content, "a1");
    assert_eq!(messages[5].content, "next");
}

#[test]
fn only_the_most_recent_turns_are_forwarded() {
    let history = alternating(14);
    let messages = assemble_messages("persona".to_owned(), &history, "next");
    assert_eq!(messages.len(), CONTEXT_TURNS.saturating_add(2));
    assert_eq!(messages[1].content, "u4");
    assert_eq!(messages[CONTEXT_TURNS].content, "a13");
}

#[test]
fn recent_turns_handles_short_histories() {
    let history = alternating(3);
    assert_eq!(recent_turns(&history, 10).len(), 3);
    assert_eq!(recent_turns(&history, 2), &history[1..]);
    assert!(recent_turns(&[], 10).is_empty());
}
