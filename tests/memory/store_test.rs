//! Tests for the bounded per-user conversation store.

use std::sync::Arc;

use wren::memory::{ConversationStore, Turn, TurnRole, DEFAULT_WINDOW};

#[test]
fn unknown_user_has_empty_history() {
    let store = ConversationStore::default();
    assert!(store.history("nobody").is_empty());
    assert!(store.active_users().is_empty());
}

#[test]
fn append_preserves_order() {
    let store = ConversationStore::default();
    store.append("alice", TurnRole::User, "hi");
    store.append("alice", TurnRole::Assistant, "hello, Sir");
    assert_eq!(
        store.history("alice"),
        vec![Turn::user("hi"), Turn::assistant("hello, Sir")]
    );
}

#[test]
fn eleven_appends_keep_the_last_ten() {
    let store = ConversationStore::default();
    for i in 0..11 {
        store.append("alice", TurnRole::User, format!("m{i}"));
    }
    let history = store.history("alice");
    assert_eq!(history.len(), DEFAULT_WINDOW);
    assert_eq!(history[0].content, "m1");
    assert_eq!(history[9].content, "m10");
    assert!(history.iter().all(|turn| turn.content != "m0"));
    assert_eq!(store.turn_count("alice"), DEFAULT_WINDOW);
}

#[test]
fn window_holds_for_any_number_of_appends() {
    let store = ConversationStore::new(4);
    for i in 0..25 {
        store.append("bob", TurnRole::User, format!("m{i}"));
        let history = store.history("bob");
        assert!(history.len() <= 4);
        let last = history.last().expect("at least one turn");
        assert_eq!(last.content, format!("m{i}"));
    }
    let contents: Vec<String> = store
        .history("bob")
        .into_iter()
        .map(|turn| turn.content)
        .collect();
    assert_eq!(contents, vec!["m21", "m22", "m23", "m24"]);
}

#[test]
fn clear_forgets_the_user() {
    let store = ConversationStore::default();
    store.append("alice", TurnRole::User, "hi");
    store.append("bob", TurnRole::User, "yo");
    store.clear("alice");

    assert!(store.history("alice").is_empty());
    assert_eq!(store.turn_count("alice"), 0);
    assert_eq!(store.turn_count("bob"), 1);
    let active = store.active_users();
    assert!(!active.contains("alice"));
    assert!(active.contains("bob"));
}

#[test]
fn clear_unknown_user_is_a_no_op() {
    let store = ConversationStore::default();
    store.clear("ghost");
    assert!(store.active_users().is_empty());
}

#[test]
fn history_reads_are_idempotent() {
    let store = ConversationStore::default();
    store.append_exchange("alice", "question", "answer");
    assert_eq!(store.history("alice"), store.history("alice"));
}

#[test]
fn snapshot_is_detached_from_later_appends() {
    let store = ConversationStore::default();
    store.append("alice", TurnRole::User, "first");
    let snapshot = store.history("alice");
    store.append("alice", TurnRole::User, "second");
    assert_eq!(snapshot.len(), 1);
    assert_eq!(store.history("alice").len(), 2);
}

#[test]
fn users_are_isolated() {
    let store = ConversationStore::new(2);
    store.append_exchange("alice", "a-q", "a-a");
    store.append_exchange("bob", "b-q", "b-a");
    store.append("alice", TurnRole::User, "a-q2");

    assert_eq!(
        store.history("bob"),
        vec![Turn::user("b-q"), Turn::assistant("b-a")]
    );
    assert_eq!(
        store.history("alice"),
        vec![Turn::assistant("a-a"), Turn::user("a-q2")]
    );
}

#[tokio::test]
async fn concurrent_users_do_not_interfere() {
    let store = Arc::new(ConversationStore::default());
    let mut handles = Vec::new();
    for user in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let user_id = format!("user-{user}");
            for i in 0..30 {
                store.append(&user_id, TurnRole::User, format!("{user_id}:{i}"));
                tokio::task::yield_now().await;
            }
        }));
    }
    for handle in handles {
        handle.await.expect("task should finish");
    }

    assert_eq!(store.active_users().len(), 8);
    for user in 0..8 {
        let user_id = format!("user-{user}");
        let history = store.history(&user_id);
        assert_eq!(history.len(), DEFAULT_WINDOW);
        assert!(history
            .iter()
            .all(|turn| turn.content.starts_with(&format!("{user_id}:"))));
        assert_eq!(history[9].content, format!("{user_id}:29"));
    }
}
