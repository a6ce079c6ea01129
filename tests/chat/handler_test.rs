//! Message dispatch through `ChatHandler`.

use std::sync::Arc;

use wren::agent::synthesizer::TECHNICAL_DIFFICULTY_REPLY;
use wren::chat::commands::CLEARED_REPLY;
use wren::chat::{ChatHandler, InboundMessage, Reply, EMPTY_MESSAGE_STAND_IN};
use wren::memory::{ConversationStore, Turn};
use wren::providers::Role;

use crate::support::{engine_with, Script, ScriptedProvider};

fn handler_with(provider: Arc<ScriptedProvider>) -> ChatHandler {
    ChatHandler::new(
        Arc::new(ConversationStore::default()),
        Arc::new(engine_with(provider)),
    )
}

fn envelope_of(reply: Option<Reply>) -> wren::agent::ResponseEnvelope {
    match reply {
        Some(Reply::Envelope(envelope)) => envelope,
        other => panic!("expected envelope, got {other:?}"),
    }
}

#[tokio::test]
async fn bot_messages_are_ignored() {
    let provider = ScriptedProvider::replying("hi");
    let handler = handler_with(provider.clone());
    let inbound = InboundMessage {
        from_bot: true,
        ..InboundMessage::direct("u1", "!help")
    };

    assert!(handler.handle(&inbound).await.is_none());
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn unaddressed_messages_are_ignored() {
    let provider = ScriptedProvider::replying("hi");
    let handler = handler_with(provider.clone());
    let inbound = InboundMessage {
        addressed: false,
        ..InboundMessage::direct("u1", "hello there")
    };

    assert!(handler.handle(&inbound).await.is_none());
    assert!(provider.requests().is_empty());
    assert!(handler.store().history("u1").is_empty());
}

#[tokio::test]
async fn commands_work_without_a_mention() {
    let provider = ScriptedProvider::replying("hi");
    let handler = handler_with(provider.clone());
    let inbound = InboundMessage {
        addressed: false,
        ..InboundMessage::direct("u1", "!time")
    };

    match handler.handle(&inbound).await {
        Some(Reply::Text(text)) => assert!(text.contains("**afternoon**")),
        other => panic!("expected time text, got {other:?}"),
    }
    assert!(matches!(
        handler.handle(&InboundMessage::direct("u1", "!help")).await,
        Some(Reply::Help(_))
    ));
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn clear_forgets_the_sender_only() {
    let handler = handler_with(ScriptedProvider::replying("hi"));
    handler.store().append_exchange("u1", "a", "b");
    handler.store().append_exchange("u2", "c", "d");

    let reply = handler.handle(&InboundMessage::direct("u1", "!clear")).await;

    assert_eq!(reply, Some(Reply::Text(CLEARED_REPLY.to_owned())));
    assert!(handler.store().history("u1").is_empty());
    assert_eq!(handler.store().history("u2").len(), 2);
}

#[tokio::test]
async fn exchange_is_recorded_after_reply() {
    let provider = ScriptedProvider::replying("Try X");
    let handler = handler_with(provider.clone());

    let inbound = InboundMessage::direct("u1", "<@42> How do I fix this Python error?");
    let envelope = envelope_of(handler.handle(&inbound).await);

    assert_eq!(envelope.content, "Try X");
    assert_eq!(
        handler.store().history("u1"),
        vec![
            Turn::user("How do I fix this Python error?"),
            Turn::assistant("Try X"),
        ]
    );

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    let last = requests[0].messages.last().expect("user turn");
    assert_eq!(last.role, Role::User);
    assert_eq!(last.content, "How do I fix this Python error?");
}

#[tokio::test]
async fn prior_turns_are_sent_as_context() {
    let provider = ScriptedProvider::replying("ok");
    let handler = handler_with(provider.clone());
    handler.store().append_exchange("u1", "first", "answer");

    handler.handle(&InboundMessage::direct("u1", "second")).await;

    let messages = &provider.requests()[0].messages;
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[1].content, "first");
    assert_eq!(messages[2].role, Role::Assistant);
    assert_eq!(messages[3].content, "second");
}

#[tokio::test]
async fn mention_only_message_becomes_greeting() {
    let provider = ScriptedProvider::replying("Good afternoon, Sir.");
    let handler = handler_with(provider.clone());

    handler.handle(&InboundMessage::direct("u1", "<@!42>")).await;

    let requests = provider.requests();
    let last = requests[0].messages.last().expect("user turn");
    assert_eq!(last.content, EMPTY_MESSAGE_STAND_IN);
    assert_eq!(
        handler.store().history("u1")[0],
        Turn::user(EMPTY_MESSAGE_STAND_IN)
    );
}

#[tokio::test]
async fn failed_call_still_records_fallback_reply() {
    let handler = handler_with(ScriptedProvider::new(Script::Status(503)));

    let inbound = InboundMessage::direct("u1", "hello");
    let envelope = envelope_of(handler.handle(&inbound).await);

    assert!(envelope.is_error());
    assert_eq!(
        handler.store().history("u1"),
        vec![Turn::user("hello"), Turn::assistant(TECHNICAL_DIFFICULTY_REPLY)]
    );
}
