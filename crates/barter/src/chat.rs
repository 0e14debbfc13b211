// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `barter chat` and `barter open` command implementation.
//!
//! Publishes the requested conversation through the handoff router, lets the
//! messaging view pick it up, then runs a readline prompt next to the live
//! timeline until the user quits or a shutdown signal arrives.

use std::sync::Arc;

use barter_client::HttpMessagingApi;
use barter_config::BarterConfig;
use barter_core::{BarterError, ChatIntent, ItemId, Message, MessagingApi, UserHandle};
use barter_messaging::{ChatRouter, ChatSession, MessagingView, SendOutcome, policy_from_config};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Where the conversation to open comes from.
#[derive(Debug, Clone)]
pub enum IntentSource {
    /// Built from `--with`, `--item` and `--item-title`.
    Flags {
        other: String,
        item: Option<String>,
        item_title: Option<String>,
    },
    /// A JSON handoff payload as published by another view.
    Json(String),
}

impl IntentSource {
    fn publish(self, router: &ChatRouter) -> Result<(), BarterError> {
        match self {
            IntentSource::Flags {
                other,
                item,
                item_title,
            } => {
                router.publish(ChatIntent {
                    other_user: UserHandle::new(other.trim()),
                    item_id: item.map(ItemId::new),
                    item_title,
                });
                Ok(())
            }
            IntentSource::Json(payload) => router.publish_json(&payload),
        }
    }
}

/// Runs the `barter chat` / `barter open` REPL.
pub async fn run_chat(
    config: BarterConfig,
    user: UserHandle,
    source: IntentSource,
    shutdown: CancellationToken,
) -> Result<(), BarterError> {
    let api: Arc<dyn MessagingApi> = Arc::new(HttpMessagingApi::from_config(&config)?);
    let router = ChatRouter::new();
    source.publish(&router)?;

    let mut view = MessagingView::new(
        user.clone(),
        api,
        router,
        policy_from_config(&config.sync),
    );
    let Some(session) = view.activate().await? else {
        return Err(BarterError::Internal("chat intent was not consumed".into()));
    };

    println!(
        "{} {} {}",
        "chat with".bold().green(),
        session.identity().other().as_str().bold(),
        format!("({})", session.item_title().unwrap_or_default())
            .as_str()
            .dimmed()
    );
    println!("Type {} to leave.\n", "/quit".yellow());

    session.mark_read().await;
    run_repl(session, &user, &shutdown).await;

    let list = view.leave().await;
    debug!(
        count = list.conversations.len(),
        status = %list.status,
        "conversation index rebuilt"
    );
    Ok(())
}

enum Input {
    Line(String),
    Quit,
}

/// Reads lines on a dedicated thread; readline blocks and cannot be awaited.
fn spawn_reader(prompt: String) -> mpsc::Receiver<Input> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                warn!(error = %e, "failed to initialize readline");
                let _ = tx.blocking_send(Input::Quit);
                return;
            }
        };
        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let _ = rl.add_history_entry(line.as_str());
                    if tx.blocking_send(Input::Line(line)).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                    let _ = tx.blocking_send(Input::Quit);
                    break;
                }
                Err(e) => {
                    eprintln!("{}: {e}", "error".red());
                    let _ = tx.blocking_send(Input::Quit);
                    break;
                }
            }
        }
    });
    rx
}

async fn run_repl(session: &ChatSession, local: &UserHandle, shutdown: &CancellationToken) {
    let mut snapshots = session.subscribe();
    let mut printed: Vec<Message> = Vec::new();
    let mut input = spawn_reader(format!("{}> ", local.as_str().green()));

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let timeline = snapshots.borrow_and_update().timeline.clone();
                print_update(diff_timeline(&printed, &timeline), local);
                printed = timeline;
            }
            line = input.recv() => match line {
                Some(Input::Line(line)) => {
                    let command = line.trim();
                    if command == "/quit" || command == "/exit" {
                        break;
                    }
                    match session.send_message(&line).await {
                        Ok(SendOutcome::Delivered(_) | SendOutcome::EmptyContent) => {}
                        Err(e) => eprintln!("{}: {e} (message not sent)", "error".red()),
                    }
                }
                Some(Input::Quit) | None => break,
            }
        }
    }

    session.close();
}

/// How the timeline changed since it was last printed.
#[derive(Debug, PartialEq)]
enum TimelineUpdate<'a> {
    Unchanged,
    Appended(&'a [Message]),
    Replaced(&'a [Message]),
}

fn diff_timeline<'a>(printed: &[Message], current: &'a [Message]) -> TimelineUpdate<'a> {
    if current == printed {
        TimelineUpdate::Unchanged
    } else if current.starts_with(printed) {
        TimelineUpdate::Appended(&current[printed.len()..])
    } else {
        TimelineUpdate::Replaced(current)
    }
}

fn print_update(update: TimelineUpdate<'_>, local: &UserHandle) {
    let messages = match update {
        TimelineUpdate::Unchanged => return,
        TimelineUpdate::Appended(new) => new,
        TimelineUpdate::Replaced(all) => {
            println!("{}", "-- conversation refreshed --".dimmed());
            all
        }
    };
    for message in messages {
        println!("{}", format_message(message, local));
    }
}

fn format_message(message: &Message, local: &UserHandle) -> String {
    let who = if &message.sender == local {
        "you".green().bold()
    } else {
        message.sender.as_str().cyan().bold()
    };
    format!(
        "[{}] {who}: {}",
        message.timestamp.format("%H:%M"),
        message.content
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(sender: &str, content: &str) -> Message {
        serde_json::from_value(serde_json::json!({
            "sender": sender,
            "receiver": if sender == "ayesha" { "bilal" } else { "ayesha" },
            "content": content,
            "timestamp": "2026-03-14T09:05:00",
        }))
        .unwrap()
    }

    #[test]
    fn diff_detects_appends_and_replacements() {
        let a = msg("ayesha", "Is this still available?");
        let b = msg("bilal", "Yes!");

        assert_eq!(diff_timeline(&[], &[]), TimelineUpdate::Unchanged);
        assert_eq!(
            diff_timeline(&[a.clone()], &[a.clone(), b.clone()]),
            TimelineUpdate::Appended(&[b.clone()])
        );
        assert_eq!(
            diff_timeline(&[a.clone()], &[b.clone()]),
            TimelineUpdate::Replaced(&[b])
        );
    }

    #[test]
    fn format_message_labels_own_messages() {
        colored::control::set_override(false);
        let local = UserHandle::from("ayesha");

        assert_eq!(
            format_message(&msg("ayesha", "hi"), &local),
            "[09:05] you: hi"
        );
        assert_eq!(
            format_message(&msg("bilal", "Yes!"), &local),
            "[09:05] bilal: Yes!"
        );
    }

    #[test]
    fn flags_publish_intent_with_item() {
        let router = ChatRouter::new();
        IntentSource::Flags {
            other: "bilal".into(),
            item: Some("42".into()),
            item_title: Some("Guitar Lessons".into()),
        }
        .publish(&router)
        .unwrap();

        assert_eq!(
            router.consume(),
            Some(ChatIntent::new("bilal").with_item("42", "Guitar Lessons"))
        );
    }

    #[test]
    fn json_source_rejects_malformed_payload() {
        let router = ChatRouter::new();
        let err = IntentSource::Json("{\"itemId\":42}".into())
            .publish(&router)
            .unwrap_err();
        assert!(matches!(err, BarterError::Decode { .. }));
        assert_eq!(router.consume(), None);
    }
}
