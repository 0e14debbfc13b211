// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `barter conversations` command implementation.

use std::sync::Arc;

use barter_client::HttpMessagingApi;
use barter_config::BarterConfig;
use barter_core::{BarterError, ConversationSummary, MessagingApi, UserHandle};
use barter_messaging::{ChatRouter, ConversationList, MessagingView, policy_from_config};
use colored::Colorize;

/// Prints the local user's conversation list, one line per conversation.
pub async fn run_conversations(config: BarterConfig, user: UserHandle) -> Result<(), BarterError> {
    for line in list_conversations(&config, user).await? {
        println!("{line}");
    }
    Ok(())
}

/// Loads the index through the messaging view and renders it.
async fn list_conversations(
    config: &BarterConfig,
    user: UserHandle,
) -> Result<Vec<String>, BarterError> {
    let api: Arc<dyn MessagingApi> = Arc::new(HttpMessagingApi::from_config(config)?);
    let mut view = MessagingView::new(
        user,
        api,
        ChatRouter::new(),
        policy_from_config(&config.sync),
    );
    Ok(render_list(view.refresh_conversations().await))
}

fn render_list(list: &ConversationList) -> Vec<String> {
    if list.is_unavailable() {
        return vec!["conversations unavailable".yellow().to_string()];
    }
    if list.conversations.is_empty() {
        return vec!["no conversations yet".dimmed().to_string()];
    }
    list.conversations.iter().map(format_summary).collect()
}

fn format_summary(summary: &ConversationSummary) -> String {
    let intent = summary.to_intent();
    let mut line = format!(
        "{}  {}",
        summary.other_user.as_str().bold(),
        intent.display_title()
    );
    if summary.unread_count > 0 {
        line.push_str(&format!("  ({} unread)", summary.unread_count));
    }
    if let Some(last) = &summary.last_message {
        line.push_str(&format!("  {last}"));
    }
    line
}
