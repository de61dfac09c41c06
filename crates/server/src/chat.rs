//! Advisor chat endpoints.
//!
//! A new message is stored first, then the advisor sees a short snapshot of
//! the owner's finances followed by the recent history. A failed advisor call
//! leaves the user message in place and stores no reply.

use api_types::chat::{ChatHistoryResponse, ChatMessageView, ChatReply, ChatRole, ChatSend};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{Goal, Period, Summary, today_in};

use crate::{Owner, PromptMessage, PromptRole, ServerError, server::ServerState};

fn map_role(role: engine::ChatRole) -> ChatRole {
    match role {
        engine::ChatRole::User => ChatRole::User,
        engine::ChatRole::Assistant => ChatRole::Assistant,
    }
}

fn map_message(message: engine::ChatMessage) -> ChatMessageView {
    ChatMessageView {
        id: message.id,
        role: map_role(message.role),
        content: message.content,
        created_at: message.created_at.fixed_offset(),
    }
}

fn prompt_message(message: &engine::ChatMessage) -> PromptMessage {
    let role = match message.role {
        engine::ChatRole::User => PromptRole::User,
        engine::ChatRole::Assistant => PromptRole::Assistant,
    };
    PromptMessage::new(role, message.content.clone())
}

fn goal_line(goal: &Goal) -> String {
    let mut line = format!(
        "Goal '{}': saved {} of {} ({:.0}%)",
        goal.name,
        goal.saved_minor,
        goal.target_minor,
        goal.progress() * 100.0
    );
    if goal.is_reached() {
        line.push_str(", reached");
    } else if let Some(deadline) = goal.deadline {
        line.push_str(&format!(", deadline {deadline}"));
    }
    line.push_str(".\n");
    line
}

/// System turn describing the owner's current month and goals.
/// Amounts stay in minor units.
fn advisor_context(summary: &Summary, goals: &[Goal]) -> String {
    let mut context = format!(
        "You are a personal finance advisor. Amounts are integer minor units.\n\
         Period {}: income {}, expenses {}, net {}.\n",
        summary.period, summary.income_minor, summary.expense_minor, summary.net_minor
    );
    for total in summary.by_category.iter().take(5) {
        context.push_str(&format!(
            "Category {}: {}.\n",
            total.category_id, total.total_minor
        ));
    }
    if goals.is_empty() {
        context.push_str("No savings goals.\n");
    }
    for goal in goals {
        context.push_str(&goal_line(goal));
    }
    context
}

pub async fn send(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    payload: Result<Json<ChatSend>, JsonRejection>,
) -> Result<Json<ChatReply>, ServerError> {
    let Json(payload) = payload?;
    let store = &state.engine;

    store
        .append_chat_message(&owner.id, engine::ChatRole::User, &payload.message)
        .await?;

    let period = Period::current_month(today_in(state.timezone))?;
    let summary = store.summary(&owner.id, period, None).await?;
    let goals = store.list_goals(&owner.id).await?;
    let history = store
        .chat_history(&owner.id, Some(state.chat_history_limit))
        .await?;

    let mut prompt = Vec::with_capacity(history.len() + 1);
    prompt.push(PromptMessage::new(
        PromptRole::System,
        advisor_context(&summary, &goals),
    ));
    prompt.extend(history.iter().map(prompt_message));

    let reply = state.advisor.reply(&prompt).await?;
    let stored = store
        .append_chat_message(&owner.id, engine::ChatRole::Assistant, &reply)
        .await?;

    Ok(Json(ChatReply {
        reply: map_message(stored),
    }))
}

pub async fn history(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
) -> Result<Json<ChatHistoryResponse>, ServerError> {
    let messages = state
        .engine
        .chat_history(&owner.id, None)
        .await?
        .into_iter()
        .map(map_message)
        .collect();
    Ok(Json(ChatHistoryResponse { messages }))
}

pub async fn clear(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    let removed = state.engine.clear_chat_history(&owner.id).await?;
    tracing::debug!(owner_id = %owner.id, removed, "chat history cleared");
    Ok(StatusCode::NO_CONTENT)
}
