use chrono::{DateTime, Utc};

use super::format::relative_time;
use crate::domain::{ChatRole, RoutingTarget};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub role: ChatRole,
    pub avatar: &'static str,
    pub content: String,
    /// " via {model}" when the reply was pinned to a model
    pub via: Option<String>,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatDisplay {
    pub lines: Vec<ChatLine>,
    pub routing_target: String,
}

pub fn chat(state: &AppState, now: DateTime<Utc>) -> ChatDisplay {
    ChatDisplay {
        lines: state
            .chat
            .iter()
            .map(|message| ChatLine {
                role: message.role,
                avatar: match message.role {
                    ChatRole::User => "👤",
                    ChatRole::Assistant => "🤖",
                },
                content: message.content.clone(),
                via: match &message.model {
                    Some(RoutingTarget::Model(model)) => Some(format!("via {model}")),
                    _ => None,
                },
                time: relative_time(message.timestamp, now),
            })
            .collect(),
        routing_target: state.routing_target.to_string(),
    }
}
