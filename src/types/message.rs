//! Conversation transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::steps::Step;

/// Who authored a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    System,
    Assistant,
}

/// A single immutable transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Step the message was written under
    pub step: Step,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>, step: Step) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            step,
        }
    }
}

/// Append-only list of messages for one session
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: MessageRole, content: impl Into<String>, step: Step) -> &Message {
        self.messages.push(Message::new(role, content, step));
        &self.messages[self.messages.len() - 1]
    }

    pub fn assistant(&mut self, content: impl Into<String>, step: Step) -> &Message {
        self.push(MessageRole::Assistant, content, step)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages written under `step`, in order
    pub fn for_step(&self, step: Step) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.step == step)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_appends_in_order() {
        let mut transcript = Transcript::new();
        transcript.push(MessageRole::System, "welcome", Step::Clinic);
        transcript.push(MessageRole::User, "hi", Step::Clinic);
        transcript.assistant("next", Step::Department);

        let contents: Vec<&str> = transcript
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["welcome", "hi", "next"]);
    }

    #[test]
    fn test_for_step_filters_by_step() {
        let mut transcript = Transcript::new();
        transcript.assistant("a", Step::Clinic);
        transcript.assistant("b", Step::Department);
        transcript.assistant("c", Step::Clinic);

        let clinic: Vec<&str> = transcript
            .for_step(Step::Clinic)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(clinic, vec!["a", "c"]);
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::new(MessageRole::User, "x", Step::Clinic);
        let b = Message::new(MessageRole::User, "x", Step::Clinic);
        assert_ne!(a.id, b.id);
    }
}
