use crate::llm::ChatMessage;

/// Message log of one optimization run.
///
/// Append-only: there is no way to remove or edit a message once pushed.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Seeds the log with the system instructions and the user query
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
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
    use crate::llm::MessageRole;

    #[test]
    fn test_seeded_with_system_and_user() {
        let conversation = Conversation::new("sys", "usr");

        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.messages()[0].role, MessageRole::System);
        assert_eq!(conversation.messages()[1].role, MessageRole::User);
        assert_eq!(conversation.messages()[1].content, "usr");
    }

    #[test]
    fn test_push_appends() {
        let mut conversation = Conversation::new("sys", "usr");
        conversation.push(ChatMessage::tool_response("call_1", "body"));

        assert_eq!(conversation.len(), 3);
        assert_eq!(
            conversation.messages().last().unwrap().tool_call_id.as_deref(),
            Some("call_1")
        );
    }
}
