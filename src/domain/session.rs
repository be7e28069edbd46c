use super::message::MessageOrigin;

/// Who is logged in and who the conversation is with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    current_username: String,
    active_recipient: Option<String>,
}

impl SessionContext {
    pub fn new(current_username: impl Into<String>) -> Self {
        Self {
            current_username: current_username.into(),
            active_recipient: None,
        }
    }

    pub fn current_username(&self) -> &str {
        &self.current_username
    }

    pub fn active_recipient(&self) -> Option<&str> {
        self.active_recipient.as_deref()
    }

    pub fn set_active_recipient(&mut self, username: impl Into<String>) {
        self.active_recipient = Some(username.into());
    }

    pub fn is_current_user(&self, username: &str) -> bool {
        self.current_username == username
    }

    /// True when `sender -> recipient` is the open conversation, in either direction.
    pub fn is_active_conversation(&self, sender: &str, recipient: &str) -> bool {
        let Some(peer) = self.active_recipient.as_deref() else {
            return false;
        };
        let me = self.current_username.as_str();

        (sender == peer && recipient == me) || (sender == me && recipient == peer)
    }

    pub fn origin_of(&self, sender: &str) -> MessageOrigin {
        MessageOrigin::classify(sender, &self.current_username)
    }
}
