/// Whether a rendered message was written by the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOrigin {
    Mine,
    Other,
}

impl MessageOrigin {
    pub fn classify(sender: &str, current_username: &str) -> Self {
        if sender == current_username {
            Self::Mine
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: String,
    pub body: String,
    /// Server timestamp (`%Y-%m-%d %H:%M:%S`), present on history entries only.
    pub sent_at: Option<String>,
}

impl Message {
    pub fn new(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            sent_at: None,
        }
    }

    pub fn with_sent_at(mut self, sent_at: impl Into<String>) -> Self {
        self.sent_at = Some(sent_at.into());
        self
    }

    /// Returns `HH:MM` taken from the server timestamp, if it parses.
    pub fn display_time(&self) -> Option<String> {
        let raw = self.sent_at.as_deref()?;
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|at| at.format("%H:%M").to_string())
    }

    /// Same author and text. Timestamps are ignored since live messages carry none.
    pub fn same_content(&self, other: &Message) -> bool {
        self.sender == other.sender && self.body == other.body
    }
}
