//! Use case for sending a private message to the active recipient.

/// Errors at the connection level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    /// The socket task is gone; nothing can be delivered.
    Disconnected,
}

/// Outbound side of the real-time connection.
pub trait MessageEmitter {
    /// Emits `send_private_message` with `{msg, recipient}`.
    fn emit_private_message(&self, recipient: &str, body: &str) -> Result<(), EmitError>;
}

impl<T: MessageEmitter + ?Sized> MessageEmitter for &T {
    fn emit_private_message(&self, recipient: &str, body: &str) -> Result<(), EmitError> {
        (*self).emit_private_message(recipient, body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// Text is empty after trimming whitespace.
    EmptyMessage,
    /// No conversation is open.
    NoRecipient,
    Disconnected,
}

/// Validates and emits the composed text.
///
/// The text goes out exactly as typed; trimming is only used to reject blank input.
pub fn send_message(
    emitter: &dyn MessageEmitter,
    recipient: Option<&str>,
    text: &str,
) -> Result<(), SendMessageError> {
    if text.trim().is_empty() {
        return Err(SendMessageError::EmptyMessage);
    }

    let Some(recipient) = recipient else {
        return Err(SendMessageError::NoRecipient);
    };

    emitter
        .emit_private_message(recipient, text)
        .map_err(|error| match error {
            EmitError::Disconnected => SendMessageError::Disconnected,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct StubEmitter {
        result: Result<(), EmitError>,
        captured: RefCell<Vec<(String, String)>>,
    }

    impl StubEmitter {
        fn with_result(result: Result<(), EmitError>) -> Self {
            Self {
                result,
                captured: RefCell::new(Vec::new()),
            }
        }
    }

    impl MessageEmitter for StubEmitter {
        fn emit_private_message(&self, recipient: &str, body: &str) -> Result<(), EmitError> {
            self.captured
                .borrow_mut()
                .push((recipient.to_owned(), body.to_owned()));
            self.result.clone()
        }
    }

    #[test]
    fn rejects_blank_text_without_emitting() {
        let emitter = StubEmitter::with_result(Ok(()));

        assert_eq!(
            send_message(&emitter, Some("bob"), ""),
            Err(SendMessageError::EmptyMessage)
        );
        assert_eq!(
            send_message(&emitter, Some("bob"), "  \t "),
            Err(SendMessageError::EmptyMessage)
        );
        assert!(emitter.captured.borrow().is_empty());
    }

    #[test]
    fn rejects_missing_recipient_without_emitting() {
        let emitter = StubEmitter::with_result(Ok(()));

        let result = send_message(&emitter, None, "hello");

        assert_eq!(result, Err(SendMessageError::NoRecipient));
        assert!(emitter.captured.borrow().is_empty());
    }

    #[test]
    fn emits_text_as_typed_to_recipient() {
        let emitter = StubEmitter::with_result(Ok(()));

        send_message(&emitter, Some("bob"), "  hi there ").expect("send should succeed");

        assert_eq!(
            *emitter.captured.borrow(),
            vec![("bob".to_owned(), "  hi there ".to_owned())]
        );
    }

    #[test]
    fn maps_disconnected_emitter() {
        let emitter = StubEmitter::with_result(Err(EmitError::Disconnected));

        let result = send_message(&emitter, Some("bob"), "hello");

        assert_eq!(result, Err(SendMessageError::Disconnected));
    }
}
