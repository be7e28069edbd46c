//! Domain layer: conversation state and the rules that mutate it.

pub mod composer_state;
pub mod events;
pub mod message;
pub mod message_pane_state;
pub mod session;
pub mod shell_state;
pub mod user_list_state;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
