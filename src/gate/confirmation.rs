//! View model for the "leaving this site" confirmation prompt.
//!
//! Holds no decision logic: the gate opens it, the host renders it, and
//! the user's answer flows back through [`super::GatedLink::confirm`] or
//! [`super::GatedLink::dismiss`].

/// Question shown above the pending destination.
pub const PROMPT_MESSAGE: &str = "You are about to leave this site to go to an external page, \
do you trust this URL and go to it?";

/// Label of the "remember this domain" toggle.
pub const REMEMBER_LABEL: &str = "Trust this domain";

/// Label of the confirm action.
pub const GO_LABEL: &str = "Go";

/// A pending destination awaiting the user's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPrompt<'a> {
    href: &'a str,
    remember_checked: bool,
}

impl<'a> ConfirmationPrompt<'a> {
    /// Build a prompt for `href` with the toggle in the given position.
    pub fn new(href: &'a str, remember_checked: bool) -> Self {
        Self {
            href,
            remember_checked,
        }
    }

    /// Destination the user is about to open.
    pub fn href(&self) -> &'a str {
        self.href
    }

    /// Whether "Trust this domain" is currently checked.
    pub fn remember_checked(&self) -> bool {
        self.remember_checked
    }

    /// Prompt question.
    pub fn message(&self) -> &'static str {
        PROMPT_MESSAGE
    }

    /// Toggle label.
    pub fn remember_label(&self) -> &'static str {
        REMEMBER_LABEL
    }

    /// Confirm action label.
    pub fn go_label(&self) -> &'static str {
        GO_LABEL
    }
}

/// Render the prompt as plain text for terminal hosts.
pub fn render_prompt(prompt: &ConfirmationPrompt<'_>) -> String {
    let mark = if prompt.remember_checked() { 'x' } else { ' ' };
    format!(
        "{}\n\n    {}\n\n[{mark}] {}\n[{}]",
        prompt.message(),
        prompt.href(),
        prompt.remember_label(),
        prompt.go_label(),
    )
}
