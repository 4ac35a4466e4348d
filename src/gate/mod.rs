//! Navigation gate for outbound links.
//!
//! Each activation of a [`GatedLink`] is evaluated synchronously against
//! the warning setting, the static trust list, and the [`TrustRegistry`].
//! Trusted or non-external targets pass through untouched; anything else
//! has its default action cancelled and opens a confirmation prompt that
//! the host resolves with [`GatedLink::confirm`] or [`GatedLink::dismiss`].

pub mod confirmation;
pub mod domain;
pub mod static_list;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::opener::{ExternalOpener, OPEN_FEATURES, OPEN_TARGET};
use crate::registry::TrustRegistry;
use crate::settings::{jump_out_link_warn, SettingsProvider};

use self::confirmation::ConfirmationPrompt;
use self::domain::{extract_domain, Domain};
use self::static_list::is_static_trusted;

// ---------------------------------------------------------------------------
// Decisions and outcomes
// ---------------------------------------------------------------------------

/// Why a navigation was let through without a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    /// The "warn on external jump" setting is off.
    WarningDisabled,
    /// The link has no href.
    MissingHref,
    /// The href is not an absolute URL with a host.
    Unparseable,
    /// The domain is on the compiled-in trust list.
    StaticTrust,
    /// The user previously chose to trust the domain.
    Remembered,
}

/// Outcome of evaluating one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Navigation proceeds via the default action.
    Allowed(AllowReason),
    /// Navigation is suspended until the user confirms.
    AwaitingConfirmation(Domain),
}

impl Decision {
    /// Returns `true` for [`Decision::Allowed`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }
}

/// Result of resolving an open prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The host opened the destination.
    Navigated {
        /// Whether the domain was added to the registry.
        remembered: bool,
    },
    /// The host failed to open the destination.
    OpenFailed {
        /// Whether the domain was added to the registry.
        remembered: bool,
    },
    /// The user closed the prompt without navigating.
    Dismissed,
    /// The link lost its href; nothing was opened or persisted.
    MissingHref,
    /// No prompt was open.
    NotPending,
}

// ---------------------------------------------------------------------------
// Activation event
// ---------------------------------------------------------------------------

/// The UI event that triggered a link activation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkEvent {
    default_prevented: bool,
}

impl LinkEvent {
    /// A fresh event whose default action is still pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the event's default navigation.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether the default navigation was cancelled.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Caller-supplied click handler, run before gating on every activation.
pub type ClickHandler = Box<dyn FnMut(&mut LinkEvent) + Send>;

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// Shared trust decision logic and the collaborators it acts through.
pub struct NavigationGate {
    registry: Arc<TrustRegistry>,
    opener: Arc<dyn ExternalOpener>,
}

impl std::fmt::Debug for NavigationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationGate")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl NavigationGate {
    /// Create a gate over a trust registry and a host opener.
    pub fn new(registry: Arc<TrustRegistry>, opener: Arc<dyn ExternalOpener>) -> Self {
        Self { registry, opener }
    }

    /// The registry consulted and updated by this gate.
    pub fn registry(&self) -> &TrustRegistry {
        &self.registry
    }

    /// Decide whether navigating to `href` needs confirmation.
    ///
    /// Reads the warning setting afresh on every call.
    pub fn evaluate(&self, href: Option<&str>, settings: &dyn SettingsProvider) -> Decision {
        if !jump_out_link_warn(settings) {
            return Decision::Allowed(AllowReason::WarningDisabled);
        }

        let Some(href) = href.filter(|h| !h.is_empty()) else {
            return Decision::Allowed(AllowReason::MissingHref);
        };

        let Some(domain) = extract_domain(href) else {
            debug!(href, "link target has no domain; not gated");
            return Decision::Allowed(AllowReason::Unparseable);
        };

        if is_static_trusted(&domain) {
            return Decision::Allowed(AllowReason::StaticTrust);
        }
        if self.registry.is_trusted(domain.as_str()) {
            return Decision::Allowed(AllowReason::Remembered);
        }

        debug!(domain = %domain, "untrusted domain; confirmation required");
        Decision::AwaitingConfirmation(domain)
    }
}

// ---------------------------------------------------------------------------
// Gated link
// ---------------------------------------------------------------------------

/// Transient prompt state of one link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateState {
    /// Whether the confirmation prompt is showing.
    pub is_prompt_open: bool,
    /// Whether "Trust this domain" is checked.
    pub remember_checked: bool,
}

/// An outbound link wrapped by the navigation gate.
pub struct GatedLink {
    href: Option<String>,
    on_click: Option<ClickHandler>,
    state: GateState,
}

impl std::fmt::Debug for GatedLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatedLink")
            .field("href", &self.href)
            .field("on_click", &self.on_click.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl GatedLink {
    /// Wrap a link with an optional href.
    pub fn new(href: Option<String>) -> Self {
        Self {
            href,
            on_click: None,
            state: GateState::default(),
        }
    }

    /// Attach the link's own click handler.
    pub fn with_on_click(mut self, handler: impl FnMut(&mut LinkEvent) + Send + 'static) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }

    /// The link target, if any.
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    /// Current prompt state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Handle an activation of this link.
    ///
    /// The click handler always runs first. When the decision is
    /// [`Decision::AwaitingConfirmation`] the event's default action is
    /// cancelled and the prompt opens.
    pub fn activate(
        &mut self,
        gate: &NavigationGate,
        settings: &dyn SettingsProvider,
        event: &mut LinkEvent,
    ) -> Decision {
        if let Some(handler) = self.on_click.as_mut() {
            handler(event);
        }

        let decision = gate.evaluate(self.href.as_deref(), settings);
        if let Decision::AwaitingConfirmation(_) = decision {
            event.prevent_default();
            self.state.is_prompt_open = true;
        }
        decision
    }

    /// The prompt to render, while one is open.
    pub fn prompt(&self) -> Option<ConfirmationPrompt<'_>> {
        if !self.state.is_prompt_open {
            return None;
        }
        let href = self.href.as_deref()?;
        Some(ConfirmationPrompt::new(href, self.state.remember_checked))
    }

    /// Set the "Trust this domain" toggle. Ignored while no prompt is open.
    pub fn set_remember(&mut self, checked: bool) {
        if self.state.is_prompt_open {
            self.state.remember_checked = checked;
        }
    }

    /// Close the prompt without navigating.
    pub fn dismiss(&mut self) -> PromptOutcome {
        if !self.state.is_prompt_open {
            return PromptOutcome::NotPending;
        }
        self.state = GateState::default();
        debug!(href = self.href.as_deref().unwrap_or(""), "external navigation dismissed");
        PromptOutcome::Dismissed
    }

    /// Confirm the pending navigation.
    ///
    /// Opens the href in a new unprivileged context, then remembers its
    /// domain if the toggle was checked. The prompt closes either way.
    pub fn confirm(&mut self, gate: &NavigationGate) -> PromptOutcome {
        if !self.state.is_prompt_open {
            return PromptOutcome::NotPending;
        }
        let remember = self.state.remember_checked;
        self.state = GateState::default();

        let Some(href) = self.href.as_deref().filter(|h| !h.is_empty()) else {
            return PromptOutcome::MissingHref;
        };

        let opened = match gate.opener.open(href, OPEN_TARGET, OPEN_FEATURES) {
            Ok(()) => true,
            Err(e) => {
                warn!(href, error = %e, "failed to open external link");
                false
            }
        };

        let remembered = remember
            && match extract_domain(href) {
                Some(domain) => {
                    gate.registry.remember(domain.as_str());
                    true
                }
                None => false,
            };

        if opened {
            PromptOutcome::Navigated { remembered }
        } else {
            PromptOutcome::OpenFailed { remembered }
        }
    }
}
