//! Turning a window descriptor into a placement decision
use crate::{
    rules::{Cosmetics, LifecycleActions, Match, PlacementSpec, RuleTable},
    window::WindowDescriptor,
    Error,
};
use std::time::Duration;
use tracing::{debug, warn};

/// Where a resolution request sits within the lifetime of a window.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    /// The number of retries that have already been run for this window
    pub retries: u32,
    /// Whether this window existed before the engine started. Windows found during the startup
    /// scan are never deferred and have no created-delay applied.
    pub initial_scan: bool,
}

impl Attempt {
    /// The first evaluation of a newly created window.
    pub fn first() -> Self {
        Self::default()
    }

    /// The evaluation of a window found during the startup scan.
    pub fn initial_scan() -> Self {
        Self {
            retries: 0,
            initial_scan: true,
        }
    }

    /// The attempt following this one.
    pub fn next(self) -> Self {
        Self {
            retries: self.retries + 1,
            ..self
        }
    }
}

/// A final placement decision for a managed window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// The index of the rule that produced this placement
    pub rule: usize,
    /// The workspaces the window should become a member of
    pub placements: Vec<PlacementSpec>,
    /// Lifecycle actions to run once the window has been placed
    pub actions: LifecycleActions,
    /// Cosmetic hints for the window system
    pub cosmetics: Cosmetics,
    /// How long to wait before acting on the placement
    pub created_delay: Option<Duration>,
}

/// The outcome of resolving a window descriptor against a [RuleTable].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The window is left to the window system and never placed.
    ///
    /// `rule` is `None` when no rule matched the window at all.
    Unmanaged {
        /// The rule that marked this window as unmanaged
        rule: Option<usize>,
    },
    /// The descriptor is not yet reliable: resolve again with a fresh descriptor once `after`
    /// has elapsed.
    Deferred {
        /// How long to wait before re-evaluating
        after: Duration,
        /// The rule that requested the retry
        rule: usize,
        /// The attempt to use for the re-evaluation
        next: Attempt,
    },
    /// The window should be placed.
    Placed(Placement),
}

/// Applies a [RuleTable] to window descriptors.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    table: &'a RuleTable,
}

impl<'a> Resolver<'a> {
    /// Create a new resolver for the given table.
    pub fn new(table: &'a RuleTable) -> Self {
        Self { table }
    }

    /// Resolve a descriptor into a [Resolution].
    ///
    /// Recoverable problems encountered along the way (failing predicates or a window that no
    /// rule matches) are pushed onto `diagnostics` rather than returned.
    ///
    /// A matched rule with a retry policy defers the first evaluation of every newly created
    /// window unconditionally. Further retries (up to the configured maximum) are only requested
    /// while the window title is still empty.
    pub fn resolve(
        &self,
        w: &WindowDescriptor,
        attempt: Attempt,
        diagnostics: &mut Vec<Error>,
    ) -> Resolution {
        let (index, rule) = match self.table.find_match(w, diagnostics) {
            Match::Rule { index, rule } => (index, rule),
            Match::NoMatch => {
                warn!(handle = %w.handle, class = %w.class_name, "no rule matched window: leaving unmanaged");
                diagnostics.push(Error::UnresolvableWindow(w.handle));
                return Resolution::Unmanaged { rule: None };
            }
        };

        if !rule.managed {
            debug!(handle = %w.handle, rule = index, "window is unmanaged");
            return Resolution::Unmanaged { rule: Some(index) };
        }

        if let Some(retry) = rule.retry {
            let remaining = attempt.retries < retry.max_attempts;
            let unreliable = attempt.retries == 0 || w.title.is_empty();

            if !attempt.initial_scan && remaining && unreliable {
                debug!(handle = %w.handle, rule = index, after = ?retry.after, retries = attempt.retries, "deferring resolution");
                return Resolution::Deferred {
                    after: retry.after,
                    rule: index,
                    next: attempt.next(),
                };
            }
        }

        let created_delay = if attempt.initial_scan {
            None
        } else {
            rule.created_delay
        };

        debug!(handle = %w.handle, rule = index, n_placements = rule.placements.len(), "window placed");

        Resolution::Placed(Placement {
            rule: index,
            placements: rule.placements.clone(),
            actions: rule.actions,
            cosmetics: rule.cosmetics,
            created_delay,
        })
    }
}
