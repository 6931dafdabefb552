//! Window classification rules.
//!
//! A [Rule] is a conjunction of [Query] predicates along with what should happen to any window
//! that it matches: whether the window is managed at all, which workspaces it should be placed
//! on and with which decorations, how long to wait before acting on it and what to do when it
//! is created or re-shown.
//!
//! Rules are constructed using a [RuleBuilder]:
//!
//! ```
//! use casement::rules::{Decoration, PlacementSpec, Rule};
//! use std::time::Duration;
//!
//! let vim = Rule::builder()
//!     .class_name("^Vim$")
//!     .placement(
//!         PlacementSpec::on(3)
//!             .titlebar(Decoration::Hidden)
//!             .borders(Decoration::Hidden),
//!     )
//!     .created_delay(Duration::from_millis(100))
//!     .build()
//!     .unwrap();
//!
//! assert!(!vim.is_wildcard());
//! ```
use crate::{
    rules::query::{
        ClassName, ExStyleContains, ExStyleNotContains, HandlePredicate, ProcessName,
        StyleContains, StyleNotContains, Title,
    },
    window::{ExtendedStyle, Handle, WindowDescriptor, WindowStyle},
    Result,
};
use std::{fmt, time::Duration};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod query;
pub mod resolve;
pub mod table;

#[doc(inline)]
pub use query::{Query, QueryExt};
#[doc(inline)]
pub use resolve::{Placement, Resolution, Resolver};
#[doc(inline)]
pub use table::{Match, RuleTable};

/// A reference to a workspace from within a [PlacementSpec].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WorkspaceRef {
    /// Whichever workspace is active on the current monitor when the placement is applied
    #[default]
    Current,
    /// A specific workspace by its 1-based id
    Id(usize),
}

impl From<usize> for WorkspaceRef {
    /// Workspace `0` refers to the current workspace, all other values are workspace ids.
    fn from(id: usize) -> Self {
        match id {
            0 => Self::Current,
            n => Self::Id(n),
        }
    }
}

/// Whether a piece of window decoration should be forced on, forced off or left alone.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Decoration {
    /// Force the decoration to be shown
    Shown,
    /// Force the decoration to be hidden
    Hidden,
    /// Leave the decoration as the application set it
    #[default]
    AsIs,
}

impl Decoration {
    /// The decoration state after a user toggle, given whether it is currently displayed.
    pub fn toggled(self, currently_shown: bool) -> Self {
        match self {
            Self::Shown => Self::Hidden,
            Self::Hidden => Self::Shown,
            Self::AsIs if currently_shown => Self::Hidden,
            Self::AsIs => Self::Shown,
        }
    }
}

/// How a matched window should be placed on one workspace.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementSpec {
    /// The target workspace
    pub workspace: WorkspaceRef,
    /// Whether the window floats above the layout rather than being tiled
    pub floating: bool,
    /// Titlebar visibility
    pub titlebar: Decoration,
    /// Window border visibility
    pub borders: Decoration,
    /// Taskbar and alt-tab presence
    pub in_taskbar: Decoration,
    /// Remove the window from the taskbar while this workspace is inactive
    pub hide_from_taskbar_when_inactive: bool,
}

impl PlacementSpec {
    /// A tiled placement on the given workspace with all decorations left as-is. Workspace `0`
    /// refers to the current workspace.
    pub fn on(workspace: usize) -> Self {
        Self {
            workspace: workspace.into(),
            ..Default::default()
        }
    }

    /// A tiled placement on the current workspace with all decorations left as-is.
    pub fn current() -> Self {
        Self::default()
    }

    /// Float the window on this workspace.
    pub fn floating(mut self) -> Self {
        self.floating = true;
        self
    }

    /// Set the titlebar visibility.
    pub fn titlebar(mut self, d: Decoration) -> Self {
        self.titlebar = d;
        self
    }

    /// Set the window border visibility.
    pub fn borders(mut self, d: Decoration) -> Self {
        self.borders = d;
        self
    }

    /// Set the taskbar and alt-tab presence.
    pub fn in_taskbar(mut self, d: Decoration) -> Self {
        self.in_taskbar = d;
        self
    }

    /// Remove the window from the taskbar while this workspace is inactive.
    pub fn hide_from_taskbar_when_inactive(mut self) -> Self {
        self.hide_from_taskbar_when_inactive = true;
        self
    }
}

/// What to do with a window that is created on the workspace that is currently active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OnCreatedOnCurrent {
    /// Give the new window focus
    #[default]
    ActivateWindow,
    /// Push the new window to the bottom of the z-order, keeping the current focus
    MoveToBottom,
}

/// What to do with a window that appears on screen while none of its workspaces are active.
///
/// This is used both for newly created windows and for hidden windows that show themselves.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OnShown {
    /// Switch the current monitor to the first workspace of the window
    #[default]
    SwitchToWindowsWorkspace,
    /// Add the window to the currently active workspace
    MoveWindowToCurrentWorkspace,
    /// Leave the window on screen until the next workspace switch
    TemporarilyShowOnCurrentWorkspace,
    /// Hide the window again
    HideWindow,
}

/// The lifecycle actions selected by a rule.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LifecycleActions {
    /// Run when the window is created on an active workspace
    pub on_created_on_current: OnCreatedOnCurrent,
    /// Run when the window is created while none of its workspaces are active
    pub on_created: OnShown,
    /// Run when a hidden window shows itself
    pub on_hidden_shown: OnShown,
    /// Keep the topmost flag that the application set on the window
    pub preserve_topmost: bool,
}

/// Cosmetic hints passed through to the window system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cosmetics {
    /// Force the window to redraw each time it is shown
    pub redraw_on_show: bool,
    /// Redraw the desktop once the window has been created
    pub redraw_desktop_on_create: bool,
    /// Refresh the window icon when its title changes
    pub update_icon: bool,
    /// Show the window in taskbar style application tab widgets. The engine only records this
    /// for widgets to read through [State::window][crate::core::State::window].
    pub show_in_taskbar_tabs: bool,
    /// Keep the application menu of the window. When unset the menu is removed as soon as the
    /// window is placed.
    pub show_menu: bool,
}

impl Default for Cosmetics {
    fn default() -> Self {
        Self {
            redraw_on_show: false,
            redraw_desktop_on_create: false,
            update_icon: false,
            show_in_taskbar_tabs: true,
            show_menu: true,
        }
    }
}

/// Re-run matching for a window after a delay because its descriptor is not yet reliable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Retry {
    /// How long to wait before re-querying the descriptor and matching again
    pub after: Duration,
    /// The maximum number of re-evaluations for a single window
    pub max_attempts: u32,
}

impl Retry {
    /// Retry once after the given delay.
    pub fn once_after(after: Duration) -> Self {
        Self {
            after,
            max_attempts: 1,
        }
    }
}

/// A single entry in a [RuleTable].
pub struct Rule {
    pub(crate) name: Option<String>,
    pub(crate) predicates: Vec<Box<dyn Query>>,
    pub(crate) managed: bool,
    pub(crate) placements: Vec<PlacementSpec>,
    pub(crate) created_delay: Option<Duration>,
    pub(crate) retry: Option<Retry>,
    pub(crate) actions: LifecycleActions,
    pub(crate) cosmetics: Cosmetics,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("n_predicates", &self.predicates.len())
            .field("managed", &self.managed)
            .field("placements", &self.placements)
            .field("created_delay", &self.created_delay)
            .field("retry", &self.retry)
            .field("actions", &self.actions)
            .field("cosmetics", &self.cosmetics)
            .finish()
    }
}

impl Rule {
    /// Start building a new rule. With no further configuration this is a catch-all rule that
    /// manages every window on the current workspace.
    pub fn builder() -> RuleBuilder {
        RuleBuilder::default()
    }

    /// A catch-all rule using the default settings.
    pub fn catch_all() -> Self {
        RuleBuilder::default().finish(Vec::new())
    }

    /// Run every predicate of this rule against `w`, stopping at the first that does not hold.
    ///
    /// # Errors
    /// Any error returned by a predicate is returned directly: deciding how to recover is left
    /// to the caller.
    pub fn matches(&self, w: &WindowDescriptor) -> Result<bool> {
        for p in self.predicates.iter() {
            if !p.run(w)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Whether this rule matches every possible descriptor.
    pub fn is_wildcard(&self) -> bool {
        self.predicates.iter().all(|p| p.is_wildcard())
    }

    /// An optional human readable name for this rule, used in logs.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether matched windows are managed.
    pub fn is_managed(&self) -> bool {
        self.managed
    }

    /// The placements applied to matched windows.
    pub fn placements(&self) -> &[PlacementSpec] {
        &self.placements
    }

    /// How long to wait before acting on a matched window.
    pub fn created_delay(&self) -> Option<Duration> {
        self.created_delay
    }

    /// The retry policy for this rule.
    pub fn retry(&self) -> Option<Retry> {
        self.retry
    }

    /// The lifecycle actions selected by this rule.
    pub fn actions(&self) -> LifecycleActions {
        self.actions
    }

    /// The cosmetic hints for matched windows.
    pub fn cosmetics(&self) -> Cosmetics {
        self.cosmetics
    }
}

/// Builder for a [Rule].
///
/// Any predicate that is not set is a wildcard. Patterns are compiled once when
/// [RuleBuilder::build] is called.
#[derive(Default)]
pub struct RuleBuilder {
    name: Option<String>,
    class_name: Option<String>,
    title: Option<String>,
    process_name: Option<String>,
    style_contains: WindowStyle,
    style_not_contains: WindowStyle,
    ex_style_contains: ExtendedStyle,
    ex_style_not_contains: ExtendedStyle,
    queries: Vec<Box<dyn Query>>,
    handle_predicates: Vec<HandlePredicate>,
    unmanaged: bool,
    placements: Vec<PlacementSpec>,
    first_n_workspaces: usize,
    created_delay: Option<Duration>,
    retry: Option<Retry>,
    actions: LifecycleActions,
    cosmetics: Cosmetics,
}

impl fmt::Debug for RuleBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleBuilder")
            .field("name", &self.name)
            .field("class_name", &self.class_name)
            .field("title", &self.title)
            .field("process_name", &self.process_name)
            .finish_non_exhaustive()
    }
}

impl RuleBuilder {
    /// Name this rule for logging.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Match the window class name against a regular expression.
    pub fn class_name(mut self, pattern: impl Into<String>) -> Self {
        self.class_name = Some(pattern.into());
        self
    }

    /// Match the window title against a regular expression.
    pub fn title(mut self, pattern: impl Into<String>) -> Self {
        self.title = Some(pattern.into());
        self
    }

    /// Match the owning process name against a regular expression.
    pub fn process_name(mut self, pattern: impl Into<String>) -> Self {
        self.process_name = Some(pattern.into());
        self
    }

    /// Require every bit of `mask` to be set in the window style.
    pub fn style_contains(mut self, mask: WindowStyle) -> Self {
        self.style_contains |= mask;
        self
    }

    /// Require no bit of `mask` to be set in the window style.
    pub fn style_not_contains(mut self, mask: WindowStyle) -> Self {
        self.style_not_contains |= mask;
        self
    }

    /// Require every bit of `mask` to be set in the extended window style.
    pub fn ex_style_contains(mut self, mask: ExtendedStyle) -> Self {
        self.ex_style_contains |= mask;
        self
    }

    /// Require no bit of `mask` to be set in the extended window style.
    pub fn ex_style_not_contains(mut self, mask: ExtendedStyle) -> Self {
        self.ex_style_not_contains |= mask;
        self
    }

    /// Add an arbitrary [Query] over the window descriptor.
    pub fn matching<Q>(mut self, q: Q) -> Self
    where
        Q: Query + 'static,
    {
        self.queries.push(q.boxed());
        self
    }

    /// Add a custom predicate that receives only the window handle. Custom predicates are run
    /// after every other predicate of the rule.
    pub fn custom<F>(mut self, f: F) -> Self
    where
        F: Fn(Handle) -> Result<bool> + 'static,
    {
        self.handle_predicates.push(HandlePredicate::new(f));
        self
    }

    /// Leave matched windows entirely to the window system.
    pub fn unmanaged(mut self) -> Self {
        self.unmanaged = true;
        self
    }

    /// Add a placement for matched windows. Multiple placements make the window a member of
    /// several workspaces at once.
    pub fn placement(mut self, p: PlacementSpec) -> Self {
        self.placements.push(p);
        self
    }

    /// Place matched windows on each of the workspaces `1..=n` that does not already have an
    /// explicit placement.
    pub fn on_first_n_workspaces(mut self, n: usize) -> Self {
        self.first_n_workspaces = n;
        self
    }

    /// Delay acting on a matched window until the application has finished showing it.
    pub fn created_delay(mut self, delay: Duration) -> Self {
        self.created_delay = Some(delay);
        self
    }

    /// Re-run matching once after `after` has elapsed.
    pub fn retry_after(mut self, after: Duration) -> Self {
        self.retry = Some(Retry::once_after(after));
        self
    }

    /// Set an explicit retry policy.
    pub fn retry(mut self, retry: Retry) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Set the action run when a window is created on an active workspace.
    pub fn on_created_on_current(mut self, action: OnCreatedOnCurrent) -> Self {
        self.actions.on_created_on_current = action;
        self
    }

    /// Set the action run when a window is created while none of its workspaces are active.
    pub fn on_created(mut self, action: OnShown) -> Self {
        self.actions.on_created = action;
        self
    }

    /// Set the action run when a hidden window shows itself.
    pub fn on_hidden_shown(mut self, action: OnShown) -> Self {
        self.actions.on_hidden_shown = action;
        self
    }

    /// Keep the topmost flag set by the application.
    pub fn preserve_topmost(mut self) -> Self {
        self.actions.preserve_topmost = true;
        self
    }

    /// Set the cosmetic hints for matched windows.
    pub fn cosmetics(mut self, cosmetics: Cosmetics) -> Self {
        self.cosmetics = cosmetics;
        self
    }

    /// Compile all patterns and produce the final [Rule].
    ///
    /// # Errors
    /// Returns [crate::Error::InvalidPattern] if any of the patterns fail to compile.
    pub fn build(mut self) -> Result<Rule> {
        let mut predicates: Vec<Box<dyn Query>> = Vec::new();

        if let Some(p) = self.class_name.take() {
            predicates.push(ClassName::new(&p)?.boxed());
        }
        if let Some(p) = self.title.take() {
            predicates.push(Title::new(&p)?.boxed());
        }
        if let Some(p) = self.process_name.take() {
            predicates.push(ProcessName::new(&p)?.boxed());
        }

        if !self.style_contains.is_empty() {
            predicates.push(StyleContains(self.style_contains).boxed());
        }
        if !self.style_not_contains.is_empty() {
            predicates.push(StyleNotContains(self.style_not_contains).boxed());
        }
        if !self.ex_style_contains.is_empty() {
            predicates.push(ExStyleContains(self.ex_style_contains).boxed());
        }
        if !self.ex_style_not_contains.is_empty() {
            predicates.push(ExStyleNotContains(self.ex_style_not_contains).boxed());
        }

        Ok(self.finish(predicates))
    }

    fn finish(mut self, mut predicates: Vec<Box<dyn Query>>) -> Rule {
        predicates.append(&mut self.queries);
        predicates.extend(self.handle_predicates.into_iter().map(|p| p.boxed()));

        let mut placements = self.placements;
        for id in 1..=self.first_n_workspaces {
            if !placements.iter().any(|p| p.workspace == WorkspaceRef::Id(id)) {
                placements.push(PlacementSpec::on(id));
            }
        }
        if placements.is_empty() {
            placements.push(PlacementSpec::current());
        }

        Rule {
            name: self.name,
            predicates,
            managed: !self.unmanaged,
            placements,
            created_delay: self.created_delay,
            retry: self.retry,
            actions: self.actions,
            cosmetics: self.cosmetics,
        }
    }
}
