//! # Casement: rule driven window placement across virtual workspaces
//!
//! Casement decides where top level windows belong. Every window that appears is described by a
//! [WindowDescriptor] (class name, title, process name and style bits) which is matched against
//! an ordered table of [rules][rules::Rule]. The first matching rule decides whether the window
//! is managed at all, which workspaces it is placed on and with which decorations, and what
//! should happen when it is created or re-shown while its workspace is not on screen.
//!
//! ## Getting started
//! The main entry point is the [Engine], which owns a [WindowSystem][sys::WindowSystem]
//! implementation and a [Config]:
//!
//! ```no_run
//! use casement::{
//!     config::{Config, MonitorSpec, WorkspaceSpec},
//!     rules::Rule,
//!     Engine,
//! };
//!
//! # fn example<S: casement::sys::WindowSystem>(sys: S) -> casement::Result<()> {
//! let config = Config::builder()
//!     .monitor(MonitorSpec::new("primary"))
//!     .workspace(WorkspaceSpec::new("main", 0))
//!     .workspace(WorkspaceSpec::new("web", 0))
//!     .rule(Rule::builder().class_name("^Chrome"))
//!     .rules([Rule::catch_all()])
//!     .build()?;
//!
//! let mut engine = Engine::new(&config, sys)?;
//! engine.run()
//! # }
//! ```
//!
//! ## Structure
//! - [rules] contains the rule table and the resolver that turns a descriptor into a placement.
//! - [pure] contains the side effect free workspace and monitor state.
//! - [sys] defines the [WindowSystem][sys::WindowSystem] trait the engine drives.
//! - [core] contains the [Engine] and its event handlers.
#![warn(
    clippy::complexity,
    clippy::correctness,
    clippy::style,
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    rustdoc::all
)]

pub mod config;
pub mod core;
pub mod pure;
pub mod rules;
pub mod sys;
pub mod window;

pub use crate::core::Engine;
pub use config::Config;
pub use window::{Handle, WindowDescriptor};

/// Error variants from the core casement library.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The window system connection has been closed and no further events will be delivered
    #[error("the window system connection has been closed")]
    ConnectionClosed,

    /// Something went wrong in user code or a window system backend
    #[error("{0}")]
    Custom(String),

    /// Workspace names must be unique
    #[error("'{name}' is used as the name of more than one workspace")]
    DuplicateWorkspaceName {
        /// The repeated name
        name: String,
    },

    /// A rule table must contain at least one rule
    #[error("the rule table is empty")]
    EmptyRuleTable,

    /// A starting workspace was requested for a monitor that does not own it
    #[error("workspace {workspace} is not owned by monitor {monitor}")]
    InvalidStartingWorkspace {
        /// The monitor index
        monitor: usize,
        /// The requested workspace id
        workspace: usize,
    },

    /// A rule pattern is not a valid regular expression
    #[error("invalid {field} pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The descriptor field the pattern applies to
        field: &'static str,
        /// The pattern as provided
        pattern: String,
        /// The underlying parse error
        #[source]
        source: regex::Error,
    },

    /// Every monitor must keep at least one workspace
    #[error("monitor {monitor} has no other workspaces")]
    LastWorkspaceOnMonitor {
        /// The monitor index
        monitor: usize,
    },

    /// The final rule of the table does not match every window
    #[error("the last of {n_rules} rules is not a catch-all: some windows may match no rule")]
    MissingCatchAll {
        /// The number of rules in the table
        n_rules: usize,
    },

    /// At least one monitor is required
    #[error("no monitors have been configured")]
    NoMonitors,

    /// Every monitor must own at least one workspace
    #[error("monitor {monitor} does not own any workspaces")]
    NoWorkspacesForMonitor {
        /// The monitor index
        monitor: usize,
    },

    /// A rule predicate returned an error. The rule is treated as not matching.
    #[error("rule {rule} could not be evaluated for window {handle}: {source}")]
    PredicateEvaluation {
        /// The index of the rule in the table
        rule: usize,
        /// The window being evaluated
        handle: Handle,
        /// The error returned by the predicate
        #[source]
        source: Box<Error>,
    },

    /// A window no longer exists
    #[error("window {0} no longer exists")]
    StaleHandle(Handle),

    /// A monitor index was out of range
    #[error("{0} is not a known monitor")]
    UnknownMonitor(usize),

    /// A rule places windows on a workspace that does not exist
    #[error("rule {rule} places windows on unknown workspace {id}")]
    UnknownPlacementWorkspace {
        /// The index of the rule in the table
        rule: usize,
        /// The unknown workspace id
        id: usize,
    },

    /// A window is not managed by the engine
    #[error("{0} is not a managed window")]
    UnknownWindow(Handle),

    /// A workspace id was out of range
    #[error("{0} is not a known workspace")]
    UnknownWorkspace(usize),

    /// No rule matched a window so it has been left unmanaged
    #[error("no rule matched window {0}")]
    UnresolvableWindow(Handle),
}

/// A Result where the error type is a casement [Error]
pub type Result<T> = std::result::Result<T, Error>;
