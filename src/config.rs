//! User facing configuration of the [Engine][crate::core::Engine].
//!
//! A [Config] is built once at startup and then passed by reference into the engine: nothing
//! within it changes while the engine is running.
use crate::{
    pure::{LayoutKind, WorkspaceSet},
    rules::{Rule, RuleBuilder, RuleTable, WorkspaceRef},
    Error, Result,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A physical display known at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonitorSpec {
    /// A human readable name for the monitor
    pub name: String,
}

impl MonitorSpec {
    /// A monitor with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The initial state of a single workspace.
///
/// Workspace ids are assigned from the order in which workspaces are added to the
/// [ConfigBuilder], starting from 1. Id 0 is reserved for "the current workspace".
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkspaceSpec {
    /// The unique name of the workspace
    pub name: String,
    /// The index of the monitor that owns the workspace
    pub monitor: usize,
    /// The initial layout
    pub layout: LayoutKind,
    /// The names of the bars shown alongside the workspace
    pub bars: Vec<String>,
}

impl WorkspaceSpec {
    /// A tiled workspace on the given monitor with no bars.
    pub fn new(name: impl Into<String>, monitor: usize) -> Self {
        Self {
            name: name.into(),
            monitor,
            layout: LayoutKind::default(),
            bars: vec![],
        }
    }

    /// Set the initial layout.
    pub fn layout(mut self, layout: LayoutKind) -> Self {
        self.layout = layout;
        self
    }

    /// Add a bar to be shown alongside this workspace.
    pub fn bar(mut self, name: impl Into<String>) -> Self {
        self.bars.push(name.into());
        self
    }
}

/// The main user facing configuration details.
///
/// See [ConfigBuilder] for details of what can be set.
#[derive(Debug)]
pub struct Config {
    pub(crate) rules: RuleTable,
    pub(crate) monitors: Vec<MonitorSpec>,
    pub(crate) workspaces: Vec<WorkspaceSpec>,
    pub(crate) starting_workspaces: Vec<(usize, usize)>,
}

impl Config {
    /// Start building a new [Config].
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// The window classification rules in evaluation order
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// The configured monitors
    pub fn monitors(&self) -> &[MonitorSpec] {
        &self.monitors
    }

    /// The configured workspaces: the workspace with id `n` is at position `n - 1`
    pub fn workspaces(&self) -> &[WorkspaceSpec] {
        &self.workspaces
    }

    /// The workspace initially active on the given monitor: either the one explicitly requested
    /// or the first workspace configured for that monitor.
    pub fn starting_workspace(&self, monitor: usize) -> Option<usize> {
        self.starting_workspaces
            .iter()
            .rev()
            .find(|(m, _)| *m == monitor)
            .map(|(_, id)| *id)
            .or_else(|| {
                self.workspaces
                    .iter()
                    .position(|w| w.monitor == monitor)
                    .map(|ix| ix + 1)
            })
    }

    /// Create a range from 1 -> n_workspaces covering every valid workspace id
    pub fn ws_range(&self) -> std::ops::Range<usize> {
        1..(self.workspaces.len() + 1)
    }
}

/// Builder struct for generating a [Config]
///
/// # Example
/// ```
/// use casement::{
///     config::{Config, MonitorSpec, WorkspaceSpec},
///     pure::LayoutKind,
///     rules::{PlacementSpec, Rule},
/// };
///
/// let config = Config::builder()
///     .monitor(MonitorSpec::new("primary"))
///     .workspace(WorkspaceSpec::new("main", 0))
///     .workspace(WorkspaceSpec::new("web", 0).layout(LayoutKind::FullScreen))
///     .rule(Rule::builder().class_name("^Firefox$").placement(PlacementSpec::on(2)))
///     .rule(Rule::builder())
///     .build()
///     .expect("valid config");
///
/// assert_eq!(config.starting_workspace(0), Some(1));
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    rules: Vec<RuleBuilder>,
    built_rules: Vec<Rule>,
    monitors: Vec<MonitorSpec>,
    workspaces: Vec<WorkspaceSpec>,
    starting_workspaces: Vec<(usize, usize)>,
}

impl ConfigBuilder {
    /// Add a monitor. Monitors are indexed in the order they are added.
    pub fn monitor(mut self, m: MonitorSpec) -> Self {
        self.monitors.push(m);
        self
    }

    /// Add a workspace. Workspaces are given ids in the order they are added, starting from 1.
    pub fn workspace(mut self, w: WorkspaceSpec) -> Self {
        self.workspaces.push(w);
        self
    }

    /// Append a rule to the rule table. Patterns are compiled when [ConfigBuilder::build] is
    /// called.
    pub fn rule(mut self, r: RuleBuilder) -> Self {
        self.rules.push(r);
        self
    }

    /// Append a number of already compiled rules to the rule table.
    ///
    /// Rules added this way are evaluated after every rule passed to [ConfigBuilder::rule].
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.built_rules.extend(rules);
        self
    }

    /// Set the workspace that is initially active on the given monitor.
    pub fn starting_workspace(mut self, monitor: usize, workspace: usize) -> Self {
        self.starting_workspaces.push((monitor, workspace));
        self
    }

    fn assemble(self) -> Result<Config> {
        let mut rules = Vec::with_capacity(self.rules.len() + self.built_rules.len());
        for r in self.rules {
            rules.push(r.build()?);
        }
        rules.extend(self.built_rules);

        Ok(Config {
            rules: RuleTable::new(rules),
            monitors: self.monitors,
            workspaces: self.workspaces,
            starting_workspaces: self.starting_workspaces,
        })
    }

    fn validate(config: &Config) -> Result<()> {
        for (index, rule) in config.rules.iter().enumerate() {
            for p in rule.placements() {
                if let WorkspaceRef::Id(id) = p.workspace {
                    if !config.ws_range().contains(&id) {
                        return Err(Error::UnknownPlacementWorkspace { rule: index, id });
                    }
                }
            }
        }

        // Building the initial state checks the monitor and workspace topology
        WorkspaceSet::try_new(config).map(|_| ())
    }

    /// Compile all rules and validate the resulting [Config].
    ///
    /// # Errors
    /// In addition to the checks made by [ConfigBuilder::build_permissive], this returns
    /// [Error::MissingCatchAll] if the final rule is not a wildcard.
    pub fn build(self) -> Result<Config> {
        let config = self.build_permissive()?;
        config.rules.check_catch_all()?;

        Ok(config)
    }

    /// Compile all rules and validate the resulting [Config] without requiring the rule table to
    /// end in a catch-all rule. Windows that match no rule are left unmanaged at runtime and
    /// reported as an [Error::UnresolvableWindow].
    ///
    /// # Errors
    /// Returns an error if a pattern fails to compile, if a placement refers to a workspace that
    /// does not exist or if the monitor and workspace topology is invalid.
    pub fn build_permissive(self) -> Result<Config> {
        let config = self.assemble()?;
        Self::validate(&config)?;

        Ok(config)
    }
}
