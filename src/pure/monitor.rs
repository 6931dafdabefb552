//! Physical displays and the workspaces they own
use crate::window::Handle;

/// A physical display that owns a set of workspaces, exactly one of which is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    pub(crate) index: usize,
    pub(crate) name: String,
    pub(crate) active: usize,
    pub(crate) workspaces: Vec<usize>,
    // windows left on screen by a lifecycle action until the next workspace switch
    pub(crate) temporarily_shown: Vec<Handle>,
}

impl Monitor {
    pub(crate) fn new(
        index: usize,
        name: impl Into<String>,
        active: usize,
        workspaces: Vec<usize>,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            active,
            workspaces,
            temporarily_shown: vec![],
        }
    }

    /// The position of this monitor in the configured monitor list
    pub fn index(&self) -> usize {
        self.index
    }

    /// The name of this monitor
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The id of the workspace currently active on this monitor
    pub fn active_workspace(&self) -> usize {
        self.active
    }

    /// The ids of every workspace owned by this monitor
    pub fn workspaces(&self) -> &[usize] {
        &self.workspaces
    }

    /// Windows that are currently shown on this monitor without being a member of its active
    /// workspace
    pub fn temporarily_shown(&self) -> &[Handle] {
        &self.temporarily_shown
    }

    pub(crate) fn show_temporarily(&mut self, handle: Handle) {
        if !self.temporarily_shown.contains(&handle) {
            self.temporarily_shown.push(handle);
        }
    }
}
