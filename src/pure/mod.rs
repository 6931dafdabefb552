//! Side effect free management of workspace, monitor and layout state
pub mod layout;
pub mod monitor;
pub mod snapshot;
pub mod workspace;
pub mod workspace_set;

#[doc(inline)]
pub use layout::{Arrangement, LayoutKind};
#[doc(inline)]
pub use monitor::Monitor;
#[doc(inline)]
pub use snapshot::{MonitorSnapshot, Snapshot, WorkspaceSnapshot};
#[doc(inline)]
pub use workspace::{Decorations, Membership, MembershipState, Workspace};
#[doc(inline)]
pub use workspace_set::WorkspaceSet;
