//! A mock implementation of WindowSystem that is easier to implement for use in tests.
//! This module and its contents are only available when testing.
use crate::{
    pure::{Arrangement, Decorations},
    sys::{WindowEvent, WindowSystem},
    window::{Handle, WindowDescriptor},
    Result,
};
use std::time::Duration;

/// All methods on this trait are unimplemented by default unless an implementation is
/// provided, apart from the methods that push state out to the window system which are no-ops.
///
/// Any implementation of `MockWindowSystem` will automatically implement `WindowSystem` by
/// forwarding on calls to `$method` to `mock_$method`.
#[allow(unused_variables)]
pub trait MockWindowSystem {
    fn mock_next_event(&self, timeout: Option<Duration>) -> Result<Option<WindowEvent>> {
        unimplemented!("mock_next_event")
    }

    fn mock_existing_windows(&self) -> Result<Vec<Handle>> {
        Ok(vec![])
    }

    fn mock_describe(&self, handle: Handle) -> Result<Option<WindowDescriptor>> {
        unimplemented!("mock_describe")
    }

    fn mock_show(&self, handle: Handle) -> Result<()> {
        Ok(())
    }

    fn mock_hide(&self, handle: Handle) -> Result<()> {
        Ok(())
    }

    fn mock_activate(&self, handle: Handle) -> Result<()> {
        Ok(())
    }

    fn mock_move_to_bottom(&self, handle: Handle) -> Result<()> {
        Ok(())
    }

    fn mock_set_topmost(&self, handle: Handle, topmost: bool) -> Result<()> {
        Ok(())
    }

    fn mock_decorate(&self, handle: Handle, decorations: Decorations) -> Result<()> {
        Ok(())
    }

    fn mock_remove_menu(&self, handle: Handle) -> Result<()> {
        Ok(())
    }

    fn mock_redraw(&self, handle: Option<Handle>) -> Result<()> {
        Ok(())
    }

    fn mock_arrange(&self, arrangement: &Arrangement) -> Result<()> {
        Ok(())
    }
}

impl<T> WindowSystem for T
where
    T: MockWindowSystem,
{
    fn next_event(&self, timeout: Option<Duration>) -> Result<Option<WindowEvent>> {
        self.mock_next_event(timeout)
    }

    fn existing_windows(&self) -> Result<Vec<Handle>> {
        self.mock_existing_windows()
    }

    fn describe(&self, handle: Handle) -> Result<Option<WindowDescriptor>> {
        self.mock_describe(handle)
    }

    fn show(&self, handle: Handle) -> Result<()> {
        self.mock_show(handle)
    }

    fn hide(&self, handle: Handle) -> Result<()> {
        self.mock_hide(handle)
    }

    fn activate(&self, handle: Handle) -> Result<()> {
        self.mock_activate(handle)
    }

    fn move_to_bottom(&self, handle: Handle) -> Result<()> {
        self.mock_move_to_bottom(handle)
    }

    fn set_topmost(&self, handle: Handle, topmost: bool) -> Result<()> {
        self.mock_set_topmost(handle, topmost)
    }

    fn decorate(&self, handle: Handle, decorations: Decorations) -> Result<()> {
        self.mock_decorate(handle, decorations)
    }

    fn remove_menu(&self, handle: Handle) -> Result<()> {
        self.mock_remove_menu(handle)
    }

    fn redraw(&self, handle: Option<Handle>) -> Result<()> {
        self.mock_redraw(handle)
    }

    fn arrange(&self, arrangement: &Arrangement) -> Result<()> {
        self.mock_arrange(arrangement)
    }
}
