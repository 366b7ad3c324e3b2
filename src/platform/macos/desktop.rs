use objc2::MainThreadMarker;
use objc2::rc::Retained;
use objc2_app_kit::NSImage;
use objc2_core_foundation::CFRetained;
use objc2_core_graphics::CGImage;

use crate::core::{HandleError, Pid, Platform, RunningApp, ScreenBounds, SurfaceId, WindowSurface};

use super::accessibility::AXWindow;
use super::monitor::main_screen;
use super::objc2_wrapper::is_process_trusted;
use super::{running_application, window_list};

/// The live desktop. Only usable from the main thread.
pub(super) struct MacPlatform {
    mtm: MainThreadMarker,
}

impl MacPlatform {
    pub(super) fn new(mtm: MainThreadMarker) -> Self {
        Self { mtm }
    }
}

impl Platform for MacPlatform {
    type Handle = AXWindow;
    type Image = CFRetained<CGImage>;
    type Icon = Retained<NSImage>;

    fn is_trusted(&self) -> bool {
        is_process_trusted(false)
    }

    fn surfaces(&self, include_minimized: bool) -> Vec<WindowSurface> {
        window_list::surfaces(include_minimized)
    }

    fn capture(&self, surface: SurfaceId) -> Option<Self::Image> {
        window_list::capture(surface)
    }

    fn accessible_windows(&self, pid: Pid) -> Vec<Self::Handle> {
        running_application::ax_windows(pid)
    }

    fn screen(&self) -> Option<ScreenBounds> {
        main_screen(self.mtm)
    }

    fn running_apps(&self) -> Vec<RunningApp<Self::Icon>> {
        running_application::all()
    }

    fn active_app(&self) -> Option<Pid> {
        running_application::active_pid()
    }

    fn activate_app(&self, pid: Pid) -> Result<(), HandleError> {
        running_application::activate(pid)
    }
}
