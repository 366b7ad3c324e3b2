use objc2::rc::Retained;
use objc2_app_kit::{
    NSApplicationActivationOptions, NSApplicationActivationPolicy, NSImage, NSRunningApplication,
    NSWorkspace,
};
use objc2_application_services::AXUIElement;
use objc2_core_foundation::CFArray;

use crate::core::{HandleError, Pid, RunningApp};

use super::accessibility::AXWindow;
use super::objc2_wrapper::{get_attribute, kAXWindowsAttribute};

/// Every running app other than this one, in workspace order.
pub(super) fn all() -> Vec<RunningApp<Retained<NSImage>>> {
    NSWorkspace::sharedWorkspace()
        .runningApplications()
        .into_iter()
        .filter(|app| is_valid_pid(app.processIdentifier()))
        .map(|app| RunningApp {
            pid: app.processIdentifier(),
            name: app.localizedName().map(|n| n.to_string()),
            is_regular: app.activationPolicy() == NSApplicationActivationPolicy::Regular,
            icon: app.icon(),
        })
        .collect()
}

pub(super) fn active_pid() -> Option<Pid> {
    NSWorkspace::sharedWorkspace()
        .runningApplications()
        .into_iter()
        .find(|app| app.isActive())
        .map(|app| app.processIdentifier())
        .filter(|&pid| is_valid_pid(pid))
}

#[tracing::instrument]
pub(super) fn activate(pid: Pid) -> Result<(), HandleError> {
    let app = NSRunningApplication::runningApplicationWithProcessIdentifier(pid)
        .ok_or(HandleError::Stale)?;
    #[allow(deprecated)]
    let activated =
        app.activateWithOptions(NSApplicationActivationOptions::ActivateIgnoringOtherApps);
    if activated {
        Ok(())
    } else {
        Err(HandleError::Rejected(format!("app {pid} refused activation")))
    }
}

pub(super) fn ax_windows(pid: Pid) -> Vec<AXWindow> {
    let ax_app = unsafe { AXUIElement::new_application(pid) };
    match get_attribute::<CFArray<AXUIElement>>(&ax_app, &kAXWindowsAttribute()) {
        Ok(windows) => windows.into_iter().map(|w| AXWindow::new(w, pid)).collect(),
        Err(e) => {
            tracing::trace!(pid, "No accessible windows: {e}");
            Vec::new()
        }
    }
}

fn is_valid_pid(pid: Pid) -> bool {
    pid != -1 && pid != std::process::id() as i32
}
