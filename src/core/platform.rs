use std::fmt;

use super::geometry::ScreenBounds;

pub type Pid = i32;

/// Window server identifier of an on-screen window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({})", self.0)
    }
}

/// A window as listed by the window server. Carries ordering and screenshot access but can't be
/// moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSurface {
    pub pid: Pid,
    pub id: SurfaceId,
    pub title: Option<String>,
    /// Absent when the window server didn't report it
    pub on_screen: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct RunningApp<I> {
    pub pid: Pid,
    pub name: Option<String>,
    /// Regular activation policy, i.e. a user-facing app and not a background agent
    pub is_regular: bool,
    pub icon: Option<I>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleError {
    /// The window is gone: closed, or its app quit since it was enumerated
    Stale,
    Rejected(String),
}

impl fmt::Display for HandleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleError::Stale => write!(f, "window no longer exists"),
            HandleError::Rejected(reason) => write!(f, "command rejected: {reason}"),
        }
    }
}

impl std::error::Error for HandleError {}

/// A window as seen through the accessibility tree. The only way to move a window around.
pub trait WindowHandle {
    fn title(&self) -> Option<String>;
    fn is_main(&self) -> bool;
    fn set_position(&self, x: f32, y: f32) -> Result<(), HandleError>;
    fn set_size(&self, width: f32, height: f32) -> Result<(), HandleError>;
    fn set_minimized(&self, minimized: bool) -> Result<(), HandleError>;
    /// Make the window the main window of its app and its app frontmost
    fn raise(&self) -> Result<(), HandleError>;
}

/// Everything the core needs from the host desktop.
pub trait Platform {
    type Handle: WindowHandle;
    type Image: Clone;
    type Icon: Clone;

    /// Whether the process may use the accessibility API
    fn is_trusted(&self) -> bool;

    /// Windows in window server order, front to back. Offscreen windows are included only if
    /// `include_minimized`.
    fn surfaces(&self, include_minimized: bool) -> Vec<WindowSurface>;
    fn capture(&self, surface: SurfaceId) -> Option<Self::Image>;

    fn accessible_windows(&self, pid: Pid) -> Vec<Self::Handle>;

    fn screen(&self) -> Option<ScreenBounds>;
    fn running_apps(&self) -> Vec<RunningApp<Self::Icon>>;
    fn active_app(&self) -> Option<Pid>;
    fn activate_app(&self, pid: Pid) -> Result<(), HandleError>;
}
