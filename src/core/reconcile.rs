use std::collections::HashMap;
use std::fmt;

use super::geometry::Dimension;
use super::platform::{HandleError, Pid, Platform, SurfaceId, WindowHandle, WindowSurface};

/// One user-facing window, matched across the window server and the accessibility tree.
///
/// Snapshot of the moment it was enumerated: the window may be closed or moved afterwards, in
/// which case commands fail with [`HandleError::Stale`].
pub struct ReconciledWindow<P: Platform> {
    pid: Pid,
    index_in_app: usize,
    surface: SurfaceId,
    title: String,
    screenshot: P::Image,
    icon: P::Icon,
    is_key: bool,
    is_minimized: bool,
    handle: P::Handle,
}

impl<P: Platform> fmt::Debug for ReconciledWindow<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReconciledWindow")
            .field("pid", &self.pid)
            .field("index_in_app", &self.index_in_app)
            .field("surface", &self.surface)
            .field("title", &self.title)
            .field("is_key", &self.is_key)
            .field("is_minimized", &self.is_minimized)
            .finish()
    }
}

impl<P: Platform> fmt::Display for ReconciledWindow<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}] {}", self.pid, self.index_in_app, self.title)
    }
}

impl<P: Platform> ReconciledWindow<P> {
    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn index_in_app(&self) -> usize {
        self.index_in_app
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn screenshot(&self) -> &P::Image {
        &self.screenshot
    }

    pub fn icon(&self) -> &P::Icon {
        &self.icon
    }

    pub fn is_key(&self) -> bool {
        self.is_key
    }

    pub fn is_minimized(&self) -> bool {
        self.is_minimized
    }

    #[tracing::instrument(skip(self), fields(window = %self))]
    pub fn set_frame(&self, frame: Dimension) -> Result<(), HandleError> {
        self.handle.set_position(frame.x, frame.y)?;
        self.handle.set_size(frame.width, frame.height)
    }

    pub fn set_minimized(&mut self, minimized: bool) -> Result<(), HandleError> {
        if self.is_minimized == minimized {
            return Ok(());
        }
        self.handle.set_minimized(minimized)?;
        self.is_minimized = minimized;
        Ok(())
    }

    pub fn bring_to_front(&mut self) -> Result<(), HandleError> {
        self.handle.raise()?;
        self.set_minimized(false)
    }

    /// Activate the owning app first so the window also receives keyboard focus.
    pub fn make_key(&mut self, platform: &P) -> Result<(), HandleError> {
        platform.activate_app(self.pid)?;
        self.bring_to_front()
    }
}

struct Candidate {
    surface: WindowSurface,
    index_in_app: usize,
}

/// Match accessibility windows to window server surfaces by title, app by app.
///
/// The two sources share no identifier, so a handle is bound to the first not yet matched
/// surface of the same process carrying the same title. With several identically titled windows
/// in one process the pairing follows enumeration order and may be wrong. Windows that can't be
/// matched, or have no icon or screenshot, are left out.
pub fn reconcile<P: Platform>(platform: &P, include_minimized: bool) -> Vec<ReconciledWindow<P>> {
    let mut pools: HashMap<Pid, Vec<Candidate>> = HashMap::new();
    for surface in platform.surfaces(include_minimized) {
        let pool = pools.entry(surface.pid).or_default();
        let index_in_app = pool.len();
        pool.push(Candidate {
            surface,
            index_in_app,
        });
    }

    let active = platform.active_app();
    let mut windows = Vec::new();

    for app in platform.running_apps() {
        if !app.is_regular {
            continue;
        }
        let Some(pool) = pools.get_mut(&app.pid) else {
            continue;
        };

        for handle in platform.accessible_windows(app.pid) {
            let Some(title) = handle.title() else {
                tracing::trace!(pid = app.pid, "skipped: window has no readable title");
                continue;
            };
            let Some(pos) = pool
                .iter()
                .position(|c| c.surface.title.as_deref() == Some(title.as_str()))
            else {
                tracing::trace!(pid = app.pid, %title, "skipped: no matching surface");
                continue;
            };
            let Candidate {
                surface,
                index_in_app,
            } = pool.remove(pos);

            let Some(icon) = app.icon.clone() else {
                tracing::trace!(pid = app.pid, %title, "skipped: app has no icon");
                continue;
            };
            let Some(screenshot) = platform.capture(surface.id) else {
                tracing::trace!(pid = app.pid, %title, id = %surface.id, "skipped: capture failed");
                continue;
            };

            let is_key = handle.is_main() && active == Some(app.pid);
            windows.push(ReconciledWindow {
                pid: app.pid,
                index_in_app,
                surface: surface.id,
                title,
                screenshot,
                icon,
                is_key,
                is_minimized: !surface.on_screen.unwrap_or(false),
                handle,
            });
        }
    }

    tracing::debug!(count = windows.len(), include_minimized, "Reconciled windows");
    windows
}
