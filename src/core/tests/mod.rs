mod packing;
mod snap;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::config::{Config, Modifiers};
use crate::core::{
    Dimension, HandleError, Pid, Platform, RunningApp, ScreenBounds, Settings, SurfaceId,
    TileGrid, WindowHandle, WindowSurface,
};

pub(super) type FakeImage = String;
pub(super) type FakeIcon = String;

/// Commands received by windows and apps, shared between the platform and every handle it hands
/// out.
#[derive(Default)]
struct Journal {
    commands: RefCell<Vec<String>>,
    closed: RefCell<HashSet<(Pid, String)>>,
    rejected: RefCell<HashSet<(Pid, String)>>,
}

impl Journal {
    fn record(&self, pid: Pid, title: &str, command: String) -> Result<(), HandleError> {
        let key = (pid, title.to_string());
        if self.closed.borrow().contains(&key) {
            return Err(HandleError::Stale);
        }
        if self.rejected.borrow().contains(&key) {
            return Err(HandleError::Rejected(format!("{title} refused {command}")));
        }
        self.commands.borrow_mut().push(format!("{title}: {command}"));
        Ok(())
    }
}

pub(super) struct FakeHandle {
    pid: Pid,
    title: Option<String>,
    main: bool,
    journal: Rc<Journal>,
}

impl FakeHandle {
    fn record(&self, command: String) -> Result<(), HandleError> {
        let title = self.title.as_deref().unwrap_or("<untitled>");
        self.journal.record(self.pid, title, command)
    }
}

impl WindowHandle for FakeHandle {
    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn is_main(&self) -> bool {
        self.main
    }

    fn set_position(&self, x: f32, y: f32) -> Result<(), HandleError> {
        self.record(format!("position ({x:.2}, {y:.2})"))
    }

    fn set_size(&self, width: f32, height: f32) -> Result<(), HandleError> {
        self.record(format!("size ({width:.2}, {height:.2})"))
    }

    fn set_minimized(&self, minimized: bool) -> Result<(), HandleError> {
        self.record(format!("minimized={minimized}"))
    }

    fn raise(&self) -> Result<(), HandleError> {
        self.record("raise".into())
    }
}

#[derive(Clone)]
struct AxWindow {
    title: Option<String>,
    main: bool,
}

/// In-memory desktop. Every window added through the helpers shows up both in the window server
/// list and the accessibility tree unless stated otherwise.
pub(super) struct FakePlatform {
    pub(super) trusted: bool,
    pub(super) screen: Option<ScreenBounds>,
    pub(super) active: Option<Pid>,
    apps: Vec<RunningApp<FakeIcon>>,
    surfaces: Vec<WindowSurface>,
    ax_windows: HashMap<Pid, Vec<AxWindow>>,
    uncapturable: HashSet<SurfaceId>,
    next_surface: u32,
    journal: Rc<Journal>,
}

impl FakePlatform {
    pub(super) fn new() -> Self {
        Self {
            trusted: true,
            screen: Some(screen()),
            active: None,
            apps: Vec::new(),
            surfaces: Vec::new(),
            ax_windows: HashMap::new(),
            uncapturable: HashSet::new(),
            next_surface: 100,
            journal: Rc::new(Journal::default()),
        }
    }

    pub(super) fn app(&mut self, pid: Pid, name: &str) -> &mut Self {
        self.apps.push(RunningApp {
            pid,
            name: Some(name.to_string()),
            is_regular: true,
            icon: Some(format!("icon:{name}")),
        });
        self
    }

    pub(super) fn app_without_icon(&mut self, pid: Pid, name: &str) -> &mut Self {
        self.apps.push(RunningApp {
            pid,
            name: Some(name.to_string()),
            is_regular: true,
            icon: None,
        });
        self
    }

    /// An app with an accessory or prohibited activation policy, like a menu bar extra
    pub(super) fn agent(&mut self, pid: Pid, name: &str) -> &mut Self {
        self.apps.push(RunningApp {
            pid,
            name: Some(name.to_string()),
            is_regular: false,
            icon: Some(format!("icon:{name}")),
        });
        self
    }

    pub(super) fn window(&mut self, pid: Pid, title: &str) -> SurfaceId {
        self.add(pid, Some(title), false, Some(true))
    }

    /// The main window of its app, which is the key window when the app is active
    pub(super) fn main_window(&mut self, pid: Pid, title: &str) -> SurfaceId {
        self.add(pid, Some(title), true, Some(true))
    }

    pub(super) fn minimized_window(&mut self, pid: Pid, title: &str) -> SurfaceId {
        self.add(pid, Some(title), false, Some(false))
    }

    /// Listed by the window server without reporting whether it is on screen
    pub(super) fn window_without_onscreen(&mut self, pid: Pid, title: &str) -> SurfaceId {
        self.add(pid, Some(title), false, None)
    }

    /// Only in the window server list, e.g. a window of another space
    pub(super) fn surface_only(&mut self, pid: Pid, title: &str) -> SurfaceId {
        self.push_surface(pid, Some(title), Some(true))
    }

    /// Only in the accessibility tree
    pub(super) fn ax_only(&mut self, pid: Pid, title: Option<&str>) {
        self.push_ax(pid, title, false);
    }

    pub(super) fn fail_capture(&mut self, surface: SurfaceId) {
        self.uncapturable.insert(surface);
    }

    /// The window closes, every later command on it fails as stale
    pub(super) fn close(&self, pid: Pid, title: &str) {
        self.journal
            .closed
            .borrow_mut()
            .insert((pid, title.to_string()));
    }

    /// The window stays around but refuses to be moved
    pub(super) fn reject(&self, pid: Pid, title: &str) {
        self.journal
            .rejected
            .borrow_mut()
            .insert((pid, title.to_string()));
    }

    /// Commands issued since the last call
    pub(super) fn take_commands(&self) -> Vec<String> {
        std::mem::take(&mut *self.journal.commands.borrow_mut())
    }

    fn add(&mut self, pid: Pid, title: Option<&str>, main: bool, on_screen: Option<bool>) -> SurfaceId {
        let id = self.push_surface(pid, title, on_screen);
        self.push_ax(pid, title, main);
        id
    }

    fn push_surface(&mut self, pid: Pid, title: Option<&str>, on_screen: Option<bool>) -> SurfaceId {
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        self.surfaces.push(WindowSurface {
            pid,
            id,
            title: title.map(str::to_string),
            on_screen,
        });
        id
    }

    fn push_ax(&mut self, pid: Pid, title: Option<&str>, main: bool) {
        self.ax_windows.entry(pid).or_default().push(AxWindow {
            title: title.map(str::to_string),
            main,
        });
    }
}

impl Platform for FakePlatform {
    type Handle = FakeHandle;
    type Image = FakeImage;
    type Icon = FakeIcon;

    fn is_trusted(&self) -> bool {
        self.trusted
    }

    fn surfaces(&self, include_minimized: bool) -> Vec<WindowSurface> {
        self.surfaces
            .iter()
            .filter(|s| include_minimized || s.on_screen != Some(false))
            .cloned()
            .collect()
    }

    fn capture(&self, surface: SurfaceId) -> Option<FakeImage> {
        if self.uncapturable.contains(&surface) {
            return None;
        }
        Some(format!("shot:{}", surface.0))
    }

    fn accessible_windows(&self, pid: Pid) -> Vec<FakeHandle> {
        self.ax_windows
            .get(&pid)
            .into_iter()
            .flatten()
            .map(|w| FakeHandle {
                pid,
                title: w.title.clone(),
                main: w.main,
                journal: self.journal.clone(),
            })
            .collect()
    }

    fn screen(&self) -> Option<ScreenBounds> {
        self.screen
    }

    fn running_apps(&self) -> Vec<RunningApp<FakeIcon>> {
        self.apps.clone()
    }

    fn active_app(&self) -> Option<Pid> {
        self.active
    }

    fn activate_app(&self, pid: Pid) -> Result<(), HandleError> {
        if !self.apps.iter().any(|a| a.pid == pid) {
            return Err(HandleError::Stale);
        }
        self.journal.commands.borrow_mut().push(format!("activate {pid}"));
        Ok(())
    }
}

/// Main screen of a 1440x900 laptop: 25pt menu bar, dock hidden.
pub(super) fn screen() -> ScreenBounds {
    ScreenBounds {
        visible: Dimension::new(0.0, 0.0, 1440.0, 875.0),
        top_bar_height: 25.0,
    }
}

pub(super) fn settings() -> Settings {
    Config::default().session_settings()
}

pub(super) fn chord() -> Modifiers {
    Modifiers::CTRL | Modifiers::ALT
}

/// Text rendering of a tile grid, one character per `scale` points.
pub(super) fn draw_grid(grid: &TileGrid, width: f32, height: f32, scale: f32) -> String {
    let columns = (width / scale).round() as usize;
    let rows = (height / scale).round() as usize;
    let mut canvas = vec![vec!['.'; columns]; rows];
    for index in 0..grid.count {
        let Some(frame) = grid.frame(index) else {
            continue;
        };
        let x1 = (frame.x / scale).round() as usize;
        let y1 = (frame.y / scale).round() as usize;
        let x2 = ((frame.max_x() / scale).round() as usize).min(columns);
        let y2 = ((frame.max_y() / scale).round() as usize).min(rows);
        let label = std::char::from_digit(index as u32 % 36, 36).unwrap_or('#');
        for row in canvas.iter_mut().take(y2).skip(y1) {
            for cell in row.iter_mut().take(x2).skip(x1) {
                *cell = label;
            }
        }
    }
    canvas
        .iter()
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

pub(super) fn setup_logger() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
    std::panic::set_hook(Box::new(|panic_info| {
        let backtrace = backtrace::Backtrace::new();
        tracing::error!("Application panicked: {panic_info}. Backtrace: {backtrace:?}");
    }));
}

pub(super) fn setup() -> FakePlatform {
    setup_logger();
    FakePlatform::new()
}
