use std::cell::{Cell, OnceCell, RefCell};
use std::ffi::c_void;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{Context, Result};
use objc2::runtime::ProtocolObject;
use objc2::{DefinedClass, MainThreadMarker, MainThreadOnly, define_class, msg_send, rc::Retained};
use objc2_app_kit::{NSApplication, NSApplicationActivationPolicy, NSApplicationDelegate};
use objc2_core_foundation::{
    CFRetained, CFRunLoop, CFRunLoopSource, CFRunLoopSourceContext, kCFRunLoopDefaultMode,
};
use objc2_foundation::{NSNotification, NSObject, NSObjectProtocol};
use tracing_error::ErrorLayer;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

use super::desktop::MacPlatform;
use super::keyboard::KeyboardListener;
use super::objc2_wrapper::is_process_trusted;
use super::picker::{Picker, Tile};
use crate::config::{Config, Modifiers, start_config_watcher};
use crate::core::{Input, Outcome, Session};

pub(super) enum AppEvent {
    Input(Input),
    ConfigChanged(Config),
}

/// Queues events for the main thread and wakes its run loop to drain them.
#[derive(Clone)]
pub(super) struct EventSender {
    tx: Sender<AppEvent>,
    source: CFRetained<CFRunLoopSource>,
    run_loop: CFRetained<CFRunLoop>,
}

// Safety: CFRunLoopSource and CFRunLoop are thread-safe for signal/wake_up operations
unsafe impl Send for EventSender {}

impl EventSender {
    pub(super) fn send(&self, event: AppEvent) {
        if self.tx.send(event).is_ok() {
            self.source.signal();
            self.run_loop.wake_up();
        }
    }
}

pub fn run_app(config_path: Option<String>) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Failed to load config from {config_path}: {e:#}, using defaults");
        Config::default()
    });

    init_tracing(&config);

    // Prompts on first launch, snapping stays disabled until permission is granted
    let trusted = is_process_trusted(true);
    tracing::info!(trusted, "Accessibility permission checked");

    let mtm = MainThreadMarker::new().context("splitter must run on the main thread")?;
    let app = NSApplication::sharedApplication(mtm);
    app.setActivationPolicy(NSApplicationActivationPolicy::Accessory);

    let (tx, rx) = mpsc::channel();
    let delegate = AppDelegate::new(mtm, &config, rx);
    let source = create_event_source(&delegate)?;
    let main_run_loop = CFRunLoop::main().context("no main run loop")?;
    main_run_loop.add_source(Some(&source), unsafe { kCFRunLoopDefaultMode });

    let sender = EventSender {
        tx,
        source,
        run_loop: main_run_loop,
    };
    let _ = delegate.ivars().sender.set(sender.clone());

    let _config_watcher = start_config_watcher(&config_path, move |cfg| {
        sender.send(AppEvent::ConfigChanged(cfg));
    })
    .inspect_err(|e| tracing::warn!("Failed to setup config watcher: {e:#}"))
    .ok();

    app.setDelegate(Some(ProtocolObject::from_ref(&*delegate)));
    app.run();
    Ok(())
}

/// Print whether accessibility permission is granted, asking for it if not.
pub fn check_accessibility() -> Result<()> {
    if is_process_trusted(true) {
        println!("Accessibility permission granted");
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "accessibility permission missing, grant it in System Settings > Privacy & Security > Accessibility"
        ))
    }
}

fn create_event_source(delegate: &Retained<AppDelegate>) -> Result<CFRetained<CFRunLoopSource>> {
    let mut context = CFRunLoopSourceContext {
        version: 0,
        info: Retained::as_ptr(delegate) as *mut c_void,
        retain: None,
        release: None,
        copyDescription: None,
        equal: None,
        hash: None,
        schedule: None,
        cancel: None,
        perform: Some(event_callback),
    };
    unsafe { CFRunLoopSource::new(None, 0, &mut context) }
        .context("Failed to create run loop source")
}

fn init_tracing(config: &Config) {
    let filter = config
        .log_level
        .as_ref()
        .and_then(|l| l.parse().ok())
        .unwrap_or_else(EnvFilter::from_default_env);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(ErrorLayer::default())
        .init();
    std::panic::set_hook(Box::new(|panic_info| {
        let backtrace = backtrace::Backtrace::new();
        tracing::error!("Application panicked: {panic_info}. Backtrace: {backtrace:?}");
    }));
}

pub(super) struct AppDelegateIvars {
    platform: MacPlatform,
    session: RefCell<Session<MacPlatform>>,
    event_rx: Receiver<AppEvent>,
    sender: OnceCell<EventSender>,
    snap_modifiers: Rc<Cell<Modifiers>>,
    picker_open: Rc<Cell<bool>>,
    picker: OnceCell<Picker>,
    keyboard: OnceCell<KeyboardListener>,
}

define_class!(
    #[unsafe(super(NSObject))]
    #[thread_kind = MainThreadOnly]
    #[ivars = AppDelegateIvars]
    pub(super) struct AppDelegate;

    unsafe impl NSObjectProtocol for AppDelegate {}

    unsafe impl NSApplicationDelegate for AppDelegate {
        #[unsafe(method(applicationDidFinishLaunching:))]
        fn did_finish_launching(&self, _notification: &NSNotification) {
            tracing::info!("Application did finish launching");
            let ivars = self.ivars();
            let Some(sender) = ivars.sender.get() else {
                tracing::error!("Event queue missing, nothing will be handled");
                return;
            };

            let _ = ivars.picker.set(Picker::new(self.mtm(), sender.clone()));

            match KeyboardListener::new(
                ivars.snap_modifiers.clone(),
                ivars.picker_open.clone(),
                sender.clone(),
            ) {
                Ok(listener) => {
                    let _ = ivars.keyboard.set(listener);
                }
                Err(e) => tracing::error!("Failed to listen to the keyboard: {e:#}"),
            }
        }

        #[unsafe(method(applicationDidResignActive:))]
        fn did_resign_active(&self, _notification: &NSNotification) {
            let ivars = self.ivars();
            if ivars.picker_open.get()
                && let Some(sender) = ivars.sender.get()
            {
                sender.send(AppEvent::Input(Input::PickerResigned));
            }
        }
    }
);

impl AppDelegate {
    fn new(mtm: MainThreadMarker, config: &Config, event_rx: Receiver<AppEvent>) -> Retained<Self> {
        let ivars = AppDelegateIvars {
            platform: MacPlatform::new(mtm),
            session: RefCell::new(Session::new(config.session_settings())),
            event_rx,
            sender: OnceCell::new(),
            snap_modifiers: Rc::new(Cell::new(config.snap_modifiers)),
            picker_open: Rc::new(Cell::new(false)),
            picker: OnceCell::new(),
            keyboard: OnceCell::new(),
        };
        let this = Self::alloc(mtm).set_ivars(ivars);
        unsafe { msg_send![super(this), init] }
    }

    fn handle_input(&self, input: Input) {
        let ivars = self.ivars();
        let mut session = ivars.session.borrow_mut();
        let outcome = session.handle(&ivars.platform, input);
        tracing::trace!(%outcome, "Input handled");

        match outcome {
            Outcome::PickerOpened { frame, grid, .. } => {
                let Some(suggestions) = session.suggestions() else {
                    return;
                };
                let tiles = suggestions
                    .iter()
                    .map(|w| Tile {
                        screenshot: w.screenshot().clone(),
                        icon: w.icon().clone(),
                    })
                    .collect();
                if let Some(picker) = ivars.picker.get() {
                    picker.show(frame, grid, tiles, suggestions.focused());
                }
                ivars.picker_open.set(true);
                // Become active so clicking anywhere else resigns and dismisses the picker
                #[allow(deprecated)]
                NSApplication::sharedApplication(self.mtm()).activateIgnoringOtherApps(true);
            }
            Outcome::FocusMoved { index } => {
                if let Some(picker) = ivars.picker.get() {
                    picker.set_focused(index);
                }
            }
            Outcome::PickerClosed { .. } | Outcome::GestureEnded { .. } => {
                if ivars.picker_open.replace(false)
                    && let Some(picker) = ivars.picker.get()
                {
                    picker.hide();
                }
            }
            Outcome::Ignored | Outcome::GestureStarted { .. } | Outcome::Snapped { .. } => {}
        }
    }

    fn reconfigure(&self, config: &Config) {
        let ivars = self.ivars();
        ivars.snap_modifiers.set(config.snap_modifiers);
        ivars
            .session
            .borrow_mut()
            .reconfigure(config.session_settings());
        tracing::info!(snap_modifiers = ?config.snap_modifiers, "Settings applied");
    }
}

unsafe extern "C-unwind" fn event_callback(info: *mut c_void) {
    // AppDelegate lives for the entire duration of the app
    let delegate: &AppDelegate = unsafe { &*(info as *const AppDelegate) };

    while let Ok(event) = delegate.ivars().event_rx.try_recv() {
        match event {
            AppEvent::Input(input) => delegate.handle_input(input),
            AppEvent::ConfigChanged(config) => delegate.reconfigure(&config),
        }
    }
}
