use std::cell::{Cell, OnceCell};
use std::ptr::NonNull;
use std::rc::Rc;

use anyhow::Result;
use objc2_core_foundation::{
    CFMachPort, CFRetained, CFRunLoop, CFRunLoopSource, kCFAllocatorDefault, kCFRunLoopDefaultMode,
};
use objc2_core_graphics::{
    CGEvent, CGEventField, CGEventFlags, CGEventTapLocation, CGEventTapOptions,
    CGEventTapPlacement, CGEventTapProxy, CGEventType,
};

use super::app::{AppEvent, EventSender};
use crate::config::Modifiers;
use crate::core::{Direction, Input};

struct KeyboardCtx {
    snap_modifiers: Rc<Cell<Modifiers>>,
    picker_open: Rc<Cell<bool>>,
    sender: EventSender,
    event_tap: OnceCell<CFRetained<CFMachPort>>,
}

/// Session-wide event tap feeding modifier changes and snap keys to the input queue.
///
/// Arrow keys are swallowed while the snap chord is held, and every key is swallowed while the
/// picker is open, so the app in front never sees them.
pub(super) struct KeyboardListener {
    #[expect(dead_code, reason = "prevent finalizer running")]
    ctx: Box<KeyboardCtx>,
    run_loop_source: CFRetained<CFRunLoopSource>,
}

impl Drop for KeyboardListener {
    fn drop(&mut self) {
        if let Some(run_loop) = CFRunLoop::current() {
            run_loop.remove_source(Some(&self.run_loop_source), unsafe {
                kCFRunLoopDefaultMode
            });
        }
    }
}

impl KeyboardListener {
    pub(super) fn new(
        snap_modifiers: Rc<Cell<Modifiers>>,
        picker_open: Rc<Cell<bool>>,
        sender: EventSender,
    ) -> Result<Self> {
        let ctx = Box::new(KeyboardCtx {
            snap_modifiers,
            picker_open,
            sender,
            event_tap: OnceCell::new(),
        });

        let run_loop =
            CFRunLoop::current().ok_or_else(|| anyhow::anyhow!("No run loop on this thread"))?;
        let event_mask = (1u64 << CGEventType::KeyDown.0) | (1u64 << CGEventType::FlagsChanged.0);
        let ctx_ptr = &*ctx as *const KeyboardCtx as *mut std::ffi::c_void;

        let Some(event_tap) = (unsafe {
            CGEvent::tap_create(
                CGEventTapLocation::SessionEventTap,
                CGEventTapPlacement::HeadInsertEventTap,
                CGEventTapOptions::Default,
                event_mask,
                Some(event_tap_callback),
                ctx_ptr,
            )
        }) else {
            return Err(anyhow::anyhow!(
                "Failed to create event tap, is accessibility permission granted?"
            ));
        };

        let Some(run_loop_source) =
            CFMachPort::new_run_loop_source(unsafe { kCFAllocatorDefault }, Some(&event_tap), 0)
        else {
            return Err(anyhow::anyhow!("Failed to create run loop source"));
        };
        run_loop.add_source(Some(&run_loop_source), unsafe { kCFRunLoopDefaultMode });

        ctx.event_tap.set(event_tap).ok();
        tracing::debug!("Keyboard listener started");

        Ok(Self {
            ctx,
            run_loop_source,
        })
    }
}

unsafe extern "C-unwind" fn event_tap_callback(
    _proxy: CGEventTapProxy,
    event_type: CGEventType,
    event: NonNull<CGEvent>,
    refcon: *mut std::ffi::c_void,
) -> *mut CGEvent {
    let ctx: &KeyboardCtx = unsafe { &*(refcon as *const KeyboardCtx) };
    let event_ptr = event.as_ptr();
    let event_ref = unsafe { event.as_ref() };

    if event_type == CGEventType::TapDisabledByTimeout
        || event_type == CGEventType::TapDisabledByUserInput
    {
        if let Some(tap) = ctx.event_tap.get() {
            tracing::debug!("Event tap disabled, re-enabling");
            CGEvent::tap_enable(tap, true);
        }
    } else if event_type == CGEventType::FlagsChanged {
        let modifiers = modifiers_from_flags(CGEvent::flags(Some(event_ref)));
        ctx.sender.send(AppEvent::Input(Input::ModifiersChanged(modifiers)));
    } else if event_type == CGEventType::KeyDown && handle_key_down(ctx, event_ref) {
        return std::ptr::null_mut();
    }

    event_ptr
}

/// Returns whether the key was taken by us
fn handle_key_down(ctx: &KeyboardCtx, event: &CGEvent) -> bool {
    let picker_open = ctx.picker_open.get();
    let chord_held = modifiers_from_flags(CGEvent::flags(Some(event))) == ctx.snap_modifiers.get();
    if !picker_open && !chord_held {
        return false;
    }

    let key = get_key_from_event(event);
    if !picker_open && key.parse::<Direction>().is_err() {
        return false;
    }
    let is_repeat =
        CGEvent::integer_value_field(Some(event), CGEventField::KeyboardEventAutorepeat) != 0;

    tracing::trace!(key, is_repeat, picker_open, "Key captured");
    ctx.sender.send(AppEvent::Input(Input::KeyDown { key, is_repeat }));
    true
}

fn modifiers_from_flags(flags: CGEventFlags) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    if flags.contains(CGEventFlags::MaskCommand) {
        modifiers |= Modifiers::CMD;
    }
    if flags.contains(CGEventFlags::MaskShift) {
        modifiers |= Modifiers::SHIFT;
    }
    if flags.contains(CGEventFlags::MaskAlternate) {
        modifiers |= Modifiers::ALT;
    }
    if flags.contains(CGEventFlags::MaskControl) {
        modifiers |= Modifiers::CTRL;
    }
    modifiers
}

fn get_key_from_event(event: &CGEvent) -> String {
    let keycode = CGEvent::integer_value_field(Some(event), CGEventField::KeyboardEventKeycode);

    match keycode {
        0x00 => "a",
        0x01 => "s",
        0x02 => "d",
        0x03 => "f",
        0x04 => "h",
        0x05 => "g",
        0x06 => "z",
        0x07 => "x",
        0x08 => "c",
        0x09 => "v",
        0x0B => "b",
        0x0C => "q",
        0x0D => "w",
        0x0E => "e",
        0x0F => "r",
        0x10 => "y",
        0x11 => "t",
        0x12 => "1",
        0x13 => "2",
        0x14 => "3",
        0x15 => "4",
        0x16 => "6",
        0x17 => "5",
        0x18 => "=",
        0x19 => "9",
        0x1A => "7",
        0x1B => "-",
        0x1C => "8",
        0x1D => "0",
        0x1E => "]",
        0x1F => "o",
        0x20 => "u",
        0x21 => "[",
        0x22 => "i",
        0x23 => "p",
        0x25 => "l",
        0x26 => "j",
        0x27 => "'",
        0x28 => "k",
        0x29 => ";",
        0x2A => "\\",
        0x2B => ",",
        0x2C => "/",
        0x2D => "n",
        0x2E => "m",
        0x2F => ".",
        0x32 => "`",
        0x24 => "return",
        0x4C => "enter",
        0x33 => "backspace",
        0x35 => "escape",
        0x30 => "tab",
        0x31 => "space",
        0x7E => "up",
        0x7D => "down",
        0x7B => "left",
        0x7C => "right",
        _ => return format!("keycode_{keycode}"),
    }
    .to_string()
}
