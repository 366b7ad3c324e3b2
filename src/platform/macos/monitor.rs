use objc2::MainThreadMarker;
use objc2_app_kit::NSScreen;

use crate::core::{Dimension, ScreenBounds};

/// Bounds of the screen holding the key window. The top bar is the gap between the top of the
/// screen and the top of its visible frame.
pub(super) fn main_screen(mtm: MainThreadMarker) -> Option<ScreenBounds> {
    let screen = NSScreen::mainScreen(mtm)?;
    let frame = screen.frame();
    let visible = screen.visibleFrame();
    let top_inset = (frame.origin.y + frame.size.height) - (visible.origin.y + visible.size.height);
    Some(ScreenBounds {
        visible: Dimension {
            x: visible.origin.x as f32,
            y: visible.origin.y as f32,
            width: visible.size.width as f32,
            height: visible.size.height as f32,
        },
        top_bar_height: top_inset as f32,
    })
}
