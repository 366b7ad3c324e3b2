use objc2_core_foundation::{
    CFArray, CFBoolean, CFDictionary, CFNumber, CFNumberType, CFRetained, CFString, CFType,
    CGPoint, CGRect, CGSize,
};
use objc2_core_graphics::{
    CGImage, CGWindowImageOption, CGWindowListCopyWindowInfo, CGWindowListCreateImage,
    CGWindowListOption,
};

use crate::core::{SurfaceId, WindowSurface};

use super::objc2_wrapper::{
    kCGWindowIsOnscreen, kCGWindowLayer, kCGWindowName, kCGWindowNumber, kCGWindowOwnerPID,
};

/// Windows known to the window server, front to back.
pub(super) fn surfaces(include_minimized: bool) -> Vec<WindowSurface> {
    let options = if include_minimized {
        CGWindowListOption::ExcludeDesktopElements
    } else {
        CGWindowListOption::ExcludeDesktopElements | CGWindowListOption::OptionOnScreenOnly
    };
    // 0 is kCGNullWindowID
    let Some(list) = CGWindowListCopyWindowInfo(options, 0) else {
        tracing::warn!("Window server returned no window list");
        return Vec::new();
    };
    let list: &CFArray<CFDictionary<CFString, CFType>> = unsafe { list.cast_unchecked() };
    list.iter().filter_map(|info| parse_surface(&info)).collect()
}

fn parse_surface(info: &CFDictionary<CFString, CFType>) -> Option<WindowSurface> {
    // Menu bar items, the dock and other chrome live above the normal window layer
    if get_i64(info, &kCGWindowLayer())? != 0 {
        return None;
    }
    let pid = get_i64(info, &kCGWindowOwnerPID())?;
    let id = get_i64(info, &kCGWindowNumber())?;
    let title = info
        .get(&kCGWindowName())
        .and_then(|v| v.downcast_ref::<CFString>().map(|s| s.to_string()));
    let on_screen = info
        .get(&kCGWindowIsOnscreen())
        .and_then(|v| v.downcast_ref::<CFBoolean>().map(|b| b.as_bool()));
    Some(WindowSurface {
        pid: pid as i32,
        id: SurfaceId(id as u32),
        title,
        on_screen,
    })
}

fn get_i64(info: &CFDictionary<CFString, CFType>, key: &CFString) -> Option<i64> {
    let value = info.get(key)?;
    let number = value.downcast_ref::<CFNumber>()?;
    let mut out: i64 = 0;
    let ok = unsafe { number.value(CFNumberType::SInt64Type, (&raw mut out).cast()) };
    ok.then_some(out)
}

/// Screenshot of a single window without its shadow, at the backing resolution.
#[allow(deprecated)]
pub(super) fn capture(surface: SurfaceId) -> Option<CFRetained<CGImage>> {
    // CGRectNull asks for the window's own bounds
    let null_rect = CGRect::new(
        CGPoint::new(f64::INFINITY, f64::INFINITY),
        CGSize::new(0.0, 0.0),
    );
    let image = CGWindowListCreateImage(
        null_rect,
        CGWindowListOption::OptionIncludingWindow,
        surface.0,
        CGWindowImageOption::BestResolution | CGWindowImageOption::BoundsIgnoreFraming,
    );
    if image.is_none() {
        tracing::trace!(%surface, "Window capture failed");
    }
    image
}
