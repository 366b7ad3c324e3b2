use std::fmt;
use std::ptr::NonNull;

use objc2_application_services::{
    AXIsProcessTrustedWithOptions, AXUIElement, kAXTrustedCheckOptionPrompt,
};
use objc2_core_foundation::{CFBoolean, CFDictionary, CFRetained, CFString, CFType};

use crate::core::HandleError;

type RawAXError = objc2_application_services::AXError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AXError {
    InvalidUIElement,
    Other(RawAXError),
}

impl From<RawAXError> for AXError {
    fn from(err: RawAXError) -> Self {
        if err == RawAXError::InvalidUIElement {
            AXError::InvalidUIElement
        } else {
            AXError::Other(err)
        }
    }
}

impl fmt::Display for AXError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = match self {
            AXError::InvalidUIElement => RawAXError::InvalidUIElement,
            AXError::Other(err) => *err,
        };
        write!(f, "{}", decorate_raw_ax_error(raw))
    }
}

impl std::error::Error for AXError {}

impl From<AXError> for HandleError {
    fn from(err: AXError) -> Self {
        match err {
            AXError::InvalidUIElement => HandleError::Stale,
            AXError::Other(_) => HandleError::Rejected(err.to_string()),
        }
    }
}

pub(super) fn get_attribute<T: objc2_core_foundation::Type>(
    element: &AXUIElement,
    attribute: &CFString,
) -> Result<CFRetained<T>, AXError> {
    let mut value: *const CFType = std::ptr::null();
    let res = unsafe { element.copy_attribute_value(attribute, NonNull::from(&mut value)) };
    if res != RawAXError::Success {
        return Err(res.into());
    }
    let value = NonNull::new(value as *mut T).ok_or(AXError::Other(RawAXError::NoValue))?;
    Ok(unsafe { CFRetained::from_raw(value) })
}

pub(super) fn get_bool(element: &AXUIElement, attribute: &CFString) -> bool {
    get_attribute::<CFBoolean>(element, attribute)
        .map(|b| b.as_bool())
        .unwrap_or(false)
}

pub(super) fn set_attribute_value(
    element: &AXUIElement,
    attribute: &CFString,
    value: &CFType,
) -> Result<(), AXError> {
    let res = unsafe { element.set_attribute_value(attribute, value) };
    if res != RawAXError::Success {
        return Err(res.into());
    }
    Ok(())
}

pub(super) fn perform_action(element: &AXUIElement, action: &CFString) -> Result<(), AXError> {
    let res = unsafe { element.perform_action(action) };
    if res != RawAXError::Success {
        return Err(res.into());
    }
    Ok(())
}

/// Whether the process may drive other apps through accessibility. With `prompt`, macOS asks the
/// user to grant the permission if it's missing.
pub(super) fn is_process_trusted(prompt: bool) -> bool {
    if !prompt {
        return unsafe { AXIsProcessTrustedWithOptions(None) };
    }
    let options = CFDictionary::from_slices(
        &[unsafe { kAXTrustedCheckOptionPrompt }],
        &[CFBoolean::new(true)],
    );
    unsafe { AXIsProcessTrustedWithOptions(Some(options.as_opaque())) }
}

#[allow(non_snake_case)]
pub(super) fn kAXPositionAttribute() -> CFRetained<CFString> {
    CFString::from_static_str("AXPosition")
}

#[allow(non_snake_case)]
pub(super) fn kAXSizeAttribute() -> CFRetained<CFString> {
    CFString::from_static_str("AXSize")
}

#[allow(non_snake_case)]
pub(super) fn kAXMinimizedAttribute() -> CFRetained<CFString> {
    CFString::from_static_str("AXMinimized")
}

#[allow(non_snake_case)]
pub(super) fn kAXFrontmostAttribute() -> CFRetained<CFString> {
    CFString::from_static_str("AXFrontmost")
}

#[allow(non_snake_case)]
pub(super) fn kAXMainAttribute() -> CFRetained<CFString> {
    CFString::from_static_str("AXMain")
}

#[allow(non_snake_case)]
pub(super) fn kAXTitleAttribute() -> CFRetained<CFString> {
    CFString::from_static_str("AXTitle")
}

#[allow(non_snake_case)]
pub(super) fn kAXWindowsAttribute() -> CFRetained<CFString> {
    CFString::from_static_str("AXWindows")
}

#[allow(non_snake_case)]
pub(super) fn kAXEnhancedUserInterfaceAttribute() -> CFRetained<CFString> {
    CFString::from_static_str("AXEnhancedUserInterface")
}

#[allow(non_snake_case)]
pub(super) fn kAXRaiseAction() -> CFRetained<CFString> {
    CFString::from_static_str("AXRaise")
}

#[allow(non_snake_case)]
pub(super) fn kCGWindowNumber() -> CFRetained<CFString> {
    CFString::from_static_str("kCGWindowNumber")
}

#[allow(non_snake_case)]
pub(super) fn kCGWindowOwnerPID() -> CFRetained<CFString> {
    CFString::from_static_str("kCGWindowOwnerPID")
}

#[allow(non_snake_case)]
pub(super) fn kCGWindowName() -> CFRetained<CFString> {
    CFString::from_static_str("kCGWindowName")
}

#[allow(non_snake_case)]
pub(super) fn kCGWindowIsOnscreen() -> CFRetained<CFString> {
    CFString::from_static_str("kCGWindowIsOnscreen")
}

#[allow(non_snake_case)]
pub(super) fn kCGWindowLayer() -> CFRetained<CFString> {
    CFString::from_static_str("kCGWindowLayer")
}

fn decorate_raw_ax_error(error: RawAXError) -> String {
    let description = match error {
        RawAXError::Success => "No error occurred",
        RawAXError::Failure => "A system error occurred, such as the failure to allocate an object",
        RawAXError::IllegalArgument => "An illegal argument was passed to the function",
        RawAXError::InvalidUIElement => "The AXUIElementRef passed to the function is invalid",
        RawAXError::CannotComplete => {
            "The function cannot complete because messaging failed or the application is busy/unresponsive"
        }
        RawAXError::AttributeUnsupported => "The attribute is not supported by the AXUIElementRef",
        RawAXError::ActionUnsupported => "The action is not supported by the AXUIElementRef",
        RawAXError::NotImplemented => "The function or method is not implemented",
        RawAXError::APIDisabled => "The accessibility API is disabled",
        RawAXError::NoValue => "The requested value or AXUIElementRef does not exist",
        _ => "Unknown AXError",
    };
    format!("{} (code: {})", description, error.0)
}
