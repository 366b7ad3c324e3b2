use std::ptr::NonNull;

use objc2_application_services::{AXError as RawAXError, AXUIElement, AXValue, AXValueType};
use objc2_core_foundation::{CFBoolean, CFRetained, CFString, CGPoint, CGSize};

use crate::core::{HandleError, Pid, WindowHandle};

use super::objc2_wrapper::{
    AXError, get_attribute, get_bool, kAXEnhancedUserInterfaceAttribute, kAXFrontmostAttribute,
    kAXMainAttribute, kAXMinimizedAttribute, kAXPositionAttribute, kAXRaiseAction,
    kAXSizeAttribute, kAXTitleAttribute, perform_action, set_attribute_value,
};

/// A window of another app, driven through its accessibility element.
pub(super) struct AXWindow {
    element: CFRetained<AXUIElement>,
    app: CFRetained<AXUIElement>,
    pid: Pid,
}

impl std::fmt::Display for AXWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.pid, self.title().as_deref().unwrap_or("<untitled>"))
    }
}

impl AXWindow {
    pub(super) fn new(element: CFRetained<AXUIElement>, pid: Pid) -> Self {
        let app = unsafe { AXUIElement::new_application(pid) };
        Self { element, app, pid }
    }

    /// Without this the windows move in a janky way
    /// https://github.com/nikitabobko/AeroSpace/issues/51
    fn with_animation_disabled<F>(&self, f: F) -> Result<(), AXError>
    where
        F: FnOnce() -> Result<(), AXError>,
    {
        let was_enabled = get_bool(&self.app, &kAXEnhancedUserInterfaceAttribute());
        if was_enabled {
            let _ = set_attribute_value(
                &self.app,
                &kAXEnhancedUserInterfaceAttribute(),
                CFBoolean::new(false),
            );
        }
        let result = f();
        if was_enabled {
            let _ = set_attribute_value(
                &self.app,
                &kAXEnhancedUserInterfaceAttribute(),
                CFBoolean::new(true),
            );
        }
        result
    }

    fn set_value<T>(
        &self,
        attribute: &CFString,
        kind: AXValueType,
        mut value: T,
    ) -> Result<(), AXError> {
        let ptr = NonNull::from(&mut value).cast();
        let value = unsafe { AXValue::new(kind, ptr) }
            .ok_or(AXError::Other(RawAXError::IllegalArgument))?;
        set_attribute_value(&self.element, attribute, &value)
    }
}

impl WindowHandle for AXWindow {
    fn title(&self) -> Option<String> {
        get_attribute::<CFString>(&self.element, &kAXTitleAttribute())
            .map(|t| t.to_string())
            .ok()
    }

    fn is_main(&self) -> bool {
        get_bool(&self.element, &kAXMainAttribute())
    }

    #[tracing::instrument(skip(self), fields(window = %self))]
    fn set_position(&self, x: f32, y: f32) -> Result<(), HandleError> {
        let point = CGPoint::new(x as f64, y as f64);
        self.with_animation_disabled(|| {
            self.set_value(&kAXPositionAttribute(), AXValueType::CGPoint, point)
        })?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(window = %self))]
    fn set_size(&self, width: f32, height: f32) -> Result<(), HandleError> {
        let size = CGSize::new(width as f64, height as f64);
        self.with_animation_disabled(|| {
            self.set_value(&kAXSizeAttribute(), AXValueType::CGSize, size)
        })?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(window = %self))]
    fn set_minimized(&self, minimized: bool) -> Result<(), HandleError> {
        set_attribute_value(
            &self.element,
            &kAXMinimizedAttribute(),
            CFBoolean::new(minimized),
        )?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(window = %self))]
    fn raise(&self) -> Result<(), HandleError> {
        if !get_bool(&self.app, &kAXFrontmostAttribute()) {
            set_attribute_value(&self.app, &kAXFrontmostAttribute(), CFBoolean::new(true))?;
        }
        if !get_bool(&self.element, &kAXMainAttribute()) {
            set_attribute_value(&self.element, &kAXMainAttribute(), CFBoolean::new(true))?;
        }
        perform_action(&self.element, &kAXRaiseAction())?;
        Ok(())
    }
}
