use std::cell::{Cell, RefCell};

use objc2::rc::Retained;
use objc2::{DefinedClass, MainThreadMarker, MainThreadOnly, define_class, msg_send};
use objc2_app_kit::{
    NSBackingStoreType, NSBezierPath, NSColor, NSEvent, NSFloatingWindowLevel, NSImage,
    NSResponder, NSView, NSWindow, NSWindowCollectionBehavior, NSWindowStyleMask,
};
use objc2_core_foundation::{CFRetained, CGFloat};
use objc2_core_graphics::CGImage;
use objc2_foundation::{NSObject, NSObjectProtocol, NSPoint, NSRect, NSSize};

use super::app::{AppEvent, EventSender};
use crate::core::{Dimension, Input, Size, TileGrid, fit_within};

const ICON_SIZE: f32 = 64.0;
const FOCUS_BORDER: CGFloat = 4.0;

/// What a picker tile shows for one suggested window.
pub(super) struct Tile {
    pub(super) screenshot: CFRetained<CGImage>,
    pub(super) icon: Retained<NSImage>,
}

struct DrawnTile {
    screenshot: Retained<NSImage>,
    icon: Retained<NSImage>,
}

pub(super) struct PickerViewIvars {
    tiles: RefCell<Vec<DrawnTile>>,
    grid: Cell<Option<TileGrid>>,
    focused: Cell<Option<usize>>,
    sender: EventSender,
}

define_class!(
    #[unsafe(super(NSView, NSResponder, NSObject))]
    #[thread_kind = MainThreadOnly]
    #[ivars = PickerViewIvars]
    pub(super) struct PickerView;

    unsafe impl NSObjectProtocol for PickerView {}

    impl PickerView {
        #[unsafe(method(isFlipped))]
        fn is_flipped(&self) -> bool {
            true
        }

        #[unsafe(method(acceptsFirstMouse:))]
        fn accepts_first_mouse(&self, _event: Option<&NSEvent>) -> bool {
            true
        }

        #[unsafe(method(drawRect:))]
        fn draw_rect(&self, _dirty_rect: NSRect) {
            NSColor::colorWithCalibratedWhite_alpha(0.0, 0.6).setFill();
            NSBezierPath::fillRect(self.bounds());

            let Some(grid) = self.ivars().grid.get() else {
                return;
            };
            let focused = self.ivars().focused.get();
            for (index, tile) in self.ivars().tiles.borrow().iter().enumerate() {
                let Some(frame) = grid.frame(index) else {
                    break;
                };
                let image = tile.screenshot.size();
                let shot = fit_within(Size::new(image.width as f32, image.height as f32), frame);
                tile.screenshot.drawInRect(to_rect(shot));

                let icon = ICON_SIZE.min(frame.width / 3.0);
                tile.icon.drawInRect(to_rect(Dimension::new(
                    frame.x + (frame.width - icon) / 2.0,
                    frame.max_y() - icon,
                    icon,
                    icon,
                )));

                if focused == Some(index) {
                    NSColor::whiteColor().setStroke();
                    let border = NSBezierPath::bezierPathWithRect(to_rect(frame));
                    border.setLineWidth(FOCUS_BORDER);
                    border.stroke();
                }
            }
        }

        #[unsafe(method(mouseDown:))]
        fn mouse_down(&self, event: &NSEvent) {
            let point = self.convertPoint_fromView(event.locationInWindow(), None);
            let hit = self
                .ivars()
                .grid
                .get()
                .and_then(|grid| grid.index_at(point.x as f32, point.y as f32));
            tracing::debug!(x = point.x, y = point.y, ?hit, "Picker clicked");
            if let Some(index) = hit {
                self.ivars()
                    .sender
                    .send(AppEvent::Input(Input::TileClicked { index }));
            }
        }
    }
);

impl PickerView {
    fn new(mtm: MainThreadMarker, frame: NSRect, sender: EventSender) -> Retained<Self> {
        let this = Self::alloc(mtm).set_ivars(PickerViewIvars {
            tiles: RefCell::new(Vec::new()),
            grid: Cell::new(None),
            focused: Cell::new(None),
            sender,
        });
        unsafe { msg_send![super(this), initWithFrame: frame] }
    }
}

/// Borderless window covering the vacated half or quarter, showing one tile per suggested window.
pub(super) struct Picker {
    window: Retained<NSWindow>,
    view: Retained<PickerView>,
}

impl Picker {
    pub(super) fn new(mtm: MainThreadMarker, sender: EventSender) -> Self {
        let frame = NSRect::new(NSPoint::new(0.0, 0.0), NSSize::new(0.0, 0.0));
        let window = unsafe {
            NSWindow::initWithContentRect_styleMask_backing_defer(
                NSWindow::alloc(mtm),
                frame,
                NSWindowStyleMask::Borderless,
                NSBackingStoreType::Buffered,
                false,
            )
        };
        window.setBackgroundColor(Some(&NSColor::clearColor()));
        window.setOpaque(false);
        window.setLevel(NSFloatingWindowLevel);
        window.setIgnoresMouseEvents(false);
        window.setCollectionBehavior(
            NSWindowCollectionBehavior::CanJoinAllSpaces | NSWindowCollectionBehavior::Stationary,
        );
        unsafe { window.setReleasedWhenClosed(false) };

        let view = PickerView::new(mtm, frame, sender);
        window.setContentView(Some(&view));
        Self { window, view }
    }

    /// `frame` is in AppKit screen coordinates, `grid` in coordinates of the picker itself.
    pub(super) fn show(
        &self,
        frame: Dimension,
        grid: TileGrid,
        tiles: Vec<Tile>,
        focused: Option<usize>,
    ) {
        let tiles = tiles
            .into_iter()
            .map(|tile| DrawnTile {
                screenshot: NSImage::initWithCGImage_size(
                    NSImage::alloc(),
                    &tile.screenshot,
                    NSSize::new(0.0, 0.0),
                ),
                icon: tile.icon,
            })
            .collect();
        let ivars = self.view.ivars();
        *ivars.tiles.borrow_mut() = tiles;
        ivars.grid.set(Some(grid));
        ivars.focused.set(focused);

        self.window.setFrame_display(to_rect(frame), true);
        self.view.setNeedsDisplay(true);
        self.window.orderFrontRegardless();
        tracing::debug!(%frame, count = grid.count, "Picker shown");
    }

    pub(super) fn set_focused(&self, index: usize) {
        self.view.ivars().focused.set(Some(index));
        self.view.setNeedsDisplay(true);
    }

    pub(super) fn hide(&self) {
        self.window.orderOut(None);
        let ivars = self.view.ivars();
        ivars.tiles.borrow_mut().clear();
        ivars.grid.set(None);
        ivars.focused.set(None);
    }
}

impl Drop for Picker {
    fn drop(&mut self) {
        self.window.close();
    }
}

fn to_rect(dim: Dimension) -> NSRect {
    NSRect::new(
        NSPoint::new(dim.x as CGFloat, dim.y as CGFloat),
        NSSize::new(dim.width as CGFloat, dim.height as CGFloat),
    )
}
