mod geometry;
mod packing;
mod platform;
mod reconcile;
mod session;
mod snap;
mod suggestion;
#[cfg(test)]
mod tests;

pub use geometry::{
    Dimension, Origin, Region, ScreenBounds, mirror_region, picker_frame, region_rect,
};
pub use packing::{PickerLayout, Size, TileGrid, fit_within, pack_tiles};
pub use platform::{HandleError, Pid, Platform, RunningApp, SurfaceId, WindowHandle, WindowSurface};
pub use reconcile::{ReconciledWindow, reconcile};
pub use session::{Input, Outcome, Session, Settings};
pub use snap::{Direction, next_region};
pub use suggestion::SuggestionSet;
