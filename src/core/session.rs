use std::collections::HashMap;
use std::fmt;

use super::geometry::{Dimension, Origin, Region, mirror_region, picker_frame, region_rect};
use super::packing::{PickerLayout, Size, TileGrid};
use super::platform::Platform;
use super::reconcile::{ReconciledWindow, reconcile};
use super::snap::{Direction, next_region};
use super::suggestion::SuggestionSet;
use crate::action::PickerAction;
use crate::config::Modifiers;

#[derive(Debug, Clone)]
pub struct Settings {
    pub snap_modifiers: Modifiers,
    pub include_minimized: bool,
    pub layout: PickerLayout,
    pub picker_keymaps: HashMap<String, PickerAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// The full set of modifiers held after a change
    ModifiersChanged(Modifiers),
    KeyDown { key: String, is_repeat: bool },
    /// A picker tile was clicked
    TileClicked { index: usize },
    /// The picker stopped being the active surface, e.g. the user clicked elsewhere
    PickerResigned,
}

/// How a picker session ends.
enum Choice {
    Focused,
    Tile(usize),
    Dismiss,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Ignored,
    GestureStarted {
        key_window: Option<String>,
    },
    Snapped {
        region: Region,
        frame: Dimension,
    },
    GestureEnded {
        region: Region,
    },
    PickerOpened {
        target: Region,
        frame: Dimension,
        grid: TileGrid,
        candidates: Vec<String>,
    },
    FocusMoved {
        index: usize,
    },
    PickerClosed {
        selected: Option<String>,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ignored => write!(f, "Ignored"),
            Outcome::GestureStarted { key_window } => write!(
                f,
                "GestureStarted(key={})",
                key_window.as_deref().unwrap_or("none")
            ),
            Outcome::Snapped { region, frame } => write!(f, "Snapped({region}, {frame})"),
            Outcome::GestureEnded { region } => write!(f, "GestureEnded({region})"),
            Outcome::PickerOpened {
                target,
                frame,
                grid,
                candidates,
            } => write!(
                f,
                "PickerOpened(target={target}, frame={frame}, columns={}, tile={:.2}, candidates=[{}])",
                grid.columns,
                grid.tile.width,
                candidates.join(", ")
            ),
            Outcome::FocusMoved { index } => write!(f, "FocusMoved({index})"),
            Outcome::PickerClosed { selected } => write!(
                f,
                "PickerClosed(selected={})",
                selected.as_deref().unwrap_or("none")
            ),
        }
    }
}

enum Phase<P: Platform> {
    Idle,
    /// Snap chord held
    Snapping {
        region: Region,
        key_window: Option<ReconciledWindow<P>>,
    },
    /// Chord released, the key window stays in `region`
    Picking {
        region: Region,
        suggestions: SuggestionSet<P>,
        grid: TileGrid,
        key_window: Option<ReconciledWindow<P>>,
    },
}

/// State of one snap gesture, fed one input at a time.
///
/// Holding the snap chord starts a gesture and arrow keys move the key window from region to
/// region. Releasing the chord offers the other windows for the region on the opposite side; the
/// gesture ends once one is picked or the picker is dismissed.
pub struct Session<P: Platform> {
    settings: Settings,
    phase: Phase<P>,
}

impl<P: Platform> Session<P> {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            phase: Phase::Idle,
        }
    }

    pub fn reconfigure(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn region(&self) -> Region {
        match &self.phase {
            Phase::Snapping { region, .. } | Phase::Picking { region, .. } => *region,
            Phase::Idle => Region::None,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    pub fn is_picking(&self) -> bool {
        matches!(self.phase, Phase::Picking { .. })
    }

    pub fn suggestions(&self) -> Option<&SuggestionSet<P>> {
        match &self.phase {
            Phase::Picking { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }

    #[tracing::instrument(skip(self, platform))]
    pub fn handle(&mut self, platform: &P, input: Input) -> Outcome {
        match input {
            Input::ModifiersChanged(modifiers) => self.on_modifiers(platform, modifiers),
            Input::KeyDown { key, is_repeat } => match self.phase {
                Phase::Idle => Outcome::Ignored,
                Phase::Snapping { .. } => self.on_snap_key(platform, &key, is_repeat),
                Phase::Picking { .. } => self.on_picker_key(platform, &key),
            },
            Input::TileClicked { index } if self.is_picking() => {
                self.close_picker(platform, Choice::Tile(index))
            }
            Input::PickerResigned if self.is_picking() => {
                self.close_picker(platform, Choice::Dismiss)
            }
            Input::TileClicked { .. } | Input::PickerResigned => Outcome::Ignored,
        }
    }

    fn on_modifiers(&mut self, platform: &P, modifiers: Modifiers) -> Outcome {
        let chord_held = modifiers == self.settings.snap_modifiers;
        let is_idle = matches!(self.phase, Phase::Idle);
        let is_snapping = matches!(self.phase, Phase::Snapping { .. });

        if is_idle && chord_held {
            // Don't prompt again when permission is missing, it was asked for at launch
            if !platform.is_trusted() {
                tracing::debug!("Snap chord ignored, accessibility permission missing");
                return Outcome::Ignored;
            }
            let key_window = reconcile(platform, false)
                .into_iter()
                .find(|w| w.is_key());
            let title = key_window.as_ref().map(|w| w.title().to_string());
            tracing::debug!(key_window = ?title, "Snap gesture started");
            self.phase = Phase::Snapping {
                region: Region::None,
                key_window,
            };
            Outcome::GestureStarted { key_window: title }
        } else if is_snapping && !chord_held {
            self.on_chord_released(platform)
        } else {
            Outcome::Ignored
        }
    }

    fn on_snap_key(&mut self, platform: &P, key: &str, is_repeat: bool) -> Outcome {
        if is_repeat {
            return Outcome::Ignored;
        }
        let Ok(direction) = key.parse::<Direction>() else {
            return Outcome::Ignored;
        };
        let Phase::Snapping { region, key_window } = &mut self.phase else {
            return Outcome::Ignored;
        };

        let next = next_region(*region, direction);
        tracing::debug!(from = %region, %direction, to = %next, "Snap region changed");
        *region = next;
        if next == Region::None {
            return Outcome::Ignored;
        }

        let Some(screen) = platform.screen() else {
            tracing::warn!("No main screen, can't snap");
            return Outcome::Ignored;
        };
        let frame = region_rect(next, &screen, Origin::TopLeft);
        if let Some(window) = key_window
            && let Err(e) = window.set_frame(frame)
        {
            tracing::warn!(window = %window, "Failed to snap key window: {e}");
        }
        Outcome::Snapped {
            region: next,
            frame,
        }
    }

    fn on_chord_released(&mut self, platform: &P) -> Outcome {
        let Phase::Snapping { region, key_window } =
            std::mem::replace(&mut self.phase, Phase::Idle)
        else {
            return Outcome::Ignored;
        };
        if !region.has_mirror() {
            tracing::debug!(%region, "Snap gesture ended");
            return Outcome::GestureEnded { region };
        }

        let target = mirror_region(region);
        let windows = reconcile(platform, self.settings.include_minimized);
        if windows.len() < 2 {
            tracing::debug!(count = windows.len(), "Not enough windows to suggest");
            return Outcome::GestureEnded { region };
        }
        let Some(screen) = platform.screen() else {
            tracing::warn!("No main screen, can't suggest windows");
            return Outcome::GestureEnded { region };
        };

        let mut suggestions = SuggestionSet::new(target);
        suggestions.extend(windows.into_iter().filter(|w| !w.is_key()));
        if suggestions.is_empty() {
            return Outcome::GestureEnded { region };
        }

        let frame = picker_frame(target, &screen);
        let grid = self
            .settings
            .layout
            .layout(suggestions.len(), Size::new(frame.width, frame.height));
        let candidates = suggestions.iter().map(|w| w.title().to_string()).collect();
        tracing::info!(%target, count = suggestions.len(), "Suggesting windows");

        self.phase = Phase::Picking {
            region,
            suggestions,
            grid,
            key_window,
        };
        Outcome::PickerOpened {
            target,
            frame,
            grid,
            candidates,
        }
    }

    fn on_picker_key(&mut self, platform: &P, key: &str) -> Outcome {
        let Some(action) = self.settings.picker_keymaps.get(key).copied() else {
            return Outcome::Ignored;
        };
        match action {
            PickerAction::Focus(direction) => {
                let Phase::Picking {
                    suggestions, grid, ..
                } = &mut self.phase
                else {
                    return Outcome::Ignored;
                };
                if suggestions.move_focus(direction, grid.columns) {
                    Outcome::FocusMoved {
                        index: suggestions.focused().unwrap_or_default(),
                    }
                } else {
                    Outcome::Ignored
                }
            }
            PickerAction::Select => self.close_picker(platform, Choice::Focused),
            PickerAction::Cancel => self.close_picker(platform, Choice::Dismiss),
        }
    }

    fn close_picker(&mut self, platform: &P, choice: Choice) -> Outcome {
        let Phase::Picking {
            suggestions,
            key_window,
            ..
        } = std::mem::replace(&mut self.phase, Phase::Idle)
        else {
            return Outcome::Ignored;
        };

        let selected = match (choice, platform.screen()) {
            (Choice::Dismiss, _) => None,
            (_, None) => {
                tracing::warn!("No main screen, can't snap suggested window");
                None
            }
            (choice, Some(screen)) => {
                let result = match choice {
                    Choice::Tile(index) => suggestions.select_at(index, &screen),
                    _ => suggestions.select(&screen),
                };
                result.unwrap_or_else(|e| {
                    tracing::warn!("Failed to snap suggested window: {e}");
                    None
                })
            }
        };

        // Give focus back to the window the gesture started with
        if let Some(mut window) = key_window
            && let Err(e) = window.make_key(platform)
        {
            tracing::warn!(window = %window, "Failed to restore key window: {e}");
        }

        tracing::info!(?selected, "Picker closed");
        Outcome::PickerClosed { selected }
    }
}
