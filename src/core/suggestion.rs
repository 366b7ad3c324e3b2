use super::geometry::{Origin, Region, ScreenBounds, region_rect};
use super::platform::{HandleError, Platform};
use super::reconcile::ReconciledWindow;
use super::snap::Direction;

/// Candidate windows offered to fill `target`, in enumeration order, with one of them focused.
pub struct SuggestionSet<P: Platform> {
    target: Region,
    windows: Vec<ReconciledWindow<P>>,
    focused: Option<usize>,
}

impl<P: Platform> SuggestionSet<P> {
    pub fn new(target: Region) -> Self {
        Self {
            target,
            windows: Vec::new(),
            focused: None,
        }
    }

    pub fn target(&self) -> Region {
        self.target
    }

    pub fn push(&mut self, window: ReconciledWindow<P>) {
        self.windows.push(window);
        if self.focused.is_none() {
            self.focused = Some(0);
        }
    }

    pub fn extend(&mut self, windows: impl IntoIterator<Item = ReconciledWindow<P>>) {
        for window in windows {
            self.push(window);
        }
    }

    pub fn get(&self, index: usize) -> Option<&ReconciledWindow<P>> {
        self.windows.get(index)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReconciledWindow<P>> {
        self.windows.iter()
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused_window(&self) -> Option<&ReconciledWindow<P>> {
        self.focused.and_then(|i| self.windows.get(i))
    }

    /// Focus the tile at `index`. Out of range indices are ignored.
    pub fn focus(&mut self, index: usize) -> bool {
        if index >= self.windows.len() || self.focused == Some(index) {
            return false;
        }
        self.focused = Some(index);
        true
    }

    /// Move the focus by one tile horizontally, or by one row of `columns` tiles vertically.
    /// There is no wraparound: a move that would leave the set does nothing.
    ///
    /// Returns whether the focus changed.
    pub fn move_focus(&mut self, direction: Direction, columns: usize) -> bool {
        let Some(current) = self.focused else {
            return false;
        };
        let step = match direction {
            Direction::Left | Direction::Right => 1,
            Direction::Up | Direction::Down => columns,
        };
        if step == 0 {
            return false;
        }
        let next = match direction {
            Direction::Left | Direction::Up => current.checked_sub(step),
            Direction::Right | Direction::Down => current.checked_add(step),
        };
        match next {
            Some(next) => self.focus(next),
            None => false,
        }
    }

    /// Snap the focused window into the target region and bring it to front. Ends the session,
    /// so the set is consumed.
    pub fn select(self, screen: &ScreenBounds) -> Result<Option<String>, HandleError> {
        match self.focused {
            Some(index) => self.select_at(index, screen),
            None => Ok(None),
        }
    }

    /// Like [`SuggestionSet::select`] for an explicit tile, e.g. one that was clicked.
    pub fn select_at(
        mut self,
        index: usize,
        screen: &ScreenBounds,
    ) -> Result<Option<String>, HandleError> {
        if index >= self.windows.len() {
            return Ok(None);
        }
        let frame = region_rect(self.target, screen, Origin::TopLeft);
        let mut window = self.windows.swap_remove(index);
        window.set_frame(frame)?;
        window.bring_to_front()?;
        Ok(Some(window.title().to_string()))
    }
}
