use super::geometry::Dimension;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

// Absorbs rounding when a container divides exactly into tiles
const EPSILON: f64 = 1e-6;
const COLUMN_TOLERANCE: f64 = 1e-5;

/// Largest square tile such that `count` of them fit in a `width` x `height` container.
///
/// Tries the best column count and the best row count and keeps whichever gives the bigger
/// tile. Both candidates always fit, so the grid never overflows on either axis.
pub fn pack_tiles(count: usize, width: f32, height: f32) -> Size {
    if count == 0 || width <= 0.0 || height <= 0.0 {
        return Size::ZERO;
    }
    let n = count as f64;
    let x = width as f64;
    let y = height as f64;

    let px = ceil((n * x / y).sqrt());
    let sx = if floor(px * y / x) * px < n {
        y / ceil(px * y / x)
    } else {
        x / px
    };

    let py = ceil((n * y / x).sqrt());
    let sy = if floor(py * x / y) * py < n {
        x / ceil(py * x / y)
    } else {
        y / py
    };

    let side = sx.max(sy) as f32;
    Size::new(side, side)
}

fn floor(v: f64) -> f64 {
    (v + EPSILON).floor()
}

fn ceil(v: f64) -> f64 {
    (v - EPSILON).ceil()
}

/// Placement of `count` equally sized tiles, filled row by row from the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileGrid {
    pub count: usize,
    pub tile: Size,
    pub columns: usize,
    pub rows: usize,
    /// Distance between the origins of two neighbouring tiles
    pub stride: Size,
    pub offset: Size,
}

impl TileGrid {
    pub fn new(count: usize, width: f32, height: f32) -> Self {
        let tile = pack_tiles(count, width, height);
        Self::from_cell(count, width, tile, tile, Size::ZERO)
    }

    fn from_cell(count: usize, width: f32, cell: Size, tile: Size, offset: Size) -> Self {
        if count == 0 || cell.width <= 0.0 {
            return Self {
                count,
                tile: Size::ZERO,
                columns: 0,
                rows: 0,
                stride: Size::ZERO,
                offset,
            };
        }
        // Tile sizes are rounded to f32, so an exact fit can come out a hair short
        let fit = ((width as f64 / cell.width as f64) + COLUMN_TOLERANCE).floor() as usize;
        let columns = fit.clamp(1, count);
        let rows = count.div_ceil(columns);
        Self {
            count,
            tile,
            columns,
            rows,
            stride: cell,
            offset,
        }
    }

    pub fn frame(&self, index: usize) -> Option<Dimension> {
        if index >= self.count || self.columns == 0 {
            return None;
        }
        let column = index % self.columns;
        let row = index / self.columns;
        Some(Dimension {
            x: self.offset.width + column as f32 * self.stride.width,
            y: self.offset.height + row as f32 * self.stride.height,
            width: self.tile.width,
            height: self.tile.height,
        })
    }

    /// Tile under a point in container coordinates. Gaps between tiles hit nothing.
    pub fn index_at(&self, x: f32, y: f32) -> Option<usize> {
        (0..self.count).find(|&i| self.frame(i).is_some_and(|f| f.contains(x, y)))
    }
}

/// Inset around the picker content and the gap between tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerLayout {
    pub inset: f32,
    pub spacing: f32,
}

impl Default for PickerLayout {
    fn default() -> Self {
        Self {
            inset: 20.0,
            spacing: 30.0,
        }
    }
}

impl PickerLayout {
    /// The trailing gap of the last column and row is added back to the available space before
    /// packing, then removed from each packed cell, so tiles are separated by exactly `spacing`.
    pub fn layout(&self, count: usize, container: Size) -> TileGrid {
        let width = container.width - 2.0 * self.inset + self.spacing;
        let height = container.height - 2.0 * self.inset + self.spacing;
        let cell = pack_tiles(count, width, height);
        let tile = Size::new(
            (cell.width - self.spacing).max(0.0),
            (cell.height - self.spacing).max(0.0),
        );
        TileGrid::from_cell(
            count,
            width,
            cell,
            tile,
            Size::new(self.inset, self.inset),
        )
    }
}

/// Largest rectangle with the aspect ratio of `content` that fits in `bounds`, centered.
pub fn fit_within(content: Size, bounds: Dimension) -> Dimension {
    if content.width <= 0.0 || content.height <= 0.0 || bounds.is_empty() {
        return Dimension::default();
    }
    let scale = (bounds.width / content.width).min(bounds.height / content.height);
    let width = content.width * scale;
    let height = content.height * scale;
    Dimension {
        x: bounds.x + (bounds.width - width) / 2.0,
        y: bounds.y + (bounds.height - height) / 2.0,
        width,
        height,
    }
}
