#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dimension {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Dimension {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.max_x() && y >= self.y && y < self.max_y()
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(x={:.2} y={:.2} w={:.2} h={:.2})",
            self.x, self.y, self.width, self.height
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Region {
    #[default]
    None,
    FullScreen,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Region {
    pub const ALL: [Region; 10] = [
        Region::None,
        Region::FullScreen,
        Region::Left,
        Region::Right,
        Region::Top,
        Region::Bottom,
        Region::TopLeft,
        Region::TopRight,
        Region::BottomLeft,
        Region::BottomRight,
    ];

    /// A gesture that ends on one of these leaves a vacated area worth filling.
    pub fn has_mirror(self) -> bool {
        !matches!(self, Region::None | Region::FullScreen)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Region::None => "None",
            Region::FullScreen => "FullScreen",
            Region::Left => "Left",
            Region::Right => "Right",
            Region::Top => "Top",
            Region::Bottom => "Bottom",
            Region::TopLeft => "TopLeft",
            Region::TopRight => "TopRight",
            Region::BottomLeft => "BottomLeft",
            Region::BottomRight => "BottomRight",
        };
        write!(f, "{name}")
    }
}

/// Which corner a computed rectangle is anchored to. Accessibility APIs place windows from the
/// top-left corner of the main display, AppKit windows from the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    TopLeft,
    BottomLeft,
}

/// Visible area of the main screen, without the menu bar and dock, plus the menu bar height.
/// Read again from the platform before every computation as the dock can be toggled at any time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBounds {
    pub visible: Dimension,
    pub top_bar_height: f32,
}

pub fn region_rect(region: Region, screen: &ScreenBounds, origin: Origin) -> Dimension {
    let x = screen.visible.x;
    let y = screen.top_bar_height;
    let width = screen.visible.width;
    let height = screen.visible.height;
    let half_width = width / 2.0;
    let half_height = height / 2.0;

    let mut rect = match region {
        Region::None => return Dimension::default(),
        Region::FullScreen => Dimension::new(x, y, width, height),
        Region::Left => Dimension::new(x, y, half_width, height),
        Region::Right => Dimension::new(x + half_width, y, half_width, height),
        Region::Top => Dimension::new(x, y, width, half_height),
        Region::Bottom => Dimension::new(x, y + half_height, width, half_height),
        Region::TopLeft => Dimension::new(x, y, half_width, half_height),
        Region::TopRight => Dimension::new(x + half_width, y, half_width, half_height),
        Region::BottomLeft => Dimension::new(x, y + half_height, half_width, half_height),
        Region::BottomRight => {
            Dimension::new(x + half_width, y + half_height, half_width, half_height)
        }
    };

    if origin == Origin::BottomLeft {
        rect.y = height - rect.height - rect.y;
    }
    rect
}

pub fn mirror_region(region: Region) -> Region {
    match region {
        Region::None | Region::FullScreen => Region::None,
        Region::Left => Region::Right,
        Region::Right => Region::Left,
        Region::Top => Region::Bottom,
        Region::Bottom => Region::Top,
        Region::TopLeft => Region::BottomLeft,
        Region::TopRight => Region::BottomRight,
        Region::BottomLeft => Region::TopLeft,
        Region::BottomRight => Region::TopRight,
    }
}

/// Frame of the picker surface covering `region`. AppKit windows are positioned from the
/// bottom-left corner of the screen, below the dock when it sits at the bottom, so the flipped
/// rect is shifted by the menu bar it was measured from and by the bottom of the visible area.
pub fn picker_frame(region: Region, screen: &ScreenBounds) -> Dimension {
    let mut frame = region_rect(region, screen, Origin::BottomLeft);
    if region != Region::None {
        frame.y += screen.top_bar_height + screen.visible.y;
    }
    frame
}
