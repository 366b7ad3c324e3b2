use super::geometry::Region;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(anyhow::anyhow!("Unknown direction: {s}")),
        }
    }
}

/// Region reached by pressing `direction` while the window is snapped to `previous`.
///
/// Adjacency between regions isn't symmetric so this is a table rather than arithmetic. A corner
/// pressed towards one of its own edges stays where it is, pressing the same edge twice only
/// does something for `Top`, which maximizes.
pub fn next_region(previous: Region, direction: Direction) -> Region {
    use Region::*;

    match direction {
        Direction::Right => match previous {
            None | FullScreen | Left | Right | TopLeft | BottomLeft => Right,
            TopRight => TopRight,
            BottomRight => BottomRight,
            Bottom => BottomRight,
            Top => TopRight,
        },
        Direction::Left => match previous {
            None | FullScreen | Left | Right | TopRight | BottomRight => Left,
            TopLeft => TopLeft,
            BottomLeft => BottomLeft,
            Bottom => BottomLeft,
            Top => TopLeft,
        },
        Direction::Up => match previous {
            None | FullScreen | Bottom | BottomLeft | BottomRight => Top,
            TopLeft => TopLeft,
            TopRight => TopRight,
            Left => TopLeft,
            Right => TopRight,
            Top => FullScreen,
        },
        Direction::Down => match previous {
            None | FullScreen | Top | TopLeft | TopRight => Bottom,
            BottomLeft => BottomLeft,
            BottomRight => BottomRight,
            Left => BottomLeft,
            Right => BottomRight,
            // There is no minimized region, pressing down again is a no-op
            Bottom => Bottom,
        },
    }
}
