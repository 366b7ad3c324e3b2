use insta::assert_snapshot;

use crate::core::{Direction, Region, next_region};

const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

fn press(keys: &[Direction]) -> Region {
    keys.iter()
        .fold(Region::None, |region, &direction| next_region(region, direction))
}

#[test]
fn transition_table() {
    let text = Region::ALL
        .iter()
        .map(|&region| {
            let next = DIRECTIONS
                .iter()
                .map(|&d| format!("{d}={}", next_region(region, d)))
                .collect::<Vec<_>>()
                .join(" ");
            format!("{region}: {next}")
        })
        .collect::<Vec<_>>()
        .join("\n");
    assert_snapshot!(text, @r"
    None: up=Top down=Bottom left=Left right=Right
    FullScreen: up=Top down=Bottom left=Left right=Right
    Left: up=TopLeft down=BottomLeft left=Left right=Right
    Right: up=TopRight down=BottomRight left=Left right=Right
    Top: up=FullScreen down=Bottom left=TopLeft right=TopRight
    Bottom: up=Top down=Bottom left=BottomLeft right=BottomRight
    TopLeft: up=TopLeft down=Bottom left=TopLeft right=Right
    TopRight: up=TopRight down=Bottom left=Left right=TopRight
    BottomLeft: up=Top down=BottomLeft left=BottomLeft right=Right
    BottomRight: up=Top down=BottomRight left=Left right=BottomRight
    ");
}

#[test]
fn key_sequences() {
    use Direction::*;

    assert_eq!(press(&[Right, Up]), Region::TopRight);
    assert_eq!(press(&[Right, Up, Up]), Region::TopRight);
    assert_eq!(press(&[Up, Up]), Region::FullScreen);
    assert_eq!(press(&[Up, Up, Down]), Region::Bottom);
    assert_eq!(press(&[Down, Down, Down]), Region::Bottom);
    assert_eq!(press(&[Left, Down, Right]), Region::Right);
    assert_eq!(press(&[Down, Left]), Region::BottomLeft);
    assert_eq!(press(&[Up, Left, Right]), Region::Right);
}

#[test]
fn never_returns_to_none() {
    for region in Region::ALL {
        for direction in DIRECTIONS {
            assert_ne!(next_region(region, direction), Region::None);
        }
    }
}

#[test]
fn pressing_a_direction_twice_is_stable_except_maximize() {
    for region in Region::ALL {
        for direction in DIRECTIONS {
            let once = next_region(region, direction);
            let twice = next_region(once, direction);
            match (direction, once) {
                // Up toggles between the top half and the full screen
                (Direction::Up, Region::Top) => assert_eq!(twice, Region::FullScreen),
                (Direction::Up, Region::FullScreen) => assert_eq!(twice, Region::Top),
                _ => assert_eq!(once, twice, "{region} + {direction} twice"),
            }
        }
    }
}
