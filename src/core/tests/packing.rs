use insta::assert_snapshot;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::draw_grid;
use crate::core::{Dimension, PickerLayout, Size, TileGrid, fit_within, pack_tiles};

fn describe(grid: &TileGrid) -> String {
    format!(
        "columns={} rows={} tile={:.2}",
        grid.columns, grid.rows, grid.tile.width
    )
}

#[test]
fn four_tiles_in_a_square() {
    assert_eq!(pack_tiles(4, 400.0, 400.0), Size::new(200.0, 200.0));
}

#[test]
fn exact_fits() {
    assert_eq!(pack_tiles(3, 300.0, 100.0), Size::new(100.0, 100.0));
    assert_eq!(pack_tiles(1, 300.0, 100.0), Size::new(100.0, 100.0));
    assert_eq!(pack_tiles(9, 300.0, 300.0), Size::new(100.0, 100.0));
}

#[test]
fn tile_shrinks_when_count_does_not_divide() {
    let tile = pack_tiles(5, 400.0, 300.0);
    assert!((tile.width - 400.0 / 3.0).abs() < 1e-3);
    assert_eq!(tile.width, tile.height);
}

#[test]
fn empty_inputs_give_zero_tiles() {
    assert_eq!(pack_tiles(0, 400.0, 400.0), Size::ZERO);
    assert_eq!(pack_tiles(3, 0.0, 400.0), Size::ZERO);
    assert_eq!(pack_tiles(3, 400.0, -1.0), Size::ZERO);

    let grid = TileGrid::new(0, 400.0, 400.0);
    assert_eq!(grid.columns, 0);
    assert_eq!(grid.frame(0), None);
}

#[test]
fn grid_never_overflows_its_container() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..2000 {
        let count = rng.random_range(1..40);
        let width = rng.random_range(10.0..3000.0);
        let height = rng.random_range(10.0..3000.0);
        let grid = TileGrid::new(count, width, height);

        assert!(grid.tile.width > 0.0);
        assert_eq!(grid.tile.width, grid.tile.height);
        assert!(grid.columns * grid.rows >= count, "{} for {count}", describe(&grid));
        assert!(
            grid.columns as f32 * grid.tile.width <= width * (1.0 + 1e-4),
            "{} overflows {width}x{height} with {count} tiles",
            describe(&grid)
        );
        assert!(
            grid.rows as f32 * grid.tile.height <= height * (1.0 + 1e-4),
            "{} overflows {width}x{height} with {count} tiles",
            describe(&grid)
        );
        for index in 0..count {
            assert!(grid.frame(index).is_some());
        }
        assert_eq!(grid.frame(count), None);
    }
}

#[test]
fn picker_layout_keeps_tiles_inside_the_inset() {
    let layout = PickerLayout::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..500 {
        let count = rng.random_range(1..20);
        let container = Size::new(rng.random_range(300.0..2000.0), rng.random_range(300.0..1200.0));
        let grid = layout.layout(count, container);
        for index in 0..count {
            let Some(frame) = grid.frame(index) else {
                panic!("no frame for tile {index} of {count}");
            };
            assert!(frame.x >= layout.inset && frame.y >= layout.inset);
            assert!(frame.max_x() <= container.width - layout.inset + 0.05);
            assert!(frame.max_y() <= container.height - layout.inset + 0.05);
        }
    }
}

#[test]
fn single_window_picker() {
    let grid = PickerLayout::default().layout(1, Size::new(720.0, 875.0));
    assert_snapshot!(describe(&grid), @"columns=1 rows=1 tile=680.00");
    assert_snapshot!(grid.frame(0).unwrap().to_string(), @"(x=20.00 y=20.00 w=680.00 h=680.00)");
}

#[test]
fn four_windows_in_a_vacated_half() {
    let grid = PickerLayout::default().layout(4, Size::new(720.0, 875.0));
    assert_snapshot!(describe(&grid), @"columns=2 rows=2 tile=325.00");
    let frames = (0..4)
        .map(|i| grid.frame(i).unwrap().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    assert_snapshot!(frames, @r"
    (x=20.00 y=20.00 w=325.00 h=325.00)
    (x=375.00 y=20.00 w=325.00 h=325.00)
    (x=20.00 y=375.00 w=325.00 h=325.00)
    (x=375.00 y=375.00 w=325.00 h=325.00)
    ");
}

#[test]
fn clicks_map_to_tiles() {
    let grid = PickerLayout::default().layout(3, Size::new(720.0, 875.0));
    assert_eq!(grid.columns, 2);
    assert_eq!(grid.index_at(20.0, 20.0), Some(0));
    assert_eq!(grid.index_at(400.0, 100.0), Some(1));
    assert_eq!(grid.index_at(100.0, 400.0), Some(2));
    // Gap between the columns, the inset, and the empty slot of the last row
    assert_eq!(grid.index_at(360.0, 100.0), None);
    assert_eq!(grid.index_at(5.0, 5.0), None);
    assert_eq!(grid.index_at(400.0, 400.0), None);
    assert_eq!(TileGrid::new(0, 100.0, 100.0).index_at(0.0, 0.0), None);
}

#[test]
fn five_windows_in_a_vacated_bottom_half() {
    let grid = PickerLayout::default().layout(5, Size::new(1440.0, 437.5));
    assert_snapshot!(describe(&grid), @"columns=5 rows=1 tile=256.00");
    assert_snapshot!(draw_grid(&grid, 1440.0, 437.5, 20.0), @r"
    ........................................................................
    .0000000000000.1111111111111..222222222222..3333333333333.4444444444444.
    .0000000000000.1111111111111..222222222222..3333333333333.4444444444444.
    .0000000000000.1111111111111..222222222222..3333333333333.4444444444444.
    .0000000000000.1111111111111..222222222222..3333333333333.4444444444444.
    .0000000000000.1111111111111..222222222222..3333333333333.4444444444444.
    .0000000000000.1111111111111..222222222222..3333333333333.4444444444444.
    .0000000000000.1111111111111..222222222222..3333333333333.4444444444444.
    .0000000000000.1111111111111..222222222222..3333333333333.4444444444444.
    .0000000000000.1111111111111..222222222222..3333333333333.4444444444444.
    .0000000000000.1111111111111..222222222222..3333333333333.4444444444444.
    .0000000000000.1111111111111..222222222222..3333333333333.4444444444444.
    .0000000000000.1111111111111..222222222222..3333333333333.4444444444444.
    .0000000000000.1111111111111..222222222222..3333333333333.4444444444444.
    ........................................................................
    ........................................................................
    ........................................................................
    ........................................................................
    ........................................................................
    ........................................................................
    ........................................................................
    ........................................................................
    ");
}

#[test]
fn screenshots_fit_their_tile() {
    let tile = Dimension::new(20.0, 20.0, 200.0, 200.0);
    // Wide window: full width, centered vertically
    assert_snapshot!(fit_within(Size::new(1600.0, 900.0), tile), @"(x=20.00 y=63.75 w=200.00 h=112.50)");
    // Tall window: full height, centered horizontally
    assert_snapshot!(fit_within(Size::new(400.0, 800.0), tile), @"(x=70.00 y=20.00 w=100.00 h=200.00)");
    // Small images are scaled up
    assert_snapshot!(fit_within(Size::new(10.0, 10.0), tile), @"(x=20.00 y=20.00 w=200.00 h=200.00)");
    assert!(fit_within(Size::ZERO, tile).is_empty());
    assert!(fit_within(Size::new(10.0, 10.0), Dimension::default()).is_empty());
}
