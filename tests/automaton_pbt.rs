use life_sweep::{ConfigKey, Grid, TrialParams, TrialRunner, TrialScaling};
use proptest::prelude::*;

prop_compose! {
    fn arb_pattern()(rows in 1usize..9, columns in 1usize..9)
        (cells in prop::collection::vec(any::<bool>(), rows * columns), rows in Just(rows), columns in Just(columns))
        -> (usize, usize, Vec<bool>) {
        (rows, columns, cells)
    }
}

fn build(rows: usize, columns: usize, cells: &[bool]) -> Grid {
    let mut grid = Grid::empty(rows, columns).unwrap();
    for (idx, &alive) in cells.iter().enumerate() {
        grid.set_alive(idx / columns, idx % columns, alive);
    }
    grid
}

/// Independent neighbour count over the raw snapshot, clipped at the edges.
fn reference_count(rows: usize, columns: usize, cells: &[bool], row: usize, col: usize) -> usize {
    let mut count = 0;
    for r in row.saturating_sub(1)..=(row + 1).min(rows - 1) {
        for c in col.saturating_sub(1)..=(col + 1).min(columns - 1) {
            if (r, c) != (row, col) && cells[r * columns + c] {
                count += 1;
            }
        }
    }
    count
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn step_applies_rule_to_pre_step_snapshot((rows, columns, cells) in arb_pattern()) {
        let mut grid = build(rows, columns, &cells);
        grid.step();

        for row in 0..rows {
            for col in 0..columns {
                let n = reference_count(rows, columns, &cells, row, col);
                let was_alive = cells[row * columns + col];
                let expected = if was_alive { n == 2 || n == 3 } else { n == 3 };
                prop_assert_eq!(
                    grid.cell_at(row, col).map(|c| c.is_alive()),
                    Some(expected),
                    "cell ({}, {}) alive={} with {} neighbours", row, col, was_alive, n
                );
            }
        }
        prop_assert_eq!((grid.rows(), grid.columns()), (rows, columns));
    }

    #[test]
    fn neighbour_counts_by_position(rows in 3usize..20, columns in 3usize..20) {
        let grid = Grid::empty(rows, columns).unwrap();
        for row in 0..rows {
            for col in 0..columns {
                let on_row_edge = row == 0 || row == rows - 1;
                let on_col_edge = col == 0 || col == columns - 1;
                let expected = match (on_row_edge, on_col_edge) {
                    (true, true) => 3,
                    (true, false) | (false, true) => 5,
                    (false, false) => 8,
                };
                prop_assert_eq!(grid.neighbors(row, col).count(), expected);
            }
        }
    }

    #[test]
    fn density_extremes_fix_the_living_count(rows in 1usize..40, columns in 1usize..40) {
        prop_assert_eq!(Grid::new(rows, columns, 0.0).unwrap().living_count(), 0);
        prop_assert_eq!(Grid::new(rows, columns, 1.0).unwrap().living_count(), rows * columns);
    }

    #[test]
    fn reset_preserves_dimensions(rows in 1usize..20, columns in 1usize..20, density in 0.0f64..=1.0, resets in 1usize..5) {
        let mut grid = Grid::new(rows, columns, density).unwrap();
        for _ in 0..resets {
            grid.step();
            grid.reset();
            prop_assert_eq!((grid.rows(), grid.columns()), (rows, columns));
            prop_assert_eq!(grid.generation(), 0);
            prop_assert_eq!(grid.density(), density);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn aggregates_stay_within_grid_area(
        rows in 1usize..6,
        columns in 1usize..6,
        density in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let params = TrialParams::new(16, TrialScaling::Fixed { trials: 3 }, Some(seed)).unwrap();
        let key = ConfigKey::new(rows, columns, density).unwrap();
        let aggregate = TrialRunner::new(params).run(&key);
        let area = (rows * columns) as f64;

        prop_assert!(aggregate.mean >= 0.0 && aggregate.mean <= area);
        prop_assert!(!aggregate.std_dev.is_nan());
        prop_assert!(aggregate.std_dev >= 0.0 && aggregate.std_dev <= area);
    }
}
