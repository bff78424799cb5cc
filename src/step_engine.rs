use crate::grid::Grid;
use log::trace;

/// Drives a [`Grid`] through discrete generations and keeps running living-cell totals.
#[derive(Debug, Clone)]
pub struct StepEngine {
    grid: Grid,
    generations: u64,
    total_living: u64,
    last_living: usize,
}

impl StepEngine {
    pub fn new(grid: Grid) -> Self {
        let last_living = grid.living_count();
        Self {
            grid,
            generations: 0,
            total_living: 0,
            last_living,
        }
    }

    /// Advances one generation and returns the living count after it.
    pub fn step(&mut self) -> usize {
        self.grid.step();
        self.last_living = self.grid.living_count();
        self.generations += 1;
        self.total_living += self.last_living as u64;
        self.last_living
    }

    /// Unattended loop; returns the living-cell total sampled over these generations.
    pub fn run(&mut self, generations: u64) -> u64 {
        let mut total = 0;
        self.run_with(generations, |_, living| total += living as u64);
        total
    }

    /// Like [`run`](Self::run), handing `(generation, living)` to `sample` after every step.
    pub fn run_with<F>(&mut self, generations: u64, mut sample: F)
    where
        F: FnMut(u64, usize),
    {
        for _ in 0..generations {
            let living = self.step();
            sample(self.generations, living);
        }
        trace!(
            "Advanced {} grid {} generations (now at {}, {} living)",
            self.grid.size(),
            generations,
            self.generations,
            self.last_living
        );
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Generations driven by this engine.
    pub fn generations(&self) -> u64 {
        self.generations
    }

    /// Sum of the living counts sampled after every step so far.
    pub fn total_living(&self) -> u64 {
        self.total_living
    }

    pub fn last_living(&self) -> usize {
        self.last_living
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_track_every_step() {
        let grid = Grid::from_pattern(&[".....", "..#..", "..#..", "..#..", "....."]).unwrap();
        let mut engine = StepEngine::new(grid);
        assert_eq!(engine.last_living(), 3);

        let mut seen = Vec::new();
        engine.run_with(4, |generation, living| seen.push((generation, living)));
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3), (4, 3)]);
        assert_eq!(engine.generations(), 4);
        assert_eq!(engine.total_living(), 12);
        assert_eq!(engine.run(2), 6);
        assert_eq!(engine.total_living(), 18);
        assert_eq!(engine.grid().generation(), 6);
    }

    #[test]
    fn lone_cell_dies_on_first_step() {
        let mut engine = StepEngine::new(Grid::new(1, 1, 1.0).unwrap());
        assert_eq!(engine.last_living(), 1);
        assert_eq!(engine.step(), 0);
        assert_eq!(engine.into_grid().living_count(), 0);
    }
}
