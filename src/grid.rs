use life_common::{check_probability, ConfigError, GridSize};
use rand::Rng;
use std::fmt;

/// Density used for interactively constructed grids.
pub const DEFAULT_DENSITY: f64 = 0.5;

/// Moore neighbourhood offsets, row-major, centre excluded.
static NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A single alive/dead unit of the automaton.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    alive: bool,
}

impl Cell {
    pub const fn alive() -> Self {
        Self { alive: true }
    }

    pub const fn dead() -> Self {
        Self { alive: false }
    }

    pub fn is_alive(self) -> bool {
        self.alive
    }

    pub fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    /// B3/S23: a live cell survives with 2 or 3 live neighbours,
    /// a dead cell is born with exactly 3.
    #[inline(always)]
    pub fn next_state(self, live_neighbors: usize) -> Cell {
        match (self.alive, live_neighbors) {
            (true, 2) | (true, 3) | (false, 3) => Cell::alive(),
            _ => Cell::dead(),
        }
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        Self { alive }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.alive { "0" } else { "1" })
    }
}

/// Iterates the in-bounds Moore neighbours of `(row, col)`. Edges are clipped, no wraparound.
/// Yields nothing when `(row, col)` itself lies outside the grid.
#[inline(always)]
pub fn moore_neighborhood(
    size: GridSize,
    row: usize,
    col: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let in_bounds = row < size.rows() && col < size.columns();
    let offsets = if in_bounds { &NEIGHBOR_OFFSETS[..] } else { &NEIGHBOR_OFFSETS[..0] };
    offsets.iter().filter_map(move |&(dr, dc)| {
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        (r < size.rows() && c < size.columns()).then_some((r, c))
    })
}

#[inline(always)]
fn count_live(cells: &[Cell], size: GridSize, row: usize, col: usize) -> usize {
    moore_neighborhood(size, row, col)
        .filter(|&(r, c)| cells[r * size.columns() + c].alive)
        .count()
}

/// A fixed-size rectangular automaton with double-buffered generations.
#[derive(Debug, Clone)]
pub struct Grid {
    size: GridSize,
    // Probability that a cell starts alive; kept exact, never quantised.
    density: f64,
    generation: u64,

    // --- Ping-Pong Buffers ---
    // Current generation (row-major), read by every neighbour count during a step.
    cells: Vec<Cell>,
    // Next generation, written during a step and swapped in when it completes.
    next: Vec<Cell>,
}

impl Grid {
    /// Samples a new grid from the thread-local generator.
    /// Each cell is alive with probability `density`.
    pub fn new(rows: usize, columns: usize, density: f64) -> Result<Self, ConfigError> {
        Self::with_rng(rows, columns, density, &mut rand::rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        rows: usize,
        columns: usize,
        density: f64,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let size = GridSize::new(rows, columns)?;
        let density = check_probability(density)?;
        Ok(Self::sample(size, density, rng))
    }

    /// Samples a grid at [`DEFAULT_DENSITY`].
    pub fn with_default_density(rows: usize, columns: usize) -> Result<Self, ConfigError> {
        Self::new(rows, columns, DEFAULT_DENSITY)
    }

    /// Samples a grid from already-validated parameters; `density` must lie in `[0, 1]`.
    pub fn sample<R: Rng + ?Sized>(size: GridSize, density: f64, rng: &mut R) -> Self {
        let mut grid = Self::blank(size, density);
        grid.reset_with(rng);
        grid
    }

    /// An all-dead grid.
    pub fn empty(rows: usize, columns: usize) -> Result<Self, ConfigError> {
        Ok(Self::blank(GridSize::new(rows, columns)?, 0.0))
    }

    /// Loads a grid from rows of `#` (alive) and `.` (dead).
    pub fn from_pattern(rows: &[&str]) -> Result<Self, ConfigError> {
        let columns = rows.first().map_or(0, |row| row.chars().count());
        let mut grid = Self::empty(rows.len(), columns)?;
        for (r, line) in rows.iter().enumerate() {
            if line.chars().count() != columns {
                return Err(ConfigError::MalformedPattern(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    line.chars().count(),
                    columns
                )));
            }
            for (c, ch) in line.chars().enumerate() {
                let alive = match ch {
                    '#' => true,
                    '.' => false,
                    other => {
                        return Err(ConfigError::MalformedPattern(format!(
                            "unexpected character {:?} at ({}, {})",
                            other, r, c
                        )))
                    }
                };
                grid.cells[r * columns + c] = Cell::from(alive);
            }
        }
        Ok(grid)
    }

    fn blank(size: GridSize, density: f64) -> Self {
        Self {
            size,
            density,
            generation: 0,
            cells: vec![Cell::dead(); size.area()],
            next: vec![Cell::dead(); size.area()],
        }
    }

    /// Re-samples every cell with the grid's density, discarding prior state.
    pub fn reset(&mut self) {
        self.reset_with(&mut rand::rng());
    }

    pub fn reset_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let p = self.density;
        // random() is in [0, 1): density 0 never fires, density 1 always does.
        for cell in &mut self.cells {
            *cell = Cell::from(rng.random::<f64>() < p);
        }
        self.generation = 0;
    }

    pub fn rows(&self) -> usize {
        self.size.rows()
    }

    pub fn columns(&self) -> usize {
        self.size.columns()
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Generations advanced since construction or the last reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Row-major view of the current generation.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows() && col < self.columns()).then(|| row * self.columns() + col)
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Option<Cell> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Overwrites one cell of the current generation. Returns the previous state,
    /// or `None` when `(row, col)` is out of bounds.
    pub fn set_alive(&mut self, row: usize, col: usize, alive: bool) -> Option<Cell> {
        let idx = self.index(row, col)?;
        let previous = self.cells[idx];
        self.cells[idx].set_alive(alive);
        Some(previous)
    }

    pub fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = &Cell> + '_ {
        let columns = self.columns();
        moore_neighborhood(self.size, row, col).map(move |(r, c)| &self.cells[r * columns + c])
    }

    pub fn live_neighbors(&self, row: usize, col: usize) -> usize {
        count_live(&self.cells, self.size, row, col)
    }

    pub fn living_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.alive).count()
    }

    pub fn living_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let columns = self.columns();
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.alive)
            .map(move |(idx, _)| (idx / columns, idx % columns))
    }

    /// Advances one generation. Every neighbour count reads the pre-step buffer; the
    /// new generation becomes visible only once all cells have been computed.
    ///
    /// Runs serially: it is called from inside cache initialisation and must not
    /// fan work back out to the Rayon pool.
    pub fn step(&mut self) {
        let Self {
            size, cells, next, ..
        } = self;
        let columns = size.columns();
        for (idx, out) in next.iter_mut().enumerate() {
            *out = cells[idx].next_state(count_live(cells, *size, idx / columns, idx % columns));
        }

        // --- Swap Buffers: Output becomes Input for next step ---
        std::mem::swap(&mut self.cells, &mut self.next);
        self.generation += 1;
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.columns()) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
