// --- File: grid.rs ---
use crate::error::GridError;
use rand::Rng;

// Moore neighborhood, center excluded.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A single automaton cell. `age == 0` exactly when the cell is dead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    alive: bool,
    age: u32,
    pending_next_state: bool,
}

impl Cell {
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    /// Alive for exactly one generation.
    pub fn is_newborn(&self) -> bool {
        self.age == 1
    }

    pub fn pending_next_state(&self) -> bool {
        self.pending_next_state
    }

    /// Applies `alive`, keeping the age invariant. Returns the previous state.
    pub(crate) fn apply(&mut self, alive: bool) -> bool {
        let was_alive = self.alive;
        self.alive = alive;
        self.age = match (was_alive, alive) {
            (true, true) => self.age.saturating_add(1),
            (false, true) => 1,
            (_, false) => 0,
        };
        self.pending_next_state = alive;
        was_alive
    }

    fn force(&mut self, alive: bool) {
        if self.alive != alive {
            self.alive = alive;
            self.age = u32::from(alive);
        }
        self.pending_next_state = alive;
    }
}

/// Dense, row-major, non-toroidal grid of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Row-major index, or `None` outside `[0,width)x[0,height)`.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get_cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    pub fn is_alive(&self, x: i32, y: i32) -> bool {
        self.get_cell(x, y).is_some_and(Cell::is_alive)
    }

    pub fn set_cell_state(&mut self, x: i32, y: i32, alive: bool) {
        if let Some(i) = self.index_of(x, y) {
            self.cells[i].force(alive);
        }
    }

    pub fn toggle_cell(&mut self, x: i32, y: i32) {
        if let Some(i) = self.index_of(x, y) {
            let alive = self.cells[i].alive;
            self.cells[i].force(!alive);
        }
    }

    /// Living Moore neighbors of `(x, y)`. Positions past the `i32` range
    /// count as dead like any other off-grid position.
    pub fn count_living_neighbors(&self, x: i32, y: i32) -> u8 {
        NEIGHBOR_OFFSETS
            .iter()
            .filter(|(dx, dy)| match (x.checked_add(*dx), y.checked_add(*dy)) {
                (Some(nx), Some(ny)) => self.is_alive(nx, ny),
                _ => false,
            })
            .count() as u8
    }

    pub fn randomize<R: Rng + ?Sized>(
        &mut self,
        probability: f64,
        rng: &mut R,
    ) -> Result<(), GridError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(GridError::InvalidProbability(probability));
        }
        for cell in &mut self.cells {
            let alive = rng.gen_bool(probability);
            *cell = Cell::default();
            cell.force(alive);
        }
        Ok(())
    }

    /// Reallocates to the new extent. Only the overlapping region survives.
    pub fn resize(&mut self, new_width: u32, new_height: u32) -> Result<(), GridError> {
        let mut resized = Grid::new(new_width, new_height)?;
        let keep_w = self.width.min(new_width) as usize;
        let keep_h = self.height.min(new_height) as usize;
        for y in 0..keep_h {
            let src = y * self.width as usize;
            let dst = y * new_width as usize;
            resized.cells[dst..dst + keep_w].copy_from_slice(&self.cells[src..src + keep_w]);
        }
        log::debug!(
            "Grid resized from {}x{} to {}x{}",
            self.width,
            self.height,
            new_width,
            new_height
        );
        *self = resized;
        Ok(())
    }

    /// Writes `pattern` rows at the origin; cells landing off-grid are skipped.
    pub fn load_pattern<R: AsRef<[bool]>>(&mut self, pattern: &[R], origin_x: i32, origin_y: i32) {
        for (dy, row) in pattern.iter().enumerate() {
            let Some(y) = offset(origin_y, dy) else {
                break;
            };
            for (dx, &alive) in row.as_ref().iter().enumerate() {
                let Some(x) = offset(origin_x, dx) else {
                    break;
                };
                self.set_cell_state(x, y, alive);
            }
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.alive).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|c| c.alive)
    }

    /// Coordinates and cells of every living cell, row-major.
    pub fn living_cells(&self) -> impl Iterator<Item = (u32, u32, &Cell)> + '_ {
        let w = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.alive)
            .map(move |(i, c)| ((i % w) as u32, (i / w) as u32, c))
    }
}

/// `origin + step`, or `None` once it leaves the `i32` range.
fn offset(origin: i32, step: usize) -> Option<i32> {
    i32::try_from(step).ok().and_then(|step| origin.checked_add(step))
}

// --- End of File: grid.rs ---

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Neighbor count done in `i64` so no offset can overflow.
    fn reference_neighbors(grid: &Grid, x: i32, y: i32) -> u8 {
        let mut count = 0;
        for (dx, dy) in NEIGHBOR_OFFSETS {
            let nx = i64::from(x) + i64::from(dx);
            let ny = i64::from(y) + i64::from(dy);
            let inside = (0..i64::from(grid.width())).contains(&nx)
                && (0..i64::from(grid.height())).contains(&ny);
            if inside && grid.is_alive(nx as i32, ny as i32) {
                count += 1;
            }
        }
        count
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert_eq!(
            Grid::new(0, 5),
            Err(GridError::InvalidDimensions {
                width: 0,
                height: 5
            })
        );
        assert!(Grid::new(5, 0).is_err());
    }

    #[test]
    fn out_of_range_reads_are_absent_and_writes_are_ignored() {
        let mut grid = Grid::new(4, 3).unwrap();
        assert!(grid.get_cell(-1, 0).is_none());
        assert!(grid.get_cell(4, 0).is_none());
        assert!(grid.get_cell(0, 3).is_none());
        grid.set_cell_state(10, 10, true);
        grid.toggle_cell(-3, 1);
        assert!(grid.is_empty());
    }

    #[test]
    fn toggle_and_set_keep_age_invariant() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.toggle_cell(1, 1);
        let cell = grid.get_cell(1, 1).unwrap();
        assert!(cell.is_alive());
        assert_eq!(cell.age(), 1);

        grid.set_cell_state(1, 1, true);
        assert_eq!(grid.get_cell(1, 1).unwrap().age(), 1);

        grid.toggle_cell(1, 1);
        let cell = grid.get_cell(1, 1).unwrap();
        assert!(!cell.is_alive());
        assert_eq!(cell.age(), 0);
    }

    #[test]
    fn corner_cell_does_not_see_wrapped_neighbors() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set_cell_state(0, 0, true);
        // Would be neighbors of (0,0) on a torus.
        grid.set_cell_state(4, 4, true);
        grid.set_cell_state(4, 0, true);
        grid.set_cell_state(0, 4, true);
        assert_eq!(grid.count_living_neighbors(0, 0), 0);
    }

    #[test]
    fn neighbor_count_excludes_center() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.load_pattern(&[[true; 3]; 3], 0, 0);
        assert_eq!(grid.count_living_neighbors(1, 1), 8);
        assert_eq!(grid.count_living_neighbors(0, 0), 3);
        assert_eq!(grid.count_living_neighbors(1, 0), 5);
    }

    #[test]
    fn pattern_is_clipped_at_edges() {
        let mut grid = Grid::new(4, 4).unwrap();
        let block = vec![vec![true, true], vec![true, true]];
        grid.load_pattern(&block, 3, 3);
        assert_eq!(grid.population(), 1);
        grid.load_pattern(&block, -1, -1);
        assert_eq!(grid.population(), 2);
        assert!(grid.is_alive(0, 0));
    }

    #[test]
    fn coordinates_at_i32_limits_are_off_grid() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.load_pattern(&[[true, true]], i32::MAX, 0);
        grid.load_pattern(&[[true], [true]], 0, i32::MAX);
        grid.load_pattern(&[[true, true]], i32::MIN, i32::MIN);
        assert!(grid.is_empty());

        grid.load_pattern(&[[true; 4]; 4], 0, 0);
        assert_eq!(grid.count_living_neighbors(i32::MAX, 0), 0);
        assert_eq!(grid.count_living_neighbors(0, i32::MAX), 0);
        assert_eq!(grid.count_living_neighbors(i32::MIN, i32::MIN), 0);
        assert_eq!(grid.count_living_neighbors(-1, -1), 1);
    }

    proptest! {
        #[test]
        fn population_matches_living_cells(
            width in 1u32..40,
            height in 1u32..40,
            density in 0.0f64..=1.0,
            seed in any::<u64>(),
        ) {
            let mut grid = Grid::new(width, height).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            grid.randomize(density, &mut rng).unwrap();
            let counted = grid.cells().iter().filter(|c| c.is_alive()).count();
            prop_assert_eq!(grid.population(), counted);
            prop_assert_eq!(grid.living_cells().count(), counted);
            prop_assert_eq!(grid.is_empty(), counted == 0);
            prop_assert!(grid.cells().iter().all(|c| (c.age() == 0) == !c.is_alive()));
        }

        #[test]
        fn neighbor_count_is_bounded_for_any_coordinate(
            width in 1u32..12,
            height in 1u32..12,
            seed in any::<u64>(),
            x in prop_oneof![any::<i32>(), -2i32..14],
            y in prop_oneof![any::<i32>(), -2i32..14],
        ) {
            let mut grid = Grid::new(width, height).unwrap();
            grid.randomize(0.5, &mut StdRng::seed_from_u64(seed)).unwrap();
            let count = grid.count_living_neighbors(x, y);
            prop_assert!(count <= 8);
            prop_assert_eq!(count, reference_neighbors(&grid, x, y));
        }

        #[test]
        fn pattern_loads_anywhere_without_leaving_the_grid(
            origin_x in any::<i32>(),
            origin_y in any::<i32>(),
            rows in proptest::collection::vec(proptest::collection::vec(any::<bool>(), 0..6), 0..6),
        ) {
            let mut grid = Grid::new(8, 8).unwrap();
            grid.load_pattern(&rows, origin_x, origin_y);
            let set: usize = rows.iter().map(|r| r.iter().filter(|&&b| b).count()).sum();
            prop_assert!(grid.population() <= set);
            prop_assert!(grid.cells().iter().all(|c| (c.age() == 0) == !c.is_alive()));
        }
    }

    #[test]
    fn randomize_extremes_and_bad_probability() {
        let mut grid = Grid::new(6, 6).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        grid.randomize(1.0, &mut rng).unwrap();
        assert_eq!(grid.population(), 36);
        grid.randomize(0.0, &mut rng).unwrap();
        assert!(grid.is_empty());
        assert_eq!(
            grid.randomize(1.2, &mut rng),
            Err(GridError::InvalidProbability(1.2))
        );
        assert!(grid.randomize(f64::NAN, &mut rng).is_err());
    }

    #[test]
    fn shrink_then_grow_forgets_cells_outside_intersection() {
        let mut grid = Grid::new(10, 10).unwrap();
        grid.set_cell_state(2, 2, true);
        grid.set_cell_state(7, 7, true);
        grid.set_cell_state(4, 8, true);

        grid.resize(5, 5).unwrap();
        assert_eq!(grid.population(), 1);

        grid.resize(10, 10).unwrap();
        assert!(grid.is_alive(2, 2));
        assert!(!grid.is_alive(7, 7));
        assert!(!grid.is_alive(4, 8));
        assert_eq!(grid.population(), 1);
        assert!(grid.resize(0, 3).is_err());
    }

    #[test]
    fn living_cells_are_row_major() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_cell_state(2, 0, true);
        grid.set_cell_state(0, 1, true);
        let coords: Vec<_> = grid.living_cells().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, vec![(2, 0), (0, 1)]);
    }
}
