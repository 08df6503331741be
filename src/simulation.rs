// --- File: simulation.rs ---
use crate::config::SimulationConfig;
use crate::constants::*;
use crate::error::GridError;
use crate::grid::Grid;
use rand::SeedableRng;
use rand::rngs::StdRng;

pub type SimRng = StdRng;

/// Cells that changed state in one generation, row-major.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationDelta {
    pub births: Vec<(u32, u32)>,
    pub deaths: Vec<(u32, u32)>,
}

impl GenerationDelta {
    pub fn clear(&mut self) {
        self.births.clear();
        self.deaths.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.births.is_empty() && self.deaths.is_empty()
    }
}

/// Applies Conway's rule in two passes: next states are computed into a
/// scratch buffer from the untouched grid, then committed.
#[derive(Debug, Default)]
pub struct SimulationEngine {
    next_state_buffer: Vec<bool>,
    delta: GenerationDelta,
}

impl SimulationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn next_state(alive: bool, neighbors: u8) -> bool {
        matches!((alive, neighbors), (true, 2) | (true, 3) | (false, 3))
    }

    /// Advances `grid` by one generation and returns what changed.
    pub fn step(&mut self, grid: &mut Grid) -> &GenerationDelta {
        let width = grid.width() as usize;
        let cell_count = grid.cells().len();
        self.delta.clear();
        self.next_state_buffer.clear();
        self.next_state_buffer.resize(cell_count, false);

        // Compute phase: reads only the current generation.
        for (i, next) in self.next_state_buffer.iter_mut().enumerate() {
            let x = (i % width) as i32;
            let y = (i / width) as i32;
            let neighbors = grid.count_living_neighbors(x, y);
            *next = Self::next_state(grid.cells()[i].is_alive(), neighbors);
        }

        // Commit phase.
        for (i, (cell, &next)) in grid
            .cells_mut()
            .iter_mut()
            .zip(self.next_state_buffer.iter())
            .enumerate()
        {
            let was_alive = cell.apply(next);
            let coord = ((i % width) as u32, (i / width) as u32);
            match (was_alive, next) {
                (false, true) => self.delta.births.push(coord),
                (true, false) => self.delta.deaths.push(coord),
                _ => {}
            }
        }

        &self.delta
    }

    pub fn last_delta(&self) -> &GenerationDelta {
        &self.delta
    }
}

/// Frame-loop driver: owns the grid, the generation counter and the pacing.
pub struct Simulation {
    grid: Grid,
    engine: SimulationEngine,
    generation: u64,
    rng: SimRng,
    config: SimulationConfig,
    generations_per_sec: f32,
    time_accumulator: f32,
    is_paused: bool,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, GridError> {
        let rng = match config.seed {
            Some(seed) => SimRng::seed_from_u64(seed),
            None => SimRng::from_entropy(),
        };
        let mut state = Self {
            grid: Grid::new(config.grid_width, config.grid_height)?,
            engine: SimulationEngine::new(),
            generation: 0,
            rng,
            generations_per_sec: config.generations_per_sec,
            config,
            time_accumulator: 0.0,
            is_paused: false,
        };
        state.grid.randomize(state.config.initial_density, &mut state.rng)?;
        log::info!(
            "Simulation started on {}x{} grid, population {}",
            state.grid.width(),
            state.grid.height(),
            state.grid.population()
        );
        Ok(state)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Runs exactly one generation.
    pub fn step(&mut self) -> &GenerationDelta {
        let delta = self.engine.step(&mut self.grid);
        self.generation += 1;
        log::trace!(
            "Generation {}: {} births, {} deaths",
            self.generation,
            delta.births.len(),
            delta.deaths.len()
        );
        delta
    }

    /// Advances by as many generations as `delta_time` covers at the current
    /// rate. Returns the births and deaths of every generation run, in order.
    pub fn update(&mut self, delta_time: f32) -> GenerationDelta {
        let mut changes = GenerationDelta::default();
        if self.is_paused {
            self.time_accumulator = 0.0;
            return changes;
        }
        let interval = 1.0 / self.generations_per_sec;
        self.time_accumulator += delta_time;
        // Never fall more than four generations behind.
        self.time_accumulator = self.time_accumulator.min(interval * 4.0);
        while self.time_accumulator >= interval {
            let delta = self.step();
            changes.births.extend_from_slice(&delta.births);
            changes.deaths.extend_from_slice(&delta.deaths);
            self.time_accumulator -= interval;
        }
        changes
    }

    pub fn adjust_speed(&mut self, increase: bool) {
        self.generations_per_sec = if increase {
            (self.generations_per_sec + GENERATION_RATE_STEP).min(MAX_GENERATIONS_PER_SEC)
        } else {
            (self.generations_per_sec - GENERATION_RATE_STEP).max(MIN_GENERATIONS_PER_SEC)
        };
        log::info!("Generation rate: {:.1}/s", self.generations_per_sec);
    }

    pub fn toggle_pause(&mut self) {
        self.is_paused = !self.is_paused;
        log::info!(
            "Simulation {}",
            if self.is_paused { "paused" } else { "resumed" }
        );
    }

    pub fn restart(&mut self) -> Result<(), GridError> {
        self.grid.randomize(self.config.initial_density, &mut self.rng)?;
        self.generation = 0;
        self.time_accumulator = 0.0;
        self.is_paused = false;
        log::info!("Restarted with population {}", self.grid.population());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.generation = 0;
        log::info!("Grid cleared");
    }

    pub fn generations_per_sec(&self) -> f32 {
        self.generations_per_sec
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }
}

// --- End of File: simulation.rs ---

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GLIDER: [[bool; 3]; 3] = [
        [false, true, false],
        [false, false, true],
        [true, true, true],
    ];

    fn living(grid: &Grid) -> Vec<(u32, u32)> {
        grid.living_cells().map(|(x, y, _)| (x, y)).collect()
    }

    #[test]
    fn rule_table() {
        assert!(!SimulationEngine::next_state(true, 1));
        assert!(SimulationEngine::next_state(true, 2));
        assert!(SimulationEngine::next_state(true, 3));
        assert!(!SimulationEngine::next_state(true, 4));
        assert!(!SimulationEngine::next_state(false, 2));
        assert!(SimulationEngine::next_state(false, 3));
    }

    #[test]
    fn blinker_has_period_two() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.load_pattern(&[[true, true, true]], 1, 2);
        let horizontal = living(&grid);
        let mut engine = SimulationEngine::new();

        for _ in 0..10 {
            engine.step(&mut grid);
            assert_eq!(living(&grid), vec![(2, 1), (2, 2), (2, 3)]);
            engine.step(&mut grid);
            assert_eq!(living(&grid), horizontal);
        }
    }

    #[test]
    fn glider_translates_diagonally_every_four_generations() {
        let mut grid = Grid::new(30, 30).unwrap();
        grid.load_pattern(&GLIDER, 2, 2);
        let start = living(&grid);
        let mut engine = SimulationEngine::new();

        for period in 1..=5u32 {
            for _ in 0..4 {
                engine.step(&mut grid);
                assert_eq!(grid.population(), 5);
            }
            let shifted: Vec<_> = start
                .iter()
                .map(|&(x, y)| (x + period, y + period))
                .collect();
            assert_eq!(living(&grid), shifted);
        }
    }

    #[test]
    fn delta_reports_births_and_deaths_in_scan_order() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.load_pattern(&[[true, true, true]], 1, 2);
        let mut engine = SimulationEngine::new();
        let delta = engine.step(&mut grid).clone();
        assert_eq!(delta.births, vec![(2, 1), (2, 3)]);
        assert_eq!(delta.deaths, vec![(1, 2), (3, 2)]);

        // A still life produces an empty delta on the next step.
        let mut block = Grid::new(4, 4).unwrap();
        block.load_pattern(&[[true, true], [true, true]], 1, 1);
        assert!(engine.step(&mut block).is_empty());
    }

    #[test]
    fn ages_count_consecutive_live_generations() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.load_pattern(&[[true, true], [true, true]], 1, 1);
        let mut engine = SimulationEngine::new();
        for n in 2..=6 {
            engine.step(&mut grid);
            assert_eq!(grid.get_cell(1, 1).unwrap().age(), n);
        }
    }

    #[test]
    fn newborn_cells_start_at_age_one() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.load_pattern(&[[true, true, true]], 1, 2);
        let mut engine = SimulationEngine::new();
        engine.step(&mut grid);
        let born = grid.get_cell(2, 1).unwrap();
        assert!(born.is_newborn());
        assert_eq!(grid.get_cell(2, 2).unwrap().age(), 2);
        assert_eq!(grid.get_cell(1, 2).unwrap().age(), 0);
        assert!(grid.cells().iter().all(|c| (c.age() == 0) == !c.is_alive()));
    }

    #[test]
    fn generation_counter_advances_once_per_step() {
        let config = SimulationConfig {
            seed: Some(3),
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        assert_eq!(sim.generation(), 0);
        sim.step();
        sim.step();
        assert_eq!(sim.generation(), 2);
        sim.clear();
        assert_eq!(sim.generation(), 0);
        assert!(sim.grid().is_empty());
    }

    #[test]
    fn update_respects_pause_and_rate() {
        let config = SimulationConfig {
            seed: Some(11),
            generations_per_sec: 10.0,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        sim.update(0.25);
        assert_eq!(sim.generation(), 2);
        sim.toggle_pause();
        assert!(sim.update(1.0).is_empty());
        assert_eq!(sim.generation(), 2);
        assert!(sim.is_paused());
    }

    #[test]
    fn update_reports_changes_across_generations() {
        let config = SimulationConfig {
            grid_width: 5,
            grid_height: 5,
            initial_density: 0.0,
            generations_per_sec: 8.0,
            seed: Some(1),
        };
        let mut sim = Simulation::new(config).unwrap();
        sim.grid_mut().load_pattern(&[[true, true, true]], 1, 2);
        // Two blinker phases: each flips four cells.
        let changes = sim.update(0.25);
        assert_eq!(sim.generation(), 2);
        assert_eq!(changes.births, vec![(2, 1), (2, 3), (1, 2), (3, 2)]);
        assert_eq!(changes.deaths, vec![(1, 2), (3, 2), (2, 1), (2, 3)]);
    }

    #[test]
    fn update_never_runs_more_than_four_generations_at_once() {
        let config = SimulationConfig {
            seed: Some(5),
            generations_per_sec: 8.0,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        sim.update(10.0);
        assert_eq!(sim.generation(), 4);
    }

    proptest! {
        #[test]
        fn stepping_keeps_age_and_population_consistent(
            width in 1u32..24,
            height in 1u32..24,
            density in 0.0f64..=1.0,
            steps in 0usize..12,
            seed in any::<u64>(),
        ) {
            let config = SimulationConfig {
                grid_width: width,
                grid_height: height,
                initial_density: density,
                seed: Some(seed),
                ..SimulationConfig::default()
            };
            let mut sim = Simulation::new(config).unwrap();
            for _ in 0..steps {
                let before = sim.grid().population();
                let delta = sim.step().clone();
                let after = sim.grid().population();
                prop_assert_eq!(after + delta.deaths.len(), before + delta.births.len());
            }
            let grid = sim.grid();
            prop_assert_eq!(sim.generation(), steps as u64);
            prop_assert_eq!(grid.is_empty(), grid.population() == 0);
            prop_assert!(grid.cells().iter().all(|c| (c.age() == 0) == !c.is_alive()));
            prop_assert!(grid.cells().iter().all(|c| c.pending_next_state() == c.is_alive()));
        }
    }
}
