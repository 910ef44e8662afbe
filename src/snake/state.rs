//! Snake grid state

use std::collections::{HashSet, VecDeque};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::snake::{GRID_SIZE, INITIAL_INTERVAL_MS};
use crate::scheduler::IntervalTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbour one step in `direction` (may be off the grid)
    pub fn step(&self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    pub fn in_bounds(&self, size: i32) -> bool {
        (0..size).contains(&self.x) && (0..size).contains(&self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_opposite(&self, other: &Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Grid delta, y grows downward
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnakePhase {
    /// Before the first `start`
    Ready,
    Playing,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    Wall,
    SelfCollision,
    /// Snake covers the whole grid, nowhere left for food
    BoardFull,
}

/// Complete snake game world
#[derive(Debug, Clone)]
pub struct GridWorld {
    /// Head first
    pub(super) body: VecDeque<Cell>,
    pub(super) body_set: HashSet<Cell>,
    pub food: Option<Cell>,
    /// Direction used by the last committed move
    pub direction: Direction,
    /// Direction queued for the next tick
    pub pending: Direction,
    /// Current tick interval (ms), shrinks as food is eaten
    pub interval_ms: u32,
    pub score: u32,
    pub phase: SnakePhase,
    pub game_over_reason: Option<GameOverReason>,
    pub grid_size: i32,
    pub(super) timer: IntervalTimer,
    rng: Pcg32,
}

/// Starting body, head first, heading right
pub const START_BODY: [Cell; 3] = [Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)];

impl GridWorld {
    pub fn new(seed: u64) -> Self {
        Self::with_snake(seed, &START_BODY, Direction::Right)
    }

    /// World with a custom snake, ready to play. Duplicate cells are dropped.
    pub fn with_snake(seed: u64, body: &[Cell], direction: Direction) -> Self {
        let mut world = Self {
            body: VecDeque::new(),
            body_set: HashSet::new(),
            food: None,
            direction,
            pending: direction,
            interval_ms: INITIAL_INTERVAL_MS,
            score: 0,
            phase: SnakePhase::Ready,
            game_over_reason: None,
            grid_size: GRID_SIZE,
            timer: IntervalTimer::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        world.set_body(body);
        world.food = world.random_free_cell();
        world
    }

    /// Reset to the starting snake and begin playing
    pub fn start(&mut self) {
        self.set_body(&START_BODY);
        self.direction = Direction::Right;
        self.pending = Direction::Right;
        self.interval_ms = INITIAL_INTERVAL_MS;
        self.score = 0;
        self.game_over_reason = None;
        self.timer.reset();
        self.food = self.random_free_cell();
        self.phase = SnakePhase::Playing;
        log::info!("Snake game started");
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn head(&self) -> Option<Cell> {
        self.body.front().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body_set.contains(&cell)
    }

    /// Queue a turn for the next tick. Returns true if the queued direction
    /// changed.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.phase != SnakePhase::Playing
            || direction.is_opposite(&self.direction)
            || direction == self.pending
        {
            return false;
        }
        self.pending = direction;
        true
    }

    /// Playing <-> Paused. Returns true if the phase changed.
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            SnakePhase::Playing => SnakePhase::Paused,
            SnakePhase::Paused => SnakePhase::Playing,
            _ => return false,
        };
        log::debug!("Snake {:?}", self.phase);
        true
    }

    /// Uniformly random cell not covered by the snake
    pub(super) fn random_free_cell(&mut self) -> Option<Cell> {
        let size = self.grid_size;
        let free: Vec<Cell> = (0..size)
            .flat_map(|y| (0..size).map(move |x| Cell::new(x, y)))
            .filter(|cell| !self.body_set.contains(cell))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.random_range(0..free.len())])
    }

    fn set_body(&mut self, body: &[Cell]) {
        self.body.clear();
        self.body_set.clear();
        for &cell in body {
            if self.body_set.insert(cell) {
                self.body.push_back(cell);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites() {
        assert!(Direction::Up.is_opposite(&Direction::Down));
        assert!(Direction::Left.is_opposite(&Direction::Right));
        assert!(!Direction::Up.is_opposite(&Direction::Left));
        assert!(!Direction::Up.is_opposite(&Direction::Up));
    }

    #[test]
    fn test_new_world_food_is_free() {
        for seed in 0..20 {
            let world = GridWorld::new(seed);
            let food = world.food.unwrap();
            assert!(food.in_bounds(GRID_SIZE));
            assert!(!world.occupies(food));
            assert_eq!(world.head(), Some(Cell::new(10, 10)));
        }
    }

    #[test]
    fn test_direction_requests() {
        let mut world = GridWorld::new(1);
        // Not playing yet
        assert!(!world.request_direction(Direction::Up));

        world.start();
        assert!(!world.request_direction(Direction::Left));
        assert!(!world.request_direction(Direction::Right));
        assert!(world.request_direction(Direction::Up));
        assert_eq!(world.pending, Direction::Up);
        // Still judged against the committed direction
        assert!(!world.request_direction(Direction::Left));
        assert!(world.request_direction(Direction::Down));
    }

    #[test]
    fn test_pause_only_while_playing() {
        let mut world = GridWorld::new(1);
        assert!(!world.toggle_pause());
        world.start();
        assert!(world.toggle_pause());
        assert_eq!(world.phase, SnakePhase::Paused);
        assert!(world.toggle_pause());
        assert_eq!(world.phase, SnakePhase::Playing);
    }

    #[test]
    fn test_free_cell_on_full_grid() {
        let mut world = GridWorld::new(1);
        world.grid_size = 2;
        let cells = [Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 1), Cell::new(0, 1)];
        world.set_body(&cells);
        assert_eq!(world.random_free_cell(), None);
    }
}
