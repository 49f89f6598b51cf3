use rand::Rng;

use crate::position::Position;
use crate::snake::STEP;
use crate::surface::{Shape, Surface};

pub const HALF_EXTENT: f64 = 300.0;
// Keeps food off the walls
pub const SPAWN_MARGIN: f64 = 20.0;

pub struct Food {
    position: Position,
}

impl Food {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let mut food = Food { position: Position::default() };
        food.refresh(rng);
        food
    }

    #[cfg(test)]
    pub fn at(position: Position) -> Self {
        Food { position }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Jumps to a new random spot on the snake's grid. The snake's body is
    /// not taken into account.
    pub fn refresh<R: Rng>(&mut self, rng: &mut R) {
        let cells = ((HALF_EXTENT - SPAWN_MARGIN) / STEP) as i32;
        let mut coord = || rng.gen_range(-cells..=cells) as f64 * STEP;
        self.position = Position::new(coord(), coord());
    }

    pub fn draw<S: Surface>(&self, surface: &mut S) {
        surface.draw_shape(self.position, Shape::Food);
    }
}
