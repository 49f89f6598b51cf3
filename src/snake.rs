use crate::position::Position;
use crate::surface::{Shape, Surface};
use Direction::*;

pub const STEP: f64 = 20.0;
pub const INITIAL_SNAKE_LENGTH: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// One step of movement in this direction.
    pub fn offset(self) -> Position {
        match self {
            Up => Position::new(0.0, STEP),
            Down => Position::new(0.0, -STEP),
            Left => Position::new(-STEP, 0.0),
            Right => Position::new(STEP, 0.0),
        }
    }
}

#[derive(Debug)]
pub struct Snake {
    // Head first
    body: Vec<Position>,
    // Heading used by the last move, and the one the next move will use
    direction: Direction,
    next_direction: Direction,
}

impl Snake {
    /// A horizontal snake with its head at the origin, facing right.
    pub fn new() -> Self {
        Snake::with_body(
            (0..INITIAL_SNAKE_LENGTH)
                .map(|i| Position::new(-STEP * i as f64, 0.0))
                .collect(),
            Right,
        )
    }

    pub fn with_body(body: Vec<Position>, direction: Direction) -> Self {
        assert!(!body.is_empty(), "a snake needs at least a head");
        Snake { body, direction, next_direction: direction }
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> &[Position] {
        &self.body()[1..]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn move_step(&mut self) {
        self.direction = self.next_direction;

        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }

        self.body[0] = self.body[0] + self.direction.offset();
    }

    /// Appends a segment one step behind the tail without moving the rest of the body.
    /// If that spot is already taken by the snake, the new segment starts on the tail.
    pub fn extend(&mut self) {
        let last = self.body[self.body.len() - 1];

        let behind = match self.body.len() {
            1 => self.direction.opposite().offset(),
            n => {
                let diff = last - self.body[n - 2];
                if diff.is_zero() { self.direction.opposite().offset() } else { diff }
            }
        };

        let spot = last + behind;
        let taken = self.body.iter().any(|seg| seg.distance(spot) < STEP / 2.0);

        self.body.push(if taken { last } else { spot });
    }

    pub fn set_direction(&mut self, new_direction: Direction) {
        // Checked against the heading actually moved in, so two presses
        // within one tick can't turn the snake back onto its neck.
        if new_direction != self.direction.opposite() {
            self.next_direction = new_direction;
        }
    }

    #[cfg(test)]
    pub fn get_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn up(&mut self) {
        self.set_direction(Up);
    }

    pub fn down(&mut self) {
        self.set_direction(Down);
    }

    pub fn left(&mut self) {
        self.set_direction(Left);
    }

    pub fn right(&mut self) {
        self.set_direction(Right);
    }

    pub fn draw<S: Surface>(&self, surface: &mut S) {
        for pos in self.tail() {
            surface.draw_shape(*pos, Shape::SnakeBody);
        }

        surface.draw_shape(self.head(), Shape::SnakeHead(self.direction));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: f64, y: f64) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn new_snake_is_three_segments_in_a_row() {
        let snake = Snake::new();

        assert_eq!(snake.body(), &[pos(0.0, 0.0), pos(-20.0, 0.0), pos(-40.0, 0.0)]);
        assert_eq!(snake.get_direction(), Right);
    }

    #[test]
    fn move_shifts_segments_forward() {
        let mut snake = Snake::new();
        snake.move_step();

        assert_eq!(snake.body(), &[pos(20.0, 0.0), pos(0.0, 0.0), pos(-20.0, 0.0)]);

        snake.up();
        snake.move_step();

        assert_eq!(snake.body(), &[pos(20.0, 20.0), pos(20.0, 0.0), pos(0.0, 0.0)]);
    }

    #[test]
    fn head_follows_sum_of_steps() {
        let turns = [Up, Up, Left, Left, Down, Left, Up, Right, Right, Down];
        let mut snake = Snake::new();
        let mut expected = snake.head();

        for dir in turns.iter() {
            snake.set_direction(*dir);
            expected = expected + dir.offset();
            snake.move_step();
            assert_eq!(snake.head(), expected);
        }
    }

    #[test]
    fn reversal_is_ignored() {
        let mut snake = Snake::new();
        snake.left();
        assert_eq!(snake.get_direction(), Right);

        snake.move_step();
        assert_eq!(snake.head(), pos(20.0, 0.0));

        snake.down();
        snake.move_step();
        snake.up();
        assert_eq!(snake.get_direction(), Down);
    }

    #[test]
    fn quick_turns_within_a_tick_cannot_reverse() {
        let mut snake = Snake::new();
        snake.up();
        snake.left();

        // Left is the opposite of the heading last moved in
        assert_eq!(snake.get_direction(), Up);
        snake.move_step();
        assert_eq!(snake.head(), pos(0.0, 20.0));
    }

    #[test]
    fn extend_adds_one_segment_behind_tail() {
        let mut snake = Snake::new();
        let before = snake.body().to_vec();

        snake.extend();

        assert_eq!(snake.len(), before.len() + 1);
        assert_eq!(&snake.body()[..before.len()], &before[..]);
        assert_eq!(snake.body()[3], pos(-60.0, 0.0));
    }

    #[test]
    fn extend_follows_a_bent_tail() {
        let mut snake = Snake::with_body(vec![pos(0.0, 0.0), pos(0.0, -20.0)], Up);
        snake.extend();
        snake.extend();

        assert_eq!(snake.body()[2], pos(0.0, -40.0));
        assert_eq!(snake.body()[3], pos(0.0, -60.0));
    }

    #[test]
    fn extend_never_lands_on_the_head() {
        // Tail end points back at the head
        let mut snake = Snake::with_body(
            vec![pos(0.0, 0.0), pos(-20.0, 0.0), pos(-20.0, -20.0), pos(-20.0, -40.0), pos(0.0, -40.0), pos(0.0, -20.0)],
            Right,
        );
        snake.extend();

        assert_eq!(snake.len(), 7);
        assert_eq!(snake.body()[6], pos(0.0, -20.0));
    }

    #[test]
    fn extended_snake_grows_on_the_board() {
        let mut snake = Snake::new();
        snake.extend();
        snake.move_step();

        assert_eq!(snake.len(), 4);
        assert_eq!(snake.body()[3], pos(-40.0, 0.0));
    }
}
