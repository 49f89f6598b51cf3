use crate::position::Position;
use crate::snake::Direction;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    SnakeHead(Direction),
    SnakeBody,
    Food,
}

/// Where the game draws. Drawing calls only touch a pending frame;
/// nothing reaches the screen until `update` is called.
pub trait Surface {
    /// Drops everything drawn so far.
    fn clear(&mut self);

    fn draw_shape(&mut self, at: Position, shape: Shape);

    /// Writes `text` horizontally centred on `at`.
    fn write(&mut self, at: Position, text: &str);

    fn update(&mut self) -> anyhow::Result<()>;
}
