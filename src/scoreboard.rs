use crate::position::Position;
use crate::surface::Surface;

pub const SCOREBOARD_ORIGIN: Position = Position::new(0.0, 280.0);

pub struct Scoreboard {
    score: u32,
    high_score: u32,
}

impl Scoreboard {
    pub fn new(high_score: u32) -> Self {
        Scoreboard { score: 0, high_score }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn increase_score(&mut self) {
        self.score += 1;
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }

    pub fn new_high_score(&mut self) {
        self.high_score = self.score;
    }

    pub fn text(&self) -> String {
        if self.high_score == 0 {
            format!("Score: {}", self.score)
        } else {
            format!("Score: {} | Highscore: {}", self.score, self.high_score)
        }
    }

    pub fn draw<S: Surface>(&self, surface: &mut S) {
        surface.write(SCOREBOARD_ORIGIN, &self.text());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_high_score() {
        let board = Scoreboard::new(0);
        assert_eq!(board.text(), "Score: 0");
    }

    #[test]
    fn text_with_high_score() {
        let mut board = Scoreboard::new(7);
        for _ in 0..5 {
            board.increase_score();
        }

        assert_eq!(board.text(), "Score: 5 | Highscore: 7");
    }

    #[test]
    fn score_counts_increments_and_resets() {
        let mut board = Scoreboard::new(0);
        for _ in 0..12 {
            board.increase_score();
        }
        assert_eq!(board.score(), 12);

        board.new_high_score();
        board.reset_score();

        assert_eq!(board.score(), 0);
        assert_eq!(board.high_score(), 12);
        assert_eq!(board.text(), "Score: 0 | Highscore: 12");
    }
}
