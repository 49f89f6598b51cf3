use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{bail, Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{Event, KeyEvent, read, poll};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use crate::food::HALF_EXTENT;
use crate::position::Position;
use crate::snake::{Direction, STEP};
use crate::surface::{Shape, Surface};

pub const TITLE: &str = "Snake";

// The board is a square of cells, one snake step each, border included
const GRID_CELLS: u16 = (2.0 * HALF_EXTENT / STEP) as u16 + 1;
// Terminal characters are about twice as tall as wide
const CELL_WIDTH: u16 = 2;
const FRAME_COLS: u16 = GRID_CELLS * CELL_WIDTH;
const FRAME_ROWS: u16 = GRID_CELLS;

const BACKGROUND: Color = Color::Black;
const TEXT_COLOR: Color = Color::White;
const BORDER_COLOR: Color = Color::DarkGrey;
const SNAKE_COLOR: Color = Color::White;
const FOOD_COLOR: Color = Color::Blue;

const SNAKE_BODY: [char; 2] = ['█', '█'];
const FOOD: [char; 2] = ['(', ')'];

#[derive(Copy, Clone, PartialEq)]
struct Glyph {
    ch: char,
    color: Color,
}

impl Glyph {
    const BLANK: Glyph = Glyph { ch: ' ', color: BACKGROUND };
    // Never drawn, forces a repaint of whatever cell holds it
    const STALE: Glyph = Glyph { ch: '\0', color: Color::Reset };
}

/// Terminal implementation of the drawing surface. Drawing goes to `frame`;
/// `update` prints only the characters that differ from `shown`.
pub struct TermManager {
    stdout: Stdout,
    origin: (u16, u16),
    frame: Vec<Glyph>,
    shown: Vec<Glyph>,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;

        if width < FRAME_COLS || height < FRAME_ROWS {
            bail!(
                "Terminal is {}x{}, the board needs at least {}x{}",
                width, height, FRAME_COLS, FRAME_ROWS
            );
        }

        let origin = ((width - FRAME_COLS) / 2, (height - FRAME_ROWS) / 2);
        let size = FRAME_COLS as usize * FRAME_ROWS as usize;

        let mut term = TermManager {
            stdout: stdout(),
            origin,
            frame: vec![Glyph::BLANK; size],
            shown: vec![Glyph::STALE; size],
        };
        term.draw_borders();
        Ok(term)
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, terminal::SetTitle(TITLE))
            .context("Error entering alt screen")?;
        self.set_raw_mode(true)?;
        execute!(
            self.stdout,
            cursor::Hide,
            cursor::DisableBlinking,
            style::SetBackgroundColor(BACKGROUND),
            terminal::Clear(ClearType::All)
        )
        .context("Error preparing screen")?;

        self.shown.iter_mut().for_each(|g| *g = Glyph::STALE);
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        self.set_raw_mode(false)?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Error leaving alt screen")?;
        Ok(())
    }

    /// Waits up to `timeout` for the first key, then drains whatever else is queued.
    pub fn read_key_events_queue(&self, timeout: Duration) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait).context("Error polling input")? {
            if let Event::Key(ev) = read().context("Error reading input")? {
                events.push(ev);
            }
            wait = Duration::from_millis(0);
        }

        Ok(events)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_borders(&mut self) {
        let border = |ch| Glyph { ch, color: BORDER_COLOR };
        let (end_x, end_y) = (FRAME_COLS - 1, FRAME_ROWS - 1);

        for x in 0..FRAME_COLS {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.put((x, 0), border(ch));
            self.put((x, end_y), border(ch));
        }

        for y in 1..end_y {
            self.put((0, y), border('|'));
            self.put((end_x, y), border('|'));
        }
    }

    fn put(&mut self, (x, y): (u16, u16), glyph: Glyph) {
        if x < FRAME_COLS && y < FRAME_ROWS {
            self.frame[FRAME_COLS as usize * y as usize + x as usize] = glyph;
        }
    }

    fn set_raw_mode(&self, option: bool) -> Result<()> {
        let res = if option {
            terminal::enable_raw_mode()
        } else {
            terminal::disable_raw_mode()
        };

        res.context("Error setting raw mode")
    }
}

impl Surface for TermManager {
    fn clear(&mut self) {
        self.frame.iter_mut().for_each(|g| *g = Glyph::BLANK);
        self.draw_borders();
    }

    fn draw_shape(&mut self, at: Position, shape: Shape) {
        let (col, row) = match cell_of(at) {
            Some(cell) => cell,
            None => return,
        };

        let (chars, color) = match shape {
            Shape::SnakeHead(dir) => {
                let ch = head_char(dir);
                ([ch, ch], SNAKE_COLOR)
            }
            Shape::SnakeBody => (SNAKE_BODY, SNAKE_COLOR),
            Shape::Food => (FOOD, FOOD_COLOR),
        };

        for (i, ch) in chars.iter().enumerate() {
            self.put((col * CELL_WIDTH + i as u16, row), Glyph { ch: *ch, color });
        }
    }

    fn write(&mut self, at: Position, text: &str) {
        let (col, row) = match cell_of(at) {
            Some(cell) => cell,
            None => return,
        };

        let len = text.chars().count() as i32;
        let anchor = (col * CELL_WIDTH) as i32 + 1;
        let start = anchor - len / 2;

        for (i, ch) in text.chars().enumerate() {
            let x = start + i as i32;
            if x >= 0 {
                self.put((x as u16, row), Glyph { ch, color: TEXT_COLOR });
            }
        }
    }

    fn update(&mut self) -> Result<()> {
        let (ox, oy) = self.origin;

        for (i, (new, old)) in self.frame.iter().zip(self.shown.iter()).enumerate() {
            if new == old {
                continue;
            }

            let (x, y) = ((i % FRAME_COLS as usize) as u16, (i / FRAME_COLS as usize) as u16);
            queue!(
                self.stdout,
                cursor::MoveTo(ox + x, oy + y),
                style::SetForegroundColor(new.color),
                style::Print(new.ch)
            )
            .context("Error drawing frame")?;
        }

        self.stdout.flush().context("Error flushing")?;
        self.shown.copy_from_slice(&self.frame);
        Ok(())
    }
}

/// Grid cell (column, row) holding `pos`, if it's on the board.
fn cell_of(pos: Position) -> Option<(u16, u16)> {
    let col = ((pos.x + HALF_EXTENT) / STEP).round();
    let row = ((HALF_EXTENT - pos.y) / STEP).round();
    let range = 0.0..GRID_CELLS as f64;

    if range.contains(&col) && range.contains(&row) {
        Some((col as u16, row as u16))
    } else {
        None
    }
}

fn head_char(dir: Direction) -> char {
    match dir {
        Direction::Up => '^',
        Direction::Down => 'v',
        Direction::Left => '<',
        Direction::Right => '>',
    }
}
