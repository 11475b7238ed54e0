use crossterm::event::KeyCode;

use crate::map::MapRenderer;
use crate::viz::Plot;

/// Application state
pub struct App {
    pub plot: Plot,
    pub map_renderer: MapRenderer,
    pub should_quit: bool,
}

impl App {
    pub fn new(plot: Plot, map_renderer: MapRenderer) -> Self {
        Self {
            plot,
            map_renderer,
            should_quit: false,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Zoom into the next trace
    pub fn next_trace(&mut self) {
        self.plot.cycle_zoom(true);
    }

    /// Zoom into the previous trace
    pub fn prev_trace(&mut self) {
        self.plot.cycle_zoom(false);
    }

    /// Zoom into a trace by its 1-based number; unknown numbers are ignored
    pub fn select_trace(&mut self, number: usize) {
        if number >= 1 {
            self.plot.set_zoom(number - 1);
        }
    }

    /// Handle a key press. Returns true when the screen needs redrawing.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),

            // Trace selection
            KeyCode::Tab | KeyCode::Right => self.next_trace(),
            KeyCode::BackTab | KeyCode::Left => self.prev_trace(),
            KeyCode::Char(c @ '1'..='9') => {
                self.select_trace(c as usize - '0' as usize);
            }

            // Table
            KeyCode::Char('o') | KeyCode::Char('O') => self.plot.toggle_order(),
            KeyCode::Char('t') | KeyCode::Char('T') => self.plot.cycle_text(),

            // Layer toggles
            KeyCode::Char('b') | KeyCode::Char('B') => self.map_renderer.toggle_borders(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.map_renderer.toggle_states(),

            _ => return false,
        }
        true
    }

    /// Status bar hint for the order currently shown
    pub fn order_label(&self) -> &'static str {
        if self.plot.options.ascending {
            "ascending"
        } else {
            "descending"
        }
    }
}
