// Pane geometry for the browse screen
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Below this the screen shows a "too small" notice instead of the panes
pub const MIN_WIDTH: u16 = 30;
pub const MIN_HEIGHT: u16 = 8;

/// Rectangles of the four browse panes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panes {
    pub title: Rect,
    pub list: Rect,
    pub detail: Rect,
    pub help: Rect,
}

impl Panes {
    /// Split `area`, or `None` when it is too small to hold the panes
    pub fn compute(area: Rect) -> Option<Self> {
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            return None;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(3),    // List + detail
                Constraint::Length(1), // Help line
            ])
            .split(area);

        // Narrow screens give the list more room
        let (list_pct, detail_pct) = if area.width < 100 {
            (50, 50)
        } else if area.width < 150 {
            (45, 55)
        } else {
            (40, 60)
        };

        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(list_pct),
                Constraint::Percentage(detail_pct),
            ])
            .split(rows[1]);

        Some(Self {
            title: rows[0],
            list: content[0],
            detail: content[1],
            help: rows[2],
        })
    }

    /// Rows visible inside the bordered list pane
    pub fn list_rows(&self) -> usize {
        (self.list.height.saturating_sub(2) as usize).max(1)
    }
}
