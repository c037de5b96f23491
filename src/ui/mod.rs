pub mod bills;
pub mod components;
pub mod error_page;
pub mod layout;
pub mod new_bill;

use tui::layout::{Constraint, Direction, Layout, Rect};

// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
pub mod test_utils {
    use tui::{backend::TestBackend, buffer::Buffer, Frame, Terminal};

    /// Draw once on an in-memory terminal and return its buffer, styles included.
    pub fn render_buffer<F>(width: u16, height: u16, draw: F) -> Buffer
    where
        F: FnOnce(&mut Frame<TestBackend>),
    {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(draw).unwrap();
        terminal.backend().buffer().clone()
    }

    /// Draw once on an in-memory terminal and return the screen as lines.
    pub fn render_lines<F>(width: u16, height: u16, draw: F) -> Vec<String>
    where
        F: FnOnce(&mut Frame<TestBackend>),
    {
        let buffer = render_buffer(width, height, draw);
        let area = buffer.area;
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buffer.get(x, y).symbol.as_str()).collect())
            .collect()
    }

    /// Position of the first cell where `text` starts, one character per cell.
    pub fn find_text(buffer: &Buffer, text: &str) -> Option<(u16, u16)> {
        let chars: Vec<char> = text.chars().collect();
        let area = buffer.area;
        for y in 0..area.height {
            for x in 0..area.width {
                let fits = usize::from(area.width - x) >= chars.len();
                if fits
                    && chars.iter().enumerate().all(|(i, c)| {
                        buffer.get(x + i as u16, y).symbol == c.to_string()
                    })
                {
                    return Some((x, y));
                }
            }
        }
        None
    }

    pub fn contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|line| line.contains(needle))
    }
}
