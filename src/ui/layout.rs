use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy)]
pub struct UiAreas {
    pub size: Rect,
    pub header: Rect,
    pub tabs: Rect,
    pub main: Rect,
    pub status_line: Rect,
    pub command_line: Rect,
}

pub fn areas(size: Rect) -> UiAreas {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(size);

    let footer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(vertical[3]);

    UiAreas {
        size,
        header: vertical[0],
        tabs: vertical[1],
        main: vertical[2],
        status_line: footer_chunks[0],
        command_line: footer_chunks[1],
    }
}

/// Split `area` into a row of `n` equal columns.
pub fn columns(area: Rect, n: usize) -> Vec<Rect> {
    let n = n.max(1);
    let constraints: Vec<Constraint> = (0..n)
        .map(|_| Constraint::Ratio(1, n as u32))
        .collect();
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_areas_cover_terminal() {
        let areas = areas(Rect::new(0, 0, 100, 40));
        assert_eq!(areas.header.height, 3);
        assert_eq!(areas.tabs.height, 1);
        assert_eq!(areas.command_line.y, 39);
        assert_eq!(areas.main.height, 40 - 3 - 1 - 2);
    }

    #[test]
    fn test_columns_split_evenly() {
        let cols = columns(Rect::new(0, 0, 90, 5), 3);
        assert_eq!(cols.len(), 3);
        assert!(cols.iter().all(|c| c.width == 30));
    }
}
