use ratatui::style::{Color, Style};

#[derive(Clone, Debug)]
pub struct Theme {
    pub title: Style,
    pub rx_graph: Style,
    pub tx_graph: Style,
    pub scale: Style,
    pub stats: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Style::default(),
            rx_graph: Style::default().fg(Color::Green),
            tx_graph: Style::default().fg(Color::Red),
            scale: Style::default(),
            stats: Style::default(),
        }
    }
}

impl Theme {
    /// the terminal's own colors everywhere.
    pub fn plain() -> Self {
        Self {
            rx_graph: Style::default(),
            tx_graph: Style::default(),
            ..Self::default()
        }
    }

    pub fn new(colors: bool) -> Self {
        if colors {
            Self::default()
        } else {
            Self::plain()
        }
    }
}
