use crate::app::App;
use crate::history::RateHistory;
use crate::models::{format_bytes, ByteUnit};
use crate::parser::CounterSource;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Paragraph, Widget};
use ratatui::Frame;

const FILLED: &str = "*";
const SCALE_RULE: &str = "-";

/// which cells of a graph are filled, row 0 being the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plot {
    rows: u16,
    cols: u16,
    cells: Vec<bool>,
}

impl Plot {
    /// one column per sample; a column fills from the bottom in proportion to
    /// `sample / scale_max`. a zero scale plots nothing.
    pub fn new(samples: &[u64], scale_max: u64, rows: u16) -> Self {
        let cols = samples.len().min(u16::MAX as usize) as u16;
        let mut cells = vec![false; rows as usize * cols as usize];

        if scale_max > 0 {
            let height = f64::from(rows);
            for (x, &sample) in samples.iter().take(cols as usize).enumerate() {
                let top = height - 1.0 - sample as f64 / scale_max as f64 * height;
                for y in 0..rows {
                    if top < f64::from(y) {
                        cells[y as usize * cols as usize + x] = true;
                    }
                }
            }
        }

        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn is_filled(&self, x: u16, y: u16) -> bool {
        x < self.cols && y < self.rows && self.cells[y as usize * self.cols as usize + x as usize]
    }

    /// filled cells in column `x`.
    #[cfg(test)]
    fn column_height(&self, x: u16) -> u16 {
        (0..self.rows).filter(|&y| self.is_filled(x, y)).count() as u16
    }
}

/// the labels drawn at the top-left and bottom-left corners of a graph.
pub fn scale_labels(scale_max: u64, unit: ByteUnit) -> (String, String) {
    (
        format!("{}/s", format_bytes(scale_max as f64, unit)),
        format!("{}/s", format_bytes(0.0, unit)),
    )
}

/// a scrolling bar graph of one direction's rate history.
pub struct Graph<'a> {
    pub history: &'a RateHistory,
    pub scale_max: u64,
    pub unit: ByteUnit,
    pub show_scale: bool,
    pub style: Style,
    pub scale_style: Style,
}

impl Widget for Graph<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        // the newest sample always lands in the rightmost column.
        let samples = self.history.samples();
        let samples = &samples[samples.len().saturating_sub(area.width as usize)..];
        let plot = Plot::new(samples, self.scale_max, area.height);
        let offset = area.width - plot.cols();

        for y in 0..plot.rows() {
            for x in 0..plot.cols() {
                if plot.is_filled(x, y) {
                    buf.set_string(area.x + offset + x, area.y + y, FILLED, self.style);
                }
            }
        }

        if self.show_scale {
            for y in area.top()..area.bottom() {
                buf.set_string(area.x, y, SCALE_RULE, self.scale_style);
            }
            let (top, bottom) = scale_labels(self.scale_max, self.unit);
            buf.set_string(area.x, area.y, top, self.scale_style);
            buf.set_string(area.x, area.bottom() - 1, bottom, self.scale_style);
        }
    }
}

/// the figures shown for one direction in the stats panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionStats {
    pub current: u64,
    pub average: u64,
    pub max: u64,
    pub total: u64,
}

impl DirectionStats {
    pub fn new(history: &RateHistory, total: u64) -> Self {
        Self {
            current: history.latest(),
            average: history.average(),
            max: history.max(),
            total,
        }
    }
}

/// lays out the stats panel text: one `(rx, tx)` pair per row for current, average, max
/// and total. totals are cumulative so they carry no `/s`.
pub fn stats_lines(rx: &DirectionStats, tx: &DirectionStats, unit: ByteUnit) -> [(String, String); 4] {
    let rate = |label: &str, value: u64| format!("{:>6} {}/s", label, format_bytes(value as f64, unit));
    let total = |value: u64| format!("{:>6} {}", "total:", format_bytes(value as f64, unit));

    [
        (rate("RX:", rx.current), rate("TX:", tx.current)),
        (rate("avg:", rx.average), rate("avg:", tx.average)),
        (rate("max:", rx.max), rate("max:", tx.max)),
        (total(rx.total), total(tx.total)),
    ]
}

/// the RX and TX figures side by side.
pub struct Stats {
    pub rx: DirectionStats,
    pub tx: DirectionStats,
    pub unit: ByteUnit,
    pub style: Style,
}

impl Stats {
    /// columns of the RX and TX fields for a panel `cols` wide.
    pub fn columns(cols: u16) -> (u16, u16) {
        let rx = (cols / 4).saturating_sub(8);
        (rx, rx + cols / 2 + 1)
    }
}

impl Widget for Stats {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (col_rx, col_tx) = Self::columns(area.width);
        let lines = stats_lines(&self.rx, &self.tx, self.unit);

        for ((rx, tx), y) in lines.iter().zip(area.top()..area.bottom()) {
            for (col, text) in [(col_rx, rx), (col_tx, tx)] {
                if col < area.width {
                    buf.set_stringn(area.x + col, y, text, (area.width - col) as usize, self.style);
                }
            }
        }
    }
}

pub fn draw_dashboard<S: CounterSource>(app: &App<S>, frame: &mut Frame) {
    let area = frame.area();
    let config = app.config();
    let theme = app.theme();

    if app.is_collecting() {
        let notice = format!(
            "collecting data from {} for {:.2} seconds",
            app.interface(),
            config.delay
        );
        frame.render_widget(Paragraph::new(notice), area);
        return;
    }

    let graph_height = config.graph_height(area.height);
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(graph_height),
        Constraint::Length(graph_height),
        Constraint::Fill(1),
    ])
    .split(area);

    let title = format!("interface: {}", app.interface());
    let title_area = chunks[0];
    let title_x = (title_area.width / 2).saturating_sub(7);
    if title_x < title_area.width {
        frame.buffer_mut().set_stringn(
            title_area.x + title_x,
            title_area.y,
            title,
            (title_area.width - title_x) as usize,
            theme.title,
        );
    }

    let sampler = app.sampler();
    let (rx_scale, tx_scale) = app.scales();
    let unit = config.byte_unit();

    frame.render_widget(
        Graph {
            history: sampler.rx(),
            scale_max: rx_scale,
            unit,
            show_scale: !config.hide_scale,
            style: theme.rx_graph,
            scale_style: theme.scale,
        },
        chunks[1],
    );
    frame.render_widget(
        Graph {
            history: sampler.tx(),
            scale_max: tx_scale,
            unit,
            show_scale: !config.hide_scale,
            style: theme.tx_graph,
            scale_style: theme.scale,
        },
        chunks[2],
    );

    let totals = sampler.totals();
    frame.render_widget(
        Stats {
            rx: DirectionStats::new(sampler.rx(), totals.rx),
            tx: DirectionStats::new(sampler.tx(), totals.tx),
            unit,
            style: theme.stats,
        },
        chunks[3],
    );
}
