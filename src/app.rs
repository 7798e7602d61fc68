use crate::config::Config;
use crate::error::Result;
use crate::parser::{CounterSource, ProcNetDev};
use crate::sampler::Sampler;
use crate::theme::Theme;
use crate::ui;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct App<S = ProcNetDev> {
    config: Config,
    interface: String,
    source: S,
    sampler: Sampler,
    theme: Theme,
    /// set when the terminal changed size; consumed before the next draw.
    resize_pending: bool,
    /// no rate has been computed yet.
    collecting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl<S: CounterSource> App<S> {
    pub fn new(config: Config, interface: String, source: S, cols: u16) -> Self {
        let theme = Theme::new(!config.no_colors);
        Self {
            config,
            interface,
            source,
            sampler: Sampler::new(cols as usize),
            theme,
            resize_pending: false,
            collecting: true,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let delay = self.config.delay();

        self.sample(Duration::ZERO)?;
        let mut last_tick = Instant::now();

        loop {
            if std::mem::take(&mut self.resize_pending) {
                let size = terminal.size()?;
                self.resize(size.width);
            }

            terminal.draw(|frame| ui::draw_dashboard(self, frame))?;

            // input cuts the wait short; the sample still waits for the full interval.
            let timeout = delay.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                if self.handle_event(event::read()?) == Flow::Quit {
                    info!("quit requested");
                    return Ok(());
                }
                continue;
            }

            let elapsed = last_tick.elapsed();
            last_tick = Instant::now();
            self.sample(elapsed)?;
        }
    }

    /// reads the counters and feeds them to the sampler.
    pub fn sample(&mut self, elapsed: Duration) -> Result<()> {
        let counters = self.source.read_counters(&self.interface)?;
        if let Some(rates) = self.sampler.tick(counters, elapsed.as_secs_f64()) {
            self.collecting = false;
            debug!(rx = rates.rx, tx = rates.tx, "sampled");
        }
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) -> Flow {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.code == KeyCode::Char('q') {
                    return Flow::Quit;
                }
                // any other key forces a relayout, like a resize.
                self.resize_pending = true;
            }
            Event::Resize(cols, rows) => {
                debug!(cols, rows, "terminal resized");
                self.resize_pending = true;
            }
            _ => {}
        }
        Flow::Continue
    }

    pub fn resize(&mut self, cols: u16) {
        self.sampler.resize(cols as usize);
        debug!(width = self.sampler.rx().width(), "histories resized");
    }

    /// the vertical scale of the RX and TX graphs.
    pub fn scales(&self) -> (u64, u64) {
        let rx = self.sampler.rx().max();
        let tx = self.sampler.tx().max();
        if self.config.sync_max {
            let max = rx.max(tx);
            (max, max)
        } else {
            (rx, tx)
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    pub fn is_collecting(&self) -> bool {
        self.collecting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::Counters;
    use clap::Parser;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};
    use std::{cell::RefCell, collections::VecDeque};

    /// a mock counter source that replays queued readings.
    #[derive(Default)]
    struct MockCounters {
        readings: RefCell<VecDeque<Counters>>,
    }

    impl MockCounters {
        fn new(readings: &[(u64, u64)]) -> Self {
            let readings = readings.iter().map(|&(rx, tx)| Counters { rx, tx }).collect();
            Self {
                readings: RefCell::new(readings),
            }
        }
    }

    impl CounterSource for MockCounters {
        fn read_counters(&self, interface: &str) -> Result<Counters> {
            self.readings
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| Error::counter_unavailable(interface))
        }
    }

    fn app(args: &[&str], readings: &[(u64, u64)], cols: u16) -> App<MockCounters> {
        let config = Config::try_parse_from(std::iter::once("nbwmon").chain(args.iter().copied()))
            .unwrap();
        App::new(config, "eth0".to_string(), MockCounters::new(readings), cols)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn screen(app: &App<MockCounters>, cols: u16, rows: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(cols, rows)).unwrap();
        let frame = terminal
            .draw(|frame| ui::draw_dashboard(app, frame))
            .unwrap();
        let buf = frame.buffer;
        (0..rows)
            .map(|y| (0..cols).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn first_sample_is_baseline() {
        let mut app = app(&[], &[(1000, 1000), (2000, 1500)], 10);
        app.sample(Duration::ZERO).unwrap();
        assert!(app.is_collecting());
        assert_eq!(app.sampler().rx().max(), 0);

        app.sample(Duration::from_millis(500)).unwrap();
        assert!(!app.is_collecting());
        assert_eq!(app.sampler().rx().latest(), 2000);
        assert_eq!(app.sampler().tx().latest(), 1000);
    }

    #[test]
    fn exhausted_source_is_fatal() {
        let mut app = app(&[], &[], 10);
        assert!(matches!(
            app.sample(Duration::ZERO),
            Err(Error::CounterUnavailable { .. })
        ));
    }

    #[test]
    fn quit_key() {
        let mut app = app(&[], &[], 10);
        assert_eq!(app.handle_event(key(KeyCode::Char('x'))), Flow::Continue);
        assert_eq!(app.handle_event(key(KeyCode::Char('q'))), Flow::Quit);
    }

    #[test]
    fn resize_event_sets_flag_and_resize_keeps_latest() {
        let mut app = app(&[], &[(0, 0), (100, 50)], 10);
        app.sample(Duration::ZERO).unwrap();
        app.sample(Duration::from_secs(1)).unwrap();

        assert_eq!(app.handle_event(Event::Resize(30, 20)), Flow::Continue);
        assert!(app.resize_pending);

        app.resize(30);
        assert_eq!(app.sampler().rx().width(), 30);
        assert_eq!(app.sampler().rx().latest(), 100);
        assert_eq!(app.sampler().tx().latest(), 50);
    }

    #[test]
    fn scales_follow_sync_flag() {
        let readings = [(0, 0), (400, 100)];

        let mut independent = app(&[], &readings, 10);
        independent.sample(Duration::ZERO).unwrap();
        independent.sample(Duration::from_secs(1)).unwrap();
        assert_eq!(independent.scales(), (400, 100));

        let mut synced = app(&["-m"], &readings, 10);
        synced.sample(Duration::ZERO).unwrap();
        synced.sample(Duration::from_secs(1)).unwrap();
        assert_eq!(synced.scales(), (400, 400));
    }

    #[test]
    fn collecting_notice() {
        let mut app = app(&[], &[(0, 0)], 60);
        app.sample(Duration::ZERO).unwrap();
        let screen = screen(&app, 60, 10);
        assert!(screen[0].starts_with("collecting data from eth0 for 0.50 seconds"));
    }

    #[test]
    fn dashboard_layout() {
        let mut app = app(&["-S"], &[(0, 0), (2048, 0)], 40);
        app.sample(Duration::ZERO).unwrap();
        app.sample(Duration::from_secs(1)).unwrap();

        // 15 rows: title, two graphs of (15 - 5) / 2 = 5 rows, 4 stats rows.
        let screen = screen(&app, 40, 15);
        assert_eq!(screen[0].trim(), "interface: eth0");
        assert!(screen[0].starts_with(&" ".repeat(13)));

        // the newest rx sample is the scale maximum, so its column is full.
        for y in 1..=5 {
            assert!(screen[y].ends_with('*'), "rx row {y}: {:?}", screen[y]);
        }
        for y in 6..=10 {
            assert!(!screen[y].contains('*'), "tx row {y}: {:?}", screen[y]);
        }

        assert!(screen[11].contains("RX: 2.00 KiB/s"));
        assert!(screen[11].contains("TX: 0 B/s"));
        assert!(screen[14].contains("total: 2.00 KiB"));
    }
}
