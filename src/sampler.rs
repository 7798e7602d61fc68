use {
    crate::{
        history::RateHistory,
        models::{Counters, Rates},
    },
    tracing::warn,
};

/// turns cumulative counter readings into per-interval rates.
pub struct Sampler {
    inner: Inner,
    rx: RateHistory,
    tx: RateHistory,
}

enum Inner {
    /// no reading has been taken yet.
    Initialized,
    Running {
        /// the last observed counters.
        last: Counters,
    },
}

// === impl Sampler ===

impl Sampler {
    pub fn new(width: usize) -> Self {
        Self {
            inner: Inner::Initialized,
            rx: RateHistory::new(width),
            tx: RateHistory::new(width),
        }
    }

    /// records a reading taken `elapsed` seconds after the previous one.
    ///
    /// NB: the first reading only sets the baseline, so this returns `None` the first time
    /// it is called. a counter that went backwards (interface restart, wraparound) yields
    /// a rate of zero for that interval and becomes the new baseline.
    pub fn tick(&mut self, raw: Counters, elapsed: f64) -> Option<Rates> {
        let Self { inner, rx, tx } = self;

        match inner {
            Inner::Initialized => {
                *inner = Inner::Running { last: raw };
                None
            }
            Inner::Running { last } => {
                let prev = std::mem::replace(last, raw);
                if elapsed.is_nan() || elapsed <= 0.0 {
                    return None;
                }

                let rates = Rates {
                    rx: Self::rate("rx", prev.rx, raw.rx, elapsed),
                    tx: Self::rate("tx", prev.tx, raw.tx, elapsed),
                };
                rx.push(rates.rx);
                tx.push(rates.tx);
                Some(rates)
            }
        }
    }

    fn rate(direction: &str, prev: u64, now: u64, elapsed: f64) -> u64 {
        match now.checked_sub(prev) {
            Some(delta) => (delta as f64 / elapsed) as u64,
            None => {
                warn!(direction, prev, now, "counter went backwards, treating as reset");
                0
            }
        }
    }

    /// resizes both histories to `width` columns.
    pub fn resize(&mut self, width: usize) {
        self.rx.resize(width);
        self.tx.resize(width);
    }

    pub fn rx(&self) -> &RateHistory {
        &self.rx
    }

    pub fn tx(&self) -> &RateHistory {
        &self.tx
    }

    /// the latest cumulative counters, shown as the "total" figures.
    pub fn totals(&self) -> Counters {
        match self.inner {
            Inner::Initialized => Counters::default(),
            Inner::Running { last } => last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(rx: u64, tx: u64) -> Counters {
        Counters { rx, tx }
    }

    #[test]
    fn first_tick_only_sets_baseline() {
        let mut sampler = Sampler::new(4);
        assert_eq!(sampler.tick(counters(1_000_000, 500_000), 0.5), None);
        assert_eq!(sampler.rx().samples(), &[0, 0, 0, 0]);
        assert_eq!(sampler.tx().samples(), &[0, 0, 0, 0]);
        assert_eq!(sampler.totals(), counters(1_000_000, 500_000));
    }

    #[test]
    fn second_tick_pushes_one_rate() {
        let mut sampler = Sampler::new(4);
        sampler.tick(counters(1000, 2000), 0.5);
        let rates = sampler.tick(counters(1500, 2100), 0.5);

        assert_eq!(rates, Some(Rates { rx: 1000, tx: 200 }));
        assert_eq!(sampler.rx().samples(), &[0, 0, 0, 1000]);
        assert_eq!(sampler.tx().samples(), &[0, 0, 0, 200]);
        assert_eq!(sampler.totals(), counters(1500, 2100));
    }

    #[test]
    fn rate_uses_measured_elapsed() {
        let mut sampler = Sampler::new(3);
        sampler.tick(counters(0, 0), 0.5);
        let rates = sampler.tick(counters(3000, 300), 1.5).unwrap();
        assert_eq!(rates, Rates { rx: 2000, tx: 200 });
    }

    #[test]
    fn counter_reset_records_zero() {
        let mut sampler = Sampler::new(3);
        sampler.tick(counters(10_000, 10_000), 1.0);
        let rates = sampler.tick(counters(50, 10_100), 1.0).unwrap();
        assert_eq!(rates, Rates { rx: 0, tx: 100 });

        // the reset value is the new baseline.
        let rates = sampler.tick(counters(150, 10_100), 1.0).unwrap();
        assert_eq!(rates, Rates { rx: 100, tx: 0 });
        assert_eq!(sampler.rx().samples(), &[0, 0, 100]);
    }

    #[test]
    fn resize_applies_to_both_directions() {
        let mut sampler = Sampler::new(3);
        sampler.tick(counters(0, 0), 1.0);
        sampler.tick(counters(10, 20), 1.0);
        sampler.resize(5);
        assert_eq!(sampler.rx().samples(), &[0, 0, 0, 0, 10]);
        assert_eq!(sampler.tx().samples(), &[0, 0, 0, 0, 20]);
    }
}
