/// the narrowest history kept; `average` divides by `len - 1`.
pub const MIN_WIDTH: usize = 2;

/// per-interval rates for one direction, oldest first.
///
/// the buffer is exactly as wide as the graph it feeds. the last slot is always the most
/// recent sample, so the graph's right edge is "now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateHistory {
    samples: Vec<u64>,
}

impl RateHistory {
    pub fn new(width: usize) -> Self {
        Self {
            samples: vec![0; width.max(MIN_WIDTH)],
        }
    }

    pub fn width(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[u64] {
        &self.samples
    }

    pub fn latest(&self) -> u64 {
        self.samples.last().copied().unwrap_or_default()
    }

    /// drops the oldest sample and appends `sample` as the newest.
    pub fn push(&mut self, sample: u64) {
        let Self { samples } = self;
        samples.copy_within(1.., 0);
        if let Some(last) = samples.last_mut() {
            *last = sample;
        }
    }

    /// changes the width while keeping samples aligned to the right edge.
    ///
    /// growing pads with zeros on the left. shrinking keeps the newest `width` samples.
    pub fn resize(&mut self, width: usize) {
        let width = width.max(MIN_WIDTH);
        let old = self.samples.len();
        if width == old {
            return;
        }

        let mut samples = vec![0; width];
        if width > old {
            samples[width - old..].copy_from_slice(&self.samples);
        } else {
            samples.copy_from_slice(&self.samples[old - width..]);
        }
        self.samples = samples;
    }

    /// sum of all samples divided by `width - 1`.
    ///
    /// NB: the divisor leaves out one slot. that is how the figure has always been
    /// computed, and the stats panel output depends on it.
    pub fn average(&self) -> u64 {
        let sum: u64 = self.samples.iter().sum();
        let divisor = self.samples.len().saturating_sub(1) as u64;
        sum.checked_div(divisor).unwrap_or_default()
    }

    pub fn max(&self) -> u64 {
        self.samples.iter().copied().max().unwrap_or_default()
    }
}
