//! Fixed-size window of recent samples

use std::time::Duration;

pub struct SampleWindow<T> {
    samples: Vec<T>,
    capacity: usize,
    next: usize,
}

impl<T: Copy> SampleWindow<T> {
    /// A window holding at most `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            next: 0,
        }
    }

    /// Record a sample, evicting the oldest once full.
    pub fn push(&mut self, sample: T) {
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
        } else {
            self.samples[self.next] = sample;
        }
        self.next = (self.next + 1) % self.capacity;
    }

    /// Most recently pushed sample.
    pub fn latest(&self) -> Option<T> {
        if self.samples.is_empty() {
            return None;
        }
        let last = (self.next + self.capacity - 1) % self.capacity;
        self.samples.get(last).copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl SampleWindow<Duration> {
    pub fn average(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let sum: Duration = self.samples.iter().sum();
        sum / self.samples.len() as u32
    }

    pub fn min_max(&self) -> (Duration, Duration) {
        let min = self.samples.iter().min().copied().unwrap_or(Duration::ZERO);
        let max = self.samples.iter().max().copied().unwrap_or(Duration::ZERO);
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_evicts_oldest() {
        let mut window = SampleWindow::new(3);
        for ms in [10, 20, 30, 40] {
            window.push(Duration::from_millis(ms));
        }

        assert_eq!(window.len(), 3);
        assert_eq!(window.average(), Duration::from_millis(30)); // (20 + 30 + 40) / 3
        assert_eq!(window.latest(), Some(Duration::from_millis(40)));
        assert_eq!(
            window.min_max(),
            (Duration::from_millis(20), Duration::from_millis(40))
        );
    }

    #[test]
    fn empty_window_reports_zero() {
        let window = SampleWindow::<Duration>::new(0);
        assert_eq!(window.capacity(), 1);
        assert!(window.latest().is_none());
        assert_eq!(window.average(), Duration::ZERO);
    }
}
