//! Fixed-size sample window for smoothing and rate checks
//!
//! The station smooths ultrasonic readings with a moving average before
//! classification (echo jitter off rippling water easily spans several
//! centimeters). This ring buffer keeps the last N timestamped readings in
//! fixed memory: when full, the oldest sample is overwritten, which is the
//! behavior we want - recent water levels matter, old ones do not.
//!
//! The capacity is a const generic so the window lives on the stack or in
//! a static. Prefer powers of two if N grows; the default smoothing window
//! of 5 samples is small enough that the modulo cost is irrelevant.

use crate::time::Timestamp;

/// Single reading with timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimestampedReading {
    /// Measured value in sensor units
    pub value: f32,
    /// When the reading was taken (ms)
    pub timestamp: Timestamp,
}

/// Ring buffer of the most recent N sensor readings
#[derive(Clone)]
pub struct SampleWindow<const N: usize> {
    /// Storage array using Option for slots not yet written
    data: [Option<TimestampedReading>; N],
    /// Index where the next write will occur, wraps at N
    write_pos: usize,
    /// Current number of valid readings, saturates at N
    len: usize,
}

impl<const N: usize> SampleWindow<N> {
    /// Creates a new empty window
    ///
    /// Const so a window can live in a static on the device.
    pub const fn new() -> Self {
        Self {
            data: [None; N],
            write_pos: 0,
            len: 0,
        }
    }

    /// Adds a reading, overwriting the oldest when full
    pub fn push(&mut self, reading: TimestampedReading) {
        self.data[self.write_pos] = Some(reading);
        self.write_pos = (self.write_pos + 1) % N;

        if self.len < N {
            self.len += 1;
        }
    }

    /// Number of stored readings
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the window is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if the window is full
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Most recent reading
    pub fn last(&self) -> Option<&TimestampedReading> {
        if self.is_empty() {
            return None;
        }

        let idx = if self.write_pos == 0 {
            N - 1
        } else {
            self.write_pos - 1
        };

        self.data[idx].as_ref()
    }

    /// Moving average over the stored readings
    ///
    /// This is the smoothing step: push the raw reading, publish the mean.
    /// Returns `None` while the window is empty.
    pub fn mean(&self) -> Option<f32> {
        if self.is_empty() {
            return None;
        }

        let sum: f32 = self.iter().map(|r| r.value).sum();
        Some(sum / self.len as f32)
    }

    /// Iterate readings from oldest to newest
    pub fn iter(&self) -> SampleWindowIter<'_, N> {
        SampleWindowIter {
            window: self,
            index: 0,
        }
    }

    /// Discard all readings
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }

    /// Reading by logical index (0 = oldest)
    ///
    /// When the window is full the oldest sample sits at `write_pos`, so
    /// logical indices are offset by it; before that they match storage.
    fn get(&self, index: usize) -> Option<&TimestampedReading> {
        if index >= self.len {
            return None;
        }

        let actual_index = if self.len < N {
            index
        } else {
            (self.write_pos + index) % N
        };

        self.data[actual_index].as_ref()
    }
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over window contents, oldest first
pub struct SampleWindowIter<'a, const N: usize> {
    window: &'a SampleWindow<N>,
    index: usize,
}

impl<'a, const N: usize> Iterator for SampleWindowIter<'a, N> {
    type Item = &'a TimestampedReading;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.window.get(self.index)?;
        self.index += 1;
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(value: f32, timestamp: Timestamp) -> TimestampedReading {
        TimestampedReading { value, timestamp }
    }

    #[test]
    fn empty_window() {
        let window: SampleWindow<5> = SampleWindow::new();
        assert!(window.is_empty());
        assert!(window.last().is_none());
        assert!(window.mean().is_none());
    }

    #[test]
    fn overwrites_oldest_when_full() {
        let mut window = SampleWindow::<3>::new();

        for i in 0..5 {
            window.push(reading(i as f32, i as u64 * 1000));
        }

        assert_eq!(window.len(), 3);
        assert!(window.is_full());

        // Oldest two were overwritten
        let values: Vec<f32> = window.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn moving_average_smooths_jitter() {
        let mut window = SampleWindow::<5>::new();

        // Jittery echoes around a 20 cm level
        for (i, v) in [19.0, 21.0, 20.5, 19.5, 20.0].iter().enumerate() {
            window.push(reading(*v, i as u64 * 5000));
        }

        assert_eq!(window.mean(), Some(20.0));
        assert_eq!(window.last().map(|r| r.value), Some(20.0));
    }

    #[test]
    fn iterator_is_chronological() {
        let mut window = SampleWindow::<4>::new();

        for i in 0..4 {
            window.push(reading(i as f32, i as u64));
        }

        let timestamps: Vec<u64> = window.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![0, 1, 2, 3]);
    }
}
