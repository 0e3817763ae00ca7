//! Power-of-two circular sample store.

/*
Ring Buffer
===========

The shared history for every delay-based effect in the crate. A fixed
block of memory is written one sample at a time; reads look backwards from
the write head.

Capacity is always rounded up to a power of two, so wrapping an index is a
single bitwise AND with `wrap_mask = capacity - 1` instead of a modulo:

    capacity = 8, wrap_mask = 0b0111

    write_index = 6, delay = 9
    (6 - 9) & 0b0111 = -3 & 7 = 5

Index arithmetic
----------------

`write` stores at `write_index` and then advances it. After writing `x`:

    read(1)  -> x                  (the sample just written)
    read(2)  -> the one before it
    read(0)  -> the slot about to be overwritten, i.e. the oldest sample

Effects that read before they write therefore ask for `read(d)` to get the
sample written `d` calls ago.

Sizing
------

Reads must stay below capacity. Effects size their buffers in `prepare`
for the longest delay they can request (plus `INTERPOLATION_HEADROOM` when
they read fractionally). An out-of-range delay is a programming error:
debug builds assert, release builds clamp to the oldest valid sample.
*/

use crate::dsp::interpolate::{self, Interpolation};

/// Extra slots a fractional reader needs beyond its maximum delay.
pub const INTERPOLATION_HEADROOM: usize = 4;

#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    storage: Vec<T>,
    write_index: usize,
    wrap_mask: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Allocate a zeroed buffer of at least `requested_len` samples.
    pub fn new(requested_len: usize) -> Self {
        let capacity = requested_len.max(1).next_power_of_two();
        Self {
            storage: vec![T::default(); capacity],
            write_index: 0,
            wrap_mask: capacity - 1,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    #[inline]
    pub fn write(&mut self, sample: T) {
        self.storage[self.write_index] = sample;
        self.write_index = (self.write_index + 1) & self.wrap_mask;
    }

    /// The sample written `delay` writes ago.
    #[inline]
    pub fn read(&self, delay: usize) -> T {
        debug_assert!(
            delay < self.capacity(),
            "delay {delay} exceeds ring buffer capacity {}",
            self.capacity()
        );
        self.tap(delay.min(self.wrap_mask) as isize)
    }

    /// Unchecked neighbourhood read; `delay` may be -1 for the interpolators.
    #[inline]
    fn tap(&self, delay: isize) -> T {
        let index = (self.write_index as isize).wrapping_sub(delay) as usize & self.wrap_mask;
        self.storage[index]
    }

    /// Zero the contents, keeping the write position.
    pub fn flush(&mut self) {
        self.storage.fill(T::default());
    }

    /// Zero the contents and rewind the write position.
    pub fn reset(&mut self) {
        self.flush();
        self.write_index = 0;
    }
}

impl RingBuffer<f32> {
    /// Largest fractional delay with a non-aliased four-sample neighbourhood.
    #[inline]
    pub fn max_fractional_delay(&self) -> f32 {
        self.wrap_mask.saturating_sub(2) as f32
    }

    /// Read `delay` samples back, Hermite-interpolated unless `interpolate`
    /// is false, in which case the delay is truncated.
    #[inline]
    pub fn read_fractional(&self, delay: f32, interpolate: bool) -> f32 {
        if interpolate {
            self.read_interpolated(delay, Interpolation::Hermite)
        } else {
            self.read_interpolated(delay, Interpolation::None)
        }
    }

    /// Fractional read. The cubic policies need a newer neighbour, so at
    /// delays in `[1, 2)` it is extrapolated from the two newest samples
    /// instead of wrapping onto the oldest slot.
    pub fn read_interpolated(&self, delay: f32, interpolation: Interpolation) -> f32 {
        if interpolation == Interpolation::None {
            return self.read(delay.max(0.0) as usize);
        }

        debug_assert!(
            delay <= self.max_fractional_delay(),
            "fractional delay {delay} exceeds ring buffer capacity {}",
            self.capacity()
        );
        // Delay 0 is the oldest slot, not a neighbour of delay 1
        let delay = delay.clamp(1.0, self.max_fractional_delay().max(1.0));
        let index = delay as isize;
        let frac = delay - index as f32;

        let x0 = self.tap(index);
        let x1 = self.tap(index + 1);
        let x_m1 = || {
            if index >= 2 {
                self.tap(index - 1)
            } else {
                2.0 * x0 - x1
            }
        };

        match interpolation {
            Interpolation::None | Interpolation::Linear => interpolate::linear(x0, x1, frac),
            Interpolation::Hermite => {
                interpolate::hermite(x_m1(), x0, x1, self.tap(index + 2), frac)
            }
            Interpolation::Lagrange => {
                interpolate::lagrange(x_m1(), x0, x1, self.tap(index + 2), frac)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize, capacity: usize) -> RingBuffer<f32> {
        let mut buffer = RingBuffer::new(capacity);
        for i in 0..len {
            buffer.write((i as f32 * 0.37).sin());
        }
        buffer
    }

    #[test]
    fn test_capacity_rounds_up_to_power_of_two() {
        for (requested, expected) in [(0, 1), (1, 1), (2, 2), (3, 4), (100, 128), (1024, 1024), (1025, 2048), (48_000, 65_536)] {
            let buffer: RingBuffer<f32> = RingBuffer::new(requested);
            assert_eq!(buffer.capacity(), expected, "requested {requested}");
            assert!(buffer.capacity().is_power_of_two());
        }
    }

    #[test]
    fn test_write_index_wraps() {
        let mut buffer: RingBuffer<f32> = RingBuffer::new(4);
        for _ in 0..6 {
            buffer.write(1.0);
            assert!(buffer.write_index() < buffer.capacity());
        }
        assert_eq!(buffer.write_index(), 2);
    }

    #[test]
    fn test_read_after_write_ordering() {
        let mut buffer = RingBuffer::new(8);
        buffer.write(0.25);
        buffer.write(0.75);

        // read(1) is the most recent write, read(0) the oldest slot
        assert_eq!(buffer.read(1), 0.75);
        assert_eq!(buffer.read(2), 0.25);
        assert_eq!(buffer.read(0), 0.0);
    }

    #[test]
    fn test_fifo_sequence_across_wrap() {
        let mut buffer = RingBuffer::new(4);
        for i in 0..6 {
            buffer.write(i as f32);
        }
        assert_eq!(buffer.read(1), 5.0);
        assert_eq!(buffer.read(2), 4.0);
        assert_eq!(buffer.read(3), 3.0);
        // Oldest surviving sample sits at the write head
        assert_eq!(buffer.read(0), 2.0);
    }

    #[test]
    fn test_integer_read_works_for_other_sample_types() {
        let mut buffer: RingBuffer<i32> = RingBuffer::new(16);
        for i in 1..=5 {
            buffer.write(i);
        }
        assert_eq!(buffer.read(1), 5);
        assert_eq!(buffer.read(5), 1);
    }

    #[test]
    fn test_truncated_fractional_read_matches_integer_read() {
        let buffer = ramp(300, 256);
        for &delay in &[1.0, 1.2, 7.5, 33.99, 100.0, 200.01, 250.7] {
            assert_eq!(
                buffer.read_fractional(delay, false),
                buffer.read(delay as usize),
                "delay {delay}"
            );
        }
    }

    #[test]
    fn test_truncated_read_reaches_the_whole_buffer() {
        let mut buffer = RingBuffer::new(8);
        for i in 1..=8 {
            buffer.write(i as f32);
        }
        for delay in 1..8 {
            assert_eq!(buffer.read_fractional(delay as f32, false), buffer.read(delay));
        }
        assert_eq!(buffer.read_fractional(7.0, false), 2.0);
    }

    #[test]
    fn test_cubic_read_next_to_write_head_ignores_oldest_slot() {
        let mut buffer = RingBuffer::new(16);
        for i in 0..100 {
            buffer.write(i as f32);
        }
        // read(1) = 99, read(2) = 98
        for interpolation in [Interpolation::Hermite, Interpolation::Lagrange, Interpolation::Linear] {
            let got = buffer.read_interpolated(1.5, interpolation);
            assert!((got - 98.5).abs() < 1e-4, "{interpolation:?} gave {got}");
            let head = buffer.read_interpolated(1.0, interpolation);
            assert!((head - 99.0).abs() < 1e-4, "{interpolation:?} gave {head}");
        }
    }

    #[test]
    fn test_interpolated_read_at_integer_delay_matches_integer_read() {
        let buffer = ramp(300, 256);
        for delay in [1usize, 2, 17, 64, 128, 250] {
            let exact = buffer.read(delay);
            let hermite = buffer.read_fractional(delay as f32, true);
            let lagrange = buffer.read_interpolated(delay as f32, Interpolation::Lagrange);
            let linear = buffer.read_interpolated(delay as f32, Interpolation::Linear);
            assert!((hermite - exact).abs() < 1e-5, "hermite at {delay}");
            assert!((lagrange - exact).abs() < 1e-5, "lagrange at {delay}");
            assert!((linear - exact).abs() < 1e-5, "linear at {delay}");
        }
    }

    #[test]
    fn test_linear_interpolation_between_neighbours() {
        let mut buffer = RingBuffer::new(16);
        buffer.write(0.0);
        buffer.write(1.0);
        // 1.0 was written 1 ago, 0.0 two ago
        let mid = buffer.read_interpolated(1.5, Interpolation::Linear);
        assert!((mid - 0.5).abs() < 1e-6, "got {mid}");
    }

    #[test]
    fn test_hermite_tracks_smooth_signal() {
        let mut buffer = RingBuffer::new(64);
        let f = |i: f32| (i * 0.05).sin();
        for i in 0..40 {
            buffer.write(f(i as f32));
        }
        // Last write was i = 39; delay d means i = 40 - d
        let got = buffer.read_fractional(10.5, true);
        let expected = f(40.0 - 10.5);
        assert!((got - expected).abs() < 1e-4, "got {got}, expected {expected}");
    }

    #[test]
    fn test_reset_clears_and_rewinds() {
        let mut buffer = ramp(10, 16);
        buffer.reset();
        assert_eq!(buffer.write_index(), 0);
        for delay in 0..16 {
            assert_eq!(buffer.read(delay), 0.0);
        }
    }
}
