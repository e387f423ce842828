use crate::error::{DiscordError, Result};

/// A fixed-length view `[start, start + len)` into a time series.
///
/// Holds only offsets; the values are borrowed from the series on demand, so
/// creating a window per loop iteration costs nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub len: usize,
}

impl Window {
    /// Create a window, checking it fits in a series of length `n`.
    pub fn new(start: usize, len: usize, n: usize) -> Result<Self> {
        match start.checked_add(len) {
            Some(end) if end <= n => Ok(Self { start, len }),
            _ => Err(DiscordError::invalid(
                "window",
                format!("[{start}, {start}+{len}) does not fit in a series of length {n}"),
            )),
        }
    }

    /// Exclusive end offset.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Borrow the window's values from `ts`.
    ///
    /// Panics if the window does not fit in `ts`; windows built with
    /// [`Window::new`] against the same series always fit.
    #[inline]
    pub fn slice<'a>(&self, ts: &'a [f64]) -> &'a [f64] {
        &ts[self.start..self.end()]
    }
}

/// Proximity rule shared by self-match exclusion and discord exclusion zones:
/// positions `i` and `j` are too close to compare when `|i - j| <= window`.
///
/// Compares start offsets only, not interval intersection.
#[inline(always)]
pub fn is_trivial_match(i: usize, j: usize, window: usize) -> bool {
    i.abs_diff(j) <= window
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_slice_borrows_values() {
        let ts = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let w = Window::new(2, 3, ts.len()).unwrap();
        assert_eq!(w.slice(&ts), &[2.0, 3.0, 4.0]);
        assert_eq!(w.end(), 5);
    }

    #[test]
    fn test_window_at_series_end() {
        let w = Window::new(3, 3, 6).unwrap();
        assert_eq!(w.end(), 6);
    }

    #[test]
    fn test_window_out_of_bounds() {
        assert!(matches!(
            Window::new(4, 3, 6),
            Err(DiscordError::InvalidArgument { .. })
        ));
        assert!(Window::new(usize::MAX, 2, 6).is_err());
    }

    #[test]
    fn test_trivial_match_boundary() {
        // |i - j| == window is still a trivial match; window + 1 is not
        assert!(is_trivial_match(10, 14, 4));
        assert!(is_trivial_match(14, 10, 4));
        assert!(!is_trivial_match(10, 15, 4));
        assert!(!is_trivial_match(15, 10, 4));
        assert!(is_trivial_match(7, 7, 0));
    }

    #[test]
    fn test_trivial_match_ignores_true_overlap() {
        // [0, 4) and [4, 8) do not intersect, yet start offsets differ by 4
        let a = Window::new(0, 4, 16).unwrap();
        let b = Window::new(4, 4, 16).unwrap();
        assert!(a.end() <= b.start);
        assert!(is_trivial_match(a.start, b.start, a.len));
        assert!(!is_trivial_match(a.start, 5, a.len));
    }
}
