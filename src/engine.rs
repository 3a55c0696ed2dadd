//! Thermochron Engine
//!
//! Computes the thermochron curve of a daily-high series:
//!
//! ```text
//! thermochron(k) = min over all k-day windows of (max daily high in the window)
//! ```
//!
//! i.e. the peak temperature of the coldest k-day streak. The curve is
//! non-decreasing in k: thermochron(1) is the series minimum and
//! thermochron(n) is the series maximum.
//!
//! Each k is one O(n) sliding-window-maximum pass over a monotonic deque,
//! so the full curve costs O(n²). The engine is pure: no I/O, no logging,
//! no shared state. Callers must hand it a dense, finite series (missing
//! readings are dropped upstream by the weather source).

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Thermochron curve for one series
///
/// `k_values[i] == i + 1` and `thermochron_values[i]` is thermochron(i + 1).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThermochronCurve {
    pub k_values: Vec<usize>,
    pub thermochron_values: Vec<f64>,
}

impl ThermochronCurve {
    /// Number of points (equals the input series length)
    pub fn len(&self) -> usize {
        self.k_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.k_values.is_empty()
    }

    /// thermochron(k) for a 1-based streak length
    pub fn value_at(&self, k: usize) -> Option<f64> {
        k.checked_sub(1)
            .and_then(|i| self.thermochron_values.get(i))
            .copied()
    }

    /// Split into `(k_values, thermochron_values)`
    pub fn into_parts(self) -> (Vec<usize>, Vec<f64>) {
        (self.k_values, self.thermochron_values)
    }
}

/// The window that realises thermochron(k)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColdestWindow {
    /// Index of the first day in the window
    pub start: usize,
    /// Window length (k)
    pub len: usize,
    /// Highest daily high inside the window (== thermochron(k))
    pub peak: f64,
}

impl ColdestWindow {
    /// Index of the last day in the window (inclusive)
    pub fn end(&self) -> usize {
        self.start + self.len - 1
    }
}

/// Compute the full thermochron curve, k = 1..=n
///
/// Empty input yields an empty curve.
pub fn compute(daily_highs: &[f64]) -> ThermochronCurve {
    let n = daily_highs.len();
    let mut k_values = Vec::with_capacity(n);
    let mut thermochron_values = Vec::with_capacity(n);

    let mut deque = VecDeque::with_capacity(n);
    for k in 1..=n {
        let (_, best) = scan_windows(daily_highs, k, &mut deque, |_, _| {});
        k_values.push(k);
        thermochron_values.push(best);
    }

    ThermochronCurve {
        k_values,
        thermochron_values,
    }
}

/// Maximum of every k-length window, in window order
///
/// Returns `n - k + 1` values; empty when `k == 0` or `k > n`.
pub fn sliding_window_max(values: &[f64], k: usize) -> Vec<f64> {
    if k == 0 || k > values.len() {
        return Vec::new();
    }

    let mut maxima = Vec::with_capacity(values.len() - k + 1);
    let mut deque = VecDeque::with_capacity(k);
    scan_windows(values, k, &mut deque, |_, peak| maxima.push(peak));
    maxima
}

/// Earliest k-length window whose maximum equals thermochron(k)
pub fn coldest_window(values: &[f64], k: usize) -> Option<ColdestWindow> {
    if k == 0 || k > values.len() {
        return None;
    }

    let mut deque = VecDeque::with_capacity(k);
    let (start, peak) = scan_windows(values, k, &mut deque, |_, _| {});
    Some(ColdestWindow {
        start,
        len: k,
        peak,
    })
}

/// One sliding-window-maximum pass for window length `k` (1 <= k <= n)
///
/// The deque holds indices whose values are strictly decreasing from front
/// to back; the front is always the current window's maximum. Every window
/// maximum is reported to `on_window(start, peak)`. Returns the start index
/// of the first window with the lowest maximum, and that maximum.
fn scan_windows<F>(
    values: &[f64],
    k: usize,
    deque: &mut VecDeque<usize>,
    mut on_window: F,
) -> (usize, f64)
where
    F: FnMut(usize, f64),
{
    debug_assert!(k >= 1 && k <= values.len());
    deque.clear();

    let mut best_start = 0;
    let mut best = f64::INFINITY;

    for (i, &value) in values.iter().enumerate() {
        while let Some(&back) = deque.back() {
            if values[back] <= value {
                deque.pop_back();
            } else {
                break;
            }
        }
        deque.push_back(i);

        // Evict the index that just slid out of the window
        if let Some(&front) = deque.front() {
            if front + k <= i {
                deque.pop_front();
            }
        }

        if i + 1 >= k {
            let start = i + 1 - k;
            let peak = values[deque[0]];
            on_window(start, peak);
            if peak < best {
                best = peak;
                best_start = start;
            }
        }
    }

    (best_start, best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_example() {
        let curve = compute(&[30.0, 20.0, 40.0, 10.0, 50.0]);

        assert_eq!(curve.k_values, vec![1, 2, 3, 4, 5]);
        assert_eq!(curve.thermochron_values, vec![10.0, 30.0, 40.0, 40.0, 50.0]);
    }

    #[test]
    fn test_empty_series() {
        let curve = compute(&[]);
        assert!(curve.is_empty());
        assert_eq!(curve.into_parts(), (vec![], vec![]));
    }

    #[test]
    fn test_single_reading() {
        let (k, v) = compute(&[-3.5]).into_parts();
        assert_eq!(k, vec![1]);
        assert_eq!(v, vec![-3.5]);
    }

    #[test]
    fn test_constant_series() {
        let curve = compute(&[5.0, 5.0, 5.0]);
        assert_eq!(curve.thermochron_values, vec![5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_endpoints_are_min_and_max() {
        let highs = [41.2, 28.9, 33.0, 19.4, 25.1, 47.8, 22.0];
        let curve = compute(&highs);

        assert_relative_eq!(curve.thermochron_values[0], 19.4);
        assert_relative_eq!(curve.thermochron_values[highs.len() - 1], 47.8);
    }

    #[test]
    fn test_negative_readings() {
        let curve = compute(&[-10.0, -20.0, -5.0, -30.0]);
        // k=2 maxima: [-10, -5, -5] -> -10
        assert_eq!(curve.thermochron_values, vec![-30.0, -10.0, -5.0, -5.0]);
    }

    #[test]
    fn test_reordering_changes_curve() {
        let highs = [10.0, 50.0, 20.0, 30.0, 40.0];
        let sorted = [10.0, 20.0, 30.0, 40.0, 50.0];

        // Same multiset, different order: k=2 maxima [50, 50, 30, 40] vs [20, 30, 40, 50]
        let shuffled = compute(&highs);
        let ascending = compute(&sorted);
        assert_eq!(shuffled.value_at(2), Some(30.0));
        assert_eq!(ascending.value_at(2), Some(20.0));
        assert_ne!(shuffled, ascending);
    }

    #[test]
    fn test_reversal_preserves_curve() {
        // Reversing maps each window onto a window with the same maximum
        let highs = [10.0, 50.0, 20.0, 30.0, 40.0];
        let reversed: Vec<f64> = highs.iter().rev().copied().collect();

        assert_eq!(compute(&highs), compute(&reversed));
    }

    #[test]
    fn test_value_at_bounds() {
        let curve = compute(&[1.0, 2.0]);
        assert_eq!(curve.value_at(0), None);
        assert_eq!(curve.value_at(1), Some(1.0));
        assert_eq!(curve.value_at(2), Some(2.0));
        assert_eq!(curve.value_at(3), None);
    }

    #[test]
    fn test_sliding_window_max() {
        let values = [30.0, 20.0, 40.0, 10.0, 50.0];
        assert_eq!(sliding_window_max(&values, 1), values.to_vec());
        assert_eq!(sliding_window_max(&values, 2), vec![30.0, 40.0, 40.0, 50.0]);
        assert_eq!(sliding_window_max(&values, 3), vec![40.0, 40.0, 50.0]);
        assert_eq!(sliding_window_max(&values, 5), vec![50.0]);
        assert!(sliding_window_max(&values, 0).is_empty());
        assert!(sliding_window_max(&values, 6).is_empty());
    }

    #[test]
    fn test_sliding_window_max_with_ties() {
        let values = [3.0, 3.0, 1.0, 3.0, 2.0];
        assert_eq!(sliding_window_max(&values, 2), vec![3.0, 3.0, 3.0, 3.0]);
        assert_eq!(sliding_window_max(&values, 3), vec![3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_coldest_window_location() {
        let values = [30.0, 20.0, 40.0, 10.0, 50.0];

        // k=2 maxima [30, 40, 40, 50]: first window wins
        let window = coldest_window(&values, 2).unwrap();
        assert_eq!(window.start, 0);
        assert_eq!(window.end(), 1);
        assert_relative_eq!(window.peak, 30.0);

        // k=1 lands on the coldest single day
        let window = coldest_window(&values, 1).unwrap();
        assert_eq!(window.start, 3);
        assert_relative_eq!(window.peak, 10.0);

        // Ties resolve to the earliest window
        let window = coldest_window(&values, 4).unwrap();
        assert_eq!(window.start, 0);
        assert_relative_eq!(window.peak, 40.0);
    }

    #[test]
    fn test_coldest_window_out_of_range() {
        assert!(coldest_window(&[], 1).is_none());
        assert!(coldest_window(&[1.0, 2.0], 0).is_none());
        assert!(coldest_window(&[1.0, 2.0], 3).is_none());
    }
}
