/// Mathematical utility functions for the reconstruction
///
/// This module provides the lookup and comparison helpers shared by the
/// forward model and the tests.

/// Assert that the deviation between two values is less than a threshold
///
/// This macro combines deviation calculation with assertion for cleaner test code.
/// It calculates the percentage deviation between `actual` and `expected`, then
/// asserts that this deviation is less than the specified `max_deviation`.
///
/// # Examples
/// See the test cases below for usage examples.
#[macro_export]
macro_rules! assert_deviation {
    ($actual:expr, $expected:expr, $max_deviation:expr) => {
        {
            let actual_val = $actual;
            let expected_val = $expected;
            let max_dev = $max_deviation;
            let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

            if actual_deviation >= max_dev {
                panic!(
                    "assertion failed: deviation {:.2}% >= {:.2}%\n  actual: {:?},\n  expected: {:?}",
                    actual_deviation, max_dev, actual_val, expected_val
                );
            }
        }
    };
    ($actual:expr, $expected:expr, $max_deviation:expr, $($arg:tt)+) => {
        {
            let actual_val = $actual;
            let expected_val = $expected;
            let max_dev = $max_deviation;
            let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

            if actual_deviation >= max_dev {
                panic!(
                    "assertion failed: deviation {:.2}% >= {:.2}%: {}\n  actual: {:?},\n  expected: {:?}",
                    actual_deviation, max_dev, format_args!($($arg)+), actual_val, expected_val
                );
            }
        }
    };
}

/// Index of the sorted `values` entry closest to `target`
///
/// Ties go to the following index. Targets outside the range clamp to the
/// first or last index.
///
/// # Arguments
/// * `values` - Ascending values, e.g. bathymetry distances
/// * `target` - The value to look up
///
/// # Returns
/// `None` only when `values` is empty
///
/// # Examples
/// ```
/// use magellan_rust::math_utils::nearest_index;
///
/// let distances = [0.0, 1.0, 2.0, 3.0];
/// assert_eq!(nearest_index(&distances, 1.2), Some(1));
/// assert_eq!(nearest_index(&distances, 1.5), Some(2));
/// assert_eq!(nearest_index(&distances, -4.0), Some(0));
/// ```
pub fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    if values.is_empty() {
        return None;
    }
    // first index whose value is greater than target
    let upper = values.partition_point(|&v| v <= target);
    if upper == 0 {
        return Some(0);
    }
    if upper == values.len() {
        return Some(values.len() - 1);
    }
    let lower = upper - 1;
    if values[upper] - target > target - values[lower] {
        Some(lower)
    } else {
        Some(upper)
    }
}

/// Calculate the percentage deviation between two values
///
/// Returns the percentage difference of `actual` from `expected`.
/// Uses the expected value as the reference (base) for the percentage calculation.
///
/// # Arguments
/// * `actual` - The actual measured value
/// * `expected` - The expected reference value
///
/// # Returns
/// The percentage deviation as a positive f64 (absolute difference)
///
/// # Examples
/// ```
/// use magellan_rust::math_utils::deviation;
///
/// // 105 nT is 5% higher than 100 nT
/// assert_eq!(deviation(105.0, 100.0), 5.0);
///
/// // 95 nT is 5% lower than 100 nT
/// assert_eq!(deviation(95.0, 100.0), 5.0);
/// ```
pub fn deviation(actual: f64, expected: f64) -> f64 {
    if expected.abs() < f64::EPSILON {
        // Avoid division by zero - if expected is 0, return 0 if actual is also 0
        if actual.abs() < f64::EPSILON {
            0.0
        } else {
            f64::INFINITY // Infinite deviation if expected is 0 but actual is not
        }
    } else {
        ((actual - expected).abs() / expected.abs()) * 100.0
    }
}
