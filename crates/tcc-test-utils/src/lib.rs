//! Shared test infrastructure for the TCC pipeline workspace.

pub mod generators;
pub mod paths;

pub use generators::*;
pub use paths::*;

/// Macro to skip a test if the required fixture file is not found.
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: test file '{}' not found. Set TCC_TEST_DATA_DIR to run this test.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Macro for approximate floating-point equality assertions.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }
}
