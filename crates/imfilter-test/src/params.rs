//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use imfilter_core::Pix;
use imfilter_io::ImageFormat;
use std::fs;

/// Regression test parameters
///
/// Tracks the state of a regression test: the test name, the index of the
/// current check, and every failure recorded so far. Checks never panic;
/// call [`RegParams::cleanup`] at the end and assert on its result.
pub struct RegParams {
    /// Name of the test (e.g., "bilateral")
    pub test_name: String,
    /// Current check index (incremented before each check)
    index: usize,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    pub fn new(test_name: &str) -> Self {
        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");

        Self {
            test_name: test_name.to_string(),
            index: 0,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current check index
    pub fn index(&self) -> usize {
        self.index
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if `|expected - actual| <= delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg);
            false
        } else {
            true
        }
    }

    /// Compare two images for exact equality
    pub fn compare_pix(&mut self, pix1: &Pix, pix2: &Pix) -> bool {
        self.compare_pix_within(pix1, pix2, 0)
    }

    /// Compare two images, allowing each sample to differ by `max_delta`
    pub fn compare_pix_within(&mut self, pix1: &Pix, pix2: &Pix, max_delta: u8) -> bool {
        self.index += 1;

        let diff = match pix1.count_pixel_diffs(pix2) {
            Ok(diff) => diff,
            Err(e) => {
                let msg = format!(
                    "Failure in {}_reg: pix comparison for index {} - {}",
                    self.test_name, self.index, e
                );
                self.fail(msg);
                return false;
            }
        };

        if diff.max_diff > max_delta {
            let msg = format!(
                "Failure in {}_reg: pix comparison for index {} - {} pixels differ, \
                 max sample diff {} > {}",
                self.test_name, self.index, diff.n_diff, diff.max_diff, max_delta
            );
            self.fail(msg);
            false
        } else {
            true
        }
    }

    /// Write an image to the regout directory for visual inspection
    ///
    /// Returns the path written.
    pub fn write_pix(&mut self, pix: &Pix, format: ImageFormat) -> TestResult<String> {
        self.index += 1;

        let outdir = regout_dir();
        fs::create_dir_all(&outdir)?;
        let local_path = format!(
            "{}/{}.{:02}.{}",
            outdir,
            self.test_name,
            self.index,
            format.extension()
        );

        imfilter_io::write_image(pix, &local_path, format).map_err(|e| {
            TestError::ImageWrite {
                path: local_path.clone(),
                message: e.to_string(),
            }
        })?;

        Ok(local_path)
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all checks passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
