//! Filter parameters

use crate::{FilterError, FilterResult};

/// Parameters of a bilateral filtering run.
///
/// Built once from configuration and passed by value into the driver.
///
/// # Example
///
/// ```
/// use imfilter_filter::FilterParams;
///
/// let params = FilterParams::new(2.0, 0.1).with_reps(3).with_workers(4);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Spatial sigma `s`; 0 disables spatial attenuation (and shrinks the
    /// window to the target pixel)
    pub spatial_sigma: f64,
    /// Brightness sigma `b`; 0 disables brightness attenuation
    pub range_sigma: f64,
    /// Number of passes, each filtering the previous pass's output
    pub reps: u32,
    /// Worker threads: 1 runs on the calling thread, 0 uses every core
    pub workers: usize,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            spatial_sigma: 0.0,
            range_sigma: 0.0,
            reps: 1,
            workers: 1,
        }
    }
}

impl FilterParams {
    /// Single-pass, single-threaded parameters with the given sigmas.
    pub fn new(spatial_sigma: f64, range_sigma: f64) -> Self {
        Self {
            spatial_sigma,
            range_sigma,
            ..Self::default()
        }
    }

    /// Set the repetition count.
    pub fn with_reps(mut self, reps: u32) -> Self {
        self.reps = reps;
        self
    }

    /// Set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Check that both sigmas are finite and non-negative and `reps >= 1`.
    pub fn validate(&self) -> FilterResult<()> {
        check_sigma("spatial sigma", self.spatial_sigma)?;
        check_sigma("brightness sigma", self.range_sigma)?;
        if self.reps == 0 {
            return Err(FilterError::InvalidParameters(
                "repetition count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn check_sigma(name: &str, value: f64) -> FilterResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(FilterError::InvalidParameters(format!(
            "{} must be finite and >= 0, got {}",
            name, value
        )));
    }
    Ok(())
}
