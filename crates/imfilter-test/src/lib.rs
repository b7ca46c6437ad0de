//! imfilter-test - Regression test helpers for imfilter
//!
//! Provides [`RegParams`], which records numbered checks and reports all
//! failures at the end of a test, plus [`synthetic`] image builders so
//! tests do not depend on image files checked into the repository.
//!
//! # Usage
//!
//! ```ignore
//! use imfilter_test::{RegParams, synthetic};
//!
//! let mut rp = RegParams::new("bilateral");
//! let pix = synthetic::uniform(4, 4, [255, 255, 255])?;
//! rp.compare_values(4.0, pix.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```

mod error;
mod params;
pub mod synthetic;

pub use error::{TestError, TestResult};
pub use params::RegParams;

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // imfilter-test is at crates/imfilter-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/target/regout", workspace_root())
}
