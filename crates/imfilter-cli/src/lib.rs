//! imfilter-cli - Command-line front end
//!
//! Reads an image, runs the bilateral filter `--reps` times, writes every
//! intermediate result as `rep<N>.png` and the final result to `--out`.

use argh::FromArgs;
use imfilter_core::ImageFormat;
use imfilter_filter::{FilterError, FilterParams, bilateral_filter_with};
use imfilter_io::{IoError, format_for_path, read_image, write_image};
use log::info;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Edge-preserving bilateral smoothing of an image
#[derive(Debug, FromArgs)]
pub struct Args {
    /// input image (PNG, JPEG or binary PNM)
    #[argh(option, long = "in")]
    pub input: PathBuf,

    /// output image; the format follows the extension
    #[argh(option)]
    pub out: PathBuf,

    /// spatial standard deviation in pixels
    #[argh(option, default = "0.0")]
    pub s: f32,

    /// brightness standard deviation (intensity in [0, 1])
    #[argh(option, default = "0.0")]
    pub b: f32,

    /// number of filter passes
    #[argh(option, default = "1")]
    pub reps: u32,

    /// worker threads (0 uses every core)
    #[argh(option, default = "1")]
    pub nthreads: usize,

    /// directory for intermediate rep<N>.png files
    #[argh(option, default = "PathBuf::from(\".\")")]
    pub intermediate_dir: PathBuf,
}

/// Errors reported by the command line tool
#[derive(Debug, Error)]
pub enum AppError {
    /// Options that cannot be turned into a valid run
    #[error("configuration error: {0}")]
    Config(String),

    /// The input image could not be read
    #[error("failed to read '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// An intermediate or the output image could not be written
    #[error("failed to write '{}': {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// Filtering failed
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub width: u32,
    pub height: u32,
    /// Intermediate files written, in pass order
    pub intermediates: Vec<PathBuf>,
    /// Time spent filtering, excluding decode and encode
    pub elapsed: Duration,
}

impl Args {
    /// Build validated filter parameters from the options.
    ///
    /// # Errors
    ///
    /// [`AppError::Config`] for negative or non-finite sigmas or `reps = 0`.
    pub fn filter_params(&self) -> Result<FilterParams, AppError> {
        let params = FilterParams::new(f64::from(self.s), f64::from(self.b))
            .with_reps(self.reps)
            .with_workers(self.nthreads);
        params.validate().map_err(|e| match e {
            FilterError::InvalidParameters(msg) => AppError::Config(msg),
            other => AppError::Filter(other),
        })?;
        Ok(params)
    }
}

/// Path of the intermediate file produced by pass `rep`.
pub fn intermediate_path(dir: &std::path::Path, rep: u32) -> PathBuf {
    dir.join(format!("rep{}.png", rep))
}

/// Run the tool: validate, read, filter, write.
///
/// Configuration and the output format are checked before the input is
/// read, so a bad command line never costs a decode.
pub fn run(args: &Args) -> Result<Summary, AppError> {
    let params = args.filter_params()?;
    let out_format = format_for_path(&args.out).map_err(|source| AppError::Encode {
        path: args.out.clone(),
        source,
    })?;

    let pix = read_image(&args.input).map_err(|source| AppError::Decode {
        path: args.input.clone(),
        source,
    })?;
    info!(
        "read {} ({}x{})",
        args.input.display(),
        pix.width(),
        pix.height()
    );

    let mut intermediates = Vec::new();
    let start = Instant::now();
    let filtered = bilateral_filter_with(&pix, params, |rep, partial| -> Result<(), AppError> {
        let path = intermediate_path(&args.intermediate_dir, rep);
        write_image(partial, &path, ImageFormat::Png).map_err(|source| AppError::Encode {
            path: path.clone(),
            source,
        })?;
        info!("wrote intermediate {}", path.display());
        intermediates.push(path);
        Ok(())
    })?;
    let elapsed = start.elapsed();

    write_image(&filtered, &args.out, out_format).map_err(|source| AppError::Encode {
        path: args.out.clone(),
        source,
    })?;
    info!("wrote {}", args.out.display());

    Ok(Summary {
        width: filtered.width(),
        height: filtered.height(),
        intermediates,
        elapsed,
    })
}
