//! Whole-image filtering and repetition
//!
//! A pass computes every output pixel from a frozen source image, so rows
//! can be filled independently. Repetitions alternate two buffers: the
//! output of one pass becomes the source of the next.

use crate::bilateral::BilateralKernel;
use crate::params::FilterParams;
use crate::{FilterError, FilterResult};
use imfilter_core::{Error, Pix, PixMut, SAMPLES_PER_PIXEL};
use log::{debug, info};
use rayon::prelude::*;

/// Where the rows of a pass are computed.
#[derive(Debug)]
pub enum Executor {
    /// On the calling thread.
    Serial,
    /// On the rayon global pool.
    Global,
    /// On a dedicated pool owned by this executor.
    Pool(rayon::ThreadPool),
}

impl Executor {
    /// Pick an executor for a worker count: 1 is serial, 0 uses the global
    /// pool and any other value builds a pool with that many threads.
    ///
    /// # Errors
    ///
    /// [`FilterError::ThreadPool`] if the dedicated pool cannot be built.
    pub fn new(workers: usize) -> FilterResult<Self> {
        match workers {
            1 => Ok(Executor::Serial),
            0 => Ok(Executor::Global),
            n => rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map(Executor::Pool)
                .map_err(|e| FilterError::ThreadPool(e.to_string())),
        }
    }

    /// Number of threads rows are spread over.
    pub fn threads(&self) -> usize {
        match self {
            Executor::Serial => 1,
            Executor::Global => rayon::current_num_threads(),
            Executor::Pool(pool) => pool.current_num_threads(),
        }
    }
}

/// Filter every pixel of `src` into `dst`.
///
/// `src` is only read; each row of `dst` is written exactly once.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] if the images differ in size, or any error
/// from [`BilateralKernel::apply`].
pub fn bilateral_pass(
    src: &Pix,
    dst: &mut PixMut,
    kernel: &BilateralKernel,
    executor: &Executor,
) -> FilterResult<()> {
    if src.dimensions() != dst.dimensions() {
        return Err(Error::DimensionMismatch {
            expected: src.dimensions(),
            actual: dst.dimensions(),
        }
        .into());
    }

    let width = src.width();
    let row_len = width as usize * SAMPLES_PER_PIXEL;

    let fill_row = |(y, row): (usize, &mut [u8])| -> FilterResult<()> {
        for (x, out) in (0..width).zip(row.chunks_exact_mut(SAMPLES_PER_PIXEL)) {
            out.copy_from_slice(&kernel.apply(src, x, y as u32)?);
        }
        Ok(())
    };

    let data = dst.data_mut();
    match executor {
        Executor::Serial => data
            .chunks_exact_mut(row_len)
            .enumerate()
            .try_for_each(&fill_row),
        Executor::Global => data
            .par_chunks_exact_mut(row_len)
            .enumerate()
            .try_for_each(&fill_row),
        Executor::Pool(pool) => pool.install(|| {
            data.par_chunks_exact_mut(row_len)
                .enumerate()
                .try_for_each(&fill_row)
        }),
    }
}

/// Run `params.reps` bilateral passes over `pix` and return the result.
///
/// # Example
///
/// ```
/// use imfilter_core::Pix;
/// use imfilter_filter::{FilterParams, bilateral_filter};
///
/// let pix = Pix::new_filled(8, 8, [255, 255, 255]).unwrap();
/// let out = bilateral_filter(&pix, FilterParams::new(1.0, 1.0).with_reps(2)).unwrap();
/// assert!(out.equals(&pix));
/// ```
pub fn bilateral_filter(pix: &Pix, params: FilterParams) -> FilterResult<Pix> {
    bilateral_filter_with(pix, params, |_, _: &Pix| Ok::<(), FilterError>(()))
}

/// Like [`bilateral_filter`], but hands the output of every pass except
/// the last to `on_intermediate` together with the 0-based pass index.
///
/// The callback's error type is the error type of the whole run; an error
/// from the callback stops the run immediately.
///
/// # Errors
///
/// Invalid parameters, a thread pool that cannot be built, or any error
/// from a pass or from the callback.
pub fn bilateral_filter_with<E, F>(
    pix: &Pix,
    params: FilterParams,
    mut on_intermediate: F,
) -> Result<Pix, E>
where
    E: From<FilterError>,
    F: FnMut(u32, &Pix) -> Result<(), E>,
{
    params.validate()?;
    let kernel = BilateralKernel::new(params.spatial_sigma, params.range_sigma)?;
    let executor = Executor::new(params.workers)?;
    let (width, height) = pix.dimensions();

    info!(
        "bilateral filter: {}x{} image, s = {}, b = {}, {} pass(es), support {}, {} thread(s)",
        width,
        height,
        params.spatial_sigma,
        params.range_sigma,
        params.reps,
        kernel.support(),
        executor.threads()
    );

    let mut src = pix.clone();
    let mut dst = blank_buffer(width, height)?;
    dst.set_informat(pix.informat());

    // reps >= 1 after validation
    for rep in 0..params.reps - 1 {
        debug!("pass {}/{}", rep + 1, params.reps);
        bilateral_pass(&src, &mut dst, &kernel, &executor)?;
        let out = Pix::from(dst);
        debug!("handing out intermediate result of pass {}", rep);
        on_intermediate(rep, &out)?;

        // The previous source becomes the next destination unless the
        // caller still holds it.
        dst = match src.try_into_mut() {
            Ok(reused) => reused,
            Err(_) => blank_buffer(width, height)?,
        };
        dst.set_informat(pix.informat());
        src = out;
    }

    debug!("pass {}/{}", params.reps, params.reps);
    bilateral_pass(&src, &mut dst, &kernel, &executor)?;
    Ok(dst.into())
}

fn blank_buffer(width: u32, height: u32) -> FilterResult<PixMut> {
    let pix = Pix::new(width, height)?;
    Ok(pix.try_into_mut().unwrap_or_else(|shared| shared.to_mut()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Pix {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x * 40) as u8, (y * 50) as u8, ((x + y) * 20) as u8]);
            }
        }
        Pix::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn test_executor_selection() {
        assert!(matches!(Executor::new(1).unwrap(), Executor::Serial));
        assert!(matches!(Executor::new(0).unwrap(), Executor::Global));
        let pool = Executor::new(3).unwrap();
        assert!(matches!(pool, Executor::Pool(_)));
        assert_eq!(pool.threads(), 3);
    }

    #[test]
    fn test_pass_matches_pixel_filter() {
        let pix = gradient(5, 4);
        let kernel = BilateralKernel::new(0.8, 0.3).unwrap();
        let mut dst = Pix::new(5, 4).unwrap().to_mut();
        bilateral_pass(&pix, &mut dst, &kernel, &Executor::Serial).unwrap();
        let out: Pix = dst.into();
        for y in 0..4 {
            for x in 0..5 {
                assert_eq!(out.get_rgb(x, y).unwrap(), kernel.apply(&pix, x, y).unwrap());
            }
        }
    }

    #[test]
    fn test_pass_dimension_mismatch() {
        let pix = gradient(3, 3);
        let kernel = BilateralKernel::new(1.0, 1.0).unwrap();
        let mut dst = Pix::new(3, 4).unwrap().to_mut();
        assert!(matches!(
            bilateral_pass(&pix, &mut dst, &kernel, &Executor::Serial),
            Err(FilterError::Core(Error::DimensionMismatch { .. }))
        ));
    }

    #[test]
    fn test_pass_independent_of_executor() {
        let pix = gradient(7, 6);
        let kernel = BilateralKernel::new(1.2, 0.2).unwrap();
        let mut outputs = Vec::new();
        for workers in [1, 0, 2, 5] {
            let executor = Executor::new(workers).unwrap();
            let mut dst = Pix::new(7, 6).unwrap().to_mut();
            bilateral_pass(&pix, &mut dst, &kernel, &executor).unwrap();
            outputs.push(Pix::from(dst));
        }
        for out in &outputs[1..] {
            assert!(out.equals(&outputs[0]));
        }
    }

    #[test]
    fn test_filter_leaves_input_untouched() {
        let pix = gradient(4, 4);
        let before = pix.deep_clone();
        let _ = bilateral_filter(&pix, FilterParams::new(1.0, 0.5).with_reps(3)).unwrap();
        assert!(pix.equals(&before));
    }

    #[test]
    fn test_callback_sees_every_non_final_pass() {
        let pix = gradient(4, 3);
        let mut seen = Vec::new();
        let out = bilateral_filter_with(
            &pix,
            FilterParams::new(0.6, 0.4).with_reps(4),
            |rep, p: &Pix| {
                seen.push((rep, p.deep_clone()));
                Ok::<(), FilterError>(())
            },
        )
        .unwrap();
        assert_eq!(seen.iter().map(|(r, _)| *r).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(out.dimensions(), (4, 3));
    }

    #[test]
    fn test_single_rep_skips_callback() {
        let pix = gradient(2, 2);
        let mut calls = 0;
        bilateral_filter_with(&pix, FilterParams::new(1.0, 1.0), |_, _: &Pix| {
            calls += 1;
            Ok::<(), FilterError>(())
        })
        .unwrap();
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_callback_error_aborts_run() {
        let pix = gradient(3, 3);
        let mut calls = 0;
        let result = bilateral_filter_with(
            &pix,
            FilterParams::new(1.0, 1.0).with_reps(5),
            |_, _: &Pix| {
                calls += 1;
                Err(FilterError::InvariantViolation("sink full".to_string()))
            },
        );
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_zero_reps_rejected() {
        let pix = gradient(2, 2);
        assert!(matches!(
            bilateral_filter(&pix, FilterParams::new(1.0, 1.0).with_reps(0)),
            Err(FilterError::InvalidParameters(_))
        ));
    }
}
