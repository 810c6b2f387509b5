//! Five-point Laplacian sweep and the schedules that execute it.
//!
//! A sweep reads only from the source field and writes each destination row
//! from exactly one worker, so no schedule needs locking. The only
//! synchronization is the join at the end of the sweep.

use rayon::prelude::*;
use std::thread;

use crate::config::Schedule;
use crate::error::Result;
use crate::field::Field;

/// Per-run constants of the explicit update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StencilCoefficients {
    /// alpha * dt
    pub alpha_dt: f64,
    /// h^2
    pub h2: f64,
}

impl StencilCoefficients {
    pub fn new(alpha: f64, dt: f64, h: f64) -> StencilCoefficients {
        StencilCoefficients {
            alpha_dt: alpha * dt,
            h2: h * h,
        }
    }
}

/// Writes the explicit Euler update of every interior cell of `cur` into `nxt`.
///
/// Boundary cells of `nxt` are not touched; callers establish them first
/// (see [`copy_field`]). Grids smaller than 3 x 3 have no interior.
pub fn step(
    cur: &Field,
    nxt: &mut Field,
    coeffs: StencilCoefficients,
    schedule: Schedule,
) -> Result<()> {
    nxt.check_same_size(cur)?;
    let n = cur.n();
    if n < 3 {
        return Ok(());
    }

    let src = cur.as_slice();
    let interior = &mut nxt.as_mut_slice()[n..(n - 1) * n];
    for_each_row(interior, n, 1, schedule, |i, dst_row| {
        sweep_row(src, n, i, dst_row, coeffs)
    });
    Ok(())
}

/// Copies every cell of `cur` into `nxt` using the same row partitioning as
/// [`step`].
pub fn copy_field(cur: &Field, nxt: &mut Field, schedule: Schedule) -> Result<()> {
    nxt.check_same_size(cur)?;
    let n = cur.n();
    if n == 0 {
        return Ok(());
    }

    for_each_row(nxt.as_mut_slice(), n, 0, schedule, |i, dst_row| {
        dst_row.copy_from_slice(cur.row(i))
    });
    Ok(())
}

#[inline]
fn sweep_row(src: &[f64], n: usize, i: usize, dst_row: &mut [f64], c: StencilCoefficients) {
    let row = i * n;
    for j in 1..(n - 1) {
        let idx = row + j;

        let u = src[idx];
        let up = src[idx - n];
        let down = src[idx + n];
        let left = src[idx - 1];
        let right = src[idx + 1];

        let lap = (down - 2.0 * u + up) / c.h2 + (right - 2.0 * u + left) / c.h2;
        dst_row[j] = u + c.alpha_dt * lap;
    }
}

/// Hands out the rows of `dst` (whose first row is grid row `first_row`) to
/// workers according to `schedule`, joining before returning.
fn for_each_row<F>(dst: &mut [f64], n: usize, first_row: usize, schedule: Schedule, f: F)
where
    F: Fn(usize, &mut [f64]) + Sync,
{
    match schedule {
        Schedule::Sequential => {
            for (r, row) in dst.chunks_mut(n).enumerate() {
                f(first_row + r, row);
            }
        }
        Schedule::Rayon => {
            dst.par_chunks_mut(n)
                .enumerate()
                .for_each(|(r, row)| f(first_row + r, row));
        }
        Schedule::Threads(workers) => {
            let rows = dst.len() / n;
            if rows == 0 {
                return;
            }
            let band = rows.div_ceil(workers.max(1));
            let f = &f;
            thread::scope(|s| {
                for (b, chunk) in dst.chunks_mut(band * n).enumerate() {
                    s.spawn(move || {
                        let base = first_row + b * band;
                        for (r, row) in chunk.chunks_mut(n).enumerate() {
                            f(base + r, row);
                        }
                    });
                }
            });
        }
    }
}
