//! Uniform resampling of the AMR field onto an `n³` lattice.
//!
//! Output layout: little-endian `f32` triples `(Bx, By, Bz)` for the points
//! `(i/n, j/n, k/n)`, with `i` (x) outermost and `k` (z) innermost.

use crate::error::GridError;
use crate::grid::{Grid, GridWorker};
use amrgrid_geometry::Point;
use futures::StreamExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

const BYTES_PER_SAMPLE: usize = 3 * size_of::<f32>();

/// Samples the nearest-cell field at `resolution³` points and writes the
/// scaled components to `out`. Returns the number of points written.
///
/// Slabs of constant `i` are spread round-robin over the grid's lanes and run
/// concurrently; they are written in order.
pub async fn sample_uniform<W>(
    grid: &Grid,
    resolution: u32,
    field_factor: f64,
    out: &mut W,
) -> Result<u64, GridError>
where
    W: AsyncWrite + Unpin,
{
    let workers = grid.workers();
    if resolution == 0 || workers.is_empty() {
        return Ok(0);
    }
    info!(
        resolution,
        lanes = workers.len(),
        field_factor,
        "Sampling AMR field on a uniform lattice"
    );

    let mut slabs = futures::stream::iter(0..resolution)
        .map(|i| {
            let worker = workers[i as usize % workers.len()].clone();
            async move { sample_slab(&worker, i, resolution, field_factor).await }
        })
        .buffered(workers.len());

    let mut points = 0u64;
    while let Some(slab) = slabs.next().await {
        let bytes = slab?;
        out.write_all(&bytes).await?;
        points += (bytes.len() / BYTES_PER_SAMPLE) as u64;
    }
    out.flush().await?;

    info!(points, "Uniform sampling finished");
    Ok(points)
}

async fn sample_slab(
    worker: &GridWorker,
    i: u32,
    resolution: u32,
    field_factor: f64,
) -> Result<Vec<u8>, GridError> {
    let n = resolution as usize;
    let mut buf = Vec::with_capacity(n * n * BYTES_PER_SAMPLE);
    let x = lattice_coord(i, resolution);
    for j in 0..resolution {
        let y = lattice_coord(j, resolution);
        for k in 0..resolution {
            let p = Point::new(x, y, lattice_coord(k, resolution));
            let field = worker.field_at_point(p).await?;
            for component in field {
                #[allow(clippy::cast_possible_truncation)]
                let value = (component * field_factor) as f32;
                buf.extend_from_slice(&value.to_le_bytes());
            }
        }
    }
    debug!(slab = i, lane = worker.index(), "Slab sampled");
    Ok(buf)
}

fn lattice_coord(i: u32, resolution: u32) -> f64 {
    f64::from(i) / f64::from(resolution)
}

/// Decodes a buffer produced by [`sample_uniform`]. Trailing bytes that do
/// not form a whole triple are ignored.
pub fn decode_samples(bytes: &[u8]) -> Vec<[f32; 3]> {
    bytes
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|chunk| {
            let mut triple = [0f32; 3];
            for (slot, raw) in triple.iter_mut().zip(chunk.chunks_exact(4)) {
                *slot = f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
            }
            triple
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_starts_at_origin_and_stops_short_of_one() {
        assert_eq!(lattice_coord(0, 4), 0.0);
        assert_eq!(lattice_coord(3, 4), 0.75);
    }

    #[test]
    fn decode_reads_little_endian_triples() {
        let mut bytes = Vec::new();
        for v in [1.0f32, -2.5, 0.125, 4.0, 5.0, 6.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.push(0xff);

        let samples = decode_samples(&bytes);
        assert_eq!(samples, vec![[1.0, -2.5, 0.125], [4.0, 5.0, 6.0]]);
    }
}
