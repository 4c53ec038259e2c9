//! Rayon-parallel decoders (feature-gated).
//!
//! Box slots and semantic grid rows are decoded in parallel. Results are
//! collected through indexed iterators, so the output order and contents
//! match the sequential decoders exactly.

use crate::candidate::Candidate;
use crate::decoder::semantic::Grid;
use crate::decoder::{BoxDecoder, DecodeParams, FrameSize, SemanticMap, SemanticPixel};
use crate::util::DetPostResult;
use rayon::prelude::*;

/// Parallel counterpart of [`BoxDecoder::extract`].
pub fn extract_par<D: BoxDecoder>(
    data: &[f32],
    num_boxes: usize,
    params: DecodeParams,
) -> DetPostResult<Vec<Candidate>> {
    params.frame.validate()?;
    let view = D::view(data, num_boxes, params.num_classes)?;

    let slots: Vec<Option<Candidate>> = (0..num_boxes)
        .into_par_iter()
        .map(|idx| D::decode_box(&view, idx, &params))
        .collect::<DetPostResult<_>>()?;

    Ok(slots.into_iter().flatten().collect())
}

/// Row-parallel counterpart of [`SemanticDecoder::decode`](crate::decoder::SemanticDecoder::decode).
pub fn decode_semantic_par(
    data: &[f32],
    out_width: usize,
    out_height: usize,
    num_classes: usize,
    frame: FrameSize,
) -> DetPostResult<SemanticMap> {
    let (grid, view) = Grid::view(data, out_width, out_height, num_classes, frame)?;

    let rows: Vec<Vec<SemanticPixel>> = (0..grid.height)
        .into_par_iter()
        .map(|y| {
            (0..grid.width)
                .map(|x| grid.pixel(&view, x, y))
                .collect::<DetPostResult<Vec<_>>>()
        })
        .collect::<DetPostResult<_>>()?;

    let mut pixels = Vec::with_capacity(out_width * out_height);
    for row in rows {
        pixels.extend(row);
    }
    Ok(grid.into_map(pixels))
}
