//! Numeric helpers shared by the decoders.

/// Returns the index and value of the largest element.
///
/// NaN entries are skipped. Ties keep the lowest index. Returns `None` when
/// the iterator is empty or holds only NaN.
pub(crate) fn argmax_first<I>(values: I) -> Option<(usize, f32)>
where
    I: IntoIterator<Item = f32>,
{
    let mut best: Option<(usize, f32)> = None;
    for (idx, value) in values.into_iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((idx, value)),
        }
    }
    best
}

/// Threshold test shared by all decoders: strictly greater, NaN never passes.
#[inline]
pub(crate) fn above(score: f32, threshold: f32) -> bool {
    score > threshold
}

/// Scales a normalized coordinate to pixels, truncating toward zero.
#[inline]
pub(crate) fn to_pixels(normalized: f32, extent: u32) -> i32 {
    (normalized * extent as f32) as i32
}

/// Maps a grid coordinate to frame space: `trunc(pos / grid * frame)`.
#[inline]
pub(crate) fn grid_to_frame(pos: usize, grid: usize, frame: u32) -> i32 {
    (pos as f32 / grid as f32 * frame as f32) as i32
}

/// Reads a class id stored as a float, rejecting negative and non-finite values.
#[inline]
pub(crate) fn class_id_from_f32(value: f32) -> Option<usize> {
    if value.is_finite() && value >= 0.0 {
        Some(value as usize)
    } else {
        None
    }
}
