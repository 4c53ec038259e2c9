//! Per-architecture decoders for raw output tensors.
//!
//! Box decoders implement [`BoxDecoder`] and are zero-sized marker types
//! selected statically by the dispatcher. Each one validates the buffer
//! against its layout and turns rows into [`Candidate`]s already scaled to
//! the original frame.

use crate::candidate::Candidate;
use crate::geometry::{Point, Rect};
use crate::tensor::TensorView;
use crate::util::math::to_pixels;
use crate::util::{DetPostError, DetPostResult};

pub mod semantic;
pub mod ssd;
pub mod yolo;

#[cfg(feature = "rayon")]
pub mod rayon;

/// Original (pre-resize) frame size in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub(crate) fn validate(&self) -> DetPostResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DetPostError::InvalidDimensions {
                width: self.width as usize,
                height: self.height as usize,
            });
        }
        Ok(())
    }
}

/// Converts normalized corners to a pixel rect.
pub(crate) fn corner_box_to_rect(
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    frame: FrameSize,
) -> Rect {
    Rect::from_corners(
        Point::new(to_pixels(x1, frame.width), to_pixels(y1, frame.height)),
        Point::new(to_pixels(x2, frame.width), to_pixels(y2, frame.height)),
    )
}

/// Per-call decode parameters.
#[derive(Clone, Copy, Debug)]
pub struct DecodeParams {
    /// Number of class channels (ignored by layouts that carry a class id).
    pub num_classes: usize,
    /// Minimum score, compared with strict `>`.
    pub confidence: f32,
    /// Original frame size used for rescaling.
    pub frame: FrameSize,
}

/// Decoder for one box-tensor layout.
pub trait BoxDecoder {
    /// Short layout name used in traces.
    const NAME: &'static str;

    /// Validates `data` against the layout and returns a view over it.
    fn view<'a>(
        data: &'a [f32],
        num_boxes: usize,
        num_classes: usize,
    ) -> DetPostResult<TensorView<'a>>;

    /// Decodes box slot `idx`, returning `None` when it is below threshold.
    fn decode_box(
        view: &TensorView<'_>,
        idx: usize,
        params: &DecodeParams,
    ) -> DetPostResult<Option<Candidate>>;

    /// Decodes every slot in order and keeps those above threshold.
    fn extract(
        data: &[f32],
        num_boxes: usize,
        params: DecodeParams,
    ) -> DetPostResult<Vec<Candidate>> {
        params.frame.validate()?;
        let view = Self::view(data, num_boxes, params.num_classes)?;

        let mut out = Vec::new();
        for idx in 0..num_boxes {
            if let Some(candidate) = Self::decode_box(&view, idx, &params)? {
                out.push(candidate);
            }
        }
        Ok(out)
    }
}

pub use semantic::{SemanticDecoder, SemanticMap, SemanticPixel};
pub use ssd::Ssd;
pub use yolo::{YoloV10, YoloV5, YoloV8};
