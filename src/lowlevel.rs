//! Low-level building blocks for custom post-processing pipelines.
//!
//! These expose the individual layout decoders and the tensor view used by
//! [`PostProcessor`](crate::PostProcessor). Most users should go through the
//! processor, which validates configuration and picks the decoder.

pub use crate::candidate::nms::nms;
pub use crate::candidate::{Candidate, Detection};
#[cfg(feature = "rayon")]
pub use crate::decoder::rayon::{decode_semantic_par, extract_par};
pub use crate::decoder::{
    BoxDecoder, DecodeParams, SemanticDecoder, Ssd, YoloV10, YoloV5, YoloV8,
};
pub use crate::tensor::TensorView;
