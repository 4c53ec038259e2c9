//! detpost decodes raw detection and segmentation tensors into pixel-space
//! results.
//!
//! A [`PostProcessor`] is configured once per model with an
//! [`ArchitectureTag`], thresholds and a class count. Each call borrows the
//! backend's output buffer, decodes it with the matching layout (YOLOv5,
//! YOLOv8, YOLOv10, SSD or a semantic map), applies greedy NMS where the
//! layout needs it, and returns freshly built results. Parallel decoding is
//! available through the `rayon` feature and stage spans through `tracing`.

mod candidate;
pub mod decoder;
pub mod geometry;
pub mod lowlevel;
pub mod observer;
pub mod postprocess;
pub mod tensor;
mod trace;
pub mod util;

pub use candidate::{Candidate, Detection};
pub use decoder::{FrameSize, SemanticMap, SemanticPixel};
pub use geometry::{iou, Point, Rect};
pub use observer::{NoopObserver, Stage, StageObserver, StageTiming, TimingStats};
pub use postprocess::{
    postprocess, ArchitectureTag, ModelOutput, OutputShape, PostProcessConfig, PostProcessResult,
    PostProcessor, Thresholds,
};
pub use util::{DetPostError, DetPostResult, ErrorKind};

pub use candidate::nms::nms;
