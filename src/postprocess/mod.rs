//! Architecture dispatch and the post-processing entry point.
//!
//! [`PostProcessor`] owns a validated [`PostProcessConfig`] and routes each
//! raw output through the decoder selected by its [`ArchitectureTag`]. Box
//! layouts then run through NMS (except NMS-free YOLOv10); semantic layouts
//! produce a [`SemanticMap`]. Every call builds its results from scratch.

mod config;

pub use config::{ArchitectureTag, PostProcessConfig, Thresholds};

use std::time::Instant;

use crate::candidate::nms::nms;
use crate::candidate::order::indices_by_score_desc;
use crate::candidate::{Candidate, Detection};
#[cfg(feature = "rayon")]
use crate::decoder::rayon::{decode_semantic_par, extract_par};
use crate::decoder::{
    BoxDecoder, DecodeParams, FrameSize, SemanticDecoder, SemanticMap, Ssd, YoloV10, YoloV5,
    YoloV8,
};
use crate::observer::{NoopObserver, Stage, StageObserver};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{DetPostError, DetPostResult};

/// Declared shape of a raw output buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputShape {
    /// Box tensor with `num_boxes` candidate slots.
    Boxes { num_boxes: usize },
    /// Segmentation grid of `width x height` cells.
    Grid { width: usize, height: usize },
}

/// Borrowed output buffer handed over by the inference backend.
#[derive(Clone, Copy, Debug)]
pub struct ModelOutput<'a> {
    pub data: &'a [f32],
    pub shape: OutputShape,
}

impl<'a> ModelOutput<'a> {
    pub fn boxes(data: &'a [f32], num_boxes: usize) -> Self {
        Self {
            data,
            shape: OutputShape::Boxes { num_boxes },
        }
    }

    pub fn grid(data: &'a [f32], width: usize, height: usize) -> Self {
        Self {
            data,
            shape: OutputShape::Grid { width, height },
        }
    }
}

/// Finished result of one post-processing call.
#[derive(Clone, Debug, PartialEq)]
pub enum PostProcessResult {
    Detections(Vec<Detection>),
    Semantic(SemanticMap),
}

impl PostProcessResult {
    pub fn detections(&self) -> Option<&[Detection]> {
        match self {
            Self::Detections(detections) => Some(detections),
            Self::Semantic(_) => None,
        }
    }

    pub fn semantic(&self) -> Option<&SemanticMap> {
        match self {
            Self::Semantic(map) => Some(map),
            Self::Detections(_) => None,
        }
    }

    pub fn into_detections(self) -> Option<Vec<Detection>> {
        match self {
            Self::Detections(detections) => Some(detections),
            Self::Semantic(_) => None,
        }
    }

    pub fn into_semantic(self) -> Option<SemanticMap> {
        match self {
            Self::Semantic(map) => Some(map),
            Self::Detections(_) => None,
        }
    }
}

/// Validates `config` and post-processes a single output.
pub fn postprocess(
    config: &PostProcessConfig,
    output: ModelOutput<'_>,
    frame: FrameSize,
) -> DetPostResult<PostProcessResult> {
    PostProcessor::new(*config)?.process(output, frame)
}

/// Post-processing engine for one model.
///
/// Holds only read-only configuration, so a single instance can serve
/// concurrent calls on separate buffers.
#[derive(Clone, Debug)]
pub struct PostProcessor<O = NoopObserver> {
    config: PostProcessConfig,
    observer: O,
}

impl PostProcessor {
    /// Creates a processor, failing fast on an unusable configuration.
    pub fn new(config: PostProcessConfig) -> DetPostResult<Self> {
        if let Err(err) = config.validate() {
            trace_warn!(arch = config.arch.name(), error = %err, "rejected configuration");
            return Err(err);
        }
        Ok(Self {
            config,
            observer: NoopObserver,
        })
    }
}

impl<O: StageObserver> PostProcessor<O> {
    /// Replaces the stage observer.
    pub fn with_observer<P: StageObserver>(self, observer: P) -> PostProcessor<P> {
        PostProcessor {
            config: self.config,
            observer,
        }
    }

    pub fn config(&self) -> &PostProcessConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Decodes `output` according to the configured architecture.
    pub fn process(
        &self,
        output: ModelOutput<'_>,
        frame: FrameSize,
    ) -> DetPostResult<PostProcessResult> {
        let arch = self.config.arch;
        let _span = trace_span!("postprocess", arch = arch.name()).entered();

        match (arch, output.shape) {
            (ArchitectureTag::Unknown, _) => Err(DetPostError::UnsupportedArchitecture(arch)),
            (ArchitectureTag::Semantic, OutputShape::Grid { width, height }) => self
                .segment_grid(output.data, width, height, frame)
                .map(PostProcessResult::Semantic),
            (ArchitectureTag::Semantic, OutputShape::Boxes { .. }) => {
                Err(DetPostError::UnexpectedShape {
                    arch,
                    reason: "semantic decoding needs a grid shape",
                })
            }
            (_, OutputShape::Boxes { num_boxes }) => self
                .detect_boxes(output.data, num_boxes, frame)
                .map(PostProcessResult::Detections),
            (_, OutputShape::Grid { .. }) => Err(DetPostError::UnexpectedShape {
                arch,
                reason: "box decoding needs a box count",
            }),
        }
    }

    /// Runs a box architecture over `num_boxes` slots.
    pub fn detect(
        &self,
        data: &[f32],
        num_boxes: usize,
        frame: FrameSize,
    ) -> DetPostResult<Vec<Detection>> {
        self.process(ModelOutput::boxes(data, num_boxes), frame)?
            .into_detections()
            .ok_or(DetPostError::UnexpectedShape {
                arch: self.config.arch,
                reason: "architecture does not produce detections",
            })
    }

    /// Runs the semantic decoder over a `width x height` grid.
    pub fn segment(
        &self,
        data: &[f32],
        width: usize,
        height: usize,
        frame: FrameSize,
    ) -> DetPostResult<SemanticMap> {
        self.process(ModelOutput::grid(data, width, height), frame)?
            .into_semantic()
            .ok_or(DetPostError::UnexpectedShape {
                arch: self.config.arch,
                reason: "architecture does not produce a semantic map",
            })
    }

    fn detect_boxes(
        &self,
        data: &[f32],
        num_boxes: usize,
        frame: FrameSize,
    ) -> DetPostResult<Vec<Detection>> {
        let params = DecodeParams {
            num_classes: self.config.num_classes,
            confidence: self.config.thresholds.confidence,
            frame,
        };

        let start = Instant::now();
        let candidates = match self.config.arch {
            ArchitectureTag::YoloV5 => self.extract::<YoloV5>(data, num_boxes, params),
            ArchitectureTag::YoloV8 => self.extract::<YoloV8>(data, num_boxes, params),
            ArchitectureTag::YoloV10 => self.extract::<YoloV10>(data, num_boxes, params),
            ArchitectureTag::Ssd => self.extract::<Ssd>(data, num_boxes, params),
            ArchitectureTag::Semantic | ArchitectureTag::Unknown => {
                Err(DetPostError::UnsupportedArchitecture(self.config.arch))
            }
        }?;
        self.observer.record(Stage::Decode, start.elapsed());

        let detections = if self.config.arch.applies_nms() {
            let start = Instant::now();
            let kept = nms(&candidates, self.config.thresholds.iou);
            self.observer.record(Stage::Suppress, start.elapsed());
            kept
        } else {
            candidates.into_iter().map(Detection::from).collect()
        };

        Ok(self.cap(detections))
    }

    fn extract<D: BoxDecoder>(
        &self,
        data: &[f32],
        num_boxes: usize,
        params: DecodeParams,
    ) -> DetPostResult<Vec<Candidate>> {
        let _span = trace_span!("decode", layout = D::NAME, num_boxes = num_boxes).entered();

        #[cfg(feature = "rayon")]
        if self.config.parallel {
            let candidates = extract_par::<D>(data, num_boxes, params)?;
            trace_event!("candidates", count = candidates.len(), parallel = true);
            return Ok(candidates);
        }

        let candidates = D::extract(data, num_boxes, params)?;
        trace_event!("candidates", count = candidates.len());
        Ok(candidates)
    }

    fn segment_grid(
        &self,
        data: &[f32],
        width: usize,
        height: usize,
        frame: FrameSize,
    ) -> DetPostResult<SemanticMap> {
        let _span = trace_span!("segment", width = width, height = height).entered();
        let start = Instant::now();

        #[cfg(feature = "rayon")]
        let map = if self.config.parallel {
            decode_semantic_par(data, width, height, self.config.num_classes, frame)?
        } else {
            SemanticDecoder::decode(data, width, height, self.config.num_classes, frame)?
        };
        #[cfg(not(feature = "rayon"))]
        let map = SemanticDecoder::decode(data, width, height, self.config.num_classes, frame)?;

        self.observer.record(Stage::Segment, start.elapsed());
        Ok(map)
    }

    /// Applies `max_detections`, keeping the highest scores.
    fn cap(&self, detections: Vec<Detection>) -> Vec<Detection> {
        let Some(max) = self.config.max_detections else {
            return detections;
        };
        if detections.len() <= max {
            return detections;
        }
        if self.config.arch.applies_nms() {
            // NMS output is already sorted by descending score.
            let mut detections = detections;
            detections.truncate(max);
            return detections;
        }

        indices_by_score_desc(&detections, |d| d.score)
            .into_iter()
            .take(max)
            .map(|idx| detections[idx])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ArchitectureTag, PostProcessConfig, PostProcessor, Thresholds};
    use crate::decoder::FrameSize;

    #[test]
    fn cap_keeps_highest_scores_for_nms_free_output() {
        let data = [
            0.0, 0.0, 0.1, 0.1, 0.6, 0.0, //
            0.5, 0.5, 0.6, 0.6, 0.9, 1.0, //
            0.2, 0.2, 0.3, 0.3, 0.7, 2.0,
        ];
        let config = PostProcessConfig {
            max_detections: Some(2),
            ..PostProcessConfig::new(ArchitectureTag::YoloV10, Thresholds::new(0.5, 0.5), 3)
        };
        let processor = PostProcessor::new(config).unwrap();
        let detections = processor.detect(&data, 3, FrameSize::new(10, 10)).unwrap();
        let classes: Vec<_> = detections.iter().map(|d| d.class_index).collect();
        assert_eq!(classes, vec![1, 2]);
    }

    #[test]
    fn detect_on_semantic_processor_is_a_shape_error() {
        let config =
            PostProcessConfig::new(ArchitectureTag::Semantic, Thresholds::default(), 2);
        let processor = PostProcessor::new(config).unwrap();
        let err = processor
            .detect(&[0.0; 4], 1, FrameSize::new(4, 4))
            .unwrap_err();
        assert!(!err.is_configuration());
    }
}
