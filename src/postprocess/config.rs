//! Model-level post-processing configuration.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::util::{DetPostError, DetPostResult};

/// Output layout family of a model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ArchitectureTag {
    /// `[num_boxes, 5 + nc]` rows with objectness (also YOLOv6/v7).
    YoloV5,
    /// `[4 + nc, num_boxes]` transposed output (also YOLOv9/v11).
    YoloV8,
    /// NMS-free `[num_boxes, 6]` corner rows.
    YoloV10,
    /// `[num_detections, 7]` rows with a leading batch id.
    Ssd,
    /// Channel-last `[h, w, nc]` segmentation map.
    Semantic,
    #[default]
    Unknown,
}

impl ArchitectureTag {
    pub fn name(&self) -> &'static str {
        match self {
            Self::YoloV5 => "yolov5",
            Self::YoloV8 => "yolov8",
            Self::YoloV10 => "yolov10",
            Self::Ssd => "ssd",
            Self::Semantic => "semantic",
            Self::Unknown => "unknown",
        }
    }

    /// True for layouts that produce boxes.
    pub fn is_detector(&self) -> bool {
        matches!(
            self,
            Self::YoloV5 | Self::YoloV8 | Self::YoloV10 | Self::Ssd
        )
    }

    /// True when decoded candidates go through NMS.
    pub fn applies_nms(&self) -> bool {
        matches!(self, Self::YoloV5 | Self::YoloV8 | Self::Ssd)
    }

    /// True when the decoder reads class channels and needs a class count.
    pub fn requires_class_count(&self) -> bool {
        matches!(self, Self::YoloV5 | Self::YoloV8 | Self::Semantic)
    }
}

impl fmt::Display for ArchitectureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArchitectureTag {
    type Err = Infallible;

    /// Parses common model family names; anything else is `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase().replace(['_', '-', ' '], "");
        Ok(match lower.as_str() {
            "yolov5" | "yolo5" | "v5" | "yolov6" | "yolov7" => Self::YoloV5,
            "yolov8" | "yolo8" | "v8" | "yolov9" | "yolov11" => Self::YoloV8,
            "yolov10" | "yolo10" | "v10" => Self::YoloV10,
            "ssd" => Self::Ssd,
            "semantic" | "semanticsegmentation" | "segmentation" => Self::Semantic,
            _ => Self::Unknown,
        })
    }
}

/// Score and overlap thresholds for one model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// Minimum score; candidates must be strictly above it.
    pub confidence: f32,
    /// Candidates overlapping a kept box with IoU at or above this are dropped.
    pub iou: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            confidence: 0.5,
            iou: 0.45,
        }
    }
}

impl Thresholds {
    pub fn new(confidence: f32, iou: f32) -> Self {
        Self { confidence, iou }
    }

    /// Checks that `confidence` lies in `(0, 1]` and `iou` in `[0, 1)`.
    pub fn validate(&self) -> DetPostResult<()> {
        if !(self.confidence > 0.0 && self.confidence <= 1.0) {
            return Err(DetPostError::InvalidThreshold {
                name: "confidence",
                value: self.confidence,
            });
        }
        if !(0.0..1.0).contains(&self.iou) {
            return Err(DetPostError::InvalidThreshold {
                name: "iou",
                value: self.iou,
            });
        }
        Ok(())
    }
}

/// Configuration for a [`PostProcessor`](crate::PostProcessor).
///
/// Set once when a model is loaded and read-only afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostProcessConfig {
    pub arch: ArchitectureTag,
    pub thresholds: Thresholds,
    /// Class channels in the output; required by YOLOv5, YOLOv8 and semantic.
    pub num_classes: usize,
    /// Keeps at most this many detections, highest scores first.
    pub max_detections: Option<usize>,
    /// Decode in parallel when the `rayon` feature is enabled.
    pub parallel: bool,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            arch: ArchitectureTag::Unknown,
            thresholds: Thresholds::default(),
            num_classes: 0,
            max_detections: None,
            parallel: false,
        }
    }
}

impl PostProcessConfig {
    pub fn new(arch: ArchitectureTag, thresholds: Thresholds, num_classes: usize) -> Self {
        Self {
            arch,
            thresholds,
            num_classes,
            ..Self::default()
        }
    }

    /// Rejects unusable configurations before any decode work.
    pub fn validate(&self) -> DetPostResult<()> {
        if self.arch == ArchitectureTag::Unknown {
            return Err(DetPostError::UnsupportedArchitecture(self.arch));
        }
        if self.arch.requires_class_count() && self.num_classes == 0 {
            return Err(DetPostError::InvalidClassCount {
                arch: self.arch,
                num_classes: self.num_classes,
            });
        }
        self.thresholds.validate()
    }
}
