//! Decoded candidates, final detections and suppression.
//!
//! Includes deterministic score ordering and greedy non-maximum suppression.

pub(crate) mod nms;
pub(crate) mod order;

use crate::geometry::{Point, Rect};

/// Unfiltered detection produced directly by a decoder, in frame pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Box in original-frame pixel space.
    pub rect: Rect,
    /// Confidence used for thresholding and ordering.
    pub score: f32,
    /// Index of the winning class.
    pub class_index: usize,
}

/// Final pixel-space detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub top_left: Point,
    pub bottom_right: Point,
    pub score: f32,
    pub class_index: usize,
}

impl Detection {
    /// Returns the detection box as a `Rect`.
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.top_left, self.bottom_right)
    }
}

impl From<Candidate> for Detection {
    fn from(candidate: Candidate) -> Self {
        Self {
            top_left: candidate.rect.top_left(),
            bottom_right: candidate.rect.bottom_right(),
            score: candidate.score,
            class_index: candidate.class_index,
        }
    }
}
