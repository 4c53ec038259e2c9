//! Semantic segmentation maps.
//!
//! The output tensor is channel-last, `[out_h, out_w, num_classes]`. Every
//! grid cell yields exactly one [`SemanticPixel`] holding the arg-max class
//! and the cell position rescaled to the original frame.

use crate::decoder::FrameSize;
use crate::geometry::Point;
use crate::postprocess::ArchitectureTag;
use crate::tensor::TensorView;
use crate::util::math::{argmax_first, grid_to_frame};
use crate::util::{DetPostError, DetPostResult};

/// Class assignment for one output cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SemanticPixel {
    /// Cell position in original-frame pixels.
    pub pixel: Point,
    pub class_index: usize,
}

/// Per-cell class map in row-major grid order.
#[derive(Clone, Debug, PartialEq)]
pub struct SemanticMap {
    grid_width: usize,
    grid_height: usize,
    pixels: Vec<SemanticPixel>,
}

impl SemanticMap {
    pub fn grid_width(&self) -> usize {
        self.grid_width
    }

    pub fn grid_height(&self) -> usize {
        self.grid_height
    }

    pub fn pixels(&self) -> &[SemanticPixel] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<SemanticPixel> {
        self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Returns the class of grid cell `(x, y)`.
    pub fn class_at(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.grid_width || y >= self.grid_height {
            return None;
        }
        self.pixels
            .get(y * self.grid_width + x)
            .map(|p| p.class_index)
    }

    /// Counts cells per class; index `c` holds the count for class `c`.
    pub fn class_histogram(&self) -> Vec<usize> {
        let mut counts = Vec::new();
        for pixel in &self.pixels {
            if pixel.class_index >= counts.len() {
                counts.resize(pixel.class_index + 1, 0);
            }
            counts[pixel.class_index] += 1;
        }
        counts
    }
}

/// Decoder for channel-last segmentation outputs.
pub struct SemanticDecoder;

/// Validated grid geometry shared by the sequential and parallel paths.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Grid {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) frame: FrameSize,
}

impl Grid {
    pub(crate) fn view<'a>(
        data: &'a [f32],
        width: usize,
        height: usize,
        num_classes: usize,
        frame: FrameSize,
    ) -> DetPostResult<(Self, TensorView<'a>)> {
        if num_classes == 0 {
            return Err(DetPostError::InvalidClassCount {
                arch: ArchitectureTag::Semantic,
                num_classes,
            });
        }
        if width == 0 || height == 0 {
            return Err(DetPostError::InvalidDimensions { width, height });
        }
        frame.validate()?;
        let cells = width
            .checked_mul(height)
            .ok_or(DetPostError::InvalidDimensions { width, height })?;
        let view = TensorView::new(data, cells, num_classes)?;
        Ok((
            Self {
                width,
                height,
                frame,
            },
            view,
        ))
    }

    /// Classifies cell `(x, y)`.
    ///
    /// NaN scores are skipped; a cell with no numeric score is an error.
    #[inline]
    pub(crate) fn pixel(
        &self,
        view: &TensorView<'_>,
        x: usize,
        y: usize,
    ) -> DetPostResult<SemanticPixel> {
        let cell = y * self.width + x;
        let (class_index, _) = view
            .row(cell)
            .and_then(|scores| argmax_first(scores.iter().copied()))
            .ok_or(DetPostError::NanScores { cell })?;
        Ok(SemanticPixel {
            pixel: Point::new(
                grid_to_frame(x, self.width, self.frame.width),
                grid_to_frame(y, self.height, self.frame.height),
            ),
            class_index,
        })
    }

    pub(crate) fn into_map(self, pixels: Vec<SemanticPixel>) -> SemanticMap {
        SemanticMap {
            grid_width: self.width,
            grid_height: self.height,
            pixels,
        }
    }
}

impl SemanticDecoder {
    /// Decodes a `[out_h, out_w, num_classes]` buffer into a class map.
    pub fn decode(
        data: &[f32],
        out_width: usize,
        out_height: usize,
        num_classes: usize,
        frame: FrameSize,
    ) -> DetPostResult<SemanticMap> {
        let (grid, view) = Grid::view(data, out_width, out_height, num_classes, frame)?;

        let mut pixels = Vec::with_capacity(out_width * out_height);
        for y in 0..grid.height {
            for x in 0..grid.width {
                pixels.push(grid.pixel(&view, x, y)?);
            }
        }
        Ok(grid.into_map(pixels))
    }
}
