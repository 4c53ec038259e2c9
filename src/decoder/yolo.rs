//! YOLO output layouts.
//!
//! | Layout  | Shape                  | Row / column contents                  |
//! |---------|------------------------|----------------------------------------|
//! | YOLOv5  | `[num_boxes, 5 + nc]`  | `cx, cy, w, h, objectness, probs...`   |
//! | YOLOv8  | `[4 + nc, num_boxes]`  | channel-major, one column per box      |
//! | YOLOv10 | `[num_boxes, 6]`       | `x1, y1, x2, y2, score, class_id`      |
//!
//! YOLOv5 and YOLOv8 boxes are normalized center/size; YOLOv10 boxes are
//! normalized corners and come out of the model already suppressed.

use crate::candidate::Candidate;
use crate::decoder::{corner_box_to_rect, BoxDecoder, DecodeParams, FrameSize};
use crate::geometry::Rect;
use crate::postprocess::ArchitectureTag;
use crate::tensor::TensorView;
use crate::util::math::{above, argmax_first, class_id_from_f32, to_pixels};
use crate::util::{DetPostError, DetPostResult};

/// YOLOv5 / v6 / v7 style rows with objectness.
pub struct YoloV5;

/// YOLOv8 / v9 / v11 style transposed output without objectness.
pub struct YoloV8;

/// NMS-free YOLOv10 rows.
pub struct YoloV10;

const V5_PREFIX: usize = 5;
const V8_PREFIX: usize = 4;
const V10_COLS: usize = 6;

fn require_classes(arch: ArchitectureTag, num_classes: usize) -> DetPostResult<()> {
    if num_classes == 0 {
        return Err(DetPostError::InvalidClassCount { arch, num_classes });
    }
    Ok(())
}

fn channels(prefix: usize, num_classes: usize, num_boxes: usize) -> DetPostResult<usize> {
    prefix
        .checked_add(num_classes)
        .ok_or(DetPostError::InvalidDimensions {
            width: num_classes,
            height: num_boxes,
        })
}

/// Converts a normalized center/size box to a pixel rect.
fn center_box_to_rect(cx: f32, cy: f32, w: f32, h: f32, frame: FrameSize) -> Rect {
    Rect::new(
        to_pixels(cx - w / 2.0, frame.width),
        to_pixels(cy - h / 2.0, frame.height),
        to_pixels(w, frame.width),
        to_pixels(h, frame.height),
    )
}

impl BoxDecoder for YoloV5 {
    const NAME: &'static str = "yolov5";

    fn view<'a>(
        data: &'a [f32],
        num_boxes: usize,
        num_classes: usize,
    ) -> DetPostResult<TensorView<'a>> {
        require_classes(ArchitectureTag::YoloV5, num_classes)?;
        let cols = channels(V5_PREFIX, num_classes, num_boxes)?;
        TensorView::new(data, num_boxes, cols)
    }

    fn decode_box(
        view: &TensorView<'_>,
        idx: usize,
        params: &DecodeParams,
    ) -> DetPostResult<Option<Candidate>> {
        let Some(row) = view.row(idx) else {
            return Ok(None);
        };
        let objectness = row[4];
        if !above(objectness, params.confidence) {
            return Ok(None);
        }

        let Some((class_index, best)) = argmax_first(row[V5_PREFIX..].iter().copied()) else {
            return Ok(None);
        };
        let score = objectness * best;
        if !above(score, params.confidence) {
            return Ok(None);
        }

        Ok(Some(Candidate {
            rect: center_box_to_rect(row[0], row[1], row[2], row[3], params.frame),
            score,
            class_index,
        }))
    }
}

impl BoxDecoder for YoloV8 {
    const NAME: &'static str = "yolov8";

    fn view<'a>(
        data: &'a [f32],
        num_boxes: usize,
        num_classes: usize,
    ) -> DetPostResult<TensorView<'a>> {
        require_classes(ArchitectureTag::YoloV8, num_classes)?;
        let rows = channels(V8_PREFIX, num_classes, num_boxes)?;
        TensorView::new(data, rows, num_boxes)
    }

    fn decode_box(
        view: &TensorView<'_>,
        idx: usize,
        params: &DecodeParams,
    ) -> DetPostResult<Option<Candidate>> {
        let Some((class_index, best)) =
            argmax_first(view.column_range(idx, V8_PREFIX, view.rows()))
        else {
            return Ok(None);
        };
        if !above(best, params.confidence) {
            return Ok(None);
        }

        let mut geometry = view.column_range(idx, 0, V8_PREFIX);
        let (Some(cx), Some(cy), Some(w), Some(h)) = (
            geometry.next(),
            geometry.next(),
            geometry.next(),
            geometry.next(),
        ) else {
            return Ok(None);
        };

        Ok(Some(Candidate {
            rect: center_box_to_rect(cx, cy, w, h, params.frame),
            score: best,
            class_index,
        }))
    }
}

impl BoxDecoder for YoloV10 {
    const NAME: &'static str = "yolov10";

    fn view<'a>(
        data: &'a [f32],
        num_boxes: usize,
        _num_classes: usize,
    ) -> DetPostResult<TensorView<'a>> {
        TensorView::new(data, num_boxes, V10_COLS)
    }

    fn decode_box(
        view: &TensorView<'_>,
        idx: usize,
        params: &DecodeParams,
    ) -> DetPostResult<Option<Candidate>> {
        let Some(row) = view.row(idx) else {
            return Ok(None);
        };
        let score = row[4];
        if !above(score, params.confidence) {
            return Ok(None);
        }
        let class_index = class_id_from_f32(row[5])
            .ok_or(DetPostError::InvalidClassId { row: idx, value: row[5] })?;

        Ok(Some(Candidate {
            rect: corner_box_to_rect(row[0], row[1], row[2], row[3], params.frame),
            score,
            class_index,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::{YoloV10, YoloV5, YoloV8};
    use crate::decoder::{BoxDecoder, DecodeParams, FrameSize};
    use crate::geometry::Rect;
    use crate::util::DetPostError;

    fn params(num_classes: usize, confidence: f32, frame: FrameSize) -> DecodeParams {
        DecodeParams {
            num_classes,
            confidence,
            frame,
        }
    }

    #[test]
    fn v5_requires_both_thresholds() {
        // Second row: objectness passes but the combined score does not.
        let data = [
            0.5, 0.5, 0.2, 0.2, 0.9, 0.1, 0.9, //
            0.5, 0.5, 0.2, 0.2, 0.6, 0.7, 0.2, //
            0.5, 0.5, 0.2, 0.2, 0.4, 1.0, 1.0,
        ];
        let out = YoloV5::extract(&data, 3, params(2, 0.5, FrameSize::new(100, 100))).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].class_index, 1);
        assert!((out[0].score - 0.81).abs() < 1e-5);
    }

    #[test]
    fn v5_skips_nan_class_scores() {
        let data = [0.5, 0.5, 0.2, 0.2, 0.9, f32::NAN, 0.9];
        let out = YoloV5::extract(&data, 1, params(2, 0.5, FrameSize::new(100, 100))).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].class_index, 1);
        assert!((out[0].score - 0.81).abs() < 1e-5);
    }

    #[test]
    fn v5_drops_rows_with_only_nan_class_scores() {
        let data = [0.5, 0.5, 0.2, 0.2, 0.9, f32::NAN, f32::NAN];
        let out = YoloV5::extract(&data, 1, params(2, 0.5, FrameSize::new(100, 100))).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn v5_rejects_zero_classes() {
        let err = YoloV5::extract(&[0.0; 5], 1, params(0, 0.5, FrameSize::new(10, 10)))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn v8_reads_transposed_columns() {
        // Two boxes, two classes: rows are cx, cy, w, h, class0, class1.
        let data = [
            0.25, 0.75, //
            0.25, 0.75, //
            0.5, 0.25, //
            0.5, 0.25, //
            0.2, 0.3, //
            0.8, 0.9,
        ];
        let out = YoloV8::extract(&data, 2, params(2, 0.5, FrameSize::new(200, 100))).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].class_index, 1);
        assert_eq!(out[0].rect, Rect::new(0, 0, 100, 50));
        assert!((out[1].score - 0.9).abs() < 1e-6);
        assert_eq!(out[1].rect, Rect::new(125, 62, 50, 25));
    }

    #[test]
    fn v8_skips_nan_class_scores() {
        // One box, two classes, first class score is NaN.
        let data = [0.5, 0.5, 0.5, 0.5, f32::NAN, 0.9];
        let out = YoloV8::extract(&data, 1, params(2, 0.5, FrameSize::new(200, 100))).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].class_index, 1);
        assert!((out[0].score - 0.9).abs() < 1e-6);
        assert_eq!(out[0].rect, Rect::new(50, 25, 100, 50));
    }

    #[test]
    fn v10_rejects_negative_class_ids() {
        let data = [0.1, 0.1, 0.5, 0.5, 0.8, -1.0];
        let err = YoloV10::extract(&data, 1, params(0, 0.5, FrameSize::new(10, 10)))
            .unwrap_err();
        assert_eq!(err, DetPostError::InvalidClassId { row: 0, value: -1.0 });
    }

    #[test]
    fn v10_ignores_class_ids_below_threshold() {
        let data = [0.1, 0.1, 0.5, 0.5, 0.1, -1.0];
        let out = YoloV10::extract(&data, 1, params(0, 0.5, FrameSize::new(10, 10))).unwrap();
        assert!(out.is_empty());
    }
}
