//! SSD detection rows.
//!
//! Each row is `[batch_id, ymin, xmin, ymax, xmax, class_id, score]` with
//! normalized corners. The batch id is ignored: one frame per call.

use crate::candidate::Candidate;
use crate::decoder::{corner_box_to_rect, BoxDecoder, DecodeParams};
use crate::tensor::TensorView;
use crate::util::math::{above, class_id_from_f32};
use crate::util::{DetPostError, DetPostResult};

/// SSD-style `[num_detections, 7]` output.
pub struct Ssd;

const SSD_COLS: usize = 7;

impl BoxDecoder for Ssd {
    const NAME: &'static str = "ssd";

    fn view<'a>(
        data: &'a [f32],
        num_boxes: usize,
        _num_classes: usize,
    ) -> DetPostResult<TensorView<'a>> {
        TensorView::new(data, num_boxes, SSD_COLS)
    }

    fn decode_box(
        view: &TensorView<'_>,
        idx: usize,
        params: &DecodeParams,
    ) -> DetPostResult<Option<Candidate>> {
        let Some(row) = view.row(idx) else {
            return Ok(None);
        };
        let score = row[6];
        if !above(score, params.confidence) {
            return Ok(None);
        }
        let class_index = class_id_from_f32(row[5])
            .ok_or(DetPostError::InvalidClassId { row: idx, value: row[5] })?;

        let (ymin, xmin, ymax, xmax) = (row[1], row[2], row[3], row[4]);
        Ok(Some(Candidate {
            rect: corner_box_to_rect(xmin, ymin, xmax, ymax, params.frame),
            score,
            class_index,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::Ssd;
    use crate::decoder::{BoxDecoder, DecodeParams, FrameSize};
    use crate::geometry::{Point, Rect};

    #[test]
    fn swaps_y_first_corners_into_rect() {
        let data = [0.0, 0.25, 0.5, 0.75, 1.0, 7.0, 0.9];
        let params = DecodeParams {
            num_classes: 0,
            confidence: 0.5,
            frame: FrameSize::new(400, 200),
        };
        let out = Ssd::extract(&data, 1, params).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].class_index, 7);
        assert_eq!(out[0].rect, Rect::new(200, 50, 200, 100));
        assert_eq!(out[0].rect.bottom_right(), Point::new(400, 150));
    }

    #[test]
    fn batch_id_is_ignored() {
        let data = [3.0, 0.0, 0.0, 0.5, 0.5, 1.0, 0.6];
        let params = DecodeParams {
            num_classes: 0,
            confidence: 0.5,
            frame: FrameSize::new(10, 10),
        };
        assert_eq!(Ssd::extract(&data, 1, params).unwrap().len(), 1);
    }
}
