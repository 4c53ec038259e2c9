//! Greedy non-maximum suppression over decoded candidates.

use crate::candidate::order::indices_by_score_desc;
use crate::candidate::{Candidate, Detection};
use crate::geometry::iou;
use crate::trace::{trace_event, trace_span};

/// Applies class-agnostic greedy NMS.
///
/// Candidates are visited by descending score. The best remaining candidate
/// is kept and every remaining candidate whose IoU with it is at least
/// `iou_threshold` is dropped, regardless of class. Kept detections come out
/// in descending score order.
pub fn nms(candidates: &[Candidate], iou_threshold: f32) -> Vec<Detection> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let _span = trace_span!("nms", candidates = candidates.len()).entered();

    let mut remaining = indices_by_score_desc(candidates, |c| c.score);
    let mut kept: Vec<usize> = Vec::new();

    while let Some((&best, rest)) = remaining.split_first() {
        kept.push(best);
        let best_rect = candidates[best].rect;
        remaining = rest
            .iter()
            .copied()
            .filter(|&idx| iou(&best_rect, &candidates[idx].rect) < iou_threshold)
            .collect();
    }

    trace_event!("nms_kept", kept = kept.len(), dropped = candidates.len() - kept.len());
    kept.into_iter()
        .map(|idx| Detection::from(candidates[idx]))
        .collect()
}
