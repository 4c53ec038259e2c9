//! Deterministic score ordering for candidates.

use std::cmp::Ordering;

fn score_cmp_desc(scores: &[f32], a: usize, b: usize) -> Ordering {
    scores[b].total_cmp(&scores[a]).then_with(|| a.cmp(&b))
}

/// Returns item indices ordered by descending score.
///
/// Equal scores keep their decode order (ascending index).
pub(crate) fn indices_by_score_desc<T>(items: &[T], score: impl Fn(&T) -> f32) -> Vec<usize> {
    let scores: Vec<f32> = items.iter().map(score).collect();
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| score_cmp_desc(&scores, a, b));
    order
}

#[cfg(test)]
mod tests {
    use super::indices_by_score_desc;
    use crate::candidate::Candidate;
    use crate::geometry::Rect;

    fn candidate(score: f32) -> Candidate {
        Candidate {
            rect: Rect::new(0, 0, 1, 1),
            score,
            class_index: 0,
        }
    }

    #[test]
    fn orders_by_score_then_index() {
        let candidates = [
            candidate(0.3),
            candidate(0.9),
            candidate(0.3),
            candidate(0.5),
        ];
        assert_eq!(
            indices_by_score_desc(&candidates, |c| c.score),
            vec![1, 3, 0, 2]
        );
    }

    #[test]
    fn empty_input_gives_empty_order() {
        let empty: [Candidate; 0] = [];
        assert!(indices_by_score_desc(&empty, |c| c.score).is_empty());
    }
}
