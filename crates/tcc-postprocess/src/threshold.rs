//! Step 1 of the post-processor pipeline: binarise the probability map.
//! The learned head is assumed to have absorbed the physical BT prior,
//! so intersection with a BT threshold is opt-in.

use tcc_common::{BtField, Mask, ProbMap};

pub fn binarise(prob: &ProbMap, prob_threshold: f32, bt: &BtField, bt_threshold_k: f32, intersect_bt_threshold: bool) -> Mask {
    let mut mask = Mask::zeros(prob.width, prob.height);
    for idx in 0..prob.data.len() {
        let above_prob = prob.data[idx] > prob_threshold;
        let keep = if intersect_bt_threshold {
            above_prob && bt.data[idx] < bt_threshold_k
        } else {
            above_prob
        };
        if keep {
            mask.data[idx] = 1;
        }
    }
    mask
}
