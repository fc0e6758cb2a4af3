pub mod nms;

use std::time::Instant;
use crate::common::{LabelThreshold, NmsMode, PostProcessConfig};
use crate::utils;

pub use nms::Nms;

/// Keeps boxes with `confidence >= threshold`, in their original order.
///
/// The threshold is taken literally, including values outside `[0, 1]`.
pub fn filter_by_confidence<T: Nms + Clone>(boxes: &[T], threshold: f32) -> Vec<T> {
    boxes
        .iter()
        .filter(|b| b.confidence() >= threshold)
        .cloned()
        .collect()
}

/// Like [`filter_by_confidence`] with a per-class threshold taken from `overrides`.
pub fn filter_by_label_thresholds<T: Nms + Clone>(boxes: &[T], default: f32, overrides: &[LabelThreshold]) -> Vec<T> {
    boxes
        .iter()
        .filter(|b| match overrides.iter().find(|t| t.id == b.class_id()) {
            Some(t) => t.check_conf(b.confidence()),
            None => b.confidence() >= default,
        })
        .cloned()
        .collect()
}

/// Keeps boxes whose class is in `wanted`. `None` keeps everything.
pub fn filter_by_labels<T: Nms + Clone>(boxes: &[T], wanted: Option<&[isize]>) -> Vec<T> {
    match wanted {
        None => boxes.to_vec(),
        Some(labels) => boxes
            .iter()
            .filter(|b| labels.contains(&b.class_id()))
            .cloned()
            .collect(),
    }
}

/// Class-agnostic greedy NMS. Returns survivors in descending confidence.
pub fn apply_nms<T: Nms + Clone>(boxes: &[T], iou_threshold: f32) -> Vec<T> {
    apply_nms_with_mode(boxes, iou_threshold, NmsMode::Global)
}

pub fn apply_nms_with_mode<T: Nms + Clone>(boxes: &[T], iou_threshold: f32, mode: NmsMode) -> Vec<T> {
    let mut kept = boxes.to_vec();
    nms::nms(&mut kept, iou_threshold, mode);
    kept
}

/// Confidence filter, label filter, NMS and truncation, driven by a [`PostProcessConfig`].
///
/// Holds nothing but its config, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct PostProcessor {
    config: PostProcessConfig,
}

impl PostProcessor {
    pub fn new(config: PostProcessConfig) -> Self {
        log::debug!("Post-processor config:\n{}", config.to_string());
        Self { config }
    }

    pub fn config(&self) -> &PostProcessConfig {
        &self.config
    }

    pub fn process<T: Nms + Clone>(&self, boxes: &[T]) -> Vec<T> {
        let start = Instant::now();
        let mut elapsed = start.elapsed();

        let filtered: Vec<T> = boxes
            .iter()
            .filter(|b| self.config.is_label_wanted(b.class_id()) && b.confidence() >= self.config.threshold_for(b.class_id()))
            .cloned()
            .collect();
        elapsed = utils::trace("POSTPROCESS", "Filtering", start, elapsed);

        let mut kept = apply_nms_with_mode(&filtered, self.config.iou_threshold, self.config.nms_mode);
        elapsed = utils::trace("POSTPROCESS", "NMS", start, elapsed);

        kept.truncate(self.config.max_detections);
        utils::trace("POSTPROCESS", "Truncate", start, elapsed);

        log::debug!(
            "Post-processing kept {} of {} boxes ({} after filtering, mode={})",
            kept.len(),
            boxes.len(),
            filtered.len(),
            self.config.nms_mode.str()
        );
        kept
    }
}
