use serde::{Deserialize, Serialize};

/// Confidence threshold override for a single class.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelThreshold {
    pub id: isize,
    #[serde(default)]
    pub label: String,
    pub threshold: f32,
}

impl LabelThreshold {
    pub fn new(id: isize, label: &str, threshold: f32) -> Self {
        Self {
            id,
            label: label.to_string(),
            threshold,
        }
    }

    /// True when `conf` reaches this label's threshold.
    pub fn check_conf(&self, conf: f32) -> bool {
        conf >= self.threshold
    }

    /// Finds the threshold for `class_id`, or `default` when no override exists.
    pub fn threshold_for(overrides: &[LabelThreshold], class_id: isize, default: f32) -> f32 {
        overrides
            .iter()
            .find(|t| t.id == class_id)
            .map(|t| t.threshold)
            .unwrap_or(default)
    }
}
