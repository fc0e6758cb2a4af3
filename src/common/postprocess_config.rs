use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::common::{LabelThreshold, NmsMode};
use crate::data;
use crate::error::ConfigError;

const CONFIG_FILE_NAME: &str = "postprocess.json";

/// Settings for [`crate::detection_processing::PostProcessor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessConfig {
    /// Minimum confidence a box needs to survive filtering (inclusive).
    pub conf_threshold: f32,
    /// Boxes overlapping a kept box by strictly more than this IoU are suppressed.
    pub iou_threshold: f32,
    pub nms_mode: NmsMode,
    /// Upper bound on the number of boxes returned.
    pub max_detections: usize,
    /// Keep only these class ids (`None` keeps every class).
    pub wanted_labels: Option<Vec<isize>>,
    /// Per-class confidence overrides of `conf_threshold`.
    pub label_thresholds: Vec<LabelThreshold>,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            conf_threshold: 0.5,
            iou_threshold: 0.4,
            nms_mode: NmsMode::Global,
            max_detections: 50,
            wanted_labels: None,
            label_thresholds: vec![],
        }
    }
}

impl PostProcessConfig {
    pub fn new() -> Self {
        Default::default()
    }

    /// Higher thresholds, fewer detections.
    pub fn fast() -> Self {
        Self {
            conf_threshold: 0.6,
            iou_threshold: 0.5,
            max_detections: 20,
            ..Default::default()
        }
    }

    /// Lower thresholds, more detections.
    pub fn accurate() -> Self {
        Self {
            conf_threshold: 0.25,
            iou_threshold: 0.45,
            max_detections: 300,
            ..Default::default()
        }
    }

    /// COCO class 0 only.
    pub fn person_only() -> Self {
        Self {
            conf_threshold: 0.3,
            iou_threshold: 0.45,
            wanted_labels: Some(vec![0]),
            ..Default::default()
        }
    }

    pub fn with_conf_threshold(mut self, x: f32) -> Self {
        self.conf_threshold = x;
        self
    }

    pub fn with_iou_threshold(mut self, x: f32) -> Self {
        self.iou_threshold = x;
        self
    }

    pub fn with_nms_mode(mut self, mode: NmsMode) -> Self {
        self.nms_mode = mode;
        self
    }

    pub fn with_max_detections(mut self, n: usize) -> Self {
        self.max_detections = n;
        self
    }

    pub fn with_wanted_labels(mut self, labels: &[isize]) -> Self {
        self.wanted_labels = Some(labels.to_vec());
        self
    }

    pub fn with_label_threshold(mut self, threshold: LabelThreshold) -> Self {
        self.label_thresholds.retain(|t| t.id != threshold.id);
        self.label_thresholds.push(threshold);
        self
    }

    /// Confidence threshold that applies to `class_id`.
    pub fn threshold_for(&self, class_id: isize) -> f32 {
        LabelThreshold::threshold_for(&self.label_thresholds, class_id, self.conf_threshold)
    }

    pub fn is_label_wanted(&self, class_id: isize) -> bool {
        match &self.wanted_labels {
            Some(labels) => labels.contains(&class_id),
            None => true,
        }
    }

    /// Reads a JSON config. Missing fields take their default values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), contents)?;
        Ok(())
    }

    /// Loads `<config dir>/bvr/postprocess.json`, or the defaults when that file does not exist.
    pub fn load_default() -> anyhow::Result<Self> {
        let path = data::config_dir()?.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        log::info!("Loading post-processing config from {}", path.display());
        Ok(Self::load(&path)?)
    }

    pub fn to_string(&self) -> String {
        format!("Confidence Threshold: {}\n\
        IoU Threshold: {}\n\
        NMS Mode: {}\n\
        Max Detections: {}\n\
        Wanted Labels: {:?}\n\
        Label Overrides: {}",
                self.conf_threshold, self.iou_threshold, self.nms_mode.str(),
                self.max_detections, self.wanted_labels, self.label_thresholds.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = PostProcessConfig::default();
        assert_eq!(c.conf_threshold, 0.5);
        assert_eq!(c.iou_threshold, 0.4);
        assert_eq!(c.nms_mode, NmsMode::Global);
        assert_eq!(c.max_detections, 50);
        assert!(c.wanted_labels.is_none());
        assert!(c.is_label_wanted(42));
    }

    #[test]
    fn presets() {
        assert_eq!(PostProcessConfig::fast().max_detections, 20);
        assert_eq!(PostProcessConfig::accurate().conf_threshold, 0.25);
        let person = PostProcessConfig::person_only();
        assert!(person.is_label_wanted(0));
        assert!(!person.is_label_wanted(2));
    }

    #[test]
    fn label_override_replaces_previous() {
        let c = PostProcessConfig::new()
            .with_label_threshold(LabelThreshold::new(3, "motorcycle", 0.9))
            .with_label_threshold(LabelThreshold::new(3, "motorcycle", 0.7));
        assert_eq!(c.label_thresholds.len(), 1);
        assert_eq!(c.threshold_for(3), 0.7);
        assert_eq!(c.threshold_for(4), 0.5);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: PostProcessConfig = serde_json::from_str(r#"{"iou_threshold": 0.7, "nms_mode": "class_aware"}"#).unwrap();
        assert_eq!(c.iou_threshold, 0.7);
        assert_eq!(c.nms_mode, NmsMode::ClassAware);
        assert_eq!(c.conf_threshold, 0.5);
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!("bvr_vision_config_{}.json", std::process::id()));
        let c = PostProcessConfig::person_only()
            .with_max_detections(7)
            .with_label_threshold(LabelThreshold::new(0, "person", 0.45));
        c.save(&path).unwrap();
        let loaded = PostProcessConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, c);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let path = std::env::temp_dir().join(format!("bvr_vision_bad_{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = PostProcessConfig::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PostProcessConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
