mod bvr_box;
mod bvr_fingerprint;
mod bvr_image;
mod label_threshold;
mod nms_mode;
mod postprocess_config;

pub use bvr_box::*;
pub use bvr_fingerprint::*;
pub use bvr_image::*;
pub use label_threshold::*;
pub use nms_mode::*;
pub use postprocess_config::*;
