use serde::{Deserialize, Serialize};

/// Whether suppression crosses class boundaries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NmsMode {
    /// Any kept box suppresses any later overlapping box, whatever its class.
    #[default] Global,
    /// A kept box only suppresses later boxes with the same `class_id`.
    ClassAware,
}

// Storing the "proper" spelling and the lowercase version.
static GLOBAL: [&str; 2] = ["Global", "global"];
static CLASS_AWARE: [&str; 2] = ["ClassAware", "class_aware"];

impl NmsMode {
    pub fn from_str(mode: &str) -> Option<Self> {
        match mode.to_lowercase().as_str() {
            "global" => Some(NmsMode::Global),
            "class_aware" | "classaware" | "per_class" => Some(NmsMode::ClassAware),
            _ => None,
        }
    }

    pub fn str(&self) -> &'static str {
        match self {
            NmsMode::Global => GLOBAL[0],
            NmsMode::ClassAware => CLASS_AWARE[0],
        }
    }

    pub fn str_lowercase(&self) -> &'static str {
        match self {
            NmsMode::Global => GLOBAL[1],
            NmsMode::ClassAware => CLASS_AWARE[1],
        }
    }

    pub fn all_nms_modes() -> Vec<String> {
        vec![
            NmsMode::Global.str_lowercase().to_string(),
            NmsMode::ClassAware.str_lowercase().to_string(),
        ]
    }
}
