//! Vendor station status codes
//!
//! The vendor reports `stubStatus` as a short code string. Only the codes
//! below are known; anything else is reported as unknown rather than failing.

use serde::Serialize;

/// Label reported for codes missing from the table
pub const UNKNOWN_LABEL: &str = "未知";

/// Charging station status derived from the vendor code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StationStatus {
    Idle,
    Charging,
    Plugged,
    Unknown,
}

impl StationStatus {
    // TODO: the vendor code list disagrees with itself on "01"/"0B" and omits
    // "02"/"03"; replace this table once the owner publishes a canonical one.
    pub fn from_code(code: &str) -> Self {
        match code {
            "00" => Self::Idle,
            "01" => Self::Charging,
            "0B" => Self::Plugged,
            _ => Self::Unknown,
        }
    }

    /// Vendor label, as shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "空闲",
            Self::Charging => "正在充电",
            Self::Plugged => "已插枪",
            Self::Unknown => UNKNOWN_LABEL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Charging => "charging",
            Self::Plugged => "plugged",
            Self::Unknown => "unknown",
        }
    }
}

/// Label for a raw vendor status code. Total over all inputs.
pub fn label_for(code: &str) -> &'static str {
    StationStatus::from_code(code).label()
}
