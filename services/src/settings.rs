use std::num::NonZeroU32;

use util::config;

/// Tunables for attendance bookkeeping that would otherwise be literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSettings {
    /// Denominator for attendance percentages.
    pub total_classes: NonZeroU32,
    /// Stored when a scan carries no location.
    pub default_location: String,
    /// Tag placed before the session id in QR payloads.
    pub qr_prefix: String,
}

impl AttendanceSettings {
    pub fn from_config() -> Self {
        Self {
            total_classes: NonZeroU32::new(config::total_classes()).unwrap_or(NonZeroU32::MIN),
            default_location: config::default_location(),
            qr_prefix: config::qr_prefix(),
        }
    }
}

impl Default for AttendanceSettings {
    fn default() -> Self {
        Self {
            total_classes: NonZeroU32::new(50).unwrap_or(NonZeroU32::MIN),
            default_location: "Campus GPS".to_owned(),
            qr_prefix: "NEVO".to_owned(),
        }
    }
}
