//! Download filename convention for generated models.

use crate::preset::Preset;
use crate::types::Timestamp;

/// Filename for a downloaded model.
///
/// Convention: `digital-twin-{preset}-{YYYY-MM-DD}T{HH-MM-SS}.glb`, UTC,
/// second precision. Time separators are `-` so the name is safe on every
/// filesystem.
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use twin_core::naming::artifact_filename;
/// use twin_core::preset::Preset;
///
/// let at = chrono::Utc.with_ymd_and_hms(2026, 3, 1, 9, 5, 7).unwrap();
/// assert_eq!(
///     artifact_filename(Preset::Female, at),
///     "digital-twin-female-2026-03-01T09-05-07.glb"
/// );
/// ```
pub fn artifact_filename(preset: Preset, at: Timestamp) -> String {
    let stamp = at.format("%Y-%m-%dT%H:%M:%S").to_string().replace(':', "-");
    format!("digital-twin-{}-{stamp}.glb", preset.as_str())
}
