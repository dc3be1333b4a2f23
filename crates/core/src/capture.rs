//! Measurement capture: values typed into the figure overlay.
//!
//! Values are keyed by registry point id and are always positive
//! centimeters. Clearing an input, or typing anything that is not a
//! positive number, removes the entry; nothing else does. Switching the
//! preset only changes which points are shown, so values entered on the
//! other figure are kept and still flattened into the request. No
//! anatomical plausibility checks are made here; the service owns that.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::preset::Preset;
use crate::registry::{self, MeasurementPointDef, PopupSide, Registry};

/// Point id → value in centimeters.
pub type MeasurementValues = BTreeMap<String, f64>;

/// One point of the overlay as it should be drawn.
#[derive(Debug, Clone, Serialize)]
pub struct OverlayPoint {
    pub def: &'static MeasurementPointDef,
    pub value: Option<f64>,
    pub popup: PopupSide,
}

/// Measurements flattened to the service's field names.
///
/// Only filled fields are serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeasurementFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chest: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hips: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shoulder: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inseam: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foot_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foot_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neck: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand: Option<f64>,
}

impl MeasurementFields {
    /// Map point ids to service field names.
    ///
    /// `m_chest` and `m_bust` both feed `chest`; when both are filled the
    /// chest value wins. Points without a service field (`m_underbust`)
    /// are not sent.
    pub fn from_values(values: &MeasurementValues) -> Self {
        let get = |id: &str| values.get(id).copied();
        Self {
            height: get(registry::POINT_HEIGHT),
            chest: get(registry::POINT_CHEST).or_else(|| get(registry::POINT_BUST)),
            waist: get(registry::POINT_WAIST),
            hips: get(registry::POINT_HIP),
            shoulder: get(registry::POINT_SHOULDER),
            inseam: get(registry::POINT_INSEAM),
            arm: get(registry::POINT_ARM),
            foot_length: get(registry::POINT_FOOT_LENGTH),
            foot_width: get(registry::POINT_FOOT_WIDTH),
            neck: get(registry::POINT_NECK),
            head: get(registry::POINT_HEAD),
            hand: get(registry::POINT_HAND),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parse raw input text into a measurement.
///
/// Returns `None` for empty, non-numeric, non-finite or non-positive
/// input. A decimal comma is accepted.
pub fn parse_measurement(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().replace(',', ".").parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Collected measurements for the currently selected preset.
#[derive(Debug, Clone)]
pub struct MeasurementCapture {
    preset: Preset,
    values: MeasurementValues,
}

impl MeasurementCapture {
    pub fn new(preset: Preset) -> Self {
        Self {
            preset,
            values: MeasurementValues::new(),
        }
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn registry(&self) -> Registry {
        registry::registry(self.preset)
    }

    pub fn values(&self) -> &MeasurementValues {
        &self.values
    }

    /// Switch the figure. Stored values are kept, including those for
    /// points the new figure does not show.
    pub fn select_preset(&mut self, preset: Preset) {
        if preset == self.preset {
            return;
        }
        self.preset = preset;
        let hidden = self
            .values
            .keys()
            .filter(|id| registry::find_point(preset, id).is_none())
            .count();
        tracing::debug!(preset = %preset, hidden, "Measurement preset changed");
    }

    /// Apply the raw text typed into a point's input.
    ///
    /// Returns the stored value, or `None` when the entry was removed.
    pub fn input(&mut self, point_id: &str, raw: &str) -> Result<Option<f64>, CoreError> {
        let def = registry::find_point(self.preset, point_id)
            .ok_or_else(|| CoreError::UnknownMeasurementPoint(point_id.to_string()))?;

        match parse_measurement(raw) {
            Some(value) => {
                self.values.insert(def.id.to_string(), value);
                Ok(Some(value))
            }
            None => {
                self.values.remove(def.id);
                Ok(None)
            }
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Points of the current figure with their current values.
    pub fn overlay(&self) -> Vec<OverlayPoint> {
        self.registry()
            .points
            .iter()
            .map(|def| OverlayPoint {
                def,
                value: self.values.get(def.id).copied(),
                popup: def.anchor.side,
            })
            .collect()
    }

    pub fn flatten(&self) -> MeasurementFields {
        MeasurementFields::from_values(&self.values)
    }
}
