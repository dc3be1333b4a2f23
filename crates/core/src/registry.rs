//! Measurement point registry.
//!
//! Each [`Preset`] has its own hand-authored table of anatomical points
//! and a figure template they are anchored on. The tables share some
//! identifiers (`m_head`, `m_waist`, ...) but are not derived from one
//! another: `m_chest` exists only on the male figure, `m_bust` and
//! `m_underbust` only on the female one. Consumers must look points up by
//! id rather than assume both tables line up.

use serde::Serialize;

use crate::preset::Preset;

// ---------------------------------------------------------------------------
// Point identifiers
// ---------------------------------------------------------------------------

pub const POINT_HEIGHT: &str = "m_height";
pub const POINT_HEAD: &str = "m_head";
pub const POINT_NECK: &str = "m_neck";
pub const POINT_SHOULDER: &str = "m_shoulder";
pub const POINT_CHEST: &str = "m_chest";
pub const POINT_BUST: &str = "m_bust";
pub const POINT_UNDERBUST: &str = "m_underbust";
pub const POINT_ARM: &str = "m_arm";
pub const POINT_HAND: &str = "m_hand";
pub const POINT_WAIST: &str = "m_waist";
pub const POINT_HIP: &str = "m_hip";
pub const POINT_INSEAM: &str = "m_inseam";
pub const POINT_FOOT_LENGTH: &str = "m_foot_len";
pub const POINT_FOOT_WIDTH: &str = "m_foot_wid";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Side of the figure a point's input popup opens towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PopupSide {
    Left,
    Right,
}

/// Where a point sits on the figure, in coordinates normalized to the
/// figure's bounding box (`0.0..=1.0`, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
    pub side: PopupSide,
}

/// One annotatable anatomical location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementPointDef {
    pub id: &'static str,
    pub label: &'static str,
    pub anchor: Anchor,
}

/// Silhouette the points are drawn over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FigureTemplate {
    /// Asset name of the silhouette drawing.
    pub asset: &'static str,
    /// Width divided by height of the drawing.
    pub aspect_ratio: f32,
}

/// Everything needed to draw the capture overlay for one preset.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Registry {
    pub preset: Preset,
    pub figure: &'static FigureTemplate,
    pub points: &'static [MeasurementPointDef],
}

const fn point(
    id: &'static str,
    label: &'static str,
    x: f32,
    y: f32,
    side: PopupSide,
) -> MeasurementPointDef {
    MeasurementPointDef {
        id,
        label,
        anchor: Anchor { x, y, side },
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

static MALE_FIGURE: FigureTemplate = FigureTemplate {
    asset: "figure-male.svg",
    aspect_ratio: 0.42,
};

static FEMALE_FIGURE: FigureTemplate = FigureTemplate {
    asset: "figure-female.svg",
    aspect_ratio: 0.38,
};

static MALE_POINTS: [MeasurementPointDef; 12] = [
    point(POINT_HEIGHT, "Height", 0.92, 0.50, PopupSide::Right),
    point(POINT_HEAD, "Head circumference", 0.50, 0.05, PopupSide::Right),
    point(POINT_NECK, "Neck", 0.50, 0.14, PopupSide::Left),
    point(POINT_SHOULDER, "Shoulder width", 0.30, 0.19, PopupSide::Left),
    point(POINT_CHEST, "Chest", 0.50, 0.27, PopupSide::Right),
    point(POINT_ARM, "Arm length", 0.18, 0.36, PopupSide::Left),
    point(POINT_WAIST, "Waist", 0.50, 0.41, PopupSide::Right),
    point(POINT_HIP, "Hips", 0.50, 0.50, PopupSide::Left),
    point(POINT_HAND, "Hand length", 0.12, 0.53, PopupSide::Left),
    point(POINT_INSEAM, "Inseam", 0.50, 0.71, PopupSide::Right),
    point(POINT_FOOT_LENGTH, "Foot length", 0.42, 0.97, PopupSide::Left),
    point(POINT_FOOT_WIDTH, "Foot width", 0.60, 0.97, PopupSide::Right),
];

static FEMALE_POINTS: [MeasurementPointDef; 13] = [
    point(POINT_HEIGHT, "Height", 0.93, 0.50, PopupSide::Right),
    point(POINT_HEAD, "Head circumference", 0.50, 0.05, PopupSide::Right),
    point(POINT_NECK, "Neck", 0.50, 0.15, PopupSide::Left),
    point(POINT_SHOULDER, "Shoulder width", 0.32, 0.20, PopupSide::Left),
    point(POINT_BUST, "Bust", 0.50, 0.28, PopupSide::Right),
    point(POINT_UNDERBUST, "Underbust", 0.50, 0.33, PopupSide::Left),
    point(POINT_ARM, "Arm length", 0.20, 0.37, PopupSide::Left),
    point(POINT_WAIST, "Waist", 0.50, 0.40, PopupSide::Right),
    point(POINT_HIP, "Hips", 0.50, 0.52, PopupSide::Left),
    point(POINT_HAND, "Hand length", 0.14, 0.54, PopupSide::Left),
    point(POINT_INSEAM, "Inseam", 0.50, 0.72, PopupSide::Right),
    point(POINT_FOOT_LENGTH, "Foot length", 0.43, 0.97, PopupSide::Left),
    point(POINT_FOOT_WIDTH, "Foot width", 0.59, 0.97, PopupSide::Right),
];

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Registry (figure plus ordered points) for a preset.
pub fn registry(preset: Preset) -> Registry {
    match preset {
        Preset::Male => Registry {
            preset,
            figure: &MALE_FIGURE,
            points: &MALE_POINTS,
        },
        Preset::Female => Registry {
            preset,
            figure: &FEMALE_FIGURE,
            points: &FEMALE_POINTS,
        },
    }
}

/// Find a point definition by id within a preset's table.
pub fn find_point(preset: Preset, id: &str) -> Option<&'static MeasurementPointDef> {
    registry(preset).points.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn chest_and_bust_are_variant_specific() {
        assert!(find_point(Preset::Male, POINT_CHEST).is_some());
        assert!(find_point(Preset::Male, POINT_BUST).is_none());
        assert!(find_point(Preset::Female, POINT_BUST).is_some());
        assert!(find_point(Preset::Female, POINT_UNDERBUST).is_some());
        assert!(find_point(Preset::Female, POINT_CHEST).is_none());
    }

    #[test]
    fn shared_points_exist_in_both() {
        for id in [POINT_HEAD, POINT_WAIST, POINT_HIP, POINT_HEIGHT] {
            assert!(find_point(Preset::Male, id).is_some(), "male missing {id}");
            assert!(find_point(Preset::Female, id).is_some(), "female missing {id}");
        }
    }

    #[test]
    fn ids_unique_and_anchors_normalized() {
        for preset in [Preset::Male, Preset::Female] {
            let reg = registry(preset);
            let ids: HashSet<_> = reg.points.iter().map(|p| p.id).collect();
            assert_eq!(ids.len(), reg.points.len());
            for p in reg.points {
                assert!((0.0..=1.0).contains(&p.anchor.x), "{} x out of range", p.id);
                assert!((0.0..=1.0).contains(&p.anchor.y), "{} y out of range", p.id);
            }
        }
    }

    #[test]
    fn figures_differ_per_preset() {
        assert_ne!(
            registry(Preset::Male).figure.asset,
            registry(Preset::Female).figure.asset
        );
    }
}
