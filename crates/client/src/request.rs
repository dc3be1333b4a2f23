//! Request bodies for the reconstruction service.
//!
//! Each workflow has its own statically shaped payload. The payload is
//! always wrapped in a single top-level `input` field.

use serde::Serialize;
use twin_core::capture::MeasurementFields;
use twin_core::preset::Preset;
use twin_core::roles::REQUIRED_ROLES;

use crate::encoding::EncodedPhoto;

/// Texture resolution requested for generated models.
pub const TEXTURE_RESOLUTION: u32 = 2048;

#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub input: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhotoSet {
    /// Base64 photos in role order; the service assigns roles itself.
    pub unordered: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyPayload {
    pub photos: PhotoSet,
    pub required_roles: Vec<&'static str>,
    #[serde(rename = "allowPartial")]
    pub allow_partial: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratePayload {
    #[serde(flatten)]
    pub base: VerifyPayload,
    #[serde(rename = "texRes")]
    pub tex_res: u32,
    pub preset: Preset,
    #[serde(flatten)]
    pub measurements: MeasurementFields,
}

/// Photo check only.
pub fn build_verify(photos: Vec<EncodedPhoto>) -> Envelope<VerifyPayload> {
    Envelope {
        input: verify_payload(photos),
    }
}

/// Photo check plus model generation.
pub fn build_generate(
    photos: Vec<EncodedPhoto>,
    preset: Preset,
    measurements: MeasurementFields,
) -> Envelope<GeneratePayload> {
    Envelope {
        input: GeneratePayload {
            base: verify_payload(photos),
            tex_res: TEXTURE_RESOLUTION,
            preset,
            measurements,
        },
    }
}

fn verify_payload(photos: Vec<EncodedPhoto>) -> VerifyPayload {
    VerifyPayload {
        photos: PhotoSet {
            unordered: photos.into_iter().map(|p| p.data).collect(),
        },
        required_roles: REQUIRED_ROLES.iter().map(|r| r.as_str()).collect(),
        allow_partial: false,
    }
}

#[cfg(test)]
mod tests {
    use twin_core::roles::Role;

    use super::*;

    fn photos() -> Vec<EncodedPhoto> {
        vec![
            EncodedPhoto { role: Role::Front, data: "Zg==".into() },
            EncodedPhoto { role: Role::Side, data: "cw==".into() },
            EncodedPhoto { role: Role::Back, data: "Yg==".into() },
        ]
    }

    #[test]
    fn verify_body_shape() {
        let json = serde_json::to_value(build_verify(photos())).unwrap();
        let input = json["input"].as_object().unwrap();

        assert_eq!(json.as_object().unwrap().len(), 1);
        assert_eq!(input.len(), 3);
        assert_eq!(json["input"]["photos"]["unordered"], serde_json::json!(["Zg==", "cw==", "Yg=="]));
        assert_eq!(json["input"]["required_roles"], serde_json::json!(["front", "side", "back"]));
        assert_eq!(json["input"]["allowPartial"], false);
    }

    #[test]
    fn generate_body_adds_preset_texres_and_measurements() {
        let measurements = MeasurementFields {
            height: Some(180.0),
            chest: Some(100.0),
            ..Default::default()
        };
        let json =
            serde_json::to_value(build_generate(photos(), Preset::Male, measurements)).unwrap();
        let input = &json["input"];

        assert_eq!(input["texRes"], 2048);
        assert_eq!(input["preset"], "male");
        assert_eq!(input["height"], 180.0);
        assert_eq!(input["chest"], 100.0);
        assert!(input.get("waist").is_none());
        assert_eq!(input["allowPartial"], false);
        assert_eq!(input["required_roles"], serde_json::json!(["front", "side", "back"]));
    }
}
