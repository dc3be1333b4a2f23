//! Decoding of the reconstruction service's reply.

use std::collections::BTreeMap;

use serde::Deserialize;
use twin_core::qa::{QaReport, RoleReportEntry};

/// Reply body. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceResponse {
    /// Absent means success.
    pub ok: Option<bool>,
    #[serde(default)]
    pub role_report: BTreeMap<String, RoleReportEntry>,
    #[serde(default)]
    pub retake_tips: Vec<String>,
    pub glb_b64: Option<String>,
    /// Server-side log text, echoed into the client log.
    pub log: Option<String>,
    pub error: Option<String>,
    pub lang: Option<String>,
}

impl ServiceResponse {
    /// Parse a reply, unwrapping the serverless `output` envelope if the
    /// endpoint returned one.
    pub fn from_json(mut value: serde_json::Value) -> Result<Self, serde_json::Error> {
        if value.get("output").is_some_and(serde_json::Value::is_object) {
            value = value["output"].take();
        }
        serde_json::from_value(value)
    }

    pub fn report(&self) -> QaReport {
        QaReport {
            ok: self.ok.unwrap_or(true),
            role_report: self.role_report.clone(),
            retake_tips: self.retake_tips.clone(),
            error: self.error.clone(),
            lang: self.lang.clone(),
        }
    }

    /// The encoded model, if one was returned and is non-blank.
    pub fn model(&self) -> Option<&str> {
        self.glb_b64.as_deref().filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use twin_core::qa::RoleStatus;
    use twin_core::roles::Role;

    use super::*;

    #[test]
    fn missing_ok_means_success() {
        let resp = ServiceResponse::from_json(serde_json::json!({})).unwrap();
        assert!(resp.report().ok);
        assert!(resp.model().is_none());
    }

    #[test]
    fn unwraps_output_envelope() {
        let resp = ServiceResponse::from_json(serde_json::json!({
            "id": "sync-1",
            "status": "COMPLETED",
            "output": {
                "ok": false,
                "error": "Photos didn't pass quality.",
                "role_report": {"front": {"status": "retry"}},
                "retake_tips": ["Improve lighting"]
            }
        }))
        .unwrap();

        let report = resp.report();
        assert!(!report.ok);
        assert_eq!(report.status(Role::Front), RoleStatus::Retry);
        assert_eq!(report.error.as_deref(), Some("Photos didn't pass quality."));
    }

    #[test]
    fn blank_model_is_no_model() {
        let resp = ServiceResponse::from_json(serde_json::json!({"glb_b64": "  "})).unwrap();
        assert!(resp.model().is_none());

        let resp = ServiceResponse::from_json(serde_json::json!({"glb_b64": "QUJD", "ok": true}))
            .unwrap();
        assert_eq!(resp.model(), Some("QUJD"));
    }
}
