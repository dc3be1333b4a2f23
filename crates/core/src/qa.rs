//! Photo QA report returned by the service, and its rendering into
//! per-role status chips plus retake advice.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::roles::{Role, REQUIRED_ROLES};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Verdict for one role. Unrecognized values count as missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleStatus {
    Ok,
    Retry,
    #[default]
    #[serde(other)]
    Missing,
}

/// Per-role record inside `role_report`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleReportEntry {
    #[serde(default)]
    pub status: RoleStatus,
    /// Machine reasons the service rejected the photo (e.g. `blur`).
    #[serde(default)]
    pub reasons: Vec<String>,
    /// Role-specific retake tips.
    #[serde(default)]
    pub tips: Vec<String>,
}

/// Quality report for the submitted photos.
///
/// Replaces the previous report on every successful call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QaReport {
    /// Absent on the wire means success.
    #[serde(default = "default_ok")]
    pub ok: bool,
    /// Keyed by role name as sent by the service.
    #[serde(default)]
    pub role_report: BTreeMap<String, RoleReportEntry>,
    #[serde(default)]
    pub retake_tips: Vec<String>,
    /// Service-side error text, if the service refused to proceed.
    pub error: Option<String>,
    /// Language the tips were localized to.
    pub lang: Option<String>,
}

fn default_ok() -> bool {
    true
}

impl QaReport {
    /// Status for a role; absent roles are missing.
    pub fn status(&self, role: Role) -> RoleStatus {
        self.role_report
            .get(role.as_str())
            .map(|e| e.status)
            .unwrap_or(RoleStatus::Missing)
    }

    /// Required roles whose status is not `ok`.
    pub fn roles_not_ok(&self) -> Vec<Role> {
        REQUIRED_ROLES
            .iter()
            .copied()
            .filter(|r| self.status(*r) != RoleStatus::Ok)
            .collect()
    }

    pub fn all_required_ok(&self) -> bool {
        self.roles_not_ok().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Visual tone of a chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipTone {
    Affirmative,
    Warning,
    Negative,
}

impl From<RoleStatus> for ChipTone {
    fn from(status: RoleStatus) -> Self {
        match status {
            RoleStatus::Ok => ChipTone::Affirmative,
            RoleStatus::Retry => ChipTone::Warning,
            RoleStatus::Missing => ChipTone::Negative,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleChip {
    pub role: Role,
    pub status: RoleStatus,
    pub tone: ChipTone,
    pub reasons: Vec<String>,
}

/// What the QA panel shows. An empty `tips` list means no advisory.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QaView {
    pub chips: Vec<RoleChip>,
    pub tips: Vec<String>,
}

/// Render a report: one chip per required role, tips in service order.
pub fn render(report: &QaReport) -> QaView {
    let chips = REQUIRED_ROLES
        .iter()
        .map(|&role| {
            let entry = report.role_report.get(role.as_str());
            let status = entry.map(|e| e.status).unwrap_or_default();
            RoleChip {
                role,
                status,
                tone: status.into(),
                reasons: entry.map(|e| e.reasons.clone()).unwrap_or_default(),
            }
        })
        .collect();

    QaView {
        chips,
        tips: report.retake_tips.clone(),
    }
}

impl fmt::Display for QaView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chip in &self.chips {
            let mark = match chip.tone {
                ChipTone::Affirmative => "OK   ",
                ChipTone::Warning => "RETRY",
                ChipTone::Negative => "MISS ",
            };
            write!(f, "[{mark}] {}", chip.role.label())?;
            if !chip.reasons.is_empty() {
                write!(f, " ({})", chip.reasons.join(", "))?;
            }
            writeln!(f)?;
        }
        if !self.tips.is_empty() {
            writeln!(f, "Retake tips:")?;
            for (i, tip) in self.tips.iter().enumerate() {
                writeln!(f, "  {}. {tip}", i + 1)?;
            }
        }
        Ok(())
    }
}
