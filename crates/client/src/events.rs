//! Observations raised by the session as state changes.
//!
//! Views (thumbnails, status chips, the viewer) subscribe to these via
//! [`Orchestrator::subscribe`](crate::orchestrator::Orchestrator::subscribe)
//! instead of polling the session.

use serde::Serialize;
use twin_core::preset::Preset;
use twin_core::roles::Role;

use crate::orchestrator::Workflow;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SessionEvent {
    /// A photo was stored or replaced for a role.
    RosterChanged { role: Role },

    /// A selected file was refused; the role's previous photo is kept.
    PhotoRejected { role: Role, reason: String },

    /// A measurement value was stored or removed.
    MeasurementsChanged,

    /// The figure (and its measurement points) changed.
    PresetChanged { preset: Preset },

    /// A workflow entered `Busy`; controls are disabled.
    WorkflowStarted { workflow: Workflow },

    /// A new QA report replaced the previous one.
    ReportUpdated { ok: bool },

    /// A new model is loaded in the viewer and can be downloaded.
    ArtifactReady { bytes: usize },

    /// The workflow returned to `Idle`; controls are enabled again.
    WorkflowFinished { workflow: Workflow },

    /// Camera orbit or rotation changed.
    ViewerChanged,

    /// The session was reset to its initial state.
    SessionReset,
}
