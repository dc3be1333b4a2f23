//! Verify / generate workflow state machine.
//!
//! [`Orchestrator`] owns the [`Session`] and drives both workflows against
//! the reconstruction service:
//!
//! 1. refuse up front (no state change, no call) when busy, when a
//!    required photo is missing, or when no endpoint is configured;
//! 2. enter `Busy` and encode the roster;
//! 3. build the workflow's request body;
//! 4. make exactly one call;
//! 5. on failure keep the previous report and model;
//! 6. on success render the QA report, then hand over the model;
//! 7. return to `Idle` no matter how the run ended.
//!
//! The busy flag lives in a [`watch`] channel so views can disable their
//! controls while a run is in flight. It is reset by a drop guard, so no
//! exit path can leave the controls disabled.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, watch, RwLock, RwLockReadGuard};
use twin_core::artifact::{Artifact, DownloadFile, ViewerSurface};
use twin_core::error::CoreError;
use twin_core::capture::MeasurementFields;
use twin_core::intake::{PhotoFile, Roster};
use twin_core::preset::Preset;
use twin_core::qa::QaReport;
use twin_core::roles::Role;
use twin_core::status::StatusLevel;
use twin_core::types::Timestamp;

use crate::config::ClientConfig;
use crate::encoding::{encode_roster, EncodeError};
use crate::events::SessionEvent;
use crate::request::{build_generate, build_verify};
use crate::response::ServiceResponse;
use crate::session::Session;
use crate::transport::{bearer_for, ReconstructionTransport, TransportError};

/// Broadcast channel capacity for session events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Workflow {
    /// Photo quality check only.
    Verify,
    /// Quality check plus model generation.
    Generate,
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Workflow::Verify => "verify",
            Workflow::Generate => "generate",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkflowState {
    Idle,
    Busy(Workflow),
}

impl WorkflowState {
    pub fn is_busy(self) -> bool {
        matches!(self, WorkflowState::Busy(_))
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct WorkflowOutcome {
    pub workflow: Workflow,
    pub report: QaReport,
    /// Size of the stored model, for generate runs that returned one.
    pub model_bytes: Option<usize>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Coarse classification used for the status banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Refused before any network activity.
    Precondition,
    /// A photo could not be read while encoding.
    Encoding,
    /// The call failed or its reply could not be read.
    Transport,
    /// The call succeeded but carried no usable model.
    Payload,
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("A {0} request is already running")]
    Busy(Workflow),

    #[error("Missing required photos: {}", join_roles(.0))]
    MissingPhotos(Vec<Role>),

    #[error("No service endpoint configured")]
    NoEndpoint,

    #[error(transparent)]
    Encoding(#[from] EncodeError),

    #[error("Failed to build request body: {0}")]
    Body(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("No model returned: {0}")]
    NoModel(String),

    #[error("Returned model is unusable: {0}")]
    InvalidModel(#[source] CoreError),
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::Busy(_) | WorkflowError::MissingPhotos(_) | WorkflowError::NoEndpoint => {
                ErrorKind::Precondition
            }
            WorkflowError::Encoding(_) => ErrorKind::Encoding,
            WorkflowError::Body(_) | WorkflowError::Transport(_) => ErrorKind::Transport,
            WorkflowError::NoModel(_) | WorkflowError::InvalidModel(_) => ErrorKind::Payload,
        }
    }

    /// Banner text for this error.
    pub fn advisory(&self) -> String {
        match self {
            WorkflowError::Busy(w) => format!("Please wait, a {w} request is still running."),
            WorkflowError::MissingPhotos(roles) => format!(
                "Add front, side and back photos first (missing: {}).",
                join_roles(roles)
            ),
            WorkflowError::NoEndpoint => "Set the service endpoint before sending photos.".into(),
            WorkflowError::Encoding(e) => format!("Could not read the {} photo.", e.role),
            WorkflowError::Body(_) | WorkflowError::Transport(_) => {
                "Request failed. See the log for details.".into()
            }
            WorkflowError::NoModel(reason) => format!("No model returned: {reason}"),
            WorkflowError::InvalidModel(_) => "The returned model could not be decoded.".into(),
        }
    }
}

fn join_roles(roles: &[Role]) -> String {
    roles.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ")
}

/// Error text followed by every distinct cause in its source chain, e.g.
/// `HTTP request failed: ...: tcp connect error: Connection refused`.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct Orchestrator {
    config: ClientConfig,
    transport: Arc<dyn ReconstructionTransport>,
    session: RwLock<Session>,
    state: watch::Sender<WorkflowState>,
    events: broadcast::Sender<SessionEvent>,
}

/// Inputs of one run, taken when the preconditions pass.
struct Snapshot {
    endpoint: String,
    roster: Roster,
    preset: Preset,
    measurements: MeasurementFields,
}

/// Holds `Busy` for the lifetime of a run and restores `Idle` on drop.
struct BusyGuard<'a> {
    state: &'a watch::Sender<WorkflowState>,
    events: &'a broadcast::Sender<SessionEvent>,
    workflow: Workflow,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.send_replace(WorkflowState::Idle);
        let _ = self.events.send(SessionEvent::WorkflowFinished {
            workflow: self.workflow,
        });
        tracing::debug!(workflow = %self.workflow, "Workflow returned to idle");
    }
}

impl Orchestrator {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn ReconstructionTransport>,
        preset: Preset,
    ) -> Self {
        let (state, _) = watch::channel(WorkflowState::Idle);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            transport,
            session: RwLock::new(Session::new(preset)),
            state,
            events,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Subscribe to session observations.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Watch the busy/idle state (controls are enabled iff idle).
    pub fn watch_state(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> WorkflowState {
        *self.state.borrow()
    }

    pub fn controls_enabled(&self) -> bool {
        !self.state().is_busy()
    }

    /// Read access to the session for rendering.
    pub async fn session(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().await
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    // ---- intake and capture ----

    /// Validate and store a photo for a role.
    pub async fn submit_photo(&self, role: Role, file: PhotoFile) -> Result<(), CoreError> {
        let mut session = self.session.write().await;
        let accepted = session
            .intake
            .submit(role, file)
            .map(|photo| format!("{} photo added: {} ({} bytes)", role.label(), photo.name, photo.size));
        match accepted {
            Ok(line) => {
                session.status.log(line);
                drop(session);
                self.emit(SessionEvent::RosterChanged { role });
                Ok(())
            }
            Err(e) => {
                session.status.set(StatusLevel::Warn, e.rejection_reason());
                session.status.log(e.to_string());
                drop(session);
                self.emit(SessionEvent::PhotoRejected {
                    role,
                    reason: e.rejection_reason().to_string(),
                });
                Err(e)
            }
        }
    }

    /// Apply raw text typed into a measurement point.
    pub async fn input_measurement(&self, point_id: &str, raw: &str) -> Result<Option<f64>, CoreError> {
        let value = self.session.write().await.capture.input(point_id, raw)?;
        self.emit(SessionEvent::MeasurementsChanged);
        Ok(value)
    }

    pub async fn select_preset(&self, preset: Preset) {
        self.session.write().await.capture.select_preset(preset);
        self.emit(SessionEvent::PresetChanged { preset });
    }

    // ---- viewer and download ----

    pub async fn set_rotation(&self, degrees: f64) {
        self.session.write().await.viewer.set_rotation(degrees);
        self.emit(SessionEvent::ViewerChanged);
    }

    pub async fn reset_viewer(&self) {
        let mut session = self.session.write().await;
        let session = &mut *session;
        session.artifacts.reset_viewer(&mut session.viewer);
        self.emit(SessionEvent::ViewerChanged);
    }

    /// Build the download for the stored model, named after the current
    /// preset. Logs an advisory when there is nothing to download.
    pub async fn download(&self, now: Timestamp) -> Result<DownloadFile, CoreError> {
        let mut session = self.session.write().await;
        let preset = session.capture.preset();
        match session.artifacts.download(preset, now) {
            Ok(file) => {
                session.status.log(format!("Download ready: {}", file.filename));
                Ok(file)
            }
            Err(e) => {
                session.status.log("Nothing to download yet. Generate a model first.");
                Err(e)
            }
        }
    }

    pub async fn reset_session(&self) {
        self.session.write().await.reset();
        self.emit(SessionEvent::SessionReset);
    }

    // ---- workflows ----

    pub async fn verify(&self) -> Result<WorkflowOutcome, WorkflowError> {
        self.run(Workflow::Verify).await
    }

    pub async fn generate(&self) -> Result<WorkflowOutcome, WorkflowError> {
        self.run(Workflow::Generate).await
    }

    /// Run one workflow end to end.
    pub async fn run(&self, workflow: Workflow) -> Result<WorkflowOutcome, WorkflowError> {
        if let WorkflowState::Busy(running) = self.state() {
            tracing::warn!(requested = %workflow, running = %running, "Workflow refused while busy");
            return Err(WorkflowError::Busy(running));
        }

        let Snapshot {
            endpoint,
            roster,
            preset,
            measurements,
        } = self.snapshot().await?;
        let _guard = self.begin(workflow)?;
        self.session
            .write()
            .await
            .status
            .set(StatusLevel::Info, "Encoding photos...");

        let photos = match encode_roster(&roster).await {
            Ok(photos) => photos,
            Err(e) => return Err(self.fail(e.into()).await),
        };

        let body = match workflow {
            Workflow::Verify => serde_json::to_value(build_verify(photos)),
            Workflow::Generate => {
                serde_json::to_value(build_generate(photos, preset, measurements))
            }
        };
        let body = match body {
            Ok(body) => body,
            Err(e) => return Err(self.fail(e.into()).await),
        };

        let bearer = bearer_for(
            &endpoint,
            self.config.api_token.as_deref(),
            &self.config.expected_host,
        );
        {
            let mut session = self.session.write().await;
            session.status.set(StatusLevel::Info, match workflow {
                Workflow::Verify => "Checking photos...",
                Workflow::Generate => "Generating model...",
            });
        }

        let reply = self
            .transport
            .post(&endpoint, bearer, &body)
            .await
            .and_then(|value| {
                ServiceResponse::from_json(value).map_err(|e| TransportError::Decode(e.to_string()))
            });
        let response = match reply {
            Ok(response) => response,
            Err(e) => return Err(self.fail(e.into()).await),
        };

        self.dispatch(workflow, response).await
    }

    /// Check the gates that must pass before going busy and take the
    /// inputs of the run under the same lock, so a concurrent reset cannot
    /// empty the roster after it passed the gate.
    async fn snapshot(&self) -> Result<Snapshot, WorkflowError> {
        let mut session = self.session.write().await;

        let missing = session.intake.missing_required();
        let error = if !missing.is_empty() {
            WorkflowError::MissingPhotos(missing)
        } else if let Some(endpoint) = self.config.endpoint() {
            return Ok(Snapshot {
                endpoint: endpoint.to_string(),
                roster: session.intake.roster().clone(),
                preset: session.capture.preset(),
                measurements: session.capture.flatten(),
            });
        } else {
            WorkflowError::NoEndpoint
        };

        session.status.set(StatusLevel::Warn, error.advisory());
        Err(error)
    }

    fn begin(&self, workflow: Workflow) -> Result<BusyGuard<'_>, WorkflowError> {
        let mut running = None;
        self.state.send_if_modified(|state| match *state {
            WorkflowState::Idle => {
                *state = WorkflowState::Busy(workflow);
                true
            }
            WorkflowState::Busy(other) => {
                running = Some(other);
                false
            }
        });
        if let Some(other) = running {
            return Err(WorkflowError::Busy(other));
        }

        tracing::info!(workflow = %workflow, "Workflow started");
        self.emit(SessionEvent::WorkflowStarted { workflow });
        Ok(BusyGuard {
            state: &self.state,
            events: &self.events,
            workflow,
        })
    }

    /// Report a failure after the workflow went busy. Previous report and
    /// model are left as they are.
    async fn fail(&self, error: WorkflowError) -> WorkflowError {
        let mut session = self.session.write().await;
        session.status.set(StatusLevel::Bad, error.advisory());
        session.status.log(format!("Error: {}", error_chain(&error)));
        error
    }

    /// Render the report, then hand over the model for generate runs.
    async fn dispatch(
        &self,
        workflow: Workflow,
        response: ServiceResponse,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        let mut session = self.session.write().await;

        if let Some(log) = &response.log {
            for line in log.lines().map(str::trim).filter(|l| !l.is_empty()) {
                session.status.log(format!("[server] {line}"));
            }
        }

        let report = response.report();
        session.apply_report(report.clone());
        self.emit(SessionEvent::ReportUpdated { ok: report.ok });

        if workflow == Workflow::Verify {
            if report.ok && report.all_required_ok() {
                session.status.set(StatusLevel::Ok, "Photos passed the quality check.");
            } else {
                let text = match &report.error {
                    Some(error) => error.clone(),
                    None => format!(
                        "Some photos need a retake: {}.",
                        join_roles(&report.roles_not_ok())
                    ),
                };
                session.status.set(StatusLevel::Warn, text);
            }
            return Ok(WorkflowOutcome {
                workflow,
                report,
                model_bytes: None,
            });
        }

        let Some(encoded) = response.model() else {
            let reason = report
                .error
                .clone()
                .unwrap_or_else(|| "the service did not include a model".to_string());
            let error = WorkflowError::NoModel(reason);
            session.status.set(StatusLevel::Bad, error.advisory());
            session.status.log(format!("Error: {}", error_chain(&error)));
            return Err(error);
        };

        let artifact = match Artifact::from_base64(encoded) {
            Ok(artifact) => artifact,
            Err(e) => {
                let error = WorkflowError::InvalidModel(e);
                session.status.set(StatusLevel::Bad, error.advisory());
                session.status.log(format!("Error: {}", error_chain(&error)));
                return Err(error);
            }
        };

        let bytes = artifact.len();
        session.apply_artifact(artifact);
        session.status.set(StatusLevel::Ok, "Model generated.");
        session.status.log(format!("Model received ({bytes} bytes)"));
        self.emit(SessionEvent::ArtifactReady { bytes });

        Ok(WorkflowOutcome {
            workflow,
            report,
            model_bytes: Some(bytes),
        })
    }
}
