//! Named UI events and their handlers.
//!
//! Each event maps to exactly one component call on the
//! [`Orchestrator`]: an intake mutation, a capture mutation, a viewer
//! property change, a download, a session reset or a workflow trigger.
//! Handlers never do cross-component work themselves.

use std::path::PathBuf;

use twin_core::error::CoreError;
use twin_core::intake::PhotoFile;
use twin_core::preset::Preset;
use twin_core::roles::Role;

use crate::download::DirectorySink;
use crate::orchestrator::{Orchestrator, WorkflowError, WorkflowOutcome};

#[derive(Debug, Clone)]
pub enum UiEvent {
    PhotoSelected { role: Role, file: PhotoFile },
    MeasurementInput { point_id: String, raw: String },
    PresetSelected(Preset),
    VerifyClicked,
    GenerateClicked,
    DownloadClicked,
    RotationChanged(f64),
    ResetViewClicked,
    /// Start over: drop photos, measurements, report and model.
    ResetClicked,
}

/// What a handled event produced.
#[derive(Debug)]
pub enum Handled {
    Photo(Role),
    Measurement(Option<f64>),
    Preset(Preset),
    Workflow(WorkflowOutcome),
    Downloaded(PathBuf),
    Viewer,
    Reset,
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("Failed to save download: {0}")]
    Save(#[from] std::io::Error),
}

/// Dispatch one UI event.
pub async fn handle(
    orchestrator: &Orchestrator,
    sink: &DirectorySink,
    event: UiEvent,
) -> Result<Handled, HandlerError> {
    match event {
        UiEvent::PhotoSelected { role, file } => {
            orchestrator.submit_photo(role, file).await?;
            Ok(Handled::Photo(role))
        }
        UiEvent::MeasurementInput { point_id, raw } => {
            let value = orchestrator.input_measurement(&point_id, &raw).await?;
            Ok(Handled::Measurement(value))
        }
        UiEvent::PresetSelected(preset) => {
            orchestrator.select_preset(preset).await;
            Ok(Handled::Preset(preset))
        }
        UiEvent::VerifyClicked => Ok(Handled::Workflow(orchestrator.verify().await?)),
        UiEvent::GenerateClicked => Ok(Handled::Workflow(orchestrator.generate().await?)),
        UiEvent::DownloadClicked => {
            let file = orchestrator.download(chrono::Utc::now()).await?;
            Ok(Handled::Downloaded(sink.save(&file).await?))
        }
        UiEvent::RotationChanged(degrees) => {
            orchestrator.set_rotation(degrees).await;
            Ok(Handled::Viewer)
        }
        UiEvent::ResetViewClicked => {
            orchestrator.reset_viewer().await;
            Ok(Handled::Viewer)
        }
        UiEvent::ResetClicked => {
            orchestrator.reset_session().await;
            Ok(Handled::Reset)
        }
    }
}
