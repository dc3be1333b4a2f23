//! The single owned aggregate of client state.

use twin_core::artifact::{Artifact, ArtifactHandler, ViewerState};
use twin_core::capture::MeasurementCapture;
use twin_core::intake::PhotoIntake;
use twin_core::preset::Preset;
use twin_core::qa::{self, QaReport, QaView};
use twin_core::status::StatusBoard;

/// Everything the user has entered plus the last results.
///
/// Nothing here outlives the process.
#[derive(Debug)]
pub struct Session {
    pub intake: PhotoIntake,
    pub capture: MeasurementCapture,
    pub last_report: Option<QaReport>,
    pub qa_view: QaView,
    pub artifacts: ArtifactHandler,
    pub viewer: ViewerState,
    pub status: StatusBoard,
}

impl Session {
    pub fn new(preset: Preset) -> Self {
        Self {
            intake: PhotoIntake::new(),
            capture: MeasurementCapture::new(preset),
            last_report: None,
            qa_view: QaView::default(),
            artifacts: ArtifactHandler::new(),
            viewer: ViewerState::default(),
            status: StatusBoard::new(),
        }
    }

    /// Drop photos, measurements and results. The preset and the log are
    /// kept.
    pub fn reset(&mut self) {
        self.intake.clear();
        self.capture.clear();
        self.last_report = None;
        self.qa_view = QaView::default();
        self.artifacts.clear(&mut self.viewer);
        self.artifacts.reset_viewer(&mut self.viewer);
        self.status.log("Session reset");
    }

    /// Replace the last report and re-render the QA panel from it.
    pub fn apply_report(&mut self, report: QaReport) {
        self.qa_view = qa::render(&report);
        self.last_report = Some(report);
    }

    /// Store a model and point the viewer at it.
    pub fn apply_artifact(&mut self, artifact: Artifact) {
        self.artifacts.accept(artifact, &mut self.viewer);
    }
}

#[cfg(test)]
mod tests {
    use twin_core::intake::PhotoFile;
    use twin_core::qa::ChipTone;
    use twin_core::roles::Role;

    use super::*;

    #[test]
    fn report_replaces_previous_and_clears_tips() {
        let mut session = Session::new(Preset::Female);
        session.apply_report(
            serde_json::from_value(serde_json::json!({
                "ok": false,
                "role_report": {"front": {"status": "retry"}},
                "retake_tips": ["Improve lighting"]
            }))
            .unwrap(),
        );
        assert_eq!(session.qa_view.tips.len(), 1);

        session.apply_report(
            serde_json::from_value(serde_json::json!({
                "ok": true,
                "role_report": {"front": {"status": "ok"}}
            }))
            .unwrap(),
        );
        assert!(session.qa_view.tips.is_empty());
        assert_eq!(session.qa_view.chips[0].tone, ChipTone::Affirmative);
        assert!(session.last_report.as_ref().unwrap().ok);
    }

    #[test]
    fn reset_clears_everything_but_preset() {
        let mut session = Session::new(Preset::Male);
        session
            .intake
            .submit(Role::Front, PhotoFile::from_bytes("f.jpg", "image/jpeg", vec![1u8]))
            .unwrap();
        session.capture.input("m_chest", "100").unwrap();
        session.apply_artifact(Artifact::from_base64("QUJD").unwrap());

        session.reset();

        assert!(session.intake.roster().is_empty());
        assert!(session.capture.values().is_empty());
        assert!(!session.artifacts.download_available());
        assert!(session.viewer.source.is_none());
        assert_eq!(session.capture.preset(), Preset::Male);
    }
}
