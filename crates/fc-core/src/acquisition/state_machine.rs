//! Acquisition state machine.
//!
//! Pure transition function for one owner's acquisition chain. The coordinator
//! in `fc-app` feeds it events and executes the actions it returns.

use std::path::PathBuf;

use super::mode::{Step, StepMode};
use super::outcome::ChooseStatus;
use super::session::SessionConfig;
use crate::reference::ContentRef;

/// Which external step, if any, the session is waiting on.
///
/// 会话当前等待的外部步骤。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AcquisitionState {
    #[default]
    Idle,
    AwaitingGallery,
    AwaitingCamera,
    AwaitingFilePicker,
    AwaitingCrop,
}

impl AcquisitionState {
    pub fn awaiting(step: Step) -> Self {
        match step {
            Step::Gallery => AcquisitionState::AwaitingGallery,
            Step::Camera => AcquisitionState::AwaitingCamera,
            Step::FilePicker => AcquisitionState::AwaitingFilePicker,
            Step::Crop => AcquisitionState::AwaitingCrop,
        }
    }

    /// Step whose completion this state accepts.
    pub fn awaited_step(self) -> Option<Step> {
        match self {
            AcquisitionState::Idle => None,
            AcquisitionState::AwaitingGallery => Some(Step::Gallery),
            AcquisitionState::AwaitingCamera => Some(Step::Camera),
            AcquisitionState::AwaitingFilePicker => Some(Step::FilePicker),
            AcquisitionState::AwaitingCrop => Some(Step::Crop),
        }
    }

    pub fn is_idle(self) -> bool {
        self == AcquisitionState::Idle
    }
}

/// Classification of an acquired source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Croppable and decodable image.
    Image,
    /// Anything else. `file_name` feeds the failure message.
    NotImage { file_name: String },
}

/// Events that drive an acquisition.
///
/// 驱动选择流程的事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionEvent {
    /// Caller opened the chooser.
    Launch { mode: StepMode },
    /// Launch aborted before delegation (no camera output location).
    LaunchRejected { status: ChooseStatus },
    /// No external handler could be opened.
    DelegationFailed,
    /// A source step returned a usable reference.
    SourceAcquired {
        step: Step,
        source: ContentRef,
        kind: SourceKind,
        /// The reference was minted for an inline image the step handed back.
        from_inline_image: bool,
    },
    /// A source step returned nothing usable.
    SourceMissing { step: Step, status: ChooseStatus },
    /// The crop step finished. Its result code is not consulted.
    CropCompleted,
}

impl AcquisitionEvent {
    /// Step a completion event answers. Launch-side events answer none.
    pub fn completed_step(&self) -> Option<Step> {
        match self {
            AcquisitionEvent::SourceAcquired { step, .. }
            | AcquisitionEvent::SourceMissing { step, .. } => Some(*step),
            AcquisitionEvent::CropCompleted => Some(Step::Crop),
            _ => None,
        }
    }
}

/// How the callback's image slot gets filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePlan {
    None,
    /// Decode the resolved file.
    Decode,
    /// Hand back the inline image the step returned.
    Inline,
}

/// Side-effects produced by transitions.
///
/// 状态迁移产生的副作用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionAction {
    /// Open the external surface for a source step.
    Delegate { step: Step },
    /// Open the crop handler on `source`.
    LaunchCrop { source: ContentRef },
    /// Final success callback for a source reference.
    Deliver { reference: ContentRef, image: ImagePlan },
    /// Final success callback for the crop output file.
    DeliverCropOutput { output: PathBuf, decode: bool },
    /// Final failure callback.
    Fail { status: ChooseStatus },
}

/// Pure acquisition state machine.
///
/// 纯状态机：不包含副作用。
pub struct AcquisitionStateMachine;

impl AcquisitionStateMachine {
    pub fn transition(
        state: AcquisitionState,
        event: AcquisitionEvent,
        config: &SessionConfig,
    ) -> (AcquisitionState, Vec<AcquisitionAction>) {
        if let Some(step) = event.completed_step() {
            if state.awaited_step() != Some(step) {
                #[cfg(feature = "tracing")]
                tracing::debug!(?state, %step, "dropping completion for a step that is not awaited");
                return (state, Vec::new());
            }
        }

        match event {
            AcquisitionEvent::Launch { mode } => {
                let step = Step::from(mode);
                #[cfg(feature = "tracing")]
                tracing::debug!(?state, %step, superseded = !state.is_idle(), "launching step");
                (
                    AcquisitionState::awaiting(step),
                    vec![AcquisitionAction::Delegate { step }],
                )
            }
            AcquisitionEvent::LaunchRejected { status } => (
                AcquisitionState::Idle,
                vec![AcquisitionAction::Fail { status }],
            ),
            AcquisitionEvent::DelegationFailed => (AcquisitionState::Idle, Vec::new()),
            AcquisitionEvent::SourceAcquired {
                source,
                kind,
                from_inline_image,
                ..
            } => Self::on_source(source, kind, from_inline_image, config),
            AcquisitionEvent::SourceMissing { status, .. } => (
                AcquisitionState::Idle,
                vec![AcquisitionAction::Fail { status }],
            ),
            AcquisitionEvent::CropCompleted => match &config.crop_output {
                Some(output) => (
                    AcquisitionState::Idle,
                    vec![AcquisitionAction::DeliverCropOutput {
                        output: output.clone(),
                        decode: config.as_image,
                    }],
                ),
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("crop finished without an output location, no callback");
                    (AcquisitionState::Idle, Vec::new())
                }
            },
        }
    }

    fn on_source(
        source: ContentRef,
        kind: SourceKind,
        from_inline_image: bool,
        config: &SessionConfig,
    ) -> (AcquisitionState, Vec<AcquisitionAction>) {
        if config.crop {
            return match kind {
                SourceKind::Image => (
                    AcquisitionState::AwaitingCrop,
                    vec![AcquisitionAction::LaunchCrop { source }],
                ),
                SourceKind::NotImage { file_name } => (
                    AcquisitionState::Idle,
                    vec![AcquisitionAction::Fail {
                        status: ChooseStatus::UnsupportedCropInput { file_name },
                    }],
                ),
            };
        }

        let image = if from_inline_image {
            ImagePlan::Inline
        } else if config.as_image && kind == SourceKind::Image {
            ImagePlan::Decode
        } else {
            ImagePlan::None
        };
        (
            AcquisitionState::Idle,
            vec![AcquisitionAction::Deliver {
                reference: source,
                image,
            }],
        )
    }
}
