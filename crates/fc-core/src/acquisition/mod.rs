//! Acquisition domain: session configuration, correlation codes and the pure
//! transition function driving gallery / camera / file-picker / crop chains.

mod mode;
mod outcome;
mod request;
mod request_codes;
mod session;
mod state_machine;

pub use mode::{Step, StepMode};
pub use outcome::{ChooseOutcome, ChooseStatus, CompletionPayload, ResultCode};
pub use request::{CropRequest, DelegationRequest, DocumentAction, ANY_MIME_TYPE, CROP_OUTPUT_FORMAT};
pub use request_codes::RequestCodes;
pub use session::{SessionConfig, SessionDefaults, DEFAULT_CROP_SIZE};
pub use state_machine::{
    AcquisitionAction, AcquisitionEvent, AcquisitionState, AcquisitionStateMachine, ImagePlan,
    SourceKind,
};
