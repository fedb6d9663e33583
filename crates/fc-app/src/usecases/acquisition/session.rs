use fc_core::{
    AcquisitionState, ChooseOutcome, DecodedImage, Owner, SessionConfig, SessionDefaults,
};

/// Completion callback. Runs on the owner's thread, so it need not be `Send`.
pub type ChooseCallback = Box<dyn FnMut(ChooseOutcome)>;

pub(crate) struct AcquisitionSession {
    pub(crate) owner: Owner,
    pub(crate) config: SessionConfig,
    pub(crate) state: AcquisitionState,
    pub(crate) callback: Option<ChooseCallback>,
    /// Inline image returned by the current source step.
    pub(crate) inline_image: Option<DecodedImage>,
}

impl AcquisitionSession {
    pub(crate) fn new(owner: Owner, defaults: &SessionDefaults) -> Self {
        let config = SessionConfig::with_defaults(&owner.package_id, defaults);
        Self {
            owner,
            config,
            state: AcquisitionState::Idle,
            callback: None,
            inline_image: None,
        }
    }

    /// Deliver the final outcome of a cycle.
    pub(crate) fn notify(&mut self, outcome: ChooseOutcome) {
        self.inline_image = None;
        match self.callback.as_mut() {
            Some(callback) => callback(outcome),
            None => tracing::warn!(
                owner = %self.owner.id,
                status = %outcome.status,
                "no listener registered, dropping outcome"
            ),
        }
    }
}
