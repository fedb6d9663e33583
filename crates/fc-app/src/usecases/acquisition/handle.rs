use std::path::PathBuf;

use tracing::warn;

use fc_core::{AcquisitionEvent, ChooseOutcome, ContentRef, StepMode};

use super::coordinator::{drive, AcquisitionServices};
use super::session::AcquisitionSession;

/// Fluent configuration of one owner's session. Setters mutate the session in
/// place, so settings persist across [`open`](Self::open) calls until changed
/// or cleared with [`reset`](Self::reset).
///
/// 链式配置当前 owner 的会话；设置会一直保留。
pub struct ChooserHandle<'a> {
    session: &'a mut AcquisitionSession,
    services: &'a AcquisitionServices,
}

impl<'a> ChooserHandle<'a> {
    pub(super) fn new(session: &'a mut AcquisitionSession, services: &'a AcquisitionServices) -> Self {
        Self { session, services }
    }

    /// Chain a square crop after the source step.
    pub fn with_crop(self, crop: bool) -> Self {
        self.session.config.crop = crop;
        self
    }

    /// Edge length of the square crop, in pixels. Zero is ignored.
    pub fn crop_size(self, size: u32) -> Self {
        if size > 0 {
            self.session.config.crop_size = size;
        }
        self
    }

    /// Decode the result into pixels for the callback.
    pub fn as_image(self, as_image: bool) -> Self {
        self.session.config.as_image = as_image;
        self
    }

    pub fn request_code_for_gallery(self, code: i32) -> Self {
        self.session.config.codes.gallery = code;
        self
    }

    pub fn request_code_for_camera(self, code: i32) -> Self {
        self.session.config.codes.camera = code;
        self
    }

    pub fn request_code_for_crop(self, code: i32) -> Self {
        self.session.config.codes.crop = code;
        self
    }

    pub fn request_code_for_file(self, code: i32) -> Self {
        self.session.config.codes.file = code;
        self
    }

    /// Where the camera writes. Must be a location the camera app can write to.
    pub fn camera_output(self, output: ContentRef) -> Self {
        self.session.config.camera_output = Some(output);
        self
    }

    /// Where the crop step writes. Private app storage is rejected.
    pub fn crop_output_file(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if self.services.resolver.context().storage.is_private(&path) {
            warn!(
                owner = %self.session.owner.id,
                path = %path.display(),
                "ignoring private crop output location"
            );
        } else {
            self.session.config.crop_output = Some(path);
        }
        self
    }

    /// File-provider authority used when minting references. Empty is ignored.
    pub fn authority(self, authority: impl Into<String>) -> Self {
        let authority = authority.into();
        if !authority.trim().is_empty() {
            self.session.config.authority = authority;
        }
        self
    }

    /// Clear the crop and decode flags.
    pub fn reset(self) -> Self {
        self.session.config.reset_flags();
        self
    }

    /// Register the completion callback, replacing any previous one.
    pub fn listener(self, callback: impl FnMut(ChooseOutcome) + 'static) -> Self {
        self.session.callback = Some(Box::new(callback));
        self
    }

    pub fn gallery(self) -> Self {
        self.session.config.mode = StepMode::Gallery;
        self
    }

    pub fn camera(self) -> Self {
        self.session.config.mode = StepMode::Camera;
        self
    }

    pub fn file(self) -> Self {
        self.session.config.mode = StepMode::FilePicker;
        self
    }

    /// Start the configured step. A step already pending for this owner is superseded.
    pub fn open(self) {
        let mode = self.session.config.mode;
        self.session.inline_image = None;
        drive(self.services, self.session, AcquisitionEvent::Launch { mode });
    }
}
