use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use fc_core::acquisition::{CropRequest, DelegationRequest, ImagePlan, SourceKind};
use fc_core::file_kind::is_croppable_image;
use fc_core::ports::{ClockPort, DelegationPort, ImageCodecPort};
use fc_core::{
    AcquisitionAction, AcquisitionEvent, AcquisitionState, AcquisitionStateMachine, ChooseOutcome,
    ChooseStatus, CompletionPayload, ContentRef, ContentType, DecodedImage, Owner, OwnerId,
    OwnerKind, ResultCode, SessionConfig, SessionDefaults, Step,
};

use super::handle::ChooserHandle;
use super::session::AcquisitionSession;
use crate::usecases::mint_reference::{file_reference, MintReferenceUseCase};
use crate::usecases::resolve_reference::ReferenceResolver;

const CAMERA_FILE_SUFFIX: &str = "_CAMERA_IMG.jpg";
const CROP_FILE_SUFFIX: &str = "_CROP_IMG.jpg";

/// Ports and use cases the coordinator drives.
pub struct AcquisitionServices {
    pub resolver: Arc<ReferenceResolver>,
    pub minter: Arc<MintReferenceUseCase>,
    pub delegation: Arc<dyn DelegationPort>,
    pub codec: Arc<dyn ImageCodecPort>,
    pub clock: Arc<dyn ClockPort>,
}

/// Owner-keyed registry of acquisition sessions.
///
/// 按 owner 维护选择会话；只有 `release` 会移除会话。
pub struct AcquisitionCoordinator {
    services: AcquisitionServices,
    defaults: SessionDefaults,
    activities: HashMap<OwnerId, AcquisitionSession>,
    fragments: HashMap<OwnerId, AcquisitionSession>,
}

impl AcquisitionCoordinator {
    pub fn new(services: AcquisitionServices) -> Self {
        Self {
            services,
            defaults: SessionDefaults::default(),
            activities: HashMap::new(),
            fragments: HashMap::new(),
        }
    }

    /// Values every session created from now on starts with.
    pub fn with_session_defaults(mut self, defaults: SessionDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Builder for `owner`'s session, creating the session on first use.
    pub fn with(&mut self, owner: &Owner) -> ChooserHandle<'_> {
        let sessions = match owner.kind {
            OwnerKind::Activity => &mut self.activities,
            OwnerKind::Fragment => &mut self.fragments,
        };
        let defaults = &self.defaults;
        let session = sessions.entry(owner.id.clone()).or_insert_with(|| {
            info!(owner = %owner.id, kind = ?owner.kind, "registering chooser session");
            AcquisitionSession::new(owner.clone(), defaults)
        });
        ChooserHandle::new(session, &self.services)
    }

    /// Route a completion signal from an external step.
    ///
    /// Signals for unknown owners, unknown codes or steps the session is not
    /// waiting on are dropped.
    pub fn on_completion(
        &mut self,
        owner: &Owner,
        code: i32,
        result: ResultCode,
        payload: Option<CompletionPayload>,
    ) {
        let sessions = match owner.kind {
            OwnerKind::Activity => &mut self.activities,
            OwnerKind::Fragment => &mut self.fragments,
        };
        let Some(session) = sessions.get_mut(&owner.id) else {
            debug!(owner = %owner.id, code, "completion for an unregistered owner");
            return;
        };
        let Some(step) = session.config.codes.step_for(code) else {
            debug!(owner = %owner.id, code, "completion with a foreign request code");
            return;
        };
        if session.state.awaited_step() != Some(step) {
            debug!(
                owner = %owner.id,
                code,
                %step,
                state = ?session.state,
                "dropping stale completion"
            );
            return;
        }

        let payload = payload.unwrap_or_default();
        let event = completion_event(&self.services, session, step, result, payload);
        drive(&self.services, session, event);
    }

    /// Forget `owner`'s session. Returns whether one existed.
    pub fn release(&mut self, owner: &Owner) -> bool {
        let sessions = match owner.kind {
            OwnerKind::Activity => &mut self.activities,
            OwnerKind::Fragment => &mut self.fragments,
        };
        let released = sessions.remove(&owner.id).is_some();
        if released {
            info!(owner = %owner.id, "released chooser session");
        }
        released
    }

    fn session(&self, owner: &Owner) -> Option<&AcquisitionSession> {
        match owner.kind {
            OwnerKind::Activity => self.activities.get(&owner.id),
            OwnerKind::Fragment => self.fragments.get(&owner.id),
        }
    }

    pub fn session_state(&self, owner: &Owner) -> Option<AcquisitionState> {
        self.session(owner).map(|s| s.state)
    }

    pub fn session_config(&self, owner: &Owner) -> Option<&SessionConfig> {
        self.session(owner).map(|s| &s.config)
    }

    pub fn session_count(&self) -> usize {
        self.activities.len() + self.fragments.len()
    }
}

/// Feed `event` to the state machine and run the resulting actions until no
/// follow-up event remains.
pub(super) fn drive(
    services: &AcquisitionServices,
    session: &mut AcquisitionSession,
    event: AcquisitionEvent,
) {
    let mut pending = VecDeque::from([event]);
    while let Some(event) = pending.pop_front() {
        let (next, actions) = AcquisitionStateMachine::transition(session.state, event, &session.config);
        session.state = next;
        for action in actions {
            if let Some(follow_up) = execute(services, session, action) {
                pending.push_back(follow_up);
            }
        }
    }
}

fn execute(
    services: &AcquisitionServices,
    session: &mut AcquisitionSession,
    action: AcquisitionAction,
) -> Option<AcquisitionEvent> {
    match action {
        AcquisitionAction::Delegate { step } => delegate_source(services, session, step),
        AcquisitionAction::LaunchCrop { source } => launch_crop(services, session, source),
        AcquisitionAction::Deliver { reference, image } => {
            let image = match image {
                ImagePlan::None => None,
                ImagePlan::Inline => session.inline_image.take(),
                ImagePlan::Decode => decode_reference(services, &reference),
            };
            session.notify(ChooseOutcome::success(Some(reference), image));
            None
        }
        AcquisitionAction::DeliverCropOutput { output, decode } => {
            match services.minter.mint_existing(&output, &session.config.authority) {
                Some(reference) => {
                    let image = if decode {
                        services.codec.decode(&output)
                    } else {
                        None
                    };
                    session.notify(ChooseOutcome::success(Some(reference), image));
                }
                None => {
                    warn!(owner = %session.owner.id, output = %output.display(), "crop produced no output");
                    session.notify(ChooseOutcome::failure(ChooseStatus::NoReference));
                }
            }
            None
        }
        AcquisitionAction::Fail { status } => {
            info!(owner = %session.owner.id, %status, "acquisition failed");
            session.notify(ChooseOutcome::failure(status));
            None
        }
    }
}

fn delegate_source(
    services: &AcquisitionServices,
    session: &mut AcquisitionSession,
    step: Step,
) -> Option<AcquisitionEvent> {
    let request = match step {
        Step::Gallery => match DelegationRequest::pick_image() {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "cannot build gallery request");
                return Some(AcquisitionEvent::DelegationFailed);
            }
        },
        Step::Camera => match ensure_camera_output(services, session) {
            Some(output) => DelegationRequest::CaptureImage { output },
            None => {
                return Some(AcquisitionEvent::LaunchRejected {
                    status: ChooseStatus::MissingOutputLocation,
                })
            }
        },
        Step::FilePicker => DelegationRequest::pick_document(session.config.crop),
        Step::Crop => {
            warn!(owner = %session.owner.id, "crop is only launched after a source step");
            return Some(AcquisitionEvent::DelegationFailed);
        }
    };
    send(services, session, request, step)
}

fn launch_crop(
    services: &AcquisitionServices,
    session: &mut AcquisitionSession,
    source: ContentRef,
) -> Option<AcquisitionEvent> {
    let output_path = ensure_crop_output(services, session);
    let Some(output) = file_reference(&output_path) else {
        return Some(AcquisitionEvent::DelegationFailed);
    };

    let capabilities = services.minter.capabilities();
    let source = if !capabilities.provider_references && capabilities.document_references {
        services
            .resolver
            .resolve_path(&source, Some(ContentType::Image))
            .and_then(|path| file_reference(&path))
            .unwrap_or(source)
    } else {
        source
    };

    let request = CropRequest::square(
        source,
        output,
        session.config.crop_size,
        capabilities.provider_references,
    );
    send(services, session, DelegationRequest::Crop(request), Step::Crop)
}

fn send(
    services: &AcquisitionServices,
    session: &AcquisitionSession,
    request: DelegationRequest,
    step: Step,
) -> Option<AcquisitionEvent> {
    let code = session.config.codes.code_for(step);
    match services.delegation.delegate(&session.owner, request, code) {
        Ok(()) => {
            debug!(owner = %session.owner.id, %step, code, "delegated step");
            None
        }
        Err(e) => {
            warn!(owner = %session.owner.id, %step, error = %e, "cannot open external step");
            Some(AcquisitionEvent::DelegationFailed)
        }
    }
}

/// Camera output reference, generated on first use under the app pictures dir.
fn ensure_camera_output(
    services: &AcquisitionServices,
    session: &mut AcquisitionSession,
) -> Option<ContentRef> {
    let storage = &services.resolver.context().storage;
    if let Some(output) = &session.config.camera_output {
        let target = services
            .resolver
            .resolve_path(output, Some(ContentType::Image));
        if let Some(path) = target.filter(|path| storage.is_private(path)) {
            warn!(
                owner = %session.owner.id,
                path = %path.display(),
                "refusing private camera output location"
            );
            return None;
        }
        return Some(output.clone());
    }

    let Some(dir) = storage.pictures_dir.as_deref() else {
        warn!(owner = %session.owner.id, "no pictures directory for the camera output");
        return None;
    };
    if storage.is_private(dir) {
        warn!(dir = %dir.display(), "refusing private directory as camera output");
        return None;
    }
    if let Err(e) = fs::create_dir_all(dir) {
        warn!(dir = %dir.display(), error = %e, "cannot create camera output directory");
        return None;
    }

    let path = dir.join(format!("{}{CAMERA_FILE_SUFFIX}", services.clock.now_ms()));
    let output = services
        .minter
        .mint_for_output(&path, &session.config.authority)?;
    session.config.camera_output = Some(output.clone());
    Some(output)
}

/// Crop output path, generated on first use under the public pictures dir.
fn ensure_crop_output(services: &AcquisitionServices, session: &mut AcquisitionSession) -> PathBuf {
    if let Some(output) = &session.config.crop_output {
        return output.clone();
    }

    let dir = services.resolver.context().storage.public_pictures_dir();
    if let Err(e) = fs::create_dir_all(&dir) {
        warn!(dir = %dir.display(), error = %e, "cannot create crop output directory");
    }
    let path = dir.join(format!("{}{CROP_FILE_SUFFIX}", services.clock.now_ms()));
    session.config.crop_output = Some(path.clone());
    path
}

fn completion_event(
    services: &AcquisitionServices,
    session: &mut AcquisitionSession,
    step: Step,
    result: ResultCode,
    payload: CompletionPayload,
) -> AcquisitionEvent {
    if step == Step::Crop {
        return AcquisitionEvent::CropCompleted;
    }
    if result == ResultCode::Canceled {
        debug!(owner = %session.owner.id, %step, "step canceled");
        return AcquisitionEvent::SourceMissing {
            step,
            status: ChooseStatus::NoReference,
        };
    }

    let CompletionPayload {
        reference,
        inline_image,
    } = payload;

    match (step, reference, inline_image) {
        (Step::FilePicker, Some(source), _) => {
            let kind = classify(services, &source);
            acquired(step, source, kind, false)
        }
        (Step::FilePicker, None, _) => AcquisitionEvent::SourceMissing {
            step,
            status: ChooseStatus::NoReference,
        },
        (Step::Gallery, Some(source), _) => acquired(step, source, SourceKind::Image, false),
        (_, _, Some(image)) => match persist_inline_image(services, session, &image) {
            Ok(source) => {
                session.inline_image = Some(image);
                acquired(step, source, SourceKind::Image, true)
            }
            Err(status) => AcquisitionEvent::SourceMissing { step, status },
        },
        (Step::Camera, _, None) => match session.config.camera_output.clone() {
            Some(source) => acquired(step, source, SourceKind::Image, false),
            None => AcquisitionEvent::SourceMissing {
                step,
                status: ChooseStatus::NoReference,
            },
        },
        (_, _, None) => AcquisitionEvent::SourceMissing {
            step,
            status: ChooseStatus::NoReference,
        },
    }
}

fn acquired(step: Step, source: ContentRef, kind: SourceKind, from_inline_image: bool) -> AcquisitionEvent {
    AcquisitionEvent::SourceAcquired {
        step,
        source,
        kind,
        from_inline_image,
    }
}

/// Image or not, judged by the extension of the resolved path.
fn classify(services: &AcquisitionServices, source: &ContentRef) -> SourceKind {
    let resolved = services.resolver.resolve_path(source, None);
    match resolved {
        Some(path) if is_croppable_image(&path) => SourceKind::Image,
        other => {
            let file_name = other
                .as_deref()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned())
                .or_else(|| source.last_path_segment())
                .unwrap_or_else(|| source.to_string());
            SourceKind::NotImage { file_name }
        }
    }
}

fn decode_reference(services: &AcquisitionServices, reference: &ContentRef) -> Option<DecodedImage> {
    let path = services
        .resolver
        .resolve_path(reference, Some(ContentType::Image))?;
    let image = services.codec.decode(&path);
    if image.is_none() {
        debug!(path = %path.display(), "decode failed, delivering without image");
    }
    image
}

/// Write an inline image to `<pictures>/<millis>_CAMERA_IMG.jpg` and reference it.
fn persist_inline_image(
    services: &AcquisitionServices,
    session: &AcquisitionSession,
    image: &DecodedImage,
) -> Result<ContentRef, ChooseStatus> {
    let dir = services.resolver.context().storage.public_pictures_dir();
    fs::create_dir_all(&dir).map_err(|e| ChooseStatus::PersistFailed(e.to_string()))?;

    let path = dir.join(format!("{}{CAMERA_FILE_SUFFIX}", services.clock.now_ms()));
    services
        .codec
        .encode_jpeg(image, &path)
        .map_err(|e| ChooseStatus::PersistFailed(e.to_string()))?;

    services
        .minter
        .mint_existing(&path, &session.config.authority)
        .ok_or_else(|| ChooseStatus::PersistFailed(format!("no reference for {}", path.display())))
}
