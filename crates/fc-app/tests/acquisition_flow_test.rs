//! End-to-end acquisition flows against recording fakes and the desktop adapters.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use fc_app::{
    AcquisitionCoordinator, AcquisitionServices, MintReferenceUseCase, ReferenceResolver,
    ResolverContext,
};
use fc_core::acquisition::{DelegationRequest, DocumentAction};
use fc_core::ports::{ClockPort, DelegationError, DelegationPort, ImageCodecPort};
use fc_core::{
    AcquisitionState, Capabilities, ChooseOutcome, ChooseStatus, CompletionPayload, ContentRef,
    DecodedImage, FileProviderRoots, Owner, RequestCodes, ResultCode, SessionDefaults,
    StorageDirs,
};
use fc_platform::{ImageCrateCodec, InMemoryContentIndex, LocalContentStreams, LocalFileProvider};
use tempfile::TempDir;

const PACKAGE: &str = "com.pichs.app";
const AUTHORITY: &str = "com.pichs.app.fileprovider";

#[derive(Default)]
struct RecordingDelegation {
    requests: Mutex<Vec<(Owner, DelegationRequest, i32)>>,
    fail: bool,
}

impl RecordingDelegation {
    fn requests(&self) -> Vec<(Owner, DelegationRequest, i32)> {
        self.requests.lock().unwrap().clone()
    }

    fn last(&self) -> (DelegationRequest, i32) {
        let (_, request, code) = self.requests.lock().unwrap().last().cloned().unwrap();
        (request, code)
    }
}

impl DelegationPort for RecordingDelegation {
    fn delegate(
        &self,
        owner: &Owner,
        request: DelegationRequest,
        code: i32,
    ) -> Result<(), DelegationError> {
        if self.fail {
            return Err(DelegationError::NoHandler(format!("{request:?}")));
        }
        self.requests
            .lock()
            .unwrap()
            .push((owner.clone(), request, code));
        Ok(())
    }
}

struct TickingClock(AtomicI64);

impl ClockPort for TickingClock {
    fn now_ms(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

struct Harness {
    _root: TempDir,
    storage: StorageDirs,
    index: Arc<InMemoryContentIndex>,
    delegation: Arc<RecordingDelegation>,
    coordinator: AcquisitionCoordinator,
    outcomes: Rc<RefCell<Vec<ChooseOutcome>>>,
}

impl Harness {
    fn new() -> Self {
        Self::build(Capabilities::modern(), true, false)
    }

    fn build(capabilities: Capabilities, with_pictures_dir: bool, failing_delegation: bool) -> Self {
        let root = TempDir::new().unwrap();
        let external_root = root.path().join("sdcard");
        std::fs::create_dir_all(&external_root).unwrap();
        let storage = StorageDirs {
            volumes_root: root.path().to_path_buf(),
            pictures_dir: with_pictures_dir.then(|| {
                external_root.join("Android/data/com.pichs.app/files/Pictures")
            }),
            cache_dir: root.path().join("app/cache"),
            private_data_dir: root.path().join("app/files"),
            external_root,
        };

        let index = Arc::new(InMemoryContentIndex::new());
        let roots = FileProviderRoots::from_storage_dirs(&storage);
        let streams = LocalContentStreams::new(index.clone()).with_provider(AUTHORITY, roots.clone());
        let mut resolver = ReferenceResolver::with_default_strategies(ResolverContext {
            capabilities,
            storage: storage.clone(),
            query: index.clone(),
            streams: Arc::new(streams),
        });
        resolver.register_file_provider(AUTHORITY, roots.clone());

        let delegation = Arc::new(RecordingDelegation {
            fail: failing_delegation,
            ..RecordingDelegation::default()
        });
        let coordinator = AcquisitionCoordinator::new(AcquisitionServices {
            resolver: Arc::new(resolver),
            minter: Arc::new(MintReferenceUseCase::new(
                capabilities,
                Arc::new(LocalFileProvider::new(roots)),
            )),
            delegation: delegation.clone(),
            codec: Arc::new(ImageCrateCodec),
            clock: Arc::new(TickingClock(AtomicI64::new(1000))),
        });

        Self {
            _root: root,
            storage,
            index,
            delegation,
            coordinator,
            outcomes: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn with_session_defaults(mut self, defaults: SessionDefaults) -> Self {
        self.coordinator = self.coordinator.with_session_defaults(defaults);
        self
    }

    fn owner() -> Owner {
        Owner::activity("main", PACKAGE)
    }

    fn listener(&self) -> impl FnMut(ChooseOutcome) + 'static {
        let outcomes = self.outcomes.clone();
        move |outcome| outcomes.borrow_mut().push(outcome)
    }

    fn complete(&mut self, code: i32, payload: Option<CompletionPayload>) {
        self.coordinator
            .on_completion(&Self::owner(), code, ResultCode::Ok, payload);
    }

    fn state(&self) -> Option<AcquisitionState> {
        self.coordinator.session_state(&Self::owner())
    }

    fn outcomes(&self) -> Vec<ChooseOutcome> {
        self.outcomes.borrow().clone()
    }

    fn pictures(&self) -> PathBuf {
        self.storage.public_pictures_dir()
    }
}

fn reference(s: &str) -> ContentRef {
    ContentRef::parse(s).unwrap()
}

fn write_jpeg(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let image = DecodedImage::new(2, 2, vec![128; 16]).unwrap();
    ImageCrateCodec.encode_jpeg(&image, path).unwrap();
}

#[test]
fn gallery_pick_without_crop_delivers_reference_once() {
    let mut h = Harness::new();
    let listener = h.listener();
    h.coordinator
        .with(&Harness::owner())
        .listener(listener)
        .gallery()
        .open();

    let (request, code) = h.delegation.last();
    assert_eq!(code, 102);
    assert!(matches!(request, DelegationRequest::PickImage { .. }));
    assert_eq!(h.state(), Some(AcquisitionState::AwaitingGallery));

    let picked = reference("content://media/external/images/media/42");
    h.complete(102, Some(CompletionPayload::with_reference(picked.clone())));

    let outcomes = h.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].reference, Some(picked));
    assert_eq!(outcomes[0].image, None);
    assert_eq!(outcomes[0].message(), "success");
    assert_eq!(h.state(), Some(AcquisitionState::Idle));
}

#[test]
fn camera_with_crop_delivers_crop_output_only() {
    let mut h = Harness::new();
    let listener = h.listener();
    h.coordinator
        .with(&Harness::owner())
        .with_crop(true)
        .crop_size(300)
        .listener(listener)
        .camera()
        .open();

    let (request, code) = h.delegation.last();
    assert_eq!(code, 103);
    let DelegationRequest::CaptureImage { output: camera_output } = request else {
        panic!("expected a capture request, got {request:?}");
    };
    assert_eq!(
        camera_output.as_str(),
        "content://com.pichs.app.fileprovider/external_files/1000_CAMERA_IMG.jpg"
    );
    write_jpeg(&h.pictures().join("1000_CAMERA_IMG.jpg"));

    h.complete(103, None);
    assert!(h.outcomes().is_empty());
    assert_eq!(h.state(), Some(AcquisitionState::AwaitingCrop));

    let (request, code) = h.delegation.last();
    assert_eq!(code, 104);
    let DelegationRequest::Crop(crop) = request else {
        panic!("expected a crop request, got {request:?}");
    };
    assert_eq!(crop.source, camera_output);
    assert_eq!((crop.output_x, crop.output_y), (300, 300));
    assert_eq!((crop.aspect_x, crop.aspect_y), (1, 1));
    assert!(crop.grant_uri_permissions);
    let crop_path = crop.output.to_file_path().unwrap();
    assert_eq!(crop_path, h.pictures().join("1001_CROP_IMG.jpg"));
    write_jpeg(&crop_path);

    h.complete(104, None);

    let outcomes = h.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_success());
    assert_eq!(
        outcomes[0].reference.as_ref().map(ContentRef::as_str),
        Some("content://com.pichs.app.fileprovider/external_files/1001_CROP_IMG.jpg")
    );
    assert_eq!(h.state(), Some(AcquisitionState::Idle));
}

#[test]
fn file_picker_crop_of_pdf_fails_without_crop_delegation() {
    let mut h = Harness::new();
    let pdf = h.storage.external_root.join("Download/doc.pdf");
    std::fs::create_dir_all(pdf.parent().unwrap()).unwrap();
    std::fs::write(&pdf, b"%PDF").unwrap();
    let picked = ContentRef::from_file_path(&pdf).unwrap();

    let listener = h.listener();
    h.coordinator
        .with(&Harness::owner())
        .with_crop(true)
        .listener(listener)
        .file()
        .open();
    let (request, code) = h.delegation.last();
    assert_eq!(code, 105);
    assert!(matches!(
        request,
        DelegationRequest::PickDocument {
            action: DocumentAction::OpenDocument,
            ..
        }
    ));

    h.complete(105, Some(CompletionPayload::with_reference(picked)));

    let outcomes = h.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(
        outcomes[0].status,
        ChooseStatus::UnsupportedCropInput {
            file_name: "doc.pdf".to_string()
        }
    );
    assert_eq!(outcomes[0].reference, None);
    assert_eq!(h.delegation.requests().len(), 1);
    assert_eq!(h.state(), Some(AcquisitionState::Idle));
}

#[test]
fn file_picker_without_crop_classifies_through_the_index() {
    let mut h = Harness::new();
    let photo = h.storage.external_root.join("DCIM/a.jpg");
    write_jpeg(&photo);
    let picked = reference("content://com.vendor.files/item/9");
    let mut row = fc_platform::ContentRow::new();
    row.insert("_data".to_string(), photo.to_string_lossy().into_owned());
    h.index.insert(&picked, row).unwrap();

    let listener = h.listener();
    h.coordinator
        .with(&Harness::owner())
        .as_image(true)
        .listener(listener)
        .file()
        .open();
    assert!(matches!(
        h.delegation.last().0,
        DelegationRequest::PickDocument {
            action: DocumentAction::GetContent,
            ..
        }
    ));

    h.complete(105, Some(CompletionPayload::with_reference(picked.clone())));

    let outcomes = h.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].reference, Some(picked));
    let image = outcomes[0].image.as_ref().expect("decoded image");
    assert_eq!((image.width(), image.height()), (2, 2));
}

#[test]
fn stale_gallery_signal_after_camera_relaunch_is_dropped() {
    let mut h = Harness::new();
    let listener = h.listener();
    h.coordinator
        .with(&Harness::owner())
        .listener(listener)
        .gallery()
        .open();
    h.coordinator.with(&Harness::owner()).camera().open();

    h.complete(
        102,
        Some(CompletionPayload::with_reference(reference(
            "content://media/external/images/media/42",
        ))),
    );

    assert!(h.outcomes().is_empty());
    assert_eq!(h.state(), Some(AcquisitionState::AwaitingCamera));
}

#[test]
fn camera_without_public_location_fails_immediately() {
    let mut h = Harness::build(Capabilities::modern(), false, false);
    let listener = h.listener();
    h.coordinator
        .with(&Harness::owner())
        .listener(listener)
        .camera()
        .open();

    assert!(h.delegation.requests().is_empty());
    let outcomes = h.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status, ChooseStatus::MissingOutputLocation);
    assert_eq!(h.state(), Some(AcquisitionState::Idle));
}

#[test]
fn missing_handler_returns_to_idle_silently() {
    let mut h = Harness::build(Capabilities::modern(), true, true);
    let listener = h.listener();
    h.coordinator
        .with(&Harness::owner())
        .listener(listener)
        .gallery()
        .open();

    assert!(h.outcomes().is_empty());
    assert_eq!(h.state(), Some(AcquisitionState::Idle));
}

#[test]
fn private_camera_output_is_refused() {
    let mut h = Harness::new();
    let listener = h.listener();
    let private_output =
        ContentRef::from_file_path(&h.storage.private_data_dir.join("shot.jpg")).unwrap();
    h.coordinator
        .with(&Harness::owner())
        .camera_output(private_output)
        .listener(listener)
        .camera()
        .open();

    assert!(h.delegation.requests().is_empty());
    let outcomes = h.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status, ChooseStatus::MissingOutputLocation);
    assert_eq!(h.state(), Some(AcquisitionState::Idle));
}

#[test]
fn public_camera_output_from_caller_is_used() {
    let mut h = Harness::new();
    let output_path = h.storage.external_root.join("DCIM/shot.jpg");
    let output = ContentRef::from_file_path(&output_path).unwrap();
    h.coordinator
        .with(&Harness::owner())
        .camera_output(output.clone())
        .camera()
        .open();

    let (request, code) = h.delegation.last();
    assert_eq!(code, 103);
    assert_eq!(request, DelegationRequest::CaptureImage { output });
    assert_eq!(h.state(), Some(AcquisitionState::AwaitingCamera));
}

#[test]
fn gallery_crop_decodes_the_crop_output() {
    let mut h = Harness::new();
    let listener = h.listener();
    h.coordinator
        .with(&Harness::owner())
        .with_crop(true)
        .as_image(true)
        .listener(listener)
        .gallery()
        .open();

    let picked = reference("content://media/external/images/media/42");
    h.complete(102, Some(CompletionPayload::with_reference(picked.clone())));
    assert!(h.outcomes().is_empty());
    assert_eq!(h.state(), Some(AcquisitionState::AwaitingCrop));

    let (request, code) = h.delegation.last();
    assert_eq!(code, 104);
    let DelegationRequest::Crop(crop) = request else {
        panic!("expected a crop request, got {request:?}");
    };
    assert_eq!(crop.source, picked);
    assert!(crop.grant_uri_permissions);
    let crop_path = crop.output.to_file_path().unwrap();
    assert_eq!(crop_path, h.pictures().join("1000_CROP_IMG.jpg"));
    write_jpeg(&crop_path);

    h.complete(104, None);

    let outcomes = h.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_success());
    assert_eq!(
        outcomes[0].reference.as_ref().map(ContentRef::as_str),
        Some("content://com.pichs.app.fileprovider/external_files/1000_CROP_IMG.jpg")
    );
    let image = outcomes[0].image.as_ref().unwrap();
    assert_eq!((image.width(), image.height()), (2, 2));
    assert_eq!(h.state(), Some(AcquisitionState::Idle));
}

#[test]
fn gallery_inline_image_is_persisted_and_handed_back() {
    let mut h = Harness::new();
    let listener = h.listener();
    h.coordinator
        .with(&Harness::owner())
        .listener(listener)
        .gallery()
        .open();

    let inline = DecodedImage::new(2, 2, vec![200; 16]).unwrap();
    h.complete(102, Some(CompletionPayload::with_inline_image(inline.clone())));

    let outcomes = h.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_success());
    assert_eq!(outcomes[0].image, Some(inline));
    assert_eq!(
        outcomes[0].reference.as_ref().map(ContentRef::as_str),
        Some("content://com.pichs.app.fileprovider/external_files/1000_CAMERA_IMG.jpg")
    );
    assert!(h.pictures().join("1000_CAMERA_IMG.jpg").exists());
    assert_eq!(h.state(), Some(AcquisitionState::Idle));
}

#[test]
fn inline_camera_image_is_persisted_and_handed_back() {
    let mut h = Harness::new();
    let listener = h.listener();
    h.coordinator
        .with(&Harness::owner())
        .listener(listener)
        .camera()
        .open();

    let inline = DecodedImage::new(3, 3, vec![90; 36]).unwrap();
    h.complete(103, Some(CompletionPayload::with_inline_image(inline.clone())));

    let outcomes = h.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].image, Some(inline));
    assert_eq!(
        outcomes[0].reference.as_ref().map(ContentRef::as_str),
        Some("content://com.pichs.app.fileprovider/external_files/1001_CAMERA_IMG.jpg")
    );
    assert!(h.pictures().join("1001_CAMERA_IMG.jpg").exists());
}

#[test]
fn gallery_without_reference_or_image_reports_no_reference() {
    let mut h = Harness::new();
    let listener = h.listener();
    h.coordinator
        .with(&Harness::owner())
        .listener(listener)
        .gallery()
        .open();

    h.complete(102, Some(CompletionPayload::default()));

    let outcomes = h.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status, ChooseStatus::NoReference);
}

#[test]
fn canceled_step_ends_the_cycle_with_a_failure() {
    let mut h = Harness::new();
    let listener = h.listener();
    h.coordinator
        .with(&Harness::owner())
        .listener(listener)
        .gallery()
        .open();

    h.coordinator
        .on_completion(&Harness::owner(), 102, ResultCode::Canceled, None);

    assert_eq!(h.outcomes().len(), 1);
    assert!(!h.outcomes()[0].is_success());
    assert_eq!(h.state(), Some(AcquisitionState::Idle));
}

#[test]
fn legacy_document_tier_crops_the_resolved_file() {
    let mut h = Harness::build(Capabilities::for_api_level(21), true, false);
    let photo = h.storage.external_root.join("DCIM/Camera/b.jpg");
    write_jpeg(&photo);

    let listener = h.listener();
    h.coordinator
        .with(&Harness::owner())
        .with_crop(true)
        .listener(listener)
        .gallery()
        .open();
    h.complete(
        102,
        Some(CompletionPayload::with_reference(reference(
            "content://com.android.externalstorage.documents/document/primary%3ADCIM%2FCamera%2Fb.jpg",
        ))),
    );

    let DelegationRequest::Crop(crop) = h.delegation.last().0 else {
        panic!("expected a crop request");
    };
    assert_eq!(crop.source.to_file_path(), Some(photo));
    assert!(!crop.grant_uri_permissions);
}

#[test]
fn sessions_persist_settings_until_released() {
    let mut h = Harness::new();
    let owner = Harness::owner();
    h.coordinator
        .with(&owner)
        .request_code_for_gallery(7)
        .with_crop(true)
        .crop_output_file(h.storage.private_data_dir.join("out.jpg"));

    let config = h.coordinator.session_config(&owner).unwrap();
    assert_eq!(config.codes.gallery, 7);
    assert!(config.crop);
    assert_eq!(config.crop_output, None);
    assert_eq!(config.authority, AUTHORITY);

    h.coordinator.with(&owner).reset();
    let config = h.coordinator.session_config(&owner).unwrap();
    assert!(!config.crop);
    assert_eq!(config.codes.gallery, 7);

    let fragment = Owner::fragment("main", PACKAGE);
    h.coordinator.with(&fragment);
    assert_eq!(h.coordinator.session_count(), 2);

    assert!(h.coordinator.release(&owner));
    assert!(!h.coordinator.release(&owner));
    assert_eq!(h.coordinator.session_count(), 1);
    assert_eq!(h.state(), None);
}

#[test]
fn completion_after_release_is_ignored() {
    let mut h = Harness::new();
    let listener = h.listener();
    h.coordinator
        .with(&Harness::owner())
        .listener(listener)
        .gallery()
        .open();
    h.coordinator.release(&Harness::owner());

    h.complete(
        102,
        Some(CompletionPayload::with_reference(reference(
            "content://media/external/images/media/1",
        ))),
    );
    assert!(h.outcomes().is_empty());
}

#[test]
fn host_defaults_seed_new_sessions() {
    let mut h = Harness::new().with_session_defaults(SessionDefaults {
        crop_size: Some(320),
        as_image: true,
        codes: RequestCodes {
            gallery: 7,
            ..RequestCodes::default()
        },
        authority: None,
    });
    let listener = h.listener();
    h.coordinator
        .with(&Harness::owner())
        .listener(listener)
        .gallery()
        .open();

    let (_, code) = h.delegation.last();
    assert_eq!(code, 7);
    let config = h.coordinator.session_config(&Harness::owner()).unwrap();
    assert_eq!(config.crop_size, 320);
    assert!(config.as_image);
    assert_eq!(config.authority, AUTHORITY);

    h.complete(102, None);
    assert_eq!(h.state(), Some(AcquisitionState::AwaitingGallery));
    assert!(h.outcomes().is_empty());
}
