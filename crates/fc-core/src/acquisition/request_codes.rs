use serde::{Deserialize, Serialize};

use super::mode::Step;

/// Correlation codes tagging each external step.
///
/// Completion signals carry the code back; the coordinator maps it to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCodes {
    pub gallery: i32,
    pub camera: i32,
    pub crop: i32,
    pub file: i32,
}

impl Default for RequestCodes {
    fn default() -> Self {
        Self {
            gallery: 102,
            camera: 103,
            crop: 104,
            file: 105,
        }
    }
}

impl RequestCodes {
    pub fn code_for(&self, step: Step) -> i32 {
        match step {
            Step::Gallery => self.gallery,
            Step::Camera => self.camera,
            Step::Crop => self.crop,
            Step::FilePicker => self.file,
        }
    }

    /// Step a code belongs to. When a caller configures colliding codes the first
    /// match in gallery, camera, file, crop order wins.
    pub fn step_for(&self, code: i32) -> Option<Step> {
        [Step::Gallery, Step::Camera, Step::FilePicker, Step::Crop]
            .into_iter()
            .find(|step| self.code_for(*step) == code)
    }
}
