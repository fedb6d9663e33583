use serde::{Deserialize, Serialize};
use std::fmt;

/// Source the caller picked for the next acquisition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepMode {
    #[default]
    Gallery,
    Camera,
    FilePicker,
}

/// One external step of an acquisition chain. Crop is never launched directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Gallery,
    Camera,
    Crop,
    FilePicker,
}

impl From<StepMode> for Step {
    fn from(mode: StepMode) -> Self {
        match mode {
            StepMode::Gallery => Step::Gallery,
            StepMode::Camera => Step::Camera,
            StepMode::FilePicker => Step::FilePicker,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Gallery => "gallery",
            Step::Camera => "camera",
            Step::Crop => "crop",
            Step::FilePicker => "file_picker",
        };
        f.write_str(name)
    }
}
