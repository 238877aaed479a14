use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{info, warn};

use crate::CorrectionError;
use crate::camera::DEFAULT_FOCAL_LENGTH;
use crate::decoder;
use crate::distortion::{ControlSnapshot, DistortionCoefficients};
use crate::draw;
use crate::encoder;
use crate::grid::GridSpec;
use crate::remap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Loaded,
    Editing,
    Saved,
}

/// Owns everything the interactive loop mutates. One instance per process,
/// single threaded.
#[derive(Debug)]
pub struct SessionState {
    original: Option<RgbImage>,
    corrected: Option<RgbImage>,
    coefficients: DistortionCoefficients,
    grid: GridSpec,
    output_path: Option<PathBuf>,
    focal_length: f64,
    phase: Phase,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        SessionState {
            original: None,
            corrected: None,
            coefficients: DistortionCoefficients::new(),
            grid: GridSpec::default(),
            output_path: None,
            focal_length: DEFAULT_FOCAL_LENGTH,
            phase: Phase::Empty,
        }
    }

    /// Loads a new source image, resets the coefficients and computes the
    /// identity-coefficient corrected image. `None` (a cancelled dialog) is
    /// a no-op; any failure leaves the session untouched.
    pub fn open_image(&mut self, path: Option<&Path>) -> Result<Phase, CorrectionError> {
        let Some(path) = path else {
            return Ok(self.phase);
        };
        let image = match decoder::load_image(path) {
            Ok(image) => image,
            Err(error) => {
                warn!("could not open image {:?}: {}", path, error);
                return Err(error);
            }
        };
        let coefficients = DistortionCoefficients::new();
        let corrected = match remap::correct(&image, &coefficients, self.focal_length) {
            Ok(corrected) => corrected,
            Err(error) => {
                warn!("could not correct freshly opened {:?}: {}", path, error);
                return Err(error);
            }
        };
        info!(
            "loaded image {:?} ({}x{})",
            path,
            image.width(),
            image.height()
        );
        self.original = Some(image);
        self.corrected = Some(corrected);
        self.coefficients = coefficients;
        self.phase = Phase::Loaded;
        Ok(self.phase)
    }

    // a failed recomputation keeps the previous corrected image
    pub fn edit_coefficients(
        &mut self,
        controls: ControlSnapshot,
    ) -> Result<Phase, CorrectionError> {
        self.coefficients.apply_controls(controls);
        let Some(original) = self.original.as_ref() else {
            return Ok(self.phase);
        };
        match remap::correct(original, &self.coefficients, self.focal_length) {
            Ok(corrected) => {
                self.corrected = Some(corrected);
                self.phase = Phase::Editing;
                Ok(self.phase)
            }
            Err(error) => {
                warn!("keeping previous corrected image: {}", error);
                Err(error)
            }
        }
    }

    /// `Ok(None)` means no path is bound yet and the caller has to pick one
    /// via `save_as`.
    pub fn save(&mut self) -> Result<Option<PathBuf>, CorrectionError> {
        match self.output_path.clone() {
            Some(path) => self.save_as(path),
            None => Ok(None),
        }
    }

    // the path stays bound even when the write fails, so a retry can reuse it
    pub fn save_as(&mut self, path: PathBuf) -> Result<Option<PathBuf>, CorrectionError> {
        let Some(corrected) = self.corrected.as_ref() else {
            debug_assert!(false, "save without a loaded image");
            return Ok(None);
        };
        let written = encoder::save_jpeg(corrected, &path);
        self.output_path = Some(path.clone());
        match written {
            Ok(()) => {
                info!("saved corrected image to {:?}", path);
                self.phase = Phase::Saved;
                Ok(Some(path))
            }
            Err(error) => {
                warn!("could not save corrected image to {:?}: {}", path, error);
                Err(error)
            }
        }
    }

    /// The display surface: the corrected image with the grid on top when
    /// enabled. The saved file never includes the grid.
    pub fn preview(&self) -> Option<RgbImage> {
        let corrected = self.corrected.as_ref()?;
        let mut preview = corrected.clone();
        if self.grid.division > 1 {
            draw::draw_grid(&mut preview, &self.grid);
        }
        Some(preview)
    }

    pub fn control_summary(&self) -> String {
        self.coefficients.controls().to_string()
    }

    pub fn controls(&self) -> ControlSnapshot {
        self.coefficients.controls()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn original(&self) -> Option<&RgbImage> {
        self.original.as_ref()
    }

    pub fn corrected(&self) -> Option<&RgbImage> {
        self.corrected.as_ref()
    }

    pub fn coefficients(&self) -> &DistortionCoefficients {
        &self.coefficients
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn set_grid(&mut self, grid: GridSpec) {
        self.grid = grid;
    }

    // takes effect on the next recomputation
    pub fn set_focal_length(&mut self, focal_length: f64) {
        self.focal_length = focal_length;
    }

    pub fn focal_length(&self) -> f64 {
        self.focal_length
    }
}
