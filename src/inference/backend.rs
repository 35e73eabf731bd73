//! Inference backends: the opaque tensor → scores function.

use crate::error::{Error, Result};
use crate::imaging::ImageTensor;
use ort::session::Session;
use ort::value::Tensor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A model that maps a normalised image tensor to one score per class.
///
/// Implementations are not assumed to be reentrant; callers serialise
/// access through `&mut self`.
pub trait InferenceBackend: Send {
    /// Run the model once, returning scores index-aligned to the label list.
    fn infer(&mut self, input: &ImageTensor) -> Result<Vec<f32>>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// ONNX Runtime backend for models taking an NHWC `[1, size, size, 3]`
/// float input and producing a flat score vector.
pub struct OnnxBackend {
    session: Session,
    path: PathBuf,
}

impl OnnxBackend {
    /// Load an ONNX model from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ModelFileNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut builder = Session::builder().map_err(|e| Error::ModelLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let session = builder.commit_from_file(path).map_err(|e| Error::ModelLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        info!("Loaded ONNX model: {}", path.display());

        Ok(Self {
            session,
            path: path.to_path_buf(),
        })
    }
}

impl InferenceBackend for OnnxBackend {
    fn infer(&mut self, input: &ImageTensor) -> Result<Vec<f32>> {
        let tensor =
            Tensor::from_array((input.shape(), input.data.clone())).map_err(|e| Error::Inference {
                reason: format!("failed to build input tensor: {e}"),
            })?;

        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .map_err(|e| Error::Inference {
                reason: e.to_string(),
            })?;

        let (_, scores) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Inference {
                reason: format!("failed to read output tensor: {e}"),
            })?;

        debug!("{} returned {} scores", self.path.display(), scores.len());
        Ok(scores.to_vec())
    }

    fn describe(&self) -> String {
        format!("onnx:{}", self.path.display())
    }
}
