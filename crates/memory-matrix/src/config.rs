use serde::{Deserialize, Serialize};

use crate::error::{MatrixError, Result};
use crate::kind::ElementKind;
use crate::matrix::AnyMatrix;

/// Shape, element kind and fill value of a matrix to allocate.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MatrixConfig {
    pub rows: usize,
    pub cols: usize,
    pub kind: ElementKind,
    pub fill: f64,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 4,
            kind: ElementKind::Float64,
            fill: 0.0,
        }
    }
}

impl MatrixConfig {
    pub fn new(rows: usize, cols: usize, kind: ElementKind, fill: f64) -> Self {
        Self {
            rows,
            cols,
            kind,
            fill,
        }
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| MatrixError::Config(e.to_string()))
    }

    pub fn build(&self) -> Result<AnyMatrix> {
        log::debug!("Building matrix from config: {:?}", self);
        AnyMatrix::new(self.rows, self.cols, self.kind, self.fill)
    }
}
