//! Per-cell rendering with failure containment.

use std::panic::{self, AssertUnwindSafe};

use propmatrix_model::PropertyCombination;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Error returned by a story's render callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A story's render callback: props in, renderer-specific node out.
pub type RenderFn<N> = dyn Fn(&PropertyCombination) -> Result<N, RenderError>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CellContent<N> {
    Rendered { node: N },
    /// Inline error marker confined to this cell.
    Failed { message: String },
}

/// One rendered grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellNode<N> {
    /// Index into the filtered and sorted sequence.
    pub position: usize,
    /// Index into the generation result.
    pub ordinal: usize,
    pub label: String,
    pub content: CellContent<N>,
}

impl<N> CellNode<N> {
    pub fn is_failed(&self) -> bool {
        matches!(self.content, CellContent::Failed { .. })
    }
}

/// Renders one combination, turning errors and panics into a failed cell.
pub fn render_cell<N>(
    combination: &PropertyCombination,
    position: usize,
    render: &RenderFn<N>,
) -> CellNode<N> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| render(combination)));
    let content = match outcome {
        Ok(Ok(node)) => CellContent::Rendered { node },
        Ok(Err(error)) => {
            warn!(label = %combination.label, %error, "cell render failed");
            CellContent::Failed {
                message: error.message,
            }
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(label = %combination.label, %message, "cell render panicked");
            CellContent::Failed { message }
        }
    };
    CellNode {
        position,
        ordinal: combination.ordinal,
        label: combination.label.clone(),
        content,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "render panicked".to_string()
    }
}
