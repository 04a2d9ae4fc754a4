// External Crate Imports
use curation::AnnotationError;
use miette::Diagnostic;
use thiserror::Error;

pub type Result<T, E = SluiceError> = std::result::Result<T, E>;

#[derive(Debug, Diagnostic, Error)]
pub enum SluiceError {
    #[error("malformed delimited input")]
    Csv(#[from] csv::Error),

    #[error("I/O failure in a pipeline stream")]
    Io(#[from] std::io::Error),

    #[error("no column named {column:?} in the input header")]
    MissingColumn { column: String },

    #[error("editor transform produced {got} output values, expected {expected}")]
    EditorArity { expected: usize, got: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Annotations(#[from] AnnotationError),
}

impl SluiceError {
    pub(crate) fn missing_column(column: &str) -> Self {
        let column = column.to_owned();

        Self::MissingColumn { column }
    }
}
