/// Broad category of an [`AnalysisError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum ErrorKind {
    /// The request or the data cannot support the computation.
    #[display("invalid input")]
    InvalidInput,
    /// The data is well-formed but the statistic is mathematically undefined.
    #[display("degenerate computation")]
    DegenerateComputation,
}

/// Error returned by every engine.
///
/// Each variant carries the context needed to explain the failure (field
/// names, record counts) so that callers can build their own messages.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("dataset is empty")]
    EmptyDataset,
    #[display("field specification is empty")]
    EmptyFieldSpec,
    #[display("field '{field}' does not exist in the dataset")]
    UnknownField { field: String },
    #[display(
        "field '{field}' has {found} usable observation(s) but at least {required} are required ({dropped} dropped)"
    )]
    InsufficientData {
        field: String,
        required: usize,
        found: usize,
        dropped: usize,
    },
    #[display("degenerate regression: no x-variance in '{x_field}' across {count} point(s)")]
    NoXVariance { x_field: String, count: usize },
    #[display(
        "degenerate regression: fitting '{y_field}' against '{x_field}' gives a non-finite line"
    )]
    NonFiniteFit { x_field: String, y_field: String },
    #[display("risk set depleted in group '{group}' with {remaining} record(s) left")]
    RiskSetDepleted { group: String, remaining: usize },
}

impl AnalysisError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::EmptyDataset
            | AnalysisError::EmptyFieldSpec
            | AnalysisError::UnknownField { .. }
            | AnalysisError::InsufficientData { .. } => ErrorKind::InvalidInput,
            AnalysisError::NoXVariance { .. }
            | AnalysisError::NonFiniteFit { .. }
            | AnalysisError::RiskSetDepleted { .. } => ErrorKind::DegenerateComputation,
        }
    }
}
