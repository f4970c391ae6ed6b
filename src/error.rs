use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Quantity column '{0}' is not numeric; convert it before generating reports")]
    TypeCoercion(String),

    #[error("Column '{0}' is not a datetime index; set a proper datetime index first")]
    TemporalIndex(String),

    #[error("A-class threshold selects zero rows")]
    EmptyClass,

    #[error("Unknown report type: '{0}'")]
    UnknownReportType(String),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl ProfileError {
    /// Data-quality errors are expected for messy real-world input and are
    /// surfaced to the user with a remediation hint instead of aborting the
    /// process. Everything else indicates a caller bug.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ProfileError::TypeCoercion(_) | ProfileError::TemporalIndex(_)
        )
    }
}
