use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageFxError {
    #[error("No element matches selector `{0}`")]
    MissingTarget(String),

    #[error("Unsupported environment: {0} is not available")]
    UnsupportedEnvironment(&'static str),

    #[error("Invalid selector: {0}")]
    InvalidSelector(#[from] pagecss::PcssError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Runtime error: {0}")]
    RuntimeInit(String),

    #[error("Log file error: {0}")]
    IO(#[from] std::io::Error),

    #[error("A logger was already installed")]
    Logger(#[from] log::SetLoggerError),
}

impl PageFxError {
    /// Errors that only mean "skip this enhancement": the page keeps working
    /// without it and nothing is reported to the user.
    pub fn is_degradation(&self) -> bool {
        matches!(
            self,
            PageFxError::MissingTarget(_) | PageFxError::UnsupportedEnvironment(_)
        )
    }
}

// Create a type alias for convenience
pub type Result<T> = std::result::Result<T, PageFxError>;
