//! Errors for this library

/// All the known errors returned by this crate.
#[derive(Debug, snafu::Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FieldError {
    #[snafu(display("The animation is already running"))]
    /// `start()` was called on an animation that hasn't been stopped.
    AlreadyRunning,

    #[snafu(display("The animation hasn't been started"))]
    /// Frames were requested before `start()`.
    NotRunning,

    /// General errors that don't need to be matched on
    #[snafu(whatever, display("{message}"))]
    Whatever {
        /// A helpful message acompanying the error
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error + Send + Sync>, Some)))]
        /// The parent error type
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}
