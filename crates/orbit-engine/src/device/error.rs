use std::fmt;

/// Fatal startup failures. None of them is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupError {
    /// The windowing system could not be initialized.
    EventLoop(String),
    /// The window or its OpenGL context could not be created.
    Window(String),
    /// OpenGL entry points could not be loaded, or the context is too old.
    Loader(String),
}

impl StartupError {
    /// Process exit code reported for any startup failure.
    pub const EXIT_CODE: i32 = -1;
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::EventLoop(msg) => write!(f, "failed to initialize windowing: {msg}"),
            StartupError::Window(msg) => write!(f, "failed to open window: {msg}"),
            StartupError::Loader(msg) => write!(f, "failed to load OpenGL: {msg}"),
        }
    }
}

impl std::error::Error for StartupError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_failures_exit_with_minus_one() {
        assert_eq!(StartupError::EXIT_CODE, -1);
    }

    #[test]
    fn display_names_the_failed_stage() {
        let e = StartupError::Loader("glGetString missing".into());
        assert_eq!(e.to_string(), "failed to load OpenGL: glGetString missing");

        let e = StartupError::Window("no 3.3 config".into());
        assert!(e.to_string().starts_with("failed to open window"));
    }

    #[test]
    fn survives_anyhow_round_trip() {
        let err: anyhow::Error = StartupError::EventLoop("no display".into()).into();
        assert_eq!(
            err.downcast_ref::<StartupError>(),
            Some(&StartupError::EventLoop("no display".into()))
        );
    }
}
