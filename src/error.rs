pub type EngineResult<T> = Result<T, EngineError>;

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("graphics error: {0}")]
    Graphics(String),

    #[error("platform error: {0}")]
    Platform(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl EngineError {
    pub fn graphics(msg: impl Into<String>) -> Self {
        Self::Graphics(msg.into())
    }

    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(EngineError::graphics("x")
            .to_string()
            .contains("graphics error:"));
        assert!(EngineError::platform("x")
            .to_string()
            .contains("platform error:"));
        assert!(EngineError::invalid_config("x")
            .to_string()
            .contains("invalid config:"));
    }
}
