pub type CloudResult<T> = Result<T, CloudError>;

#[derive(thiserror::Error, Debug)]
pub enum CloudError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("channel error: {0}")]
    Channel(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CloudError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

impl From<serde_json::Error> for CloudError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            CloudError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            CloudError::channel("x")
                .to_string()
                .contains("channel error:")
        );
        assert!(CloudError::render("x").to_string().contains("render error:"));
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(
            CloudError::from(json_err)
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = CloudError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn json_errors_map_to_serde() {
        let err: CloudError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, CloudError::Serde(_)));
    }
}
