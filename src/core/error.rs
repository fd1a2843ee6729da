use thiserror::Error;

#[derive(Error, Debug)]
pub enum EcoError {
    #[error("Invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl EcoError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        EcoError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EcoError>;
