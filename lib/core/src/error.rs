use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown field type: {0}")]
    UnknownFieldType(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Dataset error in {category}: {message}")]
    Dataset { category: String, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(err: &Error) -> &'static str {
        match err {
            Error::UnknownFieldType(_) | Error::UnknownCategory(_) => "label",
            Error::Dataset { .. } => "dataset",
            Error::Storage(_) | Error::Io(_) => "storage",
            Error::Serialization(_) => "serialization",
            Error::InvalidConfig(_) => "config",
        }
    }

    #[test]
    fn test_messages() {
        let err: Error = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert_eq!(kind(&err), "serialization");
        assert!(err.to_string().starts_with("Serialization error"));

        let err = Error::Dataset {
            category: "address".into(),
            message: "category mismatch".into(),
        };
        assert_eq!(kind(&err), "dataset");
        assert_eq!(err.to_string(), "Dataset error in address: category mismatch");
    }
}
