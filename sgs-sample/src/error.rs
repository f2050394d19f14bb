//! Error kinds for the sampling/stratification core, mapped 1:1 onto the
//! exit-code table of the external-interface spec.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SgsError {
    #[error("invalid geometry in layer '{layer}': expected {expected}, found {found}")]
    InvalidGeometry {
        layer: String,
        expected: String,
        found: String,
    },

    #[error("CRS mismatch: '{left}' vs '{right}'")]
    CrsMismatch { left: String, right: String },

    #[error("dimension mismatch: {detail}")]
    DimensionMismatch { detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("precondition failed for '{param}': {detail}")]
    PreconditionFailure { param: String, detail: String },

    #[error("unsupported output extension '{ext}'")]
    UnsupportedExtension { ext: String },
}

impl SgsError {
    /// Process exit code per the external-interface table. Binding layers
    /// (out of scope here) are expected to call this rather than match on
    /// variants directly.
    pub fn exit_code(&self) -> i32 {
        match self {
            SgsError::InvalidGeometry { .. } => 2,
            SgsError::CrsMismatch { .. } => 2,
            SgsError::DimensionMismatch { .. } => 2,
            SgsError::Io(_) => 3,
            SgsError::PreconditionFailure { .. } => 4,
            SgsError::UnsupportedExtension { .. } => 5,
        }
    }

    pub fn precondition(param: impl Into<String>, detail: impl Into<String>) -> SgsError {
        SgsError::PreconditionFailure {
            param: param.into(),
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SgsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_match_spec_table() {
        assert_eq!(
            SgsError::InvalidGeometry {
                layer: "access".into(),
                expected: "line".into(),
                found: "point".into()
            }
            .exit_code(),
            2
        );
        assert_eq!(
            SgsError::precondition("wrow", "must be in {3,5,7}").exit_code(),
            4
        );
        assert_eq!(
            SgsError::UnsupportedExtension { ext: "png".into() }.exit_code(),
            5
        );
    }
}
