use std::path::PathBuf;

use thiserror::Error;

use crate::selector::{AgentType, AgenticFramework};

/// Errors raised by a scaffold operation.
///
/// Every variant except [`ScaffoldError::Fatal`] is a known scaffolding error:
/// the command reports its message and exits with a failure status. `Fatal`
/// wraps anything else and is propagated untouched.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("agent type `{agent_type}` is not supported for framework `{framework}`")]
    UnsupportedCombination {
        framework: AgenticFramework,
        agent_type: AgentType,
    },

    #[error("cannot scaffold into {} because it already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("template directory {} does not exist", .0.display())]
    TemplatesMissing(PathBuf),

    #[error("invalid agent name `{0}`, it must be usable as a directory name")]
    InvalidName(String),

    #[error("invalid template descriptor {}: {message}", .path.display())]
    InvalidDescriptor { path: PathBuf, message: String },

    #[error("cannot render template {}: {message}", .path.display())]
    Render { path: PathBuf, message: String },

    #[error(transparent)]
    Fatal(#[from] anyhow::Error),
}

impl ScaffoldError {
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Fatal(_))
    }
}

pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_fatal_is_unknown() {
        assert!(ScaffoldError::InvalidName(String::new()).is_known());
        assert!(ScaffoldError::DestinationExists(PathBuf::from("out")).is_known());
        assert!(!ScaffoldError::Fatal(anyhow::anyhow!("disk on fire")).is_known());
    }

    #[test]
    fn messages_name_the_offending_values() {
        let err = ScaffoldError::UnsupportedCombination {
            framework: AgenticFramework::Autogen,
            agent_type: AgentType::PrReview,
        };
        assert_eq!(
            err.to_string(),
            "agent type `pr-review` is not supported for framework `autogen`"
        );
        assert_eq!(
            ScaffoldError::DestinationExists(PathBuf::from("./out/botA")).to_string(),
            "cannot scaffold into ./out/botA because it already exists"
        );
    }
}
