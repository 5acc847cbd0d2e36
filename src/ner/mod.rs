//! Named Entity Recognition.
//!
//! Provides a `NerBackend` trait with two implementations:
//! - `RuleNerBackend`: gazetteers and surface patterns, no model files (default)
//! - `CommandNerBackend`: an external pretrained pipeline run per request

mod backend;
mod command;
mod rules;

use std::sync::Arc;

pub use backend::{Entity, NerBackend, NerError};
pub use command::CommandNerBackend;
pub use rules::RuleNerBackend;

/// Select a backend by name (`rules` or `command`).
pub fn build_backend(name: &str, command: &[String]) -> Result<Arc<dyn NerBackend>, NerError> {
    match name.to_lowercase().as_str() {
        "rules" | "regex" => Ok(Arc::new(RuleNerBackend::new())),
        "command" | "external" => Ok(Arc::new(CommandNerBackend::from_command(command)?)),
        other => Err(NerError::UnknownBackend(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_backend() {
        assert_eq!(build_backend("rules", &[]).unwrap().backend_id(), "rules");
        assert_eq!(
            build_backend("Command", &["python3".to_string()])
                .unwrap()
                .backend_id(),
            "command"
        );
        assert!(matches!(
            build_backend("bert", &[]),
            Err(NerError::UnknownBackend(_))
        ));
        assert!(build_backend("command", &[]).is_err());
    }
}
