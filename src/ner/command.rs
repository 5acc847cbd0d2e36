//! NER backend that delegates to an external pretrained pipeline.
//!
//! The configured command receives the text on stdin and must print JSON on
//! stdout, either a bare list of entities or an object with an `entities`
//! list, each entity carrying `text` and `label`. A spaCy wrapper is as small
//! as:
//!
//! ```text
//! import json, sys, spacy
//! nlp = spacy.load("en_core_web_sm")
//! doc = nlp(sys.stdin.read())
//! print(json.dumps([{"text": e.text, "label": e.label_} for e in doc.ents]))
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::Deserialize;

use super::backend::{Entity, NerBackend, NerError};
use crate::ocr::check_binary;

/// Runs an external NER pipeline per request.
pub struct CommandNerBackend {
    program: PathBuf,
    args: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PipelineOutput {
    List(Vec<Entity>),
    Wrapped { entities: Vec<Entity> },
}

impl CommandNerBackend {
    /// Build from a command line: the first element is the program.
    pub fn from_command(command: &[String]) -> Result<Self, NerError> {
        let (program, args) = command.split_first().ok_or_else(|| {
            NerError::BackendNotAvailable("NER command is empty".to_string())
        })?;
        let program = shellexpand::tilde(program).into_owned();

        Ok(Self {
            program: PathBuf::from(program),
            args: args.to_vec(),
        })
    }

    fn parse_output(stdout: &[u8]) -> Result<Vec<Entity>, NerError> {
        let output: PipelineOutput = serde_json::from_slice(stdout)?;
        Ok(match output {
            PipelineOutput::List(entities) => entities,
            PipelineOutput::Wrapped { entities } => entities,
        })
    }
}

impl NerBackend for CommandNerBackend {
    fn backend_id(&self) -> &str {
        "command"
    }

    fn is_available(&self) -> bool {
        check_binary(&self.program)
    }

    fn extract(&self, text: &str) -> Result<Vec<Entity>, NerError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    NerError::BackendNotAvailable(format!(
                        "{} not found",
                        self.program.display()
                    ))
                } else {
                    NerError::Io(e)
                }
            })?;

        // Feed stdin from a separate thread so a chatty pipeline can't deadlock on a full pipe.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| NerError::ExtractionFailed("pipeline stdin unavailable".to_string()))?;
        let input = text.to_owned();
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        match writer.join() {
            Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(e.into()),
            Ok(_) => {}
            Err(_) => {
                return Err(NerError::ExtractionFailed(
                    "stdin writer panicked".to_string(),
                ))
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NerError::ExtractionFailed(format!(
                "{} failed: {}",
                self.program.display(),
                stderr.trim()
            )));
        }

        Self::parse_output(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_output() {
        let entities = CommandNerBackend::parse_output(
            br#"[{"text": "Apple", "label": "ORG"}, {"text": "Steve Jobs", "label": "PERSON"}]"#,
        )
        .unwrap();
        assert_eq!(
            entities,
            vec![Entity::new("Apple", "ORG"), Entity::new("Steve Jobs", "PERSON")]
        );
    }

    #[test]
    fn test_parse_wrapped_output() {
        let entities = CommandNerBackend::parse_output(
            br#"{"entities": [{"text": "California", "label": "GPE", "start": 35}]}"#,
        )
        .unwrap();
        assert_eq!(entities, vec![Entity::new("California", "GPE")]);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            CommandNerBackend::parse_output(b"Traceback (most recent call last)"),
            Err(NerError::InvalidOutput(_))
        ));
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(CommandNerBackend::from_command(&[]).is_err());
    }

    #[test]
    fn test_missing_program() {
        let backend =
            CommandNerBackend::from_command(&["definitely-not-a-ner-pipeline-4f1c".to_string()])
                .unwrap();
        assert!(!backend.is_available());
        assert!(matches!(
            backend.extract("Apple"),
            Err(NerError::BackendNotAvailable(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_pipeline_over_stdin() {
        let script = r#"read -r line; printf '[{"text":"%s","label":"ORG"}]' "$line""#;
        let backend = CommandNerBackend::from_command(&[
            "sh".to_string(),
            "-c".to_string(),
            script.to_string(),
        ])
        .unwrap();

        let entities = backend.extract("Apple\n").unwrap();
        assert_eq!(entities, vec![Entity::new("Apple", "ORG")]);
    }
}
