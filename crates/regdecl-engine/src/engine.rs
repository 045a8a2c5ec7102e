//! Provisioning engine interface.
//!
//! The engine owns reconciliation: ordering, drift detection, API calls and
//! retries. This crate only hands it a rendered document and reads back the
//! registry outputs.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use regdecl_core::RegistryHandle;
use regdecl_render::RenderedDocument;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{EngineError, Result};

/// An external provisioning engine.
#[async_trait]
pub trait ProvisioningEngine: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Reconciles the document against the live cloud API and returns the
    /// registry outputs.
    async fn reconcile(&self, document: &RenderedDocument) -> Result<RegistryHandle>;
}

/// Engine backed by an external program.
///
/// The program receives the rendered document on stdin and these
/// environment variables:
///
/// - `REGDECL_REPOSITORY` - repository name
/// - `REGDECL_FINGERPRINT` - desired-state fingerprint
/// - `REGDECL_FORMAT` - document layout (`descriptor` or `terraform`)
/// - `REGDECL_ENCODING` - document encoding (`json` or `yaml`)
///
/// On success it must print a JSON object with `repository_url` and
/// `repository_arn` on stdout, either as plain strings or as objects with a
/// `value` field. A non-zero exit status is reported with the program's
/// stderr unchanged.
///
/// # Examples
///
/// ```rust,no_run
/// use regdecl_engine::CommandEngine;
///
/// let engine = CommandEngine::new("./scripts/apply-registry.sh")
///     .arg("--auto-approve")
///     .current_dir("infra");
/// ```
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, String)>,
    current_dir: Option<PathBuf>,
}

impl CommandEngine {
    /// Creates an engine that runs `program`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            current_dir: None,
        }
    }

    /// Appends an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets an extra environment variable for the program.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Sets the program's working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Returns the program path.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    fn io_error(&self, source: std::io::Error) -> EngineError {
        EngineError::Io {
            engine: self.program.clone(),
            source,
        }
    }

    fn parse_outputs(&self, stdout: &str) -> Result<RegistryHandle> {
        let invalid = |reason: String| EngineError::InvalidOutputs {
            engine: self.program.clone(),
            reason,
        };

        let value: Value = serde_json::from_str(stdout.trim())
            .map_err(|e| invalid(format!("stdout is not JSON: {e}")))?;
        let outputs = value
            .as_object()
            .ok_or_else(|| invalid("stdout is not a JSON object".to_string()))?;
        RegistryHandle::from_outputs(outputs).map_err(|e| invalid(e.to_string()))
    }
}

#[async_trait]
impl ProvisioningEngine for CommandEngine {
    fn name(&self) -> &str {
        &self.program
    }

    async fn reconcile(&self, document: &RenderedDocument) -> Result<RegistryHandle> {
        info!(
            engine = %self.program,
            repository = %document.repository,
            fingerprint = %document.fingerprint,
            "Handing document to engine"
        );

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .env("REGDECL_REPOSITORY", &document.repository)
            .env("REGDECL_FINGERPRINT", &document.fingerprint)
            .env("REGDECL_FORMAT", document.format.to_string())
            .env("REGDECL_ENCODING", document.encoding.to_string())
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| EngineError::Spawn {
            engine: self.program.clone(),
            source,
        })?;

        // Feed stdin concurrently so a chatty engine cannot deadlock on a full pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            let content = document.content.clone().into_bytes();
            tokio::spawn(async move {
                let result = stdin.write_all(&content).await;
                drop(stdin);
                result
            })
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.io_error(e))?;

        if let Some(writer) = writer {
            match writer.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    debug!(engine = %self.program, "Engine closed stdin before reading the document");
                }
                Ok(Err(e)) => return Err(self.io_error(e)),
                Err(e) => return Err(self.io_error(std::io::Error::other(e))),
            }
        }

        if !output.status.success() {
            let diagnostic = String::from_utf8_lossy(&output.stderr).into_owned();
            warn!(engine = %self.program, status = %describe_status(output.status), "Engine reported a failure");
            return Err(EngineError::Failed {
                engine: self.program.clone(),
                status: describe_status(output.status),
                diagnostic,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let handle = self.parse_outputs(&stdout)?;
        info!(engine = %self.program, url = %handle.url, arn = %handle.arn, "Engine reconciled registry");
        Ok(handle)
    }
}

fn describe_status(status: ExitStatus) -> String {
    status
        .code()
        .map_or_else(|| "terminated by signal".to_string(), |code| format!("exit code {code}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let engine = CommandEngine::new("apply")
            .arg("--yes")
            .args(["-v", "-x"])
            .env("AWS_REGION", "us-east-1")
            .current_dir("/tmp");

        assert_eq!(engine.program(), "apply");
        assert_eq!(engine.name(), "apply");
        assert_eq!(engine.args, vec!["--yes", "-v", "-x"]);
        assert_eq!(engine.envs.len(), 1);
        assert_eq!(engine.current_dir, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_parse_plain_outputs() {
        let engine = CommandEngine::new("apply");
        let handle = engine
            .parse_outputs(r#"{"repository_url": "u", "repository_arn": "a"}"#)
            .unwrap();
        assert_eq!(handle, RegistryHandle::new("u", "a"));
    }

    #[test]
    fn test_parse_wrapped_outputs() {
        let engine = CommandEngine::new("apply");
        let stdout = r#"
            {"repository_url": {"sensitive": false, "type": "string", "value": "u"},
             "repository_arn": {"sensitive": false, "type": "string", "value": "a"}}
        "#;
        assert_eq!(
            engine.parse_outputs(stdout).unwrap(),
            RegistryHandle::new("u", "a")
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let engine = CommandEngine::new("apply");
        assert!(matches!(
            engine.parse_outputs("Apply complete!"),
            Err(EngineError::InvalidOutputs { .. })
        ));
        assert!(matches!(
            engine.parse_outputs("[1, 2]"),
            Err(EngineError::InvalidOutputs { .. })
        ));
        assert!(matches!(
            engine.parse_outputs(r#"{"repository_url": "u"}"#),
            Err(EngineError::InvalidOutputs { reason, .. }) if reason.contains("repository_arn")
        ));
    }
}
