//! Check, render and hand off in one step.

use regdecl_core::{RegistryConfig, RegistryDescriptor, RegistryHandle};
use regdecl_render::{CheckReport, Checker, CheckerConfig, RenderedDocument, Renderer};
use tracing::{info, warn};

use crate::engine::ProvisioningEngine;
use crate::error::ProvisionError;

/// A checked and rendered configuration, not yet handed to the engine.
#[derive(Debug, Clone)]
pub struct Plan {
    /// The descriptor built from the configuration.
    pub descriptor: RegistryDescriptor,
    /// The document the engine will receive.
    pub document: RenderedDocument,
    /// Check report, including warnings and hints.
    pub report: CheckReport,
}

/// Result of a successful apply.
#[derive(Debug, Clone)]
pub struct Applied {
    /// The plan that was applied.
    pub plan: Plan,
    /// Outputs reported by the engine.
    pub handle: RegistryHandle,
}

/// Drives a configuration through the checker, the renderer and an engine.
///
/// A configuration that fails the check never reaches the engine.
pub struct Provisioner<E> {
    engine: E,
    checker: Checker,
    renderer: Renderer,
}

impl<E: ProvisioningEngine> Provisioner<E> {
    /// Creates a provisioner with default checks and rendering.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            checker: Checker::new(),
            renderer: Renderer::new(),
        }
    }

    /// Sets the check configuration.
    #[must_use]
    pub fn with_checker(mut self, config: CheckerConfig) -> Self {
        self.checker = Checker::with_config(config);
        self
    }

    /// Sets the renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Returns the engine.
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Checks and renders a configuration without contacting the engine.
    pub fn plan(&self, config: &RegistryConfig) -> Result<Plan, ProvisionError> {
        let mut report = self.checker.check(config);

        if !report.passed(self.checker.config()) {
            warn!(
                repository = %report.repository,
                issues = report.issues.len(),
                "Configuration rejected"
            );
            return Err(ProvisionError::Configuration(report));
        }
        let Some(descriptor) = report.descriptor.take() else {
            return Err(ProvisionError::Configuration(report));
        };

        let document = self.renderer.render(&descriptor)?;
        Ok(Plan {
            descriptor,
            document,
            report,
        })
    }

    /// Plans a configuration and hands the document to the engine.
    pub async fn apply(&self, config: &RegistryConfig) -> Result<Applied, ProvisionError> {
        let plan = self.plan(config)?;

        info!(
            engine = %self.engine.name(),
            repository = %plan.document.repository,
            "Applying registry"
        );
        let handle = self.engine.reconcile(&plan.document).await?;

        Ok(Applied { plan, handle })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EngineError, Result};
    use async_trait::async_trait;
    use regdecl_core::EncryptionPolicy;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingEngine {
        received: Mutex<Vec<RenderedDocument>>,
        fail_with: Option<String>,
    }

    #[async_trait]
    impl ProvisioningEngine for RecordingEngine {
        fn name(&self) -> &str {
            "recording"
        }

        async fn reconcile(&self, document: &RenderedDocument) -> Result<RegistryHandle> {
            self.received.lock().unwrap().push(document.clone());
            if let Some(diagnostic) = &self.fail_with {
                return Err(EngineError::Failed {
                    engine: "recording".to_string(),
                    status: "exit code 1".to_string(),
                    diagnostic: diagnostic.clone(),
                });
            }
            Ok(RegistryHandle::new(
                format!("123456789012.dkr.ecr.us-east-1.amazonaws.com/{}", document.repository),
                format!("arn:aws:ecr:us-east-1:123456789012:repository/{}", document.repository),
            ))
        }
    }

    #[tokio::test]
    async fn test_apply_returns_engine_outputs() {
        let provisioner = Provisioner::new(RecordingEngine::default());
        let applied = provisioner.apply(&RegistryConfig::new("my-repo")).await.unwrap();

        assert_eq!(
            applied.handle.url,
            "123456789012.dkr.ecr.us-east-1.amazonaws.com/my-repo"
        );
        assert_eq!(
            applied.plan.descriptor.repository.encryption,
            EncryptionPolicy::ManagedKey
        );
        assert_eq!(provisioner.engine().received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_config_never_reaches_engine() {
        let provisioner = Provisioner::new(RecordingEngine::default());
        let err = provisioner.apply(&RegistryConfig::new("")).await.unwrap_err();

        assert!(err.is_configuration());
        assert!(provisioner.engine().received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_strict_checks_reject_fallback() {
        let config = RegistryConfig::new("my-repo").with_kms_flag(true);

        let lenient = Provisioner::new(RecordingEngine::default());
        assert!(lenient.apply(&config).await.is_ok());

        let strict = Provisioner::new(RecordingEngine::default()).with_checker(CheckerConfig::strict());
        let err = strict.apply(&config).await.unwrap_err();
        assert!(matches!(err, ProvisionError::Configuration(ref report) if report.warnings().len() == 1));
        assert!(strict.engine().received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_engine_failure_is_passed_through() {
        let engine = RecordingEngine {
            fail_with: Some("Error: RepositoryAlreadyExistsException\n".to_string()),
            ..Default::default()
        };
        let provisioner = Provisioner::new(engine);
        let err = provisioner.apply(&RegistryConfig::new("my-repo")).await.unwrap_err();

        assert!(!err.is_configuration());
        match err {
            ProvisionError::Engine(engine_err) => assert_eq!(
                engine_err.diagnostic(),
                Some("Error: RepositoryAlreadyExistsException\n")
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_plan_keeps_hints() {
        let provisioner = Provisioner::new(RecordingEngine::default());
        let plan = provisioner.plan(&RegistryConfig::new("my-repo")).unwrap();

        assert_eq!(plan.report.hints().len(), 1);
        assert_eq!(plan.document.repository, "my-repo");
        assert!(plan.report.descriptor.is_none());
    }
}
