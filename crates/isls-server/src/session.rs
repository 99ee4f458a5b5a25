//! Validation session: engine state, configuration and open documents.
//!
//! Every validation goes through a [`Session`]. The session owns the
//! [`ConfigResolver`] cache, so watched-file invalidations applied here are
//! seen by the next validation.

use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use isls_conf::ConfigResolver;
use isls_conf::FileSystem;
use isls_conf::OsFileSystem;
use isls_conf::RuleConfig;
use isls_conf::Settings;
use isls_templates::Finding;
use isls_templates::RuleConfigError;
use isls_templates::Validator;
use tower_lsp_server::ls_types;

use crate::Document;
use crate::Store;
use crate::ValidationFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Disabled,
    Enabled,
}

type ValidatorFactory = fn(&RuleConfig) -> Result<Validator, RuleConfigError>;

/// Diagnostics for one document of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentDiagnostics {
    pub path: Utf8PathBuf,
    pub diagnostics: Vec<ls_types::Diagnostic>,
}

/// Outcome of validating several documents.
///
/// Every document gets an entry; a document whose validation failed has no
/// diagnostics and a matching entry in `failures`.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub documents: Vec<DocumentDiagnostics>,
    pub failures: Vec<ValidationFailure>,
}

impl BatchReport {
    /// One message covering every failure in the batch, if there were any.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }

        let count = self.failures.len();
        let noun = if count == 1 { "file" } else { "files" };
        let mut message = format!("Failed to validate {count} {noun}:");
        for failure in &self.failures {
            message.push_str("\n- ");
            message.push_str(&failure.to_string());
        }
        Some(message)
    }

    #[must_use]
    pub fn diagnostics_for(&self, path: &Utf8Path) -> Option<&[ls_types::Diagnostic]> {
        self.documents
            .iter()
            .find(|document| document.path == path)
            .map(|document| document.diagnostics.as_slice())
    }
}

pub struct Session {
    state: EngineState,
    settings: Settings,
    resolver: ConfigResolver,
    documents: Store,
    build_validator: ValidatorFactory,
}

impl Session {
    #[must_use]
    pub fn new(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let mut resolver = ConfigResolver::new(fs);
        resolver.set_editor_override(settings.rules().clone());

        let state = if settings.enabled() {
            EngineState::Enabled
        } else {
            EngineState::Disabled
        };

        Self {
            state,
            settings,
            resolver,
            documents: Store::new(),
            build_validator: Validator::from_config,
        }
    }

    /// Session reading rule files from the real filesystem.
    #[must_use]
    pub fn with_os_fs(settings: Settings) -> Self {
        Self::new(settings, Arc::new(OsFileSystem))
    }

    /// Replace how validators are built from a resolved configuration.
    #[must_use]
    pub fn with_validator_factory(mut self, factory: ValidatorFactory) -> Self {
        self.build_validator = factory;
        self
    }

    pub fn enable(&mut self) {
        if self.state == EngineState::Disabled {
            tracing::info!("Validation engine enabled");
        }
        self.state = EngineState::Enabled;
    }

    pub fn disable(&mut self) {
        if self.state == EngineState::Enabled {
            tracing::info!("Validation engine disabled");
        }
        self.state = EngineState::Disabled;
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn documents(&self) -> &Store {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut Store {
        &mut self.documents
    }

    /// Apply new settings: the editor rule override and the enabled flag.
    pub fn did_change_configuration(&mut self, settings: Settings) {
        tracing::debug!("Applying updated settings");
        self.resolver.set_editor_override(settings.rules().clone());
        if settings.enabled() {
            self.enable();
        } else {
            self.disable();
        }
        self.settings = settings;
    }

    /// Invalidate cached rule files for each changed path.
    pub fn did_change_watched_files<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Utf8Path>,
    {
        self.resolver.did_change_watched_files(paths);
    }

    /// Effective rule configuration for `path`.
    pub fn resolve_config(&mut self, path: &Utf8Path) -> RuleConfig {
        self.resolver.resolve(path)
    }

    /// Raw findings for one document, in source order.
    ///
    /// A disabled session reports nothing.
    pub fn check(&mut self, document: &Document) -> Result<Vec<Finding>, ValidationFailure> {
        if self.state == EngineState::Disabled {
            return Ok(Vec::new());
        }
        let config = self.resolver.resolve(document.path());
        run_validation(self.build_validator, &config, document)
    }

    /// LSP diagnostics for one document.
    pub fn validate(
        &mut self,
        document: &Document,
    ) -> Result<Vec<ls_types::Diagnostic>, ValidationFailure> {
        let findings = self.check(document)?;
        Ok(isls_ide::collect_diagnostics(document.text(), &findings))
    }

    /// Validate documents independently; one failing never stops the rest.
    pub fn validate_batch<'a, I>(&mut self, documents: I) -> BatchReport
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut report = BatchReport::default();

        for document in documents {
            let diagnostics = match self.validate(document) {
                Ok(diagnostics) => diagnostics,
                Err(failure) => {
                    report.failures.push(failure);
                    Vec::new()
                }
            };
            report.documents.push(DocumentDiagnostics {
                path: document.path().to_owned(),
                diagnostics,
            });
        }

        if let Some(message) = report.error_message() {
            tracing::error!("{message}");
        }
        report
    }

    /// Revalidate every open document, e.g. after a configuration change.
    pub fn validate_open_documents(&mut self) -> BatchReport {
        let documents: Vec<Document> = self.documents.iter().cloned().collect();
        self.validate_batch(&documents)
    }
}

fn run_validation(
    build_validator: ValidatorFactory,
    config: &RuleConfig,
    document: &Document,
) -> Result<Vec<Finding>, ValidationFailure> {
    let path = document.path();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        build_validator(config).map(|validator| validator.validate(document.events()))
    }));

    match outcome {
        Ok(Ok(findings)) => {
            tracing::debug!("{} findings for {path}", findings.len());
            Ok(findings)
        }
        Ok(Err(source)) => {
            let failure = ValidationFailure::Config {
                path: path.to_owned(),
                source,
            };
            tracing::error!("{failure}");
            Err(failure)
        }
        Err(payload) => {
            let failure = ValidationFailure::from_panic(path, payload.as_ref());
            tracing::error!("Validation of {path} panicked: {failure}");
            Err(failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use isls_conf::InMemoryFileSystem;
    use isls_templates::Event;
    use isls_templates::Rule;
    use isls_templates::TagOccurrence;

    use super::*;

    fn img_document(path: &str) -> Document {
        let img = TagOccurrence::new("img", 1, 1).with_attr("src", "logo.png");
        Document::new(path, "<img src=\"logo.png\">\n", vec![Event::TagStart(img)])
    }

    fn session(fs: InMemoryFileSystem) -> Session {
        Session::new(Settings::default(), Arc::new(fs))
    }

    struct Exploding;

    impl Rule for Exploding {
        fn id(&self) -> &'static str {
            "exploding"
        }

        fn check(&self, _event: &Event) -> Vec<Finding> {
            panic!("rule exploded")
        }
    }

    mod state {
        use super::*;

        #[test]
        fn test_disabled_reports_nothing() {
            let mut session = session(InMemoryFileSystem::new());
            let document = img_document("/p/a.isml");
            session.disable();

            assert_eq!(session.state(), EngineState::Disabled);
            assert!(session.validate(&document).unwrap().is_empty());

            session.enable();
            assert_eq!(session.validate(&document).unwrap().len(), 1);
        }

        #[test]
        fn test_settings_control_state() {
            let settings = Settings::default().with_enabled(false);
            let mut session = Session::new(settings, Arc::new(InMemoryFileSystem::new()));
            assert_eq!(session.state(), EngineState::Disabled);

            session.did_change_configuration(Settings::default());
            assert_eq!(session.state(), EngineState::Enabled);
        }
    }

    mod config {
        use super::*;

        #[test]
        fn test_htmlhintrc_disables_rule() {
            let fs = InMemoryFileSystem::new();
            fs.add_file("/p/.htmlhintrc", r#"{ "tags-check": false }"#);
            let mut session = session(fs);
            let document = img_document("/p/a.isml");

            assert!(session.validate(&document).unwrap().is_empty());
        }

        #[test]
        fn test_editor_override_wins() {
            let fs = InMemoryFileSystem::new();
            fs.add_file("/p/.htmlhintrc", r#"{ "tags-check": false }"#);
            let mut session = session(fs);

            let mut rules = RuleConfig::default();
            rules.insert("tags-check", true);
            session.did_change_configuration(Settings::default().with_rules(rules));

            let document = img_document("/p/a.isml");
            assert_eq!(session.validate(&document).unwrap().len(), 1);
        }

        #[test]
        fn test_watched_change_picks_up_new_file() {
            let fs = Arc::new(InMemoryFileSystem::new());
            let mut session = Session::new(Settings::default(), fs.clone());
            let document = img_document("/p/a.isml");

            assert_eq!(session.validate(&document).unwrap().len(), 1);

            fs.add_file("/p/.htmlhintrc", r#"{ "tags-check": false }"#);
            assert_eq!(session.validate(&document).unwrap().len(), 1);

            session.did_change_watched_files(["/p/.htmlhintrc"]);
            assert!(session.validate(&document).unwrap().is_empty());
        }

        #[test]
        fn test_bad_rule_option_is_a_failure() {
            let fs = InMemoryFileSystem::new();
            fs.add_file("/p/.htmlhintrc", r#"{ "tags-check": { "img": 1 } }"#);
            let mut session = session(fs);

            let failure = session.validate(&img_document("/p/a.isml")).unwrap_err();
            assert!(matches!(failure, ValidationFailure::Config { .. }));
            assert_eq!(failure.path().as_str(), "/p/a.isml");
        }
    }

    mod batch {
        use super::*;

        #[test]
        fn test_failure_is_isolated() {
            let fs = InMemoryFileSystem::new();
            fs.add_file("/bad/.htmlhintrc", r#"{ "max-length": { "max": 0 } }"#);
            let mut session = session(fs);

            let documents = [
                img_document("/bad/a.isml"),
                img_document("/good/b.isml"),
            ];
            let report = session.validate_batch(&documents);

            assert_eq!(report.documents.len(), 2);
            assert_eq!(report.failures.len(), 1);
            assert_eq!(
                report.diagnostics_for(Utf8Path::new("/bad/a.isml")),
                Some(&[][..])
            );
            assert_eq!(
                report
                    .diagnostics_for(Utf8Path::new("/good/b.isml"))
                    .map(<[_]>::len),
                Some(1)
            );

            let message = report.error_message().unwrap();
            assert!(message.starts_with("Failed to validate 1 file:"));
            assert!(message.contains("/bad/a.isml"));
        }

        #[test]
        fn test_panic_is_captured() {
            let mut session = session(InMemoryFileSystem::new())
                .with_validator_factory(|_| Ok(Validator::new(vec![Box::new(Exploding)])));

            let documents = [img_document("/p/a.isml"), img_document("/p/b.isml")];
            let report = session.validate_batch(&documents);

            assert_eq!(report.documents.len(), 2);
            assert_eq!(report.failures.len(), 2);
            assert_eq!(
                report.error_message().unwrap(),
                "Failed to validate 2 files:\n- rule exploded\n- rule exploded"
            );
        }

        #[test]
        fn test_clean_batch_has_no_message() {
            let mut session = session(InMemoryFileSystem::new());
            let report = session.validate_batch(&[img_document("/p/a.isml")]);

            assert!(report.failures.is_empty());
            assert!(report.error_message().is_none());
        }

        #[test]
        fn test_open_documents_revalidated() {
            let mut session = session(InMemoryFileSystem::new());
            session.documents_mut().open(img_document("/p/b.isml"));
            session.documents_mut().open(img_document("/p/a.isml"));

            let report = session.validate_open_documents();
            let paths: Vec<&str> = report.documents.iter().map(|d| d.path.as_str()).collect();

            assert_eq!(paths, vec!["/p/a.isml", "/p/b.isml"]);
        }
    }
}
