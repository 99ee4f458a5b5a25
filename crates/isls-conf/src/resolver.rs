//! Cascading discovery of `.htmlhintrc` rule files.
//!
//! For a validated file the resolver walks from the file's directory up to
//! the filesystem root and uses the first rule file it finds. What each
//! directory holds is cached, so repeat validations do not touch disk until a
//! watched-file notification invalidates the affected directory.
//!
//! Relative paths are taken from the resolver's working directory, so cache
//! keys are absolute.

use std::sync::Arc;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use rustc_hash::FxHashMap;

use crate::FileSystem;
use crate::RuleConfig;

/// Reserved name of the per-directory rule configuration file.
pub const CONFIG_FILE_NAME: &str = ".htmlhintrc";

/// What the cache knows about one directory.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedOverride {
    /// Not looked up yet, or invalidated since.
    Unknown,
    /// No rule file, or one that could not be read or parsed.
    Missing,
    Found(Arc<RuleConfig>),
}

pub struct ConfigResolver {
    fs: Arc<dyn FileSystem>,
    working_dir: Option<Utf8PathBuf>,
    editor_override: RuleConfig,
    cache: FxHashMap<Utf8PathBuf, CachedOverride>,
}

impl ConfigResolver {
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        let working_dir = std::env::current_dir()
            .ok()
            .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok());

        Self {
            fs,
            working_dir,
            editor_override: RuleConfig::default(),
            cache: FxHashMap::default(),
        }
    }

    /// Resolve relative paths against `dir` instead of the process's current
    /// directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Replace the editor-supplied override. An empty one re-enables disk lookup.
    pub fn set_editor_override(&mut self, rules: RuleConfig) {
        self.editor_override = rules;
    }

    /// Effective rule configuration for `file_path`.
    pub fn resolve(&mut self, file_path: &Utf8Path) -> RuleConfig {
        let defaults = RuleConfig::defaults();

        if !self.editor_override.is_empty() {
            tracing::debug!("Using editor rule override for {file_path}");
            return defaults.overlay(&self.editor_override);
        }

        match self.find_override(file_path) {
            Some(found) => defaults.overlay(&found),
            None => defaults,
        }
    }

    /// Nearest rule file at or above `file_path`, closest directory first.
    pub fn find_override(&mut self, file_path: &Utf8Path) -> Option<Arc<RuleConfig>> {
        let file_path = self.absolute(file_path);
        let mut current = if self.fs.is_directory(&file_path) {
            Some(file_path.as_path())
        } else {
            parent_dir(&file_path)
        };

        while let Some(dir) = current {
            if let CachedOverride::Found(config) = self.lookup(dir) {
                return Some(config);
            }
            current = parent_dir(dir);
        }

        None
    }

    fn absolute(&self, path: &Utf8Path) -> Utf8PathBuf {
        match &self.working_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_owned(),
        }
    }

    fn lookup(&mut self, dir: &Utf8Path) -> CachedOverride {
        if let Some(entry) = self.cache.get(dir) {
            if *entry != CachedOverride::Unknown {
                tracing::trace!("Rule config cache hit for {dir}");
                return entry.clone();
            }
        }

        let path = dir.join(CONFIG_FILE_NAME);
        let entry = match self.fs.read_to_string(&path) {
            Ok(text) => match RuleConfig::from_jsonc(&text) {
                Ok(config) => {
                    tracing::debug!("Loaded rule config from {path}");
                    CachedOverride::Found(Arc::new(config))
                }
                Err(err) => {
                    tracing::warn!("Ignoring unparsable rule config {path}: {err}");
                    CachedOverride::Missing
                }
            },
            Err(_) => CachedOverride::Missing,
        };

        self.cache.insert(dir.to_owned(), entry.clone());
        entry
    }

    /// Reset exactly one cache key to [`CachedOverride::Unknown`].
    ///
    /// A path naming a rule file invalidates the directory holding it; any
    /// other path is taken to be a directory key itself.
    pub fn invalidate(&mut self, path: &Utf8Path) {
        let path = self.absolute(path);
        let key = if path.file_name() == Some(CONFIG_FILE_NAME) {
            path.parent().unwrap_or(&path)
        } else {
            path.as_path()
        };

        if let Some(entry) = self.cache.get_mut(key) {
            tracing::debug!("Invalidating rule config cache for {key}");
            *entry = CachedOverride::Unknown;
        }
    }

    pub fn did_change_watched_files<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Utf8Path>,
    {
        for path in paths {
            self.invalidate(path.as_ref());
        }
    }

    /// Current cache state for a directory.
    #[must_use]
    pub fn cached(&self, dir: &Utf8Path) -> CachedOverride {
        self.cache
            .get(self.absolute(dir).as_path())
            .cloned()
            .unwrap_or(CachedOverride::Unknown)
    }
}

/// Directory holding `path`. Without a working directory a relative path can
/// run out of components, in which case its parent is `.`.
fn parent_dir(path: &Utf8Path) -> Option<&Utf8Path> {
    match path.parent() {
        Some(parent) if parent.as_str().is_empty() => {
            (path != Utf8Path::new(".")).then_some(Utf8Path::new("."))
        }
        parent => parent,
    }
}
