use camino::Utf8Path;
use camino::Utf8PathBuf;
use isls_templates::Event;
use rustc_hash::FxHashMap;

/// A document ready for validation: its text, plus the event stream the
/// tokenizer produced for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    path: Utf8PathBuf,
    text: String,
    events: Vec<Event>,
    version: i32,
}

impl Document {
    pub fn new(path: impl Into<Utf8PathBuf>, text: impl Into<String>, events: Vec<Event>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            events,
            version: 0,
        }
    }

    /// Build a document from a JSON array of serialized events.
    pub fn from_json_events(
        path: impl Into<Utf8PathBuf>,
        text: impl Into<String>,
        events: &str,
    ) -> Result<Self, serde_json::Error> {
        let events = serde_json::from_str(events)?;
        Ok(Self::new(path, text, events))
    }

    #[must_use]
    pub fn with_version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn version(&self) -> i32 {
        self.version
    }
}

/// Documents currently open in the editor, keyed by path.
#[derive(Debug, Default)]
pub struct Store {
    documents: FxHashMap<Utf8PathBuf, Document>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, document: Document) {
        tracing::debug!(
            version = document.version,
            "Opening document {}",
            document.path
        );
        self.documents.insert(document.path.clone(), document);
    }

    /// Replace an open document. Returns `false`, leaving the store untouched,
    /// when the document was never opened.
    pub fn update(&mut self, document: Document) -> bool {
        if let Some(existing) = self.documents.get_mut(&document.path) {
            tracing::debug!(
                version = document.version,
                "Updating document {}",
                document.path
            );
            *existing = document;
            true
        } else {
            tracing::warn!("Update for document that is not open: {}", document.path);
            false
        }
    }

    pub fn close(&mut self, path: &Utf8Path) -> Option<Document> {
        tracing::debug!("Closing document {path}");
        self.documents.remove(path)
    }

    #[must_use]
    pub fn get(&self, path: &Utf8Path) -> Option<&Document> {
        self.documents.get(path)
    }

    /// Open documents in path order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        let mut documents: Vec<&Document> = self.documents.values().collect();
        documents.sort_by(|a, b| a.path.cmp(&b.path));
        documents.into_iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
