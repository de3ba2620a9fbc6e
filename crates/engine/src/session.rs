//! Session: a database handle with a current document
//!
//! Callers that prefer "select a document, then operate on it" use a
//! `Session`. Selection returns nothing but changes which [`Document`]
//! [`Session::document`] hands out; every path operation goes through that
//! handle, so nothing runs against an unselected document.
//!
//! ```text
//! let mut session = Session::new(db);
//! session.create_or_open("doc1")?;
//! session.document()?.add("/config", json!({}), false)?;
//! session.remove()?;                 // deletes doc1, clears selection
//! session.document()                 // Err(NoCurrentDocument)
//! ```

use crate::database::Database;
use crate::document::Document;
use arbor_core::{ArborError, ArborResult};
use std::sync::Arc;
use tracing::debug;

/// Database handle plus an optional current document
#[derive(Debug)]
pub struct Session {
    db: Arc<Database>,
    current: Option<Document>,
}

impl Session {
    /// Start a session with no document selected
    pub fn new(db: Arc<Database>) -> Self {
        Self { db, current: None }
    }

    /// Database behind this session
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Create a document and select it
    ///
    /// Fails with `AlreadyExists` if the name is taken; the selection is
    /// unchanged in that case.
    pub fn create(&mut self, name: &str) -> ArborResult<&Document> {
        let doc = self.db.create_document(name)?;
        Ok(self.select(doc))
    }

    /// Select an existing document
    ///
    /// Fails with `NotFound` if no document has that name; the selection is
    /// unchanged in that case.
    pub fn open(&mut self, name: &str) -> ArborResult<&Document> {
        let doc = self.db.open_document(name)?;
        Ok(self.select(doc))
    }

    /// Select `name`, creating it first if needed
    pub fn create_or_open(&mut self, name: &str) -> ArborResult<&Document> {
        let doc = self.db.create_or_open_document(name)?;
        Ok(self.select(doc))
    }

    /// Delete the current document and clear the selection
    pub fn remove(&mut self) -> ArborResult<()> {
        let doc = self.current.take().ok_or(ArborError::NoCurrentDocument)?;
        let name = doc.name().to_string();
        let id = doc.id();
        if let Err(e) = self.db.remove_document_by_id(id, &name) {
            // Keep the selection if nothing was removed.
            self.current = Some(doc);
            return Err(e);
        }
        Ok(())
    }

    /// Handle to the current document
    ///
    /// Fails with `NoCurrentDocument` if none is selected.
    pub fn document(&self) -> ArborResult<&Document> {
        self.current.as_ref().ok_or(ArborError::NoCurrentDocument)
    }

    /// Drop the selection without touching stored data
    pub fn close(&mut self) {
        if let Some(doc) = self.current.take() {
            debug!(target: "arbor::db", name = doc.name(), "Closed document");
        }
    }

    fn select(&mut self, doc: Document) -> &Document {
        debug!(target: "arbor::db", name = doc.name(), doc = %doc.id(), "Selected document");
        self.current.insert(doc)
    }
}
