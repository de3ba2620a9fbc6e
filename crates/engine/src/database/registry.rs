//! Document registry
//!
//! Named documents live in the `documents` table; each one owns a value tree
//! rooted at an empty object. Opening a document resolves its name to a
//! [`DocumentId`] once and returns a [`Document`] handle scoped to it.

use super::Database;
use crate::document::Document;
use arbor_core::{ArborError, ArborResult, NodeType, ROOT_LEAF, ROOT_PATH};
use arbor_storage::DocumentId;
use std::sync::Arc;
use tracing::info;

impl Database {
    /// Register a new document with an empty object root
    ///
    /// Fails with `AlreadyExists` if the name is taken.
    pub fn create_document(self: &Arc<Self>, name: &str) -> ArborResult<Document> {
        let id = self.transaction(|store| {
            let id = store.create_document(name)?;
            store.insert(id, ROOT_PATH, ROOT_LEAF, NodeType::Object, None, 1, 2)?;
            Ok(id)
        })?;
        info!(target: "arbor::db", name, doc = %id, "Created document");
        Ok(Document::new(Arc::clone(self), id, name))
    }

    /// Open an existing document by name
    ///
    /// Fails with `NotFound` if no document has that name.
    pub fn open_document(self: &Arc<Self>, name: &str) -> ArborResult<Document> {
        let id = self.read(|store| store.document_id(name))?;
        let id = id.ok_or_else(|| ArborError::not_found(format!("document '{}'", name)))?;
        Ok(Document::new(Arc::clone(self), id, name))
    }

    /// Open `name`, creating it first if it does not exist
    ///
    /// Lookup and creation run in one write transaction, so two handles
    /// racing on the same name both end up with the same document.
    pub fn create_or_open_document(self: &Arc<Self>, name: &str) -> ArborResult<Document> {
        let (id, created) = self.transaction(|store| match store.document_id(name)? {
            Some(id) => Ok((id, false)),
            None => {
                let id = store.create_document(name)?;
                store.insert(id, ROOT_PATH, ROOT_LEAF, NodeType::Object, None, 1, 2)?;
                Ok((id, true))
            }
        })?;
        if created {
            info!(target: "arbor::db", name, doc = %id, "Created document");
        }
        Ok(Document::new(Arc::clone(self), id, name))
    }

    /// Delete a document and every node it owns
    ///
    /// Fails with `NotFound` if no document has that name.
    pub fn remove_document(&self, name: &str) -> ArborResult<()> {
        let id = self.transaction(|store| {
            let id = store
                .document_id(name)?
                .ok_or_else(|| ArborError::not_found(format!("document '{}'", name)))?;
            store.delete_document(id)?;
            Ok(id)
        })?;
        info!(target: "arbor::db", name, doc = %id, "Removed document");
        Ok(())
    }

    /// Names of all documents, in creation order
    pub fn list_documents(&self) -> ArborResult<Vec<String>> {
        let docs = self.read(|store| store.documents())?;
        Ok(docs.into_iter().map(|(_, name)| name).collect())
    }

    /// True if a document named `name` exists
    pub fn document_exists(&self, name: &str) -> ArborResult<bool> {
        Ok(self.read(|store| store.document_id(name))?.is_some())
    }

    pub(crate) fn remove_document_by_id(&self, id: DocumentId, name: &str) -> ArborResult<()> {
        let removed = self.transaction(|store| {
            if store.document_name(id)?.is_none() {
                return Err(ArborError::not_found(format!("document '{}'", name)));
            }
            store.delete_document(id)
        })?;
        info!(target: "arbor::db", name, doc = %id, nodes = removed, "Removed document");
        Ok(())
    }
}
