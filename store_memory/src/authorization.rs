use crate::MemoryStore;
use veridoc_store::{AuthorizationStore, StoreError};
use veridoc_types::AuthorizedDocument;

impl AuthorizationStore for MemoryStore {
    fn get_authorized(&self, doc_number: &str) -> Result<Option<AuthorizedDocument>, StoreError> {
        Ok(self.read()?.authorized.get(doc_number).cloned())
    }

    fn insert_authorized(&self, doc: &AuthorizedDocument) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if inner.authorized.contains_key(&doc.doc_number) {
            return Err(StoreError::Duplicate(format!(
                "document number {}",
                doc.doc_number
            )));
        }
        inner.authorized.insert(doc.doc_number.clone(), doc.clone());
        Ok(())
    }
}
