use crate::MemoryStore;
use veridoc_store::{ContactStore, StoreError};
use veridoc_types::ContactMessage;

impl ContactStore for MemoryStore {
    fn insert_message(&self, message: &ContactMessage) -> Result<(), StoreError> {
        self.write()?.messages.push(message.clone());
        Ok(())
    }
}
