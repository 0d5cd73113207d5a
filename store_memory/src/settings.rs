use crate::MemoryStore;
use veridoc_store::{SettingsStore, StoreError};
use veridoc_types::{UserId, UserSettings};

impl SettingsStore for MemoryStore {
    fn get_settings(&self, user_id: &UserId) -> Result<Option<UserSettings>, StoreError> {
        Ok(self.read()?.settings.get(user_id).cloned())
    }

    fn upsert_settings(&self, settings: &UserSettings) -> Result<(), StoreError> {
        self.write()?
            .settings
            .insert(settings.user_id.clone(), settings.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_replaces_existing_row() {
        let store = MemoryStore::new();
        let user = UserId::generate();

        store
            .upsert_settings(&UserSettings::defaults_for(user.clone()))
            .unwrap();
        store
            .upsert_settings(&UserSettings {
                user_id: user.clone(),
                email_notifications: false,
                sms_notifications: true,
            })
            .unwrap();

        let s = store.get_settings(&user).unwrap().unwrap();
        assert!(!s.email_notifications);
        assert!(s.sms_notifications);
    }
}
