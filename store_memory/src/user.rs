use crate::MemoryStore;
use veridoc_store::{StoreError, UserStore};
use veridoc_types::{EthAddress, User, UserId};

impl UserStore for MemoryStore {
    fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if inner.email_index.contains_key(&user.email) {
            return Err(StoreError::Duplicate(format!("email {}", user.email)));
        }
        inner
            .email_index
            .insert(user.email.clone(), user.user_id.clone());
        if let Some(wallet) = user.wallet_address {
            inner.wallet_index.insert(wallet, user.user_id.clone());
        }
        inner.users.insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    fn get_user(&self, user_id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.get(user_id).cloned())
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .email_index
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    fn update_profile(
        &self,
        user_id: &UserId,
        full_name: String,
        email: String,
        phone: Option<String>,
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if let Some(owner) = inner.email_index.get(&email) {
            if owner != user_id {
                return Err(StoreError::Duplicate(format!("email {email}")));
            }
        }
        let old_email = match inner.users.get(user_id) {
            Some(user) => user.email.clone(),
            None => return Err(StoreError::NotFound(format!("user {user_id}"))),
        };
        inner.email_index.remove(&old_email);
        inner.email_index.insert(email.clone(), user_id.clone());

        let user = inner
            .users
            .get_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))?;
        user.full_name = full_name;
        user.email = email;
        user.phone = phone;
        Ok(())
    }

    fn link_wallet(&self, user_id: &UserId, address: EthAddress) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if let Some(owner) = inner.wallet_index.get(&address) {
            if owner == user_id {
                return Err(StoreError::Duplicate("wallet already linked".into()));
            }
            return Err(StoreError::Duplicate(format!(
                "wallet {address} belongs to another user"
            )));
        }
        let user = inner
            .users
            .get_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))?;
        if user.wallet_address.is_some() {
            return Err(StoreError::Duplicate("wallet already linked".into()));
        }
        user.wallet_address = Some(address);
        inner.wallet_index.insert(address, user_id.clone());
        Ok(())
    }
}
