use crate::errors::ClientError;
use crate::storage::SessionStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Hard-coded admin passphrase. Anyone who can read this binary can unlock
/// the admin views; a deployment needs a server-verified credential instead.
pub const ADMIN_PASSPHRASE: &str = "2025";

pub const ADMIN_STORAGE_KEY: &str = "admin";

const UNLOCKED_VALUE: &str = "true";

/// Admin flag backed by a [`SessionStore`].
pub struct AccessGate {
    store: Arc<dyn SessionStore>,
    unlocked: bool,
}

impl AccessGate {
    /// Reads the persisted flag once. Storage errors leave the gate closed.
    pub async fn restore(store: Arc<dyn SessionStore>) -> Self {
        let unlocked = match store.get(ADMIN_STORAGE_KEY).await {
            Ok(value) => value.as_deref() == Some(UNLOCKED_VALUE),
            Err(err) => {
                warn!("could not read admin flag: {err}");
                false
            }
        };
        Self { store, unlocked }
    }

    pub fn is_admin(&self) -> bool {
        self.unlocked
    }

    pub fn ensure_admin(&self) -> Result<(), ClientError> {
        if self.unlocked {
            Ok(())
        } else {
            Err(ClientError::Auth)
        }
    }

    /// Returns `Ok(false)` on a wrong passphrase without touching state.
    pub async fn login(&mut self, secret: &str) -> Result<bool, ClientError> {
        if secret != ADMIN_PASSPHRASE {
            warn!("admin login rejected");
            return Ok(false);
        }
        self.store.set(ADMIN_STORAGE_KEY, UNLOCKED_VALUE).await?;
        self.unlocked = true;
        info!("admin session unlocked");
        Ok(true)
    }

    pub async fn logout(&mut self) -> Result<(), ClientError> {
        self.store.remove(ADMIN_STORAGE_KEY).await?;
        self.unlocked = false;
        info!("admin session cleared");
        Ok(())
    }
}
