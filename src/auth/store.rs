//! Token storage backends.
//!
//! The access/refresh token pair is read and written through the small
//! `TokenStore` trait so the API client never touches a concrete storage
//! mechanism. The CLI uses the OS keychain (`KeyringTokenStore`); tests and
//! short-lived tooling use `MemoryTokenStore`; `FileTokenStore` keeps the
//! pair in a JSON file under the cache directory for environments without a
//! keychain service.

use std::path::PathBuf;
use std::sync::RwLock;

use anyhow::{Context, Result};
use keyring::Entry;
use serde::{Deserialize, Serialize};

/// Token file name in the cache directory
const TOKENS_FILE: &str = "tokens.json";

/// Keychain service name
const SERVICE_NAME: &str = "hireflow";

/// Keychain entry names for the two tokens
const ACCESS_TOKEN_ENTRY: &str = "access-token";
const REFRESH_TOKEN_ENTRY: &str = "refresh-token";

/// The persisted session credential pair.
///
/// Either slot may be empty on its own: a missing access token with a
/// refresh token still present is a real state (and is reported differently
/// from a missing refresh token by the client).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionTokens {
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken", skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl SessionTokens {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Storage interface for the session credential pair.
///
/// Callers read a copy, mutate it, and write the whole pair back; there is
/// no cross-process locking between the read and the write.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<SessionTokens>>;
    fn save(&self, tokens: &SessionTokens) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Process-local store with no persistence.
#[derive(Default)]
pub struct MemoryTokenStore {
    inner: RwLock<Option<SessionTokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: SessionTokens) -> Self {
        Self {
            inner: RwLock::new(Some(tokens)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SessionTokens>> {
        Ok(self.inner.read().expect("token store lock poisoned").clone())
    }

    fn save(&self, tokens: &SessionTokens) -> Result<()> {
        *self.inner.write().expect("token store lock poisoned") = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.inner.write().expect("token store lock poisoned") = None;
        Ok(())
    }
}

/// JSON file store under the cache directory.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            path: cache_dir.join(TOKENS_FILE),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SessionTokens>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read token file")?;
        let tokens: SessionTokens =
            serde_json::from_str(&contents).context("Failed to parse token file")?;
        Ok(Some(tokens))
    }

    fn save(&self, tokens: &SessionTokens) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(tokens)?;
        std::fs::write(&self.path, contents).context("Failed to write token file")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove token file")?;
        }
        Ok(())
    }
}

/// OS keychain store; one entry per token.
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(name: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, name).context("Failed to create keyring entry")
    }

    fn read_entry(name: &str) -> Result<Option<String>> {
        match Self::entry(name)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err).context("Failed to read token from keychain"),
        }
    }

    fn write_entry(name: &str, value: Option<&str>) -> Result<()> {
        let entry = Self::entry(name)?;
        match value {
            Some(value) => entry
                .set_password(value)
                .context("Failed to store token in keychain"),
            None => match entry.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                Err(err) => Err(err).context("Failed to delete token from keychain"),
            },
        }
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<SessionTokens>> {
        let tokens = SessionTokens {
            access_token: Self::read_entry(ACCESS_TOKEN_ENTRY)?,
            refresh_token: Self::read_entry(REFRESH_TOKEN_ENTRY)?,
        };
        if tokens.is_empty() {
            Ok(None)
        } else {
            Ok(Some(tokens))
        }
    }

    fn save(&self, tokens: &SessionTokens) -> Result<()> {
        Self::write_entry(ACCESS_TOKEN_ENTRY, tokens.access_token.as_deref())?;
        Self::write_entry(REFRESH_TOKEN_ENTRY, tokens.refresh_token.as_deref())?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        Self::write_entry(ACCESS_TOKEN_ENTRY, None)?;
        Self::write_entry(REFRESH_TOKEN_ENTRY, None)?;
        Ok(())
    }
}
