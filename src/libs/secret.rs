//! Encrypted on-disk password cache used to re-login without prompting.
//!
//! The password is encrypted with AES-256-CBC using the key and IV baked
//! in by `build.rs` and stored base64-encoded in the data directory.

use super::data_storage::DataStorage;
use aes::Aes256;
use anyhow::Result;
use base64::prelude::*;
use block_modes::block_padding::Pkcs7;
use block_modes::{BlockMode, Cbc};
use dialoguer::{theme::ColorfulTheme, Password};
use std::fs;
use std::path::PathBuf;

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

type Aes256Cbc = Cbc<Aes256, Pkcs7>;

#[derive(Clone, Debug)]
pub struct Secret {
    prompt: String,
    secret_file_path: PathBuf,
    key: Vec<u8>,
    iv: Vec<u8>,
}

impl Secret {
    pub fn new(secret_name: &str, prompt: &str) -> Self {
        Self::with_storage(&DataStorage::new(), secret_name, prompt)
    }

    pub fn with_storage(storage: &DataStorage, secret_name: &str, prompt: &str) -> Self {
        let secret_file_path = storage.get_path(secret_name).unwrap_or_else(|_| PathBuf::from(secret_name));

        Self {
            prompt: prompt.to_owned(),
            secret_file_path,
            key: APP_METADATA_SECRET_KEY.to_vec(),
            iv: APP_METADATA_SECRET_IV.to_vec(),
        }
    }

    /// Cached password, or an interactive prompt when nothing usable is cached.
    pub fn get_or_prompt(&self) -> Result<String> {
        if let Some(password) = self.cached() {
            return Ok(password);
        }
        self.prompt()
    }

    pub fn prompt(&self) -> Result<String> {
        let password = Password::with_theme(&ColorfulTheme::default()).with_prompt(&self.prompt).interact()?;
        self.store(&password)?;
        Ok(password)
    }

    pub fn cached(&self) -> Option<String> {
        if !self.secret_file_path.exists() {
            return None;
        }
        match self.decrypt() {
            Ok(password) => Some(password),
            Err(e) => {
                tracing::warn!(error = %e, path = %self.secret_file_path.display(), "cached secret is unreadable");
                None
            }
        }
    }

    pub fn store(&self, password: &str) -> Result<()> {
        let cipher = Aes256Cbc::new_from_slices(&self.key, &self.iv)?;
        let ciphertext = cipher.encrypt_vec(password.as_bytes());
        if let Some(parent) = self.secret_file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.secret_file_path, BASE64_STANDARD.encode(ciphertext))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.secret_file_path.exists() {
            fs::remove_file(&self.secret_file_path)?;
        }
        Ok(())
    }

    fn decrypt(&self) -> Result<String> {
        let encoded = fs::read_to_string(&self.secret_file_path)?;
        let ciphertext = BASE64_STANDARD.decode(encoded.trim())?;
        let cipher = Aes256Cbc::new_from_slices(&self.key, &self.iv)?;
        let decrypted = cipher.decrypt_vec(&ciphertext)?;
        Ok(String::from_utf8(decrypted)?)
    }
}
