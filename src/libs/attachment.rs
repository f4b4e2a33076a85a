//! Client-side attachment encryption.
//!
//! Files are encrypted locally with AES-128-CBC before they leave the
//! machine; the storage bucket only ever sees ciphertext. Key and IV are
//! random per file and travel to the API base64-encoded, where they are
//! stored next to the attachment record.

use super::task::AttachmentUploadInfo;
use aes::Aes128;
use anyhow::Result;
use base64::prelude::*;
use block_modes::block_padding::Pkcs7;
use block_modes::{BlockMode, Cbc};
use rand::RngCore;
use reqwest::multipart;
use std::path::Path;
use thiserror::Error;

type Aes128Cbc = Cbc<Aes128, Pkcs7>;

pub const KEY_LEN: usize = 16;
pub const IV_LEN: usize = 16;
/// Upper bound accepted by the upload policy (50 MiB).
pub const MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("attachment key or IV is not valid base64")]
    Encoding(#[from] base64::DecodeError),
    #[error("attachment key and IV must be 16 bytes")]
    KeyLength,
    #[error("attachment could not be decrypted")]
    Decrypt,
    #[error("encrypted file is {0} bytes, the upload limit is 50 MiB")]
    TooLarge(usize),
}

#[derive(Debug, Clone)]
pub struct EncryptedFile {
    pub file_name: String,
    pub ciphertext: Vec<u8>,
    pub aes_key_b64: String,
    pub aes_iv_b64: String,
}

fn cipher(key: &[u8], iv: &[u8]) -> Result<Aes128Cbc, AttachmentError> {
    Aes128Cbc::new_from_slices(key, iv).map_err(|_| AttachmentError::KeyLength)
}

/// Encrypts `bytes` with a fresh random key and IV.
pub fn encrypt_attachment(file_name: &str, bytes: &[u8]) -> Result<EncryptedFile, AttachmentError> {
    let mut key = [0u8; KEY_LEN];
    let mut iv = [0u8; IV_LEN];
    let mut rng = rand::thread_rng();
    rng.fill_bytes(&mut key);
    rng.fill_bytes(&mut iv);

    let ciphertext = cipher(&key, &iv)?.encrypt_vec(bytes);
    if ciphertext.len() > MAX_UPLOAD_SIZE {
        return Err(AttachmentError::TooLarge(ciphertext.len()));
    }

    Ok(EncryptedFile {
        file_name: file_name.to_string(),
        ciphertext,
        aes_key_b64: BASE64_STANDARD.encode(key),
        aes_iv_b64: BASE64_STANDARD.encode(iv),
    })
}

pub fn decrypt_attachment(ciphertext: &[u8], aes_key_b64: &str, aes_iv_b64: &str) -> Result<Vec<u8>, AttachmentError> {
    let key = BASE64_STANDARD.decode(aes_key_b64)?;
    let iv = BASE64_STANDARD.decode(aes_iv_b64)?;
    if key.len() != KEY_LEN || iv.len() != IV_LEN {
        return Err(AttachmentError::KeyLength);
    }
    cipher(&key, &iv)?.decrypt_vec(ciphertext).map_err(|_| AttachmentError::Decrypt)
}

/// Reads and encrypts a local file, keeping only its file name.
pub fn encrypt_file(path: &Path) -> Result<EncryptedFile> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    Ok(encrypt_attachment(&file_name, &bytes)?)
}

pub fn content_disposition(file_name: &str) -> String {
    format!("attachment; filename=\"{}\"", file_name.replace('"', "'"))
}

/// Multipart body for the pre-signed storage POST: every policy field, the
/// content disposition carrying the original name, and the file last.
pub fn upload_form(info: &AttachmentUploadInfo, file: EncryptedFile) -> Result<multipart::Form> {
    let mut fields: Vec<_> = info.post_fields.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let mut form = multipart::Form::new();
    for (name, value) in fields {
        let value = match value {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        form = form.text(name.clone(), value);
    }
    form = form.text("Content-Disposition", content_disposition(&file.file_name));

    let part = multipart::Part::bytes(file.ciphertext)
        .file_name(file.file_name)
        .mime_str("application/octet-stream")?;
    Ok(form.part("file", part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrypt_restores_the_plaintext() {
        let plain = b"seed the tomatoes before april".to_vec();
        let file = encrypt_attachment("notes.txt", &plain).unwrap();
        assert_ne!(file.ciphertext, plain);
        assert_eq!(file.ciphertext.len() % 16, 0);

        let restored = decrypt_attachment(&file.ciphertext, &file.aes_key_b64, &file.aes_iv_b64).unwrap();
        assert_eq!(restored, plain);
    }

    #[test]
    fn key_and_iv_are_sixteen_bytes() {
        let file = encrypt_attachment("empty", b"").unwrap();
        assert_eq!(BASE64_STANDARD.decode(&file.aes_key_b64).unwrap().len(), KEY_LEN);
        assert_eq!(BASE64_STANDARD.decode(&file.aes_iv_b64).unwrap().len(), IV_LEN);
    }

    #[test]
    fn every_file_gets_its_own_key() {
        let a = encrypt_attachment("a", b"same").unwrap();
        let b = encrypt_attachment("b", b"same").unwrap();
        assert_ne!(a.aes_key_b64, b.aes_key_b64);
    }

    #[test]
    fn wrong_key_length_is_rejected() {
        let short = BASE64_STANDARD.encode([0u8; 8]);
        let iv = BASE64_STANDARD.encode([0u8; IV_LEN]);
        assert!(matches!(decrypt_attachment(&[0u8; 16], &short, &iv), Err(AttachmentError::KeyLength)));
        assert!(matches!(decrypt_attachment(&[0u8; 16], "%%%", &iv), Err(AttachmentError::Encoding(_))));
    }

    #[test]
    fn content_disposition_quotes_the_name() {
        assert_eq!(content_disposition("plan \"v2\".pdf"), "attachment; filename=\"plan 'v2'.pdf\"");
    }
}
