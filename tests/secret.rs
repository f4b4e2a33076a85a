#[cfg(test)]
mod tests {
    use planty::libs::data_storage::DataStorage;
    use planty::libs::secret::Secret;
    use std::fs;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct SecretTestContext {
        _temp_dir: TempDir,
        storage: DataStorage,
        secret_file_name: String,
    }

    impl TestContext for SecretTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let storage = DataStorage::with_base_path(temp_dir.path());
            SecretTestContext {
                _temp_dir: temp_dir,
                storage,
                secret_file_name: ".test_secret".to_string(),
            }
        }
    }

    impl SecretTestContext {
        fn secret(&self) -> Secret {
            Secret::with_storage(&self.storage, &self.secret_file_name, "Password")
        }
    }

    #[test_context(SecretTestContext)]
    #[test]
    fn test_nothing_cached_initially(ctx: &mut SecretTestContext) {
        assert_eq!(ctx.secret().cached(), None);
    }

    #[test_context(SecretTestContext)]
    #[test]
    fn test_stored_password_is_encrypted_on_disk(ctx: &mut SecretTestContext) {
        ctx.secret().store("hunter2-but-longer").unwrap();

        let on_disk = fs::read_to_string(ctx.storage.base_path().join(&ctx.secret_file_name)).unwrap();
        assert!(!on_disk.contains("hunter2"));
        assert_eq!(ctx.secret().cached().as_deref(), Some("hunter2-but-longer"));
        assert_eq!(ctx.secret().get_or_prompt().unwrap(), "hunter2-but-longer");
    }

    #[test_context(SecretTestContext)]
    #[test]
    fn test_clear_forgets_the_password(ctx: &mut SecretTestContext) {
        let secret = ctx.secret();
        secret.store("password").unwrap();
        secret.clear().unwrap();
        assert_eq!(secret.cached(), None);
        // clearing twice is fine
        secret.clear().unwrap();
    }

    #[test_context(SecretTestContext)]
    #[test]
    fn test_garbage_file_is_ignored(ctx: &mut SecretTestContext) {
        fs::write(ctx.storage.base_path().join(&ctx.secret_file_name), "%%% not base64").unwrap();
        assert_eq!(ctx.secret().cached(), None);
    }
}
