#[cfg(test)]
mod tests {
    use planty::libs::config::{Config, CONFIG_FILE_NAME};
    use planty::libs::data_storage::DataStorage;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    /// Each test gets its own storage directory.
    struct ConfigTestContext {
        _temp_dir: TempDir,
        storage: DataStorage,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let storage = DataStorage::with_base_path(temp_dir.path().join("planty"));
            ConfigTestContext {
                _temp_dir: temp_dir,
                storage,
            }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_missing_config_reads_defaults(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.storage).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.auto_archive);
        assert!(config.email.is_none());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_config(ctx: &mut ConfigTestContext) {
        let config = Config {
            api_url: "https://planty.example.com".to_string(),
            email: Some("ann@example.com".to_string()),
            auto_archive: false,
        };
        config.save_to(&ctx.storage).unwrap();

        assert!(ctx.storage.base_path().join(CONFIG_FILE_NAME).exists());
        assert_eq!(Config::read_from(&ctx.storage).unwrap(), config);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_file_falls_back_per_field(ctx: &mut ConfigTestContext) {
        let path = ctx.storage.get_path(CONFIG_FILE_NAME).unwrap();
        std::fs::write(path, r#"{"email": "bob@example.com"}"#).unwrap();

        let config = Config::read_from(&ctx.storage).unwrap();
        assert_eq!(config.email.as_deref(), Some("bob@example.com"));
        assert_eq!(config.api_url, Config::default().api_url);
        assert!(config.auto_archive);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_corrupt_file_is_an_error(ctx: &mut ConfigTestContext) {
        let path = ctx.storage.get_path(CONFIG_FILE_NAME).unwrap();
        std::fs::write(path, "not json").unwrap();
        assert!(Config::read_from(&ctx.storage).is_err());
    }
}
