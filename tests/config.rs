#[cfg(test)]
mod tests {
    use nsis_updater::api::{FeedLocation, HttpConfig};
    use nsis_updater::libs::artifact::InstallerConfig;
    use nsis_updater::libs::config::{Config, CONFIG_FILE_NAME};
    use nsis_updater::libs::host::ProcessHost;
    use nsis_updater::libs::update::Updater;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    /// Points the platform data directory at a temporary home.
    struct ConfigTestContext {
        _temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ConfigTestContext { _temp_dir: temp_dir }
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.feed.is_none());
        assert!(config.installer.is_none());
        assert!(config.http.is_none());
        assert_eq!(serde_json::to_string(&config).unwrap(), "{}");
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "feed": { "user": "acme", "repo": "generic", "package": "desktop" },
                "installer": { "silent_args": ["/S", "/NCRC"] }
            }"#,
        )
        .unwrap();

        let feed = config.feed.unwrap();
        assert_eq!(feed.api_url, "https://api.bintray.com");
        assert_eq!(feed.download_url, "https://dl.bintray.com");

        let installer = config.installer.unwrap();
        assert_eq!(installer.marker, "Setup");
        assert_eq!(installer.extension, "exe");
        assert_eq!(installer.silent_args, vec!["/S".to_string(), "/NCRC".to_string()]);
    }

    #[test]
    fn test_updater_from_config_carries_feed() {
        let config = Config {
            feed: Some(FeedLocation::new("acme", "generic", "desktop")),
            ..Config::default()
        };

        let updater = Updater::from_config(&config, Arc::new(ProcessHost::new("1.0.0"))).unwrap();
        assert_eq!(updater.feed_location(), config.feed);

        let updater = Updater::from_config(&Config::default(), Arc::new(ProcessHost::new("1.0.0"))).unwrap();
        assert_eq!(updater.feed_location(), None);
    }

    // Storage scenarios share one test because they change process-wide
    // environment variables.
    #[test_context(ConfigTestContext)]
    #[test]
    fn test_config_storage(_ctx: &mut ConfigTestContext) {
        let path = Config::path().unwrap();
        assert!(path.ends_with(CONFIG_FILE_NAME));
        assert!(!path.exists());

        assert_eq!(Config::read().unwrap(), Config::default());

        let config = Config {
            feed: Some(FeedLocation::new("acme", "generic", "desktop").with_base_url("https://mirror.example.com/")),
            installer: Some(InstallerConfig {
                marker: "Installer".to_string(),
                ..InstallerConfig::default()
            }),
            http: Some(HttpConfig {
                user_agent: "desktop-app/2.0.0".to_string(),
                timeout_secs: Some(30),
            }),
        };
        config.save().unwrap();
        assert!(path.exists());
        assert_eq!(Config::read().unwrap(), config);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"api_url\": \"https://mirror.example.com\""));

        fs::write(&path, "{ not json").unwrap();
        assert!(Config::read().is_err());
    }
}
