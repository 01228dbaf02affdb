//! Tests for configuration

#[cfg(test)]
mod tests {
    use super::super::config::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(config.telegram.is_none());
        assert_eq!(config.processor.channel_capacity, 100);
        assert_eq!(config.processor.preview_chars, 100);
    }

    #[test]
    fn test_telegram_config_defaults() {
        let toml_str = r#"
bot_token = "123:abc"
"#;
        let config: TelegramConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert!(config.chat_id.is_none());
        assert_eq!(config.poll_timeout_secs, 30);
        assert!(config.include_channel_posts);
    }

    #[test]
    fn test_full_config() {
        let toml_str = r#"
[logging]
level = "debug,reqwest=warn"

[telegram]
bot_token = "123:abc"
chat_id = "-1001234567890"
poll_timeout_secs = 10
include_channel_posts = false

[processor]
channel_capacity = 16
preview_chars = 40
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.logging.level, "debug,reqwest=warn");

        let telegram = config.telegram.unwrap();
        assert_eq!(telegram.chat_id.as_deref(), Some("-1001234567890"));
        assert_eq!(telegram.poll_timeout_secs, 10);
        assert!(!telegram.include_channel_posts);

        assert_eq!(config.processor.channel_capacity, 16);
        assert_eq!(config.processor.preview_chars, 40);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[telegram]\nbot_token = \"file-token\"\n\n[processor]\nchannel_capacity = 8\n",
        )
        .unwrap();

        let env = config::Environment::with_prefix("SIGNAL_PARSER_TEST_FILE")
            .source(Some(HashMap::new()));
        let config = Config::load_from(&path, env).unwrap();
        assert_eq!(config.telegram.unwrap().bot_token, "file-token");
        assert_eq!(config.processor.channel_capacity, 8);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let env = config::Environment::with_prefix("SIGNAL_PARSER_TEST_MISSING")
            .source(Some(HashMap::new()));
        let config = Config::load_from(dir.path().join("absent.toml"), env).unwrap();
        assert!(config.telegram.is_none());
        assert_eq!(config.processor.preview_chars, 100);
    }

    #[test]
    fn test_zero_channel_capacity_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[processor]\nchannel_capacity = 0\n").unwrap();

        let env = config::Environment::with_prefix("SIGNAL_PARSER_TEST_ZERO")
            .source(Some(HashMap::new()));
        let err = Config::load_from(&path, env).unwrap_err();
        assert!(err.to_string().contains("channel_capacity"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();

        let vars = HashMap::from([(
            "SIGNAL_PARSER_LOGGING__LEVEL".to_string(),
            "trace".to_string(),
        )]);
        let env = config::Environment::with_prefix("SIGNAL_PARSER").source(Some(vars));
        let config = Config::load_from(&path, env).unwrap();
        assert_eq!(config.logging.level, "trace");
    }
}
