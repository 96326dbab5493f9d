#[cfg(test)]
mod tests {
    use super::super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data.symptom_weights_file, PathBuf::from("data/symptom_weights.csv"));
        assert_eq!(config.data.biomarker_stats_file, PathBuf::from("data/biomarker_stats.csv"));
        assert_eq!(config.ranking.top_k, 3);
        assert_eq!(config.logging.filter, "febrilogic=info,warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [data]
            biomarker_stats_file = "/srv/stats.csv"

            [ranking]
            top_k = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.data.symptom_weights_file, default_symptom_weights_file());
        assert_eq!(config.data.biomarker_stats_file, PathBuf::from("/srv/stats.csv"));
        assert_eq!(config.ranking.top_k, 5);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_env_overrides_replace_paths() {
        let env: HashMap<&str, &str> = [(SYMPTOM_WEIGHTS_ENV, "/tmp/w.csv"), (BIOMARKER_STATS_ENV, "")].into();
        let mut config = Config::default();
        config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.data.symptom_weights_file, PathBuf::from("/tmp/w.csv"));
        // empty values are ignored
        assert_eq!(config.data.biomarker_stats_file, default_biomarker_stats_file());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let config = Config::from_toml_str("[ranking]\ntop_k = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(Config::from_toml_str("[ranking\n"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("febrilogic.toml");
        assert!(matches!(Config::load(Some(&missing)), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_explicit_file_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("febrilogic.toml");
        std::fs::write(&path, "[logging]\nfilter = \"febrilogic=debug\"\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.logging.filter, "febrilogic=debug");
    }
}
