use pretty_assertions::assert_eq;
use std::fs;
use strata_search::ConfigError;
use strata_search::StrataConfig;
use tempfile::TempDir;

#[test]
fn loads_a_toml_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("strata.toml");
    fs::write(
        &path,
        r#"
[resolver]
max_depth = 12

[facets]
base_url = "/search/"
chrono_depth = 8

[logging]
level = "strata=debug"
"#,
    )
    .expect("write config");

    let config = StrataConfig::load(&path).expect("load");
    assert_eq!(config.resolver.max_depth, 12);
    assert_eq!(config.resolver.root_sentinel, "root");
    assert_eq!(config.facets.base_url, "/search/");
    assert_eq!(config.facets.chrono_depth, 8);
    assert_eq!(config.logging.level, "strata=debug");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().expect("tempdir");
    let err = StrataConfig::load(&dir.path().join("absent.toml")).expect_err("missing");
    assert!(matches!(err, ConfigError::Io(_)));
}
