use oasis_core::config::{ConfigError, ConfigValue, OasisConfig};
use serial_test::serial;

#[test]
fn test_empty_config() {
    let config = OasisConfig::empty();
    assert!(matches!(
        config.get::<String>("nonexistent"),
        Err(ConfigError::NotFound(_))
    ));
}

#[test]
fn test_set_and_get() {
    let mut config = OasisConfig::empty();
    config.set("swagger.url", ConfigValue::String("docs".into()));
    assert_eq!(config.get::<String>("swagger.url").unwrap(), "docs");
}

#[test]
fn test_get_or_default() {
    let config = OasisConfig::empty();
    assert_eq!(config.get_or("missing", 42i64), 42);
}

#[test]
fn test_get_opt() {
    let mut config = OasisConfig::empty();
    config.set("flag", ConfigValue::String("maybe".into()));
    assert!(config.get_opt::<bool>("absent").unwrap().is_none());
    assert!(matches!(
        config.get_opt::<bool>("flag"),
        Err(ConfigError::TypeMismatch { .. })
    ));
}

#[test]
fn test_type_conversions() {
    let mut config = OasisConfig::empty();
    config.set("int_val", ConfigValue::Integer(42));
    config.set("float_val", ConfigValue::Float(2.5));
    config.set("bool_val", ConfigValue::Bool(true));
    config.set("null_val", ConfigValue::Null);

    assert_eq!(config.get::<i64>("int_val").unwrap(), 42);
    assert_eq!(config.get::<u16>("int_val").unwrap(), 42);
    assert_eq!(config.get::<f64>("float_val").unwrap(), 2.5);
    assert!(config.get::<bool>("bool_val").unwrap());
    assert_eq!(config.get::<String>("int_val").unwrap(), "42");
    assert!(config.get::<Option<String>>("null_val").unwrap().is_none());
}

#[test]
fn test_flatten_yaml_with_dashed_keys() {
    let yaml = r#"
swagger:
  url: "api/docs"
  forward-root: true
openapi:
  info:
    title: "Example API"
"#;
    let config = OasisConfig::from_yaml_str(yaml, "test").unwrap();

    assert_eq!(config.get::<String>("swagger.url").unwrap(), "api/docs");
    assert!(config.get::<bool>("swagger.forward-root").unwrap());
    assert!(config.get::<bool>("swagger.forward_root").unwrap());
    assert_eq!(config.get::<String>("openapi.info.title").unwrap(), "Example API");
}

#[test]
fn test_list_config() {
    let yaml = r#"
app:
  servers:
    - "localhost:8080"
    - "127.0.0.1:8080"
"#;
    let config = OasisConfig::from_yaml_str(yaml, "test").unwrap();
    let servers: Vec<String> = config.get("app.servers").unwrap();
    assert_eq!(servers, vec!["localhost:8080", "127.0.0.1:8080"]);
}

#[test]
fn test_comma_separated_list_from_string() {
    let mut config = OasisConfig::empty();
    config.set("app.tags", ConfigValue::String("greet, admin,".into()));
    let tags: Vec<String> = config.get("app.tags").unwrap();
    assert_eq!(tags, vec!["greet", "admin"]);
}

#[test]
fn test_bool_from_env_style_strings() {
    let mut config = OasisConfig::empty();
    config.set("a", ConfigValue::String("yes".into()));
    config.set("b", ConfigValue::String("OFF".into()));
    assert!(config.get::<bool>("a").unwrap());
    assert!(!config.get::<bool>("b").unwrap());
}

#[test]
fn test_invalid_yaml() {
    let result = OasisConfig::from_yaml_str("swagger: [unclosed", "test");
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
#[serial]
fn test_load_from_dir_with_profile_and_env_override() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("application.yaml"),
        "swagger:\n  url: base\n  display-operation-id: false\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("application-prod.yaml"),
        "swagger:\n  url: prod-docs\n",
    )
    .unwrap();

    std::env::remove_var("OASIS_PROFILE");
    std::env::set_var("SWAGGER_DISPLAY_OPERATION_ID", "true");

    let config = OasisConfig::load_from_dir(dir.path(), "prod").unwrap();
    assert_eq!(config.profile(), "prod");
    assert_eq!(config.get::<String>("swagger.url").unwrap(), "prod-docs");
    assert!(config.get::<bool>("swagger.display-operation-id").unwrap());

    std::env::remove_var("SWAGGER_DISPLAY_OPERATION_ID");
}

#[test]
#[serial]
fn test_profile_env_var_wins() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("application-staging.yaml"), "app:\n  name: staging\n").unwrap();

    std::env::set_var("OASIS_PROFILE", "staging");
    let config = OasisConfig::load_from_dir(dir.path(), "dev").unwrap();
    std::env::remove_var("OASIS_PROFILE");

    assert_eq!(config.profile(), "staging");
    assert_eq!(config.get::<String>("app.name").unwrap(), "staging");
}

#[test]
#[serial]
fn test_missing_files_are_not_errors() {
    let dir = tempfile::tempdir().unwrap();
    std::env::remove_var("OASIS_PROFILE");
    let config = OasisConfig::load_from_dir(dir.path(), "dev").unwrap();
    assert_eq!(config.profile(), "dev");
    assert!(!config.contains_key("swagger.url.that.does.not.exist"));
}
