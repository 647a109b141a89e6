use super::*;

#[test]
fn test_select_token() {
    assert_eq!(select_token(None), None);
    assert_eq!(select_token(Some("   ".to_string())), None);
    assert_eq!(
        select_token(Some(" ghp_abc \n".to_string())).as_deref(),
        Some("ghp_abc")
    );
}

#[test]
fn test_source_args_override_configuration() {
    let args = SourceArgs {
        config: None,
        repo: Some("owner/other".to_string()),
        website: Some(WebsiteArg::Main),
        include_local_stub: true,
    };
    let mut config = AppConfig::default();
    config.stubs.repo = Some("owner/configs".to_string());

    args.apply(&mut config);

    assert_eq!(config.stubs.repo.as_deref(), Some("owner/other"));
    assert_eq!(config.stubs.website, WebsiteSelection::Main);
    assert!(config.stubs.include_local_stub);
}

#[test]
fn test_source_args_without_overrides_keep_configuration() {
    let mut config = AppConfig::default();
    config.stubs.repo = Some("owner/configs".to_string());

    config.stubs.include_local_stub = true;

    SourceArgs::default().apply(&mut config);

    assert_eq!(config.stubs.repo.as_deref(), Some("owner/configs"));
    assert_eq!(config.stubs.website, WebsiteSelection::Auto);
    assert!(config.stubs.include_local_stub);
}

#[test]
fn test_load_config_with_explicit_file() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("config-stubs.toml");
    std::fs::write(&path, "repo = \"owner/configs\"\nwebsite = \"main\"\n").unwrap();
    let args = SourceArgs {
        config: Some(path.to_string_lossy().to_string()),
        repo: None,
        website: Some(WebsiteArg::Preview),
        include_local_stub: false,
    };

    let config = args.load_config().unwrap();

    assert_eq!(config.stubs.repo.as_deref(), Some("owner/configs"));
    assert_eq!(config.stubs.website, WebsiteSelection::Preview);
}
