use clap::Parser;
use inference_cache::cli::{Cli, Commands};
use std::path::PathBuf;

#[test]
fn test_parse_get() {
    let cli = Cli::try_parse_from(vec!["inference-cache", "get", "abc123"]).unwrap();

    match cli.command {
        Commands::Get { key, fingerprint } => {
            assert_eq!(key, "abc123");
            assert!(!fingerprint);
        }
        _ => panic!("Wrong top-level command"),
    }
    assert!(!cli.json);
    assert!(cli.config.is_none());
}

#[test]
fn test_parse_get_by_fingerprint() {
    let cli =
        Cli::try_parse_from(vec!["inference-cache", "get", "--fingerprint", "deadbeef"]).unwrap();

    match cli.command {
        Commands::Get { key, fingerprint } => {
            assert_eq!(key, "deadbeef");
            assert!(fingerprint);
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_sweep() {
    let cli = Cli::try_parse_from(vec!["inference-cache", "sweep"]).unwrap();
    assert!(matches!(cli.command, Commands::Sweep));
}

#[test]
fn test_parse_stats() {
    let cli = Cli::try_parse_from(vec!["inference-cache", "stats"]).unwrap();
    assert!(matches!(cli.command, Commands::Stats));
}

#[test]
fn test_global_options() {
    let cli = Cli::try_parse_from(vec![
        "inference-cache",
        "--json",
        "--config",
        "/custom/config.yaml",
        "stats",
    ])
    .unwrap();

    assert!(cli.json);
    assert_eq!(cli.config, Some(PathBuf::from("/custom/config.yaml")));
}

#[test]
fn test_global_options_after_subcommand() {
    let cli = Cli::try_parse_from(vec!["inference-cache", "sweep", "--json"]).unwrap();

    assert!(cli.json);
    assert!(matches!(cli.command, Commands::Sweep));
}

#[test]
fn test_get_requires_a_key() {
    let result = Cli::try_parse_from(vec!["inference-cache", "get"]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_command_rejected() {
    let result = Cli::try_parse_from(vec!["inference-cache", "flush"]);
    assert!(result.is_err());
}
