use super::*;

#[test]
fn parses_ingest_with_defaults() {
    let cli = Cli::try_parse_from(["blogarc-cli", "ingest"]).expect("expected valid cli args");

    match cli.command {
        Commands::Ingest {
            report: path,
            dry_run,
        } => {
            assert_eq!(path, PathBuf::from(report::DEFAULT_REPORT_PATH));
            assert!(!dry_run);
        }
        other => panic!("expected ingest, got {other:?}"),
    }
}

#[test]
fn parses_ingest_with_report_and_dry_run() {
    let cli = Cli::try_parse_from([
        "blogarc-cli",
        "ingest",
        "--report",
        "/tmp/broken.csv",
        "--dry-run",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Ingest { ref report, dry_run: true } if report == &PathBuf::from("/tmp/broken.csv")
    ));
}

#[test]
fn parses_cleanup_command() {
    let cli = Cli::try_parse_from(["blogarc-cli", "cleanup"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Cleanup));
}

#[test]
fn parses_migrate_command() {
    let cli = Cli::try_parse_from(["blogarc-cli", "migrate"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Migrate));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["blogarc-cli"]).is_err());
}

#[test]
fn unknown_flag_is_an_error() {
    assert!(Cli::try_parse_from(["blogarc-cli", "cleanup", "--force"]).is_err());
}
