use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn run_defaults_to_star_schema() {
    let cli = Cli::try_parse_from(["sl", "run"]).unwrap();
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.pipeline, "star_schema");
            assert_eq!(args.threads, 4);
            assert!(args.warehouse.is_none());
        }
        other => panic!("expected run, got {other:?}"),
    }
}

#[test]
fn ls_accepts_output_format() {
    let cli = Cli::try_parse_from(["sl", "ls", "--output", "json"]).unwrap();
    match cli.command {
        Commands::Ls(args) => assert_eq!(args.output, LsOutput::Json),
        other => panic!("expected ls, got {other:?}"),
    }
}

#[test]
fn global_project_dir_applies_anywhere() {
    let cli = Cli::try_parse_from(["sl", "validate", "-p", "/tmp/project"]).unwrap();
    assert_eq!(cli.global.project_dir, "/tmp/project");
    assert!(matches!(cli.command, Commands::Validate));
}
