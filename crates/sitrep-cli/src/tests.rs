use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["sitrep"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_report_with_defaults() {
    let cli = Cli::try_parse_from(["sitrep", "report", "--digest", "today.md"])
        .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Report {
            digest,
            classifier,
            top_per_category,
            intel_limit,
            direct,
            output,
        }) => {
            assert_eq!(digest, PathBuf::from("today.md"));
            assert!(classifier.is_none());
            assert!(top_per_category.is_none());
            assert!(intel_limit.is_none());
            assert!(!direct);
            assert!(output.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_report_overrides() {
    let cli = Cli::try_parse_from([
        "sitrep",
        "report",
        "--digest",
        "today.md",
        "--classifier",
        "embedding",
        "--top-per-category",
        "3",
        "--intel-limit",
        "50",
        "--direct",
        "--output",
        "report.md",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Report {
            classifier: Some(ClassifierArg::Embedding),
            top_per_category: Some(3),
            intel_limit: Some(50),
            direct: true,
            output: Some(_),
            ..
        })
    ));
}

#[test]
fn report_requires_digest() {
    assert!(Cli::try_parse_from(["sitrep", "report"]).is_err());
}

#[test]
fn rejects_unknown_classifier() {
    let result = Cli::try_parse_from([
        "sitrep",
        "classify",
        "--digest",
        "today.md",
        "--classifier",
        "keyword",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_digest_command() {
    let cli = Cli::try_parse_from(["sitrep", "digest", "--posts", "posts.json"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Digest { output: None, .. })
    ));
}

#[test]
fn classifier_arg_maps_to_kind() {
    assert_eq!(
        ClassifierKind::from(ClassifierArg::Embedding),
        ClassifierKind::Embedding
    );
    assert_eq!(
        ClassifierKind::from(ClassifierArg::Generative),
        ClassifierKind::Generative
    );
}

#[test]
fn cli_overrides_replace_configured_options() {
    let args = report::ReportArgs {
        classifier: Some(ClassifierKind::Embedding),
        top_per_category: Some(2),
        intel_limit: Some(7),
        direct: true,
    };
    let options = args.apply(sitrep_intel::ReportOptions::default());
    assert_eq!(options.classifier, ClassifierKind::Embedding);
    assert_eq!(options.top_per_category, 2);
    assert_eq!(options.intel_limit, 7);
    assert_eq!(options.mode, sitrep_intel::ReportMode::Direct);
}

#[test]
fn absent_overrides_keep_configured_options() {
    let base = sitrep_intel::ReportOptions {
        top_per_category: 4,
        intel_limit: 25,
        ..sitrep_intel::ReportOptions::default()
    };
    let options = report::ReportArgs::default().apply(base);
    assert_eq!(options.top_per_category, 4);
    assert_eq!(options.intel_limit, 25);
    assert_eq!(options.classifier, ClassifierKind::Generative);
    assert_eq!(options.mode, sitrep_intel::ReportMode::MapReduce);
}

#[test]
fn help_is_handled_by_the_parser() {
    let err = Cli::try_parse_from(["sitrep", "--help"]).expect_err("help exits early");
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    assert!(Cli::command().render_help().to_string().contains("report"));
}
