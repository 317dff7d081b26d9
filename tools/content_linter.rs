/// Content Linter: checks authored balance content before a build.
///
/// Usage: content_linter <content_dir|file.ron> [--config <forge.ron>]

use balance_forge::core::content::{BuildConfig, ContentSet};
use balance_forge::core::lint::lint_content;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: content_linter <content_dir|file.ron> [--config <forge.ron>]");
        process::exit(0);
    }

    let content_arg = &args[1];
    let mut config_path = None;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--config" && i + 1 < args.len() {
            i += 1;
            config_path = Some(args[i].clone());
        }
        i += 1;
    }

    let content_path = Path::new(content_arg);
    let content = if content_path.is_file() {
        ContentSet::load_from_ron(content_path)
    } else if content_path.is_dir() {
        ContentSet::load_from_dir(content_path)
    } else {
        eprintln!("ERROR: Path '{}' does not exist", content_arg);
        process::exit(1);
    };
    let content = content.unwrap_or_else(|e| {
        eprintln!("ERROR: Failed to load content: {}", e);
        process::exit(1);
    });

    // An explicit config must load; the default one is optional.
    let config = match config_path {
        Some(path) => BuildConfig::load_from_ron(Path::new(&path)).unwrap_or_else(|e| {
            eprintln!("ERROR: Failed to load config: {}", e);
            process::exit(1);
        }),
        None if Path::new("forge.ron").is_file() => {
            BuildConfig::load_from_ron(Path::new("forge.ron")).unwrap_or_else(|e| {
                eprintln!("ERROR: Failed to load forge.ron: {}", e);
                process::exit(1);
            })
        }
        None => BuildConfig::default(),
    };

    println!(
        "Loaded {} races, {} variants, {} items, {} skills, {} events, {} dialogue graphs",
        content.races.len(),
        content.variants.len(),
        content.items.len(),
        content.skills.len(),
        content.events.len(),
        content.dialogues.len()
    );

    let report = lint_content(&content, &config.grades);

    println!("\n=== Content Lint Report ===\n");

    if report.is_clean() {
        println!("All checks passed!");
    }

    for warning in &report.warnings {
        println!("WARNING: {}", warning);
    }

    for error in &report.errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        report.errors.len(),
        report.warnings.len()
    );

    if !report.errors.is_empty() {
        process::exit(1);
    }
}
