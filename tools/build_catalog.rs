/// Build Catalog: expands authored content into catalog records.
///
/// Records already present in the catalog directory are left alone, so
/// re-running only fills in what is missing.
///
/// Usage: build_catalog [--config <forge.ron>] [--content <dir>] [--out <dir>] [--seed <n>]

use balance_forge::core::builder::ContentBuilder;
use balance_forge::core::content::{BuildConfig, ContentSet};
use balance_forge::core::store::DirStore;
use std::env;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "Usage: build_catalog [--config <forge.ron>] [--content <dir>] [--out <dir>] [--seed <n>]";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut config_path = None;
    let mut content_dir = None;
    let mut out_dir = None;
    let mut seed = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config_path = Some(PathBuf::from(value(&args, i, "--config")));
            }
            "--content" => {
                i += 1;
                content_dir = Some(PathBuf::from(value(&args, i, "--content")));
            }
            "--out" => {
                i += 1;
                out_dir = Some(PathBuf::from(value(&args, i, "--out")));
            }
            "--seed" => {
                i += 1;
                seed = Some(value(&args, i, "--seed").parse::<u64>().unwrap_or_else(|_| {
                    eprintln!("Error: --seed must be an unsigned integer");
                    process::exit(1);
                }));
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => load_config(&path),
        None if Path::new("forge.ron").is_file() => load_config(Path::new("forge.ron")),
        None => BuildConfig::default(),
    };
    if let Some(dir) = content_dir {
        config.content_dir = dir;
    }
    if let Some(dir) = out_dir {
        config.catalog_dir = dir;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }

    let content = ContentSet::load_from_dir(&config.content_dir).unwrap_or_else(|e| {
        eprintln!(
            "Error: failed to load content from '{}': {}",
            config.content_dir.display(),
            e
        );
        process::exit(1);
    });

    println!(
        "Loaded {} definitions from {}",
        content.len(),
        config.content_dir.display()
    );
    println!(
        "Building into {} (seed {})",
        config.catalog_dir.display(),
        config.seed
    );

    let store = DirStore::new(config.catalog_dir.clone());
    let mut builder = ContentBuilder::from_config(&config, store);
    let report = builder.run(&content);

    for failure in &report.failures {
        eprintln!("FAILED: {}", failure.message);
    }
    println!("{}", report);

    if !report.is_clean() {
        process::exit(1);
    }
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    args.get(i).map(String::as_str).unwrap_or_else(|| {
        eprintln!("Error: {} needs a value", flag);
        process::exit(1);
    })
}

fn load_config(path: &Path) -> BuildConfig {
    BuildConfig::load_from_ron(path).unwrap_or_else(|e| {
        eprintln!("Error: failed to load config: {}", e);
        process::exit(1);
    })
}
