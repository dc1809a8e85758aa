use clap::Parser;
use colored::*;
use env_logger::{Builder, Env, Target};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use metagrep::cli::{Cli, OutputFormat};
use metagrep::error::{MetagrepError, Result as MetagrepResult};
use metagrep::output::{render_json, render_stats, render_text};
use metagrep::{PatternMatcher, Preferences, SearchEngine};
use std::fs;
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

/// `Ok(true)` when something matched
fn run(cli: &Cli) -> MetagrepResult<bool> {
    setup_logging(cli)?;
    info!("Application started with pattern {:?}", cli.pattern);

    let prefs = Preferences::load().unwrap_or_else(|e| {
        warn!("Ignoring preferences: {e}");
        Preferences::default()
    });
    let mut engine = SearchEngine::with_preferences(&prefs)?;
    configure(&mut engine, cli)?;
    // reject a bad pattern up front so it maps to a usage error
    PatternMatcher::compile(&cli.pattern, engine.config().pattern_options())?;

    let stop = engine.stop_handle();
    if let Err(e) = ctrlc::set_handler(move || stop.stop()) {
        debug!("Ctrl-C handler not installed: {e}");
    }

    let pb = if cli.format == OutputFormat::Text && !cli.verbose {
        let pb = ProgressBar::new_spinner().with_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .map_err(|e| MetagrepError::Other(e.to_string()))?
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message(format!("Searching {}...", cli.path.display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let report = engine.search_report(&cli.path, &cli.pattern);

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if let Some(problem) = &report.problem {
        eprintln!("{} {}", "warning:".yellow().bold(), problem);
    }

    match cli.format {
        OutputFormat::Json => println!("{}", render_json(&report)?),
        OutputFormat::Text => {
            if report.matches.is_empty() {
                println!("{}", "No matches found".yellow());
            } else {
                println!("{}", render_text(&report.matches));
                println!(
                    "\n{} {} {}",
                    "Found".green(),
                    report.matches.len(),
                    "matches".green()
                );
            }
        }
    }

    if cli.stats {
        eprintln!("{}", render_stats(&report));
    }

    Ok(!report.matches.is_empty())
}

fn configure(engine: &mut SearchEngine, cli: &Cli) -> MetagrepResult<()> {
    engine.set_case_sensitive(cli.case_sensitive);
    engine.set_regex(cli.regex);
    engine.set_whole_word(cli.word);
    engine.set_image_metadata(cli.image_metadata);
    engine.set_file_metadata(cli.file_metadata);
    engine.set_archive_search(cli.archives);
    engine.set_binary_hex(cli.binary);

    if let Some(lines) = cli.context_lines {
        engine.set_context_lines(lines);
    }
    if let Some(extensions) = &cli.extensions {
        engine.set_file_extensions(extensions);
    }
    for pattern in &cli.exclude {
        engine.add_exclude_pattern(pattern)?;
    }
    if let Some(max) = cli.max_results {
        engine.set_max_results(max);
    }
    if let Some(mib) = cli.max_size {
        engine.set_max_file_size(mib.saturating_mul(1024 * 1024));
    }
    if let Some(secs) = cli.probe_timeout {
        engine.set_probe_timeout(Duration::from_secs(secs));
    }
    Ok(())
}

fn setup_logging(cli: &Cli) -> MetagrepResult<()> {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });

    if let Some(log_path) = &cli.log {
        if let Some(parent_dir) = log_path.parent() {
            if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                fs::create_dir_all(parent_dir)?;
            }
        }
        let log_file = fs::File::create(log_path)?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder
        .try_init()
        .map_err(|e| MetagrepError::Other(e.to_string()))?;
    Ok(())
}
