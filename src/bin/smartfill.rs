

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use smartfill::fill::{OutcomeStatus, TextForm};
use smartfill::store::{JsonFileStore, KeyValueStore, LearnedPool, ProfileBook};
use smartfill::{FillEngine, HybridScorer, Lexicon, Profile, Resolver, Settings, SmartfillConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("smartfill=info".parse()?))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_help();
        return Ok(());
    };

    let mut config_path: Option<PathBuf> = None;
    let mut store_path: Option<PathBuf> = None;
    let mut rest = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                config_path = Some(PathBuf::from(value_of(&args, i)?));
                i += 1;
            }
            "--store" | "-s" => {
                store_path = Some(PathBuf::from(value_of(&args, i)?));
                i += 1;
            }
            other => rest.push(other.to_string()),
        }
        i += 1;
    }

    let config = SmartfillConfig::load(config_path.as_deref())?;
    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(
        store_path.unwrap_or_else(|| config.store_path.clone()),
    ));

    match command.as_str() {
        "fill" => fill(&config, store, &rest).await,
        "score" => score(&config, &rest),
        "learned" => learned(store, &rest).await,
        "profiles" => profiles(store, &rest).await,
        "--help" | "help" => {
            print_help();
            Ok(())
        }
        other => bail!("unknown command '{}', try --help", other),
    }
}

fn value_of(args: &[String], i: usize) -> anyhow::Result<&str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} needs a value", args[i]))
}

fn build_resolver(config: &SmartfillConfig) -> anyhow::Result<Resolver> {
    let lexicon = match &config.lexicon_path {
        Some(path) => Lexicon::from_json_file(path)?,
        None => Lexicon::default(),
    };
    Ok(Resolver::new(Arc::new(HybridScorer::new(Arc::new(lexicon)))))
}

fn read_profile(path: &Path) -> anyhow::Result<Profile> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(serde_json::from_str(&raw)?)
}

async fn fill(config: &SmartfillConfig, store: Arc<dyn KeyValueStore>, args: &[String]) -> anyhow::Result<()> {
    let book = ProfileBook::new(store.clone());
    let mut settings = book.stored_settings().await?.unwrap_or(config.settings);

    let mut questions: Option<PathBuf> = None;
    let mut profile: Option<Profile> = None;
    let mut json = false;
    let mut remember = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--questions" | "-q" => {
                questions = Some(PathBuf::from(value_of(args, i)?));
                i += 1;
            }
            "--profile" | "-p" => {
                profile = Some(read_profile(Path::new(value_of(args, i)?))?);
                i += 1;
            }
            "--use-profile" => {
                let name = value_of(args, i)?;
                profile = Some(
                    book.get(name)
                        .await?
                        .ok_or_else(|| anyhow!("no saved profile named '{}'", name))?,
                );
                i += 1;
            }
            "--threshold" | "-t" => {
                settings.threshold = value_of(args, i)?.parse().context("threshold must be a number")?;
                i += 1;
            }
            "--remember-settings" => remember = true,
            "--json" => json = true,
            other if toggle_setting(&mut settings, other) => {}
            other => bail!("unexpected argument '{}'", other),
        }
        i += 1;
    }

    let questions = questions.ok_or_else(|| anyhow!("fill needs --questions <file>"))?;
    let profile = profile.ok_or_else(|| anyhow!("fill needs --profile <file> or --use-profile <name>"))?;
    let text = fs::read_to_string(&questions).with_context(|| format!("reading {}", questions.display()))?;
    let form = TextForm::from_lines(&text);

    if remember {
        book.save_settings(&settings).await?;
    }

    let engine = FillEngine::new(build_resolver(config)?, LearnedPool::new(store)).with_config(config);
    let report = engine.run_fill(&form, &form, &form, &profile, &settings).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for outcome in &report.outcomes {
        let detail = match (&outcome.matched, outcome.status) {
            (Some(m), OutcomeStatus::Filled | OutcomeStatus::Suggested) => {
                format!("{} ({} {:.2}, {})", m.value, m.key_or_question, m.score, m.source)
            }
            _ => outcome.error.clone().unwrap_or_default(),
        };
        println!("[{}] {} -> {}", outcome.status, outcome.label, detail);
    }
    println!(
        "{} questions: {} filled, {} suggested, {} unresolved, {} learned",
        report.questions_found,
        report.filled(),
        report.suggested(),
        report.unresolved(),
        report.learned()
    );
    Ok(())
}

/// Applies an on/off settings flag; returns false for anything else.
fn toggle_setting(settings: &mut Settings, flag: &str) -> bool {
    match flag {
        "--review" => settings.review_mode = true,
        "--no-review" => settings.review_mode = false,
        "--learn" => settings.learning_enabled = true,
        "--no-learn" => settings.learning_enabled = false,
        _ => return false,
    }
    true
}

fn score(config: &SmartfillConfig, args: &[String]) -> anyhow::Result<()> {
    let [question, candidate] = args else {
        bail!("usage: smartfill score <question> <candidate>");
    };
    let lexicon = match &config.lexicon_path {
        Some(path) => Lexicon::from_json_file(path)?,
        None => Lexicon::default(),
    };
    let breakdown = HybridScorer::new(Arc::new(lexicon)).breakdown(question, candidate);
    println!("{}", serde_json::to_string_pretty(&breakdown)?);
    Ok(())
}

async fn learned(store: Arc<dyn KeyValueStore>, args: &[String]) -> anyhow::Result<()> {
    let pool = LearnedPool::new(store);
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["export"] => println!("{}", pool.export_json().await?),
        ["export", path] => {
            fs::write(path, pool.export_json().await?)?;
            println!("Exported {} pairs to {}", pool.len().await?, path);
        }
        ["import", path] => {
            let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            let added = pool.import_json(&raw).await?;
            println!("Imported {} pairs", added);
        }
        ["search", query] => {
            for (index, pair) in pool.search(query).await? {
                println!("{:>4}  {} -> {}", index, pair.question, pair.answer);
            }
        }
        ["remove", index] => {
            let index: usize = index.parse().context("index must be a number")?;
            let removed = pool.remove_at(index).await?;
            println!("Removed '{}'", removed.question);
        }
        ["clear"] => {
            pool.clear().await?;
            println!("Learned memory cleared");
        }
        _ => bail!("usage: smartfill learned export [file] | import <file> | search <text> | remove <index> | clear"),
    }
    Ok(())
}

async fn profiles(store: Arc<dyn KeyValueStore>, args: &[String]) -> anyhow::Result<()> {
    let book = ProfileBook::new(store);
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["list"] => {
            for name in book.names().await? {
                println!("{}", name);
            }
        }
        ["show", name] => {
            let profile = book
                .get(name)
                .await?
                .ok_or_else(|| anyhow!("no saved profile named '{}'", name))?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ["save", name, path] => {
            book.save(name, read_profile(Path::new(path))?).await?;
            println!("Saved profile '{}'", name);
        }
        ["delete", name] => {
            if book.delete(name).await? {
                println!("Deleted profile '{}'", name);
            } else {
                println!("No profile named '{}'", name);
            }
        }
        _ => bail!("usage: smartfill profiles [list] | show <name> | save <name> <file> | delete <name>"),
    }
    Ok(())
}

fn print_help() {
    println!("smartfill - answer form questions from a profile and learned memory");
    println!();
    println!("USAGE:");
    println!("    smartfill <COMMAND> [--config <file>] [--store <file>] [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    fill --questions <file> (--profile <file> | --use-profile <name>)");
    println!("         [--threshold <0..1>] [--review | --no-review] [--learn | --no-learn] [--remember-settings] [--json]");
    println!("    score <question> <candidate>");
    println!("    learned export [file] | import <file> | search <text> | remove <index> | clear");
    println!("    profiles [list] | show <name> | save <name> <file> | delete <name>");
    println!();
    println!("Environment: SMARTFILL_* overrides config keys, RUST_LOG controls logging.");
}
