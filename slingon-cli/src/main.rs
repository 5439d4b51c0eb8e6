use clap::{Arg, ArgAction, ArgMatches, Command};
use slingon::{
    DictionaryStore, Direction, EngineConfig, FileStore, MemoryStore, SlingonError,
    TranslationEngine,
};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::debug;

fn cli() -> Command {
    Command::new("slingon")
        .version("0.1.0")
        .about("Russian ⇄ Slingon translator with a learning dictionary")
        .subcommand_required(true)
        .arg(
            Arg::new("store")
                .long("store")
                .short('s')
                .global(true)
                .help("Dictionary directory [env: SLINGON_STORE_DIR]"),
        )
        .arg(
            Arg::new("key")
                .long("key")
                .short('k')
                .global(true)
                .help("Dictionary store key [env: SLINGON_DICTIONARY_KEY]"),
        )
        .arg(
            Arg::new("memory")
                .long("memory")
                .short('m')
                .global(true)
                .help("Keep the dictionary in memory only")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .help("Log engine decisions to stderr")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("translate")
                .about("Translate text (reads stdin when TEXT is omitted)")
                .arg(Arg::new("text").help("Text to translate").index(1))
                .arg(
                    Arg::new("reverse")
                        .long("reverse")
                        .short('r')
                        .help("Translate Slingon back to Russian")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Add a word to the dictionary")
                .arg(
                    Arg::new("source")
                        .help("Russian word")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("target")
                        .help("Slingon word")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(Command::new("dict").about("List the dictionary"))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(matches: &ArgMatches) -> Result<EngineConfig, SlingonError> {
    let mut config = EngineConfig::from_env()?;
    if let Some(dir) = matches.get_one::<String>("store") {
        config = config.with_store_dir(dir);
    }
    if let Some(key) = matches.get_one::<String>("key") {
        config = config.with_dictionary_key(key)?;
    }
    Ok(config)
}

async fn read_stdin() -> std::io::Result<String> {
    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    Ok(input)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let config = resolve_config(&matches)?;
    let store: Arc<dyn DictionaryStore> = if matches.get_flag("memory") {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileStore::new(&config.store_dir))
    };
    debug!(
        "Using {} with key '{}'",
        store.store_name(),
        config.dictionary_key
    );

    let engine = TranslationEngine::load(store, config).await;

    match matches.subcommand() {
        Some(("translate", sub)) => {
            let text = match sub.get_one::<String>("text") {
                Some(text) => text.clone(),
                None => read_stdin().await?,
            };
            if text.trim().is_empty() {
                return Ok(());
            }

            let direction = if sub.get_flag("reverse") {
                Direction::Reverse
            } else {
                Direction::Forward
            };

            let translation = engine.translate(&text, direction).await;
            print!("{}", with_trailing_newline(translation.text));

            for warning in &translation.warnings {
                eprintln!("⚠️  {}", warning);
            }
        }
        Some(("add", sub)) => {
            let source = sub
                .get_one::<String>("source")
                .map(String::as_str)
                .unwrap_or("");
            let target = sub
                .get_one::<String>("target")
                .map(String::as_str)
                .unwrap_or("");

            match engine.add_manual_entry(source, target).await {
                Ok(()) => println!(
                    "✅ {} → {}",
                    source.trim().to_lowercase(),
                    target.trim().to_lowercase()
                ),
                Err(SlingonError::StoreUnavailable(msg)) => {
                    eprintln!("⚠️  Added for this session only, could not save: {}", msg);
                }
                Err(e) => {
                    eprintln!("❌ {}", e);
                    return Err(e.into());
                }
            }
        }
        Some(("dict", _)) => {
            for (source, target) in engine.dictionary_snapshot().await {
                println!("{} → {}", source, target);
            }
        }
        _ => unreachable!("clap enforces a subcommand"),
    }

    Ok(())
}

/// Terminate `text` with a newline unless it already ends with one
fn with_trailing_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
