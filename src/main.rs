use clap::{Arg, Command};
use log::LevelFilter;
use scamshield::config::Config;
use scamshield::{server, ScamAnalyzer};
use std::process;

#[tokio::main]
async fn main() {
    let matches = Command::new("scamshield")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Heuristic scam and phishing message classifier")
        .long_about("ScamShield scores free-text messages for scam signals:\n\
                    • Weighted indicator lexicons (urgency, threats, financial bait, ...)\n\
                    • Structural patterns (links, chat invites, unrealistic returns, shouting)\n\
                    • Optional negative-sentiment signal from an external classifier\n\
                    • Risk tier and recommended action for every message")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/etc/scamshield.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Test configuration validity, including custom lexicons")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("message")
                .long("message")
                .value_name("TEXT")
                .help("Analyze a single message and print the verdict as JSON")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-message")
                .long("test-message")
                .value_name("FILE")
                .help("Analyze the contents of a file and print the verdict as JSON")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("offline")
                .long("offline")
                .help("Disable the external sentiment service")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging with per-signal detail")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    if let Err(e) = dotenvy::dotenv() {
        log::debug!("No .env file loaded: {e}");
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("/etc/scamshield.yaml");

    let mut config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };

    if matches.get_flag("offline") {
        config.sentiment.enabled = false;
    }

    if matches.get_flag("test-config") {
        println!("🔍 Testing configuration...");
        println!();
        println!("Listen address: {}", config.listen_address);
        println!(
            "Sentiment service: {} ({})",
            if config.sentiment.enabled { "enabled" } else { "disabled" },
            config.sentiment.endpoint
        );
        println!(
            "API token: {}",
            if config.sentiment.api_token.is_some() { "present" } else { "missing" }
        );
        for lexicon in config.lexicons() {
            println!(
                "  Lexicon {}: weight {}, {} phrases",
                lexicon.category,
                lexicon.weight,
                lexicon.phrases.len()
            );
        }

        match config.validate() {
            Ok(()) => println!("✅ Configuration is valid"),
            Err(e) => {
                println!("❌ Configuration validation failed:");
                println!("Error: {e:#}");
                process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e:#}");
        process::exit(1);
    }

    let analyzer = match ScamAnalyzer::from_config(&config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("Error initializing analyzer: {e:#}");
            process::exit(1);
        }
    };

    if let Some(text) = matches.get_one::<String>("message") {
        analyze_and_print(&analyzer, text).await;
        return;
    }

    if let Some(path) = matches.get_one::<String>("test-message") {
        match std::fs::read_to_string(path) {
            Ok(text) => analyze_and_print(&analyzer, &text).await,
            Err(e) => {
                eprintln!("❌ Error reading message file: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let addr = match config.listen_addr() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    if let Err(e) = server::serve(analyzer, addr).await {
        log::error!("Server error: {e:#}");
        process::exit(1);
    }
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    let mut config = if std::path::Path::new(path).exists() {
        Config::from_file(path)?
    } else {
        log::warn!("Configuration file '{path}' not found, using default configuration");
        Config::default()
    };
    config.apply_env()?;
    Ok(config)
}

fn generate_default_config(path: &str) {
    let config = Config::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Please edit the configuration file to suit your needs.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}

async fn analyze_and_print(analyzer: &ScamAnalyzer, text: &str) {
    let verdict = match analyzer.analyze(text).await {
        Ok(verdict) => verdict,
        Err(e) => {
            eprintln!("❌ {e}");
            process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&verdict) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("❌ Failed to render verdict: {e}");
            process::exit(1);
        }
    }
}
