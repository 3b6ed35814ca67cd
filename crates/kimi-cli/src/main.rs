use std::io::{self, BufRead, Read, Write};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use kimi_config::{expand_tilde, Settings, SettingsStore};
use kimi_core::conversation::Conversation;
use kimi_llm::KimiClient;

#[derive(Parser)]
#[command(name = "kimi-cli")]
#[command(about = "Kimi K2 coding assistant")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, env = "KIMI_CONFIG", default_value = "~/.kimi-coder/config.json")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a code completion
    Complete {
        /// What to generate
        prompt: String,
        /// Surrounding code or other context
        #[arg(long, default_value = "")]
        context: String,
    },
    /// Review code for bugs, performance, quality and security issues
    Analyze {
        /// Source file, or - for stdin
        file: String,
        #[arg(long, default_value = "")]
        language: String,
    },
    /// Generate unit tests for code
    GenTests {
        /// Source file, or - for stdin
        file: String,
        #[arg(long, default_value = "")]
        language: String,
        #[arg(long, default_value = "")]
        framework: String,
    },
    /// Explain what code does
    Explain {
        /// Source file, or - for stdin
        file: String,
        #[arg(long, default_value = "")]
        language: String,
    },
    /// Chat with the model; omit MESSAGE for an interactive session
    Chat {
        message: Option<String>,
        /// System prompt for the session
        #[arg(long)]
        system: Option<String>,
    },
    /// List models the endpoint serves
    Models,
    /// Manage settings
    Config(ConfigArgs),
}

#[derive(Args, Clone)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Write default settings
    Init {
        /// Overwrite an existing file
        #[arg(long, default_value = "false")]
        force: bool,
    },
    /// Print current settings
    Show,
    /// Read one setting (e.g. model, behavior.show_code_analysis)
    Get { key: String },
    /// Change one setting
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let store = settings_store(&cli.config)?;

    match cli.command {
        Commands::Complete { prompt, context } => {
            let client = build_client(&store).await?;
            let text = client.complete(&prompt, &context).await?;
            println!("{text}");
        }
        Commands::Analyze { file, language } => {
            let code = read_source(&file)?;
            let client = build_client(&store).await?;
            let text = client.analyze(&code, &language).await?;
            println!("{text}");
        }
        Commands::GenTests {
            file,
            language,
            framework,
        } => {
            let code = read_source(&file)?;
            let client = build_client(&store).await?;
            let text = client.generate_tests(&code, &language, &framework).await?;
            println!("{text}");
        }
        Commands::Explain { file, language } => {
            let code = read_source(&file)?;
            let client = build_client(&store).await?;
            let text = client.explain(&code, &language).await?;
            println!("{text}");
        }
        Commands::Chat { message, system } => {
            let client = build_client(&store).await?;
            match message {
                Some(message) => {
                    let text = client.chat(&message, system.as_deref()).await?;
                    println!("{text}");
                }
                None => interactive_chat(&client, system.as_deref()).await?,
            }
        }
        Commands::Models => {
            let client = build_client(&store).await?;
            for model in client.list_models().await? {
                println!("{}", model.id);
            }
        }
        Commands::Config(args) => run_config(&store, args).await?,
    }

    Ok(())
}

fn settings_store(path: &str) -> anyhow::Result<SettingsStore> {
    let path = expand_tilde(path).context("could not resolve home directory")?;
    Ok(SettingsStore::new(path))
}

/// Load and validate settings, then build the client. Validation failures
/// are all reported before bailing, and no network call starts.
async fn build_client(store: &SettingsStore) -> anyhow::Result<KimiClient> {
    let settings = store.load().await?;
    let errors = settings.validation_errors();
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("{} {}", "config error:".red().bold(), error);
        }
        bail!("invalid settings, fix {} or set KIMI_API_KEY", store.path().display());
    }
    Ok(KimiClient::new(&settings)?)
}

fn read_source(file: &str) -> anyhow::Result<String> {
    if file == "-" {
        let mut code = String::new();
        io::stdin()
            .read_to_string(&mut code)
            .context("failed to read stdin")?;
        Ok(code)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("failed to read {file}"))
    }
}

async fn interactive_chat(client: &KimiClient, system: Option<&str>) -> anyhow::Result<()> {
    let mut conversation = match system {
        Some(prompt) => Conversation::with_system(prompt),
        None => Conversation::new(),
    };

    println!("{}", "Interactive chat. /reset clears history, /quit exits.".dimmed());
    let stdin = io::stdin();
    loop {
        print!("{} ", ">".green().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                conversation.reset();
                if let Some(prompt) = system {
                    conversation = Conversation::with_system(prompt);
                }
                println!("{}", "history cleared".dimmed());
            }
            message => match client.converse(&mut conversation, message).await {
                Ok(reply) => println!("{reply}"),
                Err(e) => eprintln!("{} {}", "error:".red().bold(), e),
            },
        }
    }
    Ok(())
}

async fn run_config(store: &SettingsStore, args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommands::Init { force } => {
            if store.init(force).await? {
                println!("wrote {}", store.path().display());
            } else {
                println!(
                    "{} {} already exists, use --force to overwrite",
                    "skipped:".yellow(),
                    store.path().display()
                );
            }
        }
        ConfigCommands::Show => {
            let settings = store.load().await?;
            let mut shown = settings.clone();
            if !shown.api_key.is_empty() {
                shown.api_key = mask_key(&settings.api_key);
            }
            println!("{}", serde_json_pretty(&shown)?);
        }
        ConfigCommands::Get { key } => {
            let settings = store.load().await?;
            match settings.get_value(&key) {
                Some(value) => println!("{value}"),
                None => bail!("unknown key: {key}"),
            }
        }
        ConfigCommands::Set { key, value } => {
            let mut settings = store.load().await?;
            settings.set_value(&key, &value)?;
            store.save(&settings).await?;
            println!("{} = {}", key, value.green());
        }
    }
    Ok(())
}

fn serde_json_pretty(settings: &Settings) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(settings)?)
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}
