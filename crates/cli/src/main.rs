use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::Parser;
use ordbog_core::{
    Client, ClientConfig, DictionaryCode, JsonConfig, JsonFormatter, LookupResult, TextConfig, TextFormatter,
    Transport,
};
use tracing_subscriber::EnvFilter;
use url::Url;

mod command;
mod echo;

use command::Command;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for one-shot lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, json", s)),
        }
    }
}

/// Look words up on ordbogen.com
#[derive(Parser, Debug)]
#[command(name = "ordbog")]
#[command(version)]
#[command(about = "Look words up on ordbogen.com", long_about = None)]
struct Args {
    /// Word to look up; starts the interactive prompt when omitted
    #[arg(value_name = "WORD")]
    word: Option<String>,

    /// Dictionary code to search in
    #[arg(short, long, default_value = "auto", value_name = "CODE")]
    dict: String,

    /// Output format for one-shot lookups (text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Print usage details under each word
    #[arg(long)]
    details: bool,

    /// Print word completions instead of translations
    #[arg(long)]
    suggest: bool,

    /// Uncolored text output
    #[arg(long)]
    plain: bool,

    /// List every known dictionary code and exit
    #[arg(long)]
    list_dicts: bool,

    /// Account username
    #[arg(short, long, env = "ORDBOGEN_COM_USERNAME", value_name = "USER")]
    username: Option<String>,

    /// Account password
    #[arg(short, long, env = "ORDBOGEN_COM_PASSWORD", value_name = "PASS", hide_env_values = true)]
    password: Option<String>,

    /// Cookie store location (default: data directory)
    #[arg(long, value_name = "FILE")]
    cookies: Option<PathBuf>,

    /// Keep cookies in memory only
    #[arg(long, conflicts_with = "cookies")]
    no_persist: bool,

    /// Service root URL
    #[arg(long, value_name = "URL")]
    base_url: Option<Url>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn build_config(args: &Args) -> ClientConfig {
    let mut builder = ClientConfig::builder().timeout(args.timeout);

    if let Some(url) = &args.base_url {
        builder = builder.base_url(url.clone());
    }
    if let Some(ua) = &args.user_agent {
        builder = builder.user_agent(ua.clone());
    }
    if args.no_persist {
        builder = builder.cookie_path(None);
    } else if let Some(path) = &args.cookies {
        builder = builder.cookie_path(Some(path.clone()));
    }

    builder.build()
}

fn print_lookup(result: &LookupResult, args: &Args) -> anyhow::Result<()> {
    match args.format {
        OutputFormat::Json => {
            let json = JsonFormatter::new(JsonConfig { pretty: true }).convert(result)?;
            println!("{}", json);
        }
        OutputFormat::Text if args.plain => {
            let config = TextConfig { include_details: args.details, ..Default::default() };
            println!("{}", TextFormatter::new(config).convert(result));
        }
        OutputFormat::Text => {
            echo::print_result(result);
            if args.details {
                for word in result.words() {
                    println!();
                    echo::print_details(word);
                }
            }
        }
    }
    Ok(())
}

fn run_once<T: Transport>(client: &mut Client<T>, word: &str, dict: DictionaryCode, args: &Args) -> anyhow::Result<()> {
    if args.suggest {
        let suggestions = client
            .word_suggestions(word, dict.as_str())
            .context("Failed to fetch suggestions")?;
        match args.format {
            OutputFormat::Json => println!("{}", JsonFormatter::new(JsonConfig { pretty: true }).suggestions(&suggestions)?),
            OutputFormat::Text => echo::print_suggestions(&suggestions),
        }
        return Ok(());
    }

    let result = client.lookup(word, dict.as_str()).context("Lookup failed")?;
    print_lookup(&result, args)
}

fn run_interactive<T: Transport>(client: &mut Client<T>, mut dict: DictionaryCode) -> anyhow::Result<()> {
    echo::print_info("You can now begin looking up words. Type .help for commands.");

    let mut last: Option<LookupResult> = None;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("[{}]> ", dict);
        io::stdout().flush().context("Failed to write prompt")?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        match command::parse(&line) {
            Command::Empty => {}
            Command::Exit => break,
            Command::Help => echo::print_help(),
            Command::ListDicts => {
                let available = client.available_dictionaries();
                if available.is_empty() {
                    echo::print_warning("The service did not list any dictionaries for this account");
                } else {
                    echo::print_dictionaries(&available, dict);
                }
            }
            Command::SetDict(code) => match code.parse::<DictionaryCode>() {
                Ok(code) => {
                    dict = code;
                    echo::print_success(&format!("Using {} ({})", code.name(), code));
                }
                Err(e) => echo::print_error(&e.to_string()),
            },
            Command::Details(number) => match last.as_ref().and_then(|result| result.word(number)) {
                Some(word) => echo::print_details(word),
                None => echo::print_warning(&format!("No word numbered {} in the last lookup", number)),
            },
            Command::Lookup(word) => match client.lookup(&word, dict.as_str()) {
                Ok(result) => {
                    echo::print_result(&result);
                    last = Some(result);
                }
                Err(e) => echo::print_error(&e.to_string()),
            },
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.verbose {
        echo::print_banner();
    }

    if args.list_dicts {
        let all = DictionaryCode::all().map(|code| (code, code.name())).collect();
        echo::print_dictionaries(&all, DictionaryCode::auto());
        return Ok(());
    }

    let dict: DictionaryCode = args.dict.parse()?;

    let Some(username) = args.username.as_deref() else {
        bail!("No username given: pass --username or set ORDBOGEN_COM_USERNAME");
    };
    let Some(password) = args.password.as_deref() else {
        bail!("No password given: pass --password or set ORDBOGEN_COM_PASSWORD");
    };

    let mut client = Client::new(build_config(&args)).context("Failed to create client")?;

    let outcome = client.login(username, password).context("Login failed")?;
    if !outcome.success {
        let message = outcome.message.unwrap_or_else(|| "Login rejected".to_string());
        echo::print_error(&message);
        bail!("Could not log in as {}", username);
    }
    if args.verbose {
        echo::print_success(&format!("Logged in as {}", username));
    }

    let result = match &args.word {
        Some(word) => run_once(&mut client, word, dict, &args),
        None => {
            echo::print_success(&format!("Ordbogen.com: you are logged in as {}!", username));
            run_interactive(&mut client, dict)
        }
    };

    if let Err(e) = client.logout() {
        tracing::warn!(error = %e, "logout failed");
    }

    result
}
