//! flick - quick questions to an OpenAI-compatible chat model

mod commands;
mod history;
mod presets;
mod providers;
mod settings;
mod utils;

use clap::Parser;
use commands::{CommandContext, CommandResult};
use flick_agent::{ChatSession, ProviderTransport, SessionHandle, SessionObserver, StatusKind};
use flick_ai::{ChatCompletionsClient, ClientConfig};
use history::RecentQuestions;
use presets::Preset;
use settings::{SettingKey, SettingsStore};
use std::io::{IsTerminal, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use toml::Value;
use tracing_subscriber::EnvFilter;

/// flick - ask a chat model, get a streamed answer
#[derive(Parser, Debug)]
#[command(name = "flick")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Model to use for this run (overrides modelName)
    #[arg(short, long)]
    model: Option<String>,

    /// API base URL for this run (overrides baseUrl)
    #[arg(long)]
    base_url: Option<String>,

    /// Preset id to apply (overrides currentPresetId)
    #[arg(short, long)]
    preset: Option<String>,

    /// Ask a single question and exit
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Initialize settings file
    #[arg(long)]
    init_config: bool,

    /// Store a setting, e.g. --set apiKey=sk-...
    #[arg(long, value_name = "KEY=VALUE")]
    set: Vec<String>,
}

/// Per-run settings taken from the command line
#[derive(Debug, Default)]
struct Overrides {
    model: Option<String>,
    base_url: Option<String>,
}

impl Overrides {
    fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(ref model) = self.model {
            config.model_name = model.clone();
        }
        if let Some(ref base_url) = self.base_url {
            config.base_url = base_url.clone();
        }
        config
    }
}

/// Everything the interactive loop carries between questions
struct App {
    settings: SettingsStore,
    overrides: Overrides,
    preset: &'static Preset,
    history: RecentQuestions,
    session: ChatSession,
}

impl App {
    /// Fresh connection settings for the next request
    fn client_config(&self) -> ClientConfig {
        self.overrides.apply(self.settings.client_config())
    }

    fn provider_id(&self) -> String {
        self.settings
            .get_str(SettingKey::ApiProvider)
            .unwrap_or_default()
    }

    async fn ask(&mut self, question: &str) -> bool {
        let config = self.client_config();
        let mut observer: TerminalObserver = TerminalObserver::new(self.session.handle());

        let outcome = self
            .session
            .send(&config, question, self.preset.active_prompt(), &mut observer)
            .await;
        observer.finish();

        match outcome {
            Ok(answer) => {
                if let Err(e) = self.history.record(question, &answer) {
                    tracing::warn!("Failed to save history: {}", e);
                }
                true
            }
            Err(e) => {
                report_error(&e);
                false
            }
        }
    }
}

/// Prints streamed output to the terminal
struct TerminalObserver<W: Write + Send = std::io::Stdout> {
    out: W,
    styled: bool,
    in_reasoning: bool,
    wrote_content: bool,
    /// Set once a write fails; the request is cancelled and output stops
    closed: bool,
    handle: SessionHandle,
}

impl TerminalObserver {
    fn new(handle: SessionHandle) -> Self {
        let out = std::io::stdout();
        let styled = out.is_terminal();
        Self::with_writer(out, styled, handle)
    }
}

impl<W: Write + Send> TerminalObserver<W> {
    fn with_writer(out: W, styled: bool, handle: SessionHandle) -> Self {
        Self {
            out,
            styled,
            in_reasoning: false,
            wrote_content: false,
            closed: false,
            handle,
        }
    }

    fn write(&mut self, text: &str) {
        if self.closed {
            return;
        }
        if let Err(e) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
        {
            tracing::warn!("Output closed ({}), cancelling request", e);
            self.closed = true;
            self.handle.cancel();
        }
    }

    fn end_reasoning(&mut self) {
        if self.in_reasoning {
            self.in_reasoning = false;
            if self.styled {
                self.write("\x1b[0m");
            }
            self.write("\n\n");
        }
    }

    fn finish(&mut self) {
        self.end_reasoning();
        if self.wrote_content {
            self.write("\n");
        }
    }
}

impl<W: Write + Send> SessionObserver for TerminalObserver<W> {
    fn on_content(&mut self, delta: &str) {
        self.end_reasoning();
        self.wrote_content = true;
        self.write(delta);
    }

    fn on_status(&mut self, kind: StatusKind, detail: Option<&str>) {
        match kind {
            StatusKind::Reasoning => {
                if !self.in_reasoning {
                    self.in_reasoning = true;
                    // dim
                    if self.styled {
                        self.write("\x1b[2m");
                    }
                }
                if let Some(text) = detail {
                    self.write(text);
                }
            }
            StatusKind::Generating => self.end_reasoning(),
        }
    }
}

fn report_error(e: &flick_agent::Error) {
    if matches!(e, flick_agent::Error::Cancelled) {
        eprintln!("[stopped]");
        return;
    }

    eprintln!("Error [{}]: {}", e.kind(), e);
    if e.needs_configuration() {
        eprintln!();
        eprintln!("Set your API key with: flick --set apiKey=your-key");
        eprintln!("Or export {}=your-key", settings::API_KEY_ENV);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("flick=debug")
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => return,
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Ctrl-C stops the answer being streamed; with nothing in flight it exits.
fn spawn_interrupt_handler(handle: SessionHandle) {
    tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            if !handle.cancel() {
                eprintln!();
                std::process::exit(130);
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing(args.verbose);

    // Initialize settings and exit
    if args.init_config {
        match SettingsStore::init() {
            Ok(path) => {
                println!("Settings file at: {}", path.display());
                println!("\nExample settings:\n{}", settings::example_settings());
            }
            Err(e) => {
                eprintln!("Error creating settings: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let mut settings = SettingsStore::load();

    // Store settings and exit
    if !args.set.is_empty() {
        for assignment in &args.set {
            let key = settings.set_from_str(assignment)?;
            println!("Saved {} to {}", key.as_str(), settings.path().display());
        }
        return Ok(());
    }

    let preset = match args.preset {
        Some(ref id) => match presets::find(id) {
            Some(preset) => preset,
            None => anyhow::bail!("unknown preset '{}'", id),
        },
        None => presets::resolve(settings.get_str(SettingKey::CurrentPresetId).as_deref()),
    };

    let history = RecentQuestions::beside(settings.path());
    let session = ChatSession::new(Arc::new(ProviderTransport::new()));
    spawn_interrupt_handler(session.handle());

    let mut app = App {
        settings,
        overrides: Overrides {
            model: args.model,
            base_url: args.base_url,
        },
        preset,
        history,
        session,
    };

    // Non-interactive mode
    if let Some(command) = args.command {
        if !app.ask(&command).await {
            std::process::exit(1);
        }
        return Ok(());
    }

    run_interactive(&mut app).await
}

async fn run_interactive(app: &mut App) -> anyhow::Result<()> {
    // Show minimal startup info (only if TTY)
    if std::io::stderr().is_terminal() {
        let config = app.client_config();
        eprintln!("flick ({}) {}", config.model_name, app.preset.label());
        if !config.has_api_key() {
            eprintln!("No API key set. Use: flick --set apiKey=your-key");
        }
        eprintln!("Type /help for commands.");
        eprintln!();
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        // EOF
        let Some(input) = lines.next_line().await? else {
            break;
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let config = app.client_config();
        let provider_id = app.provider_id();
        let ctx = CommandContext {
            preset: app.preset,
            config: &config,
            provider_id: &provider_id,
            context_len: app.session.context().len(),
        };

        match commands::execute_command(input, &ctx) {
            Some(CommandResult::Exit) => break,
            Some(result) => handle_command(app, result).await,
            None => {
                println!();
                app.ask(input).await;
            }
        }
        println!();
    }

    Ok(())
}

async fn handle_command(app: &mut App, result: CommandResult) {
    match result {
        CommandResult::NewConversation => {
            app.session.reset();
            println!("Started a new conversation.");
        }
        CommandResult::SelectPreset(preset) => {
            app.preset = preset;
            save_setting(app, SettingKey::CurrentPresetId, preset.id);
            println!("Preset: {}", preset.label());
        }
        CommandResult::SwitchProvider(provider) => {
            save_setting(app, SettingKey::ApiProvider, provider.id);
            if !provider.base_url.is_empty() {
                save_setting(app, SettingKey::BaseUrl, provider.base_url);
                app.overrides.base_url = None;
            }
            if let Some(model) = provider.default_model() {
                save_setting(app, SettingKey::ModelName, model.id);
                app.overrides.model = None;
            }
            let config = app.client_config();
            println!(
                "Switched to {} ({} at {})",
                provider.name, config.model_name, config.base_url
            );
            if provider.base_url.is_empty() {
                println!("Set the endpoint with: flick --set baseUrl=https://...");
            }
        }
        CommandResult::SwitchModel(model) => {
            save_setting(app, SettingKey::ModelName, &model);
            app.overrides.model = None;
            println!("Switched to: {}", model);
        }
        CommandResult::ListRemoteModels => list_remote_models(&app.client_config()).await,
        CommandResult::ShowHistory => print!("{}", app.history.render()),
        CommandResult::Message(msg) => println!("{}", msg),
        CommandResult::Unknown(cmd) => {
            println!("Unknown command: /{}", cmd);
            println!("Type /help for available commands.");
        }
        CommandResult::Exit => {}
    }
}

fn save_setting(app: &mut App, key: SettingKey, value: &str) {
    if let Err(e) = app.settings.set(key, Value::String(value.to_string())) {
        eprintln!("Failed to save {}: {:#}", key.as_str(), e);
    }
}

async fn list_remote_models(config: &ClientConfig) {
    match ChatCompletionsClient::new().list_models(config).await {
        Ok(models) if models.is_empty() => println!("The endpoint reported no models."),
        Ok(models) => {
            println!("Models at {}:\n", config.base_url);
            for model in models {
                let marker = if model.id == config.model_name { " *" } else { "" };
                match model.owned_by {
                    Some(owner) => println!("  {} ({}){}", model.id, owner, marker),
                    None => println!("  {}{}", model.id, marker),
                }
            }
            println!("\nSwitch with: /model <name>");
        }
        Err(e) => eprintln!("Could not list models [{}]: {}", e.kind(), e),
    }
}
