use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use riddle_core::model::TotalLevels;
use services::{
    ChatRiddleGenerator, Clock, GameConfig, GameServices, GeneratorConfig, RiddleGenerator,
};
use tokio::runtime::Handle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLevels { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLevels { raw } => {
                write!(f, "invalid --levels value: {raw} (expected a positive integer)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: GameServices,
    runtime: Handle,
}

impl UiApp for DesktopApp {
    fn game_services(&self) -> GameServices {
        self.services.clone()
    }

    fn runtime(&self) -> Handle {
        self.runtime.clone()
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    levels: Option<TotalLevels>,
    model: Option<String>,
    no_shuffle: bool,
    help: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  riddle [--levels <n>] [--model <name>] [--no-shuffle]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --levels 10");
    eprintln!("  --model gpt-4o-mini");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RIDDLE_AI_API_KEY, RIDDLE_AI_BASE_URL, RIDDLE_AI_MODEL");
    eprintln!("  RIDDLE_TOTAL_LEVELS, RIDDLE_FLASH_MS, RIDDLE_RETRY_LIMIT, RIDDLE_TIMEOUT_SECS");
    eprintln!("  RIDDLE_SHUFFLE_CHOICES, RIDDLE_TIER_MEDIUM_PERCENT, RIDDLE_TIER_HARD_PERCENT");
    eprintln!("  RUST_LOG (default: info)");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--levels" => {
                    let value = require_value(args, "--levels")?;
                    let levels = value
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .and_then(TotalLevels::new)
                        .ok_or_else(|| ArgsError::InvalidLevels { raw: value.clone() })?;
                    parsed.levels = Some(levels);
                }
                "--model" => {
                    let value = require_value(args, "--model")?;
                    parsed.model = Some(value);
                }
                "--no-shuffle" => parsed.no_shuffle = true,
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn build_services(args: &Args) -> Result<GameServices, Box<dyn std::error::Error>> {
    let mut config = GameConfig::from_env()?;
    if let Some(levels) = args.levels {
        config = config.with_total_levels(levels);
    }
    if args.no_shuffle {
        config = config.with_shuffle_choices(false);
    }

    let generator_config = GeneratorConfig::from_env().map(|generator| match &args.model {
        Some(model) => generator.with_model(model.clone()),
        None => generator,
    });
    let generator = ChatRiddleGenerator::new(generator_config);
    if !generator.enabled() {
        warn!("RIDDLE_AI_API_KEY is not set; riddles will fail to load until it is");
    }

    Ok(GameServices::new(config, Arc::new(generator), Clock::system()))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if args.help {
        print_usage();
        return Ok(());
    }

    init_tracing();

    let services = build_services(&args)?;
    let config = services.config();
    info!(
        total_levels = config.total_levels.get(),
        retry_limit = config.retry_limit,
        shuffle_choices = config.shuffle_choices,
        "launching riddle game"
    );

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services,
        runtime: Handle::current(),
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Riddle Ascent")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
