use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;

#[derive(Parser)]
#[command(name = "daybrief", version, about = "Daybrief personal planning CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List today's priority tasks
    Tasks {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Only show tasks from this project
        #[arg(long)]
        project: Option<String>,
    },
    /// List inbox tasks
    Inbox {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show calendar events
    Calendar {
        /// Range to show
        #[arg(value_enum, default_value = "day")]
        range: commands::calendar::Range,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate the morning briefing
    Morning {
        /// Print the compiled prompt without running the model
        #[arg(long)]
        prompt_only: bool,
    },
    /// Generate a plan for the rest of the week
    Week {
        /// Print the compiled prompt without running the model
        #[arg(long)]
        prompt_only: bool,
    },
    /// Generate the weekly review
    Review {
        /// Print the compiled prompt without running the model
        #[arg(long)]
        prompt_only: bool,
    },
    /// Record a daily recap
    Recap {
        /// Date to recap (YYYY-MM-DD, default today)
        #[arg(long, short)]
        date: Option<chrono::NaiveDate>,
        /// Run a guided session with the claude CLI
        #[arg(long)]
        deep: bool,
    },
    /// Print the recap context prompt
    CompileRecap {
        /// Date to compile for (YYYY-MM-DD, default today)
        #[arg(long, short)]
        date: Option<chrono::NaiveDate>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let _logger = init_logging();

    let cli = Cli::parse();
    if let Err(e) = dispatch(cli.command) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn dispatch(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    // The source adapters resolve the async runtime through the current
    // handle, so one is entered before any command runs.
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    match command {
        Commands::Tasks { json, project } => commands::tasks::run_tasks(json, project.as_deref()),
        Commands::Inbox { json } => commands::tasks::run_inbox(json),
        Commands::Calendar { range, json } => commands::calendar::run(range, json),
        Commands::Morning { prompt_only } => commands::workflows::run_morning(prompt_only),
        Commands::Week { prompt_only } => commands::workflows::run_week(prompt_only),
        Commands::Review { prompt_only } => commands::workflows::run_review(prompt_only),
        Commands::Recap { date, deep } => commands::recap::run_recap(date, deep),
        Commands::CompileRecap { date } => commands::recap::run_compile(date),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

fn init_logging() -> Option<flexi_logger::LoggerHandle> {
    // RUST_LOG overrides the default of warnings only.
    flexi_logger::Logger::try_with_env_or_str("warn")
        .and_then(|logger| logger.log_to_stderr().start())
        .map_err(|e| eprintln!("logging setup failed: {e}"))
        .ok()
}
