use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "splitter",
    about = "Snap windows to screen halves and quarters, then fill the other side"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run with a specific config file
    Launch {
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Check for accessibility permission, asking for it if missing
    CheckAccessibility,
}

#[cfg(target_os = "macos")]
fn run(command: Option<Command>) -> anyhow::Result<()> {
    match command {
        None => splitter::run_app(None),
        Some(Command::Launch { config }) => splitter::run_app(config),
        Some(Command::CheckAccessibility) => splitter::check_accessibility(),
    }
}

#[cfg(not(target_os = "macos"))]
fn run(_command: Option<Command>) -> anyhow::Result<()> {
    anyhow::bail!("splitter only runs on macOS")
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
