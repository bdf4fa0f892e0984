use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::Command;

/// Workspace members, without the `levelforge-` prefix.
const CRATES: [&str; 7] = ["common", "kernel", "input", "author", "persist", "tools", "cli"];

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for levelforge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy and the tests
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates, warnings denied
    Clippy,
    /// Run the tests, optionally for one crate (e.g. `author`)
    Test {
        #[arg(value_parser = clap::builder::PossibleValuesParser::new(CRATES))]
        krate: Option<String>,
    },
    /// Build rustdoc for the workspace
    Doc,
    /// Run the scripted CLI demo, save the level, and inspect the saved file
    Demo {
        #[arg(long, default_value = "target/demo-level.json")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo("fmt", &["fmt", "--all", "--", "--check"])?;
            clippy()?;
            cargo("test", &["test", "--workspace"])?;
        }
        Commands::Fmt => cargo("fmt", &["fmt", "--all", "--", "--check"])?,
        Commands::Clippy => clippy()?,
        Commands::Test { krate: None } => cargo("test", &["test", "--workspace"])?,
        Commands::Test { krate: Some(name) } => {
            let package = format!("levelforge-{name}");
            cargo("test", &["test", "-p", package.as_str()])?;
        }
        Commands::Doc => cargo("doc", &["doc", "--workspace", "--no-deps"])?,
        Commands::Demo { out } => {
            let out = out.to_string_lossy().into_owned();
            cargo(
                "demo",
                &["run", "-q", "-p", "levelforge-cli", "--", "demo", "--save", out.as_str()],
            )?;
            cargo(
                "inspect",
                &["run", "-q", "-p", "levelforge-cli", "--", "inspect", out.as_str()],
            )?;
        }
    }

    Ok(())
}

fn clippy() -> Result<()> {
    cargo(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn cargo(label: &str, args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new(env!("CARGO")).args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {label} failed");
    }
    Ok(())
}
