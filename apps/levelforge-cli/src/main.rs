use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec3;
use levelforge_author::{EditorConfig, LevelEditor};
use levelforge_common::{ActorId, EntityKind, Transform};
use levelforge_input::{ActorPose, ButtonState, EditorCommand, FrameInput, MouseKeyboardState};
use levelforge_kernel::{BoundsRaycaster, Level};
use levelforge_tools::LevelInspector;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const FRAME: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(name = "levelforge-cli", about = "CLI tool for levelforge operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run a scripted edit session: drag, link, then undo both
    Demo {
        /// Number of extra crates to place
        #[arg(short, long, default_value = "3")]
        crates: usize,
        /// Editor config file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Save the edited level here
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Load a level file and list its contents
    Inspect {
        path: PathBuf,
    },
    /// Print the effective editor config as YAML
    Config {
        /// Config file to validate and print; defaults when omitted
        path: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Info => {
            println!("levelforge-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", levelforge_common::crate_info());
            println!("input: {}", levelforge_input::crate_info());
            println!("author: {}", levelforge_author::crate_info());
            println!("persist: {}", levelforge_persist::crate_info());
            println!("tools: {}", levelforge_tools::crate_info());
        }
        Commands::Demo {
            crates,
            config,
            save,
        } => {
            let config = load_config(config.as_ref())?;
            let mut level = run_demo(config, crates)?;
            if let Some(path) = save {
                let digest = levelforge_persist::save_level(&path, &mut level)
                    .with_context(|| format!("saving {}", path.display()))?;
                println!("Saved {} (sha256 {digest})", path.display());
            }
        }
        Commands::Inspect { path } => {
            let level = levelforge_persist::load_level(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            println!("{}", LevelInspector::summary(&level));
            for uid in LevelInspector::list_entities(&level) {
                if let Some(info) = LevelInspector::inspect_entity(&level, uid) {
                    println!("  {info}");
                }
            }
        }
        Commands::Config { path } => {
            let config = load_config(path.as_ref())?;
            print!("{}", config.to_yaml_string()?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let source =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    EditorConfig::from_yaml_str(&source).with_context(|| format!("parsing {}", path.display()))
}

/// Drives the mouse actor through a fixed script against a small level.
struct Script {
    level: Level,
    editor: LevelEditor,
    now: Duration,
}

impl Script {
    fn mouse(&mut self, origin: Vec3, state: MouseKeyboardState) {
        self.now += FRAME;
        let input = FrameInput {
            mouse_keyboard: Some(MouseKeyboardState {
                pose: ActorPose::aiming(origin, Vec3::X),
                ..state
            }),
            delta_seconds: FRAME.as_secs_f32(),
            ..Default::default()
        };
        self.editor
            .process_frame(&mut self.level, &BoundsRaycaster, &input, self.now);
    }

    fn report(&self, step: &str) {
        println!("[{step}] {}", LevelInspector::summary(&self.level));
        let mouse = &LevelInspector::sessions(&self.editor)[ActorId::MouseKeyboard.index()];
        println!("  {mouse}");
    }
}

fn run_demo(config: EditorConfig, crates: usize) -> anyhow::Result<Level> {
    let mut level = Level::with_player_start(Transform::at(Vec3::new(0.0, -5.0, 0.0)));
    let lever = level.spawn(EntityKind::Lever, Transform::at(Vec3::new(0.0, 5.0, 0.0)))?;
    let door = level.spawn(EntityKind::Door, Transform::at(Vec3::new(4.0, 0.0, 0.0)))?;
    for i in 0..crates {
        level.spawn(
            EntityKind::Crate,
            Transform::at(Vec3::new(4.0, 2.0 + 2.0 * i as f32, 0.0)),
        )?;
    }
    let mut script = Script {
        level,
        editor: LevelEditor::new(config),
        now: Duration::ZERO,
    };
    script.report("start");

    let idle = MouseKeyboardState::default();
    script.mouse(Vec3::ZERO, idle);
    script.mouse(
        Vec3::ZERO,
        MouseKeyboardState {
            left_button: ButtonState::press(),
            ..idle
        },
    );
    let lifted = Vec3::new(0.0, 0.0, 1.0);
    script.mouse(
        lifted,
        MouseKeyboardState {
            left_button: ButtonState::hold(),
            ..idle
        },
    );
    script.mouse(
        lifted,
        MouseKeyboardState {
            left_button: ButtonState::release(),
            ..idle
        },
    );
    script.report("dragged door");

    let link = EditorCommand::EnterLinkMode { entity: lever };
    script.editor.dispatch(&mut script.level, link);
    script.mouse(lifted, idle);
    script.mouse(
        lifted,
        MouseKeyboardState {
            space_pressed: true,
            ..idle
        },
    );
    script.report("linked lever");
    for segment in LevelInspector::link_segments(&script.level) {
        println!(
            "  link {} -> {} ({:?} -> {:?})",
            segment.activator, segment.activatable, segment.from, segment.to
        );
    }

    let undo = EditorCommand::Undo {
        actor: ActorId::MouseKeyboard,
    };
    script.editor.dispatch(&mut script.level, undo);
    script.editor.dispatch(&mut script.level, undo);
    script.report("undone");
    if let Some(info) = LevelInspector::inspect_entity(&script.level, door) {
        println!("  {info}");
    }

    Ok(script.level)
}
