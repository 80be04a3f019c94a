use clap::{Parser, Subcommand};
use stance_cli::readline;
use stance_cli::{CliContext, commands, logging};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<(), String> {
    logging::init();
    let ctx = CliContext::new();

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx) {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "sit/stand interval timer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current session, timer, and speech state
    Status,
    /// Start or resume the active session's timer
    Start,
    /// Pause the active session's timer
    Pause,
    /// Stop the active session's timer and reset it
    Stop,
    /// Reset the active session's timer
    Reset,
    /// List the selectable sitting durations
    Presets,
    /// Pick a sitting duration preset by minutes
    Preset { minutes: u32 },
    /// Set an arbitrary sitting duration in seconds
    Duration { seconds: u32 },
    /// Turn voice announcements on or off
    Speech {
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },
    /// List the available voices
    Voices,
    /// Pick a voice by id, or "default"
    Voice { id: String },
    /// Set the speech rate (0.1 - 2.0)
    Rate { value: f32 },
    /// Set the speech pitch (0.0 - 2.0)
    Pitch { value: f32 },
    /// Set the speech volume (0.0 - 1.0)
    Volume { value: f32 },
    /// Acknowledge a completion alert and switch sessions
    Dismiss,
    /// Switch sessions immediately
    Switch,
    Exit,
}

fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "stance".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Status) => commands::show_status(ctx),
        Some(Commands::Start) => commands::start(ctx),
        Some(Commands::Pause) => commands::pause(ctx),
        Some(Commands::Stop) => commands::stop(ctx),
        Some(Commands::Reset) => commands::reset(ctx),
        Some(Commands::Presets) => commands::list_presets(ctx),
        Some(Commands::Preset { minutes }) => commands::select_preset(ctx, *minutes),
        Some(Commands::Duration { seconds }) => commands::set_duration(ctx, *seconds),
        Some(Commands::Speech { state }) => commands::set_speech(ctx, state == "on"),
        Some(Commands::Voices) => commands::list_voices(ctx),
        Some(Commands::Voice { id }) => commands::select_voice(ctx, id),
        Some(Commands::Rate { value }) => commands::set_speech_params(ctx, Some(*value), None, None),
        Some(Commands::Pitch { value }) => commands::set_speech_params(ctx, None, Some(*value), None),
        Some(Commands::Volume { value }) => commands::set_speech_params(ctx, None, None, Some(*value)),
        Some(Commands::Dismiss) => commands::dismiss(ctx),
        Some(Commands::Switch) => commands::switch(ctx),
        Some(Commands::Exit) => {
            commands::exit(ctx);
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
