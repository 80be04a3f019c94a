use std::io::Write;

use stance_core::session::SessionCommand;
use stance_types::{PRESETS, SessionKind, preset_for_seconds};

use crate::CliContext;

pub fn show_status(ctx: &CliContext) {
    let snap = ctx.orchestrator.snapshot();

    println!("Session:  {} (#{})", snap.session.label(), snap.settings.session_count);
    match snap.session {
        SessionKind::Sitting => {
            println!(
                "Timer:    {} [{}] of {}",
                snap.display_time,
                snap.countdown_status.label(),
                format_duration(snap.duration_secs),
            );
            println!("Progress: {:.0}%", snap.progress);
        }
        SessionKind::Standing => {
            println!(
                "Elapsed:  {} [{}]",
                snap.display_time,
                snap.stopwatch_status.label()
            );
        }
    }
    if snap.alert_visible {
        println!("Alert:    time to switch (dismiss to continue)");
    }

    let speech = if !snap.speech_supported {
        "unavailable".to_string()
    } else if !snap.settings.speech_enabled {
        "off".to_string()
    } else {
        let voice = snap.settings.selected_voice.as_deref().unwrap_or("default");
        format!(
            "on (voice {}, rate {:.1}, pitch {:.1}, volume {:.1})",
            voice,
            snap.settings.speech_rate,
            snap.settings.speech_pitch,
            snap.settings.speech_volume
        )
    };
    println!("Speech:   {}", speech);
    if let Some(err) = snap.speech_error {
        println!("          last error: {}", err);
    }
}

pub fn start(ctx: &CliContext) {
    ctx.orchestrator.send(SessionCommand::Start);
    println!("Started.");
}

pub fn pause(ctx: &CliContext) {
    ctx.orchestrator.send(SessionCommand::Pause);
    println!("Paused.");
}

pub fn stop(ctx: &CliContext) {
    ctx.orchestrator.send(SessionCommand::Stop);
    println!("Stopped and reset.");
}

pub fn reset(ctx: &CliContext) {
    ctx.orchestrator.send(SessionCommand::Reset);
    println!("Reset.");
}

pub fn dismiss(ctx: &CliContext) {
    if !ctx.orchestrator.snapshot().alert_visible {
        println!("No alert to dismiss.");
        return;
    }
    ctx.orchestrator.send(SessionCommand::DismissAlert);
    println!("Dismissed; session switched.");
}

pub fn switch(ctx: &CliContext) {
    ctx.orchestrator.send(SessionCommand::SwitchMode);
    println!("Session switched.");
}

pub fn list_presets(ctx: &CliContext) {
    let current = ctx.orchestrator.snapshot().settings.timer_duration_secs;
    for preset in PRESETS {
        let marker = if preset.seconds == current { " *" } else { "" };
        println!("{}{}", preset.label, marker);
    }
}

pub fn select_preset(ctx: &CliContext, minutes: u32) {
    let Some(seconds) = preset_seconds(minutes) else {
        let options: Vec<_> = PRESETS.iter().map(|p| (p.seconds / 60).to_string()).collect();
        println!("No {minutes} minute preset. Options: {}", options.join(", "));
        return;
    };
    ctx.orchestrator.send(SessionCommand::SelectPreset { seconds });
    println!("Sitting duration set to {} minutes.", minutes);
}

/// Minutes → preset seconds. None for non-preset values, including
/// minute counts too large to express in seconds at all.
fn preset_seconds(minutes: u32) -> Option<u32> {
    let seconds = minutes.checked_mul(60)?;
    preset_for_seconds(seconds).map(|p| p.seconds)
}

pub fn set_duration(ctx: &CliContext, seconds: u32) {
    if seconds == 0 {
        println!("Duration must be at least 1 second.");
        return;
    }
    ctx.orchestrator.send(SessionCommand::SetDuration { seconds });
    println!("Sitting duration set to {}.", format_duration(seconds));
}

pub fn set_speech(ctx: &CliContext, enabled: bool) {
    if enabled && !ctx.orchestrator.snapshot().speech_supported {
        println!("Speech backend unavailable; announcements stay off.");
    }
    ctx.orchestrator.send(SessionCommand::SetSpeechEnabled(enabled));
    println!("Speech {}.", if enabled { "enabled" } else { "disabled" });
}

pub fn list_voices(ctx: &CliContext) {
    ctx.announcer.refresh_voices();
    let voices = ctx.announcer.voices();
    if voices.is_empty() {
        println!("No voices available.");
        return;
    }

    let selected = ctx.orchestrator.snapshot().settings.selected_voice;
    println!("{:<20} {:<10} Name", "Id", "Language");
    println!("{}", "-".repeat(50));
    for voice in &voices {
        let marker = if selected.as_deref() == Some(&voice.id) { " *" } else { "" };
        println!("{:<20} {:<10} {}{}", voice.id, voice.language, voice.name, marker);
    }
    println!("\nTotal: {} voices", voices.len());
}

pub fn select_voice(ctx: &CliContext, id: &str) {
    let voice = if id == "default" {
        None
    } else {
        if !ctx.announcer.voices().iter().any(|v| v.id == id) {
            println!("Unknown voice '{}'; the default will be used until it appears.", id);
        }
        Some(id.to_string())
    };
    ctx.orchestrator.send(SessionCommand::SelectVoice(voice));
    println!("Voice set to {}.", id);
}

pub fn set_speech_params(
    ctx: &CliContext,
    rate: Option<f32>,
    pitch: Option<f32>,
    volume: Option<f32>,
) {
    ctx.orchestrator
        .send(SessionCommand::SetSpeechParams { rate, pitch, volume });
    println!("Speech parameters updated.");
}

pub fn exit(ctx: &CliContext) {
    ctx.orchestrator.shutdown();
    write!(std::io::stdout(), "quitting...").ok();
    std::io::stdout().flush().ok();
}

fn format_duration(seconds: u32) -> String {
    if seconds % 60 == 0 {
        format!("{} minutes", seconds / 60)
    } else {
        format!("{} seconds", seconds)
    }
}
