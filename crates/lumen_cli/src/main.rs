//! Lumen CLI
//!
//! Drives a theme toggle against a file-backed preference slot:
//!
//! - `status` shows the stored preference, ambient and effective schemes
//! - `click` / `double-click` / `reset` apply one gesture and persist it
//! - `simulate` replays a gesture script and steps the icon animation
//! - `render` prints the toggle (or the whole header nav) as HTML

mod session;
mod simulate;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lumen_core::Gesture;
use lumen_theme::ThemePreference;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::session::Session;

/// Theme toggle driver
#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "Drive the Lumen theme toggle from the command line")]
#[command(version)]
struct Args {
    /// Toggle configuration file
    #[arg(short, long, default_value = "lumen.toml")]
    config: PathBuf,

    /// File standing in for client-local storage
    #[arg(long, default_value = ".lumen/storage.toml")]
    store: PathBuf,

    /// Treat durable storage as unavailable
    #[arg(long)]
    no_storage: bool,

    /// Ambient color scheme
    #[arg(long, value_enum, default_value_t = AmbientArg::System)]
    ambient: AmbientArg,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AmbientArg {
    Light,
    Dark,
    /// Read LUMEN_COLOR_SCHEME / GTK_THEME
    System,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GestureArg {
    Click,
    #[value(alias = "double-click")]
    Double,
}

impl From<GestureArg> for Gesture {
    fn from(arg: GestureArg) -> Self {
        match arg {
            GestureArg::Click => Gesture::Click,
            GestureArg::Double => Gesture::DoubleClick,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show preference, ambient and effective theme
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Single click: flip the theme
    Click,

    /// Double click: return to auto
    DoubleClick,

    /// Clear the stored preference
    Reset,

    /// Replay gestures and step the animation
    Simulate {
        /// Comma-separated gestures
        #[arg(short, long, value_enum, value_delimiter = ',', default_value = "click")]
        gestures: Vec<GestureArg>,

        /// Maximum frames to run after each gesture
        #[arg(long, default_value = "120")]
        frames: u32,

        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Print every frame instead of a summary per gesture
        #[arg(long)]
        trace: bool,
    },

    /// Print the toggle markup
    Render {
        /// Instance label, used in the mask id
        #[arg(short, long)]
        label: Option<String>,

        /// Header document (CMS JSON) to render the full nav
        #[arg(long)]
        nav: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let session = Session::open(&args)?;

    match args.command {
        Commands::Status { json } => cmd_status(&session, json),
        Commands::Click => cmd_gesture(&session, Gesture::Click),
        Commands::DoubleClick => cmd_gesture(&session, Gesture::DoubleClick),
        Commands::Reset => cmd_reset(&session),
        Commands::Simulate {
            gestures,
            frames,
            fps,
            trace,
        } => {
            let gestures: Vec<Gesture> = gestures.into_iter().map(Gesture::from).collect();
            simulate::run(&session, &gestures, frames, fps, trace)
        }
        Commands::Render { label, nav } => cmd_render(&session, label.as_deref(), nav),
    }
}

fn cmd_status(session: &Session, json: bool) -> Result<()> {
    let ctx = &session.ctx;
    let preference = ctx.preference();
    let ambient = ctx.ambient();
    let effective = ctx.effective_theme();

    if json {
        let status = serde_json::json!({
            "preference": preference.as_str(),
            "stored": preference.stored_value(),
            "ambient": ambient.as_str(),
            "effective": effective.as_str(),
            "degraded": ctx.store().is_degraded(),
            "store": session.store_path.as_ref().map(|p| p.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("preference: {}", preference);
    println!("ambient:    {}", ambient);
    println!("effective:  {}", effective);
    match &session.store_path {
        Some(path) if !ctx.store().is_degraded() => println!("store:      {}", path.display()),
        _ => println!("store:      (in memory)"),
    }
    Ok(())
}

fn cmd_gesture(session: &Session, gesture: Gesture) -> Result<()> {
    let toggle = session.mount(None);
    let mode = toggle.handle_gesture(gesture);
    tracing::info!("{:?} -> {:?}", gesture, mode);
    println!(
        "{} (effective {})",
        session.ctx.preference(),
        toggle.effective_theme()
    );
    Ok(())
}

fn cmd_reset(session: &Session) -> Result<()> {
    session.ctx.set_preference(ThemePreference::Auto);
    println!("auto (effective {})", session.ctx.effective_theme());
    Ok(())
}

fn cmd_render(session: &Session, label: Option<&str>, nav: Option<PathBuf>) -> Result<()> {
    let toggle = session.mount(label);
    let Some(path) = nav else {
        println!("{}", toggle.render());
        return Ok(());
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read header document {}", path.display()))?;
    let nav = lumen_theme::HeaderNav::from_json(&content)
        .with_context(|| format!("Invalid header document {}", path.display()))?;
    println!("{}", nav.render(&toggle));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simulate_gestures() {
        let args = Args::try_parse_from([
            "lumen",
            "--ambient",
            "light",
            "simulate",
            "--gestures",
            "click,click,double",
            "--frames",
            "30",
        ])
        .unwrap();

        assert_eq!(args.ambient, AmbientArg::Light);
        match args.command {
            Commands::Simulate {
                gestures, frames, ..
            } => {
                assert_eq!(
                    gestures,
                    vec![GestureArg::Click, GestureArg::Click, GestureArg::Double]
                );
                assert_eq!(frames, 30);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["lumen", "status"]).unwrap();
        assert_eq!(args.config, PathBuf::from("lumen.toml"));
        assert_eq!(args.store, PathBuf::from(".lumen/storage.toml"));
        assert_eq!(args.ambient, AmbientArg::System);
        assert!(!args.no_storage);
    }
}
