use anyhow::Context;
use deskcore::content::{ContentProcessor, Segment};
use deskcore::player::Player;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum Command {
    Content(PathBuf),
    Excerpt(PathBuf),
    Tabs(PathBuf),
    Tracks(PathBuf),
    Shuffle(PathBuf),
}

#[derive(Debug)]
struct CliArgs {
    command: Command,
    base_url: Option<String>,
    steps: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let Some(args) = parse_args(std::env::args().skip(1).collect())? else {
        print_help();
        return Ok(());
    };

    match &args.command {
        Command::Content(path) | Command::Excerpt(path) | Command::Tabs(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let processor = content_processor(args.base_url.as_deref())?;
            print_content(&processor, &args.command, &raw);
        }
        Command::Tracks(path) => {
            let manifest = deskcore::library::load_manifest(path)?;
            println!("manifest version {}", manifest.version);
            for (idx, track) in manifest.videos.iter().enumerate() {
                let artist = track.artist.as_deref().unwrap_or("-");
                let offset = track.lyric_offset_ms.unwrap_or(0);
                println!("{idx:>3}  {}  {}  [{artist}]  lyrics {offset:+}ms", track.id, track.title);
            }
        }
        Command::Shuffle(path) => {
            let manifest = deskcore::library::load_manifest(path)?;
            let state = deskcore::config::load_state()?;
            let mut player = Player::restore(manifest.videos, state.player, state.settings.history_limit);
            player.is_shuffled = true;
            for _ in 0..args.steps {
                if player.advance().is_none() {
                    break;
                }
                if let Some(track) = player.current_track() {
                    println!("{}  {}", track.id, track.title);
                }
            }
        }
    }

    Ok(())
}

/// An explicit base URL wins; state.json is only read when none is given.
fn content_processor(base_url: Option<&str>) -> anyhow::Result<ContentProcessor> {
    match base_url {
        Some(url) => ContentProcessor::new(url),
        None => ContentProcessor::from_settings(&deskcore::config::load_state()?.settings),
    }
}

fn print_content(processor: &ContentProcessor, command: &Command, raw: &str) {
    match command {
        Command::Excerpt(_) => println!("{}", processor.process_excerpt(raw)),
        Command::Tabs(_) => {
            let rendered = processor.render_content(raw);
            for segment in rendered.segments() {
                match segment {
                    Segment::Html(html) => println!("{html}"),
                    Segment::Tabs(block) => {
                        for (idx, tab) in block.tabs.iter().enumerate() {
                            let marker = if idx == block.initial_tab { "*" } else { " " };
                            println!("{marker} [{}] {}", tab.title, tab.content_html);
                        }
                    }
                }
            }
        }
        _ => println!("{}", processor.process_content(raw)),
    }
}

fn parse_args(args: Vec<String>) -> anyhow::Result<Option<CliArgs>> {
    let mut command = None;
    let mut base_url = None;
    let mut steps = 10;
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => return Ok(None),
            "--base-url" => {
                index += 1;
                let Some(value) = args.get(index) else {
                    anyhow::bail!("--base-url requires a value");
                };
                base_url = Some(value.trim().to_string());
            }
            "--steps" => {
                index += 1;
                let Some(value) = args.get(index) else {
                    anyhow::bail!("--steps requires a count");
                };
                steps = value.parse()?;
            }
            verb @ ("content" | "excerpt" | "tabs" | "tracks" | "shuffle") => {
                index += 1;
                let Some(path) = args.get(index).map(PathBuf::from) else {
                    anyhow::bail!("{verb} requires a file path");
                };
                command = Some(match verb {
                    "content" => Command::Content(path),
                    "excerpt" => Command::Excerpt(path),
                    "tabs" => Command::Tabs(path),
                    "tracks" => Command::Tracks(path),
                    _ => Command::Shuffle(path),
                });
            }
            other => anyhow::bail!("unknown argument {other}"),
        }
        index += 1;
    }

    Ok(command.map(|command| CliArgs {
        command,
        base_url,
        steps,
    }))
}

fn print_help() {
    println!("deskcore");
    println!("  content <file>      Print sanitized post HTML");
    println!("  excerpt <file>      Print plain-text excerpt");
    println!("  tabs <file>         Print post HTML with tab widgets expanded");
    println!("  tracks <manifest>   List tracks in a manifest");
    println!("  shuffle <manifest>  Print a shuffled play order");
    println!("  --base-url url      Origin for relative links (default from state.json)");
    println!("  --steps n           Tracks to print for shuffle (default 10)");
}
