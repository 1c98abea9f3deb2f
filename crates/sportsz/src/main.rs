//! `sportsz` - CLI for the sportsz library
//!
//! Each subcommand plays the part of one form or button: it opens the local
//! store, runs a single operation and prints the result.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use sportsz::athletes::{AthleteFilter, NewAthlete};
use sportsz::chart::{self, NO_DATA};
use sportsz::history::Insight;
use sportsz::cli::{
    AppCommand, AskCommand, AthletesCommand, Cli, Command, CommunityCommand, ConfigCommand, DreamCommand,
    EligibilityCommand, ExportCommand, HistoryCommand, OutputFormat, QuoteCommand,
    RegisterCommand, ResetCommand, TimerCommand, VideoCommand,
};
use sportsz::notify::{send_practice_reminder, ConsoleNotifier};
use sportsz::storage::CollectionKey;
use sportsz::timer::{finish_run, manual_speed, to_kmh, RunTimer};
use sportsz::videos::NewVideo;
use sportsz::{coach, eligibility, export, init_logging, Config, Sportsz};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match cli.command {
        Command::Config(cmd) => handle_config(cli.config, cmd),
        Command::App(cmd) => {
            let config = Config::load_from(cli.config)?;
            let app = Sportsz::open(&config).context("failed to open the SportsZ store")?;
            run(&app, cmd).await
        }
    }
}

async fn run(app: &Sportsz, command: AppCommand) -> anyhow::Result<()> {
    match command {
        AppCommand::Register(cmd) => handle_register(app, cmd),
        AppCommand::Athletes(cmd) => handle_athletes(app, &cmd),
        AppCommand::Timer(cmd) => handle_timer(app, &cmd).await,
        AppCommand::Speed(cmd) => {
            let record = manual_speed(&app.history(), cmd.distance, cmd.seconds)?;
            let speed = record.speed().unwrap_or_default();
            println!("Speed: {speed:.2} m/s ({:.2} km/h)", to_kmh(speed));
            Ok(())
        }
        AppCommand::History(cmd) => handle_history(app, &cmd),
        AppCommand::Insight => {
            handle_insight(app);
            Ok(())
        }
        AppCommand::Export(cmd) => handle_export(app, cmd),
        AppCommand::Video(cmd) => handle_video(app, cmd).await,
        AppCommand::Community(cmd) => handle_community(app, cmd),
        AppCommand::Dream(cmd) => handle_dream(app, cmd),
        AppCommand::Quote(cmd) => handle_quote(app, cmd),
        AppCommand::Eligibility(cmd) => {
            handle_eligibility(&cmd);
            Ok(())
        }
        AppCommand::Ask(cmd) => {
            handle_ask(&cmd);
            Ok(())
        }
        AppCommand::Remind => {
            let notifier = ConsoleNotifier::new(app.config().notifications.permission);
            if !send_practice_reminder(&notifier).await? {
                println!("Reminder not shown.");
            }
            Ok(())
        }
        AppCommand::Reset(cmd) => handle_reset(app, &cmd),
        AppCommand::Status(cmd) => handle_status(app, cmd.json),
    }
}

fn handle_register(app: &Sportsz, cmd: RegisterCommand) -> anyhow::Result<()> {
    let profile = app.athletes().register(NewAthlete {
        name: cmd.name,
        age: cmd.age,
        gender: cmd.gender,
        location: cmd.location,
        sport: cmd.sport,
        consent: cmd.consent,
    })?;
    println!("Registered {} ({})", profile.name, profile.id);
    if let Some(info) = eligibility::lookup(&profile.sport) {
        if !info.allows(profile.age) {
            println!(
                "Note: structured {} training usually starts at {}.",
                info.sport, info.min_age
            );
        }
    }
    Ok(())
}

fn handle_athletes(app: &Sportsz, cmd: &AthletesCommand) -> anyhow::Result<()> {
    let athletes = app.athletes().filter(&AthleteFilter {
        name: cmd.name.clone(),
        sport: cmd.sport.clone(),
    });

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&athletes)?),
        OutputFormat::Table => {
            if athletes.is_empty() {
                println!("No athletes found.");
                return Ok(());
            }
            println!("{:<10} {:<20} {:>4} {:<12} {:<15}", "ID", "NAME", "AGE", "SPORT", "LOCATION");
            for a in &athletes {
                println!(
                    "{:<10} {:<20} {:>4} {:<12} {:<15}",
                    a.id, a.name, a.age, a.sport, a.location
                );
            }
        }
    }
    Ok(())
}

async fn handle_timer(app: &Sportsz, cmd: &TimerCommand) -> anyhow::Result<()> {
    let mut timer = RunTimer::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(50));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("Timer running. Press Enter to stop.");
    timer.start();
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(elapsed) = timer.elapsed() {
                    eprint!("\r{:>8.2} s", elapsed.as_secs_f64());
                }
            }
            line = lines.next_line() => {
                line?;
                break;
            }
        }
    }
    let elapsed = timer.stop().unwrap_or_default();
    eprintln!();

    println!("Time: {:.2} s", elapsed.as_secs_f64());
    match finish_run(&app.history(), cmd.distance, elapsed)? {
        Some(record) => {
            let speed = record.speed().unwrap_or_default();
            println!("Speed: {speed:.2} m/s ({:.2} km/h)", to_kmh(speed));
        }
        None => println!("No distance given; run not saved."),
    }
    Ok(())
}

fn handle_history(app: &Sportsz, cmd: &HistoryCommand) -> anyhow::Result<()> {
    let analytics = &app.config().analytics;
    let window = cmd.window.unwrap_or(analytics.chart_window);
    let history = app.history();

    if cmd.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&history.entries())?);
        return Ok(());
    }

    let summary = history.summary(analytics.badge_count);
    println!("History records: {}", summary.total);
    if !summary.badges.is_empty() {
        println!("{}", summary.badges.join("  "));
    }
    let series = history.recent_series(window);
    println!("{}", chart::sparkline(&series).as_deref().unwrap_or(NO_DATA));
    Ok(())
}

fn handle_insight(app: &Sportsz) {
    match app.history().insight() {
        Insight::NoHistory => println!("No insights yet"),
        Insight::NoSpeedData => println!("No speed data yet"),
        Insight::TopSpeed(speed) => println!(
            "Top 10% speed: {speed:.2} m/s ({:.2} km/h)",
            to_kmh(speed)
        ),
    }
}

fn handle_export(app: &Sportsz, cmd: ExportCommand) -> anyhow::Result<()> {
    let (kind, csv, output) = match cmd {
        ExportCommand::History { output } => {
            let Some(csv) = app.export_history() else {
                println!("No history to export");
                return Ok(());
            };
            ("history", csv, output)
        }
        ExportCommand::Report { output } => ("report", app.export_report(), output),
    };

    let path = output.unwrap_or_else(|| {
        PathBuf::from(export::default_file_name(kind, Utc::now().timestamp_millis()))
    });
    std::fs::write(&path, csv).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Exported {kind} to {}", path.display());
    Ok(())
}

async fn handle_video(app: &Sportsz, cmd: VideoCommand) -> anyhow::Result<()> {
    let videos = app.videos();
    match cmd {
        VideoCommand::Upload { path, duration } => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let asset = videos.upload(NewVideo::from_bytes(file_name(&path), &bytes, duration))?;
            println!(
                "Uploaded {} ({} bytes, {:.1} s) as {}",
                asset.filename, asset.byte_size, asset.duration_seconds, asset.id
            );
        }
        VideoCommand::List { format } => {
            let feed = videos.feed();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&feed)?),
                OutputFormat::Table => {
                    if feed.is_empty() {
                        println!("No videos uploaded.");
                    }
                    for v in &feed {
                        println!(
                            "{:<10} {:<30} {:>10} B {:>6.1} s  {}",
                            v.id,
                            v.filename,
                            v.byte_size,
                            v.duration_seconds,
                            v.created_at.format("%Y-%m-%d %H:%M")
                        );
                    }
                }
            }
        }
        VideoCommand::Delete { id } => {
            if videos.remove(&id)? {
                println!("Deleted {id}");
            } else {
                println!("No video with id {id}");
            }
        }
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn handle_community(app: &Sportsz, cmd: CommunityCommand) -> anyhow::Result<()> {
    let community = app.community();
    match cmd {
        CommunityCommand::Post { author, title } => {
            let post = community.post(&author, &title)?;
            println!("Posted \"{}\" ({})", post.title, post.id);
        }
        CommunityCommand::Feed => {
            let feed = community.feed();
            if feed.is_empty() {
                println!("No posts yet.");
            }
            for post in &feed {
                println!(
                    "[{}] {}: {}  ({})",
                    post.initial(),
                    post.author_name,
                    post.title,
                    post.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }
    Ok(())
}

fn handle_dream(app: &Sportsz, cmd: DreamCommand) -> anyhow::Result<()> {
    let board = app.dream();
    let dream = match cmd {
        DreamCommand::Show => board.load(),
        DreamCommand::Set {
            goal,
            progress: Some(progress),
        } => board.save(&goal, progress)?,
        DreamCommand::Set {
            goal,
            progress: None,
        } => board.set_goal(&goal)?,
        DreamCommand::Progress { percent } => board.set_progress(percent)?,
    };

    println!(
        "{}",
        dream.headline().as_deref().unwrap_or("No dream set yet.")
    );
    println!("Progress: {}%", dream.progress_percent);
    if dream.is_complete() {
        println!("🎉 Dream achieved!");
    }
    if let Some(quote) = app.quotes().random() {
        println!("\"{quote}\"");
    }
    Ok(())
}

fn handle_quote(app: &Sportsz, cmd: QuoteCommand) -> anyhow::Result<()> {
    let quotes = app.quotes();
    if let Some(text) = cmd.add {
        quotes.add(&text)?;
        println!("Quote added.");
    } else if let Some(quote) = quotes.random() {
        println!("{quote}");
    }
    Ok(())
}

fn handle_eligibility(cmd: &EligibilityCommand) {
    let Some(sport) = &cmd.sport else {
        for info in &eligibility::TABLE {
            println!("{:<12} min age {:>2}  {}", info.sport, info.min_age, info.note);
        }
        return;
    };
    match eligibility::lookup(sport) {
        Some(info) => {
            println!("Min Age: {}", info.min_age);
            println!("{}", info.note);
        }
        None => println!("No info yet."),
    }
}

fn handle_ask(cmd: &AskCommand) {
    if let Some(reply) = coach::reply(&cmd.question.join(" ")) {
        println!("{reply}");
    }
}

fn handle_reset(app: &Sportsz, cmd: &ResetCommand) -> anyhow::Result<()> {
    let key = CollectionKey::from(cmd.collection);
    if !cmd.yes {
        println!("This will delete everything in {key}.");
        println!("Use --yes to confirm.");
        return Ok(());
    }
    if app.reset(key)? {
        println!("Cleared {key}.");
    } else {
        println!("{key} was already empty.");
    }
    Ok(())
}

fn handle_status(app: &Sportsz, json: bool) -> anyhow::Result<()> {
    let status = app.status()?;
    if json {
        let collections: serde_json::Map<String, serde_json::Value> = status
            .collections
            .iter()
            .map(|c| (c.key.to_string(), c.records.into()))
            .collect();
        let value = serde_json::json!({
            "location": status.storage.location,
            "keys": status.storage.collections,
            "total_bytes": status.storage.total_bytes,
            "collections": collections,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("sportsz status");
        println!("--------------");
        println!("Storage:       {}", status.storage.location);
        println!("Size:          {} bytes", status.storage.total_bytes);
        println!();
        for c in &status.collections {
            println!("{:<20} {:>6}", c.key, c.records);
        }
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print_config(&config);
            }
        }
        ConfigCommand::Path => {
            println!("{}", config_path.unwrap_or_else(Config::default_config_path).display());
        }
        ConfigCommand::Validate { file } => {
            let path = validation_target(file, config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

/// `--file` wins over `-c`, which wins over the default location.
fn validation_target(file: Option<PathBuf>, config_path: Option<PathBuf>) -> PathBuf {
    file.or(config_path)
        .unwrap_or_else(Config::default_config_path)
}

fn print_config(config: &Config) {
    println!("Current Configuration");
    println!("=====================");
    println!();
    println!("[Storage]");
    println!("  Backend:            {:?}", config.storage.backend);
    println!("  Database path:      {}", config.database_path().display());
    println!();
    println!("[Analytics]");
    println!("  Chart window:       {}", config.analytics.chart_window);
    println!("  Badge count:        {}", config.analytics.badge_count);
    println!();
    println!("[Video]");
    println!(
        "  Min duration (s):   {}",
        config.video.min_duration_seconds
    );
    println!();
    println!("[Notifications]");
    println!("  Permission:         {}", config.notifications.permission);
}
