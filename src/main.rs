//! xstatus - status payload decoder CLI
//!
//! Main entry point for the xstatus command-line tool.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{debug, warn};

use xstatus::logging::{OperationGuard, init_cli_logging};
use xstatus::mentions::set_case_sensitive_screen_names;
use xstatus::*;

/// Longest slice of a bad payload echoed back in an error message.
const RAW_EXCERPT_CHARS: usize = 160;

/// Settings resolved from config file, environment and flags.
struct Session {
    config: Config,
    config_path: Option<PathBuf>,
    format: OutputFormat,
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("{}", render_error(&err));
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let session = load_session(cli)?;

    match &cli.command {
        Commands::Parse(args) => cmd_parse(&session, args),
        Commands::Mentions(args) => cmd_mentions(&session, args),
        Commands::Display(args) => cmd_display(&session, args),
        Commands::Config(args) => cmd_config(&session, args),
        Commands::Completions(args) => {
            cmd_completions(args);
            Ok(())
        }
    }
}

fn load_session(cli: &Cli) -> Result<Session> {
    let config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from_file(path)?.unwrap_or_default();
            config.apply_env_overrides();
            config
        }
        None => Config::load(),
    };

    if !config.output.colors {
        colored::control::set_override(false);
    }
    let quiet = cli.quiet || config.output.quiet;
    init_cli_logging(quiet, cli.verbose, config.output.colors);

    let case_sensitive = cli.case_sensitive || config.mentions.case_sensitive_screen_names;
    set_case_sensitive_screen_names(case_sensitive);

    let format = match cli.format {
        Some(format) => format,
        None => config.output.format.parse().unwrap_or_else(|_| {
            warn!(format = %config.output.format, "Unknown output format in config; using text");
            OutputFormat::Text
        }),
    };

    Ok(Session {
        config_path: cli.config.clone().or_else(Config::user_config_path),
        config,
        format,
        quiet,
    })
}

fn read_input(args: &InputArgs) -> Result<String> {
    if args.is_stdin() {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read payload from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(&args.input)
            .with_context(|| format!("Failed to read {}", args.input.display()))
    }
}

fn load_statuses(session: &Session, args: &InputArgs) -> Result<Vec<Status>> {
    let payload = read_input(args)?;
    let parser = StatusParser::from_config(&session.config.parser);
    let guard = OperationGuard::new(if args.search { "parse_search" } else { "parse_timeline" });

    let parsed = if args.search {
        parser.parse_search(&payload)
    } else {
        parser.parse_timeline(&payload)
    };

    match parsed {
        Ok(statuses) => {
            guard.complete(statuses.len());
            Ok(statuses)
        }
        Err(err) => {
            guard.fail(&err);
            Err(err.into())
        }
    }
}

fn print_json<T: Serialize>(format: OutputFormat, value: &T) -> Result<()> {
    let out = if format == OutputFormat::JsonPretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn print_summary(session: &Session, count: usize) {
    if !session.quiet {
        println!("{} statuses\n", count.to_string().cyan());
    }
}

fn cmd_parse(session: &Session, args: &InputArgs) -> Result<()> {
    let statuses = load_statuses(session, args)?;

    if session.format != OutputFormat::Text {
        return print_json(session.format, &statuses);
    }

    print_summary(session, statuses.len());
    for (i, status) in statuses.iter().enumerate() {
        print_status(i + 1, status);
    }
    Ok(())
}

fn print_status(num: usize, status: &Status) {
    let author = status
        .user()
        .map_or_else(|| "(unknown author)".dimmed(), |u| u.to_string().bold());
    println!(
        "{}. {} {} {}",
        num.to_string().dimmed(),
        format_short_id(&status.id().to_string()).dimmed(),
        author,
        status
            .created_at()
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .dimmed()
    );
    println!("   {}", status.text());

    let mut details = Vec::new();
    if let Some(original) = status.original() {
        details.push(format!("{} {}", "retweet of".green(), original.id()));
    } else if let Some(reply_to) = status.in_reply_to_status_id() {
        details.push(format!("{} {}", "reply to".yellow(), reply_to));
    }
    details.push(format!(
        "retweets: {}",
        format_retweet_count(status.retweet_count())
    ));
    if let Some(location) = status.location() {
        details.push(format!("location: {location}"));
    }
    if status.is_sensitive() {
        details.push("sensitive".red().to_string());
    }
    println!("   {}", details.join(" | ").dimmed());

    let entities: Vec<String> = EntityType::ALL
        .iter()
        .filter_map(|&kind| {
            let list = status.tweet_entities(kind)?;
            (!list.is_empty()).then(|| {
                let forms: Vec<String> = list.iter().map(TweetEntity::display_form).collect();
                format!("{kind}: {}", forms.join(", "))
            })
        })
        .collect();
    if !entities.is_empty() {
        println!("   {}", entities.join(" | ").dimmed());
    }
    println!("   {} {}", "via".dimmed(), status.source().dimmed());
    println!();
}

#[derive(Serialize)]
struct MentionsRow<'a> {
    id: &'a StatusId,
    mentions: Vec<String>,
}

fn cmd_mentions(session: &Session, args: &InputArgs) -> Result<()> {
    let statuses = load_statuses(session, args)?;
    let rows: Vec<MentionsRow<'_>> = statuses
        .iter()
        .map(|status| MentionsRow {
            id: status.id(),
            mentions: status.mentions(),
        })
        .collect();

    if session.format != OutputFormat::Text {
        return print_json(session.format, &rows);
    }

    print_summary(session, rows.len());
    for row in &rows {
        let names: Vec<String> = row.mentions.iter().map(|m| format!("@{m}")).collect();
        let names = if names.is_empty() {
            "-".dimmed().to_string()
        } else {
            names.join(" ")
        };
        println!("{} {}", row.id.to_string().dimmed(), names);
    }
    Ok(())
}

#[derive(Serialize)]
struct DisplayRow<'a> {
    id: &'a StatusId,
    text: String,
}

fn cmd_display(session: &Session, args: &InputArgs) -> Result<()> {
    let statuses = load_statuses(session, args)?;
    let rows: Vec<DisplayRow<'_>> = statuses
        .iter()
        .map(|status| DisplayRow {
            id: status.id(),
            text: status.display_text(),
        })
        .collect();

    if session.format != OutputFormat::Text {
        return print_json(session.format, &rows);
    }

    print_summary(session, rows.len());
    for row in &rows {
        println!("{}", row.id.to_string().dimmed());
        println!("   {}", row.text);
        println!("{}", "─".repeat(CONTENT_DIVIDER_WIDTH).dimmed());
    }
    Ok(())
}

fn cmd_config(session: &Session, args: &ConfigArgs) -> Result<()> {
    let path = session
        .config_path
        .clone()
        .context("Could not determine config directory; pass --config <path>")?;

    if args.init {
        if path.exists() {
            println!("Config already exists at {}", path.display().to_string().bold());
        } else {
            Config::default().save_to(&path)?;
            println!("Wrote default config to {}", path.display().to_string().bold());
        }
    }

    if let Some(assignment) = &args.set {
        let (key, value) = assignment
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .with_context(|| format!("Expected key=value, got '{assignment}'"))?;

        if !VALID_CONFIG_KEYS.contains(&key) {
            anyhow::bail!(format_unknown_value_error("config key", key, VALID_CONFIG_KEYS));
        }

        let mut config = Config::load_from_file(&path)?.unwrap_or_default();
        config.set_value(key, value)?;
        config.save_to(&path)?;
        debug!(key, value, "Config value updated");
        println!("Set {} = {}", key.cyan(), value);
    }

    if args.show || (!args.init && args.set.is_none()) {
        if session.format == OutputFormat::Text {
            println!("{}", "Current Configuration".bold().cyan());
            println!("  File: {}", path.display());
            println!();
            print!("{}", toml::to_string_pretty(&session.config)?);
        } else {
            print_json(session.format, &session.config)?;
        }
    }
    Ok(())
}

fn cmd_completions(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "xstatus", &mut io::stdout());
}

fn render_error(err: &anyhow::Error) -> String {
    let Some(xerr) = err.downcast_ref::<XstatusError>() else {
        let title = err.to_string();
        // Already rendered, e.g. an unknown config key.
        if title.contains('✗') {
            return title;
        }
        let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        return format_error(&title, &causes.join(": "), &[]);
    };

    let excerpt = xerr.raw_text().map(|raw| {
        let mut excerpt: String = raw.chars().take(RAW_EXCERPT_CHARS).collect();
        if raw.chars().count() > RAW_EXCERPT_CHARS {
            excerpt.push_str("...");
        }
        format!("Payload: {excerpt}")
    });
    let suggestions: Vec<&str> = xerr.suggestion().into_iter().collect();
    format_error(
        &xerr.to_string(),
        excerpt.as_deref().unwrap_or_default(),
        &suggestions,
    )
}
