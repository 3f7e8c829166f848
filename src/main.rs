//! CLI entry point for termtale
//!
//! This provides a command-line interface for playing and checking stories.

use std::path::{Path, PathBuf};
use std::process;

use termtale::cli::play::PlayOptions;
use termtale::lint::{self, LintLevel};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "play" | "check" => {
            let Some(path) = args.get(2) else {
                eprintln!("Error: Missing story file path");
                eprintln!();
                print_usage();
                process::exit(1);
            };
            let file_path = PathBuf::from(path);
            if command == "check" {
                run_check(file_path).await;
            } else {
                match parse_play_options(&args[3..]) {
                    Ok(options) => run_play(file_path, options).await,
                    Err(message) => {
                        eprintln!("Error: {message}");
                        eprintln!();
                        print_usage();
                        process::exit(1);
                    }
                }
            }
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Error: Unknown command '{}'", command);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    println!("termtale - Scripted terminal narrative player");
    println!();
    println!("USAGE:");
    println!("    termtale play <story.json> [--debug] [--speed <ms>]");
    println!("    termtale check <story.json>");
    println!();
    println!("COMMANDS:");
    println!("    play <file>     Play a story in the terminal");
    println!("    check <file>    Lint a story and report issues");
    println!("    --help, -h      Show this help message");
    println!();
    println!("OPTIONS:");
    println!("    --debug         Log interpreter activity to stderr");
    println!("    --speed <ms>    Typewriter delay per character for lines without a speed");
}

fn parse_play_options(args: &[String]) -> Result<PlayOptions, String> {
    let mut options = PlayOptions::default();
    let mut args = args.iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--debug" => options.debug = true,
            "--speed" => {
                let value = args.next().ok_or("--speed needs a value")?;
                let speed = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid --speed value '{value}'"))?;
                options.speed = Some(speed);
            }
            other => return Err(format!("unknown option '{other}'")),
        }
    }

    Ok(options)
}

async fn run_play(file_path: PathBuf, options: PlayOptions) {
    if options.debug {
        termtale::cli::logger::init("termtale=trace");
    }

    let story = load_or_exit(&file_path).await;

    if let Err(err) = termtale::cli::play::run_play(story, options).await {
        eprintln!("Error: Player mode failed");
        eprintln!("Reason: {err:#}");
        process::exit(1);
    }
}

async fn run_check(file_path: PathBuf) {
    let story = load_or_exit(&file_path).await;
    let result = lint::lint(&story);

    for issue in &result.issues {
        let state = issue.state.as_deref().unwrap_or("-");
        println!("{}\t{}\t{}\t{}", issue.level, issue.category, state, issue.message);
    }
    println!(
        "{} error(s), {} warning(s), {} info",
        result.count(LintLevel::Error),
        result.count(LintLevel::Warning),
        result.count(LintLevel::Info)
    );

    if result.has_errors() {
        process::exit(1);
    }
}

async fn load_or_exit(file_path: &Path) -> termtale::Story {
    match termtale::parser::load(file_path).await {
        Ok(story) => story,
        Err(err) => {
            eprintln!("Error: Failed to load story '{}'", file_path.display());
            eprintln!("Reason: {err:#}");
            process::exit(1);
        }
    }
}
