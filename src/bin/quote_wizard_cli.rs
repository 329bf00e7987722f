use std::{
    env, fs,
    path::{Path, PathBuf},
    process, thread,
};

use chrono::{Local, NaiveDate};
use quote_wizard::{
    cli::{output, TerminalInteraction, WizardResult, WizardRunner},
    fields::descriptor,
    init, AppConfig, FieldStore, QuoteSession, Step, WizardError,
};

fn main() {
    init();

    if let Err(err) = run() {
        output::error(err);
        process::exit(1);
    }
}

struct Options {
    config: Option<PathBuf>,
    today: Option<NaiveDate>,
    positional: Vec<String>,
}

fn parse_options(
    mut args: impl Iterator<Item = String>,
) -> Result<Options, Box<dyn std::error::Error>> {
    let mut options = Options {
        config: None,
        today: None,
        positional: Vec::new(),
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config needs a file path")?;
                options.config = Some(PathBuf::from(path));
            }
            "--today" => {
                let raw = args.next().ok_or("--today needs a YYYY-MM-DD date")?;
                options.today = Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d")?);
            }
            "--plain" => output::set_plain_output(true),
            _ => options.positional.push(arg),
        }
    }
    Ok(options)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let command = args.next().unwrap_or_else(|| "interactive".to_string());
    let options = parse_options(args)?;
    let config = AppConfig::load_or_default(options.config.as_deref())?;
    let today = options.today.unwrap_or_else(|| Local::now().date_naive());

    match command.as_str() {
        "interactive" => run_interactive(config, today),
        "render" => {
            let Some(path) = options.positional.first() else {
                print_usage();
                process::exit(1);
            };
            run_render(config, Path::new(path), today)
        }
        "version" => {
            println!(
                "quote_wizard_cli {} ({} {}, built {})",
                env!("CARGO_PKG_VERSION"),
                env!("QUOTE_WIZARD_BUILD_HASH"),
                env!("QUOTE_WIZARD_BUILD_PROFILE"),
                env!("QUOTE_WIZARD_BUILD_TIMESTAMP"),
            );
            Ok(())
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }
}

fn run_interactive(
    config: AppConfig,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    output::section(&config.company_name);
    let mut session = QuoteSession::new(config);
    let mut interaction = TerminalInteraction::new();
    match WizardRunner::new(&mut session, today).run(&mut interaction)? {
        WizardResult::Submitted(submission) => {
            output::success("Your quotation request is ready.");
            thread::sleep(submission.delay);
            println!("{}", submission.link);
        }
        WizardResult::Cancelled => output::info("Quote request cancelled."),
    }
    Ok(())
}

/// Loads answers from JSON and walks them through every step.
fn run_render(
    config: AppConfig,
    path: &Path,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let answers: FieldStore = serde_json::from_str(&fs::read_to_string(path)?)?;
    let mut session = QuoteSession::new(config);

    for (key, value) in answers.iter() {
        session.update_field(key, value.clone())?;
    }

    while session.current_step() != Step::Review {
        if let Err(err) = session.advance() {
            if let WizardError::StepIncomplete(validation) = &err {
                for (key, field_err) in validation.errors() {
                    let label = descriptor(key).map(|field| field.label).unwrap_or(key);
                    output::warning(format!("{label}: {field_err}"));
                }
            }
            return Err(err.into());
        }
    }

    if let Some(review) = session.review() {
        output::section("Review");
        for line in review.lines() {
            println!("{line}");
        }
    }

    let submission = session.submit(today)?;
    output::section("Message");
    println!("{}", submission.message);
    output::section("Link");
    println!("{}", submission.link);
    Ok(())
}

fn print_usage() {
    eprintln!(
        "Usage: quote_wizard_cli [command] [--config <file.json>] [--today YYYY-MM-DD] [--plain]\n\
         Commands:\n  \
         interactive            (default) answer the form step by step\n  \
         render <answers.json>  validate saved answers and print the message and link\n  \
         version"
    );
}
