use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;
use crate::input::{DEFAULT_FULLSCREEN_KEY, DEFAULT_SWIPE_THRESHOLD, DEFAULT_WHEEL_DEBOUNCE};

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load_or_default();
            config.set(&key, &value)?;
            let path = config.save()?;
            println!(
                "{} {key} = {value} ({})",
                "Saved".green().bold(),
                path.display().to_string().dimmed()
            );
            Ok(())
        }
    }
}

fn show() -> Result<()> {
    let config = Config::load_or_default();
    let defaults = config.defaults.clone().unwrap_or_default();
    let input = config.input.clone().unwrap_or_default();

    println!("{}", "Configuration".bold());
    println!("  {}", Config::path()?.display().to_string().dimmed());
    println!();
    print_value("defaults.theme", defaults.theme, "dark".to_string());
    print_value("defaults.start_mode", defaults.start_mode, "windowed".to_string());
    print_value(
        "input.swipe_threshold",
        input.swipe_threshold,
        DEFAULT_SWIPE_THRESHOLD,
    );
    print_value(
        "input.wheel_debounce_ms",
        input.wheel_debounce_ms,
        DEFAULT_WHEEL_DEBOUNCE.as_millis() as u64,
    );
    print_value(
        "input.fullscreen_key",
        input.fullscreen_key,
        DEFAULT_FULLSCREEN_KEY.to_string(),
    );
    Ok(())
}

fn print_value<T: std::fmt::Display>(key: &str, value: Option<T>, default: T) {
    match value {
        Some(v) => println!("  {:<26} {}", key.cyan(), v),
        None => println!("  {:<26} {} {}", key.cyan(), default, "(default)".dimmed()),
    }
}
