use colored::Colorize;

pub fn run() {
    println!(
        "{} {}",
        "slidedeck".bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
}
