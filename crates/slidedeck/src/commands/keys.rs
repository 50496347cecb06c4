use colored::Colorize;

use crate::input::CONTROLS;

pub fn run() {
    println!("{}", "Controls".bold());
    for (keys, action) in CONTROLS {
        println!("  {:<28} {action}", keys.green());
    }
}
