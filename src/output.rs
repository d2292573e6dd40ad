//! Console output helpers.
//!
//! Visual language: gray `>` caret for progress and meta lines, green
//! check for success, red cross for errors (stderr). Respects NO_COLOR.

use colored::Colorize;

fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print a green success message with a checkmark.
///
/// Example: `✔ Deployment succeeded`
pub fn success(msg: &str) {
    if colors_enabled() {
        println!("{} {}", "✔".green(), msg.green());
    } else {
        println!("✔ {}", msg);
    }
}

/// Print a bright progress message with a caret.
///
/// Example: `> Adding my-secret to your secrets...`
pub fn progress(msg: &str) {
    if colors_enabled() {
        println!("{} {}", ">".dimmed(), msg.bright_white());
    } else {
        println!("> {}", msg);
    }
}

/// Print a subtle gray message with a caret.
///
/// Example: `> To override this, use the -f flag.`
pub fn meta(msg: &str) {
    if colors_enabled() {
        println!("{} {}", ">".dimmed(), msg.dimmed());
    } else {
        println!("> {}", msg);
    }
}

/// Print a red error message to stderr.
///
/// Example: `✕ Deploy key is not valid`
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "✕".red().bold(), msg.red().bold());
    } else {
        eprintln!("✕ {}", msg);
    }
}

/// Highlight a variable, flag, or command for inline display.
///
/// Returns a colored string usable inside other messages.
pub fn variable(val: &str) -> String {
    if colors_enabled() {
        val.cyan().bold().to_string()
    } else {
        val.to_string()
    }
}
