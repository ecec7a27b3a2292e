//! Styled terminal output for the live diff CLI
//!
//! Every user-facing line goes through here so the palette stays consistent
//! between the session messages, the diagnostic channel and the diff view.

use owo_colors::OwoColorize;

/// Print a success message with a green checkmark
pub fn success(message: &str) {
    // Pastel mint green: RGB(152, 225, 152)
    println!(
        "{} {}",
        "✓".truecolor(152, 225, 152).bold(),
        message.bright_white()
    );
}

/// Print an error message with a red X
pub fn error(message: &str) {
    // Pastel coral/salmon: RGB(255, 160, 160)
    eprintln!(
        "{} {}",
        "✗".truecolor(255, 160, 160).bold(),
        message.bright_white()
    );
}

/// Print a warning message with a yellow warning symbol
pub fn warning(message: &str) {
    // Pastel cream/yellow: RGB(255, 230, 160)
    println!(
        "{} {}",
        "⚠".truecolor(255, 230, 160).bold(),
        message.bright_white()
    );
}

/// Print an info message with a blue info symbol
pub fn info(message: &str) {
    // Pastel sky blue: RGB(160, 200, 255)
    println!(
        "{} {}",
        "ℹ".truecolor(160, 200, 255).bold(),
        message.bright_white()
    );
}

/// Print a section header with a separator line
pub fn section(title: &str) {
    // Pastel lavender: RGB(181, 174, 254)
    println!("\n{}", title.truecolor(181, 174, 254).bold());
    separator();
}

/// Print a key-value pair with styled key and value
pub fn key_value(key: &str, value: &str) {
    // Brighter grey: RGB(160, 160, 160)
    println!(
        "  {} {}",
        format!("{}:", key).truecolor(160, 160, 160),
        value.bright_white()
    );
}

/// Print a dimmed/muted message
pub fn dimmed(message: &str) {
    println!("{}", message.truecolor(160, 160, 160));
}

/// Print text as-is, adding a trailing newline only if missing
pub fn plain(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}

/// Print a line to the diagnostic stream without decoration
pub fn diagnostic(line: &str) {
    eprintln!("{}", line.truecolor(160, 160, 160));
}

/// Print a header announcing the diagnostic stream
pub fn diagnostic_header(channel: &str) {
    eprintln!(
        "\n{} {}",
        "▌".truecolor(255, 160, 160).bold(),
        channel.truecolor(255, 160, 160).bold()
    );
}

/// Print one line of a unified diff, colored by its marker
pub fn diff_line(marker: char, text: &str) {
    match marker {
        // Pastel coral: removed from the runtime side
        '-' => println!("{}", format!("-{}", text).truecolor(255, 160, 160)),
        // Pastel mint green: added on the spec side
        '+' => println!("{}", format!("+{}", text).truecolor(152, 225, 152)),
        '@' => println!("{}", text.truecolor(120, 180, 195)),
        _ => println!(" {}", text),
    }
}

/// Print a horizontal separator sized to the terminal
pub fn separator() {
    let width = terminal_size::terminal_size()
        .map(|(terminal_size::Width(w), _)| w as usize)
        .unwrap_or(50)
        .min(80);
    // Brighter grey: RGB(160, 160, 160)
    println!("{}", "─".repeat(width).truecolor(160, 160, 160));
}

/// Print a blank line for spacing
pub fn blank() {
    println!();
}
