//! Terminal colorization for diagram source output
//!
//! Applies ANSI escape codes to diagram text using crossterm.

use crossterm::style::{Color, Stylize};

/// Words that open or close a diagram or an entity block
const KEYWORDS: [&str; 6] = ["erDiagram", "@startuml", "@enduml", "digraph", "entity", "rankdir=TB;"];

/// Connectors drawn between entities
const CONNECTORS: [&str; 5] = ["||--||", "||--o{", "}o--||", "}o--o{", "->"];

/// Colorize diagram source using ANSI escape codes
///
/// Applies colors to different diagram elements:
/// - Grammar keywords: Cyan
/// - Cardinality connectors: Yellow
/// - Quoted names and labels: Green
/// - Required-property markers: Magenta
/// - Everything else: Default (terminal color)
pub fn colorize_output(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 2);

    for line in input.lines() {
        let indent_len = line.len() - line.trim_start().len();
        result.push_str(&line[..indent_len]);

        let mut first = true;
        for token in line[indent_len..].split(' ') {
            if !first {
                result.push(' ');
            }
            first = false;
            result.push_str(&colorize_token(token));
        }
        result.push('\n');
    }

    // Remove trailing newline to match input format
    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    result
}

fn colorize_token(token: &str) -> String {
    if token.is_empty() {
        return String::new();
    }
    if KEYWORDS.contains(&token) {
        return format!("{}", token.with(Color::Cyan));
    }
    if CONNECTORS.contains(&token) {
        return format!("{}", token.with(Color::Yellow));
    }
    if token.starts_with('"') {
        return format!("{}", token.with(Color::Green));
    }
    if let Some(rest) = token.strip_prefix('*') {
        return format!("{}{}", "*".with(Color::Magenta), rest);
    }
    if let Some(name) = token.strip_suffix('*') {
        return format!("{}{}", name, "*".with(Color::Magenta));
    }
    token.to_string()
}

/// Remove ANSI escape sequences
#[cfg(test)]
pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
