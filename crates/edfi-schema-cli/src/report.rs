//! Plain-text reports shared by subcommands and the interactive shell
//!
//! Tables are aligned by display width so that non-ASCII descriptions line
//! up in a terminal.

use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

use edfi_schema::analyzer::{Entity, Relationship};
use edfi_schema::domains::DomainClassification;
use edfi_schema::openapi::{DocumentInfo, Endpoint};
use edfi_schema::stats::GraphStatistics;

/// Longest description shown in a table cell
const DESCRIPTION_WIDTH: usize = 60;

/// Render rows as a left-aligned table with a header rule
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let mut out = String::new();
    write_row(&mut out, headers.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(&mut out, rule.iter().map(String::as_str), &widths);
    for row in rows {
        write_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn write_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (cell, width) in cells.zip(widths) {
        if !line.is_empty() {
            line.push_str("  ");
        }
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Cut text to `max` display columns, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.width() <= max {
        return first_line.to_string();
    }
    let mut out = String::new();
    for c in first_line.chars() {
        if out.width() + 2 > max {
            break;
        }
        out.push(c);
    }
    out.push('…');
    out
}

pub fn statistics(info: Option<&DocumentInfo>, stats: &GraphStatistics) -> String {
    let mut out = String::new();
    if let Some(info) = info {
        if let Some(title) = &info.title {
            let _ = writeln!(out, "{} {}", title, info.version.as_deref().unwrap_or_default());
        }
    }
    let _ = writeln!(out, "Entities:      {}", stats.entity_count);
    let _ = writeln!(out, "Relationships: {}", stats.relationship_count);
    for (kind, count) in &stats.relationship_types {
        let _ = writeln!(out, "  {:<13} {}", kind, count);
    }
    if !stats.domains.is_empty() {
        out.push_str("Domains:\n");
        for (domain, count) in &stats.domains {
            let _ = writeln!(out, "  {}: {}", domain, count);
        }
    }
    out
}

pub fn entities(entities: &[&Entity]) -> String {
    if entities.is_empty() {
        return "No entities found\n".to_string();
    }
    let rows: Vec<Vec<String>> = entities
        .iter()
        .map(|e| {
            vec![
                e.name.clone(),
                e.properties.len().to_string(),
                truncate(e.description.as_deref().unwrap_or_default(), DESCRIPTION_WIDTH),
            ]
        })
        .collect();
    let mut out = table(&["ENTITY", "PROPERTIES", "DESCRIPTION"], &rows);
    let _ = writeln!(out, "\n{} entities", entities.len());
    out
}

pub fn entity(entity: &Entity, outgoing: &[&Relationship], incoming: &[&Relationship]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", entity.name);
    if let Some(description) = &entity.description {
        let _ = writeln!(out, "  {}", description);
    }
    let _ = writeln!(
        out,
        "  {} properties, {} required, {} references",
        entity.properties.len(),
        entity.required_properties().count(),
        entity.properties.iter().filter(|p| p.is_reference()).count()
    );
    out.push('\n');

    let rows: Vec<Vec<String>> = entity
        .properties
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.property_type.clone(),
                if p.required { "yes" } else { "" }.to_string(),
                p.reference.clone().unwrap_or_default(),
            ]
        })
        .collect();
    if rows.is_empty() {
        out.push_str("No properties\n");
    } else {
        out.push_str(&table(&["PROPERTY", "TYPE", "REQUIRED", "REFERENCES"], &rows));
    }

    if !outgoing.is_empty() {
        out.push_str("\nReferences:\n");
        for rel in outgoing {
            let _ = writeln!(out, "  {} -> {} ({})", rel.property, rel.to_entity, rel.cardinality);
        }
    }
    if !incoming.is_empty() {
        out.push_str("\nReferenced by:\n");
        for rel in incoming {
            let _ = writeln!(out, "  {}.{} ({})", rel.from_entity, rel.property, rel.cardinality);
        }
    }
    out
}

pub fn relationships(relationships: &[&Relationship]) -> String {
    if relationships.is_empty() {
        return "No relationships found\n".to_string();
    }
    let rows: Vec<Vec<String>> = relationships
        .iter()
        .map(|r| {
            vec![
                r.from_entity.clone(),
                r.cardinality.symbol().to_string(),
                r.to_entity.clone(),
                r.property.clone(),
            ]
        })
        .collect();
    let mut out = table(&["FROM", "TYPE", "TO", "PROPERTY"], &rows);
    let _ = writeln!(out, "\n{} relationships", relationships.len());
    out
}

pub fn endpoints(endpoints: &[Endpoint]) -> String {
    if endpoints.is_empty() {
        return "No endpoints found\n".to_string();
    }
    let rows: Vec<Vec<String>> = endpoints
        .iter()
        .map(|e| {
            vec![
                e.method.clone(),
                e.path.clone(),
                truncate(e.summary.as_deref().unwrap_or_default(), DESCRIPTION_WIDTH),
            ]
        })
        .collect();
    let mut out = table(&["METHOD", "PATH", "SUMMARY"], &rows);
    let _ = writeln!(out, "\n{} endpoints", endpoints.len());
    out
}

pub fn domains(classification: &DomainClassification) -> String {
    if classification.is_empty() {
        return "No domains found\n".to_string();
    }
    let mut out = String::new();
    for (domain, members) in classification.iter() {
        let _ = writeln!(out, "{} ({})", domain, members.len());
        for member in members {
            let _ = writeln!(out, "  {}", member);
        }
    }
    out
}

pub fn versions(versions: &[String], default: &str) -> String {
    let mut out = String::new();
    for version in versions {
        let marker = if version == default { " (default)" } else { "" };
        let _ = writeln!(out, "{}{}", version, marker);
    }
    out
}
