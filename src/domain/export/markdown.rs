//! Markdown document layout: header, table of contents and generic sections.

use crate::domain::specification::{ContentMap, ContentValue, Metadata, Section, DEFAULT_VERSION};

use super::text::{format_date, generate_anchor, humanize_key, NOT_SPECIFIED};

/// Heading of the table of contents.
pub const TOC_HEADING: &str = "## 📋 ÍNDICE DE CONTENIDOS";

/// Title used when the specification has none.
pub const UNTITLED: &str = "Sin Título";

/// Title line plus the four metadata lines.
pub fn header(metadata: &Metadata) -> String {
    format!(
        "# {title}\n\n**Versión**: {version}\n**Autor**: {author}\n**Creado**: {created}\n**Última actualización**: {updated}",
        title = or_default(&metadata.title, UNTITLED),
        version = or_default(&metadata.version, DEFAULT_VERSION),
        author = or_default(&metadata.author, NOT_SPECIFIED),
        created = format_date(metadata.created.as_ref()),
        updated = format_date(metadata.updated.as_ref()),
    )
}

/// Numbered links to each section, or empty when there are none.
pub fn table_of_contents(sections: &[&Section]) -> String {
    if sections.is_empty() {
        return String::new();
    }

    let mut toc = format!("{}\n\n", TOC_HEADING);
    for (index, section) in sections.iter().enumerate() {
        toc.push_str(&format!(
            "{}. **[{}](#{})**\n",
            index + 1,
            section.title,
            generate_anchor(&section.title)
        ));
    }
    toc
}

/// Field-by-field export used when no exporter or template applies.
pub fn generic_section(section: &Section) -> String {
    let mut md = format!("## {}\n\n", section.title);
    for (key, value) in section.content_fields() {
        md.push_str(&content_field(key, value));
    }
    md
}

fn content_field(key: &str, value: &ContentValue) -> String {
    match value {
        ContentValue::Null => String::new(),
        ContentValue::List(items) => {
            let mut md = format!("### {}\n\n", humanize_key(key));
            for item in items {
                match item {
                    ContentValue::List(_) | ContentValue::Map(_) => md.push_str(&nested(item)),
                    scalar => md.push_str(&format!("- {}\n", scalar)),
                }
            }
            md.push('\n');
            md
        }
        ContentValue::Map(map) => {
            format!("### {}\n\n{}\n", humanize_key(key), labeled_block(map))
        }
        scalar => format!("### {}\n\n{}\n\n", humanize_key(key), scalar),
    }
}

/// Bold-labeled lines for a nested mapping; lists are labeled by index.
fn nested(value: &ContentValue) -> String {
    match value {
        ContentValue::Map(map) => labeled_block(map),
        ContentValue::List(items) => {
            let entries: Vec<(String, &ContentValue)> = items
                .iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect();
            labeled_entries(entries.iter().map(|(k, v)| (k.as_str(), *v)))
        }
        scalar => format!("- {}\n", scalar),
    }
}

fn labeled_block(map: &ContentMap) -> String {
    labeled_entries(map.iter().map(|(k, v)| (k.as_str(), v)))
}

fn labeled_entries<'a>(entries: impl Iterator<Item = (&'a str, &'a ContentValue)>) -> String {
    let mut md = String::new();
    for (key, value) in entries {
        let label = humanize_key(key);
        match value {
            ContentValue::List(items) => {
                md.push_str(&format!("**{}**:\n", label));
                for item in items {
                    md.push_str(&format!("- {}\n", item));
                }
            }
            ContentValue::Map(_) => {
                md.push_str(&format!("**{}**:\n", label));
                md.push_str(&nested(value));
            }
            scalar => md.push_str(&format!("**{}**: {}\n", label, scalar)),
        }
    }
    md
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
