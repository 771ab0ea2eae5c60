//! Minimal HTML report that survives copy/paste into rich-text chat.
//!
//! The document has no CSS and no scripts; nesting is carried entirely by
//! `<ul>` elements so list structure is preserved when pasted.

use crate::classify::{Classification, split_blocked, split_feature_keys};
use crate::model::DatedTaskRecord;
use crate::report::{
    NON_FEATURE_HEADING, SectionLabels, completed_descriptions, latest_note, pr_links,
    sub_block_label,
};
use crate::ticket::{SummaryLookup, browse_url, extract_ticket_id};

const DOCUMENT_HEAD: &str =
    "<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"UTF-8\">\n</head>\n<body>";
const DOCUMENT_TAIL: &str = "</body></html>";

/// Escape `& < > " '` for text and attribute positions.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render a work-item key as a tracker link when it names a ticket.
fn key_markup(key: &str, lookup: &dyn SummaryLookup, base_url: &str) -> String {
    let Some(id) = extract_ticket_id(key) else {
        return escape_html(key);
    };
    let text = lookup
        .summary(&id)
        .map_or_else(|| id.clone(), |summary| format!("{id}: {summary}"));
    format!(
        "<a href=\"{}\" target=\"_blank\">{}</a>",
        escape_html(&browse_url(base_url, &id)),
        escape_html(&text)
    )
}

fn pr_item(links: &[&str]) -> Option<String> {
    if links.is_empty() {
        return None;
    }
    let anchors: Vec<String> = links
        .iter()
        .map(|link| {
            let link = escape_html(link);
            format!("<a href=\"{link}\">{link}</a>")
        })
        .collect();
    Some(format!("<li>PR(s): {}</li>", anchors.join("; ")))
}

fn list(items: &[String]) -> String {
    format!("<ul>{}</ul>", items.concat())
}

fn entry(heading: &str, children: &[String]) -> String {
    format!("<li><strong>{heading}</strong>{}</li>", list(children))
}

struct HtmlWriter<'a> {
    lookup: &'a dyn SummaryLookup,
    base_url: &'a str,
    out: String,
}

impl HtmlWriter<'_> {
    fn section(&mut self, heading: &str, items: &[String]) {
        self.out
            .push_str(&format!("<h2>{}</h2>", escape_html(heading)));
        self.out.push_str(&list(items));
    }

    fn keyed_section<F>(
        &mut self,
        heading: &str,
        bucket: &std::collections::BTreeMap<String, Vec<DatedTaskRecord>>,
        content: F,
    ) where
        F: Fn(&[DatedTaskRecord]) -> Vec<String>,
    {
        if bucket.is_empty() {
            return;
        }
        let (feature, misc) = split_feature_keys(bucket);
        let mut items: Vec<String> = feature
            .into_iter()
            .map(|key| {
                entry(
                    &key_markup(key, self.lookup, self.base_url),
                    &content(&bucket[key]),
                )
            })
            .collect();

        if !misc.is_empty() {
            let groups: Vec<String> = misc
                .into_iter()
                .map(|key| {
                    let label = if key.is_empty() {
                        sub_block_label(key).to_string()
                    } else {
                        key_markup(key, self.lookup, self.base_url)
                    };
                    format!("<li>{label}{}</li>", list(&content(&bucket[key])))
                })
                .collect();
            items.push(entry(NON_FEATURE_HEADING, &groups));
        }

        self.section(heading, &items);
    }
}

fn completed_items(records: &[DatedTaskRecord]) -> Vec<String> {
    completed_descriptions(records)
        .into_iter()
        .map(|desc| format!("<li>{}</li>", escape_html(desc)))
        .chain(pr_item(&pr_links(records)))
        .collect()
}

fn next_up_items(records: &[DatedTaskRecord]) -> Vec<String> {
    latest_note(records)
        .map(|note| format!("<li>{}</li>", escape_html(note)))
        .into_iter()
        .chain(pr_item(&pr_links(records)))
        .collect()
}

/// Render the full HTML document.
///
/// `lookup` supplies ticket titles and is consulted once per rendered key.
/// Keys without a ticket ID render as escaped plain text.
#[must_use]
pub fn render_html(
    result: &Classification,
    date_range_label: &str,
    lookup: &dyn SummaryLookup,
    labels: &SectionLabels,
    base_url: &str,
) -> String {
    let mut writer = HtmlWriter {
        lookup,
        base_url,
        out: String::from(DOCUMENT_HEAD),
    };
    writer.out.push_str(&format!(
        "<h1>Work Report ({})</h1><p><em>Autogenerated by TaskLedger</em></p>",
        escape_html(date_range_label)
    ));

    writer.keyed_section(
        &format!("🦀 {}", labels.completed),
        &result.completed,
        completed_items,
    );
    writer.keyed_section(
        &format!("⭐ {}", labels.next_up),
        &result.next_up,
        next_up_items,
    );

    if !result.blocked.is_empty() {
        let (feature, misc) = split_blocked(&result.blocked);
        let blocker = |note: Option<&str>| {
            vec![format!(
                "<li>Blocker: {}</li>",
                escape_html(note.unwrap_or_default())
            )]
        };
        let mut items: Vec<String> = feature
            .into_iter()
            .map(|task| {
                entry(
                    &key_markup(&task.work_item_key, lookup, base_url),
                    &blocker(task.blocker_note()),
                )
            })
            .collect();
        if !misc.is_empty() {
            let groups: Vec<String> = misc
                .into_iter()
                .map(|task| {
                    let label = if task.work_item_key.is_empty() {
                        sub_block_label("").to_string()
                    } else {
                        key_markup(&task.work_item_key, lookup, base_url)
                    };
                    format!("<li>{label}{}</li>", list(&blocker(task.blocker_note())))
                })
                .collect();
            items.push(entry(NON_FEATURE_HEADING, &groups));
        }
        writer.section(&format!("🚫 {}", labels.blocked), &items);
    }

    writer.out.push_str(DOCUMENT_TAIL);
    writer.out
}
