//! Per-ticket progress comments in tracker wiki markup.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::classify::{Classification, split_blocked, split_feature_keys};
use crate::report::{completed_descriptions, latest_note, pr_links};
use crate::ticket::extract_ticket_id;

/// Footer that marks comments generated by this tool.
pub const COMMENT_FOOTER: &str = "_Autogenerated by TaskLedger_";

/// One comment destined for one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketComment {
    pub ticket_id: String,
    pub body: String,
}

#[derive(Default)]
struct TicketNotes<'a> {
    progress: Vec<&'a str>,
    prs: BTreeSet<&'a str>,
    next_up: Vec<&'a str>,
    blocked: Vec<&'a str>,
}

impl TicketNotes<'_> {
    fn is_empty(&self) -> bool {
        self.progress.is_empty()
            && self.prs.is_empty()
            && self.next_up.is_empty()
            && self.blocked.is_empty()
    }

    fn body(&self, date_range_label: &str) -> String {
        let mut sections = vec![format!("*TaskLedger update ({date_range_label})*")];

        if !self.progress.is_empty() || !self.prs.is_empty() {
            let mut lines = vec!["*Progress:*".to_string()];
            lines.extend(self.progress.iter().map(|d| format!("* {d}")));
            if !self.prs.is_empty() {
                let links: Vec<String> = self.prs.iter().map(|l| format!("[{l}|{l}]")).collect();
                lines.push(format!("* PR(s): {}", links.join("; ")));
            }
            sections.push(lines.join("\n"));
        }
        if !self.next_up.is_empty() {
            let mut lines = vec!["*Next up:*".to_string()];
            lines.extend(self.next_up.iter().map(|n| format!("* {n}")));
            sections.push(lines.join("\n"));
        }
        if !self.blocked.is_empty() {
            let mut lines = vec!["*Blocked:*".to_string()];
            lines.extend(self.blocked.iter().map(|b| format!("* {b}")));
            sections.push(lines.join("\n"));
        }

        sections.push(COMMENT_FOOTER.to_string());
        sections.join("\n\n")
    }
}

fn push_unique<'a>(list: &mut Vec<&'a str>, value: &'a str) {
    if !list.contains(&value) {
        list.push(value);
    }
}

/// Build one comment per ticket referenced by feature work, sorted by ID.
///
/// Keys that resolve to the same ticket ID are merged. Tickets whose
/// sections would all be empty get no comment.
#[must_use]
pub fn build_ticket_comments(
    result: &Classification,
    date_range_label: &str,
) -> Vec<TicketComment> {
    let mut by_ticket: BTreeMap<String, TicketNotes<'_>> = BTreeMap::new();

    let (completed_keys, _) = split_feature_keys(&result.completed);
    for key in completed_keys {
        let Some(id) = extract_ticket_id(key) else {
            continue;
        };
        let records = &result.completed[key];
        let notes = by_ticket.entry(id).or_default();
        for desc in completed_descriptions(records) {
            push_unique(&mut notes.progress, desc);
        }
        notes.prs.extend(pr_links(records));
    }

    let (next_up_keys, _) = split_feature_keys(&result.next_up);
    for key in next_up_keys {
        let Some(id) = extract_ticket_id(key) else {
            continue;
        };
        if let Some(note) = latest_note(&result.next_up[key]) {
            push_unique(&mut by_ticket.entry(id).or_default().next_up, note);
        }
    }

    let (blocked, _) = split_blocked(&result.blocked);
    for task in blocked {
        let (Some(id), Some(note)) = (extract_ticket_id(&task.work_item_key), task.blocker_note())
        else {
            continue;
        };
        push_unique(&mut by_ticket.entry(id).or_default().blocked, note);
    }

    by_ticket
        .into_iter()
        .filter(|(_, notes)| !notes.is_empty())
        .map(|(ticket_id, notes)| TicketComment {
            body: notes.body(date_range_label),
            ticket_id,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DatedTaskRecord, TaskRecord};

    fn record(key: &str, task: TaskRecord) -> DatedTaskRecord {
        DatedTaskRecord::new(
            "2024-08-01",
            TaskRecord {
                work_item_key: key.into(),
                ..task
            },
        )
    }

    #[test]
    fn full_comment_layout() {
        let mut result = Classification::default();
        result.completed.insert(
            "SCR-1".into(),
            vec![record(
                "SCR-1",
                TaskRecord {
                    status: "completed".into(),
                    description: Some("Set up module".into()),
                    pr_link: Some("https://github.com/example/repo/pull/1".into()),
                    ..TaskRecord::default()
                },
            )],
        );
        result.next_up.insert(
            "https://issues.redhat.com/browse/SCR-1".into(),
            vec![record(
                "https://issues.redhat.com/browse/SCR-1",
                TaskRecord {
                    status: "in progress".into(),
                    upcoming_note: Some("Write docs".into()),
                    ..TaskRecord::default()
                },
            )],
        );
        result.blocked = vec![TaskRecord {
            work_item_key: "SCR-1".into(),
            blocker_note: Some("Need review".into()),
            ..TaskRecord::default()
        }];

        let comments = build_ticket_comments(&result, "2024-08-01");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].ticket_id, "SCR-1");
        assert_eq!(
            comments[0].body,
            "*TaskLedger update (2024-08-01)*\n\n\
             *Progress:*\n\
             * Set up module\n\
             * PR(s): [https://github.com/example/repo/pull/1|https://github.com/example/repo/pull/1]\n\n\
             *Next up:*\n\
             * Write docs\n\n\
             *Blocked:*\n\
             * Need review\n\n\
             _Autogenerated by TaskLedger_"
        );
    }

    #[test]
    fn non_feature_work_gets_no_comment() {
        let mut result = Classification::default();
        result.completed.insert(
            String::new(),
            vec![record(
                "",
                TaskRecord {
                    status: "completed".into(),
                    description: Some("misc".into()),
                    ..TaskRecord::default()
                },
            )],
        );
        result.completed.insert(
            "NO-JIRA: cleanup".into(),
            vec![record(
                "NO-JIRA: cleanup",
                TaskRecord {
                    status: "completed".into(),
                    description: Some("cleanup".into()),
                    pr_link: Some("https://github.com/example/repo/pull/5".into()),
                    ..TaskRecord::default()
                },
            )],
        );
        assert!(build_ticket_comments(&result, "x").is_empty());
    }

    #[test]
    fn comments_sorted_and_empty_sections_omitted() {
        let mut result = Classification::default();
        for key in ["SCR-9", "SCR-10"] {
            result.completed.insert(
                key.into(),
                vec![record(
                    key,
                    TaskRecord {
                        status: "completed".into(),
                        description: Some(format!("work on {key}")),
                        ..TaskRecord::default()
                    },
                )],
            );
        }
        let comments = build_ticket_comments(&result, "x");
        let ids: Vec<&str> = comments.iter().map(|c| c.ticket_id.as_str()).collect();
        assert_eq!(ids, vec!["SCR-10", "SCR-9"]);
        assert!(!comments[0].body.contains("*Next up:*"));
        assert!(!comments[0].body.contains("*Blocked:*"));
        assert!(!comments[0].body.contains("PR(s)"));
    }
}
