//! Chat-ready plain-text report.

use crate::classify::{Classification, split_blocked, split_feature_keys};
use crate::report::{
    NON_FEATURE_HEADING, SectionLabels, completed_descriptions, join_prs, latest_note, pr_links,
    sub_block_label,
};

const ITEM: &str = "    • ";
const DETAIL: &str = "        ◦ ";
const NESTED: &str = "            ▪ ";

fn push_line(out: &mut String, prefix: &str, text: &str) {
    out.push_str(prefix);
    out.push_str(text);
    out.push('\n');
}

fn push_prs(out: &mut String, prefix: &str, links: &[&str]) {
    if !links.is_empty() {
        push_line(out, prefix, &format!("PR(s): {}", join_prs(links)));
    }
}

/// Render the Completed, NextUp and Blocked sections, skipping empty ones.
///
/// Returns an empty string when the classification is empty.
#[must_use]
pub fn render_text(result: &Classification, labels: &SectionLabels) -> String {
    let mut out = String::new();
    render_completed(&mut out, result, &labels.completed);
    render_next_up(&mut out, result, &labels.next_up);
    render_blocked(&mut out, result, &labels.blocked);
    out
}

fn render_completed(out: &mut String, result: &Classification, label: &str) {
    if result.completed.is_empty() {
        return;
    }
    out.push_str(&format!("\n🦀 {label}\n"));

    let (feature, misc) = split_feature_keys(&result.completed);
    for key in feature {
        let records = &result.completed[key];
        push_line(out, ITEM, &format!("{key}: "));
        for desc in completed_descriptions(records) {
            push_line(out, DETAIL, desc);
        }
        push_prs(out, DETAIL, &pr_links(records));
    }

    if misc.is_empty() {
        return;
    }
    push_line(out, ITEM, &format!("{NON_FEATURE_HEADING}: "));
    for key in misc {
        let records = &result.completed[key];
        push_line(out, DETAIL, &format!("{}:", sub_block_label(key)));
        for desc in completed_descriptions(records) {
            push_line(out, NESTED, desc);
        }
        push_prs(out, NESTED, &pr_links(records));
    }
}

fn render_next_up(out: &mut String, result: &Classification, label: &str) {
    if result.next_up.is_empty() {
        return;
    }
    out.push_str(&format!("\n:starfleet: {label}\n"));

    let (feature, misc) = split_feature_keys(&result.next_up);
    for key in feature {
        let records = &result.next_up[key];
        push_line(out, ITEM, key);
        if let Some(note) = latest_note(records) {
            push_line(out, DETAIL, note);
        }
        push_prs(out, DETAIL, &pr_links(records));
    }

    if misc.is_empty() {
        return;
    }
    push_line(out, ITEM, NON_FEATURE_HEADING);
    for key in misc {
        let records = &result.next_up[key];
        push_line(out, DETAIL, sub_block_label(key));
        if let Some(note) = latest_note(records) {
            push_line(out, NESTED, note);
        }
        push_prs(out, NESTED, &pr_links(records));
    }
}

fn render_blocked(out: &mut String, result: &Classification, label: &str) {
    if result.blocked.is_empty() {
        return;
    }
    out.push_str(&format!("\n:facepalm: {label}\n"));

    let (feature, misc) = split_blocked(&result.blocked);
    for task in feature {
        push_line(out, ITEM, &format!("{} ", task.work_item_key));
        push_line(
            out,
            DETAIL,
            &format!("Blocker: {}", task.blocker_note().unwrap_or_default()),
        );
    }

    if misc.is_empty() {
        return;
    }
    push_line(out, ITEM, &format!("{NON_FEATURE_HEADING} "));
    for task in misc {
        push_line(out, DETAIL, sub_block_label(&task.work_item_key));
        push_line(
            out,
            NESTED,
            &format!("Blocker: {}", task.blocker_note().unwrap_or_default()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DatedTaskRecord, TaskRecord};

    fn completed(key: &str, desc: &str, pr: Option<&str>) -> DatedTaskRecord {
        DatedTaskRecord::new(
            "2024-08-01",
            TaskRecord {
                status: "completed".into(),
                work_item_key: key.into(),
                description: Some(desc.into()),
                pr_link: pr.map(Into::into),
                ..TaskRecord::default()
            },
        )
    }

    #[test]
    fn empty_classification_renders_nothing() {
        assert_eq!(
            render_text(&Classification::default(), &SectionLabels::default()),
            ""
        );
    }

    #[test]
    fn completed_section_layout() {
        let mut result = Classification::default();
        result.completed.insert(
            "SCR-1".into(),
            vec![
                completed("SCR-1", "Set up module", Some("https://github.com/example/repo/pull/2")),
                completed("SCR-1", "Wired config", Some("https://github.com/example/repo/pull/1")),
            ],
        );
        result
            .completed
            .insert(String::new(), vec![completed("", "Organized docs", None)]);

        let text = render_text(&result, &SectionLabels::default());
        let expected = "\n🦀 Thing I've been working on\n\
                        \x20   • SCR-1: \n\
                        \x20       ◦ Set up module\n\
                        \x20       ◦ Wired config\n\
                        \x20       ◦ PR(s): https://github.com/example/repo/pull/1; https://github.com/example/repo/pull/2\n\
                        \x20   • Non-feature work: \n\
                        \x20       ◦ Misc:\n\
                        \x20           ▪ Organized docs\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn next_up_uses_latest_note_only() {
        let mut result = Classification::default();
        let plan = |date: &str, note: &str| {
            DatedTaskRecord::new(
                date,
                TaskRecord {
                    status: "in progress".into(),
                    work_item_key: "SCR-4".into(),
                    upcoming_note: Some(note.into()),
                    ..TaskRecord::default()
                },
            )
        };
        result.next_up.insert(
            "SCR-4".into(),
            vec![plan("2024-08-01", "draft"), plan("2024-08-02", "ship it")],
        );

        let text = render_text(&result, &SectionLabels::default());
        assert!(text.starts_with("\n:starfleet: Thing I plan on working on next\n"));
        assert!(text.contains("    • SCR-4\n        ◦ ship it\n"));
        assert!(!text.contains("draft"));
    }

    #[test]
    fn blocked_section_layout_and_custom_label() {
        let mut result = Classification::default();
        result.blocked = vec![
            TaskRecord {
                work_item_key: "wiki".into(),
                blocker_note: Some("no access".into()),
                ..TaskRecord::default()
            },
            TaskRecord {
                work_item_key: "SCR-2".into(),
                blocker_note: Some("Waiting on schema".into()),
                ..TaskRecord::default()
            },
        ];
        let labels = SectionLabels {
            blocked: "Blockers".into(),
            ..SectionLabels::default()
        };

        let text = render_text(&result, &labels);
        let expected = "\n:facepalm: Blockers\n\
                        \x20   • SCR-2 \n\
                        \x20       ◦ Blocker: Waiting on schema\n\
                        \x20   • Non-feature work \n\
                        \x20       ◦ wiki\n\
                        \x20           ▪ Blocker: no access\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn sections_follow_fixed_order() {
        let mut result = Classification::default();
        result.blocked = vec![TaskRecord {
            work_item_key: "SCR-1".into(),
            blocker_note: Some("x".into()),
            ..TaskRecord::default()
        }];
        result
            .completed
            .insert("SCR-1".into(), vec![completed("SCR-1", "done", None)]);

        let text = render_text(&result, &SectionLabels::default());
        let crab = text.find("🦀").expect("completed header");
        let palm = text.find(":facepalm:").expect("blocked header");
        assert!(crab < palm);
        assert!(!text.contains(":starfleet:"));
    }
}
