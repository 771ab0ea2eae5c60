use proptest::prelude::*;
use std::collections::BTreeSet;
use taskledger_core::classify::{
    TrackingKey, classify, counts_as_completed, is_non_feature_work, latest_by_key,
    split_feature_keys,
};
use taskledger_core::model::{Status, WorkLog};
use taskledger_core::report::{SectionLabels, pr_links, render_text};

use generators::*;

fn all_dates(log: &WorkLog) -> Vec<String> {
    log.keys().cloned().collect()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn classification_is_idempotent(log in arb_work_log()) {
        let dates = all_dates(&log);
        let first = classify(&log, &dates);
        let second = classify(&log, &dates);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            render_text(&first, &SectionLabels::default()),
            render_text(&second, &SectionLabels::default())
        );
    }

    #[test]
    fn latest_record_has_maximum_date(log in arb_work_log()) {
        let dates = all_dates(&log);
        let latest = latest_by_key(&log, &dates);
        for (date, day) in &log {
            for task in &day.tasks {
                let key = TrackingKey::from_work_item_key(&task.work_item_key);
                let chosen = latest.get(&key);
                prop_assert!(chosen.is_some());
                if let Some(chosen) = chosen {
                    prop_assert!(chosen.date >= *date);
                }
            }
        }
    }

    #[test]
    fn next_up_never_contains_finished_items(log in arb_work_log()) {
        let dates = all_dates(&log);
        let result = classify(&log, &dates);
        let latest = latest_by_key(&log, &dates);
        for key in result.next_up.keys() {
            let recent = &latest[&TrackingKey::from_work_item_key(key)];
            prop_assert!(!recent.task.has_status(Status::Completed));
        }
    }

    #[test]
    fn completed_bucket_matches_inclusion_rule(log in arb_work_log()) {
        let dates = all_dates(&log);
        let result = classify(&log, &dates);
        let expected: usize = log
            .values()
            .flat_map(|d| &d.tasks)
            .filter(|t| counts_as_completed(t))
            .count();
        let actual: usize = result.completed.values().map(Vec::len).sum();
        prop_assert_eq!(expected, actual);
        for records in result.completed.values() {
            for r in records {
                prop_assert!(
                    !(r.task.has_status(Status::InProgress)
                        && r.task.combined_descriptions().is_empty())
                );
            }
        }
    }

    #[test]
    fn feature_partition_is_total_and_exclusive(log in arb_work_log()) {
        let dates = all_dates(&log);
        let result = classify(&log, &dates);
        let (feature, misc) = split_feature_keys(&result.completed);
        let feature: BTreeSet<&str> = feature.into_iter().collect();
        let misc: BTreeSet<&str> = misc.into_iter().collect();
        prop_assert!(feature.is_disjoint(&misc));
        prop_assert_eq!(feature.len() + misc.len(), result.completed.len());
        for key in &misc {
            let has_pr = result.completed[*key].iter().any(|r| r.task.pr_link().is_some());
            prop_assert!(is_non_feature_work(key, has_pr));
        }
    }

    #[test]
    fn pr_link_set_is_sorted_and_complete(log in arb_work_log()) {
        let dates = all_dates(&log);
        let result = classify(&log, &dates);
        for records in result.completed.values() {
            let expected: BTreeSet<&str> = records
                .iter()
                .filter_map(|r| r.task.pr_link.as_deref())
                .filter(|p| !p.is_empty())
                .collect();
            let rendered = pr_links(records);
            prop_assert_eq!(rendered, expected.into_iter().collect::<Vec<_>>());
        }
    }
}
