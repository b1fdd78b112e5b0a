//! Properties of trash-marker names and the sweeper grammar.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use reclaim::fs::{base_path, is_trash_folder_name, TIMESTAMP_FORMAT};
use reclaim::ProjectName;

fn project_name() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[A-Za-z0-9_-]{1,12}").unwrap();
    proptest::collection::vec(segment, 1..=4).prop_map(|segments| segments.join("/"))
}

fn timestamp_pair() -> impl Strategy<Value = (i64, i64)> {
    // Seconds within a ~60 year window starting 2002; t1 < t2.
    (0i64..1_800_000_000, 1i64..86_400_000)
        .prop_map(|(start, delta)| (start, start + delta))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: names produced by the rename step always match the
    /// sweeper grammar, for both markers.
    #[test]
    fn produced_marker_names_match_the_grammar(
        name in project_name(),
        secs in 0i64..2_000_000_000,
    ) {
        let stamp = Utc.timestamp_opt(secs, 0).unwrap().format(TIMESTAMP_FORMAT);
        // Only the final path segment is a directory name on disk.
        let last = name.rsplit('/').next().unwrap();
        let deleted = format!("{}.{}.%deleted%.git", last, stamp);
        let archived = format!("{}.{}.%archived%.git", last, stamp);
        prop_assert!(is_trash_folder_name(&deleted));
        prop_assert!(is_trash_folder_name(&archived));
    }

    /// PROPERTY: live repository directory names never match the grammar.
    #[test]
    fn live_names_never_match_the_grammar(name in project_name()) {
        let last = name.rsplit('/').next().unwrap();
        let live = format!("{}.git", last);
        prop_assert!(!is_trash_folder_name(&live));
        prop_assert!(!is_trash_folder_name(last));
    }

    /// PROPERTY: two deletions at distinct instants produce distinct
    /// marker names that sort in time order.
    #[test]
    fn marker_names_sort_by_timestamp((t1, t2) in timestamp_pair()) {
        let name = "proj1";
        let s1 = Utc.timestamp_opt(t1, 0).unwrap().format(TIMESTAMP_FORMAT).to_string();
        let s2 = Utc.timestamp_opt(t2, 0).unwrap().format(TIMESTAMP_FORMAT).to_string();
        let m1 = format!("{name}.{s1}.%deleted%.git");
        let m2 = format!("{name}.{s2}.%deleted%.git");
        prop_assert_ne!(&m1, &m2);
        prop_assert!(m1 < m2, "{} should sort before {}", m1, m2);
    }

    /// PROPERTY: the timestamp encoding is always exactly 14 digits.
    #[test]
    fn timestamps_are_fixed_width(secs in 0i64..2_000_000_000) {
        let stamp = Utc.timestamp_opt(secs, 0).unwrap()
            .format(TIMESTAMP_FORMAT)
            .to_string();
        prop_assert_eq!(stamp.len(), 14);
        prop_assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }

    /// PROPERTY: joining a name onto a base and subtracting it again
    /// returns the base, however deeply the name nests.
    #[test]
    fn base_path_round_trips(name in project_name()) {
        let project = ProjectName::new(name.clone()).unwrap();
        let base = std::path::Path::new("/srv/git");
        let repo = base.join(format!("{name}.git"));
        prop_assert_eq!(base_path(&repo, &project).unwrap(), base);
    }
}

#[test]
fn marker_grammar_is_stable_across_day_boundaries() {
    let before = Utc.with_ymd_and_hms(2018, 12, 31, 23, 59, 59).unwrap();
    let after = before + Duration::seconds(1);
    let m1 = format!("p.{}.%deleted%.git", before.format(TIMESTAMP_FORMAT));
    let m2 = format!("p.{}.%deleted%.git", after.format(TIMESTAMP_FORMAT));
    assert!(m1 < m2);
    assert!(is_trash_folder_name(&m1) && is_trash_folder_name(&m2));
}
