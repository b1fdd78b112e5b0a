//! Properties of the configuration duration parser.

use proptest::prelude::*;

use reclaim::config::parse_duration;

proptest! {
    /// PROPERTY: the parser never panics on arbitrary input.
    #[test]
    fn parse_never_panics(s in "(?s).{0,64}") {
        let _ = parse_duration(&s);
    }

    /// PROPERTY: well-formed inputs parse to the unit-scaled value.
    #[test]
    fn well_formed_inputs_round_trip(n in 0u64..100_000) {
        prop_assert_eq!(
            parse_duration(&format!("{n}s")).unwrap().as_secs(),
            n
        );
        prop_assert_eq!(
            parse_duration(&format!("{n}m")).unwrap().as_secs(),
            n * 60
        );
        prop_assert_eq!(
            parse_duration(&format!("{n}d")).unwrap().as_secs(),
            n * 86_400
        );
    }

    /// PROPERTY: unknown unit suffixes never parse.
    #[test]
    fn unknown_units_are_rejected(n in 0u64..1000, unit in "[a-z]{2,4}") {
        prop_assume!(!matches!(unit.as_str(), "s" | "m" | "h" | "d" | "w"));
        prop_assert_eq!(parse_duration(&format!("{n}{unit}")), None);
    }
}
