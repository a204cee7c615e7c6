use proptest::prelude::*;

use mgrant_types::{MicroAmount, ProposalCategory, Timestamp};

proptest! {
    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// elapsed_since(now) = now - self, saturating at zero.
    #[test]
    fn timestamp_elapsed_since(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(t.elapsed_since(now), offset);
        prop_assert_eq!(now.elapsed_since(t), 0);
    }

    /// secs_until and has_passed agree: nothing left iff the instant has passed.
    #[test]
    fn timestamp_secs_until_matches_has_passed(target in 0u64..1_000_000, now in 0u64..1_000_000) {
        let t = Timestamp::new(target);
        let n = Timestamp::new(now);
        prop_assert_eq!(t.secs_until(n) == 0, t.has_passed(n));
    }

    /// Formatting an amount and parsing it back yields the same micro-units.
    #[test]
    fn micro_amount_display_parses_back(micro in 0u64..u64::MAX / 2) {
        let amount = MicroAmount::new(micro);
        let parsed = MicroAmount::parse_decimal(&amount.to_string()).unwrap();
        prop_assert_eq!(parsed, amount);
    }

    /// Whole token amounts parse to tokens * 10^6.
    #[test]
    fn micro_amount_whole_tokens(tokens in 0u64..1_000_000_000) {
        let parsed = MicroAmount::parse_decimal(&tokens.to_string()).unwrap();
        prop_assert_eq!(Some(parsed), MicroAmount::from_tokens(tokens));
    }

    /// Only the six known category names parse.
    #[test]
    fn category_parse_accepts_only_known(name in "[a-z]{1,14}") {
        let known = ProposalCategory::ALL.iter().any(|c| c.as_str() == name);
        prop_assert_eq!(name.parse::<ProposalCategory>().is_ok(), known);
    }
}
