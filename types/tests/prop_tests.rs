use proptest::prelude::*;

use tally_types::{CampaignId, Label, OptionId, OptionKey, Timestamp, VoterId};

proptest! {
    /// Composite key roundtrip: unpack(pack(c, o)) == (c, o) for all in-width pairs.
    #[test]
    fn option_key_roundtrip(c in 0u64..=u32::MAX as u64, o in 0u64..=u32::MAX as u64) {
        let campaign = CampaignId::new(c);
        let option = OptionId::new(o);
        let key = OptionKey::pack(campaign, option).unwrap();
        prop_assert_eq!(key.unpack(), (campaign, option));
    }

    /// Distinct (campaign, option) pairs pack to distinct keys.
    #[test]
    fn option_key_injective(
        c1 in 0u64..=u32::MAX as u64, o1 in 0u64..=u32::MAX as u64,
        c2 in 0u64..=u32::MAX as u64, o2 in 0u64..=u32::MAX as u64,
    ) {
        let k1 = OptionKey::pack(CampaignId::new(c1), OptionId::new(o1)).unwrap();
        let k2 = OptionKey::pack(CampaignId::new(c2), OptionId::new(o2)).unwrap();
        prop_assert_eq!(k1 == k2, (c1, o1) == (c2, o2));
    }

    /// Keys order by campaign first, then by option.
    #[test]
    fn option_key_ordering(
        c1 in 0u64..=u32::MAX as u64, o1 in 0u64..=u32::MAX as u64,
        c2 in 0u64..=u32::MAX as u64, o2 in 0u64..=u32::MAX as u64,
    ) {
        let k1 = OptionKey::pack(CampaignId::new(c1), OptionId::new(o1)).unwrap();
        let k2 = OptionKey::pack(CampaignId::new(c2), OptionId::new(o2)).unwrap();
        prop_assert_eq!(k1.cmp(&k2), (c1, o1).cmp(&(c2, o2)));
    }

    /// Packing an over-width campaign ID always fails.
    #[test]
    fn option_key_campaign_width_checked(
        c in (u32::MAX as u64 + 1)..u64::MAX,
        o in 0u64..=u32::MAX as u64,
    ) {
        prop_assert!(OptionKey::pack(CampaignId::new(c), OptionId::new(o)).is_err());
    }

    /// Packing an over-width option ID always fails.
    #[test]
    fn option_key_option_width_checked(
        c in 0u64..=u32::MAX as u64,
        o in (u32::MAX as u64 + 1)..u64::MAX,
    ) {
        prop_assert!(OptionKey::pack(CampaignId::new(c), OptionId::new(o)).is_err());
    }

    /// Campaign bounds contain exactly that campaign's keys.
    #[test]
    fn campaign_bounds_contain_own_keys(
        c in 0u64..=u32::MAX as u64,
        o in 0u64..=u32::MAX as u64,
    ) {
        let bounds = OptionKey::campaign_bounds(CampaignId::new(c)).unwrap();
        let key = OptionKey::pack(CampaignId::new(c), OptionId::new(o)).unwrap();
        prop_assert!(bounds.contains(&key));
        let (unpacked_campaign, _) = key.unpack();
        prop_assert_eq!(unpacked_campaign, CampaignId::new(c));
    }

    /// OptionKey bincode serialization roundtrip.
    #[test]
    fn option_key_bincode_roundtrip(c in 0u64..=u32::MAX as u64, o in 0u64..=u32::MAX as u64) {
        let key = OptionKey::pack(CampaignId::new(c), OptionId::new(o)).unwrap();
        let encoded = bincode::serialize(&key).unwrap();
        let decoded: OptionKey = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, key);
    }

    /// VoterId roundtrip: new -> as_bytes preserves the identity bytes.
    #[test]
    fn voter_id_roundtrip(bytes in prop::array::uniform20(0u8..)) {
        let id = VoterId::new(bytes);
        prop_assert_eq!(id.as_bytes(), &bytes);
    }

    /// VoterId bincode serialization roundtrip.
    #[test]
    fn voter_id_bincode_roundtrip(bytes in prop::array::uniform20(0u8..)) {
        let id = VoterId::new(bytes);
        let encoded = bincode::serialize(&id).unwrap();
        let decoded: VoterId = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, id);
    }

    /// Label chunking roundtrip: from_chunks(chunks(), len()) reproduces the label.
    #[test]
    fn label_chunk_roundtrip(bytes in prop::collection::vec(0u8.., 0..200)) {
        let label = Label::new(bytes);
        let restored = Label::from_chunks(&label.chunks(), label.len());
        prop_assert_eq!(restored, label);
    }

    /// Chunk count is the byte length divided by the chunk width, rounded up.
    #[test]
    fn label_chunk_count(bytes in prop::collection::vec(0u8.., 0..200)) {
        let label = Label::new(bytes);
        let expected = label.len().div_ceil(tally_types::text::CHUNK_WIDTH);
        prop_assert_eq!(label.chunks().len(), expected);
    }

    /// Timestamp ordering matches the underlying seconds.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// has_passed agrees with manual comparison.
    #[test]
    fn timestamp_has_passed_correct(end in 0u64..1_000_000, now in 0u64..1_000_000) {
        prop_assert_eq!(
            Timestamp::new(end).has_passed(Timestamp::new(now)),
            now >= end
        );
    }
}
