//! Identity-based dedup for the displayed item list.
//!
//! Every merge into the list goes through [`dedup_by_id`], so the list never holds two
//! entries with the same [`ItemId`]. The first occurrence of an id keeps its position.

use std::collections::HashSet;

use crate::types::{Item, ItemId};

/// Drop later repeats of an id, keeping first-seen order.
pub fn dedup_by_id(items: Vec<Item>) -> Vec<Item> {
    let mut seen: HashSet<ItemId> = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|it| seen.insert(it.id.clone()))
        .collect()
}

/// `head` goes first; an existing entry with the same id is dropped.
pub fn prepend_dedup(head: Item, existing: &[Item]) -> Vec<Item> {
    let mut all = Vec::with_capacity(existing.len() + 1);
    all.push(head);
    all.extend(existing.iter().cloned());
    dedup_by_id(all)
}

/// Append `incoming` after `existing`; existing entries win.
pub fn union_dedup(existing: &[Item], incoming: Vec<Item>) -> Vec<Item> {
    let mut all = Vec::with_capacity(existing.len() + incoming.len());
    all.extend(existing.iter().cloned());
    all.extend(incoming);
    dedup_by_id(all)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u32, name: &str) -> Item {
        Item {
            id: ItemId::Number(id),
            name: name.to_string(),
            image: None,
            tags: vec![],
            stats: vec![],
        }
    }

    fn ids(items: &[Item]) -> Vec<ItemId> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_first_occurrence_wins() {
        let out = dedup_by_id(vec![
            item(1, "a"),
            item(2, "b"),
            item(1, "a-again"),
            item(3, "c"),
            item(2, "b-again"),
        ]);
        assert_eq!(ids(&out), vec![ItemId::Number(1), ItemId::Number(2), ItemId::Number(3)]);
        assert_eq!(out[0].name, "a");
        assert_eq!(out[1].name, "b");
    }

    #[test]
    fn test_idempotent() {
        let input = vec![item(5, "e"), item(4, "d"), item(5, "x"), item(4, "y"), item(6, "f")];
        let once = dedup_by_id(input);
        let twice = dedup_by_id(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedup_by_id(vec![]).is_empty());
    }

    #[test]
    fn test_prepend_moves_existing_to_front() {
        let existing = vec![item(1, "a"), item(25, "pikachu"), item(3, "c")];
        let out = prepend_dedup(item(25, "pikachu"), &existing);
        assert_eq!(
            ids(&out),
            vec![ItemId::Number(25), ItemId::Number(1), ItemId::Number(3)]
        );
    }

    #[test]
    fn test_placeholders_share_identity() {
        let first = prepend_dedup(Item::placeholder("zzz"), &[item(1, "a")]);
        let second = prepend_dedup(Item::placeholder("yyy"), &first);
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].name, "yyy not found");
        assert_eq!(second[1].id, ItemId::Number(1));
    }

    #[test]
    fn test_union_keeps_existing_order() {
        let existing = vec![item(4, "charmander"), item(5, "charmeleon")];
        let out = union_dedup(&existing, vec![item(7, "squirtle"), item(5, "dup")]);
        assert_eq!(
            ids(&out),
            vec![ItemId::Number(4), ItemId::Number(5), ItemId::Number(7)]
        );
        assert_eq!(out[1].name, "charmeleon");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Small id space so repeats are common; the index makes every element distinguishable
        fn items_from(ids: &[u32]) -> Vec<Item> {
            ids.iter()
                .enumerate()
                .map(|(i, id)| item(*id, &format!("{id}@{i}")))
                .collect()
        }

        fn assert_first_occurrences(input: &[Item], out: &[Item]) {
            let mut seen = HashSet::new();
            let expected: Vec<&Item> = input.iter().filter(|it| seen.insert(it.id.clone())).collect();
            let got: Vec<&Item> = out.iter().collect();
            assert_eq!(got, expected);
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_output_has_unique_ids(ids in prop::collection::vec(0u32..8, 0..40)) {
                let out = dedup_by_id(items_from(&ids));
                let mut seen = HashSet::new();
                prop_assert!(out.iter().all(|it| seen.insert(it.id.clone())));
            }

            #[test]
            fn prop_keeps_earliest_occurrence(ids in prop::collection::vec(0u32..8, 0..40)) {
                let input = items_from(&ids);
                let out = dedup_by_id(input.clone());
                assert_first_occurrences(&input, &out);
            }

            #[test]
            fn prop_idempotent(ids in prop::collection::vec(0u32..8, 0..40)) {
                let once = dedup_by_id(items_from(&ids));
                let twice = dedup_by_id(once.clone());
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn prop_prepend_puts_head_first(
                head in 0u32..8,
                ids in prop::collection::vec(0u32..8, 0..40),
            ) {
                let existing = dedup_by_id(items_from(&ids));
                let head_item = item(head, "head");
                let out = prepend_dedup(head_item.clone(), &existing);

                prop_assert_eq!(&out[0], &head_item);
                let mut input = vec![head_item];
                input.extend(existing.iter().cloned());
                assert_first_occurrences(&input, &out);
            }

            #[test]
            fn prop_union_keeps_existing_and_appends_new(
                existing_ids in prop::collection::vec(0u32..8, 0..20),
                incoming_ids in prop::collection::vec(0u32..12, 0..20),
            ) {
                let existing = dedup_by_id(items_from(&existing_ids));
                let incoming: Vec<Item> = incoming_ids
                    .iter()
                    .map(|id| item(*id, &format!("new-{id}")))
                    .collect();
                let out = union_dedup(&existing, incoming.clone());

                prop_assert_eq!(&out[..existing.len()], &existing[..]);
                let mut input = existing.clone();
                input.extend(incoming);
                assert_first_occurrences(&input, &out);
            }
        }
    }
}
