//! Property-based tests for store transitions and notification.
//!
//! A random sequence of collection edits is applied through the setters and
//! checked against a plain `Vec` model.

use domain_store::{
    AppState, Asset, Assets, Collection, CollectionReader, CollectionSetter, Commit, Providers,
    Settings, Store, Theme,
};
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Debug)]
enum Op {
    Prepend(u8),
    Remove(u8),
    Reprice(u8, u16),
    Identity,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..12).prop_map(Op::Prepend),
        2 => (0u8..12).prop_map(Op::Remove),
        2 => (0u8..12, 1u16..500).prop_map(|(n, price)| Op::Reprice(n, price)),
        1 => Just(Op::Identity),
    ]
}

fn asset_id(n: u8) -> String {
    format!("a{n}")
}

/// Apply `op` to the store. Errors are expected outcomes here (duplicate or
/// missing ids) and are reported as `None`.
fn apply(setter: &CollectionSetter<Assets>, op: &Op) -> Option<Commit> {
    let result = match op {
        Op::Prepend(n) => setter.prepend(Asset::new(asset_id(*n), "Tool", 10.0)),
        Op::Remove(n) => setter.remove(&asset_id(*n).into()),
        Op::Reprice(n, price) => setter.edit(&asset_id(*n).into(), |asset: &Asset| Asset {
            monthly_price: f64::from(*price),
            ..asset.clone()
        }),
        Op::Identity => setter.update(Arc::clone),
    };
    result.ok()
}

/// The same edit on the model. Returns whether the model changed.
fn apply_model(model: &mut Vec<(String, f64)>, op: &Op) -> bool {
    match op {
        Op::Prepend(n) => {
            let id = asset_id(*n);
            if model.iter().any(|(existing, _)| *existing == id) {
                return false;
            }
            model.insert(0, (id, 10.0));
            true
        }
        Op::Remove(n) => {
            let id = asset_id(*n);
            let before = model.len();
            model.retain(|(existing, _)| *existing != id);
            model.len() != before
        }
        Op::Reprice(n, price) => {
            let id = asset_id(*n);
            match model.iter_mut().find(|(existing, _)| *existing == id) {
                Some(entry) if entry.1 != f64::from(*price) => {
                    entry.1 = f64::from(*price);
                    true
                }
                _ => false,
            }
        }
        Op::Identity => false,
    }
}

fn slot_ptr<C: Collection>(state: &AppState) -> *const () {
    Arc::as_ptr(state.get::<C>()) as *const ()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn store_matches_model(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let store = Store::from_seed(AppState::default());
        let setter = CollectionSetter::<Assets>::new(store.clone());
        let mut model = Vec::new();
        let mut expected_version = 0u64;

        for op in &ops {
            let changed = apply_model(&mut model, op);
            let commit = apply(&setter, op);

            prop_assert_eq!(commit.map(|c| c.is_changed()).unwrap_or(false), changed);
            if changed {
                expected_version += 1;
            }
            prop_assert_eq!(store.version(), expected_version);
        }

        let actual: Vec<(String, f64)> = store
            .get()
            .get::<Assets>()
            .iter()
            .map(|a| (a.id.to_string(), a.monthly_price))
            .collect();
        prop_assert_eq!(actual, model);
    }

    #[test]
    fn kth_notification_sees_kth_snapshot(ops in prop::collection::vec(op_strategy(), 1..30)) {
        let store = Store::from_seed(AppState::default());
        let observed = Arc::new(Mutex::new(Vec::new()));

        let weak = store.downgrade();
        let log = Arc::clone(&observed);
        let _sub = store.subscribe(move || {
            if let Some(store) = weak.upgrade() {
                log.lock().push(store.get());
            }
        });

        let setter = CollectionSetter::<Assets>::new(store.clone());
        let mut committed = Vec::new();
        for op in &ops {
            if let Some(Commit::Changed { .. }) = apply(&setter, op) {
                committed.push(store.get());
            }
        }

        let observed = observed.lock();
        prop_assert_eq!(observed.len(), committed.len());
        for (seen, expected) in observed.iter().zip(committed.iter()) {
            prop_assert!(Arc::ptr_eq(seen, expected));
        }
    }

    #[test]
    fn other_collections_keep_identity(ops in prop::collection::vec(op_strategy(), 1..30)) {
        let store = Store::from_seed(AppState::default());
        let before = store.get();
        let setter = CollectionSetter::<Assets>::new(store.clone());

        for op in &ops {
            apply(&setter, op);
        }

        let after = store.get();
        prop_assert_eq!(slot_ptr::<Providers>(&before), slot_ptr::<Providers>(&after));
        prop_assert_eq!(slot_ptr::<Settings>(&before), slot_ptr::<Settings>(&after));
        prop_assert_eq!(slot_ptr::<Theme>(&before), slot_ptr::<Theme>(&after));
    }

    #[test]
    fn reader_rerenders_once_per_reference_change(
        ops in prop::collection::vec(op_strategy(), 1..30)
    ) {
        let store = Store::from_seed(AppState::default());
        let reader = CollectionReader::<Assets>::attach(&store, |_| {});
        let setter = CollectionSetter::<Assets>::new(store.clone());

        let mut changes = 0u64;
        for op in &ops {
            let before = Arc::clone(store.get().get::<Assets>());
            let commit = apply(&setter, op);
            let after = Arc::clone(store.get().get::<Assets>());

            // The reference moves exactly when something was committed.
            prop_assert_eq!(!Arc::ptr_eq(&before, &after), commit.map(|c| c.is_changed()).unwrap_or(false));
            if !Arc::ptr_eq(&before, &after) {
                changes += 1;
            }
        }

        prop_assert_eq!(reader.rerender_count(), changes);
    }

    #[test]
    fn unsubscribed_listeners_stay_silent(
        ops in prop::collection::vec(op_strategy(), 1..20),
        cut in 0usize..20,
    ) {
        let store = Store::from_seed(AppState::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut sub = Some(store.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let setter = CollectionSetter::<Assets>::new(store.clone());
        let mut expected = 0;
        for (i, op) in ops.iter().enumerate() {
            if i == cut {
                if let Some(sub) = sub.take() {
                    sub.unsubscribe();
                }
            }
            let changed = apply(&setter, op).map(|c| c.is_changed()).unwrap_or(false);
            if changed && sub.is_some() {
                expected += 1;
            }
        }

        prop_assert_eq!(calls.load(Ordering::SeqCst), expected);
    }
}
