use listfetch_core::{update, Effect, Epoch, ListState, Msg};
use proptest::prelude::*;

type State = ListState<u8, u8, String>;

#[derive(Debug, Clone)]
enum Op {
    SelectFilter(Option<u8>),
    Reset,
    LoadMore,
    /// Complete the fetch issued `age` fetches ago (0 = most recent).
    Succeed { age: usize, len: usize },
    Fail { age: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        proptest::option::of(0u8..3).prop_map(Op::SelectFilter),
        Just(Op::Reset),
        Just(Op::LoadMore),
        (0usize..3, 0usize..5).prop_map(|(age, len)| Op::Succeed { age, len }),
        (0usize..3).prop_map(|age| Op::Fail { age }),
    ]
}

fn issued_epochs(effects: &[Effect<u8>]) -> Vec<Epoch> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Fetch { epoch, .. } => Some(*epoch),
            Effect::Cancel { .. } => None,
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_successful_load_more_advances_one_page(sizes in proptest::collection::vec(0usize..8, 1..20)) {
        let mut state = State::new();
        let mut expected_len = 0;
        for (n, size) in sizes.into_iter().enumerate() {
            prop_assert!(!state.is_loading());
            let (next, effects) = update(state, Msg::LoadMoreRequested);
            let epochs = issued_epochs(&effects);
            prop_assert_eq!(epochs.len(), 1);
            let (next, _) = update(next, Msg::PageLoaded { epoch: epochs[0], items: vec![0; size] });
            expected_len += size;
            prop_assert_eq!(next.page() as usize, n + 1);
            prop_assert_eq!(next.items().len(), expected_len);
            state = next;
        }
    }

    #[test]
    fn prop_load_more_under_contention_is_noop(prefix in proptest::collection::vec(op(), 0..20)) {
        let mut state = State::new();
        let mut epochs = Vec::new();
        for op in prefix {
            state = apply(state, op, &mut epochs);
        }
        if !state.is_loading() {
            let (next, _) = update(state, Msg::LoadMoreRequested);
            state = next;
        }
        let before = state.clone();
        let (after, effects) = update(state, Msg::LoadMoreRequested);
        prop_assert!(effects.is_empty());
        prop_assert_eq!(after, before);
    }

    #[test]
    fn prop_invariants_hold_across_interleavings(ops in proptest::collection::vec(op(), 0..40)) {
        let mut state = State::new();
        let mut epochs = Vec::new();
        for op in ops {
            let page_before = state.page();
            state = apply(state, op, &mut epochs);

            // Loaded items and a non-zero cursor always go together.
            prop_assert_eq!(state.items().is_loaded(), state.page() > 0);
            prop_assert_eq!(state.is_loading(), state.current_epoch().is_some());
            prop_assert!(state.page() <= page_before + 1);
        }
    }
}

fn apply(state: State, op: Op, epochs: &mut Vec<Epoch>) -> State {
    let (state, effects) = match op {
        Op::SelectFilter(filter) => update(state, Msg::FilterSelected(filter)),
        Op::Reset => update(state, Msg::ResetRequested),
        Op::LoadMore => update(state, Msg::LoadMoreRequested),
        Op::Succeed { age, len } => match epochs.iter().rev().nth(age) {
            Some(epoch) => update(
                state,
                Msg::PageLoaded {
                    epoch: *epoch,
                    items: vec![1; len],
                },
            ),
            None => (state, Vec::new()),
        },
        Op::Fail { age } => match epochs.iter().rev().nth(age) {
            Some(epoch) => update(
                state,
                Msg::PageFailed {
                    epoch: *epoch,
                    error: "boom".to_string(),
                },
            ),
            None => (state, Vec::new()),
        },
    };
    epochs.extend(issued_epochs(&effects));
    state
}
