//! Property-based tests for route tables and transition behavior.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use futures::executor::block_on;
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use waymark::{Fsm, FsmError, Route, Routes, State};

const STATE_NAMES: [&str; 4] = ["s0", "s1", "s2", "s3"];
const OP_NAMES: [&str; 5] = ["op0", "op1", "op2", "op3", "op4"];

prop_compose! {
    fn arbitrary_state_name()(idx in 0..STATE_NAMES.len()) -> String {
        STATE_NAMES[idx].to_string()
    }
}

prop_compose! {
    fn arbitrary_op_name()(idx in 0..OP_NAMES.len()) -> String {
        OP_NAMES[idx].to_string()
    }
}

fn arbitrary_route_entries() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((arbitrary_op_name(), arbitrary_state_name()), 0..8)
}

/// A machine over the fixed name alphabet, with every state registered so no
/// route dangles. Each state gets its own generated table of direct routes.
fn arbitrary_machine() -> impl Strategy<Value = Arc<Fsm<String, String>>> {
    prop::collection::vec(arbitrary_route_entries(), STATE_NAMES.len()).prop_map(|tables| {
        let mut builder = Fsm::builder();
        for (name, entries) in STATE_NAMES.iter().zip(tables) {
            let mut state = State::new(name.to_string());
            for (op, to) in entries {
                state = state.route(op, Route::direct(to));
            }
            builder = builder.state(state);
        }
        Arc::new(builder.build())
    })
}

proptest! {
    #[test]
    fn insert_keeps_one_entry_per_op(entries in arbitrary_route_entries()) {
        let mut table: Routes<String, String> = Routes::new();
        for (op, to) in &entries {
            table.insert(op.clone(), Route::direct(to.clone()));
        }

        let unique: HashSet<_> = entries.iter().map(|(op, _)| op.clone()).collect();
        prop_assert_eq!(table.len(), unique.len());
    }

    #[test]
    fn insert_is_last_write_wins(entries in arbitrary_route_entries()) {
        let mut table: Routes<String, String> = Routes::new();
        for (op, to) in &entries {
            table.insert(op.clone(), Route::direct(to.clone()));
        }

        for (op, route) in table.iter() {
            let last = entries.iter().rev().find(|(candidate, _)| candidate == op);
            let (_, expected) = last.expect("table entries only come from the input");
            prop_assert_eq!(route.target(), expected);
        }
    }

    #[test]
    fn insert_preserves_first_occurrence_order(entries in arbitrary_route_entries()) {
        let mut table: Routes<String, String> = Routes::new();
        for (op, to) in &entries {
            table.insert(op.clone(), Route::direct(to.clone()));
        }

        let mut seen = HashSet::new();
        let first_occurrence: Vec<_> = entries
            .iter()
            .filter(|(op, _)| seen.insert(op.clone()))
            .map(|(op, _)| op.clone())
            .collect();
        let table_order: Vec<_> = table.iter().map(|(op, _)| op.clone()).collect();
        prop_assert_eq!(table_order, first_occurrence);
    }

    #[test]
    fn unguarded_get_ops_matches_the_route_table(fsm in arbitrary_machine()) {
        let instance = Arc::clone(&fsm).create_instance().unwrap();
        let ops = block_on(instance.get_ops()).unwrap();

        let state = fsm.state(instance.state_name()).expect("cursor is registered");
        let expected: Vec<_> = state.routes().iter().map(|(op, _)| op.clone()).collect();
        prop_assert_eq!(ops, expected);
    }

    #[test]
    fn random_walks_stay_on_registered_states(
        fsm in arbitrary_machine(),
        walk in prop::collection::vec(arbitrary_op_name(), 0..12),
    ) {
        let mut instance = Arc::clone(&fsm).create_instance().unwrap();

        for op in &walk {
            let before = instance.state_name().clone();
            match block_on(instance.perform(op)) {
                Ok(_) => {
                    prop_assert!(fsm.state(instance.state_name()).is_some());
                }
                Err(FsmError::InvalidOperation { .. }) => {
                    // A rejected operation never moves the cursor.
                    prop_assert_eq!(instance.state_name(), &before);
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }
    }

    #[test]
    fn unguarded_relevant_states_mirror_the_table(fsm in arbitrary_machine()) {
        let instance = Arc::clone(&fsm).create_instance().unwrap();
        let relevant = block_on(instance.get_relevant_states());

        let mut operable = HashSet::new();
        let mut reachable = HashSet::new();
        for state in fsm.states() {
            if !state.routes().is_empty() {
                operable.insert(state.name().clone());
            }
            for (_, route) in state.routes().iter() {
                reachable.insert(route.target().clone());
            }
        }

        prop_assert_eq!(&relevant.operable, &operable);
        prop_assert_eq!(&relevant.reachable, &reachable);
    }

    #[test]
    fn repeated_queries_are_deterministic(fsm in arbitrary_machine()) {
        let instance = Arc::clone(&fsm).create_instance().unwrap();

        let ops_first = block_on(instance.get_ops()).unwrap();
        let ops_second = block_on(instance.get_ops()).unwrap();
        prop_assert_eq!(ops_first, ops_second);

        let relevant_first = block_on(instance.get_relevant_states());
        let relevant_second = block_on(instance.get_relevant_states());
        prop_assert_eq!(relevant_first.operable, relevant_second.operable);
        prop_assert_eq!(relevant_first.reachable, relevant_second.reachable);
    }
}
