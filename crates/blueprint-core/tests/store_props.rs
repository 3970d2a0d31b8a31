//! Property tests over the store's tree invariants.

use std::collections::HashSet;

use blueprint_core::model::task;
use blueprint_core::{BlueprintStore, MemoryBackend, PhaseId, StoreConfig};
use proptest::prelude::*;

/// One store mutation, with targets picked by index into the current id
/// list so shrunk cases stay meaningful.
#[derive(Debug, Clone)]
enum Op {
    AddTask(u8),
    AddSubtask(u8),
    Toggle(u8),
    Rename(u8),
    Notes(u8),
    Delete(u8),
    DeleteSubtask(u8),
    Reorder(u8, u8, u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::AddTask),
        any::<u8>().prop_map(Op::AddSubtask),
        any::<u8>().prop_map(Op::Toggle),
        any::<u8>().prop_map(Op::Rename),
        any::<u8>().prop_map(Op::Notes),
        any::<u8>().prop_map(Op::Delete),
        any::<u8>().prop_map(Op::DeleteSubtask),
        (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(p, a, b)| Op::Reorder(p, a, b)),
    ]
}

fn seeded_store() -> BlueprintStore<MemoryBackend> {
    let mut store = BlueprintStore::new(MemoryBackend::new(), StoreConfig::default());
    store.load();
    store
}

fn all_task_ids(store: &BlueprintStore<MemoryBackend>) -> Vec<String> {
    let mut ids = Vec::new();
    if let Some(project) = store.active_project() {
        for phase in &project.blueprint.phases {
            task::collect_ids(&phase.tasks, &mut ids);
        }
    }
    ids
}

fn pick(ids: &[String], index: u8) -> String {
    if ids.is_empty() {
        return "no-such-id".to_string();
    }
    ids[usize::from(index) % ids.len()].clone()
}

fn phase(index: u8) -> PhaseId {
    PhaseId::ALL[usize::from(index) % PhaseId::ALL.len()]
}

fn apply(store: &mut BlueprintStore<MemoryBackend>, op: &Op) {
    let ids = all_task_ids(store);
    match op {
        Op::AddTask(p) => {
            let _ = store.add_task(phase(*p), None);
        }
        Op::AddSubtask(i) => {
            let _ = store.add_subtask(&pick(&ids, *i), None);
        }
        Op::Toggle(i) => {
            store.toggle_task(&pick(&ids, *i));
        }
        Op::Rename(i) => {
            store.rename_task(&pick(&ids, *i), "renamed");
        }
        Op::Notes(i) => {
            store.update_notes(&pick(&ids, *i), "note");
        }
        Op::Delete(i) => {
            store.delete_task(&pick(&ids, *i));
        }
        Op::DeleteSubtask(i) => {
            store.delete_subtask(&pick(&ids, *i));
        }
        Op::Reorder(p, a, b) => {
            let phase = phase(*p);
            store.reorder_tasks(phase, &pick(&ids, *a), &pick(&ids, *b));
        }
    }
}

proptest! {
    /// No mutator sequence ever introduces a duplicate id anywhere in the
    /// forest.
    #[test]
    fn mutator_sequences_preserve_id_uniqueness(
        ops in proptest::collection::vec(op_strategy(), 1..48)
    ) {
        let mut store = seeded_store();
        for op in &ops {
            apply(&mut store, op);
            let ids = all_task_ids(&store);
            let unique: HashSet<&String> = ids.iter().collect();
            prop_assert_eq!(unique.len(), ids.len(), "duplicate id after {:?}", op);
        }
    }

    /// Toggling the same node twice restores the exact prior tree.
    #[test]
    fn toggle_twice_restores_the_tree(index in any::<u8>()) {
        let mut store = seeded_store();
        let ids = all_task_ids(&store);
        let target = pick(&ids, index);

        let before = store.active_project().expect("active").blueprint.phases.clone();
        prop_assert!(store.toggle_task(&target));
        prop_assert!(store.toggle_task(&target));
        let after = store.active_project().expect("active").blueprint.phases.clone();
        prop_assert_eq!(before, after);
    }

    /// Reordering is a permutation: same ids, same multiset, only order moves.
    #[test]
    fn reorder_never_loses_or_duplicates_tasks(
        p in any::<u8>(), a in any::<u8>(), b in any::<u8>()
    ) {
        let mut store = seeded_store();
        let phase_id = phase(p);
        let before: HashSet<String> = all_task_ids(&store).into_iter().collect();

        let top: Vec<String> = store
            .active_project()
            .expect("active")
            .blueprint
            .phase(phase_id)
            .expect("phase")
            .tasks
            .iter()
            .map(|t| t.id.clone())
            .collect();
        store.reorder_tasks(phase_id, &pick(&top, a), &pick(&top, b));

        let after: HashSet<String> = all_task_ids(&store).into_iter().collect();
        prop_assert_eq!(before, after);
    }
}
