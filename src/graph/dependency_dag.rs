use crate::schedule::Schedule;
use crate::task::TaskId;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Directed graph of the schedule's links, parent -> child.
///
/// The propagation engine does not need it; it exists to explain a stalled
/// schedule by naming the link cycles in it. Containment is not modelled, so
/// a group linked to one of its own descendants is not reported here.
pub struct DependencyDag {
    graph: DiGraph<TaskId, ()>,
}

impl DependencyDag {
    pub fn build(schedule: &Schedule) -> Self {
        let mut graph: DiGraph<TaskId, ()> = DiGraph::new();
        let mut id_to_index: HashMap<TaskId, NodeIndex> = HashMap::new();

        for (id, _) in schedule.tasks() {
            let node_ix = graph.add_node(id);
            id_to_index.insert(id, node_ix);
        }

        for link in schedule.links() {
            if let (Some(&u), Some(&v)) =
                (id_to_index.get(&link.parent), id_to_index.get(&link.child))
            {
                graph.add_edge(u, v, ());
            }
        }

        Self { graph }
    }

    /// Strongly connected components that form a cycle, including tasks
    /// linked to themselves. Members of each cycle are in task order.
    pub fn cycles(&self) -> Vec<Vec<TaskId>> {
        let mut cycles: Vec<Vec<TaskId>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .map(|component| {
                let mut ids: Vec<TaskId> = component.iter().map(|&ix| self.graph[ix]).collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }
}

/// Labels of every dependency cycle in `schedule`.
pub fn dependency_cycles(schedule: &Schedule) -> Vec<Vec<String>> {
    DependencyDag::build(schedule)
        .cycles()
        .into_iter()
        .map(|cycle| {
            cycle
                .into_iter()
                .map(|id| schedule.task(id).label.clone())
                .collect()
        })
        .collect()
}
