use super::graph::ModuleGraph;

/// Orders the modules of `graph` by how many imports they declare, fewest
/// first.
///
/// The type checker memoizes modules and checks imports on demand, so any
/// order yields the same result. Ties keep the order the modules were added
/// in.
pub fn compilation_order(graph: &ModuleGraph) -> Vec<usize> {
    let mut order: Vec<usize> = (0..graph.len()).collect();

    order.sort_unstable_by_key(|&idx| {
        let imports = graph.get(idx).map_or(0, |module| module.num_imports());
        (imports, idx)
    });

    tracing::debug!(?order, "compilation order");
    order
}
