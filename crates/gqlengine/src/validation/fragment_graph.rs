use gqlengine_parser::ast;
use indexmap::IndexMap;
use std::collections::HashSet;

/// The directed "spreads" graph between the fragments of one document.
pub(crate) struct FragmentGraph<'a> {
    edges: IndexMap<&'a str, Vec<&'a str>>,
}

impl<'a> FragmentGraph<'a> {
    pub fn new(fragments: &IndexMap<&'a str, &'a ast::FragmentDefinition>) -> Self {
        let edges = fragments
            .iter()
            .map(|(name, fragment)| {
                let mut spreads = vec![];
                collect_spread_names(&fragment.selection_set, &mut spreads);
                (*name, spreads)
            })
            .collect();
        Self { edges }
    }

    /// Spread cycles, each reported once as a path that starts and ends
    /// with the same fragment, rotated so that it starts at the
    /// lexicographically smallest name.
    ///
    /// Each fragment is expanded at most once across all roots, so the walk
    /// stays linear in the size of the graph.
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut walk = CycleWalk::default();
        for name in self.edges.keys() {
            self.check_fragment_cycles(*name, &mut walk);
        }
        walk.cycles
    }

    fn check_fragment_cycles(&self, fragment_name: &'a str, walk: &mut CycleWalk<'a>) {
        if walk.visiting.contains(fragment_name) {
            let start = walk
                .path
                .iter()
                .position(|name| *name == fragment_name)
                .unwrap_or(0);
            let normalized = normalize_cycle(&walk.path[start..]);
            if walk.seen_normalized.insert(normalized.clone()) {
                walk.cycles.push(normalized);
            }
            return;
        }
        if walk.done.contains(fragment_name) {
            return;
        }

        // Undefined fragments are reported where they are spread.
        let Some(spreads) = self.edges.get(fragment_name) else {
            return;
        };

        walk.path.push(fragment_name);
        walk.visiting.insert(fragment_name);
        for spread in spreads {
            self.check_fragment_cycles(*spread, walk);
        }
        walk.path.pop();
        walk.visiting.remove(fragment_name);
        walk.done.insert(fragment_name);
    }

    /// The fragments transitively spread from `roots`.
    pub fn reachable_from(&self, roots: impl IntoIterator<Item = &'a str>) -> HashSet<&'a str> {
        let mut reached = HashSet::new();
        let mut pending: Vec<&'a str> = roots.into_iter().collect();
        while let Some(name) = pending.pop() {
            if !reached.insert(name) {
                continue;
            }
            if let Some(spreads) = self.edges.get(name) {
                pending.extend(spreads.iter().copied());
            }
        }
        reached
    }
}

#[derive(Default)]
struct CycleWalk<'a> {
    path: Vec<&'a str>,
    visiting: HashSet<&'a str>,
    done: HashSet<&'a str>,
    cycles: Vec<Vec<String>>,
    seen_normalized: HashSet<Vec<String>>,
}

/// `[B, C, A]` becomes `[A, B, C, A]`.
fn normalize_cycle(cycle: &[&str]) -> Vec<String> {
    let min_idx = cycle
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    let mut normalized: Vec<String> = cycle[min_idx..]
        .iter()
        .chain(&cycle[..min_idx])
        .map(|name| name.to_string())
        .collect();
    if let Some(first) = normalized.first().cloned() {
        normalized.push(first);
    }
    normalized
}

/// Names of the fragments spread anywhere inside `selection_set`, in
/// document order and without repeats.
pub(crate) fn collect_spread_names<'a>(selection_set: &'a ast::SelectionSet, out: &mut Vec<&'a str>) {
    for selection in &selection_set.items {
        match selection {
            ast::Selection::FragmentSpread(spread) => {
                if !out.contains(&spread.fragment_name.as_str()) {
                    out.push(&spread.fragment_name);
                }
            },
            ast::Selection::InlineFragment(inline) => {
                collect_spread_names(&inline.selection_set, out);
            },
            ast::Selection::Field(field) => {
                if let Some(nested) = &field.selection_set {
                    collect_spread_names(nested, out);
                }
            },
        }
    }
}
