//! Basic graph pattern evaluation over a [`Graph`].
//!
//! Patterns are split into connected components by shared variable names.
//! Each component is evaluated greedily: the most selective pattern is
//! matched first, the ids it binds restrict every later pattern that mentions
//! the same variable, and patterns touching already-bound variables are
//! promoted ahead of the rest.

use crate::graph::{Graph, NodeId};
use crate::node::{Node, PatternTerm, TriplePattern};
use log::{debug, trace};
use petgraph::unionfind::UnionFind;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

type Bindings = HashMap<String, HashSet<NodeId>>;
type Ids = [NodeId; 3];
type Row = Vec<Option<NodeId>>;

/// Ranks a pattern shape from 1 (most selective) to 8 (fully variable).
///
/// A ground literal object is one step more selective than a ground named or
/// blank object, since nothing can hang off a literal.
pub fn selectivity(subject_var: bool, predicate_var: bool, object_var: bool, object_literal: bool) -> u8 {
    let rank: u8 = match (subject_var, predicate_var, object_var) {
        (false, false, false) => 1,
        (false, true, false) => 2,
        (true, false, false) => 3,
        (false, false, true) => 4,
        (true, true, false) => 5,
        (false, true, true) => 6,
        (true, false, true) => 7,
        (true, true, true) => 8,
    };
    if object_literal && !object_var {
        rank.saturating_sub(1).max(1)
    } else {
        rank
    }
}

impl TriplePattern {
    pub fn selectivity(&self) -> u8 {
        let object_literal = matches!(&self.object, PatternTerm::Term(o) if o.is_literal());
        selectivity(
            self.subject.is_variable(),
            self.predicate.is_variable(),
            self.object.is_variable(),
            object_literal,
        )
    }

    /// Variable name (if any) at subject, predicate and object position.
    fn slot_names(&self) -> [Option<&str>; 3] {
        [
            self.subject.variable().map(|v| v.as_str()),
            self.predicate.variable().map(|v| v.as_str()),
            self.object.variable().map(|v| v.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot<'a> {
    Bound(NodeId),
    Var(&'a str),
}

impl Slot<'_> {
    fn admits(&self, id: NodeId, bindings: &Bindings) -> bool {
        match self {
            Slot::Bound(b) => *b == id,
            Slot::Var(v) => bindings.get(*v).map_or(true, |ids| ids.contains(&id)),
        }
    }
}

/// Resolves ground positions to ids. `None` means some ground node is not in
/// the graph, so the pattern cannot match.
fn resolve<'a>(graph: &Graph, pattern: &'a TriplePattern) -> Option<[Slot<'a>; 3]> {
    let subject = match &pattern.subject {
        PatternTerm::Variable(v) => Slot::Var(v.as_str()),
        PatternTerm::Term(t) => Slot::Bound(graph.id_of(&Node::from(t.clone()))?),
    };
    let predicate = match &pattern.predicate {
        PatternTerm::Variable(v) => Slot::Var(v.as_str()),
        PatternTerm::Term(t) => Slot::Bound(graph.id_of(&Node::Named(t.clone()))?),
    };
    let object = match &pattern.object {
        PatternTerm::Variable(v) => Slot::Var(v.as_str()),
        PatternTerm::Term(t) => Slot::Bound(graph.id_of(&Node::from(t.clone()))?),
    };
    Some([subject, predicate, object])
}

fn match_slots(graph: &Graph, slots: &[Slot<'_>; 3], bindings: &Bindings) -> Vec<Ids> {
    let [s, p, o] = *slots;
    let mut out = Vec::new();
    match (s, p, o) {
        (Slot::Bound(s), Slot::Bound(p), Slot::Bound(o)) => {
            if graph.has_ids(s, p, o) {
                out.push([s, p, o]);
            }
        }
        (_, _, Slot::Bound(oid)) => {
            if let Some(by_s) = graph.osp.get(&oid) {
                for (&sid, preds) in by_s {
                    if !s.admits(sid, bindings) {
                        continue;
                    }
                    for &pid in preds {
                        if p.admits(pid, bindings) {
                            out.push([sid, pid, oid]);
                        }
                    }
                }
            }
        }
        (Slot::Var(_), Slot::Bound(pid), Slot::Var(_)) => {
            if let Some(by_o) = graph.pos.get(&pid) {
                for (&oid, subjects) in by_o {
                    if !o.admits(oid, bindings) {
                        continue;
                    }
                    for &sid in subjects {
                        if s.admits(sid, bindings) {
                            out.push([sid, pid, oid]);
                        }
                    }
                }
            }
        }
        _ => {
            let seeds: Vec<NodeId> = match s {
                Slot::Bound(sid) => vec![sid],
                Slot::Var(v) => match bindings.get(v) {
                    Some(ids) => ids.iter().copied().collect(),
                    None => graph.spo.keys().copied().collect(),
                },
            };
            for sid in seeds {
                let Some(by_p) = graph.spo.get(&sid) else {
                    continue;
                };
                for (&pid, objects) in by_p {
                    if !p.admits(pid, bindings) {
                        continue;
                    }
                    for &oid in objects {
                        if o.admits(oid, bindings) {
                            out.push([sid, pid, oid]);
                        }
                    }
                }
            }
        }
    }
    // a variable repeated within one pattern must take the same value
    out.retain(|ids| consistent(slots, ids));
    out
}

fn consistent(slots: &[Slot<'_>; 3], ids: &Ids) -> bool {
    for i in 0..3 {
        for j in (i + 1)..3 {
            if let (Slot::Var(a), Slot::Var(b)) = (slots[i], slots[j]) {
                if a == b && ids[i] != ids[j] {
                    return false;
                }
            }
        }
    }
    true
}

/// Splits patterns into groups that transitively share variable names,
/// keeping groups and their members in input order.
fn group_patterns(patterns: &[TriplePattern]) -> Vec<Vec<&TriplePattern>> {
    let mut sets = UnionFind::<usize>::new(patterns.len());
    let mut first_use: HashMap<&str, usize> = HashMap::new();
    for (i, pattern) in patterns.iter().enumerate() {
        for var in pattern.variables() {
            match first_use.entry(var.as_str()) {
                Entry::Occupied(e) => {
                    sets.union(*e.get(), i);
                }
                Entry::Vacant(e) => {
                    e.insert(i);
                }
            }
        }
    }
    let mut groups: Vec<Vec<&TriplePattern>> = Vec::new();
    let mut group_of: HashMap<usize, usize> = HashMap::new();
    for (i, label) in sets.into_labeling().into_iter().enumerate() {
        let g = *group_of.entry(label).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[g].push(&patterns[i]);
    }
    groups
}

/// Matched triple ids per pattern, in the order the patterns were evaluated.
type GroupMatches<'p> = Vec<(&'p TriplePattern, Vec<Ids>)>;

fn evaluate_group<'p>(graph: &Graph, mut remaining: Vec<&'p TriplePattern>) -> GroupMatches<'p> {
    remaining.sort_by_key(|p| p.selectivity());
    let mut bindings = Bindings::new();
    let mut matched: GroupMatches<'p> = Vec::new();
    while !remaining.is_empty() {
        let pattern = remaining.remove(0);
        let rows = match resolve(graph, pattern) {
            Some(slots) => match_slots(graph, &slots, &bindings),
            None => Vec::new(),
        };
        trace!("pattern {} matched {} triples", pattern, rows.len());

        let mut observed: HashMap<&str, HashSet<NodeId>> = HashMap::new();
        for (pos, name) in pattern.slot_names().into_iter().enumerate() {
            if let Some(name) = name {
                observed
                    .entry(name)
                    .or_default()
                    .extend(rows.iter().map(|ids| ids[pos]));
            }
        }
        for (name, ids) in observed {
            bindings.insert(name.to_string(), ids);
        }
        matched.push((pattern, rows));

        remaining.sort_by_key(|p| {
            let touches_bound = p.variables().any(|v| bindings.contains_key(v.as_str()));
            (!touches_bound, p.selectivity())
        });
    }
    // drop matches whose variables were narrowed away by later patterns
    for (pattern, rows) in &mut matched {
        let names = pattern.slot_names();
        rows.retain(|ids| {
            names.iter().zip(ids.iter()).all(|(name, id)| match name {
                Some(name) => bindings.get(*name).map_or(true, |set| set.contains(id)),
                None => true,
            })
        });
    }
    matched
}

fn evaluate<'p>(graph: &Graph, patterns: &'p [TriplePattern]) -> Vec<GroupMatches<'p>> {
    let groups = group_patterns(patterns);
    debug!(
        "evaluating {} patterns in {} groups",
        patterns.len(),
        groups.len()
    );
    groups
        .into_iter()
        .map(|group| evaluate_group(graph, group))
        .collect()
}

type Solution<'p> = HashMap<&'p str, NodeId>;

/// Joins the matches of one group into complete solutions: every variable
/// of the group is bound, and repeated variables agree across patterns.
fn join_group<'p>(group: &[(&'p TriplePattern, Vec<Ids>)]) -> Vec<Solution<'p>> {
    let mut solutions = vec![Solution::new()];
    for &(pattern, ref rows) in group {
        let names = pattern.slot_names();
        let mut next = Vec::new();
        for solution in &solutions {
            for ids in rows {
                if let Some(extended) = extend(solution, &names, ids) {
                    next.push(extended);
                }
            }
        }
        trace!("{} solutions after {}", next.len(), pattern);
        solutions = next;
        if solutions.is_empty() {
            break;
        }
    }
    solutions
}

fn extend<'p>(solution: &Solution<'p>, names: &[Option<&'p str>; 3], ids: &Ids) -> Option<Solution<'p>> {
    let mut out = solution.clone();
    for (name, &id) in names.iter().zip(ids.iter()) {
        let Some(name) = *name else {
            continue;
        };
        match out.entry(name) {
            Entry::Occupied(e) if *e.get() != id => return None,
            Entry::Occupied(_) => {}
            Entry::Vacant(e) => {
                e.insert(id);
            }
        }
    }
    Some(out)
}

impl Graph {
    /// Returns the sub-graph of triples matched by `patterns`.
    #[doc(alias = "where")]
    pub fn construct(&self, patterns: &[TriplePattern]) -> Graph {
        let mut result = Graph::new();
        if patterns.is_empty() {
            return result;
        }
        let triples: Vec<_> = evaluate(self, patterns)
            .into_iter()
            .flatten()
            .flat_map(|(_, rows)| rows)
            .filter_map(|[s, p, o]| self.build_triple(s, p, o))
            .collect();
        // one insert keeps blank nodes shared between matched triples
        result.insert(&triples);
        result
    }

    /// Returns one row per solution, holding the values bound to `vars` in
    /// the order given.
    ///
    /// Within a group, partial rows are merged only with rows that agree on
    /// every shared variable, projected or not. Groups share no variables, so
    /// their rows combine pairwise. A group without any solution empties the
    /// result, as does a variable that no pattern mentions. Duplicate rows are
    /// removed.
    pub fn select(&self, vars: &[&str], patterns: &[TriplePattern]) -> Vec<Vec<Node>> {
        if patterns.is_empty() || vars.is_empty() {
            return Vec::new();
        }
        if let Some(missing) = vars
            .iter()
            .find(|v| !patterns.iter().any(|p| p.has_variable(v)))
        {
            debug!("?{} does not occur in any pattern", missing);
            return Vec::new();
        }
        let mut rows: Vec<Row> = vec![vec![None; vars.len()]];
        for group in evaluate(self, patterns) {
            let mut seen = HashSet::new();
            let projected: Vec<Row> = join_group(&group)
                .iter()
                .map(|solution| {
                    vars.iter()
                        .map(|v| solution.get(*v).copied())
                        .collect::<Row>()
                })
                .filter(|row: &Row| seen.insert(row.clone()))
                .collect();
            rows = merge_rows(&rows, &projected);
            if rows.is_empty() {
                break;
            }
        }
        rows.into_iter()
            .filter_map(|row| {
                row.into_iter()
                    .map(|id| id.and_then(|id| self.node(id).cloned()))
                    .collect::<Option<Vec<Node>>>()
            })
            .collect()
    }
}

/// Fills the gaps of every left row from every right row. The two sides bind
/// disjoint columns.
fn merge_rows(left: &[Row], right: &[Row]) -> Vec<Row> {
    let mut out = Vec::with_capacity(left.len() * right.len());
    for l in left {
        for r in right {
            out.push(l.iter().zip(r.iter()).map(|(a, b)| a.or(*b)).collect());
        }
    }
    out
}
