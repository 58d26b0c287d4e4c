//! Dictionary-encoded in-memory triple store.
//!
//! Every node is interned to a `NodeId` (starting at 1, in first-seen order)
//! and each triple is kept in three nested hash indexes:
//!
//! - `spo[subject][predicate] = [object, ...]`
//! - `osp[object][subject] = [predicate, ...]`
//! - `pos[predicate][object] = [subject, ...]`
//!
//! A triple is present iff it appears in all three; a node stays interned iff
//! some index still references it.

use crate::node::{BlankNode, Node, Object, Subject, Triple};
use log::debug;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};

pub type NodeId = u64;

pub(crate) type Index = HashMap<NodeId, HashMap<NodeId, Vec<NodeId>>>;

/// Counts describing the contents of a [`Graph`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub num_nodes: usize,
    pub num_named: usize,
    pub num_blank: usize,
    pub num_literals: usize,
    pub num_subjects: usize,
    pub num_predicates: usize,
    pub num_objects: usize,
    pub num_triples: usize,
    /// Number of triples per predicate IRI.
    pub predicates: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    // named nodes and literals
    ids: HashMap<Node, NodeId>,
    // graph-local blank labels
    blank_ids: HashMap<String, NodeId>,
    nodes: HashMap<NodeId, Node>,
    last_id: NodeId,
    pub(crate) spo: Index,
    pub(crate) osp: Index,
    pub(crate) pos: Index,
    num_triples: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds triples and returns how many were not already present.
    ///
    /// Blank node labels are scoped to this call: the same label names one
    /// node within the call, but never a node from an earlier call.
    pub fn insert<I>(&mut self, triples: I) -> usize
    where
        I: IntoIterator,
        I::Item: Borrow<Triple>,
    {
        let mut scope: HashMap<String, NodeId> = HashMap::new();
        let mut seen = 0usize;
        let mut added = 0usize;
        for triple in triples {
            let triple = triple.borrow();
            seen += 1;
            let s = self.intern(Node::from(triple.subject.clone()), &mut scope);
            let p = self.intern(Node::Named(triple.predicate.clone()), &mut scope);
            let o = self.intern(Node::from(triple.object.clone()), &mut scope);
            if self.add_ids(s, p, o) {
                added += 1;
            }
        }
        debug!("inserted {} of {} triples", added, seen);
        added
    }

    /// Removes ground triples and returns how many were removed. Triples with
    /// a blank subject or object are skipped.
    pub fn delete<I>(&mut self, triples: I) -> usize
    where
        I: IntoIterator,
        I::Item: Borrow<Triple>,
    {
        let mut removed = 0usize;
        for triple in triples {
            let triple = triple.borrow();
            if !triple.is_ground() {
                debug!("skipping delete of non-ground triple {}", triple);
                continue;
            }
            let Some((s, p, o)) = self.triple_ids(triple) else {
                continue;
            };
            if self.remove_ids(s, p, o) {
                removed += 1;
                self.purge(s);
                self.purge(p);
                self.purge(o);
            }
        }
        debug!("deleted {} triples", removed);
        removed
    }

    /// All stored triples, in no particular order.
    pub fn triples(&self) -> Vec<Triple> {
        self.iter().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = Triple> + '_ {
        self.spo.iter().flat_map(move |(&s, by_p)| {
            by_p.iter().flat_map(move |(&p, objects)| {
                objects.iter().filter_map(move |&o| self.build_triple(s, p, o))
            })
        })
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triple_ids(triple)
            .is_some_and(|(s, p, o)| self.has_ids(s, p, o))
    }

    /// Number of distinct interned nodes.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored triples.
    pub fn len(&self) -> usize {
        self.num_triples
    }

    pub fn is_empty(&self) -> bool {
        self.num_triples == 0
    }

    pub fn stats(&self) -> Stats {
        let mut stats = Stats {
            num_nodes: self.nodes.len(),
            num_subjects: self.spo.len(),
            num_predicates: self.pos.len(),
            num_objects: self.osp.len(),
            num_triples: self.num_triples,
            ..Default::default()
        };
        for node in self.nodes.values() {
            match node {
                Node::Named(_) => stats.num_named += 1,
                Node::Blank(_) => stats.num_blank += 1,
                Node::Literal(_) => stats.num_literals += 1,
                Node::Variable(_) => {}
            }
        }
        for (p, by_o) in &self.pos {
            if let Some(Node::Named(iri)) = self.nodes.get(p) {
                let count = by_o.values().map(|subjects| subjects.len()).sum();
                stats.predicates.insert(iri.as_str().to_string(), count);
            }
        }
        stats
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Looks up the id of a node; blank nodes are looked up by the label this
    /// graph assigned to them.
    pub fn id_of(&self, node: &Node) -> Option<NodeId> {
        match node {
            Node::Blank(b) => self.blank_ids.get(b.as_str()).copied(),
            Node::Variable(_) => None,
            other => self.ids.get(other).copied(),
        }
    }

    pub(crate) fn has_ids(&self, s: NodeId, p: NodeId, o: NodeId) -> bool {
        self.spo
            .get(&s)
            .and_then(|by_p| by_p.get(&p))
            .is_some_and(|objects| objects.contains(&o))
    }

    pub(crate) fn build_triple(&self, s: NodeId, p: NodeId, o: NodeId) -> Option<Triple> {
        let subject = Subject::try_from(self.nodes.get(&s)?.clone()).ok()?;
        let predicate = match self.nodes.get(&p)? {
            Node::Named(n) => n.clone(),
            _ => return None,
        };
        let object = Object::try_from(self.nodes.get(&o)?.clone()).ok()?;
        Some(Triple {
            subject,
            predicate,
            object,
        })
    }

    fn triple_ids(&self, triple: &Triple) -> Option<(NodeId, NodeId, NodeId)> {
        let s = self.id_of(&Node::from(triple.subject.clone()))?;
        let p = self.id_of(&Node::Named(triple.predicate.clone()))?;
        let o = self.id_of(&Node::from(triple.object.clone()))?;
        Some((s, p, o))
    }

    fn intern(&mut self, node: Node, scope: &mut HashMap<String, NodeId>) -> NodeId {
        if let Node::Blank(b) = &node {
            if let Some(&id) = scope.get(b.as_str()) {
                return id;
            }
            self.last_id += 1;
            let id = self.last_id;
            let label = format!("b{}", id);
            scope.insert(b.as_str().to_string(), id);
            self.blank_ids.insert(label.clone(), id);
            self.nodes
                .insert(id, Node::Blank(BlankNode::new_unchecked(label)));
            return id;
        }
        if let Some(&id) = self.ids.get(&node) {
            return id;
        }
        self.last_id += 1;
        let id = self.last_id;
        self.ids.insert(node.clone(), id);
        self.nodes.insert(id, node);
        id
    }

    fn add_ids(&mut self, s: NodeId, p: NodeId, o: NodeId) -> bool {
        let objects = self.spo.entry(s).or_default().entry(p).or_default();
        if objects.contains(&o) {
            return false;
        }
        objects.push(o);
        self.osp.entry(o).or_default().entry(s).or_default().push(p);
        self.pos.entry(p).or_default().entry(o).or_default().push(s);
        self.num_triples += 1;
        true
    }

    fn remove_ids(&mut self, s: NodeId, p: NodeId, o: NodeId) -> bool {
        if !remove_from_index(&mut self.spo, s, p, o) {
            return false;
        }
        remove_from_index(&mut self.osp, o, s, p);
        remove_from_index(&mut self.pos, p, o, s);
        self.num_triples -= 1;
        true
    }

    fn purge(&mut self, id: NodeId) {
        if self.spo.contains_key(&id) || self.osp.contains_key(&id) || self.pos.contains_key(&id) {
            return;
        }
        match self.nodes.remove(&id) {
            Some(Node::Blank(b)) => {
                self.blank_ids.remove(b.as_str());
            }
            Some(node) => {
                debug!("purging orphaned node {}", node);
                self.ids.remove(&node);
            }
            None => {}
        }
    }
}

fn remove_from_index(index: &mut Index, a: NodeId, b: NodeId, c: NodeId) -> bool {
    let Some(by_b) = index.get_mut(&a) else {
        return false;
    };
    let Some(values) = by_b.get_mut(&b) else {
        return false;
    };
    let Some(at) = values.iter().position(|&v| v == c) else {
        return false;
    };
    values.swap_remove(at);
    if values.is_empty() {
        by_b.remove(&b);
        if by_b.is_empty() {
            index.remove(&a);
        }
    }
    true
}

impl FromIterator<Triple> for Graph {
    /// Collects into a graph with a single blank node scope.
    fn from_iter<T: IntoIterator<Item = Triple>>(iter: T) -> Self {
        let mut graph = Graph::new();
        graph.insert(iter);
        graph
    }
}
