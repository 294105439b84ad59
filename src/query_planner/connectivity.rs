//! Variable-sharing connectivity over a triple sequence.
//!
//! Two triples are adjacent when their subject/object positions share a
//! variable. Join synthesis only terminates if every triple is reachable
//! from triple 0, so this is checked up front with a union-find.

use std::collections::HashMap;

use super::{errors::PatternDefect, types::Triple};

/// Union-find over triple indices with path compression and union-by-rank.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new(size: usize) -> Self {
        DisjointSet {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Returns `true` if a merge happened.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return false;
        }

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Less => self.parent[root_x] = root_y,
            std::cmp::Ordering::Greater => self.parent[root_y] = root_x,
            std::cmp::Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] += 1;
            }
        }
        true
    }

    pub fn same(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }
}

/// Fails with the index of the first triple not connected to triple 0.
pub fn check_connected(triples: &[Triple]) -> Result<(), PatternDefect> {
    let mut components = DisjointSet::new(triples.len());
    let mut first_seen: HashMap<&str, usize> = HashMap::new();

    for (index, triple) in triples.iter().enumerate() {
        for variable in [&triple.subject, &triple.object]
            .into_iter()
            .filter_map(|term| term.as_variable())
        {
            match first_seen.get(variable) {
                Some(&other) => {
                    components.union(other, index);
                }
                None => {
                    first_seen.insert(variable, index);
                }
            }
        }
    }

    match (1..triples.len()).find(|&index| !components.same(0, index)) {
        Some(index) => Err(PatternDefect::Disconnected(index)),
        None => Ok(()),
    }
}
