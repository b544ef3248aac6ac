//! Variable cache — bidirectional name ↔ id bookkeeping for one entity kind.
//!
//! Names are partitioned into *user-defined* (written in the script) and
//! *auto-generated* (synthesized for anonymous elements). The two
//! partitions are disjoint by construction and can be snapshotted
//! independently or combined.

use hashbrown::HashMap;

/// Outcome of [`VariableCache::resolve_or_create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<Id> {
    /// The bound name: the user's, or the synthesized one.
    pub name: String,
    pub id: Id,
    /// True iff a fresh id was allocated by this call.
    pub created: bool,
}

/// Per-kind variable cache.
#[derive(Debug, Clone)]
pub struct VariableCache<Id> {
    /// Prefix for synthesized names, e.g. `"__v"`.
    prefix: &'static str,
    user: HashMap<String, Id>,
    auto: HashMap<String, Id>,
    next_auto: u64,
}

impl<Id: Copy> VariableCache<Id> {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            user: HashMap::new(),
            auto: HashMap::new(),
            next_auto: 0,
        }
    }

    /// Look up a name in either partition.
    pub fn get(&self, name: &str) -> Option<Id> {
        self.user.get(name).or_else(|| self.auto.get(name)).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.user.contains_key(name) || self.auto.contains_key(name)
    }

    /// Resolve `name` to its bound id, allocating via `alloc` when unbound.
    /// An absent name always allocates, under a synthesized unique name.
    pub fn resolve_or_create(
        &mut self,
        name: Option<&str>,
        alloc: impl FnOnce() -> Id,
    ) -> Resolution<Id> {
        match name {
            Some(n) => {
                if let Some(id) = self.get(n) {
                    Resolution { name: n.to_owned(), id, created: false }
                } else {
                    let id = alloc();
                    self.user.insert(n.to_owned(), id);
                    Resolution { name: n.to_owned(), id, created: true }
                }
            }
            None => {
                // Synthesized names must not collide with user names that
                // happen to look auto-generated.
                let name = loop {
                    let candidate = format!("{}{}", self.prefix, self.next_auto);
                    self.next_auto += 1;
                    if !self.contains(&candidate) {
                        break candidate;
                    }
                };
                let id = alloc();
                self.auto.insert(name.clone(), id);
                Resolution { name, id, created: true }
            }
        }
    }

    /// Snapshot of name → id, filtered by partition. The returned map is
    /// independent of later cache mutation.
    pub fn snapshot(
        &self,
        include_user_defined: bool,
        include_auto_generated: bool,
    ) -> std::collections::HashMap<String, Id> {
        let mut out = std::collections::HashMap::new();
        if include_user_defined {
            out.extend(self.user.iter().map(|(k, v)| (k.clone(), *v)));
        }
        if include_auto_generated {
            out.extend(self.auto.iter().map(|(k, v)| (k.clone(), *v)));
        }
        out
    }
}
