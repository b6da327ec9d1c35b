//! Structs waiting on other structs.
//!
//! Every module owns a [`WaitingRequestMap`] holding the requests filed
//! against the structs it declares. When one of them resolves, the
//! requests waiting on it are taken out and their fields patched.

use std::collections::HashMap;

use super::ty::TyId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitingKind {
    /// A struct field embeds another struct by value
    StructField,
}

/// A struct that cannot compute its layout until another struct has
/// resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitingRequest {
    pub kind: WaitingKind,
    /// Field of `to_fill` to patch with the resolved type
    pub field_idx: usize,
    pub to_fill: TyId,
    pub to_fill_mod: usize,
    pub waiting_for: TyId,
    pub waiting_for_mod: usize,
}

/// Pending requests of one module, keyed by the name of the struct they
/// wait for.
///
/// Requests for the same name are kept in the order they were added.
#[derive(Debug, Default)]
pub struct WaitingRequestMap {
    requests: Vec<Vec<WaitingRequest>>,
    index: HashMap<String, usize>,
}

impl WaitingRequestMap {
    pub fn new() -> Self {
        WaitingRequestMap::default()
    }

    pub fn add(&mut self, name: &str, request: WaitingRequest) {
        tracing::debug!("adding request for '{}'", name);

        let bucket = match self.index.get(name) {
            Some(&bucket) => bucket,
            None => {
                self.requests.push(vec![]);
                self.index.insert(name.to_string(), self.requests.len() - 1);
                self.requests.len() - 1
            }
        };

        self.requests[bucket].push(request);
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> &[WaitingRequest] {
        match self.index.get(name) {
            Some(&bucket) => &self.requests[bucket],
            None => &[],
        }
    }

    /// Removes and returns the requests waiting for `name` that are waiting
    /// on the type `ty`, oldest first.
    ///
    /// Struct declarations inside function bodies may reuse the name of a
    /// module level struct, so a bucket can hold requests for several types.
    pub fn take(&mut self, name: &str, ty: TyId) -> Vec<WaitingRequest> {
        let Some(&bucket) = self.index.get(name) else {
            return vec![];
        };

        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.requests[bucket])
            .into_iter()
            .partition(|request| request.waiting_for == ty);
        self.requests[bucket] = kept;
        taken
    }

    /// Number of requests still pending.
    pub fn len(&self) -> usize {
        self.requests.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
