use crate::operation::OperationDefinition;
use ahash::AHashMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// A read-only lookup from operation name to definition.
///
/// The host owns the table; the evaluator only reads from it, so any map (or a
/// custom registry) can be handed in per call.
pub trait OperationTable<R> {
    fn operation(&self, name: &str) -> Option<&OperationDefinition<R>>;
}

impl<R, S: BuildHasher> OperationTable<R> for HashMap<String, OperationDefinition<R>, S> {
    fn operation(&self, name: &str) -> Option<&OperationDefinition<R>> {
        self.get(name)
    }
}

impl<R> OperationTable<R> for AHashMap<String, OperationDefinition<R>> {
    fn operation(&self, name: &str) -> Option<&OperationDefinition<R>> {
        self.get(name)
    }
}

impl<R> OperationTable<R> for BTreeMap<String, OperationDefinition<R>> {
    fn operation(&self, name: &str) -> Option<&OperationDefinition<R>> {
        self.get(name)
    }
}
