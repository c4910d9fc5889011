//! Topic → resolver registry.

use crate::error::ContainerError;
use crate::traits::DataResolver;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Concurrent registry mapping topic identifier to resolver.
///
/// Written during startup wiring, read continuously by the transport's
/// dispatch path. `RwLock` fits the read-mostly access pattern; resolvers
/// are never added after steady-state traffic begins.
pub struct ResolverContainer {
    resolvers: RwLock<HashMap<String, Arc<dyn DataResolver>>>,
}

impl ResolverContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self {
            resolvers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a resolver under a topic. Fails if the topic is taken; the
    /// existing entry is retained unchanged.
    pub fn add(
        &self,
        topic: impl Into<String>,
        resolver: Arc<dyn DataResolver>,
    ) -> Result<(), ContainerError> {
        let topic = topic.into();
        let mut resolvers = self
            .resolvers
            .write()
            .expect("resolver container lock poisoned");
        if resolvers.contains_key(&topic) {
            return Err(ContainerError::DuplicateTopic(topic));
        }
        resolvers.insert(topic, resolver);
        Ok(())
    }

    /// Register several resolvers from parallel topic/resolver slices.
    ///
    /// Fails before any insertion if the lengths differ. Entries are added
    /// in order and the first duplicate topic aborts the remaining adds;
    /// earlier entries of the same call stay registered.
    pub fn add_multiple(
        &self,
        topics: Vec<String>,
        resolvers: Vec<Arc<dyn DataResolver>>,
    ) -> Result<(), ContainerError> {
        if topics.len() != resolvers.len() {
            return Err(ContainerError::LengthMismatch {
                keys: topics.len(),
                resolvers: resolvers.len(),
            });
        }
        for (topic, resolver) in topics.into_iter().zip(resolvers) {
            self.add(topic, resolver)?;
        }
        Ok(())
    }

    /// Look up the resolver registered for a topic.
    pub fn get(&self, topic: &str) -> Result<Arc<dyn DataResolver>, ContainerError> {
        self.resolvers
            .read()
            .expect("resolver container lock poisoned")
            .get(topic)
            .cloned()
            .ok_or_else(|| ContainerError::TopicNotFound(topic.to_string()))
    }

    /// Remove the resolver registered for a topic.
    pub fn remove(&self, topic: &str) -> Result<(), ContainerError> {
        self.resolvers
            .write()
            .expect("resolver container lock poisoned")
            .remove(topic)
            .map(|_| ())
            .ok_or_else(|| ContainerError::TopicNotFound(topic.to_string()))
    }

    /// Register or overwrite silently.
    pub fn replace(&self, topic: impl Into<String>, resolver: Arc<dyn DataResolver>) {
        self.resolvers
            .write()
            .expect("resolver container lock poisoned")
            .insert(topic.into(), resolver);
    }

    /// Number of registered topics.
    pub fn len(&self) -> usize {
        self.resolvers
            .read()
            .expect("resolver container lock poisoned")
            .len()
    }

    /// Whether any resolver is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResolverContainer {
    fn default() -> Self {
        Self::new()
    }
}
