//! Replays recorded interactions from a cassette.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::format::{Cassette, Interaction};

/// Replayer handle shared between an adapter and whoever inspects it.
pub type SharedReplayer = Arc<Mutex<CassetteReplayer>>;

/// Serves interactions from a loaded cassette, in order, per port/method pair.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), Vec<Interaction>>,
    cursors: HashMap<(String, String), usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push(interaction.clone());
        }
        Self { queues, cursors: HashMap::new() }
    }

    /// Wraps the replayer for sharing with an adapter.
    #[must_use]
    pub fn shared(self) -> SharedReplayer {
        Arc::new(Mutex::new(self))
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the pair. A
    /// replayed run that diverges from its recording must stop loudly.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> &Interaction {
        let key = (port.to_string(), method.to_string());

        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        assert!(
            *cursor < queue.len(),
            "Cassette exhausted: all {count} interactions for port={port:?} method={method:?} \
             have been consumed.",
            count = queue.len(),
        );

        let interaction = &queue[*cursor];
        *cursor += 1;
        interaction
    }

    /// Number of interactions for the pair that have not been served yet.
    #[must_use]
    pub fn remaining(&self, port: &str, method: &str) -> usize {
        let key = (port.to_string(), method.to_string());
        let total = self.queues.get(&key).map_or(0, Vec::len);
        total - self.cursors.get(&key).copied().unwrap_or(0)
    }
}
