//! Process-wide registries of named engine and algorithm factories (C7/C8's
//! plugin contract).
//!
//! Populated either programmatically (embedding/testing) or by
//! `loader::load_plugin_library`. Registration from a single library load
//! is atomic: an incomplete entry is rolled back rather than left half
//! populated, mirroring the original's `BadRegistrationException` +
//! `removeLast()` pattern.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use crate::algorithms::{PlayerFactory, TankAlgorithmFactory};
use crate::engine::EngineFactory;
use crate::errors::PluginError;

#[derive(Clone)]
pub struct AlgorithmEntry {
    pub name: String,
    pub player_factory: PlayerFactory,
    pub algorithm_factory: TankAlgorithmFactory,
}

#[derive(Clone)]
pub struct EngineEntry {
    pub name: String,
    pub factory: EngineFactory,
}

#[derive(Default)]
struct RegistryState {
    algorithms: Vec<AlgorithmEntry>,
    engines: Vec<EngineEntry>,
}

fn state() -> &'static Mutex<RegistryState> {
    static STATE: OnceLock<Mutex<RegistryState>> = OnceLock::new();
    STATE.get_or_init(|| Mutex::new(RegistryState::default()))
}

/// Handed to a loading plugin; records entries so an incomplete
/// registration can be rolled back without touching entries already
/// committed by earlier, successful loads.
pub struct RegistrationBatch {
    algorithms_before: usize,
    engines_before: usize,
}

impl RegistrationBatch {
    fn begin() -> Self {
        let guard = state().lock().unwrap();
        RegistrationBatch {
            algorithms_before: guard.algorithms.len(),
            engines_before: guard.engines.len(),
        }
    }

    pub fn register_algorithm(&self, name: &str, player_factory: PlayerFactory, algorithm_factory: TankAlgorithmFactory) {
        state().lock().unwrap().algorithms.push(AlgorithmEntry {
            name: name.to_string(),
            player_factory,
            algorithm_factory,
        });
    }

    pub fn register_engine(&self, name: &str, factory: EngineFactory) {
        state().lock().unwrap().engines.push(EngineEntry { name: name.to_string(), factory });
    }

    /// Roll back every entry pushed since `begin()`. Used when a plugin's
    /// registration call leaves a half-built entry (e.g. panics partway).
    fn rollback(&self) {
        let mut guard = state().lock().unwrap();
        guard.algorithms.truncate(self.algorithms_before);
        guard.engines.truncate(self.engines_before);
    }
}

/// Run `register` in a fresh batch, rolling back everything it added if it
/// returns an error or leaves no entries behind at all (an "incomplete"
/// registration per the plugin contract).
pub fn with_batch(
    path: &str,
    register: impl FnOnce(&RegistrationBatch) -> Result<(), String>,
) -> Result<(), PluginError> {
    let batch = RegistrationBatch::begin();
    match register(&batch) {
        Ok(()) => {
            let added = {
                let guard = state().lock().unwrap();
                (guard.algorithms.len() - batch.algorithms_before) + (guard.engines.len() - batch.engines_before)
            };
            if added == 0 {
                batch.rollback();
                Err(PluginError::IncompleteRegistration {
                    path: path.to_string(),
                    reason: "no factories registered".to_string(),
                })
            } else {
                Ok(())
            }
        }
        Err(reason) => {
            batch.rollback();
            Err(PluginError::IncompleteRegistration { path: path.to_string(), reason })
        }
    }
}

/// Register a reference algorithm directly, for embedding/testing without
/// any dynamic loading (design notes §9).
pub fn register_algorithm(name: &str, player_factory: PlayerFactory, algorithm_factory: TankAlgorithmFactory) {
    state().lock().unwrap().algorithms.push(AlgorithmEntry {
        name: name.to_string(),
        player_factory,
        algorithm_factory,
    });
}

/// Register an engine factory directly, for embedding/testing.
pub fn register_engine(name: &str, factory: EngineFactory) {
    state().lock().unwrap().engines.push(EngineEntry { name: name.to_string(), factory });
}

pub fn find_algorithm(name: &str) -> Result<AlgorithmEntry, PluginError> {
    state()
        .lock()
        .unwrap()
        .algorithms
        .iter()
        .find(|e| e.name == name)
        .cloned()
        .ok_or_else(|| PluginError::UnknownFactory { name: name.to_string() })
}

pub fn find_engine(name: &str) -> Result<EngineEntry, PluginError> {
    state()
        .lock()
        .unwrap()
        .engines
        .iter()
        .find(|e| e.name == name)
        .cloned()
        .ok_or_else(|| PluginError::UnknownFactory { name: name.to_string() })
}

pub fn algorithm_names() -> Vec<String> {
    state().lock().unwrap().algorithms.iter().map(|e| e.name.clone()).collect()
}

pub fn engine_names() -> Vec<String> {
    state().lock().unwrap().engines.iter().map(|e| e.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{DoNothingAlgorithm, StandardPlayer};
    use crate::engine::StandardEngine;

    fn player_factory() -> Box<dyn crate::algorithms::Player> {
        Box::new(StandardPlayer)
    }

    fn algo_factory(
        _player_id: u32,
        _tank_index: usize,
        _position: crate::geometry::Point,
        _heading: crate::geometry::Direction,
        _shells: u32,
    ) -> Box<dyn crate::algorithms::TankAlgorithm> {
        Box::new(DoNothingAlgorithm)
    }

    #[test]
    fn registers_and_finds_an_algorithm_by_name() {
        register_algorithm("test-registry-do-nothing", player_factory, algo_factory);
        assert!(find_algorithm("test-registry-do-nothing").is_ok());
    }

    #[test]
    fn unknown_name_is_a_plugin_error() {
        assert!(find_algorithm("test-registry-does-not-exist").is_err());
    }

    #[test]
    fn incomplete_batch_is_rolled_back() {
        let before = algorithm_names().len();
        let result = with_batch("test-registry-incomplete.so", |_batch| Err("bad library".to_string()));
        assert!(result.is_err());
        assert_eq!(algorithm_names().len(), before);
    }

    #[test]
    fn successful_batch_commits_its_entries() {
        let name = "test-registry-batch-engine";
        let result = with_batch("test-registry-ok.so", |batch| {
            batch.register_engine(name, StandardEngine::factory);
            Ok(())
        });
        assert!(result.is_ok());
        assert!(find_engine(name).is_ok());
    }
}
