//! Test doubles for the runner layer.

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::Runner;

/// Runner that records every command for later assertions.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub masked: Mutex<Vec<String>>,
    pub warnings: Mutex<Vec<String>>,
    pub outputs: Mutex<BTreeMap<String, String>>,
    pub failures: Mutex<Vec<String>>,
    pub debug: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn masked(&self) -> Vec<String> {
        self.masked.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn output(&self, name: &str) -> Option<String> {
        self.outputs.lock().unwrap().get(name).cloned()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }
}

impl Runner for RecordingRunner {
    fn mask(&self, secret: &str) {
        self.masked.lock().unwrap().push(secret.to_string());
    }

    fn warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    fn set_output(&self, name: &str, value: &str) -> std::io::Result<()> {
        self.outputs
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_failed(&self, message: &str) {
        self.failures.lock().unwrap().push(message.to_string());
    }

    fn is_debug(&self) -> bool {
        self.debug
    }
}
