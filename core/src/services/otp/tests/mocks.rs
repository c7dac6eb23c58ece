//! Mock implementations for testing the OTP challenge workflow

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use crate::services::otp::traits::{ChallengeStore, CounterStore, SmsDispatcher};

// Mock counter store backed by in-memory maps
#[derive(Default)]
pub struct MockCounterStore {
    counters: Mutex<HashMap<String, i64>>,
    flags: Mutex<HashSet<String>>,
    sets: Mutex<HashMap<String, HashSet<String>>>,
    ttls: Mutex<HashMap<String, u64>>,
    failing: AtomicBool,
}

impl MockCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn count(&self, key: &str) -> i64 {
        self.counters.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.counters.lock().unwrap().contains_key(key)
            || self.flags.lock().unwrap().contains(key)
            || self.sets.lock().unwrap().contains_key(key)
    }

    fn check_failing(&self) -> Result<(), String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("Counter store error".to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl CounterStore for MockCounterStore {
    async fn increment_with_window(&self, key: &str, window_seconds: u64) -> Result<i64, String> {
        self.check_failing()?;
        let mut counters = self.counters.lock().unwrap();
        let count = counters.entry(key.to_string()).or_insert(0);
        *count += 1;
        self.ttls
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_insert(window_seconds);
        Ok(*count)
    }

    async fn set_flag(&self, key: &str, ttl_seconds: u64) -> Result<(), String> {
        self.check_failing()?;
        self.flags.lock().unwrap().insert(key.to_string());
        self.ttls.lock().unwrap().insert(key.to_string(), ttl_seconds);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, String> {
        self.check_failing()?;
        Ok(self.contains(key))
    }

    async fn ttl_seconds(&self, key: &str) -> Result<Option<i64>, String> {
        self.check_failing()?;
        Ok(self.ttls.lock().unwrap().get(key).map(|ttl| *ttl as i64))
    }

    async fn delete(&self, key: &str) -> Result<(), String> {
        self.check_failing()?;
        self.counters.lock().unwrap().remove(key);
        self.flags.lock().unwrap().remove(key);
        self.sets.lock().unwrap().remove(key);
        self.ttls.lock().unwrap().remove(key);
        Ok(())
    }

    async fn add_to_window_set(
        &self,
        key: &str,
        member: &str,
        window_seconds: u64,
    ) -> Result<i64, String> {
        self.check_failing()?;
        let mut sets = self.sets.lock().unwrap();
        let set = sets.entry(key.to_string()).or_default();
        set.insert(member.to_string());
        self.ttls
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_insert(window_seconds);
        Ok(set.len() as i64)
    }
}

// Mock challenge store backed by an in-memory map
#[derive(Default)]
pub struct MockChallengeStore {
    entries: Mutex<HashMap<String, String>>,
    ttls: Mutex<HashMap<String, u64>>,
    failing: AtomicBool,
}

impl MockChallengeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn ttl_of(&self, key: &str) -> Option<u64> {
        self.ttls.lock().unwrap().get(key).copied()
    }
}

#[async_trait]
impl ChallengeStore for MockChallengeStore {
    async fn put(&self, key: &str, code_hash: &str, ttl_seconds: u64) -> Result<(), String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("Challenge store error".to_string());
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), code_hash.to_string());
        self.ttls.lock().unwrap().insert(key.to_string(), ttl_seconds);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("Challenge store error".to_string());
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("Challenge store error".to_string());
        }
        self.entries.lock().unwrap().remove(key);
        self.ttls.lock().unwrap().remove(key);
        Ok(())
    }
}

// Mock SMS dispatcher that records sent codes
#[derive(Default)]
pub struct MockSmsDispatcher {
    sent: Mutex<Vec<(String, String)>>,
    next_id: AtomicU64,
    failing: AtomicBool,
}

impl MockSmsDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn last_code(&self, phone: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == phone)
            .map(|(_, code)| code.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl SmsDispatcher for MockSmsDispatcher {
    async fn send_otp_sms(&self, phone: &str, code: &str) -> Result<String, String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("SMS provider unavailable".to_string());
        }
        self.sent
            .lock()
            .unwrap()
            .push((phone.to_string(), code.to_string()));
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(format!("mock-msg-{}", id))
    }
}
