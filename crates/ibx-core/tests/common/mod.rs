//! Test doubles and common utilities for bridge contract tests
//!
//! `MockRemoteClient` keeps objects in memory the way the remote API would,
//! counts calls per operation, records payloads, and can be told to fail.

#![allow(dead_code)]

use ibx_core::error::{Error, Result};
use ibx_core::traits::RemoteClient;
use ibx_core::{REF_FIELD, RemoteObject};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Operations the mock can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Create,
    Read,
    Update,
    Delete,
}

/// An in-memory remote client that tracks calls
pub struct MockRemoteClient {
    /// Stored objects by reference (without `_ref`)
    objects: Arc<Mutex<HashMap<String, Map<String, Value>>>>,
    create_calls: Arc<AtomicUsize>,
    read_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
    /// Objects passed to create(), in call order
    created: Arc<Mutex<Vec<(String, RemoteObject)>>>,
    /// Objects passed to update(), in call order
    updated: Arc<Mutex<Vec<(String, RemoteObject)>>>,
    /// Field lists passed to read(), in call order
    read_fields: Arc<Mutex<Vec<Vec<String>>>>,
    /// Reference handed out by the next create()
    next_reference: Arc<Mutex<Option<String>>>,
    /// Reference handed out by the next update()
    next_update_reference: Arc<Mutex<Option<String>>>,
    fail_create: Arc<AtomicBool>,
    fail_read: Arc<AtomicBool>,
    fail_update: Arc<AtomicBool>,
    fail_delete: Arc<AtomicBool>,
}

impl MockRemoteClient {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            create_calls: Arc::new(AtomicUsize::new(0)),
            read_calls: Arc::new(AtomicUsize::new(0)),
            update_calls: Arc::new(AtomicUsize::new(0)),
            delete_calls: Arc::new(AtomicUsize::new(0)),
            created: Arc::new(Mutex::new(Vec::new())),
            updated: Arc::new(Mutex::new(Vec::new())),
            read_fields: Arc::new(Mutex::new(Vec::new())),
            next_reference: Arc::new(Mutex::new(None)),
            next_update_reference: Arc::new(Mutex::new(None)),
            fail_create: Arc::new(AtomicBool::new(false)),
            fail_read: Arc::new(AtomicBool::new(false)),
            fail_update: Arc::new(AtomicBool::new(false)),
            fail_delete: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a new MockRemoteClient that shares state with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            objects: Arc::clone(&other.objects),
            create_calls: Arc::clone(&other.create_calls),
            read_calls: Arc::clone(&other.read_calls),
            update_calls: Arc::clone(&other.update_calls),
            delete_calls: Arc::clone(&other.delete_calls),
            created: Arc::clone(&other.created),
            updated: Arc::clone(&other.updated),
            read_fields: Arc::clone(&other.read_fields),
            next_reference: Arc::clone(&other.next_reference),
            next_update_reference: Arc::clone(&other.next_update_reference),
            fail_create: Arc::clone(&other.fail_create),
            fail_read: Arc::clone(&other.fail_read),
            fail_update: Arc::clone(&other.fail_update),
            fail_delete: Arc::clone(&other.fail_delete),
        }
    }

    /// Store an object as if it already existed remotely
    pub fn seed(&self, reference: &str, object: Value) {
        let Value::Object(fields) = object else {
            panic!("seeded objects must be JSON objects");
        };
        self.objects
            .lock()
            .unwrap()
            .insert(reference.to_string(), fields);
    }

    /// Fields stored for `reference`
    pub fn stored(&self, reference: &str) -> Option<Map<String, Value>> {
        self.objects.lock().unwrap().get(reference).cloned()
    }

    pub fn set_next_reference(&self, reference: &str) {
        *self.next_reference.lock().unwrap() = Some(reference.to_string());
    }

    pub fn set_next_update_reference(&self, reference: &str) {
        *self.next_update_reference.lock().unwrap() = Some(reference.to_string());
    }

    pub fn fail(&self, op: Op, fail: bool) {
        let flag = match op {
            Op::Create => &self.fail_create,
            Op::Read => &self.fail_read,
            Op::Update => &self.fail_update,
            Op::Delete => &self.fail_delete,
        };
        flag.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self, op: Op) -> usize {
        let counter = match op {
            Op::Create => &self.create_calls,
            Op::Read => &self.read_calls,
            Op::Update => &self.update_calls,
            Op::Delete => &self.delete_calls,
        };
        counter.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<(String, RemoteObject)> {
        self.created.lock().unwrap().clone()
    }

    pub fn updated(&self) -> Vec<(String, RemoteObject)> {
        self.updated.lock().unwrap().clone()
    }

    pub fn read_fields(&self) -> Vec<Vec<String>> {
        self.read_fields.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RemoteClient for MockRemoteClient {
    async fn create(&self, object_type: &str, object: &RemoteObject) -> Result<String> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.created
            .lock()
            .unwrap()
            .push((object_type.to_string(), object.clone()));

        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Error::remote("mock", "AdmConDataError: create rejected"));
        }

        let reference = self
            .next_reference
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| format!("{}/ref{}", object_type, n));

        self.objects
            .lock()
            .unwrap()
            .insert(reference.clone(), object.as_map().clone());
        Ok(reference)
    }

    async fn read(&self, reference: &str, fields: &[String]) -> Result<RemoteObject> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        self.read_fields.lock().unwrap().push(fields.to_vec());

        if self.fail_read.load(Ordering::SeqCst) {
            return Err(Error::remote("mock", "read failed"));
        }

        let objects = self.objects.lock().unwrap();
        let stored = objects
            .get(reference)
            .ok_or_else(|| Error::not_found(reference.to_string()))?;

        // Only the requested fields come back, plus the reference
        let mut object = RemoteObject::new().with_field(REF_FIELD, Value::String(reference.to_string()));
        for field in fields {
            if let Some(value) = stored.get(field) {
                object.insert(field.clone(), value.clone());
            }
        }
        Ok(object)
    }

    async fn update(&self, reference: &str, object: &RemoteObject) -> Result<String> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.updated
            .lock()
            .unwrap()
            .push((reference.to_string(), object.clone()));

        if self.fail_update.load(Ordering::SeqCst) {
            return Err(Error::remote("mock", "update rejected"));
        }

        let mut objects = self.objects.lock().unwrap();
        let mut stored = objects
            .remove(reference)
            .ok_or_else(|| Error::not_found(reference.to_string()))?;
        for (key, value) in object.iter() {
            stored.insert(key.clone(), value.clone());
        }

        let new_reference = self
            .next_update_reference
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| reference.to_string());
        objects.insert(new_reference.clone(), stored);
        Ok(new_reference)
    }

    async fn delete(&self, reference: &str) -> Result<String> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Error::remote("mock", "delete rejected"));
        }

        self.objects
            .lock()
            .unwrap()
            .remove(reference)
            .ok_or_else(|| Error::not_found(reference.to_string()))?;
        Ok(reference.to_string())
    }

    fn client_name(&self) -> &'static str {
        "mock"
    }
}

/// Engine over a mock that shares state with the returned handle
pub fn engine_with_mock() -> (ibx_core::CrudEngine, MockRemoteClient) {
    let mock = MockRemoteClient::new();
    let engine = ibx_core::CrudEngine::new(Box::new(MockRemoteClient::sharing_state_with(&mock)));
    (engine, mock)
}
