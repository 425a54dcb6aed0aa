//! Backend Contract Tests
//!
//! Runs the same cache contract against the local map backend and the remote
//! store backend (over an in-memory key-value store with native TTLs).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio_test::{assert_err, assert_ok};

use encache::cache::{
    derive_key, CacheBackend, CacheValue, KeyValueStore, LocalMapBackend, RemoteStoreBackend,
    Signature, ValueKind,
};
use encache::{CacheError, Result};

// == Test Store ==
/// Key-value store that expires keys on read, like a real remote store.
#[derive(Default)]
struct MemoryStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        if ttl.is_zero() {
            entries.remove(key);
        } else {
            entries.insert(key.to_string(), (value, Instant::now() + ttl));
        }
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        if ttl.is_zero() {
            entries.remove(key);
        } else if let Some(entry) = entries.get_mut(key) {
            entry.1 = Instant::now() + ttl;
        }
        Ok(())
    }
}

/// Store whose every call fails, as an unreachable server would.
struct DownStore;

#[async_trait]
impl KeyValueStore for DownStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(CacheError::Store("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<()> {
        Err(CacheError::Store("connection refused".into()))
    }

    async fn expire(&self, _key: &str, _ttl: Duration) -> Result<()> {
        Err(CacheError::Store("connection refused".into()))
    }
}

// == Helpers ==
fn backends() -> Vec<(&'static str, Arc<dyn CacheBackend>)> {
    vec![
        ("local", Arc::new(LocalMapBackend::new()) as Arc<dyn CacheBackend>),
        (
            "remote",
            Arc::new(RemoteStoreBackend::new(MemoryStore::default())) as Arc<dyn CacheBackend>,
        ),
    ]
}

fn result_tuple() -> Vec<CacheValue> {
    vec![
        CacheValue::Int(-7),
        CacheValue::Str("seven".into()),
        CacheValue::Null,
        CacheValue::List(vec![CacheValue::Float(0.5), CacheValue::Float(1.25)]),
    ]
}

fn result_signature() -> Signature {
    Signature::new(vec![
        ValueKind::Int,
        ValueKind::Str,
        ValueKind::Optional(Box::new(ValueKind::Str)),
        ValueKind::List(Box::new(ValueKind::Float)),
    ])
}

// == Contract Tests ==
#[tokio::test]
async fn test_unwritten_key_misses() {
    for (name, backend) in backends() {
        let value = assert_ok!(backend.get("never-written", &result_signature()).await);
        assert!(value.is_none(), "{}: unwritten key should miss", name);
    }
}

#[tokio::test]
async fn test_set_then_get_returns_same_values() {
    for (name, backend) in backends() {
        assert_ok!(backend.set("k", result_tuple(), Duration::from_secs(60)).await);

        let value = backend.get("k", &result_signature()).await.unwrap();
        assert_eq!(value, Some(result_tuple()), "{}: round trip mismatch", name);
    }
}

#[tokio::test]
async fn test_expire_zero_removes_entry() {
    for (name, backend) in backends() {
        backend.set("k", result_tuple(), Duration::from_secs(60)).await.unwrap();
        assert_ok!(backend.expire("k", Duration::ZERO).await);

        let value = backend.get("k", &result_signature()).await.unwrap();
        assert!(value.is_none(), "{}: expired key should miss", name);
    }
}

#[tokio::test]
async fn test_entries_expire_after_ttl() {
    for (name, backend) in backends() {
        backend.set("k", result_tuple(), Duration::from_millis(100)).await.unwrap();
        assert!(backend.get("k", &result_signature()).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(150)).await;

        let value = backend.get("k", &result_signature()).await.unwrap();
        assert!(value.is_none(), "{}: entry should have expired", name);
    }
}

#[tokio::test]
async fn test_expire_extends_lifetime() {
    for (name, backend) in backends() {
        backend.set("k", result_tuple(), Duration::from_millis(50)).await.unwrap();
        backend.expire("k", Duration::from_secs(60)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;

        let value = backend.get("k", &result_signature()).await.unwrap();
        assert_eq!(value, Some(result_tuple()), "{}: expiry should be extended", name);
    }
}

#[tokio::test]
async fn test_serialize_deserialize_roundtrip() {
    for (name, backend) in backends() {
        let text = backend.serialize(&result_tuple()).unwrap();
        let decoded = backend.deserialize(&text, &result_signature()).unwrap();
        assert_eq!(decoded, result_tuple(), "{}: codec mismatch", name);
    }
}

#[tokio::test]
async fn test_memoised_call_flow() {
    for (name, backend) in backends() {
        let mut computed = 0;
        let signature = Signature::new(vec![ValueKind::Int]);

        for _ in 0..3 {
            let key = derive_key("Add", &[CacheValue::Int(1), CacheValue::Int(2)]);
            if backend.get(&key, &signature).await.unwrap().is_none() {
                computed += 1;
                backend
                    .set(&key, vec![CacheValue::Int(3)], Duration::from_secs(60))
                    .await
                    .unwrap();
            }
        }

        assert_eq!(computed, 1, "{}: only the first call should compute", name);

        let other = derive_key("Add", &[CacheValue::Int(2), CacheValue::Int(1)]);
        assert!(backend.get(&other, &signature).await.unwrap().is_none());
    }
}

// == Local Backend ==
#[tokio::test]
async fn test_local_sweep_prunes_table() {
    let backend = LocalMapBackend::new();
    backend
        .set("k", result_tuple(), Duration::from_millis(50))
        .await
        .unwrap();

    let sweep = backend.periodic_expire(Duration::from_millis(20)).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(!backend.contains_key("k").await);
    sweep.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_local_concurrent_sets_keep_every_entry() {
    let backend = LocalMapBackend::new();
    let mut tasks = Vec::new();

    for worker in 0..8 {
        let backend = backend.clone();
        tasks.push(tokio::spawn(async move {
            for i in 0..100 {
                let key = format!("w{}-{}", worker, i);
                backend
                    .set(&key, vec![CacheValue::Int(i)], Duration::from_secs(60))
                    .await
                    .unwrap();
            }
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(backend.len().await, 800);
    let value = backend.get("w3-42", &Signature::default()).await.unwrap();
    assert_eq!(value, Some(vec![CacheValue::Int(42)]));
}

// == Remote Backend ==
#[tokio::test]
async fn test_remote_periodic_expire_is_noop() {
    let backend = RemoteStoreBackend::new(MemoryStore::default());
    assert!(backend.periodic_expire(Duration::from_millis(10)).is_none());
}

#[tokio::test]
async fn test_remote_store_errors_are_returned() {
    let backend = RemoteStoreBackend::new(DownStore);

    assert_err!(backend.get("k", &result_signature()).await);
    assert_err!(backend.set("k", result_tuple(), Duration::from_secs(1)).await);
    assert_err!(backend.expire("k", Duration::from_secs(1)).await);
}

#[tokio::test]
async fn test_remote_signature_mismatch_is_decode_error() {
    let backend = RemoteStoreBackend::new(MemoryStore::default());
    backend.set("k", result_tuple(), Duration::from_secs(60)).await.unwrap();

    let wrong = Signature::new(vec![ValueKind::Str, ValueKind::Str, ValueKind::Any, ValueKind::Any]);
    let result = backend.get("k", &wrong).await;

    assert!(matches!(result, Err(CacheError::Decode(_))));
}
