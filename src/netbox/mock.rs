//! In-memory [`NetboxApi`] implementation for tests.
//!
//! Stores objects per endpoint, assigns primary keys, and mirrors the API
//! semantics the engine relies on: 404 as `None`/`false`, filter matching
//! on list, and PATCH merging.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::error::ProviderError;
use crate::netbox::NetboxApi;

/// In-memory object store keyed by endpoint and primary key.
#[derive(Default)]
pub struct MockNetbox {
    inner: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    objects: HashMap<String, BTreeMap<i64, Value>>,
    next_id: i64,
}

impl MockNetbox {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object directly, returning its assigned id.
    pub fn seed(&self, endpoint: &str, mut object: Value) -> i64 {
        let mut state = self.inner.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        if let Some(map) = object.as_object_mut() {
            map.insert("id".to_string(), json!(id));
            if !map.contains_key("display") {
                if let Some(name) = map.get("name").cloned() {
                    map.insert("display".to_string(), name);
                }
            }
        }
        state
            .objects
            .entry(endpoint.to_string())
            .or_default()
            .insert(id, object);
        id
    }

    /// Number of objects stored under an endpoint.
    pub fn count(&self, endpoint: &str) -> usize {
        let state = self.inner.lock().unwrap();
        state.objects.get(endpoint).map_or(0, |m| m.len())
    }

    /// Remove an object directly, simulating an out-of-band deletion.
    pub fn remove(&self, endpoint: &str, id: i64) -> bool {
        let mut state = self.inner.lock().unwrap();
        state
            .objects
            .get_mut(endpoint)
            .and_then(|m| m.remove(&id))
            .is_some()
    }

    /// Fetch a stored object without going through the API trait.
    pub fn stored(&self, endpoint: &str, id: i64) -> Option<Value> {
        let state = self.inner.lock().unwrap();
        state.objects.get(endpoint).and_then(|m| m.get(&id)).cloned()
    }
}

fn field_matches(field: Option<&Value>, want: &str) -> bool {
    match field {
        Some(Value::String(s)) => s == want,
        Some(Value::Number(n)) => n.to_string() == want,
        Some(Value::Bool(b)) => b.to_string() == want,
        // Nested reference objects match on slug, name, or id
        Some(Value::Object(obj)) => ["slug", "name", "id", "value"]
            .iter()
            .any(|k| field_matches(obj.get(*k), want)),
        _ => false,
    }
}

#[async_trait::async_trait]
impl NetboxApi for MockNetbox {
    async fn get(&self, endpoint: &str, id: i64) -> Result<Option<Value>, ProviderError> {
        let state = self.inner.lock().unwrap();
        Ok(state.objects.get(endpoint).and_then(|m| m.get(&id)).cloned())
    }

    async fn list(
        &self,
        endpoint: &str,
        filters: &[(String, String)],
    ) -> Result<Vec<Value>, ProviderError> {
        let state = self.inner.lock().unwrap();
        let Some(collection) = state.objects.get(endpoint) else {
            return Ok(vec![]);
        };
        Ok(collection
            .values()
            .filter(|obj| {
                filters
                    .iter()
                    .all(|(key, want)| field_matches(obj.get(key), want))
            })
            .cloned()
            .collect())
    }

    async fn create(&self, endpoint: &str, payload: &Value) -> Result<Value, ProviderError> {
        let id = self.seed(endpoint, payload.clone());
        Ok(self.stored(endpoint, id).unwrap_or(Value::Null))
    }

    async fn update(
        &self,
        endpoint: &str,
        id: i64,
        payload: &Value,
    ) -> Result<Value, ProviderError> {
        let mut state = self.inner.lock().unwrap();
        let object = state
            .objects
            .get_mut(endpoint)
            .and_then(|m| m.get_mut(&id))
            .ok_or_else(|| ProviderError::NotFound(format!("{}/{}", endpoint, id)))?;

        if let (Some(target), Some(changes)) = (object.as_object_mut(), payload.as_object()) {
            for (key, value) in changes {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(object.clone())
    }

    async fn delete(&self, endpoint: &str, id: i64) -> Result<bool, ProviderError> {
        let mut state = self.inner.lock().unwrap();
        Ok(state
            .objects
            .get_mut(endpoint)
            .and_then(|m| m.remove(&id))
            .is_some())
    }

    async fn status(&self) -> Result<Value, ProviderError> {
        Ok(json!({"netbox-version": "4.1.0"}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let mock = MockNetbox::new();
        let a = mock
            .create("dcim/sites", &json!({"name": "One", "slug": "one"}))
            .await
            .unwrap();
        let b = mock
            .create("dcim/sites", &json!({"name": "Two", "slug": "two"}))
            .await
            .unwrap();
        assert_ne!(a["id"], b["id"]);
        assert_eq!(a["display"], "One");
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let mock = MockNetbox::new();
        assert!(mock.get("dcim/sites", 99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let mock = MockNetbox::new();
        mock.seed("dcim/sites", json!({"name": "One", "slug": "one"}));
        mock.seed("dcim/sites", json!({"name": "Two", "slug": "two"}));

        let all = mock.list("dcim/sites", &[]).await.unwrap();
        assert_eq!(all.len(), 2);

        let filtered = mock
            .list("dcim/sites", &[("slug".to_string(), "two".to_string())])
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0]["name"], "Two");
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let mock = MockNetbox::new();
        let id = mock.seed("dcim/sites", json!({"name": "One", "slug": "one"}));

        let updated = mock
            .update("dcim/sites", id, &json!({"description": "updated"}))
            .await
            .unwrap();
        assert_eq!(updated["name"], "One");
        assert_eq!(updated["description"], "updated");
    }

    #[tokio::test]
    async fn test_delete_idempotent() {
        let mock = MockNetbox::new();
        let id = mock.seed("dcim/sites", json!({"name": "One", "slug": "one"}));

        assert!(mock.delete("dcim/sites", id).await.unwrap());
        assert!(!mock.delete("dcim/sites", id).await.unwrap());
    }

    #[tokio::test]
    async fn test_filter_matches_nested_object() {
        let mock = MockNetbox::new();
        mock.seed(
            "ipam/vlans",
            json!({"name": "V100", "site": {"id": 3, "slug": "one"}}),
        );

        let by_site = mock
            .list("ipam/vlans", &[("site".to_string(), "one".to_string())])
            .await
            .unwrap();
        assert_eq!(by_site.len(), 1);
    }
}
