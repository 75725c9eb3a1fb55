use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::descriptors::DescriptorSet;
use crate::error::{DescError, DescResult};
use crate::Keypoint;

/// Store key for an image file name: the name without its last extension
pub fn image_key(image_name: &str) -> &str {
    match image_name.rfind('.') {
        Some(dot) if dot > 0 => &image_name[..dot],
        _ => image_name,
    }
}

/// Per-image features persisted as one JSON object keyed by image name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureStore<T> {
    entries: BTreeMap<String, T>,
}

pub type KeypointStore = FeatureStore<Vec<Keypoint>>;
pub type DescriptorStore = FeatureStore<DescriptorSet>;

impl<T> Default for FeatureStore<T> {
    fn default() -> Self {
        Self { entries: BTreeMap::new() }
    }
}

impl<T> FeatureStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under the key derived from `image_name`
    pub fn insert(&mut self, image_name: &str, value: T) -> Option<T> {
        self.entries.insert(image_key(image_name).to_string(), value)
    }

    pub fn get(&self, image_name: &str) -> Option<&T> {
        self.entries.get(image_key(image_name))
    }

    /// Like `get`, but a missing entry is an error
    pub fn require(&self, image_name: &str) -> DescResult<&T> {
        self.get(image_name)
            .ok_or_else(|| DescError::MissingEntry(image_key(image_name).to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<T: Serialize + DeserializeOwned> FeatureStore<T> {
    pub fn to_json(&self) -> DescResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DescError::InvalidInput(e.to_string()))
    }

    pub fn from_json(json: &str) -> DescResult<Self> {
        serde_json::from_str(json).map_err(|e| DescError::InvalidInput(e.to_string()))
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> DescResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> DescResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_key() {
        assert_eq!(image_key("img1.ppm"), "img1");
        assert_eq!(image_key("scene.v2.png"), "scene.v2");
        assert_eq!(image_key("noext"), "noext");
        assert_eq!(image_key(".hidden"), ".hidden");
    }

    #[test]
    fn test_keypoint_store_round_trip() {
        let mut store = KeypointStore::new();
        store.insert("img1.ppm", vec![Keypoint::new(1.5, 2.5, 3.0), Keypoint::new(4.0, 5.0, 6.0)]);
        store.insert("img2.ppm", Vec::new());

        let json = store.to_json().unwrap();
        let loaded = KeypointStore::from_json(&json).unwrap();
        assert_eq!(loaded, store);
        assert_eq!(loaded.get("img1.png").map(Vec::len), Some(2));
    }

    #[test]
    fn test_descriptor_store_round_trip_through_file() {
        let mut store = DescriptorStore::new();
        store.insert("a.png", DescriptorSet::from_rows(2, &[[0.5, 1.0], [2.0, 3.0]]).unwrap());

        let path = std::env::temp_dir().join(format!("desc_store_{}.json", std::process::id()));
        store.save_json(&path).unwrap();
        let loaded = DescriptorStore::load_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, store);
    }

    #[test]
    fn test_malformed_descriptor_data_rejected() {
        let json = r#"{ "a": { "dim": 3, "data": [1.0, 2.0] } }"#;
        assert!(matches!(DescriptorStore::from_json(json), Err(DescError::InvalidInput(_))));
    }

    #[test]
    fn test_require_missing_entry() {
        let store = KeypointStore::new();
        assert!(matches!(store.require("img9.ppm"), Err(DescError::MissingEntry(ref k)) if k == "img9"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = KeypointStore::load_json("/nonexistent/dir/kpts.json");
        assert!(matches!(result, Err(DescError::Io(_))));
    }
}
