use std::collections::BTreeMap;
use std::path::Path;

use desc_core::{
    ColorImage, DescError, DescResult, DescriptorKind, DescriptorSet, DescriptorSource, DescriptorStore, Keypoint,
};
use log::info;

/// Descriptor source backed by descriptor stores computed ahead of time, one per base kind
#[derive(Debug, Clone, Default)]
pub struct PrecomputedSource {
    stores: BTreeMap<DescriptorKind, DescriptorStore>,
}

impl PrecomputedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(mut self, kind: DescriptorKind, store: DescriptorStore) -> Self {
        self.stores.insert(kind, store);
        self
    }

    /// Loads every store listed in `paths`
    pub fn load<P: AsRef<Path>>(paths: &BTreeMap<DescriptorKind, P>) -> DescResult<Self> {
        let mut source = Self::new();
        for (&kind, path) in paths {
            let store = DescriptorStore::load_json(path)?;
            info!("loaded {} descriptors for {} images from {}", kind, store.len(), path.as_ref().display());
            source.stores.insert(kind, store);
        }
        Ok(source)
    }

    pub fn kinds(&self) -> impl Iterator<Item = DescriptorKind> + '_ {
        self.stores.keys().copied()
    }
}

impl DescriptorSource for PrecomputedSource {
    fn describe(
        &self,
        name: &str,
        _image: &ColorImage,
        keypoints: &[Keypoint],
        kind: DescriptorKind,
    ) -> DescResult<DescriptorSet> {
        let store = self
            .stores
            .get(&kind)
            .ok_or_else(|| DescError::MissingEntry(format!("descriptor store for {}", kind)))?;
        let set = store.require(name)?;
        if set.len() != keypoints.len() {
            return Err(DescError::DimensionMismatch {
                context: "stored descriptor rows vs keypoints",
                expected: keypoints.len(),
                actual: set.len(),
            });
        }
        Ok(set.clone())
    }
}
