use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use desc_core::{DescriptorKind, DescriptorSpec};
use desc_eval::EvalConfig;
use serde::{Deserialize, Serialize};

use crate::{RunError, RunResult};

/// Everything one evaluation run needs, read once and passed down immutably.
///
/// The first image is the reference; `homographies[i]` maps it onto
/// `images[i + 1]`. Relative paths are resolved against `image_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub image_dir: PathBuf,
    pub images: Vec<String>,
    /// Descriptor codes, e.g. `"SIFT"` or `"SIFT+OPSIFT"`
    pub descriptors: Vec<String>,
    pub homographies: Vec<String>,
    /// Keypoint store (JSON) shared by all descriptor types
    pub keypoints: PathBuf,
    /// Descriptor store (JSON) per base descriptor code
    #[serde(default)]
    pub descriptor_stores: BTreeMap<String, PathBuf>,
    /// Where reports and drawings go; defaults to `image_dir`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub save_descriptors: bool,
    #[serde(default)]
    pub draw_matches: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    #[serde(default)]
    pub eval: EvalConfig,
}

impl RunConfig {
    pub fn load_toml<P: AsRef<Path>>(path: P) -> RunResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(toml_str: &str) -> RunResult<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> RunResult<String> {
        toml::to_string_pretty(self).map_err(|e| RunError::Config(e.to_string()))
    }

    pub fn validate(&self) -> RunResult<()> {
        if self.images.len() < 2 {
            return Err(RunError::Config(format!(
                "need a reference image and at least one other image, got {}",
                self.images.len()
            )));
        }
        if self.homographies.len() != self.images.len() - 1 {
            return Err(RunError::Config(format!(
                "expected {} homography files (one per non-reference image), got {}",
                self.images.len() - 1,
                self.homographies.len()
            )));
        }
        if self.descriptors.is_empty() {
            return Err(RunError::Config("no descriptor types requested".to_string()));
        }
        if self.threads == Some(0) {
            return Err(RunError::Config("threads must be at least 1".to_string()));
        }
        self.specs()?;
        self.store_paths()?;
        self.eval.validate()?;
        Ok(())
    }

    /// Parsed descriptor types; an unknown code is an error, never a default
    pub fn specs(&self) -> RunResult<Vec<DescriptorSpec>> {
        Ok(self
            .descriptors
            .iter()
            .map(|code| DescriptorSpec::parse(code))
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Descriptor store paths keyed by base kind, resolved against `image_dir`
    pub fn store_paths(&self) -> RunResult<BTreeMap<DescriptorKind, PathBuf>> {
        self.descriptor_stores
            .iter()
            .map(|(code, path)| Ok((DescriptorKind::parse(code)?, self.resolve(path))))
            .collect()
    }

    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.image_dir.join(path)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| self.image_dir.clone())
    }

    pub fn threads(&self) -> usize {
        self.threads.unwrap_or_else(desc_core::default_threads)
    }

    pub fn summary(&self) -> String {
        format!(
            "RunConfig: {} images in {}, descriptors=[{}], draw={}, save={}",
            self.images.len(),
            self.image_dir.display(),
            self.descriptors.join(", "),
            self.draw_matches,
            self.save_descriptors
        )
    }
}
