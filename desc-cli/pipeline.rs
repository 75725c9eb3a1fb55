use std::path::PathBuf;

use desc_core::{
    ColorImage, DescResult, DescriptorSet, DescriptorSource, DescriptorSpec, DescriptorStore, Keypoint, KeypointStore,
};
use desc_eval::{EvaluationReport, FeatureView, Homography, MatchEvaluator};
use image::RgbImage;
use log::{debug, error, info};
use rayon::prelude::*;

use crate::config::RunConfig;
use crate::draw::draw_matches;
use crate::{color_image_from_rgb, RunError, RunResult};

/// One decoded input image with its keypoints
struct Frame {
    name: String,
    rgb: RgbImage,
    color: ColorImage,
    keypoints: Vec<Keypoint>,
}

/// Outcome of one (image pair, descriptor type) evaluation
#[derive(Debug)]
pub struct UnitReport {
    /// Index of the non-reference image
    pub image_index: usize,
    /// Index into the configured descriptor list
    pub spec_index: usize,
    pub spec: DescriptorSpec,
    pub report_path: PathBuf,
    pub result: RunResult<EvaluationReport>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub units: Vec<UnitReport>,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.units.iter().filter(|u| u.result.is_err()).count()
    }

    /// Error if any unit failed, after every unit has run
    pub fn into_result(self) -> RunResult<Self> {
        match self.failed() {
            0 => Ok(self),
            failed => Err(RunError::UnitsFailed { failed, total: self.units.len() }),
        }
    }
}

/// Wires image loading, descriptor computation and evaluation together for one run
pub struct Pipeline<'s> {
    config: RunConfig,
    specs: Vec<DescriptorSpec>,
    evaluator: MatchEvaluator,
    source: &'s dyn DescriptorSource,
}

impl<'s> Pipeline<'s> {
    pub fn new(config: RunConfig, source: &'s dyn DescriptorSource) -> RunResult<Self> {
        config.validate()?;
        let specs = config.specs()?;
        let evaluator = MatchEvaluator::from_config(config.eval.clone())?;
        Ok(Self { config, specs, evaluator, source })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs every (image pair, descriptor type) evaluation.
    ///
    /// Loading failures abort the run. A failing pair (e.g. an unreadable
    /// homography) is recorded in the summary while the other pairs proceed.
    pub fn run(&self) -> RunResult<RunSummary> {
        info!("{}", self.config.summary());

        let frames = self.load_frames()?;
        info!("loaded {} images with keypoints", frames.len());

        // descriptors[j][i]: spec j, image i
        let descriptors = self
            .specs
            .iter()
            .map(|spec| {
                debug!("computing {} descriptors", spec);
                frames
                    .iter()
                    .map(|f| spec.describe_with(self.source, &f.name, &f.color, &f.keypoints))
                    .collect::<DescResult<Vec<DescriptorSet>>>()
            })
            .collect::<DescResult<Vec<_>>>()?;

        if self.config.save_descriptors {
            self.save_descriptors(&frames, &descriptors)?;
        }

        let homographies: Vec<RunResult<Homography>> = self
            .config
            .homographies
            .iter()
            .map(|file| {
                let path = self.config.resolve(file);
                Homography::from_file(&path).map_err(|e| {
                    error!("cannot use homography {}: {}", path.display(), e);
                    RunError::from(e)
                })
            })
            .collect();

        let units: Vec<(usize, usize)> = (1..frames.len())
            .flat_map(|i| (0..self.specs.len()).map(move |j| (i, j)))
            .collect();

        let output_dir = self.config.output_dir();
        let reports = units
            .into_par_iter()
            .map(|(i, j)| {
                let report_path = output_dir.join(format!("desc_{}_img_{}.txt", j, i));
                let result = match &homographies[i - 1] {
                    Ok(h) => self.evaluate_unit(&frames, &descriptors[j], i, j, h, &report_path),
                    Err(e) => Err(RunError::Config(format!("no usable homography: {}", e))),
                };
                if let Err(e) = &result {
                    error!("{} vs {} with {}: {}", frames[0].name, frames[i].name, self.specs[j], e);
                }
                UnitReport { image_index: i, spec_index: j, spec: self.specs[j], report_path, result }
            })
            .collect();

        Ok(RunSummary { units: reports })
    }

    fn load_frames(&self) -> RunResult<Vec<Frame>> {
        let store = KeypointStore::load_json(self.config.resolve(&self.config.keypoints))?;
        self.config
            .images
            .iter()
            .map(|name| {
                let path = self.config.resolve(name);
                let rgb = image::open(&path)?.to_rgb8();
                let color = color_image_from_rgb(&rgb)?;
                let keypoints = store.require(name)?.clone();
                debug!("{}: {}x{}, {} keypoints", name, rgb.width(), rgb.height(), keypoints.len());
                Ok(Frame { name: name.clone(), rgb, color, keypoints })
            })
            .collect()
    }

    fn save_descriptors(&self, frames: &[Frame], descriptors: &[Vec<DescriptorSet>]) -> RunResult<()> {
        for (j, sets) in descriptors.iter().enumerate() {
            let mut store = DescriptorStore::new();
            for (frame, set) in frames.iter().zip(sets) {
                store.insert(&frame.name, set.clone());
            }
            let path = self.config.resolve(format!("descriptors{}.json", j));
            info!("saving {} descriptors to {}", self.specs[j], path.display());
            store.save_json(&path)?;
        }
        Ok(())
    }

    fn evaluate_unit(
        &self,
        frames: &[Frame],
        sets: &[DescriptorSet],
        i: usize,
        j: usize,
        h: &Homography,
        report_path: &std::path::Path,
    ) -> RunResult<EvaluationReport> {
        let (reference, other) = (&frames[0], &frames[i]);
        let a = FeatureView::new(&reference.keypoints, &sets[0], reference.rgb.width(), reference.rgb.height());
        let b = FeatureView::new(&other.keypoints, &sets[i], other.rgb.width(), other.rgb.height());

        let evaluation = self.evaluator.evaluate(a, b, h)?;
        evaluation.report.save(report_path)?;
        info!(
            "{} vs {} with {}: {} matches, {} in bounds -> {}",
            reference.name,
            other.name,
            self.specs[j],
            evaluation.report.total_matches,
            evaluation.report.in_bounds_keypoints,
            report_path.display()
        );
        for (threshold, precision, recall) in evaluation.report.precision_recall() {
            debug!("  < {:>6}: precision {:?}, recall {:?}", threshold, precision, recall);
        }

        if self.config.draw_matches {
            let overlay = self.evaluator.overlay(&evaluation);
            let canvas = draw_matches(&reference.rgb, &other.rgb, &reference.keypoints, &other.keypoints, &overlay);
            let path = self.config.output_dir().join(format!("matches_desc_{}_img_{}.png", j, i));
            canvas.save(&path)?;
            debug!("drew {} matches to {}", overlay.len(), path.display());
        }

        Ok(evaluation.report)
    }
}
