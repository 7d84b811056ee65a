//! The four fitted artifacts, loaded once and chained into one prediction call.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::classifier::argmax;
use crate::{LabelEncoder, ModelError, Pca, RandomForest, StandardScaler};

pub const CLASSIFIER_FILE: &str = "rf_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";
pub const REDUCER_FILE: &str = "pca.json";

/// Required artifact files, in the order they are loaded.
pub const ARTIFACT_FILES: [&str; 4] = [
    CLASSIFIER_FILE,
    SCALER_FILE,
    LABEL_ENCODER_FILE,
    REDUCER_FILE,
];

/// Scaler, reducer, classifier and label encoder, checked to fit together.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    scaler: StandardScaler,
    pca: Pca,
    forest: RandomForest,
    labels: LabelEncoder,
}

/// Outcome of one prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Encoded class chosen by the classifier.
    pub class_index: i64,
    /// Decoded class name.
    pub label: String,
    /// Probability of the chosen class.
    pub confidence: f64,
    /// Decoded class name and probability for every class.
    pub probabilities: Vec<(String, f64)>,
}

#[derive(Debug, Clone)]
pub struct BundleSummary {
    pub n_features: usize,
    pub n_components: usize,
    pub whiten: bool,
    pub n_trees: usize,
    pub n_nodes: usize,
    pub classes: Vec<String>,
}

impl ModelBundle {
    /// Load all four artifacts from `dir`.
    ///
    /// Fails on the first missing file before reading any of them.
    pub fn load(dir: &Path) -> Result<Self, ModelError> {
        for name in ARTIFACT_FILES {
            let path = dir.join(name);
            if !path.exists() {
                return Err(ModelError::MissingArtifact(path));
            }
        }

        let forest: RandomForest = read_artifact(&dir.join(CLASSIFIER_FILE))?;
        let scaler: StandardScaler = read_artifact(&dir.join(SCALER_FILE))?;
        let labels: LabelEncoder = read_artifact(&dir.join(LABEL_ENCODER_FILE))?;
        let pca: Pca = read_artifact(&dir.join(REDUCER_FILE))?;

        let bundle = Self::from_parts(scaler, pca, forest, labels)?;
        info!(
            dir = %dir.display(),
            n_features = bundle.n_features(),
            n_components = bundle.pca.n_components(),
            n_trees = bundle.forest.estimators.len(),
            n_classes = bundle.labels.len(),
            "loaded model bundle"
        );
        Ok(bundle)
    }

    /// Assemble a bundle from in-memory parts, checking each part and the
    /// widths where they connect.
    pub fn from_parts(
        scaler: StandardScaler,
        pca: Pca,
        forest: RandomForest,
        labels: LabelEncoder,
    ) -> Result<Self, ModelError> {
        scaler.validate()?;
        pca.validate()?;
        forest.validate()?;
        labels.validate()?;

        if scaler.n_features() != pca.n_features() {
            return Err(ModelError::Inconsistent(format!(
                "scaler outputs {} features but pca expects {}",
                scaler.n_features(),
                pca.n_features()
            )));
        }
        if pca.n_components() != forest.n_features() {
            return Err(ModelError::Inconsistent(format!(
                "pca outputs {} components but classifier expects {}",
                pca.n_components(),
                forest.n_features()
            )));
        }
        for &class in &forest.classes {
            labels.inverse_transform(class).map_err(|_| {
                ModelError::Inconsistent(format!(
                    "classifier class {class} has no label (encoder knows {})",
                    labels.len()
                ))
            })?;
        }

        Ok(Self {
            scaler,
            pca,
            forest,
            labels,
        })
    }

    /// Number of gene columns a sample must carry.
    pub fn n_features(&self) -> usize {
        self.scaler.n_features()
    }

    /// Class names the bundle can return, in encoder order.
    pub fn classes(&self) -> &[String] {
        &self.labels.classes
    }

    pub fn summary(&self) -> BundleSummary {
        BundleSummary {
            n_features: self.n_features(),
            n_components: self.pca.n_components(),
            whiten: self.pca.whiten,
            n_trees: self.forest.estimators.len(),
            n_nodes: self
                .forest
                .estimators
                .iter()
                .map(|t| t.node_count())
                .sum(),
            classes: self.labels.classes.clone(),
        }
    }

    /// Scale, project, classify and decode one sample.
    pub fn predict(&self, features: &[f64]) -> Result<Prediction, ModelError> {
        let scaled = self.scaler.transform(features)?;
        let reduced = self.pca.transform(&scaled)?;
        let proba = self.forest.predict_proba(&reduced)?;

        let best = argmax(&proba);
        let class_index = self.forest.classes[best];
        let confidence = proba[best];
        let label = self.labels.inverse_transform(class_index)?.to_string();

        let probabilities = self
            .forest
            .classes
            .iter()
            .zip(&proba)
            .map(|(&class, &p)| Ok((self.labels.inverse_transform(class)?.to_string(), p)))
            .collect::<Result<Vec<_>, ModelError>>()?;

        debug!(label = %label, confidence, "classified sample");
        Ok(Prediction {
            class_index,
            label,
            confidence,
            probabilities,
        })
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let file = File::open(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ModelError::InvalidArtifact {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::DecisionTree;

    fn parts() -> (StandardScaler, Pca, RandomForest, LabelEncoder) {
        let scaler = StandardScaler {
            n_features_in: 3,
            mean: Some(vec![1.0, 1.0, 1.0]),
            scale: Some(vec![2.0, 2.0, 2.0]),
        };
        let pca = Pca {
            n_features_in: 3,
            mean: vec![0.0, 0.0, 0.0],
            components: vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]],
            explained_variance: None,
            whiten: false,
        };
        let forest = RandomForest {
            n_features_in: 2,
            classes: vec![0, 1, 2],
            estimators: vec![
                DecisionTree {
                    children_left: vec![1, -1, 3, -1, -1],
                    children_right: vec![2, -1, 4, -1, -1],
                    feature: vec![0, -2, 1, -2, -2],
                    threshold: vec![0.0, -2.0, 0.0, -2.0, -2.0],
                    value: vec![
                        vec![8.0, 12.0, 10.0],
                        vec![8.0, 2.0, 0.0],
                        vec![0.0, 10.0, 10.0],
                        vec![0.0, 10.0, 0.0],
                        vec![0.0, 0.0, 10.0],
                    ],
                },
                DecisionTree {
                    children_left: vec![1, -1, -1],
                    children_right: vec![2, -1, -1],
                    feature: vec![1, -2, -2],
                    threshold: vec![0.5, -2.0, -2.0],
                    value: vec![vec![5.0, 5.0, 4.0], vec![5.0, 5.0, 0.0], vec![0.0, 0.0, 4.0]],
                },
            ],
        };
        let labels = LabelEncoder {
            classes: vec!["BRCA".into(), "KIRC".into(), "LUAD".into()],
        };
        (scaler, pca, forest, labels)
    }

    fn bundle() -> ModelBundle {
        let (s, p, f, l) = parts();
        ModelBundle::from_parts(s, p, f, l).unwrap()
    }

    fn write_artifacts(dir: &Path) {
        let (s, p, f, l) = parts();
        let write = |name: &str, value: serde_json::Value| {
            std::fs::write(dir.join(name), value.to_string()).unwrap();
        };
        write(SCALER_FILE, serde_json::to_value(&s).unwrap());
        write(REDUCER_FILE, serde_json::to_value(&p).unwrap());
        write(CLASSIFIER_FILE, serde_json::to_value(&f).unwrap());
        write(LABEL_ENCODER_FILE, serde_json::to_value(&l).unwrap());
    }

    #[test]
    fn predict_runs_full_pipeline() {
        let b = bundle();
        // scaled [-1, -0.5, 2] -> reduced [-1, -0.5] -> mean proba [0.65, 0.35, 0]
        let p = b.predict(&[-1.0, 0.0, 5.0]).unwrap();
        assert_eq!(p.label, "BRCA");
        assert_eq!(p.class_index, 0);
        assert!((p.confidence - 0.65).abs() < 1e-12);
        assert_eq!(p.probabilities.len(), 3);
        assert_eq!(p.probabilities[2].0, "LUAD");

        assert_eq!(b.predict(&[3.0, -1.0, 0.0]).unwrap().label, "KIRC");
        let luad = b.predict(&[3.0, 3.0, 0.0]).unwrap();
        assert_eq!(luad.label, "LUAD");
        assert_eq!(luad.confidence, 1.0);
    }

    #[test]
    fn predict_is_deterministic() {
        let b = bundle();
        let x = [0.3, 2.7, -4.0];
        assert_eq!(b.predict(&x).unwrap(), b.predict(&x).unwrap());
    }

    #[test]
    fn predict_rejects_wrong_width() {
        assert!(matches!(
            bundle().predict(&[1.0, 2.0]),
            Err(ModelError::ShapeMismatch { stage: "scaler", .. })
        ));
    }

    #[test]
    fn n_features_comes_from_scaler() {
        let b = bundle();
        assert_eq!(b.n_features(), 3);
        assert_eq!(b.classes(), ["BRCA", "KIRC", "LUAD"]);
        let summary = b.summary();
        assert_eq!(summary.n_components, 2);
        assert_eq!(summary.n_trees, 2);
        assert_eq!(summary.n_nodes, 8);
    }

    #[test]
    fn from_parts_rejects_scaler_pca_mismatch() {
        let (mut s, p, f, l) = parts();
        s.n_features_in = 4;
        s.mean = None;
        s.scale = None;
        let err = ModelBundle::from_parts(s, p, f, l).unwrap_err();
        assert!(err.to_string().contains("pca expects 3"), "{err}");
    }

    #[test]
    fn from_parts_rejects_pca_classifier_mismatch() {
        let (s, mut p, f, l) = parts();
        p.components.push(vec![0.0, 0.0, 1.0]);
        let err = ModelBundle::from_parts(s, p, f, l).unwrap_err();
        assert!(err.to_string().contains("classifier expects 2"), "{err}");
    }

    #[test]
    fn from_parts_rejects_unlabelled_class() {
        let (s, p, f, mut l) = parts();
        l.classes.truncate(2);
        let err = ModelBundle::from_parts(s, p, f, l).unwrap_err();
        assert!(matches!(err, ModelError::Inconsistent(_)));
    }

    #[test]
    fn load_reads_artifact_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());
        let loaded = ModelBundle::load(dir.path()).unwrap();
        assert_eq!(
            loaded.predict(&[-1.0, 0.0, 5.0]).unwrap(),
            bundle().predict(&[-1.0, 0.0, 5.0]).unwrap()
        );
    }

    #[test]
    fn load_fails_on_each_missing_artifact() {
        for missing in ARTIFACT_FILES {
            let dir = tempfile::tempdir().unwrap();
            write_artifacts(dir.path());
            std::fs::remove_file(dir.path().join(missing)).unwrap();

            match ModelBundle::load(dir.path()) {
                Err(ModelError::MissingArtifact(path)) => {
                    assert_eq!(path, dir.path().join(missing));
                }
                other => panic!("expected MissingArtifact for {missing}, got {other:?}"),
            }
        }
    }

    #[test]
    fn load_reports_first_missing_in_load_order() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelBundle::load(dir.path()).unwrap_err();
        let expected: PathBuf = dir.path().join(CLASSIFIER_FILE);
        assert!(matches!(err, ModelError::MissingArtifact(ref p) if *p == expected));
        assert!(err.to_string().contains("rf_model.json"));
    }

    #[test]
    fn load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());
        std::fs::write(dir.path().join(REDUCER_FILE), "{not json").unwrap();
        assert!(matches!(
            ModelBundle::load(dir.path()),
            Err(ModelError::InvalidArtifact { .. })
        ));
    }
}
