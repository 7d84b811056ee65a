//! Inference pipeline over pre-fitted artifacts: scaling, PCA projection,
//! random-forest classification, label decoding.

mod bundle;
mod classifier;
mod error;
mod labels;
mod pca;
mod scaler;

pub use bundle::{
    ARTIFACT_FILES, BundleSummary, CLASSIFIER_FILE, LABEL_ENCODER_FILE, ModelBundle, Prediction,
    REDUCER_FILE, SCALER_FILE,
};
pub use classifier::{DecisionTree, RandomForest, TREE_LEAF};
pub use error::ModelError;
pub use labels::LabelEncoder;
pub use pca::Pca;
pub use scaler::StandardScaler;
