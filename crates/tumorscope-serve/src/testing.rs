//! Fixtures shared by the route and client tests.

use axum::body::Body;
use axum::http::{Request, header};
use tumorscope_core::DEFAULT_FEATURE_COUNT;
use tumorscope_model::{
    DecisionTree, LabelEncoder, ModelBundle, Pca, RandomForest, StandardScaler,
};

const BOUNDARY: &str = "tumorscope-test-boundary";

fn forest() -> RandomForest {
    RandomForest {
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
    }
}

fn labels() -> LabelEncoder {
    LabelEncoder {
        classes: vec!["BRCA".into(), "KIRC".into(), "LUAD".into()],
    }
}

/// Projection onto the first two features of an `n`-wide vector.
fn leading_axes(n: usize) -> Pca {
    let axis = |k: usize| {
        let mut v = vec![0.0; n];
        v[k] = 1.0;
        v
    };
    Pca {
        n_features_in: n,
        mean: vec![0.0; n],
        components: vec![axis(0), axis(1)],
        explained_variance: None,
        whiten: false,
    }
}

/// Three-feature bundle.
///
/// `[-1, 0, 5]` -> BRCA, `[3, -1, 0]` -> KIRC, `[3, 3, 0]` -> LUAD (confidence 1.0).
pub fn toy_bundle() -> ModelBundle {
    let scaler = StandardScaler {
        n_features_in: 3,
        mean: Some(vec![1.0, 1.0, 1.0]),
        scale: Some(vec![2.0, 2.0, 2.0]),
    };
    ModelBundle::from_parts(scaler, leading_axes(3), forest(), labels()).unwrap()
}

/// Bundle as wide as the shipped model.
pub fn wide_bundle() -> ModelBundle {
    let scaler = StandardScaler {
        n_features_in: DEFAULT_FEATURE_COUNT,
        mean: None,
        scale: None,
    };
    ModelBundle::from_parts(
        scaler,
        leading_axes(DEFAULT_FEATURE_COUNT),
        forest(),
        labels(),
    )
    .unwrap()
}

/// Header `id,gene_0,gene_1,...` plus one row of `cells`.
pub fn csv(cells: &[&str]) -> Vec<u8> {
    let mut header = vec!["id".to_string()];
    header.extend((0..cells.len().saturating_sub(1)).map(|i| format!("gene_{i}")));
    format!("{}\n{}\n", header.join(","), cells.join(",")).into_bytes()
}

/// `POST /predict` with one multipart part.
pub fn upload_part(field: &str, file_name: Option<&str>, content: &[u8]) -> Request<Body> {
    let disposition = match file_name {
        Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
        None => format!("form-data; name=\"{field}\""),
    };
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: text/csv\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// `POST /predict` uploading `content` as the `file` field.
pub fn upload(file_name: &str, content: &[u8]) -> Request<Body> {
    upload_part("file", Some(file_name), content)
}
