//! Parsing of single-sample expression uploads.
//!
//! An upload is a CSV with a header and exactly one data row. The first
//! column is an opaque sample identifier; every other column is one gene's
//! expression value, in the order the model was fitted on. Only the column
//! count is checked, never the names.

use std::io::Cursor;
use std::sync::Arc;

use arrow::array::{Array, AsArray, StringArray};
use arrow::compute::kernels::cast::{CastOptions, cast_with_options};
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use tracing::debug;

use crate::SampleError;
use crate::schema::upload;

/// One parsed sample: identifier plus the ordered feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedSample {
    /// Value of the first column, `None` when the cell is empty.
    pub sample_id: Option<String>,
    pub features: Vec<f64>,
}

impl UploadedSample {
    /// Parse and validate an uploaded CSV.
    ///
    /// Checks run in a fixed order so the first failing one is reported:
    /// header present, well-formed rows, at least one row, exactly one row,
    /// `expected_features` gene columns, then numeric conversion per column.
    /// Short rows are padded with empty cells; over-long rows are malformed.
    pub fn from_csv(bytes: &[u8], expected_features: usize) -> Result<Self, SampleError> {
        let (header, _) = Format::default()
            .with_header(true)
            .infer_schema(Cursor::new(bytes), Some(0))
            .map_err(|e| SampleError::Malformed(e.to_string()))?;
        if header.fields().is_empty() {
            return Err(SampleError::NoColumns);
        }

        let schema = Arc::new(upload::text_schema(&header));
        let reader = ReaderBuilder::new(schema.clone())
            .with_header(true)
            .with_truncated_rows(true)
            .build(Cursor::new(bytes))
            .map_err(|e| SampleError::Malformed(e.to_string()))?;
        let batches = reader
            .collect::<Result<Vec<RecordBatch>, _>>()
            .map_err(|e| SampleError::Malformed(e.to_string()))?;

        let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        match rows {
            0 => return Err(SampleError::Empty),
            1 => {}
            n => return Err(SampleError::RowCount(n)),
        }

        let got = upload::feature_count(&schema);
        if got != expected_features {
            return Err(SampleError::ColumnCount {
                expected: expected_features,
                got,
            });
        }

        let Some(batch) = batches.iter().find(|b| b.num_rows() == 1) else {
            return Err(SampleError::Empty);
        };

        let ids = text_column(batch, 0);
        let sample_id = (!ids.is_null(0) && !ids.value(0).is_empty())
            .then(|| ids.value(0).to_string());

        let mut features = Vec::with_capacity(got);
        for col in 1..batch.num_columns() {
            let name = schema.field(col).name();
            features.push(numeric_cell(batch, col, name)?);
        }

        debug!(sample_id = ?sample_id, features = features.len(), "parsed uploaded sample");
        Ok(Self {
            sample_id,
            features,
        })
    }
}

fn text_column(batch: &RecordBatch, col: usize) -> &StringArray {
    // Every column is read with the Utf8 text schema.
    batch.column(col).as_string::<i32>()
}

/// Convert the single cell of column `col` to a finite f64.
fn numeric_cell(batch: &RecordBatch, col: usize, name: &str) -> Result<f64, SampleError> {
    let text = text_column(batch, col);
    let cell = if text.is_null(0) { "" } else { text.value(0).trim() };
    if cell.is_empty() {
        return Err(SampleError::MissingValue {
            column: name.to_string(),
        });
    }

    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    let trimmed = StringArray::from(vec![cell]);
    let cast = cast_with_options(&trimmed, &DataType::Float64, &options).map_err(
        |e| SampleError::NonNumeric {
            column: name.to_string(),
            message: e.to_string(),
        },
    )?;
    let value = cast.as_primitive::<Float64Type>().value(0);
    if !value.is_finite() {
        return Err(SampleError::NonFinite {
            column: name.to_string(),
        });
    }
    Ok(value)
}
