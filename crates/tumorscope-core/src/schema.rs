/// Arrow schema definitions for uploaded expression files.
pub mod upload {
    use arrow::datatypes::{DataType, Field, Schema};

    use crate::SAMPLE_ID_FIELD;

    /// Schema that reads every column of an upload as nullable text.
    ///
    /// The first column is renamed to [`SAMPLE_ID_FIELD`]; the rest keep the
    /// names from the CSV header. Numeric conversion happens afterwards so a
    /// bad cell can be reported by column name.
    pub fn text_schema(header: &Schema) -> Schema {
        let fields: Vec<Field> = header
            .fields()
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let name = if i == 0 {
                    SAMPLE_ID_FIELD
                } else {
                    f.name().as_str()
                };
                Field::new(name, DataType::Utf8, true)
            })
            .collect();
        Schema::new(fields)
    }

    /// Number of gene-feature columns described by a header (all but the identifier).
    pub fn feature_count(header: &Schema) -> usize {
        header.fields().len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use arrow::datatypes::{DataType, Field, Schema};

    use super::upload;

    fn header(names: &[&str]) -> Schema {
        Schema::new(
            names
                .iter()
                .map(|n| Field::new(*n, DataType::Int64, true))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn text_schema_renames_identifier_column() {
        let schema = upload::text_schema(&header(&["Unnamed: 0", "gene_0", "gene_1"]));
        assert_eq!(schema.fields().len(), 3);
        assert_eq!(schema.field(0).name(), "sample_id");
        assert_eq!(schema.field(1).name(), "gene_0");
        assert!(
            schema
                .fields()
                .iter()
                .all(|f| f.data_type() == &DataType::Utf8 && f.is_nullable())
        );
    }

    #[test]
    fn feature_count_excludes_identifier() {
        assert_eq!(upload::feature_count(&header(&["id", "a", "b", "c"])), 3);
        assert_eq!(upload::feature_count(&header(&["id"])), 0);
        assert_eq!(upload::feature_count(&Schema::empty()), 0);
    }
}
