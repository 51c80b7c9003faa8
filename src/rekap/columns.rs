use tracing::debug;

use crate::error::{RekapError, Result};
use crate::model::cell::Cell;
use crate::model::column::{ColumnMap, ColumnSchema};

/// Resolve header cells against the schema. Candidates are tried in
/// priority order; the first one present in the header wins.
pub fn resolve(header: &[Cell], schema: &ColumnSchema) -> Result<ColumnMap> {
    let names: Vec<String> = header.iter().map(|c| c.to_string().trim().to_string()).collect();
    let mut map = ColumnMap::default();

    for spec in schema.specs() {
        let found = spec
            .candidates
            .iter()
            .find_map(|candidate| names.iter().position(|name| name == candidate));

        match found {
            Some(idx) => {
                debug!(field = %spec.field, column = idx, header = %names[idx], "Column resolved");
                map.insert(spec.field, idx);
            }
            None if spec.required => {
                return Err(RekapError::MissingColumn { field: spec.field });
            }
            None => {}
        }
    }

    Ok(map)
}
