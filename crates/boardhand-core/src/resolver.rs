//! Column resolution from issue labels.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::LabelPrecedence;
use crate::types::Column;
use crate::{Error, Result};

/// Determine the column an issue belongs in from its labels.
///
/// Labels are examined in the order given. With [`LabelPrecedence::First`]
/// the first label present in `mapping` decides and the scan stops; with
/// [`LabelPrecedence::Last`] the last mapped label decides.
///
/// A mapped column name missing from `columns` is logged and treated as no
/// match. Without a match the first column is returned when
/// `default_to_first` is set, `None` otherwise.
///
/// Fails with [`Error::BoardSetup`] when the board has no columns.
pub fn resolve_column(
    labels: &[String],
    mapping: &BTreeMap<String, String>,
    columns: &[Column],
    default_to_first: bool,
    precedence: LabelPrecedence,
) -> Result<Option<u64>> {
    let Some(first) = columns.first() else {
        return Err(Error::BoardSetup(
            "project has no columns configured".to_string(),
        ));
    };

    let mut mapped = labels
        .iter()
        .filter_map(|label| mapping.get(label).map(|column| (label, column)));
    let matched = match precedence {
        LabelPrecedence::First => mapped.next(),
        LabelPrecedence::Last => mapped.last(),
    };

    if let Some((label, column_name)) = matched {
        match columns.iter().find(|c| &c.name == column_name) {
            Some(column) => {
                debug!(label = %label, column = %column.name, "Label mapped to column");
                return Ok(Some(column.id));
            }
            None => warn!(
                label = %label,
                column = %column_name,
                "Mapped column does not exist on the board"
            ),
        }
    }

    if default_to_first {
        debug!(column = %first.name, "Falling back to first column");
        Ok(Some(first.id))
    } else {
        Ok(None)
    }
}
