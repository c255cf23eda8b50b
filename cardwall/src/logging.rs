//! Log formatting helpers

use serde::Serialize;
use std::fmt::Debug;

/// Render a serializable value as YAML inside a tracing message.
///
/// ```ignore
/// use cardwall::Pretty;
/// tracing::debug!("card state: {}", Pretty(&card));
/// ```
///
/// The YAML starts on a new line. Falls back to `{:#?}` when the value does
/// not serialize.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{}", yaml),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}
