use review_common::types::Homework;

/// Result of comparing a fresh homework list against the last seen record.
#[derive(Debug, PartialEq)]
pub enum StatusDiff<'a> {
    /// The API returned no homeworks.
    Empty,
    /// The newest homework equals the last seen record.
    Unchanged,
    /// The newest homework is new or has changed.
    Changed(&'a Homework),
}

/// Compare the first (newest) homework against `previous`.
///
/// Older entries in the same batch are never looked at. Equality is over the
/// whole record, so a changed comment or timestamp also counts as a change.
pub fn diff<'a>(homeworks: &'a [Homework], previous: Option<&Homework>) -> StatusDiff<'a> {
    match homeworks.first() {
        None => StatusDiff::Empty,
        Some(newest) if Some(newest) == previous => StatusDiff::Unchanged,
        Some(newest) => StatusDiff::Changed(newest),
    }
}
