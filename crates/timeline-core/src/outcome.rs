//! Result shape shared by every editing operation.

/// The updated value plus whether anything actually changed.
///
/// Callers use `changed` to skip no-op history entries.
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome<T> {
    pub value: T,
    pub changed: bool,
}

impl<T> EditOutcome<T> {
    pub fn changed(value: T) -> Self {
        Self {
            value,
            changed: true,
        }
    }

    pub fn unchanged(value: T) -> Self {
        Self {
            value,
            changed: false,
        }
    }
}
