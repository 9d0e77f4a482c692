use serde::Serialize;

/// A key/value label attached to a resource, as listed by DescribeTags.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Tag {
    pub resource_id: String,
    /// `instance`, `image`, `volume`, `snapshot`, ...
    pub resource_type: String,
    pub key: String,
    pub value: Option<String>,
}
