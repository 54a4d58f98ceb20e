/* 📖 # What is a thing?

A thing is the record the lookup service returns for an identifier: an id, a
name, a location and a type, all plain strings. A `ThingRecord` is produced
only by a successful lookup and replaced as a whole by the next one, so it has
no setters.

Servers backed by an integer primary key send `"id": 1` instead of
`"id": "1"`. Both are accepted and the id is kept as its decimal text.
*/

use serde::{Deserialize, Deserializer, Serialize};

/// A thing record as returned by `GET /things/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThingRecord {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    name: String,
    location: String,
    #[serde(rename = "type")]
    thing_type: String,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

impl ThingRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        thing_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            thing_type: thing_type.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// The `type` attribute.
    pub fn thing_type(&self) -> &str {
        &self.thing_type
    }
}

/// A submitted identifier.
///
/// Only a non-blank identifier counts as an attempted lookup; whether it is a
/// valid identifier is for the server to decide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    id: String,
}

impl LookupRequest {
    /// Returns `None` for an identifier that is empty after trimming whitespace.
    ///
    /// ```
    /// use thing_lookup_engine::LookupRequest;
    ///
    /// assert_eq!(LookupRequest::new(" 1 ").unwrap().id(), "1");
    /// assert!(LookupRequest::new("   ").is_none());
    /// ```
    pub fn new(id: &str) -> Option<Self> {
        let id = id.trim();
        if id.is_empty() {
            None
        } else {
            Some(Self { id: id.to_string() })
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for LookupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
