use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One catalog entry as stored in the catalog resource.
///
/// Fields the catalog does not interpret are kept in `extra` and written back
/// out unchanged, so the service can return records as they were stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// `None` only when the record has no `faqs` key; a stored `null` is kept.
    #[serde(default, deserialize_with = "present_faqs", skip_serializing_if = "Option::is_none")]
    pub faqs: Option<Faqs>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn present_faqs<'de, D>(deserializer: D) -> Result<Option<Faqs>, D::Error>
where
    D: Deserializer<'de>,
{
    Faqs::deserialize(deserializer).map(Some)
}

/// FAQ answers keyed by question-category key.
///
/// Older datasets occasionally carry something other than an object here; those
/// records still load and simply have no answers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Faqs {
    Entries(Map<String, Value>),
    Other(Value),
}

impl Faqs {
    /// Non-empty string answer stored under `key`, if any. Answers are text, so
    /// a number, list or other non-string value counts as missing.
    pub fn answer(&self, key: &str) -> Option<&str> {
        match self {
            Self::Entries(entries) => {
                entries.get(key).and_then(Value::as_str).filter(|text| !text.is_empty())
            }
            Self::Other(_) => None,
        }
    }
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: ProductId(id.into()), name: name.into(), faqs: None, extra: Map::new() }
    }

    pub fn with_answer(mut self, key: &str, text: impl Into<String>) -> Self {
        let mut entries = match self.faqs.take() {
            Some(Faqs::Entries(entries)) => entries,
            _ => Map::new(),
        };
        entries.insert(key.to_string(), Value::String(text.into()));
        self.faqs = Some(Faqs::Entries(entries));
        self
    }

    pub fn answer(&self, key: &str) -> Option<&str> {
        self.faqs.as_ref().and_then(|faqs| faqs.answer(key))
    }
}
