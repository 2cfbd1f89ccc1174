use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// Submission ids arrive as integers from some backends and as strings (uuids) from others.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubmissionId(pub String);

impl<'de> Deserialize<'de> for SubmissionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => SubmissionId(n.to_string()),
            RawId::Text(s) => SubmissionId(s.trim().to_string()),
        })
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClientInfo {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl ClientInfo {
    pub fn display_name(&self) -> &str {
        non_blank(&self.full_name).unwrap_or("Client")
    }

    pub fn company_name(&self) -> Option<&str> {
        non_blank(&self.company)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub processed_at: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub client: ClientInfo,
}

impl Submission {
    /// Field of the free-form `data` object, `Null` when absent or when `data` is not an object.
    pub fn field(&self, key: &str) -> &Value {
        self.data.get(key).unwrap_or(&Value::Null)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Agent,
    Client,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Requester {
    pub role: Role,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// What the web layer hands over: an already-authorized submission and who asked for it.
#[derive(Clone, Debug, Deserialize)]
pub struct RenderRequest {
    pub submission: Submission,
    #[serde(default)]
    pub requester: Requester,
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
