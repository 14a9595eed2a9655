//! Payload models for the telemetry service.
//!
//! The service keys most payloads by session id and leans on loosely shaped
//! JSON objects, so the decoding here is deliberately tolerant about which
//! per-session attributes are present while staying strict about the overall
//! envelope shape. Session maps preserve the order the service returned them
//! in; that order is what the reconciler uses when emitting additions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::PayloadError;

/// Opaque session identifier.
///
/// Unique within one game's active set at a point in time; a finished
/// session's id may be reused later, so ids are never compared across games
/// or across time.
pub type SessionId = String;

/// Per-session attributes reported with the active-session listing.
///
/// Every field except the id is optional: the service omits attributes it
/// could not compute for a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub session_id: SessionId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,

    /// Present on classroom-scoped listings instead of `player_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cur_level: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_level: Option<i64>,

    /// Seconds since the session's last recorded move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_time: Option<f64>,
}

impl SessionRecord {
    /// Build a record carrying only an id. Attribute fields start empty.
    pub fn new(session_id: impl Into<SessionId>) -> Self {
        Self {
            session_id: session_id.into(),
            ..Self::default()
        }
    }
}

/// The active-session set for one game, as of one poll.
///
/// Replaced wholesale on every successful poll, never merged. Iteration
/// order is the order the service listed the sessions in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveSessions {
    sessions: IndexMap<SessionId, SessionRecord>,
    notice: Option<String>,
}

impl ActiveSessions {
    /// Interpret a decoded active-session payload.
    ///
    /// The service mixes a `"message"` timing-metadata entry into the
    /// session map; it is diverted into [`ActiveSessions::notice`] rather
    /// than treated as a session. Any other non-record entry makes the
    /// whole payload malformed.
    pub fn parse(raw: IndexMap<String, Value>) -> Result<Self, PayloadError> {
        let mut sessions = IndexMap::with_capacity(raw.len());
        let mut notice = None;

        for (key, value) in raw {
            match value {
                Value::Object(_) => {
                    let mut record: SessionRecord = serde_json::from_value(value).map_err(|e| {
                        PayloadError::InvalidRecord {
                            key: key.clone(),
                            message: e.to_string(),
                        }
                    })?;
                    if record.session_id.is_empty() {
                        record.session_id = key.clone();
                    }
                    sessions.insert(key, record);
                }
                Value::String(text) if key == "message" => {
                    notice = Some(text);
                }
                _ => return Err(PayloadError::UnexpectedEntry { key }),
            }
        }

        Ok(Self { sessions, notice })
    }

    /// Build a set from records directly, keyed by their ids.
    pub fn from_records(records: impl IntoIterator<Item = SessionRecord>) -> Self {
        let sessions = records
            .into_iter()
            .map(|r| (r.session_id.clone(), r))
            .collect();
        Self {
            sessions,
            notice: None,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn get(&self, session_id: &str) -> Option<&SessionRecord> {
        self.sessions.get(session_id)
    }

    /// Session ids in service order.
    pub fn ids(&self) -> impl Iterator<Item = &SessionId> {
        self.sessions.keys()
    }

    /// Records in service order.
    pub fn records(&self) -> impl Iterator<Item = &SessionRecord> {
        self.sessions.values()
    }

    /// Timing-metadata string the service appended to the listing, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn into_sessions(self) -> IndexMap<SessionId, SessionRecord> {
        self.sessions
    }
}

/// Prediction values for one session, in service order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionPredictions {
    pub session_id: SessionId,
    pub values: IndexMap<String, Value>,
}

impl SessionPredictions {
    /// Interpret a decoded prediction payload for `session_id`.
    ///
    /// The payload is keyed by session id. The exact requested id wins;
    /// failing that, a single-entry payload is accepted as the service
    /// echoing the id it was asked about (the echoed id becomes
    /// authoritative).
    pub fn parse(
        session_id: &str,
        mut raw: IndexMap<String, IndexMap<String, Value>>,
    ) -> Result<Self, PayloadError> {
        if let Some(values) = raw.shift_remove(session_id) {
            return Ok(Self {
                session_id: session_id.to_string(),
                values,
            });
        }
        if raw.len() == 1 {
            if let Some((echoed, values)) = raw.shift_remove_index(0) {
                return Ok(Self {
                    session_id: echoed,
                    values,
                });
            }
        }
        Err(PayloadError::MissingSession {
            session_id: session_id.to_string(),
        })
    }
}

/// Extracted feature values for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionFeatures {
    pub session_id: SessionId,
    pub features: IndexMap<String, Value>,
}

impl SessionFeatures {
    /// Interpret a decoded feature payload for `session_id`.
    ///
    /// Uses the same id-keyed envelope as predictions. The per-session
    /// object nests the feature map under `"features"`; a flat object is
    /// accepted as the feature map directly.
    pub fn parse(session_id: &str, mut raw: IndexMap<String, Value>) -> Result<Self, PayloadError> {
        let entry = if let Some(value) = raw.shift_remove(session_id) {
            Some((session_id.to_string(), value))
        } else if raw.len() == 1 {
            raw.shift_remove_index(0)
        } else {
            None
        };
        let Some((echoed, value)) = entry else {
            return Err(PayloadError::MissingSession {
                session_id: session_id.to_string(),
            });
        };

        let features_value = match value {
            Value::Object(mut entries) => entries.remove("features").unwrap_or(Value::Object(entries)),
            other => {
                return Err(PayloadError::InvalidRecord {
                    key: echoed,
                    message: format!("expected an object, got {}", value_kind(&other)),
                });
            }
        };
        match features_value {
            Value::Object(entries) => Ok(Self {
                session_id: echoed,
                features: entries.into_iter().collect(),
            }),
            other => Err(PayloadError::InvalidRecord {
                key: echoed,
                message: format!("expected a feature map, got {}", value_kind(&other)),
            }),
        }
    }
}

/// Interpret a feature/prediction name-list payload.
///
/// The service returns either a bare JSON array of names or a one-entry
/// labelled object (observed label `"stub:prediction_names"`); the labelled
/// form contributes its first array value.
pub fn parse_name_list(value: Value) -> Result<Vec<String>, PayloadError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(name) => Ok(name),
                _ => Err(PayloadError::MissingNames),
            })
            .collect(),
        Value::Object(entries) => entries
            .into_iter()
            .find_map(|(_, v)| matches!(v, Value::Array(_)).then_some(v))
            .map_or(Err(PayloadError::MissingNames), parse_name_list),
        _ => Err(PayloadError::MissingNames),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
