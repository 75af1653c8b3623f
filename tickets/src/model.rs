//! Ticket data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use studentdesk_auth::{Meta, UserId};

/// Storage identifier of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub uuid::Uuid);

impl TicketId {
    /// Generate a new random `TicketId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TicketId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Human-facing sequential ticket identifier, `_0001`, `_0002`, ...
///
/// Four digits zero-padded, growing to five and more once the sequence
/// reaches 10000.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    /// Format the `n`th sequence value.
    ///
    /// # Examples
    ///
    /// ```
    /// use studentdesk_tickets::SubjectId;
    ///
    /// assert_eq!(SubjectId::from_sequence(7).as_str(), "_0007");
    /// assert_eq!(SubjectId::from_sequence(10_000).as_str(), "_10000");
    /// ```
    #[must_use]
    pub fn from_sequence(n: u64) -> Self {
        Self(format!("_{n:04}"))
    }

    /// Wrap a subject read back from storage.
    #[must_use]
    pub const fn from_stored(subject: String) -> Self {
        Self(subject)
    }

    /// The subject as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Subjects only ever widen, so the longer one is the later sequence value.
impl Ord for SubjectId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.len().cmp(&other.0.len()).then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for SubjectId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ticket status. New tickets start as `Pending`; transitions are driven
/// outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Awaiting a reply.
    #[default]
    Pending,
    /// Staff have replied.
    ReplyGiven,
    /// Resolved.
    Closed,
}

impl TicketStatus {
    /// Stored and serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::ReplyGiven => "REPLY_GIVEN",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "REPLY_GIVEN" => Ok(Self::ReplyGiven),
            "CLOSED" => Ok(Self::Closed),
            other => Err(format!("unknown ticket status: {other}")),
        }
    }
}

/// One entry of a ticket's append-only annotation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Remark {
    /// Short heading.
    #[serde(default)]
    pub title: String,

    /// Remark subject line.
    #[serde(default)]
    pub subject: String,

    /// Body.
    #[serde(default)]
    pub description: String,

    /// When the remark was added.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A support ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Storage id.
    pub id: TicketId,

    /// Sequential subject id, assigned once at creation.
    pub subject: SubjectId,

    /// Title.
    pub title: String,

    /// Body.
    pub description: String,

    /// Current status.
    pub status: TicketStatus,

    /// Annotation log, oldest first.
    pub remarks: Vec<Remark>,

    /// Where correspondence about the ticket goes.
    pub allowed_email: String,

    /// Owning student.
    pub student: UserId,

    /// Free-form attributes.
    pub meta: Meta,

    /// Created timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp.
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied ticket content.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketDraft {
    /// Title.
    #[serde(default)]
    pub title: String,

    /// Ignored. Subjects always come from the sequence.
    #[serde(default)]
    pub subject: Option<String>,

    /// Body.
    #[serde(default)]
    pub description: String,

    /// Contact address. Required.
    #[serde(default)]
    pub allowed_email: String,

    /// Free-form attributes.
    #[serde(default)]
    pub meta: Meta,
}

/// Who a ticket operation acts for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketOwner {
    /// Identity taken from a verified access token.
    Authenticated(UserId),

    /// Exact-match lookup by display name. Kept for clients that predate
    /// token-based ownership; ambiguous when two students share a name.
    LegacyName(String),
}
