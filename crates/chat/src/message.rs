/// Position of an entry within the session transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u64);

impl EntryId {
    /// Creates a typed entry identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Identifier for one submit → answer round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExchangeId(pub u64);

impl ExchangeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Who produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Bot,
    Error,
}

impl Role {
    /// Class list used by the page stylesheet.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::User => "message user-message",
            Self::Bot => "message bot-message",
            Self::Error => "message bot-message error-message",
        }
    }

    /// Only bot content is interpreted as markup.
    pub fn renders_markup(self) -> bool {
        matches!(self, Self::Bot)
    }
}

/// How a node's content must be inserted into the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeBody<'a> {
    /// Literal characters, never parsed as markup.
    Text(&'a str),
    /// Trusted markup inserted as-is.
    Markup(&'a str),
}

/// Immutable transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    pub id: EntryId,
    pub role: Role,
    pub content: String,
}

impl MessageEntry {
    pub fn new(id: EntryId, role: Role, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
        }
    }

    pub fn body(&self) -> NodeBody<'_> {
        if self.role.renders_markup() {
            NodeBody::Markup(&self.content)
        } else {
            NodeBody::Text(&self.content)
        }
    }
}
