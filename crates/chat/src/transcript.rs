use crate::message::{EntryId, MessageEntry, Role};
use crate::render::body_html;

/// Append-only record of the session's entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<MessageEntry>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Appends an entry and returns it. Ids strictly increase.
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> &MessageEntry {
        let id = EntryId::new(self.next_id);
        self.next_id += 1;
        self.entries.push(MessageEntry::new(id, role, content));
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&MessageEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn last(&self) -> Option<&MessageEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// HTML projection of the whole transcript, one `div` per entry.
    pub fn render_html(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "<div class=\"{}\">{}</div>",
                    entry.role.css_class(),
                    body_html(&entry.body())
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_and_order_is_preserved() {
        let mut transcript = Transcript::new();
        let first = transcript.append(Role::User, "hi").id;
        let second = transcript.append(Role::Bot, "<p>hello</p>").id;
        let third = transcript.append(Role::Error, "oops").id;

        assert!(first < second && second < third);
        let roles = transcript
            .entries()
            .iter()
            .map(|entry| entry.role)
            .collect::<Vec<_>>();
        assert_eq!(roles, vec![Role::User, Role::Bot, Role::Error]);
        assert_eq!(transcript.get(second).map(|e| e.content.as_str()), Some("<p>hello</p>"));
    }

    #[test]
    fn projection_escapes_user_and_error_but_not_bot() {
        let mut transcript = Transcript::new();
        transcript.append(Role::User, "<b>x</b>");
        transcript.append(Role::Bot, "<p><b>y</b></p>");
        transcript.append(Role::Error, "<i>z</i>");

        let html = transcript.render_html();

        assert_eq!(
            html,
            "<div class=\"message user-message\">&lt;b&gt;x&lt;/b&gt;</div>\n\
             <div class=\"message bot-message\"><p><b>y</b></p></div>\n\
             <div class=\"message bot-message error-message\">&lt;i&gt;z&lt;/i&gt;</div>"
        );
    }
}
