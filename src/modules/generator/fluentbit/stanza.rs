//! Fluent Bit stanza rendering

/// One `[SECTION]` block with its key/value entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stanza {
    section: &'static str,
    comment: Option<&'static str>,
    entries: Vec<(String, String)>,
}

impl Stanza {
    pub fn new(section: &'static str) -> Self {
        Self {
            section,
            comment: None,
            entries: Vec::new(),
        }
    }

    /// Comment line written right below the section header
    pub fn comment(mut self, comment: &'static str) -> Self {
        self.comment = Some(comment);
        self
    }

    /// Append an entry
    pub fn entry(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.entries.push((key.into(), value.to_string()));
        self
    }

    /// Append an entry when `value` is set
    pub fn entry_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.entry(key, value),
            None => self,
        }
    }

    /// Value of the first entry named `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render with values aligned one column past the widest key
    pub fn render(&self) -> String {
        let width = self.entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let comment = self
            .comment
            .map(|comment| format!("    # {}\n", comment))
            .unwrap_or_default();
        let entries: String = self
            .entries
            .iter()
            .map(|(key, value)| format!("    {:<width$} {}\n", key, value, width = width))
            .collect();
        format!("[{}]\n{}{}", self.section, comment, entries)
    }
}

/// Join rendered blocks with one blank line between them
pub fn render_all<'a>(header: &[String], stanzas: impl IntoIterator<Item = &'a Stanza>) -> String {
    let mut blocks: Vec<String> = Vec::new();
    if !header.is_empty() {
        blocks.push(header.iter().map(|line| format!("{}\n", line)).collect());
    }
    blocks.extend(stanzas.into_iter().map(Stanza::render));
    blocks.join("\n")
}
