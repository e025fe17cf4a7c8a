//! Prompt templates with `{name}` placeholders.
//!
//! `{{` and `}}` produce literal braces, so JSON examples can be embedded in
//! a prompt. Templates are parsed once and formatted many times.

use std::collections::HashMap;

use crate::error::{LlmError, Result};
use crate::message::{ChatMessage, Role};

/// Values substituted into templates.
pub type Variables = HashMap<String, String>;

/// Build [`Variables`] from key/value pairs.
pub fn variables<K, V, I>(pairs: I) -> Variables
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: ToString,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A parsed string template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse a template.
    pub fn new(template: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') | None => {
                                return Err(LlmError::Template(format!(
                                    "unclosed placeholder in {template:?}"
                                )));
                            }
                            Some(ch) => name.push(ch),
                        }
                    }
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(LlmError::Template("empty placeholder".to_string()));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Variable(name.to_string()));
                }
                '}' => {
                    return Err(LlmError::Template(format!(
                        "unmatched '}}' in {template:?}"
                    )));
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Placeholder names in order of first appearance.
    pub fn input_variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Variable(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitute every placeholder. Extra variables are ignored.
    pub fn format(&self, vars: &Variables) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value = vars
                        .get(name)
                        .ok_or_else(|| LlmError::MissingVariable(name.clone()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

/// An ordered list of role-tagged templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPromptTemplate {
    messages: Vec<(Role, PromptTemplate)>,
}

impl ChatPromptTemplate {
    pub fn from_messages<'a, I>(messages: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Role, &'a str)>,
    {
        let messages = messages
            .into_iter()
            .map(|(role, text)| PromptTemplate::new(text).map(|t| (role, t)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { messages })
    }

    /// Placeholder names across all messages.
    pub fn input_variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (_, template) in &self.messages {
            for name in template.input_variables() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn format_messages(&self, vars: &Variables) -> Result<Vec<ChatMessage>> {
        self.messages
            .iter()
            .map(|(role, template)| Ok(ChatMessage::with_role(*role, template.format(vars)?)))
            .collect()
    }
}
