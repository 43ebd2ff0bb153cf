//! Line protocol builder
//!
//! Every command is one ASCII line terminated by a carriage return.

use std::fmt;

const TERMINATOR: u8 = b'\r';

/// One protocol command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelCommand {
    /// Select the stored job (label layout) to fill
    Select(String),
    /// Set a named field of the selected job
    Set { field: String, value: String },
    /// Print the selected job
    Print(u32),
}

impl LabelCommand {
    /// Encode as a terminated ASCII line
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = self.to_string().into_bytes();
        buf.push(TERMINATOR);
        buf
    }
}

impl fmt::Display for LabelCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelCommand::Select(job) => write!(f, "SEL {}", sanitize(job)),
            LabelCommand::Set { field, value } => {
                write!(f, "SET {} {}", sanitize(field), sanitize(value))
            }
            LabelCommand::Print(copies) => write!(f, "PRN {}", copies),
        }
    }
}

/// Keep the payload on one ASCII line: control characters become spaces and
/// anything outside ASCII becomes `?`
fn sanitize(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            c if c.is_ascii_control() => ' ',
            c if c.is_ascii() => c,
            _ => '?',
        })
        .collect()
}

/// A complete label job: select, set fields, print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelJob {
    job: String,
    fields: Vec<(String, String)>,
    copies: u32,
}

impl LabelJob {
    /// Create a job for the stored layout `job`, printing one copy
    pub fn new(job: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            fields: Vec::new(),
            copies: 1,
        }
    }

    /// Add a field value; fields are sent in insertion order
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Set the copy count (at least one)
    pub fn copies(mut self, copies: u32) -> Self {
        self.copies = copies.max(1);
        self
    }

    /// Commands in the order they go on the wire
    pub fn commands(&self) -> Vec<LabelCommand> {
        let mut cmds = Vec::with_capacity(self.fields.len() + 2);
        cmds.push(LabelCommand::Select(self.job.clone()));
        cmds.extend(self.fields.iter().map(|(field, value)| LabelCommand::Set {
            field: field.clone(),
            value: value.clone(),
        }));
        cmds.push(LabelCommand::Print(self.copies));
        cmds
    }
}
