//! Gateway Log Parser
//!
//! Reads lines from a byte stream, filters to relevant gateway records,
//! and produces an ordered record sequence. Irrelevant lines (wrong or
//! missing component tag) are silently skipped so the parser can run
//! against noisy mixed-content logs; a malformed relevant line aborts
//! the whole parse, since the gateway emits an internally consistent
//! format and a bad record signals a corrupted or unsupported log.

use std::io::BufRead;

use thiserror::Error;

use crate::domain::record::{Record, RecordHeader, Request, Response};

/// Component tag that marks a line as a gateway trace record.
pub const DEFAULT_COMPONENT: &str = "ProxyContext";

/// Unit suffix on the response elapsed-time field.
const ELAPSED_SUFFIX: &str = "us";
/// Placeholder for a response with no timing available.
const ELAPSED_PLACEHOLDER: &str = "-";

// Fixed field offsets of the supported log layout. The format has been
// through several revisions; only this layout is supported, with no
// auto-detection of older ones.
const TIMESTAMP_FIELD: usize = 0;
const LEVEL_FIELD: usize = 1;
const COMPONENT_FIELD: usize = 2;
const ID_FIELD: usize = 3;
const KIND_FIELD: usize = 4;
const BODY_FIELD: usize = 5;

/// Error aborting a parse run. Carries the 1-based line number and the
/// raw line so the fault can be located in the source log.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {lineno}: invalid response time '{value}' in record: {line}")]
    InvalidElapsed {
        lineno: usize,
        value: String,
        line: String,
    },

    #[error("line {lineno}: unknown record type '{kind}' in record: {line}")]
    UnknownKind {
        lineno: usize,
        kind: String,
        line: String,
    },

    #[error("line {lineno}: truncated record: {line}")]
    Truncated { lineno: usize, line: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Line-oriented parser for gateway trace logs.
#[derive(Debug, Clone)]
pub struct LogParser {
    component: String,
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LogParser {
    pub fn new() -> Self {
        Self::with_component(DEFAULT_COMPONENT)
    }

    /// Parser matching a different component tag at the sentinel field.
    pub fn with_component(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    /// Parse all records from a byte source, in line order. Single
    /// forward pass, no buffering beyond the current line.
    pub fn parse<R: BufRead>(&self, reader: R) -> Result<Vec<Record>, ParseError> {
        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let lineno = index + 1;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.get(COMPONENT_FIELD) != Some(&self.component.as_str()) {
                continue;
            }
            records.push(make_record(lineno, &line, &fields)?);
        }
        Ok(records)
    }
}

fn make_record(lineno: usize, line: &str, fields: &[&str]) -> Result<Record, ParseError> {
    let kind = fields.get(KIND_FIELD).ok_or_else(|| ParseError::Truncated {
        lineno,
        line: line.to_string(),
    })?;
    match *kind {
        "REQ" => {
            // addr tenant method resource [params...]
            if fields.len() < BODY_FIELD + 4 {
                return Err(ParseError::Truncated {
                    lineno,
                    line: line.to_string(),
                });
            }
            Ok(Record::Request(Request {
                header: make_header(lineno, fields),
                addr: fields[BODY_FIELD].to_string(),
                tenant: fields[BODY_FIELD + 1].to_string(),
                method: fields[BODY_FIELD + 2].to_string(),
                resource: fields[BODY_FIELD + 3].to_string(),
                params: collect_params(&fields[BODY_FIELD + 4..]),
            }))
        }
        "RES" => {
            // status elapsed [params...]
            if fields.len() < BODY_FIELD + 2 {
                return Err(ParseError::Truncated {
                    lineno,
                    line: line.to_string(),
                });
            }
            Ok(Record::Response(Response {
                header: make_header(lineno, fields),
                status_code: fields[BODY_FIELD].to_string(),
                elapsed_us: parse_elapsed(lineno, line, fields[BODY_FIELD + 1])?,
                params: collect_params(&fields[BODY_FIELD + 2..]),
            }))
        }
        other => Err(ParseError::UnknownKind {
            lineno,
            kind: other.to_string(),
            line: line.to_string(),
        }),
    }
}

fn make_header(lineno: usize, fields: &[&str]) -> RecordHeader {
    RecordHeader {
        lineno,
        timestamp: fields[TIMESTAMP_FIELD].to_string(),
        level: fields[LEVEL_FIELD].to_string(),
        id: fields[ID_FIELD].to_string(),
    }
}

fn collect_params(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

/// Elapsed-time field: a decimal integer with a `us` suffix, or `-`
/// when the gateway recorded no timing (parses to zero).
fn parse_elapsed(lineno: usize, line: &str, field: &str) -> Result<u64, ParseError> {
    if field == ELAPSED_PLACEHOLDER {
        return Ok(0);
    }
    let digits = field.strip_suffix(ELAPSED_SUFFIX).unwrap_or(field);
    digits.parse().map_err(|_| ParseError::InvalidElapsed {
        lineno,
        value: digits.to_string(),
        line: line.to_string(),
    })
}
