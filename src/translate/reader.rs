use std::fmt::Display;

use log::warn;
use serde_json::{Map, Value};

use super::bytes::BytesEncoding;

const LOG_TARGET: &str = "obc_client::translate";

/// Why a field could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// The key is absent, or holds JSON `null`.
    Missing,
    /// The key is present but its value has the wrong shape.
    Mismatch { expected: &'static str },
    /// The value is well-formed but outside the closed set of known codes.
    Unrecognized { value: String },
}

impl Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueKind::Missing => write!(f, "missing"),
            IssueKind::Mismatch { expected } => write!(f, "expected {}", expected),
            IssueKind::Unrecognized { value } => write!(f, "unrecognized value {}", value),
        }
    }
}

/// A field that was skipped while translating a peer response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Dotted path from the document root, e.g. `transactions[2].timestamp.nanos`.
    pub path: String,
    pub kind: IssueKind,
}

impl Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

/// Reads typed fields out of untrusted JSON without ever failing.
///
/// Every accessor returns `Some` when the field is present with the expected
/// shape and `None` otherwise. Absent or malformed fields are reported through
/// [`FieldReader::report`], which is the only diagnostic side channel: when
/// alerts are enabled the issue is logged and collected, when disabled it is
/// dropped. Reporting never influences the returned values.
#[derive(Debug)]
pub struct FieldReader {
    alert: bool,
    encoding: BytesEncoding,
    scope: Vec<String>,
    issues: Vec<FieldIssue>,
}

impl FieldReader {
    pub fn new(alert: bool, encoding: BytesEncoding) -> Self {
        Self {
            alert,
            encoding,
            scope: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn alert(&self) -> bool {
        self.alert
    }

    pub fn encoding(&self) -> BytesEncoding {
        self.encoding
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<FieldIssue> {
        self.issues
    }

    /// Prefixes the paths of subsequently reported issues with `segment`.
    pub fn enter(&mut self, segment: impl Into<String>) {
        self.scope.push(segment.into());
    }

    pub fn leave(&mut self) {
        self.scope.pop();
    }

    pub fn report(&mut self, field: &str, kind: IssueKind) {
        if !self.alert {
            return;
        }

        let issue = FieldIssue {
            path: self.path_of(field),
            kind,
        };
        warn!(
            target: LOG_TARGET,
            field:% = issue.path,
            reason:% = issue.kind;
            "Skipped field in peer response"
        );
        self.issues.push(issue);
    }

    pub fn string<'a>(&mut self, doc: &'a Value, field: &str) -> Option<&'a str> {
        let value = self.lookup(doc, field)?;
        match value.as_str() {
            Some(s) => Some(s),
            None => self.mismatch(field, "string"),
        }
    }

    pub fn int64(&mut self, doc: &Value, field: &str) -> Option<i64> {
        let value = self.lookup(doc, field)?;
        match coerce_i64(value) {
            Some(n) => Some(n),
            None => self.mismatch(field, "int64"),
        }
    }

    pub fn int32(&mut self, doc: &Value, field: &str) -> Option<i32> {
        let value = self.lookup(doc, field)?;
        match coerce_i64(value).and_then(|n| i32::try_from(n).ok()) {
            Some(n) => Some(n),
            None => self.mismatch(field, "int32"),
        }
    }

    pub fn object<'a>(&mut self, doc: &'a Value, field: &str) -> Option<&'a Map<String, Value>> {
        let value = self.lookup(doc, field)?;
        match value.as_object() {
            Some(map) => Some(map),
            None => self.mismatch(field, "object"),
        }
    }

    /// Reads an array of objects. Elements that are not objects are reported
    /// and skipped; the remaining elements keep their original order.
    pub fn objects<'a>(&mut self, doc: &'a Value, field: &str) -> Option<Vec<&'a Value>> {
        let value = self.lookup(doc, field)?;
        let Some(items) = value.as_array() else {
            return self.mismatch(field, "array");
        };

        let mut objects = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if item.is_object() {
                objects.push(item);
            } else {
                self.report(&format!("{}[{}]", field, index), IssueKind::Mismatch { expected: "object" });
            }
        }
        Some(objects)
    }

    /// Reads a string field and decodes it with the configured [`BytesEncoding`].
    pub fn bytes(&mut self, doc: &Value, field: &str) -> Option<Vec<u8>> {
        let raw = self.string(doc, field)?;
        match self.encoding.decode(raw) {
            Ok(bytes) => Some(bytes),
            Err(_) => self.mismatch(field, encoding_label(self.encoding)),
        }
    }

    fn lookup<'a>(&mut self, doc: &'a Value, field: &str) -> Option<&'a Value> {
        match doc.get(field) {
            None | Some(Value::Null) => {
                self.report(field, IssueKind::Missing);
                None
            },
            Some(value) => Some(value),
        }
    }

    fn mismatch<T>(&mut self, field: &str, expected: &'static str) -> Option<T> {
        self.report(field, IssueKind::Mismatch { expected });
        None
    }

    fn path_of(&self, field: &str) -> String {
        let mut path = String::new();
        for segment in &self.scope {
            if !path.is_empty() && !segment.starts_with('[') {
                path.push('.');
            }
            path.push_str(segment);
        }
        if !path.is_empty() && !field.starts_with('[') {
            path.push('.');
        }
        path.push_str(field);
        path
    }
}

fn encoding_label(encoding: BytesEncoding) -> &'static str {
    match encoding {
        BytesEncoding::Utf8 => "utf8 string",
        BytesEncoding::Base64 => "base64 string",
        BytesEncoding::Hex => "hex string",
    }
}

// Integers may arrive as numbers, integral floats or numeric strings.
fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
