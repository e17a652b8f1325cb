//! # Diagnostics: Structured Check Results
//!
//! A [`Diagnostic`] is a severity, a message template, and an ordered list of
//! contextual fields. Checks never return diagnostics directly; they emit them
//! through a [`Reporter`], which prepends the fields bound for the current
//! scope (for example `data_var_name` or `coord_name`) and forwards the result
//! to a caller-supplied [`DiagnosticSink`].
//!
//! ## Ordering
//!
//! Diagnostics are append-only. The order of emission is part of the
//! contract: sinks must preserve it.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory deviation; the dataset is still usable.
    Warning,
    /// Structural violation; the dataset cannot be trusted downstream.
    Error,
}

impl Severity {
    /// Lowercase name, as used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single check result.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity of the finding.
    pub severity: Severity,
    /// Message template. Variable parts live in `fields`.
    pub message: String,
    /// Contextual fields in binding order.
    pub fields: Vec<(String, Value)>,
}

impl Diagnostic {
    /// Look up a contextual field by name.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up a contextual field holding a string.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Render the fields as space-separated `key=value` pairs.
    pub fn fields_display(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{k}={s:?}"),
                other => format!("{k}={other}"),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)?;
        if !self.fields.is_empty() {
            write!(f, " {}", self.fields_display())?;
        }
        Ok(())
    }
}

/// Serializes as a flat event object: `{"level": .., "event": .., <fields>}`.
impl Serialize for Diagnostic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;
        map.serialize_entry("level", &self.severity)?;
        map.serialize_entry("event", &self.message)?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Append-only receiver of diagnostics.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Discards every diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _diagnostic: Diagnostic) {}
}

/// Forwards diagnostics to the active `tracing` subscriber.
///
/// Warnings become `WARN` events and errors become `ERROR` events. The
/// contextual fields are rendered into a single `fields` value because
/// `tracing` field names must be known at compile time.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let fields = diagnostic.fields_display();
        match diagnostic.severity {
            Severity::Warning => {
                tracing::warn!(fields = %fields, "{}", diagnostic.message)
            }
            Severity::Error => {
                tracing::error!(fields = %fields, "{}", diagnostic.message)
            }
        }
    }
}

/// Wraps another sink and counts what passes through it.
#[derive(Debug, Default)]
pub struct CountingSink<S> {
    inner: S,
    warnings: usize,
    errors: usize,
}

impl<S: DiagnosticSink> CountingSink<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            warnings: 0,
            errors: 0,
        }
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    /// Consumes self and returns the wrapped sink.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: DiagnosticSink> DiagnosticSink for CountingSink<S> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => self.warnings += 1,
            Severity::Error => self.errors += 1,
        }
        self.inner.emit(diagnostic);
    }
}

/// Scoped front-end to a [`DiagnosticSink`].
///
/// A `Reporter` owns a list of bound fields. [`Reporter::bind`] returns a
/// child reporter that borrows the same sink and carries an extended copy
/// of the fields, so bindings never leak back into the parent scope.
pub struct Reporter<'a> {
    sink: &'a mut dyn DiagnosticSink,
    context: Vec<(String, Value)>,
}

impl<'a> Reporter<'a> {
    pub fn new(sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            sink,
            context: Vec::new(),
        }
    }

    /// Return a child reporter with `key` bound to `value`.
    ///
    /// Rebinding an existing key replaces its value in the child only.
    pub fn bind(&mut self, key: &str, value: impl Into<Value>) -> Reporter<'_> {
        let mut context = self.context.clone();
        upsert(&mut context, key, value.into());
        Reporter {
            sink: &mut *self.sink,
            context,
        }
    }

    /// Fields bound in this scope.
    pub fn context(&self) -> &[(String, Value)] {
        &self.context
    }

    pub fn warning(&mut self, message: &str) {
        self.emit(Severity::Warning, message, Vec::new());
    }

    pub fn warning_with(&mut self, message: &str, fields: Vec<(&str, Value)>) {
        self.emit(Severity::Warning, message, fields);
    }

    pub fn error(&mut self, message: &str) {
        self.emit(Severity::Error, message, Vec::new());
    }

    pub fn error_with(&mut self, message: &str, fields: Vec<(&str, Value)>) {
        self.emit(Severity::Error, message, fields);
    }

    /// Emit a diagnostic at the given severity.
    pub fn emit(&mut self, severity: Severity, message: &str, fields: Vec<(&str, Value)>) {
        let mut all = self.context.clone();
        for (k, v) in fields {
            upsert(&mut all, k, v);
        }
        self.sink.emit(Diagnostic {
            severity,
            message: message.to_string(),
            fields: all,
        });
    }
}

fn upsert(fields: &mut Vec<(String, Value)>, key: &str, value: Value) {
    match fields.iter_mut().find(|(k, _)| k == key) {
        Some(slot) => slot.1 = value,
        None => fields.push((key.to_string(), value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reporter_emits_in_order() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        let mut log = Reporter::new(&mut sink);
        log.warning("first");
        log.error("second");
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].message, "first");
        assert_eq!(sink[0].severity, Severity::Warning);
        assert_eq!(sink[1].severity, Severity::Error);
    }

    #[test]
    fn bind_does_not_leak_into_parent() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        let mut log = Reporter::new(&mut sink);
        {
            let mut child = log.bind("coord_name", "time");
            child.warning("inside");
        }
        log.warning("outside");
        assert_eq!(sink[0].field_str("coord_name"), Some("time"));
        assert!(sink[1].field("coord_name").is_none());
    }

    #[test]
    fn call_fields_follow_bound_fields() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        let mut log = Reporter::new(&mut sink);
        let mut child = log.bind("data_var_name", "tas");
        child.warning_with("units", vec![("units", json!("m"))]);
        let keys: Vec<&str> = sink[0].fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["data_var_name", "units"]);
    }

    #[test]
    fn rebinding_replaces_value() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        let mut log = Reporter::new(&mut sink);
        let mut a = log.bind("name", "a");
        let mut b = a.bind("name", "b");
        b.warning("x");
        assert_eq!(sink[0].fields.len(), 1);
        assert_eq!(sink[0].field_str("name"), Some("b"));
    }

    #[test]
    fn counting_sink_tallies_severities() {
        let mut counter = CountingSink::new(Vec::<Diagnostic>::new());
        {
            let mut log = Reporter::new(&mut counter);
            log.warning("w1");
            log.warning("w2");
            log.error("e1");
        }
        assert_eq!(counter.warnings(), 2);
        assert_eq!(counter.errors(), 1);
        assert_eq!(counter.into_inner().len(), 3);
    }

    #[test]
    fn serializes_as_flat_event() {
        let d = Diagnostic {
            severity: Severity::Error,
            message: "dimension with no associated coordinate".into(),
            fields: vec![("dim".into(), json!("plev"))],
        };
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["level"], "error");
        assert_eq!(v["event"], "dimension with no associated coordinate");
        assert_eq!(v["dim"], "plev");
    }

    #[test]
    fn display_includes_fields() {
        let d = Diagnostic {
            severity: Severity::Warning,
            message: "non-string key".into(),
            fields: vec![("key".into(), json!("null"))],
        };
        assert_eq!(d.to_string(), r#"[warning] non-string key key="null""#);
    }
}
