//! Request field validation.
//!
//! Rules run in the order they are declared and every failure is kept, so a
//! handler can report the full list or only the first failure per field.

use mongodb::bson::oid::ObjectId;
use serde::Serialize;

/// Where a validated value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Body,
    Params,
}

/// `Missing` marks an existence predicate that found nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Invalid,
    Missing,
}

#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub location: Location,
    pub field: &'static str,
    pub value: String,
    pub message: String,
    #[serde(skip)]
    pub kind: ViolationKind,
}

impl Violation {
    pub fn invalid(
        location: Location,
        field: &'static str,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            location,
            field,
            value: value.into(),
            message: message.into(),
            kind: ViolationKind::Invalid,
        }
    }

    pub fn missing(
        location: Location,
        field: &'static str,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: ViolationKind::Missing,
            ..Self::invalid(location, field, value, message)
        }
    }
}

/// Ordered list of rule failures for one request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    /// True when a referenced resource could not be found.
    pub fn any_missing(&self) -> bool {
        self.0.iter().any(|v| v.kind == ViolationKind::Missing)
    }

    /// Keeps the first failure of each field, preserving order.
    pub fn only_first_per_field(self) -> Self {
        let mut seen: Vec<(Location, &'static str)> = Vec::new();
        let kept = self
            .0
            .into_iter()
            .filter(|v| {
                let key = (v.location, v.field);
                if seen.contains(&key) {
                    false
                } else {
                    seen.push(key);
                    true
                }
            })
            .collect();
        Self(kept)
    }

    /// Starts a rule chain on a request body field. An absent field validates
    /// as the empty string.
    pub fn body(&mut self, field: &'static str, value: Option<String>) -> FieldCheck<'_> {
        FieldCheck {
            violations: self,
            location: Location::Body,
            field,
            value: value.unwrap_or_default(),
        }
    }

    /// Starts a rule chain on a path parameter.
    pub fn param(&mut self, field: &'static str, value: &str) -> FieldCheck<'_> {
        FieldCheck {
            violations: self,
            location: Location::Params,
            field,
            value: value.to_owned(),
        }
    }
}

/// A single field moving through its rules.
pub struct FieldCheck<'v> {
    violations: &'v mut Violations,
    location: Location,
    field: &'static str,
    value: String,
}

impl FieldCheck<'_> {
    /// Replaces HTML-unsafe characters. Runs regardless of later failures.
    pub fn escape(mut self) -> Self {
        self.value = escape(&self.value);
        self
    }

    /// Character count must fall in `[min, max]`.
    pub fn length(self, min: usize, max: usize, message: &str) -> Self {
        let count = self.value.chars().count();
        if count < min || count > max {
            let violation = Violation::invalid(self.location, self.field, &self.value, message);
            self.violations.push(violation);
        }
        self
    }

    /// Parses the value as a store id; a malformed id is reported with
    /// `message` as a missing resource.
    pub fn object_id(self, message: &str) -> Option<ObjectId> {
        match ObjectId::parse_str(&self.value) {
            Ok(id) => Some(id),
            Err(_) => {
                let violation = Violation::missing(self.location, self.field, &self.value, message);
                self.violations.push(violation);
                None
            }
        }
    }

    pub fn value(self) -> String {
        self.value
    }
}

/// HTML escaping applied to user supplied text before it is stored.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}
