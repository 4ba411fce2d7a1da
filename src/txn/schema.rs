//! Schema composition and registration.
//!
//! A [`Schema`] is the immutable `{name, fields, required}` record every
//! instance of one transaction shape consults. Schemas are assembled by an
//! explicit [`SchemaBuilder`] step, run once per shape at program startup
//! (gateway catalogs hold them in `LazyLock` statics). All declaration
//! mistakes — an undeclared required name, a bad pattern, a default that
//! violates its own field — fail `build`, never first instance use.

use indexmap::{IndexMap, IndexSet};

use super::error::{SchemaError, SchemaResult};
use super::field::{FieldDef, FieldIssue, FieldSpec};

/// A named, ordered set of compiled field definitions plus the derived
/// required-name set.
#[derive(Debug)]
pub struct Schema {
    name: String,
    fields: IndexMap<String, FieldDef>,
    required: IndexSet<String>,
}

impl Schema {
    /// Starts declaring a schema with the given name.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: IndexMap::new(),
            inherited_required: IndexSet::new(),
            extra_required: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field definitions in declaration order (ancestors first).
    pub fn fields(&self) -> &IndexMap<String, FieldDef> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Names that must resolve to a value for an instance to validate.
    pub fn required(&self) -> &IndexSet<String> {
        &self.required
    }
}

enum FieldEntry {
    /// Copied forward from an ancestor, already compiled.
    Inherited(FieldDef),
    /// Declared directly on this schema, compiled at build.
    Declared(FieldSpec),
}

/// The explicit registration step that composes a schema from ancestors and
/// local declarations.
pub struct SchemaBuilder {
    name: String,
    fields: IndexMap<String, FieldEntry>,
    inherited_required: IndexSet<String>,
    extra_required: Vec<String>,
}

impl SchemaBuilder {
    /// Copies an ancestor's fields and required set forward.
    ///
    /// May be called multiple times; later ancestors win field-name
    /// collisions. Fields declared via [`field`](Self::field) overlay last
    /// and replace an inherited field entirely, constraints included. An
    /// overridden name keeps its original position in the declaration
    /// order.
    pub fn extends(mut self, ancestor: &Schema) -> Self {
        for (name, def) in ancestor.fields() {
            self.fields
                .insert(name.clone(), FieldEntry::Inherited(def.clone()));
        }
        for name in ancestor.required() {
            self.inherited_required.insert(name.clone());
        }
        self
    }

    /// Declares a field on this schema.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), FieldEntry::Declared(spec));
        self
    }

    /// Marks already-declared (usually inherited) field names as required
    /// without redeclaring them.
    pub fn require<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_required.extend(names.into_iter().map(Into::into));
        self
    }

    /// Compiles declared fields, merges the required set, and checks the
    /// schema's own invariants.
    pub fn build(self) -> SchemaResult<Schema> {
        let name = self.name;

        let mut fields = IndexMap::with_capacity(self.fields.len());
        for (field_name, entry) in self.fields {
            let def = match entry {
                FieldEntry::Inherited(def) => def,
                FieldEntry::Declared(spec) => spec
                    .compile()
                    .map_err(|issue| field_issue_error(&name, &field_name, issue))?,
            };
            fields.insert(field_name, def);
        }

        // Ancestor required sets, then required-flagged fields, then the
        // explicitly listed extras.
        let mut required = self.inherited_required;
        for (field_name, def) in &fields {
            if def.is_required() {
                required.insert(field_name.clone());
            }
        }
        for field_name in self.extra_required {
            required.insert(field_name);
        }

        for field_name in &required {
            if !fields.contains_key(field_name) {
                return Err(SchemaError::RequiredFieldUndeclared {
                    schema: name,
                    field: field_name.clone(),
                });
            }
        }

        tracing::debug!(
            schema = %name,
            fields = fields.len(),
            required = required.len(),
            "schema registered"
        );

        Ok(Schema {
            name,
            fields,
            required,
        })
    }
}

fn field_issue_error(schema: &str, field: &str, issue: FieldIssue) -> SchemaError {
    match issue {
        FieldIssue::Pattern(source) => SchemaError::InvalidPattern {
            schema: schema.to_owned(),
            field: field.to_owned(),
            source,
        },
        FieldIssue::Misapplied { constraint, kind } => SchemaError::ConstraintKindMismatch {
            schema: schema.to_owned(),
            field: field.to_owned(),
            constraint,
            kind,
        },
        FieldIssue::BadDefault(violation) => SchemaError::InvalidDefault {
            schema: schema.to_owned(),
            field: field.to_owned(),
            expected: violation.expected,
            actual: violation.actual,
        },
    }
}
