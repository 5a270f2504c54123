use std::collections::HashSet;

use heck::ToSnakeCase;
use thiserror::Error;
use tracing::debug;

use crate::error::TypeError;
use crate::field_type::{resolve, FieldType};
use crate::naming::{IdentifierRules, NameValidator};

/// A named field with its resolved type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub type_: FieldType,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field {field:?}: {source}")]
    Type {
        field: String,
        #[source]
        source: TypeError,
    },
    #[error("invalid field name {0:?}")]
    InvalidFieldName(String),
    #[error("duplicate field {0:?}")]
    DuplicateField(String),
}

/// Every failure from one call to [`resolve_fields`], in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field(s) failed to resolve", .errors.len())]
pub struct ResolveErrors {
    errors: Vec<FieldError>,
}

impl ResolveErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

impl IntoIterator for ResolveErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// Resolves `(field name, descriptor)` pairs.
///
/// Field names must satisfy [`IdentifierRules`] and stay distinct once
/// snake-cased, since that is how bindings spell them. `tables` only decides
/// `table <name>` references.
///
/// Does not stop at the first failure: either every field resolves, or all
/// failures are returned together.
pub fn resolve_fields<'a, I, V>(fields: I, tables: &V) -> Result<Vec<Field>, ResolveErrors>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
    V: NameValidator + ?Sized,
{
    let mut resolved = Vec::new();
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (name, descriptor) in fields {
        if !IdentifierRules.is_valid_name(name) {
            errors.push(FieldError::InvalidFieldName(name.to_owned()));
        } else if !seen.insert(name.to_snake_case()) {
            errors.push(FieldError::DuplicateField(name.to_owned()));
        }

        match resolve(descriptor, tables) {
            Ok(type_) => resolved.push(Field {
                name: name.to_owned(),
                type_,
            }),
            Err(source) => errors.push(FieldError::Type {
                field: name.to_owned(),
                source,
            }),
        }
    }

    if errors.is_empty() {
        Ok(resolved)
    } else {
        debug!(failed = errors.len(), "field resolution failed");
        Err(ResolveErrors { errors })
    }
}
