use std::collections::BTreeSet;

use check_keyword::CheckKeyword;
use heck::ToPascalCase;

/// Decides whether a declared name may be referenced from a descriptor.
///
/// The schema layer owns the set of valid names; the resolver only asks.
/// Any `Fn(&str) -> bool` closure is a validator.
pub trait NameValidator {
    fn is_valid_name(&self, name: &str) -> bool;
}

impl<F> NameValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid_name(&self, name: &str) -> bool {
        self(name)
    }
}

/// Accepts any name usable as an identifier in generated code: an ASCII
/// letter followed by ASCII alphanumerics or underscores, and not a keyword.
#[derive(Copy, Clone, Debug, Default)]
pub struct IdentifierRules;

impl NameValidator for IdentifierRules {
    fn is_valid_name(&self, name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !name.is_keyword()
    }
}

/// Type names generated bindings already use for builtin field types.
pub const RESERVED_TYPE_NAMES: &[&str] = &["Address", "Hash", "U256", "String", "Vec"];

/// Whether the type generated for a table or row named `name` would shadow
/// a builtin field type.
pub fn is_reserved_type_name(name: &str) -> bool {
    RESERVED_TYPE_NAMES.contains(&format_table_name(name).as_str())
}

/// Accepts the table names declared so far, provided they are also valid
/// identifiers and do not shadow a builtin type.
#[derive(Clone, Debug, Default)]
pub struct KnownTables {
    names: BTreeSet<String>,
}

impl KnownTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl<S: Into<String>> FromIterator<S> for KnownTables {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl NameValidator for KnownTables {
    fn is_valid_name(&self, name: &str) -> bool {
        IdentifierRules.is_valid_name(name) && !is_reserved_type_name(name) && self.contains(name)
    }
}

/// The type name generated for a table, e.g. `order_item` -> `OrderItem`.
pub fn format_table_name(name: &str) -> String {
    name.to_pascal_case()
}
