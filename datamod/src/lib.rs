//! Resolution of datamod type descriptors (`uint64`, `bytes20`,
//! `table Order`, ...) into the metadata used to generate field bindings.

pub mod error;
pub mod field;
pub mod field_type;
pub mod naming;

pub use error::{SizeKind, TypeError};
pub use field::{resolve_fields, Field, FieldError, ResolveErrors};
pub use field_type::{resolve, FieldKind, FieldType, SLOT_SIZE};
pub use naming::{
    format_table_name, is_reserved_type_name, IdentifierRules, KnownTables, NameValidator,
};
