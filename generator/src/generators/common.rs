use dt_datamod::{is_reserved_type_name, Field, FieldKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("field {0:?} has no codec functions")]
    MissingCodec(String),
    #[error("{0:?} would shadow a builtin type")]
    ReservedName(String),
    #[error("field {0:?} collides with an earlier field")]
    DuplicateField(String),
    #[cfg(feature = "generator-rust")]
    #[error("host type {host_type:?} of field {field:?} is not a Rust type")]
    HostType {
        field: String,
        host_type: String,
        #[source]
        source: syn::Error,
    },
}

/// Receives the fields of a row, split by how they are stored.
pub(super) trait FieldVisitor {
    fn visit_codec_field(
        &mut self,
        field: &Field,
        encode_func: &str,
        decode_func: &str,
    ) -> Result<(), GenerateError>;

    fn visit_table_field(&mut self, field: &Field) -> Result<(), GenerateError>;
}

pub(super) fn walk_fields<V: FieldVisitor>(
    visitor: &mut V,
    fields: &[Field],
) -> Result<(), GenerateError> {
    for field in fields {
        match field.type_.kind() {
            FieldKind::Value | FieldKind::Bytes => {
                let (Some(encode_func), Some(decode_func)) =
                    (field.type_.encode_func(), field.type_.decode_func())
                else {
                    return Err(GenerateError::MissingCodec(field.name.clone()));
                };
                visitor.visit_codec_field(field, encode_func, decode_func)?;
            }
            FieldKind::Table => {
                if is_reserved_type_name(field.type_.name()) {
                    return Err(GenerateError::ReservedName(field.type_.name().to_owned()));
                }
                visitor.visit_table_field(field)?
            }
        }
    }
    Ok(())
}

/// Header line naming the generator that produced a file.
pub(super) fn generated_by() -> &'static str {
    concat!(
        "Generated by ",
        env!("CARGO_PKG_NAME"),
        " ",
        env!("CARGO_PKG_VERSION")
    )
}
