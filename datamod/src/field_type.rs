use heck::ToSnakeCase;
use tracing::{debug, trace};

use crate::error::{SizeKind, TypeError};
use crate::naming::{format_table_name, NameValidator};

/// Width in bytes of the slot used for dynamically sized values and table
/// references.
pub const SLOT_SIZE: usize = 32;

/// Width in bits of `uint`/`int` when written without a suffix.
pub const DEFAULT_INTEGER_BITS: i64 = 256;

const MAX_FIXED_BYTES: i64 = 32;

const BYTES_PREFIX: &str = "bytes";
const TABLE_PREFIX: &str = "table ";

/// How a field type is stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldKind {
    /// Fixed-width scalar stored inline.
    Value,
    /// Byte sequence, fixed or variable length.
    Bytes,
    /// Reference to another table.
    Table,
}

/// The resolved form of a type descriptor.
///
/// Fields are read-only; a `FieldType` can only be obtained from [`resolve`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldType {
    name: String,
    kind: FieldKind,
    size: usize,
    host_type: String,
    solidity_type: String,
    encode_func: Option<String>,
    decode_func: Option<String>,
    codec_width: Option<usize>,
}

impl FieldType {
    fn value(
        name: String,
        size: usize,
        host_type: &str,
        solidity_type: String,
        suffix: &str,
    ) -> Self {
        Self::with_codec(FieldKind::Value, name, size, host_type, solidity_type, suffix)
    }

    fn bytes(
        name: String,
        size: usize,
        host_type: &str,
        solidity_type: String,
        suffix: &str,
    ) -> Self {
        Self::with_codec(FieldKind::Bytes, name, size, host_type, solidity_type, suffix)
    }

    fn with_codec(
        kind: FieldKind,
        name: String,
        size: usize,
        host_type: &str,
        solidity_type: String,
        suffix: &str,
    ) -> Self {
        let suffix = suffix.to_snake_case();
        Self {
            name,
            kind,
            size,
            host_type: host_type.to_owned(),
            solidity_type,
            encode_func: Some(format!("encode_{suffix}")),
            decode_func: Some(format!("decode_{suffix}")),
            codec_width: None,
        }
    }

    fn fixed_bytes(size: usize) -> Self {
        let name = format!("bytes{size}");
        Self {
            codec_width: Some(size),
            ..Self::bytes(name.clone(), size, "Vec<u8>", name, "FixedBytes")
        }
    }

    fn table(name: &str) -> Self {
        let type_name = format_table_name(name);
        Self {
            name: name.to_owned(),
            kind: FieldKind::Table,
            size: SLOT_SIZE,
            solidity_type: format!("memory {type_name}"),
            host_type: type_name,
            encode_func: None,
            decode_func: None,
            codec_width: None,
        }
    }

    /// Canonical type name, e.g. `uint256` for both `uint` and `uint256`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Storage width in bytes; [`SLOT_SIZE`] for dynamic values and tables.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Rust type of the field in generated bindings.
    pub fn host_type(&self) -> &str {
        &self.host_type
    }

    pub fn solidity_type(&self) -> &str {
        &self.solidity_type
    }

    /// Name of the encoder in `dt_builtins::codec`. `None` for tables.
    pub fn encode_func(&self) -> Option<&str> {
        self.encode_func.as_deref()
    }

    /// Name of the decoder in `dt_builtins::codec`. `None` for tables.
    pub fn decode_func(&self) -> Option<&str> {
        self.decode_func.as_deref()
    }

    /// Width to pass as the last argument of the codec routines, for codecs
    /// shared between several widths (`bytes1` to `bytes31`).
    pub fn codec_width(&self) -> Option<usize> {
        self.codec_width
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Signedness {
    Unsigned,
    Signed,
}

impl Signedness {
    fn keyword(self) -> &'static str {
        match self {
            Self::Unsigned => "uint",
            Self::Signed => "int",
        }
    }

    fn codec_prefix(self) -> &'static str {
        match self {
            Self::Unsigned => "Uint",
            Self::Signed => "Int",
        }
    }

    /// Narrowest native integer holding `bits`, which must be at most 64.
    fn native_type(self, bits: usize) -> String {
        let prefix = match self {
            Self::Unsigned => 'u',
            Self::Signed => 'i',
        };
        format!("{prefix}{}", bits.next_power_of_two())
    }
}

/// Resolves a type descriptor into its [`FieldType`].
///
/// Table references (`table <name>`) are accepted only if `tables` accepts
/// the name.
pub fn resolve<V>(descriptor: &str, tables: &V) -> Result<FieldType, TypeError>
where
    V: NameValidator + ?Sized,
{
    let resolved = classify(descriptor, tables);
    match &resolved {
        Ok(field_type) => trace!(
            descriptor,
            kind = ?field_type.kind,
            size = field_type.size,
            "resolved field type"
        ),
        Err(err) => debug!(descriptor, %err, "rejected field type"),
    }
    resolved
}

fn classify<V>(descriptor: &str, tables: &V) -> Result<FieldType, TypeError>
where
    V: NameValidator + ?Sized,
{
    if let Some(field_type) = exact_match(descriptor) {
        return Ok(field_type);
    }
    if let Some(size) = descriptor.strip_prefix(BYTES_PREFIX) {
        return resolve_fixed_bytes(descriptor, size);
    }
    if let Some(bits) = descriptor.strip_prefix("uint") {
        return resolve_integer(descriptor, Signedness::Unsigned, bits);
    }
    if let Some(bits) = descriptor.strip_prefix("int") {
        return resolve_integer(descriptor, Signedness::Signed, bits);
    }
    if let Some(name) = descriptor.strip_prefix(TABLE_PREFIX) {
        return resolve_table(descriptor, name, tables);
    }
    Err(TypeError::UnknownType {
        descriptor: descriptor.to_owned(),
    })
}

fn exact_match(descriptor: &str) -> Option<FieldType> {
    let field_type = match descriptor {
        "address" => FieldType::value(
            "address".into(),
            20,
            "Address",
            "address".into(),
            "Address",
        ),
        "bool" => FieldType::value("bool".into(), 1, "bool", "bool".into(), "Bool"),
        "bytes" => FieldType::bytes(
            "bytes".into(),
            SLOT_SIZE,
            "Vec<u8>",
            "memory bytes".into(),
            "Bytes",
        ),
        "string" => FieldType::bytes(
            "string".into(),
            SLOT_SIZE,
            "String",
            "memory string".into(),
            "String",
        ),
        // Bare `uint`/`int` fall through too and get DEFAULT_INTEGER_BITS.
        _ => return None,
    };
    Some(field_type)
}

fn parse_size(descriptor: &str, size: &str) -> Result<i64, TypeError> {
    size.parse().map_err(|source| TypeError::MalformedDescriptor {
        descriptor: descriptor.to_owned(),
        source,
    })
}

fn resolve_fixed_bytes(descriptor: &str, size: &str) -> Result<FieldType, TypeError> {
    let size = parse_size(descriptor, size)?;
    if !(1..=MAX_FIXED_BYTES).contains(&size) {
        return Err(TypeError::InvalidSize {
            descriptor: descriptor.to_owned(),
            what: SizeKind::Bytes,
            size,
        });
    }

    let size = size as usize;
    // A full-width byte array is a hash.
    if size == SLOT_SIZE {
        let name = format!("bytes{size}");
        Ok(FieldType::bytes(name.clone(), size, "Hash", name, "Hash"))
    } else {
        Ok(FieldType::fixed_bytes(size))
    }
}

fn resolve_integer(
    descriptor: &str,
    signedness: Signedness,
    bits: &str,
) -> Result<FieldType, TypeError> {
    let bits = if bits.is_empty() {
        DEFAULT_INTEGER_BITS
    } else {
        parse_size(descriptor, bits)?
    };
    if bits < 8 || (bits > 64 && bits != 256) || bits % 8 != 0 {
        return Err(TypeError::InvalidSize {
            descriptor: descriptor.to_owned(),
            what: SizeKind::Integer,
            size: bits,
        });
    }
    if signedness == Signedness::Signed && bits == 256 {
        return Err(TypeError::UnsupportedSignedWide {
            descriptor: descriptor.to_owned(),
        });
    }

    let bits = bits as usize;
    let name = format!("{}{bits}", signedness.keyword());
    let suffix = format!("{}{bits}", signedness.codec_prefix());
    let host_type = if bits <= 64 {
        signedness.native_type(bits)
    } else {
        "U256".to_owned()
    };
    Ok(FieldType::value(name.clone(), bits / 8, &host_type, name, &suffix))
}

fn resolve_table<V>(descriptor: &str, name: &str, tables: &V) -> Result<FieldType, TypeError>
where
    V: NameValidator + ?Sized,
{
    if name.is_empty() || !tables.is_valid_name(name) {
        return Err(TypeError::InvalidIdentifier {
            descriptor: descriptor.to_owned(),
            name: name.to_owned(),
        });
    }
    Ok(FieldType::table(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::{IdentifierRules, KnownTables};

    fn resolve_plain(descriptor: &str) -> Result<FieldType, TypeError> {
        resolve(descriptor, &IdentifierRules)
    }

    #[track_caller]
    fn assert_resolves(
        descriptor: &str,
        kind: FieldKind,
        size: usize,
        host_type: &str,
        solidity_type: &str,
        codec: &str,
    ) {
        let field_type = resolve_plain(descriptor).unwrap();
        assert_eq!(field_type.kind(), kind);
        assert_eq!(field_type.size(), size);
        assert_eq!(field_type.host_type(), host_type);
        assert_eq!(field_type.solidity_type(), solidity_type);
        assert_eq!(field_type.encode_func(), Some(format!("encode_{codec}").as_str()));
        assert_eq!(field_type.decode_func(), Some(format!("decode_{codec}").as_str()));
    }

    #[test]
    fn exact_matches() {
        assert_resolves("address", FieldKind::Value, 20, "Address", "address", "address");
        assert_resolves("bool", FieldKind::Value, 1, "bool", "bool", "bool");
        assert_resolves("bytes", FieldKind::Bytes, 32, "Vec<u8>", "memory bytes", "bytes");
        assert_resolves("string", FieldKind::Bytes, 32, "String", "memory string", "string");
    }

    #[test]
    fn fixed_bytes() {
        assert_resolves("bytes1", FieldKind::Bytes, 1, "Vec<u8>", "bytes1", "fixed_bytes");
        assert_resolves("bytes20", FieldKind::Bytes, 20, "Vec<u8>", "bytes20", "fixed_bytes");
        assert_resolves("bytes31", FieldKind::Bytes, 31, "Vec<u8>", "bytes31", "fixed_bytes");
    }

    #[test]
    fn only_shared_fixed_bytes_codecs_take_a_width() {
        assert_eq!(resolve_plain("bytes4").unwrap().codec_width(), Some(4));
        assert_eq!(resolve_plain("bytes31").unwrap().codec_width(), Some(31));
        for descriptor in ["bytes32", "bytes", "string", "uint24", "address"] {
            assert_eq!(resolve_plain(descriptor).unwrap().codec_width(), None, "{descriptor}");
        }
    }

    #[test]
    fn bytes32_is_a_hash() {
        assert_resolves("bytes32", FieldKind::Bytes, 32, "Hash", "bytes32", "hash");
    }

    #[test]
    fn fixed_bytes_out_of_range() {
        for descriptor in ["bytes0", "bytes33", "bytes-1"] {
            assert!(
                matches!(
                    resolve_plain(descriptor),
                    Err(TypeError::InvalidSize {
                        what: SizeKind::Bytes,
                        ..
                    })
                ),
                "{descriptor}"
            );
        }
    }

    #[test]
    fn fixed_bytes_malformed() {
        for descriptor in ["bytesX", "bytes2x", "bytes 4", "bytes99999999999999999999"] {
            assert!(
                matches!(
                    resolve_plain(descriptor),
                    Err(TypeError::MalformedDescriptor { .. })
                ),
                "{descriptor}"
            );
        }
    }

    #[test]
    fn narrow_integers() {
        assert_resolves("uint8", FieldKind::Value, 1, "u8", "uint8", "uint8");
        assert_resolves("uint16", FieldKind::Value, 2, "u16", "uint16", "uint16");
        assert_resolves("uint32", FieldKind::Value, 4, "u32", "uint32", "uint32");
        assert_resolves("uint64", FieldKind::Value, 8, "u64", "uint64", "uint64");
        assert_resolves("int8", FieldKind::Value, 1, "i8", "int8", "int8");
        assert_resolves("int16", FieldKind::Value, 2, "i16", "int16", "int16");
        assert_resolves("int32", FieldKind::Value, 4, "i32", "int32", "int32");
        assert_resolves("int64", FieldKind::Value, 8, "i64", "int64", "int64");
    }

    #[test]
    fn odd_widths_use_wider_host_type() {
        assert_resolves("uint24", FieldKind::Value, 3, "u32", "uint24", "uint24");
        assert_resolves("uint40", FieldKind::Value, 5, "u64", "uint40", "uint40");
        assert_resolves("int48", FieldKind::Value, 6, "i64", "int48", "int48");
        assert_resolves("int56", FieldKind::Value, 7, "i64", "int56", "int56");
    }

    #[test]
    fn uint256_is_a_big_integer() {
        assert_resolves("uint256", FieldKind::Value, 32, "U256", "uint256", "uint256");
    }

    #[test]
    fn bare_uint_is_uint256() {
        assert_eq!(resolve_plain("uint"), resolve_plain("uint256"));
        assert_eq!(resolve_plain("uint").unwrap().name(), "uint256");
    }

    #[test]
    fn signed_256_is_rejected() {
        for descriptor in ["int256", "int"] {
            assert_eq!(
                resolve_plain(descriptor),
                Err(TypeError::UnsupportedSignedWide {
                    descriptor: descriptor.into()
                })
            );
        }
    }

    #[test]
    fn invalid_integer_widths() {
        let descriptors = [
            "uint0", "uint4", "uint12", "uint72", "uint128", "int128", "uint512", "int-8",
        ];
        for descriptor in descriptors {
            assert!(
                matches!(
                    resolve_plain(descriptor),
                    Err(TypeError::InvalidSize {
                        what: SizeKind::Integer,
                        ..
                    })
                ),
                "{descriptor}"
            );
        }
    }

    #[test]
    fn width_is_checked_before_sign() {
        assert!(matches!(
            resolve_plain("int512"),
            Err(TypeError::InvalidSize { size: 512, .. })
        ));
    }

    #[test]
    fn malformed_integer_suffix() {
        for descriptor in ["uintx", "integer", "int 8", "uint8 "] {
            assert!(
                matches!(
                    resolve_plain(descriptor),
                    Err(TypeError::MalformedDescriptor { .. })
                ),
                "{descriptor}"
            );
        }
    }

    #[test]
    fn table_reference() {
        let accept = |_: &str| true;
        let field_type = resolve("table order_item", &accept).unwrap();
        assert_eq!(field_type.name(), "order_item");
        assert_eq!(field_type.kind(), FieldKind::Table);
        assert_eq!(field_type.size(), SLOT_SIZE);
        assert_eq!(field_type.host_type(), "OrderItem");
        assert_eq!(field_type.solidity_type(), "memory OrderItem");
        assert_eq!(field_type.encode_func(), None);
        assert_eq!(field_type.decode_func(), None);
    }

    #[test]
    fn table_reference_rejected_by_validator() {
        let reject = |_: &str| false;
        assert_eq!(
            resolve("table Foo", &reject),
            Err(TypeError::InvalidIdentifier {
                descriptor: "table Foo".into(),
                name: "Foo".into(),
            })
        );
    }

    #[test]
    fn table_reference_uses_known_tables() {
        let tables: KnownTables = ["Order"].into_iter().collect();
        assert!(resolve("table Order", &tables).is_ok());
        assert!(matches!(
            resolve("table Customer", &tables),
            Err(TypeError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn empty_table_name_is_invalid() {
        let accept = |_: &str| true;
        assert!(matches!(
            resolve("table ", &accept),
            Err(TypeError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn unknown_types() {
        for descriptor in ["frobnicate", "", "table", "tableFoo", "Bool", " uint8", "address "] {
            assert_eq!(
                resolve_plain(descriptor),
                Err(TypeError::UnknownType {
                    descriptor: descriptor.into()
                }),
                "{descriptor:?}"
            );
        }
    }

    #[test]
    fn errors_carry_descriptor() {
        let err = resolve_plain("bytes33").unwrap_err();
        assert_eq!(err.descriptor(), "bytes33");
        assert_eq!(err.to_string(), "invalid bytes size 33 in type \"bytes33\"");
    }

    #[test]
    fn resolution_is_idempotent() {
        let tables: KnownTables = ["Order"].into_iter().collect();
        for descriptor in ["address", "bytes7", "int24", "uint", "table Order", "nope"] {
            assert_eq!(resolve(descriptor, &tables), resolve(descriptor, &tables));
        }
    }

    #[test]
    fn solidity_type_agrees_with_size() {
        for bits in (8..=64).step_by(8).chain([256]) {
            let field_type = resolve_plain(&format!("uint{bits}")).unwrap();
            let width: usize = field_type.solidity_type()["uint".len()..].parse().unwrap();
            assert_eq!(width, field_type.size() * 8);
        }
        for size in 1..=32 {
            let field_type = resolve_plain(&format!("bytes{size}")).unwrap();
            let width: usize = field_type.solidity_type()["bytes".len()..].parse().unwrap();
            assert_eq!(width, field_type.size());
        }
    }

    #[test]
    fn value_and_bytes_always_have_codecs() {
        let descriptors = [
            "address", "bool", "bytes", "string", "bytes3", "bytes32", "int40", "uint",
        ];
        for descriptor in descriptors {
            let field_type = resolve_plain(descriptor).unwrap();
            assert_ne!(field_type.kind(), FieldKind::Table);
            assert!(field_type.encode_func().is_some());
            assert!(field_type.decode_func().is_some());
            assert!(!field_type.name().is_empty());
        }
    }
}
