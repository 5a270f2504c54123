use dt_datamod::{format_table_name, Field};

use super::common::{generated_by, walk_fields, FieldVisitor, GenerateError};

#[derive(Default)]
struct SolidityVisitor {
    members: Vec<String>,
}

impl SolidityVisitor {
    /// Struct members carry no data location.
    fn member(field: &Field) -> String {
        let solidity_type = field.type_.solidity_type();
        let solidity_type = solidity_type
            .strip_prefix("memory ")
            .unwrap_or(solidity_type);
        format!("    {solidity_type} {};\n", field.name)
    }
}

impl FieldVisitor for SolidityVisitor {
    fn visit_codec_field(
        &mut self,
        field: &Field,
        _encode_func: &str,
        _decode_func: &str,
    ) -> Result<(), GenerateError> {
        self.members.push(Self::member(field));
        Ok(())
    }

    fn visit_table_field(&mut self, field: &Field) -> Result<(), GenerateError> {
        self.members.push(Self::member(field));
        Ok(())
    }
}

pub fn generate(name: &str, fields: &[Field]) -> Result<String, GenerateError> {
    let mut visitor = SolidityVisitor::default();
    walk_fields(&mut visitor, fields)?;

    let name = format_table_name(name);
    let mut output = format!("// {}\n\nstruct {name} {{\n", generated_by());
    for member in visitor.members {
        output.push_str(&member);
    }
    output.push_str("}\n");
    Ok(output)
}
