//! Binary ("rapified") config encoding.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! header:  magic u32 (0x50617200, bytes "\0raP") | 0 u32 | 8 u32 | terminator offset u32
//! scope:   parent asciiz | entry count (compressed int)
//!          | per nested class: 0 u8, name asciiz, body offset u32
//!          | end-of-entries offset u32
//!          | every other expression inline
//!          | nested class bodies, each a scope, in directory order
//! trailer: 0 u32
//! ```
//!
//! Encoding is two-pass. Pass 1 computes the exact size of every scope so
//! pass 2 can write absolute forward offsets before the bodies they point at.
//! Both passes share the size functions below, and pass 2 checks every
//! promised offset against the actual write position.

use byteorder::{LittleEndian, WriteBytesExt};

use crate::model::{ArrayOperator, Config, ConfigClass, ConfigExpression, Scope};
use crate::value::ConfigValue;
use crate::{Error, Result};

/// Magic word, written little-endian.
pub const RAP_MAGIC: u32 = 0x5061_7200;

/// Bytes before the root scope.
const HEADER_SIZE: usize = 16;
const TRAILER_SIZE: usize = 4;

/// Entry type tags.
mod tag {
    pub const CLASS: u8 = 0;
    pub const VARIABLE: u8 = 1;
    pub const ARRAY: u8 = 2;
    pub const EXTERNAL_CLASS: u8 = 3;
    pub const DELETE: u8 = 4;
    pub const ARRAY_MODIFY: u8 = 5;
}

/// Value subtype tags.
mod subtype {
    pub const STRING: u8 = 0;
    pub const FLOAT: u8 = 1;
    pub const INT: u8 = 2;
    pub const ARRAY: u8 = 3;
}

const MODIFY_ADD: u32 = 1;
const MODIFY_SUBTRACT: u32 = 2;

/// Encode `config` in rapified form.
pub fn rapify(config: &Config) -> Result<Vec<u8>> {
    Rapifier::new(config).build()
}

/// Two-pass rapify encoder.
///
/// # Example
///
/// ```
/// use pboforge_config::{parse_str, Rapifier};
///
/// let config = parse_str("class A { x = 1; };").config;
/// let rapifier = Rapifier::new(&config);
/// let bytes = rapifier.build().unwrap();
/// assert_eq!(bytes.len(), rapifier.encoded_size());
/// assert_eq!(&bytes[..4], b"\0raP");
/// ```
#[derive(Debug)]
pub struct Rapifier<'a> {
    config: &'a Config,
}

impl<'a> Rapifier<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Exact length of the encoded output.
    pub fn encoded_size(&self) -> usize {
        HEADER_SIZE + scope_size(None, self.config.expressions()) + TRAILER_SIZE
    }

    pub fn build(&self) -> Result<Vec<u8>> {
        let total = self.encoded_size();
        if u32::try_from(total).is_err() {
            return Err(Error::TooLarge { size: total });
        }

        let mut output = Vec::with_capacity(total);
        output.write_u32::<LittleEndian>(RAP_MAGIC)?;
        output.write_u32::<LittleEndian>(0)?;
        output.write_u32::<LittleEndian>(8)?;
        write_offset(&mut output, total - TRAILER_SIZE)?;

        write_scope(&mut output, None, self.config.expressions())?;

        expect_position(&output, total - TRAILER_SIZE)?;
        output.write_u32::<LittleEndian>(0)?;
        Ok(output)
    }
}

// Pass 1

fn asciiz_size(text: &str) -> usize {
    text.len() + 1
}

/// Bytes of a 7-bits-per-byte compressed integer.
fn compressed_int_size(mut value: usize) -> usize {
    let mut size = 1;
    while value >= 0x80 {
        value >>= 7;
        size += 1;
    }
    size
}

fn payload_size(value: &ConfigValue) -> usize {
    match value {
        ConfigValue::String(text) => asciiz_size(text),
        ConfigValue::Int(_) | ConfigValue::Float(_) => 4,
        ConfigValue::Array(values) => array_size(values),
    }
}

fn array_size(values: &[ConfigValue]) -> usize {
    compressed_int_size(values.len()) + values.iter().map(|value| 1 + payload_size(value)).sum::<usize>()
}

/// Size of an entry as it appears in its scope, excluding class bodies.
fn entry_size(expression: &ConfigExpression) -> usize {
    match expression {
        ConfigExpression::Variable {
            identifier,
            value: ConfigValue::Array(values),
        } => 1 + asciiz_size(identifier) + array_size(values),
        ConfigExpression::Variable { identifier, value } => 2 + asciiz_size(identifier) + payload_size(value),
        ConfigExpression::Array {
            identifier,
            operator: ArrayOperator::Assign,
            values,
        } => 1 + asciiz_size(identifier) + array_size(values),
        ConfigExpression::Array { identifier, values, .. } => 1 + 4 + asciiz_size(identifier) + array_size(values),
        ConfigExpression::ExternalClass { identifier, .. } | ConfigExpression::Delete { identifier } => {
            1 + asciiz_size(identifier)
        }
        ConfigExpression::Class(class) => 1 + asciiz_size(class.identifier()) + 4,
    }
}

/// Size of a scope up to and including its inline entries.
fn scope_head_size(parent: Option<&str>, expressions: &[ConfigExpression]) -> usize {
    asciiz_size(parent.unwrap_or(""))
        + compressed_int_size(expressions.len())
        + expressions.iter().map(entry_size).sum::<usize>()
        + 4
}

fn scope_size(parent: Option<&str>, expressions: &[ConfigExpression]) -> usize {
    scope_head_size(parent, expressions) + nested_classes(expressions).map(class_size).sum::<usize>()
}

fn class_size(class: &ConfigClass) -> usize {
    scope_size(class.parent(), class.expressions())
}

fn nested_classes(expressions: &[ConfigExpression]) -> impl Iterator<Item = &ConfigClass> {
    expressions.iter().filter_map(|expression| match expression {
        ConfigExpression::Class(class) => Some(class),
        _ => None,
    })
}

// Pass 2

fn write_offset(output: &mut Vec<u8>, offset: usize) -> Result<()> {
    let offset = u32::try_from(offset).map_err(|_| Error::TooLarge { size: offset })?;
    output.write_u32::<LittleEndian>(offset)?;
    Ok(())
}

fn expect_position(output: &[u8], expected: usize) -> Result<()> {
    if output.len() != expected {
        return Err(Error::OffsetDrift {
            expected,
            actual: output.len(),
        });
    }
    Ok(())
}

fn write_asciiz(output: &mut Vec<u8>, text: &str) {
    output.extend_from_slice(text.as_bytes());
    output.push(0);
}

fn write_compressed_int(output: &mut Vec<u8>, mut value: usize) {
    while value >= 0x80 {
        output.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    output.push(value as u8);
}

fn write_scope(output: &mut Vec<u8>, parent: Option<&str>, expressions: &[ConfigExpression]) -> Result<()> {
    let start = output.len();
    let head_end = start + scope_head_size(parent, expressions);

    write_asciiz(output, parent.unwrap_or(""));
    write_compressed_int(output, expressions.len());

    // Class directory, bodies laid out back to back after the head.
    let mut body_offset = head_end;
    for class in nested_classes(expressions) {
        output.push(tag::CLASS);
        write_asciiz(output, class.identifier());
        write_offset(output, body_offset)?;
        body_offset += class_size(class);
    }
    write_offset(output, head_end)?;

    for expression in expressions {
        write_entry(output, expression)?;
    }
    expect_position(output, head_end)?;

    let mut body_offset = head_end;
    for class in nested_classes(expressions) {
        expect_position(output, body_offset)?;
        write_scope(output, class.parent(), class.expressions())?;
        body_offset += class_size(class);
    }
    expect_position(output, body_offset)?;
    debug_assert_eq!(body_offset, start + scope_size(parent, expressions));
    Ok(())
}

fn write_entry(output: &mut Vec<u8>, expression: &ConfigExpression) -> Result<()> {
    match expression {
        ConfigExpression::Class(_) => {}
        ConfigExpression::Variable {
            identifier,
            value: ConfigValue::Array(values),
        } => {
            output.push(tag::ARRAY);
            write_asciiz(output, identifier);
            write_array(output, values)?;
        }
        ConfigExpression::Variable { identifier, value } => {
            output.push(tag::VARIABLE);
            output.push(subtype_of(value));
            write_asciiz(output, identifier);
            write_payload(output, value)?;
        }
        ConfigExpression::Array {
            identifier,
            operator,
            values,
        } => {
            match operator {
                ArrayOperator::Assign => output.push(tag::ARRAY),
                ArrayOperator::Add => {
                    output.push(tag::ARRAY_MODIFY);
                    output.write_u32::<LittleEndian>(MODIFY_ADD)?;
                }
                ArrayOperator::Subtract => {
                    output.push(tag::ARRAY_MODIFY);
                    output.write_u32::<LittleEndian>(MODIFY_SUBTRACT)?;
                }
            }
            write_asciiz(output, identifier);
            write_array(output, values)?;
        }
        ConfigExpression::ExternalClass { identifier, .. } => {
            output.push(tag::EXTERNAL_CLASS);
            write_asciiz(output, identifier);
        }
        ConfigExpression::Delete { identifier } => {
            output.push(tag::DELETE);
            write_asciiz(output, identifier);
        }
    }
    Ok(())
}

fn subtype_of(value: &ConfigValue) -> u8 {
    match value {
        ConfigValue::String(_) => subtype::STRING,
        ConfigValue::Float(_) => subtype::FLOAT,
        ConfigValue::Int(_) => subtype::INT,
        ConfigValue::Array(_) => subtype::ARRAY,
    }
}

fn write_payload(output: &mut Vec<u8>, value: &ConfigValue) -> Result<()> {
    match value {
        ConfigValue::String(text) => write_asciiz(output, text),
        ConfigValue::Float(number) => output.write_f32::<LittleEndian>(*number)?,
        ConfigValue::Int(number) => output.write_i32::<LittleEndian>(*number)?,
        ConfigValue::Array(values) => write_array(output, values)?,
    }
    Ok(())
}

fn write_array(output: &mut Vec<u8>, values: &[ConfigValue]) -> Result<()> {
    write_compressed_int(output, values.len());
    for value in values {
        output.push(subtype_of(value));
        write_payload(output, value)?;
    }
    Ok(())
}
