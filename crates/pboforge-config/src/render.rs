//! Text rendering of config trees.
//!
//! Output is tab-indented, one statement per line, in source order, and
//! parses back to an equal tree.

use std::fmt::{self, Write};

use crate::model::{Config, ConfigClass, ConfigExpression, Scope};
use crate::value::write_array;

/// Render `config` as `config.cpp` text.
pub fn render_text(config: &Config) -> Vec<u8> {
    config.to_string().into_bytes()
}

fn write_expression(out: &mut impl Write, expression: &ConfigExpression, depth: usize) -> fmt::Result {
    let indent = "\t".repeat(depth);
    match expression {
        ConfigExpression::Variable { identifier, value } => {
            writeln!(out, "{indent}{identifier} = {value};")
        }
        ConfigExpression::Array {
            identifier,
            operator,
            values,
        } => {
            write!(out, "{indent}{identifier}[] {} ", operator.symbol())?;
            write_array(out, values)?;
            out.write_str(";\n")
        }
        ConfigExpression::Delete { identifier } => writeln!(out, "{indent}delete {identifier};"),
        ConfigExpression::ExternalClass { identifier, parent } => match parent {
            Some(parent) => writeln!(out, "{indent}class {identifier} : {parent};"),
            None => writeln!(out, "{indent}class {identifier};"),
        },
        ConfigExpression::Class(class) => write_class(out, class, depth),
    }
}

fn write_class(out: &mut impl Write, class: &ConfigClass, depth: usize) -> fmt::Result {
    let indent = "\t".repeat(depth);
    match class.parent() {
        Some(parent) => writeln!(out, "{indent}class {} : {parent}", class.identifier())?,
        None => writeln!(out, "{indent}class {}", class.identifier())?,
    }
    writeln!(out, "{indent}{{")?;
    for expression in class.expressions() {
        write_expression(out, expression, depth + 1)?;
    }
    writeln!(out, "{indent}}};")
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for expression in self.expressions() {
            write_expression(f, expression, 0)?;
        }
        Ok(())
    }
}

impl fmt::Display for ConfigClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_class(f, self, 0)
    }
}

impl fmt::Display for ConfigExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expression(f, self, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArrayOperator;
    use crate::parser::parse_str;
    use crate::value::ConfigValue;

    const SOURCE: &str = r#"
        class CfgPatches {
            class MyMod {
                units[] = {};
                requiredVersion = 0.1;
                requiredAddons[] = {"DZ_Data", "DZ_Scripts"};
            };
        };
        class Base;
        class CfgMods {
            class MyMod : Base {
                dir = "MyMod";
                name = "My \"quoted\" mod";
                weights[] += {1, 2.5, {3, "x"}};
                delete old;
            };
        };
        version = 3;
    "#;

    #[test]
    fn test_render_layout() {
        let config = Config::new().with(
            ConfigClass::new("A", Some("B".to_string()))
                .with(ConfigExpression::variable("x", 1))
                .with(ConfigExpression::array(
                    "list",
                    ArrayOperator::Subtract,
                    vec![ConfigValue::from("a"), ConfigValue::Float(2.0)],
                ))
                .with(ConfigClass::new("Inner", None)),
        );
        let text = String::from_utf8(render_text(&config)).unwrap();
        assert_eq!(
            text,
            "class A : B\n{\n\tx = 1;\n\tlist[] -= {\"a\", 2.0};\n\tclass Inner\n\t{\n\t};\n};\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let first = parse_str(SOURCE);
        assert!(first.is_success(), "{:?}", first.errors);

        let text = first.config.to_string();
        let second = parse_str(&text);
        assert!(second.is_success(), "{:?}", second.errors);
        assert_eq!(first.config, second.config);

        // Rendering is a fixed point.
        assert_eq!(second.config.to_string(), text);
    }
}
