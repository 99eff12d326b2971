//! Config tree.
//!
//! A [`Config`] and every [`ConfigClass`] hold one ordered list of
//! [`ConfigExpression`]s, nested classes included, so the source order of
//! interleaved assignments and classes survives a round trip. The [`Scope`]
//! trait gives both typed views over that list.
//!
//! Equality of expression lists ignores order: two classes are equal when
//! they contain the same expressions, however they are arranged.

use crate::value::ConfigValue;

/// Operator of an array expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayOperator {
    /// `=`
    Assign,
    /// `+=`
    Add,
    /// `-=`
    Subtract,
}

impl ArrayOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            ArrayOperator::Assign => "=",
            ArrayOperator::Add => "+=",
            ArrayOperator::Subtract => "-=",
        }
    }
}

/// One statement of a scope.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigExpression {
    /// `identifier = value;`
    Variable {
        identifier: String,
        value: ConfigValue,
    },
    /// `identifier[] = {...};` and its `+=` / `-=` forms.
    Array {
        identifier: String,
        operator: ArrayOperator,
        values: Vec<ConfigValue>,
    },
    /// `delete identifier;`
    Delete { identifier: String },
    /// `class identifier;` or `class identifier : parent;`
    ExternalClass {
        identifier: String,
        parent: Option<String>,
    },
    /// A class with a body.
    Class(ConfigClass),
}

fn checked(identifier: impl Into<String>) -> String {
    let identifier = identifier.into();
    assert!(!identifier.is_empty(), "config identifiers must not be empty");
    identifier
}

impl ConfigExpression {
    pub fn variable(identifier: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        ConfigExpression::Variable {
            identifier: checked(identifier),
            value: value.into(),
        }
    }

    pub fn array(
        identifier: impl Into<String>,
        operator: ArrayOperator,
        values: Vec<ConfigValue>,
    ) -> Self {
        ConfigExpression::Array {
            identifier: checked(identifier),
            operator,
            values,
        }
    }

    pub fn delete(identifier: impl Into<String>) -> Self {
        ConfigExpression::Delete {
            identifier: checked(identifier),
        }
    }

    pub fn external_class(identifier: impl Into<String>, parent: Option<String>) -> Self {
        ConfigExpression::ExternalClass {
            identifier: checked(identifier),
            parent: parent.map(checked),
        }
    }

    /// Identifier the expression binds or refers to.
    pub fn identifier(&self) -> &str {
        match self {
            ConfigExpression::Variable { identifier, .. }
            | ConfigExpression::Array { identifier, .. }
            | ConfigExpression::Delete { identifier }
            | ConfigExpression::ExternalClass { identifier, .. } => identifier,
            ConfigExpression::Class(class) => class.identifier(),
        }
    }
}

impl From<ConfigClass> for ConfigExpression {
    fn from(class: ConfigClass) -> Self {
        ConfigExpression::Class(class)
    }
}

/// Shared accessors of [`Config`] and [`ConfigClass`].
pub trait Scope {
    fn expressions(&self) -> &[ConfigExpression];

    fn expressions_mut(&mut self) -> &mut Vec<ConfigExpression>;

    fn push(&mut self, expression: impl Into<ConfigExpression>) {
        self.expressions_mut().push(expression.into());
    }

    /// Nested classes with a body, in source order.
    fn classes(&self) -> impl Iterator<Item = &ConfigClass> {
        self.expressions().iter().filter_map(|expression| match expression {
            ConfigExpression::Class(class) => Some(class),
            _ => None,
        })
    }

    fn classes_mut(&mut self) -> impl Iterator<Item = &mut ConfigClass> {
        self.expressions_mut()
            .iter_mut()
            .filter_map(|expression| match expression {
                ConfigExpression::Class(class) => Some(class),
                _ => None,
            })
    }

    /// First nested class named `identifier`.
    fn class(&self, identifier: &str) -> Option<&ConfigClass> {
        self.classes().find(|class| class.identifier() == identifier)
    }

    fn class_mut(&mut self, identifier: &str) -> Option<&mut ConfigClass> {
        self.classes_mut().find(|class| class.identifier() == identifier)
    }

    /// `(identifier, value)` of every variable.
    fn variables(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.expressions().iter().filter_map(|expression| match expression {
            ConfigExpression::Variable { identifier, value } => Some((identifier.as_str(), value)),
            _ => None,
        })
    }

    fn variable(&self, identifier: &str) -> Option<&ConfigValue> {
        self.variables()
            .find(|(name, _)| *name == identifier)
            .map(|(_, value)| value)
    }

    /// Overwrite the variable `identifier`, appending it when missing.
    fn set_variable(&mut self, identifier: &str, value: ConfigValue) {
        for expression in self.expressions_mut().iter_mut() {
            if let ConfigExpression::Variable {
                identifier: name,
                value: current,
            } = expression
            {
                if name.as_str() == identifier {
                    *current = value;
                    return;
                }
            }
        }
        self.push(ConfigExpression::variable(identifier, value));
    }

    /// `(identifier, operator, values)` of every array expression.
    fn arrays(&self) -> impl Iterator<Item = (&str, ArrayOperator, &[ConfigValue])> {
        self.expressions().iter().filter_map(|expression| match expression {
            ConfigExpression::Array {
                identifier,
                operator,
                values,
            } => Some((identifier.as_str(), *operator, values.as_slice())),
            _ => None,
        })
    }

    fn deletes(&self) -> impl Iterator<Item = &str> {
        self.expressions().iter().filter_map(|expression| match expression {
            ConfigExpression::Delete { identifier } => Some(identifier.as_str()),
            _ => None,
        })
    }

    /// `(identifier, parent)` of every forward declaration.
    fn external_classes(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.expressions().iter().filter_map(|expression| match expression {
            ConfigExpression::ExternalClass { identifier, parent } => {
                Some((identifier.as_str(), parent.as_deref()))
            }
            _ => None,
        })
    }
}

/// Named scope with an optional parent class.
#[derive(Debug, Clone)]
pub struct ConfigClass {
    identifier: String,
    parent: Option<String>,
    expressions: Vec<ConfigExpression>,
}

impl ConfigClass {
    /// # Panics
    ///
    /// Panics if `identifier` or `parent` is empty.
    pub fn new(identifier: impl Into<String>, parent: Option<String>) -> Self {
        Self {
            identifier: checked(identifier),
            parent: parent.map(checked),
            expressions: Vec::new(),
        }
    }

    /// Builder-style [`Scope::push`].
    pub fn with(mut self, expression: impl Into<ConfigExpression>) -> Self {
        self.push(expression);
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }
}

impl Scope for ConfigClass {
    fn expressions(&self) -> &[ConfigExpression] {
        &self.expressions
    }

    fn expressions_mut(&mut self) -> &mut Vec<ConfigExpression> {
        &mut self.expressions
    }
}

impl PartialEq for ConfigClass {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
            && self.parent == other.parent
            && same_expressions(&self.expressions, &other.expressions)
    }
}

/// Top-level scope of a config file.
#[derive(Debug, Clone, Default)]
pub struct Config {
    expressions: Vec<ConfigExpression>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Scope::push`].
    pub fn with(mut self, expression: impl Into<ConfigExpression>) -> Self {
        self.push(expression);
        self
    }

    /// Returns true if the config has no expressions at all.
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }
}

impl Scope for Config {
    fn expressions(&self) -> &[ConfigExpression] {
        &self.expressions
    }

    fn expressions_mut(&mut self) -> &mut Vec<ConfigExpression> {
        &mut self.expressions
    }
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        same_expressions(&self.expressions, &other.expressions)
    }
}

/// Multiset comparison.
fn same_expressions(left: &[ConfigExpression], right: &[ConfigExpression]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut matched = vec![false; right.len()];
    for expression in left {
        let found = right
            .iter()
            .enumerate()
            .position(|(index, candidate)| !matched[index] && candidate == expression);
        match found {
            Some(index) => matched[index] = true,
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConfigClass {
        ConfigClass::new("Test", None)
            .with(ConfigExpression::variable("str", "hi"))
            .with(ConfigExpression::array(
                "arr",
                ArrayOperator::Assign,
                vec![1.into(), 2.into()],
            ))
            .with(ConfigClass::new("Inner", Some("Base".to_string())))
            .with(ConfigExpression::delete("old"))
            .with(ConfigExpression::external_class("Base", None))
    }

    #[test]
    fn test_typed_views() {
        let class = sample();
        assert_eq!(class.variable("str"), Some(&ConfigValue::from("hi")));
        assert_eq!(class.arrays().count(), 1);
        assert_eq!(class.classes().map(|c| c.identifier()).collect::<Vec<_>>(), vec!["Inner"]);
        assert_eq!(class.class("Inner").and_then(|c| c.parent()), Some("Base"));
        assert_eq!(class.deletes().collect::<Vec<_>>(), vec!["old"]);
        assert_eq!(class.external_classes().collect::<Vec<_>>(), vec![("Base", None)]);
    }

    #[test]
    fn test_equality_ignores_order() {
        let forward = sample();
        let mut reversed = ConfigClass::new("Test", None);
        for expression in forward.expressions().iter().rev() {
            reversed.push(expression.clone());
        }
        assert_eq!(forward, reversed);

        let mut changed = reversed.clone();
        changed.set_variable("str", "bye".into());
        assert_ne!(forward, changed);
    }

    #[test]
    fn test_equality_counts_duplicates() {
        let twice = Config::new()
            .with(ConfigExpression::delete("a"))
            .with(ConfigExpression::delete("a"));
        let mixed = Config::new()
            .with(ConfigExpression::delete("a"))
            .with(ConfigExpression::delete("b"));
        assert_ne!(twice, mixed);
    }

    #[test]
    fn test_set_variable_appends_when_missing() {
        let mut config = Config::new();
        config.set_variable("dir", "@mod".into());
        config.set_variable("dir", "@other".into());
        assert_eq!(config.expressions().len(), 1);
        assert_eq!(config.variable("dir"), Some(&ConfigValue::from("@other")));
    }

    #[test]
    #[should_panic]
    fn test_empty_identifier_panics() {
        let _ = ConfigExpression::delete("");
    }
}
