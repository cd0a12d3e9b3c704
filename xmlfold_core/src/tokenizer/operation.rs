use super::{PropertyValue, Tokenizer};
use crate::error::{Error, Result};
use log::{error, trace};

/// Cursor operations that can be requested from a [`Tokenizer`] by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Advance to the next node.
    Read,
    /// Advance to the next node, skipping the subtree of the current element.
    Next,
    MoveToFirstAttribute,
    MoveToNextAttribute,
    /// Move back from an attribute to its element.
    MoveToElement,
    MoveToAttribute(String),
    GetAttribute(String),
    Close,
}

impl Operation {
    /// Resolves an operation from its name and arguments.
    ///
    /// Fails with [`Error::UnsupportedOperation`] if no operation has that name.
    pub fn parse(name: &str, args: &[&str]) -> Result<Self> {
        let arg = |operation: &'static str, index: usize| {
            args.get(index)
                .map(|arg| (*arg).to_owned())
                .ok_or(Error::MissingArgument { operation, index })
        };
        let operation = match name {
            "read" => Operation::Read,
            "next" => Operation::Next,
            "moveToFirstAttribute" => Operation::MoveToFirstAttribute,
            "moveToNextAttribute" => Operation::MoveToNextAttribute,
            "moveToElement" => Operation::MoveToElement,
            "moveToAttribute" => Operation::MoveToAttribute(arg("moveToAttribute", 0)?),
            "getAttribute" => Operation::GetAttribute(arg("getAttribute", 0)?),
            "close" => Operation::Close,
            _ => {
                error!(target: "xmlfold", "unsupported operation '{name}'");
                return Err(Error::UnsupportedOperation(name.to_owned()));
            }
        };
        Ok(operation)
    }
}

impl Tokenizer {
    /// Applies a cursor operation.
    pub fn apply(&mut self, operation: &Operation) -> Result<PropertyValue> {
        trace!(target: "xmlfold", "applying {operation:?}");
        let outcome = match operation {
            Operation::Read => PropertyValue::Bool(self.next_token()?.is_some()),
            Operation::Next => PropertyValue::Bool(self.skip_subtree()?.is_some()),
            Operation::MoveToFirstAttribute => PropertyValue::Bool(self.move_to_first_attribute()),
            Operation::MoveToNextAttribute => PropertyValue::Bool(self.move_to_next_attribute()),
            Operation::MoveToElement => PropertyValue::Bool(self.move_to_element()),
            Operation::MoveToAttribute(name) => PropertyValue::Bool(self.move_to_attribute(name)),
            Operation::GetAttribute(name) => {
                PropertyValue::Text(self.get_attribute(name).map(str::to_owned))
            }
            Operation::Close => {
                self.close();
                PropertyValue::Bool(true)
            }
        };
        Ok(outcome)
    }

    pub fn move_to_first_attribute(&mut self) -> bool {
        if self.node.attributes.is_empty() {
            false
        } else {
            self.attribute = Some(0);
            true
        }
    }

    /// Moves to the attribute following the current one,
    /// or to the first attribute when positioned on the element.
    pub fn move_to_next_attribute(&mut self) -> bool {
        let next = self.attribute.map_or(0, |index| index + 1);
        if next < self.node.attributes.len() {
            self.attribute = Some(next);
            true
        } else {
            false
        }
    }

    pub fn move_to_element(&mut self) -> bool {
        self.attribute.take().is_some()
    }

    pub fn move_to_attribute(&mut self, name: &str) -> bool {
        match self
            .node
            .attributes
            .iter()
            .position(|attr| attr.name == name)
        {
            Some(index) => {
                self.attribute = Some(index);
                true
            }
            None => false,
        }
    }

    /// Value of the named attribute of the current element.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.node
            .attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }
}
