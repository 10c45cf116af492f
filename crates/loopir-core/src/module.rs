use crate::function::Function;
use crate::{IrError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The compilation unit handed to a backend: every finalized function, in compilation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub functions: IndexMap<String, Function>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: IndexMap::new(),
        }
    }

    pub fn add_function(&mut self, function: Function) -> Result<()> {
        let name = function.name().to_string();
        if self.functions.contains_key(&name) {
            return Err(IrError::DuplicateFunction(name));
        }
        self.functions.insert(name, function);
        Ok(())
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn function(&self, name: &str) -> Result<&Function> {
        self.get_function(name)
            .ok_or_else(|| IrError::FunctionNotFound(name.to_string()))
    }

    pub fn last_function(&self) -> Option<&Function> {
        self.functions.values().last()
    }

    /// `base` if it is free, otherwise `base.1`, `base.2`, ...
    pub fn unique_name(&self, base: &str) -> String {
        if !self.functions.contains_key(base) {
            return base.to_string();
        }
        (1..)
            .map(|k| format!("{}.{}", base, k))
            .find(|candidate| !self.functions.contains_key(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
