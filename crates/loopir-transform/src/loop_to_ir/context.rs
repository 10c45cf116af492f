use super::TransformError;
use loopir_core::{BlockId, Function, FunctionBuilder, SlotId, Type};
use std::collections::HashMap;
use tracing::trace;

/// Variable name to storage slot. LOOP has no nested scopes: a variable first assigned inside a
/// loop body is still visible after the loop.
#[derive(Debug, Default)]
pub struct SymbolTable {
    slots: HashMap<String, SlotId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<SlotId> {
        self.slots.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, slot: SlotId) {
        self.slots.insert(name.into(), slot);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Everything that lives exactly as long as one function is being lowered.
pub struct LoweringContext<'a> {
    pub builder: FunctionBuilder<'a>,
    pub symbols: SymbolTable,
}

impl<'a> LoweringContext<'a> {
    pub fn new(builder: FunctionBuilder<'a>) -> Self {
        Self {
            builder,
            symbols: SymbolTable::new(),
        }
    }

    /// Slot for `name`, allocated on first use.
    pub fn slot_for(&mut self, name: &str) -> SlotId {
        if let Some(slot) = self.symbols.lookup(name) {
            return slot;
        }

        let slot = self.builder.declare_slot(name, Type::I64);
        trace!(function = self.builder.name(), variable = name, %slot, "allocated slot");
        self.symbols.insert(name, slot);
        slot
    }

    pub fn current_block(&self) -> Result<BlockId, TransformError> {
        self.builder
            .current_block()
            .ok_or_else(|| TransformError::Builder("no insertion block".to_string()))
    }

    pub fn finish(self) -> Result<Function, TransformError> {
        Ok(self.builder.build()?)
    }
}
