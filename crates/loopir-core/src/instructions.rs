use crate::block::BlockId;
use crate::types::Type;
use crate::values::{SlotId, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    Const {
        result: Value,
        value: i64,
        ty: Type,
    },

    Load {
        result: Value,
        slot: SlotId,
        ty: Type,
    },
    Store {
        slot: SlotId,
        value: Value,
    },

    Add {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },
    Sub {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },

    /// Signed less-than.
    Lt {
        result: Value,
        left: Value,
        right: Value,
    },
    Eq {
        result: Value,
        left: Value,
        right: Value,
    },

    Phi {
        result: Value,
        values: Vec<(BlockId, Value)>,
    },
}

impl Instruction {
    pub fn result(&self) -> Option<&Value> {
        match self {
            Instruction::Const { result, .. }
            | Instruction::Load { result, .. }
            | Instruction::Add { result, .. }
            | Instruction::Sub { result, .. }
            | Instruction::Lt { result, .. }
            | Instruction::Eq { result, .. }
            | Instruction::Phi { result, .. } => Some(result),
            Instruction::Store { .. } => None,
        }
    }

    pub fn operands(&self) -> Vec<&Value> {
        match self {
            Instruction::Const { .. } | Instruction::Load { .. } => vec![],
            Instruction::Store { value, .. } => vec![value],
            Instruction::Add { left, right, .. }
            | Instruction::Sub { left, right, .. }
            | Instruction::Lt { left, right, .. }
            | Instruction::Eq { left, right, .. } => vec![left, right],
            Instruction::Phi { values, .. } => values.iter().map(|(_, v)| v).collect(),
        }
    }

    pub fn slot(&self) -> Option<SlotId> {
        match self {
            Instruction::Load { slot, .. } | Instruction::Store { slot, .. } => Some(*slot),
            _ => None,
        }
    }

    pub fn is_phi(&self) -> bool {
        matches!(self, Instruction::Phi { .. })
    }

    pub fn is_state_changing(&self) -> bool {
        matches!(self, Instruction::Store { .. })
    }

    pub fn opcode(&self) -> &'static str {
        match self {
            Instruction::Const { .. } => "iconst",
            Instruction::Load { .. } => "stack_load",
            Instruction::Store { .. } => "stack_store",
            Instruction::Add { .. } => "iadd",
            Instruction::Sub { .. } => "isub",
            Instruction::Lt { .. } => "icmp slt",
            Instruction::Eq { .. } => "icmp eq",
            Instruction::Phi { .. } => "phi",
        }
    }
}
