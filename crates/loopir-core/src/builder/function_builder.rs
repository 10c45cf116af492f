use super::IRContext;
use crate::{
    block::{BlockId, Terminator},
    function::{Function, FunctionSignature, Parameter},
    instructions::Instruction,
    types::Type,
    values::{ParamId, SlotId, Value},
    IrError, Result,
};
use tracing::trace;

/// Handle to a phi that may still receive incoming values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhiRef {
    pub block: BlockId,
    pub index: usize,
}

pub struct FunctionBuilder<'a> {
    function: Function,
    context: &'a mut IRContext,
    errors: Vec<String>,
}

impl<'a> FunctionBuilder<'a> {
    pub fn new(name: impl Into<String>, context: &'a mut IRContext) -> Self {
        let function = Function::new(FunctionSignature::new(name));

        context.clear();
        context.set_current_function(function.name().to_string());
        context.set_current_block(function.body.entry_block);

        Self {
            function,
            context,
            errors: Vec::new(),
        }
    }

    /// Parameters must be declared before the first instruction is emitted.
    pub fn param(&mut self, name: &str, ty: Type) -> &mut Self {
        let index = self.function.signature.params.len() as u32;
        if self.context.ssa().next_temp_id() > index {
            self.errors.push(format!(
                "parameter {} declared after instructions were emitted",
                name
            ));
        }
        self.function
            .signature
            .params
            .push(Parameter::new(name, ty));
        self.context.ssa().reset(index + 1);
        self
    }

    pub fn returns(&mut self, ty: Type) -> &mut Self {
        self.function.signature.returns = vec![ty];
        self
    }

    pub fn get_param(&self, index: usize) -> Value {
        Value::Param(ParamId(index as u32))
    }

    pub fn name(&self) -> &str {
        self.function.name()
    }

    pub fn entry_block(&self) -> BlockId {
        self.function.body.entry_block
    }

    pub fn create_block(&mut self, name: &str) -> BlockId {
        let id = self.function.body.create_block(name);
        trace!(function = self.function.name(), block = %id, name, "created block");
        id
    }

    pub fn switch_to_block(&mut self, block_id: BlockId) -> Result<()> {
        if self.function.body.get_block(block_id).is_none() {
            return Err(IrError::BuilderError(format!(
                "Block {} does not exist",
                block_id
            )));
        }

        self.context.set_current_block(block_id);
        Ok(())
    }

    pub fn current_block(&self) -> Option<BlockId> {
        self.context.current_block()
    }

    pub fn declare_slot(&mut self, name: &str, ty: Type) -> SlotId {
        self.function.body.add_slot(name, ty)
    }

    pub fn ins(&mut self) -> Result<FunctionInstBuilder<'_>> {
        let block_id = self.current_block().ok_or_else(|| {
            IrError::BuilderError("No current block - call switch_to_block first".into())
        })?;

        Ok(FunctionInstBuilder {
            block_id,
            function: &mut self.function,
            context: &mut *self.context,
        })
    }

    pub fn add_phi_incoming(&mut self, phi: PhiRef, from: BlockId, value: Value) -> Result<()> {
        let block = self.function.body.get_block_mut(phi.block).ok_or_else(|| {
            IrError::BuilderError(format!("Block {} does not exist", phi.block))
        })?;

        match block.instructions.get_mut(phi.index) {
            Some(Instruction::Phi { values, .. }) => {
                if values.iter().any(|(pred, _)| *pred == from) {
                    return Err(IrError::BuilderError(format!(
                        "Phi in {} already has an incoming value from {}",
                        phi.block, from
                    )));
                }
                values.push((from, value));
                Ok(())
            }
            _ => Err(IrError::BuilderError(format!(
                "No phi at {}[{}]",
                phi.block, phi.index
            ))),
        }
    }

    pub fn current_function(&self) -> &Function {
        &self.function
    }

    pub fn build(self) -> Result<Function> {
        if let Some(error) = self.errors.first() {
            return Err(IrError::BuilderError(error.clone()));
        }

        if let Some(block) = self
            .function
            .body
            .blocks
            .values()
            .find(|block| !block.is_terminated())
        {
            return Err(IrError::BuilderError(format!(
                "Block {} ({}) is not terminated",
                block.id, block.name
            )));
        }

        Ok(self.function)
    }
}

pub struct FunctionInstBuilder<'a> {
    block_id: BlockId,
    function: &'a mut Function,
    context: &'a mut IRContext,
}

impl<'a> FunctionInstBuilder<'a> {
    pub fn block_id(&self) -> BlockId {
        self.block_id
    }

    pub fn iconst(&mut self, value: i64) -> Value {
        let result = self.next_value();
        self.insert_inst(Instruction::Const {
            result,
            value,
            ty: Type::I64,
        });
        result
    }

    pub fn load(&mut self, slot: SlotId, ty: Type) -> Value {
        let result = self.next_value();
        self.insert_inst(Instruction::Load { result, slot, ty });
        result
    }

    pub fn store(&mut self, slot: SlotId, value: Value) {
        self.insert_inst(Instruction::Store { slot, value });
    }

    pub fn add(&mut self, left: Value, right: Value, ty: Type) -> Value {
        let result = self.next_value();
        self.insert_inst(Instruction::Add {
            result,
            left,
            right,
            ty,
        });
        result
    }

    pub fn sub(&mut self, left: Value, right: Value, ty: Type) -> Value {
        let result = self.next_value();
        self.insert_inst(Instruction::Sub {
            result,
            left,
            right,
            ty,
        });
        result
    }

    pub fn lt(&mut self, left: Value, right: Value) -> Value {
        let result = self.next_value();
        self.insert_inst(Instruction::Lt {
            result,
            left,
            right,
        });
        result
    }

    pub fn eq(&mut self, left: Value, right: Value) -> Value {
        let result = self.next_value();
        self.insert_inst(Instruction::Eq {
            result,
            left,
            right,
        });
        result
    }

    /// Adds a phi with the incoming values known so far. More can be added later through
    /// [`FunctionBuilder::add_phi_incoming`] with the returned handle.
    pub fn phi(&mut self, values: Vec<(BlockId, Value)>) -> Result<(Value, PhiRef)> {
        let block = self.block_mut()?;
        let index = block.phi_count();
        if index != block.instructions.len() {
            return Err(IrError::BuilderError(format!(
                "Phi must precede all other instructions in {}",
                block.id
            )));
        }

        let result = self.next_value();
        self.insert_inst(Instruction::Phi { result, values });
        Ok((
            result,
            PhiRef {
                block: self.block_id,
                index,
            },
        ))
    }

    pub fn jump(&mut self, target: BlockId) -> Result<()> {
        self.set_terminator(Terminator::Jump(target))
    }

    pub fn branch(
        &mut self,
        condition: Value,
        then_block: BlockId,
        else_block: BlockId,
    ) -> Result<()> {
        self.set_terminator(Terminator::Branch {
            condition,
            then_block,
            else_block,
        })
    }

    pub fn return_value(&mut self, value: Value) -> Result<()> {
        self.set_terminator(Terminator::Return(value))
    }

    fn block_mut(&mut self) -> Result<&mut crate::block::BasicBlock> {
        let block_id = self.block_id;
        self.function
            .body
            .get_block_mut(block_id)
            .ok_or_else(|| IrError::BuilderError(format!("Block {} not found", block_id)))
    }

    fn insert_inst(&mut self, inst: Instruction) {
        if let Some(block) = self.function.body.get_block_mut(self.block_id) {
            block.instructions.push(inst);
        }
    }

    fn set_terminator(&mut self, term: Terminator) -> Result<()> {
        let block = self.block_mut()?;
        if block.is_terminated() {
            return Err(IrError::BuilderError(format!(
                "Block {} already terminated",
                block.id
            )));
        }
        block.terminator = term;
        Ok(())
    }

    fn next_value(&mut self) -> Value {
        Value::Temp(self.context.ssa().new_temp())
    }
}
