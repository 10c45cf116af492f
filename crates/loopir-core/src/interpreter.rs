use crate::{
    block::{BlockId, Terminator},
    function::Function,
    instructions::Instruction,
    values::{ParamId, Value},
    IrError, Result,
};
use std::collections::HashMap;
use tracing::trace;

const DEFAULT_FUEL: u64 = 100_000_000;

/// Executes a function's CFG directly. Integer arithmetic wraps; comparisons yield 0 or 1.
pub struct Interpreter<'f> {
    function: &'f Function,
    fuel: u64,
}

impl<'f> Interpreter<'f> {
    pub fn new(function: &'f Function) -> Self {
        Self {
            function,
            fuel: DEFAULT_FUEL,
        }
    }

    /// Maximum number of instructions and terminators executed before giving up.
    pub fn with_fuel(mut self, fuel: u64) -> Self {
        self.fuel = fuel;
        self
    }

    pub fn run(&self, args: &[i64]) -> Result<i64> {
        let expected = self.function.signature.params.len();
        if args.len() != expected {
            return Err(IrError::ExecutionError(format!(
                "{} expects {} argument(s), got {}",
                self.function.name(),
                expected,
                args.len()
            )));
        }

        let mut ssa_values: HashMap<Value, i64> = args
            .iter()
            .enumerate()
            .map(|(i, arg)| (Value::Param(ParamId(i as u32)), *arg))
            .collect();
        let mut slots = vec![0i64; self.function.body.slots.len()];
        let mut fuel = self.fuel;

        let mut previous: Option<BlockId> = None;
        let mut current = self.function.entry_block();

        loop {
            let block = self.function.body.get_block(current).ok_or_else(|| {
                IrError::ExecutionError(format!("jump to missing block {}", current))
            })?;
            trace!(block = %current, "executing block");

            // Phis read their inputs as of the edge taken, before any of them is written.
            let phi_count = block.phi_count();
            let mut phi_results = Vec::with_capacity(phi_count);
            for inst in &block.instructions[..phi_count] {
                if let Instruction::Phi { result, values } = inst {
                    let pred = previous.ok_or_else(|| {
                        IrError::ExecutionError(format!(
                            "phi {} reached without a predecessor",
                            result
                        ))
                    })?;
                    let (_, incoming) =
                        values.iter().find(|(b, _)| *b == pred).ok_or_else(|| {
                            IrError::ExecutionError(format!(
                                "phi {} has no incoming value for {}",
                                result, pred
                            ))
                        })?;
                    phi_results.push((*result, Self::read(&ssa_values, incoming)?));
                }
            }
            ssa_values.extend(phi_results);

            for inst in &block.instructions[phi_count..] {
                Self::consume(&mut fuel)?;
                self.execute(inst, &mut ssa_values, &mut slots)?;
            }

            Self::consume(&mut fuel)?;
            match &block.terminator {
                Terminator::Jump(target) => {
                    previous = Some(current);
                    current = *target;
                }
                Terminator::Branch {
                    condition,
                    then_block,
                    else_block,
                } => {
                    let taken = if Self::read(&ssa_values, condition)? != 0 {
                        *then_block
                    } else {
                        *else_block
                    };
                    previous = Some(current);
                    current = taken;
                }
                Terminator::Return(value) => return Self::read(&ssa_values, value),
                Terminator::Invalid => {
                    return Err(IrError::ExecutionError(format!(
                        "{} has no terminator",
                        current
                    )))
                }
            }
        }
    }

    fn execute(
        &self,
        inst: &Instruction,
        ssa_values: &mut HashMap<Value, i64>,
        slots: &mut [i64],
    ) -> Result<()> {
        match inst {
            Instruction::Const { result, value, .. } => {
                ssa_values.insert(*result, *value);
            }
            Instruction::Load { result, slot, .. } => {
                let value = *slots.get(slot.0 as usize).ok_or_else(|| {
                    IrError::ExecutionError(format!("load from undeclared slot {}", slot))
                })?;
                ssa_values.insert(*result, value);
            }
            Instruction::Store { slot, value } => {
                let value = Self::read(ssa_values, value)?;
                let cell = slots.get_mut(slot.0 as usize).ok_or_else(|| {
                    IrError::ExecutionError(format!("store to undeclared slot {}", slot))
                })?;
                *cell = value;
            }
            Instruction::Add {
                result,
                left,
                right,
                ..
            } => {
                let value =
                    Self::read(ssa_values, left)?.wrapping_add(Self::read(ssa_values, right)?);
                ssa_values.insert(*result, value);
            }
            Instruction::Sub {
                result,
                left,
                right,
                ..
            } => {
                let value =
                    Self::read(ssa_values, left)?.wrapping_sub(Self::read(ssa_values, right)?);
                ssa_values.insert(*result, value);
            }
            Instruction::Lt {
                result,
                left,
                right,
            } => {
                let value = Self::read(ssa_values, left)? < Self::read(ssa_values, right)?;
                ssa_values.insert(*result, i64::from(value));
            }
            Instruction::Eq {
                result,
                left,
                right,
            } => {
                let value = Self::read(ssa_values, left)? == Self::read(ssa_values, right)?;
                ssa_values.insert(*result, i64::from(value));
            }
            Instruction::Phi { result, .. } => {
                return Err(IrError::ExecutionError(format!(
                    "phi {} after a non-phi instruction",
                    result
                )));
            }
        }
        Ok(())
    }

    fn read(ssa_values: &HashMap<Value, i64>, value: &Value) -> Result<i64> {
        ssa_values
            .get(value)
            .copied()
            .ok_or_else(|| IrError::ExecutionError(format!("{} read before definition", value)))
    }

    fn consume(fuel: &mut u64) -> Result<()> {
        if *fuel == 0 {
            return Err(IrError::ExecutionError("step budget exhausted".to_string()));
        }
        *fuel -= 1;
        Ok(())
    }
}
