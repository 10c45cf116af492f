use super::cfg::ControlFlowGraph;
use super::dominator::DominatorTree;
use crate::{
    block::{BasicBlock, BlockId},
    function::Function,
    instructions::Instruction,
    values::{TempId, Value},
    IrError, Result,
};
use std::collections::{HashMap, HashSet};

pub fn verify_function(function: &Function) -> Result<()> {
    Verifier::new(function).run()
}

struct Verifier<'f> {
    function: &'f Function,
    cfg: ControlFlowGraph,
}

/// Where a temporary is defined: its block and its index among that block's instructions.
type Definitions = HashMap<TempId, (BlockId, usize)>;

impl<'f> Verifier<'f> {
    fn new(function: &'f Function) -> Self {
        Self {
            function,
            cfg: ControlFlowGraph::from_function(&function.body),
        }
    }

    fn fail(&self, message: String) -> IrError {
        IrError::VerificationError {
            function: self.function.name().to_string(),
            message,
        }
    }

    fn run(&self) -> Result<()> {
        let entry = self.function.entry_block();
        if !self.cfg.predecessors(entry).is_empty() {
            return Err(self.fail(format!("entry block {} has predecessors", entry)));
        }

        let definitions = self.collect_definitions()?;

        for block in self.function.body.blocks.values() {
            self.check_terminator(block)?;
            self.check_phis(block)?;
            self.check_operands(block, &definitions)?;
        }

        let dominators = DominatorTree::build(&self.cfg);
        for block in self.function.body.blocks.values() {
            self.check_dominance(block, &definitions, &dominators)?;
        }

        Ok(())
    }

    fn collect_definitions(&self) -> Result<Definitions> {
        let mut definitions = HashMap::new();
        for block in self.function.body.blocks.values() {
            for (position, inst) in block.instructions.iter().enumerate() {
                let Some(result) = inst.result() else {
                    continue;
                };
                let Some(temp) = result.as_temp() else {
                    return Err(self.fail(format!(
                        "{} assigns to parameter {} in {}",
                        inst.opcode(),
                        result,
                        block.id
                    )));
                };
                if definitions.insert(temp, (block.id, position)).is_some() {
                    return Err(self.fail(format!("{} is defined more than once", temp)));
                }
            }
        }
        Ok(definitions)
    }

    fn check_terminator(&self, block: &BasicBlock) -> Result<()> {
        if !block.is_terminated() {
            return Err(self.fail(format!("{} ({}) has no terminator", block.id, block.name)));
        }

        for target in block.successors() {
            if self.function.body.get_block(target).is_none() {
                return Err(self.fail(format!(
                    "{} branches to missing block {}",
                    block.id, target
                )));
            }
        }

        Ok(())
    }

    fn check_phis(&self, block: &BasicBlock) -> Result<()> {
        let phi_count = block.phi_count();
        if block.instructions[phi_count..].iter().any(|inst| inst.is_phi()) {
            return Err(self.fail(format!(
                "{} has a phi after a non-phi instruction",
                block.id
            )));
        }

        let predecessors: HashSet<BlockId> =
            self.cfg.predecessors(block.id).iter().copied().collect();

        for inst in &block.instructions[..phi_count] {
            let Instruction::Phi { result, values } = inst else {
                continue;
            };

            let mut seen = HashSet::new();
            for (pred, _) in values {
                if !predecessors.contains(pred) {
                    return Err(self.fail(format!(
                        "phi {} in {} has an incoming value from non-predecessor {}",
                        result, block.id, pred
                    )));
                }
                if !seen.insert(*pred) {
                    return Err(self.fail(format!(
                        "phi {} in {} has two incoming values from {}",
                        result, block.id, pred
                    )));
                }
            }

            if let Some(missing) = predecessors.iter().find(|pred| !seen.contains(pred)) {
                return Err(self.fail(format!(
                    "phi {} in {} has no incoming value from predecessor {}",
                    result, block.id, missing
                )));
            }
        }

        Ok(())
    }

    fn check_operands(
        &self,
        block: &BasicBlock,
        definitions: &Definitions,
    ) -> Result<()> {
        let param_count = self.function.signature.params.len() as u32;
        let check_value = |value: &Value| -> Result<()> {
            match value {
                Value::Param(p) if p.0 >= param_count => {
                    Err(self.fail(format!("{} uses undeclared parameter {}", block.id, p)))
                }
                Value::Temp(t) if !definitions.contains_key(t) => {
                    Err(self.fail(format!("{} uses undefined value {}", block.id, t)))
                }
                _ => Ok(()),
            }
        };

        for inst in &block.instructions {
            for operand in inst.operands() {
                check_value(operand)?;
            }
            if let Some(slot) = inst.slot() {
                if self.function.body.get_slot(slot).is_none() {
                    return Err(self.fail(format!(
                        "{} refers to undeclared slot {}",
                        block.id, slot
                    )));
                }
            }
        }

        for operand in block.terminator.operands() {
            check_value(operand)?;
        }

        Ok(())
    }

    /// A use must be dominated by its definition. Within one block the definition must come
    /// first; a phi operand only has to be available at the end of the incoming predecessor.
    fn check_dominance(
        &self,
        block: &BasicBlock,
        definitions: &Definitions,
        dominators: &DominatorTree,
    ) -> Result<()> {
        if !dominators.is_reachable(block.id) {
            return Ok(());
        }

        let available = |value: &Value, at: BlockId, position: usize| match value
            .as_temp()
            .and_then(|temp| definitions.get(&temp))
        {
            Some(&(def_block, def_position)) if def_block == at => def_position < position,
            Some(&(def_block, _)) => dominators.dominates(def_block, at),
            None => true,
        };

        for (position, inst) in block.instructions.iter().enumerate() {
            if let Instruction::Phi { result, values } = inst {
                for (pred, value) in values {
                    if dominators.is_reachable(*pred) && !available(value, *pred, usize::MAX) {
                        return Err(self.fail(format!(
                            "phi {} in {} takes {} from {}, where it is not available",
                            result, block.id, value, pred
                        )));
                    }
                }
                continue;
            }

            for operand in inst.operands() {
                if !available(operand, block.id, position) {
                    return Err(self.fail(format!(
                        "{} uses {} where its definition does not dominate",
                        block.id, operand
                    )));
                }
            }
        }

        for operand in block.terminator.operands() {
            if !available(operand, block.id, block.instructions.len()) {
                return Err(self.fail(format!(
                    "{} uses {} where its definition does not dominate",
                    block.id, operand
                )));
            }
        }

        Ok(())
    }
}
