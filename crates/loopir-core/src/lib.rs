/*! Core IR types and builders for the LOOP compiler.
 *
 * A LOOP program only needs a handful of operations, but lowering it still requires a real
 * control-flow graph: truncated subtraction and counting loops both branch and merge. This crate
 * provides the basic blocks, phi merges, storage slots and the cursor-based builder that the code
 * generator drives, plus the verifier and a reference interpreter used to check what it produced.
 */

pub mod analysis;
pub mod block;
pub mod builder;
pub mod format;
pub mod function;
pub mod instructions;
pub mod interpreter;
pub mod ir_persist;
pub mod module;
pub mod types;
pub mod values;

pub use block::{BasicBlock, BlockId, Terminator};
pub use builder::{FunctionBuilder, FunctionInstBuilder, IRContext, PhiRef};
pub use function::{Function, FunctionBody, FunctionSignature, Parameter, StackSlot};
pub use instructions::Instruction;
pub use interpreter::Interpreter;
pub use module::Module;
pub use types::Type;
pub use values::{ParamId, SlotId, TempId, Value};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    #[error("Builder error: {0}")]
    BuilderError(String),
    #[error("Verification failed for function {function}: {message}")]
    VerificationError { function: String, message: String },
    #[error("Execution error: {0}")]
    ExecutionError(String),
    #[error("Function not found: {0}")]
    FunctionNotFound(String),
    #[error("Function {0} already exists in module")]
    DuplicateFunction(String),
}

pub type Result<T> = std::result::Result<T, IrError>;

#[cfg(test)]
mod tests;
