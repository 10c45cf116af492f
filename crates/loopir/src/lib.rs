/*! Unified interface for compiling LOOP programs.
 *
 * One import for the whole pipeline: parse source, lower it to CFG-IR, verify it, emit it as text
 * or JSON, and run it with the reference interpreter.
 */

pub use loopir_core as core;
pub use loopir_emit as emit;
pub use loopir_parser as parser;
pub use loopir_transform as transform;

pub use loopir_core::{
    block::{BasicBlock, BlockId, Terminator},
    function::Function,
    instructions::Instruction,
    interpreter::Interpreter,
    module::Module,
    types::Type,
    values::Value,
};

pub use loopir_emit::{EmitterConfig, LoopIrEmitter, OutputFormat};

pub use loopir_parser::{parse_program, Expr, ParseError, TopLevel};

pub use loopir_transform::{
    transform_source_to_ir, CodeGenerator, CompilerConfig, TransformError,
};

use anyhow::{anyhow, Result};

/// Compiles `source` into a module holding one function, `mainloop`.
pub fn compile(source: &str) -> Result<Module> {
    transform_source_to_ir(source)
}

/// Compiles `source` and runs it with `n` bound to the argument. Returns the final value of `f`.
pub fn evaluate(source: &str, n: i64) -> Result<i64> {
    let module = compile(source)?;
    let function = module
        .last_function()
        .ok_or_else(|| anyhow!("compilation produced no function"))?;
    Ok(Interpreter::new(function).run(&[n])?)
}
