/*! Convert a parsed LOOP program to a verified IR function.
 *
 * `CodeGenerator` owns the output module and lowers one top-level unit per call. The expression
 * walk lives in `expression_transformer`; the two constructs that need real control flow (monus
 * and `loop`) are built in `control_flow_builder`. A unit that fails to lower or verify is dropped
 * whole and never reaches the module.
 */

mod context;
mod control_flow_builder;
mod errors;
mod expression_transformer;
mod structural_transformer;

use anyhow::Result;
use loopir_core::Module;

pub use context::{LoweringContext, SymbolTable};
pub use errors::TransformError;
pub use expression_transformer::ExpressionTransformer;
pub use structural_transformer::{CodeGenerator, CompilerConfig};

/// Parse `source` and compile it as a single unit named `mainloop`.
pub fn transform_source_to_ir(source: &str) -> Result<Module> {
    transform_source_to_ir_with_config(source, CompilerConfig::default())
}

pub fn transform_source_to_ir_with_config(source: &str, config: CompilerConfig) -> Result<Module> {
    let mut generator = CodeGenerator::with_config(config);
    generator.compile_source(source)?;
    Ok(generator.into_module())
}

#[cfg(test)]
mod tests;
