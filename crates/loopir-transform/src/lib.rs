/*! Lower LOOP programs into CFG-IR.
 *
 * The source language has mutable variables, truncated subtraction and counting loops; the IR has
 * none of these directly. Variables become function-level storage slots, `a - b` becomes a branch
 * on the sign of the exact difference with a phi picking zero or the difference, and every `loop`
 * becomes a condition block whose phi counts down to zero. Each program becomes one function of
 * `n` that returns the final value of `f`.
 */

pub mod loop_to_ir;

pub use loop_to_ir::{
    transform_source_to_ir, transform_source_to_ir_with_config, CodeGenerator, CompilerConfig,
    TransformError,
};
