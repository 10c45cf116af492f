/*! Cursor-based API for constructing IR.
 *
 * Lowering walks the AST once and never revisits a node, so the builder keeps an insertion cursor
 * that moves from block to block as control flow is created. Merge points whose inputs are not
 * known yet (a loop back-edge) get a phi up front and are patched through a `PhiRef` once the
 * predecessor is finished.
 */

pub mod function_builder;
pub mod ir_context;

pub use function_builder::{FunctionBuilder, FunctionInstBuilder, PhiRef};
pub use ir_context::{IRContext, SSATracker};
