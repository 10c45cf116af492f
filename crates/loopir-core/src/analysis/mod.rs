/*! Control-flow analysis and structural verification.
 *
 * The code generator patches phis after the fact and discards whole functions on failure, so it
 * needs an independent check that what it hands over is well formed: every block terminated,
 * every phi fed by exactly its predecessors, every value defined in a block that dominates its uses.
 */

pub mod cfg;
pub mod dominator;
pub mod verifier;

pub use cfg::ControlFlowGraph;
pub use dominator::DominatorTree;
pub use verifier::verify_function;
