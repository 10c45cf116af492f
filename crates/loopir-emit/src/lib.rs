/*! Render CFG-IR modules for people and tools.
 *
 * The text form is the same one `loopir_core::format` produces, optionally colored and with
 * configurable indentation, so it can be read in a terminal or diffed in tests. The JSON form is
 * the serde encoding of the module and round-trips through `loopir_core::ir_persist`.
 */

pub mod config;
pub mod emitter;
pub mod loopir_emitter;
pub mod output;

pub use config::{EmitterConfig, IndentStyle, VerbosityLevel};
pub use emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
pub use loopir_emitter::LoopIrEmitter;
pub use output::OutputFormat;
