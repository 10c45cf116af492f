use crate::config::EmitterConfig;
use crate::emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
use crate::output::OutputFormat;
use anyhow::Result;
use colored::Color;
use loopir_core::{
    format::{format_block_header, format_instruction, format_signature, format_terminator},
    BasicBlock, Function, Module,
};
use std::io::Write;

pub struct LoopIrEmitter {
    config: EmitterConfig,
    format: OutputFormat,
}

impl LoopIrEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self {
            config,
            format: OutputFormat::Text,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Renders with the indentation and colors from this emitter's config.
    pub fn render(&self, module: &Module) -> Result<String> {
        let mut buffer = Vec::new();
        let mut context = EmitContext::from_config(&self.config);
        self.emit(module, &mut buffer, &mut context)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn render_function(&self, function: &Function) -> Result<String> {
        let mut buffer = Vec::new();
        let mut context = EmitContext::from_config(&self.config);
        self.emit_function(function, &mut buffer, &mut context)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn emit_function<W: Write>(
        &self,
        function: &Function,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        if self.config.verbosity.should_print_summary() {
            EmitHelper::write_comment(
                writer,
                context,
                &format!(
                    "{}: {} blocks, {} instructions, {} slots",
                    function.name(),
                    function.body.blocks.len(),
                    function.instruction_count(),
                    function.body.slots.len()
                ),
            )?;
        }

        let signature = format_signature(function);
        if !self.config.verbosity.should_print_bodies() {
            return EmitHelper::write_colored_line(writer, context, &signature, Color::Yellow);
        }

        let header = format!("{} {{", signature);
        EmitHelper::write_colored_line(writer, context, &header, Color::Yellow)?;

        context.indent();
        for slot in &function.body.slots {
            EmitHelper::write_line(
                writer,
                context,
                &format!("{} = stack_slot {} ; {}", slot.id, slot.slot_type, slot.name),
            )?;
        }
        context.dedent();
        if !function.body.slots.is_empty() {
            EmitHelper::write_blank(writer)?;
        }

        for (i, block) in function.body.blocks.values().enumerate() {
            if i > 0 {
                EmitHelper::write_blank(writer)?;
            }
            self.emit_block(function, block, writer, context)?;
        }

        EmitHelper::write_line(writer, context, "}")
    }

    fn emit_block<W: Write>(
        &self,
        function: &Function,
        block: &BasicBlock,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let header = if self.config.block_comments || block.id == function.entry_block() {
            format_block_header(function, block)
        } else {
            format!("{}:", block.id)
        };
        EmitHelper::write_colored_line(writer, context, &header, Color::Cyan)?;

        context.indent();
        for inst in &block.instructions {
            EmitHelper::write_line(writer, context, &format_instruction(inst))?;
        }
        let terminator = format_terminator(&block.terminator);
        EmitHelper::write_colored_line(writer, context, &terminator, Color::Magenta)?;
        context.dedent();

        Ok(())
    }
}

impl Default for LoopIrEmitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

impl Emitter for LoopIrEmitter {
    type Item = Module;

    fn emit<W: Write>(
        &self,
        module: &Module,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *writer, module)?;
                writeln!(writer)?;
            }
            OutputFormat::Text => {
                EmitHelper::write_comment(writer, context, &format!("module {}", module.name))?;
                for function in module.functions.values() {
                    EmitHelper::write_blank(writer)?;
                    self.emit_function(function, writer, context)?;
                }
            }
        }
        Ok(())
    }
}
