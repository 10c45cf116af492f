use crate::{
    block::{BasicBlock, Terminator},
    function::Function,
    instructions::Instruction,
    module::Module,
};
use std::fmt::Write;

pub fn format_module(module: &Module) -> String {
    let mut output = String::new();

    let _ = writeln!(&mut output, "; module {}", module.name);
    for function in module.functions.values() {
        let _ = writeln!(&mut output);
        output.push_str(&format_function(function));
    }

    output
}

pub fn format_signature(function: &Function) -> String {
    let params: Vec<String> = function
        .signature
        .params
        .iter()
        .map(|p| p.param_type.to_string())
        .collect();

    let mut header = format!("function %{}({})", function.signature.name, params.join(", "));
    if !function.signature.returns.is_empty() {
        let returns: Vec<String> = function
            .signature
            .returns
            .iter()
            .map(|t| t.to_string())
            .collect();
        let _ = write!(&mut header, " -> {}", returns.join(", "));
    }
    header
}

pub fn format_function(function: &Function) -> String {
    let mut output = String::new();

    let _ = writeln!(&mut output, "{} {{", format_signature(function));
    for slot in &function.body.slots {
        let _ = writeln!(
            &mut output,
            "    {} = stack_slot {} ; {}",
            slot.id, slot.slot_type, slot.name
        );
    }
    if !function.body.slots.is_empty() {
        let _ = writeln!(&mut output);
    }

    for (i, block) in function.body.blocks.values().enumerate() {
        if i > 0 {
            let _ = writeln!(&mut output);
        }
        let _ = writeln!(&mut output, "{}", format_block_header(function, block));
        for inst in &block.instructions {
            let _ = writeln!(&mut output, "    {}", format_instruction(inst));
        }
        let _ = writeln!(&mut output, "    {}", format_terminator(&block.terminator));
    }

    output.push_str("}\n");
    output
}

pub fn format_block_header(function: &Function, block: &BasicBlock) -> String {
    if block.id == function.entry_block() {
        let params: Vec<String> = function
            .signature
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| format!("v{}: {}", i, p.param_type))
            .collect();
        format!("{}({}):", block.id, params.join(", "))
    } else {
        format!("{}: ; {}", block.id, block.name)
    }
}

pub fn format_instruction(inst: &Instruction) -> String {
    match inst {
        Instruction::Const { result, value, ty } => format!("{} = iconst.{} {}", result, ty, value),
        Instruction::Load { result, slot, ty } => {
            format!("{} = stack_load.{} {}", result, ty, slot)
        }
        Instruction::Store { slot, value } => format!("stack_store {}, {}", value, slot),
        Instruction::Add {
            result,
            left,
            right,
            ty,
        } => format!("{} = iadd.{} {}, {}", result, ty, left, right),
        Instruction::Sub {
            result,
            left,
            right,
            ty,
        } => format!("{} = isub.{} {}, {}", result, ty, left, right),
        Instruction::Lt {
            result,
            left,
            right,
        } => format!("{} = icmp slt {}, {}", result, left, right),
        Instruction::Eq {
            result,
            left,
            right,
        } => format!("{} = icmp eq {}, {}", result, left, right),
        Instruction::Phi { result, values } => {
            let incoming: Vec<String> = values
                .iter()
                .map(|(block, value)| format!("[{}: {}]", block, value))
                .collect();
            format!("{} = phi {}", result, incoming.join(", "))
        }
    }
}

pub fn format_terminator(term: &Terminator) -> String {
    match term {
        Terminator::Jump(target) => format!("jump {}", target),
        Terminator::Branch {
            condition,
            then_block,
            else_block,
        } => format!("brif {}, {}, {}", condition, then_block, else_block),
        Terminator::Return(value) => format!("return {}", value),
        Terminator::Invalid => "; <unterminated>".to_string(),
    }
}
