use crate::block::{BlockId, Terminator};
use crate::builder::{FunctionBuilder, IRContext};
use crate::instructions::Instruction;
use crate::types::Type;
use crate::values::{ParamId, TempId, Value};
use crate::IrError;

#[test]
fn test_temps_are_numbered_after_params() {
    let mut context = IRContext::new();
    let mut func = FunctionBuilder::new("f", &mut context);
    func.param("n", Type::I64).returns(Type::I64);

    let mut ins = func.ins().unwrap();
    let c = ins.iconst(7);
    ins.return_value(c).unwrap();

    assert_eq!(c, Value::Temp(TempId(1)));
    assert_eq!(func.get_param(0), Value::Param(ParamId(0)));
}

#[test]
fn test_param_after_instruction_is_rejected() {
    let mut context = IRContext::new();
    let mut func = FunctionBuilder::new("f", &mut context);
    {
        let mut ins = func.ins().unwrap();
        let c = ins.iconst(1);
        ins.return_value(c).unwrap();
    }
    func.param("late", Type::I64);

    assert!(matches!(func.build(), Err(IrError::BuilderError(_))));
}

#[test]
fn test_double_terminator_is_rejected() {
    let mut context = IRContext::new();
    let mut func = FunctionBuilder::new("f", &mut context);
    let exit = func.create_block("exit");

    let mut ins = func.ins().unwrap();
    ins.jump(exit).unwrap();
    let err = ins.jump(exit).unwrap_err();

    assert!(err.to_string().contains("already terminated"));
}

#[test]
fn test_unterminated_block_fails_build() {
    let mut context = IRContext::new();
    let mut func = FunctionBuilder::new("f", &mut context);
    let dangling = func.create_block("dangling");
    {
        let mut ins = func.ins().unwrap();
        ins.jump(dangling).unwrap();
    }

    let err = func.build().unwrap_err();
    assert!(err.to_string().contains("block1 (dangling) is not terminated"));
}

#[test]
fn test_switch_to_unknown_block() {
    let mut context = IRContext::new();
    let mut func = FunctionBuilder::new("f", &mut context);

    assert!(func.switch_to_block(BlockId(42)).is_err());
    assert_eq!(func.current_block(), Some(BlockId(0)));
}

#[test]
fn test_phi_must_lead_block() {
    let mut context = IRContext::new();
    let mut func = FunctionBuilder::new("f", &mut context);
    let mut ins = func.ins().unwrap();
    let c = ins.iconst(1);

    assert!(ins.phi(vec![(BlockId(0), c)]).is_err());
}

#[test]
fn test_phi_incoming_is_patched_in_place() {
    let mut context = IRContext::new();
    let mut func = FunctionBuilder::new("f", &mut context);
    func.param("n", Type::I64);
    let n = func.get_param(0);
    let merge = func.create_block("merge");
    let side = func.create_block("side");

    func.ins().unwrap().jump(merge).unwrap();
    func.switch_to_block(merge).unwrap();
    let (_, phi) = func.ins().unwrap().phi(vec![(BlockId(0), n)]).unwrap();

    func.add_phi_incoming(phi, side, n).unwrap();
    assert!(func.add_phi_incoming(phi, side, n).is_err());

    let block = func.current_function().body.get_block(merge).unwrap();
    match &block.instructions[0] {
        Instruction::Phi { values, .. } => {
            assert_eq!(values, &vec![(BlockId(0), n), (side, n)]);
        }
        other => panic!("expected phi, got {:?}", other),
    }
}

#[test]
fn test_slots_are_declared_on_the_function() {
    let mut context = IRContext::new();
    let mut func = FunctionBuilder::new("f", &mut context);
    let a = func.declare_slot("a", Type::I64);
    let b = func.declare_slot("b", Type::I64);
    {
        let mut ins = func.ins().unwrap();
        let v = ins.load(a, Type::I64);
        ins.store(b, v);
        ins.return_value(v).unwrap();
    }

    let function = func.build().unwrap();
    assert_eq!(function.body.slots.len(), 2);
    assert_eq!(function.body.get_slot(b).unwrap().name, "b");
    assert!(matches!(
        function.body.get_block(BlockId(0)).unwrap().terminator,
        Terminator::Return(_)
    ));
}
