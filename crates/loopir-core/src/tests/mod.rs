/*! Test coverage for the IR builder, verifier and interpreter.
 *
 * The code generator relies on a few builder guarantees (phis grouped at block start, patchable
 * incoming edges, one terminator per block). These tests pin them down with hand-built CFGs that
 * mirror the shapes lowering produces.
 */

mod builder_api_tests;

use crate::builder::{FunctionBuilder, IRContext};
use crate::function::Function;
use crate::types::Type;

/// `f(x) = max(x - k, 0)`, built the way lowering expands truncated subtraction.
pub(crate) fn build_monus(k: i64) -> Function {
    let mut context = IRContext::new();
    let mut func = FunctionBuilder::new("monus", &mut context);
    func.param("x", Type::I64).returns(Type::I64);
    let x = func.get_param(0);

    let then_block = func.create_block("then");
    let else_block = func.create_block("else");
    let merge_block = func.create_block("ifmerge");

    let exact = {
        let mut ins = func.ins().unwrap();
        let k = ins.iconst(k);
        let exact = ins.sub(x, k, Type::I64);
        let zero = ins.iconst(0);
        let negative = ins.lt(exact, zero);
        ins.branch(negative, then_block, else_block).unwrap();
        exact
    };

    func.switch_to_block(then_block).unwrap();
    let zero = {
        let mut ins = func.ins().unwrap();
        let zero = ins.iconst(0);
        ins.jump(merge_block).unwrap();
        zero
    };

    func.switch_to_block(else_block).unwrap();
    func.ins().unwrap().jump(merge_block).unwrap();

    func.switch_to_block(merge_block).unwrap();
    {
        let mut ins = func.ins().unwrap();
        let (result, _) = ins
            .phi(vec![(then_block, zero), (else_block, exact)])
            .unwrap();
        ins.return_value(result).unwrap();
    }

    func.build().unwrap()
}

/// `f(n) = sum of 1 over n iterations`, with the counter phi patched after the body is built.
pub(crate) fn build_counting_loop() -> Function {
    let mut context = IRContext::new();
    let mut func = FunctionBuilder::new("count", &mut context);
    func.param("n", Type::I64).returns(Type::I64);
    let n = func.get_param(0);

    let acc = func.declare_slot("acc", Type::I64);
    let header = func.entry_block();
    let condition = func.create_block("loopcondition");
    let body = func.create_block("loopbody");
    let after = func.create_block("afterloop");

    {
        let mut ins = func.ins().unwrap();
        let zero = ins.iconst(0);
        ins.store(acc, zero);
        ins.jump(condition).unwrap();
    }

    func.switch_to_block(condition).unwrap();
    let (counter, phi) = {
        let mut ins = func.ins().unwrap();
        let (counter, phi) = ins.phi(vec![(header, n)]).unwrap();
        let zero = ins.iconst(0);
        let done = ins.eq(counter, zero);
        ins.branch(done, after, body).unwrap();
        (counter, phi)
    };

    func.switch_to_block(body).unwrap();
    let next = {
        let mut ins = func.ins().unwrap();
        let current = ins.load(acc, Type::I64);
        let one = ins.iconst(1);
        let bumped = ins.add(current, one, Type::I64);
        ins.store(acc, bumped);
        let one = ins.iconst(1);
        let next = ins.sub(counter, one, Type::I64);
        ins.jump(condition).unwrap();
        next
    };
    func.add_phi_incoming(phi, body, next).unwrap();

    func.switch_to_block(after).unwrap();
    {
        let mut ins = func.ins().unwrap();
        let result = ins.load(acc, Type::I64);
        ins.return_value(result).unwrap();
    }

    func.build().unwrap()
}
