use super::{LoweringContext, TransformError};
use loopir_core::{Type, Value};
use tracing::trace;

/// `max(lhs - rhs, 0)` as a diamond:
///
/// ```text
/// current:  exact = lhs - rhs; brif exact < 0, then, else
/// then:     zero; jump ifmerge
/// else:     jump ifmerge
/// ifmerge:  phi [then: zero], [else: exact]
/// ```
///
/// Leaves the cursor in `ifmerge`.
pub fn build_monus(
    ctx: &mut LoweringContext<'_>,
    lhs: Value,
    rhs: Value,
) -> Result<Value, TransformError> {
    let then_block = ctx.builder.create_block("then");
    let else_block = ctx.builder.create_block("else");
    let merge_block = ctx.builder.create_block("ifmerge");

    let exact = {
        let mut ins = ctx.builder.ins()?;
        let exact = ins.sub(lhs, rhs, Type::I64);
        let zero = ins.iconst(0);
        let negative = ins.lt(exact, zero);
        ins.branch(negative, then_block, else_block)?;
        exact
    };

    ctx.builder.switch_to_block(then_block)?;
    let zero = {
        let mut ins = ctx.builder.ins()?;
        let zero = ins.iconst(0);
        ins.jump(merge_block)?;
        zero
    };

    ctx.builder.switch_to_block(else_block)?;
    ctx.builder.ins()?.jump(merge_block)?;

    ctx.builder.switch_to_block(merge_block)?;
    let (result, _) = ctx
        .builder
        .ins()?
        .phi(vec![(then_block, zero), (else_block, exact)])?;

    trace!(%exact, %result, "lowered monus");
    Ok(result)
}

/// Counting loop around `lower_body`:
///
/// ```text
/// header:        jump loopcondition
/// loopcondition: counter = phi [header: count], [latch: next]
///                brif counter == 0, afterloop, loopbody
/// loopbody:      <body> ... latch: next = counter - 1; jump loopcondition
/// afterloop:     0
/// ```
///
/// The back edge comes from whatever block the body leaves the cursor in, so the phi's second
/// incoming value is patched in after the body is built. The loop itself evaluates to zero.
pub fn build_loop<'a, F>(
    ctx: &mut LoweringContext<'a>,
    count: Value,
    lower_body: F,
) -> Result<Value, TransformError>
where
    F: FnOnce(&mut LoweringContext<'a>) -> Result<Value, TransformError>,
{
    let header = ctx.current_block()?;
    let condition_block = ctx.builder.create_block("loopcondition");
    let body_block = ctx.builder.create_block("loopbody");
    let after_block = ctx.builder.create_block("afterloop");

    ctx.builder.ins()?.jump(condition_block)?;

    ctx.builder.switch_to_block(condition_block)?;
    let (counter, phi) = {
        let mut ins = ctx.builder.ins()?;
        let (counter, phi) = ins.phi(vec![(header, count)])?;
        let zero = ins.iconst(0);
        let done = ins.eq(counter, zero);
        ins.branch(done, after_block, body_block)?;
        (counter, phi)
    };

    ctx.builder.switch_to_block(body_block)?;
    lower_body(ctx)?;

    let latch = ctx.current_block()?;
    let next = {
        let mut ins = ctx.builder.ins()?;
        let one = ins.iconst(1);
        let next = ins.sub(counter, one, Type::I64);
        ins.jump(condition_block)?;
        next
    };
    ctx.builder.add_phi_incoming(phi, latch, next)?;
    trace!(%header, %latch, "closed loop back edge");

    ctx.builder.switch_to_block(after_block)?;
    let value = ctx.builder.ins()?.iconst(0);
    Ok(value)
}
