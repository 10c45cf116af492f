use super::{control_flow_builder, LoweringContext, TransformError};
use loopir_core::{Type, Value};
use loopir_parser::{BinaryOperator, Expr};

/// Lowers one expression at the builder's cursor and returns the value it produced. On error
/// nothing further is emitted for the failing node; instructions already emitted for earlier
/// siblings are left for the caller to discard with the function.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpressionTransformer;

impl ExpressionTransformer {
    pub fn new() -> Self {
        Self
    }

    pub fn transform_expression(
        &self,
        ctx: &mut LoweringContext<'_>,
        expr: &Expr,
    ) -> Result<Value, TransformError> {
        match expr {
            Expr::Number(value) => self.transform_number(ctx, *value),
            Expr::Identifier(name) => self.transform_identifier(ctx, name),
            Expr::BinaryOp { op, lhs, rhs } => self.transform_binary(ctx, *op, lhs, rhs),
            Expr::Loop { count, body } => {
                let count = self.transform_expression(ctx, count)?;
                control_flow_builder::build_loop(ctx, count, |ctx| {
                    self.transform_expression(ctx, body)
                })
            }
            Expr::Assign { target, value } => self.transform_assignment(ctx, target, value),
            Expr::Sequence { .. } => self.transform_sequence(ctx, expr),
        }
    }

    /// Walks the right-nested chain in a loop. Each statement is lowered for effect and the
    /// last one gives the value.
    fn transform_sequence(
        &self,
        ctx: &mut LoweringContext<'_>,
        sequence: &Expr,
    ) -> Result<Value, TransformError> {
        let mut current = sequence;
        loop {
            let Expr::Sequence { first, second } = current else {
                return self.transform_expression(ctx, current);
            };

            self.transform_expression(ctx, first)?;
            match second {
                Some(rest) => current = &**rest,
                None => return Err(TransformError::EmptyExpression),
            }
        }
    }

    fn transform_number(
        &self,
        ctx: &mut LoweringContext<'_>,
        value: u64,
    ) -> Result<Value, TransformError> {
        let value = i64::try_from(value).map_err(|_| TransformError::LiteralOutOfRange(value))?;
        Ok(ctx.builder.ins()?.iconst(value))
    }

    fn transform_identifier(
        &self,
        ctx: &mut LoweringContext<'_>,
        name: &str,
    ) -> Result<Value, TransformError> {
        let slot = ctx
            .symbols
            .lookup(name)
            .ok_or_else(|| TransformError::UndefinedVariable(name.to_string()))?;
        Ok(ctx.builder.ins()?.load(slot, Type::I64))
    }

    fn transform_binary(
        &self,
        ctx: &mut LoweringContext<'_>,
        op: BinaryOperator,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<Value, TransformError> {
        let lhs = self.transform_expression(ctx, lhs)?;
        let rhs = self.transform_expression(ctx, rhs)?;

        match op {
            BinaryOperator::Plus => Ok(ctx.builder.ins()?.add(lhs, rhs, Type::I64)),
            BinaryOperator::Minus => control_flow_builder::build_monus(ctx, lhs, rhs),
        }
    }

    /// First assignment to a name allocates its slot. The assignment evaluates to the stored value.
    fn transform_assignment(
        &self,
        ctx: &mut LoweringContext<'_>,
        target: &str,
        value: &Expr,
    ) -> Result<Value, TransformError> {
        let value = self.transform_expression(ctx, value)?;
        let slot = ctx.slot_for(target);
        ctx.builder.ins()?.store(slot, value);
        Ok(value)
    }
}
