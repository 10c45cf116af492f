use super::{ExpressionTransformer, LoweringContext, TransformError};
use loopir_core::{analysis::verify_function, Function, FunctionBuilder, IRContext, Module, Type};
use loopir_parser::{KeywordCase, Lexer, LexerConfig, Parser, TopLevel};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub keyword_case: KeywordCase,
    /// Name of the first compiled unit; later units get `.1`, `.2`, ... appended.
    pub function_name: String,
    pub module_name: String,
    pub verify: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            keyword_case: KeywordCase::default(),
            function_name: "mainloop".to_string(),
            module_name: "loop".to_string(),
            verify: true,
        }
    }
}

impl CompilerConfig {
    pub fn lexer_config(&self) -> LexerConfig {
        LexerConfig {
            keyword_case: self.keyword_case,
        }
    }
}

/// Lowers top-level units into functions of one output module.
pub struct CodeGenerator {
    module: Module,
    context: IRContext,
    expressions: ExpressionTransformer,
    config: CompilerConfig,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self::with_config(CompilerConfig::default())
    }

    pub fn with_config(config: CompilerConfig) -> Self {
        Self {
            module: Module::new(config.module_name.clone()),
            context: IRContext::new(),
            expressions: ExpressionTransformer::new(),
            config,
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn into_module(self) -> Module {
        self.module
    }

    /// Parses and compiles one unit, returning the name of the new function.
    pub fn compile_source(&mut self, source: &str) -> Result<String, TransformError> {
        let lexer = Lexer::with_config(source, self.config.lexer_config());
        let program = Parser::new(lexer).parse_top_level()?;
        self.compile(&program)
    }

    /// Compiles one unit into the module. On any error the module is left untouched.
    pub fn compile(&mut self, program: &TopLevel) -> Result<String, TransformError> {
        let name = self.module.unique_name(&self.config.function_name);
        debug!(function = %name, program = %program, "lowering top-level unit");

        let function = match self.lower_top_level(&name, program) {
            Ok(function) => function,
            Err(err) => {
                warn!(function = %name, %err, "discarding function");
                return Err(err);
            }
        };

        if self.config.verify {
            if let Err(err) = verify_function(&function) {
                warn!(function = %name, %err, "generated function failed verification");
                return Err(err.into());
            }
        }

        debug!(
            function = %name,
            blocks = function.body.blocks.len(),
            instructions = function.instruction_count(),
            "function complete"
        );
        self.module.add_function(function)?;
        Ok(name)
    }

    /// `n` starts as the parameter, `f` as zero; the body runs for effect and the function
    /// returns whatever `f` holds at the end.
    fn lower_top_level(
        &mut self,
        name: &str,
        program: &TopLevel,
    ) -> Result<Function, TransformError> {
        let mut builder = FunctionBuilder::new(name, &mut self.context);
        builder.param("n", Type::I64).returns(Type::I64);
        let param = builder.get_param(0);

        let mut ctx = LoweringContext::new(builder);
        let n_slot = ctx.slot_for("n");
        let f_slot = ctx.slot_for("f");
        {
            let mut ins = ctx.builder.ins()?;
            ins.store(n_slot, param);
            let zero = ins.iconst(0);
            ins.store(f_slot, zero);
        }

        self.expressions.transform_expression(&mut ctx, &program.body)?;

        {
            let mut ins = ctx.builder.ins()?;
            let result = ins.load(f_slot, Type::I64);
            ins.return_value(result)?;
        }

        ctx.finish()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}
