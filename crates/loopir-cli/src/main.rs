use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::io::{BufRead, IsTerminal, Read, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loopir")]
#[command(about = "LOOP language compiler - lowers LOOP programs to CFG-IR")]
#[command(version = "0.1.0")]
#[command(author = "Gianluca Brigandi <gbrigand@gmail.com>")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG overrides it.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a program and print its IR
    Compile {
        /// Source file, or `-` for stdin
        input: String,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "text")]
        format: FormatArg,

        #[arg(long)]
        no_color: bool,

        #[arg(long)]
        case_sensitive: bool,

        /// Skip the IR verifier
        #[arg(long)]
        no_verify: bool,
    },

    /// Compile a program and evaluate it with `n` bound to the argument
    Run {
        /// Source file, or `-` for stdin
        input: String,

        /// Natural number bound to `n`
        #[arg(value_parser = clap::value_parser!(i64).range(0..))]
        n: i64,

        #[arg(long)]
        case_sensitive: bool,

        /// Instruction budget for the interpreter
        #[arg(long)]
        fuel: Option<u64>,
    },

    /// Read one program per line, printing its IR and result
    Repl {
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i64).range(0..))]
        n: i64,

        #[arg(long)]
        no_color: bool,

        #[arg(long)]
        case_sensitive: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for loopir_emit::OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => loopir_emit::OutputFormat::Text,
            FormatArg::Json => loopir_emit::OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compile {
            input,
            output,
            format,
            no_color,
            case_sensitive,
            no_verify,
        } => cmd_compile(input, output, format, no_color, case_sensitive, no_verify),
        Commands::Run {
            input,
            n,
            case_sensitive,
            fuel,
        } => cmd_run(input, n, case_sensitive, fuel),
        Commands::Repl {
            n,
            no_color,
            case_sensitive,
        } => cmd_repl(n, no_color, case_sensitive),
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn read_source(input: &str) -> Result<String> {
    if input == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read program from stdin")?;
        Ok(source)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input))
    }
}

fn compiler_config(case_sensitive: bool) -> loopir_transform::CompilerConfig {
    use loopir_parser::KeywordCase;

    loopir_transform::CompilerConfig {
        keyword_case: if case_sensitive {
            KeywordCase::Sensitive
        } else {
            KeywordCase::Insensitive
        },
        ..Default::default()
    }
}

fn cmd_compile(
    input: String,
    output: Option<PathBuf>,
    format: FormatArg,
    no_color: bool,
    case_sensitive: bool,
    no_verify: bool,
) -> Result<()> {
    use loopir_emit::{EmitterConfig, LoopIrEmitter};
    use loopir_transform::transform_source_to_ir_with_config;

    let source = read_source(&input)?;
    let config = loopir_transform::CompilerConfig {
        verify: !no_verify,
        ..compiler_config(case_sensitive)
    };
    let module = transform_source_to_ir_with_config(&source, config)?;

    let emitter_config = EmitterConfig {
        use_colors: !no_color && output.is_none(),
        ..EmitterConfig::default()
    };
    let rendered = LoopIrEmitter::new(emitter_config)
        .with_format(format.into())
        .render(&module)?;

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::debug!(path = %path.display(), "wrote module");
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn cmd_run(input: String, n: i64, case_sensitive: bool, fuel: Option<u64>) -> Result<()> {
    use loopir_core::Interpreter;
    use loopir_transform::transform_source_to_ir_with_config;

    let source = read_source(&input)?;
    let module = transform_source_to_ir_with_config(&source, compiler_config(case_sensitive))?;
    let function = module
        .last_function()
        .ok_or_else(|| anyhow!("no function was generated"))?;

    let mut interpreter = Interpreter::new(function);
    if let Some(fuel) = fuel {
        interpreter = interpreter.with_fuel(fuel);
    }
    let result = interpreter.run(&[n])?;

    println!("Program for n={} evaluated to: {}", n, result);
    Ok(())
}

fn cmd_repl(n: i64, no_color: bool, case_sensitive: bool) -> Result<()> {
    use colored::*;
    use loopir_core::Interpreter;
    use loopir_emit::{EmitterConfig, LoopIrEmitter};
    use loopir_transform::CodeGenerator;

    let mut generator = CodeGenerator::with_config(compiler_config(case_sensitive));
    let emitter = LoopIrEmitter::new(EmitterConfig {
        use_colors: !no_color,
        ..EmitterConfig::default()
    });

    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = std::io::stdout();

    loop {
        if interactive {
            print!("loop> ");
            stdout.flush()?;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let name = match generator.compile_source(line) {
            Ok(name) => name,
            Err(err) => {
                if no_color {
                    eprintln!("error: {}", err);
                } else {
                    eprintln!("{} {}", "error:".bright_red().bold(), err);
                }
                continue;
            }
        };

        let function = generator
            .module()
            .get_function(&name)
            .ok_or_else(|| anyhow!("function {} missing after compilation", name))?;
        print!("{}", emitter.render_function(function)?);

        match Interpreter::new(function).run(&[n]) {
            Ok(result) => println!("Program for n={} evaluated to: {}", n, result),
            Err(err) => eprintln!("error: {}", err),
        }
    }

    Ok(())
}
