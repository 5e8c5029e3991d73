//! fnt driver: parse a source file or snippet, lower every local
//! declaration through the binder-facing entry point, and print the
//! interned shapes.

mod args;

use anyhow::{Context, Result, bail};
use args::CliArgs;
use clap::Parser;
use colored::Colorize;
use fnt_parser::{NodeArena, NodeIndex, ParserState, syntax_kind_ext};
use fnt_solver::{
    Nullability, TypeFormatter, TypeInterner, TypeKey, emit_transforms, lower_type,
    structural_resolver,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct ShapeDump {
    name: String,
    shape: String,
    /// Nullability transform stream for function shapes, one tag per
    /// reference occurrence in traversal order.
    tags: Vec<u8>,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log.as_deref());

    let (file_name, source) = match (&args.input, &args.eval) {
        (_, Some(snippet)) => ("<eval>".to_string(), snippet.clone()),
        (Some(path), None) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            (path.display().to_string(), source)
        }
        (None, None) => bail!("nothing to do: pass a source file or --eval <snippet>"),
    };

    let mut state = ParserState::new(file_name.clone(), &source);
    let statements = state.parse_statements();
    let (arena, diagnostics) = state.into_parts();

    for diagnostic in &diagnostics {
        println!(
            "{} FNT{}: {} ({}:{})",
            "error".red().bold(),
            diagnostic.code,
            diagnostic.message_text,
            diagnostic.file,
            diagnostic.start
        );
    }
    if !diagnostics.is_empty() {
        bail!("{} parse error(s) in {file_name}", diagnostics.len());
    }

    let interner = TypeInterner::new();
    let dumps = lower_declarations(&arena, &statements, &interner);

    if args.emit_shapes {
        println!("{}", serde_json::to_string_pretty(&dumps)?);
        return Ok(());
    }

    for dump in &dumps {
        println!("{}: {}", dump.name.cyan(), dump.shape);
    }
    println!(
        "{} declaration(s), {} distinct signature(s)",
        dumps.len(),
        interner.signature_count()
    );
    Ok(())
}

fn lower_declarations(
    arena: &NodeArena,
    statements: &[NodeIndex],
    interner: &TypeInterner,
) -> Vec<ShapeDump> {
    let formatter = TypeFormatter::new(interner);
    let mut resolver = structural_resolver(interner);
    let mut dumps = Vec::new();

    for &stmt in statements {
        let Some(node) = arena.get(stmt) else {
            continue;
        };
        if node.kind != syntax_kind_ext::LOCAL_DECLARATION {
            continue;
        }
        let local = arena
            .get_local_declaration(node)
            .expect("local declaration payload");

        let lowered = lower_type(arena, local.ty, interner, &mut resolver);
        let mut tags: Vec<Nullability> = Vec::new();
        if let Some(TypeKey::Function(signature)) = interner.lookup(lowered.ty) {
            emit_transforms(interner, signature, &mut tags);
        }

        dumps.push(ShapeDump {
            name: arena.resolve_atom(local.name).to_string(),
            shape: formatter.format_type_ref(lowered),
            tags: tags.into_iter().map(Nullability::as_u8).collect(),
        });
    }
    dumps
}

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
