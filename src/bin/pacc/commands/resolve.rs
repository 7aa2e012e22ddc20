//! `pacc resolve` command

use anyhow::Result;

use crate::cli::ResolveArgs;
use pacc::ops::{package_warnings, resolve_package};
use pacc::util::diagnostic::emit;
use pacc::util::fs::relative_path;
use pacc::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: ResolveArgs) -> Result<()> {
    let resolved = resolve_package(ctx)?;
    for warning in package_warnings(&resolved.package) {
        emit(&warning, ctx.color());
    }

    if args.json {
        println!("{}", resolved.to_json()?);
        return Ok(());
    }

    let package = &resolved.package;
    println!("{}", package);
    for project in &package.projects {
        println!("  {} ({})", project.name, project.kind);
    }

    if resolved.dependencies.is_empty() {
        println!("No dependencies");
    } else {
        println!("Dependencies:");
        for dep in &resolved.dependencies {
            let root = relative_path(ctx.cwd(), &dep.root);
            println!("  {} v{} ({})", dep.name, dep.version, root.display());
        }
    }

    if ctx.is_verbose() {
        println!("Searched:");
        for dir in &resolved.candidates {
            println!("  {}", dir.display());
        }
    }

    let stats = resolved.stats;
    println!(
        "{} package(s) loaded, {} reused, {} merge(s)",
        stats.packages_loaded, stats.packages_reused, stats.merges
    );

    Ok(())
}
