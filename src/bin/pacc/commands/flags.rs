//! `pacc flags` command

use anyhow::Result;

use crate::cli::FlagsArgs;
use pacc::ops::{package_flags, resolve_package};
use pacc::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: FlagsArgs) -> Result<()> {
    let resolved = resolve_package(ctx)?;
    let flags = package_flags(&resolved.package, &args.project, args.filter.as_deref())?;

    let label = match &args.filter {
        Some(filter) => format!("`{}` [{}]", args.project, filter),
        None => format!("`{}`", args.project),
    };

    if !args.link {
        println!("# Compile flags for {}:", label);
        for flag in &flags.compile {
            println!("  {}", flag);
        }
    }

    if !args.compile && !args.link {
        println!();
    }

    if !args.compile {
        println!("# Link flags for {}:", label);
        for flag in &flags.link {
            println!("  {}", flag);
        }
    }

    Ok(())
}
