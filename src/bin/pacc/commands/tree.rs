//! `pacc tree` command

use anyhow::Result;

use crate::cli::TreeArgs;
use pacc::ops::{render_tree, resolve_package, TreeOptions};
use pacc::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: TreeArgs) -> Result<()> {
    let resolved = resolve_package(ctx)?;

    let opts = TreeOptions {
        max_depth: args.depth.unwrap_or(usize::MAX),
        duplicates: args.duplicates,
    };
    print!("{}", render_tree(&resolved.package, opts));

    Ok(())
}
