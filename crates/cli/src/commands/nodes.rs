//! Nodes command implementation.

use anyhow::{Context, Result};
use meshkeys_store::AppKeyIndex;

use crate::args::NodesCommand;
use crate::context::NetworkContext;

pub fn run(command: NodesCommand, ctx: &NetworkContext) -> Result<()> {
    let store = ctx.store();
    let mutated = match command {
        NodesCommand::List => false,
        NodesCommand::Add { address, name } => {
            store.add_node(address, &name)?;
            true
        }
        NodesCommand::Bind { address, index } => {
            let index = AppKeyIndex::new(index).context("Key index out of range")?;
            store
                .bind_app_key(address, index)
                .with_context(|| format!("Failed to add key {index} to node 0x{address:04X}"))?;
            true
        }
        NodesCommand::Unbind { address, index } => {
            let index = AppKeyIndex::new(index).context("Key index out of range")?;
            store.unbind_app_key(address, index).with_context(|| {
                format!("Failed to remove key {index} from node 0x{address:04X}")
            })?;
            true
        }
    };

    if mutated {
        ctx.save()?;
    }
    println!("{}", ctx.formatter().format_nodes(&store.nodes())?);
    Ok(())
}
