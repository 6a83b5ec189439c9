//! Keys command implementation.
//!
//! Each subcommand opens one key list screen, applies a single intent and
//! closes it again. Removals are finalized before the command returns.

use anyhow::Result;
use meshkeys_controller::{Activation, ControllerError};
use meshkeys_store::generate_app_key;
use tracing::info;

use crate::args::KeysCommand;
use crate::context::NetworkContext;

pub fn run(command: KeysCommand, ctx: &NetworkContext) -> Result<()> {
    match command {
        KeysCommand::List => list(ctx),
        KeysCommand::Add { key } => add(ctx, key),
        KeysCommand::Edit { position, key } => edit(ctx, position, &key),
        KeysCommand::Remove { position } => remove(ctx, position),
        KeysCommand::Select { position } => select(ctx, position),
    }
}

fn list(ctx: &NetworkContext) -> Result<()> {
    let controller = ctx.controller()?;
    let view = controller.compute_initial_view_state();
    println!(
        "{}",
        ctx.formatter().format_view_state(controller.mode(), &view)?
    );
    Ok(())
}

fn add(ctx: &NetworkContext, key: Option<String>) -> Result<()> {
    let mut controller = ctx.controller()?;
    let raw = key.unwrap_or_else(generate_app_key);
    let index = controller.on_app_key_added(&raw)?;
    ctx.save()?;

    info!(%index, "Key added");
    if let Some(added) = controller.view_state().keys.iter().find(|k| k.index == index) {
        println!("{}", ctx.formatter().format_key(added)?);
    }
    Ok(())
}

fn edit(ctx: &NetworkContext, position: usize, raw: &str) -> Result<()> {
    let mut controller = ctx.controller()?;
    controller.on_app_key_edited(position, raw)?;
    ctx.save()?;

    if let Some(updated) = controller.view_state().key_at(position) {
        println!("{}", ctx.formatter().format_key(updated)?);
    }
    Ok(())
}

fn remove(ctx: &NetworkContext, position: usize) -> Result<()> {
    let mut controller = ctx.controller()?;
    let pending = controller.on_item_swipe_dismissed(position)?;
    controller.finalize_removal();
    ctx.save()?;

    println!("{}", ctx.formatter().format_key(&pending.key)?);
    Ok(())
}

fn select(ctx: &NetworkContext, position: usize) -> Result<()> {
    let mut controller = ctx.controller()?;
    if !controller.mode().is_selection() {
        return Err(ControllerError::OperationNotAllowed {
            operation: "select",
            mode: controller.mode().kind(),
        }
        .into());
    }

    let len = controller.view_state().len();
    let key = controller
        .view_state()
        .key_at(position)
        .cloned()
        .ok_or(ControllerError::StaleReference { position, len })?;

    if let Activation::Selected(result) = controller.on_item_activated(position, &key)? {
        println!("{}", ctx.formatter().format_result(&result)?);
        Ok(())
    } else {
        Err(ControllerError::StaleReference { position, len }.into())
    }
}
