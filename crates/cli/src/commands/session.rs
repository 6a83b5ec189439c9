//! Interactive key list session.
//!
//! Responsibilities:
//! - Read one intent per line from stdin and forward it to the controller.
//! - Print every controller event as it is produced.
//! - Save the network after each intent that changed it.
//!
//! Does NOT handle:
//! - Terminal rendering or line editing.
//!
//! Invariants:
//! - A failed intent is reported on stderr and the session continues.
//! - The session ends after a selection, on `quit`, or at end of input.
//!   The screen result is printed before the command returns.

use anyhow::{Context, Result};
use meshkeys_controller::{
    AppKeyListController, ControllerEvent, PendingRemoval, UndoOutcome,
};
use meshkeys_store::{MeshNetworkStore, generate_app_key};
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use crate::context::NetworkContext;

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    List,
    Add(Option<String>),
    Edit(usize, String),
    Remove(usize),
    Undo,
    Finalize,
    Select(usize),
    Reject(usize),
    Sync,
    Quit,
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let command = parts.next().ok_or("empty intent")?.to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        let position = |arg: Option<&&str>| -> Result<usize, String> {
            let raw = arg.ok_or_else(|| format!("{command} needs a position"))?;
            raw.parse::<usize>()
                .map_err(|_| format!("'{raw}' is not a position"))
        };

        let intent = match command.as_str() {
            "list" | "ls" => Intent::List,
            "add" => Intent::Add(args.first().map(|s| s.to_string())),
            "edit" => {
                let key = args
                    .get(1)
                    .ok_or_else(|| "edit needs a position and a key".to_string())?;
                Intent::Edit(position(args.first())?, key.to_string())
            }
            "remove" | "rm" => Intent::Remove(position(args.first())?),
            "undo" => Intent::Undo,
            "finalize" => Intent::Finalize,
            "select" => Intent::Select(position(args.first())?),
            "reject" => Intent::Reject(position(args.first())?),
            "sync" => Intent::Sync,
            "quit" | "exit" => Intent::Quit,
            other => return Err(format!("unknown intent '{other}'")),
        };
        Ok(intent)
    }
}

struct Session<'a> {
    ctx: &'a NetworkContext,
    controller: AppKeyListController<MeshNetworkStore>,
    events: UnboundedReceiver<ControllerEvent>,
    last_offer: Option<PendingRemoval>,
}

impl Session<'_> {
    /// Apply one intent. Returns true when the store changed.
    fn apply(&mut self, intent: Intent) -> Result<bool> {
        let changed = match intent {
            Intent::List => {
                let output = self
                    .ctx
                    .formatter()
                    .format_view_state(self.controller.mode(), self.controller.view_state())?;
                println!("{output}");
                false
            }
            Intent::Add(key) => {
                let raw = key.unwrap_or_else(generate_app_key);
                self.controller.on_app_key_added(&raw)?;
                true
            }
            Intent::Edit(position, key) => {
                self.controller.on_app_key_edited(position, &key)?;
                true
            }
            Intent::Remove(position) => {
                let pending = self.controller.on_item_swipe_dismissed(position)?;
                self.last_offer = Some(pending);
                true
            }
            Intent::Undo => match self.last_offer.take() {
                Some(token) => match self.controller.on_undo_requested(&token)? {
                    UndoOutcome::Restored(_) => true,
                    UndoOutcome::AlreadyConsumed => {
                        eprintln!("Nothing to undo: the removal is already final");
                        false
                    }
                },
                None => {
                    eprintln!("Nothing to undo");
                    false
                }
            },
            Intent::Finalize => {
                self.controller.finalize_removal();
                false
            }
            Intent::Select(position) => {
                let key = self
                    .controller
                    .view_state()
                    .key_at(position)
                    .cloned()
                    .context("No key at this position")?;
                self.controller.on_item_activated(position, &key)?;
                false
            }
            Intent::Reject(position) => {
                self.controller.on_swipe_dismiss_rejected(position);
                false
            }
            Intent::Sync => {
                self.controller.sync_with_store();
                false
            }
            Intent::Quit => false,
        };
        Ok(changed)
    }

    fn flush_events(&mut self) -> Result<()> {
        while let Ok(event) = self.events.try_recv() {
            println!("{}", self.ctx.formatter().format_event(&event)?);
        }
        Ok(())
    }
}

pub async fn run(ctx: &NetworkContext) -> Result<()> {
    let mut controller = ctx.controller()?;
    let (_, events) = controller.subscribe();
    let mut session = Session {
        ctx,
        controller,
        events,
        last_offer: None,
    };

    let initial = session.controller.compute_initial_view_state();
    println!(
        "{}",
        ctx.formatter()
            .format_view_state(session.controller.mode(), &initial)?
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read intent")? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        session.controller.expire_pending();
        let intent = match line.parse::<Intent>() {
            Ok(intent) => intent,
            Err(message) => {
                warn!(line, "Unrecognized intent");
                eprintln!("Error: {message}");
                continue;
            }
        };
        debug!(?intent, "Applying intent");

        let quit = intent == Intent::Quit;
        match session.apply(intent) {
            Ok(true) => ctx.save()?,
            Ok(false) => {}
            Err(e) => eprintln!("Error: {e:#}"),
        }
        session.flush_events()?;

        if quit || session.controller.is_finished() {
            break;
        }
    }

    if !session.controller.is_finished() {
        session.controller.finish();
    }
    session.flush_events()?;
    Ok(())
}
