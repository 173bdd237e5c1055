//! Built-in console commands.
//!
//! Installed at construction: `help`, `exit`, `version`, `upload` (the help
//! entry and usage reply; the actual transfer is intercepted by the
//! dispatcher before registry lookup), and the `debugmsg` broadcast toggle.

use super::{send_listing, Command};
use crate::state::Hub;
use std::sync::{Arc, Weak};

const VERSION_LINE: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"), "\n");

pub(crate) fn install(hub: &Arc<Hub>) {
    let mut registry = hub.registry.write();
    registry.add(help_command(Arc::downgrade(hub)));
    registry.add(exit_command());
    registry.add(version_command());
    registry.add(upload_command());
    registry.add(debugmsg_command(Arc::downgrade(hub)));
}

fn help_command(hub: Weak<Hub>) -> Command {
    Command::with_handler("help", "Print this message. Args: [ ]", move |handle, _args| {
        if let Some(hub) = hub.upgrade() {
            let registry = hub.registry.read();
            send_listing(handle, registry.iter(), "\nAvailable commands:\n");
        }
    })
}

fn exit_command() -> Command {
    Command::with_handler(
        "exit",
        "Close connection to the console. Args: [-h | help | ]",
        |handle, _args| handle.close(),
    )
}

fn version_command() -> Command {
    Command::with_handler("version", "print version string", |handle, _args| {
        handle.send(VERSION_LINE);
    })
}

fn upload_command() -> Command {
    Command::with_handler(
        "upload",
        "upload file. Args: [filename base64_encoded_data]",
        |handle, _args| handle.send("upload: invalid args! Type 'help' for options\n"),
    )
}

fn debugmsg_command(hub: Weak<Hub>) -> Command {
    let status_hub = hub.clone();
    let mut command = Command::with_handler(
        "debugmsg",
        "Whether or not to forward log messages to the console. Args: [-h | help | on | off | ]",
        move |handle, _args| {
            if let Some(hub) = status_hub.upgrade() {
                let state = if hub.broadcast_enabled() { "on" } else { "off" };
                handle.send(format!("Debug message is: {state}\n"));
            }
        },
    );

    let on_hub = hub.clone();
    command.add_sub(Command::with_handler("on", "enable log forwarding", move |_handle, _args| {
        if let Some(hub) = on_hub.upgrade() {
            hub.set_broadcast_enabled(true);
        }
    }));
    command.add_sub(Command::with_handler("off", "disable log forwarding", move |_handle, _args| {
        if let Some(hub) = hub.upgrade() {
            hub.set_broadcast_enabled(false);
        }
    }));

    command
}
