//! Command registry: a tree of named, helpable, invokable units.
//!
//! Each [`Command`] owns its subcommands outright, so cloning a command deep
//! clones the whole subtree and dropping one tree never invalidates another.
//! Handlers are shared immutable callables (`Arc`), callable from the event
//! loop or, via a captured [`ClientHandle`] clone, from a deferred callback
//! on the host's own thread.

pub(crate) mod builtins;

use crate::network::ClientHandle;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Handler signature: the connected client and the argument tail.
pub type Callback = Arc<dyn Fn(&ClientHandle, &str) + Send + Sync>;

/// A named command with optional help text, handler, and subcommands.
///
/// Empty help hides the command from listings. A command without a handler
/// is a pure namespace node and only does something when one of its
/// subcommands matches.
#[derive(Clone)]
pub struct Command {
    name: String,
    help: String,
    handler: Option<Callback>,
    subcommands: BTreeMap<String, Command>,
}

impl Command {
    /// A namespace node: help text but no handler of its own.
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            handler: None,
            subcommands: BTreeMap::new(),
        }
    }

    pub fn with_handler(
        name: impl Into<String>,
        help: impl Into<String>,
        handler: impl Fn(&ClientHandle, &str) + Send + Sync + 'static,
    ) -> Self {
        let mut command = Self::new(name, help);
        command.handler = Some(Arc::new(handler));
        command
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn set_handler(&mut self, handler: impl Fn(&ClientHandle, &str) + Send + Sync + 'static) {
        self.handler = Some(Arc::new(handler));
    }

    /// Insert a subcommand, replacing (and dropping) any previous one with
    /// the same name.
    pub fn add_sub(&mut self, sub: Command) {
        self.subcommands.insert(sub.name.clone(), sub);
    }

    pub fn sub(&self, name: &str) -> Option<&Command> {
        self.subcommands.get(name)
    }

    pub fn remove_sub(&mut self, name: &str) {
        self.subcommands.remove(name);
    }

    /// Iterate the owned subcommands, in name order.
    pub fn subcommands(&self) -> impl Iterator<Item = &Command> {
        self.subcommands.values()
    }

    /// Dispatch an argument tail against this command.
    ///
    /// The first token selects: `help`/`-h` prints this command's help and a
    /// listing of its documented subcommands; a matching subcommand receives
    /// everything after the token; otherwise the command's own handler gets
    /// the full tail. A tail that matches nothing on a handler-less command
    /// is a tolerated no-op, not an error.
    pub fn invoke(&self, handle: &ClientHandle, args: &str) {
        let (key, rest) = match args.split_once(' ') {
            Some((key, rest)) => (key, rest.trim_start()),
            None => (args, ""),
        };

        if key == "help" || key == "-h" {
            self.send_help(handle);
            return;
        }

        if let Some(sub) = self.subcommands.get(key) {
            sub.invoke(handle, rest);
            return;
        }

        if let Some(handler) = &self.handler {
            handler(handle, args);
        }
    }

    fn send_help(&self, handle: &ClientHandle) {
        if !self.help.is_empty() {
            handle.send(format!("{}\n", self.help));
        }
        if !self.subcommands.is_empty() {
            send_listing(handle, self.subcommands.values(), "");
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("has_handler", &self.handler.is_some())
            .field("subcommands", &self.subcommands.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Top-level mapping from command name to owned [`Command`].
#[derive(Debug, Default)]
pub struct Registry {
    commands: BTreeMap<String, Command>,
}

impl Registry {
    /// Register a command, replacing (and dropping) any previous one with
    /// the same name.
    pub fn add(&mut self, command: Command) {
        self.commands.insert(command.name.clone(), command);
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn remove(&mut self, name: &str) {
        self.commands.remove(name);
    }

    /// Attach a subcommand to an existing command. Missing parents are a
    /// silent no-op.
    pub fn add_sub(&mut self, parent: &str, sub: Command) {
        if let Some(command) = self.commands.get_mut(parent) {
            command.add_sub(sub);
        }
    }

    pub fn get_sub(&self, parent: &str, name: &str) -> Option<&Command> {
        self.commands.get(parent).and_then(|command| command.sub(name))
    }

    pub fn remove_sub(&mut self, parent: &str, name: &str) {
        if let Some(command) = self.commands.get_mut(parent) {
            command.remove_sub(name);
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }
}

/// Send a tab-aligned listing of every documented command.
pub(crate) fn send_listing<'a>(
    handle: &ClientHandle,
    commands: impl Iterator<Item = &'a Command>,
    header: &str,
) {
    if !header.is_empty() {
        handle.send(header);
    }
    for command in commands {
        if command.help.is_empty() {
            continue;
        }
        let tabs = 3usize.saturating_sub(command.name.len() / 8);
        handle.send(format!(
            "\t{}{}{}\n",
            command.name,
            "\t".repeat(tabs),
            command.help
        ));
    }
}
