//! Command registry and alias resolution.
//!
//! Built once at startup, read-only afterwards. Registration fails fast on
//! an alias collision so the shell never resolves a name to the wrong
//! command.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::commands::{Command, EmptyCommand, UnrecognizedCommand, builtins};
use crate::core::error::ShellError;

/// Outcome of looking up a typed command name.
pub enum Resolved<'a> {
    /// A blank name; dispatch does nothing.
    Empty(&'a dyn Command),
    Found(&'a dyn Command),
    /// No such command; executing it reports `NotFound`.
    Unrecognized(&'a dyn Command),
}

impl<'a> Resolved<'a> {
    /// The command to run, placeholder or real.
    pub fn command(&self) -> &'a dyn Command {
        match self {
            Self::Empty(cmd) | Self::Found(cmd) | Self::Unrecognized(cmd) => *cmd,
        }
    }
}

/// Resolvable names mapped to command instances.
pub struct Registry {
    commands: BTreeMap<&'static str, Box<dyn Command>>,
    aliases: BTreeMap<&'static str, &'static str>,
    empty: EmptyCommand,
    unrecognized: UnrecognizedCommand,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
            aliases: BTreeMap::new(),
            empty: EmptyCommand,
            unrecognized: UnrecognizedCommand,
        }
    }

    /// A registry holding every built-in command.
    pub fn with_builtins() -> Result<Self, ShellError> {
        let mut registry = Self::new();
        for command in builtins() {
            registry.register(command)?;
        }
        debug!(
            commands = registry.commands.len(),
            aliases = registry.aliases.len(),
            "registered built-in commands"
        );
        Ok(registry)
    }

    /// Add a command under its canonical name.
    ///
    /// Registering the same name again replaces the earlier command. An
    /// alias already owned by a different command, or equal to another
    /// command's name, is an [`ShellError::AliasConflict`].
    pub fn register(&mut self, command: Box<dyn Command>) -> Result<(), ShellError> {
        let name = command.name();
        if name.is_empty() || name == self.unrecognized.name() {
            return Err(ShellError::ReservedName(name.to_string()));
        }
        if let Some(owner) = self.aliases.get(name)
            && *owner != name
        {
            return Err(ShellError::AliasConflict {
                alias: name.to_string(),
                existing: owner.to_string(),
                incoming: name.to_string(),
            });
        }

        for &alias in command.aliases() {
            let existing = match self.aliases.get(alias) {
                Some(owner) => Some(*owner),
                None if alias != name && self.commands.contains_key(alias) => Some(alias),
                None => None,
            };
            if let Some(existing) = existing
                && existing != name
            {
                return Err(ShellError::AliasConflict {
                    alias: alias.to_string(),
                    existing: existing.to_string(),
                    incoming: name.to_string(),
                });
            }
        }

        // Drop aliases left by a command previously registered under this name
        self.aliases.retain(|_, owner| *owner != name);
        for &alias in command.aliases() {
            self.aliases.insert(alias, name);
        }
        self.commands.insert(name, command);
        Ok(())
    }

    /// Look up a typed name, rewriting aliases to canonical names first.
    pub fn resolve(&self, name: &str) -> Resolved<'_> {
        if name.is_empty() {
            return Resolved::Empty(&self.empty);
        }
        let canonical = self.aliases.get(name).copied().unwrap_or(name);
        match self.commands.get(canonical) {
            Some(command) => Resolved::Found(command.as_ref()),
            None => Resolved::Unrecognized(&self.unrecognized),
        }
    }

    /// Every resolvable name, canonical and alias, in ascending order.
    pub fn all_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .commands
            .keys()
            .chain(self.aliases.keys())
            .copied()
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Registered commands ordered by canonical name.
    pub fn commands(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.values().map(|command| command.as_ref())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::{CommandResult, Context};
    use crate::core::parser::Invocation;

    struct Named {
        name: &'static str,
        aliases: &'static [&'static str],
    }

    impl Command for Named {
        fn name(&self) -> &'static str {
            self.name
        }

        fn aliases(&self) -> &'static [&'static str] {
            self.aliases
        }

        fn execute(&self, _inv: &Invocation, _ctx: &mut Context<'_>) -> CommandResult {
            CommandResult::ok()
        }
    }

    fn named(name: &'static str, aliases: &'static [&'static str]) -> Box<dyn Command> {
        Box::new(Named { name, aliases })
    }

    #[test]
    fn test_builtins_register_cleanly() {
        let registry = Registry::with_builtins().unwrap();
        assert!(matches!(registry.resolve("chdir"), Resolved::Found(_)));
        assert_eq!(registry.resolve("cd").command().name(), "chdir");
        assert_eq!(registry.resolve("q").command().name(), "exit");
        assert_eq!(registry.resolve("`").command().name(), "shell");
    }

    #[test]
    fn test_duplicate_alias_is_rejected() {
        let mut registry = Registry::new();
        registry.register(named("quit", &["q"])).unwrap();
        let err = registry.register(named("exit", &["x", "q"])).unwrap_err();
        match err {
            ShellError::AliasConflict {
                alias,
                existing,
                incoming,
            } => {
                assert_eq!(alias, "q");
                assert_eq!(existing, "quit");
                assert_eq!(incoming, "exit");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Nothing from the rejected command leaks in
        assert!(matches!(registry.resolve("x"), Resolved::Unrecognized(_)));
    }

    #[test]
    fn test_alias_may_not_shadow_a_command() {
        let mut registry = Registry::new();
        registry.register(named("ls", &[])).unwrap();
        assert!(registry.register(named("dir", &["ls"])).is_err());

        let mut registry = Registry::new();
        registry.register(named("dir", &["ls"])).unwrap();
        assert!(registry.register(named("ls", &[])).is_err());
    }

    #[test]
    fn test_reregistering_replaces() {
        let mut registry = Registry::new();
        registry.register(named("exit", &["x"])).unwrap();
        registry.register(named("exit", &["q"])).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.all_names(), vec!["exit", "q"]);
    }

    #[test]
    fn test_reserved_names() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.register(named("", &[])),
            Err(ShellError::ReservedName(_))
        ));
        assert!(registry.register(named("unrecognized", &[])).is_err());
    }

    #[test]
    fn test_resolve_empty_is_not_unrecognized() {
        let registry = Registry::with_builtins().unwrap();
        assert!(matches!(registry.resolve(""), Resolved::Empty(_)));
        assert!(matches!(registry.resolve("bogus"), Resolved::Unrecognized(_)));
    }

    #[test]
    fn test_all_names_sorted_and_resolvable() {
        let registry = Registry::with_builtins().unwrap();
        let names = registry.all_names();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
        for name in &names {
            assert!(matches!(registry.resolve(name), Resolved::Found(_)), "{name}");
        }
        assert!(names.contains(&"?"));
        assert!(names.contains(&"dir"));
    }
}
