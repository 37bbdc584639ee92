//! Declaration context filled in by [`Command::init`](crate::Command::init).
//!
//! A declaration is pure data: it names the flags, arguments, help text and
//! grouping of one command. The CLI layer turns it into a parser; nothing
//! here touches the terminal or the network.

use std::collections::HashSet;

use crate::error::{Error, Result};

/// The value a flag carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagKind {
    /// A string flag with its default.
    String {
        /// Value used when the flag is absent.
        default: String,
    },
    /// A boolean switch, `false` unless given.
    Bool,
    /// An integer flag with its default.
    Int {
        /// Value used when the flag is absent.
        default: i64,
    },
}

/// One declared flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    /// Long name, used as `--long` and as the property key.
    pub long: String,
    /// Optional one-letter alias.
    pub short: Option<char>,
    /// Value kind and default.
    pub kind: FlagKind,
    /// Whether the flag must be supplied.
    pub required: bool,
    /// Help line.
    pub help: String,
}

/// A named, required positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    /// Key used to look the value up.
    pub name: String,
    /// Placeholder shown in usage, e.g. `KEY`.
    pub title: String,
}

/// A help-listing group declared by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandGroup {
    /// Identifier referenced by [`Declaration::set_command_group`].
    pub id: String,
    /// Heading shown in help.
    pub title: String,
}

/// Everything a command declares about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    path: String,
    flags: Vec<FlagSpec>,
    args: Vec<ArgSpec>,
    positional: Option<(usize, usize)>,
    usage: Option<String>,
    long_help: String,
    short_help: String,
    groups: Vec<CommandGroup>,
    group: Option<String>,
}

impl Declaration {
    /// An empty declaration for the command at `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            flags: Vec::new(),
            args: Vec::new(),
            positional: None,
            usage: None,
            long_help: String::new(),
            short_help: String::new(),
            groups: Vec::new(),
            group: None,
        }
    }

    /// Declare a string flag.
    pub fn add_string_flag(
        &mut self,
        long: &str,
        short: Option<char>,
        default: &str,
        required: bool,
        help: &str,
    ) -> &mut Self {
        self.push_flag(
            long,
            short,
            FlagKind::String {
                default: default.to_string(),
            },
            required,
            help,
        )
    }

    /// Declare a boolean switch.
    pub fn add_bool_flag(&mut self, long: &str, short: Option<char>, help: &str) -> &mut Self {
        self.push_flag(long, short, FlagKind::Bool, false, help)
    }

    /// Declare an integer flag.
    pub fn add_int_flag(
        &mut self,
        long: &str,
        short: Option<char>,
        default: i64,
        required: bool,
        help: &str,
    ) -> &mut Self {
        self.push_flag(long, short, FlagKind::Int { default }, required, help)
    }

    /// Accept between `min` and `max` anonymous positional arguments.
    pub fn set_positional_arg_count(&mut self, min: usize, max: usize) -> &mut Self {
        self.positional = Some((min, max));
        self
    }

    /// Declare a required positional argument retrievable by `name`.
    pub fn add_string_arg(&mut self, name: &str, title: &str) -> &mut Self {
        self.args.push(ArgSpec {
            name: name.to_string(),
            title: title.to_string(),
        });
        self
    }

    /// Override the usage line.
    pub fn set_command_usage(&mut self, usage: &str) -> &mut Self {
        self.usage = Some(usage.to_string());
        self
    }

    /// Set the long and short help texts.
    pub fn set_command_help(&mut self, long: &str, short: &str) -> &mut Self {
        self.long_help = long.to_string();
        self.short_help = short.to_string();
        self
    }

    /// Declare a help-listing group other commands can join.
    pub fn add_command_group(&mut self, id: &str, title: &str) -> &mut Self {
        self.groups.push(CommandGroup {
            id: id.to_string(),
            title: title.to_string(),
        });
        self
    }

    /// Join a declared help-listing group.
    pub fn set_command_group(&mut self, id: &str) -> &mut Self {
        self.group = Some(id.to_string());
        self
    }

    fn push_flag(
        &mut self,
        long: &str,
        short: Option<char>,
        kind: FlagKind,
        required: bool,
        help: &str,
    ) -> &mut Self {
        self.flags.push(FlagSpec {
            long: long.to_string(),
            short,
            kind,
            required,
            help: help.to_string(),
        });
        self
    }

    /// Command path this declaration belongs to.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Declared flags, in declaration order.
    #[must_use]
    pub fn flags(&self) -> &[FlagSpec] {
        &self.flags
    }

    /// Declared named arguments, in order.
    #[must_use]
    pub fn args(&self) -> &[ArgSpec] {
        &self.args
    }

    /// Anonymous positional bounds, if set.
    #[must_use]
    pub const fn positional(&self) -> Option<(usize, usize)> {
        self.positional
    }

    /// Usage override.
    #[must_use]
    pub fn usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    /// Long help text.
    #[must_use]
    pub fn long_help(&self) -> &str {
        &self.long_help
    }

    /// Short help text.
    #[must_use]
    pub fn short_help(&self) -> &str {
        &self.short_help
    }

    /// Groups this command declares.
    #[must_use]
    pub fn groups(&self) -> &[CommandGroup] {
        &self.groups
    }

    /// Group this command joins.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Check the declaration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Declaration`] naming the first problem found.
    pub fn validate(&self) -> Result<()> {
        let mut longs = HashSet::new();
        let mut shorts = HashSet::new();
        for flag in &self.flags {
            if !is_valid_flag_name(&flag.long) {
                return Err(self.invalid(format!("invalid flag name '{}'", flag.long)));
            }
            if !longs.insert(flag.long.as_str()) {
                return Err(self.invalid(format!("flag '--{}' declared twice", flag.long)));
            }
            if let Some(short) = flag.short {
                if !short.is_ascii_alphanumeric() {
                    return Err(self.invalid(format!("invalid shorthand '{short}'")));
                }
                if !shorts.insert(short) {
                    return Err(self.invalid(format!("shorthand '-{short}' declared twice")));
                }
            }
            if flag.required && flag.kind == FlagKind::Bool {
                return Err(self.invalid(format!("boolean flag '--{}' cannot be required", flag.long)));
            }
        }

        let mut arg_names = HashSet::new();
        for arg in &self.args {
            if arg.name.is_empty() || arg.title.is_empty() {
                return Err(self.invalid("argument name and title must be non-empty"));
            }
            if !arg_names.insert(arg.name.as_str()) {
                return Err(self.invalid(format!("argument '{}' declared twice", arg.name)));
            }
            if longs.contains(arg.name.as_str()) {
                return Err(self.invalid(format!("argument '{}' shadows a flag", arg.name)));
            }
        }

        if let Some((min, max)) = self.positional {
            if min > max {
                return Err(self.invalid(format!("positional bounds {min}..{max} are inverted")));
            }
            if !self.args.is_empty() {
                return Err(self.invalid("named arguments and a positional count are exclusive"));
            }
        }

        let mut group_ids = HashSet::new();
        for group in &self.groups {
            if !group_ids.insert(group.id.as_str()) {
                return Err(self.invalid(format!("group '{}' declared twice", group.id)));
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::declaration(&self.path, reason)
    }
}

fn is_valid_flag_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
