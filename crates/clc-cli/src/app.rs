//! Command tree built from the registry, and invocation dispatch.
//!
//! Each registered path `a:b:c` becomes nested subcommands `a b c`. Flags a
//! command declares on a node with children are global below that node, so
//! `map --name orders get k` and `map get k --name orders` are equivalent.

use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::sync::Arc;

use clap::{Arg, ArgAction, ArgMatches, Args, FromArgMatches};
use clc_plug::{
    CancelScope, CommandRegistry, Declaration, ExecContext, FlagKind, FlagSpec,
    InvocationGateway, NoopStatus, PATH_SEPARATOR, Properties, PropertiesBuilder, Row,
    StatusDisplay,
};
use clc_secrets::SecretStore;
use tracing::{Instrument, debug};

use crate::cli::GlobalArgs;
use crate::error::CliError;

/// Property key carrying the global `--verbose` switch.
pub const PROP_VERBOSE: &str = "verbose";

const POSITIONAL_ID: &str = "positional-args";

/// A parsed command line, ready to execute.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Registered path, e.g. `map:get`.
    pub path: String,
    /// Flag values, including inherited group flags.
    pub props: Properties,
    /// Positional arguments in order.
    pub args: Vec<String>,
    /// Named positional arguments.
    pub named_args: BTreeMap<String, String>,
    /// Global flags.
    pub globals: GlobalArgs,
}

/// The command-line application.
pub struct App {
    registry: CommandRegistry,
    declarations: BTreeMap<String, Declaration>,
    command: clap::Command,
    gateway: Option<Arc<dyn InvocationGateway>>,
    status: Arc<dyn StatusDisplay>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("registry", &self.registry)
            .field("connected", &self.gateway.is_some())
            .finish_non_exhaustive()
    }
}

impl App {
    /// Build the command tree.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Startup`] if any command's declaration is invalid
    /// or clashes with a flag it inherits.
    pub fn new(registry: CommandRegistry) -> Result<Self, CliError> {
        let declarations: BTreeMap<String, Declaration> = registry
            .declarations()
            .map_err(CliError::Startup)?
            .into_iter()
            .map(|d| (d.path().to_string(), d))
            .collect();
        let command = build_tree(&declarations).map_err(CliError::Startup)?;
        Ok(Self {
            registry,
            declarations,
            command,
            gateway: None,
            status: Arc::new(NoopStatus),
        })
    }

    /// Attach a cluster gateway.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Arc<dyn InvocationGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Set the status display used unless `--quiet` is given.
    #[must_use]
    pub fn with_status_display(mut self, status: Arc<dyn StatusDisplay>) -> Self {
        self.status = status;
        self
    }

    /// The clap command tree.
    #[must_use]
    pub const fn command(&self) -> &clap::Command {
        &self.command
    }

    /// Parse a command line.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Usage`] for invalid input, including requests for
    /// help or version.
    pub fn parse<I, T>(&self, argv: I) -> Result<Invocation, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().try_get_matches_from(argv)?;
        let mut segments = Vec::new();
        let mut leaf = &matches;
        while let Some((name, sub)) = leaf.subcommand() {
            segments.push(name.to_string());
            leaf = sub;
        }
        let separator = PATH_SEPARATOR.to_string();
        let path = segments.join(separator.as_str());
        let globals = GlobalArgs::from_arg_matches(leaf)?;

        let mut props = Properties::builder().bool(PROP_VERBOSE, globals.verbose);
        for depth in 1..=segments.len() {
            let prefix = segments[..depth].join(separator.as_str());
            if let Some(decl) = self.declarations.get(&prefix) {
                for flag in decl.flags() {
                    props = read_flag(props, leaf, flag);
                }
            }
        }

        let mut args = Vec::new();
        let mut named_args = BTreeMap::new();
        if let Some(decl) = self.declarations.get(&path) {
            for spec in decl.args() {
                if let Ok(Some(value)) = leaf.try_get_one::<String>(&spec.name) {
                    named_args.insert(spec.name.clone(), value.clone());
                    args.push(value.clone());
                }
            }
            if decl.positional().is_some() {
                if let Ok(Some(values)) = leaf.try_get_many::<String>(POSITIONAL_ID) {
                    args.extend(values.cloned());
                }
            }
        }

        debug!(%path, args = args.len(), "parsed command line");
        Ok(Invocation {
            path,
            props: props.build(),
            args,
            named_args,
            globals,
        })
    }

    /// Run a parsed invocation and return the rows it produced.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Command`] with the command's own error.
    pub async fn execute(
        &self,
        invocation: &Invocation,
        scope: CancelScope,
    ) -> Result<Vec<Row>, CliError> {
        let command = self
            .registry
            .lookup(&invocation.path)
            .ok_or_else(|| CliError::Config(format!("unknown command '{}'", invocation.path)))?;
        let globals = &invocation.globals;
        let scope = match globals.timeout() {
            Some(timeout) => scope.with_timeout(timeout),
            None => scope,
        };
        let status: Arc<dyn StatusDisplay> = if globals.quiet {
            Arc::new(NoopStatus)
        } else {
            Arc::clone(&self.status)
        };

        let mut builder = ExecContext::builder(&invocation.path)
            .props(invocation.props.clone())
            .args(invocation.args.clone())
            .scope(scope)
            .api_config(globals.api_config())
            .secrets(SecretStore::new(globals.secrets_dir()))
            .status(status);
        for (name, value) in &invocation.named_args {
            builder = builder.named_arg(name, value);
        }
        if let Some(gateway) = &self.gateway {
            builder = builder.gateway(Arc::clone(gateway));
        }
        let ec = builder.build();

        let span = ec.span().clone();
        command.exec(&ec).instrument(span).await?;
        Ok(ec.into_rows())
    }

    /// Parse and execute in one step.
    ///
    /// # Errors
    ///
    /// Returns the parse or command error.
    pub async fn run<I, T>(&self, argv: I, scope: CancelScope) -> Result<Vec<Row>, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let invocation = self.parse(argv)?;
        self.execute(&invocation, scope).await
    }
}

fn read_flag(props: PropertiesBuilder, matches: &ArgMatches, flag: &FlagSpec) -> PropertiesBuilder {
    let id = flag.long.as_str();
    match flag.kind {
        FlagKind::String { .. } => match matches.try_get_one::<String>(id) {
            Ok(Some(value)) => props.string(id, value.clone()),
            _ => props,
        },
        FlagKind::Bool => match matches.try_get_one::<bool>(id) {
            Ok(Some(value)) => props.bool(id, *value),
            _ => props,
        },
        FlagKind::Int { .. } => match matches.try_get_one::<i64>(id) {
            Ok(Some(value)) => props.int(id, *value),
            _ => props,
        },
    }
}

#[derive(Default)]
struct Node<'a> {
    decl: Option<&'a Declaration>,
    children: BTreeMap<&'a str, Node<'a>>,
}

/// Long names, shorthands and ids already taken at some level of the tree.
#[derive(Clone, Default)]
struct Taken {
    longs: HashSet<String>,
    shorts: HashSet<char>,
}

impl Taken {
    fn from_root(root: &clap::Command) -> Self {
        let mut taken = Self::default();
        taken.longs.extend(["help".to_string(), "version".to_string()]);
        taken.shorts.extend(['h', 'V']);
        for arg in root.get_arguments() {
            taken.longs.insert(arg.get_id().to_string());
            if let Some(long) = arg.get_long() {
                taken.longs.insert(long.to_string());
            }
            if let Some(short) = arg.get_short() {
                taken.shorts.insert(short);
            }
        }
        taken
    }

    fn claim(&mut self, path: &str, flag: &FlagSpec) -> clc_plug::Result<()> {
        if !self.longs.insert(flag.long.clone()) {
            return Err(clc_plug::Error::declaration(
                path,
                format!("flag '--{}' clashes with an inherited flag", flag.long),
            ));
        }
        if let Some(short) = flag.short {
            if !self.shorts.insert(short) {
                return Err(clc_plug::Error::declaration(
                    path,
                    format!("shorthand '-{short}' clashes with an inherited flag"),
                ));
            }
        }
        Ok(())
    }
}

fn build_tree(declarations: &BTreeMap<String, Declaration>) -> clc_plug::Result<clap::Command> {
    let mut root = Node::default();
    for (path, decl) in declarations {
        let mut node = &mut root;
        for segment in path.split(PATH_SEPARATOR) {
            node = node.children.entry(segment).or_default();
        }
        node.decl = Some(decl);
    }

    let base = GlobalArgs::augment_args(
        clap::Command::new("clc")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Hazelcast command-line client"),
    );
    let taken = Taken::from_root(&base);
    let mut command = base;
    for (segment, child) in &root.children {
        command = command.subcommand(build_node(segment, child, &taken)?);
    }
    command = command.subcommand_required(true).arg_required_else_help(true);

    let listing = group_listing(declarations, &root)?;
    if !listing.is_empty() {
        command = command.after_help(listing);
    }
    Ok(command)
}

fn build_node(segment: &str, node: &Node<'_>, inherited: &Taken) -> clc_plug::Result<clap::Command> {
    let mut command = clap::Command::new(segment.to_string());
    let mut taken = inherited.clone();
    let has_children = !node.children.is_empty();

    if let Some(decl) = node.decl {
        if !decl.short_help().is_empty() {
            command = command.about(decl.short_help().to_string());
        }
        if !decl.long_help().is_empty() {
            command = command.long_about(decl.long_help().to_string());
        }
        if let Some(usage) = decl.usage() {
            command = command.override_usage(usage.to_string());
        }
        for flag in decl.flags() {
            taken.claim(decl.path(), flag)?;
            command = command.arg(flag_arg(flag, has_children));
        }
        if has_children && (!decl.args().is_empty() || decl.positional().is_some()) {
            return Err(clc_plug::Error::declaration(
                decl.path(),
                "a command with subcommands cannot take positional arguments",
            ));
        }
        for (index, spec) in decl.args().iter().enumerate() {
            command = command.arg(
                Arg::new(spec.name.clone())
                    .value_name(spec.title.clone())
                    .required(true)
                    .index(index + 1),
            );
        }
        if let Some((min, max)) = decl.positional() {
            if max > 0 {
                command = command.arg(
                    Arg::new(POSITIONAL_ID)
                        .value_name("ARGS")
                        .num_args(min..=max)
                        .required(min > 0),
                );
            }
        }
    }

    for (child_segment, child) in &node.children {
        command = command.subcommand(build_node(child_segment, child, &taken)?);
    }
    if has_children {
        command = command.subcommand_required(true).arg_required_else_help(true);
    }
    Ok(command)
}

fn flag_arg(flag: &FlagSpec, global: bool) -> Arg {
    let mut arg = Arg::new(flag.long.clone())
        .long(flag.long.clone())
        .help(flag.help.clone())
        .global(global);
    if let Some(short) = flag.short {
        arg = arg.short(short);
    }
    match &flag.kind {
        FlagKind::String { default } => {
            arg = arg.num_args(1).required(flag.required);
            if !default.is_empty() {
                arg = arg.default_value(default.clone());
            }
        }
        FlagKind::Bool => arg = arg.action(ArgAction::SetTrue),
        FlagKind::Int { default } => {
            arg = arg
                .num_args(1)
                .required(flag.required)
                .value_parser(clap::value_parser!(i64))
                .default_value(default.to_string());
        }
    }
    arg
}

fn group_listing(
    declarations: &BTreeMap<String, Declaration>,
    root: &Node<'_>,
) -> clc_plug::Result<String> {
    let mut titles: Vec<(&str, &str)> = Vec::new();
    for decl in declarations.values() {
        for group in decl.groups() {
            if titles.iter().any(|(id, _)| *id == group.id) {
                return Err(clc_plug::Error::declaration(
                    decl.path(),
                    format!("group '{}' is declared by another command", group.id),
                ));
            }
            titles.push((group.id.as_str(), group.title.as_str()));
        }
    }
    for decl in declarations.values() {
        if let Some(id) = decl.group() {
            if !titles.iter().any(|(known, _)| *known == id) {
                return Err(clc_plug::Error::declaration(
                    decl.path(),
                    format!("unknown command group '{id}'"),
                ));
            }
        }
    }

    let mut listing = String::new();
    for (id, title) in titles {
        let members: Vec<&str> = root
            .children
            .iter()
            .filter(|(_, node)| node.decl.and_then(Declaration::group) == Some(id))
            .map(|(segment, _)| *segment)
            .collect();
        if members.is_empty() {
            continue;
        }
        if listing.is_empty() {
            listing.push_str("Command groups:\n");
        }
        listing.push_str(&format!("  {title}: {}\n", members.join(", ")));
    }
    Ok(listing)
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;

    use clc_plug::{Command, Error};

    use super::*;
    use crate::commands;

    struct Declares(fn(&mut Declaration));

    impl Command for Declares {
        fn init(&self, decl: &mut Declaration) -> clc_plug::Result<()> {
            (self.0)(decl);
            Ok(())
        }

        fn exec<'a>(
            &'a self,
            _ec: &'a ExecContext,
        ) -> Pin<Box<dyn Future<Output = clc_plug::Result<()>> + Send + 'a>> {
            Box::pin(async { Ok(()) })
        }
    }

    fn app() -> App {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry).expect("register");
        App::new(registry).expect("app")
    }

    #[test]
    fn builtin_tree_is_valid() {
        app().command().clone().debug_assert();
    }

    #[test]
    fn group_flags_are_inherited_from_either_side() {
        let app = app();
        for argv in [
            vec!["clc", "map", "--name", "orders", "get", "k1"],
            vec!["clc", "map", "get", "k1", "-n", "orders"],
        ] {
            let inv = app.parse(argv).expect("parse");
            assert_eq!(inv.path, "map:get");
            assert_eq!(inv.props.get_string("name"), "orders");
            assert_eq!(inv.named_args.get("key").map(String::as_str), Some("k1"));
        }
    }

    #[test]
    fn defaults_are_applied() {
        let inv = app().parse(["clc", "map", "get", "k1"]).expect("parse");
        assert_eq!(inv.props.get_string("name"), "default");
        assert_eq!(inv.props.get_string("key-type"), "string");
        assert!(!inv.props.get_bool("show-type"));
        assert!(!inv.props.get_bool(PROP_VERBOSE));
    }

    #[test]
    fn globals_fold_into_props() {
        let inv = app()
            .parse(["clc", "viridian", "list-clusters", "-v", "-f", "json"])
            .expect("parse");
        assert!(inv.props.get_bool(PROP_VERBOSE));
        assert_eq!(inv.globals.format, crate::cli::Format::Json);
    }

    #[test]
    fn anonymous_positionals_are_collected() {
        let inv = app()
            .parse(["clc", "queue", "offer", "a", "b", "c"])
            .expect("parse");
        assert_eq!(inv.args, ["a", "b", "c"]);
    }

    #[test]
    fn missing_subcommand_is_a_usage_error() {
        let err = app().parse(["clc", "map"]).expect_err("needs subcommand");
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn root_help_lists_groups() {
        let help = app().command().clone().render_help().to_string();
        assert!(help.contains("Distributed Data Structures: map, queue"), "{help}");
    }

    #[test]
    fn flag_clashing_with_global_is_rejected() {
        let mut registry = CommandRegistry::new();
        registry
            .register(
                "x",
                Arc::new(Declares(|d| {
                    d.add_bool_flag("quiet", None, "");
                })),
            )
            .expect("register");
        let err = App::new(registry).expect_err("clash");
        assert!(matches!(err, CliError::Startup(Error::Declaration { .. })));
    }

    #[test]
    fn flag_clashing_with_group_is_rejected() {
        let mut registry = CommandRegistry::new();
        registry
            .register(
                "g",
                Arc::new(Declares(|d| {
                    d.add_string_flag("name", Some('n'), "", false, "");
                })),
            )
            .expect("register");
        registry
            .register(
                "g:sub",
                Arc::new(Declares(|d| {
                    d.add_int_flag("number", Some('n'), 1, false, "");
                })),
            )
            .expect("register");
        assert!(matches!(App::new(registry), Err(CliError::Startup(_))));
    }

    #[test]
    fn siblings_may_reuse_names() {
        let mut registry = CommandRegistry::new();
        for path in ["a", "b"] {
            registry
                .register(
                    path,
                    Arc::new(Declares(|d| {
                        d.add_string_flag("name", Some('n'), "", false, "");
                    })),
                )
                .expect("register");
        }
        App::new(registry).expect("siblings are independent");
    }

    #[test]
    fn unknown_group_is_rejected() {
        let mut registry = CommandRegistry::new();
        registry
            .register(
                "x",
                Arc::new(Declares(|d| {
                    d.set_command_group("nope");
                })),
            )
            .expect("register");
        assert!(matches!(App::new(registry), Err(CliError::Startup(_))));
    }
}
