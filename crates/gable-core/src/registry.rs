//! Name-keyed command table
//!
//! Commands are registered explicitly at startup (or later, for dynamic
//! extension) rather than discovered by reflection: a command is just an
//! entry in the table, carrying its handler, declared signature, and doc
//! text. The registry is purely a lookup structure; execution lives in
//! [`crate::dispatch`].
//!
//! Handlers take the host context as their first parameter. The context
//! parameter is implicit from the caller's point of view and never appears
//! in a command's declared signature.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{CommandError, CommandResult};

/// Handler backing one command
///
/// `C` is the host-context type (the running window manager). Positional
/// and keyword arguments arrive as opaque JSON values.
pub type CommandFn<C> =
    Arc<dyn Fn(&mut C, &[Value], &Map<String, Value>) -> CommandResult + Send + Sync>;

/// One declared parameter, with an optional default value
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name
    pub name: String,
    /// Default value, if the parameter is optional
    pub default: Option<Value>,
}

/// Declared signature of a command
///
/// Describes the parameters a command accepts, excluding the implicit
/// host-context parameter. Purely informational; argument checking is left
/// to the handler itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandSignature {
    params: Vec<Param>,
    variadic_args: bool,
    variadic_kwargs: bool,
}

impl CommandSignature {
    /// Signature with no parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required parameter
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: None,
        });
        self
    }

    /// Add an optional parameter with a default value
    pub fn param_with_default(mut self, name: impl Into<String>, default: Value) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: Some(default),
        });
        self
    }

    /// Accept arbitrary extra positional arguments
    pub fn variadic_args(mut self) -> Self {
        self.variadic_args = true;
        self
    }

    /// Accept arbitrary extra keyword arguments
    pub fn variadic_kwargs(mut self) -> Self {
        self.variadic_kwargs = true;
        self
    }

    /// Declared parameters, in call order
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Whether extra positional arguments are accepted
    pub fn accepts_variadic_args(&self) -> bool {
        self.variadic_args
    }

    /// Whether extra keyword arguments are accepted
    pub fn accepts_variadic_kwargs(&self) -> bool {
        self.variadic_kwargs
    }
}

impl fmt::Display for CommandSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        let mut first = true;
        let mut sep = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            if first {
                first = false;
                Ok(())
            } else {
                write!(f, ", ")
            }
        };
        for param in &self.params {
            sep(f)?;
            match &param.default {
                Some(default) => write!(f, "{}={}", param.name, default)?,
                None => write!(f, "{}", param.name)?,
            }
        }
        if self.variadic_args {
            sep(f)?;
            write!(f, "*args")?;
        }
        if self.variadic_kwargs {
            sep(f)?;
            write!(f, "**kwargs")?;
        }
        write!(f, ")")
    }
}

/// Signature and doc text for one command, without its handler
#[derive(Debug, Clone, PartialEq)]
pub struct CommandInfo {
    /// Declared signature
    pub signature: CommandSignature,
    /// Raw doc text as registered
    pub doc: String,
}

/// A registered command: handler plus introspection data
pub struct Command<C> {
    handler: CommandFn<C>,
    info: CommandInfo,
}

impl<C> Command<C> {
    /// Invoke the handler against the host context
    pub fn invoke(&self, ctx: &mut C, args: &[Value], kwargs: &Map<String, Value>) -> CommandResult {
        (self.handler)(ctx, args, kwargs)
    }

    /// Declared signature
    pub fn signature(&self) -> &CommandSignature {
        &self.info.signature
    }

    /// Raw doc text
    pub fn doc(&self) -> &str {
        &self.info.doc
    }
}

impl<C> fmt::Debug for Command<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("signature", &self.info.signature)
            .finish_non_exhaustive()
    }
}

/// Mapping from command name to registered command
///
/// Names are unique; registering an existing name replaces the previous
/// entry. Enumeration always reflects the current table, so commands added
/// or removed after construction are visible immediately.
pub struct CommandRegistry<C> {
    commands: HashMap<String, Command<C>>,
}

impl<C> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CommandRegistry<C> {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a command under the given name
    ///
    /// Replaces any existing command with the same name.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        signature: CommandSignature,
        doc: &str,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&mut C, &[Value], &Map<String, Value>) -> CommandResult + Send + Sync + 'static,
    {
        self.commands.insert(
            name.into(),
            Command {
                handler: Arc::new(handler),
                info: CommandInfo {
                    signature,
                    doc: doc.to_string(),
                },
            },
        );
        self
    }

    /// Remove a command; returns whether it was present
    pub fn unregister(&mut self, name: &str) -> bool {
        self.commands.remove(name).is_some()
    }

    /// Look up a command by exact, case-sensitive name
    pub fn resolve(&self, name: &str) -> Result<&Command<C>, CommandError> {
        self.commands
            .get(name)
            .ok_or_else(|| CommandError::NotFound(name.to_string()))
    }

    /// Currently registered command names, sorted for stable output
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    /// Declared signature of a command
    ///
    /// The implicit host-context parameter is not part of a declared
    /// signature and never appears here.
    pub fn signature(&self, name: &str) -> Result<&CommandSignature, CommandError> {
        Ok(self.resolve(name)?.signature())
    }

    /// Doc text of a command, dedented of common leading whitespace
    pub fn documentation(&self, name: &str) -> Result<String, CommandError> {
        Ok(dedent(self.resolve(name)?.doc()))
    }

    /// Human-readable description: `name(signature)` plus indented doc text
    pub fn describe(&self, name: &str) -> Result<String, CommandError> {
        let command = self.resolve(name)?;
        Ok(render_description(name, &command.info))
    }

    /// Handler-free copy of the table, for use as a client-side mirror
    pub fn index(&self) -> CommandIndex {
        CommandIndex {
            commands: self
                .commands
                .iter()
                .map(|(name, command)| (name.clone(), command.info.clone()))
                .collect(),
        }
    }

    /// Number of registered commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<C> fmt::Debug for CommandRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Handler-free mirror of a registry's name table
///
/// Clients hold one of these to resolve names and render help locally,
/// without a round trip to the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandIndex {
    commands: HashMap<String, CommandInfo>,
}

impl CommandIndex {
    /// Whether a command name is known
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Known command names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    /// Declared signature of a command
    pub fn signature(&self, name: &str) -> Result<&CommandSignature, CommandError> {
        self.commands
            .get(name)
            .map(|info| &info.signature)
            .ok_or_else(|| CommandError::NotFound(name.to_string()))
    }

    /// Dedented doc text of a command
    pub fn documentation(&self, name: &str) -> Result<String, CommandError> {
        self.commands
            .get(name)
            .map(|info| dedent(&info.doc))
            .ok_or_else(|| CommandError::NotFound(name.to_string()))
    }

    /// Human-readable description: `name(signature)` plus indented doc text
    pub fn describe(&self, name: &str) -> Result<String, CommandError> {
        self.commands
            .get(name)
            .map(|info| render_description(name, info))
            .ok_or_else(|| CommandError::NotFound(name.to_string()))
    }
}

fn render_description(name: &str, info: &CommandInfo) -> String {
    let mut text = format!("{name}{}", info.signature);
    for line in dedent(&info.doc).lines() {
        text.push_str("\n\t");
        text.push_str(line);
    }
    text
}

/// Strip the leading whitespace common to all non-blank lines
///
/// The margin is the longest whitespace prefix shared character for
/// character, so a tab on one line and spaces on another have no common
/// margin and both lines stay as they are.
fn dedent(text: &str) -> String {
    let mut margin: Option<&str> = None;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let indent = &line[..line.len() - line.trim_start().len()];
        margin = Some(match margin {
            Some(current) => common_prefix(current, indent),
            None => indent,
        });
    }
    let margin = margin.unwrap_or("");

    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            lines.push("");
        } else {
            lines.push(line.strip_prefix(margin).unwrap_or(line));
        }
    }
    lines.join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .take_while(|((_, ca), cb)| ca == cb)
        .last()
        .map(|((i, ca), _)| i + ca.len_utf8())
        .unwrap_or(0);
    &a[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct TestWm {
        focused: usize,
    }

    fn test_registry() -> CommandRegistry<TestWm> {
        let mut registry = CommandRegistry::new();
        registry
            .register(
                "echo",
                CommandSignature::new().param("x"),
                "Return the argument unchanged.",
                |_wm: &mut TestWm, args, _kwargs| {
                    Ok(args.first().cloned().unwrap_or(Value::Null))
                },
            )
            .register(
                "focus",
                CommandSignature::new()
                    .param("index")
                    .param_with_default("wrap", json!(true)),
                "",
                |wm: &mut TestWm, args, _kwargs| {
                    wm.focused = args.first().and_then(Value::as_u64).unwrap_or(0) as usize;
                    Ok(Value::Null)
                },
            );
        registry
    }

    #[test]
    fn test_resolve_registered_names() {
        let registry = test_registry();
        for name in registry.names() {
            assert!(registry.resolve(&name).is_ok());
        }
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let registry = test_registry();
        assert!(registry.resolve("echo").is_ok());
        assert!(matches!(
            registry.resolve("Echo"),
            Err(CommandError::NotFound(_))
        ));
    }

    #[test]
    fn test_names_idempotent_without_mutation() {
        let registry = test_registry();
        assert_eq!(registry.names(), registry.names());
        assert_eq!(registry.names(), vec!["echo", "focus"]);
    }

    #[test]
    fn test_len_tracks_registration() {
        let mut registry: CommandRegistry<TestWm> = CommandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);

        registry.register(
            "restart",
            CommandSignature::new(),
            "",
            |_wm: &mut TestWm, _args, _kwargs| Ok(Value::Null),
        );
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 1);

        registry.unregister("restart");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registration_is_dynamic() {
        let mut registry = test_registry();
        registry.register(
            "restart",
            CommandSignature::new(),
            "",
            |_wm: &mut TestWm, _args, _kwargs| Ok(Value::Null),
        );
        assert!(registry.names().contains(&"restart".to_string()));

        assert!(registry.unregister("restart"));
        assert!(!registry.names().contains(&"restart".to_string()));
        assert!(registry.resolve("restart").is_err());
        assert!(!registry.unregister("restart"));
    }

    #[test]
    fn test_signature_rendering() {
        let registry = test_registry();
        let sig = registry.signature("focus").unwrap();
        assert_eq!(sig.to_string(), "(index, wrap=true)");
        assert_eq!(sig.params().len(), 2);

        let variadic = CommandSignature::new()
            .param("cmd")
            .variadic_args()
            .variadic_kwargs();
        assert_eq!(variadic.to_string(), "(cmd, *args, **kwargs)");
    }

    #[test]
    fn test_signature_of_unknown_command() {
        let registry = test_registry();
        assert!(matches!(
            registry.signature("missing"),
            Err(CommandError::NotFound(_))
        ));
    }

    #[test]
    fn test_documentation_dedents() {
        let mut registry = test_registry();
        registry.register(
            "spawn",
            CommandSignature::new().param("cmd"),
            "    Run a program.\n\n    Indented detail line.",
            |_wm: &mut TestWm, _args, _kwargs| Ok(Value::Null),
        );
        let doc = registry.documentation("spawn").unwrap();
        assert_eq!(doc, "Run a program.\n\nIndented detail line.");
    }

    #[test]
    fn test_documentation_dedents_multibyte_margin() {
        let mut registry = test_registry();
        registry.register(
            "spawn",
            CommandSignature::new().param("cmd"),
            "\u{a0}\u{a0}Run a program.\n\u{a0}\u{a0}Detail line.",
            |_wm: &mut TestWm, _args, _kwargs| Ok(Value::Null),
        );
        let doc = registry.documentation("spawn").unwrap();
        assert_eq!(doc, "Run a program.\nDetail line.");
    }

    #[test]
    fn test_documentation_keeps_uncommon_leading_whitespace() {
        let mut registry = test_registry();
        // No whitespace prefix is shared across these lines: one starts
        // with no-break spaces, one with a plain space, one with a tab.
        registry.register(
            "spawn",
            CommandSignature::new().param("cmd"),
            "\u{a0}\u{a0}first\n second\n\tthird",
            |_wm: &mut TestWm, _args, _kwargs| Ok(Value::Null),
        );
        let doc = registry.documentation("spawn").unwrap();
        assert_eq!(doc, "\u{a0}\u{a0}first\n second\n\tthird");
    }

    #[test]
    fn test_documentation_empty_when_none() {
        let registry = test_registry();
        assert_eq!(registry.documentation("focus").unwrap(), "");
    }

    #[test]
    fn test_describe_renders_header_and_doc() {
        let registry = test_registry();
        let text = registry.describe("echo").unwrap();
        assert_eq!(text, "echo(x)\n\tReturn the argument unchanged.");
    }

    #[test]
    fn test_index_mirrors_names_and_signatures() {
        let registry = test_registry();
        let index = registry.index();
        assert_eq!(index.names(), registry.names());
        assert!(index.contains("echo"));
        assert!(!index.contains("missing"));
        assert_eq!(
            index.signature("focus").unwrap(),
            registry.signature("focus").unwrap()
        );
        assert!(matches!(
            index.signature("missing"),
            Err(CommandError::NotFound(_))
        ));
    }
}
