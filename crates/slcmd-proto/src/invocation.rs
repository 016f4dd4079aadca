//! Splitting tokens into an invocation name and its arguments.

use crate::args::ArgumentList;

/// How the prefix and the invocation name are laid out in a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InvocationStyle {
    /// `!ban user`: the prefix is glued to the invocation name.
    #[default]
    Attached,
    /// `! ban user`: the prefix is a token of its own.
    SpaceAfterPrefix,
}

impl InvocationStyle {
    /// Pick the style matching a `space_after_prefix` setting.
    pub const fn from_space_after_prefix(space_after_prefix: bool) -> Self {
        if space_after_prefix {
            Self::SpaceAfterPrefix
        } else {
            Self::Attached
        }
    }
}

/// An invocation name with the arguments that followed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// The invocation name, possibly empty.
    pub name: String,
    /// Remaining tokens, in order.
    pub args: ArgumentList,
}

impl Invocation {
    /// Extract the invocation from tokenized message text.
    ///
    /// `used_prefix` is the prefix the message was matched against. In
    /// [`InvocationStyle::Attached`] mode the first token loses as many leading
    /// characters as the prefix has. Missing tokens never fail: they produce
    /// an empty name and/or an empty argument list.
    pub fn extract(tokens: Vec<String>, used_prefix: &str, style: InvocationStyle) -> Self {
        let mut tokens = tokens.into_iter();
        let name = match style {
            InvocationStyle::Attached => tokens
                .next()
                .map(|first| strip_chars(&first, used_prefix.chars().count()))
                .unwrap_or_default(),
            InvocationStyle::SpaceAfterPrefix => {
                // The first token is the prefix itself.
                tokens.next();
                tokens.next().unwrap_or_default()
            }
        };

        Self {
            name,
            args: tokens.collect(),
        }
    }
}

fn strip_chars(token: &str, count: usize) -> String {
    match token.char_indices().nth(count) {
        Some((at, _)) => token[at..].to_string(),
        None => String::new(),
    }
}
