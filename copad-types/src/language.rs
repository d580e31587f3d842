//! Supported languages and their code templates.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A language a session document can be written in.
///
/// The wire representation is the lowercase tag (`"javascript"`,
/// `"python"`, `"go"`, `"java"`). Deserialization is lenient: an
/// unrecognized tag from a remote event decodes as [`Language::Javascript`]
/// so a misbehaving peer can never leave the session in an invalid state.
/// Use [`Language::parse`] where unknown tags must be rejected instead
/// (the execution dispatcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// JavaScript, executed in-process in a sandboxed interpreter.
    Javascript,
    /// Python, executed by a lazily-loaded WASI interpreter module.
    Python,
    /// Go, executed by the remote execution service.
    Go,
    /// Java, executed by the remote execution service.
    Java,
}

impl Language {
    /// Strictly parse a language tag. Returns `None` for unknown tags.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "javascript" => Some(Self::Javascript),
            "python" => Some(Self::Python),
            "go" => Some(Self::Go),
            "java" => Some(Self::Java),
            _ => None,
        }
    }

    /// The lowercase wire tag for this language.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Javascript => "javascript",
            Self::Python => "python",
            Self::Go => "go",
            Self::Java => "java",
        }
    }

    /// The default skeleton document for this language.
    ///
    /// The template doubles as a sentinel: on a local language switch, a
    /// document that still equals the previous language's template (modulo
    /// surrounding whitespace) is considered untouched and gets rewritten
    /// to the new language's template.
    pub fn template(&self) -> &'static str {
        match self {
            Self::Javascript => "// Write your code here\n",
            Self::Python => "# Write your code here\n",
            Self::Go => {
                "package main\n\nimport \"fmt\"\n\nfunc main() {\n\t// Write your code here\n}\n"
            }
            Self::Java => {
                "public class Main {\n    public static void main(String[] args) {\n        // Write your code here\n    }\n}\n"
            }
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::Javascript
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::parse(&tag).unwrap_or_default())
    }
}
