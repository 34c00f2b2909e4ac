//! The generated command and the builder that accumulates it.

use std::fmt;

use crate::options::CurlOptions;

/// A ready to copy/paste curl invocation.
///
/// Immutable once returned. `Display` joins the tokens with single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurlCommand {
    tokens: Vec<String>,
    options: CurlOptions,
}

impl CurlCommand {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The options the command was generated with.
    pub fn options(&self) -> CurlOptions {
        self.options
    }

    pub fn insecure_skip_verify(&self) -> bool {
        self.options.insecure_skip_verify
    }

    pub fn enable_compression(&self) -> bool {
        self.options.enable_compression
    }

    pub fn auto_decompress_gzip(&self) -> bool {
        self.options.auto_decompress_gzip
    }

    pub fn escaped_newlines(&self) -> bool {
        self.options.escaped_newlines
    }

    pub fn into_string(self) -> String {
        self.tokens.join(" ")
    }
}

impl fmt::Display for CurlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tokens = self.tokens.iter();
        if let Some(first) = tokens.next() {
            f.write_str(first)?;
        }
        for token in tokens {
            write!(f, " {token}")?;
        }
        Ok(())
    }
}

/// Accumulates the main token sequence plus an optional prefix that ends up in
/// front of it (the `echo -e ... |` pipe).
#[derive(Debug)]
pub(crate) struct CommandBuilder {
    prefix: Vec<String>,
    tokens: Vec<String>,
    options: CurlOptions,
}

impl CommandBuilder {
    pub(crate) fn new(options: CurlOptions) -> Self {
        Self {
            prefix: Vec::new(),
            tokens: Vec::new(),
            options,
        }
    }

    pub(crate) fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    pub(crate) fn push_pair(&mut self, flag: &str, value: impl Into<String>) {
        self.push(flag);
        self.push(value);
    }

    /// Tokens placed before everything pushed so far and everything pushed later.
    pub(crate) fn set_prefix<I, S>(&mut self, prefix: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefix = prefix.into_iter().map(Into::into).collect();
    }

    pub(crate) fn finish(self) -> CurlCommand {
        let mut tokens = self.prefix;
        tokens.extend(self.tokens);
        CurlCommand {
            tokens,
            options: self.options,
        }
    }
}
