//! Behaviour toggles for a conversion.
//!
//! # Design
//! The catalog is closed: [`CurlOption`] names every toggle, and applying one
//! flips a field on [`CurlOptions`]. Options are applied left to right before
//! any token is emitted and are fixed for the rest of the call.

use serde::{Deserialize, Serialize};

/// One toggle from the fixed option catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurlOption {
    /// Emit `-k` for `https` URLs.
    InsecureSkipVerify,
    /// Append `--compressed`.
    Compression,
    /// Gunzip bodies sent with `Content-Encoding: gzip` before inlining them.
    AutoDecompressGzip,
    /// Pipe the body through `echo -e` so newlines survive, and read it with `-d @-`.
    EscapedNewlines,
}

impl CurlOption {
    pub const ALL: [CurlOption; 4] = [
        CurlOption::InsecureSkipVerify,
        CurlOption::Compression,
        CurlOption::AutoDecompressGzip,
        CurlOption::EscapedNewlines,
    ];

    pub fn apply(self, options: &mut CurlOptions) {
        match self {
            CurlOption::InsecureSkipVerify => options.insecure_skip_verify = true,
            CurlOption::Compression => options.enable_compression = true,
            CurlOption::AutoDecompressGzip => options.auto_decompress_gzip = true,
            CurlOption::EscapedNewlines => options.escaped_newlines = true,
        }
    }

    /// Configuration name, e.g. `decompress-gzip`.
    pub fn name(self) -> &'static str {
        match self {
            CurlOption::InsecureSkipVerify => "insecure",
            CurlOption::Compression => "compressed",
            CurlOption::AutoDecompressGzip => "decompress-gzip",
            CurlOption::EscapedNewlines => "escape-newlines",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.name() == name)
    }

    /// Bit used by [`CurlOptions::bits`]; catalog order.
    pub fn bit(self) -> u32 {
        match self {
            CurlOption::InsecureSkipVerify => 1 << 0,
            CurlOption::Compression => 1 << 1,
            CurlOption::AutoDecompressGzip => 1 << 2,
            CurlOption::EscapedNewlines => 1 << 3,
        }
    }
}

/// The resolved configuration of one conversion. All fields default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurlOptions {
    pub insecure_skip_verify: bool,
    pub enable_compression: bool,
    pub auto_decompress_gzip: bool,
    pub escaped_newlines: bool,
}

impl CurlOptions {
    /// Apply `options` in order to a default configuration.
    pub fn from_options(options: &[CurlOption]) -> Self {
        let mut resolved = Self::default();
        for option in options {
            option.apply(&mut resolved);
        }
        resolved
    }

    /// Decode a bitmask; unknown bits are ignored.
    pub fn from_bits(bits: u32) -> Self {
        let selected: Vec<CurlOption> = CurlOption::ALL
            .into_iter()
            .filter(|option| bits & option.bit() != 0)
            .collect();
        Self::from_options(&selected)
    }

    pub fn bits(&self) -> u32 {
        CurlOption::ALL
            .into_iter()
            .filter(|option| self.is_enabled(*option))
            .fold(0, |acc, option| acc | option.bit())
    }

    pub fn is_enabled(&self, option: CurlOption) -> bool {
        match option {
            CurlOption::InsecureSkipVerify => self.insecure_skip_verify,
            CurlOption::Compression => self.enable_compression,
            CurlOption::AutoDecompressGzip => self.auto_decompress_gzip,
            CurlOption::EscapedNewlines => self.escaped_newlines,
        }
    }
}
