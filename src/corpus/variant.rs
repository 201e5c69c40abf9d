//! Corpus variant dispatch

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Supported image corpora.
///
/// Dispatch happens once, at construction; an unknown tag fails there with a
/// configuration error naming the tag, never at first resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusVariant {
    /// One identifier, one file
    #[default]
    Flickr8k,
    /// Caption-scoped identifiers sharing one underlying image
    Flickr30k,
    /// Caption-scoped identifiers sharing one underlying image
    Mscoco,
}

impl CorpusVariant {
    /// Parse a variant tag, failing with the tag named
    pub fn parse(tag: &str) -> Result<Self> {
        match tag {
            "flickr8k" => Ok(Self::Flickr8k),
            "flickr30k" => Ok(Self::Flickr30k),
            "mscoco" => Ok(Self::Mscoco),
            other => Err(Error::UnknownCorpus(other.to_string())),
        }
    }

    /// Whether identifiers are caption-scoped and resolve through group lookup
    #[must_use]
    pub fn caption_grouped(self) -> bool {
        matches!(self, Self::Flickr30k | Self::Mscoco)
    }

    /// Canonical tag string
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Flickr8k => "flickr8k",
            Self::Flickr30k => "flickr30k",
            Self::Mscoco => "mscoco",
        }
    }
}

impl FromStr for CorpusVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CorpusVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
