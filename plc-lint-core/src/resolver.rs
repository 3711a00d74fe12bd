// Link resolution capability
//
// Rule families never touch the network. They record link checks; the engine
// resolves the distinct URLs in parallel through an injected resolver.

use crate::types::RuleCode;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Answers whether a URL resolves
pub trait LinkResolver: Send + Sync {
    fn resolves(&self, url: &str) -> bool;

    fn name(&self) -> &str;
}

/// A pending "this URL must resolve" check for one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCheck {
    pub code: RuleCode,
    pub url: String,
}

/// Resolve each distinct URL once, in parallel
pub fn resolve_all<'a>(
    resolver: &dyn LinkResolver,
    urls: impl IntoIterator<Item = &'a str>,
) -> HashMap<String, bool> {
    let unique: BTreeSet<&str> = urls.into_iter().collect();
    debug!("resolving {} distinct url(s) with {}", unique.len(), resolver.name());

    unique
        .into_par_iter()
        .map(|url| (url.to_string(), resolver.resolves(url)))
        .collect()
}

/// HTTP GET resolver: 200..=399 resolves, anything else does not
#[cfg(feature = "http")]
pub struct HttpLinkResolver {
    agent: ureq::Agent,
}

#[cfg(feature = "http")]
impl HttpLinkResolver {
    pub fn new(timeout: Option<std::time::Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            agent: builder.build(),
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpLinkResolver {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(feature = "http")]
impl LinkResolver for HttpLinkResolver {
    fn resolves(&self, url: &str) -> bool {
        match self.agent.get(url).call() {
            Ok(response) => (200..=399).contains(&response.status()),
            Err(ureq::Error::Status(code, _)) => {
                debug!("{} answered {}", url, code);
                false
            }
            Err(err) => {
                tracing::warn!("⚠️  could not reach {}: {}", url, err);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "HttpLinkResolver"
    }
}

/// Resolves exactly the URLs it was given; used offline and in tests
#[derive(Debug, Clone, Default)]
pub struct StaticLinkResolver {
    resolving: HashSet<String>,
}

impl StaticLinkResolver {
    pub fn new<I, S>(resolving: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resolving: resolving.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolves nothing
    pub fn offline() -> Self {
        Self::default()
    }
}

impl LinkResolver for StaticLinkResolver {
    fn resolves(&self, url: &str) -> bool {
        self.resolving.contains(url)
    }

    fn name(&self) -> &str {
        "StaticLinkResolver"
    }
}
