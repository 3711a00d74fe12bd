// Per-family status board
//
// Seeded with every catalog code of the family at Skip. Families move codes
// through Fail/Pass/Error while reading text; link checks are recorded as
// link checks and settled by the engine once URLs have been resolved.

use super::catalog;
use crate::resolver::LinkCheck;
use crate::types::{RuleCode, RuleResult, Status};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

#[derive(Debug, Clone)]
struct Entry {
    status: Status,
    message: String,
}

#[derive(Debug, Clone)]
pub struct StatusBoard {
    family: u8,
    entries: BTreeMap<RuleCode, Entry>,
    link_checks: Vec<LinkCheck>,
}

impl StatusBoard {
    pub fn new(family: u8) -> Self {
        let entries = catalog::CATALOG
            .iter()
            .filter(|def| def.code.family() == family)
            .map(|def| {
                (
                    def.code,
                    Entry {
                        status: Status::Skip,
                        message: def.message.to_string(),
                    },
                )
            })
            .collect();

        Self {
            family,
            entries,
            link_checks: Vec::new(),
        }
    }

    pub fn family(&self) -> u8 {
        self.family
    }

    fn entry_mut(&mut self, code: RuleCode) -> Option<&mut Entry> {
        let entry = self.entries.get_mut(&code);
        if entry.is_none() {
            warn!("⚠️  {} is not a code of family PLC{}", code, self.family);
        }
        entry
    }

    pub fn set(&mut self, code: RuleCode, status: Status) {
        if let Some(entry) = self.entry_mut(code) {
            entry.status = status;
        }
    }

    pub fn pass(&mut self, code: RuleCode) {
        self.set(code, Status::Pass);
    }

    pub fn fail(&mut self, code: RuleCode) {
        self.set(code, Status::Fail);
    }

    /// Pass when `condition` holds, Fail otherwise
    pub fn check(&mut self, code: RuleCode, condition: bool) {
        self.set(code, if condition { Status::Pass } else { Status::Fail });
    }

    pub fn fail_all(&mut self, codes: &[RuleCode]) {
        for code in codes {
            self.fail(*code);
        }
    }

    /// Error with a replacement message
    pub fn error(&mut self, code: RuleCode, message: impl Into<String>) {
        if let Some(entry) = self.entry_mut(code) {
            entry.status = Status::Error;
            entry.message = message.into();
        }
    }

    pub fn set_message(&mut self, code: RuleCode, message: impl Into<String>) {
        if let Some(entry) = self.entry_mut(code) {
            entry.message = message.into();
        }
    }

    /// Mark `code` as Fail until `url` is known to resolve
    pub fn pass_if_resolves(&mut self, code: RuleCode, url: impl Into<String>) {
        self.fail(code);
        self.link_checks.push(LinkCheck {
            code,
            url: url.into(),
        });
    }

    pub fn status(&self, code: RuleCode) -> Option<Status> {
        self.entries.get(&code).map(|entry| entry.status)
    }

    pub fn link_checks(&self) -> &[LinkCheck] {
        &self.link_checks
    }

    /// Settle link checks and emit one result per code, in code order
    pub fn finish(mut self, resolutions: &HashMap<String, bool>) -> Vec<RuleResult> {
        for check in std::mem::take(&mut self.link_checks) {
            if resolutions.get(&check.url).copied().unwrap_or(false) {
                self.pass(check.code);
            }
        }

        self.entries
            .into_iter()
            .map(|(code, entry)| RuleResult::new(code, entry.status, entry.message))
            .collect()
    }
}
