// PLC8, PLC9, PLC14, PLC17, PLC19: files that must match the skeleton byte for byte

use super::{missing_from_skeleton, EvaluationContext, RuleFamily, StatusBoard};
use crate::types::RuleCode;

pub struct IdenticalFileFamily {
    family: u8,
    name: &'static str,
    target: &'static str,
}

impl IdenticalFileFamily {
    const fn new(family: u8, name: &'static str, target: &'static str) -> Self {
        Self {
            family,
            name,
            target,
        }
    }

    pub const fn mdlrc() -> Self {
        Self::new(8, "MdlrcFile", ".mdlrc")
    }

    pub const fn yamllint() -> Self {
        Self::new(9, "YamllintFile", ".yamllint")
    }

    pub const fn renovate() -> Self {
        Self::new(14, "RenovateFile", "renovate.json")
    }

    pub const fn funding() -> Self {
        Self::new(17, "FundingFile", ".github/FUNDING.yml")
    }

    pub const fn release() -> Self {
        Self::new(19, "ReleaseFile", ".github/workflows/release.yml")
    }

    fn code(&self) -> RuleCode {
        RuleCode::new(self.family, 1)
    }
}

impl RuleFamily for IdenticalFileFamily {
    fn family(&self) -> u8 {
        self.family
    }

    fn name(&self) -> &str {
        self.name
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> StatusBoard {
        let mut board = StatusBoard::new(self.family);

        match (ctx.input.files.file(self.target), ctx.input.skeleton.file(self.target)) {
            (None, _) => {}
            (Some(_), None) => board.error(self.code(), missing_from_skeleton(self.target)),
            (Some(ours), Some(theirs)) => board.check(self.code(), ours.as_bytes() == theirs.as_bytes()),
        }
        board
    }
}
