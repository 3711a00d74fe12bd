// PLC2: hosting of the repository

use super::{EvaluationContext, RuleFamily, StatusBoard};
use crate::remote::project_path;
use crate::types::{RuleCode, Status};
use tracing::debug;

const HOSTED: RuleCode = RuleCode::new(2, 1);
const PUBLIC: RuleCode = RuleCode::new(2, 2);
const DEFAULT_BRANCH: RuleCode = RuleCode::new(2, 3);
const MAIN_BRANCH: RuleCode = RuleCode::new(2, 4);
const MAIN_PROTECTED: RuleCode = RuleCode::new(2, 5);

pub struct RepositoryFamily;

impl RuleFamily for RepositoryFamily {
    fn family(&self) -> u8 {
        2
    }

    fn name(&self) -> &str {
        "Repository"
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> StatusBoard {
        let organization = &ctx.config.organization.url;
        let mut board = StatusBoard::new(self.family());
        board.set_message(
            HOSTED,
            format!("The repository MUST be hosted under {}", organization),
        );

        let remotes: Vec<&String> = ctx
            .input
            .details
            .map(|details| details.remotes.values().flatten().collect())
            .unwrap_or_default();
        if remotes.is_empty() {
            return board;
        }

        // any remote under the organization satisfies hosting
        let projects: Vec<String> = remotes
            .iter()
            .filter_map(|remote| project_path(remote, organization))
            .collect();
        board.check(HOSTED, !projects.is_empty());

        for project in projects {
            if board.status(PUBLIC) == Some(Status::Pass) {
                break;
            }
            board.fail(PUBLIC);

            let Some(branches) = ctx.branches.branches(&project) else {
                debug!("project {} is not publicly readable", project);
                continue;
            };

            board.pass(PUBLIC);
            board.fail_all(&[DEFAULT_BRANCH, MAIN_BRANCH, MAIN_PROTECTED]);

            for branch in branches.iter().filter(|b| b.default) {
                board.pass(DEFAULT_BRANCH);
                if branch.name == "main" {
                    board.pass(MAIN_BRANCH);
                }
                if branch.protected {
                    board.pass(MAIN_PROTECTED);
                }
            }
        }

        board
    }
}
