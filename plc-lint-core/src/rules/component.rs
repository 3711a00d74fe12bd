// PLC1: the component folder

use super::{EvaluationContext, RuleFamily, StatusBoard};
use crate::types::RuleCode;
use lazy_static::lazy_static;
use regex::Regex;

const OWN_FOLDER: RuleCode = RuleCode::new(1, 1);
const FOLDER_NAMED: RuleCode = RuleCode::new(1, 2);
const GIT_REPOSITORY: RuleCode = RuleCode::new(1, 3);

lazy_static! {
    static ref DEFAULT_COMMAND: Regex =
        Regex::new(r#"^\s*ENV DEFAULTCMD\s*=?\s*["']?(?P<command>.+?)["']?$"#)
            .expect("valid DEFAULTCMD regex");
}

/// Main command declared by a `Dockerfile`; the last declaration wins
pub fn default_command(dockerfile: &str) -> Option<&str> {
    dockerfile
        .lines()
        .filter_map(|line| DEFAULT_COMMAND.captures(line.trim_end()))
        .filter_map(|caps| caps.name("command"))
        .map(|m| m.as_str())
        .last()
}

pub struct ComponentFamily;

impl RuleFamily for ComponentFamily {
    fn family(&self) -> u8 {
        1
    }

    fn name(&self) -> &str {
        "Component"
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> StatusBoard {
        let input = &ctx.input;
        let mut board = StatusBoard::new(self.family());

        if input.project_name.is_some() && !input.files.is_empty() {
            board.pass(OWN_FOLDER);
        }

        if let Some(command) = input.files.file("Dockerfile").and_then(default_command) {
            board.check(FOLDER_NAMED, Some(command) == input.project_name);
        }

        board.check(GIT_REPOSITORY, input.history.is_some());
        board
    }
}
