// PLC15: content of the `app/` folder

use super::{EvaluationContext, RuleFamily, StatusBoard};
use crate::types::{RepositoryFiles, RuleCode};

const HAS_CONTENT: RuleCode = RuleCode::new(15, 1);
const GITKEEP: RuleCode = RuleCode::new(15, 2);
const GITKEEP_EMPTY: RuleCode = RuleCode::new(15, 3);

const APP_DIR: &str = "app/";
const APP_GITKEEP: &str = "app/.gitkeep";

/// Whether anything lives below `directory` (which ends with `/`)
pub fn directory_has_entries(files: &RepositoryFiles, directory: &str) -> bool {
    files
        .paths()
        .any(|path| path != directory && path.starts_with(directory))
}

pub struct AppFolderFamily;

impl RuleFamily for AppFolderFamily {
    fn family(&self) -> u8 {
        15
    }

    fn name(&self) -> &str {
        "AppFolder"
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> StatusBoard {
        let files = ctx.input.files;
        let mut board = StatusBoard::new(self.family());
        if !files.is_directory(APP_DIR) {
            return board;
        }

        board.check(HAS_CONTENT, directory_has_entries(files, APP_DIR));

        if let Some(gitkeep) = files.file(APP_GITKEEP) {
            board.pass(GITKEEP);
            board.check(GITKEEP_EMPTY, gitkeep.is_empty());
        }
        board
    }
}
