// PLC4, PLC5, PLC16, PLC18: required files and directories

use super::{EvaluationContext, RuleFamily, StatusBoard};
use crate::types::{RepositoryFiles, RuleCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    fn present(self, files: &RepositoryFiles, path: &str) -> bool {
        match self {
            EntryKind::File => files.file(path).is_some(),
            EntryKind::Directory => files.is_directory(path),
        }
    }
}

/// Pass/Fail per required entry; never Skip
pub struct PresenceFamily {
    family: u8,
    name: &'static str,
    required: Vec<(RuleCode, &'static str, EntryKind)>,
}

impl PresenceFamily {
    pub fn folders() -> Self {
        Self {
            family: 4,
            name: "Folders",
            required: vec![
                (RuleCode::new(4, 1), "app/", EntryKind::Directory),
                (RuleCode::new(4, 2), ".github/", EntryKind::Directory),
            ],
        }
    }

    pub fn files() -> Self {
        let files = [
            ".gitignore",
            ".gitlab-ci.yml",
            ".mdlrc",
            ".yamllint",
            "action.yml",
            "Dockerfile",
            "LICENSE",
            "README.md",
            "renovate.json",
        ];
        Self {
            family: 5,
            name: "Files",
            required: files
                .iter()
                .zip(1u16..)
                .map(|(path, number)| (RuleCode::new(5, number), *path, EntryKind::File))
                .collect(),
        }
    }

    pub fn github_folder() -> Self {
        Self {
            family: 16,
            name: "GithubFolder",
            required: vec![
                (RuleCode::new(16, 1), ".github/FUNDING.yml", EntryKind::File),
                (RuleCode::new(16, 2), ".github/workflows/", EntryKind::Directory),
            ],
        }
    }

    pub fn workflows_folder() -> Self {
        Self {
            family: 18,
            name: "WorkflowsFolder",
            required: vec![(
                RuleCode::new(18, 1),
                ".github/workflows/release.yml",
                EntryKind::File,
            )],
        }
    }
}

impl RuleFamily for PresenceFamily {
    fn family(&self) -> u8 {
        self.family
    }

    fn name(&self) -> &str {
        self.name
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> StatusBoard {
        let mut board = StatusBoard::new(self.family);
        for (code, path, kind) in &self.required {
            board.check(*code, kind.present(ctx.input.files, path));
        }
        board
    }
}
