//! The canonical rule catalog.
//!
//! Every evaluation reports exactly one result per entry, in the order of
//! this table (numeric by code).

use crate::types::RuleCode;

/// Bumped whenever a code is added, removed or reworded
pub const CATALOG_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDefinition {
    pub code: RuleCode,
    pub message: &'static str,
}

const fn rule(family: u8, number: u16, message: &'static str) -> RuleDefinition {
    RuleDefinition {
        code: RuleCode::new(family, number),
        message,
    }
}

pub static CATALOG: &[RuleDefinition] = &[
    rule(1, 1, "The Pipeline Component MUST live in its own folder"),
    rule(1, 2, "The Pipeline Component folder MUST be named after the main component it exposes"),
    rule(1, 3, "The Pipeline Component folder MUST be a git repository"),
    rule(2, 1, "The repository MUST be hosted under https://gitlab.com/pipeline-components/"),
    rule(2, 2, "The repository MUST be public"),
    rule(2, 3, "The repository MUST have a default branch"),
    rule(2, 4, "The default branch MUST be named `main`"),
    rule(2, 5, "The `main` branch MUST be protected"),
    rule(4, 1, "The repository MUST contain a `app/` directory"),
    rule(4, 2, "The repository MUST contain a `.github/` directory"),
    rule(5, 1, "The repository MUST contain a `.gitignore` file"),
    rule(5, 2, "The repository MUST contain a `.gitlab-ci.yml` file"),
    rule(5, 3, "The repository MUST contain a `.mdlrc` file"),
    rule(5, 4, "The repository MUST contain a `.yamllint` file"),
    rule(5, 5, "The repository MUST contain a `action.yml` file"),
    rule(5, 6, "The repository MUST contain a `Dockerfile` file"),
    rule(5, 7, "The repository MUST contain a `LICENSE` file"),
    rule(5, 8, "The repository MUST contain a `README.md` file"),
    rule(5, 9, "The repository MUST contain a `renovate.json` file"),
    rule(8, 1, "The `.mdlrc` file MUST be identical to `.mdlrc` file in the skeleton repository"),
    rule(9, 1, "The `.yamllint` file MUST be identical to `.yamllint` file in the skeleton repository"),
    rule(12, 1, "The `LICENSE` file MUST be an MIT License"),
    rule(12, 2, "The `LICENSE` file MUST contain an attribution line"),
    rule(12, 3, "The attribution line MUST contain the year the component was created"),
    rule(12, 4, "The copyright year MAY contain a range of years"),
    rule(12, 5, "The copyright range of years, when present, MUST be the same as the latest active year"),
    rule(12, 6, "The attribution line MUST contain the copyright holder"),
    rule(12, 7, "The copyright holder MUST be `pipeline-components`, `Pipeline Components` or `Robbert Müller`"),
    rule(13, 1, "🤖 The `README.md` file MUST pass the linting rules defined in `.mdlrc`"),
    rule(13, 2, "The `README.md` file MUST contain `# Pipeline Components: <component-name>` heading as the first line"),
    rule(13, 3, "The lines directly after the heading MUST contain the same badges/shields as the `README.md` file in the skeleton repository"),
    rule(13, 4, "The `README.md` file MUST contain the same main sections, in the same order, as the `README.md` file in the skeleton repository"),
    rule(13, 5, "The 'Versioning' section in the `README.md` file MUST be identical to their counterparts in the `README.md` file in the skeleton repository"),
    rule(13, 6, "The 'Support' section in the `README.md` file MUST be identical to their counterparts in the `README.md` file in the skeleton repository"),
    rule(13, 7, "The 'Contributing' section in the `README.md` file MUST be identical to their counterparts in the `README.md` file in the skeleton repository"),
    rule(13, 8, "⁉ The 'Examples' section in the `README.md` file MUST be auto-generated from a separate example file in the repository"),
    rule(13, 9, "The 'Authors & contributors' section in the `README.md` file MUST state the author who initially set up the repository"),
    rule(13, 10, "The 'Authors & contributors' section in the `README.md` file MAY contain a link for the initial author"),
    rule(13, 11, "The link for the initial author in the 'Authors & contributors' section in the `README.md` file, if present, MUST resolve"),
    rule(13, 12, "The 'Authors & contributors' section in the `README.md` file MUST link to the contributor's page"),
    rule(13, 13, "The contributor's page link in the 'Authors & contributors' section in the `README.md` file MUST resolve"),
    rule(13, 14, "The 'License' section in the `README.md` file MUST contain the creator attribution `Created by [Robbert Müller]`"),
    rule(13, 15, "The attribution in the 'License' section in the `README.md` file MUST resolve to https://gitlab.com/mjrider"),
    rule(13, 16, "The 'License' section in the `README.md` file MUST state the license type as MIT"),
    rule(13, 17, "The 'License' section in the `README.md` file MUST link to the license file in the repository"),
    rule(13, 18, "The license link in the 'License' section in the `README.md` file MUST resolve"),
    rule(14, 1, "The `renovate.json` file MUST be identical to `renovate.json` file in the skeleton repository"),
    rule(15, 1, "The `app/` folder MUST have content"),
    rule(15, 2, "The `app/` folder content MAY be a `.gitkeep` file"),
    rule(15, 3, "The `app/.gitkeep` file, when present, MUST be empty"),
    rule(16, 1, "The repository MUST contain a `.github/FUNDING.yml` file"),
    rule(16, 2, "The repository MUST contain a `.github/workflows/` directory"),
    rule(17, 1, "The `.github/FUNDING.yml` file MUST be identical to `.github/FUNDING.yml` file in the skeleton repository"),
    rule(18, 1, "The `workflows/` folder MUST contain a `release.yml` file"),
    rule(19, 1, "The `.github/workflows/release.yml` file MUST be identical to `.github/workflows/release.yml` file in the skeleton repository"),
];

pub fn definition(code: RuleCode) -> Option<&'static RuleDefinition> {
    CATALOG.iter().find(|def| def.code == code)
}

pub fn message(code: RuleCode) -> Option<&'static str> {
    definition(code).map(|def| def.message)
}

/// Codes of one family, in catalog order
pub fn family_codes(family: u8) -> impl Iterator<Item = RuleCode> {
    CATALOG
        .iter()
        .filter(move |def| def.code.family() == family)
        .map(|def| def.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_is_sorted_and_unique() {
        let codes: Vec<RuleCode> = CATALOG.iter().map(|d| d.code).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);

        let unique: HashSet<RuleCode> = codes.iter().copied().collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn test_family_codes() {
        let readme: Vec<String> = family_codes(13).map(|c| c.to_string()).collect();
        assert_eq!(readme.len(), 18);
        assert_eq!(readme.first().map(String::as_str), Some("PLC13001"));
        assert_eq!(readme.last().map(String::as_str), Some("PLC13018"));
        assert_eq!(family_codes(3).count(), 0);
    }

    #[test]
    fn test_message_lookup() {
        assert_eq!(message(RuleCode::new(2, 2)), Some("The repository MUST be public"));
        assert_eq!(message(RuleCode::new(2, 99)), None);
    }
}
