//! Analysis results.

use std::collections::BTreeSet;
use std::path::PathBuf;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A file that could not be turned into a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    /// Path of the file.
    pub path: PathBuf,
    /// Human-readable reason.
    pub message: String,
}

impl ExtractionFailure {
    /// Create a new failure record.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// One member of a duplicate group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    /// Path of the component.
    pub path: PathBuf,
    /// Project the component belongs to.
    pub project_id: CompactString,
    /// Enclosed volume.
    pub volume: f64,
    /// Similarity to the group's seed (1.0 for the seed itself).
    pub score_to_seed: f64,
}

/// Components judged similar to a common seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Members, seed first.
    pub members: Vec<GroupMember>,

    /// Distinct projects represented, sorted.
    pub projects: Vec<CompactString>,

    /// Whether members come from more than one project.
    pub cross_project: bool,
}

impl DuplicateGroup {
    /// Build a group from its members, seed first.
    pub fn new(members: Vec<GroupMember>) -> Self {
        let projects: Vec<CompactString> = members
            .iter()
            .map(|m| m.project_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let cross_project = projects.len() > 1;
        Self {
            members,
            projects,
            cross_project,
        }
    }

    /// The seed member.
    pub fn seed(&self) -> Option<&GroupMember> {
        self.members.first()
    }

    /// Number of members.
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// How many members are redundant if one is kept.
    pub fn redundant_count(&self) -> usize {
        self.members.len().saturating_sub(1)
    }
}

/// Results from duplicate analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Groups in grouping order.
    pub groups: Vec<DuplicateGroup>,

    /// Threshold the groups were built with.
    pub threshold: f64,

    /// Number of components compared.
    pub components_analyzed: usize,

    /// Number of components that belong to a group (before any cap).
    pub files_with_duplicates: usize,

    /// Number of groups found (before any cap).
    pub group_count: usize,

    /// Files that failed extraction.
    pub failures: Vec<ExtractionFailure>,
}

impl DuplicateReport {
    /// Check if any duplicates were found.
    pub fn has_duplicates(&self) -> bool {
        self.group_count > 0
    }

    /// Number of groups spanning more than one project.
    pub fn cross_project_groups(&self) -> usize {
        self.groups.iter().filter(|g| g.cross_project).count()
    }

    /// Total redundant components across the listed groups.
    pub fn total_redundant(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::redundant_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(path: &str, project: &str) -> GroupMember {
        GroupMember {
            path: PathBuf::from(path),
            project_id: project.into(),
            volume: 1.0,
            score_to_seed: 1.0,
        }
    }

    #[test]
    fn test_group_projects() {
        let group = DuplicateGroup::new(vec![
            member("/l/B/x.stl", "ProjectB"),
            member("/l/A/x.stl", "ProjectA"),
            member("/l/A/y.stl", "ProjectA"),
        ]);
        assert_eq!(group.projects, vec!["ProjectA", "ProjectB"]);
        assert!(group.cross_project);
        assert_eq!(group.count(), 3);
        assert_eq!(group.redundant_count(), 2);
        assert_eq!(group.seed().unwrap().path, PathBuf::from("/l/B/x.stl"));
    }

    #[test]
    fn test_report_totals_cover_listed_groups() {
        let report = DuplicateReport {
            groups: vec![
                DuplicateGroup::new(vec![
                    member("a1.stl", "A"),
                    member("a2.stl", "B"),
                    member("a3.stl", "B"),
                ]),
                DuplicateGroup::new(vec![member("b1.stl", "A"), member("b2.stl", "A")]),
            ],
            threshold: 0.95,
            components_analyzed: 9,
            files_with_duplicates: 7,
            group_count: 3,
            failures: Vec::new(),
        };

        assert!(report.has_duplicates());
        assert_eq!(report.total_redundant(), 3);
        assert_eq!(report.cross_project_groups(), 1);
    }

    #[test]
    fn test_single_project_group() {
        let group = DuplicateGroup::new(vec![member("a.stl", "A"), member("b.stl", "A")]);
        assert!(!group.cross_project);
        assert_eq!(group.projects.len(), 1);
    }
}
