use std::fmt;

/// Project family, derived from the repository a project is pushed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectKind {
    /// C projects: `_putchar.c`, a header and function stubs.
    LowLevel,
    /// Python and JavaScript projects.
    HighLevel,
    /// Shell and DevOps projects.
    System,
}

const REPOSITORY_SUFFIXES: &[(&str, ProjectKind)] = &[
    ("low_level_programming", ProjectKind::LowLevel),
    ("system_linux", ProjectKind::LowLevel),
    ("system_algorithms", ProjectKind::LowLevel),
    ("higher_level_programming", ProjectKind::HighLevel),
    ("machine_learning", ProjectKind::HighLevel),
    ("web_front_end", ProjectKind::HighLevel),
    ("webstack", ProjectKind::HighLevel),
    ("interview", ProjectKind::HighLevel),
    ("system_engineering-devops", ProjectKind::System),
];

impl ProjectKind {
    /// Classify a repository name such as
    /// `holbertonschool-low_level_programming`.
    pub fn from_repository(repository: &str) -> Option<Self> {
        let repository = repository.trim();
        REPOSITORY_SUFFIXES
            .iter()
            .find(|(suffix, _)| repository.ends_with(suffix))
            .map(|(_, kind)| *kind)
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectKind::LowLevel => write!(f, "low-level"),
            ProjectKind::HighLevel => write!(f, "high-level"),
            ProjectKind::System => write!(f, "system"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repositories_map_to_kinds() {
        let cases = [
            ("holbertonschool-low_level_programming", Some(ProjectKind::LowLevel)),
            ("holbertonschool-system_linux", Some(ProjectKind::LowLevel)),
            ("holbertonschool-system_algorithms", Some(ProjectKind::LowLevel)),
            ("holbertonschool-higher_level_programming", Some(ProjectKind::HighLevel)),
            ("holbertonschool-machine_learning", Some(ProjectKind::HighLevel)),
            ("holbertonschool-web_front_end", Some(ProjectKind::HighLevel)),
            ("holbertonschool-webstack", Some(ProjectKind::HighLevel)),
            ("holbertonschool-interview", Some(ProjectKind::HighLevel)),
            ("holbertonschool-system_engineering-devops", Some(ProjectKind::System)),
            ("holbertonschool-zero_day", None),
            ("", None),
        ];
        for (repository, expected) in cases {
            assert_eq!(ProjectKind::from_repository(repository), expected, "{repository}");
        }
    }
}
