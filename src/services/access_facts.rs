// src/services/access_facts.rs

use crate::models::{Deadline, User};
use crate::services::directory::{Directory, ProjectFacts, TeamFacts};
use log::{debug, warn};
use std::collections::HashMap;

// Requester's standing in the team attached to a deadline's project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRelation {
    pub team_id: String,
    pub is_member: bool,
    pub is_leader: bool,
}

// Directory facts for one (requester, deadline) pair. `project_manager_id`
// and `team` are None when the deadline has no project, or when the project
// (or its team) no longer exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityFacts {
    pub creator_department: Option<String>,
    pub project_manager_id: Option<String>,
    pub team: Option<TeamRelation>,
}

// Looks up each distinct creator, project and team at most once per view
pub struct FactsAssembler<'a> {
    directory: &'a dyn Directory,
    requester_id: String,
    departments: HashMap<String, Option<String>>,
    projects: HashMap<String, Option<ProjectFacts>>,
    teams: HashMap<String, Option<TeamFacts>>,
}

impl<'a> FactsAssembler<'a> {
    pub fn new(directory: &'a dyn Directory, requester: &User) -> Self {
        Self {
            directory,
            requester_id: requester.id.clone(),
            departments: HashMap::new(),
            projects: HashMap::new(),
            teams: HashMap::new(),
        }
    }

    // Facts for every candidate, index-aligned with the input
    pub fn assemble(&mut self, deadlines: &[Deadline]) -> Vec<VisibilityFacts> {
        let facts: Vec<VisibilityFacts> = deadlines.iter().map(|d| self.facts_for(d)).collect();

        debug!(
            "Assembled facts for {} deadlines ({} creators, {} projects, {} teams looked up)",
            deadlines.len(),
            self.departments.len(),
            self.projects.len(),
            self.teams.len()
        );
        facts
    }

    pub fn facts_for(&mut self, deadline: &Deadline) -> VisibilityFacts {
        let creator_department = self.creator_department(&deadline.creator_id);

        let project = match deadline.project_id.as_deref() {
            Some(project_id) => self.project(project_id),
            None => None,
        };

        let team = project
            .as_ref()
            .and_then(|p| p.team_id.clone())
            .and_then(|team_id| self.team_relation(&team_id));

        VisibilityFacts {
            creator_department,
            project_manager_id: project.map(|p| p.manager_id),
            team,
        }
    }

    fn creator_department(&mut self, creator_id: &str) -> Option<String> {
        let directory = self.directory;
        self.departments
            .entry(creator_id.to_string())
            .or_insert_with(|| directory.get_user_department(creator_id))
            .clone()
    }

    fn project(&mut self, project_id: &str) -> Option<ProjectFacts> {
        let directory = self.directory;
        self.projects
            .entry(project_id.to_string())
            .or_insert_with(|| {
                let facts = directory.get_project_facts(project_id);
                if facts.is_none() {
                    warn!("⚠️ Deadline references missing project: {}", project_id);
                }
                facts
            })
            .clone()
    }

    fn team_relation(&mut self, team_id: &str) -> Option<TeamRelation> {
        let directory = self.directory;
        let team = self
            .teams
            .entry(team_id.to_string())
            .or_insert_with(|| {
                let facts = directory.get_team_facts(team_id);
                if facts.is_none() {
                    warn!("⚠️ Project references missing team: {}", team_id);
                }
                facts
            })
            .clone()?;

        Some(TeamRelation {
            team_id: team_id.to_string(),
            is_member: team.member_ids.contains(&self.requester_id),
            is_leader: team.leader_id == self.requester_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Project, Role, Team, Visibility};
    use crate::services::directory::DirectorySnapshot;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Wraps a snapshot and counts every lookup
    struct CountingDirectory {
        inner: DirectorySnapshot,
        departments: AtomicUsize,
        teams: AtomicUsize,
        projects: AtomicUsize,
    }

    impl CountingDirectory {
        fn new(inner: DirectorySnapshot) -> Self {
            Self {
                inner,
                departments: AtomicUsize::new(0),
                teams: AtomicUsize::new(0),
                projects: AtomicUsize::new(0),
            }
        }
    }

    impl Directory for CountingDirectory {
        fn get_user(&self, id: &str) -> Option<User> {
            self.inner.get_user(id)
        }

        fn get_user_department(&self, id: &str) -> Option<String> {
            self.departments.fetch_add(1, Ordering::Relaxed);
            self.inner.get_user_department(id)
        }

        fn get_team_facts(&self, team_id: &str) -> Option<TeamFacts> {
            self.teams.fetch_add(1, Ordering::Relaxed);
            self.inner.get_team_facts(team_id)
        }

        fn get_project_facts(&self, project_id: &str) -> Option<ProjectFacts> {
            self.projects.fetch_add(1, Ordering::Relaxed);
            self.inner.get_project_facts(project_id)
        }
    }

    fn user(id: &str, department: Option<&str>) -> User {
        User {
            id: id.into(),
            email: None,
            role: Role::User,
            department: department.map(|d| d.into()),
        }
    }

    fn directory() -> DirectorySnapshot {
        DirectorySnapshot::new(
            vec![
                user("creator", Some("Engineering")),
                user("member", Some("Sales")),
                user("leader", None),
                user("manager", None),
            ],
            vec![Team {
                id: "t1".into(),
                name: None,
                leader_id: "leader".into(),
                department: None,
                member_ids: vec!["member".into()],
            }],
            vec![
                Project {
                    id: "p1".into(),
                    name: None,
                    manager_id: "manager".into(),
                    team_id: Some("t1".into()),
                },
                Project {
                    id: "p-orphan".into(),
                    name: None,
                    manager_id: "manager".into(),
                    team_id: Some("t-gone".into()),
                },
            ],
        )
    }

    #[test]
    fn test_facts_for_project_deadline() {
        let dir = directory();
        let member = user("member", Some("Sales"));
        let deadline = Deadline::new("d1", "creator", Some("p1"), Visibility::Team);

        let facts = FactsAssembler::new(&dir, &member).facts_for(&deadline);
        assert_eq!(facts.creator_department.as_deref(), Some("Engineering"));
        assert_eq!(facts.project_manager_id.as_deref(), Some("manager"));
        assert_eq!(
            facts.team,
            Some(TeamRelation {
                team_id: "t1".into(),
                is_member: true,
                is_leader: false,
            })
        );
    }

    #[test]
    fn test_leader_is_not_a_member() {
        let dir = directory();
        let leader = user("leader", None);
        let deadline = Deadline::new("d1", "creator", Some("p1"), Visibility::Team);

        let team = FactsAssembler::new(&dir, &leader).facts_for(&deadline).team.unwrap();
        assert!(team.is_leader);
        assert!(!team.is_member);
    }

    #[test]
    fn test_membership_comes_from_team_roster() {
        let dir = DirectorySnapshot::new(
            vec![user("creator", None), user("newcomer", None)],
            vec![Team {
                id: "t1".into(),
                name: None,
                leader_id: "someone-else".into(),
                department: None,
                member_ids: vec!["newcomer".into()],
            }],
            vec![Project {
                id: "p1".into(),
                name: None,
                manager_id: "creator".into(),
                team_id: Some("t1".into()),
            }],
        );
        let deadline = Deadline::new("d1", "creator", Some("p1"), Visibility::Team);

        let newcomer = FactsAssembler::new(&dir, &user("newcomer", None))
            .facts_for(&deadline)
            .team
            .unwrap();
        assert!(newcomer.is_member);
        assert!(!newcomer.is_leader);

        let stranger = FactsAssembler::new(&dir, &user("stranger", None))
            .facts_for(&deadline)
            .team
            .unwrap();
        assert!(!stranger.is_member);
    }

    #[test]
    fn test_no_project_means_no_team_or_manager() {
        let dir = directory();
        let member = user("member", Some("Sales"));
        let deadline = Deadline::new("d1", "creator", None, Visibility::Team);

        let facts = FactsAssembler::new(&dir, &member).facts_for(&deadline);
        assert_eq!(facts.creator_department.as_deref(), Some("Engineering"));
        assert!(facts.project_manager_id.is_none());
        assert!(facts.team.is_none());
    }

    #[test]
    fn test_dangling_project_drops_project_facts_only() {
        let dir = directory();
        let member = user("member", Some("Sales"));
        let deadline = Deadline::new("d1", "creator", Some("p-deleted"), Visibility::Department);

        let facts = FactsAssembler::new(&dir, &member).facts_for(&deadline);
        assert_eq!(facts.creator_department.as_deref(), Some("Engineering"));
        assert!(facts.project_manager_id.is_none());
        assert!(facts.team.is_none());
    }

    #[test]
    fn test_dangling_team_keeps_manager() {
        let dir = directory();
        let member = user("member", Some("Sales"));
        let deadline = Deadline::new("d1", "creator", Some("p-orphan"), Visibility::Team);

        let facts = FactsAssembler::new(&dir, &member).facts_for(&deadline);
        assert_eq!(facts.project_manager_id.as_deref(), Some("manager"));
        assert!(facts.team.is_none());
    }

    #[test]
    fn test_lookups_are_batched_per_distinct_key() {
        let dir = CountingDirectory::new(directory());
        let member = user("member", Some("Sales"));
        let deadlines: Vec<Deadline> = (0..25)
            .map(|i| Deadline::new(&format!("d{}", i), "creator", Some("p1"), Visibility::Team))
            .collect();

        let facts = FactsAssembler::new(&dir, &member).assemble(&deadlines);

        assert_eq!(facts.len(), 25);
        assert_eq!(dir.departments.load(Ordering::Relaxed), 1);
        assert_eq!(dir.projects.load(Ordering::Relaxed), 1);
        assert_eq!(dir.teams.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_missing_lookups_are_cached_too() {
        let dir = CountingDirectory::new(directory());
        let member = user("member", Some("Sales"));
        let deadlines = vec![
            Deadline::new("d1", "ghost", Some("p-deleted"), Visibility::Private),
            Deadline::new("d2", "ghost", Some("p-deleted"), Visibility::Private),
        ];

        FactsAssembler::new(&dir, &member).assemble(&deadlines);

        assert_eq!(dir.departments.load(Ordering::Relaxed), 1);
        assert_eq!(dir.projects.load(Ordering::Relaxed), 1);
        assert_eq!(dir.teams.load(Ordering::Relaxed), 0);
    }
}
