/// Fuzzy search index over projects, tasks and notes
///
/// Built fresh from the source collections every time they change (no
/// incremental updates) and queried with fuzzy matching, so partial terms and
/// small typos still hit.

use crate::db::{Note, Project, Task};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::HashMap;

/// Default result cap for searches
pub const DEFAULT_LIMIT: usize = 10;

/// Display titles for notes are the first 100 characters of content
const NOTE_TITLE_CHARS: usize = 100;

/// Loose score floor, scaled by query length. Drops items where the query
/// letters only match scattered across the text while keeping substring and
/// near-typo matches.
const MIN_SCORE_PER_CHAR: i64 = 4;

/// Entity kind of a search hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Project,
    Task,
    Note,
}

impl SearchKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "project" => Some(SearchKind::Project),
            "task" => Some(SearchKind::Task),
            "note" => Some(SearchKind::Note),
            _ => None,
        }
    }
}

impl std::fmt::Display for SearchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SearchKind::Project => "project",
            SearchKind::Task => "task",
            SearchKind::Note => "note",
        };
        write!(f, "{}", s)
    }
}

/// One ranked search result, carrying only what its kind needs
#[derive(Debug, Clone, PartialEq)]
pub enum SearchHit {
    Project {
        id: String,
        title: String,
        subtitle: Option<String>,
    },
    Task {
        id: String,
        title: String,
        subtitle: Option<String>,
        project_id: Option<String>,
    },
    Note {
        id: String,
        title: String,
        subtitle: Option<String>,
        project_id: String,
    },
}

impl SearchHit {
    pub fn kind(&self) -> SearchKind {
        match self {
            SearchHit::Project { .. } => SearchKind::Project,
            SearchHit::Task { .. } => SearchKind::Task,
            SearchHit::Note { .. } => SearchKind::Note,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            SearchHit::Project { id, .. }
            | SearchHit::Task { id, .. }
            | SearchHit::Note { id, .. } => id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SearchHit::Project { title, .. }
            | SearchHit::Task { title, .. }
            | SearchHit::Note { title, .. } => title,
        }
    }

    pub fn subtitle(&self) -> Option<&str> {
        match self {
            SearchHit::Project { subtitle, .. }
            | SearchHit::Task { subtitle, .. }
            | SearchHit::Note { subtitle, .. } => subtitle.as_deref(),
        }
    }
}

/// One indexed entry: the hit to hand back plus the text to match against
struct SearchableItem {
    hit: SearchHit,
    search_text: String,
}

/// In-memory fuzzy search index
pub struct SearchIndex {
    items: Vec<SearchableItem>,
    matcher: SkimMatcherV2,
}

impl SearchIndex {
    /// Build the index from snapshots of the three collections
    ///
    /// Pure function of its inputs. Tasks and notes resolve their owning
    /// project by id to get a subtitle and richer search text; a dangling
    /// project_id just means no subtitle, never an error.
    pub fn build(projects: &[Project], tasks: &[Task], notes: &[Note]) -> Self {
        let by_id: HashMap<&str, &Project> =
            projects.iter().map(|p| (p.id.as_str(), p)).collect();

        let mut items = Vec::with_capacity(projects.len() + tasks.len() + notes.len());

        for p in projects {
            items.push(SearchableItem {
                hit: SearchHit::Project {
                    id: p.id.clone(),
                    title: p.client_name.clone(),
                    subtitle: non_empty(&p.description),
                },
                search_text: format!("{} {}", p.client_name, p.description),
            });
        }

        for t in tasks {
            let owner = t.project_id.as_deref().and_then(|pid| by_id.get(pid));
            let client = owner.map(|p| p.client_name.as_str()).unwrap_or("");
            items.push(SearchableItem {
                hit: SearchHit::Task {
                    id: t.id.clone(),
                    title: t.title.clone(),
                    subtitle: non_empty(client),
                    project_id: t.project_id.clone(),
                },
                search_text: format!("{} {}", t.title, client),
            });
        }

        for n in notes {
            let owner = by_id.get(n.project_id.as_str());
            let client = owner.map(|p| p.client_name.as_str()).unwrap_or("");
            items.push(SearchableItem {
                hit: SearchHit::Note {
                    id: n.id.clone(),
                    title: n.content.chars().take(NOTE_TITLE_CHARS).collect(),
                    subtitle: non_empty(client),
                    project_id: n.project_id.clone(),
                },
                search_text: format!("{} {}", n.content, client),
            });
        }

        Self {
            items,
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Search across all kinds
    ///
    /// Empty or whitespace-only queries return nothing (never the whole
    /// index). Results are best match first, capped at `limit`.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let floor = query.chars().count() as i64 * MIN_SCORE_PER_CHAR;

        let mut scored: Vec<(i64, &SearchHit)> = self
            .items
            .iter()
            .filter_map(|item| {
                self.matcher
                    .fuzzy_match(&item.search_text, query)
                    .filter(|score| *score >= floor)
                    .map(|score| (score, &item.hit))
            })
            .collect();

        // Highest score first; stable sort keeps build order for ties
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.truncate(limit);

        scored.into_iter().map(|(_, hit)| hit.clone()).collect()
    }

    /// Search projects only
    pub fn search_projects(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        self.search_kind(query, limit, SearchKind::Project)
    }

    /// Search tasks only
    pub fn search_tasks(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        self.search_kind(query, limit, SearchKind::Task)
    }

    /// Search notes only
    pub fn search_notes(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        self.search_kind(query, limit, SearchKind::Note)
    }

    // Doubling the candidate pool before filtering keeps enough of the other
    // kinds' near-misses from crowding out the requested kind.
    fn search_kind(&self, query: &str, limit: usize, kind: SearchKind) -> Vec<SearchHit> {
        let mut results = filter_by_kind(self.search(query, limit * 2), kind);
        results.truncate(limit);
        results
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Keep only hits of one kind, preserving order
pub fn filter_by_kind(results: Vec<SearchHit>, kind: SearchKind) -> Vec<SearchHit> {
    results.into_iter().filter(|r| r.kind() == kind).collect()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, client_name: &str, description: &str) -> Project {
        Project {
            id: id.to_string(),
            client_name: client_name.to_string(),
            description: description.to_string(),
            links: None,
            status: "active".to_string(),
            end_date: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            completed_at: None,
        }
    }

    fn task(id: &str, project_id: Option<&str>, title: &str) -> Task {
        Task {
            id: id.to_string(),
            project_id: project_id.map(String::from),
            title: title.to_string(),
            status: "todo".to_string(),
            calendar_date: "2024-01-05T00:00:00Z".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn note(id: &str, project_id: &str, content: &str) -> Note {
        Note {
            id: id.to_string(),
            project_id: project_id.to_string(),
            content: content.to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn sample_index() -> SearchIndex {
        let projects = vec![
            project("p1", "Acme", "Website redesign"),
            project("p2", "Globex", "Mobile app"),
        ];
        let tasks = vec![
            task("t1", Some("p1"), "Fix bug"),
            task("t2", Some("p2"), "Write onboarding copy"),
            task("t3", None, "File expenses"),
        ];
        let notes = vec![note("n1", "p1", "Client prefers weekly status calls")];

        SearchIndex::build(&projects, &tasks, &notes)
    }

    #[test]
    fn test_exact_title_substring_is_found() {
        let index = sample_index();

        let results = index.search("Acme", 10);
        assert!(results
            .iter()
            .any(|r| r.kind() == SearchKind::Project && r.title() == "Acme"));
    }

    #[test]
    fn test_empty_and_whitespace_queries_return_nothing() {
        let index = sample_index();

        assert!(index.search("", 10).is_empty());
        assert!(index.search("   ", 10).is_empty());
    }

    #[test]
    fn test_task_hit_carries_project_subtitle() {
        let index = sample_index();

        let results = index.search("bug", 10);
        let hit = results
            .iter()
            .find(|r| r.kind() == SearchKind::Task)
            .expect("task hit");
        assert_eq!(hit.title(), "Fix bug");
        assert_eq!(hit.subtitle(), Some("Acme"));
    }

    #[test]
    fn test_dangling_project_id_means_no_subtitle() {
        let tasks = vec![task("t1", Some("ghost"), "Orphaned work")];
        let index = SearchIndex::build(&[], &tasks, &[]);

        let results = index.search("Orphaned", 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].subtitle(), None);
        assert_eq!(
            results[0],
            SearchHit::Task {
                id: "t1".to_string(),
                title: "Orphaned work".to_string(),
                subtitle: None,
                project_id: Some("ghost".to_string()),
            }
        );
    }

    #[test]
    fn test_note_title_truncated_to_100_chars() {
        let long = "word ".repeat(40); // 200 chars
        let notes = vec![note("n1", "p1", &long)];
        let index = SearchIndex::build(&[], &[], &notes);

        let results = index.search("word", 10);
        assert_eq!(results[0].title().chars().count(), 100);
    }

    #[test]
    fn test_limit_caps_results() {
        let tasks: Vec<Task> = (0..20)
            .map(|i| task(&format!("t{}", i), None, &format!("Review invoice {}", i)))
            .collect();
        let index = SearchIndex::build(&[], &tasks, &[]);

        assert_eq!(index.search("invoice", 5).len(), 5);
    }

    #[test]
    fn test_search_tasks_never_exceeds_limit() {
        let projects = vec![project("p1", "Invoice Factory", "invoicing")];
        let mut tasks: Vec<Task> = (0..8)
            .map(|i| {
                task(
                    &format!("t{}", i),
                    Some("p1"),
                    &format!("Send invoice {}", i),
                )
            })
            .collect();
        tasks.push(task("t9", None, "unrelated"));
        let index = SearchIndex::build(&projects, &tasks, &[]);

        let results = index.search_tasks("invoice", 3);
        assert!(results.len() <= 3);
        assert!(results.iter().all(|r| r.kind() == SearchKind::Task));
    }

    #[test]
    fn test_filter_by_kind_preserves_order() {
        let index = sample_index();

        let all = index.search("Acme", 10);
        let tasks_only = filter_by_kind(all.clone(), SearchKind::Task);

        let task_ids: Vec<&str> = all
            .iter()
            .filter(|r| r.kind() == SearchKind::Task)
            .map(|r| r.id())
            .collect();
        let filtered_ids: Vec<&str> = tasks_only.iter().map(|r| r.id()).collect();
        assert_eq!(task_ids, filtered_ids);
    }

    #[test]
    fn test_partial_term_still_matches() {
        let index = sample_index();

        let results = index.search("Acm", 10);
        assert!(results.iter().any(|r| r.title() == "Acme"));
    }

    #[test]
    fn test_unmatched_query_returns_nothing() {
        let index = sample_index();

        assert!(index.search("qqqq", 10).is_empty());
    }

    #[test]
    fn test_note_content_is_searchable() {
        let index = sample_index();

        let results = index.search_notes("weekly status", 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].subtitle(), Some("Acme"));
    }
}
