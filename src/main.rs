// trackdeck - client projects, tasks, notes and reminders from the terminal
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

use std::collections::HashSet;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use trackdeck_lib::{
    core::{
        cleanup_stale_projects, should_run_cleanup, ReminderScheduler, SearchIndex, SearchKind,
        DEFAULT_LIMIT, POLL_INTERVAL_SECS,
    },
    db::{NoteInput, ProjectInput, ProjectStatus, ReminderInput, TaskInput, TaskStatus},
    state::{AppState, Store},
    storage::{DataFile, FileStore},
    Database, Result, TrackError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = &args[1];
    let rest = &args[2..];

    let outcome = match command.as_str() {
        "project" => handle_project(rest).await,
        "task" => handle_task(rest).await,
        "note" => handle_note(rest).await,
        "reminder" => handle_reminder(rest).await,
        "search" => handle_search(rest).await,
        "watch" => handle_watch().await,
        "cleanup" => handle_cleanup(rest).await,
        "export" => handle_export(rest).await,
        "import" => handle_import(rest).await,
        "status" => handle_status().await,
        "version" | "-v" | "--version" => {
            println!("trackdeck v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    };

    if let Err(e) = outcome {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

// ---- arg helpers ----

/// Value of a `--name value` flag, if present
fn flag_value(args: &[String], name: &str) -> Option<String> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// Everything that is not a flag or a flag value
fn positionals(args: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i].starts_with("--") {
            i += 2; // skip the flag and its value
        } else {
            out.push(args[i].clone());
            i += 1;
        }
    }
    out
}

/// Accept either a full RFC 3339 instant or a bare YYYY-MM-DD date
fn parse_date_arg(value: &str) -> String {
    if value.len() == 10 && value.as_bytes().get(4) == Some(&b'-') {
        format!("{}T00:00:00Z", value)
    } else {
        value.to_string()
    }
}

// ---- handlers ----

async fn handle_project(args: &[String]) -> Result<()> {
    let db = get_database().await?;
    let pos = positionals(args);

    match pos.first().map(String::as_str) {
        Some("add") => {
            if pos.len() < 2 {
                return Err(TrackError::InvalidInput(
                    "usage: project add <client name> [description...]".to_string(),
                ));
            }
            let project = db
                .create_project(ProjectInput {
                    client_name: pos[1].clone(),
                    description: pos[2..].join(" "),
                    links: None,
                    end_date: flag_value(args, "--end").map(|d| parse_date_arg(&d)),
                })
                .await?;
            println!("Created project {} ({})", project.client_name, project.id);
        }
        Some("list") | None => {
            let projects = db.list_projects().await?;
            if projects.is_empty() {
                println!("No projects yet.");
                return Ok(());
            }
            println!("{}", "=".repeat(60));
            for p in projects {
                println!("{}  [{}] {}", p.id, p.status, p.client_name);
                if !p.description.is_empty() {
                    println!("    {}", p.description);
                }
            }
            println!("{}", "=".repeat(60));
        }
        Some("status") => {
            if pos.len() < 3 {
                return Err(TrackError::InvalidInput(
                    "usage: project status <id> <active|paused|completed>".to_string(),
                ));
            }
            let status = ProjectStatus::parse(&pos[2])
                .ok_or_else(|| TrackError::InvalidInput(format!("unknown status '{}'", pos[2])))?;
            let project = db.update_project_status(&pos[1], status).await?;
            println!("{} is now {}", project.client_name, project.status);
        }
        Some("rm") => {
            let id = pos
                .get(1)
                .ok_or_else(|| TrackError::InvalidInput("usage: project rm <id>".to_string()))?;
            db.delete_project(id).await?;
            println!("Deleted project {} and everything attached to it", id);
        }
        Some(other) => {
            return Err(TrackError::InvalidInput(format!(
                "unknown project action '{}'",
                other
            )));
        }
    }

    Ok(())
}

async fn handle_task(args: &[String]) -> Result<()> {
    let db = get_database().await?;
    let pos = positionals(args);

    match pos.first().map(String::as_str) {
        Some("add") => {
            if pos.len() < 2 {
                return Err(TrackError::InvalidInput(
                    "usage: task add <title> --date <when> [--project <id>]".to_string(),
                ));
            }
            let date = flag_value(args, "--date")
                .map(|d| parse_date_arg(&d))
                .unwrap_or_else(|| Utc::now().to_rfc3339());
            let status = match flag_value(args, "--status") {
                Some(s) => TaskStatus::parse(&s)
                    .ok_or_else(|| TrackError::InvalidInput(format!("unknown status '{}'", s)))?,
                None => TaskStatus::Todo,
            };
            let task = db
                .create_task(TaskInput {
                    project_id: flag_value(args, "--project"),
                    title: pos[1..].join(" "),
                    status,
                    calendar_date: date,
                })
                .await?;
            println!("Created task {} ({})", task.title, task.id);
        }
        Some("list") | None => {
            let project_id = flag_value(args, "--project");
            let tasks = db.list_tasks(project_id.as_deref()).await?;
            if tasks.is_empty() {
                println!("No tasks found.");
                return Ok(());
            }
            println!("{}", "=".repeat(60));
            for t in tasks {
                println!("{}  [{}] {} (due {})", t.id, t.status, t.title, t.calendar_date);
            }
            println!("{}", "=".repeat(60));
        }
        Some("status") => {
            if pos.len() < 3 {
                return Err(TrackError::InvalidInput(
                    "usage: task status <id> <todo|in_progress|done>".to_string(),
                ));
            }
            let status = TaskStatus::parse(&pos[2])
                .ok_or_else(|| TrackError::InvalidInput(format!("unknown status '{}'", pos[2])))?;
            let task = db.update_task_status(&pos[1], status).await?;
            println!("{} is now {}", task.title, task.status);
        }
        Some("move") => {
            if pos.len() < 3 {
                return Err(TrackError::InvalidInput(
                    "usage: task move <id> <when>".to_string(),
                ));
            }
            let task = db.update_task_date(&pos[1], &parse_date_arg(&pos[2])).await?;
            println!("{} moved to {}", task.title, task.calendar_date);
        }
        Some("rm") => {
            let id = pos
                .get(1)
                .ok_or_else(|| TrackError::InvalidInput("usage: task rm <id>".to_string()))?;
            db.delete_task(id).await?;
            println!("Deleted task {}", id);
        }
        Some(other) => {
            return Err(TrackError::InvalidInput(format!(
                "unknown task action '{}'",
                other
            )));
        }
    }

    Ok(())
}

async fn handle_note(args: &[String]) -> Result<()> {
    let db = get_database().await?;
    let pos = positionals(args);

    match pos.first().map(String::as_str) {
        Some("add") => {
            if pos.len() < 3 {
                return Err(TrackError::InvalidInput(
                    "usage: note add <project-id> <content...>".to_string(),
                ));
            }
            let note = db
                .create_note(NoteInput {
                    project_id: pos[1].clone(),
                    content: pos[2..].join(" "),
                })
                .await?;
            println!("Created note {}", note.id);
        }
        Some("list") | None => {
            let project_id = flag_value(args, "--project");
            let notes = db.list_notes(project_id.as_deref()).await?;
            if notes.is_empty() {
                println!("No notes found.");
                return Ok(());
            }
            println!("{}", "=".repeat(60));
            for n in notes {
                let preview: String = n.content.chars().take(70).collect();
                println!("{}  {}", n.id, preview);
            }
            println!("{}", "=".repeat(60));
        }
        Some("edit") => {
            if pos.len() < 3 {
                return Err(TrackError::InvalidInput(
                    "usage: note edit <id> <content...>".to_string(),
                ));
            }
            db.update_note_content(&pos[1], &pos[2..].join(" ")).await?;
            println!("Updated note {}", pos[1]);
        }
        Some("rm") => {
            let id = pos
                .get(1)
                .ok_or_else(|| TrackError::InvalidInput("usage: note rm <id>".to_string()))?;
            db.delete_note(id).await?;
            println!("Deleted note {}", id);
        }
        Some(other) => {
            return Err(TrackError::InvalidInput(format!(
                "unknown note action '{}'",
                other
            )));
        }
    }

    Ok(())
}

async fn handle_reminder(args: &[String]) -> Result<()> {
    let db = get_database().await?;
    let pos = positionals(args);

    match pos.first().map(String::as_str) {
        Some("add") => {
            if pos.len() < 2 {
                return Err(TrackError::InvalidInput(
                    "usage: reminder add <message> --at <when> [--project <id>] [--task <id>]"
                        .to_string(),
                ));
            }
            let at = flag_value(args, "--at").ok_or_else(|| {
                TrackError::InvalidInput("reminder needs --at <when>".to_string())
            })?;
            let reminder = db
                .create_reminder(ReminderInput {
                    project_id: flag_value(args, "--project"),
                    task_id: flag_value(args, "--task"),
                    message: pos[1..].join(" "),
                    trigger_date: parse_date_arg(&at),
                })
                .await?;
            println!(
                "Created reminder {} for {}",
                reminder.id, reminder.trigger_date
            );
        }
        Some("list") | None => {
            let project_id = flag_value(args, "--project");
            let reminders = db.list_reminders(project_id.as_deref()).await?;
            if reminders.is_empty() {
                println!("No reminders.");
                return Ok(());
            }
            println!("{}", "=".repeat(60));
            for r in reminders {
                let marker = if r.is_read { " " } else { "*" };
                println!("{} {}  {} (at {})", marker, r.id, r.message, r.trigger_date);
            }
            println!("{}", "=".repeat(60));
        }
        Some("read") | Some("dismiss") => {
            let id = pos.get(1).ok_or_else(|| {
                TrackError::InvalidInput("usage: reminder read <id>".to_string())
            })?;

            // Acknowledge through the scheduler so the active set stays in
            // sync with what was persisted.
            let db = Arc::new(db);
            let store = Arc::new(load_store(&db).await?);
            let scheduler = ReminderScheduler::new(Arc::clone(&db), store);
            scheduler.poll_once(Utc::now());
            scheduler.mark_as_read(id).await?;
            println!("Acknowledged reminder {}", id);
        }
        Some("rm") => {
            let id = pos
                .get(1)
                .ok_or_else(|| TrackError::InvalidInput("usage: reminder rm <id>".to_string()))?;
            db.delete_reminder(id).await?;
            println!("Deleted reminder {}", id);
        }
        Some(other) => {
            return Err(TrackError::InvalidInput(format!(
                "unknown reminder action '{}'",
                other
            )));
        }
    }

    Ok(())
}

async fn handle_search(args: &[String]) -> Result<()> {
    let pos = positionals(args);
    if pos.is_empty() {
        eprintln!("Error: No search query provided");
        return Ok(());
    }

    let query = pos.join(" ");
    let limit = flag_value(args, "--limit")
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_LIMIT);
    let kind = match flag_value(args, "--kind") {
        Some(k) => Some(
            SearchKind::parse(&k)
                .ok_or_else(|| TrackError::InvalidInput(format!("unknown kind '{}'", k)))?,
        ),
        None => None,
    };

    let db = get_database().await?;
    let (projects, tasks, notes, _reminders) = db.load_all().await?;
    let index = SearchIndex::build(&projects, &tasks, &notes);

    let results = match kind {
        Some(SearchKind::Project) => index.search_projects(&query, limit),
        Some(SearchKind::Task) => index.search_tasks(&query, limit),
        Some(SearchKind::Note) => index.search_notes(&query, limit),
        None => index.search(&query, limit),
    };

    if results.is_empty() {
        println!("Nothing found for '{}'", query);
        return Ok(());
    }

    println!("\nFound {} result(s) for '{}':", results.len(), query);
    println!("{}", "=".repeat(60));
    for (i, hit) in results.iter().enumerate() {
        match hit.subtitle() {
            Some(sub) => println!("{:3}. [{}] {} ({})", i + 1, hit.kind(), hit.title(), sub),
            None => println!("{:3}. [{}] {}", i + 1, hit.kind(), hit.title()),
        }
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_watch() -> Result<()> {
    let db = Arc::new(get_database().await?);
    let store = Arc::new(load_store(&db).await?);
    let scheduler = Arc::new(ReminderScheduler::new(Arc::clone(&db), store));

    let poll = scheduler.start();

    println!(
        "Watching for due reminders (checked every {}s). Ctrl-C to stop.",
        POLL_INTERVAL_SECS
    );

    let printer = async {
        // Announce each reminder once per watch session; the active set
        // itself keeps re-listing them until acknowledged.
        let mut announced: HashSet<String> = HashSet::new();
        loop {
            for r in scheduler.active() {
                if announced.insert(r.id.clone()) {
                    println!("* {} (due {})  [id {}]", r.message, r.trigger_date, r.id);
                }
            }
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
    };

    tokio::select! {
        _ = printer => {}
        _ = tokio::signal::ctrl_c() => {
            println!("\nStopped watching.");
        }
    }

    poll.cancel();
    Ok(())
}

async fn handle_cleanup(args: &[String]) -> Result<()> {
    let force = args.iter().any(|a| a == "--force");
    let db = get_database().await?;
    let now = Utc::now();

    let last_run = db.get_meta("last_cleanup").await?;
    if !force && !should_run_cleanup(last_run.as_deref(), now) {
        println!("Cleanup already ran in the last day. Use --force to run anyway.");
        return Ok(());
    }

    let (projects, tasks, notes, reminders) = db.load_all().await?;
    let result = cleanup_stale_projects(&projects, &tasks, &notes, &reminders, now);

    if result.removed_project_ids.is_empty() {
        println!("Nothing stale to clean up.");
    } else {
        db.bulk_delete_projects(&result.removed_project_ids).await?;
        println!(
            "Removed {} stale project(s) and their tasks, notes and reminders.",
            result.removed_project_ids.len()
        );
    }

    db.set_meta("last_cleanup", &now.to_rfc3339()).await?;
    Ok(())
}

async fn handle_export(args: &[String]) -> Result<()> {
    let path = args
        .first()
        .ok_or_else(|| TrackError::InvalidInput("usage: export <path>".to_string()))?;

    let db = get_database().await?;
    let (projects, tasks, notes, reminders) = db.load_all().await?;

    let store = FileStore::new(path);
    store.save(&DataFile::from_state(AppState {
        projects,
        tasks,
        notes,
        reminders,
    }))?;

    println!("Exported data to {}", store.path().display());
    Ok(())
}

async fn handle_import(args: &[String]) -> Result<()> {
    let path = args
        .first()
        .ok_or_else(|| TrackError::InvalidInput("usage: import <path>".to_string()))?;

    let data = FileStore::new(path).load()?;
    let db = get_database().await?;

    db.restore_all(&data.projects, &data.tasks, &data.notes, &data.reminders)
        .await?;

    println!(
        "Imported {} project(s), {} task(s), {} note(s), {} reminder(s)",
        data.projects.len(),
        data.tasks.len(),
        data.notes.len(),
        data.reminders.len()
    );
    Ok(())
}

async fn handle_status() -> Result<()> {
    let db = get_database().await?;
    let stats = db.stats().await?;

    println!("\ntrackdeck Status");
    println!("{}", "=".repeat(60));
    println!("Database: {}", db.path().display());
    println!("  Projects:   {}", stats.total_projects);
    println!("  Tasks:      {}", stats.total_tasks);
    println!("  Notes:      {}", stats.total_notes);
    println!(
        "  Reminders:  {} ({} unread)",
        stats.total_reminders, stats.unread_reminders
    );
    println!("{}", "=".repeat(60));

    Ok(())
}

// ---- shared plumbing ----

async fn get_database() -> Result<Database> {
    let home = dirs::home_dir()
        .ok_or_else(|| TrackError::Config("could not find home directory".to_string()))?;
    let db_path = home.join(".trackdeck").join("tracker.db");
    Database::new(db_path).await
}

async fn load_store(db: &Database) -> Result<Store> {
    let (projects, tasks, notes, reminders) = db.load_all().await?;
    Ok(Store::from_state(AppState {
        projects,
        tasks,
        notes,
        reminders,
    }))
}

fn print_usage() {
    println!(
        r#"trackdeck v{} - client projects, tasks, notes and reminders

USAGE:
    trackdeck <COMMAND> [OPTIONS]

COMMANDS:
    project add <client> [description...] [--end <when>]
    project list
    project status <id> <active|paused|completed>
    project rm <id>

    task add <title> [--date <when>] [--project <id>] [--status <s>]
    task list [--project <id>]
    task status <id> <todo|in_progress|done>
    task move <id> <when>
    task rm <id>

    note add <project-id> <content...>
    note list [--project <id>]
    note edit <id> <content...>
    note rm <id>

    reminder add <message> --at <when> [--project <id>] [--task <id>]
    reminder list [--project <id>]
    reminder read <id>
    reminder rm <id>

    search <query...> [--kind project|task|note] [--limit <n>]
    watch                  Print reminders as they come due
    cleanup [--force]      Remove projects completed over two months ago
    export <path>          Write all data to a JSON file
    import <path>          Load data from a JSON file
    status                 Show database stats
    version                Show version
    help                   Show this help

Dates are RFC 3339 instants; a bare YYYY-MM-DD means midnight UTC.

EXAMPLES:
    trackdeck project add Acme "Website redesign"
    trackdeck task add "Fix bug" --project <id> --date 2024-02-01
    trackdeck reminder add "Send invoice" --at 2024-02-01T09:00:00Z
    trackdeck search acme --kind task
    trackdeck watch
"#,
        env!("CARGO_PKG_VERSION")
    );
}
