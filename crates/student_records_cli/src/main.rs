//! Command-line front end for the student records store.
//!
//! # Responsibility
//! - Resolve store and logging configuration from flags and environment.
//! - Drive list/add/edit/delete/search through the envelope API.
//! - Re-list the table after every successful mutation.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use directories::ProjectDirs;
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use student_records_api::{
    core_version, courses, init_logging, ActionResponse, RecordsApi, RecordsResponse,
};
use student_records_core::{default_log_level, Course, StoreConfig, Student, StudentId};

const DB_FILE_NAME: &str = "students.db";
const ABOUT_TEXT: &str = "Student Records keeps a table of students (name, course, phone) \
in a local SQLite file. Records can be added, edited, deleted and searched by name, \
course and phone number.";

#[derive(Debug, Parser)]
#[command(name = "student-records", version, about = "Manage student records")]
struct Cli {
    /// SQLite file holding the students table.
    #[arg(long, global = true, env = "STUDENT_RECORDS_DB")]
    db: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error); enables logging.
    #[arg(long, global = true, env = "STUDENT_RECORDS_LOG")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; enables logging.
    #[arg(long, global = true, env = "STUDENT_RECORDS_LOG_DIR")]
    log_dir: Option<String>,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show every record.
    List,
    /// Add a record.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        course: Course,
        #[arg(long, allow_hyphen_values = true)]
        phone: String,
    },
    /// Edit a record; omitted fields keep their current value.
    Edit {
        id: StudentId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        course: Option<Course>,
        #[arg(long, allow_hyphen_values = true)]
        phone: Option<String>,
    },
    /// Delete a record after confirmation.
    Delete {
        id: StudentId,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Find records matching every supplied field.
    Search {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        course: Option<Course>,
        #[arg(long, allow_hyphen_values = true)]
        phone: Option<String>,
    },
    /// List the offered courses.
    Courses,
    /// Describe this application.
    About,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    setup_logging(cli.log_level.as_deref(), cli.log_dir.as_deref())?;

    let json = cli.json;
    match cli.command {
        Command::Courses => {
            let names = courses();
            if json {
                print_json(&names)?;
            } else {
                names.iter().for_each(|name| println!("{name}"));
            }
            return Ok(ExitCode::SUCCESS);
        }
        Command::About => {
            if json {
                print_json(&serde_json::json!({
                    "about": ABOUT_TEXT,
                    "core_version": core_version(),
                }))?;
            } else {
                println!("{ABOUT_TEXT}\ncore version {}", core_version());
            }
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let db_path = resolve_db_path(cli.db)?;
    info!(
        "event=cli_start module=cli status=ok db={}",
        db_path.display()
    );
    let api = RecordsApi::new(StoreConfig::new(db_path));

    match cli.command {
        Command::List => show_records(&api.list_all(), json),
        Command::Search {
            name,
            course,
            phone,
        } => show_records(
            &api.search(
                name.as_deref(),
                course.map(Course::as_str),
                phone.as_deref(),
            ),
            json,
        ),
        Command::Add {
            name,
            course,
            phone,
        } => finish_mutation(&api, api.insert(&name, course.as_str(), &phone), json),
        Command::Edit {
            id,
            name,
            course,
            phone,
        } => {
            let current = find_student(&api, id)?;
            let (name, course, phone) = merge_edit(&current, name, course, phone)?;
            finish_mutation(&api, api.update(id, &name, &course, &phone), json)
        }
        Command::Delete { id, yes } => {
            match delete_with_confirmation(&api, id, yes, confirm_delete)? {
                Some(response) => finish_mutation(&api, response, json),
                None => {
                    println!("Deletion cancelled.");
                    Ok(ExitCode::SUCCESS)
                }
            }
        }
        Command::Courses | Command::About => Ok(ExitCode::SUCCESS),
    }
}

fn setup_logging(level: Option<&str>, log_dir: Option<&str>) -> Result<()> {
    if level.is_none() && log_dir.is_none() {
        return Ok(());
    }

    let error = init_logging(level.unwrap_or_else(|| default_log_level()), log_dir);
    if !error.is_empty() {
        bail!("logging setup failed: {error}");
    }
    Ok(())
}

fn resolve_db_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }

    let dirs = ProjectDirs::from("", "", "student-records")
        .context("no home directory found; pass --db or set STUDENT_RECORDS_DB")?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data directory `{}`", data_dir.display()))?;
    Ok(data_dir.join(DB_FILE_NAME))
}

fn lookup_student(api: &RecordsApi, id: StudentId) -> Result<Option<Student>> {
    let response = api.get(id);
    if !response.ok {
        bail!("{}", response.message);
    }
    Ok(response.student)
}

fn find_student(api: &RecordsApi, id: StudentId) -> Result<Student> {
    lookup_student(api, id)?.with_context(|| format!("no student record with id {id}"))
}

/// Deletes record `id`, asking `confirm` first unless `yes` is set.
///
/// A missing id skips the prompt and still goes through the delete so the
/// store reports its zero-row no-op. Returns `None` when the user declines.
fn delete_with_confirmation(
    api: &RecordsApi,
    id: StudentId,
    yes: bool,
    confirm: impl FnOnce(&Student) -> Result<bool>,
) -> Result<Option<ActionResponse>> {
    if !yes {
        if let Some(current) = lookup_student(api, id)? {
            if !confirm(&current)? {
                return Ok(None);
            }
        }
    }
    Ok(Some(api.delete(id)))
}

/// Overlays supplied flags on the current record as form text.
fn merge_edit(
    current: &Student,
    name: Option<String>,
    course: Option<Course>,
    phone: Option<String>,
) -> Result<(String, String, String)> {
    let phone = match (phone, current.phone) {
        (Some(phone), _) => phone,
        (None, Some(stored)) => stored.to_string(),
        (None, None) => bail!("record {} has no phone on file; pass --phone", current.id),
    };
    Ok((
        name.unwrap_or_else(|| current.name.clone()),
        course.map_or_else(|| current.course.clone(), |course| course.to_string()),
        phone,
    ))
}

fn confirm_delete(student: &Student) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(format!(
            "Are you sure you want to delete this student? {}",
            student.name
        ))
        .default(false)
        .interact()
        .context("failed to read confirmation")?;
    Ok(confirmed)
}

fn finish_mutation(api: &RecordsApi, response: ActionResponse, json: bool) -> Result<ExitCode> {
    if !response.ok {
        if json {
            print_json(&response)?;
        } else {
            eprintln!("{}", response.message);
        }
        return Ok(ExitCode::FAILURE);
    }

    let listed = api.list_all();
    if json {
        print_json(&serde_json::json!({
            "result": response,
            "students": listed.students,
        }))?;
    } else {
        println!("{}", response.message);
        print!("{}", render_table(&listed.rows()));
    }
    Ok(ExitCode::SUCCESS)
}

fn show_records(response: &RecordsResponse, json: bool) -> Result<ExitCode> {
    if json {
        print_json(response)?;
    } else if response.ok {
        print!("{}", render_table(&response.rows()));
    } else {
        eprintln!("{}", response.message);
    }

    Ok(if response.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_table(rows: &[[String; 4]]) -> String {
    const HEADERS: [&str; 4] = ["ID", "Name", "Course", "Phone"];

    let mut widths = HEADERS.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS, &widths);
    for row in rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize; 4]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
