//! Conductor - track and plan status tracking
//!
//! Command-line front end over the `conductor` library.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use conductor::{
    phase_progress, Conductor, PhaseTemplate, Status, StatusReport, Task, Track, TrackType,
    UpdateOutcome,
};

#[derive(Parser)]
#[command(name = "conductor")]
#[command(version = "0.1.0")]
#[command(about = "Track and plan status tracking for context-driven development", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".", env = "CONDUCTOR_PROJECT")]
    project: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the conductor directory layout and starter documents
    Setup,

    /// Show overall track progress
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List tracks
    Tracks {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new track with spec and plan documents
    NewTrack {
        /// Track description
        description: String,

        /// Track type: feature, bug or chore
        #[arg(short = 't', long = "type", default_value = "feature")]
        track_type: TrackType,

        /// Phase to scaffold in the plan (repeatable)
        #[arg(long = "phase", value_name = "NAME")]
        phases: Vec<String>,
    },

    /// Set the status of a track
    TrackStatus {
        /// Text identifying the track heading
        description: String,

        /// New status: pending, in_progress or complete
        status: Status,

        /// Match on the track id anchor instead of the description
        #[arg(long)]
        by_id: bool,
    },

    /// List the tasks of a track's plan
    Tasks {
        /// Track id
        track_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the next pending task of a track
    NextTask {
        /// Track id
        track_id: String,
    },

    /// Set the status of a plan task
    TaskStatus {
        /// Track id
        track_id: String,

        /// Text identifying the task line (or its anchor with --by-id)
        description: String,

        /// New status: pending, in_progress or complete
        status: Status,

        /// Commit that completed the task
        #[arg(long, value_name = "SHA")]
        commit: Option<String>,

        /// Match on the task anchor instead of the description
        #[arg(long)]
        by_id: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "conductor=debug,info"
    } else {
        "conductor=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        if e.is_user_error() {
            eprintln!("{} {}", "Error:".yellow().bold(), e);
        } else {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
        }
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> conductor::Result<()> {
    let project_path = cli.project.canonicalize().unwrap_or(cli.project.clone());
    if !project_path.exists() {
        return Err(conductor::ConductorError::config_with_path(
            "Project directory does not exist",
            project_path,
        ));
    }

    let mut conductor = Conductor::open(&project_path)?;

    match cli.command {
        Commands::Setup => {
            let kind = conductor.detect_project_kind();
            println!(
                "{} Setting up conductor in {} ({})",
                "Info:".blue(),
                project_path.display(),
                kind
            );

            if let Some(state) = conductor.setup_state()? {
                println!(
                    "   Resuming after step: {}",
                    state.last_successful_step.cyan()
                );
            }

            conductor.create_directories()?;
            conductor.save_setup_state("directories")?;

            for path in conductor.scaffold_documents()? {
                println!("   {} {}", "created".green(), path.display());
            }
            conductor.save_setup_state("documents")?;

            println!("{} Conductor is set up", "Done:".green().bold());
        }

        Commands::Status { json } => {
            let report = conductor.project_status()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_status(&report);
            }
        }

        Commands::Tracks { json } => {
            let tracks = conductor.tracks()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tracks)?);
            } else if tracks.is_empty() {
                println!("No tracks found.");
            } else {
                for track in &tracks {
                    print_track(track);
                }
            }
        }

        Commands::NewTrack {
            description,
            track_type,
            phases,
        } => {
            let phases: Vec<PhaseTemplate> = phases.into_iter().map(PhaseTemplate::new).collect();
            let track_id = conductor.add_track(&description, track_type, &phases)?;
            println!("{} Created track {}", "Done:".green().bold(), track_id.cyan());
            println!("   {}", conductor.track_dir(&track_id).display());
        }

        Commands::TrackStatus {
            description,
            status,
            by_id,
        } => {
            let outcome = if by_id {
                conductor.update_track_status_by_anchor(&description, status)?
            } else {
                conductor.update_track_status(&description, status)?
            };
            report_outcome(&outcome, &description, status)?;
        }

        Commands::Tasks { track_id, json } => {
            let tasks = conductor.plan_tasks(&track_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks found for {}.", track_id);
            } else {
                print_tasks(&tasks);
            }
        }

        Commands::NextTask { track_id } => match conductor.next_pending_task(&track_id)? {
            Some(task) => {
                if let Some(phase) = &task.phase {
                    println!("{} {}", "Phase:".cyan().bold(), phase);
                }
                println!("{} {}", "Next:".cyan().bold(), task.description);
            }
            None => println!("No pending tasks for {}.", track_id),
        },

        Commands::TaskStatus {
            track_id,
            description,
            status,
            commit,
            by_id,
        } => {
            let outcome = if by_id {
                conductor.update_task_status_by_anchor(
                    &track_id,
                    &description,
                    status,
                    commit.as_deref(),
                )?
            } else {
                conductor.update_task_status(&track_id, &description, status, commit.as_deref())?
            };
            report_outcome(&outcome, &description, status)?;
        }
    }

    Ok(())
}

fn status_label(status: Status) -> colored::ColoredString {
    match status {
        Status::Pending => "[ ]".normal(),
        Status::InProgress => "[~]".yellow().bold(),
        Status::Complete => "[x]".green().bold(),
        Status::Unknown => "[?]".red(),
    }
}

fn print_track(track: &Track) {
    println!("{} {}", status_label(track.status), track.description);
    if let Some(link) = &track.link {
        println!("    {}", link.dimmed());
    }
}

fn print_tasks(tasks: &[Task]) {
    let progress = phase_progress(tasks);
    let mut current_phase: Option<&str> = None;
    for task in tasks {
        if task.phase.as_deref() != current_phase {
            current_phase = task.phase.as_deref();
            if let Some(phase) = current_phase {
                let counts = progress
                    .iter()
                    .find(|p| p.phase.as_deref() == Some(phase))
                    .map(|p| format!("({}/{})", p.completed, p.total))
                    .unwrap_or_default();
                println!("\n{} {}", phase.cyan().bold(), counts.dimmed());
            }
        }
        println!("  {} {}", status_label(task.status), task.description);
    }
}

fn print_status(report: &StatusReport) {
    if !report.setup_complete {
        println!(
            "{} {}",
            "Warning:".yellow().bold(),
            report.message.as_deref().unwrap_or_default()
        );
        return;
    }

    println!("\n{} Project Status", "Conductor:".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("   Tracks:      {}", report.tracks.total);
    println!("   Completed:   {}", report.tracks.completed);
    println!("   In progress: {}", report.tracks.in_progress);
    println!("   Pending:     {}", report.tracks.pending);
    println!("   Progress:    {:.0}%", report.progress_percentage);
    if let Some(track) = &report.current_track {
        println!();
        println!("   Current: {} {}", status_label(track.status), track.description);
    }
}

fn report_outcome(outcome: &UpdateOutcome, target: &str, status: Status) -> conductor::Result<()> {
    match outcome {
        UpdateOutcome::Updated { line } => {
            println!(
                "{} '{}' set to {} (line {})",
                "Updated:".green().bold(),
                target,
                status,
                line
            );
        }
        UpdateOutcome::Unchanged { .. } => {
            println!("'{}' is already {}", target, status);
        }
        UpdateOutcome::NoMatch => {
            println!("{} No status line matches '{}'", "Warning:".yellow().bold(), target);
            std::process::exit(1);
        }
        UpdateOutcome::MissingDocument => {
            println!("{} Document not found", "Warning:".yellow().bold());
            std::process::exit(1);
        }
        UpdateOutcome::InvalidStatus => {
            return Err(conductor::ConductorError::InvalidStatus {
                value: status.to_string(),
            });
        }
    }
    Ok(())
}
