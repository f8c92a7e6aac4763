//! Terminal output helpers

use colored::{ColoredString, Colorize};
use jobwatch_core::domain::job::{JobState, JobStatus, JobSummary};

/// Print a job summary line
pub fn print_job_summary(job: &JobSummary) {
    println!("  {} {}", "▸".cyan(), job.name.bold());
    println!("    ID:     {}", job.id.dimmed());
    if let Some(state) = &job.state {
        println!("    State:  {}", colorize_state(state));
    }
    println!();
}

/// Print a status snapshot with its metadata
pub fn print_status(status: &JobStatus) {
    println!("{}", "Job Status:".bold());
    if let Some(id) = &status.id {
        println!("  ID:     {}", id.cyan());
    }
    println!("  State:  {}", colorize_state(&status.state));

    if !status.metadata.is_empty() {
        println!("\n{}", "Metadata:".bold());
        match serde_json::to_string_pretty(&status.metadata) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{:?}", status.metadata),
        }
    }
}

/// Colorize a job state for display
pub fn colorize_state(state: &JobState) -> ColoredString {
    let label = state.as_str();
    match state {
        JobState::Pending => label.yellow(),
        JobState::Running => label.cyan(),
        JobState::Done => label.green(),
        JobState::Failed => label.red(),
        JobState::Cancelled => label.dimmed(),
        JobState::Other(_) => label.normal(),
    }
}
