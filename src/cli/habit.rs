//! Habit CLI commands

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use super::output::Output;
use crate::domain::{CompletionKind, TrackerError};
use crate::storage::{Applied, DisplayConfig, HabitStore};

pub fn add(store: &mut HabitStore, output: &Output, name: &str) -> Result<()> {
    let applied = store.add_habit(name)?;
    report_unsaved(output, &applied);

    if output.is_json() {
        output.data(&serde_json::json!({
            "name": applied.value.as_str(),
            "streak": 0,
            "saved": applied.is_saved(),
        }));
    } else {
        output.success(&format!("Added habit: {}", applied.value));
    }

    Ok(())
}

pub fn delete(store: &mut HabitStore, output: &Output, name: &str, yes: bool) -> Result<()> {
    let name = name.trim();

    // Only prompt for habits that exist.
    if store.state().habit(name).is_none() {
        return Err(TrackerError::HabitNotFound(name.to_string()).into());
    }

    if !yes && !confirm(&format!("Delete '{}'? Its streak will be lost.", name))? {
        output.notice("Cancelled");
        return Ok(());
    }

    let applied = store.delete_habit(name)?;
    report_unsaved(output, &applied);
    output.verbose_ctx(
        "delete",
        &format!("Removed '{}' with streak {}", name, applied.value.streak()),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "name": name,
            "deleted": true,
            "streak": applied.value.streak(),
            "saved": applied.is_saved(),
        }));
    } else {
        output.success(&format!("Deleted habit: {}", name));
    }

    Ok(())
}

pub fn done(store: &mut HabitStore, output: &Output, name: &str, today: NaiveDate) -> Result<()> {
    let name = name.trim();

    let applied = match store.mark_done(name, today) {
        Ok(applied) => applied,
        Err(err @ TrackerError::AlreadyCompletedToday { .. }) => {
            output.verbose_ctx("done", "Already completed, nothing changed");
            output.notice(&err.to_string());
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    report_unsaved(output, &applied);

    let completion = &applied.value;
    let lifelines = store.state().lifelines();
    output.verbose_ctx(
        "done",
        &format!("'{}' classified as {:?}", completion.name, completion.kind),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "name": completion.name,
            "date": today,
            "kind": completion.kind,
            "streak": completion.streak,
            "lifelines_earned": completion.lifelines_earned,
            "lifelines": lifelines,
            "lifeline_interval": completion.lifeline_interval,
            "saved": applied.is_saved(),
        }));
        return Ok(());
    }

    match completion.kind {
        CompletionKind::Continued => {
            output.success(&format!(
                "Marked '{}' done on {}: streak {}",
                completion.name, today, completion.streak
            ));
            if completion.lifelines_earned > 0 {
                output.success(&format!("Earned a lifeline! Lifelines: {}", lifelines));
            }
        }
        CompletionKind::Broken => {
            output.success(&format!(
                "Streak broken for '{}': back to 1. Lifeline interval is now {}",
                completion.name, completion.lifeline_interval
            ));
        }
    }

    Ok(())
}

pub fn list(store: &HabitStore, output: &Output, display: &DisplayConfig) {
    if output.is_json() {
        output.data(&store.snapshot());
        return;
    }

    let state = store.state();
    if state.is_empty() {
        println!("No habits");
    } else {
        println!("{:<24} {:<12} {:<6} STREAK", "NAME", "LAST DONE", "NEXT");
        println!("{}", "-".repeat(60));

        for (name, habit) in state.habits() {
            let last = habit
                .last_completed()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "never".to_string());
            println!(
                "{:<24} {:<12} {:<6} {}",
                name.as_str(),
                last,
                habit.next_reward_in(state.lifeline_interval()),
                display.streak_bar(habit.streak())
            );
        }
    }

    println!();
    println!("Lifelines: {}", state.lifelines());
}

pub fn status(store: &HabitStore, output: &Output) {
    let state = store.state();

    if output.is_json() {
        output.data(&serde_json::json!({
            "habits": state.len(),
            "lifelines": state.lifelines(),
            "fails": state.fails(),
            "lifeline_interval": state.lifeline_interval(),
            "data_file": store.file().path().display().to_string(),
        }));
        return;
    }

    println!("Habits:            {}", state.len());
    println!("Lifelines:         {}", state.lifelines());
    println!("Fails:             {}", state.fails());
    println!("Lifeline interval: {}", state.lifeline_interval());
    println!("State file:        {}", store.file().path().display());
}

fn report_unsaved<T>(output: &Output, applied: &Applied<T>) {
    if let Some(err) = &applied.save_error {
        output.warn(&format!("Could not save changes, they will be retried: {:#}", err));
    }
}

/// Asks a yes/no question on stderr; anything but y/yes is a no
fn confirm(question: &str) -> Result<bool> {
    eprint!("{} [y/N] ", question);
    io::stderr().flush().context("Failed to write prompt")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
