use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use flowtrack_core::calendar::{CalendarCell, MonthCursor};
use flowtrack_core::domain::{LoadSource, Priority, Task, TaskExtras};
use flowtrack_core::observability::init_tracing;
use flowtrack_core::plan::{DailyPlan, focus_list, search};
use flowtrack_core::ports::FixedClock;
use flowtrack_core::{AppBuilder, Error, PlannerConfig, SyncOutcome};

#[derive(Parser)]
#[command(name = "flowtrack", version, about = "Task planner: calendar, focus list and daily plan")]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretend today is this date (YYYY-MM-DD).
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a month grid with the tasks on each day.
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        /// 1 = January.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
    /// Print today's plan.
    Plan {
        #[arg(long)]
        json: bool,
    },
    /// All tasks by priority, optionally filtered by title.
    Focus {
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Add a task and wait for the store to confirm it.
    Add {
        title: String,
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long)]
        reminder: Option<String>,
    },
    /// Flip a task between pending and completed.
    Toggle { id: String },
    Delete { id: String },
    /// Completed/total and sync counts.
    Counts,
    /// Cache an assistant reply so its numbered tips feed the daily plan.
    Advice {
        #[arg(long)]
        message: String,
        #[arg(long)]
        response: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    let config = PlannerConfig::load(cli.config.as_deref())?;
    init_tracing(&config.log_filter);

    let mut builder = AppBuilder::from_config(config);
    if let Some(today) = cli.today {
        builder = builder.clock(Arc::new(FixedClock::on(today)));
    }
    let app = builder.build()?;
    tracing::debug!(plan_size = app.config.plan_size, "app ready");

    if app.store.load().await == LoadSource::Demo {
        eprintln!("(showing demo tasks)");
    }

    match cli.command {
        Command::Calendar { year, month } => {
            let today = app.store.today();
            let cursor = match (year, month) {
                (None, None) => app.current_month(),
                (year, month) => MonthCursor::new(
                    year.unwrap_or(app.current_month().year()),
                    month.map(|m| m - 1).unwrap_or(app.current_month().month()),
                ),
            };
            let tasks = app.store.tasks().await;
            print_calendar(cursor, &tasks, today);
        }
        Command::Plan { json } => {
            let plan = app.daily_plan().await;
            if json {
                print_json(&plan)?;
            } else {
                print_plan(&plan);
            }
        }
        Command::Focus { query, json } => {
            let tasks = app.store.tasks().await;
            let listed = match query.as_deref() {
                Some(query) => search(&tasks, query),
                None => focus_list(&tasks),
            };
            if json {
                print_json(&listed)?;
            } else {
                for task in listed {
                    print_task(task);
                }
            }
        }
        Command::Add {
            title,
            date,
            priority,
            time,
            deadline,
            reminder,
        } => {
            let extras = TaskExtras {
                time,
                deadline,
                reminder,
            };
            let added = app.store.add(&title, priority, &date, extras).await?;
            println!("added {} (id={})", title.trim(), added.id);
            match added.sync.settled().await {
                SyncOutcome::Confirmed(id) => println!("saved as {id}"),
                SyncOutcome::Failed(err) => println!("not saved: {err}"),
                other => println!("sync: {other:?}"),
            }
        }
        Command::Toggle { id: raw } => {
            let Some(id) = app.store.resolve(&raw).await else {
                println!("no task with id {raw}");
                return Ok(());
            };
            if let Some((status, sync)) = app.store.toggle(&id).await {
                println!("{id}: {}", status.label());
                report(sync.settled().await);
            }
        }
        Command::Delete { id: raw } => {
            let Some(id) = app.store.resolve(&raw).await else {
                println!("no task with id {raw}");
                return Ok(());
            };
            if let Some(sync) = app.store.delete(&id).await {
                println!("deleted {id}");
                report(sync.settled().await);
            }
        }
        Command::Counts => {
            let counts = app.store.counts().await;
            println!(
                "{} done | {} pending | {} unsaved | {} failed",
                counts.progress_label(),
                counts.pending,
                counts.local,
                counts.failed
            );
        }
        Command::Advice { message, response } => {
            let state = app.record_advice(&message, &response)?;
            println!(
                "recorded {:?} advice with {} tips",
                state.last_action, state.latest_tips.len()
            );
        }
    }
    Ok(())
}

fn report(outcome: SyncOutcome) {
    match outcome {
        SyncOutcome::Synced => println!("synced"),
        SyncOutcome::Skipped => println!("local only"),
        SyncOutcome::Failed(err) => println!("sync failed: {err}"),
        other => println!("sync: {other:?}"),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_task(task: &Task) {
    println!(
        "[{:<13}] {:<24} {}  {:<9} id={}",
        task.priority.label(),
        task.title,
        task.date,
        task.status.label(),
        task.id
    );
}

fn print_plan(plan: &DailyPlan) {
    match plan {
        DailyPlan::Empty => println!("Nothing pending. Enjoy the free time."),
        DailyPlan::Ready(items) => {
            for (n, item) in items.iter().enumerate() {
                println!("{}. {} ({})", n + 1, item.title, item.deadline);
                println!("   tip: {}", item.tip);
            }
        }
    }
}

fn print_calendar(cursor: MonthCursor, tasks: &[Task], today: NaiveDate) {
    let cells = cursor.layout(tasks, today);
    println!("{:^28}", cursor.title());
    println!(" Su  Mo  Tu  We  Th  Fr  Sa");

    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        match cell {
            CalendarCell::Empty => line.push_str("    "),
            CalendarCell::Day(day) => {
                let mark = if day.is_today {
                    '*'
                } else if !day.tasks.is_empty() {
                    '+'
                } else {
                    ' '
                };
                line.push_str(&format!("{:>3}{mark}", day.day));
            }
        }
        if i % 7 == 6 {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }

    for day in cells.iter().filter_map(CalendarCell::as_day) {
        for task in &day.tasks {
            println!("{}  {}", day.date, task.title);
        }
    }
}
