//! roster-runner: headless runner for the roster engine.
//!
//! Usage:
//!   roster-runner --db roster.db --date 2024-01-08
//!   roster-runner --config roster.json --ipc-mode
//!   roster-runner --ipc-mode --log-notifications   (log instead of storing)

use anyhow::Result;
use roster_core::{
    clock::{Clock, SystemClock},
    command::RosterCommand,
    config::RosterConfig,
    employee::PopulationFilter,
    notifier::{dispatch, LogNotifier, Notifier, StoreNotifier},
    service::ScheduleService,
    store::RosterStore,
};
use std::env;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let log_notifications = args.iter().any(|a| a == "--log-notifications");

    let mut config = match arg_value(&args, "--config") {
        Some(path) => RosterConfig::load(path)?,
        None => RosterConfig::default(),
    };
    if let Some(db) = arg_value(&args, "--db") {
        config.database = db.to_string();
    }
    if let Some(actor) = arg_value(&args, "--actor") {
        config.system_actor = actor.to_string();
    }

    let date = match arg_value(&args, "--date") {
        Some(d) => roster_core::dates::parse_date(d)?,
        None => SystemClock.now().date_naive(),
    };

    if !ipc_mode {
        println!("roster-runner");
        println!("  db:        {}", config.database);
        println!("  date:      {date}");
        println!();
    }

    let store = RosterStore::open(&config.database)?;
    store.migrate()?;
    let service = ScheduleService::new(store, SystemClock);

    if ipc_mode {
        run_ipc_loop(&service, &config, log_notifications)?;
    } else {
        print_summary(&service, date)?;
    }

    Ok(())
}

/// One JSON command per input line, one JSON response per output line.
fn run_ipc_loop(
    service: &ScheduleService,
    config: &RosterConfig,
    log_notifications: bool,
) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }
        if buffer.trim() == "quit" {
            break;
        }

        let store_notifier = StoreNotifier::new(service.store(), service.clock().now());
        let notifier: &dyn Notifier = if log_notifications {
            &LogNotifier
        } else {
            &store_notifier
        };
        let response = match handle_line(service, config, notifier, &buffer) {
            Ok(value) => value,
            Err(e) => {
                log::debug!("command failed: {e}");
                serde_json::json!({ "ok": false, "error": e.kind(), "message": e.to_string() })
            }
        };
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_line(
    service: &ScheduleService,
    config: &RosterConfig,
    notifier: &dyn Notifier,
    line: &str,
) -> roster_core::error::RosterResult<serde_json::Value> {
    let body: serde_json::Value = serde_json::from_str(line)?;
    let command = RosterCommand::from_json(body)?;
    let applied = service.execute(command)?;

    // The operation has committed; delivery problems are reported alongside
    // the result, not as a failure of it.
    let failures = dispatch(&applied.events, notifier, config);
    let undelivered: Vec<serde_json::Value> = failures
        .iter()
        .map(|f| serde_json::json!({ "category": f.event.category(), "error": f.error.to_string() }))
        .collect();

    Ok(serde_json::json!({
        "ok": true,
        "result": applied.value,
        "events": applied.events,
        "undelivered": undelivered,
    }))
}

fn print_summary(service: &ScheduleService, date: chrono::NaiveDate) -> Result<()> {
    let store = service.store();
    let employees = store.employee_count()?;
    let day = service.roster_day(&PopulationFilter::All, date)?;
    let pending = service.ledger().pending_employees(&PopulationFilter::All)?;

    println!("=== ROSTER SUMMARY ===");
    println!("  date:          {}", day.date);
    println!("  employees:     {employees}");
    println!("  on duty:       {}", day.on_duty.len());
    println!("  off duty:      {}", day.off_duty.len());
    println!("  unassigned:    {}", day.unassigned.len());
    println!("  pending conf.: {}", pending.len());
    println!("  notifications: {}", store.notification_count()?);

    if !day.on_duty.is_empty() {
        println!();
        println!("=== ON DUTY ===");
        for employee_id in &day.on_duty {
            let shift = store
                .get_shift(employee_id)?
                .map(|s| format!("{}-{}", s.start.format("%H:%M"), s.end.format("%H:%M")))
                .unwrap_or_else(|| "(no shift window)".into());
            println!("  {employee_id:<12} {shift}");
        }
    }
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
