use std::env;
use std::error::Error;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use helmet_monitor::analysis::filter::{parse_day, EventFilter};
use helmet_monitor::config::{self, MonitorConfig};
use helmet_monitor::logging::{self, Component};
use helmet_monitor::model::{Event, EventStatus, HelmetError};
use helmet_monitor::repository::Repository;
use helmet_monitor::session::SessionStore;
use helmet_monitor::verify;
use helmet_monitor::views::{
    self, load_profile, Dashboard, EventHistory, Navigation, ProfileOutcome, Route, WorkerDirectory,
};

const USAGE: &str = "\
usage: helmet_monitor <command> [args]

  login <email> <password>     start a supervisor session
  logout                       end the session
  watch [worker-id] [ticks]    live dashboard for one worker
  workers [term]               worker directory, searched by name or id
  profile <worker-id>          helmet, vitals and recent events
  events [status] [from] [to]  first page of the event log
  ack <event-id>               acknowledge a new event
  resolve <event-id>           resolve an open event
  verify                       feed self-check, JSON report";

fn main() {
    if let Err(e) = run() {
        eprintln!("✗ {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = config::load()?;
    logging::init_logger(config.log_level()?, config.logging.file.as_deref(), config.logging.timestamps);

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("watch");
    let rest = args.get(1..).unwrap_or_default();

    let mut sessions = SessionStore::new(config.session_file.as_deref());
    // Same seed every run so event ids listed by `events` still name the
    // same events for a later `ack` or `resolve`.
    let repo = Arc::new(Repository::seeded(&config.with_stable_seed()));

    match command {
        "login" => {
            let (Some(email), Some(password)) = (rest.first(), rest.get(1)) else {
                return Err(USAGE.into());
            };
            let user = sessions.login(email, password)?;
            println!("Logged in as {} ({})", user.name, user.email);
            return Ok(());
        }
        "logout" => {
            sessions.logout()?;
            println!("Logged out");
            return Ok(());
        }
        "help" | "--help" | "-h" => {
            println!("{}", USAGE);
            return Ok(());
        }
        _ => {}
    }

    let route = match command {
        "watch" | "verify" => Route::Dashboard,
        "workers" => Route::Workers,
        "profile" => Route::WorkerProfile(rest.first().cloned().unwrap_or_default()),
        "events" | "ack" | "resolve" => Route::Events,
        other => return Err(format!("unknown command '{}'\n\n{}", other, USAGE).into()),
    };
    if views::authorize(route, sessions.current_session()) == Route::Login {
        println!("Not logged in. Run: helmet_monitor login <email> <password>");
        return Ok(());
    }
    let actor = sessions.acting_supervisor(&config.supervisor_name);

    match command {
        "watch" => watch(repo, &config, rest.first(), rest.get(1)),
        "workers" => workers(repo, rest.first()),
        "profile" => profile(&repo, &config, rest.first()),
        "events" => events(repo, &config, rest),
        "ack" | "resolve" => {
            let status = if command == "ack" {
                EventStatus::Acknowledged
            } else {
                EventStatus::Resolved
            };
            transition(repo, &config, rest.first(), status, &actor)
        }
        _ => verify_feed(&repo, &config),
    }
}

fn watch(
    repo: Arc<Repository>,
    config: &MonitorConfig,
    worker_id: Option<&String>,
    ticks: Option<&String>,
) -> Result<(), Box<dyn Error>> {
    let ticks: usize = match ticks {
        Some(t) => t.parse().map_err(|_| format!("ticks must be a number, got '{}'", t))?,
        None => 6,
    };

    let mut dashboard = Dashboard::new(repo, config.poll_interval()).with_stale_after(config.stale_after_secs);
    dashboard.open();
    if let Some(id) = worker_id {
        dashboard.select_worker(id)?;
    }

    logging::info(
        Component::Monitor,
        dashboard.selected().map(|w| w.id.as_str()),
        &format!("Watching for {} polls every {}s", ticks, config.poll_interval_secs),
    );
    print!("{}", dashboard.render());

    // Allow one slow accessor call on top of the poll interval.
    let wait = config.poll_interval() + config.simulated_latency() + Duration::from_secs(1);
    for _ in 0..ticks {
        if dashboard.wait_for_update(wait) {
            println!();
            print!("{}", dashboard.render());
        }
    }

    dashboard.close();
    Ok(())
}

fn workers(repo: Arc<Repository>, term: Option<&String>) -> Result<(), Box<dyn Error>> {
    let mut directory = WorkerDirectory::new(repo);
    directory.open();
    if let Some(term) = term {
        directory.set_search(term);
    }
    print!("{}", directory.render());
    Ok(())
}

fn profile(repo: &Repository, config: &MonitorConfig, worker_id: Option<&String>) -> Result<(), Box<dyn Error>> {
    let worker_id = worker_id.ok_or(USAGE)?;
    let profile = match load_profile(repo, repo, worker_id, config.recent_events) {
        ProfileOutcome::Loaded(profile) => profile,
        ProfileOutcome::Redirect(route) => {
            println!("Worker {} not found, back to {}", worker_id, route.path());
            return Ok(());
        }
    };

    let worker = &profile.worker;
    println!("{} | {} | {} | helmet {}", worker.name, worker.department, worker.position, worker.helmet_id);
    if let Some(helmet) = &profile.helmet {
        let disconnected = profile.helmet_disconnected_at(config.stale_after_secs, chrono::Utc::now());
        println!(
            "  helmet {:?}, battery {}%{}",
            helmet.status,
            helmet.battery_level,
            if disconnected { ", not reporting" } else { "" }
        );
    }
    for (kind, badge) in profile.badges() {
        println!("  {:<12} [{} / {}]", kind.title(), badge.label, badge.level.color());
    }
    for alert in profile.alerts() {
        println!("  ! {}: {}", alert.kind.title(), alert.description);
    }
    if let Some(summary) = profile.heart_rate_summary() {
        println!(
            "  heart rate over window: min {:.0} / mean {:.0} / max {:.0} bpm",
            summary.min, summary.mean, summary.max
        );
    }
    println!("  recent events:");
    for event in &profile.recent_events {
        println!(
            "    {} {} {} {}",
            event.id,
            event.event_type.label(),
            event.status.label(),
            event.timestamp.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

fn events(repo: Arc<Repository>, config: &MonitorConfig, args: &[String]) -> Result<(), Box<dyn Error>> {
    let mut filter = EventFilter::default();
    if let Some(code) = args.first() {
        let status = EventStatus::from_code(code)
            .ok_or_else(|| HelmetError::InvalidFilter(format!("unknown status '{}'", code)))?;
        filter = filter.with_status(status);
    }
    if let Some(from) = args.get(1) {
        filter = filter.from_day(parse_day(from)?);
    }
    if let Some(to) = args.get(2) {
        filter = filter.to_day(parse_day(to)?);
    }

    let mut history = EventHistory::new(repo.clone(), repo, config.page_size);
    history.open();
    history.apply_filters(filter);
    print!("{}", history.render());
    Ok(())
}

fn transition(
    repo: Arc<Repository>,
    config: &MonitorConfig,
    event_id: Option<&String>,
    status: EventStatus,
    actor: &str,
) -> Result<(), Box<dyn Error>> {
    let event_id = event_id.ok_or(USAGE)?;
    let mut history = EventHistory::new(repo.clone(), repo, config.page_size);
    history.open();

    if let Some(event) = history.event(event_id) {
        println!("before: {}", describe_event(event));
        if !history.offers(event_id, status) {
            println!(
                "Event {} is already {}; {} is not offered",
                event_id,
                event.status.label().to_lowercase(),
                status.label().to_lowercase()
            );
            return Ok(());
        }
    }

    let outcome = match status {
        EventStatus::Acknowledged => history.acknowledge(event_id, actor),
        _ => history.resolve(event_id, actor),
    };
    match outcome {
        Navigation::Stay => match history.event(event_id) {
            Some(event) if event.status == status => println!("after:  {}", describe_event(event)),
            _ => println!("Event {} was not changed", event_id),
        },
        Navigation::Redirect(route) => println!("Event {} not found, back to {}", event_id, route.path()),
    }
    Ok(())
}

fn describe_event(event: &Event) -> String {
    let resolution = match (&event.resolved_by, event.resolved_at) {
        (Some(by), Some(at)) => format!(" by {} at {}", by, at.format("%Y-%m-%d %H:%M")),
        _ => String::new(),
    };
    format!(
        "{} {} {} worker {} {}{}",
        event.id,
        event.event_type.label(),
        event.severity.label(),
        event.worker_id,
        event.status.label(),
        resolution
    )
}

fn verify_feed(repo: &Repository, config: &MonitorConfig) -> Result<(), Box<dyn Error>> {
    let report = verify::run_full_verification(repo, config.history_window)?;
    verify::print_summary(&report);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
