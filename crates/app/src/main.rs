use std::fmt;
use std::sync::Arc;

use cbt_core::model::option_index;
use services::{AppConfig, AppServices, CatalogError, Clock, SessionEvent, SubmitTrigger};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{EnvFilter, fmt as log_fmt, layer::SubscriberExt, util::SubscriberInitExt};
use ui::vm::{
    DashboardVm, ExamCardVm, LOW_TIME_SECS, LoginForm, NO_RESULTS, Notice, QuoteVm, RegisterForm,
    ResultsVm, TestIntent, TestOutcome, TestScreenVm, apply_intent, auth_link_label,
    finished_results, format_countdown, logout_notice, map_exam_cards, submit_login, submit_register,
};
use ui::{AppContext, Route};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { command: &'static str, name: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { command, name } => {
                write!(f, "{command} requires <{name}>")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cbt register <username> <email> <password> <confirm-password>");
    eprintln!("  cbt login <username> <password>");
    eprintln!("  cbt logout");
    eprintln!("  cbt whoami");
    eprintln!("  cbt exams [--filter <category>] [--search <term>]");
    eprintln!("  cbt details <exam-id>");
    eprintln!("  cbt test <exam-id>");
    eprintln!("  cbt dashboard");
    eprintln!();
    eprintln!("Global options:");
    eprintln!("  --db <sqlite_url>   (default sqlite://cbt.sqlite3)");
    eprintln!();
    eprintln!("Environment (also read from .env):");
    eprintln!("  CBT_DB_URL, CBT_QUOTE_URL, CBT_QUOTE_TIMEOUT_MS, CBT_AVERAGE_POLICY,");
    eprintln!("  CBT_TEST_MINUTES, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Register {
        username: String,
        email: String,
        password: String,
        confirm: String,
    },
    Login {
        username: String,
        password: String,
    },
    Logout,
    Whoami,
    Exams {
        filter: Option<String>,
        search: Option<String>,
    },
    Details {
        exam: String,
    },
    Test {
        exam: String,
    },
    Dashboard,
}

struct Args {
    db_url: Option<String>,
    command: Command,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut args = args.into_iter();
        let mut db_url = None;
        let mut filter = None;
        let mut search = None;
        let mut positional = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(normalize_sqlite_url(value));
                }
                "--filter" => filter = Some(require_value(&mut args, "--filter")?),
                "--search" => search = Some(require_value(&mut args, "--search")?),
                "--help" | "-h" => return Ok(None),
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let Some(name) = positional.next() else {
            return Ok(None);
        };
        let mut take = |command: &'static str, field: &'static str| {
            positional.next().ok_or(ArgsError::MissingArgument {
                command,
                name: field,
            })
        };

        let command = match name.as_str() {
            "register" => Command::Register {
                username: take("register", "username")?,
                email: take("register", "email")?,
                password: take("register", "password")?,
                confirm: take("register", "confirm-password")?,
            },
            "login" => Command::Login {
                username: take("login", "username")?,
                password: take("login", "password")?,
            },
            "logout" => Command::Logout,
            "whoami" => Command::Whoami,
            "exams" => Command::Exams { filter, search },
            "details" => Command::Details {
                exam: take("details", "exam-id")?,
            },
            "test" => Command::Test {
                exam: take("test", "exam-id")?,
            },
            "dashboard" => Command::Dashboard,
            _ => return Err(ArgsError::UnknownCommand(name)),
        };
        if let Some(extra) = positional.next() {
            return Err(ArgsError::UnknownArg(extra));
        }

        Ok(Some(Self { db_url, command }))
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // stderr keeps logs out of the interactive test screen.
    tracing_subscriber::registry()
        .with(filter)
        .with(log_fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

//
// ─── OUTPUT ────────────────────────────────────────────────────────────────────
//

fn toast(ctx: &AppContext, notice: Notice) {
    ctx.notify(notice);
    if let Some(toast) = ctx.current_toast() {
        println!("[{:?}] {}", toast.notice.kind, toast.notice.message);
    }
}

fn navigate(route: &Route) {
    println!("-> {}", route.to_path());
}

fn print_cards(cards: &[ExamCardVm]) {
    if cards.is_empty() {
        println!("{NO_RESULTS}");
        return;
    }
    for card in cards {
        println!("{:<20} [{}] {} ({})", card.id, card.badge, card.title, card.difficulty);
        println!(
            "    {} | {} | {} | {}",
            card.duration, card.questions, card.popularity, card.subject
        );
        println!("    {}", card.description);
    }
}

fn print_screen(vm: &TestScreenVm) {
    println!();
    println!("{}  {}  [{}{}]", vm.title, vm.counter, vm.timer, if vm.timer_low { " !" } else { "" });
    if let Some(passage) = &vm.passage {
        println!("({passage})");
    }
    println!("{}", vm.prompt);
    for option in &vm.options {
        let mark = if option.selected { '*' } else { ' ' };
        println!(" {mark} {}", option.label);
    }
    let palette: Vec<String> = vm
        .palette
        .iter()
        .map(|b| match (b.current, b.answered) {
            (true, _) => format!("[{}]", b.number),
            (false, true) => format!("{}*", b.number),
            (false, false) => b.number.to_string(),
        })
        .collect();
    println!("Answered: {}  Palette: {}", vm.answered_count, palette.join(" "));
    let mut keys = vec!["a-e select"];
    if !vm.prev_disabled {
        keys.push("p previous");
    }
    if vm.show_next {
        keys.push("n next");
    }
    keys.extend(["g <n> jump", "s submit", "q quit"]);
    println!("{}", keys.join(", "));
}

fn print_results(results: &ResultsVm) {
    println!();
    println!("Score: {}  Correct: {}  Time: {}", results.percentage, results.fraction, results.time_spent);
    for line in &results.review {
        let mark = if line.is_correct { "correct" } else { "wrong" };
        println!("{}. {} ({mark})", line.number, line.prompt);
        println!("   your answer: {}", line.chosen);
        println!("   correct:     {}", line.correct);
        println!("   {}", line.explanation);
    }
}

fn parse_intent(line: &str) -> Option<TestIntent> {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    match (parts.next()?, parts.next()) {
        ("n", None) => Some(TestIntent::Next),
        ("p", None) => Some(TestIntent::Previous),
        ("s", None) => Some(TestIntent::Submit),
        ("g", Some(n)) => n
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .map(TestIntent::Jump),
        (letter, None) if letter.chars().count() == 1 => letter
            .chars()
            .next()
            .and_then(option_index)
            .map(TestIntent::Select),
        _ => None,
    }
}

//
// ─── COMMANDS ──────────────────────────────────────────────────────────────────
//

async fn run_test(ctx: &AppContext, exam: &str) -> Result<(), Box<dyn std::error::Error>> {
    let auth = ctx.app().auth();
    match ctx.app().catalog().start_exam(&auth, exam).await {
        Ok(launch) => toast(ctx, Notice::info(format!("Starting {}...", launch.title))),
        Err(CatalogError::NotAuthenticated) => {
            toast(ctx, Notice::warning(CatalogError::NotAuthenticated.to_string()));
            return Ok(());
        }
        Err(CatalogError::UnknownExam(_)) => {}
        Err(err) => return Err(err.into()),
    }

    let controller = match ctx.enter_test(Some(exam)) {
        Ok(controller) => controller,
        Err(route) => {
            if let Some(t) = ctx.current_toast() {
                println!("[{:?}] {}", t.notice.kind, t.notice.message);
            }
            navigate(&route);
            return Ok(());
        }
    };

    let mut events = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_screen(&TestScreenVm::from(&controller.snapshot()));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    controller.abandon();
                    break;
                };
                if line.trim() == "q" {
                    controller.abandon();
                    println!("Test abandoned.");
                    break;
                }
                let Some(intent) = parse_intent(&line) else {
                    println!("?");
                    continue;
                };
                match apply_intent(&controller, intent).await {
                    Ok(TestOutcome::Finished(results)) => {
                        print_results(&results);
                        break;
                    }
                    Ok(TestOutcome::Continue) => {
                        print_screen(&TestScreenVm::from(&controller.snapshot()));
                    }
                    Err(err) => {
                        println!("{err}");
                        if let Some(results) = finished_results(&controller) {
                            print_results(&results);
                            break;
                        }
                    }
                }
            }
            event = events.recv() => match event {
                Ok(SessionEvent::Submitted { trigger: SubmitTrigger::TimerExpired, .. }) => {
                    println!("Time is up!");
                    if let Some(results) = finished_results(&controller) {
                        print_results(&results);
                    }
                    break;
                }
                Ok(SessionEvent::Tick { remaining_secs })
                    if remaining_secs == LOW_TIME_SECS || remaining_secs == 60 =>
                {
                    println!("{} remaining", format_countdown(remaining_secs));
                }
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            }
        }
    }
    Ok(())
}

async fn run_dashboard(ctx: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    let dashboard = ctx.app().dashboard();
    let snapshot = dashboard.load().await?;
    let vm = DashboardVm::from(&snapshot);

    println!("Student: {}", vm.student_name.as_deref().unwrap_or("Guest"));
    println!(
        "Tests completed: {}  Average: {}  Study time: {}  Streak: {}",
        vm.stats.tests_completed, vm.stats.average_score, vm.stats.study_time, vm.stats.study_streak
    );
    for chart in [&vm.subject_chart, &vm.progress_chart] {
        let points: Vec<String> = chart
            .labels
            .iter()
            .zip(chart.datasets.first().map(|d| d.data.as_slice()).unwrap_or_default())
            .map(|(label, value)| format!("{label} {value}{}", chart.tick_suffix))
            .collect();
        println!("{}: {}", chart.title, points.join(", "));
    }
    println!("Areas to improve:");
    for area in &vm.improvement {
        println!("  {} - {} ({})", area.subject, area.topic, area.score);
    }
    println!("Recent activity:");
    for item in &vm.activity {
        let score = item.score.as_deref().unwrap_or("");
        println!("  {} {} {score} ({})", item.icon, item.headline, item.when);
    }

    let quote = QuoteVm::from(&dashboard.quote().await);
    println!("{}", quote.heading);
    println!("  {}", quote.text);
    println!("  {}", quote.cite);
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let Some(args) = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?
    else {
        print_usage();
        return Ok(());
    };

    let config = AppConfig::from_env();
    let db_url = args
        .db_url
        .unwrap_or_else(|| normalize_sqlite_url(config.db_url.clone()));
    let config = config.with_db_url(db_url);

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&config.db_url)?;
    let clock = Clock::default_clock();
    let services = AppServices::new_sqlite(config, clock).await?;
    let ctx = AppContext::new(Arc::new(services), clock);
    let auth = ctx.app().auth();

    match args.command {
        Command::Register {
            username,
            email,
            password,
            confirm,
        } => {
            let form = RegisterForm {
                username,
                email,
                password,
                confirm_password: confirm,
            };
            let outcome = submit_register(&auth, &form).await?;
            toast(&ctx, outcome.notice);
        }
        Command::Login { username, password } => {
            let outcome = submit_login(&auth, &LoginForm { username, password }).await?;
            toast(&ctx, outcome.notice);
            if let Some(route) = outcome.redirect {
                navigate(&route);
            }
        }
        Command::Logout => {
            auth.logout().await?;
            toast(&ctx, logout_notice());
        }
        Command::Whoami => {
            let session = auth.current_user().await?;
            println!("{}", auth_link_label(session.as_ref()));
            ctx.greet().await?;
            if let Some(t) = ctx.current_toast() {
                println!("[{:?}] {}", t.notice.kind, t.notice.message);
            }
        }
        Command::Exams { filter, search } => {
            let catalog = ctx.app().catalog();
            let mut visible = catalog.apply_filter(filter.as_deref().unwrap_or("all"));
            if let Some(term) = search {
                visible = catalog.search(&term);
            }
            print_cards(&map_exam_cards(&visible));
        }
        Command::Details { exam } => match ctx.app().catalog().exam_details(&exam) {
            Ok(details) => toast(&ctx, Notice::info(details)),
            Err(err) => toast(&ctx, Notice::error(err.to_string())),
        },
        Command::Test { exam } => run_test(&ctx, &exam).await?,
        Command::Dashboard => run_dashboard(&ctx).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "command failed");
        eprintln!("{err}");
        std::process::exit(2);
    }
}
