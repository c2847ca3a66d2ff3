use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use procman::{Config, ProcError, ProcessManager, SystemUsers};
use std::path::PathBuf;
use std::process::ExitCode;
use ui::process_table::{filter_processes, ProcessTable, SortColumn};
use ui::status_bar::StatusBar;

mod logging;
mod ui;

#[derive(Parser)]
#[command(name = "procctl", version, about = "Inspect and signal Linux processes")]
struct Cli {
    /// Configuration file (default: $PROCMAN_CONFIG or <config dir>/procman/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List processes
    List {
        /// Only processes whose name or pid contains this text
        #[arg(long, default_value = "")]
        filter: String,
        /// Only processes owned by this uid (effective or real)
        #[arg(long)]
        uid: Option<u32>,
        #[arg(long, value_enum, default_value_t = SortColumn::Pid)]
        sort: SortColumn,
        #[arg(long)]
        desc: bool,
    },
    /// Show one process
    Info { pid: i32 },
    /// Show the environment of a process
    Env {
        pid: i32,
        /// Print a single variable, matched case-insensitively
        #[arg(long)]
        var: Option<String>,
    },
    /// Send a signal to one process
    Signal {
        pid: i32,
        /// Name or number, e.g. TERM, SIGKILL, hang-up, 9
        #[arg(short, long)]
        signal: Option<String>,
    },
    /// Signal every process with this name owned by a user
    Kill {
        /// Process name, or a suffix of the executable path
        #[arg(long, value_parser = non_blank)]
        name: String,
        #[arg(long, conflicts_with = "user", required_unless_present = "user")]
        uid: Option<u32>,
        #[arg(long)]
        user: Option<String>,
        #[arg(short, long)]
        signal: Option<String>,
    },
}

// An empty name would suffix-match every executable path
fn non_blank(value: &str) -> std::result::Result<String, String> {
    if value.trim().is_empty() {
        Err("must not be blank".to_string())
    } else {
        Ok(value.to_string())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("procctl: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    tracing::debug!(
        proc_root = %config.proc_root.display(),
        signal = %config.default_signal,
        "configuration loaded"
    );
    let manager = ProcessManager::from_config(&config);
    let signal_or_default = |signal: Option<String>| -> Result<i32> {
        let number = match signal {
            Some(s) => procman::parse_signal(&s)?,
            None => config.default_signal_number()?,
        };
        Ok(number)
    };

    match cli.command {
        Command::List {
            filter,
            uid,
            sort,
            desc,
        } => {
            let all = manager.processes()?;
            let total = all.len();
            let mut shown = filter_processes(all, &filter);
            if let Some(uid) = uid {
                shown.retain(|p| p.is_owned_by(uid));
            }
            let table = ProcessTable::new(sort, desc);
            table.sort(&mut shown);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                print!("{}", table.render(&shown));
                let uid = uid.unwrap_or_else(|| nix::unistd::getuid().as_raw());
                println!("{}", StatusBar::processes(total, &shown, uid));
            }
        }
        Command::Info { pid } => {
            let record = manager.read_record(pid)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print!("{}", ProcessTable::new(SortColumn::Pid, false).render(&[record]));
            }
        }
        Command::Env { pid, var: Some(name) } => match manager.environment_variable(pid, &name)? {
            Some(value) if cli.json => {
                println!("{}", serde_json::json!({ "name": name, "value": value }))
            }
            Some(value) => println!("{value}"),
            None => return Ok(ExitCode::FAILURE),
        },
        Command::Env { pid, var: None } => {
            let env = manager.read_environment(pid)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&env)?);
            } else {
                for (key, value) in env.iter() {
                    println!("{key}={value}");
                }
            }
        }
        Command::Signal { pid, signal } => {
            let signum = signal_or_default(signal)?;
            manager.send_signal(pid, signum)?;
        }
        Command::Kill {
            name,
            uid,
            user,
            signal,
        } => {
            let signum = signal_or_default(signal)?;
            let report = match (uid, user) {
                (Some(uid), _) => manager.kill_by_name(&name, uid, signum)?,
                (None, Some(user)) => {
                    manager.kill_by_user_name(&name, &user, signum, &SystemUsers)?
                }
                (None, None) => bail!("either --uid or --user is required"),
            };

            if cli.json {
                let failures: Vec<_> = report
                    .failures()
                    .map(|(r, e)| {
                        serde_json::json!({
                            "pid": r.pid(),
                            "name": r.name(),
                            "error": e.to_string(),
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "signal": report.signal,
                        "matched": report.matched(),
                        "delivered": report.delivered(),
                        "failures": failures,
                    })
                );
            } else {
                for (record, err) in report.failures() {
                    eprintln!("{} ({}): {}", record.pid(), record.name(), err);
                }
                if report.matched() > 0 {
                    println!("{}", StatusBar::bulk(&report));
                }
            }

            // Targets that exited on their own still count as handled
            if report.failures().any(|(_, e)| !matches!(e, ProcError::NotFound(_))) {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
