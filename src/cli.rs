//! # Command-Line Interface / 命令行接口
//!
//! Builds the `release-matrix` command tree with `clap` and dispatches to the
//! command implementations. Help texts are localized, so the language is
//! resolved before the parser is built.
//!
//! 使用 `clap` 构建 `release-matrix` 命令树并分发到各命令实现。
//! 帮助文本已本地化，因此在构建解析器之前先确定语言。

pub mod commands;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::core::config::DEFAULT_CONFIG_FILE;
use crate::core::trigger::TriggerEvent;
use crate::infra::t;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for `--lang <VALUE>` or `--lang=<VALUE>`.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter().enumerate().find_map(|(pos, arg)| {
        if arg == "--lang" {
            args.get(pos + 1).cloned()
        } else {
            arg.strip_prefix("--lang=").map(str::to_string)
        }
    })
}

fn config_arg(locale: &str) -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .help(t!("arg_config", locale = locale).to_string())
        .value_name("CONFIG")
        .default_value(DEFAULT_CONFIG_FILE)
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

pub fn build_cli(locale: &str) -> Command {
    Command::new("release-matrix")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cmd_run_about", locale = locale).to_string())
                .arg(config_arg(locale))
                .arg(
                    Arg::new("project-dir")
                        .long("project-dir")
                        .help(t!("arg_project_dir", locale = locale).to_string())
                        .value_name("PROJECT_DIR")
                        .default_value(".")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("max-parallel")
                        .short('p')
                        .long("max-parallel")
                        .help(t!("arg_max_parallel", locale = locale).to_string())
                        .value_name("N")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .help(t!("arg_jobs", locale = locale).to_string())
                        .value_name("JOBS")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("total-runners")
                        .long("total-runners")
                        .help(t!("arg_total_runners", locale = locale).to_string())
                        .value_name("TOTAL_RUNNERS")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set)
                        .requires("runner-index"),
                )
                .arg(
                    Arg::new("runner-index")
                        .long("runner-index")
                        .help(t!("arg_runner_index", locale = locale).to_string())
                        .value_name("RUNNER_INDEX")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set)
                        .requires("total-runners"),
                )
                .arg(
                    Arg::new("event")
                        .long("event")
                        .help(t!("arg_event", locale = locale).to_string())
                        .value_name("EVENT")
                        .value_parser(["push", "pull-request", "manual"])
                        .default_value("manual")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("branch")
                        .long("branch")
                        .help(t!("arg_branch", locale = locale).to_string())
                        .value_name("BRANCH")
                        .required_if_eq_any([("event", "push"), ("event", "pull-request")])
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help(t!("arg_html", locale = locale).to_string())
                        .value_name("HTML")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("release-info")
                .about(t!("cmd_release_info_about", locale = locale).to_string())
                .arg(config_arg(locale))
                .arg(
                    Arg::new("stamp")
                        .long("stamp")
                        .help(t!("arg_stamp", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("check")
                        .long("check")
                        .help(t!("arg_check", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help(t!("arg_json", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("check-runtime")
                .about(t!("cmd_check_runtime_about", locale = locale).to_string())
                .arg(config_arg(locale))
                .arg(
                    Arg::new("version")
                        .help(t!("arg_runtime_version", locale = locale).to_string())
                        .value_name("VERSION")
                        .required_unless_present("probe")
                        .conflicts_with("probe")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("probe")
                        .long("probe")
                        .help(t!("arg_probe", locale = locale).to_string())
                        .value_name("COMMAND")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("no-deprecation-warning")
                        .long("no-deprecation-warning")
                        .help(t!("arg_no_deprecation_warning", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("arg_non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn trigger_event(matches: &ArgMatches) -> TriggerEvent {
    let branch = matches.get_one::<String>("branch").cloned().unwrap_or_default();
    match matches.get_one::<String>("event").map(String::as_str) {
        Some("push") => TriggerEvent::Push { branch },
        Some("pull-request") => TriggerEvent::PullRequest { base: branch },
        _ => TriggerEvent::Manual,
    }
}

fn path_arg(matches: &ArgMatches, id: &str) -> PathBuf {
    matches.get_one::<PathBuf>(id).cloned().unwrap_or_default()
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let explicit_language = pre_parse_language();
    let language = explicit_language
        .as_deref()
        .map(crate::resolve_locale)
        .unwrap_or_else(crate::detect_locale);
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            commands::run::execute(commands::run::RunArgs {
                config: path_arg(run_matches, "config"),
                project_dir: path_arg(run_matches, "project-dir"),
                max_parallel: run_matches.get_one::<usize>("max-parallel").copied(),
                jobs: run_matches.get_one::<usize>("jobs").copied(),
                total_runners: run_matches.get_one::<usize>("total-runners").copied(),
                runner_index: run_matches.get_one::<usize>("runner-index").copied(),
                event: trigger_event(run_matches),
                html: run_matches.get_one::<PathBuf>("html").cloned(),
                language: explicit_language,
            })
            .await?;
        }
        Some(("release-info", info_matches)) => {
            commands::release_info::execute(
                &path_arg(info_matches, "config"),
                info_matches.get_flag("stamp"),
                info_matches.get_flag("check"),
                info_matches.get_flag("json"),
                &language,
            )?;
        }
        Some(("check-runtime", check_matches)) => {
            commands::check_runtime::execute(
                &path_arg(check_matches, "config"),
                check_matches.get_one::<String>("version").map(String::as_str),
                check_matches.get_one::<String>("probe").map(String::as_str),
                check_matches.get_flag("no-deprecation-warning"),
                &language,
            )
            .await?;
        }
        Some(("init", init_matches)) => {
            let non_interactive = init_matches.get_flag("non-interactive");
            if explicit_language.is_none() {
                println!(
                    "{}",
                    t!("system_language_detected", locale = &language, lang = &language)
                );
            }
            commands::init::run_init_wizard(&language, non_interactive)?;
        }
        _ => {
            // `subcommand_required` makes clap print help and exit before reaching here.
        }
    }
    Ok(())
}
