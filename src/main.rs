use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use treepush::check::{check_connection, log_connection_status};
use treepush::logging::*;
use treepush::shutdown::install_signal_handlers;
use treepush::{Config, GithubStore, LogProgressObserver, PushBuilder, ShutdownFlag, SyncError};

fn cli() -> Command {
	Command::new("treepush")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Upload a directory tree to a GitHub repository")
		.subcommand_required(true)
		.arg(
			Arg::new("config")
				.short('c')
				.long("config")
				.value_name("FILE")
				.global(true)
				.value_parser(value_parser!(PathBuf))
				.help("TOML configuration file"),
		)
		.arg(
			Arg::new("owner")
				.long("owner")
				.value_name("OWNER")
				.global(true)
				.help("Repository owner (overrides GITHUB_REPO_OWNER)"),
		)
		.arg(
			Arg::new("repo")
				.long("repo")
				.value_name("NAME")
				.global(true)
				.help("Repository name (overrides GITHUB_REPO_NAME)"),
		)
		.arg(
			Arg::new("branch")
				.short('b')
				.long("branch")
				.value_name("BRANCH")
				.global(true)
				.help("Target branch"),
		)
		.subcommand(
			Command::new("push")
				.about("Upload every non-skipped file below a directory")
				.arg(Arg::new("dir").value_name("DIR").default_value("."))
				.arg(
					Arg::new("dry-run")
						.short('n')
						.long("dry-run")
						.action(ArgAction::SetTrue)
						.help("List what would be uploaded without contacting the API"),
				)
				.arg(message_arg())
				.arg(
					Arg::new("batch-size")
						.long("batch-size")
						.value_name("N")
						.value_parser(value_parser!(usize))
						.help("Files per batch"),
				)
				.arg(
					Arg::new("cooldown-ms")
						.long("cooldown-ms")
						.value_name("MS")
						.value_parser(value_parser!(u64))
						.help("Pause between batches in milliseconds"),
				),
		)
		.subcommand(
			Command::new("push-files")
				.about("Upload the listed files")
				.arg(
					Arg::new("file")
						.value_name("FILE")
						.required(true)
						.action(ArgAction::Append)
						.num_args(1..),
				)
				.arg(
					Arg::new("root")
						.long("root")
						.value_name("DIR")
						.default_value(".")
						.help("Directory the listed paths are relative to"),
				)
				.arg(message_arg()),
		)
		.subcommand(Command::new("check").about("Verify credentials and repository access"))
}

fn message_arg() -> Arg {
	Arg::new("message")
		.short('m')
		.long("message")
		.value_name("TEMPLATE")
		.help("Commit message template, {path} is replaced by the file path")
}

/// Defaults, then config file, then environment, then flags
fn load_config(matches: &ArgMatches) -> Result<Config, SyncError> {
	let mut config = match matches.get_one::<PathBuf>("config") {
		Some(path) => Config::from_file(path)?,
		None => Config::default(),
	};
	config.apply_env();

	let string_arg = |name: &str| matches.try_get_one::<String>(name).ok().flatten().cloned();
	if let Some(owner) = string_arg("owner") {
		config.owner = owner;
	}
	if let Some(repo) = string_arg("repo") {
		config.repo = repo;
	}
	if let Some(branch) = string_arg("branch") {
		config.branch = branch;
	}
	if let Some(message) = string_arg("message") {
		config.message_template = message;
	}
	if let Ok(Some(batch_size)) = matches.try_get_one::<usize>("batch-size") {
		config.batch_size = *batch_size;
	}
	if let Ok(Some(cooldown_ms)) = matches.try_get_one::<u64>("cooldown-ms") {
		config.cooldown_ms = *cooldown_ms;
	}

	debug!("Configuration: {:?}", config);
	Ok(config)
}

async fn cmd_push(matches: &ArgMatches) -> Result<bool, SyncError> {
	let config = load_config(matches)?;
	let dir = matches.get_one::<String>("dir").map(String::as_str).unwrap_or(".");

	if matches.get_flag("dry-run") {
		let plan = PushBuilder::new(config).root(dir).plan_tree()?;
		for file in &plan {
			println!("{}\t{}", if file.is_binary { "binary" } else { "text" }, file.path);
		}
		info!("Dry run: {} files would be uploaded", plan.len());
		return Ok(true);
	}

	let shutdown = ShutdownFlag::new();
	install_signal_handlers(shutdown.clone());

	let summary = PushBuilder::new(config)
		.root(dir)
		.observer(Arc::new(LogProgressObserver::new()))
		.shutdown(shutdown)
		.push_tree()
		.await?;
	Ok(summary.is_success())
}

async fn cmd_push_files(matches: &ArgMatches) -> Result<bool, SyncError> {
	let config = load_config(matches)?;
	let root = matches.get_one::<String>("root").map(String::as_str).unwrap_or(".");
	let files: Vec<&String> = matches
		.get_many::<String>("file")
		.ok_or_else(|| "push-files: at least one file argument required".to_string())?
		.collect();

	let shutdown = ShutdownFlag::new();
	install_signal_handlers(shutdown.clone());

	let summary = PushBuilder::new(config)
		.root(Path::new(root))
		.observer(Arc::new(LogProgressObserver::new()))
		.shutdown(shutdown)
		.push_files(files)
		.await?;
	Ok(summary.is_success())
}

async fn cmd_check(matches: &ArgMatches) -> Result<bool, SyncError> {
	let config = load_config(matches)?;
	config.validate()?;

	let store = GithubStore::new(&config)?;
	let status = check_connection(&store).await;
	log_connection_status(&status);
	Ok(status.is_ok())
}

#[tokio::main]
async fn main() -> ExitCode {
	treepush::logging::init_tracing();

	let matches = cli().get_matches();
	let result = match matches.subcommand() {
		Some(("push", sub)) => cmd_push(sub).await,
		Some(("push-files", sub)) => cmd_push_files(sub).await,
		Some(("check", sub)) => cmd_check(sub).await,
		_ => Err(SyncError::Other { message: "unknown command".to_string() }),
	};

	match result {
		Ok(true) => ExitCode::SUCCESS,
		Ok(false) => ExitCode::FAILURE,
		Err(e) => {
			error!("{}", e);
			ExitCode::FAILURE
		}
	}
}


// vim: ts=4
