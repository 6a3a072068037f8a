use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use psm_migrate::document::RecordDocument;
use psm_migrate::{LayoutTable, Migrator, SchemaRevision, CURRENT_REVISION};

fn cli() -> Command {
    let layout_arg = Arg::new("layout")
        .long("layout")
        .value_parser(value_parser!(PathBuf))
        .help("TOML layout table overriding the built-in constants");
    let target_arg = Arg::new("target")
        .long("target")
        .value_parser(value_parser!(u32))
        .help("Revision to migrate to (defaults to the current revision)");

    Command::new("psm-migrate")
        .version(psm_migrate::VERSION)
        .about("Migrate saved settings records to the current schema revision")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("migrate")
                .about("Migrate a JSON record document")
                .arg(
                    Arg::new("input")
                        .long("input")
                        .short('i')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Record document to read"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Where to write the migrated document (stdout if omitted)"),
                )
                .arg(target_arg.clone())
                .arg(layout_arg.clone())
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Print the rewrite plan without writing anything"),
                ),
        )
        .subcommand(
            Command::new("plan")
                .about("Show the rewrites between two revisions")
                .arg(
                    Arg::new("revision")
                        .long("revision")
                        .required(true)
                        .value_parser(value_parser!(u32))
                        .help("Source revision"),
                )
                .arg(
                    Arg::new("legacy")
                        .long("legacy")
                        .action(ArgAction::SetTrue)
                        .help("Source record comes from the foreign legacy format"),
                )
                .arg(target_arg),
        )
        .subcommand(
            Command::new("layout")
                .about("Print the effective layout table as TOML")
                .arg(layout_arg),
        )
}

fn load_migrator(args: &ArgMatches) -> Result<Migrator> {
    let layout = match args.get_one::<PathBuf>("layout") {
        Some(path) => LayoutTable::from_path(path)
            .with_context(|| format!("loading layout table {}", path.display()))?,
        None => LayoutTable::default(),
    };
    Migrator::new(layout).context("validating layout table")
}

fn target(args: &ArgMatches) -> SchemaRevision {
    args.get_one::<u32>("target")
        .map_or(CURRENT_REVISION, |n| SchemaRevision::new(*n))
}

fn print_plan(migrator: &Migrator, source: SchemaRevision, legacy: bool, target: SchemaRevision) -> Result<()> {
    let plan = migrator.plan(source, legacy, target)?;
    if plan.is_empty() {
        println!("revision {source} is already at target {target}");
    }
    for rule in plan {
        println!("{rule}: {}", rule.describe());
    }
    Ok(())
}

fn run_migrate(args: &ArgMatches) -> Result<()> {
    let migrator = load_migrator(args)?;
    let target = target(args);
    let input = args
        .get_one::<PathBuf>("input")
        .context("--input is required")?;

    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading record document {}", input.display()))?;
    let document = RecordDocument::from_json(&text)
        .with_context(|| format!("parsing record document {}", input.display()))?;

    if args.get_flag("dry-run") {
        return print_plan(&migrator, document.revision, document.legacy, target);
    }

    let source = document.revision;
    let migrated = document
        .migrate(&migrator, target)
        .with_context(|| format!("migrating {} from revision {source}", input.display()))?;
    tracing::info!(
        "Migrated {} from revision {} to {} ({} fields)",
        input.display(),
        source,
        target,
        migrated.settings.len()
    );

    let json = migrated.to_json()?;
    match args.get_one::<PathBuf>("output") {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("migrate", args)) => run_migrate(args),
        Some(("plan", args)) => {
            let source = args
                .get_one::<u32>("revision")
                .map(|n| SchemaRevision::new(*n))
                .context("--revision is required")?;
            print_plan(&Migrator::default(), source, args.get_flag("legacy"), target(args))
        }
        Some(("layout", args)) => {
            let migrator = load_migrator(args)?;
            print!("{}", migrator.layout().to_toml()?);
            Ok(())
        }
        Some((other, _)) => anyhow::bail!("unknown subcommand '{other}'"),
        None => anyhow::bail!("no subcommand given"),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli().get_matches()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
