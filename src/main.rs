use std::{
    io::{self, Write},
    process,
};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use outlay::{
    config::{self, Backend, Cli, Command, PostgresParams, Settings},
    import, ops,
    postgres_storage::PostgresConnector,
    report,
    sqlite_storage::SqliteConnector,
    storage::{self, Connector},
    Error,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    match &cli.command {
        Command::Configuration => configure(&cli.config),
        Command::Add {
            amount,
            description,
        } => {
            let mut db = active_connector(&cli.config)?;
            ops::add_expense(db.as_mut(), *amount, description)
        }
        Command::Delete { id } => {
            let mut db = active_connector(&cli.config)?;
            ops::delete_expense(db.as_mut(), *id)?;
            println!("The record with id {id} has been deleted.");
            Ok(())
        }
        Command::Report => {
            let mut db = active_connector(&cli.config)?;
            let expenses = ops::read_all(db.as_mut())?;
            print!("{}", report::render_report(&expenses));
            Ok(())
        }
        Command::PythonExport => {
            let mut db = active_connector(&cli.config)?;
            let expenses = ops::read_all(db.as_mut())?;
            println!("{}", report::render_export(&expenses));
            Ok(())
        }
        Command::ImportCsv { file } => {
            let mut db = active_connector(&cli.config)?;
            let imported = import::import_csv(db.as_mut(), file)?;
            println!("Imported {imported} expenses from {file}.");
            Ok(())
        }
        Command::DropDatabase => {
            let db = active_connector(&cli.config)?;
            let answer = prompt("Are you sure you want to drop the database? yes/no: ")?;
            if answer.eq_ignore_ascii_case("yes") {
                db.drop_database()?;
                Settings::store(&cli.config, Backend::Unset)?;
                println!("The database has been dropped.");
            }
            Ok(())
        }
    }
}

/// One fresh connector per invocation, for whichever backend the settings
/// file names.
fn active_connector(config_path: &str) -> Result<Box<dyn Connector>, Error> {
    let backend = Settings::load(config_path)?;
    storage::connect(backend)
}

fn configure(config_path: &str) -> Result<(), Error> {
    let answer = prompt("Which database backend should be used? Type \"sqlite\" or \"postgres\": ")?;
    let backend = match answer.to_lowercase().as_str() {
        "sqlite" => {
            SqliteConnector::prepare_database(&config::sqlite_path()?)?;
            Backend::Sqlite
        }
        "postgres" => {
            PostgresConnector::prepare_database(&PostgresParams::from_env()?)?;
            Backend::Postgres
        }
        _ => {
            println!("Unrecognized backend {answer:?}; nothing was changed.");
            return Ok(());
        }
    };
    let stored = Settings::store(config_path, backend)?;
    println!("Database created. Backend set to {stored}.");
    Ok(())
}

fn prompt(message: &str) -> Result<String, Error> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
