use std::{env, ffi::OsString, io, process::exit};

use anyhow::{Context, Result};
use clap::ArgMatches;
use reedline::Signal;
use tracing::{debug, error};

mod command_parser;
mod interactive;
mod prompt;
mod repl;

use autores::{
    client::HttpAuthorApi,
    config::{Config, Styleable},
    export::export,
    manager::{AuthorManager, ManagerError},
    render,
    traits::DisplayTerminal,
    types::{birth_date::BirthDate, guid::Guid},
};

struct Session {
    manager: AuthorManager<HttpAuthorApi>,
    config:  Config,
    in_repl: bool,
}

impl Session {
    fn show(&self) {
        if let Some(e) = self.manager.error() {
            println!("{}", render::inline_error(e, &self.config));
        }
        println!("{}", render::author_table(self.manager.authors(), &self.config));
    }

    fn show_form(&self) {
        println!("{}", self.manager.form().fmt_terminal(&self.config));
    }

    /// Inline failures are already recorded on the manager and shown above the table;
    /// alerts go back to the caller. Outside the REPL an inline failure is still an error.
    fn settle(&self, result: Result<(), ManagerError>) -> Result<()> {
        match result {
            Err(e) if e.is_alert() => Err(e.into()),
            Err(e) => {
                self.show();
                if self.in_repl {
                    Ok(())
                } else {
                    Err(e.into())
                }
            }
            Ok(()) => {
                self.show();
                Ok(())
            }
        }
    }

    async fn ensure_loaded(&mut self) {
        if self.manager.authors().is_empty() {
            let _ = self.manager.load().await;
        }
    }

    async fn guid_or_pick(&mut self, matches: &ArgMatches, message: &str) -> Result<Guid> {
        match matches.get_one::<String>("guid") {
            Some(guid) => Ok(Guid(guid.clone())),
            None => {
                self.ensure_loaded().await;
                interactive::pick_author(self.manager.authors(), message)
            }
        }
    }
}

async fn handle_args<I, T>(args: I, session: &mut Session) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command_parser::arg_parser_repl().try_get_matches_from(args)?;
    let validation = session.manager.features().validation;
    match matches.subcommand() {
        Some(("list", _)) => {
            let result = session.manager.load().await;
            session.settle(result)?;
        }
        Some(("search", _matches)) => {
            let text = match _matches.get_many::<String>("name") {
                Some(words) => words.cloned().collect::<Vec<_>>().join(" "),
                None => interactive::search_text(session.manager.search_text())?,
            };
            session.manager.set_search_text(text);
            let result = session.manager.search().await;
            session.settle(result)?;
        }
        Some(("create", _matches)) => {
            session.manager.reset();
            let form = session.manager.form_mut();
            if let Some(first_name) = _matches.get_one::<String>("first-name") {
                form.first_name = first_name.clone();
            }
            if let Some(last_name) = _matches.get_one::<String>("last-name") {
                form.last_name = last_name.clone();
            }
            if let Some(born) = _matches.get_one::<String>("born") {
                form.birth_date = BirthDate::parse_loose(born)?.to_form_value();
            }
            interactive::fill_missing(form, validation)?;
            let result = session.manager.submit().await;
            session.settle(result)?;
        }
        Some(("edit", _matches)) => {
            let guid = session.guid_or_pick(_matches, "Which author?").await?;
            session.ensure_loaded().await;
            session.manager.select(&guid)?;
            interactive::edit_all(session.manager.form_mut(), validation)?;
            let result = session.manager.submit().await;
            session.settle(result)?;
        }
        Some(("submit", _)) => {
            let result = session.manager.submit().await;
            session.settle(result)?;
        }
        Some(("show", _)) => session.show_form(),
        Some(("cancel", _)) => {
            session.manager.reset();
            session.show_form();
        }
        Some(("delete", _matches)) => {
            let guid = session.guid_or_pick(_matches, "Delete which author?").await?;
            if let Some(author) = session.manager.authors().iter().find(|x| x.guid == guid) {
                println!("{}", author.fmt_terminal(&session.config));
            }
            let deleted = if _matches.get_flag("yes") {
                session.manager.delete(&guid, &interactive::AssumeYes).await?
            } else {
                session
                    .manager
                    .delete(&guid, &interactive::TerminalConfirm)
                    .await?
            };
            if deleted {
                session.show();
            } else {
                println!("Nothing deleted.");
            }
        }
        Some(("export", _)) => {
            session.ensure_loaded().await;
            export(session.manager.authors(), io::stdout())?;
        }
        Some(("config", _)) => {
            print!("{}", Config::default_as_string()?);
        }
        Some(("exit", _)) => {
            exit(0);
        }
        Some((name, _matches)) => unimplemented!("{}", name),
        None => unreachable!("subcommand required"),
    }
    Ok(())
}

async fn handle_command(command: String, session: &mut Session) -> Result<()> {
    let command = match shlex::split(&command) {
        Some(command) => command,
        None => anyhow::bail!("Invalid command"),
    };
    if command.is_empty() {
        return Ok(());
    }
    handle_args(command, session).await
}

async fn run_repl(session: &mut Session) -> Result<()> {
    session.in_repl = true;
    let mut repl = repl::Repl::new(
        command_parser::generate_completions(),
        session.config.history_file(),
    )?;
    let _ = session.manager.load().await;
    session.show();
    loop {
        let editing = session.manager.form().selected.as_ref().map(|x| x.to_string());
        match repl.read_line(editing) {
            Ok(Signal::Success(buffer)) => match handle_command(buffer, session).await {
                Ok(_) => (),
                Err(e) => println!("{}", format!("Error: {e}").style(&session.config.style_error)),
            },
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                println!("\nAborted!");
                break;
            }
            Ok(signal) => debug!("Ignoring {signal:?}"),
            Err(e) => {
                error!("Could not read line: {e}");
                break;
            }
        }
    }
    Ok(())
}

fn init_tracing(config: &Config) -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(config.log_level()?)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::read_config()?;
    init_tracing(&config)?;

    let api = HttpAuthorApi::new(config.base_url()?).context("Could not set up the API client")?;
    debug!("Using {}", api.base_url());
    let mut session = Session {
        manager: AuthorManager::new(api, config.features()),
        config,
        in_repl: false,
    };

    let args = env::args_os().skip(1).collect::<Vec<_>>();
    if args.is_empty() {
        return run_repl(&mut session).await;
    }
    let matches = command_parser::arg_parser_cli().try_get_matches_from(args.clone());
    match matches {
        Ok(matches) if matches.subcommand_name() == Some("repl") => run_repl(&mut session).await,
        Ok(_) => handle_args(args, &mut session).await,
        Err(e) => e.exit(),
    }
}
