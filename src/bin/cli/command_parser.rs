use clap::{Arg, ArgAction, Command};

fn guid_arg() -> Arg {
    Arg::new("guid").help("GUID of the author, picked from the list when omitted")
}

pub fn arg_parser() -> Command {
    Command::new("autores")
        .about("Manage authors through the Autor API")
        .multicall(true)
        .subcommand_required(true)
        .subcommand(Command::new("list").about("Load and show every author"))
        .subcommand(
            Command::new("search")
                .about("Search authors by name, an empty name shows everyone")
                .arg(Arg::new("name").num_args(1..)),
        )
        .subcommand(
            Command::new("create")
                .about("Fill the form and create an author")
                .arg(Arg::new("first-name").long("first-name").short('f'))
                .arg(Arg::new("last-name").long("last-name").short('l'))
                .arg(
                    Arg::new("born")
                        .long("born")
                        .short('b')
                        .help("Birth date, e.g. 1990-05-01 or \"oct 7, 1970\""),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Load an author into the form and update it")
                .arg(guid_arg()),
        )
        .subcommand(Command::new("submit").about("Send the current form again"))
        .subcommand(Command::new("show").about("Show the form"))
        .subcommand(Command::new("cancel").about("Clear the form and return to create mode"))
        .subcommand(
            Command::new("delete")
                .about("Delete an author")
                .arg(guid_arg())
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .short('y')
                        .help("Do not ask for confirmation")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("export").about("Write the displayed authors as CSV"))
        .subcommand(Command::new("config").about("Print the default configuration"))
}

pub fn arg_parser_cli() -> Command {
    arg_parser().subcommand(Command::new("repl").about("Launch a read eval print loop"))
}

pub fn arg_parser_repl() -> Command {
    arg_parser().subcommand(Command::new("exit").about("Leave the repl"))
}

pub fn generate_completions() -> Vec<String> {
    let cmd = arg_parser_repl();
    let mut subcmds = cmd
        .get_subcommands()
        .map(|x| x.get_name().to_string())
        .collect::<Vec<_>>();
    subcmds.sort();
    subcmds
}
